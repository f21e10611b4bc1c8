use lancache_sync_domain::DomainError;
use reqwest::StatusCode;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("lancache-sync/", env!("CARGO_PKG_VERSION"));

/// Shared client for every adapter. One connection pool per process.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| DomainError::Transient(format!("HTTP client init failed: {}", e)))
}

/// Worth retrying: gateway errors, overload, rate limiting.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

/// Timeouts and connection failures are transient, anything else is not.
pub fn classify_send_error(endpoint: &str, e: reqwest::Error) -> DomainError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        DomainError::Transient(format!("{}: {}", endpoint, e))
    } else {
        DomainError::InvalidResponse {
            endpoint: endpoint.to_string(),
            detail: e.to_string(),
        }
    }
}

/// GET a text body. 5xx and network errors come back as `Transient`.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, DomainError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_send_error(url, e))?;

    let status = response.status();
    if is_retryable_status(status) {
        return Err(DomainError::Transient(format!("HTTP {} for {}", status.as_u16(), url)));
    }
    if !status.is_success() {
        return Err(DomainError::InvalidResponse {
            endpoint: url.to_string(),
            detail: format!("HTTP {}", status.as_u16()),
        });
    }

    response
        .text()
        .await
        .map_err(|e| DomainError::Transient(format!("read error for {}: {}", url, e)))
}
