use super::wire::{is_already_absent, is_already_present, RewriteRef, UpdateRequest};
use crate::http::{classify_send_error, is_retryable_status};
use async_trait::async_trait;
use lancache_sync_application::ports::RewriteDirectory;
use lancache_sync_application::services::RetryPolicy;
use lancache_sync_domain::config::DnsServerConfig;
use lancache_sync_domain::{DomainError, RewriteEntry};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument};

/// Basic-auth client for the rewrite table.
///
/// `401`/`403` map to `Authentication` without retry. `5xx`, timeouts and
/// connection errors are retried by the policy and then surface as
/// `RemoteUnavailable`. Any other refusal of a mutation is `EntryApply`.
/// Mutations are idempotent: a repeat of an add, delete or update that has
/// already taken effect succeeds.
pub struct AdGuardRewriteClient {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
    retry: RetryPolicy,
    atomic_update: AtomicBool,
}

impl AdGuardRewriteClient {
    pub fn new(client: reqwest::Client, config: &DnsServerConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            endpoint: config.rewrite_endpoint(),
            username: config.username.clone(),
            password: config.password.clone(),
            retry,
            atomic_update: AtomicBool::new(config.atomic_update),
        }
    }

    async fn attempt<B>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&B>,
    ) -> Result<(StatusCode, String), DomainError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self
            .client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DomainError::Authentication {
                status: status.as_u16(),
            });
        }
        if is_retryable_status(status) {
            return Err(DomainError::Transient(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Transient(format!("read error for {}: {}", url, e)))?;
        Ok((status, body))
    }

    /// One logical call with retries. Exhausted transient failures become
    /// `RemoteUnavailable`.
    async fn call<B>(
        &self,
        operation: &str,
        method: Method,
        action: &str,
        payload: Option<&B>,
    ) -> Result<(StatusCode, String), DomainError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = format!("{}/{}", self.endpoint, action);
        self.retry
            .run(operation, |_| self.attempt(method.clone(), &url, payload))
            .await
            .map_err(|e| match e {
                DomainError::Transient(cause) => DomainError::RemoteUnavailable(format!(
                    "{} (after {} attempts)",
                    cause,
                    self.retry.max_attempts()
                )),
                other => other,
            })
    }

    async fn add_then_delete(
        &self,
        domain: &str,
        old_target: &str,
        new_target: &str,
    ) -> Result<(), DomainError> {
        // Adding first keeps the domain resolvable throughout.
        self.add(domain, new_target).await?;
        self.remove(domain, old_target).await
    }

    /// A refused PUT may follow a retried attempt that already committed.
    /// Read the table back and accept the update if it has landed; if only
    /// the old pair is gone, finish with an add.
    async fn settle_update(
        &self,
        domain: &str,
        old_target: &str,
        new_target: &str,
        status: StatusCode,
        body: &str,
    ) -> Result<(), DomainError> {
        let entries = self.list().await?;
        let has = |answer: &str| {
            entries
                .iter()
                .any(|e| e.domain == domain && e.answer == answer)
        };

        match (has(old_target), has(new_target)) {
            (false, true) => {
                debug!(domain, "Rewrite update already applied");
                Ok(())
            }
            (false, false) => {
                debug!(domain, "Rewrite to update is gone, adding the new answer");
                self.add(domain, new_target).await
            }
            (true, _) => Err(refused(domain, status, body)),
        }
    }
}

fn refused(domain: &str, status: StatusCode, body: &str) -> DomainError {
    DomainError::EntryApply {
        domain: domain.to_string(),
        cause: format!("HTTP {}: {}", status.as_u16(), body.trim()),
    }
}

#[async_trait]
impl RewriteDirectory for AdGuardRewriteClient {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<RewriteEntry>, DomainError> {
        let (status, body) = self
            .call::<()>("list rewrites", Method::GET, "list", None)
            .await?;

        if !status.is_success() {
            return Err(DomainError::InvalidResponse {
                endpoint: format!("{}/list", self.endpoint),
                detail: format!("HTTP {}", status.as_u16()),
            });
        }

        // An empty table is reported as `null` by some server versions.
        let entries: Option<Vec<RewriteEntry>> =
            serde_json::from_str(&body).map_err(|e| DomainError::InvalidResponse {
                endpoint: format!("{}/list", self.endpoint),
                detail: e.to_string(),
            })?;
        let entries = entries.unwrap_or_default();

        debug!(entries = entries.len(), "Rewrite table read");
        Ok(entries)
    }

    async fn add(&self, domain: &str, target: &str) -> Result<(), DomainError> {
        let payload = RewriteRef {
            domain,
            answer: target,
        };
        let (status, body) = self
            .call("add rewrite", Method::POST, "add", Some(&payload))
            .await?;

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::BAD_REQUEST if is_already_present(&body) => {
                debug!(domain, "Rewrite already present");
                Ok(())
            }
            s => Err(refused(domain, s, &body)),
        }
    }

    async fn update(
        &self,
        domain: &str,
        old_target: &str,
        new_target: &str,
    ) -> Result<(), DomainError> {
        if !self.atomic_update.load(Ordering::Relaxed) {
            return self.add_then_delete(domain, old_target, new_target).await;
        }

        let payload = UpdateRequest {
            target: RewriteRef {
                domain,
                answer: old_target,
            },
            update: RewriteRef {
                domain,
                answer: new_target,
            },
        };
        let (status, body) = self
            .call("update rewrite", Method::PUT, "update", Some(&payload))
            .await?;

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => {
                if self.atomic_update.swap(false, Ordering::Relaxed) {
                    info!("Server has no rewrite update endpoint, using add+delete");
                }
                self.add_then_delete(domain, old_target, new_target).await
            }
            StatusCode::BAD_REQUEST => {
                self.settle_update(domain, old_target, new_target, status, &body)
                    .await
            }
            s => Err(refused(domain, s, &body)),
        }
    }

    async fn remove(&self, domain: &str, target: &str) -> Result<(), DomainError> {
        let payload = RewriteRef {
            domain,
            answer: target,
        };
        let (status, body) = self
            .call("delete rewrite", Method::POST, "delete", Some(&payload))
            .await?;

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::BAD_REQUEST if is_already_absent(&body) => {
                debug!(domain, "Rewrite already absent");
                Ok(())
            }
            s => Err(refused(domain, s, &body)),
        }
    }
}
