#![allow(dead_code)]

use lancache_sync_application::services::RetryPolicy;
use lancache_sync_domain::config::DnsServerConfig;
use lancache_sync_infrastructure::adguard::AdGuardRewriteClient;
use lancache_sync_infrastructure::http::build_client;
use std::time::Duration;
use wiremock::MockServer;

pub const USER: &str = "admin";
pub const PASS: &str = "s3cret";

pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(1), Duration::from_millis(5))
}

pub fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5)).unwrap()
}

pub fn adguard(server: &MockServer, atomic_update: bool, max_attempts: u32) -> AdGuardRewriteClient {
    let config = DnsServerConfig {
        api_base_url: server.uri(),
        username: USER.to_string(),
        password: PASS.to_string(),
        request_timeout_secs: 5,
        atomic_update,
    };
    AdGuardRewriteClient::new(client(), &config, fast_retry(max_attempts))
}
