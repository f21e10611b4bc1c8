use super::FakeAdGuard;
use lancache_sync_application::services::{RetryPolicy, RewriteBuilder};
use lancache_sync_application::use_cases::{ReconcileSettings, ReconcileUseCase};
use lancache_sync_domain::config::DnsServerConfig;
use lancache_sync_domain::SourceSelection;
use lancache_sync_infrastructure::adguard::AdGuardRewriteClient;
use lancache_sync_infrastructure::http::build_client;
use lancache_sync_infrastructure::snapshot::JsonSnapshotStore;
use lancache_sync_infrastructure::sources::{HttpListFetcher, HttpSourceIndex};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: &str = "admin";
pub const PASS: &str = "hunter2";
pub const TARGET: &str = "192.168.1.50";

enum ListFile {
    Body(String),
    Status(u16),
}

/// A cache-domains mirror: `cache_domains.json` plus one list per service.
pub struct CacheDomains {
    pub server: MockServer,
    services: Vec<(String, ListFile)>,
}

impl CacheDomains {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            services: vec![],
        }
    }

    pub fn with_service(mut self, name: &str, body: &str) -> Self {
        self.services
            .push((name.to_string(), ListFile::Body(body.to_string())));
        self
    }

    /// A service listed in the index whose file answers with `status`.
    pub fn with_broken_service(mut self, name: &str, status: u16) -> Self {
        self.services.push((name.to_string(), ListFile::Status(status)));
        self
    }

    /// Mount the index and every list file.
    pub async fn publish_index(self) -> Self {
        self.mount_all().await;
        self
    }

    /// Change one list in place, as an upstream commit would.
    pub async fn update_service(&mut self, name: &str, body: &str) {
        for (service, file) in self.services.iter_mut() {
            if service == name {
                *file = ListFile::Body(body.to_string());
            }
        }
        self.server.reset().await;
        self.mount_all().await;
    }

    async fn mount_all(&self) {
        for (name, file) in &self.services {
            let response = match file {
                ListFile::Body(body) => ResponseTemplate::new(200).set_body_string(body.clone()),
                ListFile::Status(status) => ResponseTemplate::new(*status),
            };
            Mock::given(method("GET"))
                .and(path(format!("/{}.txt", name)))
                .respond_with(response)
                .mount(&self.server)
                .await;
        }

        let listings: Vec<_> = self
            .services
            .iter()
            .map(|(name, _)| {
                json!({
                    "name": name,
                    "description": format!("{} downloads", name),
                    "domain_files": [format!("{}.txt", name)]
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/cache_domains.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cache_domains": listings
            })))
            .mount(&self.server)
            .await;
    }

    pub fn index_url(&self) -> String {
        format!("{}/cache_domains.json", self.server.uri())
    }
}

/// Wires the real adapters against the mocked services.
pub struct Harness {
    pub index_url: String,
    pub adguard_url: String,
    pub username: String,
    pub password: String,
    pub cache_file: Option<PathBuf>,
    pub settings: ReconcileSettings,
}

impl Harness {
    pub fn new(lists: &CacheDomains, adguard: &MockServer) -> Self {
        Self {
            index_url: lists.index_url(),
            adguard_url: adguard.uri(),
            username: USER.to_string(),
            password: PASS.to_string(),
            cache_file: None,
            settings: ReconcileSettings {
                selection: SourceSelection::All,
                progress_batch_size: 3,
                strict: false,
                remove_stale: false,
                dry_run: false,
                cache_max_age_secs: None,
            },
        }
    }

    pub fn use_case(&self) -> ReconcileUseCase {
        let retry = RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(5));
        let client = build_client(Duration::from_secs(5)).unwrap();
        let dns_server = DnsServerConfig {
            api_base_url: self.adguard_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            request_timeout_secs: 5,
            atomic_update: true,
        };

        let mut builder = RewriteBuilder::new(TARGET);
        if let Some(path) = &self.cache_file {
            builder = builder.with_snapshot_store(Arc::new(JsonSnapshotStore::new(path)));
        }

        ReconcileUseCase::new(
            Arc::new(HttpSourceIndex::new(
                client.clone(),
                self.index_url.clone(),
                retry.clone(),
            )),
            Arc::new(HttpListFetcher::new(client.clone(), retry.clone())),
            4,
            builder,
            Arc::new(AdGuardRewriteClient::new(client, &dns_server, retry)),
            self.settings.clone(),
        )
    }
}

pub async fn adguard_with(entries: Vec<(&str, &str)>) -> (MockServer, FakeAdGuard) {
    let server = MockServer::start().await;
    let fake = FakeAdGuard::new(entries);
    fake.mount(&server, USER, PASS).await;
    (server, fake)
}
