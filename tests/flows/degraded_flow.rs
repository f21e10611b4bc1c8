#[path = "../common/mod.rs"]
mod common;

use common::{adguard_with, CacheDomains, Harness, TARGET};
use lancache_sync_application::services::RunBudget;
use lancache_sync_domain::{FailureReason, RunOutcome};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_broken_list_isolated_from_the_rest() {
    // Arrange
    let lists = CacheDomains::start()
        .await
        .with_service("steam", "lancache.steamcontent.com\n")
        .with_broken_service("origin", 500)
        .with_service("wsus", "download.windowsupdate.com\n")
        .publish_index()
        .await;
    let (server, adguard) = adguard_with(vec![]).await;
    let dir = TempDir::new().unwrap();
    let mut harness = Harness::new(&lists, &server);
    harness.cache_file = Some(dir.path().join("cache.json"));

    // Act
    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;

    // Assert
    assert_eq!(summary.outcome, RunOutcome::Succeeded);
    assert_eq!(summary.sources_fetched, 2);
    assert_eq!(summary.sources_failed, 1);
    assert_eq!(adguard.entries().len(), 2);
    assert!(!dir.path().join("cache.json").exists());
}

#[tokio::test]
async fn test_strict_mode_refuses_partial_data() {
    let lists = CacheDomains::start()
        .await
        .with_service("steam", "lancache.steamcontent.com\n")
        .with_broken_service("origin", 404)
        .publish_index()
        .await;
    let (server, adguard) = adguard_with(vec![]).await;
    let mut harness = Harness::new(&lists, &server);
    harness.settings.strict = true;

    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;

    assert!(matches!(
        summary.outcome,
        RunOutcome::Failed(FailureReason::SourceFailed(_))
    ));
    assert_eq!(adguard.mutations(), 0);
}

#[tokio::test]
async fn test_mirror_outage_uses_previous_snapshot() {
    // Arrange - a good run writes the snapshot
    let lists = CacheDomains::start()
        .await
        .with_service("steam", "lancache.steamcontent.com\n*.steamcontent.com\n")
        .publish_index()
        .await;
    let (server, _) = adguard_with(vec![]).await;
    let dir = TempDir::new().unwrap();
    let mut harness = Harness::new(&lists, &server);
    harness.cache_file = Some(dir.path().join("state").join("cache.json"));
    let first = harness.use_case().execute(&RunBudget::unlimited()).await;
    assert!(first.outcome.is_success());

    // The mirror goes down and the DNS server is rebuilt from scratch.
    lists.server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&lists.server)
        .await;
    let (fresh_server, fresh_adguard) = adguard_with(vec![]).await;
    harness.adguard_url = fresh_server.uri();

    // Act
    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;

    // Assert
    assert_eq!(summary.outcome, RunOutcome::Succeeded);
    assert!(summary.stale);
    assert_eq!(summary.added, 2);
    assert_eq!(
        fresh_adguard.answer("*.steamcontent.com").as_deref(),
        Some(TARGET)
    );
}

#[tokio::test]
async fn test_mirror_outage_without_snapshot_fails() {
    let lists = CacheDomains::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&lists.server)
        .await;
    let (server, adguard) = adguard_with(vec![]).await;

    let summary = Harness::new(&lists, &server)
        .use_case()
        .execute(&RunBudget::unlimited())
        .await;

    assert_eq!(summary.outcome, RunOutcome::Failed(FailureReason::NoDesiredSet));
    assert_eq!(adguard.mutations(), 0);
}

async fn run_delisting(remove_stale: bool) -> (common::FakeAdGuard, lancache_sync_domain::SyncSummary) {
    // A first run manages two domains next to a hand-made rewrite.
    let mut lists = CacheDomains::start()
        .await
        .with_service("riot", "riot.cdn.example.com\nlol.cdn.example.com\n")
        .publish_index()
        .await;
    let (server, adguard) = adguard_with(vec![("manual.cdn.example.com", TARGET)]).await;
    let dir = TempDir::new().unwrap();
    let mut harness = Harness::new(&lists, &server);
    harness.cache_file = Some(dir.path().join("cache.json"));
    harness.settings.remove_stale = remove_stale;
    harness.use_case().execute(&RunBudget::unlimited()).await;
    assert_eq!(adguard.entries().len(), 3);

    // Upstream drops one of them.
    lists
        .update_service("riot", "riot.cdn.example.com\n")
        .await;
    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;
    (adguard, summary)
}

#[tokio::test]
async fn test_delisted_domain_kept_by_default() {
    let (adguard, summary) = run_delisting(false).await;

    assert!(summary.outcome.is_success());
    assert_eq!(summary.removed, 0);
    assert_eq!(adguard.entries().len(), 3);
}

#[tokio::test]
async fn test_delisted_domain_removed_when_enabled() {
    let (adguard, summary) = run_delisting(true).await;

    assert!(summary.outcome.is_success());
    assert_eq!(summary.removed, 1);
    assert_eq!(adguard.answer("lol.cdn.example.com"), None);
    assert_eq!(adguard.answer("riot.cdn.example.com").as_deref(), Some(TARGET));
    assert_eq!(
        adguard.answer("manual.cdn.example.com").as_deref(),
        Some(TARGET)
    );
}

#[tokio::test]
async fn test_run_budget_expiry_reports_timeout() {
    let lists = CacheDomains::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&lists.server)
        .await;
    let (server, adguard) = adguard_with(vec![]).await;
    let budget = RunBudget::new(Some(Duration::from_millis(100)), CancellationToken::new());

    let summary = Harness::new(&lists, &server)
        .use_case()
        .execute(&budget)
        .await;

    assert_eq!(summary.outcome, RunOutcome::Failed(FailureReason::Timeout));
    assert_eq!(adguard.mutations(), 0);
}
