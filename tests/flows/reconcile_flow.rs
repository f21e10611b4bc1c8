#[path = "../common/mod.rs"]
mod common;

use common::{adguard_with, CacheDomains, FakeAdGuard, Harness, TARGET};
use lancache_sync_application::services::RunBudget;
use lancache_sync_domain::{FailureReason, RunOutcome, SourceSelection};
use wiremock::MockServer;

async fn mirror() -> CacheDomains {
    CacheDomains::start()
        .await
        .with_service("steam", "# Steam\nlancache.steamcontent.com\n*.steamcontent.com\n")
        .with_service("epicgames", "epicgames-download1.akamaized.net\n\ndownload.epicgames.com\n")
        .with_service("blizzard", "dist.blizzard.com\n*.cdn.blizzard.com\nlevel3.blizzard.com\n")
        .publish_index()
        .await
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_empty_server_converges_then_stays_idle() {
    // Arrange
    let lists = mirror().await;
    let (server, adguard) = adguard_with(vec![]).await;
    let reconcile = Harness::new(&lists, &server).use_case();

    // Act
    let first = reconcile.execute(&RunBudget::unlimited()).await;
    let mutations_after_first = adguard.mutations();
    let second = reconcile.execute(&RunBudget::unlimited()).await;

    // Assert
    assert_eq!(first.outcome, RunOutcome::Succeeded);
    assert_eq!(first.sources_fetched, 3);
    assert_eq!(first.added, 7);
    assert_eq!(adguard.entries().len(), 7);
    assert!(adguard.entries().iter().all(|e| e.answer == TARGET));

    assert_eq!(second.outcome, RunOutcome::Succeeded);
    assert_eq!(second.unchanged, 7);
    assert_eq!(second.added + second.updated + second.removed, 0);
    assert_eq!(adguard.mutations(), mutations_after_first);
}

#[tokio::test]
async fn test_misdirected_rewrite_updated_and_unrelated_kept() {
    let lists = mirror().await;
    let (server, adguard) = adguard_with(vec![
        ("lancache.steamcontent.com", "10.9.9.9"),
        ("nas.home.arpa", "192.168.1.10"),
    ])
    .await;
    let reconcile = Harness::new(&lists, &server).use_case();

    let summary = reconcile.execute(&RunBudget::unlimited()).await;

    assert!(summary.outcome.is_success());
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.added, 6);
    assert_eq!(
        adguard.answer("lancache.steamcontent.com").as_deref(),
        Some(TARGET)
    );
    assert_eq!(adguard.answer("nas.home.arpa").as_deref(), Some("192.168.1.10"));
}

#[tokio::test]
async fn test_update_falls_back_on_older_server() {
    let lists = mirror().await;
    let server = MockServer::start().await;
    let adguard = FakeAdGuard::new(vec![("dist.blizzard.com", "10.9.9.9")]).without_update();
    adguard.mount(&server, common::USER, common::PASS).await;
    let reconcile = Harness::new(&lists, &server).use_case();

    let summary = reconcile.execute(&RunBudget::unlimited()).await;

    assert!(summary.outcome.is_success());
    assert_eq!(summary.updated, 1);
    let blizzard: Vec<_> = adguard
        .entries()
        .into_iter()
        .filter(|e| e.domain == "dist.blizzard.com")
        .collect();
    assert_eq!(blizzard.len(), 1);
    assert_eq!(blizzard[0].answer, TARGET);
}

#[tokio::test]
async fn test_explicit_selection_limits_sources() {
    let lists = mirror().await;
    let (server, adguard) = adguard_with(vec![]).await;
    let mut harness = Harness::new(&lists, &server);
    harness.settings.selection = SourceSelection::Explicit(vec!["steam".to_string()]);

    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;

    assert!(summary.outcome.is_success());
    assert_eq!(summary.sources_fetched, 1);
    assert_eq!(adguard.entries().len(), 2);
}

#[tokio::test]
async fn test_dry_run_leaves_server_untouched() {
    let lists = mirror().await;
    let (server, adguard) = adguard_with(vec![]).await;
    let mut harness = Harness::new(&lists, &server);
    harness.settings.dry_run = true;

    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;

    assert!(summary.outcome.is_success());
    assert_eq!(summary.added, 7);
    assert_eq!(adguard.mutations(), 0);
}

// ============================================================================
// Fatal failures
// ============================================================================

#[tokio::test]
async fn test_wrong_password_fails_without_mutations() {
    let lists = mirror().await;
    let (server, adguard) = adguard_with(vec![]).await;
    let mut harness = Harness::new(&lists, &server);
    harness.password = "wrong".to_string();

    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;

    assert!(matches!(
        summary.outcome,
        RunOutcome::Failed(FailureReason::Authentication(_))
    ));
    assert_ne!(summary.outcome.exit_code(), 0);
    assert_eq!(adguard.mutations(), 0);
}

#[tokio::test]
async fn test_unknown_service_is_configuration_failure() {
    let lists = mirror().await;
    let (server, adguard) = adguard_with(vec![]).await;
    let mut harness = Harness::new(&lists, &server);
    harness.settings.selection =
        SourceSelection::Explicit(vec!["steam".to_string(), "uplay".to_string()]);

    let summary = harness.use_case().execute(&RunBudget::unlimited()).await;

    match summary.outcome {
        RunOutcome::Failed(FailureReason::Configuration(message)) => {
            assert!(message.contains("uplay"))
        }
        other => panic!("expected configuration failure, got {:?}", other),
    }
    assert_eq!(adguard.mutations(), 0);
}
