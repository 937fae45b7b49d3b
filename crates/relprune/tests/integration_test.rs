//! Integration tests for relprune crate.
//!
//! These drive a whole run against the in-memory transport.

use relprune::{AppError, Purger, PurgeSummary};
use relprune_api::testing::{FakeFailure, FakeTransport};
use relprune_api::{endpoints, CacheStore, DiscordClient};
use relprune_common::test_utils::{
    account_fixtures, create_temp_dir, init_test_logging, relationship_fixtures,
};
use relprune_common::RelationshipId;
use relprune_config::Config;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

fn config(cache_path: &Path, allow_list: &[&str], limit: usize) -> Config {
    let mut config = Config::default();
    config.discord.token = "MTIzNDU2Nzg5.fake.token".to_string();
    config.purge.allow_list = allow_list.iter().map(|s| (*s).to_string()).collect();
    config.purge.concurrency_limit = limit;
    config.cache.path = cache_path.to_path_buf();
    config
}

fn purger(transport: FakeTransport, config: &Config) -> Purger<FakeTransport> {
    init_test_logging();
    Purger::new(DiscordClient::from_config(transport, config), config)
}

#[tokio::test]
async fn test_invalid_token_stops_before_anything_else() {
    let dir = create_temp_dir();
    let cache_path = dir.path().join("cache.json");
    let config = config(&cache_path, &[], 4);
    let transport = FakeTransport::new()
        .with_profile_failure(FakeFailure::Status(401))
        .with_relationships(relationship_fixtures::friends(3));

    let purger = purger(transport, &config);
    let err = purger.run().await.unwrap_err();

    assert!(matches!(err, AppError::InvalidToken));
    let transport = purger.client().transport();
    assert_eq!(transport.delete_calls(), 0);
    assert_eq!(transport.get_calls(endpoints::RELATIONSHIPS), 0);
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn test_allow_listed_and_non_friends_are_kept() {
    let dir = create_temp_dir();
    let config = config(&dir.path().join("cache.json"), &["first"], 4);
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships(vec![
            relationship_fixtures::friend(1, "first", Some("First")),
            relationship_fixtures::blocked(2, "second"),
            relationship_fixtures::friend(3, "third", Some("Third")),
        ]);

    let purger = purger(transport, &config);
    let summary = purger.run().await.unwrap();

    assert_eq!(
        summary,
        PurgeSummary {
            total: 3,
            attempted: 1,
            deleted: 1
        }
    );
    assert_eq!(
        purger.client().transport().deleted_ids(),
        vec![RelationshipId(3)]
    );
}

#[tokio::test]
async fn test_display_name_on_allow_list_is_kept() {
    let dir = create_temp_dir();
    let config = config(&dir.path().join("cache.json"), &["Best Friend"], 4);
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships(vec![
            relationship_fixtures::friend(1, "bf_handle", Some("Best Friend")),
            relationship_fixtures::friend(2, "someone", Some("Someone")),
        ]);

    let purger = purger(transport, &config);
    let summary = purger.run().await.unwrap();

    assert_eq!(summary.attempted, 1);
    assert_eq!(
        purger.client().transport().deleted_ids(),
        vec![RelationshipId(2)]
    );
}

#[tokio::test]
async fn test_failed_deletion_is_counted_and_run_continues() {
    let dir = create_temp_dir();
    let config = config(&dir.path().join("cache.json"), &[], 1);
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships(vec![
            relationship_fixtures::friend(1, "a", None),
            relationship_fixtures::friend(2, "b", None),
            relationship_fixtures::friend(3, "c", None),
        ])
        .fail_delete(RelationshipId(1), FakeFailure::Connection);

    let purger = purger(transport, &config);
    // A gate of one would hang here if the failed call kept its permit.
    let summary = timeout(Duration::from_secs(5), purger.run())
        .await
        .expect("run deadlocked")
        .unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.deleted, 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.remaining(), 1);
    assert_eq!(purger.client().gate().available_permits(), 1);
}

#[tokio::test]
async fn test_list_failure_aborts_without_deleting() {
    let dir = create_temp_dir();
    let config = config(&dir.path().join("cache.json"), &[], 4);
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships_failure(FakeFailure::Status(503));

    let purger = purger(transport, &config);
    let err = purger.run().await.unwrap_err();

    match err {
        AppError::Api(e) => assert_eq!(e.status_code(), Some(503)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(purger.client().transport().delete_calls(), 0);
}

#[tokio::test]
async fn test_run_writes_snapshot() {
    let dir = create_temp_dir();
    let cache_path = dir.path().join("cache.json");
    let config = config(&cache_path, &[], 4);
    let raw = relationship_fixtures::friends(4);
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships(raw.clone());

    purger(transport, &config).run().await.unwrap();

    let snapshot = CacheStore::new(&cache_path).load().await.unwrap().unwrap();
    assert_eq!(snapshot.friends, raw);
    assert_eq!(snapshot.total_friends, 4);
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let dir = create_temp_dir();
    let config = config(&dir.path().join("cache.json"), &[], 5);
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships(relationship_fixtures::friends(40))
        .with_delete_latency(Duration::from_millis(10));

    let purger = purger(transport, &config);
    let summary = purger.run().await.unwrap();

    assert_eq!(summary.deleted, 40);
    let peak = purger.client().transport().peak_in_flight();
    assert!(peak <= 5, "peak in-flight deletions was {peak}");
}

#[tokio::test]
async fn test_dry_run_deletes_nothing() {
    let dir = create_temp_dir();
    let mut config = config(&dir.path().join("cache.json"), &[], 4);
    config.purge.dry_run = true;
    config.purge.dry_run_delay_ms = 1;
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships(relationship_fixtures::friends(3));

    let purger = purger(transport, &config);
    let summary = purger.run().await.unwrap();

    assert_eq!(summary.deleted, 3);
    assert_eq!(purger.client().transport().delete_calls(), 0);
}

#[tokio::test]
async fn test_disabled_cache_writes_nothing() {
    let dir = create_temp_dir();
    let cache_path = dir.path().join("cache.json");
    let mut config = config(&cache_path, &[], 4);
    config.cache.enabled = false;
    let transport = FakeTransport::new()
        .with_profile(account_fixtures::me())
        .with_relationships(relationship_fixtures::friends(2));

    purger(transport, &config).run().await.unwrap();
    assert!(!cache_path.exists());
}
