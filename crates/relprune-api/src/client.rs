//! Discord relationship client.
//!
//! Token validation, relationship listing with an optional raw snapshot, and
//! gated deletion. Only the list fetch reports errors to the caller; profile
//! and delete failures are logged with their class and turned into
//! `None`/`false`.

use crate::cache::CacheStore;
use crate::models::{Account, Relationship};
use crate::transport::{endpoints, HttpTransport, ReqwestTransport};
use relprune_common::{PruneError, RelationshipId, Result};
use relprune_config::Config;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OnceCell, Semaphore};
use tracing::{debug, error, info, instrument};

/// What a deletion actually does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Call the delete endpoint.
    #[default]
    Live,
    /// Log the deletion and wait `delay` instead of calling the API.
    DryRun {
        /// Simulated request latency.
        delay: Duration,
    },
}

/// A relationship to delete, by id or by record.
#[derive(Debug, Clone, Copy)]
pub enum DeleteTarget<'a> {
    /// Bare id.
    Id(RelationshipId),
    /// Full record, used for richer log lines.
    Record(&'a Relationship),
}

impl DeleteTarget<'_> {
    /// Id of the relationship.
    pub const fn id(&self) -> RelationshipId {
        match self {
            Self::Id(id) => *id,
            Self::Record(rel) => rel.id,
        }
    }

    fn describe(&self, date_format: &str) -> String {
        match self {
            Self::Id(id) => format!("User {id}"),
            Self::Record(rel) => {
                format!("{:<36} [{}]", rel.extended(), rel.pretty_since(date_format))
            }
        }
    }
}

impl From<RelationshipId> for DeleteTarget<'_> {
    fn from(id: RelationshipId) -> Self {
        Self::Id(id)
    }
}

impl From<u64> for DeleteTarget<'_> {
    fn from(id: u64) -> Self {
        Self::Id(RelationshipId(id))
    }
}

impl<'a> From<&'a Relationship> for DeleteTarget<'a> {
    fn from(rel: &'a Relationship) -> Self {
        Self::Record(rel)
    }
}

fn log_failure(action: &str, err: &PruneError) {
    match err {
        PruneError::Status { status, message } => {
            error!(class = %err.class(), "Failed to {action}: {status} - {message}");
        }
        PruneError::Connection { .. } => {
            error!(class = %err.class(), "Connection error while trying to {action}: {err}");
        }
        _ => error!(class = %err.class(), "Failed to {action}: {err}"),
    }
}

/// Client for the relationship endpoints.
pub struct DiscordClient<T = ReqwestTransport> {
    transport: T,
    gate: Arc<Semaphore>,
    cache: Option<CacheStore>,
    mode: DeleteMode,
    date_format: String,
    me: OnceCell<Account>,
}

impl<T: HttpTransport> DiscordClient<T> {
    /// Creates a client that deletes through `gate`.
    pub fn new(transport: T, gate: Arc<Semaphore>) -> Self {
        Self {
            transport,
            gate,
            cache: None,
            mode: DeleteMode::Live,
            date_format: relprune_config::DEFAULT_DATE_FORMAT.to_string(),
            me: OnceCell::new(),
        }
    }

    /// Creates a client with gate, cache, delete mode, and date format taken
    /// from `config`.
    pub fn from_config(transport: T, config: &Config) -> Self {
        let mut client = Self::new(
            transport,
            Arc::new(Semaphore::new(config.purge.concurrency_limit)),
        )
        .with_date_format(config.display.date_format.clone());

        if config.cache.enabled {
            client = client.with_cache(CacheStore::new(&config.cache.path));
        }
        if config.purge.dry_run {
            client = client.with_mode(DeleteMode::DryRun {
                delay: Duration::from_millis(config.purge.dry_run_delay_ms),
            });
        }
        client
    }

    /// Write fetched lists to `cache` when asked to.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the delete mode.
    #[must_use]
    pub fn with_mode(mut self, mode: DeleteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the strftime pattern used in deletion logs.
    #[must_use]
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// The shared concurrency gate.
    pub const fn gate(&self) -> &Arc<Semaphore> {
        &self.gate
    }

    /// The configured cache store, if any.
    pub const fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    /// The delete mode.
    pub const fn mode(&self) -> DeleteMode {
        self.mode
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The cached profile, if one has been fetched.
    pub fn me(&self) -> Option<&Account> {
        self.me.get()
    }

    /// Whether the token can fetch a profile. Never fails.
    pub async fn validate_token(&self) -> bool {
        self.fetch_profile().await.is_some()
    }

    /// Fetches the profile once and caches it.
    ///
    /// A failed fetch leaves the cache empty so the next call tries again.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) -> Option<&Account> {
        let result = self
            .me
            .get_or_try_init(|| async {
                let value = self.transport.get_json(endpoints::ME).await?;
                Account::from_value(&value)
            })
            .await;

        match result {
            Ok(account) => Some(account),
            Err(e) => {
                log_failure("get user data", &e);
                None
            }
        }
    }

    /// Fetches the relationship list.
    ///
    /// Entries that cannot be parsed are logged and skipped. With
    /// `persist_to_cache`, the raw list is written to the cache store (if one
    /// is configured) before parsing.
    #[instrument(skip(self))]
    pub async fn list_relationships(&self, persist_to_cache: bool) -> Result<Vec<Relationship>> {
        debug!("Fetching data from Discord");
        let payload = self.transport.get_json(endpoints::RELATIONSHIPS).await?;
        let Value::Array(entries) = payload else {
            return Err(PruneError::payload("relationship list is not an array"));
        };

        if persist_to_cache {
            if let Some(cache) = &self.cache {
                cache.save(&entries).await?;
            }
        }

        let relationships: Vec<Relationship> = entries
            .iter()
            .filter_map(|entry| match Relationship::from_value(entry) {
                Ok(rel) => Some(rel),
                Err(e) => {
                    error!("Failed to parse relationship: {e}");
                    None
                }
            })
            .collect();

        info!(
            fetched = entries.len(),
            parsed = relationships.len(),
            "Fetched relationships"
        );
        Ok(relationships)
    }

    /// Deletes one relationship. Returns `true` only on confirmed success.
    ///
    /// Holds one gate permit for the duration of the request.
    pub async fn delete_relationship<'a>(&self, target: impl Into<DeleteTarget<'a>>) -> bool {
        let target = target.into();
        let id = target.id();

        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("Concurrency gate closed, cannot delete user {id}: {e}");
                return false;
            }
        };

        let outcome = match self.mode {
            DeleteMode::Live => self.transport.delete(&endpoints::relationship(id)).await,
            DeleteMode::DryRun { delay } => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {
                let suffix = if matches!(self.mode, DeleteMode::DryRun { .. }) {
                    " (dry run)"
                } else {
                    ""
                };
                debug!("{} Deleted!{suffix}", target.describe(&self.date_format));
                true
            }
            Err(e) => {
                log_failure(&format!("delete user {id}"), &e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFailure, FakeTransport};
    use futures::future::join_all;
    use relprune_common::test_utils::{
        account_fixtures, create_temp_dir, init_test_logging, relationship_fixtures,
    };
    use serde_json::json;
    use tokio::time::timeout;

    fn client(transport: FakeTransport, limit: usize) -> DiscordClient<FakeTransport> {
        init_test_logging();
        DiscordClient::new(transport, Arc::new(Semaphore::new(limit)))
    }

    #[tokio::test]
    async fn test_validate_token_caches_profile() {
        let client = client(FakeTransport::new().with_profile(account_fixtures::me()), 1);

        assert!(client.me().is_none());
        assert!(client.validate_token().await);
        assert!(client.validate_token().await);
        assert_eq!(client.me().map(|a| a.username.as_str()), Some("usrn"));
        assert_eq!(client.transport().get_calls(endpoints::ME), 1);
    }

    #[tokio::test]
    async fn test_invalid_token_is_false_and_retried() {
        let client = client(
            FakeTransport::new().with_profile_failure(FakeFailure::Status(401)),
            1,
        );

        assert!(!client.validate_token().await);
        assert!(client.me().is_none());
        assert!(!client.validate_token().await);
        assert_eq!(client.transport().get_calls(endpoints::ME), 2);
    }

    #[tokio::test]
    async fn test_profile_connection_error_is_absorbed() {
        let client = client(
            FakeTransport::new().with_profile_failure(FakeFailure::Connection),
            1,
        );
        assert!(client.fetch_profile().await.is_none());
    }

    #[tokio::test]
    async fn test_profile_with_wrong_shape_is_absorbed() {
        let client = client(FakeTransport::new().with_profile(json!("nope")), 1);
        assert!(!client.validate_token().await);
    }

    #[tokio::test]
    async fn test_list_skips_unparseable_entries() {
        let client = client(
            FakeTransport::new().with_relationships(vec![
                relationship_fixtures::friend(1, "a", None),
                json!(17),
                relationship_fixtures::blocked(2, "b"),
            ]),
            1,
        );

        let list = client.list_relationships(false).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].is_friend());
        assert!(list[1].is_blocked());
    }

    #[tokio::test]
    async fn test_list_status_error_propagates() {
        let client = client(
            FakeTransport::new().with_relationships_failure(FakeFailure::Status(500)),
            1,
        );
        let err = client.list_relationships(false).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_list_non_array_is_error() {
        let transport = FakeTransport::new().with_get(endpoints::RELATIONSHIPS, json!({"a": 1}));
        let err = client(transport, 1).list_relationships(false).await.unwrap_err();
        assert!(matches!(err, PruneError::Payload(_)));
    }

    #[tokio::test]
    async fn test_list_persists_raw_payload() {
        let dir = create_temp_dir();
        let store = CacheStore::new(dir.path().join("cache.json"));
        let raw = vec![relationship_fixtures::friend(1, "a", None), json!("garbage")];
        let client = client(FakeTransport::new().with_relationships(raw.clone()), 1)
            .with_cache(store.clone());

        let list = client.list_relationships(true).await.unwrap();
        assert_eq!(list.len(), 1);

        let snapshot = store.load().await.unwrap().unwrap();
        assert_eq!(snapshot.friends, raw);
        assert_eq!(snapshot.total_friends, 2);
    }

    #[tokio::test]
    async fn test_list_without_persist_leaves_cache_alone() {
        let dir = create_temp_dir();
        let store = CacheStore::new(dir.path().join("cache.json"));
        let client = client(
            FakeTransport::new().with_relationships(relationship_fixtures::friends(3)),
            1,
        )
        .with_cache(store.clone());

        client.list_relationships(false).await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_success_and_status_failure() {
        let client = client(
            FakeTransport::new().fail_delete(RelationshipId(2), FakeFailure::Status(404)),
            2,
        );

        assert!(client.delete_relationship(RelationshipId(1)).await);
        assert!(!client.delete_relationship(2u64).await);
        assert_eq!(client.transport().deleted_ids(), vec![RelationshipId(1)]);
        assert_eq!(client.gate().available_permits(), 2);
    }

    #[tokio::test]
    async fn test_delete_accepts_records() {
        let rel = Relationship::from_value(&relationship_fixtures::friend(77, "z", None)).unwrap();
        let client = client(FakeTransport::new(), 1);
        assert!(client.delete_relationship(&rel).await);
        assert_eq!(client.transport().deleted_ids(), vec![RelationshipId(77)]);
    }

    #[tokio::test]
    async fn test_connection_failure_releases_permit() {
        let client = client(
            FakeTransport::new().fail_delete(RelationshipId(1), FakeFailure::Connection),
            1,
        );

        assert!(!client.delete_relationship(RelationshipId(1)).await);
        let second = timeout(
            Duration::from_secs(1),
            client.delete_relationship(RelationshipId(2)),
        )
        .await
        .expect("gate permit was not released");
        assert!(second);
    }

    #[tokio::test]
    async fn test_unknown_failure_is_false() {
        let client = client(
            FakeTransport::new().fail_delete(RelationshipId(3), FakeFailure::Unknown),
            1,
        );
        assert!(!client.delete_relationship(RelationshipId(3)).await);
    }

    #[tokio::test]
    async fn test_gate_bounds_in_flight_deletions() {
        let limit = 3;
        let client = client(
            FakeTransport::new().with_delete_latency(Duration::from_millis(20)),
            limit,
        );

        let ids: Vec<u64> = (1..=20).collect();
        let results = join_all(ids.iter().map(|id| client.delete_relationship(*id))).await;

        assert!(results.iter().all(|ok| *ok));
        assert_eq!(client.transport().delete_calls(), 20);
        assert!(client.transport().peak_in_flight() <= limit);
        assert_eq!(client.transport().peak_in_flight(), limit);
        assert_eq!(client.gate().available_permits(), limit);
    }

    #[tokio::test]
    async fn test_closed_gate_refuses_deletions() {
        let client = client(FakeTransport::new(), 1);
        client.gate().close();
        assert!(!client.delete_relationship(RelationshipId(1)).await);
        assert_eq!(client.transport().delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_never_calls_delete() {
        let client = client(FakeTransport::new(), 2).with_mode(DeleteMode::DryRun {
            delay: Duration::from_millis(1),
        });
        assert!(client.delete_relationship(RelationshipId(5)).await);
        assert_eq!(client.transport().delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_from_config() {
        let dir = create_temp_dir();
        let mut config = Config::default();
        config.discord.token = "t".to_string();
        config.purge.concurrency_limit = 7;
        config.purge.dry_run = true;
        config.purge.dry_run_delay_ms = 5;
        config.cache.path = dir.path().join("c.json");

        let client = DiscordClient::from_config(FakeTransport::new(), &config);
        assert_eq!(client.gate().available_permits(), 7);
        assert_eq!(
            client.mode(),
            DeleteMode::DryRun {
                delay: Duration::from_millis(5)
            }
        );
        assert_eq!(client.cache().map(CacheStore::path), Some(config.cache.path.as_path()));

        config.cache.enabled = false;
        config.purge.dry_run = false;
        let client = DiscordClient::from_config(FakeTransport::new(), &config);
        assert!(client.cache().is_none());
        assert_eq!(client.mode(), DeleteMode::Live);
    }
}
