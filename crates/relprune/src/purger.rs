//! One purge run: validate, list, filter, delete, summarize.

use crate::allow_list::AllowList;
use crate::error::{AppError, AppResult};
use futures::future::join_all;
use relprune_api::{DeleteMode, DiscordClient, HttpTransport, Relationship};
use relprune_common::mask_secret;
use relprune_config::Config;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PurgeSummary {
    /// Relationships in the fetched list.
    pub total: usize,
    /// Deletions attempted.
    pub attempted: usize,
    /// Deletions that succeeded.
    pub deleted: usize,
}

impl PurgeSummary {
    /// Tally deletion outcomes against a list of `total` relationships.
    pub fn from_results(total: usize, results: &[bool]) -> Self {
        Self {
            total,
            attempted: results.len(),
            deleted: results.iter().filter(|ok| **ok).count(),
        }
    }

    /// Deletions that were attempted but did not succeed.
    pub const fn failed(&self) -> usize {
        self.attempted - self.deleted
    }

    /// Relationships left after the run.
    pub const fn remaining(&self) -> usize {
        self.total - self.deleted
    }
}

impl fmt::Display for PurgeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deleted {} of {} friends ({} attempted, {} failed). {} remain.",
            self.deleted,
            self.total,
            self.attempted,
            self.failed(),
            self.remaining()
        )
    }
}

/// Friends not covered by the allow-list, in list order.
pub fn select_for_deletion<'a>(
    relationships: &'a [Relationship],
    allow_list: &AllowList,
) -> Vec<&'a Relationship> {
    relationships
        .iter()
        .filter(|rel| rel.is_friend() && !allow_list.exempts(rel))
        .collect()
}

/// Drives a single run against a [`DiscordClient`].
pub struct Purger<T> {
    client: DiscordClient<T>,
    allow_list: AllowList,
    token_preview: String,
}

impl<T: HttpTransport> Purger<T> {
    /// Creates a purger using the allow-list and token from `config`.
    pub fn new(client: DiscordClient<T>, config: &Config) -> Self {
        Self {
            client,
            allow_list: config.purge.allow_list.iter().cloned().collect(),
            token_preview: mask_secret(&config.discord.token, 5),
        }
    }

    /// The underlying client.
    pub const fn client(&self) -> &DiscordClient<T> {
        &self.client
    }

    /// The active allow-list.
    pub const fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Runs the purge.
    ///
    /// Fails with [`AppError::InvalidToken`] before touching the list or the
    /// cache if the token is rejected, and with [`AppError::Api`] if the list
    /// cannot be fetched. Individual deletion failures only show up in the
    /// summary.
    #[instrument(skip(self))]
    pub async fn run(&self) -> AppResult<PurgeSummary> {
        debug!("Token: {}", self.token_preview);
        info!("Allow-list: {}", self.allow_list);
        if let DeleteMode::DryRun { delay } = self.client.mode() {
            warn!("Dry run: nothing will be deleted (simulated delay {delay:?})");
        }

        if !self.client.validate_token().await {
            return Err(AppError::InvalidToken);
        }
        if let Some(me) = self.client.me() {
            info!("Your account: {me}");
            debug!("\n{}", me.summary());
        }

        self.log_previous_snapshot().await;

        let relationships = self.client.list_relationships(true).await?;
        let targets = select_for_deletion(&relationships, &self.allow_list);
        info!(
            "You have {} friends in total! Friends to delete: {}",
            relationships.len(),
            targets.len()
        );

        let results = join_all(
            targets
                .iter()
                .map(|rel| self.client.delete_relationship(*rel)),
        )
        .await;

        let summary = PurgeSummary::from_results(relationships.len(), &results);
        info!("Deleted {} friends out of {}.", summary.deleted, summary.total);
        if summary.failed() > 0 {
            warn!("{} deletions failed", summary.failed());
        }
        info!("{} friends remain.", summary.remaining());
        Ok(summary)
    }

    async fn log_previous_snapshot(&self) {
        let Some(cache) = self.client.cache() else {
            return;
        };
        match cache.load().await {
            Ok(Some(snapshot)) => info!(
                "Previous snapshot from {} had {} relationships",
                snapshot.date, snapshot.total_friends
            ),
            Ok(None) => debug!("No previous snapshot at {}", cache.path().display()),
            Err(e) => warn!("Could not read previous snapshot: {e}"),
        }
    }
}
