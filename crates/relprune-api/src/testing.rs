//! In-memory transport for tests.
//!
//! Serves canned GET payloads, injects failures per path, and records every
//! call along with the peak number of concurrent deletions.

use crate::transport::{endpoints, HttpTransport};
use async_trait::async_trait;
use relprune_common::{PruneError, RelationshipId, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A failure the fake should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    /// Non-2xx response with this status.
    Status(u16),
    /// Connection refused.
    Connection,
    /// Some other transport failure.
    Unknown,
}

impl FakeFailure {
    fn to_error(self) -> PruneError {
        match self {
            Self::Status(status) => PruneError::status(status, "simulated status"),
            Self::Connection => PruneError::connection("simulated connection refusal"),
            Self::Unknown => PruneError::network("simulated failure"),
        }
    }
}

/// HTTP method of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// DELETE
    Delete,
}

/// Scriptable [`HttpTransport`].
#[derive(Debug, Default)]
pub struct FakeTransport {
    gets: HashMap<String, std::result::Result<Value, FakeFailure>>,
    delete_failures: HashMap<String, FakeFailure>,
    delete_latency: Duration,
    calls: Mutex<Vec<(Method, String)>>,
    deleted: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeTransport {
    /// A transport with no canned responses; unknown GETs answer 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` for GET `path`.
    #[must_use]
    pub fn with_get(mut self, path: &str, value: Value) -> Self {
        self.gets.insert(path.to_string(), Ok(value));
        self
    }

    /// Serve `profile` for the profile endpoint.
    #[must_use]
    pub fn with_profile(self, profile: Value) -> Self {
        self.with_get(endpoints::ME, profile)
    }

    /// Fail the profile endpoint.
    #[must_use]
    pub fn with_profile_failure(mut self, failure: FakeFailure) -> Self {
        self.gets.insert(endpoints::ME.to_string(), Err(failure));
        self
    }

    /// Serve `entries` for the relationship list.
    #[must_use]
    pub fn with_relationships(self, entries: Vec<Value>) -> Self {
        self.with_get(endpoints::RELATIONSHIPS, Value::Array(entries))
    }

    /// Fail the relationship list.
    #[must_use]
    pub fn with_relationships_failure(mut self, failure: FakeFailure) -> Self {
        self.gets
            .insert(endpoints::RELATIONSHIPS.to_string(), Err(failure));
        self
    }

    /// Fail deletions of `id`.
    #[must_use]
    pub fn fail_delete(mut self, id: RelationshipId, failure: FakeFailure) -> Self {
        self.delete_failures
            .insert(endpoints::relationship(id), failure);
        self
    }

    /// Make every deletion take `latency`.
    #[must_use]
    pub fn with_delete_latency(mut self, latency: Duration) -> Self {
        self.delete_latency = latency;
        self
    }

    fn record(&self, method: Method, path: &str) {
        self.calls
            .lock()
            .expect("fake transport lock poisoned")
            .push((method, path.to_string()));
    }

    /// Number of GETs issued against `path`.
    pub fn get_calls(&self, path: &str) -> usize {
        self.calls
            .lock()
            .expect("fake transport lock poisoned")
            .iter()
            .filter(|(m, p)| *m == Method::Get && p == path)
            .count()
    }

    /// Number of DELETEs issued.
    pub fn delete_calls(&self) -> usize {
        self.calls
            .lock()
            .expect("fake transport lock poisoned")
            .iter()
            .filter(|(m, _)| *m == Method::Delete)
            .count()
    }

    /// Ids whose deletion succeeded, in completion order.
    pub fn deleted_ids(&self) -> Vec<RelationshipId> {
        self.deleted
            .lock()
            .expect("fake transport lock poisoned")
            .iter()
            .filter_map(|path| path.rsplit('/').next()?.parse().ok())
            .collect()
    }

    /// Highest number of deletions that were unresolved at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.record(Method::Get, path);
        match self.gets.get(path) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Err(PruneError::status(404, "Not Found")),
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.record(Method::Delete, path);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.delete_latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delete_latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(failure) = self.delete_failures.get(path) {
            return Err(failure.to_error());
        }
        self.deleted
            .lock()
            .expect("fake transport lock poisoned")
            .push(path.to_string());
        Ok(())
    }
}
