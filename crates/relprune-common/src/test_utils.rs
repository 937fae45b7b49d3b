//! Test utilities and shared test helpers for relprune.
//!
//! Fixtures here produce raw API payloads shaped like the ones Discord returns,
//! so parsing and orchestration can be tested without a network.

use serde_json::{json, Value};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Raw relationship payloads.
pub mod relationship_fixtures {
    use super::{json, Value};

    /// Build a relationship payload with the given kind code and identity.
    pub fn relationship(id: u64, kind: i64, username: &str, global_name: Option<&str>) -> Value {
        json!({
            "id": id.to_string(),
            "type": kind,
            "nickname": null,
            "since": "2024-05-14T07:35:43.175000+00:00",
            "user": {
                "id": id.to_string(),
                "username": username,
                "global_name": global_name,
                "avatar": "f6de16f258638fb0d242b52c6e911111",
                "public_flags": 0,
                "clan": null
            }
        })
    }

    /// A friend (kind 1).
    pub fn friend(id: u64, username: &str, global_name: Option<&str>) -> Value {
        relationship(id, 1, username, global_name)
    }

    /// A blocked user (kind 2).
    pub fn blocked(id: u64, username: &str) -> Value {
        relationship(id, 2, username, None)
    }

    /// `count` friends named `friend_<n>`, ids starting at 1000.
    pub fn friends(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                let name = format!("friend_{i}");
                friend(1000 + i as u64, &name, Some(&name.to_uppercase()))
            })
            .collect()
    }
}

/// Raw profile payloads.
pub mod account_fixtures {
    use super::{json, Value};

    /// A fully populated `/users/@me` payload.
    pub fn me() -> Value {
        json!({
            "id": "678186189538451111",
            "username": "usrn",
            "avatar": "f6de16f258638fb0d242b52c6e911111",
            "discriminator": "0",
            "public_flags": 128,
            "flags": 128,
            "banner": "a_e6722b00420c232eba70f9290e00bfd5",
            "accent_color": 3_830_189,
            "global_name": "MyName",
            "avatar_decoration_data": null,
            "banner_color": "#3a71ad",
            "clan": null,
            "mfa_enabled": true,
            "locale": "en-US",
            "premium_type": 2,
            "email": "someone@example.com",
            "verified": true,
            "phone": null,
            "nsfw_allowed": true,
            "premium_usage_flags": 4,
            "linked_users": [],
            "purchased_flags": 2,
            "bio": "hello",
            "authenticator_types": [2]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        // Should not panic when called multiple times
        init_test_logging();
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_friend_fixture_shape() {
        let value = relationship_fixtures::friend(7, "alice", Some("Alice"));
        assert_eq!(value["id"], "7");
        assert_eq!(value["type"], 1);
        assert_eq!(value["user"]["username"], "alice");
        assert_eq!(value["user"]["global_name"], "Alice");
    }

    #[test]
    fn test_friends_fixture_count() {
        let values = relationship_fixtures::friends(5);
        assert_eq!(values.len(), 5);
        assert_eq!(values[4]["user"]["username"], "friend_4");
    }
}
