//! Relationship records from `GET /users/@me/relationships`.

use super::{opaque_field, string_field, u64_field};
use chrono::{DateTime, FixedOffset};
use relprune_common::{format_timestamp, PruneError, RelationshipId, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Public-flags bit marking a bot account.
pub const BOT_FLAG: u64 = 1 << 16;

/// How the other account relates to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationshipKind {
    /// Any code the client does not recognize.
    #[default]
    Unknown,
    /// Mutual friends.
    Friend,
    /// Blocked by the caller.
    Blocked,
    /// Friend request received.
    IncomingRequest,
    /// Friend request sent.
    PendingRequest,
}

impl RelationshipKind {
    /// Map a raw `type` code; unrecognized codes become `Unknown`.
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Friend,
            2 => Self::Blocked,
            3 => Self::IncomingRequest,
            4 => Self::PendingRequest,
            _ => Self::Unknown,
        }
    }

    /// The raw code for this kind.
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Friend => 1,
            Self::Blocked => 2,
            Self::IncomingRequest => 3,
            Self::PendingRequest => 4,
        }
    }

    /// Status glyph shown next to the username.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Unknown => "❓",
            Self::Friend => "👫",
            Self::Blocked => "⛔",
            Self::IncomingRequest => "📨",
            Self::PendingRequest => "⏳",
        }
    }
}

/// The profile embedded in a relationship entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartialUser {
    /// Unique username. Empty when the payload omits it.
    pub username: String,
    /// Display name, if set.
    pub global_name: Option<String>,
    /// Avatar hash.
    pub avatar: Option<String>,
    /// Clan tag, kept raw.
    pub clan: Option<Value>,
    /// Public flags bitmask.
    pub public_flags: u64,
}

impl PartialUser {
    fn from_map(obj: &Map<String, Value>) -> Self {
        Self {
            username: string_field(obj, "username").unwrap_or_default(),
            global_name: string_field(obj, "global_name"),
            avatar: string_field(obj, "avatar"),
            clan: opaque_field(obj, "clan"),
            public_flags: u64_field(obj, "public_flags"),
        }
    }

    /// Whether the account is a bot.
    pub const fn is_bot(&self) -> bool {
        self.public_flags & BOT_FLAG != 0
    }
}

/// One entry of the caller's relationship list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Relationship {
    /// Id of the other account. Zero if the payload carried none.
    pub id: RelationshipId,
    /// Caller-assigned nickname.
    pub nickname: Option<String>,
    /// `since` exactly as received.
    pub since_raw: Option<String>,
    /// `since` parsed; `None` when absent or malformed.
    pub since: Option<DateTime<FixedOffset>>,
    /// Relationship kind.
    pub kind: RelationshipKind,
    /// The other account's profile.
    pub user: PartialUser,
}

impl Relationship {
    /// Build a record from one raw entry.
    ///
    /// Missing or mistyped fields fall back to defaults; only an entry that
    /// is not a JSON object is rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| PruneError::payload(format!("relationship entry is not an object: {value}")))?;

        let since_raw = string_field(obj, "since");
        let since = since_raw
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok());

        let user = obj
            .get("user")
            .and_then(Value::as_object)
            .map(PartialUser::from_map)
            .unwrap_or_default();

        Ok(Self {
            id: obj
                .get("id")
                .and_then(RelationshipId::from_json)
                .unwrap_or_default(),
            nickname: string_field(obj, "nickname"),
            since_raw,
            since,
            kind: obj
                .get("type")
                .and_then(Value::as_i64)
                .map_or(RelationshipKind::Unknown, RelationshipKind::from_code),
            user,
        })
    }

    /// Username of the other account.
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Display name of the other account.
    pub fn global_name(&self) -> Option<&str> {
        self.user.global_name.as_deref()
    }

    /// Kind glyph.
    pub const fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    /// Unrecognized kind code.
    pub const fn is_unknown(&self) -> bool {
        matches!(self.kind, RelationshipKind::Unknown)
    }

    /// Mutual friend.
    pub const fn is_friend(&self) -> bool {
        matches!(self.kind, RelationshipKind::Friend)
    }

    /// Blocked by the caller.
    pub const fn is_blocked(&self) -> bool {
        matches!(self.kind, RelationshipKind::Blocked)
    }

    /// Friend request received.
    pub const fn is_incoming(&self) -> bool {
        matches!(self.kind, RelationshipKind::IncomingRequest)
    }

    /// Friend request sent.
    pub const fn is_pending(&self) -> bool {
        matches!(self.kind, RelationshipKind::PendingRequest)
    }

    /// Bot account.
    pub const fn is_bot(&self) -> bool {
        self.user.is_bot()
    }

    /// `since` rendered with `pattern`, or `N/A`.
    pub fn pretty_since(&self, pattern: &str) -> String {
        self.since
            .as_ref()
            .map_or_else(|| "N/A".to_string(), |ts| format_timestamp(ts, pattern))
    }

    /// Longer form used in deletion logs.
    pub fn extended(&self) -> String {
        if self.is_bot() {
            format!("{} (🤖)", self.username())
        } else {
            format!(
                "{} {} \"{}\"",
                self.icon(),
                self.username(),
                self.global_name().unwrap_or("")
            )
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.username(), self.icon())
    }
}
