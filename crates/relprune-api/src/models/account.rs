//! The authenticated account from `GET /users/@me`.

use super::{bool_field, opaque_field, string_field, u64_field};
use relprune_common::{PruneError, Result};
use serde_json::Value;
use std::fmt;

/// Subscription tier of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PremiumTier {
    /// No subscription, or an unrecognized code.
    #[default]
    None,
    /// Legacy tier.
    Classic,
    /// Full tier.
    Full,
    /// Basic tier.
    Basic,
}

impl PremiumTier {
    /// Map a raw `premium_type` code; unrecognized codes become `None`.
    pub const fn from_code(code: u64) -> Self {
        match code {
            1 => Self::Classic,
            2 => Self::Full,
            3 => Self::Basic,
            _ => Self::None,
        }
    }

    /// Badge shown next to the account name.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Classic => "🌟",
            Self::Full => "💎",
            Self::Basic => "🚀",
        }
    }

    /// Human-readable tier name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Classic => "Nitro Classic",
            Self::Full => "Nitro",
            Self::Basic => "Nitro Basic",
        }
    }
}

/// Profile of the token's owner.
///
/// Fields the tool never inspects are carried through as received.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Account {
    /// Snowflake id, as sent.
    pub id: String,
    /// Unique handle.
    pub username: String,
    /// Display name.
    pub global_name: Option<String>,
    /// Legacy four-digit tag.
    pub discriminator: Option<String>,
    /// Private account flags.
    pub flags: u64,
    /// Publicly visible flags.
    pub public_flags: u64,
    /// Subscription tier.
    pub premium_tier: PremiumTier,
    /// Subscription usage flags.
    pub premium_usage_flags: u64,
    /// Purchased subscription flags.
    pub purchased_flags: u64,
    /// Email verified.
    pub verified: bool,
    /// Two-factor authentication enabled.
    pub mfa_enabled: bool,
    /// Age-restricted content allowed.
    pub nsfw_allowed: bool,
    /// Avatar hash.
    pub avatar: Option<String>,
    /// Banner hash.
    pub banner: Option<String>,
    /// Profile accent colour as an RGB integer.
    pub accent_color: Option<u64>,
    /// Banner colour as a hex string.
    pub banner_color: Option<String>,
    /// Avatar decoration, untouched.
    pub avatar_decoration_data: Option<Value>,
    /// Clan tag, untouched.
    pub clan: Option<Value>,
    /// About-me text.
    pub bio: Option<String>,
    /// Client locale.
    pub locale: Option<String>,
    /// Account email.
    pub email: Option<String>,
    /// Account phone number.
    pub phone: Option<String>,
    /// Linked accounts, untouched.
    pub linked_users: Vec<Value>,
    /// Enrolled authenticator type codes.
    pub authenticator_types: Vec<u64>,
}

impl Account {
    /// Build an account from the profile payload.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| PruneError::payload("profile payload is not an object"))?;

        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Ok(Self {
            id,
            username: string_field(obj, "username").unwrap_or_default(),
            global_name: string_field(obj, "global_name"),
            discriminator: string_field(obj, "discriminator"),
            flags: u64_field(obj, "flags"),
            public_flags: u64_field(obj, "public_flags"),
            premium_tier: PremiumTier::from_code(u64_field(obj, "premium_type")),
            premium_usage_flags: u64_field(obj, "premium_usage_flags"),
            purchased_flags: u64_field(obj, "purchased_flags"),
            verified: bool_field(obj, "verified"),
            mfa_enabled: bool_field(obj, "mfa_enabled"),
            nsfw_allowed: bool_field(obj, "nsfw_allowed"),
            avatar: string_field(obj, "avatar"),
            banner: string_field(obj, "banner"),
            accent_color: obj.get("accent_color").and_then(Value::as_u64),
            banner_color: string_field(obj, "banner_color"),
            avatar_decoration_data: opaque_field(obj, "avatar_decoration_data"),
            clan: opaque_field(obj, "clan"),
            bio: string_field(obj, "bio"),
            locale: string_field(obj, "locale"),
            email: string_field(obj, "email"),
            phone: string_field(obj, "phone"),
            linked_users: obj
                .get("linked_users")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            authenticator_types: obj
                .get("authenticator_types")
                .and_then(Value::as_array)
                .map(|types| types.iter().filter_map(Value::as_u64).collect())
                .unwrap_or_default(),
        })
    }

    /// Display name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// Multi-line overview of the account.
    pub fn summary(&self) -> String {
        let mfa = if self.mfa_enabled { "🔒" } else { "🔓" };
        let verified = if self.verified { "✅" } else { "❌" };
        format!(
            "{} ({})\n{} Premium: {}\n🔑 MFA: {}\n✅ Verified: {}",
            self.display_name(),
            self.username,
            self.premium_tier.glyph(),
            self.premium_tier.label(),
            mfa,
            verified
        )
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.username)?;
        let glyph = self.premium_tier.glyph();
        if !glyph.is_empty() {
            write!(f, " {glyph}")?;
        }
        Ok(())
    }
}
