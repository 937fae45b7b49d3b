//! Identities exempt from deletion.

use relprune_api::Relationship;
use std::collections::BTreeSet;
use std::fmt;

/// Usernames and display names that must never be deleted.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    /// Builds a list, ignoring blank entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        entries.into_iter().collect()
    }

    /// Exact, case-sensitive lookup.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// True if either the username or the display name is listed.
    pub fn exempts(&self, relationship: &Relationship) -> bool {
        self.contains(relationship.username())
            || relationship.global_name().is_some_and(|name| self.contains(name))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is exempt.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .filter(|entry: &String| !entry.is_empty())
                .collect(),
        )
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(entry)?;
            first = false;
        }
        Ok(())
    }
}
