//! Tags and the planning half of tag sync.
//!
//! Syncing a post's tags happens in two steps: work out which requested names
//! have no row yet ([`missing_tag_names`]), then reconcile the post's links
//! against the full set of wanted tag ids ([`LinkDiff::between`]). Both steps
//! are pure so the repository only has to run the statements they describe.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new, not yet persisted tag. The id is assigned by the database.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }
}

/// Trims names, drops blanks and duplicates. First occurrence wins the order.
pub fn normalize_tag_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter_map(|name| {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Requested names that have no matching row in `existing`, in request order.
pub fn missing_tag_names(requested: &[String], existing: &[Tag]) -> Vec<String> {
    let known: HashSet<&str> = existing.iter().map(|t| t.name.as_str()).collect();
    requested
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Link changes needed to move a post from its current tag ids to the desired ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDiff {
    pub attach: Vec<i32>,
    pub detach: Vec<i32>,
}

impl LinkDiff {
    pub fn between(current: &[i32], desired: &[i32]) -> Self {
        let current_set: HashSet<i32> = current.iter().copied().collect();
        let desired_set: HashSet<i32> = desired.iter().copied().collect();

        let mut attach: Vec<i32> = desired_set.difference(&current_set).copied().collect();
        let mut detach: Vec<i32> = current_set.difference(&desired_set).copied().collect();
        attach.sort_unstable();
        detach.sort_unstable();

        Self { attach, detach }
    }

    pub fn is_empty(&self) -> bool {
        self.attach.is_empty() && self.detach.is_empty()
    }
}
