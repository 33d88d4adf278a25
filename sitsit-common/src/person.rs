//! Attendee record shared between ingestion, planning and reporting

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One attendee of the sitsit
///
/// `name` is the identity key within a run: equality, hashing and ordering
/// look at the name only. `group` is the free-text "who I want to sit with"
/// answer, `None` when the attendee left it blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, group: Option<String>) -> Self {
        Self {
            name: name.into(),
            group,
        }
    }

    /// Person with a stated group preference
    pub fn with_group(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::new(name, Some(group.into()))
    }

    /// Group text used for similarity comparison
    ///
    /// An absent group compares as the empty string.
    pub fn group_text(&self) -> &str {
        self.group.as_deref().unwrap_or("")
    }

    /// True when no preference was stated (absent or blank)
    pub fn has_no_preference(&self) -> bool {
        self.group_text().trim().is_empty()
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Person {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Person {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
