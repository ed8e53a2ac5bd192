use std::fmt;

use serde::{Deserialize, Serialize};

use super::Platform;

/// Stable local identifier of a link entry.
///
/// Assigned once when the entry is created and never derived from its
/// position. Ids never leave the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub(crate) u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One editable row of the link collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub id: EntryId,
    pub platform: Option<Platform>,
    pub url: String,
}

impl LinkEntry {
    pub(crate) fn empty(id: EntryId) -> Self {
        Self {
            id,
            platform: None,
            url: String::new(),
        }
    }

    /// The url input is only editable once a platform has been chosen.
    pub fn url_enabled(&self) -> bool {
        self.platform.is_some()
    }
}

/// A link as exchanged with the persistence layer: platform label plus url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLink {
    pub platform: String,
    pub link: String,
}

impl StoredLink {
    pub fn new(platform: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            link: link.into(),
        }
    }
}
