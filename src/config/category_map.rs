//! Source-to-destination category mapping
//!
//! Maps YNAB category ids to Splitwise category ids. Loaded once from
//! `category-map.json` and handed to the materializer; an unmapped category
//! is not an error.
//!
//! ```json
//! {
//!   "139acc44-1191-4c55-9768-b3a859bbf9a6": 12,
//!   "351520fd-4d45-4453-ae16-ad5571b59221": 13
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SyncError;
use crate::models::CategoryId;
use crate::storage::file_io::read_json;

/// Mapping from source category id to destination category id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap(BTreeMap<CategoryId, u32>);

impl CategoryMap {
    /// Load the mapping from a JSON file, empty if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        read_json(path)
    }

    /// Destination category for a source category
    pub fn lookup(&self, source: &CategoryId) -> Option<u32> {
        self.0.get(source).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CategoryId, u32)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (CategoryId, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
