//! In-memory memo of fetched sequences.
//!
//! Entries are never evicted. That is fine for a handful of user-selected
//! genes, but the map grows without bound if fed a large catalogue.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Body of a sequence lookup, as returned by the Ensembl REST API
/// (`/sequence/id/{id}?content-type=application/json`). Extra fields are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub seq: String,
    #[serde(default)]
    pub desc: String,
}

impl SequenceRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Default)]
pub struct SequenceCache {
    entries: HashMap<String, SequenceRecord>,
}

impl SequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&SequenceRecord> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Store `record` under `id`, replacing any earlier entry.
    pub fn insert(&mut self, id: impl Into<String>, record: SequenceRecord) {
        self.entries.insert(id.into(), record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
