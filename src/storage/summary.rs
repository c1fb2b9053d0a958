use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static metadata of one collection, as kept in the summary index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub source_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub declared_total: u64,
    #[serde(default)]
    pub questions_per_collection: u64,
    pub actual_count: u64,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Persisted cache of collection metadata (`index/ti_index.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryIndex {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub total_collections: usize,
    pub collections: Vec<CollectionSummary>,
}

impl SummaryIndex {
    /// Build an index from scanned summaries, ordered by case-insensitive title.
    pub fn from_summaries(mut collections: Vec<CollectionSummary>, now: DateTime<Utc>) -> Self {
        collections.sort_by_cached_key(|c| c.title.to_lowercase());
        SummaryIndex {
            created_at: now,
            last_updated: now,
            total_collections: collections.len(),
            collections,
        }
    }

    pub fn find(&self, source_id: &str) -> Option<&CollectionSummary> {
        self.collections.iter().find(|c| c.source_id == source_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.source_id.as_str())
    }
}
