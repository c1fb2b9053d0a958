use std::sync::Arc;

use serde::Serialize;

use crate::core::error::{Error, Result};
use crate::core::types::QuizCollection;

/// Flattened, denormalized projection of one question across all collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalIndexEntry {
    pub global_id: String,
    pub collection_id: String,
    pub record_id: u64,
    pub primary_text: String,
    pub collection_title: String,
}

pub fn global_id(collection_id: &str, record_id: u64) -> String {
    format!("{}-{}", collection_id, record_id)
}

/// Split a composite `"{collectionId}-{recordId}"` at its last hyphen.
pub fn parse_global_id(id: &str) -> Result<(&str, u64)> {
    let (collection, record) = id
        .rsplit_once('-')
        .filter(|(collection, _)| !collection.is_empty())
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "invalid id format: {} (expected collectionId-recordId)",
                id
            ))
        })?;
    let record = record
        .parse::<u64>()
        .map_err(|_| Error::invalid_argument(format!("record id must be a number: {}", record)))?;
    Ok((collection, record))
}

/// Concatenate every collection's questions, preserving per-collection order.
pub fn build_global_index(collections: &[Arc<QuizCollection>]) -> Vec<GlobalIndexEntry> {
    let total = collections.iter().map(|c| c.len()).sum();
    let mut entries = Vec::with_capacity(total);
    for collection in collections {
        for question in &collection.questions {
            entries.push(GlobalIndexEntry {
                global_id: global_id(&collection.id, question.id),
                collection_id: collection.id.clone(),
                record_id: question.id,
                primary_text: question.question.clone(),
                collection_title: collection.title.clone(),
            });
        }
    }
    entries
}
