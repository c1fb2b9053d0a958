use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{CollectionFile, CollectionMeta, QuizCollection};
use crate::storage::layout::{DataLayout, collection_id_from_file};
use crate::storage::summary::{CollectionSummary, SummaryIndex};

/// Reads question collections and their summary index from the data root.
#[derive(Debug, Clone)]
pub struct QuizStore {
    layout: DataLayout,
}

impl QuizStore {
    pub fn new(layout: DataLayout) -> Self {
        QuizStore { layout }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Load one collection by id.
    ///
    /// Unknown ids (including a missing file) are `NotFound`; content that is
    /// not a well-formed record list, or repeats a question id, is `Parse`.
    pub async fn load_collection(&self, id: &str) -> Result<QuizCollection> {
        let path = self.layout.collection_path(id)?;
        let data = fs::read(&path).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::not_found(format!("unknown collection: {}", id)),
            _ => Error::new(ErrorKind::Io, format!("{}: {}", path.display(), err)),
        })?;
        let file: CollectionFile = serde_json::from_slice(&data).map_err(|err| {
            Error::new(ErrorKind::Parse, format!("collection {}: {}", id, err))
        })?;
        if let Some(dup) = file.duplicate_id() {
            return Err(Error::new(
                ErrorKind::Parse,
                format!("collection {}: duplicate question id {}", id, dup),
            ));
        }
        let meta = file_meta(&path).await;

        debug!(collection = id, questions = file.questions.len(), "loaded collection");
        Ok(file.into_collection(id.to_string(), meta))
    }

    /// Summaries of every known collection.
    ///
    /// Reads the persisted index when present; otherwise scans the quizzes
    /// directory and writes the result back. The write is best-effort.
    pub async fn load_summaries(&self) -> Result<SummaryIndex> {
        if let Some(index) = self.read_persisted().await {
            return Ok(index);
        }

        let index = self.scan().await?;
        info!(collections = index.total_collections, "regenerated summary index");
        if let Err(err) = self.persist(&index).await {
            warn!(error = %err, "failed to persist summary index");
        }
        Ok(index)
    }

    async fn read_persisted(&self) -> Option<SummaryIndex> {
        let path = self.layout.summary_path();
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "summary index unreadable, rescanning");
                return None;
            }
        };
        match serde_json::from_slice(&data) {
            Ok(index) => Some(index),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "summary index malformed, rescanning");
                None
            }
        }
    }

    /// Build summaries by parsing every `*.json` file in the quizzes directory.
    /// Malformed files are skipped.
    pub async fn scan(&self) -> Result<SummaryIndex> {
        let now = Utc::now();
        let mut summaries = Vec::new();

        let mut dir = match fs::read_dir(&self.layout.quizzes_dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SummaryIndex::from_summaries(summaries, now));
            }
            Err(err) => return Err(err.into()),
        };

        while let Some(entry) = dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(collection_id_from_file) else {
                continue;
            };
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match self.load_collection(id).await {
                Ok(collection) => summaries.push(summarize(&collection, now)),
                Err(err) => warn!(collection = id, error = %err, "skipping collection"),
            }
        }

        Ok(SummaryIndex::from_summaries(summaries, now))
    }

    pub async fn persist(&self, index: &SummaryIndex) -> Result<()> {
        fs::create_dir_all(&self.layout.index_dir).await?;
        let data = serde_json::to_vec_pretty(index)?;
        fs::write(self.layout.summary_path(), data).await?;
        Ok(())
    }
}

fn summarize(collection: &QuizCollection, now: DateTime<Utc>) -> CollectionSummary {
    CollectionSummary {
        source_id: collection.id.clone(),
        title: collection.title.clone(),
        description: collection.description.clone(),
        declared_total: collection.declared_total,
        questions_per_collection: collection.questions_per_collection,
        actual_count: collection.len() as u64,
        file_size: collection.meta.file_size,
        last_modified: collection.meta.last_modified,
        added_at: Some(now),
    }
}

async fn file_meta(path: &Path) -> CollectionMeta {
    match fs::metadata(path).await {
        Ok(meta) => CollectionMeta {
            file_size: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
        },
        Err(_) => CollectionMeta {
            file_size: 0,
            last_modified: None,
        },
    }
}
