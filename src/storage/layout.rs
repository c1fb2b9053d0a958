use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

/// Directory structure under the data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    pub base_dir: PathBuf,     // Root directory
    pub quizzes_dir: PathBuf,  // One <id>.json per collection
    pub index_dir: PathBuf,    // Persisted summary index
}

impl DataLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        DataLayout {
            quizzes_dir: base_dir.join("quizzes"),
            index_dir: base_dir.join("index"),
            base_dir,
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.index_dir.join("ti_index.json")
    }

    /// Path of the collection file for `id`. Ids that would escape the
    /// quizzes directory are reported as unknown collections.
    pub fn collection_path(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_collection_id(id) {
            return Err(Error::not_found(format!("unknown collection: {}", id)));
        }
        Ok(self.quizzes_dir.join(format!("{}.json", id)))
    }
}

fn is_valid_collection_id(id: &str) -> bool {
    !id.is_empty()
        && !id.contains("..")
        && !id.contains(['/', '\\'])
        && !Path::new(id).is_absolute()
}

/// Collection id for a `<id>.json` file name.
pub fn collection_id_from_file(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(".json").filter(|id| !id.is_empty())
}
