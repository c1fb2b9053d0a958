use std::collections::HashMap;
use std::ops::Range;

use crate::core::error::Result;
use crate::storage::image_catalog::{DatasetStructure, ImageCatalog, ImageRecord};

/// All images in declared order, with id and per-subcategory lookups.
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    pub records: Vec<ImageRecord>,
    positions: HashMap<String, usize>,
    spans: HashMap<String, Range<usize>>,
}

impl ImageIndex {
    pub fn build(catalog: &ImageCatalog, structure: &DatasetStructure) -> Result<Self> {
        let capacity = usize::try_from(structure.stats.total_images).unwrap_or(0);
        let mut records = Vec::with_capacity(capacity);
        let mut spans = HashMap::new();

        for category in &structure.categories {
            for sub in &category.subcategories {
                let start = records.len();
                records.extend(catalog.load_subcategory(structure, &sub.id)?);
                spans.insert(sub.id.clone(), start..records.len());
            }
        }

        let positions = records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id.clone(), pos))
            .collect();

        Ok(ImageIndex { records, positions, spans })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Records of one subcategory in positional order.
    pub fn subcategory(&self, id: &str) -> Option<&[ImageRecord]> {
        self.spans.get(id).map(|span| &self.records[span.clone()])
    }

    pub fn subcategory_span(&self, id: &str) -> Option<Range<usize>> {
        self.spans.get(id).cloned()
    }

    pub fn category(&self, id: &str) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter().filter(move |r| r.category_id == id)
    }
}
