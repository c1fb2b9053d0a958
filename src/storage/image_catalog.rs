use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::error::{Error, Result};

/// Static description of the image dataset: categories -> subcategories -> counts.
const DATASET: &[(&str, &str, &[(&str, &str, u32)])] = &[
    ("cat", "Cat", &[
        ("cat_mixed", "Mixed Cat", 579),
        ("jiafei", "Garfield Cat", 255),
        ("jumao", "Orange Cat", 772),
        ("sanhua", "Calico Cat", 84),
    ]),
    ("dog", "Dog", &[
        ("dog_mixed", "Mixed Dog", 995),
        ("fadou", "French Bulldog", 590),
        ("hashiqi", "Husky", 890),
        ("jinmao", "Golden Retriever", 634),
        ("keji", "Corgi", 682),
        ("samoye", "Samoyed", 1139),
    ]),
    ("livestock", "Livestock", &[
        ("cattle", "Cattle", 369),
        ("horse", "Horse", 224),
    ]),
    ("man", "Human", &[
        ("blackman", "Black Person", 798),
        ("whiteman", "White Person", 745),
    ]),
    ("poultry", "Poultry", &[
        ("chicken", "Chicken", 367),
        ("goose", "Goose", 634),
    ]),
];

pub const THUMBNAIL_SUFFIX: &str = "?width=300";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<Subcategory>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total_categories: usize,
    pub total_subcategories: usize,
    pub total_images: u64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStructure {
    pub categories: Vec<Category>,
    pub stats: DatasetStats,
}

impl DatasetStructure {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// The subcategory with `id` and its parent category.
    pub fn subcategory(&self, id: &str) -> Option<(&Category, &Subcategory)> {
        self.categories.iter().find_map(|category| {
            category
                .subcategories
                .iter()
                .find(|sub| sub.id == id)
                .map(|sub| (category, sub))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrls {
    pub primary: String,
    pub cdn: String,
    pub thumbnail: String,
}

/// One synthesized image entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub id: String,
    pub subcategory_id: String,
    pub category_id: String,
    pub filename: String,
    pub name: String,
    pub subcategory_name: String,
    pub category_name: String,
    pub index: u32,
    pub urls: ImageUrls,
}

pub fn image_filename(subcategory_id: &str, position: u32) -> String {
    format!("{}_{}.jpg", subcategory_id, position)
}

/// Enumerates the image dataset from the static table. No I/O.
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    primary_base: String,
    cdn_base: String,
}

impl ImageCatalog {
    pub fn new(primary_base: impl Into<String>, cdn_base: impl Into<String>) -> Self {
        ImageCatalog {
            primary_base: primary_base.into().trim_end_matches('/').to_string(),
            cdn_base: cdn_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn structure(&self, now: DateTime<Utc>) -> DatasetStructure {
        let categories: Vec<Category> = DATASET
            .iter()
            .map(|(id, name, subs)| {
                let subcategories: Vec<Subcategory> = subs
                    .iter()
                    .map(|(sub_id, sub_name, count)| Subcategory {
                        id: sub_id.to_string(),
                        name: sub_name.to_string(),
                        count: *count,
                    })
                    .collect();
                Category {
                    id: id.to_string(),
                    name: name.to_string(),
                    total: subcategories.iter().map(|s| u64::from(s.count)).sum(),
                    subcategories,
                }
            })
            .collect();

        let stats = DatasetStats {
            total_categories: categories.len(),
            total_subcategories: categories.iter().map(|c| c.subcategories.len()).sum(),
            total_images: categories.iter().map(|c| c.total).sum(),
            last_updated: now,
        };

        DatasetStructure { categories, stats }
    }

    /// Records of one subcategory, positions `1..=count`. Unknown ids are `NotFound`.
    pub fn load_subcategory(
        &self,
        structure: &DatasetStructure,
        subcategory_id: &str,
    ) -> Result<Vec<ImageRecord>> {
        let (category, sub) = structure
            .subcategory(subcategory_id)
            .ok_or_else(|| Error::not_found(format!("subcategory not found: {}", subcategory_id)))?;
        Ok(self.enumerate(category, sub))
    }

    fn enumerate(&self, category: &Category, sub: &Subcategory) -> Vec<ImageRecord> {
        (1..=sub.count)
            .map(|position| self.record(category, sub, position))
            .collect()
    }

    fn record(&self, category: &Category, sub: &Subcategory, position: u32) -> ImageRecord {
        let filename = image_filename(&sub.id, position);
        let path = format!("{}/{}/{}", category.id, sub.id, filename);
        let cdn = format!("{}/{}", self.cdn_base, path);
        ImageRecord {
            id: format!("{}-{}", sub.id, position),
            subcategory_id: sub.id.clone(),
            category_id: category.id.clone(),
            name: format!("{} {}", sub.name, position),
            subcategory_name: sub.name.clone(),
            category_name: category.name.clone(),
            index: position,
            urls: ImageUrls {
                primary: format!("{}/{}", self.primary_base, path),
                thumbnail: format!("{}{}", cdn, THUMBNAIL_SUFFIX),
                cdn,
            },
            filename,
        }
    }
}
