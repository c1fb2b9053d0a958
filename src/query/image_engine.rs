use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::ttl::{CacheStats, Sweep, TtlCache};
use crate::core::clock::Clock;
use crate::core::error::{Error, Result};
use crate::index::image_index::ImageIndex;
use crate::index::structure::{GroupSummary, summarize_dataset};
use crate::query::page::{
    Navigation, Pagination, RangeInfo, SearchPage, normalize_query, paginate, slice_range,
    validate_range,
};
use crate::query::sampler::{resolve_count, sample_nonempty};
use crate::query::QueryLimits;
use crate::storage::image_catalog::{Category, DatasetStats, DatasetStructure, ImageCatalog, ImageRecord};

const STRUCTURE_KEY: &str = "structure";
const INDEX_KEY: &str = "images";

/// Exact-match filter. A subcategory takes precedence over a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

impl ImageFilter {
    pub fn matches(&self, record: &ImageRecord) -> bool {
        match (&self.subcategory, &self.category) {
            (Some(sub), _) => record.subcategory_id == *sub,
            (None, Some(category)) => record.category_id == *category,
            (None, None) => true,
        }
    }

    fn describe(&self) -> Option<String> {
        self.subcategory.clone().or_else(|| self.category.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ImageSearch {
    pub query: String,
    pub filter: ImageFilter,
    pub limit: usize,
    pub page: usize,
    pub use_cdn: bool,
}

impl ImageSearch {
    pub fn new(query: impl Into<String>) -> Self {
        ImageSearch {
            query: query.into(),
            filter: ImageFilter::default(),
            limit: 20,
            page: 1,
            use_cdn: true,
        }
    }
}

/// An image with its resolved display location.
#[derive(Debug, Clone, Serialize)]
pub struct ImageHit {
    #[serde(flatten)]
    pub record: ImageRecord,
    pub url: String,
    pub thumbnail: String,
}

impl ImageHit {
    fn new(record: &ImageRecord, use_cdn: bool) -> Self {
        ImageHit {
            url: if use_cdn { record.urls.cdn.clone() } else { record.urls.primary.clone() },
            thumbnail: record.urls.thumbnail.clone(),
            record: record.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSample {
    pub images: Vec<ImageHit>,
    pub count: usize,
    pub total_available: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub image: ImageHit,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageRange {
    pub subcategory: String,
    pub category: String,
    pub images: Vec<ImageHit>,
    pub range: RangeInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub categories: Vec<GroupSummary>,
    pub stats: DatasetStats,
}

/// Queries over the synthetic image dataset.
pub struct ImageEngine {
    catalog: ImageCatalog,
    limits: QueryLimits,
    clock: Arc<dyn Clock>,
    structure: Arc<TtlCache<&'static str, Arc<DatasetStructure>>>,
    index: Arc<TtlCache<&'static str, Arc<ImageIndex>>>,
}

impl ImageEngine {
    pub fn new(catalog: ImageCatalog, limits: QueryLimits, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        ImageEngine {
            catalog,
            limits,
            structure: Arc::new(TtlCache::with_clock("image_structure", ttl, clock.clone())),
            index: Arc::new(TtlCache::with_clock("image_index", ttl, clock.clone())),
            clock,
        }
    }

    pub fn structure(&self) -> Result<Arc<DatasetStructure>> {
        self.structure.get_or_build_sync(&STRUCTURE_KEY, || {
            let now = DateTime::<Utc>::from_timestamp_millis(self.clock.now_millis())
                .unwrap_or_else(Utc::now);
            Ok(Arc::new(self.catalog.structure(now)))
        })
    }

    pub fn index(&self) -> Result<Arc<ImageIndex>> {
        self.index.get_or_build_sync(&INDEX_KEY, || {
            let structure = self.structure()?;
            ImageIndex::build(&self.catalog, &structure).map(Arc::new)
        })
    }

    pub fn categories(&self) -> Result<CategoryListing> {
        let structure = self.structure()?;
        Ok(CategoryListing {
            categories: summarize_dataset(&structure).groups,
            stats: structure.stats.clone(),
        })
    }

    pub fn category(&self, id: &str) -> Result<Category> {
        self.structure()?
            .category(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("category not found: {}", id)))
    }

    pub fn random(&self, filter: &ImageFilter, count: usize, use_cdn: bool) -> Result<ImageSample> {
        let count = resolve_count(count, self.limits.max_sample)?;
        let index = self.index()?;
        let pool: Vec<&ImageRecord> = index.records.iter().filter(|r| filter.matches(r)).collect();
        let total_available = pool.len();
        let picked = sample_nonempty(pool, count, "images")?;

        Ok(ImageSample {
            count: picked.len(),
            images: picked.into_iter().map(|r| ImageHit::new(r, use_cdn)).collect(),
            total_available,
        })
    }

    /// Look up `"{subcategoryId}-{position}"` with navigation inside its subcategory.
    pub fn image(&self, id: &str, use_cdn: bool) -> Result<ImageView> {
        let index = self.index()?;
        let position = index
            .position(id)
            .ok_or_else(|| Error::not_found(format!("image not found: {}", id)))?;
        let record = &index.records[position];
        let span = index
            .subcategory_span(&record.subcategory_id)
            .ok_or_else(|| Error::not_found(format!("subcategory not found: {}", record.subcategory_id)))?;
        let siblings = &index.records[span.clone()];

        let navigation = Navigation::at(position - span.start, siblings.len(), |pos| siblings[pos].id.clone());
        Ok(ImageView {
            image: ImageHit::new(record, use_cdn),
            navigation,
        })
    }

    pub fn range(&self, subcategory_id: &str, start: i64, end: i64, use_cdn: bool) -> Result<ImageRange> {
        let (start, end) = validate_range(start, end, self.limits.max_range_window)?;
        let index = self.index()?;
        let records = index
            .subcategory(subcategory_id)
            .ok_or_else(|| Error::not_found(format!("subcategory not found: {}", subcategory_id)))?;
        let (slice, range) = slice_range(records, start, end)?;

        Ok(ImageRange {
            subcategory: records[0].subcategory_name.clone(),
            category: records[0].category_name.clone(),
            images: slice.iter().map(|r| ImageHit::new(r, use_cdn)).collect(),
            range,
        })
    }

    /// Substring match on image name, subcategory name or category name.
    pub fn search(&self, search: &ImageSearch) -> Result<SearchPage<ImageHit>> {
        let term = normalize_query(&search.query)?;
        let pagination = Pagination::new(search.page, search.limit, self.limits.max_search_limit)?;
        let index = self.index()?;

        let matches: Vec<&ImageRecord> = index
            .records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&term)
                    || r.subcategory_name.to_lowercase().contains(&term)
                    || r.category_name.to_lowercase().contains(&term)
            })
            .filter(|r| search.filter.matches(r))
            .collect();

        let (window, info) = paginate(&matches, pagination);
        Ok(SearchPage {
            query: search.query.clone(),
            results: window.iter().map(|r| ImageHit::new(r, search.use_cdn)).collect(),
            pagination: info,
            filter: search.filter.describe(),
        })
    }

    pub fn invalidate_all(&self) {
        self.structure.clear();
        self.index.clear();
    }

    pub fn caches(&self) -> Vec<Arc<dyn Sweep>> {
        vec![
            self.structure.clone() as Arc<dyn Sweep>,
            self.index.clone() as Arc<dyn Sweep>,
        ]
    }

    pub fn cache_stats(&self) -> Vec<CacheStats> {
        vec![self.structure.stats(), self.index.stats()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::config::Config;
    use crate::core::error::ErrorKind;
    use std::collections::HashSet;

    fn engine(clock: Arc<ManualClock>) -> ImageEngine {
        let config = Config::default();
        ImageEngine::new(
            ImageCatalog::new(&config.image_primary_base, &config.image_cdn_base),
            QueryLimits::for_images(&config),
            config.image_cache_ttl,
            clock,
        )
    }

    #[test]
    fn subcategory_filter_wins_over_category() {
        let engine = engine(Arc::new(ManualClock::new(0)));
        let filter = ImageFilter {
            category: Some("dog".into()),
            subcategory: Some("sanhua".into()),
        };
        let sample = engine.random(&filter, 20, true).unwrap();
        assert_eq!(sample.count, 20);
        assert_eq!(sample.total_available, 84);
        assert!(sample.images.iter().all(|img| img.record.subcategory_id == "sanhua"));
        let distinct: HashSet<_> = sample.images.iter().map(|img| &img.record.id).collect();
        assert_eq!(distinct.len(), 20);
    }

    #[test]
    fn random_count_is_capped() {
        let engine = engine(Arc::new(ManualClock::new(0)));
        let sample = engine.random(&ImageFilter::default(), 500, false).unwrap();
        assert_eq!(sample.count, 20);
        assert!(sample.images.iter().all(|img| img.url == img.record.urls.primary));
    }

    #[test]
    fn unknown_filter_is_empty_result() {
        let engine = engine(Arc::new(ManualClock::new(0)));
        let filter = ImageFilter { category: Some("dragon".into()), subcategory: None };
        assert_eq!(engine.random(&filter, 1, true).unwrap_err().kind, ErrorKind::EmptyResult);
    }

    #[test]
    fn navigation_stays_inside_subcategory() {
        let engine = engine(Arc::new(ManualClock::new(0)));
        let first = engine.image("jiafei-1", true).unwrap();
        assert_eq!(first.navigation.previous, None);
        assert_eq!(first.navigation.next.as_deref(), Some("jiafei-2"));
        assert_eq!(first.navigation.total, 255);

        let last = engine.image("jiafei-255", true).unwrap();
        assert_eq!(last.navigation.next, None);
        assert_eq!(last.navigation.previous.as_deref(), Some("jiafei-254"));

        assert_eq!(engine.image("jiafei-256", true).unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn range_within_subcategory() {
        let engine = engine(Arc::new(ManualClock::new(0)));
        let range = engine.range("sanhua", 80, 90, true).unwrap();
        assert_eq!(range.range.count, 4);
        assert!(!range.range.has_more);
        assert_eq!(range.images[0].record.id, "sanhua-81");
        assert_eq!(range.subcategory, "Calico Cat");

        assert_eq!(engine.range("nope", 0, 10, true).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(engine.range("sanhua", 0, 80, true).unwrap_err().kind, ErrorKind::InvalidRange);
    }

    #[test]
    fn search_matches_names_and_paginates() {
        let engine = engine(Arc::new(ManualClock::new(0)));
        let mut search = ImageSearch::new("CORGI");
        search.limit = 50;
        let page = engine.search(&search).unwrap();
        assert_eq!(page.pagination.total_results, 682);
        assert_eq!(page.pagination.total_pages, 14);
        assert!(page.pagination.has_next);

        search.filter.category = Some("cat".into());
        assert_eq!(engine.search(&search).unwrap().pagination.total_results, 0);
    }

    #[test]
    fn category_browsing() {
        let engine = engine(Arc::new(ManualClock::new(0)));
        let listing = engine.categories().unwrap();
        assert_eq!(listing.categories.len(), 5);
        assert_eq!(listing.stats.total_images, 9757);
        assert_eq!(engine.category("poultry").unwrap().subcategories.len(), 2);
        assert_eq!(engine.category("fish").unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn index_is_rebuilt_after_ttl() {
        let clock = Arc::new(ManualClock::new(0));
        let engine = engine(clock.clone());
        let first = engine.index().unwrap();
        clock.set(599_999);
        assert!(Arc::ptr_eq(&first, &engine.index().unwrap()));
        clock.set(600_000);
        assert!(!Arc::ptr_eq(&first, &engine.index().unwrap()));
        assert_eq!(engine.cache_stats()[1].build_count, 2);
    }
}
