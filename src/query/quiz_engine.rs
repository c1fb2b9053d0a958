use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::cache::ttl::{CacheStats, Sweep, TtlCache};
use crate::core::clock::Clock;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Question, QuizCollection};
use crate::index::global::{GlobalIndexEntry, build_global_index, global_id, parse_global_id};
use crate::index::structure::{StructuralSummary, summarize_collections};
use crate::query::page::{
    Navigation, Pagination, RangeInfo, SearchPage, normalize_query, paginate, slice_range,
    validate_range,
};
use crate::query::sampler::{resolve_count, sample_nonempty};
use crate::query::QueryLimits;
use crate::sanitize::public::{PublicQuestion, sanitize};
use crate::storage::quiz_store::QuizStore;
use crate::storage::summary::SummaryIndex;

const SUMMARY_KEY: &str = "summaries";
const GLOBAL_KEY: &str = "all";

#[derive(Debug, Clone)]
pub struct RandomQuery {
    pub source: Option<String>,
    pub count: usize,
    pub include_answers: bool,
}

impl Default for RandomQuery {
    fn default() -> Self {
        RandomQuery {
            source: None,
            count: 1,
            include_answers: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSearch {
    pub query: String,
    pub source: Option<String>,
    pub limit: usize,
    pub page: usize,
    pub include_answers: bool,
}

impl QuizSearch {
    pub fn new(query: impl Into<String>) -> Self {
        QuizSearch {
            query: query.into(),
            source: None,
            limit: 10,
            page: 1,
            include_answers: false,
        }
    }
}

/// A sanitized question with the collection it came from.
#[derive(Debug, Clone, Serialize)]
pub struct QuizHit {
    #[serde(flatten)]
    pub question: PublicQuestion,
    pub source: String,
    pub quiz_title: String,
    pub global_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomSample {
    pub questions: Vec<QuizHit>,
    pub count: usize,
    pub source: String,
    pub include_answers: bool,
    pub total_available: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question: QuizHit,
    pub quiz_description: String,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub total_questions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizRange {
    pub quiz: CollectionInfo,
    pub questions: Vec<QuizHit>,
    pub range: RangeInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizCatalog {
    pub index: SummaryIndex,
    pub stats: StructuralSummary,
}

/// Answers question queries over TTL-cached collections and the global index.
pub struct QuizEngine {
    store: QuizStore,
    limits: QueryLimits,
    summaries: Arc<TtlCache<&'static str, Arc<SummaryIndex>>>,
    collections: Arc<TtlCache<String, Arc<QuizCollection>>>,
    global: Arc<TtlCache<&'static str, Arc<Vec<GlobalIndexEntry>>>>,
}

impl QuizEngine {
    pub fn new(store: QuizStore, limits: QueryLimits, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        QuizEngine {
            store,
            limits,
            summaries: Arc::new(TtlCache::with_clock("quiz_summaries", ttl, clock.clone())),
            collections: Arc::new(TtlCache::with_clock("quiz_collections", ttl, clock.clone())),
            global: Arc::new(TtlCache::with_clock("quiz_global_index", ttl, clock)),
        }
    }

    pub async fn summaries(&self) -> Result<Arc<SummaryIndex>> {
        self.summaries
            .get_or_build(&SUMMARY_KEY, || async {
                self.store.load_summaries().await.map(Arc::new)
            })
            .await
    }

    pub async fn catalog(&self) -> Result<QuizCatalog> {
        let index = self.summaries().await?;
        let stats = summarize_collections(&index);
        Ok(QuizCatalog {
            index: SummaryIndex::clone(&index),
            stats,
        })
    }

    pub async fn collection(&self, id: &str) -> Result<Arc<QuizCollection>> {
        self.collections
            .get_or_build(&id.to_string(), || async {
                self.store.load_collection(id).await.map(Arc::new)
            })
            .await
    }

    /// Every question of every summarized collection, flattened.
    pub async fn global_index(&self) -> Result<Arc<Vec<GlobalIndexEntry>>> {
        self.global
            .get_or_build(&GLOBAL_KEY, || async {
                let summaries = self.summaries().await?;
                let mut collections = Vec::with_capacity(summaries.total_collections);
                for id in summaries.ids() {
                    collections.push(self.collection(id).await?);
                }
                let index = build_global_index(&collections);
                debug!(entries = index.len(), "built global question index");
                Ok(Arc::new(index))
            })
            .await
    }

    pub async fn random(&self, query: &RandomQuery) -> Result<RandomSample> {
        let count = resolve_count(query.count, self.limits.max_sample)?;

        let (questions, total_available) = match &query.source {
            Some(source) => {
                let collection = self.collection(source).await?;
                let picked = sample_nonempty(collection.questions.iter().collect(), count, "questions")?;
                let hits: Vec<QuizHit> = picked
                    .into_iter()
                    .map(|q| hit(&collection, q, query.include_answers))
                    .collect();
                (hits, collection.len())
            }
            None => {
                let index = self.global_index().await?;
                let picked = sample_nonempty(index.iter().collect(), count, "questions")?;
                let mut hits = Vec::with_capacity(picked.len());
                for entry in picked {
                    hits.push(self.resolve(entry, query.include_answers).await?);
                }
                (hits, index.len())
            }
        };

        Ok(RandomSample {
            count: questions.len(),
            questions,
            source: query.source.clone().unwrap_or_else(|| "all".to_string()),
            include_answers: query.include_answers,
            total_available,
        })
    }

    /// Look up `"{collectionId}-{questionId}"` with navigation inside its collection.
    pub async fn question(
        &self,
        id: &str,
        include_answers: bool,
        include_options: bool,
    ) -> Result<QuestionView> {
        let (collection_id, record_id) = parse_global_id(id)?;
        let collection = self.collection(collection_id).await?;
        let position = collection
            .position_of(record_id)
            .ok_or_else(|| Error::not_found(format!("question not found: {}", id)))?;

        let mut found = hit(&collection, &collection.questions[position], include_answers);
        if !include_options {
            found.question = found.question.without_options();
        }
        let navigation = Navigation::at(position, collection.len(), |pos| {
            global_id(&collection.id, collection.questions[pos].id)
        });

        Ok(QuestionView {
            question: found,
            quiz_description: collection.description.clone(),
            navigation,
        })
    }

    /// Questions `[start, end)` of one collection in source order.
    pub async fn range(
        &self,
        collection_id: &str,
        start: i64,
        end: i64,
        include_answers: bool,
    ) -> Result<QuizRange> {
        let (start, end) = validate_range(start, end, self.limits.max_range_window)?;
        let collection = self.collection(collection_id).await?;
        let (slice, range) = slice_range(&collection.questions, start, end)?;

        Ok(QuizRange {
            quiz: CollectionInfo {
                id: collection.id.clone(),
                title: collection.title.clone(),
                description: collection.description.clone(),
                total_questions: collection.len(),
            },
            questions: slice.iter().map(|q| hit(&collection, q, include_answers)).collect(),
            range,
        })
    }

    /// Case-insensitive substring search over question text and collection title.
    pub async fn search(&self, search: &QuizSearch) -> Result<SearchPage<QuizHit>> {
        let term = normalize_query(&search.query)?;
        let pagination = Pagination::new(search.page, search.limit, self.limits.max_search_limit)?;
        let index = self.global_index().await?;

        let matches: Vec<&GlobalIndexEntry> = index
            .iter()
            .filter(|entry| {
                entry.primary_text.to_lowercase().contains(&term)
                    || entry.collection_title.to_lowercase().contains(&term)
            })
            .filter(|entry| {
                search
                    .source
                    .as_deref()
                    .is_none_or(|source| entry.collection_id == source)
            })
            .collect();

        let (window, info) = paginate(&matches, pagination);
        let mut results = Vec::with_capacity(window.len());
        for entry in window {
            results.push(self.resolve(entry, search.include_answers).await?);
        }

        Ok(SearchPage {
            query: search.query.clone(),
            results,
            pagination: info,
            filter: search.source.clone(),
        })
    }

    async fn resolve(&self, entry: &GlobalIndexEntry, include_answers: bool) -> Result<QuizHit> {
        let collection = self.collection(&entry.collection_id).await?;
        let question = collection
            .position_of(entry.record_id)
            .map(|pos| &collection.questions[pos])
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    format!("question not found: {}", entry.global_id),
                )
            })?;
        Ok(hit(&collection, question, include_answers))
    }

    /// Drop a collection and the global index built from it.
    pub fn invalidate_collection(&self, id: &str) {
        self.collections.invalidate(&id.to_string());
        self.global.invalidate(&GLOBAL_KEY);
    }

    pub fn invalidate_all(&self) {
        self.summaries.clear();
        self.collections.clear();
        self.global.clear();
    }

    pub fn caches(&self) -> Vec<Arc<dyn Sweep>> {
        vec![
            self.summaries.clone() as Arc<dyn Sweep>,
            self.collections.clone() as Arc<dyn Sweep>,
            self.global.clone() as Arc<dyn Sweep>,
        ]
    }

    pub fn cache_stats(&self) -> Vec<CacheStats> {
        vec![self.summaries.stats(), self.collections.stats(), self.global.stats()]
    }
}

fn hit(collection: &QuizCollection, question: &Question, include_answers: bool) -> QuizHit {
    QuizHit {
        question: sanitize(question, include_answers),
        source: collection.id.clone(),
        quiz_title: collection.title.clone(),
        global_id: global_id(&collection.id, question.id),
    }
}
