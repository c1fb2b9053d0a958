pub mod core;
pub mod storage;
pub mod index;
pub mod cache;
pub mod query;
pub mod sanitize;
pub mod service;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorClass, ErrorKind, Result};
pub use crate::query::image_engine::{ImageEngine, ImageFilter, ImageSearch};
pub use crate::query::quiz_engine::{QuizEngine, QuizSearch, RandomQuery};
pub use crate::service::content_service::ContentService;

/*
┌──────────────────────────────── QUARKDEX LAYOUT ────────────────────────────────┐
│                                                                                  │
│   ContentService (one per process)                                               │
│   ├── QuizEngine                                                                 │
│   │   ├── QuizStore ─────────── <data>/quizzes/<id>.json                        │
│   │   │                          <data>/index/ti_index.json (summary, rebuilt    │
│   │   │                          by directory scan when missing)                 │
│   │   ├── TtlCache "quiz_summaries"     -> SummaryIndex                          │
│   │   ├── TtlCache "quiz_collections"   -> QuizCollection per id                 │
│   │   └── TtlCache "quiz_global_index"  -> Vec<GlobalIndexEntry>                 │
│   ├── ImageEngine                                                                │
│   │   ├── ImageCatalog ──────── static category table, no I/O                    │
│   │   ├── TtlCache "image_structure"    -> DatasetStructure                      │
│   │   └── TtlCache "image_index"        -> ImageIndex                            │
│   └── SweeperHandle ─────────── periodic invalidate_expired over all caches      │
│                                                                                  │
│   query:     random / by-id + navigation / range / search + pagination           │
│   sanitize:  Question -> PublicQuestion (answer fields dropped unless asked)      │
│                                                                                  │
└──────────────────────────────────────────────────────────────────────────────────┘
*/
