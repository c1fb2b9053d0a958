use std::sync::Arc;
use std::time::{Instant, SystemTime};

use tracing::info;

use crate::cache::sweeper::{SweeperHandle, spawn_sweeper};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::Config;
use crate::core::stats::ServiceStats;
use crate::query::QueryLimits;
use crate::query::image_engine::ImageEngine;
use crate::query::quiz_engine::QuizEngine;
use crate::storage::image_catalog::ImageCatalog;
use crate::storage::layout::DataLayout;
use crate::storage::quiz_store::QuizStore;

/// Owns both query engines and their caches for the life of the process.
pub struct ContentService {
    config: Config,
    quizzes: Arc<QuizEngine>,
    images: Arc<ImageEngine>,
    sweeper: Option<SweeperHandle>,
    start_time: SystemTime,
    started: Instant,
}

impl ContentService {
    pub fn open(config: Config) -> Self {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let store = QuizStore::new(DataLayout::new(config.data_dir.clone()));
        let quizzes = Arc::new(QuizEngine::new(
            store,
            QueryLimits::for_quizzes(&config),
            config.quiz_cache_ttl,
            clock.clone(),
        ));

        let catalog = ImageCatalog::new(&config.image_primary_base, &config.image_cdn_base);
        let images = Arc::new(ImageEngine::new(
            catalog,
            QueryLimits::for_images(&config),
            config.image_cache_ttl,
            clock,
        ));

        info!(data_dir = %config.data_dir.display(), "content service opened");
        ContentService {
            config,
            quizzes,
            images,
            sweeper: None,
            start_time: SystemTime::now(),
            started: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn quizzes(&self) -> &Arc<QuizEngine> {
        &self.quizzes
    }

    pub fn images(&self) -> &Arc<ImageEngine> {
        &self.images
    }

    /// Start the periodic sweep over every cache. No-op if already running.
    /// Must be called from within a tokio runtime.
    pub fn start_sweeper(&mut self) {
        if self.sweeper.is_some() {
            return;
        }
        let mut targets = self.quizzes.caches();
        targets.extend(self.images.caches());
        self.sweeper = Some(spawn_sweeper(targets, self.config.sweep_interval));
    }

    pub async fn shutdown(mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }
        info!("content service stopped");
    }

    pub fn stats(&self) -> ServiceStats {
        let mut caches = self.quizzes.cache_stats();
        caches.extend(self.images.cache_stats());
        ServiceStats {
            uptime_secs: self.started.elapsed().as_secs(),
            start_time: self.start_time,
            sweeper_running: self.sweeper.as_ref().is_some_and(|s| !s.is_finished()),
            caches,
        }
    }
}
