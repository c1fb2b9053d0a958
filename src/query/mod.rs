pub mod page;
pub mod sampler;
pub mod quiz_engine;
pub mod image_engine;

use crate::core::config::Config;

/// Request bounds shared by the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub max_sample: usize,
    pub max_range_window: usize,
    pub max_search_limit: usize,
}

impl QueryLimits {
    pub fn for_quizzes(config: &Config) -> Self {
        QueryLimits {
            max_sample: config.max_quiz_sample,
            max_range_window: config.max_range_window,
            max_search_limit: config.max_search_limit,
        }
    }

    pub fn for_images(config: &Config) -> Self {
        QueryLimits {
            max_sample: config.max_image_sample,
            ..Self::for_quizzes(config)
        }
    }
}
