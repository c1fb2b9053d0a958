use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the backing-store root.
pub const DATA_DIR_ENV: &str = "QUARKDEX_DATA_DIR";

pub const DEFAULT_PRIMARY_BASE: &str =
    "https://raw.githubusercontent.com/lsqkk/animal-recognition-dataset/main";
pub const DEFAULT_CDN_BASE: &str =
    "https://cdn.jsdelivr.net/gh/lsqkk/animal-recognition-dataset@main";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,

    pub quiz_cache_ttl: Duration,        // collections, summaries, global index
    pub image_cache_ttl: Duration,       // dataset structure and image index
    pub sweep_interval: Duration,        // background expired-entry sweep

    pub max_quiz_sample: usize,
    pub max_image_sample: usize,
    pub max_range_window: usize,
    pub max_search_limit: usize,

    pub image_primary_base: String,
    pub image_cdn_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("./data"),

            quiz_cache_ttl: Duration::from_secs(5 * 60),
            image_cache_ttl: Duration::from_secs(10 * 60),
            sweep_interval: Duration::from_secs(60 * 60),

            max_quiz_sample: 10,
            max_image_sample: 20,
            max_range_window: 50,
            max_search_limit: 50,

            image_primary_base: DEFAULT_PRIMARY_BASE.to_string(),
            image_cdn_base: DEFAULT_CDN_BASE.to_string(),
        }
    }
}

impl Config {
    /// Defaults plus the `QUARKDEX_DATA_DIR` override.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir.trim());
        }
        config
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}
