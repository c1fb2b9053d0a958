use std::time::SystemTime;

use serde::Serialize;

use crate::cache::ttl::CacheStats;

/// Service statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub uptime_secs: u64,
    pub start_time: SystemTime,
    pub sweeper_running: bool,
    pub caches: Vec<CacheStats>,
}

impl ServiceStats {
    pub fn cached_entries(&self) -> usize {
        self.caches.iter().map(|c| c.size).sum()
    }

    pub fn overall_hit_rate(&self) -> f64 {
        let hits: usize = self.caches.iter().map(|c| c.hit_count).sum();
        let misses: usize = self.caches.iter().map(|c| c.miss_count).sum();
        if hits + misses == 0 {
            0.0
        } else {
            hits as f64 / (hits + misses) as f64
        }
    }
}
