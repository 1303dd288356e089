//! In-process query statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::ResolutionMethod;

/// Running totals since process start
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    total_queries: u64,
    average_query_time_ms: f64,
    cache_hits: u64,
    method_stats: BTreeMap<ResolutionMethod, u64>,
}

/// Snapshot handed to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub total_queries: u64,
    pub average_query_time_ms: f64,
    pub cache_hits: u64,
    pub method_stats: BTreeMap<ResolutionMethod, u64>,
    /// Percentage of queries served from cache
    pub cache_hit_rate: f64,
    pub cache_size: usize,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly computed resolution
    pub fn record_query(&mut self, query_time_ms: f64, method: ResolutionMethod) {
        self.record_latency(query_time_ms);
        *self.method_stats.entry(method).or_insert(0) += 1;
    }

    /// Record a query answered from cache
    pub fn record_cache_hit(&mut self, query_time_ms: f64) {
        self.cache_hits += 1;
        self.record_latency(query_time_ms);
    }

    fn record_latency(&mut self, latest: f64) {
        self.total_queries += 1;
        let n = self.total_queries as f64;
        self.average_query_time_ms = (self.average_query_time_ms * (n - 1.0) + latest) / n;
    }

    pub fn snapshot(&self, cache_size: usize) -> PerformanceStats {
        let cache_hit_rate = if self.total_queries == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_queries as f64 * 100.0
        };

        PerformanceStats {
            total_queries: self.total_queries,
            average_query_time_ms: self.average_query_time_ms,
            cache_hits: self.cache_hits,
            method_stats: self.method_stats.clone(),
            cache_hit_rate,
            cache_size,
        }
    }
}
