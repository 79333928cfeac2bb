use prometheus::{
    Counter, CounterVec, Gauge, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
};
use std::sync::Arc;

use crate::index::SymbolIndex;
use crate::models::LookupMode;

/// Prometheus metrics for the symbol index service
#[derive(Clone)]
pub struct SearchMetrics {
    // Counters
    pub lookups_total: CounterVec,
    pub empty_lookups_total: CounterVec,
    pub reloads_total: IntCounterVec,
    pub results_returned: Counter,

    // Gauges
    pub index_entries: Gauge,
    pub index_keys: Gauge,
    pub index_generation: Gauge,

    // Histograms
    pub lookup_latency: HistogramVec,

    // Registry
    registry: Arc<Registry>,
}

impl SearchMetrics {
    /// Create a new SearchMetrics instance
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counters
        let lookups_total = CounterVec::new(
            Opts::new("symdex_lookups_total", "Total number of lookups by mode"),
            &["mode"],
        )?;
        registry.register(Box::new(lookups_total.clone()))?;

        let empty_lookups_total = CounterVec::new(
            Opts::new(
                "symdex_empty_lookups_total",
                "Lookups that matched no entry, by mode",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(empty_lookups_total.clone()))?;

        let reloads_total = IntCounterVec::new(
            Opts::new("symdex_reloads_total", "Index reloads by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(reloads_total.clone()))?;

        let results_returned = Counter::with_opts(Opts::new(
            "symdex_results_returned_total",
            "Total number of entries returned to clients",
        ))?;
        registry.register(Box::new(results_returned.clone()))?;

        // Gauges
        let index_entries = Gauge::with_opts(Opts::new(
            "symdex_index_entries",
            "Number of entries in the served index",
        ))?;
        registry.register(Box::new(index_entries.clone()))?;

        let index_keys = Gauge::with_opts(Opts::new(
            "symdex_index_keys",
            "Number of distinct case-folded keys in the served index",
        ))?;
        registry.register(Box::new(index_keys.clone()))?;

        let index_generation = Gauge::with_opts(Opts::new(
            "symdex_index_generation",
            "Generation of the served index",
        ))?;
        registry.register(Box::new(index_generation.clone()))?;

        // Histograms
        let lookup_latency = HistogramVec::new(
            HistogramOpts::new("symdex_lookup_latency_seconds", "Lookup latency")
                .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
            &["mode"],
        )?;
        registry.register(Box::new(lookup_latency.clone()))?;

        Ok(Self {
            lookups_total,
            empty_lookups_total,
            reloads_total,
            results_returned,
            index_entries,
            index_keys,
            index_generation,
            lookup_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record a lookup and how many entries it returned
    pub fn record_lookup(&self, mode: LookupMode, returned: usize, duration_secs: f64) {
        let label = mode.as_str();
        self.lookups_total.with_label_values(&[label]).inc();
        if returned == 0 {
            self.empty_lookups_total.with_label_values(&[label]).inc();
        }
        self.results_returned.inc_by(returned as f64);
        self.lookup_latency
            .with_label_values(&[label])
            .observe(duration_secs);
    }

    /// Record a reload attempt
    pub fn record_reload(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.reloads_total.with_label_values(&[outcome]).inc();
    }

    /// Update gauges describing the served index
    pub fn set_index(&self, index: &SymbolIndex, generation: u64) {
        self.index_entries.set(index.len() as f64);
        self.index_keys.set(index.key_count() as f64);
        self.index_generation.set(generation as f64);
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
