use prometheus::{core::Collector, Counter, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use tracing::error;

lazy_static::lazy_static! {
    // Upstream requests
    pub static ref NEO_FETCHES: Counter = Counter::with_opts(
        Opts::new("astroscope_neo_fetches_total", "Asteroid feed requests issued")
    ).unwrap();

    pub static ref NEO_FETCH_FAILURES: Counter = Counter::with_opts(
        Opts::new("astroscope_neo_fetch_failures_total", "Asteroid feed requests that failed")
    ).unwrap();

    pub static ref EONET_FETCHES: Counter = Counter::with_opts(
        Opts::new("astroscope_eonet_fetches_total", "Natural event requests issued")
    ).unwrap();

    pub static ref EONET_FETCH_FAILURES: Counter = Counter::with_opts(
        Opts::new("astroscope_eonet_fetch_failures_total", "Natural event requests that failed")
    ).unwrap();

    pub static ref FETCH_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("astroscope_fetch_duration_seconds", "Time spent on upstream requests"),
        &["source"]
    ).unwrap();

    // Chat
    pub static ref CHAT_REPLIES: Counter = Counter::with_opts(
        Opts::new("astroscope_chat_replies_total", "Assistant replies appended to transcripts")
    ).unwrap();

    pub static ref STALE_RESULTS_DROPPED: Counter = Counter::with_opts(
        Opts::new("astroscope_stale_results_dropped_total", "Results discarded after their view was torn down")
    ).unwrap();
}

fn collectors() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(NEO_FETCHES.clone()),
        Box::new(NEO_FETCH_FAILURES.clone()),
        Box::new(EONET_FETCHES.clone()),
        Box::new(EONET_FETCH_FAILURES.clone()),
        Box::new(FETCH_DURATION.clone()),
        Box::new(CHAT_REPLIES.clone()),
        Box::new(STALE_RESULTS_DROPPED.clone()),
    ]
}

/// Registers each collector, skipping any the registry rejects. Returns how many were added.
fn register_all(registry: &Registry, collectors: Vec<Box<dyn Collector>>) -> usize {
    let mut added = 0;
    for collector in collectors {
        match registry.register(collector) {
            Ok(()) => added += 1,
            Err(e) => error!("Failed to register metric: {}", e),
        }
    }
    added
}

pub struct MetricsRegistry {
    registry: Registry,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let registry = Registry::new();
        register_all(&registry, collectors());
        Self { registry }
    }

    pub fn gather_metrics(&self) -> String {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&metric_families).unwrap_or_else(|e| {
            error!("Failed to encode metrics: {}", e);
            String::new()
        })
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
