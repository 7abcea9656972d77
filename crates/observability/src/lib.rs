use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use appscout_core::ClassificationSource;
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_VAR: &str = "APPSCOUT_LOG_FORMAT";

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Process-wide routing counters, shared between the router and the health endpoint.
#[derive(Debug, Default)]
pub struct AppMetrics {
    routed: AtomicU64,
    ignored: AtomicU64,
    by_source: [AtomicU64; 3],
    latency_sum_millis: AtomicU64,
    latency_max_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub ignored_total: u64,
    pub remote_total: u64,
    pub fallback_total: u64,
    pub defaulted_total: u64,
    pub avg_latency_millis: f64,
    pub max_latency_millis: u64,
    /// Share of classifications that did not come from the remote model.
    pub degraded_ratio: f64,
}

fn source_slot(source: ClassificationSource) -> usize {
    match source {
        ClassificationSource::Remote => 0,
        ClassificationSource::Fallback => 1,
        ClassificationSource::Defaulted => 2,
    }
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_classification(&self, source: ClassificationSource) {
        self.by_source[source_slot(source)].fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one routed message and the time it took end to end.
    pub fn record_routed(&self, elapsed: Duration) {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.routed.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_millis.fetch_add(millis, Ordering::Relaxed);
        self.latency_max_millis.fetch_max(millis, Ordering::Relaxed);
    }

    pub fn classified(&self, source: ClassificationSource) -> u64 {
        self.by_source[source_slot(source)].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.routed.load(Ordering::Relaxed);
        let remote = self.classified(ClassificationSource::Remote);
        let fallback = self.classified(ClassificationSource::Fallback);
        let defaulted = self.classified(ClassificationSource::Defaulted);
        let classified = remote + fallback + defaulted;

        MetricsSnapshot {
            requests_total: requests,
            ignored_total: self.ignored.load(Ordering::Relaxed),
            remote_total: remote,
            fallback_total: fallback,
            defaulted_total: defaulted,
            avg_latency_millis: ratio(self.latency_sum_millis.load(Ordering::Relaxed), requests),
            max_latency_millis: self.latency_max_millis.load(Ordering::Relaxed),
            degraded_ratio: ratio(fallback + defaulted, classified),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    /// Anything other than `compact` keeps the structured JSON output.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("compact") => Self::Compact,
            _ => Self::Json,
        }
    }
}

pub fn default_directives(service_name: &str) -> String {
    format!("{service_name}=info,appscout_agents=info,appscout_ml=info,appscout_api=info")
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);

        match LogFormat::from_setting(env::var(LOG_FORMAT_VAR).ok().as_deref()) {
            LogFormat::Json => builder
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .init(),
            LogFormat::Compact => builder.compact().init(),
        }
    });
}
