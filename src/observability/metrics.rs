use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Request metrics
    pub requests: IntCounterVec,
    pub budget_exceeded: IntCounter,

    // Upstream metrics
    pub upstream_fetch_duration: HistogramVec,
    pub upstream_failures: IntCounterVec,
    pub token_refreshes: IntCounterVec,

    // Window
    pub window_size: IntGauge,

    // Config/runtime
    pub config_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("avgcalc".into()), None)
            .expect("metrics registry prefix is valid");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Requests
            requests: IntCounterVec::new(Opts::new("requests_total", "Handled /numbers requests by category and status"),&["category", "status"],).unwrap(),
            budget_exceeded: IntCounter::new("budget_exceeded_total", "Requests answered with 500 because the response budget elapsed").unwrap(),

            // Upstream
            upstream_fetch_duration: HistogramVec::new(HistogramOpts::new("upstream_fetch_duration_seconds", "Upstream fetch duration seconds, retry included").buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),&["category"],).unwrap(),
            upstream_failures: IntCounterVec::new(Opts::new("upstream_failures_total", "Upstream fetch failures by reason"),&["category", "reason"],).unwrap(),
            token_refreshes: IntCounterVec::new(Opts::new("token_refreshes_total", "Auth token refreshes by result"),&["result"],).unwrap(),

            // Window
            window_size: IntGauge::new("window_size", "Numbers currently held in the window").unwrap(),

            // Config/runtime
            config_errors: IntCounter::new("config_errors_total", "Parse and validation errors while loading config").unwrap(),
            up: IntGauge::new("up", "1 if service is serving").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.requests.clone())).unwrap();
        reg.register(Box::new(metrics.budget_exceeded.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_refreshes.clone())).unwrap();
        reg.register(Box::new(metrics.window_size.clone())).unwrap();
        reg.register(Box::new(metrics.config_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
