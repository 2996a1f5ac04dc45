use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("transactions_recorded_total").absolute(0);
    counter!("bets_placed_total").absolute(0);
    counter!("bets_settled_total").absolute(0);
    counter!("loss_limit_checks_total").absolute(0);
    counter!("loss_limit_breaches_total").absolute(0);
    counter!("kelly_requests_total").absolute(0);

    // Pre-register gauges at zero.
    gauge!("active_bankrolls").set(0.0);

    handle
}
