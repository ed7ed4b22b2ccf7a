//! skydns-metrics
//!
//! Standalone exporter: reads `PROMETHEUS_*` from the environment (or a YAML
//! file given as the first argument), registers the catalog, and serves it
//! until interrupted.

use tracing_subscriber::{fmt, EnvFilter};

use skydns_metrics::{config, exposition};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let fatal = exposition::exit_on_fatal();

    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path),
        None => config::from_env(),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => return fatal(&e),
    };

    let exp = match exposition::init(&cfg, fatal.clone()).await {
        Ok(exp) => exp,
        Err(e) => return fatal(&e),
    };
    if exp.server.is_none() {
        tracing::warn!("PROMETHEUS_PORT not set; metrics are recorded but not exposed");
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "signal handler failed");
    }
    tracing::info!("skydns-metrics shutting down");
}
