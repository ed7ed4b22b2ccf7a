//! Metrics config loader.
//!
//! The `PROMETHEUS_*` environment variables are the primary source; a strict
//! YAML file with the same fields is accepted as an alternative.

pub mod schema;

use std::fs;

use skydns_core::error::{Result, SkyDnsError};

pub use schema::MetricsConfig;

pub const ENV_PORT: &str = "PROMETHEUS_PORT";
pub const ENV_PATH: &str = "PROMETHEUS_PATH";
pub const ENV_NAMESPACE: &str = "PROMETHEUS_NAMESPACE";
pub const ENV_SUBSYSTEM: &str = "PROMETHEUS_SUBSYSTEM";
pub const ENV_LISTEN_HOST: &str = "PROMETHEUS_LISTEN_HOST";

/// Read the process environment.
pub fn from_env() -> Result<MetricsConfig> {
    from_lookup(|k| std::env::var(k).ok())
}

/// Build from any key lookup. Empty values count as unset, so the defaults
/// for path and subsystem apply.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<MetricsConfig> {
    let get = |k: &str| lookup(k).filter(|v| !v.is_empty());
    let cfg = MetricsConfig {
        port: get(ENV_PORT),
        path: get(ENV_PATH).unwrap_or_else(schema::default_path),
        namespace: get(ENV_NAMESPACE).unwrap_or_default(),
        subsystem: get(ENV_SUBSYSTEM).unwrap_or_else(schema::default_subsystem),
        listen_host: get(ENV_LISTEN_HOST).unwrap_or_else(schema::default_listen_host),
    };
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<MetricsConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SkyDnsError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<MetricsConfig> {
    let cfg: MetricsConfig = serde_yaml::from_str(s)
        .map_err(|e| SkyDnsError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
