use serde::{Deserialize, Deserializer};
use skydns_core::error::{Result, SkyDnsError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Raw scrape port; unset or empty disables exposition.
    /// Parsed by `port()` only after the families are registered.
    #[serde(default, deserialize_with = "de_port")]
    pub port: Option<String>,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub namespace: String,

    #[serde(default = "default_subsystem")]
    pub subsystem: String,

    #[serde(default = "default_listen_host")]
    pub listen_host: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: None,
            path: default_path(),
            namespace: String::new(),
            subsystem: default_subsystem(),
            listen_host: default_listen_host(),
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(SkyDnsError::BadConfig(format!(
                "metrics path must start with '/': {}",
                self.path
            )));
        }
        // axum would read these as captures/wildcards.
        if self.path.contains(':') || self.path.contains('*') {
            return Err(SkyDnsError::BadConfig(format!(
                "metrics path must be a literal path: {}",
                self.path
            )));
        }
        for (what, v) in [("namespace", &self.namespace), ("subsystem", &self.subsystem)] {
            if !v.is_empty() && !is_metric_ident(v) {
                return Err(SkyDnsError::BadConfig(format!(
                    "metrics {what} is not a valid metric name part: {v}"
                )));
            }
        }
        if self.listen_host.parse::<std::net::IpAddr>().is_err() {
            return Err(SkyDnsError::BadConfig(format!(
                "metrics listen_host must be an IP address: {}",
                self.listen_host
            )));
        }
        Ok(())
    }

    /// `None` when exposition is disabled, otherwise a port in `1..=65535`.
    pub fn port(&self) -> Result<Option<u16>> {
        match self.port.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => match raw.parse::<u16>() {
                Ok(p) if p > 0 => Ok(Some(p)),
                _ => Err(SkyDnsError::BadConfig(format!("bad port for prometheus: {raw}"))),
            },
        }
    }
}

fn is_metric_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPort {
    Num(i64),
    Text(String),
}

fn de_port<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<RawPort>::deserialize(d)?.map(|p| match p {
        RawPort::Num(n) => n.to_string(),
        RawPort::Text(s) => s,
    }))
}

pub(crate) fn default_path() -> String {
    "/metrics".into()
}
pub(crate) fn default_subsystem() -> String {
    "skydns".into()
}
pub(crate) fn default_listen_host() -> String {
    "0.0.0.0".into()
}
