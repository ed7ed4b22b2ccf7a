//! Startup entry point: register the catalog and, if a port is configured,
//! serve it over HTTP from a background task.

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use skydns_core::error::{Result, SkyDnsError};

use crate::app_state::AppState;
use crate::config::MetricsConfig;
use crate::obs::DnsMetrics;
use crate::router;

/// Called on unrecoverable failures. Must not return normally in production.
pub type FatalHook = Arc<dyn Fn(&SkyDnsError) + Send + Sync>;

/// Default hook: log and exit with status 1.
pub fn exit_on_fatal() -> FatalHook {
    Arc::new(|e: &SkyDnsError| {
        tracing::error!(code = e.code().as_str(), error = %e, "fatal");
        std::process::exit(1);
    })
}

pub struct Exposition {
    pub metrics: Arc<DnsMetrics>,
    /// `None` when no scrape port is configured.
    pub server: Option<ExpositionServer>,
}

pub struct ExpositionServer {
    local_addr: SocketAddr,
    path: String,
    task: JoinHandle<()>,
}

impl ExpositionServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Stop serving. The process normally never does this.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Register every family, then start exposition if `cfg.port` is set.
///
/// Families are registered before the port is inspected, so a bad port still
/// leaves an initialized catalog behind (it is returned only on success).
pub async fn init(cfg: &MetricsConfig, fatal: FatalHook) -> Result<Exposition> {
    cfg.validate()?;
    let metrics = Arc::new(DnsMetrics::new(&cfg.namespace, &cfg.subsystem)?);

    let Some(port) = cfg.port()? else {
        tracing::debug!("metrics exposition disabled (no port)");
        return Ok(Exposition { metrics, server: None });
    };

    let host: IpAddr = cfg
        .listen_host
        .parse()
        .map_err(|e| SkyDnsError::BadConfig(format!("bad listen_host {}: {e}", cfg.listen_host)))?;
    let server = serve(Arc::clone(&metrics), SocketAddr::new(host, port), &cfg.path, fatal).await?;
    tracing::info!(port, path = %cfg.path, "metrics enabled on :{}{}", port, cfg.path);

    Ok(Exposition { metrics, server: Some(server) })
}

/// Bind `addr` and serve `metrics` at `path` from a spawned task.
///
/// Bind failure is returned; if the listener later stops, `fatal` is invoked.
pub async fn serve(
    metrics: Arc<DnsMetrics>,
    addr: SocketAddr,
    path: &str,
    fatal: FatalHook,
) -> Result<ExpositionServer> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| SkyDnsError::Bind { addr: addr.to_string(), source })?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| SkyDnsError::Internal(format!("local_addr: {e}")))?;

    let app = router::build_router(AppState::new(metrics), path);

    let task = spawn_until_fatal(async move { axum::serve(listener, app).await }, fatal);

    Ok(ExpositionServer { local_addr, path: path.to_string(), task })
}

/// Run a serve loop that should never finish; whenever it does, with or
/// without an error, report it through `fatal`.
pub fn spawn_until_fatal<F>(serve: F, fatal: FatalHook) -> JoinHandle<()>
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        let err = match serve.await {
            Ok(()) => SkyDnsError::Serve("listener exited".into()),
            Err(e) => SkyDnsError::Serve(e.to_string()),
        };
        fatal(&err);
    })
}
