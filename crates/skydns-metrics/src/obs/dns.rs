//! The DNS server's metric catalog.
//!
//! `DnsMetrics` is the context object the host passes (as `Arc<DnsMetrics>`)
//! to every component that records request, error, or cache events.

use std::sync::Arc;
use std::time::Duration;

use skydns_core::error::Result;
use skydns_core::labels::{BackendKind, CacheKind, ErrorClass, ExternalKind, LabelValue, Transport};

use super::metrics::{CounterVec, GaugeVec, HistogramVec, DEFAULT_BUCKETS};
use super::registry::Registry;

/// Resolution time buckets: two sub-5ms steps ahead of the default ladder.
pub fn duration_buckets() -> Vec<f64> {
    let mut b = vec![0.001, 0.003];
    b.extend_from_slice(&DEFAULT_BUCKETS);
    b
}

/// Powers of 2 up to the maximum size.
pub const RESPONSE_SIZE_BUCKETS: [f64; 11] = [
    0.0, 128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0, 32768.0, 65536.0,
];

pub struct DnsMetrics {
    pub external_request_count: Arc<CounterVec>,
    pub request_count: Arc<CounterVec>,
    pub dnssec_ok_count: Arc<CounterVec>,
    pub backend_failure_count: Arc<CounterVec>,
    pub error_count: Arc<CounterVec>,
    pub cache_size: Arc<GaugeVec>,
    pub cache_miss: Arc<CounterVec>,
    pub request_duration: Arc<HistogramVec>, // seconds
    pub response_size: Arc<HistogramVec>,    // bytes
    registry: Registry,
}

impl DnsMetrics {
    /// Register every family under `[namespace_]subsystem_`.
    pub fn new(namespace: &str, subsystem: &str) -> Result<Self> {
        let mut r = Registry::new(namespace, subsystem);

        // recursive, stub, lookup
        let external_request_count =
            r.register_counter("dns_request_external_count", "Counter of external DNS requests.")?;
        // udp, tcp
        let request_count = r.register_counter("dns_request_count", "Counter of DNS requests made.")?;
        let dnssec_ok_count = r.register_counter("dns_dnssec_ok_count", "Counter of DNSSEC requests.")?;
        // other, etcd
        let backend_failure_count =
            r.register_counter("backend_failure_count", "Counter of JSON parsing failures.")?;
        let error_count = r.register_counter(
            "dns_error_count",
            "Counter of DNS requests resulting in an error.",
        )?;

        // Caches
        let cache_size =
            r.register_gauge("cache_total_size", "The total size of all elements in the cache.")?;
        let cache_miss = r.register_counter(
            "dns_cache_miss_count",
            "Counter of DNS requests that result in a cache miss.",
        )?;

        let request_duration = r.register_histogram(
            "dns_request_duration",
            "Histogram of the time (in seconds) each request took to resolve.",
            &duration_buckets(),
        )?;
        let response_size = r.register_histogram(
            "dns_response_size",
            "Size of the returns response in bytes.",
            &RESPONSE_SIZE_BUCKETS,
        )?;

        Ok(Self {
            external_request_count,
            request_count,
            dnssec_ok_count,
            backend_failure_count,
            error_count,
            cache_size,
            cache_miss,
            request_duration,
            response_size,
            registry: r,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all families for a scrape.
    pub fn render(&self) -> String {
        self.registry.render()
    }

    pub fn record_request(&self, t: Transport) {
        self.request_count.inc(&[t.pair()]);
    }

    pub fn record_external(&self, k: ExternalKind) {
        self.external_request_count.inc(&[k.pair()]);
    }

    pub fn record_dnssec_ok(&self) {
        self.dnssec_ok_count.inc(&[]);
    }

    pub fn record_backend_failure(&self, k: BackendKind) {
        self.backend_failure_count.inc(&[k.pair()]);
    }

    pub fn record_error(&self, e: ErrorClass) {
        self.error_count.inc(&[e.pair()]);
    }

    pub fn set_cache_size(&self, k: CacheKind, size: i64) {
        self.cache_size.set(&[k.pair()], size);
    }

    pub fn add_cache_size(&self, k: CacheKind, delta: i64) {
        self.cache_size.add(&[k.pair()], delta);
    }

    pub fn record_cache_miss(&self, k: CacheKind) {
        self.cache_miss.inc(&[k.pair()]);
    }

    pub fn observe_duration(&self, t: Transport, elapsed: Duration) {
        self.request_duration.observe(&[t.pair()], elapsed.as_secs_f64());
    }

    pub fn observe_response_size(&self, t: Transport, bytes: usize) {
        self.response_size.observe(&[t.pair()], bytes as f64);
    }
}
