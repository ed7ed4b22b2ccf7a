//! Legacy stat counters kept for older call sites (they fed graphite).
//!
//! Every slot defaults to `NopCounter`. A host that still wants the numbers can
//! rebind slots to an `AtomicCounter` or, via `LegacyStats::bound_to`, to the
//! matching series of the metric catalog.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use skydns_core::labels::{CacheKind, ErrorClass, ExternalKind, LabelValue, Transport};

use super::dns::DnsMetrics;
use super::metrics::CounterVec;

/// The counter capability legacy call sites depend on.
pub trait Counter: Send + Sync {
    fn inc(&self, amount: i64);
}

/// Discards every increment.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopCounter;

impl Counter for NopCounter {
    fn inc(&self, _amount: i64) {}
}

/// Plain in-process accumulator.
#[derive(Debug, Default)]
pub struct AtomicCounter(AtomicI64);

impl AtomicCounter {
    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Counter for AtomicCounter {
    fn inc(&self, amount: i64) {
        self.0.fetch_add(amount, Ordering::Relaxed);
    }
}

/// Forwards into one series of a registered counter family.
/// Non-positive amounts are dropped; counters only go up.
pub struct SeriesCounter {
    family: Arc<CounterVec>,
    labels: Vec<(&'static str, &'static str)>,
}

impl SeriesCounter {
    pub fn new(family: Arc<CounterVec>, labels: Vec<(&'static str, &'static str)>) -> Self {
        Self { family, labels }
    }
}

impl Counter for SeriesCounter {
    fn inc(&self, amount: i64) {
        if amount > 0 {
            self.family.add(&self.labels, amount as u64);
        }
    }
}

#[derive(Clone)]
pub struct LegacyStats {
    pub forward: Arc<dyn Counter>,
    pub stub_forward: Arc<dyn Counter>,
    pub lookup: Arc<dyn Counter>,
    pub request: Arc<dyn Counter>,
    pub dnssec_ok: Arc<dyn Counter>,
    pub name_error: Arc<dyn Counter>,
    pub no_data: Arc<dyn Counter>,
    pub dnssec_cache_miss: Arc<dyn Counter>,
}

impl Default for LegacyStats {
    fn default() -> Self {
        let nop: Arc<dyn Counter> = Arc::new(NopCounter);
        Self {
            forward: Arc::clone(&nop),
            stub_forward: Arc::clone(&nop),
            lookup: Arc::clone(&nop),
            request: Arc::clone(&nop),
            dnssec_ok: Arc::clone(&nop),
            name_error: Arc::clone(&nop),
            no_data: Arc::clone(&nop),
            dnssec_cache_miss: nop,
        }
    }
}

impl LegacyStats {
    /// Bind every slot to its counterpart in the catalog.
    ///
    /// `request` has no transport of its own, so it lands on `type="udp"`.
    pub fn bound_to(m: &DnsMetrics) -> Self {
        let series = |family: &Arc<CounterVec>, labels: Vec<(&'static str, &'static str)>| {
            let c: Arc<dyn Counter> = Arc::new(SeriesCounter::new(Arc::clone(family), labels));
            c
        };
        Self {
            forward: series(&m.external_request_count, vec![ExternalKind::Recursive.pair()]),
            stub_forward: series(&m.external_request_count, vec![ExternalKind::Stub.pair()]),
            lookup: series(&m.external_request_count, vec![ExternalKind::Lookup.pair()]),
            request: series(&m.request_count, vec![Transport::Udp.pair()]),
            dnssec_ok: series(&m.dnssec_ok_count, vec![]),
            name_error: series(&m.error_count, vec![ErrorClass::Nxdomain.pair()]),
            no_data: series(&m.error_count, vec![ErrorClass::Nodata.pair()]),
            dnssec_cache_miss: series(&m.cache_miss, vec![CacheKind::Signature.pair()]),
        }
    }
}
