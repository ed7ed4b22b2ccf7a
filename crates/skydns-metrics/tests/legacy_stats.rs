#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use skydns_metrics::obs::{AtomicCounter, Counter, DnsMetrics, LegacyStats, NopCounter};

#[test]
fn nop_counter_accepts_anything() {
    let c = NopCounter;
    for v in [i64::MIN, -1, 0, 1, i64::MAX] {
        c.inc(v);
    }
}

#[test]
fn default_stats_leave_registry_untouched() {
    let m = DnsMetrics::new("", "skydns").unwrap();
    let before = m.render();

    let stats = LegacyStats::default();
    for c in [
        &stats.forward,
        &stats.stub_forward,
        &stats.lookup,
        &stats.request,
        &stats.dnssec_ok,
        &stats.name_error,
        &stats.no_data,
        &stats.dnssec_cache_miss,
    ] {
        c.inc(-3);
        c.inc(0);
        c.inc(9);
    }
    assert_eq!(m.render(), before);
}

#[test]
fn a_slot_can_be_rebound_to_an_accumulator() {
    let acc = Arc::new(AtomicCounter::default());
    let stats = LegacyStats { forward: acc.clone(), ..LegacyStats::default() };
    stats.forward.inc(4);
    stats.lookup.inc(4);
    assert_eq!(acc.get(), 4);
}

#[test]
fn bound_stats_feed_the_catalog() {
    let m = DnsMetrics::new("", "skydns").unwrap();
    let stats = LegacyStats::bound_to(&m);

    stats.forward.inc(1);
    stats.stub_forward.inc(2);
    stats.lookup.inc(3);
    stats.request.inc(4);
    stats.dnssec_ok.inc(5);
    stats.no_data.inc(6);
    stats.dnssec_cache_miss.inc(7);

    assert_eq!(m.external_request_count.get(&[("type", "recursive")]), 1);
    assert_eq!(m.external_request_count.get(&[("type", "stub")]), 2);
    assert_eq!(m.external_request_count.get(&[("type", "lookup")]), 3);
    assert_eq!(m.request_count.get(&[("type", "udp")]), 4);
    assert_eq!(m.dnssec_ok_count.get(&[]), 5);
    assert_eq!(m.error_count.get(&[("error", "nodata")]), 6);
    assert_eq!(m.cache_miss.get(&[("type", "signature")]), 7);
}
