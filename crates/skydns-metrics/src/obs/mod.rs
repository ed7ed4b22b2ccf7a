//! In-process metrics for the DNS server.
//!
//! Primitives are atomics behind `DashMap` series tables; the registry renders
//! them in the Prometheus text format for the `/metrics` handler.

pub mod dns;
pub mod legacy;
pub mod metrics;
pub mod registry;

pub use dns::DnsMetrics;
pub use legacy::{AtomicCounter, Counter, LegacyStats, NopCounter, SeriesCounter};
pub use metrics::{CounterVec, GaugeVec, HistogramSnapshot, HistogramVec, Labels};
pub use registry::{Family, Registry};
