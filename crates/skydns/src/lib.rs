//! Top-level facade crate for the SkyDNS metrics subsystem.
//!
//! Re-exports the core types and the metrics library so hosts can depend on a single crate.

pub mod core {
    pub use skydns_core::*;
}

pub mod metrics {
    pub use skydns_metrics::*;
}
