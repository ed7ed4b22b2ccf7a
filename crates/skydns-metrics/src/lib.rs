//! SkyDNS metrics library entry.
//!
//! This crate holds the DNS server's metric catalog, the legacy counter
//! facade, config loading, and the HTTP exposition that serves the catalog to
//! scrapers. It is consumed by the binary (`main.rs`), by host servers that
//! record into `DnsMetrics`, and by integration tests.

pub mod app_state;
pub mod config;
pub mod exposition;
pub mod obs;
pub mod ops;
pub mod router;
