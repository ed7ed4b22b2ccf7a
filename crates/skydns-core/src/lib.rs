//! SkyDNS core: error types and the closed label vocabularies shared by the
//! metrics registry and the DNS server that reports into it.
//!
//! This crate carries no runtime dependencies so the host server can depend on
//! the label types without pulling in the HTTP exposition stack.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod labels;

/// Shared result type.
pub use error::{Result, SkyDnsError};
pub use labels::{BackendKind, CacheKind, ErrorClass, ExternalKind, LabelValue, Transport};
