//! Named collection of metric families.
//!
//! Families are registered through `&mut Registry` during startup; once the
//! registry is shared behind an `Arc` its family table can no longer change.
//! Writers hold their own `Arc` to the family they update, so the table itself
//! is only read by `render`.

use std::fmt::Write;
use std::sync::Arc;

use skydns_core::error::{Result, SkyDnsError};

use super::metrics::{CounterVec, GaugeVec, HistogramVec};

/// One registered family.
#[derive(Clone)]
pub enum Family {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
    Histogram(Arc<HistogramVec>),
}

impl Family {
    fn type_name(&self) -> &'static str {
        match self {
            Family::Counter(_) => "counter",
            Family::Gauge(_) => "gauge",
            Family::Histogram(_) => "histogram",
        }
    }
}

struct Entry {
    name: String,
    help: String,
    family: Family,
}

pub struct Registry {
    namespace: String,
    subsystem: String,
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new(namespace: impl Into<String>, subsystem: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            subsystem: subsystem.into(),
            entries: Vec::new(),
        }
    }

    /// `namespace_subsystem_name`, skipping empty parts.
    pub fn fq_name(&self, name: &str) -> String {
        [self.namespace.as_str(), self.subsystem.as_str(), name]
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn register_counter(&mut self, name: &str, help: &str) -> Result<Arc<CounterVec>> {
        let c = Arc::new(CounterVec::default());
        self.insert(name, help, Family::Counter(Arc::clone(&c)))?;
        Ok(c)
    }

    pub fn register_gauge(&mut self, name: &str, help: &str) -> Result<Arc<GaugeVec>> {
        let g = Arc::new(GaugeVec::default());
        self.insert(name, help, Family::Gauge(Arc::clone(&g)))?;
        Ok(g)
    }

    pub fn register_histogram(
        &mut self,
        name: &str,
        help: &str,
        bounds: &[f64],
    ) -> Result<Arc<HistogramVec>> {
        let h = Arc::new(HistogramVec::new(bounds)?);
        self.insert(name, help, Family::Histogram(Arc::clone(&h)))?;
        Ok(h)
    }

    fn insert(&mut self, name: &str, help: &str, family: Family) -> Result<()> {
        let name = self.fq_name(name);
        if self.entries.iter().any(|e| e.name == name) {
            return Err(SkyDnsError::DuplicateMetric(name));
        }
        tracing::debug!(metric = %name, kind = family.type_name(), "metric registered");
        self.entries.push(Entry { name, help: help.to_string(), family });
        Ok(())
    }

    /// Fully-qualified family names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, fq_name: &str) -> Option<&Family> {
        self.entries.iter().find(|e| e.name == fq_name).map(|e| &e.family)
    }

    /// Render every family in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            let _ = writeln!(out, "# HELP {} {}", e.name, e.help.replace('\\', "\\\\").replace('\n', "\\n"));
            let _ = writeln!(out, "# TYPE {} {}", e.name, e.family.type_name());
            match &e.family {
                Family::Counter(c) => c.render(&e.name, &mut out),
                Family::Gauge(g) => g.render(&e.name, &mut out),
                Family::Histogram(h) => h.render(&e.name, &mut out),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fq_name_skips_empty_parts() {
        assert_eq!(Registry::new("", "skydns").fq_name("x"), "skydns_x");
        assert_eq!(Registry::new("ns", "skydns").fq_name("x"), "ns_skydns_x");
        assert_eq!(Registry::new("ns", "").fq_name("x"), "ns_x");
    }

    #[test]
    fn duplicate_name_is_rejected_across_kinds() {
        let mut r = Registry::new("", "skydns");
        r.register_counter("dup", "first").unwrap();
        let err = r.register_gauge("dup", "second").err().expect("must fail");
        assert_eq!(err.code().as_str(), "DUPLICATE_METRIC");
        assert_eq!(r.names().count(), 1);
    }

    #[test]
    fn render_emits_help_and_type_before_series() {
        let mut r = Registry::new("", "skydns");
        let c = r.register_counter("hits", "Hits.").unwrap();
        c.inc(&[]);
        assert!(matches!(r.get("skydns_hits"), Some(Family::Counter(_))));
        assert!(r.get("hits").is_none());
        assert_eq!(r.render(), "# HELP skydns_hits Hits.\n# TYPE skydns_hits counter\nskydns_hits 1\n");
    }
}
