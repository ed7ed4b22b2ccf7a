//! Metric primitives: counter, gauge and histogram families with labeled series.
//!
//! Series live in a `DashMap` keyed by the sorted label pairs, so concurrent
//! writers only contend on the shard holding their series. Values are atomics;
//! no update ever takes a lock that the exposition path also holds for long.
//!
//! Label pairs are `&'static str`: values come from closed vocabularies, so a
//! series key is a vector of borrowed pointers and recording never copies
//! label text.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use skydns_core::error::{Result, SkyDnsError};

pub type Labels<'a> = &'a [(&'static str, &'static str)];

type LabelKey = Vec<(&'static str, &'static str)>;

fn label_key(labels: Labels<'_>) -> LabelKey {
    let mut key = labels.to_vec();
    key.sort_unstable();
    key
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(key: &[(&str, &str)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `name{labels}` or bare `name` when there are no labels.
fn series_name(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{}{{{}}}", name, labels)
    }
}

/// Snapshot series in label order so scrapes are deterministic.
fn sorted_series<V, T>(map: &DashMap<LabelKey, V>, read: impl Fn(&V) -> T) -> Vec<(LabelKey, T)> {
    let mut rows: Vec<(LabelKey, T)> = map
        .iter()
        .map(|r| (r.key().clone(), read(r.value())))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: Labels<'_>) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: Labels<'_>, v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if it was never touched).
    pub fn get(&self, labels: Labels<'_>) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        for (key, val) in sorted_series(&self.map, |c| c.load(Ordering::Relaxed)) {
            let _ = writeln!(out, "{} {}", series_name(name, &label_str(&key)), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: Labels<'_>, v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    /// Overwrite the current value.
    pub fn set(&self, labels: Labels<'_>, v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: Labels<'_>) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        for (key, val) in sorted_series(&self.map, |g| g.load(Ordering::Relaxed)) {
            let _ = writeln!(out, "{} {}", series_name(name, &label_str(&key)), val);
        }
    }
}

/// Prometheus client default duration ladder (seconds).
pub const DEFAULT_BUCKETS: [f64; 11] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

struct AtomicHistogram {
    count: AtomicU64,
    // f64 bits; updated with a CAS loop.
    sum: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl AtomicHistogram {
    fn new(n: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0f64.to_bits()),
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn add_sum(&self, v: f64) {
        let mut cur = self.sum.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + v).to_bits();
            match self.sum.compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }

    fn snapshot(&self, bounds: &[f64]) -> HistogramSnapshot {
        HistogramSnapshot {
            buckets: bounds
                .iter()
                .zip(&self.buckets)
                .map(|(&le, c)| (le, c.load(Ordering::Relaxed)))
                .collect(),
            count: self.count.load(Ordering::Relaxed),
            sum: f64::from_bits(self.sum.load(Ordering::Relaxed)),
        }
    }
}

/// Point-in-time view of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// `(upper bound, cumulative count)` in ascending bound order.
    pub buckets: Vec<(f64, u64)>,
    pub count: u64,
    pub sum: f64,
}

pub struct HistogramVec {
    bounds: Vec<f64>,
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Build a family with fixed upper bounds. Bounds must be finite and
    /// strictly increasing; `+Inf` is implicit.
    pub fn new(bounds: &[f64]) -> Result<Self> {
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(SkyDnsError::BadConfig("histogram bounds must be finite".into()));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SkyDnsError::BadConfig(
                "histogram bounds must be strictly increasing".into(),
            ));
        }
        Ok(Self { bounds: bounds.to_vec(), map: DashMap::new() })
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Record one sample and increment cumulative buckets.
    /// Non-finite samples are dropped; one `NaN` would poison `_sum` for good.
    pub fn observe(&self, labels: Labels<'_>, v: f64) {
        if !v.is_finite() {
            tracing::debug!(value = v, "non-finite histogram sample dropped");
            return;
        }
        let n = self.bounds.len();
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicHistogram::new(n));

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.add_sum(v);

        // Cumulative Buckets: Increment ALL buckets larger than value
        for (i, &b) in self.bounds.iter().enumerate() {
            if v <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self, labels: Labels<'_>) -> Option<HistogramSnapshot> {
        self.map
            .get(&label_key(labels))
            .map(|h| h.snapshot(&self.bounds))
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        for (key, snap) in sorted_series(&self.map, |h| h.snapshot(&self.bounds)) {
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (le, count) in &snap.buckets {
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, snap.count);
            let _ = writeln!(out, "{} {}", series_name(&format!("{}_sum", name), &labels), snap.sum);
            let _ = writeln!(out, "{} {}", series_name(&format!("{}_count", name), &labels), snap.count);
        }
    }
}
