//! Closed-interval band tables
//!
//! Every rulebook table that maps a number (age, BMI, EMR) onto a value is a
//! list of `[lo, hi]` bands. A lookup that falls outside every band returns
//! `None`; callers decide what "no match" means for their table.

use serde::{Deserialize, Serialize};

/// One closed interval `[lo, hi]` carrying a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band<K, V> {
    pub lo: K,
    pub hi: K,
    pub value: V,
}

impl<K: PartialOrd + Copy, V> Band<K, V> {
    pub fn new(lo: K, hi: K, value: V) -> Self {
        Self { lo, hi, value }
    }

    pub fn contains(&self, key: K) -> bool {
        self.lo <= key && key <= self.hi
    }
}

/// Ordered list of bands, searched first to last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandTable<K, V> {
    bands: Vec<Band<K, V>>,
}

impl<K: PartialOrd + Copy, V> BandTable<K, V> {
    pub fn new(bands: Vec<Band<K, V>>) -> Self {
        Self { bands }
    }

    /// Value of the first band containing `key`
    pub fn lookup(&self, key: K) -> Option<&V> {
        self.bands.iter().find(|b| b.contains(key)).map(|b| &b.value)
    }

    /// Value of the first band whose upper bound is at or above `key`
    ///
    /// Keys falling in the gap between two integer-bounded bands resolve to
    /// the higher band; keys above the last band resolve to the last band.
    pub fn lookup_ceiling(&self, key: K) -> Option<&V> {
        self.bands
            .iter()
            .find(|b| key <= b.hi)
            .or_else(|| self.bands.last())
            .map(|b| &b.value)
    }

    pub fn bands(&self) -> &[Band<K, V>] {
        &self.bands
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Returns the first band that is inverted (`lo > hi`), if any
    pub fn first_inverted(&self) -> Option<&Band<K, V>> {
        self.bands.iter().find(|b| b.lo > b.hi)
    }
}

/// Surcharge keyed by how many items are simultaneously present
///
/// Counts below the first step add nothing; counts above the last step are
/// capped at the last step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeTable {
    /// `(count, points)` pairs in ascending count order
    steps: Vec<(u32, f64)>,
}

impl SurchargeTable {
    pub fn new(steps: Vec<(u32, f64)>) -> Self {
        Self { steps }
    }

    /// Surcharge for `count` active items
    pub fn surcharge(&self, count: u32) -> f64 {
        let (first, cap) = match (self.steps.first(), self.steps.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => return 0.0,
        };
        if count < first {
            return 0.0;
        }
        let key = count.min(cap);
        self.steps
            .iter()
            .find(|(n, _)| *n == key)
            .map(|(_, points)| *points)
            .unwrap_or(0.0)
    }

    /// Largest count the table distinguishes
    pub fn cap(&self) -> u32 {
        self.steps.last().map(|(n, _)| *n).unwrap_or(0)
    }
}
