//! Per-entry evidence bookkeeping shared by the model and company searches

use std::collections::BTreeMap;

use super::window::{ObservationWindow, SearchTuning};

/// Observation windows keyed by catalog id.
///
/// Windows are created on an entry's first match and then either reinforced
/// or decayed on every tick.
#[derive(Debug, Clone)]
pub struct EvidenceTracker<K: Ord + Copy> {
    windows: BTreeMap<K, ObservationWindow>,
    tuning: SearchTuning,
}

impl<K: Ord + Copy> EvidenceTracker<K> {
    pub fn new(tuning: SearchTuning) -> Self {
        Self {
            windows: BTreeMap::new(),
            tuning,
        }
    }

    /// Apply one tick of raw weights.
    ///
    /// Weights are scaled so the strongest match this tick is 1.0. Matched
    /// entries are reinforced, previously seen but unmatched ones decay.
    pub fn apply(&mut self, mut weights: BTreeMap<K, f32>) {
        let max_weight = weights.values().copied().fold(0.0f32, f32::max);
        if max_weight > 0.0 {
            for weight in weights.values_mut() {
                *weight /= max_weight;
            }
        }

        for (&key, &weight) in &weights {
            if weight > 0.0 && !self.windows.contains_key(&key) {
                self.windows.insert(key, ObservationWindow::new(self.tuning));
            }
        }

        for (key, window) in self.windows.iter_mut() {
            match weights.get(key) {
                Some(&weight) if weight > 0.0 => window.push(weight),
                _ => window.decay(),
            }
        }
    }

    /// Entry with the highest aggregate weight, if it exceeds `min_weight`.
    ///
    /// Ties go to the lowest id.
    pub fn top(&self, min_weight: f32) -> Option<(K, f32)> {
        let mut best: Option<(K, f32)> = None;
        for (&key, window) in &self.windows {
            let weight = window.aggregate_weight();
            if best.map_or(true, |(_, best_weight)| weight > best_weight) {
                best = Some((key, weight));
            }
        }
        best.filter(|&(_, weight)| weight > min_weight)
    }

    /// Up to `n` entries ordered by aggregate weight, highest first
    pub fn ranked(&self, n: usize) -> Vec<(K, f32)> {
        let mut ranked: Vec<(K, f32)> = self
            .windows
            .iter()
            .map(|(&key, window)| (key, window.aggregate_weight()))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(n);
        ranked
    }

    pub fn window(&self, key: K) -> Option<&ObservationWindow> {
        self.windows.get(&key)
    }

    /// Number of entries that have ever been observed
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }

    /// Forget all evidence
    pub fn reset(&mut self) {
        self.windows.clear();
    }

    pub fn tuning(&self) -> SearchTuning {
        self.tuning
    }
}
