//! Observation windows
//!
//! Each catalog entry that has ever matched keeps a short history of match
//! weights. The history only counts once it is full, and fades while the
//! entry is not seen again.

use std::collections::VecDeque;

/// Observations needed before an entry can be trusted
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Per-tick fade applied to entries that were not observed
pub const DEFAULT_DECAY_FACTOR: f32 = 0.9;

/// Shape of the evidence window shared by all entries of a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTuning {
    /// Number of observations kept per entry
    pub window_size: usize,
    /// Multiplier applied to stale observations each tick (0.0 - 1.0)
    pub decay_factor: f32,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            decay_factor: DEFAULT_DECAY_FACTOR,
        }
    }
}

/// Bounded FIFO of recent match weights for one entry
#[derive(Debug, Clone)]
pub struct ObservationWindow {
    weights: VecDeque<f32>,
    capacity: usize,
    decay_factor: f32,
}

impl ObservationWindow {
    /// Create an empty window
    pub fn new(tuning: SearchTuning) -> Self {
        let capacity = tuning.window_size.max(1);
        Self {
            weights: VecDeque::with_capacity(capacity + 1),
            capacity,
            decay_factor: tuning.decay_factor,
        }
    }

    /// Record a weight, evicting the oldest once over capacity.
    ///
    /// Zero (and anything not strictly positive) is not an observation.
    pub fn push(&mut self, weight: f32) {
        if weight > 0.0 {
            self.weights.push_back(weight);
        }
        while self.weights.len() > self.capacity {
            self.weights.pop_front();
        }
    }

    /// Fade every stored weight
    pub fn decay(&mut self) {
        for weight in self.weights.iter_mut() {
            *weight *= self.decay_factor;
        }
    }

    /// Mean of the stored weights, or 0.0 until the window is full
    pub fn aggregate_weight(&self) -> f32 {
        if !self.is_full() {
            return 0.0;
        }
        self.weights.iter().sum::<f32>() / self.capacity as f32
    }

    pub fn is_full(&self) -> bool {
        self.weights.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Stored weights, oldest first
    pub fn weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.weights.iter().copied()
    }
}

impl Default for ObservationWindow {
    fn default() -> Self {
        Self::new(SearchTuning::default())
    }
}
