//! Shared scan state between the caller and the scan worker

use crate::config::AppConfig;
use crate::search::ScanGuess;

/// Central shared state published by the scan worker
#[derive(Debug, Clone, Default)]
pub struct SharedScanState {
    /// Application configuration the worker was started with
    pub config: AppConfig,
    /// Runtime state (not persisted)
    pub runtime: ScanRuntime,
}

impl SharedScanState {
    /// Create a new shared state with the given configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            runtime: ScanRuntime::default(),
        }
    }
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct ScanRuntime {
    /// Whether the worker thread is running
    pub is_running: bool,
    /// Ticks processed since the last reset
    pub ticks_processed: u64,
    /// Ticks dropped because a search was still in progress
    pub dropped_ticks: u64,
    /// Current best guess
    pub guess: ScanGuess,
    /// Display form of the current guess
    pub guess_label: Option<String>,
    /// Last error message (if any)
    pub last_error: Option<String>,
}

impl ScanRuntime {
    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Record a new guess
    pub fn set_guess(&mut self, guess: ScanGuess, label: String) {
        self.guess = guess;
        self.guess_label = if label.is_empty() { None } else { Some(label) };
    }

    /// Back to the state of a fresh scan, keeping counters of dropped ticks
    pub fn reset_scan(&mut self) {
        self.ticks_processed = 0;
        self.guess = ScanGuess::Nothing;
        self.guess_label = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, MaskId, MaskRecord};

    fn mask_ids() -> Vec<MaskId> {
        Catalog::from_records(vec![MaskRecord::new("3M", "8210"), MaskRecord::new("3M", "9001")])
            .unwrap()
            .masks()
            .iter()
            .map(|mask| mask.id())
            .collect()
    }

    #[test]
    fn test_set_and_clear_error() {
        let mut runtime = ScanRuntime::default();
        runtime.set_error("catalog missing");
        assert_eq!(runtime.last_error.as_deref(), Some("catalog missing"));
        runtime.clear_error();
        assert!(runtime.last_error.is_none());
    }

    #[test]
    fn test_guess_label_empty_is_none() {
        let ids = mask_ids();
        let mut runtime = ScanRuntime::default();
        runtime.set_guess(ScanGuess::Nothing, String::new());
        assert!(runtime.guess_label.is_none());

        runtime.set_guess(ScanGuess::Mask { mask: ids[0] }, "3M : 8210".to_string());
        assert_eq!(runtime.guess_label.as_deref(), Some("3M : 8210"));
    }

    #[test]
    fn test_reset_scan_keeps_dropped_ticks() {
        let ids = mask_ids();
        let mut runtime = ScanRuntime {
            ticks_processed: 12,
            dropped_ticks: 3,
            ..Default::default()
        };
        runtime.set_guess(ScanGuess::Mask { mask: ids[1] }, "3M : 9001".to_string());
        runtime.reset_scan();
        assert_eq!(runtime.ticks_processed, 0);
        assert_eq!(runtime.dropped_ticks, 3);
        assert_eq!(runtime.guess, ScanGuess::Nothing);
        assert!(runtime.guess_label.is_none());
    }
}
