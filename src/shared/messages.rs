//! Message types for communication between the caller and the scan worker

use crate::search::ScanGuess;
use crate::vision::TextObservation;

/// Commands sent from the caller to the scan worker
#[derive(Debug, Clone)]
pub enum ScanCommand {
    /// Process one tick of OCR output
    Tick(Vec<TextObservation>),
    /// Forget all evidence and start a new scan
    Reset,
    /// Request the worker to shutdown
    Shutdown,
}

/// Events sent from the scan worker back to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// Worker thread has started
    Started,
    /// A tick was processed
    TickProcessed(TickReport),
    /// Evidence was cleared
    Reset,
    /// Worker thread has stopped
    Stopped,
}

/// Outcome of one processed tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Ticks processed since the last reset
    pub tick: u64,
    /// Best guess after this tick
    pub guess: ScanGuess,
    /// Display form of the guess, empty for nothing
    pub label: String,
    /// Whether the guess differs from the previous tick
    pub changed: bool,
}
