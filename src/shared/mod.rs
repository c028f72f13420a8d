//! Shared state and messaging between the caller and the scan worker
//!
//! This module provides thread-safe shared state and message passing
//! for feeding OCR ticks to a background scan.

pub mod messages;
pub mod state;

pub use messages::{ScanCommand, ScanEvent, TickReport};
pub use state::{ScanRuntime, SharedScanState};
