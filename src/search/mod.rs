//! Search Layer
//!
//! Stateful camera searches that accumulate OCR evidence over time, and the
//! stateless closest-name lookup.

pub mod closest;
pub mod company;
pub mod evidence;
pub mod model;
pub mod session;
pub mod window;

pub use closest::{find_closest, ClosestMode, ClosestResult, CompanyMatch, MaskMatch};
pub use company::CompanySearch;
pub use evidence::EvidenceTracker;
pub use model::ModelSearch;
pub use session::{ScanGuess, ScanSession, ScanThresholds, SessionConfig};
pub use window::{ObservationWindow, SearchTuning};
