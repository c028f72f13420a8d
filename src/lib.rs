//! mask-scanner - Identify respirator masks from noisy OCR text
//!
//! Scores a stream of OCR snippets against a mask catalog and reports the
//! mask (or at least the manufacturer) the camera is most likely looking at.

pub mod app;
pub mod catalog;
pub mod config;
pub mod search;
pub mod shared;
pub mod storage;
pub mod text;
pub mod vision;

pub use catalog::{Catalog, CatalogError, Company, CompanyId, Mask, MaskId, MaskRecord};
pub use search::{ScanGuess, ScanSession};
