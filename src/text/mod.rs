//! Text Layer
//!
//! String distance and the normalization pipeline that turns noisy OCR
//! output and catalog names into comparable search tokens.

pub mod distance;
pub mod observed;
pub mod search_name;

pub use distance::jaro_winkler_distance;
pub use observed::{expand, ObservedTokens};
pub use search_name::{search_company_name, search_model_name};
