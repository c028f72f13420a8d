//! Application Configuration
//!
//! Scan tuning and matching thresholds stored in TOML format.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::search::closest::DEFAULT_COMPANY_SHORTLIST;
use crate::search::session::{
    ScanThresholds, SessionConfig, DEFAULT_COMPANY_MIN_WEIGHT, DEFAULT_MODEL_MIN_WEIGHT,
};
use crate::search::window::{SearchTuning, DEFAULT_DECAY_FACTOR, DEFAULT_WINDOW_SIZE};
use crate::vision::{ObservationFilter, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_TEXT_LEN};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-tick scan settings
    pub scan: ScanSettings,
    /// Candidate selection settings
    pub matching: MatchSettings,
    /// Catalog location
    pub catalog: CatalogSettings,
}

impl AppConfig {
    /// Everything a scan session needs
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            tuning: self.scan.tuning(),
            filter: self.scan.filter(),
            thresholds: self.matching.thresholds(),
        }
    }

    /// Reject values under which evidence would never fade or a partial
    /// window could win
    pub fn validate(&self) -> Result<()> {
        let scan = &self.scan;
        if !(scan.decay_factor > 0.0 && scan.decay_factor < 1.0) {
            bail!("scan.decay_factor must be between 0 and 1 (exclusive), got {}", scan.decay_factor);
        }
        if scan.window_size < 1 {
            bail!("scan.window_size must be at least 1");
        }
        if !(0.0..=1.0).contains(&scan.min_ocr_confidence) {
            bail!("scan.min_ocr_confidence must be between 0 and 1, got {}", scan.min_ocr_confidence);
        }

        let matching = &self.matching;
        if matching.model_min_weight.is_nan() || matching.model_min_weight < 0.0 {
            bail!("matching.model_min_weight must not be negative, got {}", matching.model_min_weight);
        }
        if matching.company_min_weight.is_nan() || matching.company_min_weight < 0.0 {
            bail!("matching.company_min_weight must not be negative, got {}", matching.company_min_weight);
        }
        Ok(())
    }
}

/// Settings applied to every tick of OCR output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Snippets at or below this OCR confidence are dropped
    pub min_ocr_confidence: f32,
    /// Snippets shorter than this many characters are dropped
    pub min_text_len: usize,
    /// Ticks a candidate must be observed before it can win
    pub window_size: usize,
    /// Multiplier applied to a candidate's weights on ticks it is not seen
    pub decay_factor: f32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            min_ocr_confidence: DEFAULT_MIN_CONFIDENCE,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            window_size: DEFAULT_WINDOW_SIZE,
            decay_factor: DEFAULT_DECAY_FACTOR,
        }
    }
}

impl ScanSettings {
    pub fn tuning(&self) -> SearchTuning {
        SearchTuning {
            window_size: self.window_size,
            decay_factor: self.decay_factor,
        }
    }

    pub fn filter(&self) -> ObservationFilter {
        ObservationFilter {
            min_confidence: self.min_ocr_confidence,
            min_text_len: self.min_text_len,
        }
    }
}

/// Thresholds and result sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Aggregate weight a mask must exceed
    pub model_min_weight: f32,
    /// Aggregate weight a company must exceed
    pub company_min_weight: f32,
    /// Results returned by closest lookups
    pub closest_count: usize,
    /// Companies kept by the first stage of company-model lookups
    pub company_shortlist: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            model_min_weight: DEFAULT_MODEL_MIN_WEIGHT,
            company_min_weight: DEFAULT_COMPANY_MIN_WEIGHT,
            closest_count: 5,
            company_shortlist: DEFAULT_COMPANY_SHORTLIST,
        }
    }
}

impl MatchSettings {
    pub fn thresholds(&self) -> ScanThresholds {
        ScanThresholds {
            model_min_weight: self.model_min_weight,
            company_min_weight: self.company_min_weight,
        }
    }
}

/// Catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog JSON used when none is given on the command line
    pub path: Option<PathBuf>,
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
