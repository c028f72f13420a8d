//! Scan session
//!
//! Runs both camera searches over the same stream of ticks and resolves the
//! current best guess: a mask when the model search is confident, otherwise
//! a company, otherwise nothing.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Catalog, Company, CompanyId, Mask, MaskId};
use crate::text::observed::{expand, ObservedTokens};
use crate::vision::{filter_observations, ObservationFilter, TextObservation};

use super::company::CompanySearch;
use super::model::ModelSearch;
use super::window::SearchTuning;

/// Default aggregate weight a mask must exceed to be reported
pub const DEFAULT_MODEL_MIN_WEIGHT: f32 = 0.5;

/// Default aggregate weight a company must exceed to be reported
pub const DEFAULT_COMPANY_MIN_WEIGHT: f32 = 0.5;

/// Confidence gates for the two searches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanThresholds {
    pub model_min_weight: f32,
    pub company_min_weight: f32,
}

impl Default for ScanThresholds {
    fn default() -> Self {
        Self {
            model_min_weight: DEFAULT_MODEL_MIN_WEIGHT,
            company_min_weight: DEFAULT_COMPANY_MIN_WEIGHT,
        }
    }
}

/// Everything a session needs besides the catalog
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionConfig {
    pub tuning: SearchTuning,
    pub filter: ObservationFilter,
    pub thresholds: ScanThresholds,
}

/// Current answer of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanGuess {
    /// A specific mask was identified
    Mask { mask: MaskId },
    /// Only the manufacturer could be identified
    Company { company: CompanyId },
    /// Not enough evidence yet
    #[default]
    Nothing,
}

/// Stateful scorer fed one batch of OCR output per tick
#[derive(Debug, Clone)]
pub struct ScanSession {
    catalog: Arc<Catalog>,
    models: ModelSearch,
    companies: CompanySearch,
    config: SessionConfig,
    ticks: u64,
}

impl ScanSession {
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig) -> Self {
        Self {
            models: ModelSearch::new(catalog.clone(), config.tuning),
            companies: CompanySearch::new(catalog.clone(), config.tuning),
            catalog,
            config,
            ticks: 0,
        }
    }

    /// Process one tick of raw OCR observations.
    ///
    /// Weak snippets are dropped by the session's filter first. Returns the
    /// tokens the tick was reduced to.
    pub fn ingest(&mut self, observations: &[TextObservation]) -> ObservedTokens {
        let texts = filter_observations(observations, &self.config.filter);
        self.observe_texts(&texts)
    }

    /// Process one tick of already filtered texts
    pub fn observe_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> ObservedTokens {
        let tokens = expand(texts);
        self.observe_tokens(&tokens);
        tokens
    }

    /// Process one tick of already expanded tokens
    pub fn observe_tokens(&mut self, tokens: &ObservedTokens) {
        self.ticks += 1;
        debug!(
            "Tick {}: {} model tokens, {} company tokens",
            self.ticks,
            tokens.models.len(),
            tokens.companies.len()
        );
        self.models.observe(&tokens.models);
        self.companies.observe(&tokens.companies);
    }

    /// Confidently identified mask, if any
    pub fn top_mask(&self) -> Option<&Mask> {
        self.models.top_mask(self.config.thresholds.model_min_weight)
    }

    /// Confidently identified company, if any
    pub fn top_company(&self) -> Option<&Company> {
        self.companies
            .top_company(self.config.thresholds.company_min_weight)
    }

    /// Mask first, company as a fallback
    pub fn best_guess(&self) -> ScanGuess {
        if let Some(mask) = self.top_mask() {
            return ScanGuess::Mask { mask: mask.id() };
        }
        if let Some(company) = self.top_company() {
            return ScanGuess::Company {
                company: company.id(),
            };
        }
        ScanGuess::Nothing
    }

    /// Human readable form of a guess
    pub fn describe(&self, guess: ScanGuess) -> String {
        match guess {
            ScanGuess::Mask { mask } => self
                .catalog
                .mask(mask)
                .map(|m| m.to_string())
                .unwrap_or_default(),
            ScanGuess::Company { company } => self
                .catalog
                .company(company)
                .map(|c| c.to_string())
                .unwrap_or_default(),
            ScanGuess::Nothing => String::new(),
        }
    }

    /// Forget all evidence and start a new scan
    pub fn reset(&mut self) {
        self.models.reset();
        self.companies.reset();
        self.ticks = 0;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn models(&self) -> &ModelSearch {
        &self.models
    }

    pub fn companies(&self) -> &CompanySearch {
        &self.companies
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
