//! Camera search by company name
//!
//! Company names are noisy, so a token only counts when it equals one of the
//! company's search words. Each matched word is worth an equal share of the
//! name.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Catalog, Company, CompanyId};

use super::evidence::EvidenceTracker;
use super::window::SearchTuning;

/// Evidence accumulator over catalog companies
#[derive(Debug, Clone)]
pub struct CompanySearch {
    catalog: Arc<Catalog>,
    evidence: EvidenceTracker<CompanyId>,
}

impl CompanySearch {
    pub fn new(catalog: Arc<Catalog>, tuning: SearchTuning) -> Self {
        Self {
            catalog,
            evidence: EvidenceTracker::new(tuning),
        }
    }

    /// Feed one tick of observed company tokens
    pub fn observe<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let weights = self.collect_weights(tokens);
        self.evidence.apply(weights);

        if tracing::enabled!(tracing::Level::DEBUG) {
            for (company, weight) in self.ranked(3) {
                debug!("Company candidate {} ~ {:?}: weight {:.3}", company, company.search_name(), weight);
            }
        }
    }

    /// Best company if its aggregate weight exceeds `min_weight`
    pub fn top_company(&self, min_weight: f32) -> Option<&Company> {
        self.evidence
            .top(min_weight)
            .and_then(|(id, _)| self.catalog.company(id))
    }

    /// Up to `n` tracked companies with their aggregate weights, best first
    pub fn ranked(&self, n: usize) -> Vec<(&Company, f32)> {
        self.evidence
            .ranked(n)
            .into_iter()
            .filter_map(|(id, weight)| self.catalog.company(id).map(|company| (company, weight)))
            .collect()
    }

    pub fn evidence(&self) -> &EvidenceTracker<CompanyId> {
        &self.evidence
    }

    pub fn reset(&mut self) {
        self.evidence.reset();
    }

    /// Summed word shares for every company matched this tick
    fn collect_weights<I, S>(&self, tokens: I) -> BTreeMap<CompanyId, f32>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut weights: BTreeMap<CompanyId, f32> = BTreeMap::new();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }

            for company in self.catalog.companies() {
                let words = company.search_name_words();
                if !words.iter().any(|word| word == token) {
                    continue;
                }
                *weights.entry(company.id()).or_insert(0.0) += 1.0 / words.len() as f32;
            }
        }
        weights
    }
}
