//! Camera search by model name
//!
//! A token supports every mask whose search model contains it. The weight is
//! the fraction of the search model the token covers, so "8210" is strong
//! evidence for "8210" and weak evidence for "8210 plus 8210v".

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Catalog, Mask, MaskId};

use super::evidence::EvidenceTracker;
use super::window::SearchTuning;

/// Evidence accumulator over catalog masks
#[derive(Debug, Clone)]
pub struct ModelSearch {
    catalog: Arc<Catalog>,
    evidence: EvidenceTracker<MaskId>,
}

impl ModelSearch {
    pub fn new(catalog: Arc<Catalog>, tuning: SearchTuning) -> Self {
        Self {
            catalog,
            evidence: EvidenceTracker::new(tuning),
        }
    }

    /// Feed one tick of observed model tokens
    pub fn observe<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let weights = self.collect_weights(tokens);
        self.evidence.apply(weights);

        if tracing::enabled!(tracing::Level::DEBUG) {
            for (mask, weight) in self.ranked(3) {
                debug!("Mask candidate {} ~ {:?}: weight {:.3}", mask, mask.search_model(), weight);
            }
        }
    }

    /// Best mask if its aggregate weight exceeds `min_weight`
    pub fn top_mask(&self, min_weight: f32) -> Option<&Mask> {
        self.evidence
            .top(min_weight)
            .and_then(|(id, _)| self.catalog.mask(id))
    }

    /// Up to `n` tracked masks with their aggregate weights, best first
    pub fn ranked(&self, n: usize) -> Vec<(&Mask, f32)> {
        self.evidence
            .ranked(n)
            .into_iter()
            .filter_map(|(id, weight)| self.catalog.mask(id).map(|mask| (mask, weight)))
            .collect()
    }

    pub fn evidence(&self) -> &EvidenceTracker<MaskId> {
        &self.evidence
    }

    pub fn reset(&mut self) {
        self.evidence.reset();
    }

    /// Strongest per-token weight for every mask matched this tick
    fn collect_weights<I, S>(&self, tokens: I) -> BTreeMap<MaskId, f32>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut weights: BTreeMap<MaskId, f32> = BTreeMap::new();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }
            let token_len = token.chars().count() as f32;

            for mask in self.catalog.masks() {
                let search_model = mask.search_model();
                if search_model.is_empty() || !search_model.contains(token) {
                    continue;
                }
                let weight = token_len / search_model.chars().count() as f32;
                let entry = weights.entry(mask.id()).or_insert(0.0);
                *entry = entry.max(weight);
            }
        }
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MaskRecord;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_records(vec![
                MaskRecord::new("3M", "8210"),
                MaskRecord::new("3M", "8210 Plus"),
                MaskRecord::new("Honeywell", "H910"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_weight_is_fraction_of_model_covered() {
        let search = ModelSearch::new(catalog(), SearchTuning::default());
        let weights = search.collect_weights(["8210"]);

        let ids: Vec<usize> = weights.keys().map(|id| id.index()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert!((weights.values().next().unwrap() - 1.0).abs() < 1e-6);
        // "8210" covers 4 of the 9 characters of "8210 plus"
        assert!((weights.values().nth(1).unwrap() - 4.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_weight_across_tokens() {
        let search = ModelSearch::new(catalog(), SearchTuning::default());
        let weights = search.collect_weights(["plus", "8210 plus", "82"]);
        let plus = weights.iter().find(|(id, _)| id.index() == 1).unwrap().1;
        assert!((plus - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_exact_token_wins_after_full_window() {
        let mut search = ModelSearch::new(catalog(), SearchTuning::default());
        for _ in 0..9 {
            search.observe(["h910"]);
            assert!(search.top_mask(0.5).is_none());
        }
        search.observe(["h910"]);
        assert_eq!(search.top_mask(0.5).unwrap().model(), "H910");
    }

    #[test]
    fn test_evidence_fades_without_observations() {
        let mut search = ModelSearch::new(catalog(), SearchTuning::default());
        for _ in 0..10 {
            search.observe(["h910"]);
        }
        let empty: [&str; 0] = [];

        // 0.9^6 is still above the gate, 0.9^7 is not
        for _ in 0..6 {
            search.observe(empty);
        }
        assert!(search.top_mask(0.5).is_some());

        for _ in 0..2 {
            search.observe(empty);
        }
        assert!(search.top_mask(0.5).is_none());
    }

    #[test]
    fn test_generic_model_never_matches() {
        let catalog = Arc::new(
            Catalog::from_records(vec![MaskRecord::new("Acme", "Surgical Mask")]).unwrap(),
        );
        let mut search = ModelSearch::new(catalog, SearchTuning::default());
        for _ in 0..10 {
            search.observe(["acme", "surgical"]);
        }
        assert!(search.top_mask(0.0).is_none());
        assert_eq!(search.evidence().tracked(), 0);
    }

    #[test]
    fn test_ranked_orders_by_weight() {
        let mut search = ModelSearch::new(catalog(), SearchTuning::default());
        for _ in 0..10 {
            search.observe(["8210"]);
        }
        let ranked: Vec<&str> = search.ranked(3).into_iter().map(|(m, _)| m.model()).collect();
        assert_eq!(ranked, vec!["8210", "8210 Plus"]);

        search.reset();
        assert!(search.ranked(3).is_empty());
    }
}
