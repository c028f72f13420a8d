//! Closest mask lookup
//!
//! One-shot nearest-neighbour queries of raw OCR snippets against catalog
//! names by Jaro-Winkler distance. No state is kept between calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{Catalog, CompanyId, MaskId};
use crate::text::distance::jaro_winkler_distance;

/// Companies kept by the first stage of the two-stage lookup
pub const DEFAULT_COMPANY_SHORTLIST: usize = 5;

/// Which catalog names a lookup compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClosestMode {
    /// Model names only
    #[default]
    Model,
    /// Company names only
    Company,
    /// Shortlist companies, then rank their masks by company + model distance
    CompanyModel,
}

/// A mask and how close the best snippet came to it
#[derive(Debug, Clone, PartialEq)]
pub struct MaskMatch {
    pub mask: MaskId,
    /// Snippet that produced the distance (the model snippet in two-stage lookups)
    pub snippet: String,
    pub distance: f64,
}

/// A company and how close the best snippet came to it
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyMatch {
    pub company: CompanyId,
    pub snippet: String,
    pub distance: f64,
}

/// Result of a lookup in any mode
#[derive(Debug, Clone, PartialEq)]
pub enum ClosestResult {
    Masks(Vec<MaskMatch>),
    Companies(Vec<CompanyMatch>),
}

impl ClosestResult {
    pub fn is_empty(&self) -> bool {
        match self {
            ClosestResult::Masks(matches) => matches.is_empty(),
            ClosestResult::Companies(matches) => matches.is_empty(),
        }
    }
}

/// Run a lookup in the given mode.
///
/// `model_snippets` is only used by [`ClosestMode::CompanyModel`]; when empty
/// the company snippets are reused for the model stage.
pub fn find_closest<S: AsRef<str>>(
    catalog: &Catalog,
    mode: ClosestMode,
    snippets: &[S],
    model_snippets: &[S],
    n: usize,
    company_shortlist: usize,
) -> ClosestResult {
    match mode {
        ClosestMode::Model => ClosestResult::Masks(closest_by_model(catalog, snippets, n)),
        ClosestMode::Company => ClosestResult::Companies(closest_by_company(catalog, snippets, n)),
        ClosestMode::CompanyModel => {
            let model_snippets = if model_snippets.is_empty() { snippets } else { model_snippets };
            ClosestResult::Masks(closest_by_company_then_model(
                catalog,
                snippets,
                model_snippets,
                n,
                company_shortlist,
            ))
        }
    }
}

/// The `n` masks whose model name is closest to any snippet
pub fn closest_by_model<S: AsRef<str>>(catalog: &Catalog, snippets: &[S], n: usize) -> Vec<MaskMatch> {
    let mut matches: Vec<MaskMatch> = catalog
        .masks()
        .iter()
        .filter_map(|mask| {
            best_snippet(snippets, mask.model()).map(|(snippet, distance)| MaskMatch {
                mask: mask.id(),
                snippet: snippet.to_string(),
                distance,
            })
        })
        .collect();

    sort_by_distance(&mut matches, |m| m.distance);
    matches.truncate(n);
    matches
}

/// The `n` companies whose name is closest to any snippet
pub fn closest_by_company<S: AsRef<str>>(catalog: &Catalog, snippets: &[S], n: usize) -> Vec<CompanyMatch> {
    let mut matches: Vec<CompanyMatch> = catalog
        .companies()
        .iter()
        .filter_map(|company| {
            best_snippet(snippets, company.name()).map(|(snippet, distance)| CompanyMatch {
                company: company.id(),
                snippet: snippet.to_string(),
                distance,
            })
        })
        .collect();

    sort_by_distance(&mut matches, |m| m.distance);
    matches.truncate(n);
    matches
}

/// Two-stage lookup: shortlist companies, then score their masks by the sum
/// of the company and model distances.
pub fn closest_by_company_then_model<S: AsRef<str>>(
    catalog: &Catalog,
    company_snippets: &[S],
    model_snippets: &[S],
    n: usize,
    company_shortlist: usize,
) -> Vec<MaskMatch> {
    if model_snippets.is_empty() {
        return Vec::new();
    }

    let shortlist = closest_by_company(catalog, company_snippets, company_shortlist);
    let company_distance = |id: CompanyId| {
        shortlist
            .iter()
            .find(|m| m.company == id)
            .map(|m| m.distance)
    };
    let shortlisted: BTreeSet<CompanyId> = shortlist.iter().map(|m| m.company).collect();

    let mut matches: Vec<MaskMatch> = catalog
        .masks()
        .iter()
        .filter(|mask| shortlisted.contains(&mask.company_id()))
        .filter_map(|mask| {
            let by_company = company_distance(mask.company_id())?;
            let (snippet, by_model) = best_snippet(model_snippets, mask.model())?;
            Some(MaskMatch {
                mask: mask.id(),
                snippet: snippet.to_string(),
                distance: by_company + by_model,
            })
        })
        .collect();

    sort_by_distance(&mut matches, |m| m.distance);
    matches.truncate(n);
    matches
}

/// Closest snippet to `target`; the first snippet wins ties
fn best_snippet<'a, S: AsRef<str>>(snippets: &'a [S], target: &str) -> Option<(&'a str, f64)> {
    let mut best: Option<(&'a str, f64)> = None;
    for snippet in snippets {
        let snippet = snippet.as_ref();
        let distance = jaro_winkler_distance(snippet, target);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((snippet, distance));
        }
    }
    best
}

/// Stable ascending sort, so equal distances keep catalog order
fn sort_by_distance<T>(items: &mut [T], distance: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MaskRecord;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            MaskRecord::new("3M", "9001"),
            MaskRecord::new("3M", "N95-8210"),
            MaskRecord::new("Honeywell", "H910"),
            MaskRecord::new("Moldex", "2200"),
            MaskRecord::new("Honeywell", "DC365"),
        ])
        .unwrap()
    }

    #[test]
    fn test_by_model_exact_match_first() {
        let catalog = catalog();
        let matches = closest_by_model(&catalog, &["9001"], 2);
        assert_eq!(matches.len(), 2);
        assert_eq!(catalog.mask(matches[0].mask).unwrap().model(), "9001");
        assert_eq!(matches[0].distance, 0.0);
        assert!(matches[0].distance < matches[1].distance);
    }

    #[test]
    fn test_by_model_two_entry_catalog() {
        let catalog = Catalog::from_records(vec![
            MaskRecord::new("3M", "9001"),
            MaskRecord::new("3M", "N95-8210"),
        ])
        .unwrap();
        let matches = closest_by_model(&catalog, &["9001"], 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].mask.index(), 0);
        assert_eq!(matches[0].distance, 0.0);
        assert_eq!(matches[0].snippet, "9001");
    }

    #[test]
    fn test_by_model_best_snippet_kept() {
        let catalog = catalog();
        let matches = closest_by_model(&catalog, &["qqqq", "H910"], 1);
        assert_eq!(catalog.mask(matches[0].mask).unwrap().model(), "H910");
        assert_eq!(matches[0].snippet, "H910");
    }

    #[test]
    fn test_by_company() {
        let catalog = catalog();
        let matches = closest_by_company(&catalog, &["Honeywel"], 3);
        assert_eq!(matches.len(), 3);
        assert_eq!(catalog.company(matches[0].company).unwrap().name(), "Honeywell");
        assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = catalog();
        // Nothing in common with any model: every distance is 1.0
        let matches = closest_by_model(&catalog, &["zzz"], 5);
        let order: Vec<usize> = matches.iter().map(|m| m.mask.index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(matches.iter().all(|m| m.distance == 1.0));
    }

    #[test]
    fn test_company_then_model() {
        let catalog = catalog();
        let matches = closest_by_company_then_model(&catalog, &["Honeywell"], &["H910"], 3, 1);
        // Only Honeywell survives the shortlist
        assert_eq!(matches.len(), 2);
        assert_eq!(catalog.mask(matches[0].mask).unwrap().model(), "H910");
        assert_eq!(matches[0].distance, 0.0);
        assert_eq!(catalog.mask(matches[1].mask).unwrap().model(), "DC365");
    }

    #[test]
    fn test_company_then_model_penalizes_both_sides() {
        let catalog = catalog();
        let matches = closest_by_company_then_model(&catalog, &["3M"], &["2200"], 5, 5);
        let moldex = matches
            .iter()
            .find(|m| catalog.mask(m.mask).unwrap().company() == "Moldex")
            .unwrap();
        // Model matches exactly, company does not
        assert!(moldex.distance > 0.0);
        assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_empty_inputs() {
        let catalog = catalog();
        let none: [&str; 0] = [];
        assert!(closest_by_model(&catalog, &none, 5).is_empty());
        assert!(closest_by_company(&catalog, &none, 5).is_empty());
        assert!(closest_by_company_then_model(&catalog, &["3M"], &none, 5, 5).is_empty());
        assert!(closest_by_company_then_model(&catalog, &none, &["9001"], 5, 5).is_empty());

        let empty = Catalog::from_records(vec![]).unwrap();
        assert!(closest_by_model(&empty, &["9001"], 5).is_empty());
        assert!(find_closest(&empty, ClosestMode::Company, &["3M"], &[], 5, 5).is_empty());
    }

    #[test]
    fn test_find_closest_reuses_snippets_for_model_stage() {
        let catalog = catalog();
        let result = find_closest(&catalog, ClosestMode::CompanyModel, &["Moldex", "2200"], &[], 1, 5);
        match result {
            ClosestResult::Masks(matches) => {
                assert_eq!(catalog.mask(matches[0].mask).unwrap().model(), "2200");
            }
            other => panic!("expected masks, got {:?}", other),
        }
    }
}
