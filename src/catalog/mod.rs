//! Mask Catalog
//!
//! Read-only arena of masks and the companies that make them. Masks and
//! companies refer to each other by id only, so the catalog can be shared
//! freely between searches once built.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::text::search_name::{search_company_name, search_model_name, search_name_words};

pub use loader::{load_catalog, parse_catalog, CatalogDocument};

/// Errors raised while building a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The catalog document is not valid JSON
    #[error("failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),
    /// A mask cannot be grouped under any company
    #[error("mask #{index} ({model:?}) has no company name")]
    MissingCompany { index: usize, model: String },
}

/// Opaque identifier of a mask within its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaskId(usize);

impl MaskId {
    /// Position of the mask in catalog order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Opaque identifier of a company within its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(usize);

impl CompanyId {
    /// Position of the company in name order
    pub fn index(self) -> usize {
        self.0
    }
}

/// A mask as published in the catalog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskRecord {
    pub company: String,
    pub model: String,
    pub countries_of_origin: Vec<String>,
    pub respirator_type: String,
    pub valve_type: String,
    pub url_company: String,
    pub url_instructions: String,
    pub url_source: String,
    pub date_last_updated: String,
}

impl MaskRecord {
    /// Create a record with only the fields that matter for matching
    pub fn new(company: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Whether the respirator type denotes a surgical mask
    pub fn is_surgical_mask(&self) -> bool {
        match self.respirator_type.as_str() {
            "SURGICAL_MASK_EUA" | "SURGICAL_MASK_FDA" | "SURGICAL_MASK_FDA_POTENTIALLY_RECALLED" => true,
            "RESPIRATOR_EUA"
            | "RESPIRATOR_EUA_EXPIRED_AUTH"
            | "RESPIRATOR_N95_NIOSH"
            | "RESPIRATOR_N95_NIOSH_FDA" => false,
            other => {
                warn!("Unrecognized respirator type {:?} for {}", other, self.model);
                false
            }
        }
    }
}

/// A catalogued mask with its precomputed search name
#[derive(Debug, Clone)]
pub struct Mask {
    id: MaskId,
    company_id: CompanyId,
    record: MaskRecord,
    search_model: String,
}

impl Mask {
    pub fn id(&self) -> MaskId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn company(&self) -> &str {
        &self.record.company
    }

    pub fn model(&self) -> &str {
        &self.record.model
    }

    /// Normalized model name, empty when the model is too generic to match
    pub fn search_model(&self) -> &str {
        &self.search_model
    }

    pub fn record(&self) -> &MaskRecord {
        &self.record
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.record.company, self.record.model)
    }
}

/// A company grouping all masks published under its name
#[derive(Debug, Clone)]
pub struct Company {
    id: CompanyId,
    name: String,
    search_name: String,
    search_name_words: Vec<String>,
    masks: Vec<MaskId>,
}

impl Company {
    pub fn id(&self) -> CompanyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn search_name(&self) -> &str {
        &self.search_name
    }

    pub fn search_name_words(&self) -> &[String] {
        &self.search_name_words
    }

    /// Masks owned by this company, in catalog order
    pub fn mask_ids(&self) -> &[MaskId] {
        &self.masks
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reference links published alongside the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSources {
    pub url_fda: String,
    pub url_niosh: String,
    pub url_emergency: String,
    pub url_dev: String,
}

/// Immutable set of masks grouped by company
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    masks: Vec<Mask>,
    companies: Vec<Company>,
    sources: CatalogSources,
}

impl Catalog {
    /// Build a catalog from mask records.
    ///
    /// Masks keep their input order; companies are sorted by name.
    pub fn from_records(records: Vec<MaskRecord>) -> Result<Self, CatalogError> {
        Self::with_sources(records, CatalogSources::default())
    }

    /// Build a catalog from mask records and their reference links
    pub fn with_sources(records: Vec<MaskRecord>, sources: CatalogSources) -> Result<Self, CatalogError> {
        let mut grouped: BTreeMap<String, Vec<MaskId>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            if record.company.trim().is_empty() {
                return Err(CatalogError::MissingCompany {
                    index,
                    model: record.model.clone(),
                });
            }
            grouped
                .entry(record.company.clone())
                .or_default()
                .push(MaskId(index));
        }

        let mut company_of_mask = vec![CompanyId(0); records.len()];
        let companies: Vec<Company> = grouped
            .into_iter()
            .enumerate()
            .map(|(index, (name, masks))| {
                let id = CompanyId(index);
                for mask_id in &masks {
                    company_of_mask[mask_id.0] = id;
                }
                let search_name = search_company_name(&name);
                let search_name_words = search_name_words(&search_name);
                Company {
                    id,
                    name,
                    search_name,
                    search_name_words,
                    masks,
                }
            })
            .collect();

        let masks: Vec<Mask> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Mask {
                id: MaskId(index),
                company_id: company_of_mask[index],
                search_model: search_model_name(&record.model),
                record,
            })
            .collect();

        info!(
            "Built catalog with {} masks from {} companies",
            masks.len(),
            companies.len()
        );

        Ok(Self {
            masks,
            companies,
            sources,
        })
    }

    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn sources(&self) -> &CatalogSources {
        &self.sources
    }

    pub fn mask(&self, id: MaskId) -> Option<&Mask> {
        self.masks.get(id.0)
    }

    pub fn company(&self, id: CompanyId) -> Option<&Company> {
        self.companies.get(id.0)
    }

    /// Company that owns the given mask
    pub fn company_of(&self, mask: &Mask) -> Option<&Company> {
        self.company(mask.company_id)
    }

    /// Masks owned by the given company, in catalog order
    pub fn masks_of<'a>(&'a self, company: &'a Company) -> impl Iterator<Item = &'a Mask> + 'a {
        company.masks.iter().filter_map(move |id| self.mask(*id))
    }

    /// Look a company up by its display name
    pub fn find_company(&self, name: &str) -> Option<&Company> {
        self.companies
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.companies[index])
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<MaskRecord> {
        vec![
            MaskRecord::new("Moldex", "2200 N95"),
            MaskRecord::new("3M", "8210"),
            MaskRecord::new("Honeywell", "H910"),
            MaskRecord::new("3M", "Aura 9205+"),
        ]
    }

    #[test]
    fn test_masks_keep_input_order() {
        let catalog = Catalog::from_records(sample_records()).unwrap();
        let models: Vec<&str> = catalog.masks().iter().map(|m| m.model()).collect();
        assert_eq!(models, vec!["2200 N95", "8210", "H910", "Aura 9205+"]);
        assert_eq!(catalog.masks()[2].id().index(), 2);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_companies_grouped_and_sorted() {
        let catalog = Catalog::from_records(sample_records()).unwrap();
        let names: Vec<&str> = catalog.companies().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["3M", "Honeywell", "Moldex"]);

        let three_m = catalog.find_company("3M").unwrap();
        let models: Vec<&str> = catalog.masks_of(three_m).map(|m| m.model()).collect();
        assert_eq!(models, vec!["8210", "Aura 9205+"]);
    }

    #[test]
    fn test_mask_back_links_resolve() {
        let catalog = Catalog::from_records(sample_records()).unwrap();
        for mask in catalog.masks() {
            let company = catalog.company_of(mask).unwrap();
            assert_eq!(company.name(), mask.company());
            assert!(company.mask_ids().contains(&mask.id()));
        }
    }

    #[test]
    fn test_search_names_precomputed() {
        let catalog = Catalog::from_records(vec![
            MaskRecord::new("3M Corp.", "Model 8210"),
            MaskRecord::new("Acme Medical Co., Ltd.", "Surgical Mask"),
        ])
        .unwrap();

        assert_eq!(catalog.masks()[0].search_model(), "8210");
        assert_eq!(catalog.masks()[1].search_model(), "");

        let acme = catalog.find_company("Acme Medical Co., Ltd.").unwrap();
        assert_eq!(acme.search_name(), "acme");
        assert_eq!(acme.search_name_words(), &["acme".to_string()]);
    }

    #[test]
    fn test_missing_company_rejected() {
        let result = Catalog::from_records(vec![MaskRecord::new("3M", "8210"), MaskRecord::new("  ", "9001")]);
        match result {
            Err(CatalogError::MissingCompany { index, model }) => {
                assert_eq!(index, 1);
                assert_eq!(model, "9001");
            }
            other => panic!("expected MissingCompany, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_records(vec![]).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.companies().is_empty());
        assert!(catalog.find_company("3M").is_none());
    }

    #[test]
    fn test_is_surgical_mask() {
        let mut record = MaskRecord::new("Acme", "A1");
        record.respirator_type = "SURGICAL_MASK_FDA".to_string();
        assert!(record.is_surgical_mask());
        record.respirator_type = "RESPIRATOR_N95_NIOSH".to_string();
        assert!(!record.is_surgical_mask());
        record.respirator_type = "SOMETHING_ELSE".to_string();
        assert!(!record.is_surgical_mask());
    }

    #[test]
    fn test_display() {
        let catalog = Catalog::from_records(sample_records()).unwrap();
        assert_eq!(catalog.masks()[1].to_string(), "3M : 8210");
        assert_eq!(catalog.companies()[1].to_string(), "Honeywell");
    }
}
