//! Catalog document loading

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::{Catalog, CatalogError, CatalogSources, MaskRecord};

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    pub masks: Vec<MaskRecord>,
    #[serde(flatten)]
    pub sources: CatalogSources,
}

impl CatalogDocument {
    /// Group the masks and precompute their search names
    pub fn into_catalog(self) -> Result<Catalog, CatalogError> {
        Catalog::with_sources(self.masks, self.sources)
    }
}

/// Parse a catalog from its JSON text
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_str(json)?;
    document.into_catalog()
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&content)?;
    info!("Loaded catalog from {:?}", path);
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "masks": [
            {
                "company": "3M",
                "model": "8210",
                "countries_of_origin": ["USA"],
                "respirator_type": "RESPIRATOR_N95_NIOSH",
                "valve_type": "NONE"
            },
            { "company": "Honeywell", "model": "H910" }
        ],
        "url_fda": "https://example.org/fda",
        "url_niosh": "https://example.org/niosh"
    }"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.companies().len(), 2);

        let first = &catalog.masks()[0];
        assert_eq!(first.search_model(), "8210");
        assert_eq!(first.record().countries_of_origin, vec!["USA".to_string()]);
        assert!(!first.record().is_surgical_mask());

        // Missing fields fall back to defaults
        let second = &catalog.masks()[1];
        assert!(second.record().respirator_type.is_empty());
        assert_eq!(catalog.sources().url_fda, "https://example.org/fda");
        assert!(catalog.sources().url_dev.is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        let catalog = parse_catalog("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_catalog("{ not json");
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", SAMPLE).unwrap();

        let catalog = load_catalog(temp_file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_catalog_file_not_found() {
        let result = load_catalog(Path::new("/nonexistent/path/catalog.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
