pub mod builtin;
pub mod schema;

use crate::error::FasalError;
use schema::CropCatalog;
use std::collections::HashSet;
use std::path::Path;

/// Load a crop catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<CropCatalog, FasalError> {
    let content = std::fs::read_to_string(path).map_err(|e| FasalError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_catalog(&content, path)
}

/// Parse a crop catalog from a JSON string.
pub fn parse_catalog(json: &str, source: &Path) -> Result<CropCatalog, FasalError> {
    let catalog: CropCatalog = serde_json::from_str(json).map_err(|e| FasalError::CatalogLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_catalog(&catalog)?;
    tracing::debug!(
        source = %source.display(),
        crops = catalog.crops.len(),
        "loaded crop catalog"
    );
    Ok(catalog)
}

/// Parse a crop catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<CropCatalog, FasalError> {
    let catalog: CropCatalog = serde_json::from_str(json).map_err(FasalError::Json)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Validate that a catalog is well-formed.
///
/// Band invariants are enforced while deserializing; this covers the
/// table-level rules.
pub fn validate_catalog(catalog: &CropCatalog) -> Result<(), FasalError> {
    if catalog.crops.is_empty() {
        return Err(FasalError::CatalogInvalid("crops must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for crop in &catalog.crops {
        if crop.id.trim().is_empty() {
            return Err(FasalError::CatalogInvalid(
                "crop id must not be empty".into(),
            ));
        }

        if !seen.insert(crop.id.to_lowercase()) {
            return Err(FasalError::CatalogInvalid(format!(
                "duplicate crop id '{}'",
                crop.id
            )));
        }

        if crop.name.trim().is_empty() {
            return Err(FasalError::CatalogInvalid(format!(
                "crop '{}' has no name",
                crop.id
            )));
        }

        if crop.regions.is_empty() || crop.regions.iter().any(|r| r.trim().is_empty()) {
            return Err(FasalError::CatalogInvalid(format!(
                "crop '{}' must list at least one non-blank region",
                crop.id
            )));
        }

        if crop.growing_season.sowing.is_empty() {
            return Err(FasalError::CatalogInvalid(format!(
                "crop '{}' has no sowing months",
                crop.id
            )));
        }
    }

    Ok(())
}
