use fasal_core::catalog::schema::CropCategory;
use fasal_core::error::FasalError;
use std::path::Path;

use crate::output;

pub fn list(catalog: Option<&Path>) -> Result<(), FasalError> {
    let catalog = super::load_catalog_or_builtin(catalog)?;
    output::table::print_crop_list(&catalog);
    Ok(())
}

pub fn show(id: &str, catalog: Option<&Path>) -> Result<(), FasalError> {
    let catalog = super::load_catalog_or_builtin(catalog)?;
    let crop = catalog.get(id).ok_or_else(|| {
        let known: Vec<&str> = catalog.crops.iter().map(|c| c.id.as_str()).collect();
        FasalError::InvalidInput(format!(
            "unknown crop '{id}'. Known crops: {}",
            known.join(", ")
        ))
    })?;
    output::table::print_crop(crop);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FasalError> {
    let catalog = fasal_core::catalog::load_catalog(file)?;

    println!("Catalog '{}' (v{}) is valid.", catalog.name, catalog.version);
    println!("  Crops: {}", catalog.len());

    // Not errors, but likely mistakes
    let mut warnings = Vec::new();
    for category in CropCategory::ALL {
        if category != CropCategory::Other && !catalog.crops.iter().any(|c| c.category == category)
        {
            warnings.push(format!("no crops in category '{category}'"));
        }
    }
    for crop in &catalog.crops {
        if crop.tips.is_empty() {
            warnings.push(format!("crop '{}' has no tips", crop.id));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
