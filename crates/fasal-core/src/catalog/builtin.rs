use crate::catalog::schema::CropCatalog;
use crate::catalog::validate_catalog;
use crate::error::FasalError;

const CROPS_JSON: &str = include_str!("../../../../data/crops.json");

/// Load the crop catalog shipped with the binary.
pub fn load_builtin_catalog() -> Result<CropCatalog, FasalError> {
    let catalog: CropCatalog = serde_json::from_str(CROPS_JSON)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::CropCategory;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = load_builtin_catalog().unwrap();
        assert!(catalog.len() >= 10);
        assert!(catalog.get("wheat").is_some());
        assert!(catalog.get("rice").is_some());
    }

    #[test]
    fn test_builtin_covers_main_categories() {
        let catalog = load_builtin_catalog().unwrap();
        for category in [
            CropCategory::Cereal,
            CropCategory::Pulse,
            CropCategory::Oilseed,
            CropCategory::Vegetable,
            CropCategory::Fruit,
            CropCategory::CashCrop,
        ] {
            assert!(
                catalog.crops.iter().any(|c| c.category == category),
                "no crop in category {category}"
            );
        }
    }
}
