pub mod ask;
pub mod config;
pub mod crops;
pub mod recommend;
pub mod records;
pub mod region;

use fasal_core::catalog::builtin::load_builtin_catalog;
use fasal_core::catalog::schema::CropCatalog;
use fasal_core::error::FasalError;
use std::path::Path;

/// A catalog file if one was given, else the built-in catalog.
pub fn load_catalog_or_builtin(path: Option<&Path>) -> Result<CropCatalog, FasalError> {
    match path {
        Some(p) => fasal_core::catalog::load_catalog(p),
        None => load_builtin_catalog(),
    }
}
