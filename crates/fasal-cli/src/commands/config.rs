use fasal_core::error::FasalError;
use std::path::Path;

use crate::config::{self, Config, API_KEY_ENV};

pub fn init(path: &Path) -> Result<(), FasalError> {
    if config::init_config(path)? {
        println!("Wrote {}", path.display());
        println!("Set {API_KEY_ENV} to enable the online assistant.");
    } else {
        println!("Config already exists: {}", path.display());
    }
    Ok(())
}

pub fn show(path: &Path, cfg: &Config) -> Result<(), FasalError> {
    let source = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", path.display());
    print!("{}", cfg.to_toml()?);
    let key = if config::api_key().is_some() { "set" } else { "not set" };
    println!("\n# {API_KEY_ENV}: {key}");
    Ok(())
}
