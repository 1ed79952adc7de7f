use fasal_core::error::FasalError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), FasalError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
