use fasal_core::error::FasalError;
use fasal_core::model::LocationPoint;
use fasal_core::recommend::region::state_aliases;
use fasal_core::recommend::resolve_region;
use rust_decimal::Decimal;

pub fn run(
    state: Option<String>,
    lat: Option<Decimal>,
    lng: Option<Decimal>,
) -> Result<(), FasalError> {
    let mut location = match (lat, lng) {
        (Some(lat), Some(lng)) => LocationPoint::new(lat, lng),
        (None, None) if state.is_some() => LocationPoint::new(Decimal::ZERO, Decimal::ZERO),
        _ => {
            return Err(FasalError::InvalidInput(
                "give --state, or both --lat and --lng".into(),
            ))
        }
    };
    if let Some(state) = state {
        location = location.with_state(state);
    }
    location.validate()?;

    let region = resolve_region(&location);
    println!("Region: {region}");
    if let Some(aliases) = location.state_name().and_then(state_aliases) {
        println!("Also matches: {}", aliases.join(", "));
    }
    Ok(())
}
