use crate::model::LocationPoint;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// State name -> aliases used in crop region lists. The first alias is the
/// canonical label.
const STATE_REGIONS: &[(&str, &[&str])] = &[
    ("uttar pradesh", &["Uttar Pradesh", "UP", "Northern India"]),
    ("punjab", &["Punjab", "Northern India"]),
    ("haryana", &["Haryana", "Northern India"]),
    ("madhya pradesh", &["Madhya Pradesh", "MP", "Central India"]),
    ("maharashtra", &["Maharashtra", "Western India"]),
    ("karnataka", &["Karnataka", "Southern India"]),
    ("tamil nadu", &["Tamil Nadu", "Southern India"]),
    ("andhra pradesh", &["Andhra Pradesh", "Southern India"]),
    ("telangana", &["Telangana", "Southern India"]),
    ("west bengal", &["West Bengal", "Eastern India"]),
    ("gujarat", &["Gujarat", "Western India"]),
    ("rajasthan", &["Rajasthan", "Northwestern India"]),
    ("bihar", &["Bihar", "Eastern India"]),
    ("odisha", &["Odisha", "Eastern India"]),
    ("kerala", &["Kerala", "Southern India"]),
    ("assam", &["Assam", "Northeastern India"]),
];

const NORTH_OF: Decimal = dec!(28);
const SOUTH_OF: Decimal = dec!(15);
const WEST_OF: Decimal = dec!(75);
const EAST_OF: Decimal = dec!(85);

/// Aliases for a state, matched case-insensitively.
pub fn state_aliases(state: &str) -> Option<&'static [&'static str]> {
    let key = state.trim().to_lowercase();
    STATE_REGIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, aliases)| *aliases)
}

/// Derive the region label for a location.
///
/// A state name wins over coordinates. Unknown states are used verbatim.
pub fn resolve_region(location: &LocationPoint) -> String {
    match location.state_name() {
        Some(state) => state_aliases(state)
            .and_then(|aliases| aliases.first())
            .map(|s| s.to_string())
            .unwrap_or_else(|| state.to_string()),
        None => region_from_coordinates(location.latitude, location.longitude).to_string(),
    }
}

/// Coarse compass bucket for a point in India.
///
/// This is a rough approximation for when no state is known, not a geofence.
pub fn region_from_coordinates(latitude: Decimal, longitude: Decimal) -> &'static str {
    if latitude > NORTH_OF {
        "Northern India"
    } else if latitude < SOUTH_OF {
        "Southern India"
    } else if longitude < WEST_OF {
        "Western India"
    } else if longitude > EAST_OF {
        "Eastern India"
    } else {
        "Central India"
    }
}

/// True when any crop region and the resolved region contain one another,
/// ignoring case. Containment tolerates aliases like "UP" in "Uttar Pradesh, UP".
pub fn region_matches(crop_regions: &[String], region: &str) -> bool {
    let region = region.trim().to_lowercase();
    if region.is_empty() {
        return false;
    }
    crop_regions.iter().any(|r| {
        let r = r.trim().to_lowercase();
        !r.is_empty() && (r.contains(&region) || region.contains(&r))
    })
}
