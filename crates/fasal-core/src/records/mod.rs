//! Per-user saved farm data: locations, soil readings and land records.

pub mod json_store;

pub use json_store::JsonFileStore;

use crate::error::FasalError;
use crate::model::{LocationPoint, SoilSample};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Owner of stored records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, FasalError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(FasalError::InvalidInput("user id must not be blank".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDraft {
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl LocationDraft {
    pub fn validate(&self) -> Result<(), FasalError> {
        if self.name.trim().is_empty() {
            return Err(FasalError::InvalidInput("location name must not be blank".into()));
        }
        LocationPoint::new(self.latitude, self.longitude).validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmLocation {
    pub id: Uuid,
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub created_at: DateTime<Utc>,
}

impl FarmLocation {
    pub fn point(&self) -> LocationPoint {
        LocationPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilReadingDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Uuid>,
    pub soil: SoilSample,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilReading {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Uuid>,
    pub soil: SoilSample,
    pub created_at: DateTime<Utc>,
}

/// Land ownership extract (7/12 record) fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandRecordDraft {
    pub district: String,
    pub taluka: String,
    pub village: String,
    pub survey_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,
    pub owner_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl LandRecordDraft {
    pub fn validate(&self) -> Result<(), FasalError> {
        let required = [
            ("district", &self.district),
            ("taluka", &self.taluka),
            ("village", &self.village),
            ("survey number", &self.survey_number),
            ("owner name", &self.owner_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(FasalError::InvalidInput(format!("{field} must not be blank")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: LandRecordDraft,
    pub created_at: DateTime<Utc>,
}

/// Storage for user records. Backend failures surface as
/// [`FasalError::Persistence`]; rejected drafts as `InvalidInput`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save_location(
        &self,
        user: &UserId,
        draft: LocationDraft,
    ) -> Result<FarmLocation, FasalError>;

    async fn locations(&self, user: &UserId) -> Result<Vec<FarmLocation>, FasalError>;

    /// Returns false when the user has no location with this id.
    async fn delete_location(&self, user: &UserId, id: Uuid) -> Result<bool, FasalError>;

    async fn save_soil_reading(
        &self,
        user: &UserId,
        draft: SoilReadingDraft,
    ) -> Result<SoilReading, FasalError>;

    async fn soil_readings(&self, user: &UserId) -> Result<Vec<SoilReading>, FasalError>;

    async fn save_land_record(
        &self,
        user: &UserId,
        draft: LandRecordDraft,
    ) -> Result<LandRecord, FasalError>;

    async fn land_records(&self, user: &UserId) -> Result<Vec<LandRecord>, FasalError>;

    async fn delete_land_record(&self, user: &UserId, id: Uuid) -> Result<bool, FasalError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_user_rejected() {
        assert!(UserId::new("  ").is_err());
        assert_eq!(UserId::new(" farmer-1 ").unwrap().as_str(), "farmer-1");
    }

    #[test]
    fn test_location_draft_validation() {
        let ok = LocationDraft {
            name: "North field".into(),
            latitude: dec!(26.8),
            longitude: dec!(80.9),
        };
        assert!(ok.validate().is_ok());

        let bad = LocationDraft {
            latitude: dec!(95),
            ..ok.clone()
        };
        assert!(bad.validate().is_err());

        let unnamed = LocationDraft {
            name: " ".into(),
            ..ok
        };
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_land_record_requires_owner() {
        let draft = LandRecordDraft {
            district: "Pune".into(),
            taluka: "Haveli".into(),
            village: "Wagholi".into(),
            survey_number: "112".into(),
            subdivision: None,
            owner_name: "".into(),
            area: Some("1.2 ha".into()),
        };
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().contains("owner name"));
    }

    #[test]
    fn test_land_record_json_is_flat() {
        let record = LandRecord {
            id: Uuid::nil(),
            details: LandRecordDraft {
                district: "Pune".into(),
                taluka: "Haveli".into(),
                village: "Wagholi".into(),
                survey_number: "112".into(),
                subdivision: Some("2A".into()),
                owner_name: "S. Patil".into(),
                area: None,
            },
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["district"], "Pune");
        assert_eq!(json["subdivision"], "2A");
        assert!(json.get("area").is_none());
    }
}
