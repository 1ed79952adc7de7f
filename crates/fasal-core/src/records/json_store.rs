use crate::error::FasalError;
use crate::records::{
    FarmLocation, LandRecord, LandRecordDraft, LocationDraft, RecordStore, SoilReading,
    SoilReadingDraft, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    users: BTreeMap<UserId, UserRecords>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserRecords {
    #[serde(default)]
    locations: Vec<FarmLocation>,
    #[serde(default)]
    soil_readings: Vec<SoilReading>,
    #[serde(default)]
    land_records: Vec<LandRecord>,
}

/// Record store kept in a single JSON file.
///
/// Every write replaces the whole file through a temp file in the same
/// directory, so readers see either the old or the new document.
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T, F>(&self, f: F) -> Result<T, FasalError>
    where
        F: FnOnce(&StoreDocument) -> T + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || read_document(&path).map(|doc| f(&doc)))
            .await
            .map_err(|e| FasalError::Persistence(format!("store task failed: {e}")))?
    }

    async fn update<T, F>(&self, f: F) -> Result<T, FasalError>
    where
        F: FnOnce(&mut StoreDocument) -> T + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || {
            let mut doc = read_document(&path)?;
            let out = f(&mut doc);
            write_document(&path, &doc)?;
            Ok(out)
        })
        .await
        .map_err(|e| FasalError::Persistence(format!("store task failed: {e}")))?
    }
}

fn read_document(path: &Path) -> Result<StoreDocument, FasalError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StoreDocument {
                version: FORMAT_VERSION,
                users: BTreeMap::new(),
            })
        }
        Err(e) => {
            return Err(FasalError::Persistence(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };
    let doc: StoreDocument = serde_json::from_str(&content).map_err(|e| {
        FasalError::Persistence(format!("corrupt record file {}: {e}", path.display()))
    })?;
    if doc.version != FORMAT_VERSION {
        return Err(FasalError::Persistence(format!(
            "unsupported record file version {} in {}",
            doc.version,
            path.display()
        )));
    }
    Ok(doc)
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> FasalError {
    FasalError::Persistence(format!("cannot write {}: {e}", path.display()))
}

fn write_document(path: &Path, doc: &StoreDocument) -> Result<(), FasalError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| write_error(path, e))?;

    let json = serde_json::to_vec_pretty(doc).map_err(|e| write_error(path, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    tmp.write_all(&json).map_err(|e| write_error(path, e))?;
    tmp.as_file().sync_all().map_err(|e| write_error(path, e))?;
    tmp.persist(path).map_err(|e| write_error(path, e.error))?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "record file written");
    Ok(())
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn save_location(
        &self,
        user: &UserId,
        draft: LocationDraft,
    ) -> Result<FarmLocation, FasalError> {
        draft.validate()?;
        let location = FarmLocation {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            latitude: draft.latitude,
            longitude: draft.longitude,
            created_at: Utc::now(),
        };
        let user = user.clone();
        let saved = location.clone();
        self.update(move |doc| doc.users.entry(user).or_default().locations.push(saved))
            .await?;
        Ok(location)
    }

    async fn locations(&self, user: &UserId) -> Result<Vec<FarmLocation>, FasalError> {
        let user = user.clone();
        self.read(move |doc| {
            doc.users
                .get(&user)
                .map(|r| r.locations.clone())
                .unwrap_or_default()
        })
        .await
    }

    async fn delete_location(&self, user: &UserId, id: Uuid) -> Result<bool, FasalError> {
        let user = user.clone();
        self.update(move |doc| {
            doc.users.get_mut(&user).is_some_and(|r| {
                let before = r.locations.len();
                r.locations.retain(|l| l.id != id);
                r.locations.len() != before
            })
        })
        .await
    }

    async fn save_soil_reading(
        &self,
        user: &UserId,
        draft: SoilReadingDraft,
    ) -> Result<SoilReading, FasalError> {
        draft.soil.validate()?;
        let reading = SoilReading {
            id: Uuid::new_v4(),
            location_id: draft.location_id,
            soil: draft.soil,
            created_at: Utc::now(),
        };
        let user = user.clone();
        let saved = reading.clone();
        self.update(move |doc| doc.users.entry(user).or_default().soil_readings.push(saved))
            .await?;
        Ok(reading)
    }

    async fn soil_readings(&self, user: &UserId) -> Result<Vec<SoilReading>, FasalError> {
        let user = user.clone();
        self.read(move |doc| {
            doc.users
                .get(&user)
                .map(|r| r.soil_readings.clone())
                .unwrap_or_default()
        })
        .await
    }

    async fn save_land_record(
        &self,
        user: &UserId,
        draft: LandRecordDraft,
    ) -> Result<LandRecord, FasalError> {
        draft.validate()?;
        let record = LandRecord {
            id: Uuid::new_v4(),
            details: draft,
            created_at: Utc::now(),
        };
        let user = user.clone();
        let saved = record.clone();
        self.update(move |doc| doc.users.entry(user).or_default().land_records.push(saved))
            .await?;
        Ok(record)
    }

    async fn land_records(&self, user: &UserId) -> Result<Vec<LandRecord>, FasalError> {
        let user = user.clone();
        self.read(move |doc| {
            doc.users
                .get(&user)
                .map(|r| r.land_records.clone())
                .unwrap_or_default()
        })
        .await
    }

    async fn delete_land_record(&self, user: &UserId, id: Uuid) -> Result<bool, FasalError> {
        let user = user.clone();
        self.update(move |doc| {
            doc.users.get_mut(&user).is_some_and(|r| {
                let before = r.land_records.len();
                r.land_records.retain(|l| l.id != id);
                r.land_records.len() != before
            })
        })
        .await
    }
}
