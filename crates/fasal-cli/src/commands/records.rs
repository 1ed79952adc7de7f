use fasal_core::error::FasalError;
use fasal_core::model::SoilSample;
use fasal_core::records::{
    JsonFileStore, LandRecordDraft, LocationDraft, RecordStore, SoilReadingDraft, UserId,
};

use crate::config::Config;
use crate::output;
use crate::RecordsAction;

pub async fn run(user: &str, action: RecordsAction, cfg: &Config) -> Result<(), FasalError> {
    let user = UserId::new(user)?;
    let store = JsonFileStore::new(&cfg.records.path);
    tracing::debug!(path = %store.path().display(), user = %user, "using record store");
    execute(&store, &user, action).await
}

async fn execute(
    store: &dyn RecordStore,
    user: &UserId,
    action: RecordsAction,
) -> Result<(), FasalError> {
    match action {
        RecordsAction::AddLocation { name, lat, lng } => {
            let saved = store
                .save_location(
                    user,
                    LocationDraft {
                        name,
                        latitude: lat,
                        longitude: lng,
                    },
                )
                .await?;
            println!("Saved location {} ({})", saved.name, saved.id);
        }
        RecordsAction::ListLocations => {
            output::table::print_locations(&store.locations(user).await?);
        }
        RecordsAction::DeleteLocation { id } => {
            report_delete("location", id, store.delete_location(user, id).await?);
        }
        RecordsAction::AddSoil {
            nitrogen,
            phosphorus,
            potassium,
            ph,
            location,
        } => {
            let saved = store
                .save_soil_reading(
                    user,
                    SoilReadingDraft {
                        location_id: location,
                        soil: SoilSample {
                            nitrogen,
                            phosphorus,
                            potassium,
                            ph,
                        },
                    },
                )
                .await?;
            println!("Saved soil reading {}", saved.id);
        }
        RecordsAction::ListSoil => {
            output::table::print_soil_readings(&store.soil_readings(user).await?);
        }
        RecordsAction::AddLand {
            district,
            taluka,
            village,
            survey_number,
            subdivision,
            owner,
            area,
        } => {
            let saved = store
                .save_land_record(
                    user,
                    LandRecordDraft {
                        district,
                        taluka,
                        village,
                        survey_number,
                        subdivision,
                        owner_name: owner,
                        area,
                    },
                )
                .await?;
            println!("Saved land record {}", saved.id);
        }
        RecordsAction::ListLand => {
            output::table::print_land_records(&store.land_records(user).await?);
        }
        RecordsAction::DeleteLand { id } => {
            report_delete("land record", id, store.delete_land_record(user, id).await?);
        }
    }
    Ok(())
}

fn report_delete(kind: &str, id: uuid::Uuid, deleted: bool) {
    if deleted {
        println!("Deleted {kind} {id}");
    } else {
        println!("No {kind} {id} for this user");
    }
}
