use fasal_core::catalog::schema::CropCategory;
use fasal_core::error::FasalError;
use fasal_core::model::{LocationPoint, RecommendationInput, SoilSample, WeatherSnapshot};
use fasal_core::recommend::{resolve_region, top_n};
use fasal_core::trace::build_trace;
use fasal_core::weather::{OpenMeteoClient, WeatherProvider};
use fasal_core::WeightPolicy;

use crate::config::Config;
use crate::output;
use crate::RecommendArgs;

pub async fn run(args: RecommendArgs, cfg: &Config) -> Result<(), FasalError> {
    let catalog = super::load_catalog_or_builtin(args.catalog.as_deref())?;

    let category = args
        .category
        .as_deref()
        .map(|c| {
            CropCategory::from_str_loose(c).ok_or_else(|| {
                FasalError::InvalidInput(format!(
                    "unknown category '{c}'. Expected one of: cereal, pulse, oilseed, vegetable, fruit, cash_crop, other"
                ))
            })
        })
        .transpose()?;

    let mut location = LocationPoint::new(args.lat, args.lng);
    if let Some(state) = args.state {
        location = location.with_state(state);
    }

    let weather = match (args.temperature, args.humidity) {
        (Some(temperature_celsius), Some(humidity_percent)) => Some(WeatherSnapshot {
            temperature_celsius,
            humidity_percent,
        }),
        _ if args.live_weather => live_weather(&location, cfg).await,
        _ => None,
    };

    let input = RecommendationInput {
        soil: SoilSample {
            nitrogen: args.nitrogen,
            phosphorus: args.phosphorus,
            potassium: args.potassium,
            ph: args.ph,
        },
        location,
        weather,
    };

    let mut options = cfg.score_options();
    if args.fixed_weights {
        options.weight_policy = WeightPolicy::FixedWeights;
    }
    if let Some(min_score) = args.min_score {
        options.min_score = min_score;
    }

    if args.trace {
        let trace = build_trace(&catalog, &input, &options)?;
        return output::json::print(&trace);
    }

    let ranked = match category {
        Some(c) => fasal_core::get_recommendations_by_category(&catalog, &input, &options, c)?,
        None => fasal_core::get_recommendations(&catalog, &input, &options)?,
    };
    let recommendations = match args.top {
        Some(n) => top_n(&ranked, n),
        None => &ranked[..],
    };

    match args.output.as_str() {
        "json" => output::json::print(recommendations)?,
        _ => output::table::print_recommendations(
            recommendations,
            &resolve_region(&input.location),
            input.weather.as_ref(),
            args.verbose,
        ),
    }

    Ok(())
}

/// Current conditions for the location, or `None` after logging why not.
async fn live_weather(location: &LocationPoint, cfg: &Config) -> Option<WeatherSnapshot> {
    let client = match OpenMeteoClient::new(&cfg.weather.base_url, cfg.weather_timeout()) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "weather client unavailable, scoring without weather");
            return None;
        }
    };
    match client.current(location.latitude, location.longitude).await {
        Ok(report) => {
            tracing::info!(
                condition = %report.condition,
                description = report.description,
                "using live weather"
            );
            Some(report.to_snapshot())
        }
        Err(e) => {
            tracing::warn!(error = %e, "weather lookup failed, scoring without weather");
            None
        }
    }
}
