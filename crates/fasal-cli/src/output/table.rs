use fasal_core::catalog::schema::{CropCatalog, CropDefinition};
use fasal_core::model::{Attribute, WeatherSnapshot};
use fasal_core::recommend::{CropRecommendation, ReasonPolarity};
use fasal_core::records::{FarmLocation, LandRecord, SoilReading};

pub fn print_recommendations(
    recommendations: &[CropRecommendation],
    region: &str,
    weather: Option<&WeatherSnapshot>,
    verbose: bool,
) {
    println!("=== Crop recommendations for {} ===\n", region);
    match weather {
        Some(w) => println!(
            "  Weather: {}°C, {}% humidity\n",
            w.temperature_celsius, w.humidity_percent
        ),
        None => println!("  Weather: not provided (scored on soil and region)\n"),
    }

    if recommendations.is_empty() {
        println!("  No crop reached the minimum score for these conditions.");
        return;
    }

    let max_name = recommendations
        .iter()
        .map(|r| r.crop.name.chars().count())
        .max()
        .unwrap_or(10);

    for (rank, rec) in recommendations.iter().enumerate() {
        let local = rec
            .crop
            .local_name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default();
        println!(
            "  {:>2}. {:<width$}  {:>3}%  {}{}",
            rank + 1,
            rec.crop.name,
            rec.match_score,
            rec.crop.category,
            local,
            width = max_name
        );

        for reason in &rec.reasons {
            let marker = match reason.polarity {
                ReasonPolarity::Positive => "+",
                ReasonPolarity::Neutral => "~",
            };
            println!("        {} {}", marker, reason.text);
        }
        for warning in &rec.warnings {
            println!("        ! {}", warning);
        }

        if verbose {
            for (attribute, detail) in &rec.details {
                let measured = match attribute {
                    Attribute::Region => detail.measured.to_string(),
                    _ => format!("{}{}", detail.measured, attribute.unit()),
                };
                println!(
                    "        {:<12} {:<16} {:<9} {:>5}  ideal {}",
                    attribute.to_string(),
                    measured,
                    detail.status.to_string(),
                    detail.score.round_dp(1).normalize(),
                    detail.optimal
                );
            }
        }
        println!();
    }
}

pub fn print_crop_list(catalog: &CropCatalog) {
    println!("{} (v{}), {} crops:\n", catalog.name, catalog.version, catalog.len());
    let max_id = catalog
        .crops
        .iter()
        .map(|c| c.id.len())
        .max()
        .unwrap_or(8);
    for crop in &catalog.crops {
        println!(
            "  {:<width$}  {:<14} {}",
            crop.id,
            crop.category.to_string(),
            crop.name,
            width = max_id
        );
    }
}

pub fn print_crop(crop: &CropDefinition) {
    match &crop.local_name {
        Some(local) => println!("{} ({})\n", crop.name, local),
        None => println!("{}\n", crop.name),
    }
    println!("  Category:   {}", crop.category);
    println!("  Water need: {}", crop.water_requirement);
    println!("  Regions:    {}", crop.regions.join(", "));
    println!("  Sowing:     {}", crop.growing_season.sowing.join(", "));
    println!("  Harvest:    {}", crop.growing_season.harvesting.join(", "));
    println!("  Duration:   {}", crop.growing_season.duration);
    println!("  Yield:      {} per hectare\n", crop.yield_per_hectare);

    let ideal = &crop.ideal_conditions;
    println!("  Ideal conditions:");
    for (attribute, band) in [
        (Attribute::Nitrogen, &ideal.nitrogen),
        (Attribute::Phosphorus, &ideal.phosphorus),
        (Attribute::Potassium, &ideal.potassium),
        (Attribute::Ph, &ideal.ph),
        (Attribute::Temperature, &ideal.temperature),
        (Attribute::Humidity, &ideal.humidity),
    ] {
        println!(
            "    {:<12} {}{}",
            attribute.to_string(),
            band,
            attribute.unit()
        );
    }

    if !crop.tips.is_empty() {
        println!("\n  Tips:");
        for tip in &crop.tips {
            println!("    - {}", tip);
        }
    }
}

pub fn print_locations(locations: &[FarmLocation]) {
    if locations.is_empty() {
        println!("No saved locations.");
        return;
    }
    for loc in locations {
        println!(
            "  {}  {:<20} {}, {}  (saved {})",
            loc.id,
            loc.name,
            loc.latitude,
            loc.longitude,
            loc.created_at.format("%Y-%m-%d")
        );
    }
}

pub fn print_soil_readings(readings: &[SoilReading]) {
    if readings.is_empty() {
        println!("No saved soil readings.");
        return;
    }
    for r in readings {
        let location = r
            .location_id
            .map(|id| format!("  location {id}"))
            .unwrap_or_default();
        println!(
            "  {}  N {} P {} K {} pH {}{}  (saved {})",
            r.id,
            r.soil.nitrogen,
            r.soil.phosphorus,
            r.soil.potassium,
            r.soil.ph,
            location,
            r.created_at.format("%Y-%m-%d")
        );
    }
}

pub fn print_land_records(records: &[LandRecord]) {
    if records.is_empty() {
        println!("No saved land records.");
        return;
    }
    for r in records {
        let d = &r.details;
        let survey = match &d.subdivision {
            Some(sub) => format!("{}/{}", d.survey_number, sub),
            None => d.survey_number.clone(),
        };
        println!(
            "  {}  {}, {}, {}  survey {}  owner {}{}",
            r.id,
            d.village,
            d.taluka,
            d.district,
            survey,
            d.owner_name,
            d.area
                .as_deref()
                .map(|a| format!("  area {a}"))
                .unwrap_or_default()
        );
    }
}
