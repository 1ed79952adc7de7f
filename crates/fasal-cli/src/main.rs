mod commands;
mod config;
mod output;

use clap::{Args, Parser, Subcommand};
use fasal_core::error::FasalError;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fasal",
    version,
    about = "Crop recommendations from soil tests, with an offline farming assistant"
)]
struct Cli {
    /// Config file (default: $FASAL_CONFIG or ./fasal.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank crops for a soil sample and location
    Recommend(RecommendArgs),
    /// Inspect or validate crop catalogs
    Crops {
        #[command(subcommand)]
        action: CropsAction,
    },
    /// Show which region a location resolves to
    Region {
        /// Indian state name
        #[arg(long)]
        state: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<Decimal>,

        #[arg(long, allow_hyphen_values = true)]
        lng: Option<Decimal>,
    },
    /// Ask a farming question
    Ask {
        /// The question, e.g. "fertilizer for wheat"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Answer from the offline guide only
        #[arg(long)]
        offline: bool,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        output: String,
    },
    /// Manage saved locations, soil readings and land records
    Records {
        /// Owner of the records
        #[arg(long, default_value = "local")]
        user: String,

        #[command(subcommand)]
        action: RecordsAction,
    },
    /// Create or show the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct RecommendArgs {
    /// Nitrogen (kg/ha)
    #[arg(long, short = 'n')]
    pub nitrogen: Decimal,

    /// Phosphorus (kg/ha)
    #[arg(long, short = 'p')]
    pub phosphorus: Decimal,

    /// Potassium (kg/ha)
    #[arg(long, short = 'k')]
    pub potassium: Decimal,

    /// Soil pH
    #[arg(long)]
    pub ph: Decimal,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: Decimal,

    #[arg(long, allow_hyphen_values = true)]
    pub lng: Decimal,

    /// State name; takes precedence over coordinates for the region
    #[arg(long)]
    pub state: Option<String>,

    /// Air temperature in °C
    #[arg(long, requires = "humidity", allow_hyphen_values = true)]
    pub temperature: Option<Decimal>,

    /// Relative humidity in %
    #[arg(long, requires = "temperature")]
    pub humidity: Option<Decimal>,

    /// Fetch current temperature and humidity for the location
    #[arg(long, conflicts_with_all = ["temperature", "humidity"])]
    pub live_weather: bool,

    /// Only show the best N crops
    #[arg(long)]
    pub top: Option<usize>,

    /// Only show one category (e.g. cereal, pulse, cash_crop)
    #[arg(long)]
    pub category: Option<String>,

    /// Custom crop catalog JSON file
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Divide by the full weight sum even without weather
    #[arg(long)]
    pub fixed_weights: bool,

    /// Minimum score to include (0-100)
    #[arg(long)]
    pub min_score: Option<u8>,

    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table")]
    pub output: String,

    /// Show per-attribute match details
    #[arg(long)]
    pub verbose: bool,

    /// Print the full scoring trace as JSON instead of recommendations
    #[arg(long)]
    pub trace: bool,
}

#[derive(Subcommand)]
enum CropsAction {
    /// List crops in the catalog
    List {
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
    /// Show ideal conditions and growing details for one crop
    Show {
        /// Crop id, e.g. "wheat"
        id: String,

        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
    /// Validate a custom catalog file
    Validate {
        /// Path to JSON catalog file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum RecordsAction {
    /// Save a named farm location
    AddLocation {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: Decimal,
        #[arg(long, allow_hyphen_values = true)]
        lng: Decimal,
    },
    ListLocations,
    DeleteLocation {
        id: uuid::Uuid,
    },
    /// Save a soil test result
    AddSoil {
        #[arg(long, short = 'n')]
        nitrogen: Decimal,
        #[arg(long, short = 'p')]
        phosphorus: Decimal,
        #[arg(long, short = 'k')]
        potassium: Decimal,
        #[arg(long)]
        ph: Decimal,
        /// Saved location this reading belongs to
        #[arg(long)]
        location: Option<uuid::Uuid>,
    },
    ListSoil,
    /// Save a land (7/12) record
    AddLand {
        #[arg(long)]
        district: String,
        #[arg(long)]
        taluka: String,
        #[arg(long)]
        village: String,
        #[arg(long)]
        survey_number: String,
        #[arg(long)]
        subdivision: Option<String>,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        area: Option<String>,
    },
    ListLand,
    DeleteLand {
        id: uuid::Uuid,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init,
    /// Print the effective configuration
    Show,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let config_path = config::config_path(cli.config.as_deref());
    let result = match config::load_config(&config_path) {
        Err(e) => Err(e),
        Ok(cfg) => match cli.command {
            Commands::Recommend(args) => commands::recommend::run(args, &cfg).await,
            Commands::Crops { action } => match action {
                CropsAction::List { catalog } => commands::crops::list(catalog.as_deref()),
                CropsAction::Show { id, catalog } => {
                    commands::crops::show(&id, catalog.as_deref())
                }
                CropsAction::Validate { file } => commands::crops::validate(&file),
            },
            Commands::Region { state, lat, lng } => commands::region::run(state, lat, lng),
            Commands::Ask {
                query,
                offline,
                output,
            } => commands::ask::run(&query.join(" "), offline, &output, &cfg).await,
            Commands::Records { user, action } => {
                commands::records::run(&user, action, &cfg).await
            }
            Commands::Config { action } => match action {
                ConfigAction::Init => commands::config::init(&config_path),
                ConfigAction::Show => commands::config::show(&config_path, &cfg),
            },
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(hint) = error_hint(&e) {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }
}

/// Extra advice printed under an error the user can retry.
fn error_hint(e: &FasalError) -> Option<&'static str> {
    if !e.is_recoverable() {
        return None;
    }
    Some(match e {
        FasalError::Persistence(_) => "Nothing was saved. Please try again.",
        _ => "The service may be temporarily unreachable. Please try again.",
    })
}
