pub mod engine;
pub mod matcher;
pub mod outcome;
pub mod ranking;
pub mod region;

pub use engine::{recommend, ScoreOptions, WeightPolicy, DEFAULT_MIN_SCORE};
pub use matcher::{match_band, match_range};
pub use outcome::{CropRecommendation, MatchDetail, MatchStatus, Measured, Reason, ReasonPolarity};
pub use ranking::{by_category, top_n};
pub use region::{region_matches, resolve_region};
