// Library interface for liftrs modules
// This allows integration tests and benches to access the core functionality

pub mod config;
pub mod deload;
pub mod error;
pub mod forecast;
pub mod logging;
pub mod models;
pub mod one_rep_max;
pub mod pr;
pub mod progression;
pub mod snapshot;
pub mod strength;
pub mod training_max;

// Re-export commonly used types for convenience
pub use models::*;
pub use one_rep_max::{estimate_one_rep_max, try_estimate_one_rep_max, OneRepMax, OneRepMaxFormula};
pub use progression::{get_suggestion, ProgressionAdvisor, ProgressionConfig, ProgressiveSuggestion};
pub use pr::{check_all_prs, ExercisePrHistory, PrDetection, PrType};
pub use deload::{analyze_deload_need, DeloadAnalyzer, DeloadConfig, DeloadRecommendation, DeloadUrgency};
pub use forecast::{forecast_pr, ForecastConfig, PrForecast, PrForecaster};
pub use strength::{calculate_strength_score, classify_strength_level, StrengthLevel, StrengthStandard};
pub use training_max::{TrainingMax, TrainingMaxSource};
pub use snapshot::TrainingSnapshot;
pub use error::{LiftRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
