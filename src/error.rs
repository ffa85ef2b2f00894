//! Unified error hierarchy for liftrs
//!
//! The analytics engine itself is total: insufficient data produces empty or
//! zero-confidence results. These errors cover the fallible edges around it
//! (snapshot import, configuration, validated estimation, training max updates).

use std::path::PathBuf;
use thiserror::Error;

use crate::one_rep_max::OneRepMaxError;
use crate::training_max::TrainingMaxError;

/// Top-level error type for liftrs operations
#[derive(Debug, Error)]
pub enum LiftRsError {
    /// Input that is well-formed but unusable
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV import errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Snapshot file problems
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Calculation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Snapshot import errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A row or record could not be interpreted
    #[error("Invalid record at {location}: {reason}")]
    InvalidRecord { location: String, reason: String },

    /// Duplicate identifier in the session list
    #[error("Duplicate session id: {id}")]
    DuplicateSession { id: String },
}

/// Calculation errors
#[derive(Debug, Error, PartialEq)]
pub enum CalculationError {
    /// Invalid parameter
    #[error("Invalid parameter for {calculation}: {parameter}={value} ({reason})")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
        reason: String,
    },

    /// Insufficient data for calculation
    #[error("Insufficient data for {calculation}: {reason}")]
    InsufficientData { calculation: String, reason: String },
}

impl CalculationError {
    fn invalid(calculation: &str, parameter: &str, value: impl ToString, reason: impl ToString) -> Self {
        CalculationError::InvalidParameter {
            calculation: calculation.to_string(),
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<OneRepMaxError> for CalculationError {
    fn from(err: OneRepMaxError) -> Self {
        match &err {
            OneRepMaxError::InvalidWeight(weight) => Self::invalid("one-rep max", "weight", weight, &err),
            OneRepMaxError::ZeroReps => Self::invalid("one-rep max", "reps", 0, &err),
            OneRepMaxError::TooManyReps(reps) => Self::invalid("one-rep max", "reps", reps, &err),
        }
    }
}

impl From<TrainingMaxError> for CalculationError {
    fn from(err: TrainingMaxError) -> Self {
        match &err {
            TrainingMaxError::InvalidWeight(weight) => Self::invalid("training max", "weight", weight, &err),
            TrainingMaxError::InvalidTargetReps(reps) => Self::invalid("training max", "target_reps", reps, &err),
            TrainingMaxError::InvalidPercentage(pct) => Self::invalid("training max", "percentage", pct, &err),
        }
    }
}

impl From<OneRepMaxError> for LiftRsError {
    fn from(err: OneRepMaxError) -> Self {
        LiftRsError::Calculation(err.into())
    }
}

impl From<TrainingMaxError> for LiftRsError {
    fn from(err: TrainingMaxError) -> Self {
        LiftRsError::Calculation(err.into())
    }
}

/// Result type alias for liftrs operations
pub type Result<T> = std::result::Result<T, LiftRsError>;

impl LiftRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftRsError::Snapshot(SnapshotError::FileNotFound { .. }) => ErrorSeverity::Warning,
            LiftRsError::Validation(_) => ErrorSeverity::Warning,
            LiftRsError::Calculation(CalculationError::InvalidParameter { .. }) => ErrorSeverity::Warning,
            LiftRsError::Calculation(CalculationError::InsufficientData { .. }) => {
                ErrorSeverity::Info
            }
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftRsError::Snapshot(SnapshotError::FileNotFound { path }) => {
                format!("Could not find training data file: {}", path.display())
            }
            LiftRsError::Serialization(e) => {
                format!("Training data file is not valid JSON: {}", e)
            }
            LiftRsError::Calculation(CalculationError::InvalidParameter { reason, .. }) => reason.clone(),
            LiftRsError::Calculation(CalculationError::InsufficientData {
                calculation, ..
            }) => {
                format!(
                    "Not enough training history to calculate {}. Log a few more sessions.",
                    calculation
                )
            }
            LiftRsError::Configuration(reason) => {
                format!("Configuration is invalid: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
