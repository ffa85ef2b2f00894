//! One-rep max estimation
//!
//! Converts a (weight, reps) pair into an estimated one-repetition maximum.
//!
//! - 1 rep: the weight itself is the max (`Actual`)
//! - 2-12 reps: Epley, `weight × (1 + reps/30)`
//! - 13+ reps: Brzycki, `weight × 36 / (37 − reps)`
//!
//! Brzycki diverges as reps approach 37, so reps are clamped to
//! [`MAX_ESTIMATION_REPS`] before the formula is applied.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest rep count that is fed into the Brzycki formula
pub const MAX_ESTIMATION_REPS: u32 = 30;

/// Upper bound of the Epley range
pub const EPLEY_MAX_REPS: u32 = 12;

#[derive(Error, Debug, PartialEq)]
pub enum OneRepMaxError {
    #[error("Weight must be positive, got {0}")]
    InvalidWeight(Decimal),
    #[error("Reps must be at least 1")]
    ZeroReps,
    #[error("Reps {0} exceed the estimation limit of 30")]
    TooManyReps(u32),
}

/// Formula used to produce an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneRepMaxFormula {
    Actual,
    Epley,
    Brzycki,
}

impl std::fmt::Display for OneRepMaxFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OneRepMaxFormula::Actual => write!(f, "actual"),
            OneRepMaxFormula::Epley => write!(f, "epley"),
            OneRepMaxFormula::Brzycki => write!(f, "brzycki"),
        }
    }
}

/// Estimated one-rep max, rounded to a whole unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneRepMax {
    pub value: Decimal,
    pub formula: OneRepMaxFormula,
}

impl OneRepMax {
    pub fn value_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(0.0)
    }
}

/// Estimate a one-rep max.
///
/// Total over all inputs: a non-positive weight or zero reps yields a zero
/// estimate. Use [`try_estimate_one_rep_max`] to reject such input instead.
pub fn estimate_one_rep_max(weight: Decimal, reps: u32) -> OneRepMax {
    if weight <= Decimal::ZERO || reps == 0 {
        return OneRepMax {
            value: Decimal::ZERO,
            formula: OneRepMaxFormula::Actual,
        };
    }

    if reps == 1 {
        return OneRepMax {
            value: weight,
            formula: OneRepMaxFormula::Actual,
        };
    }

    let w = weight.to_f64().unwrap_or(0.0);
    let (estimate, formula) = if reps <= EPLEY_MAX_REPS {
        (w * (1.0 + reps as f64 / 30.0), OneRepMaxFormula::Epley)
    } else {
        let r = reps.min(MAX_ESTIMATION_REPS) as f64;
        (w * 36.0 / (37.0 - r), OneRepMaxFormula::Brzycki)
    };

    OneRepMax {
        value: Decimal::from_f64(estimate.round()).unwrap_or(weight),
        formula,
    }
}

/// Validating variant of [`estimate_one_rep_max`]
pub fn try_estimate_one_rep_max(weight: Decimal, reps: u32) -> Result<OneRepMax, OneRepMaxError> {
    if weight <= Decimal::ZERO {
        return Err(OneRepMaxError::InvalidWeight(weight));
    }
    if reps == 0 {
        return Err(OneRepMaxError::ZeroReps);
    }
    if reps > MAX_ESTIMATION_REPS {
        return Err(OneRepMaxError::TooManyReps(reps));
    }
    Ok(estimate_one_rep_max(weight, reps))
}
