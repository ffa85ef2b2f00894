use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::SetLog;
use crate::one_rep_max::estimate_one_rep_max;

/// Personal record categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrType {
    Weight,
    Volume,
    Reps,
    OneRepMax,
}

impl std::fmt::Display for PrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrType::Weight => write!(f, "Weight"),
            PrType::Volume => write!(f, "Volume"),
            PrType::Reps => write!(f, "Reps"),
            PrType::OneRepMax => write!(f, "Estimated 1RM"),
        }
    }
}

/// A recorded best with the set that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrRecord {
    pub pr_type: PrType,
    pub value: Decimal,
    pub date: NaiveDate,
    pub weight: Decimal,
    pub reps: u32,
}

/// Per-exercise personal record history.
///
/// The `best_*` fields never regress: [`ExercisePrHistory::with_set`] only
/// replaces a best with a strictly greater value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrHistory {
    pub exercise_id: String,

    #[serde(default)]
    pub best_weight: Option<PrRecord>,

    #[serde(default)]
    pub best_volume: Option<PrRecord>,

    #[serde(default)]
    pub best_reps: Option<PrRecord>,

    /// Every PR ever recorded, oldest first
    #[serde(default)]
    pub records: Vec<PrRecord>,
}

/// A PR achieved by a just-completed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrDetection {
    pub pr_type: PrType,
    pub value: Decimal,
    pub previous_best: Decimal,
    pub improvement: Decimal,
    pub improvement_percent: f64,
}

impl PrDetection {
    fn new(pr_type: PrType, value: Decimal, previous_best: Decimal) -> Self {
        let improvement = value - previous_best;
        // A zero baseline only counts as 100% because an actual increase exists
        let improvement_percent = if previous_best > Decimal::ZERO {
            (improvement / previous_best * Decimal::from(100))
                .to_f64()
                .unwrap_or(0.0)
        } else {
            100.0
        };

        PrDetection {
            pr_type,
            value,
            previous_best,
            improvement,
            improvement_percent,
        }
    }
}

impl ExercisePrHistory {
    pub fn new(exercise_id: impl Into<String>) -> Self {
        ExercisePrHistory {
            exercise_id: exercise_id.into(),
            best_weight: None,
            best_volume: None,
            best_reps: None,
            records: Vec::new(),
        }
    }

    fn best_value(record: &Option<PrRecord>) -> Decimal {
        record.as_ref().map(|r| r.value).unwrap_or(Decimal::ZERO)
    }

    /// Returns a new history with the PRs of `set` applied.
    pub fn with_set(&self, set: &SetLog, date: NaiveDate) -> (ExercisePrHistory, Vec<PrDetection>) {
        let detections = check_all_prs(set, Some(self));
        let mut next = self.clone();

        for detection in &detections {
            let record = PrRecord {
                pr_type: detection.pr_type,
                value: detection.value,
                date,
                weight: set.weight,
                reps: set.reps,
            };

            match detection.pr_type {
                PrType::Weight => next.best_weight = Some(record.clone()),
                PrType::Volume => next.best_volume = Some(record.clone()),
                PrType::Reps => next.best_reps = Some(record.clone()),
                PrType::OneRepMax => {}
            }
            next.records.push(record);
        }

        (next, detections)
    }
}

/// Evaluate a completed set against the exercise's PR history.
///
/// Every qualifying category is returned. With no history at all the set is
/// the first ever logged and counts as both a weight and a volume PR.
pub fn check_all_prs(set: &SetLog, pr_history: Option<&ExercisePrHistory>) -> Vec<PrDetection> {
    if !set.is_working() {
        return Vec::new();
    }

    let volume = set.volume();

    let history = match pr_history {
        Some(history) => history,
        None => {
            return vec![
                PrDetection::new(PrType::Weight, set.weight, Decimal::ZERO),
                PrDetection::new(PrType::Volume, volume, Decimal::ZERO),
            ];
        }
    };

    let mut detections = Vec::new();

    let best_weight = ExercisePrHistory::best_value(&history.best_weight);
    if set.weight > best_weight {
        detections.push(PrDetection::new(PrType::Weight, set.weight, best_weight));
    }

    let best_volume = ExercisePrHistory::best_value(&history.best_volume);
    if volume > best_volume {
        detections.push(PrDetection::new(PrType::Volume, volume, best_volume));
    }

    let best_reps = ExercisePrHistory::best_value(&history.best_reps);
    let reps = Decimal::from(set.reps);
    if reps > best_reps {
        detections.push(PrDetection::new(PrType::Reps, reps, best_reps));
    }

    // A single at the same weight is just a restatement of the weight PR
    if set.reps > 1 {
        let estimated = estimate_one_rep_max(set.weight, set.reps).value;
        let previous = history
            .best_weight
            .as_ref()
            .map(|r| estimate_one_rep_max(r.weight, r.reps).value)
            .unwrap_or(Decimal::ZERO);
        if estimated > previous {
            detections.push(PrDetection::new(PrType::OneRepMax, estimated, previous));
        }
    }

    debug!(
        exercise = %history.exercise_id,
        count = detections.len(),
        "PR check complete"
    );

    detections
}
