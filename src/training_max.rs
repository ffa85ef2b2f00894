//! Training max management
//!
//! A training max (TM) is a conservative fraction of the true 1RM used as the
//! base for percentage programming. It is recalibrated from AMAP ("as many as
//! possible") test sets: reps achieved beyond the prescribed target move the TM
//! up, falling short moves it down.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::one_rep_max::estimate_one_rep_max;

#[derive(Error, Debug, PartialEq)]
pub enum TrainingMaxError {
    #[error("Invalid weight: {0}")]
    InvalidWeight(Decimal),
    #[error("Invalid target reps: {0}")]
    InvalidTargetReps(u32),
    #[error("Training max percentage must be within (0, 1], got {0}")]
    InvalidPercentage(Decimal),
}

/// Where a training max value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMaxSource {
    AmapTest,
    AiSuggestion,
    Manual,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMaxEntry {
    pub value: Decimal,
    pub date: NaiveDate,
    pub source: TrainingMaxSource,
}

/// Training max with its append-only history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMax {
    pub exercise_id: String,
    pub current: Decimal,

    #[serde(default)]
    pub history: Vec<TrainingMaxEntry>,
}

/// Result of an AMAP recalibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMaxUpdate {
    pub previous: Decimal,
    pub new_value: Decimal,
    pub change_percent: Decimal,
    pub reps_over_target: i64,
    pub reasoning: String,
}

/// AMAP progression table: (minimum reps over target, TM adjustment).
///
/// Rows are checked top-down; the first row whose minimum is met applies.
pub const AMAP_PROGRESSION_TABLE: &[(i64, Decimal)] = &[
    (6, dec!(0.075)),
    (4, dec!(0.05)),
    (2, dec!(0.025)),
    (0, dec!(0)),
    (-2, dec!(-0.05)),
    (i64::MIN, dec!(-0.10)),
];

pub const DEFAULT_TRAINING_MAX_PERCENT: Decimal = dec!(0.9);

/// Round to the nearest loadable increment
pub fn round_to_increment(value: Decimal, increment: Decimal) -> Decimal {
    if increment <= Decimal::ZERO {
        return value;
    }
    (value / increment).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * increment
}

/// Training max from a 1RM
pub fn training_max_from_one_rep_max(
    one_rm: Decimal,
    percentage: Decimal,
    increment: Decimal,
) -> Result<Decimal, TrainingMaxError> {
    if one_rm <= Decimal::ZERO {
        return Err(TrainingMaxError::InvalidWeight(one_rm));
    }
    if percentage <= Decimal::ZERO || percentage > Decimal::ONE {
        return Err(TrainingMaxError::InvalidPercentage(percentage));
    }
    Ok(round_to_increment(one_rm * percentage, increment))
}

fn amap_adjustment(reps_over_target: i64) -> Decimal {
    AMAP_PROGRESSION_TABLE
        .iter()
        .find(|(min, _)| reps_over_target >= *min)
        .map(|(_, adjustment)| *adjustment)
        .unwrap_or(Decimal::ZERO)
}

/// Recalibrate a training max from an AMAP set.
///
/// The adjustment comes from [`AMAP_PROGRESSION_TABLE`]. The result never
/// exceeds the training-max fraction of the AMAP set's own estimated 1RM when
/// that would be lower than the table's value, so a lucky single set cannot
/// inflate the TM past what the set demonstrates.
pub fn calculate_amap_update(
    current: Decimal,
    amap_weight: Decimal,
    reps_achieved: u32,
    target_reps: u32,
    increment: Decimal,
) -> Result<TrainingMaxUpdate, TrainingMaxError> {
    if current <= Decimal::ZERO {
        return Err(TrainingMaxError::InvalidWeight(current));
    }
    if amap_weight <= Decimal::ZERO {
        return Err(TrainingMaxError::InvalidWeight(amap_weight));
    }
    if target_reps == 0 {
        return Err(TrainingMaxError::InvalidTargetReps(target_reps));
    }

    let reps_over_target = reps_achieved as i64 - target_reps as i64;
    let adjustment = amap_adjustment(reps_over_target);
    let mut new_value = round_to_increment(current * (Decimal::ONE + adjustment), increment);

    if adjustment > Decimal::ZERO {
        let demonstrated = estimate_one_rep_max(amap_weight, reps_achieved).value * DEFAULT_TRAINING_MAX_PERCENT;
        let ceiling = round_to_increment(demonstrated, increment).max(current);
        new_value = new_value.min(ceiling);
    }

    let change_percent = (new_value - current) / current * dec!(100);
    let reasoning = match reps_over_target {
        r if r < 0 => format!("Missed the {}-rep target by {} - lowering the training max", target_reps, -r),
        0 | 1 => format!("Hit the {}-rep target - training max holds", target_reps),
        r => format!("{} reps over target - raising the training max", r),
    };

    info!(
        previous = %current,
        new = %new_value,
        reps_over_target,
        "AMAP training max update"
    );

    Ok(TrainingMaxUpdate {
        previous: current,
        new_value,
        change_percent: change_percent.round_dp(2),
        reps_over_target,
        reasoning,
    })
}

impl TrainingMax {
    pub fn new(exercise_id: impl Into<String>, value: Decimal, date: NaiveDate, source: TrainingMaxSource) -> Self {
        TrainingMax {
            exercise_id: exercise_id.into(),
            current: value,
            history: vec![TrainingMaxEntry { value, date, source }],
        }
    }

    /// New training max with `value` appended to the history
    pub fn with_value(&self, value: Decimal, date: NaiveDate, source: TrainingMaxSource) -> TrainingMax {
        let mut history = self.history.clone();
        history.push(TrainingMaxEntry { value, date, source });
        TrainingMax {
            exercise_id: self.exercise_id.clone(),
            current: value,
            history,
        }
    }

    /// Apply an AMAP test result
    pub fn with_amap_result(
        &self,
        amap_weight: Decimal,
        reps_achieved: u32,
        target_reps: u32,
        increment: Decimal,
        date: NaiveDate,
    ) -> Result<(TrainingMax, TrainingMaxUpdate), TrainingMaxError> {
        let update = calculate_amap_update(self.current, amap_weight, reps_achieved, target_reps, increment)?;
        let next = self.with_value(update.new_value, date, TrainingMaxSource::AmapTest);
        Ok((next, update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    #[test]
    fn test_round_to_increment() {
        assert_eq!(round_to_increment(dec!(101.2), dec!(2.5)), dec!(100));
        assert_eq!(round_to_increment(dec!(101.3), dec!(2.5)), dec!(102.5));
        assert_eq!(round_to_increment(dec!(101.3), dec!(0)), dec!(101.3));
    }

    #[test]
    fn test_training_max_from_one_rep_max() {
        assert_eq!(
            training_max_from_one_rep_max(dec!(200), DEFAULT_TRAINING_MAX_PERCENT, dec!(2.5)),
            Ok(dec!(180))
        );
        assert_eq!(
            training_max_from_one_rep_max(dec!(200), dec!(1.2), dec!(2.5)),
            Err(TrainingMaxError::InvalidPercentage(dec!(1.2)))
        );
    }

    #[test]
    fn test_amap_table_lookup() {
        assert_eq!(amap_adjustment(8), dec!(0.075));
        assert_eq!(amap_adjustment(2), dec!(0.025));
        assert_eq!(amap_adjustment(1), dec!(0));
        assert_eq!(amap_adjustment(-1), dec!(-0.05));
        assert_eq!(amap_adjustment(-5), dec!(-0.10));
    }

    #[test]
    fn test_amap_increase() {
        // TM 100, 90 x 10 against a 5-rep target: +5 over -> +5%
        let update = calculate_amap_update(dec!(100), dec!(90), 10, 5, dec!(2.5)).unwrap();
        assert_eq!(update.reps_over_target, 5);
        assert_eq!(update.new_value, dec!(105));
        assert_eq!(update.change_percent, dec!(5));
    }

    #[test]
    fn test_amap_increase_capped_by_demonstrated_strength() {
        // 50 x 12 only demonstrates a 1RM of 70, TM ceiling 62.5
        let update = calculate_amap_update(dec!(100), dec!(50), 12, 3, dec!(2.5)).unwrap();
        assert_eq!(update.new_value, dec!(100));
    }

    #[test]
    fn test_amap_missed_target_lowers() {
        let update = calculate_amap_update(dec!(100), dec!(85), 3, 5, dec!(2.5)).unwrap();
        assert_eq!(update.new_value, dec!(95));
        assert!(update.reasoning.contains("Missed"));
    }

    #[test]
    fn test_history_is_append_only() {
        let tm = TrainingMax::new("squat", dec!(100), date(), TrainingMaxSource::Manual);
        let (next, _) = tm.with_amap_result(dec!(90), 10, 5, dec!(2.5), date()).unwrap();

        assert_eq!(tm.history.len(), 1);
        assert_eq!(next.history.len(), 2);
        assert_eq!(next.history[0], tm.history[0]);
        assert_eq!(next.history[1].source, TrainingMaxSource::AmapTest);
        assert_eq!(next.current, dec!(105));
    }

    #[test]
    fn test_invalid_amap_input() {
        assert_eq!(
            calculate_amap_update(dec!(0), dec!(85), 5, 5, dec!(2.5)),
            Err(TrainingMaxError::InvalidWeight(dec!(0)))
        );
        assert_eq!(
            calculate_amap_update(dec!(100), dec!(85), 5, 0, dec!(2.5)),
            Err(TrainingMaxError::InvalidTargetReps(0))
        );
    }
}
