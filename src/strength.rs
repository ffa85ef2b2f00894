//! Bodyweight-relative strength classification
//!
//! Maps a lift's 1RM/bodyweight ratio onto five tiers using a static table of
//! population standards. Only major barbell lifts have standards; anything else
//! is unclassifiable and yields `None`.
//!
//! Each row holds the ratio at which a tier begins:
//!
//! | Tier         | Score |
//! |--------------|-------|
//! | Untrained    | 1     |
//! | Novice       | 2     |
//! | Intermediate | 3     |
//! | Advanced     | 4     |
//! | Elite        | 5     |

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Gender;
use crate::one_rep_max::estimate_one_rep_max;
use crate::pr::ExercisePrHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Untrained,
    Novice,
    Intermediate,
    Advanced,
    Elite,
}

impl StrengthLevel {
    const ALL: [StrengthLevel; 5] = [
        StrengthLevel::Untrained,
        StrengthLevel::Novice,
        StrengthLevel::Intermediate,
        StrengthLevel::Advanced,
        StrengthLevel::Elite,
    ];

    /// Tier score, 1 (untrained) to 5 (elite)
    pub fn score(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn next(&self) -> Option<StrengthLevel> {
        Self::ALL.get(*self as usize + 1).copied()
    }
}

impl std::fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrengthLevel::Untrained => write!(f, "Untrained"),
            StrengthLevel::Novice => write!(f, "Novice"),
            StrengthLevel::Intermediate => write!(f, "Intermediate"),
            StrengthLevel::Advanced => write!(f, "Advanced"),
            StrengthLevel::Elite => write!(f, "Elite"),
        }
    }
}

/// Lifts with published bodyweight standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MajorLift {
    Squat,
    BenchPress,
    Deadlift,
    OverheadPress,
    BarbellRow,
}

/// Lifts that count toward the aggregate strength score
pub const SCORED_LIFTS: [MajorLift; 4] = [
    MajorLift::Squat,
    MajorLift::BenchPress,
    MajorLift::Deadlift,
    MajorLift::OverheadPress,
];

struct StandardRow {
    lift: MajorLift,
    aliases: &'static [&'static str],
    male: [f64; 5],
    female: [f64; 5],
}

const STRENGTH_STANDARDS: &[StandardRow] = &[
    StandardRow {
        lift: MajorLift::Squat,
        aliases: &["squat", "back_squat", "barbell_squat", "barbell_back_squat"],
        male: [0.75, 1.0, 1.5, 2.0, 2.5],
        female: [0.5, 0.75, 1.0, 1.5, 2.0],
    },
    StandardRow {
        lift: MajorLift::BenchPress,
        aliases: &["bench_press", "bench", "barbell_bench_press", "flat_bench_press"],
        male: [0.5, 0.75, 1.0, 1.5, 2.0],
        female: [0.25, 0.5, 0.65, 1.0, 1.25],
    },
    StandardRow {
        lift: MajorLift::Deadlift,
        aliases: &["deadlift", "conventional_deadlift", "barbell_deadlift"],
        male: [1.0, 1.25, 1.75, 2.5, 3.0],
        female: [0.6, 1.0, 1.25, 1.75, 2.25],
    },
    StandardRow {
        lift: MajorLift::OverheadPress,
        aliases: &["overhead_press", "ohp", "military_press", "barbell_overhead_press", "shoulder_press"],
        male: [0.35, 0.5, 0.75, 1.0, 1.25],
        female: [0.2, 0.35, 0.5, 0.65, 0.85],
    },
    StandardRow {
        lift: MajorLift::BarbellRow,
        aliases: &["barbell_row", "bent_over_row", "pendlay_row"],
        male: [0.5, 0.65, 0.9, 1.2, 1.5],
        female: [0.3, 0.4, 0.6, 0.8, 1.0],
    },
];

impl MajorLift {
    /// Resolve a catalog exercise id, tolerating case, spaces and hyphens
    pub fn from_exercise_id(exercise_id: &str) -> Option<MajorLift> {
        let normalized = exercise_id.trim().to_lowercase().replace([' ', '-'], "_");
        STRENGTH_STANDARDS
            .iter()
            .find(|row| row.aliases.contains(&normalized.as_str()))
            .map(|row| row.lift)
    }

    fn ratios(&self, gender: Gender) -> &'static [f64; 5] {
        let row = STRENGTH_STANDARDS
            .iter()
            .find(|row| row.lift == *self)
            .unwrap_or(&STRENGTH_STANDARDS[0]);
        match gender {
            Gender::Male => &row.male,
            Gender::Female => &row.female,
        }
    }
}

/// Classification of one lift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthStandard {
    pub exercise_id: String,
    pub lift: MajorLift,
    pub level: StrengthLevel,
    pub bodyweight_ratio: f64,
    pub next_level: Option<StrengthLevel>,

    /// 1RM needed to reach the next tier
    pub next_level_target: Option<Decimal>,

    /// Progress from the current tier toward the next, 0-100
    pub progress_percent: f64,
}

/// Classify a lift against bodyweight standards.
///
/// Returns `None` for exercises without a standard and for non-positive input.
pub fn classify_strength_level(
    exercise_id: &str,
    one_rm: Decimal,
    bodyweight: Decimal,
    gender: Gender,
) -> Option<StrengthStandard> {
    let lift = MajorLift::from_exercise_id(exercise_id)?;
    if one_rm <= Decimal::ZERO || bodyweight <= Decimal::ZERO {
        return None;
    }

    let bw = bodyweight.to_f64()?;
    let ratio = one_rm.to_f64()? / bw;
    let ratios = lift.ratios(gender);

    let tier_index = ratios.iter().rposition(|threshold| ratio >= *threshold).unwrap_or(0);
    let level = StrengthLevel::ALL[tier_index];
    let next_level = level.next();

    let (next_level_target, progress_percent) = match next_level {
        Some(next) => {
            // Below the untrained threshold progress is measured from zero
            let floor = if ratio >= ratios[tier_index] { ratios[tier_index] } else { 0.0 };
            let ceiling = ratios[next as usize];
            let progress = ((ratio - floor) / (ceiling - floor) * 100.0).clamp(0.0, 100.0);
            let target = Decimal::from_f64((ceiling * bw).round());
            (target, progress)
        }
        None => (None, 100.0),
    };

    Some(StrengthStandard {
        exercise_id: exercise_id.to_string(),
        lift,
        level,
        bodyweight_ratio: ratio,
        next_level,
        next_level_target,
        progress_percent,
    })
}

/// Aggregate strength score (0-100) across the major lifts.
///
/// Averages the tier scores (1-5) of every scored lift that has a recorded
/// weight PR, using the estimated 1RM of that record. `None` when no major lift
/// has been recorded.
pub fn calculate_strength_score(
    pr_histories: &HashMap<String, ExercisePrHistory>,
    bodyweight: Decimal,
    gender: Gender,
) -> Option<f64> {
    let mut best_per_lift: HashMap<MajorLift, (String, Decimal)> = HashMap::new();

    for (exercise_id, history) in pr_histories {
        let Some(lift) = MajorLift::from_exercise_id(exercise_id) else {
            continue;
        };
        if !SCORED_LIFTS.contains(&lift) {
            continue;
        }
        let Some(best) = history.best_weight.as_ref() else {
            continue;
        };

        let one_rm = estimate_one_rep_max(best.weight, best.reps).value;
        let entry = best_per_lift
            .entry(lift)
            .or_insert_with(|| (exercise_id.clone(), one_rm));
        if one_rm > entry.1 {
            *entry = (exercise_id.clone(), one_rm);
        }
    }

    let scores: Vec<f64> = best_per_lift
        .values()
        .filter_map(|(id, one_rm)| classify_strength_level(id, *one_rm, bodyweight, gender))
        .map(|standard| standard.level.score() as f64)
        .collect();

    if scores.is_empty() {
        return None;
    }

    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    Some(average / 5.0 * 100.0)
}
