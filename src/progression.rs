//! Progressive overload advisor
//!
//! Recommends the next session's load for an exercise from the last logged
//! performance, today's recovery signals and the session history.
//!
//! # Recovery score
//!
//! A 0-10 readiness score built from a neutral base of 5:
//! - sleep: under 5h −3, under 6h −2, under 7h −0.5, under 8h +1, 8h or more +2
//! - stress (1-10): `(5 − stress) × 0.4`
//! - soreness of 7 or more: −1
//! - rest days since the last session: +0.5 each, capped at +1.5
//!
//! Missing biometrics add nothing; they are never treated as zero.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    completed_sessions_until, latest_exercise_log, DailyLog, ExerciseLog, ExperienceLevel,
    WorkoutSession,
};
use crate::one_rep_max::estimate_one_rep_max;
use crate::training_max::round_to_increment;

/// Confidence attached to a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// How the lifter felt about a previous suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRating {
    TooEasy,
    JustRight,
    TooHard,
}

/// Feedback on a past suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionFeedback {
    pub exercise_id: String,
    pub suggested_weight: Decimal,
    pub actual_weight: Decimal,
    pub rating: FeedbackRating,
    pub recorded_at: DateTime<Utc>,
}

/// Suggested load for the next session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveSuggestion {
    pub exercise_id: String,
    pub suggested_weight: Decimal,

    /// Inclusive [min, max] target reps
    pub rep_range: (u32, u32),

    pub confidence: Confidence,
    pub reasoning: String,
    pub should_deload: bool,
    pub recovery_score: f64,
    pub estimated_one_rep_max: Option<Decimal>,
    pub alternative: Option<String>,
    pub explanation: Option<String>,
}

/// Progression policy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Below this recovery score the advisor forces a deload
    pub low_recovery_threshold: f64,

    /// At or above this recovery score a full increase is allowed
    pub adequate_recovery_threshold: f64,

    /// Smallest loadable change (plate step)
    pub weight_increment: Decimal,

    pub beginner_increase_pct: Decimal,
    pub intermediate_increase_pct: Decimal,
    pub advanced_increase_pct: Decimal,

    /// Reduction applied on a recovery deload
    pub deload_reduction_pct: Decimal,

    /// Reduction applied when reps fall short without RPE data
    pub missed_target_reduction_pct: Decimal,

    /// Reps at which a set without RPE is considered too light
    pub high_rep_threshold: u32,

    pub default_rep_range: (u32, u32),
    pub rest_day_bonus: f64,
    pub max_rest_bonus: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        ProgressionConfig {
            low_recovery_threshold: 4.0,
            adequate_recovery_threshold: 6.0,
            weight_increment: dec!(2.5),
            beginner_increase_pct: dec!(0.05),
            intermediate_increase_pct: dec!(0.025),
            advanced_increase_pct: dec!(0.015),
            deload_reduction_pct: dec!(0.10),
            missed_target_reduction_pct: dec!(0.05),
            high_rep_threshold: 12,
            default_rep_range: (8, 12),
            rest_day_bonus: 0.5,
            max_rest_bonus: 1.5,
        }
    }
}

/// Load decision before rounding
#[derive(Debug, Clone, Copy)]
enum LoadChange {
    Increase(Decimal),
    Maintain,
    Decrease(Decimal),
}

/// Next-session load recommendations
pub struct ProgressionAdvisor {
    config: ProgressionConfig,
}

impl ProgressionAdvisor {
    pub fn new() -> Self {
        ProgressionAdvisor {
            config: ProgressionConfig::default(),
        }
    }

    pub fn with_config(config: ProgressionConfig) -> Self {
        ProgressionAdvisor { config }
    }

    /// Readiness score (0-10) from today's biometrics and rest days
    pub fn recovery_score(&self, daily_log: Option<&DailyLog>, rest_days: i64) -> f64 {
        let mut score = 5.0;

        if let Some(log) = daily_log {
            if let Some(sleep) = log.sleep_hours {
                score += match sleep {
                    s if s < 5.0 => -3.0,
                    s if s < 6.0 => -2.0,
                    s if s < 7.0 => -0.5,
                    s if s < 8.0 => 1.0,
                    _ => 2.0,
                };
            }
            if let Some(stress) = log.stress_level {
                score += (5.0 - stress.clamp(1, 10) as f64) * 0.4;
            }
            if let Some(soreness) = log.soreness {
                if soreness >= 7 {
                    score -= 1.0;
                }
            }
        }

        score += (rest_days.max(0) as f64 * self.config.rest_day_bonus).min(self.config.max_rest_bonus);

        score.clamp(0.0, 10.0)
    }

    fn increase_pct(&self, level: ExperienceLevel) -> Decimal {
        match level {
            ExperienceLevel::Beginner => self.config.beginner_increase_pct,
            ExperienceLevel::Intermediate => self.config.intermediate_increase_pct,
            ExperienceLevel::Advanced => self.config.advanced_increase_pct,
        }
    }

    /// Scale the increment from the last three feedback entries for the exercise
    fn feedback_multiplier(&self, exercise_id: &str, feedback: Option<&[SuggestionFeedback]>) -> Decimal {
        let Some(feedback) = feedback else {
            return Decimal::ONE;
        };

        let mut recent: Vec<&SuggestionFeedback> =
            feedback.iter().filter(|f| f.exercise_id == exercise_id).collect();
        recent.sort_by_key(|f| f.recorded_at);
        let recent: Vec<&SuggestionFeedback> = recent.into_iter().rev().take(3).collect();

        if recent.is_empty() {
            return Decimal::ONE;
        }

        let too_hard = recent.iter().filter(|f| f.rating == FeedbackRating::TooHard).count();
        let too_easy = recent.iter().filter(|f| f.rating == FeedbackRating::TooEasy).count();

        if too_hard * 2 > recent.len() {
            dec!(0.5)
        } else if too_easy * 2 > recent.len() {
            dec!(1.5)
        } else {
            Decimal::ONE
        }
    }

    /// Produce a suggestion for `exercise_id`.
    ///
    /// Falls back to the most recent completed log of the exercise in `history`
    /// when `last_workout` is not supplied.
    #[allow(clippy::too_many_arguments)]
    pub fn suggest(
        &self,
        exercise_id: &str,
        last_workout: Option<&ExerciseLog>,
        daily_log: Option<&DailyLog>,
        history: &[WorkoutSession],
        now: DateTime<Utc>,
        experience_level: Option<ExperienceLevel>,
        feedback_history: Option<&[SuggestionFeedback]>,
    ) -> ProgressiveSuggestion {
        let level = experience_level.unwrap_or_default();
        let latest = latest_exercise_log(history, exercise_id, now);

        let rest_days = completed_sessions_until(history, now)
            .last()
            .map(|s| (now.date_naive() - s.end_time.unwrap_or(s.start_time).date_naive()).num_days() - 1)
            .unwrap_or(0);
        let recovery_score = self.recovery_score(daily_log, rest_days);

        let log = last_workout.or(latest.map(|(_, log)| log));
        let Some((log, top_set)) = log.and_then(|l| l.top_set().map(|s| (l, s))) else {
            return ProgressiveSuggestion {
                exercise_id: exercise_id.to_string(),
                suggested_weight: Decimal::ZERO,
                rep_range: self.config.default_rep_range,
                confidence: Confidence::Low,
                reasoning: "No previous working sets logged - start light and find a weight you can lift for 8-12 clean reps".to_string(),
                should_deload: false,
                recovery_score,
                estimated_one_rep_max: None,
                alternative: None,
                explanation: None,
            };
        };

        let last_weight = top_set.weight;
        let estimated_one_rep_max = Some(estimate_one_rep_max(top_set.weight, top_set.reps).value);

        let multiplier = self.feedback_multiplier(exercise_id, feedback_history);
        let softened = multiplier < Decimal::ONE;
        let step = (last_weight * self.increase_pct(level)).max(self.config.weight_increment) * multiplier;
        let small_step = self.config.weight_increment;

        let (min_reps, max_reps) = {
            let reps: Vec<u32> = log.working_sets().map(|s| s.reps).collect();
            match (reps.iter().min(), reps.iter().max()) {
                (Some(&lo), Some(&hi)) if lo != hi && hi <= self.config.high_rep_threshold => (lo, hi),
                _ => self.config.default_rep_range,
            }
        };

        let low_recovery = recovery_score < self.config.low_recovery_threshold;
        let adequate_recovery = recovery_score >= self.config.adequate_recovery_threshold;

        let (change, rep_range, confidence, mut reasoning, should_deload) = if low_recovery {
            (
                LoadChange::Decrease(self.config.deload_reduction_pct),
                (min_reps, max_reps),
                Confidence::Medium,
                format!(
                    "Recovery score is low ({:.1}/10) - reduce the load and let recovery catch up",
                    recovery_score
                ),
                true,
            )
        } else if let Some(rpe) = log.last_rpe_set().and_then(|s| s.rpe) {
            if rpe <= 6.0 && adequate_recovery {
                (
                    LoadChange::Increase(step),
                    (min_reps, max_reps),
                    Confidence::High,
                    format!("RPE {} felt easy and recovery is good - ready to push", rpe),
                    false,
                )
            } else if rpe <= 6.0 {
                (
                    LoadChange::Increase(small_step),
                    (min_reps, max_reps),
                    Confidence::Medium,
                    format!("RPE {} felt easy but recovery is only moderate - small increase", rpe),
                    false,
                )
            } else if rpe < 9.0 {
                if adequate_recovery && rpe < 8.0 {
                    (
                        LoadChange::Increase(small_step),
                        (min_reps, max_reps),
                        Confidence::Medium,
                        format!("RPE {} leaves room in the tank - small increase", rpe),
                        false,
                    )
                } else {
                    (
                        LoadChange::Maintain,
                        (min_reps, max_reps),
                        Confidence::Medium,
                        format!("RPE {} is in the productive range - keep the weight and own the reps", rpe),
                        false,
                    )
                }
            } else if rpe < 9.5 {
                (
                    LoadChange::Maintain,
                    (min_reps, max_reps),
                    Confidence::Medium,
                    format!("RPE {} was high - repeat the weight before adding more", rpe),
                    false,
                )
            } else {
                (
                    LoadChange::Maintain,
                    (min_reps, max_reps),
                    Confidence::High,
                    format!("RPE {} was very high - maintain the weight until it moves faster", rpe),
                    false,
                )
            }
        } else if top_set.reps >= self.config.high_rep_threshold {
            let upper = 10.min(max_reps.max(min_reps + 2));
            (
                LoadChange::Increase(step),
                (min_reps.min(upper.saturating_sub(2)).max(1), upper),
                Confidence::Medium,
                format!(
                    "{} reps at {} - the weight is too light, move up and work in a lower rep range",
                    top_set.reps, last_weight
                ),
                false,
            )
        } else if top_set.reps >= min_reps {
            (
                LoadChange::Maintain,
                (min_reps, max_reps),
                Confidence::Medium,
                format!("{} reps is within the target range - add a rep before adding weight", top_set.reps),
                false,
            )
        } else {
            (
                LoadChange::Decrease(self.config.missed_target_reduction_pct),
                (min_reps, max_reps),
                Confidence::Low,
                format!("{} reps fell short of the {}-{} target - drop the weight slightly", top_set.reps, min_reps, max_reps),
                false,
            )
        };

        let suggested_weight = match change {
            // Too-hard feedback may shrink a jump below one plate step, down to a hold
            LoadChange::Increase(amount) if softened => {
                floor_to_increment(last_weight + amount, self.config.weight_increment).max(last_weight)
            }
            LoadChange::Increase(amount) => {
                let rounded = round_to_increment(last_weight + amount, self.config.weight_increment);
                rounded.max(last_weight + self.config.weight_increment)
            }
            LoadChange::Maintain => last_weight,
            LoadChange::Decrease(pct) => {
                let reduced = round_to_increment(last_weight * (Decimal::ONE - pct), self.config.weight_increment);
                if reduced < last_weight {
                    reduced.max(Decimal::ZERO)
                } else {
                    (last_weight - self.config.weight_increment).max(Decimal::ZERO)
                }
            }
        };

        if softened && matches!(change, LoadChange::Increase(_)) && suggested_weight == last_weight {
            reasoning.push_str(" (recent sessions were rated too hard, so hold the weight this time)");
        }

        let alternative = if suggested_weight > last_weight {
            Some(format!(
                "Alternatively keep {} and add one rep to every set",
                last_weight
            ))
        } else if should_deload {
            Some(format!(
                "Alternatively keep {} but cut the working sets in half",
                last_weight
            ))
        } else {
            None
        };

        let explanation = Some(format!(
            "Last top set: {} x {}{}. Recovery {:.1}/10 ({} level).",
            last_weight,
            top_set.reps,
            top_set.rpe.map(|r| format!(" @ RPE {}", r)).unwrap_or_default(),
            recovery_score,
            level
        ));

        debug!(
            exercise = exercise_id,
            last = %last_weight,
            suggested = %suggested_weight,
            recovery = recovery_score,
            "Progression suggestion"
        );

        ProgressiveSuggestion {
            exercise_id: exercise_id.to_string(),
            suggested_weight,
            rep_range,
            confidence,
            reasoning,
            should_deload,
            recovery_score,
            estimated_one_rep_max,
            alternative,
            explanation,
        }
    }
}

fn floor_to_increment(value: Decimal, increment: Decimal) -> Decimal {
    if increment <= Decimal::ZERO {
        return value;
    }
    (value / increment).round_dp_with_strategy(0, RoundingStrategy::ToZero) * increment
}

impl Default for ProgressionAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Suggestion with default progression policy
#[allow(clippy::too_many_arguments)]
pub fn get_suggestion(
    exercise_id: &str,
    last_workout: Option<&ExerciseLog>,
    daily_log: Option<&DailyLog>,
    history: &[WorkoutSession],
    now: DateTime<Utc>,
    experience_level: Option<ExperienceLevel>,
    feedback_history: Option<&[SuggestionFeedback]>,
) -> ProgressiveSuggestion {
    ProgressionAdvisor::new().suggest(
        exercise_id,
        last_workout,
        daily_log,
        history,
        now,
        experience_level,
        feedback_history,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionStatus, SetLog, SetType};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap()
    }

    fn bench_log(weight: Decimal, reps: u32, rpe: Option<f64>) -> ExerciseLog {
        ExerciseLog {
            id: "log-1".to_string(),
            exercise_id: "bench_press".to_string(),
            sets: (0..3)
                .map(|i| SetLog {
                    id: format!("set-{}", i),
                    weight,
                    reps,
                    rpe,
                    set_type: SetType::Normal,
                    completed: true,
                })
                .collect(),
            notes: None,
            superset_id: None,
        }
    }

    fn session_with(log: ExerciseLog, days_ago: i64) -> WorkoutSession {
        let start = now() - Duration::days(days_ago);
        WorkoutSession {
            id: format!("session-{}", days_ago),
            name: "Upper".to_string(),
            start_time: start,
            end_time: Some(start + Duration::minutes(60)),
            status: SessionStatus::Completed,
            exercises: vec![log],
            notes: String::new(),
        }
    }

    fn daily(sleep: Option<f64>, stress: Option<u8>) -> DailyLog {
        DailyLog {
            sleep_hours: sleep,
            stress_level: stress,
            ..DailyLog::empty(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
        }
    }

    #[test]
    fn test_easy_rpe_with_good_sleep_increases() {
        let log = bench_log(dec!(100), 8, Some(6.0));
        let history = vec![session_with(log.clone(), 2)];
        let today = daily(Some(8.0), None);

        let suggestion = get_suggestion(
            "bench_press",
            Some(&log),
            Some(&today),
            &history,
            now(),
            Some(ExperienceLevel::Intermediate),
            None,
        );

        assert!(suggestion.suggested_weight > dec!(100));
        assert_eq!(suggestion.confidence, Confidence::High);
        assert!(suggestion.reasoning.contains("ready to push"));
        assert!(!suggestion.should_deload);
    }

    #[test]
    fn test_poor_recovery_forces_deload() {
        let log = bench_log(dec!(100), 8, Some(8.0));
        let history = vec![session_with(log.clone(), 1)];
        let today = daily(Some(5.0), Some(8));

        let suggestion = get_suggestion("bench_press", Some(&log), Some(&today), &history, now(), None, None);

        assert!(suggestion.should_deload);
        assert!(suggestion.suggested_weight < dec!(100));
        assert!(suggestion.reasoning.to_lowercase().contains("recovery"));
        assert!(suggestion.recovery_score < 4.0);
    }

    #[test]
    fn test_very_high_rpe_maintains() {
        let log = bench_log(dec!(100), 5, Some(10.0));
        let history = vec![session_with(log.clone(), 2)];
        let today = daily(Some(8.0), Some(3));

        let suggestion = get_suggestion("bench_press", Some(&log), Some(&today), &history, now(), None, None);

        assert_eq!(suggestion.suggested_weight, dec!(100));
        assert!(suggestion.reasoning.contains("very high"));
        assert!(!suggestion.should_deload);
    }

    #[test]
    fn test_moderate_rpe_with_mediocre_recovery_maintains() {
        let log = bench_log(dec!(100), 8, Some(8.0));
        let history = vec![session_with(log.clone(), 1)];

        let suggestion = get_suggestion("bench_press", Some(&log), None, &history, now(), None, None);

        assert_eq!(suggestion.suggested_weight, dec!(100));
        assert_eq!(suggestion.confidence, Confidence::Medium);
    }

    #[test]
    fn test_high_reps_without_rpe_increases_and_lowers_range() {
        let log = bench_log(dec!(60), 14, None);
        let history = vec![session_with(log.clone(), 2)];

        let suggestion = get_suggestion("bench_press", None, None, &history, now(), Some(ExperienceLevel::Beginner), None);

        assert!(suggestion.suggested_weight > dec!(60));
        assert!(suggestion.rep_range.1 <= 10);
        assert!(suggestion.rep_range.0 <= suggestion.rep_range.1);
    }

    #[test]
    fn test_short_reps_without_rpe_decreases() {
        let log = bench_log(dec!(100), 4, None);
        let history = vec![session_with(log.clone(), 2)];

        let suggestion = get_suggestion("bench_press", Some(&log), None, &history, now(), None, None);

        assert!(suggestion.suggested_weight < dec!(100));
        assert_eq!(suggestion.confidence, Confidence::Low);
    }

    #[test]
    fn test_no_history_gives_low_confidence_start() {
        let suggestion = get_suggestion("squat", None, None, &[], now(), None, None);

        assert_eq!(suggestion.suggested_weight, Decimal::ZERO);
        assert_eq!(suggestion.confidence, Confidence::Low);
        assert_eq!(suggestion.rep_range, (8, 12));
    }

    #[test]
    fn test_missing_biometrics_are_neutral() {
        let advisor = ProgressionAdvisor::new();
        let empty = daily(None, None);

        assert_eq!(advisor.recovery_score(None, 0), 5.0);
        assert_eq!(advisor.recovery_score(Some(&empty), 0), 5.0);
        assert_eq!(advisor.recovery_score(None, 10), 6.5);
    }

    #[test]
    fn test_too_hard_feedback_shrinks_increment() {
        let advisor = ProgressionAdvisor::new();
        let feedback: Vec<SuggestionFeedback> = (0..3)
            .map(|i| SuggestionFeedback {
                exercise_id: "bench_press".to_string(),
                suggested_weight: dec!(105),
                actual_weight: dec!(100),
                rating: FeedbackRating::TooHard,
                recorded_at: now() - Duration::days(i * 7),
            })
            .collect();

        assert_eq!(advisor.feedback_multiplier("bench_press", Some(&feedback)), dec!(0.5));
        assert_eq!(advisor.feedback_multiplier("squat", Some(&feedback)), Decimal::ONE);
        assert_eq!(advisor.feedback_multiplier("bench_press", None), Decimal::ONE);
    }

    fn feedback(rating: FeedbackRating) -> Vec<SuggestionFeedback> {
        (0..3)
            .map(|i| SuggestionFeedback {
                exercise_id: "bench_press".to_string(),
                suggested_weight: dec!(102.5),
                actual_weight: dec!(100),
                rating,
                recorded_at: now() - Duration::days(i * 7),
            })
            .collect()
    }

    #[test]
    fn test_feedback_changes_suggested_weight() {
        let log = bench_log(dec!(100), 8, Some(6.0));
        let history = vec![session_with(log.clone(), 2)];
        let today = daily(Some(8.0), None);
        let suggest = |feedback: Option<&[SuggestionFeedback]>| {
            get_suggestion(
                "bench_press",
                Some(&log),
                Some(&today),
                &history,
                now(),
                Some(ExperienceLevel::Intermediate),
                feedback,
            )
        };

        let plain = suggest(None);
        let too_hard = suggest(Some(feedback(FeedbackRating::TooHard).as_slice()));
        let too_easy = suggest(Some(feedback(FeedbackRating::TooEasy).as_slice()));

        assert_eq!(plain.suggested_weight, dec!(102.5));
        assert_eq!(too_hard.suggested_weight, dec!(100));
        assert!(too_hard.reasoning.contains("too hard"));
        assert_eq!(too_easy.suggested_weight, dec!(105));
    }

    #[test]
    fn test_sessions_after_now_are_ignored() {
        let past = bench_log(dec!(100), 8, Some(6.0));
        let future = bench_log(dec!(140), 8, Some(6.0));
        let history = vec![session_with(past, 3), session_with(future, -5)];

        let suggestion = get_suggestion(
            "bench_press",
            None,
            None,
            &history,
            now(),
            Some(ExperienceLevel::Intermediate),
            None,
        );

        // Two rest days since the past session: 5.0 + 2 × 0.5
        assert_eq!(suggestion.recovery_score, 6.0);
        assert_eq!(suggestion.suggested_weight, dec!(102.5));
        assert!(suggestion.explanation.unwrap().contains("Last top set: 100 x 8"));
    }

    #[test]
    fn test_moderate_rpe_with_good_recovery_adds_small_step() {
        let log = bench_log(dec!(100), 8, Some(7.0));
        let history = vec![session_with(log.clone(), 2)];
        let today = daily(Some(8.0), None);

        let suggestion = get_suggestion("bench_press", Some(&log), Some(&today), &history, now(), None, None);

        assert_eq!(suggestion.suggested_weight, dec!(102.5));
        assert_eq!(suggestion.confidence, Confidence::Medium);
        assert!(suggestion.reasoning.contains("room in the tank"));
    }

    #[test]
    fn test_high_rpe_repeats_weight() {
        let log = bench_log(dec!(100), 5, Some(9.0));
        let history = vec![session_with(log.clone(), 2)];
        let today = daily(Some(8.0), None);

        let suggestion = get_suggestion("bench_press", Some(&log), Some(&today), &history, now(), None, None);

        assert_eq!(suggestion.suggested_weight, dec!(100));
        assert_eq!(suggestion.confidence, Confidence::Medium);
        assert!(suggestion.reasoning.contains("was high"));
        assert!(!suggestion.should_deload);
    }

    #[test]
    fn test_easy_rpe_with_middling_recovery_adds_small_step() {
        let log = bench_log(dec!(100), 8, Some(6.0));

        // Neutral recovery of 5.0 sits between the low and adequate thresholds
        let suggestion = get_suggestion("bench_press", Some(&log), None, &[], now(), None, None);

        assert_eq!(suggestion.recovery_score, 5.0);
        assert_eq!(suggestion.suggested_weight, dec!(102.5));
        assert_eq!(suggestion.confidence, Confidence::Medium);
        assert!(suggestion.reasoning.contains("only moderate"));
    }
}
