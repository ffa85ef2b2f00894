//! PR forecasting
//!
//! Fits a saturating growth curve `y = a(1 - e^(-b·x)) + c` to an exercise's
//! estimated-1RM series and projects it forward week by week. `x` is days since
//! the first data point and `c` is pinned to the historical minimum. `a` and `b`
//! come from a fixed grid search, so the same history always yields the same
//! forecast.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rayon::prelude::*;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::models::{completed_sessions, ExperienceLevel, WorkoutSession};
use crate::one_rep_max::estimate_one_rep_max;

/// Projections are cut off at ten years
pub const MAX_PROJECTION_WEEKS: u32 = 520;

/// Forecast configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Trailing window of history used for the fit
    pub lookback_weeks: i64,

    /// Minimum distinct training dates in the window
    pub min_data_points: usize,

    /// Fits below this R² are reported with zero confidence
    pub min_r_squared: f64,

    pub default_weeks: u32,

    /// Candidate amplitudes as multiples of the observed 1RM range
    pub amplitude_multipliers: Vec<f64>,

    /// Candidate rates as multiples of the experience seed rate
    pub rate_multipliers: Vec<f64>,

    /// Per-day growth rate seeds
    pub beginner_rate: f64,
    pub intermediate_rate: f64,
    pub advanced_rate: f64,

    /// Required weekly gain may be at most this multiple of the historical slope
    pub achievability_factor: f64,

    /// Sample size at which the sample component saturates
    pub sample_saturation: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            lookback_weeks: 12,
            min_data_points: 4,
            min_r_squared: 0.3,
            default_weeks: 8,
            amplitude_multipliers: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 2.5, 3.0],
            rate_multipliers: vec![0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0],
            beginner_rate: 0.02,
            intermediate_rate: 0.01,
            advanced_rate: 0.005,
            achievability_factor: 1.5,
            sample_saturation: 12,
        }
    }
}

impl ForecastConfig {
    pub fn seed_rate(&self, level: ExperienceLevel) -> f64 {
        match level {
            ExperienceLevel::Beginner => self.beginner_rate,
            ExperienceLevel::Intermediate => self.intermediate_rate,
            ExperienceLevel::Advanced => self.advanced_rate,
        }
    }
}

fn experience_bonus(level: ExperienceLevel) -> f64 {
    match level {
        ExperienceLevel::Beginner => 1.0,
        ExperienceLevel::Intermediate => 0.7,
        ExperienceLevel::Advanced => 0.4,
    }
}

/// Fitted saturating growth parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub r_squared: f64,
}

impl GrowthCurve {
    pub fn predict(&self, days: f64) -> f64 {
        self.a * (1.0 - (-self.b * days).exp()) + self.c
    }
}

/// One estimated-1RM observation, the best of its training day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub days: f64,
    pub one_rep_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub week: u32,
    pub date: NaiveDate,
    pub projected_one_rep_max: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrForecast {
    pub exercise_id: String,
    pub exercise_name: String,
    pub current_pr: Decimal,
    pub predicted_pr: Decimal,

    /// 0.0 to 1.0
    pub confidence: f64,

    pub projection: Vec<ForecastPoint>,
    pub achievable: bool,
    pub curve: GrowthCurve,
    pub data_points: usize,

    /// Historical estimated-1RM change per week
    pub weekly_slope: f64,

    pub reasoning: String,
}

/// R² of `curve` against `points`. A flat series has no variance to explain
/// and scores 0.
pub fn r_squared(points: &[DataPoint], curve: &GrowthCurve) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let mean = points.iter().map(|p| p.one_rep_max).mean();
    let ss_tot: f64 = points.iter().map(|p| (p.one_rep_max - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = points
        .iter()
        .map(|p| (p.one_rep_max - curve.predict(p.days)).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value.round()).unwrap_or(Decimal::ZERO)
}

/// PR forecaster
pub struct PrForecaster {
    config: ForecastConfig,
}

impl PrForecaster {
    pub fn new() -> Self {
        PrForecaster {
            config: ForecastConfig::default(),
        }
    }

    pub fn with_config(config: ForecastConfig) -> Self {
        PrForecaster { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Best estimated 1RM per training day inside the lookback window, oldest first
    pub fn collect_data_points(
        &self,
        exercise_id: &str,
        history: &[WorkoutSession],
        now: DateTime<Utc>,
    ) -> Vec<DataPoint> {
        let window_start = now - Duration::weeks(self.config.lookback_weeks);
        let mut best_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for session in completed_sessions(history) {
            if session.start_time <= window_start || session.start_time > now {
                continue;
            }
            for exercise in session.exercises.iter().filter(|e| e.exercise_id == exercise_id) {
                for set in exercise.working_sets() {
                    let estimate = estimate_one_rep_max(set.weight, set.reps).value_f64();
                    let best = best_by_date.entry(session.date()).or_insert(0.0);
                    if estimate > *best {
                        *best = estimate;
                    }
                }
            }
        }

        let Some(first) = best_by_date.keys().next().copied() else {
            return Vec::new();
        };

        best_by_date
            .into_iter()
            .map(|(date, one_rep_max)| DataPoint {
                date,
                days: (date - first).num_days() as f64,
                one_rep_max,
            })
            .collect()
    }

    /// Grid search for the best-fitting curve
    pub fn fit(&self, points: &[DataPoint], level: ExperienceLevel) -> GrowthCurve {
        let ys: Vec<f64> = points.iter().map(|p| p.one_rep_max).collect();
        let min = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let c = if min.is_finite() { min } else { 0.0 };
        let range = if max.is_finite() { max - c } else { 0.0 };
        let seed = self.config.seed_rate(level);

        let mut best = GrowthCurve {
            a: 0.0,
            b: seed,
            c,
            r_squared: f64::NEG_INFINITY,
        };

        for a_mult in &self.config.amplitude_multipliers {
            for b_mult in &self.config.rate_multipliers {
                let mut candidate = GrowthCurve {
                    a: range * a_mult,
                    b: seed * b_mult,
                    c,
                    r_squared: 0.0,
                };
                candidate.r_squared = r_squared(points, &candidate);
                if candidate.r_squared > best.r_squared {
                    best = candidate;
                }
            }
        }

        if !best.r_squared.is_finite() {
            best.r_squared = 0.0;
        }
        best
    }

    /// Consistency of week-to-week progress, 0.0 to 1.0.
    ///
    /// Weekly bests are differenced and expressed as a percentage of the mean
    /// 1RM; the score is `1 / (1 + variance)` of those changes.
    pub fn consistency(&self, points: &[DataPoint]) -> f64 {
        let mut weekly_best: BTreeMap<i64, f64> = BTreeMap::new();
        for point in points {
            let week = (point.days / 7.0).floor() as i64;
            let best = weekly_best.entry(week).or_insert(0.0);
            if point.one_rep_max > *best {
                *best = point.one_rep_max;
            }
        }

        let bests: Vec<f64> = weekly_best.values().copied().collect();
        let mean = points.iter().map(|p| p.one_rep_max).mean();
        if bests.len() < 3 || mean.is_nan() || mean <= 0.0 {
            return 0.5;
        }

        let deltas: Vec<f64> = bests.windows(2).map(|w| (w[1] - w[0]) / mean * 100.0).collect();
        let variance = deltas.iter().variance();
        if variance.is_finite() {
            1.0 / (1.0 + variance)
        } else {
            0.5
        }
    }

    /// Project the exercise's 1RM `weeks_to_project` weeks ahead of `now`.
    ///
    /// Returns `None` when the trailing window holds fewer than the minimum
    /// number of training days.
    pub fn forecast(
        &self,
        exercise_id: &str,
        exercise_name: &str,
        history: &[WorkoutSession],
        experience_level: ExperienceLevel,
        weeks_to_project: u32,
        now: DateTime<Utc>,
    ) -> Option<PrForecast> {
        let points = self.collect_data_points(exercise_id, history, now);
        if points.len() < self.config.min_data_points {
            debug!(
                exercise = exercise_id,
                points = points.len(),
                "Not enough data points to forecast"
            );
            return None;
        }

        let first = points[0];
        let last = points[points.len() - 1];
        let current = points.iter().map(|p| p.one_rep_max).fold(0.0, f64::max);
        let current_pr = to_decimal(current);

        let span_weeks = last.days / 7.0;
        let weekly_slope = if span_weeks > 0.0 {
            (last.one_rep_max - first.one_rep_max) / span_weeks
        } else {
            0.0
        };

        let curve = self.fit(&points, experience_level);

        if curve.r_squared < self.config.min_r_squared {
            info!(
                exercise = exercise_id,
                r_squared = curve.r_squared,
                "Progress too irregular to forecast"
            );
            return Some(PrForecast {
                exercise_id: exercise_id.to_string(),
                exercise_name: exercise_name.to_string(),
                current_pr,
                predicted_pr: current_pr,
                confidence: 0.0,
                projection: Vec::new(),
                achievable: false,
                curve,
                data_points: points.len(),
                weekly_slope,
                reasoning: format!(
                    "{} progress has been too irregular to model (fit R² {:.2}). Keep logging consistent top sets.",
                    exercise_name, curve.r_squared
                ),
            });
        }

        let weeks_to_project = weeks_to_project.min(MAX_PROJECTION_WEEKS);
        let today = now.date_naive();
        let days_to_today = (today - first.date).num_days() as f64;
        let projection: Vec<ForecastPoint> = (0..=weeks_to_project)
            .map_while(|week| {
                let date = today.checked_add_signed(Duration::weeks(week as i64))?;
                Some(ForecastPoint {
                    week,
                    date,
                    projected_one_rep_max: to_decimal(curve.predict(days_to_today + 7.0 * week as f64)),
                })
            })
            .collect();

        let predicted_pr = projection
            .last()
            .map(|p| p.projected_one_rep_max)
            .unwrap_or(current_pr);

        let gain = (predicted_pr - current_pr).to_f64().unwrap_or(0.0);
        let required_weekly_gain = if weeks_to_project > 0 {
            gain / weeks_to_project as f64
        } else {
            0.0
        };
        let achievable = required_weekly_gain <= 0.0
            || (weekly_slope > 0.0 && required_weekly_gain <= self.config.achievability_factor * weekly_slope);

        let sample_score = (points.len() as f64 / self.config.sample_saturation as f64).min(1.0);
        let confidence = (0.4 * curve.r_squared.clamp(0.0, 1.0)
            + 0.3 * self.consistency(&points)
            + 0.2 * sample_score
            + 0.1 * experience_bonus(experience_level))
        .clamp(0.0, 1.0);

        let reasoning = self.reasoning(
            exercise_name,
            predicted_pr,
            weeks_to_project,
            required_weekly_gain,
            weekly_slope,
            achievable,
        );

        info!(
            exercise = exercise_id,
            current = %current_pr,
            predicted = %predicted_pr,
            confidence,
            achievable,
            "PR forecast"
        );

        Some(PrForecast {
            exercise_id: exercise_id.to_string(),
            exercise_name: exercise_name.to_string(),
            current_pr,
            predicted_pr,
            confidence,
            projection,
            achievable,
            curve,
            data_points: points.len(),
            weekly_slope,
            reasoning,
        })
    }

    fn reasoning(
        &self,
        exercise_name: &str,
        predicted_pr: Decimal,
        weeks: u32,
        required_weekly_gain: f64,
        weekly_slope: f64,
        achievable: bool,
    ) -> String {
        if required_weekly_gain <= 0.0 {
            format!(
                "{} is holding near its current best, projected at {} in {} weeks (historical {:+.1} per week).",
                exercise_name, predicted_pr, weeks, weekly_slope
            )
        } else if achievable {
            format!(
                "{} is trending toward {} in {} weeks ({:+.1} per week, historical {:+.1} per week).",
                exercise_name, predicted_pr, weeks, required_weekly_gain, weekly_slope
            )
        } else {
            format!(
                "Reaching {} in {} weeks needs {:+.1} per week, more than {:.1}x your historical {:+.1} per week. Treat it as a stretch goal.",
                predicted_pr, weeks, required_weekly_gain, self.config.achievability_factor, weekly_slope
            )
        }
    }

    /// Forecast many exercises in parallel; exercises without enough data are skipped.
    ///
    /// `exercises` holds `(exercise_id, exercise_name)` pairs. Output order
    /// follows the input.
    pub fn forecast_all(
        &self,
        exercises: &[(String, String)],
        history: &[WorkoutSession],
        experience_level: ExperienceLevel,
        weeks_to_project: u32,
        now: DateTime<Utc>,
    ) -> Vec<PrForecast> {
        exercises
            .par_iter()
            .filter_map(|(id, name)| self.forecast(id, name, history, experience_level, weeks_to_project, now))
            .collect()
    }
}

impl Default for PrForecaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Forecast with default configuration
pub fn forecast_pr(
    exercise_id: &str,
    exercise_name: &str,
    history: &[WorkoutSession],
    experience_level: ExperienceLevel,
    weeks_to_project: u32,
    now: DateTime<Utc>,
) -> Option<PrForecast> {
    PrForecaster::new().forecast(exercise_id, exercise_name, history, experience_level, weeks_to_project, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseLog, SessionStatus, SetLog, SetType};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    fn session(days_ago: i64, exercise_id: &str, weight: Decimal, reps: u32) -> WorkoutSession {
        let start = now() - Duration::days(days_ago);
        WorkoutSession {
            id: format!("s-{}-{}", exercise_id, days_ago),
            name: "Session".to_string(),
            start_time: start,
            end_time: Some(start + Duration::hours(1)),
            status: SessionStatus::Completed,
            exercises: vec![ExerciseLog {
                id: format!("e-{}", days_ago),
                exercise_id: exercise_id.to_string(),
                sets: vec![SetLog {
                    id: "set".to_string(),
                    weight,
                    reps,
                    rpe: None,
                    set_type: SetType::Normal,
                    completed: true,
                }],
                notes: None,
                superset_id: None,
            }],
            notes: String::new(),
        }
    }

    /// Weekly singles following a diminishing-returns curve
    fn saturating_history(exercise_id: &str) -> Vec<WorkoutSession> {
        (0..10)
            .map(|week| {
                let days = week as f64 * 7.0;
                let value = 100.0 + 30.0 * (1.0 - (-0.02 * days).exp());
                session(70 - week * 7, exercise_id, Decimal::from_f64(value.round()).unwrap(), 1)
            })
            .collect()
    }

    #[test]
    fn test_insufficient_data_returns_none() {
        let history = vec![
            session(20, "squat", dec!(100), 5),
            session(13, "squat", dec!(105), 5),
            session(6, "squat", dec!(110), 5),
        ];
        assert!(forecast_pr("squat", "Squat", &history, ExperienceLevel::Beginner, 8, now()).is_none());
    }

    #[test]
    fn test_same_day_sessions_count_once() {
        let mut history = vec![
            session(20, "squat", dec!(100), 5),
            session(13, "squat", dec!(105), 5),
            session(6, "squat", dec!(110), 5),
        ];
        let mut extra = session(6, "squat", dec!(112.5), 3);
        extra.id = "duplicate-day".to_string();
        history.push(extra);

        assert!(forecast_pr("squat", "Squat", &history, ExperienceLevel::Beginner, 8, now()).is_none());
    }

    #[test]
    fn test_old_sessions_outside_window_ignored() {
        let history: Vec<WorkoutSession> = [120, 110, 100, 90, 5]
            .into_iter()
            .map(|d| session(d, "bench_press", dec!(80), 5))
            .collect();

        let forecaster = PrForecaster::new();
        assert_eq!(forecaster.collect_data_points("bench_press", &history, now()).len(), 1);
        assert!(forecaster
            .forecast("bench_press", "Bench", &history, ExperienceLevel::Intermediate, 8, now())
            .is_none());
    }

    #[test]
    fn test_saturating_progress_forecast() {
        let history = saturating_history("squat");
        let forecast = forecast_pr("squat", "Back Squat", &history, ExperienceLevel::Beginner, 8, now()).unwrap();

        assert_eq!(forecast.data_points, 10);
        assert!(forecast.curve.r_squared > 0.9);
        assert_eq!(forecast.projection.len(), 9);
        assert_eq!(forecast.projection[0].week, 0);
        assert_eq!(forecast.projection[8].date, now().date_naive() + Duration::weeks(8));
        assert!(forecast.predicted_pr >= forecast.current_pr);
        assert!(forecast.confidence > 0.0 && forecast.confidence <= 1.0);
        assert!(forecast.achievable);

        for pair in forecast.projection.windows(2) {
            assert!(pair[1].projected_one_rep_max >= pair[0].projected_one_rep_max);
        }
    }

    #[test]
    fn test_erratic_history_has_zero_confidence() {
        let weights = [100, 130, 95, 125, 90, 135, 100, 120];
        let history: Vec<WorkoutSession> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| session(56 - i as i64 * 7, "deadlift", Decimal::from(*w), 1))
            .collect();

        let forecast = forecast_pr("deadlift", "Deadlift", &history, ExperienceLevel::Intermediate, 8, now()).unwrap();

        assert!(forecast.curve.r_squared < 0.3);
        assert_eq!(forecast.confidence, 0.0);
        assert!(forecast.projection.is_empty());
        assert!(forecast.reasoning.contains("irregular"));
        assert_eq!(forecast.current_pr, dec!(135));
    }

    #[test]
    fn test_flat_history_is_low_confidence() {
        let history: Vec<WorkoutSession> = [35, 28, 21, 14, 7]
            .into_iter()
            .map(|d| session(d, "overhead_press", dec!(60), 1))
            .collect();

        let forecast = forecast_pr("overhead_press", "OHP", &history, ExperienceLevel::Advanced, 4, now()).unwrap();
        assert_eq!(forecast.curve.r_squared, 0.0);
        assert_eq!(forecast.confidence, 0.0);
    }

    #[test]
    fn test_unrealistic_target_not_achievable() {
        // Any projected gain fails a zero achievability factor
        let history = saturating_history("squat");
        let config = ForecastConfig {
            achievability_factor: 0.0,
            ..ForecastConfig::default()
        };
        let forecast = PrForecaster::with_config(config)
            .forecast("squat", "Squat", &history, ExperienceLevel::Beginner, 8, now())
            .unwrap();

        if forecast.predicted_pr > forecast.current_pr {
            assert!(!forecast.achievable);
            assert!(forecast.reasoning.contains("stretch goal"));
        }
    }

    #[test]
    fn test_huge_horizon_is_capped() {
        let history = saturating_history("squat");
        let forecast =
            forecast_pr("squat", "Back Squat", &history, ExperienceLevel::Beginner, u32::MAX, now()).unwrap();

        assert_eq!(forecast.projection.len(), MAX_PROJECTION_WEEKS as usize + 1);
        let last = forecast.projection.last().unwrap();
        assert_eq!(last.week, MAX_PROJECTION_WEEKS);
        assert_eq!(last.date, now().date_naive() + Duration::weeks(MAX_PROJECTION_WEEKS as i64));
    }

    #[test]
    fn test_reasoning_signs() {
        let forecaster = PrForecaster::new();

        let holding = forecaster.reasoning("Bench", dec!(97), 8, -0.4, -1.2, true);
        assert!(holding.contains("holding"));
        assert!(holding.contains("-1.2 per week"));
        assert!(!holding.contains("+-"));

        let trending = forecaster.reasoning("Bench", dec!(110), 8, 1.25, 2.0, true);
        assert!(trending.contains("+1.2 per week") || trending.contains("+1.3 per week"));
        assert!(trending.contains("historical +2.0"));

        let stretch = forecaster.reasoning("Bench", dec!(140), 8, 5.0, -0.5, false);
        assert!(stretch.contains("+5.0 per week"));
        assert!(stretch.contains("historical -0.5"));
        assert!(stretch.contains("stretch goal"));
    }

    #[test]
    fn test_r_squared_perfect_fit() {
        let curve = GrowthCurve { a: 20.0, b: 0.05, c: 100.0, r_squared: 0.0 };
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points: Vec<DataPoint> = (0..6)
            .map(|i| {
                let days = i as f64 * 7.0;
                DataPoint {
                    date: start + Duration::days(i * 7),
                    days,
                    one_rep_max: curve.predict(days),
                }
            })
            .collect();

        assert!((r_squared(&points, &curve) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_prefers_steady_progress() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = |values: &[f64]| -> Vec<DataPoint> {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| DataPoint {
                    date: start + Duration::days(i as i64 * 7),
                    days: i as f64 * 7.0,
                    one_rep_max: *v,
                })
                .collect()
        };

        let forecaster = PrForecaster::new();
        let steady = forecaster.consistency(&series(&[100.0, 102.5, 105.0, 107.5, 110.0]));
        let erratic = forecaster.consistency(&series(&[100.0, 110.0, 100.0, 115.0, 105.0]));

        assert!((steady - 1.0).abs() < 1e-9);
        assert!(erratic < steady);
    }

    #[test]
    fn test_forecast_all_skips_sparse_exercises() {
        let mut history = saturating_history("squat");
        history.extend(saturating_history("bench_press"));
        history.push(session(3, "deadlift", dec!(180), 3));

        let exercises = vec![
            ("squat".to_string(), "Squat".to_string()),
            ("deadlift".to_string(), "Deadlift".to_string()),
            ("bench_press".to_string(), "Bench Press".to_string()),
        ];
        let forecasts =
            PrForecaster::new().forecast_all(&exercises, &history, ExperienceLevel::Beginner, 6, now());

        assert_eq!(forecasts.len(), 2);
        assert_eq!(forecasts[0].exercise_id, "squat");
        assert_eq!(forecasts[1].exercise_id, "bench_press");
    }
}
