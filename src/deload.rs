//! Deload need analysis
//!
//! Aggregates recent session performance to decide whether a deload is due and
//! what kind. Three signals feed a 0-100 score:
//!
//! - **Time** since the last deload relative to an experience-based interval (0-30)
//! - **Stalls**, exercises that have not matched their peak weight for weeks (0-30)
//! - **Fatigue indicators** comparing the last two weeks against the two before (0-40)
//!
//! The score maps onto an urgency tier, and the pattern of indicators picks the
//! deload type and its protocol.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::models::{completed_sessions_until, ExperienceLevel, SetType, WorkoutSession};

/// Mild / moderate / severe cut-offs for one indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
}

impl SeverityThresholds {
    pub fn classify(&self, value: f64) -> Option<Severity> {
        if value >= self.severe {
            Some(Severity::Severe)
        } else if value >= self.moderate {
            Some(Severity::Moderate)
        } else if value >= self.mild {
            Some(Severity::Mild)
        } else {
            None
        }
    }
}

/// Deload policy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadConfig {
    /// Completed sessions required inside the lookback window
    pub min_sessions: usize,
    pub lookback_days: i64,

    /// Sessions an exercise needs before it can be considered stalled
    pub stall_min_sessions: usize,

    /// Peak must be matched within this many days or the exercise is stalled
    pub stall_window_days: i64,

    /// Length of each of the recent and baseline fatigue windows
    pub fatigue_window_days: i64,

    pub beginner_interval_days: i64,
    pub intermediate_interval_days: i64,
    pub advanced_interval_days: i64,

    /// Average RPE increase, recent over baseline
    pub rpe_creep: SeverityThresholds,

    /// Percent decline in total volume
    pub volume_drop_pct: SeverityThresholds,

    /// Fraction of planned reps missed
    pub missed_reps_ratio: SeverityThresholds,

    /// Percent fewer sessions
    pub frequency_drop_pct: SeverityThresholds,

    /// Percent longer average session
    pub duration_increase_pct: SeverityThresholds,

    pub max_recommendations: usize,
}

impl Default for DeloadConfig {
    fn default() -> Self {
        DeloadConfig {
            min_sessions: 4,
            lookback_days: 56,
            stall_min_sessions: 4,
            stall_window_days: 21,
            fatigue_window_days: 14,
            beginner_interval_days: 56,
            intermediate_interval_days: 35,
            advanced_interval_days: 28,
            rpe_creep: SeverityThresholds { mild: 0.5, moderate: 0.7, severe: 1.0 },
            volume_drop_pct: SeverityThresholds { mild: 15.0, moderate: 20.0, severe: 25.0 },
            missed_reps_ratio: SeverityThresholds { mild: 0.10, moderate: 0.15, severe: 0.20 },
            frequency_drop_pct: SeverityThresholds { mild: 25.0, moderate: 40.0, severe: 50.0 },
            duration_increase_pct: SeverityThresholds { mild: 20.0, moderate: 30.0, severe: 40.0 },
            max_recommendations: 6,
        }
    }
}

impl DeloadConfig {
    pub fn interval_days(&self, level: ExperienceLevel) -> i64 {
        match level {
            ExperienceLevel::Beginner => self.beginner_interval_days,
            ExperienceLevel::Intermediate => self.intermediate_interval_days,
            ExperienceLevel::Advanced => self.advanced_interval_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn points(&self) -> f64 {
        match self {
            Severity::Mild => 5.0,
            Severity::Moderate => 10.0,
            Severity::Severe => 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueIndicatorKind {
    RpeCreep,
    VolumeDrop,
    MissedReps,
    FrequencyDrop,
    DurationIncrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueIndicator {
    pub kind: FatigueIndicatorKind,
    pub severity: Severity,
    pub recent_value: f64,
    pub baseline_value: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StalledExercise {
    pub exercise_id: String,
    pub weeks_stalled: u32,
    pub peak_weight: Decimal,
    pub percent_below_peak: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadUrgency {
    None,
    Soon,
    Recommended,
    Critical,
}

impl DeloadUrgency {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            DeloadUrgency::Critical
        } else if score >= 60.0 {
            DeloadUrgency::Recommended
        } else if score >= 40.0 {
            DeloadUrgency::Soon
        } else {
            DeloadUrgency::None
        }
    }
}

impl std::fmt::Display for DeloadUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeloadUrgency::None => write!(f, "none"),
            DeloadUrgency::Soon => write!(f, "soon"),
            DeloadUrgency::Recommended => write!(f, "recommended"),
            DeloadUrgency::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadType {
    Full,
    Volume,
    Intensity,
    ActiveRecovery,
}

impl std::fmt::Display for DeloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeloadType::Full => write!(f, "full"),
            DeloadType::Volume => write!(f, "volume"),
            DeloadType::Intensity => write!(f, "intensity"),
            DeloadType::ActiveRecovery => write!(f, "active recovery"),
        }
    }
}

/// Concrete plan for a deload week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadProtocol {
    pub deload_type: DeloadType,
    pub duration_days: u32,
    pub volume_reduction_pct: u32,
    pub intensity_reduction_pct: u32,
    pub focus_areas: Vec<String>,
    pub activities: Vec<String>,
}

struct ProtocolRow {
    deload_type: DeloadType,
    duration_days: u32,
    volume_reduction_pct: u32,
    intensity_reduction_pct: u32,
    focus_areas: &'static [&'static str],
    activities: &'static [&'static str],
}

const DELOAD_PROTOCOLS: &[ProtocolRow] = &[
    ProtocolRow {
        deload_type: DeloadType::Full,
        duration_days: 7,
        volume_reduction_pct: 50,
        intensity_reduction_pct: 20,
        focus_areas: &["Systemic recovery", "Sleep and nutrition", "Joint health"],
        activities: &[
            "Technique work at 50-60% of working weights",
            "Walking or easy cycling",
            "Daily mobility and stretching",
        ],
    },
    ProtocolRow {
        deload_type: DeloadType::Volume,
        duration_days: 7,
        volume_reduction_pct: 50,
        intensity_reduction_pct: 10,
        focus_areas: &["Reduce accumulated fatigue", "Keep bar speed crisp"],
        activities: &[
            "Half the usual working sets at normal weights",
            "Stop every set 3-4 reps short of failure",
        ],
    },
    ProtocolRow {
        deload_type: DeloadType::Intensity,
        duration_days: 5,
        volume_reduction_pct: 10,
        intensity_reduction_pct: 30,
        focus_areas: &["Restore work capacity", "Movement quality"],
        activities: &[
            "Usual sets and reps at 70% of working weights",
            "Tempo and pause variations",
        ],
    },
    ProtocolRow {
        deload_type: DeloadType::ActiveRecovery,
        duration_days: 4,
        volume_reduction_pct: 60,
        intensity_reduction_pct: 40,
        focus_areas: &["Active recovery", "Mobility"],
        activities: &["Light full-body circuits", "Yoga or stretching", "Easy cardio, 20-30 minutes"],
    },
];

impl DeloadProtocol {
    pub fn for_type(deload_type: DeloadType) -> DeloadProtocol {
        let row = DELOAD_PROTOCOLS
            .iter()
            .find(|p| p.deload_type == deload_type)
            .unwrap_or(&DELOAD_PROTOCOLS[DELOAD_PROTOCOLS.len() - 1]);

        DeloadProtocol {
            deload_type: row.deload_type,
            duration_days: row.duration_days,
            volume_reduction_pct: row.volume_reduction_pct,
            intensity_reduction_pct: row.intensity_reduction_pct,
            focus_areas: row.focus_areas.iter().map(|s| s.to_string()).collect(),
            activities: row.activities.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Score contributions, each already capped
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time_component: f64,
    pub stall_component: f64,
    pub fatigue_component: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadRecommendation {
    pub urgency: DeloadUrgency,

    /// 0-100
    pub score: u8,

    pub breakdown: ScoreBreakdown,
    pub stalled_exercises: Vec<StalledExercise>,
    pub fatigue_indicators: Vec<FatigueIndicator>,
    pub recommendations: Vec<String>,
    pub deload_type: Option<DeloadType>,
    pub protocol: Option<DeloadProtocol>,
    pub days_since_last_deload: i64,
    pub sessions_analyzed: usize,
}

impl DeloadRecommendation {
    /// Result for histories too short to analyze
    pub fn empty(sessions_analyzed: usize) -> Self {
        DeloadRecommendation {
            urgency: DeloadUrgency::None,
            score: 0,
            breakdown: ScoreBreakdown::default(),
            stalled_exercises: Vec::new(),
            fatigue_indicators: Vec::new(),
            recommendations: vec![
                "Log at least 4 sessions to unlock deload analysis".to_string(),
            ],
            deload_type: None,
            protocol: None,
            days_since_last_deload: 0,
            sessions_analyzed,
        }
    }
}

/// Top working weight of one exercise within one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSessionStats {
    pub date: NaiveDate,
    pub max_weight: Decimal,
}

/// Aggregate of a fatigue comparison window
#[derive(Debug, Clone, PartialEq, Default)]
struct WindowStats {
    sessions: usize,
    total_volume: f64,
    avg_rpe: Option<f64>,
    missed_reps: u32,
    planned_reps: u32,
    avg_duration_minutes: Option<f64>,
}

impl WindowStats {
    fn from_sessions(sessions: &[&WorkoutSession]) -> Self {
        let mut rpes = Vec::new();
        let mut durations = Vec::new();
        let mut total_volume = 0.0;
        let mut missed_reps = 0;
        let mut planned_reps = 0;

        for session in sessions {
            if let Some(minutes) = session.duration_minutes() {
                durations.push(minutes);
            }
            for exercise in &session.exercises {
                for set in &exercise.sets {
                    if set.set_type == SetType::Warmup || set.reps == 0 {
                        continue;
                    }
                    planned_reps += set.reps;
                    if !set.completed {
                        missed_reps += set.reps;
                    }
                    if set.is_working() {
                        total_volume += set.volume().to_f64().unwrap_or(0.0);
                        if let Some(rpe) = set.rpe {
                            rpes.push(rpe);
                        }
                    }
                }
            }
        }

        WindowStats {
            sessions: sessions.len(),
            total_volume,
            avg_rpe: (!rpes.is_empty()).then(|| rpes.iter().mean()),
            missed_reps,
            planned_reps,
            avg_duration_minutes: (!durations.is_empty()).then(|| durations.iter().mean()),
        }
    }

    fn missed_ratio(&self) -> f64 {
        if self.planned_reps == 0 {
            0.0
        } else {
            self.missed_reps as f64 / self.planned_reps as f64
        }
    }
}

/// Per-exercise, per-session statistics, oldest first
pub fn aggregate_exercise_sessions(
    sessions: &[&WorkoutSession],
) -> BTreeMap<String, Vec<ExerciseSessionStats>> {
    let mut by_exercise: BTreeMap<String, Vec<ExerciseSessionStats>> = BTreeMap::new();

    for session in sessions {
        for exercise in &session.exercises {
            let Some(max_weight) = exercise.working_sets().map(|s| s.weight).max() else {
                continue;
            };

            by_exercise
                .entry(exercise.exercise_id.clone())
                .or_default()
                .push(ExerciseSessionStats {
                    date: session.date(),
                    max_weight,
                });
        }
    }

    by_exercise
}

/// Combine capped components into the 0-100 score
pub fn calculate_score(
    days_since_deload: i64,
    interval_days: i64,
    stalls: &[StalledExercise],
    indicators: &[FatigueIndicator],
) -> ScoreBreakdown {
    let time_component = if interval_days > 0 {
        (30.0 * days_since_deload.max(0) as f64 / interval_days as f64).min(30.0)
    } else {
        30.0
    };

    let stall_weeks: u32 = stalls.iter().map(|s| s.weeks_stalled).sum();
    let stall_component = (10.0 * stalls.len() as f64 + 2.0 * stall_weeks as f64).min(30.0);

    let fatigue_component = indicators
        .iter()
        .map(|i| i.severity.points())
        .sum::<f64>()
        .min(40.0);

    ScoreBreakdown {
        time_component,
        stall_component,
        fatigue_component,
    }
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        (self.time_component + self.stall_component + self.fatigue_component).min(100.0)
    }

    /// Reported score; urgency is always derived from this value
    pub fn score(&self) -> u8 {
        self.total().round() as u8
    }

    pub fn urgency(&self) -> DeloadUrgency {
        DeloadUrgency::from_score(self.score() as f64)
    }
}

/// Pick the deload type from the stall and indicator pattern
pub fn select_deload_type(stalls: &[StalledExercise], indicators: &[FatigueIndicator]) -> DeloadType {
    let severe = indicators.iter().filter(|i| i.severity == Severity::Severe).count();
    let has = |kind: FatigueIndicatorKind| indicators.iter().any(|i| i.kind == kind);

    if severe >= 2 || stalls.len() >= 3 {
        DeloadType::Full
    } else if has(FatigueIndicatorKind::RpeCreep) && !has(FatigueIndicatorKind::VolumeDrop) {
        DeloadType::Volume
    } else if has(FatigueIndicatorKind::VolumeDrop) {
        DeloadType::Intensity
    } else {
        DeloadType::ActiveRecovery
    }
}

/// Days since the last deload, inferred from training gaps.
///
/// Scans completed sessions newest first for a gap longer than a week between
/// consecutive sessions and reports the days since that gap ended. Without such
/// a gap, reports the days since the earliest session.
pub fn infer_days_since_deload(history: &[WorkoutSession], now: DateTime<Utc>) -> i64 {
    let today = now.date_naive();
    let sessions = completed_sessions_until(history, now);

    let Some(earliest) = sessions.first() else {
        return 0;
    };

    for pair in sessions.windows(2).rev() {
        let (older, newer) = (pair[0], pair[1]);
        if (newer.date() - older.date()).num_days() > 7 {
            return (today - newer.date()).num_days();
        }
    }

    (today - earliest.date()).num_days()
}

/// Deload need analysis
pub struct DeloadAnalyzer {
    config: DeloadConfig,
}

impl DeloadAnalyzer {
    pub fn new() -> Self {
        DeloadAnalyzer {
            config: DeloadConfig::default(),
        }
    }

    pub fn with_config(config: DeloadConfig) -> Self {
        DeloadAnalyzer { config }
    }

    pub fn config(&self) -> &DeloadConfig {
        &self.config
    }

    /// Exercises that have not matched their peak weight within the stall window
    pub fn detect_stalls(
        &self,
        stats: &BTreeMap<String, Vec<ExerciseSessionStats>>,
        now: DateTime<Utc>,
    ) -> Vec<StalledExercise> {
        let today = now.date_naive();
        let window_start = today - Duration::days(self.config.stall_window_days);
        let mut stalls = Vec::new();

        for (exercise_id, sessions) in stats {
            if sessions.len() < self.config.stall_min_sessions {
                continue;
            }

            let Some(peak) = sessions.iter().map(|s| s.max_weight).max() else {
                continue;
            };
            let Some(last_peak_date) = sessions
                .iter()
                .filter(|s| s.max_weight == peak)
                .map(|s| s.date)
                .max()
            else {
                continue;
            };

            // Exercises that are no longer trained are dropped, not stalled
            let Some(recent_best) = sessions
                .iter()
                .filter(|s| s.date > window_start)
                .map(|s| s.max_weight)
                .max()
            else {
                continue;
            };

            let days_since_peak = (today - last_peak_date).num_days();
            if days_since_peak < self.config.stall_window_days || peak <= Decimal::ZERO {
                continue;
            }

            let percent_below_peak = ((peak - recent_best) / peak * Decimal::from(100))
                .to_f64()
                .unwrap_or(0.0);

            stalls.push(StalledExercise {
                exercise_id: exercise_id.clone(),
                weeks_stalled: (days_since_peak / 7) as u32,
                peak_weight: peak,
                percent_below_peak,
            });
        }

        stalls.sort_by(|a, b| {
            b.weeks_stalled
                .cmp(&a.weeks_stalled)
                .then_with(|| a.exercise_id.cmp(&b.exercise_id))
        });
        stalls
    }

    /// Compare the recent window against the baseline window before it
    pub fn detect_fatigue_indicators(
        &self,
        sessions: &[&WorkoutSession],
        now: DateTime<Utc>,
    ) -> Vec<FatigueIndicator> {
        let window = Duration::days(self.config.fatigue_window_days);
        let recent_start = now - window;
        let baseline_start = recent_start - window;

        let recent: Vec<&WorkoutSession> = sessions
            .iter()
            .copied()
            .filter(|s| s.start_time > recent_start && s.start_time <= now)
            .collect();
        let baseline: Vec<&WorkoutSession> = sessions
            .iter()
            .copied()
            .filter(|s| s.start_time > baseline_start && s.start_time <= recent_start)
            .collect();

        let recent = WindowStats::from_sessions(&recent);
        let baseline = WindowStats::from_sessions(&baseline);
        let mut indicators = Vec::new();

        if baseline.sessions == 0 {
            debug!("No baseline sessions, skipping fatigue comparison");
            return indicators;
        }

        if let (Some(r), Some(b)) = (recent.avg_rpe, baseline.avg_rpe) {
            let creep = r - b;
            if let Some(severity) = self.config.rpe_creep.classify(creep) {
                indicators.push(FatigueIndicator {
                    kind: FatigueIndicatorKind::RpeCreep,
                    severity,
                    recent_value: r,
                    baseline_value: b,
                    description: format!(
                        "Average RPE rose from {:.1} to {:.1} for the same work",
                        b, r
                    ),
                });
            }
        }

        if baseline.total_volume > 0.0 && recent.sessions > 0 {
            let drop_pct = (baseline.total_volume - recent.total_volume) / baseline.total_volume * 100.0;
            if let Some(severity) = self.config.volume_drop_pct.classify(drop_pct) {
                indicators.push(FatigueIndicator {
                    kind: FatigueIndicatorKind::VolumeDrop,
                    severity,
                    recent_value: recent.total_volume,
                    baseline_value: baseline.total_volume,
                    description: format!("Training volume dropped {:.0}% over the last two weeks", drop_pct),
                });
            }
        }

        let recent_missed = recent.missed_ratio();
        let baseline_missed = baseline.missed_ratio();
        if recent_missed > self.config.missed_reps_ratio.mild && recent_missed > baseline_missed {
            if let Some(severity) = self.config.missed_reps_ratio.classify(recent_missed) {
                indicators.push(FatigueIndicator {
                    kind: FatigueIndicatorKind::MissedReps,
                    severity,
                    recent_value: recent_missed,
                    baseline_value: baseline_missed,
                    description: format!(
                        "{:.0}% of planned reps were missed recently (was {:.0}%)",
                        recent_missed * 100.0,
                        baseline_missed * 100.0
                    ),
                });
            }
        }

        let frequency_drop = (baseline.sessions as f64 - recent.sessions as f64) / baseline.sessions as f64 * 100.0;
        if let Some(severity) = self.config.frequency_drop_pct.classify(frequency_drop) {
            indicators.push(FatigueIndicator {
                kind: FatigueIndicatorKind::FrequencyDrop,
                severity,
                recent_value: recent.sessions as f64 / (self.config.fatigue_window_days as f64 / 7.0),
                baseline_value: baseline.sessions as f64 / (self.config.fatigue_window_days as f64 / 7.0),
                description: format!(
                    "Session frequency fell from {} to {} per two weeks",
                    baseline.sessions, recent.sessions
                ),
            });
        }

        if let (Some(r), Some(b)) = (recent.avg_duration_minutes, baseline.avg_duration_minutes) {
            if b > 0.0 {
                let increase = (r - b) / b * 100.0;
                if let Some(severity) = self.config.duration_increase_pct.classify(increase) {
                    indicators.push(FatigueIndicator {
                        kind: FatigueIndicatorKind::DurationIncrease,
                        severity,
                        recent_value: r,
                        baseline_value: b,
                        description: format!(
                            "Sessions are taking {:.0}% longer ({:.0} vs {:.0} minutes)",
                            increase, r, b
                        ),
                    });
                }
            }
        }

        indicators
    }

    fn build_recommendations(
        &self,
        urgency: DeloadUrgency,
        protocol: &DeloadProtocol,
        stalls: &[StalledExercise],
        indicators: &[FatigueIndicator],
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        recommendations.push(match urgency {
            DeloadUrgency::Critical => format!(
                "Deload now: take a {}-day {} deload before your next heavy session",
                protocol.duration_days, protocol.deload_type
            ),
            DeloadUrgency::Recommended => format!(
                "Schedule a {}-day {} deload within the next week",
                protocol.duration_days, protocol.deload_type
            ),
            DeloadUrgency::Soon => "A deload is coming up - plan one in the next 1-2 weeks".to_string(),
            DeloadUrgency::None => "No deload needed - keep training as planned".to_string(),
        });

        if let Some(stall) = stalls.first() {
            recommendations.push(format!(
                "{} has stalled for {} weeks ({:.1}% below its {} peak) - reset to 90% and build back up",
                stall.exercise_id, stall.weeks_stalled, stall.percent_below_peak, stall.peak_weight
            ));
        }

        for indicator in indicators {
            recommendations.push(indicator.description.clone());
        }

        if urgency == DeloadUrgency::None {
            recommendations.push("Keep logging RPE on working sets to sharpen fatigue detection".to_string());
        } else {
            recommendations.push("Prioritize 7-9 hours of sleep and keep protein intake high".to_string());
        }

        recommendations.truncate(self.config.max_recommendations);
        recommendations
    }

    /// Assess deload need from the completed history.
    ///
    /// `last_deload_date` overrides the gap-based inference of
    /// [`infer_days_since_deload`].
    pub fn analyze(
        &self,
        history: &[WorkoutSession],
        experience_level: ExperienceLevel,
        last_deload_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> DeloadRecommendation {
        let lookback_start = now - Duration::days(self.config.lookback_days);
        let all_sessions = completed_sessions_until(history, now);
        let window_sessions: Vec<&WorkoutSession> = all_sessions
            .iter()
            .copied()
            .filter(|s| s.start_time > lookback_start)
            .collect();

        if window_sessions.len() < self.config.min_sessions {
            debug!(
                sessions = window_sessions.len(),
                required = self.config.min_sessions,
                "Not enough sessions for deload analysis"
            );
            return DeloadRecommendation::empty(window_sessions.len());
        }

        let stats = aggregate_exercise_sessions(&all_sessions);
        let stalls = self.detect_stalls(&stats, now);
        let indicators = self.detect_fatigue_indicators(&window_sessions, now);

        let days_since_last_deload = match last_deload_date {
            Some(date) => (now.date_naive() - date).num_days().max(0),
            None => infer_days_since_deload(history, now),
        };

        let breakdown = calculate_score(
            days_since_last_deload,
            self.config.interval_days(experience_level),
            &stalls,
            &indicators,
        );
        let score = breakdown.score();
        let urgency = breakdown.urgency();
        let deload_type = select_deload_type(&stalls, &indicators);
        let protocol = DeloadProtocol::for_type(deload_type);
        let recommendations = self.build_recommendations(urgency, &protocol, &stalls, &indicators);

        info!(
            score,
            urgency = %urgency,
            stalls = stalls.len(),
            indicators = indicators.len(),
            days_since_last_deload,
            "Deload analysis complete"
        );

        DeloadRecommendation {
            urgency,
            score,
            breakdown,
            stalled_exercises: stalls,
            fatigue_indicators: indicators,
            recommendations,
            deload_type: Some(deload_type),
            protocol: Some(protocol),
            days_since_last_deload,
            sessions_analyzed: window_sessions.len(),
        }
    }
}

impl Default for DeloadAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Deload analysis with default policy
pub fn analyze_deload_need(
    history: &[WorkoutSession],
    experience_level: ExperienceLevel,
    last_deload_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> DeloadRecommendation {
    DeloadAnalyzer::new().analyze(history, experience_level, last_deload_date, now)
}
