use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Template,
    Draft,
}

/// Set type tag as logged by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
    #[default]
    Normal,
    Warmup,
    Dropset,
    Failure,
}

/// Self-reported training experience, used to scale increments and intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "beginner"),
            ExperienceLevel::Intermediate => write!(f, "intermediate"),
            ExperienceLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(format!("Invalid experience level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

/// A single logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    pub id: String,

    /// Load on the bar (never negative)
    pub weight: Decimal,

    pub reps: u32,

    /// Rate of perceived exertion, 1-10 in half steps
    #[serde(default)]
    pub rpe: Option<f64>,

    #[serde(default)]
    pub set_type: SetType,

    pub completed: bool,
}

impl SetLog {
    /// Completed, non-warmup set with a real load and at least one rep.
    ///
    /// Only working sets feed volume, PR and fatigue calculations.
    pub fn is_working(&self) -> bool {
        self.completed
            && self.set_type != SetType::Warmup
            && self.weight > Decimal::ZERO
            && self.reps > 0
    }

    /// weight × reps
    pub fn volume(&self) -> Decimal {
        self.weight * Decimal::from(self.reps)
    }

    pub fn weight_f64(&self) -> f64 {
        self.weight.to_f64().unwrap_or(0.0)
    }
}

/// One exercise performed within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: String,

    /// Foreign key into the exercise catalog
    pub exercise_id: String,

    pub sets: Vec<SetLog>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub superset_id: Option<String>,
}

impl ExerciseLog {
    pub fn working_sets(&self) -> impl Iterator<Item = &SetLog> {
        self.sets.iter().filter(|s| s.is_working())
    }

    /// Total volume across working sets
    pub fn total_volume(&self) -> Decimal {
        self.working_sets().map(SetLog::volume).sum()
    }

    /// Heaviest working set, ties broken by reps
    pub fn top_set(&self) -> Option<&SetLog> {
        self.working_sets()
            .max_by(|a, b| a.weight.cmp(&b.weight).then(a.reps.cmp(&b.reps)))
    }

    /// Last working set in logged order that carries an RPE
    pub fn last_rpe_set(&self) -> Option<&SetLog> {
        self.working_sets().filter(|s| s.rpe.is_some()).last()
    }
}

/// A workout session with its exercise logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    pub status: SessionStatus,
    pub exercises: Vec<ExerciseLog>,

    #[serde(default)]
    pub notes: String,
}

impl WorkoutSession {
    /// Start a new active session
    pub fn new(name: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        WorkoutSession {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            start_time,
            end_time: None,
            status: SessionStatus::Active,
            exercises: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Calendar date the session started on
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    /// Session length in minutes, if the session has ended
    pub fn duration_minutes(&self) -> Option<f64> {
        self.end_time
            .map(|end| (end - self.start_time).num_seconds() as f64 / 60.0)
            .filter(|m| *m > 0.0)
    }

    pub fn exercise(&self, exercise_id: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    pub fn total_volume(&self) -> Decimal {
        self.exercises.iter().map(ExerciseLog::total_volume).sum()
    }
}

/// Daily biometric log, one per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,

    #[serde(default)]
    pub sleep_hours: Option<f64>,

    /// 1 (calm) to 10 (very stressed)
    #[serde(default)]
    pub stress_level: Option<u8>,

    /// 1 (fresh) to 10 (very sore)
    #[serde(default)]
    pub soreness: Option<u8>,

    #[serde(default)]
    pub bodyweight: Option<Decimal>,
}

impl DailyLog {
    pub fn empty(date: NaiveDate) -> Self {
        DailyLog {
            date,
            sleep_hours: None,
            stress_level: None,
            soreness: None,
            bodyweight: None,
        }
    }
}

/// Completed sessions sorted oldest first
pub fn completed_sessions(history: &[WorkoutSession]) -> Vec<&WorkoutSession> {
    let mut sessions: Vec<&WorkoutSession> = history.iter().filter(|s| s.is_completed()).collect();
    sessions.sort_by_key(|s| s.start_time);
    sessions
}

/// Completed sessions that started no later than `now`, oldest first
pub fn completed_sessions_until(history: &[WorkoutSession], now: DateTime<Utc>) -> Vec<&WorkoutSession> {
    completed_sessions(history)
        .into_iter()
        .filter(|s| s.start_time <= now)
        .collect()
}

/// Most recent completed log of an exercise as of `now`
pub fn latest_exercise_log<'a>(
    history: &'a [WorkoutSession],
    exercise_id: &str,
    now: DateTime<Utc>,
) -> Option<(&'a WorkoutSession, &'a ExerciseLog)> {
    completed_sessions_until(history, now)
        .into_iter()
        .rev()
        .find_map(|s| s.exercise(exercise_id).map(|e| (s, e)))
}
