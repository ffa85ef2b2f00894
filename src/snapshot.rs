//! Training snapshots
//!
//! A snapshot is the caller-owned store the engine reads from: session history,
//! daily biometric logs keyed by date, PR histories, training maxes and past
//! suggestion feedback. It is persisted as JSON. Daily logs can also be
//! imported from CSV exports.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{LiftRsError, Result, SnapshotError};
use crate::models::{completed_sessions, DailyLog, WorkoutSession};
use crate::pr::ExercisePrHistory;
use crate::progression::SuggestionFeedback;
use crate::training_max::TrainingMax;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSnapshot {
    #[serde(default)]
    pub sessions: Vec<WorkoutSession>,

    /// One entry per calendar day
    #[serde(default)]
    pub daily_logs: BTreeMap<NaiveDate, DailyLog>,

    #[serde(default)]
    pub pr_histories: HashMap<String, ExercisePrHistory>,

    #[serde(default)]
    pub training_maxes: HashMap<String, TrainingMax>,

    #[serde(default)]
    pub feedback: Vec<SuggestionFeedback>,

    /// Display names for exercise ids
    #[serde(default)]
    pub exercise_names: HashMap<String, String>,
}

impl TrainingSnapshot {
    /// Load and validate a JSON snapshot
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SnapshotError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = fs::read_to_string(path)?;
        let snapshot: TrainingSnapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;

        info!(
            path = %path.display(),
            sessions = snapshot.sessions.len(),
            daily_logs = snapshot.daily_logs.len(),
            "Loaded training snapshot"
        );
        Ok(snapshot)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = %path.display(), "Saved training snapshot");
        Ok(())
    }

    /// Reject duplicate session ids and out-of-range set values
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for session in &self.sessions {
            if !seen.insert(session.id.as_str()) {
                return Err(SnapshotError::DuplicateSession {
                    id: session.id.clone(),
                }
                .into());
            }

            for exercise in &session.exercises {
                for (index, set) in exercise.sets.iter().enumerate() {
                    let location = || {
                        format!(
                            "session {} / {} / set {}",
                            session.id,
                            exercise.exercise_id,
                            index + 1
                        )
                    };

                    if set.weight < Decimal::ZERO {
                        return Err(invalid_record(location(), format!("negative weight {}", set.weight)));
                    }
                    if let Some(rpe) = set.rpe {
                        if !(1.0..=10.0).contains(&rpe) {
                            return Err(invalid_record(location(), format!("RPE {} outside 1-10", rpe)));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    pub fn daily_log(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.daily_logs.get(&date)
    }

    /// Insert or merge a daily log; fields present in `log` win
    pub fn upsert_daily_log(&mut self, log: DailyLog) {
        match self.daily_logs.get_mut(&log.date) {
            Some(existing) => {
                existing.sleep_hours = log.sleep_hours.or(existing.sleep_hours);
                existing.stress_level = log.stress_level.or(existing.stress_level);
                existing.soreness = log.soreness.or(existing.soreness);
                existing.bodyweight = log.bodyweight.or(existing.bodyweight);
            }
            None => {
                self.daily_logs.insert(log.date, log);
            }
        }
    }

    /// Most recent logged bodyweight on or before `date`
    pub fn latest_bodyweight(&self, date: NaiveDate) -> Option<Decimal> {
        self.daily_logs
            .range(..=date)
            .rev()
            .find_map(|(_, log)| log.bodyweight)
    }

    /// Exercise ids appearing in completed sessions
    pub fn exercise_ids(&self) -> BTreeSet<String> {
        completed_sessions(&self.sessions)
            .into_iter()
            .flat_map(|s| s.exercises.iter().map(|e| e.exercise_id.clone()))
            .collect()
    }

    /// Display name for an exercise, derived from the id when none is stored
    pub fn exercise_name(&self, exercise_id: &str) -> String {
        if let Some(name) = self.exercise_names.get(exercise_id) {
            return name.clone();
        }
        exercise_id
            .split(['_', '-', ' '])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replay completed sessions in order to rebuild every exercise's PR history
    pub fn rebuild_pr_histories(&self) -> HashMap<String, ExercisePrHistory> {
        let mut histories: HashMap<String, ExercisePrHistory> = HashMap::new();

        for session in completed_sessions(&self.sessions) {
            let date = session.date();
            for exercise in &session.exercises {
                for set in exercise.working_sets() {
                    let current = histories
                        .remove(&exercise.exercise_id)
                        .unwrap_or_else(|| ExercisePrHistory::new(exercise.exercise_id.clone()));
                    let (next, _) = current.with_set(set, date);
                    histories.insert(exercise.exercise_id.clone(), next);
                }
            }
        }

        histories
    }

    /// Import daily logs from CSV, upserting by date. Returns the rows applied.
    pub fn import_daily_logs_csv<R: Read>(&mut self, reader: R) -> Result<usize> {
        let logs = parse_daily_logs_csv(reader)?;
        let count = logs.len();
        for log in logs {
            self.upsert_daily_log(log);
        }
        info!(rows = count, "Imported daily logs");
        Ok(count)
    }

    pub fn import_daily_logs_csv_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SnapshotError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        self.import_daily_logs_csv(fs::File::open(path)?)
    }
}

fn invalid_record(location: String, reason: String) -> LiftRsError {
    SnapshotError::InvalidRecord { location, reason }.into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DailyColumn {
    Date,
    Sleep,
    Stress,
    Soreness,
    Bodyweight,
}

fn normalize_column(name: &str) -> Option<DailyColumn> {
    match name.to_lowercase().replace([' ', '-'], "_").as_str() {
        "date" | "day" => Some(DailyColumn::Date),
        "sleep_hours" | "sleep" | "hours_slept" => Some(DailyColumn::Sleep),
        "stress_level" | "stress" => Some(DailyColumn::Stress),
        "soreness" | "doms" => Some(DailyColumn::Soreness),
        "bodyweight" | "body_weight" | "weight" | "bw" => Some(DailyColumn::Bodyweight),
        _ => None,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_optional<T: FromStr>(value: Option<&str>, row: usize, column: &str) -> Result<Option<T>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid_record(format!("row {}", row), format!("invalid {} '{}'", column, raw))),
    }
}

fn parse_scale(value: Option<&str>, row: usize, column: &str) -> Result<Option<u8>> {
    let parsed = parse_optional::<u8>(value, row, column)?;
    if let Some(v) = parsed {
        if !(1..=10).contains(&v) {
            return Err(invalid_record(format!("row {}", row), format!("{} {} outside 1-10", column, v)));
        }
    }
    Ok(parsed)
}

/// Parse a daily-log CSV. Header names are matched loosely; unknown columns
/// are ignored and blank cells are treated as missing.
pub fn parse_daily_logs_csv<R: Read>(reader: R) -> Result<Vec<DailyLog>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns: Vec<Option<DailyColumn>> = headers.iter().map(normalize_column).collect();
    if !columns.contains(&Some(DailyColumn::Date)) {
        return Err(invalid_record("header".to_string(), "missing date column".to_string()));
    }

    let field = |record: &StringRecord, column: DailyColumn| -> Option<String> {
        columns
            .iter()
            .position(|c| *c == Some(column))
            .and_then(|i| record.get(i))
            .map(str::to_string)
    };

    let mut logs = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 2;

        let Some(raw_date) = field(&record, DailyColumn::Date).filter(|d| !d.is_empty()) else {
            warn!(row, "Skipping daily log row without a date");
            continue;
        };
        let date = parse_date(&raw_date)
            .ok_or_else(|| invalid_record(format!("row {}", row), format!("invalid date '{}'", raw_date)))?;

        logs.push(DailyLog {
            date,
            sleep_hours: parse_optional::<f64>(field(&record, DailyColumn::Sleep).as_deref(), row, "sleep_hours")?,
            stress_level: parse_scale(field(&record, DailyColumn::Stress).as_deref(), row, "stress_level")?,
            soreness: parse_scale(field(&record, DailyColumn::Soreness).as_deref(), row, "soreness")?,
            bodyweight: parse_optional::<Decimal>(field(&record, DailyColumn::Bodyweight).as_deref(), row, "bodyweight")?,
        });
    }

    Ok(logs)
}
