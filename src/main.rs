use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::{error, info, warn};

use liftrs::config::{AppConfig, LifterProfile};
use liftrs::deload::{DeloadAnalyzer, DeloadUrgency};
use liftrs::error::{CalculationError, LiftRsError};
use liftrs::forecast::PrForecaster;
use liftrs::logging::{init_logging, LogLevel};
use liftrs::models::{latest_exercise_log, ExperienceLevel, Gender};
use liftrs::one_rep_max::try_estimate_one_rep_max;
use liftrs::pr::ExercisePrHistory;
use liftrs::progression::ProgressionAdvisor;
use liftrs::snapshot::TrainingSnapshot;
use liftrs::strength::{calculate_strength_score, classify_strength_level};
use liftrs::training_max::{training_max_from_one_rep_max, TrainingMax, TrainingMaxSource, DEFAULT_TRAINING_MAX_PERCENT};

/// liftrs - Strength Training Analytics CLI
///
/// Load suggestions, deload analysis, PR tracking and forecasting, and
/// strength standards over a JSON training snapshot.
#[derive(Parser)]
#[command(name = "liftrs")]
#[command(author = "liftrs Contributors")]
#[command(version)]
#[command(about = "Strength training analytics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Training snapshot (JSON); defaults to the configured path
    #[arg(short, long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of now
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,

    /// Lifter profile id; defaults to the configured default lifter
    #[arg(long, value_name = "ID")]
    lifter: Option<String>,

    /// Experience level override (beginner, intermediate, advanced)
    #[arg(short, long)]
    level: Option<ExperienceLevel>,

    /// Print machine-readable JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest the next session's load for an exercise
    Suggest {
        /// Exercise id (e.g. back_squat)
        #[arg(short, long)]
        exercise: String,
    },

    /// Analyze whether a deload is due
    Deload {
        /// Date of the last deload (YYYY-MM-DD); inferred from training gaps if omitted
        #[arg(long)]
        last_deload: Option<NaiveDate>,
    },

    /// Show personal records rebuilt from the session history
    Prs {
        /// Limit to one exercise
        #[arg(short, long)]
        exercise: Option<String>,
    },

    /// Forecast future PRs
    Forecast {
        /// Limit to one exercise
        #[arg(short, long)]
        exercise: Option<String>,

        /// Weeks to project
        #[arg(short, long)]
        weeks: Option<u32>,
    },

    /// Classify lifts against bodyweight strength standards
    Strength {
        /// Bodyweight override
        #[arg(short, long)]
        bodyweight: Option<Decimal>,

        /// Gender override (male, female)
        #[arg(short, long)]
        gender: Option<Gender>,
    },

    /// Estimate a one-rep max from a set
    Estimate {
        #[arg(short, long)]
        weight: Decimal,

        #[arg(short, long)]
        reps: u32,
    },

    /// Recalibrate a training max from an AMAP set
    TrainingMax {
        #[arg(short, long)]
        exercise: String,

        /// AMAP set weight
        #[arg(short, long)]
        weight: Decimal,

        /// Reps achieved
        #[arg(short, long)]
        reps: u32,

        /// Prescribed reps
        #[arg(short, long)]
        target: u32,

        /// Write the updated training max back to the snapshot
        #[arg(long)]
        save: bool,
    },

    /// Import daily biometric logs from CSV into the snapshot
    ImportDaily {
        /// CSV file with a date column and any of sleep, stress, soreness, bodyweight
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Configure application settings
    Config {
        /// Print the active configuration
        #[arg(long)]
        show: bool,

        /// Write a default configuration file if none exists
        #[arg(long)]
        init: bool,

        /// Add a lifter profile with this name
        #[arg(long, value_name = "NAME")]
        add_lifter: Option<String>,

        /// Gender for --add-lifter
        #[arg(long, default_value = "male")]
        gender: Gender,

        /// Make this lifter the default
        #[arg(long, value_name = "ID")]
        set_default: Option<String>,

        /// Remove this lifter profile
        #[arg(long, value_name = "ID")]
        remove_lifter: Option<String>,
    },
}

struct CliContext {
    config: AppConfig,
    lifter_id: Option<String>,
    config_path: PathBuf,
    snapshot_path: PathBuf,
    now: DateTime<Utc>,
    level: ExperienceLevel,
    json: bool,
}

impl CliContext {
    fn lifter(&self) -> Option<&LifterProfile> {
        match &self.lifter_id {
            Some(id) => self.config.get_lifter(id),
            None => self.config.get_default_lifter(),
        }
    }

    fn snapshot(&self) -> Result<TrainingSnapshot> {
        TrainingSnapshot::load(&self.snapshot_path).map_err(report)
    }
}

/// Log a library error at its severity and turn it into the message shown to the user
fn report(err: LiftRsError) -> anyhow::Error {
    let level = err.severity().to_tracing_level();
    if level == tracing::Level::ERROR {
        error!(error = %err, "Command failed");
    } else if level == tracing::Level::WARN {
        warn!(error = %err, "Command rejected");
    } else {
        info!(error = %err, "Command produced no result");
    }
    anyhow::anyhow!(err.user_message())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn urgency_label(urgency: DeloadUrgency) -> ColoredString {
    let label = urgency.to_string().to_uppercase();
    match urgency {
        DeloadUrgency::Critical => label.red().bold(),
        DeloadUrgency::Recommended => label.yellow().bold(),
        DeloadUrgency::Soon => label.cyan().bold(),
        DeloadUrgency::None => label.green().bold(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let config = AppConfig::load_or_default(&config_path)?;

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&log_config)?;

    let now = match cli.as_of {
        Some(date) => date
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc())
            .context("Invalid --as-of date")?,
        None => Utc::now(),
    };

    let lifter = match &cli.lifter {
        Some(id) => Some(
            config
                .get_lifter(id)
                .with_context(|| format!("Lifter not found: {}", id))?,
        ),
        None => config.get_default_lifter(),
    };
    let level = cli
        .level
        .or_else(|| lifter.map(|l| l.experience_level))
        .unwrap_or_default();

    let ctx = CliContext {
        snapshot_path: cli.snapshot.clone().unwrap_or_else(|| config.settings.snapshot_path.clone()),
        config,
        lifter_id: cli.lifter.clone(),
        config_path,
        now,
        level,
        json: cli.json,
    };

    match cli.command {
        Commands::Suggest { exercise } => cmd_suggest(&ctx, &exercise),
        Commands::Deload { last_deload } => cmd_deload(&ctx, last_deload),
        Commands::Prs { exercise } => cmd_prs(&ctx, exercise.as_deref()),
        Commands::Forecast { exercise, weeks } => cmd_forecast(&ctx, exercise.as_deref(), weeks),
        Commands::Strength { bodyweight, gender } => cmd_strength(&ctx, bodyweight, gender),
        Commands::Estimate { weight, reps } => cmd_estimate(&ctx, weight, reps),
        Commands::TrainingMax {
            exercise,
            weight,
            reps,
            target,
            save,
        } => cmd_training_max(&ctx, &exercise, weight, reps, target, save),
        Commands::ImportDaily { file } => cmd_import_daily(&ctx, &file),
        Commands::Config {
            show,
            init,
            add_lifter,
            gender,
            set_default,
            remove_lifter,
        } => cmd_config(ctx, show, init, add_lifter, gender, set_default, remove_lifter),
    }
}

fn cmd_suggest(ctx: &CliContext, exercise_id: &str) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let today = ctx.now.date_naive();
    let advisor = ProgressionAdvisor::with_config(ctx.config.progression.clone());

    let feedback: Vec<_> = snapshot
        .feedback
        .iter()
        .filter(|f| f.exercise_id == exercise_id)
        .cloned()
        .collect();

    let suggestion = advisor.suggest(
        exercise_id,
        None,
        snapshot.daily_log(today),
        &snapshot.sessions,
        ctx.now,
        Some(ctx.level),
        Some(&feedback),
    );

    if ctx.json {
        return print_json(&suggestion);
    }

    let unit = ctx.config.settings.weight_unit;
    println!("{}", format!("Next session: {}", snapshot.exercise_name(exercise_id)).blue().bold());
    if suggestion.suggested_weight.is_zero() {
        println!("  {}", suggestion.reasoning.yellow());
        return Ok(());
    }

    println!(
        "  {} {} x {}-{} reps",
        suggestion.suggested_weight.to_string().bold(),
        unit,
        suggestion.rep_range.0,
        suggestion.rep_range.1
    );
    println!("  Confidence: {}", suggestion.confidence);
    println!("  Recovery score: {:.1}/10", suggestion.recovery_score);
    if let Some(e1rm) = suggestion.estimated_one_rep_max {
        println!("  Estimated 1RM: {} {}", e1rm, unit);
    }
    if let Some((session, _)) = latest_exercise_log(&snapshot.sessions, exercise_id, ctx.now) {
        println!("  Last trained: {}", session.date());
    }
    println!("  {}", suggestion.reasoning);
    if suggestion.should_deload {
        println!("  {}", "Recovery is low - consider a deload (liftrs deload)".red());
    }
    if let Some(alternative) = &suggestion.alternative {
        println!("  Alternative: {}", alternative.dimmed());
    }
    if let Some(explanation) = &suggestion.explanation {
        println!("  {}", explanation.dimmed());
    }
    Ok(())
}

#[derive(Tabled)]
struct StallRow {
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Weeks stalled")]
    weeks: u32,
    #[tabled(rename = "Peak")]
    peak: Decimal,
    #[tabled(rename = "Below peak")]
    below: String,
}

fn cmd_deload(ctx: &CliContext, last_deload: Option<NaiveDate>) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let last_deload = last_deload.or_else(|| ctx.lifter().and_then(|l| l.last_deload_date));
    let analyzer = DeloadAnalyzer::with_config(ctx.config.deload.clone());
    let recommendation = analyzer.analyze(&snapshot.sessions, ctx.level, last_deload, ctx.now);

    if ctx.json {
        return print_json(&recommendation);
    }

    println!(
        "{} {} (score {}/100)",
        "Deload urgency:".bold(),
        urgency_label(recommendation.urgency),
        recommendation.score
    );
    println!(
        "  Time {:.0} + stalls {:.0} + fatigue {:.0}, {} days since last deload",
        recommendation.breakdown.time_component,
        recommendation.breakdown.stall_component,
        recommendation.breakdown.fatigue_component,
        recommendation.days_since_last_deload
    );

    if !recommendation.stalled_exercises.is_empty() {
        println!("\n{}", "Stalled exercises".bold());
        print_table(
            recommendation
                .stalled_exercises
                .iter()
                .map(|s| StallRow {
                    exercise: snapshot.exercise_name(&s.exercise_id),
                    weeks: s.weeks_stalled,
                    peak: s.peak_weight,
                    below: format!("{:.1}%", s.percent_below_peak),
                })
                .collect(),
        );
    }

    if !recommendation.fatigue_indicators.is_empty() {
        println!("\n{}", "Fatigue indicators".bold());
        for indicator in &recommendation.fatigue_indicators {
            println!("  [{:?}] {}", indicator.severity, indicator.description);
        }
    }

    if let Some(protocol) = &recommendation.protocol {
        if recommendation.urgency != DeloadUrgency::None {
            println!(
                "\n{} {} days, volume -{}%, intensity -{}%",
                format!("{} deload:", protocol.deload_type).bold(),
                protocol.duration_days,
                protocol.volume_reduction_pct,
                protocol.intensity_reduction_pct
            );
            for activity in &protocol.activities {
                println!("  - {}", activity);
            }
        }
    }

    println!("\n{}", "Recommendations".bold());
    for line in &recommendation.recommendations {
        println!("  - {}", line);
    }
    Ok(())
}

#[derive(Tabled)]
struct PrRow {
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Best weight")]
    weight: String,
    #[tabled(rename = "Best volume")]
    volume: String,
    #[tabled(rename = "Most reps")]
    reps: String,
    #[tabled(rename = "Est. 1RM")]
    one_rm: String,
}

fn describe(record: &Option<liftrs::pr::PrRecord>) -> String {
    match record {
        Some(r) => format!("{} ({}x{}, {})", r.value, r.weight, r.reps, r.date),
        None => "-".to_string(),
    }
}

fn cmd_prs(ctx: &CliContext, exercise: Option<&str>) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let rebuilt = snapshot.rebuild_pr_histories();

    let mut histories: Vec<&ExercisePrHistory> = rebuilt
        .values()
        .filter(|h| exercise.map_or(true, |id| h.exercise_id == id))
        .collect();
    histories.sort_by(|a, b| a.exercise_id.cmp(&b.exercise_id));

    if ctx.json {
        return print_json(&histories);
    }
    if histories.is_empty() {
        println!("{}", "No personal records yet - log some completed sessions".yellow());
        return Ok(());
    }

    print_table(
        histories
            .iter()
            .map(|h| PrRow {
                exercise: snapshot.exercise_name(&h.exercise_id),
                weight: describe(&h.best_weight),
                volume: describe(&h.best_volume),
                reps: describe(&h.best_reps),
                one_rm: h
                    .best_weight
                    .as_ref()
                    .map(|r| liftrs::estimate_one_rep_max(r.weight, r.reps).value.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect(),
    );
    Ok(())
}

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Current")]
    current: Decimal,
    #[tabled(rename = "Predicted")]
    predicted: Decimal,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Achievable")]
    achievable: String,
}

fn cmd_forecast(ctx: &CliContext, exercise: Option<&str>, weeks: Option<u32>) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let forecaster = PrForecaster::with_config(ctx.config.forecast.clone());
    let weeks = weeks.unwrap_or(forecaster.config().default_weeks);

    let exercises: Vec<(String, String)> = match exercise {
        Some(id) => vec![(id.to_string(), snapshot.exercise_name(id))],
        None => snapshot
            .exercise_ids()
            .into_iter()
            .map(|id| {
                let name = snapshot.exercise_name(&id);
                (id, name)
            })
            .collect(),
    };

    let forecasts = forecaster.forecast_all(&exercises, &snapshot.sessions, ctx.level, weeks, ctx.now);
    info!(requested = exercises.len(), produced = forecasts.len(), "Forecasts computed");

    if let (Some(id), true) = (exercise, forecasts.is_empty()) {
        return Err(report(
            CalculationError::InsufficientData {
                calculation: format!("a PR forecast for {}", snapshot.exercise_name(id)),
                reason: format!(
                    "fewer than {} training days in the last {} weeks",
                    forecaster.config().min_data_points,
                    forecaster.config().lookback_weeks
                ),
            }
            .into(),
        ));
    }

    if ctx.json {
        return print_json(&forecasts);
    }
    if forecasts.is_empty() {
        println!(
            "{}",
            "Not enough data to forecast - at least 4 training days in the last 12 weeks are needed".yellow()
        );
        return Ok(());
    }

    println!("{}", format!("{}-week PR forecast", weeks).blue().bold());
    print_table(
        forecasts
            .iter()
            .map(|f| ForecastRow {
                exercise: f.exercise_name.clone(),
                current: f.current_pr,
                predicted: f.predicted_pr,
                confidence: format!("{:.0}%", f.confidence * 100.0),
                achievable: if f.achievable { "yes" } else { "stretch" }.to_string(),
            })
            .collect(),
    );
    for forecast in &forecasts {
        println!("  {}", forecast.reasoning.dimmed());
    }
    Ok(())
}

#[derive(Tabled)]
struct StrengthRow {
    #[tabled(rename = "Lift")]
    lift: String,
    #[tabled(rename = "Est. 1RM")]
    one_rm: Decimal,
    #[tabled(rename = "xBW")]
    ratio: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Next")]
    next: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

fn cmd_strength(ctx: &CliContext, bodyweight: Option<Decimal>, gender: Option<Gender>) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let bodyweight = bodyweight
        .or_else(|| snapshot.latest_bodyweight(ctx.now.date_naive()))
        .or_else(|| ctx.lifter().and_then(|l| l.bodyweight))
        .ok_or_else(|| {
            report(LiftRsError::Validation(
                "No bodyweight available - pass --bodyweight or log one in a daily log".to_string(),
            ))
        })?;
    let gender = gender
        .or_else(|| ctx.lifter().map(|l| l.gender))
        .ok_or_else(|| {
            report(LiftRsError::Validation(
                "No gender available - pass --gender or add a lifter profile".to_string(),
            ))
        })?;

    let histories = snapshot.rebuild_pr_histories();
    let mut standards: Vec<_> = histories
        .values()
        .filter_map(|h| {
            let best = h.best_weight.as_ref()?;
            let one_rm = liftrs::estimate_one_rep_max(best.weight, best.reps).value;
            classify_strength_level(&h.exercise_id, one_rm, bodyweight, gender).map(|s| (one_rm, s))
        })
        .collect();
    standards.sort_by(|a, b| a.1.exercise_id.cmp(&b.1.exercise_id));
    let score = calculate_strength_score(&histories, bodyweight, gender);

    if ctx.json {
        #[derive(Serialize)]
        struct StrengthReport<'a> {
            bodyweight: Decimal,
            strength_score: Option<f64>,
            lifts: Vec<&'a liftrs::strength::StrengthStandard>,
        }
        return print_json(&StrengthReport {
            bodyweight,
            strength_score: score,
            lifts: standards.iter().map(|(_, s)| s).collect(),
        });
    }

    if standards.is_empty() {
        println!("{}", "No major lifts recorded yet".yellow());
        return Ok(());
    }

    print_table(
        standards
            .iter()
            .map(|(one_rm, s)| StrengthRow {
                lift: snapshot.exercise_name(&s.exercise_id),
                one_rm: *one_rm,
                ratio: format!("{:.2}", s.bodyweight_ratio),
                level: s.level.to_string(),
                next: match (s.next_level, s.next_level_target) {
                    (Some(level), Some(target)) => format!("{} at {}", level, target),
                    _ => "-".to_string(),
                },
                progress: format!("{:.0}%", s.progress_percent),
            })
            .collect(),
    );
    if let Some(score) = score {
        println!("{} {:.0}/100", "Strength score:".bold(), score);
    }
    Ok(())
}

fn cmd_estimate(ctx: &CliContext, weight: Decimal, reps: u32) -> Result<()> {
    let estimate = try_estimate_one_rep_max(weight, reps).map_err(|e| report(e.into()))?;
    let training_max = training_max_from_one_rep_max(
        estimate.value,
        DEFAULT_TRAINING_MAX_PERCENT,
        ctx.config.progression.weight_increment,
    )
    .map_err(|e| report(e.into()))?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "one_rep_max": estimate,
            "training_max": training_max,
        }));
    }

    println!(
        "{} x {} -> estimated 1RM {} {} ({})",
        weight,
        reps,
        estimate.value.to_string().bold(),
        ctx.config.settings.weight_unit,
        estimate.formula
    );
    println!("  Training max (90%): {}", training_max);
    Ok(())
}

fn cmd_training_max(
    ctx: &CliContext,
    exercise_id: &str,
    weight: Decimal,
    reps: u32,
    target: u32,
    save: bool,
) -> Result<()> {
    let mut snapshot = ctx.snapshot()?;
    let increment = ctx.config.progression.weight_increment;
    let today = ctx.now.date_naive();

    let current = match snapshot.training_maxes.get(exercise_id) {
        Some(tm) => tm.clone(),
        None => {
            let history = snapshot.rebuild_pr_histories();
            let best = history
                .get(exercise_id)
                .and_then(|h| h.best_weight.as_ref())
                .with_context(|| format!("No training max or PR recorded for {}", exercise_id))?;
            let one_rm = liftrs::estimate_one_rep_max(best.weight, best.reps).value;
            let value = training_max_from_one_rep_max(one_rm, DEFAULT_TRAINING_MAX_PERCENT, increment)
                .map_err(|e| report(e.into()))?;
            TrainingMax::new(exercise_id, value, today, TrainingMaxSource::Estimated)
        }
    };

    let (next, update) = current
        .with_amap_result(weight, reps, target, increment, today)
        .map_err(|e| report(e.into()))?;

    if save {
        snapshot.training_maxes.insert(exercise_id.to_string(), next.clone());
        snapshot
            .save(&ctx.snapshot_path)
            .with_context(|| format!("Failed to save snapshot: {}", ctx.snapshot_path.display()))?;
    }

    if ctx.json {
        return print_json(&update);
    }

    let change = if update.change_percent.is_sign_negative() {
        format!("{}%", update.change_percent).red()
    } else {
        format!("+{}%", update.change_percent).green()
    };
    println!(
        "{}: {} -> {} ({})",
        snapshot.exercise_name(exercise_id).bold(),
        update.previous,
        update.new_value,
        change
    );
    println!("  {}", update.reasoning);
    if save {
        println!("  {}", format!("Saved ({} entries in history)", next.history.len()).dimmed());
    }
    Ok(())
}

fn cmd_import_daily(ctx: &CliContext, file: &Path) -> Result<()> {
    let mut snapshot = if ctx.snapshot_path.exists() {
        ctx.snapshot()?
    } else {
        TrainingSnapshot::default()
    };

    let applied = snapshot
        .import_daily_logs_csv_file(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    snapshot
        .save(&ctx.snapshot_path)
        .with_context(|| format!("Failed to save snapshot: {}", ctx.snapshot_path.display()))?;

    if ctx.json {
        return print_json(&serde_json::json!({ "rows_applied": applied }));
    }
    println!("{}", format!("✓ Imported {} daily logs", applied).green());
    Ok(())
}

fn cmd_config(
    mut ctx: CliContext,
    show: bool,
    init: bool,
    add_lifter: Option<String>,
    gender: Gender,
    set_default: Option<String>,
    remove_lifter: Option<String>,
) -> Result<()> {
    let nothing_requested =
        !show && !init && add_lifter.is_none() && set_default.is_none() && remove_lifter.is_none();

    if init && ctx.config_path.exists() {
        println!("{}", format!("Config already exists: {}", ctx.config_path.display()).yellow());
    } else if init {
        ctx.config.save_to_file(&ctx.config_path)?;
        println!("{}", format!("✓ Wrote {}", ctx.config_path.display()).green());
    }

    if let Some(name) = add_lifter {
        let mut lifter = LifterProfile::new(name, gender, None);
        lifter.experience_level = ctx.level;
        println!("{}", format!("✓ Added lifter {} ({})", lifter.name, lifter.id).green());
        ctx.config.add_lifter(lifter);
        ctx.config.save_to_file(&ctx.config_path)?;
    }

    if let Some(id) = set_default {
        ctx.config.set_default_lifter(&id)?;
        ctx.config.save_to_file(&ctx.config_path)?;
        println!("{}", format!("✓ Default lifter is now {}", id).green());
    }

    if let Some(id) = remove_lifter {
        ctx.config.remove_lifter(&id)?;
        ctx.config.save_to_file(&ctx.config_path)?;
        println!("{}", format!("✓ Removed lifter {}", id).green());
    }

    if show || nothing_requested {
        if ctx.json {
            return print_json(&ctx.config);
        }
        println!("{}", format!("# {}", ctx.config_path.display()).dimmed());
        println!("{}", toml::to_string_pretty(&ctx.config)?);
    }
    Ok(())
}
