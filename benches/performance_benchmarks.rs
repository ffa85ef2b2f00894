use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use liftrs::models::{ExerciseLog, ExperienceLevel, SessionStatus, SetLog, SetType, WorkoutSession};
use liftrs::{estimate_one_rep_max, DeloadAnalyzer, ProgressionAdvisor, PrForecaster, TrainingSnapshot};

/// Performance benchmarks for the analytics engine
///
/// Session histories of increasing length check that analysis stays
/// responsive for multi-year training logs.

const EXERCISES: [&str; 5] = ["back_squat", "bench_press", "deadlift", "overhead_press", "barbell_row"];

fn bench_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap()
}

fn bench_one_rep_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("One Rep Max");

    for &count in &[100usize, 1000, 10000] {
        let sets: Vec<(Decimal, u32)> = (0..count)
            .map(|i| (dec!(60) + Decimal::from(i % 80), (i % 20) as u32 + 1))
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("estimate", count), &sets, |b, sets| {
            b.iter(|| {
                for (weight, reps) in sets {
                    black_box(estimate_one_rep_max(*weight, *reps));
                }
            });
        });
    }

    group.finish();
}

fn bench_deload_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("Deload Analysis");
    let analyzer = DeloadAnalyzer::new();

    for &sessions in &[30usize, 180, 720] {
        let history = create_session_history(sessions);

        group.throughput(Throughput::Elements(sessions as u64));
        group.bench_with_input(BenchmarkId::new("analyze", sessions), &history, |b, history| {
            b.iter(|| black_box(analyzer.analyze(history, ExperienceLevel::Intermediate, None, bench_now())));
        });
    }

    group.finish();
}

fn bench_progression(c: &mut Criterion) {
    let mut group = c.benchmark_group("Progression");
    let advisor = ProgressionAdvisor::new();

    for &sessions in &[30usize, 180, 720] {
        let history = create_session_history(sessions);

        group.bench_with_input(BenchmarkId::new("suggest_from_history", sessions), &history, |b, history| {
            b.iter(|| black_box(advisor.suggest("back_squat", None, None, history, bench_now(), None, None)));
        });
    }

    group.finish();
}

fn bench_forecasting(c: &mut Criterion) {
    let mut group = c.benchmark_group("PR Forecast");
    let forecaster = PrForecaster::new();
    let exercises: Vec<(String, String)> = EXERCISES.iter().map(|id| (id.to_string(), id.replace('_', " "))).collect();

    for &sessions in &[30usize, 180, 720] {
        let history = create_session_history(sessions);

        group.bench_with_input(BenchmarkId::new("forecast_single", sessions), &history, |b, history| {
            b.iter(|| {
                black_box(forecaster.forecast(
                    "back_squat",
                    "Back Squat",
                    history,
                    ExperienceLevel::Intermediate,
                    8,
                    bench_now(),
                ))
            });
        });

        group.throughput(Throughput::Elements(exercises.len() as u64));
        group.bench_with_input(BenchmarkId::new("forecast_all", sessions), &history, |b, history| {
            b.iter(|| {
                black_box(forecaster.forecast_all(&exercises, history, ExperienceLevel::Intermediate, 8, bench_now()))
            });
        });
    }

    group.finish();
}

fn bench_pr_history_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("PR History");

    for &sessions in &[180usize, 720] {
        let snapshot = TrainingSnapshot {
            sessions: create_session_history(sessions),
            ..TrainingSnapshot::default()
        };

        group.throughput(Throughput::Elements(sessions as u64));
        group.bench_with_input(BenchmarkId::new("rebuild", sessions), &snapshot, |b, snapshot| {
            b.iter(|| black_box(snapshot.rebuild_pr_histories()));
        });
    }

    group.finish();
}

// Helper functions for benchmark data creation

/// One completed session every other day, rotating through the main lifts
/// with slow linear progress and a little noise
fn create_session_history(count: usize) -> Vec<WorkoutSession> {
    (0..count)
        .map(|i| {
            let start = bench_now() - Duration::days(((count - i) * 2) as i64);
            let mut session = WorkoutSession::new(format!("Session {}", i + 1), start);
            session.end_time = Some(start + Duration::minutes(60 + (i % 20) as i64));
            session.status = SessionStatus::Completed;

            session.exercises = EXERCISES
                .iter()
                .enumerate()
                .filter(|(n, _)| (i + n) % 2 == 0)
                .map(|(n, exercise_id)| {
                    let base = dec!(40) + Decimal::from(n as u32 * 20);
                    let top = base + Decimal::from((i / 4) as u32) * dec!(0.5) + Decimal::from((i % 3) as u32);
                    ExerciseLog {
                        id: format!("ex-{}-{}", i, n),
                        exercise_id: exercise_id.to_string(),
                        sets: (0..4)
                            .map(|s| SetLog {
                                id: format!("set-{}-{}-{}", i, n, s),
                                weight: top,
                                reps: 5,
                                rpe: Some(7.0 + (s as f64) * 0.5),
                                set_type: SetType::Normal,
                                completed: s < 3 || i % 5 != 0,
                            })
                            .collect(),
                        notes: None,
                        superset_id: None,
                    }
                })
                .collect();

            session
        })
        .collect()
}

criterion_group!(
    benches,
    bench_one_rep_max,
    bench_deload_analysis,
    bench_progression,
    bench_forecasting,
    bench_pr_history_rebuild
);

criterion_main!(benches);
