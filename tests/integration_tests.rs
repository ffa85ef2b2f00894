use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use liftrs::deload::DeloadUrgency;
use liftrs::models::{DailyLog, ExerciseLog, ExperienceLevel, Gender, SessionStatus, SetLog, SetType, WorkoutSession};
use liftrs::one_rep_max::OneRepMaxFormula;
use liftrs::pr::{PrRecord, PrType};
use liftrs::progression::Confidence;
use liftrs::{
    analyze_deload_need, calculate_strength_score, check_all_prs, classify_strength_level, estimate_one_rep_max,
    forecast_pr, get_suggestion, ExercisePrHistory, TrainingSnapshot,
};

/// Integration tests that exercise the public analytics API end to end

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap()
    }

    fn set(weight: Decimal, reps: u32, rpe: Option<f64>) -> SetLog {
        SetLog {
            id: uuid::Uuid::new_v4().to_string(),
            weight,
            reps,
            rpe,
            set_type: SetType::Normal,
            completed: true,
        }
    }

    fn exercise(exercise_id: &str, sets: Vec<SetLog>) -> ExerciseLog {
        ExerciseLog {
            id: uuid::Uuid::new_v4().to_string(),
            exercise_id: exercise_id.to_string(),
            sets,
            notes: None,
            superset_id: None,
        }
    }

    fn completed_session(days_ago: i64, exercises: Vec<ExerciseLog>) -> WorkoutSession {
        let mut session = WorkoutSession::new("Training", now() - Duration::days(days_ago));
        session.end_time = Some(session.start_time + Duration::minutes(65));
        session.status = SessionStatus::Completed;
        session.exercises = exercises;
        session
    }

    /// Twelve weeks of twice-weekly training with steady squat and bench progress
    fn training_block() -> Vec<WorkoutSession> {
        let mut history = Vec::new();
        for week in 0..12i64 {
            let squat = dec!(100) + Decimal::from(week) * dec!(2.5);
            let bench = dec!(70) + Decimal::from(week / 2) * dec!(2.5);
            history.push(completed_session(
                80 - week * 7,
                vec![exercise("back_squat", vec![set(squat, 5, Some(7.5)), set(squat, 5, Some(8.0))])],
            ));
            history.push(completed_session(
                77 - week * 7,
                vec![exercise("bench_press", vec![set(bench, 5, Some(7.5)), set(bench, 5, Some(8.0))])],
            ));
        }
        history
    }

    #[test]
    fn test_one_rep_max_properties() {
        for weight in [dec!(20), dec!(102.5), dec!(315)] {
            let single = estimate_one_rep_max(weight, 1);
            assert_eq!(single.value, weight);
            assert_eq!(single.formula, OneRepMaxFormula::Actual);
        }

        let epley = estimate_one_rep_max(dec!(135), 5);
        assert!((epley.value_f64() - 157.5).abs() <= 1.0);
        assert_eq!(epley.formula, OneRepMaxFormula::Epley);

        let brzycki = estimate_one_rep_max(dec!(100), 15);
        assert_eq!(brzycki.formula, OneRepMaxFormula::Brzycki);
        assert!(brzycki.value > dec!(100));
    }

    #[test]
    fn test_pr_detection_workflow() {
        let first = check_all_prs(&set(dec!(135), 5, None), None);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].pr_type, PrType::Weight);
        assert_eq!(first[1].pr_type, PrType::Volume);
        assert!(first.iter().all(|p| p.previous_best == Decimal::ZERO && p.improvement_percent == 100.0));

        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let history = ExercisePrHistory {
            best_weight: Some(PrRecord {
                pr_type: PrType::Weight,
                value: dec!(215),
                date,
                weight: dec!(215),
                reps: 1,
            }),
            ..ExercisePrHistory::new("bench_press")
        };
        let prs = check_all_prs(&set(dec!(225), 1, None), Some(&history));
        let weight = prs.iter().find(|p| p.pr_type == PrType::Weight).unwrap();
        assert_eq!(weight.previous_best, dec!(215));
        assert_eq!(weight.improvement, dec!(10));
    }

    #[test]
    fn test_suggestion_ready_to_push() {
        let last = exercise("back_squat", vec![set(dec!(100), 8, Some(6.0))]);
        let daily = DailyLog {
            sleep_hours: Some(8.0),
            ..DailyLog::empty(now().date_naive())
        };

        let suggestion = get_suggestion("back_squat", Some(&last), Some(&daily), &[], now(), None, None);

        assert!(suggestion.suggested_weight > dec!(100));
        assert_eq!(suggestion.confidence, Confidence::High);
        assert!(!suggestion.should_deload);
    }

    #[test]
    fn test_suggestion_poor_recovery_forces_deload() {
        let last = exercise("back_squat", vec![set(dec!(100), 8, Some(8.0))]);
        let daily = DailyLog {
            sleep_hours: Some(5.0),
            stress_level: Some(8),
            ..DailyLog::empty(now().date_naive())
        };

        let suggestion = get_suggestion("back_squat", Some(&last), Some(&daily), &[], now(), None, None);

        assert!(suggestion.should_deload);
        assert!(suggestion.suggested_weight < dec!(100));
        assert!(suggestion.reasoning.to_lowercase().contains("recovery"));
    }

    #[test]
    fn test_suggestion_falls_back_to_history() {
        let history = training_block();
        let suggestion = get_suggestion(
            "back_squat",
            None,
            None,
            &history,
            now(),
            Some(ExperienceLevel::Beginner),
            None,
        );

        assert!(suggestion.suggested_weight > Decimal::ZERO);
        assert!(suggestion.estimated_one_rep_max.is_some());
    }

    #[test]
    fn test_deload_requires_four_sessions() {
        let history: Vec<WorkoutSession> = (0..3)
            .map(|i| completed_session(i * 3, vec![exercise("back_squat", vec![set(dec!(100), 5, None)])]))
            .collect();

        let recommendation = analyze_deload_need(&history, ExperienceLevel::Intermediate, None, now());
        assert_eq!(recommendation.urgency, DeloadUrgency::None);
        assert_eq!(recommendation.score, 0);
    }

    #[test]
    fn test_deload_score_non_decreasing_in_days_since_deload() {
        let history = training_block();
        let today = now().date_naive();

        let scores: Vec<u8> = [0, 10, 20, 40, 80]
            .iter()
            .map(|days| {
                analyze_deload_need(&history, ExperienceLevel::Intermediate, Some(today - Duration::days(*days)), now())
                    .score
            })
            .collect();

        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{:?}", scores);
    }

    #[test]
    fn test_deload_score_non_decreasing_in_stalls() {
        let today = now().date_naive();
        let mut history = training_block();
        let base = analyze_deload_need(&history, ExperienceLevel::Intermediate, Some(today), now());

        // An overhead press that peaked five weeks ago and has not recovered
        for (days_ago, weight) in [(42, dec!(55)), (35, dec!(60)), (28, dec!(55)), (14, dec!(55)), (5, dec!(55))] {
            history.push(completed_session(days_ago, vec![exercise("overhead_press", vec![set(weight, 5, Some(7.5))])]));
        }
        let stalled = analyze_deload_need(&history, ExperienceLevel::Intermediate, Some(today), now());

        assert_eq!(stalled.stalled_exercises.len(), base.stalled_exercises.len() + 1);
        assert!(stalled.score >= base.score);
    }

    #[test]
    fn test_sessions_after_as_of_date_do_not_count() {
        let history = training_block();
        let mut with_future = history.clone();
        for days_ahead in [2i64, 4, 6] {
            with_future.push(completed_session(
                -days_ahead,
                vec![exercise("back_squat", vec![set(dec!(180), 5, Some(9.5))])],
            ));
        }

        let base = analyze_deload_need(&history, ExperienceLevel::Intermediate, None, now());
        let later = analyze_deload_need(&with_future, ExperienceLevel::Intermediate, None, now());
        assert_eq!(later.score, base.score);
        assert_eq!(later.urgency, base.urgency);

        let base = get_suggestion("back_squat", None, None, &history, now(), None, None);
        let later = get_suggestion("back_squat", None, None, &with_future, now(), None, None);
        assert_eq!(later.suggested_weight, base.suggested_weight);
        assert_eq!(later.recovery_score, base.recovery_score);
    }

    #[test]
    fn test_forecast_requires_four_points() {
        let history: Vec<WorkoutSession> = [20, 13, 6]
            .into_iter()
            .map(|d| completed_session(d, vec![exercise("deadlift", vec![set(dec!(180), 3, None)])]))
            .collect();

        assert!(forecast_pr("deadlift", "Deadlift", &history, ExperienceLevel::Intermediate, 8, now()).is_none());
    }

    #[test]
    fn test_forecast_projection_shape() {
        let history = training_block();

        for weeks in [4u32, 8] {
            let forecast =
                forecast_pr("back_squat", "Back Squat", &history, ExperienceLevel::Beginner, weeks, now()).unwrap();
            if forecast.confidence == 0.0 {
                assert!(forecast.projection.is_empty());
                continue;
            }
            assert_eq!(forecast.projection.len(), weeks as usize + 1);
            if forecast.curve.b > 0.0 && forecast.curve.a >= 0.0 {
                assert!(forecast
                    .projection
                    .windows(2)
                    .all(|w| w[0].projected_one_rep_max <= w[1].projected_one_rep_max));
            }
        }
    }

    #[test]
    fn test_strength_classification() {
        for id in ["bicep_curl", "leg_press", "cable_fly"] {
            assert!(classify_strength_level(id, dec!(200), dec!(80), Gender::Male).is_none());
            assert!(classify_strength_level(id, dec!(50), dec!(60), Gender::Female).is_none());
        }

        let squat = classify_strength_level("back_squat", dec!(160), dec!(80), Gender::Male).unwrap();
        assert_eq!(squat.bodyweight_ratio, 2.0);
        assert!(squat.next_level_target.is_some());
    }

    #[test]
    fn test_snapshot_to_strength_score() {
        let snapshot = TrainingSnapshot {
            sessions: training_block(),
            ..TrainingSnapshot::default()
        };

        let histories: HashMap<String, ExercisePrHistory> = snapshot.rebuild_pr_histories();
        assert!(histories.contains_key("back_squat"));
        assert!(histories.contains_key("bench_press"));

        let score = calculate_strength_score(&histories, dec!(80), Gender::Male).unwrap();
        assert!(score > 0.0 && score <= 100.0);
        assert!(calculate_strength_score(&HashMap::new(), dec!(80), Gender::Male).is_none());
    }
}
