// tests/grading_tests.rs

use gradebook::grading::{
    AnswerGradeStore, ExperiencePointCalculator, GradeAggregator, InvalidGradeError, Multiplier,
    parse_grade, pipeline,
};
use gradebook::models::{
    answer::Answer,
    submission::{Submission, SubmissionGradingMode},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A submission with one answer per maximum grade, answer IDs starting at 101.
fn setup(maximum_grades: &[Decimal], base_points: i64) -> (AnswerGradeStore, Submission) {
    let mut store = AnswerGradeStore::new();
    for (i, max) in maximum_grades.iter().enumerate() {
        let i = i as i64;
        store.register_answer(Answer::new(101 + i, 1, 11 + i), *max);
    }
    let submission = Submission::new(
        1,
        1,
        maximum_grades.len(),
        base_points,
        maximum_grades.iter().copied().sum(),
    );
    (store, submission)
}

fn award(total: Decimal, max: Decimal, base: i64, multiplier: Decimal) -> i64 {
    ExperiencePointCalculator::award(total, max, base, Multiplier::new(multiplier).unwrap())
}

#[test]
fn award_scenarios() {
    assert_eq!(award(dec!(5), dec!(10), 10, dec!(1)), 5);
    assert_eq!(award(dec!(5), dec!(10), 10, dec!(2)), 10);
    assert_eq!(award(dec!(7), dec!(10), 10, dec!(1.5)), 10);
    assert_eq!(
        ExperiencePointCalculator::actual_points(dec!(7), dec!(10), 10),
        dec!(7)
    );
}

#[test]
fn award_floors_before_and_after_multiplier() {
    // floor(100 * 1 / 3) = 33, floor(33 * 1.5) = 49
    assert_eq!(award(dec!(1), dec!(3), 100, dec!(1.5)), 49);
    // floor(10 * 2.5 / 10) = 2, floor(2 * 0.9) = 1
    assert_eq!(award(dec!(2.5), dec!(10), 10, dec!(0.9)), 1);
}

#[test]
fn zero_maximum_grade_awards_nothing() {
    assert_eq!(award(dec!(0), dec!(0), 100, dec!(1)), 0);
    assert_eq!(award(dec!(5), dec!(0), 100, dec!(3)), 0);
    assert_eq!(award(dec!(5), dec!(0), 0, dec!(0)), 0);
}

#[test]
fn zero_multiplier_zeroes_the_award() {
    assert_eq!(award(dec!(10), dec!(10), 100, dec!(0)), 0);
}

#[test]
fn award_is_monotonic_in_grade_and_multiplier() {
    let max = dec!(20);
    let mut last = 0;
    for step in 0..=40 {
        let total = Decimal::from(step) / dec!(2);
        let points = award(total, max, 37, dec!(1.25));
        assert!(points >= last, "award decreased at total {}", total);
        last = points;
    }

    let mut last = 0;
    for step in 0..=30 {
        let multiplier = Decimal::from(step) / dec!(10);
        let points = award(dec!(13), max, 37, multiplier);
        assert!(points >= last, "award decreased at multiplier {}", multiplier);
        last = points;
    }
}

#[test]
fn multiplier_parsing() {
    assert_eq!(Multiplier::parse("1.5").map(Multiplier::value), Some(dec!(1.5)));
    assert_eq!(Multiplier::parse(" 0 ").map(Multiplier::value), Some(dec!(0)));
    assert_eq!(Multiplier::parse("abc"), None);
    assert_eq!(Multiplier::parse("-1"), None);
    assert_eq!(Multiplier::parse("1_5"), None);
    assert_eq!(Multiplier::parse("1.5.0"), None);
    assert_eq!(Multiplier::parse(""), None);
    assert_eq!(Multiplier::parse("0.5").map(Multiplier::value), Some(dec!(0.5)));
    assert_eq!(Multiplier::parse("2e0").map(Multiplier::value), Some(dec!(2)));
    assert_eq!(Multiplier::default(), Multiplier::ONE);
}

#[test]
fn on_multiplier_changed_ignores_bad_input() {
    assert_eq!(
        ExperiencePointCalculator::on_multiplier_changed("oops", Some(dec!(5)), dec!(10), 10),
        None
    );
    assert_eq!(
        ExperiencePointCalculator::on_multiplier_changed("2", None, dec!(10), 10),
        None
    );
    let (multiplier, points) =
        ExperiencePointCalculator::on_multiplier_changed("2", Some(dec!(5)), dec!(10), 10).unwrap();
    assert_eq!(multiplier.value(), dec!(2));
    assert_eq!(points, 10);
}

#[test]
fn parse_grade_rejects_non_numeric_input() {
    assert_eq!(parse_grade("8"), Ok(dec!(8)));
    assert_eq!(parse_grade(" 2.50 "), Ok(dec!(2.5)));
    assert_eq!(
        parse_grade("eight"),
        Err(InvalidGradeError::NotNumeric("eight".to_string()))
    );
    assert!(parse_grade("").is_err());
    assert_eq!(
        parse_grade("1_0"),
        Err(InvalidGradeError::NotNumeric("1_0".to_string()))
    );
    assert!(parse_grade("5 5").is_err());
    assert!(parse_grade("0x10").is_err());
    assert_eq!(parse_grade("4e0"), Ok(dec!(4)));
}

#[test]
fn set_grade_enforces_question_maximum() {
    let (mut store, _) = setup(&[dec!(100)], 10);

    assert_eq!(store.set_grade(101, dec!(40), Some(9)), Ok(None));
    assert_eq!(
        store.set_grade(101, dec!(101), Some(9)),
        Err(InvalidGradeError::OutOfRange {
            value: dec!(101),
            maximum: dec!(100),
        })
    );
    assert_eq!(store.get_grade(101), Some(dec!(40)));

    assert!(store.set_grade(101, dec!(-1), None).is_err());
    assert_eq!(store.get_grade(101), Some(dec!(40)));

    assert_eq!(store.set_grade(101, dec!(100), Some(9)), Ok(Some(dec!(40))));
    assert_eq!(store.answer(101).unwrap().grader_id, Some(9));
}

#[test]
fn set_grade_on_unknown_answer_fails() {
    let (mut store, _) = setup(&[dec!(10)], 10);
    assert_eq!(
        store.set_grade(999, dec!(1), None),
        Err(InvalidGradeError::UnknownAnswer(999))
    );
}

#[test]
fn all_grades_follow_question_order_and_skip_ungraded() {
    let (mut store, _) = setup(&[dec!(10), dec!(10), dec!(10)], 10);

    store.set_grade(103, dec!(3), None).unwrap();
    store.set_grade(101, dec!(1), None).unwrap();

    let grades: Vec<(i64, Decimal)> = store.all_grades(1).collect();
    assert_eq!(grades, vec![(101, dec!(1)), (103, dec!(3))]);

    let summary = store.grades_summary(1);
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[1].grade, None);
    assert_eq!(store.all_grades(2).count(), 0);
}

#[test]
fn multi_question_total_is_order_independent() {
    let maxima = [dec!(10), dec!(5), dec!(2.5)];
    let grades = [(101, dec!(7.5)), (102, dec!(0.1)), (103, dec!(0.2))];

    let (mut forward, submission) = setup(&maxima, 10);
    for (id, grade) in grades {
        forward.set_grade(id, grade, None).unwrap();
    }

    let (mut backward, _) = setup(&maxima, 10);
    for (id, grade) in grades.into_iter().rev() {
        backward.set_grade(id, grade, None).unwrap();
    }

    let a = GradeAggregator::new(&forward).recompute(&submission);
    let b = GradeAggregator::new(&backward).recompute(&submission);
    assert_eq!(a.mode, SubmissionGradingMode::MultiQuestion);
    assert_eq!(a.total_grade, dec!(7.8));
    assert_eq!(a.total_grade, b.total_grade);
    assert_eq!(a.maximum_grade, dec!(17.5));
}

#[test]
fn ungraded_answers_are_excluded_from_total() {
    let (mut store, submission) = setup(&[dec!(10), dec!(10)], 10);
    assert_eq!(
        GradeAggregator::new(&store).recompute(&submission).total_grade,
        dec!(0)
    );

    store.set_grade(102, dec!(4), None).unwrap();
    assert_eq!(
        GradeAggregator::new(&store).recompute(&submission).total_grade,
        dec!(4)
    );
}

#[test]
fn single_question_submission_takes_the_answer_grade() {
    let (mut store, mut submission) = setup(&[dec!(10)], 10);
    assert_eq!(submission.mode, SubmissionGradingMode::SingleQuestion);

    let change = pipeline::apply_grade(&mut store, &mut submission, 101, dec!(8), None).unwrap();
    assert_eq!(change.total_grade, dec!(8));
    assert_eq!(change.points_awarded, 8);
    assert_eq!(submission.total_grade, dec!(8));
}

#[test]
fn zero_maximum_grade_is_not_an_award() {
    let (mut store, submission) = setup(&[dec!(0), dec!(0)], 10);
    store.set_grade(101, dec!(0), None).unwrap();

    let aggregate = GradeAggregator::new(&store).recompute(&submission);
    assert!(!aggregate.award_defined());
    assert_eq!(pipeline::points_for(&submission, &aggregate), 0);
}

#[test]
fn pipeline_recomputes_total_and_points_on_every_grade() {
    let (mut store, mut submission) = setup(&[dec!(5), dec!(5)], 10);

    let first = pipeline::apply_grade(&mut store, &mut submission, 101, dec!(3), Some(1)).unwrap();
    assert_eq!(first.previous_grade, None);
    assert_eq!(first.total_grade, dec!(3));
    assert_eq!(first.points_awarded, 3);

    let second = pipeline::apply_grade(&mut store, &mut submission, 102, dec!(5), Some(1)).unwrap();
    assert_eq!(second.total_grade, dec!(8));
    assert_eq!(second.points_awarded, 8);
    assert_eq!(second.summary.len(), 2);

    let regrade =
        pipeline::apply_grade(&mut store, &mut submission, 101, dec!(1), Some(2)).unwrap();
    assert_eq!(regrade.previous_grade, Some(dec!(3)));
    assert_eq!(regrade.total_grade, dec!(6));
    assert_eq!(submission.points_awarded, Some(6));
}

#[test]
fn rejected_grade_leaves_submission_untouched() {
    let (mut store, mut submission) = setup(&[dec!(100)], 10);
    pipeline::apply_grade(&mut store, &mut submission, 101, dec!(50), None).unwrap();

    let err = pipeline::apply_grade(&mut store, &mut submission, 101, dec!(101), None);
    assert!(matches!(err, Err(InvalidGradeError::OutOfRange { .. })));
    assert_eq!(store.get_grade(101), Some(dec!(50)));
    assert_eq!(submission.total_grade, dec!(50));
    assert_eq!(submission.points_awarded, Some(5));
}

#[test]
fn answers_of_other_submissions_are_rejected() {
    let (mut store, mut submission) = setup(&[dec!(10)], 10);
    store.register_answer(Answer::new(500, 2, 11), dec!(10));

    assert_eq!(
        pipeline::apply_grade(&mut store, &mut submission, 500, dec!(1), None).unwrap_err(),
        InvalidGradeError::UnknownAnswer(500)
    );
    assert_eq!(store.get_grade(500), None);
}

#[test]
fn multiplier_change_uses_current_total() {
    let (mut store, mut submission) = setup(&[dec!(10)], 10);
    pipeline::apply_grade(&mut store, &mut submission, 101, dec!(7), None).unwrap();

    assert_eq!(pipeline::change_multiplier(&mut submission, "1.5"), Some(10));
    assert_eq!(submission.multiplier, dec!(1.5));

    assert_eq!(pipeline::change_multiplier(&mut submission, "not a number"), None);
    assert_eq!(pipeline::change_multiplier(&mut submission, "1_5"), None);
    assert_eq!(submission.multiplier, dec!(1.5));
    assert_eq!(submission.points_awarded, Some(10));

    // Later grades keep using the new multiplier.
    let change = pipeline::apply_grade(&mut store, &mut submission, 101, dec!(4), None).unwrap();
    assert_eq!(change.points_awarded, 6);
}

#[test]
fn bootstrap_seeds_points_only_once() {
    let (mut store, mut submission) = setup(&[dec!(10)], 20);
    store.set_grade(101, dec!(5), None).unwrap();

    assert_eq!(pipeline::bootstrap(&store, &mut submission), 10);
    assert_eq!(submission.total_grade, dec!(5));

    pipeline::override_points(&mut submission, 3);
    assert_eq!(pipeline::bootstrap(&store, &mut submission), 3);
    assert_eq!(submission.points_awarded, Some(3));
}

#[test]
fn refresh_uses_the_new_maximum_grade() {
    let (mut store, mut submission) = setup(&[dec!(10), dec!(10)], 100);
    pipeline::apply_grade(&mut store, &mut submission, 101, dec!(10), None).unwrap();
    assert_eq!(submission.points_awarded, Some(50));

    assert_eq!(pipeline::refresh(&store, &mut submission, dec!(10)), 100);
    assert_eq!(submission.maximum_grade, dec!(10));
    assert_eq!(submission.total_grade, dec!(10));

    assert_eq!(pipeline::refresh(&store, &mut submission, dec!(0)), 0);
}
