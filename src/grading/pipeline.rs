// src/grading/pipeline.rs
//
// Grade change -> summary -> total -> points, as explicit steps. Each step
// takes the previous step's output; nothing is recomputed behind the
// caller's back.

use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregator::{Aggregate, GradeAggregator};
use super::experience::{ExperiencePointCalculator, Multiplier};
use super::store::{AnswerGradeStore, InvalidGradeError, SummaryRow};
use crate::models::submission::Submission;

/// Everything the reviewer's view needs after a grade is accepted.
#[derive(Debug, Clone, Serialize)]
pub struct GradeChange {
    pub answer_id: i64,
    pub previous_grade: Option<Decimal>,
    pub grade: Decimal,
    pub summary: Vec<SummaryRow>,
    pub total_grade: Decimal,
    pub maximum_grade: Decimal,
    pub points_awarded: i64,
}

/// Points for `aggregate` under the submission's current configuration.
pub fn points_for(submission: &Submission, aggregate: &Aggregate) -> i64 {
    if !aggregate.award_defined() {
        return 0;
    }
    ExperiencePointCalculator::award(
        aggregate.total_grade,
        aggregate.maximum_grade,
        submission.base_points,
        Multiplier::new(submission.multiplier).unwrap_or_default(),
    )
}

/// Applies a reviewer's grade to one answer of `submission`, then refreshes
/// the submission's total grade and awarded points.
///
/// On error neither the store nor the submission is modified.
pub fn apply_grade(
    store: &mut AnswerGradeStore,
    submission: &mut Submission,
    answer_id: i64,
    grade: Decimal,
    grader_id: Option<i64>,
) -> Result<GradeChange, InvalidGradeError> {
    let belongs = store
        .answer(answer_id)
        .is_some_and(|a| a.submission_id == submission.id);
    if !belongs {
        return Err(InvalidGradeError::UnknownAnswer(answer_id));
    }

    let previous_grade = store.set_grade(answer_id, grade, grader_id)?;

    let summary = store.grades_summary(submission.id);
    let aggregate = GradeAggregator::new(store).recompute(submission);
    let points_awarded = points_for(submission, &aggregate);

    submission.total_grade = aggregate.total_grade;
    submission.points_awarded = Some(points_awarded);

    tracing::info!(
        "Answer {} graded {} (was {:?}); submission {} total {} / {}, {} points",
        answer_id,
        grade,
        previous_grade,
        submission.id,
        aggregate.total_grade,
        aggregate.maximum_grade,
        points_awarded
    );

    Ok(GradeChange {
        answer_id,
        previous_grade,
        grade: grade.normalize(),
        summary,
        total_grade: aggregate.total_grade,
        maximum_grade: aggregate.maximum_grade,
        points_awarded,
    })
}

/// Applies a raw multiplier edit. A non-numeric or negative multiplier is a
/// no-op and returns `None`.
pub fn change_multiplier(submission: &mut Submission, raw: &str) -> Option<i64> {
    let Some((multiplier, points)) = ExperiencePointCalculator::on_multiplier_changed(
        raw,
        Some(submission.total_grade),
        submission.maximum_grade,
        submission.base_points,
    ) else {
        tracing::warn!(
            "Ignoring multiplier '{}' for submission {}",
            raw,
            submission.id
        );
        return None;
    };

    submission.multiplier = multiplier.value();
    submission.points_awarded = Some(points);
    tracing::info!(
        "Submission {} multiplier set to {}, {} points",
        submission.id,
        multiplier.value(),
        points
    );
    Some(points)
}

/// Refreshes the total grade when a submission is loaded and seeds the
/// award from it if no points were ever awarded. Returns the award.
pub fn bootstrap(store: &AnswerGradeStore, submission: &mut Submission) -> i64 {
    let aggregate = GradeAggregator::new(store).recompute(submission);
    submission.total_grade = aggregate.total_grade;

    match submission.points_awarded {
        Some(points) => points,
        None => {
            let points = points_for(submission, &aggregate);
            submission.points_awarded = Some(points);
            tracing::debug!("Seeded submission {} with {} points", submission.id, points);
            points
        }
    }
}

/// Re-derives total grade and points after the question set of the
/// submission's assessment changed. `maximum_grade` is the new sum of the
/// assessment's question maxima. Returns the award.
pub fn refresh(
    store: &AnswerGradeStore,
    submission: &mut Submission,
    maximum_grade: Decimal,
) -> i64 {
    submission.maximum_grade = maximum_grade;
    let aggregate = GradeAggregator::new(store).recompute(submission);
    let points = points_for(submission, &aggregate);

    submission.total_grade = aggregate.total_grade;
    submission.points_awarded = Some(points);
    tracing::debug!(
        "Submission {} refreshed: {} / {}, {} points",
        submission.id,
        aggregate.total_grade,
        maximum_grade,
        points
    );
    points
}

/// Records an award typed in by the reviewer. It stands until the next
/// grade, multiplier or question-set change recomputes it.
pub fn override_points(submission: &mut Submission, points: i64) -> i64 {
    let points = points.max(0);
    submission.points_awarded = Some(points);
    tracing::info!("Submission {} points overridden to {}", submission.id, points);
    points
}
