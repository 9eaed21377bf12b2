// src/catalog.rs

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::AppError,
    grading::{AnswerGradeStore, SummaryRow, pipeline},
    models::{
        answer::Answer,
        assessment::{Assessment, CreateAssessmentRequest},
        question::{OptionRequest, Question, QuestionOption, QuestionRequest},
        submission::{Submission, SubmissionGradingMode},
    },
};

/// An assessment with its questions in display order.
#[derive(Debug, Serialize)]
pub struct AssessmentView {
    pub id: i64,
    pub title: String,
    pub base_points: i64,
    pub maximum_grade: Decimal,
    pub questions: Vec<Question>,
}

/// A submission as seen by the reviewer.
#[derive(Debug, Serialize)]
pub struct SubmissionView {
    pub id: i64,
    pub assessment_id: i64,
    pub mode: SubmissionGradingMode,
    pub summary: Vec<SummaryRow>,
    pub total_grade: Decimal,
    pub maximum_grade: Decimal,
    pub base_points: i64,
    pub multiplier: Decimal,
    pub points_awarded: i64,
}

/// In-memory assessment, question and submission records.
///
/// Stands in for a database: callers serialize access through the lock in
/// [`crate::state::AppState`].
#[derive(Debug, Default)]
pub struct Catalog {
    assessments: HashMap<i64, Assessment>,
    questions: HashMap<i64, Question>,
    submissions: HashMap<i64, Submission>,
    grades: AnswerGradeStore,
    next_id: i64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn create_assessment(
        &mut self,
        req: CreateAssessmentRequest,
        default_base_points: i64,
    ) -> Assessment {
        let assessment = Assessment {
            id: self.allocate_id(),
            title: req.title,
            base_points: req.base_points.unwrap_or(default_base_points),
            question_ids: Vec::new(),
            created_at: Some(Utc::now()),
        };
        tracing::info!(
            "Assessment {} created with {} base points",
            assessment.id,
            assessment.base_points
        );
        self.assessments.insert(assessment.id, assessment.clone());
        assessment
    }

    fn assessment(&self, id: i64) -> Result<&Assessment, AppError> {
        self.assessments
            .get(&id)
            .ok_or(AppError::NotFound(format!("Assessment {} not found", id)))
    }

    fn questions_of<'a>(
        &'a self,
        assessment: &'a Assessment,
    ) -> impl Iterator<Item = &'a Question> {
        assessment
            .question_ids
            .iter()
            .filter_map(|id| self.questions.get(id))
    }

    /// Sum of the maximum grades of an assessment's current questions.
    fn maximum_grade_of(&self, assessment_id: i64) -> Decimal {
        self.assessments
            .get(&assessment_id)
            .map(|a| self.questions_of(a).map(Question::maximum_grade).sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// Brings every submission of an assessment in line with its current
    /// question set.
    fn refresh_submissions(&mut self, assessment_id: i64) {
        let maximum_grade = self.maximum_grade_of(assessment_id);
        for submission in self
            .submissions
            .values_mut()
            .filter(|s| s.assessment_id == assessment_id)
        {
            pipeline::refresh(&self.grades, submission, maximum_grade);
        }
    }

    pub fn assessment_view(&self, id: i64) -> Result<AssessmentView, AppError> {
        let assessment = self.assessment(id)?;
        let questions: Vec<Question> = self.questions_of(assessment).cloned().collect();
        Ok(AssessmentView {
            id: assessment.id,
            title: assessment.title.clone(),
            base_points: assessment.base_points,
            maximum_grade: questions.iter().map(Question::maximum_grade).sum(),
            questions,
        })
    }

    pub fn question(&self, id: i64) -> Result<&Question, AppError> {
        self.questions
            .get(&id)
            .ok_or(AppError::NotFound(format!("Question {} not found", id)))
    }

    fn question_mut(&mut self, id: i64) -> Result<&mut Question, AppError> {
        self.questions
            .get_mut(&id)
            .ok_or(AppError::NotFound(format!("Question {} not found", id)))
    }

    /// Adds a validated question to the end of an assessment.
    pub fn create_question(
        &mut self,
        assessment_id: i64,
        req: QuestionRequest,
    ) -> Result<Question, AppError> {
        self.assessment(assessment_id)?;

        let question = Question::from_request(self.allocate_id(), assessment_id, req)?;
        if let Some(assessment) = self.assessments.get_mut(&assessment_id) {
            assessment.question_ids.push(question.id);
        }
        tracing::info!(
            "Question {} ({:?}) added to assessment {}",
            question.id,
            question.kind(),
            assessment_id
        );
        self.questions.insert(question.id, question.clone());
        self.refresh_submissions(assessment_id);
        Ok(question)
    }

    pub fn update_question(
        &mut self,
        id: i64,
        req: QuestionRequest,
    ) -> Result<Question, AppError> {
        let answered = self.grades.has_answers_for_question(id);
        let question = self.question_mut(id)?;

        if answered && req.maximum_grade.normalize() != question.maximum_grade {
            return Err(AppError::Conflict(
                "Cannot change the maximum grade of a question that has answers".to_string(),
            ));
        }

        question.apply(req)?;
        let question = question.clone();
        tracing::info!("Question {} updated", id);
        self.refresh_submissions(question.assessment_id);
        Ok(question)
    }

    pub fn add_option(
        &mut self,
        question_id: i64,
        req: OptionRequest,
    ) -> Result<Question, AppError> {
        let question = self.question_mut(question_id)?;
        question.add_option(req)?;
        Ok(question.clone())
    }

    pub fn remove_option(
        &mut self,
        question_id: i64,
        index: usize,
    ) -> Result<QuestionOption, AppError> {
        let question = self.question_mut(question_id)?;
        question.remove_option(index)?.ok_or(AppError::NotFound(format!(
            "Question {} has no option {}",
            question_id, index
        )))
    }

    /// Deletes a question together with its options.
    pub fn delete_question(&mut self, id: i64) -> Result<(), AppError> {
        if self.grades.has_answers_for_question(id) {
            return Err(AppError::Conflict(
                "Cannot delete a question that has answers".to_string(),
            ));
        }

        let question = self
            .questions
            .remove(&id)
            .ok_or(AppError::NotFound(format!("Question {} not found", id)))?;
        if let Some(assessment) = self.assessments.get_mut(&question.assessment_id) {
            assessment.question_ids.retain(|qid| *qid != id);
        }
        tracing::info!("Question {} deleted", id);
        self.refresh_submissions(question.assessment_id);
        Ok(())
    }

    /// Records a learner's attempt. One answer is created per answered
    /// question (all questions when `question_ids` is empty), in display order.
    pub fn create_submission(
        &mut self,
        assessment_id: i64,
        question_ids: &[i64],
    ) -> Result<SubmissionView, AppError> {
        let assessment = self.assessment(assessment_id)?;
        let questions: Vec<(i64, Decimal)> = self
            .questions_of(assessment)
            .map(|q| (q.id, q.maximum_grade()))
            .collect();
        let base_points = assessment.base_points;

        if questions.is_empty() {
            return Err(AppError::BadRequest("Assessment has no questions".to_string()));
        }
        if let Some(unknown) = question_ids
            .iter()
            .find(|id| !questions.iter().any(|(qid, _)| qid == *id))
        {
            return Err(AppError::BadRequest(format!(
                "Question {} does not belong to assessment {}",
                unknown, assessment_id
            )));
        }

        let maximum_grade = questions.iter().map(|(_, max)| *max).sum();
        let submission_id = self.allocate_id();
        let mut submission = Submission::new(
            submission_id,
            assessment_id,
            questions.len(),
            base_points,
            maximum_grade,
        );

        for (question_id, max) in questions {
            if question_ids.is_empty() || question_ids.contains(&question_id) {
                let answer = Answer::new(self.allocate_id(), submission_id, question_id);
                self.grades.register_answer(answer, max);
            }
        }

        pipeline::bootstrap(&self.grades, &mut submission);
        tracing::info!(
            "Submission {} created for assessment {} ({:?})",
            submission_id,
            assessment_id,
            submission.mode
        );
        self.submissions.insert(submission_id, submission);
        self.submission_view(submission_id)
    }

    fn submission_mut(&mut self, id: i64) -> Result<&mut Submission, AppError> {
        self.submissions
            .get_mut(&id)
            .ok_or(AppError::NotFound(format!("Submission {} not found", id)))
    }

    pub fn submission_view(&self, id: i64) -> Result<SubmissionView, AppError> {
        let submission = self
            .submissions
            .get(&id)
            .ok_or(AppError::NotFound(format!("Submission {} not found", id)))?;

        Ok(SubmissionView {
            id: submission.id,
            assessment_id: submission.assessment_id,
            mode: submission.mode,
            summary: self.grades.grades_summary(submission.id),
            total_grade: submission.total_grade,
            maximum_grade: submission.maximum_grade,
            base_points: submission.base_points,
            multiplier: submission.multiplier,
            points_awarded: submission.points_awarded.unwrap_or(0),
        })
    }

    pub fn grade_answer(
        &mut self,
        submission_id: i64,
        answer_id: i64,
        grade: Decimal,
        grader_id: Option<i64>,
    ) -> Result<pipeline::GradeChange, AppError> {
        let submission = self
            .submissions
            .get_mut(&submission_id)
            .ok_or(AppError::NotFound(format!("Submission {} not found", submission_id)))?;
        Ok(pipeline::apply_grade(
            &mut self.grades,
            submission,
            answer_id,
            grade,
            grader_id,
        )?)
    }

    /// Non-numeric multipliers leave the submission as it was.
    pub fn change_multiplier(
        &mut self,
        submission_id: i64,
        raw: &str,
    ) -> Result<SubmissionView, AppError> {
        let submission = self.submission_mut(submission_id)?;
        pipeline::change_multiplier(submission, raw);
        self.submission_view(submission_id)
    }

    pub fn override_points(
        &mut self,
        submission_id: i64,
        points: i64,
    ) -> Result<SubmissionView, AppError> {
        let submission = self.submission_mut(submission_id)?;
        pipeline::override_points(submission, points);
        self.submission_view(submission_id)
    }
}
