// src/models/question.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::html::clean_html;

/// Upper bound accepted for a question's maximum grade at authoring time.
pub const MAXIMUM_GRADE_LIMIT: u32 = 1000;

/// Structural violations of a question's option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// No option is marked as correct.
    NoCorrectOption,
    /// A multiple-choice question has more than one correct option.
    MultipleCorrectOptionsInChoiceMode,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoCorrectOption => {
                write!(f, "At least one option must be marked as correct")
            }
            ValidationError::MultipleCorrectOptionsInChoiceMode => {
                write!(f, "A multiple choice question must have exactly one correct option")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Multiple-choice permits exactly one correct option,
/// multiple-response permits one or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    MultipleResponse,
}

/// A single selectable option of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// The option text shown to the learner.
    pub option: String,

    /// Shown to the learner after grading.
    pub explanation: String,

    pub correct: bool,

    /// Display order within the owning question.
    pub weight: i32,
}

/// A gradable multiple-choice / multiple-response question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub assessment_id: i64,
    pub title: String,
    pub description: Option<String>,

    /// Never shown to learners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_only_comments: Option<String>,

    pub maximum_grade: Decimal,

    /// Mode flag: `true` restricts the question to exactly one correct option.
    pub multiple_choice: bool,

    /// Ordered by `weight`.
    pub options: Vec<QuestionOption>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Builds a question from an authoring request.
    ///
    /// The request's field rules must already have been checked with
    /// [`Validate::validate`]; this only enforces the option invariants.
    pub fn from_request(
        id: i64,
        assessment_id: i64,
        req: QuestionRequest,
    ) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let question = Self {
            id,
            assessment_id,
            title: req.title,
            description: req.description.as_deref().map(clean_html),
            staff_only_comments: req.staff_only_comments,
            maximum_grade: req.maximum_grade.normalize(),
            multiple_choice: req.multiple_choice,
            options: build_options(req.options),
            created_at: Some(now),
            updated_at: Some(now),
        };
        question.validate()?;
        Ok(question)
    }

    /// Checks the option invariants:
    /// * at least one option is correct
    /// * in multiple-choice mode, exactly one option is correct
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.correct_option_count() {
            0 => Err(ValidationError::NoCorrectOption),
            1 => Ok(()),
            _ if self.multiple_choice => Err(ValidationError::MultipleCorrectOptionsInChoiceMode),
            _ => Ok(()),
        }
    }

    pub fn maximum_grade(&self) -> Decimal {
        self.maximum_grade
    }

    pub fn kind(&self) -> QuestionKind {
        if self.multiple_choice {
            QuestionKind::MultipleChoice
        } else {
            QuestionKind::MultipleResponse
        }
    }

    pub fn correct_option_count(&self) -> usize {
        self.options.iter().filter(|o| o.correct).count()
    }

    /// Appends an option. The question is left untouched if the result
    /// would violate the option invariants.
    pub fn add_option(&mut self, req: OptionRequest) -> Result<(), ValidationError> {
        let weight = self.next_weight();
        self.edit(|q| q.options.push(build_option(req, weight)))
    }

    /// Removes the option at `index` (display order).
    ///
    /// Returns `Ok(None)` when there is no such option.
    pub fn remove_option(
        &mut self,
        index: usize,
    ) -> Result<Option<QuestionOption>, ValidationError> {
        if index >= self.options.len() {
            return Ok(None);
        }
        let mut removed = None;
        self.edit(|q| {
            removed = Some(q.options.remove(index));
            reweigh(&mut q.options);
        })?;
        Ok(removed)
    }

    /// Replaces the authored fields with the contents of `req`.
    pub fn apply(&mut self, req: QuestionRequest) -> Result<(), ValidationError> {
        self.edit(|q| {
            q.title = req.title;
            q.description = req.description.as_deref().map(clean_html);
            q.staff_only_comments = req.staff_only_comments;
            q.maximum_grade = req.maximum_grade.normalize();
            q.multiple_choice = req.multiple_choice;
            q.options = build_options(req.options);
        })
    }

    /// Runs `change` on a copy and commits it only if it validates.
    fn edit<F>(&mut self, change: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&mut Question),
    {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        candidate.updated_at = Some(Utc::now());
        *self = candidate;
        Ok(())
    }

    fn next_weight(&self) -> i32 {
        self.options.iter().map(|o| o.weight + 1).max().unwrap_or(0)
    }
}

fn build_options(options: Vec<OptionRequest>) -> Vec<QuestionOption> {
    options
        .into_iter()
        .zip(0..)
        .map(|(req, weight)| build_option(req, weight))
        .collect()
}

fn build_option(req: OptionRequest, weight: i32) -> QuestionOption {
    QuestionOption {
        option: clean_html(&req.option),
        explanation: clean_html(&req.explanation),
        correct: req.correct,
        weight,
    }
}

fn reweigh(options: &mut [QuestionOption]) {
    for (option, weight) in options.iter_mut().zip(0..) {
        option.weight = weight;
    }
}

/// DTO for authoring (creating or replacing) a question.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    #[validate(length(max = 10000))]
    pub staff_only_comments: Option<String>,
    #[validate(custom(function = validate_maximum_grade))]
    pub maximum_grade: Decimal,
    #[serde(default)]
    pub multiple_choice: bool,
    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<OptionRequest>,
}

/// DTO for a single option inside a [`QuestionRequest`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OptionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub option: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub explanation: String,
    #[serde(default)]
    pub correct: bool,
}

fn validate_maximum_grade(grade: &Decimal) -> Result<(), validator::ValidationError> {
    if *grade < Decimal::ZERO {
        return Err(validator::ValidationError::new("maximum_grade_negative"));
    }
    if *grade > Decimal::from(MAXIMUM_GRADE_LIMIT) {
        return Err(validator::ValidationError::new("maximum_grade_too_large"));
    }
    Ok(())
}

/// Public view of a question for learners (no correctness or comments).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: QuestionKind,
    pub maximum_grade: Decimal,
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            title: q.title.clone(),
            description: q.description.clone(),
            kind: q.kind(),
            maximum_grade: q.maximum_grade,
            options: q.options.iter().map(|o| o.option.clone()).collect(),
        }
    }
}
