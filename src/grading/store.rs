// src/grading/store.rs

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::answer::Answer;

/// Rejected grade input. The store is never mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidGradeError {
    /// The raw input does not parse as a number.
    NotNumeric(String),
    /// The value lies outside `[0, maximum]`.
    OutOfRange { value: Decimal, maximum: Decimal },
    /// No answer with this ID is known (to the submission).
    UnknownAnswer(i64),
}

impl fmt::Display for InvalidGradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidGradeError::NotNumeric(raw) => write!(f, "Grade '{}' is not a number", raw),
            InvalidGradeError::OutOfRange { value, maximum } => {
                write!(f, "Grade {} must be between 0 and {}", value, maximum)
            }
            InvalidGradeError::UnknownAnswer(id) => write!(f, "Answer {} not found", id),
        }
    }
}

impl std::error::Error for InvalidGradeError {}

/// Sign, digits with at most one decimal point, optional exponent.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid number pattern")
});

/// Parses reviewer-typed text as a decimal number.
///
/// Only plain decimal notation is accepted; digit separators such as
/// `1_0` are not numbers.
pub(crate) fn parse_number(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if !NUMBER.is_match(trimmed) {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .map(|d| d.normalize())
}

/// Parses raw reviewer input into a grade value.
pub fn parse_grade(raw: &str) -> Result<Decimal, InvalidGradeError> {
    parse_number(raw).ok_or_else(|| InvalidGradeError::NotNumeric(raw.to_string()))
}

/// One row of a submission's grades summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub answer_id: i64,
    pub question_id: i64,
    pub grade: Option<Decimal>,
}

#[derive(Debug, Clone)]
struct Entry {
    answer: Answer,
    maximum_grade: Decimal,
}

/// Holds the current grade of every answer, in question display order.
#[derive(Debug, Clone, Default)]
pub struct AnswerGradeStore {
    entries: Vec<Entry>,
    index: HashMap<i64, usize>,
}

impl AnswerGradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a learner's answer together with the maximum grade of the
    /// question it answers. Registering an existing ID replaces it in place.
    pub fn register_answer(&mut self, answer: Answer, maximum_grade: Decimal) {
        let entry = Entry {
            answer,
            maximum_grade,
        };
        match self.index.get(&entry.answer.id) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(entry.answer.id, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Sets the grade of an answer and returns the previous grade.
    ///
    /// Fails without touching the stored grade if the value is outside
    /// `[0, maximum_grade]` of the answer's question.
    pub fn set_grade(
        &mut self,
        answer_id: i64,
        value: Decimal,
        grader_id: Option<i64>,
    ) -> Result<Option<Decimal>, InvalidGradeError> {
        let pos = *self
            .index
            .get(&answer_id)
            .ok_or(InvalidGradeError::UnknownAnswer(answer_id))?;
        let entry = &mut self.entries[pos];

        if value < Decimal::ZERO || value > entry.maximum_grade {
            tracing::warn!(
                "Rejected grade {} for answer {} (maximum {})",
                value,
                answer_id,
                entry.maximum_grade
            );
            return Err(InvalidGradeError::OutOfRange {
                value,
                maximum: entry.maximum_grade,
            });
        }

        let previous = entry.answer.grade.replace(value.normalize());
        entry.answer.grader_id = grader_id;
        entry.answer.graded_at = Some(Utc::now());
        Ok(previous)
    }

    /// Returns the current grade, or `None` while the answer is ungraded.
    pub fn get_grade(&self, answer_id: i64) -> Option<Decimal> {
        self.answer(answer_id).and_then(|a| a.grade)
    }

    pub fn answer(&self, answer_id: i64) -> Option<&Answer> {
        self.index.get(&answer_id).map(|&pos| &self.entries[pos].answer)
    }

    /// All answers of a submission in question display order.
    pub fn answers(&self, submission_id: i64) -> impl Iterator<Item = &Answer> + '_ {
        self.entries
            .iter()
            .map(|e| &e.answer)
            .filter(move |a| a.submission_id == submission_id)
    }

    /// `(answer_id, grade)` for every graded answer of a submission, in
    /// question display order.
    pub fn all_grades(&self, submission_id: i64) -> impl Iterator<Item = (i64, Decimal)> + '_ {
        self.answers(submission_id)
            .filter_map(|a| a.grade.map(|grade| (a.id, grade)))
    }

    /// Summary rows for every answer of a submission, graded or not.
    pub fn grades_summary(&self, submission_id: i64) -> Vec<SummaryRow> {
        self.answers(submission_id)
            .map(|a| SummaryRow {
                answer_id: a.id,
                question_id: a.question_id,
                grade: a.grade,
            })
            .collect()
    }

    pub fn has_answers_for_question(&self, question_id: i64) -> bool {
        self.entries.iter().any(|e| e.answer.question_id == question_id)
    }
}
