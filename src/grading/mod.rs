// src/grading/mod.rs

//! Grade bookkeeping for submissions: per-answer grades, submission totals
//! and the experience points derived from them.

pub mod aggregator;
pub mod experience;
pub mod pipeline;
pub mod store;

pub use aggregator::{Aggregate, GradeAggregator};
pub use experience::{ExperiencePointCalculator, Multiplier};
pub use store::{AnswerGradeStore, InvalidGradeError, SummaryRow, parse_grade};
