// src/grading/experience.rs

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::store::parse_number;

/// Scalar applied to the proportional award, e.g. for late penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Multiplier(Decimal);

impl Multiplier {
    pub const ONE: Multiplier = Multiplier(Decimal::ONE);

    /// Returns `None` for non-numeric or negative input. Zero is valid.
    pub fn new(value: Decimal) -> Option<Self> {
        if value < Decimal::ZERO {
            None
        } else {
            Some(Self(value.normalize()))
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        parse_number(raw).and_then(Self::new)
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

/// Turns a grade fraction into experience points.
pub struct ExperiencePointCalculator;

impl ExperiencePointCalculator {
    /// Points before the multiplier: `floor(base_points * total / maximum)`.
    ///
    /// Zero when `maximum_grade` is zero.
    pub fn actual_points(
        total_grade: Decimal,
        maximum_grade: Decimal,
        base_points: i64,
    ) -> Decimal {
        if maximum_grade <= Decimal::ZERO {
            tracing::debug!("Maximum grade is zero, no experience points awarded");
            return Decimal::ZERO;
        }

        let base = Decimal::from(base_points.max(0));
        let total = total_grade.max(Decimal::ZERO);

        match base
            .checked_mul(total)
            .and_then(|scaled| scaled.checked_div(maximum_grade))
        {
            Some(fraction) => fraction.floor(),
            None => Decimal::MAX,
        }
    }

    /// `floor(actual_points * multiplier)`, never negative.
    pub fn award(
        total_grade: Decimal,
        maximum_grade: Decimal,
        base_points: i64,
        multiplier: Multiplier,
    ) -> i64 {
        let actual = Self::actual_points(total_grade, maximum_grade, base_points);
        if actual.is_zero() {
            return 0;
        }

        actual
            .checked_mul(multiplier.value())
            .map(|points| points.floor().to_i64().unwrap_or(i64::MAX))
            .unwrap_or(i64::MAX)
            .max(0)
    }

    /// Recomputes the award after the reviewer edits the multiplier.
    ///
    /// Returns `None`, meaning "keep the current award", when the new
    /// multiplier or the current total grade is not a usable number.
    pub fn on_multiplier_changed(
        new_multiplier: &str,
        current_total_grade: Option<Decimal>,
        maximum_grade: Decimal,
        base_points: i64,
    ) -> Option<(Multiplier, i64)> {
        let multiplier = Multiplier::parse(new_multiplier)?;
        let total_grade = current_total_grade?;
        let points = Self::award(total_grade, maximum_grade, base_points, multiplier);
        Some((multiplier, points))
    }
}
