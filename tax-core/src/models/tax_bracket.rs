use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    /// `None` for the open-ended top bracket.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    /// Width of the bracket, `None` when unbounded.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }
}

/// Marginal brackets that partition `[0, ∞)`.
///
/// The first bracket starts at zero, each bracket ends where the next one
/// begins, and only the last bracket is unbounded. [`BracketSchedule::new`]
/// refuses anything else, so calculators can walk the brackets without
/// re-checking coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Validates and wraps an ascending list of brackets.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidSchedule`] when the list is empty, does not
    /// start at zero, has a gap or overlap, has a bound on the last bracket,
    /// leaves an earlier bracket unbounded, or has a rate outside `[0, 1]`.
    pub fn new(
        name: &str,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, TaxError> {
        let invalid = |reason: String| TaxError::InvalidSchedule {
            schedule: name.to_string(),
            reason,
        };

        let Some(first) = brackets.first() else {
            return Err(invalid("no brackets".to_string()));
        };
        if first.min_income != Decimal::ZERO {
            return Err(invalid(format!(
                "first bracket starts at {} instead of 0",
                first.min_income
            )));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(invalid(format!(
                    "rate {} is outside [0, 1]",
                    bracket.tax_rate
                )));
            }
            match (bracket.max_income, index == last_index) {
                (None, true) => {}
                (None, false) => {
                    return Err(invalid(format!(
                        "bracket starting at {} is unbounded but not last",
                        bracket.min_income
                    )));
                }
                (Some(max), true) => {
                    return Err(invalid(format!("last bracket is capped at {max}")));
                }
                (Some(max), false) => {
                    if max <= bracket.min_income {
                        return Err(invalid(format!(
                            "bracket {}..{} is empty or inverted",
                            bracket.min_income, max
                        )));
                    }
                    let next_min = brackets[index + 1].min_income;
                    if next_min != max {
                        return Err(invalid(format!(
                            "bracket ends at {max} but next starts at {next_min}"
                        )));
                    }
                }
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Rate of the unbounded top bracket.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .last()
            .map_or(Decimal::ZERO, |bracket| bracket.tax_rate)
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = TaxError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new("deserialized", brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bracket(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
    ) -> TaxBracket {
        TaxBracket {
            min_income: min,
            max_income: max,
            tax_rate: rate,
        }
    }

    #[test]
    fn new_accepts_contiguous_schedule() {
        let schedule = BracketSchedule::new(
            "test",
            vec![
                bracket(dec!(0), Some(dec!(10000)), dec!(0.10)),
                bracket(dec!(10000), None, dec!(0.20)),
            ],
        )
        .expect("schedule should be valid");

        assert_eq!(schedule.brackets().len(), 2);
        assert_eq!(schedule.top_rate(), dec!(0.20));
    }

    #[test]
    fn new_rejects_empty_schedule() {
        let result = BracketSchedule::new("empty", vec![]);

        assert_eq!(
            result,
            Err(TaxError::InvalidSchedule {
                schedule: "empty".to_string(),
                reason: "no brackets".to_string(),
            })
        );
    }

    #[test]
    fn new_rejects_schedule_not_starting_at_zero() {
        let result =
            BracketSchedule::new("test", vec![bracket(dec!(100), None, dec!(0.10))]);

        assert!(matches!(result, Err(TaxError::InvalidSchedule { .. })));
    }

    #[test]
    fn new_rejects_gap_between_brackets() {
        let result = BracketSchedule::new(
            "test",
            vec![
                bracket(dec!(0), Some(dec!(10000)), dec!(0.10)),
                bracket(dec!(12000), None, dec!(0.20)),
            ],
        );

        assert_eq!(
            result,
            Err(TaxError::InvalidSchedule {
                schedule: "test".to_string(),
                reason: "bracket ends at 10000 but next starts at 12000".to_string(),
            })
        );
    }

    #[test]
    fn new_rejects_capped_last_bracket() {
        let result = BracketSchedule::new(
            "test",
            vec![bracket(dec!(0), Some(dec!(10000)), dec!(0.10))],
        );

        assert!(matches!(result, Err(TaxError::InvalidSchedule { .. })));
    }

    #[test]
    fn new_rejects_unbounded_middle_bracket() {
        let result = BracketSchedule::new(
            "test",
            vec![
                bracket(dec!(0), None, dec!(0.10)),
                bracket(dec!(10000), None, dec!(0.20)),
            ],
        );

        assert!(matches!(result, Err(TaxError::InvalidSchedule { .. })));
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = BracketSchedule::new("test", vec![bracket(dec!(0), None, dec!(1.5))]);

        assert!(matches!(result, Err(TaxError::InvalidSchedule { .. })));
    }

    #[test]
    fn width_is_none_for_top_bracket() {
        assert_eq!(
            bracket(dec!(0), Some(dec!(500)), dec!(0.1)).width(),
            Some(dec!(500))
        );
        assert_eq!(bracket(dec!(500), None, dec!(0.1)).width(), None);
    }
}
