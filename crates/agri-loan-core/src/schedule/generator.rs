//! Amortization schedule generation for subsidized agricultural loans.
//!
//! Loans run interest-only through an initial grace period, then repay in
//! equal principal installments over the remaining years. All arithmetic
//! uses `rust_decimal::Decimal` with half-to-even rounding at every
//! quantization step so repeated runs produce identical whole-won figures.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AgriLoanError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::AgriLoanResult;

/// Divisor turning a percentage figure into a rate.
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Terms of a grace-period loan with equal-principal repayment.
///
/// Derives `Eq` and `Hash` so the full input tuple can key a
/// [`ScheduleCache`](crate::schedule::ScheduleCache).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Disbursed principal in whole won.
    pub principal: i64,
    /// Annual interest rate as a percentage (1.5 = 1.5%).
    pub annual_rate_percent: Decimal,
    /// Full term in years, grace included.
    pub total_years: u32,
    /// Interest-only years at the start of the term.
    pub grace_years: u32,
}

/// One year of the schedule. Year 0 is the disbursement year: the balance
/// stands at the full principal and nothing is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub year_index: u32,
    pub remaining_balance: Money,
    pub interest: Money,
    pub principal_paid: Money,
    pub total_payment: Money,
}

impl ScheduleRow {
    /// Copy of the row with every monetary field integer-divided by
    /// `unit`, truncating toward zero. Used for the thousands display view;
    /// units of 0 or 1 return the row unchanged.
    pub fn in_units_of(&self, unit: u32) -> ScheduleRow {
        if unit <= 1 {
            return *self;
        }
        let divisor = Decimal::from(unit);
        ScheduleRow {
            year_index: self.year_index,
            remaining_balance: (self.remaining_balance / divisor).trunc(),
            interest: (self.interest / divisor).trunc(),
            principal_paid: (self.principal_paid / divisor).trunc(),
            total_payment: (self.total_payment / divisor).trunc(),
        }
    }
}

/// Full schedule, `total_years + 1` rows in ascending year order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub rows: Vec<ScheduleRow>,
}

impl LoanSchedule {
    /// Interest charged over the life of the loan.
    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|r| r.interest).sum()
    }

    /// Principal repaid over the life of the loan. Equals the disbursed
    /// principal exactly.
    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|r| r.principal_paid).sum()
    }

    /// Sum of all yearly payments.
    pub fn total_payment(&self) -> Money {
        self.rows.iter().map(|r| r.total_payment).sum()
    }

    /// Schedule scaled for display, see [`ScheduleRow::in_units_of`].
    pub fn in_units_of(&self, unit: u32) -> LoanSchedule {
        LoanSchedule {
            rows: self.rows.iter().map(|r| r.in_units_of(unit)).collect(),
        }
    }
}

/// Schedule plus the headline figures the schedule was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentPlan {
    pub terms: LoanTerms,
    pub repayment_years: u32,
    /// Equal-principal installment before remainder distribution.
    pub base_principal_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_payment: Money,
    pub schedule: Vec<ScheduleRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the yearly repayment schedule for `terms`.
///
/// Pure and deterministic: identical terms always yield a structurally
/// identical schedule, so results are safe to memoize. The final repayment
/// year pays whatever balance remains, which forces the schedule to close
/// at exactly zero and makes the principal column sum to the disbursed
/// principal with no rounding leakage.
pub fn generate_schedule(terms: &LoanTerms) -> AgriLoanResult<LoanSchedule> {
    validate_terms(terms)?;

    let rate: Rate = terms.annual_rate_percent / PERCENT;
    let repayment_years = terms.total_years - terms.grace_years;
    let (base_payment, mut extra) = equal_principal_split(terms.principal, repayment_years);

    let mut rows = Vec::with_capacity(terms.total_years as usize + 1);
    let mut remaining: Money = Decimal::from(terms.principal);

    // Disbursement year: balance only, no flows.
    rows.push(ScheduleRow {
        year_index: 0,
        remaining_balance: remaining,
        interest: Decimal::ZERO,
        principal_paid: Decimal::ZERO,
        total_payment: Decimal::ZERO,
    });

    for year in 1..=terms.total_years {
        let interest = (remaining * rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);

        let principal_paid = if year <= terms.grace_years {
            Decimal::ZERO
        } else if year == terms.total_years {
            // Last year clears whatever is left, absorbing rounding residue.
            remaining
        } else if extra > Decimal::ZERO {
            extra -= Decimal::ONE;
            base_payment + Decimal::ONE
        } else {
            base_payment
        };

        remaining -= principal_paid;
        rows.push(ScheduleRow {
            year_index: year,
            remaining_balance: remaining,
            interest,
            principal_paid,
            total_payment: interest + principal_paid,
        });
    }

    Ok(LoanSchedule { rows })
}

/// Base equal-principal installment for `principal` over `repayment_years`,
/// rounded half-to-even to whole won, and the remainder that rounding left
/// over. A remainder above zero is handed out one won at a time to the
/// earliest repayment years; a negative remainder (the division rounded up)
/// is settled by the final-year balance sweep.
pub fn equal_principal_split(principal: i64, repayment_years: u32) -> (Money, Money) {
    let principal = Decimal::from(principal);
    let base = (principal / Decimal::from(repayment_years))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    (base, principal - base * Decimal::from(repayment_years))
}

/// Run the generator and wrap the schedule in the standard output envelope
/// with headline totals, assumptions, and any distribution warnings.
pub fn model_repayment_plan(terms: &LoanTerms) -> AgriLoanResult<ComputationOutput<RepaymentPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = generate_schedule(terms)?;
    let repayment_years = terms.total_years - terms.grace_years;
    let (base_payment, remainder) = equal_principal_split(terms.principal, repayment_years);

    if remainder > Decimal::ZERO {
        warnings.push(format!(
            "Equal-principal split left a remainder of {remainder} won; \
             distributed one won per year to the earliest repayment years."
        ));
    }
    if let Some(last) = schedule.rows.last() {
        let residual = last.principal_paid - base_payment;
        if residual.abs() > Decimal::ONE {
            warnings.push(format!(
                "Final-year installment differs from the base installment by {residual} won; \
                 the balance sweep absorbed the rounding residue."
            ));
        }
    }

    let plan = RepaymentPlan {
        terms: terms.clone(),
        repayment_years,
        base_principal_payment: base_payment,
        total_interest: schedule.total_interest(),
        total_principal: schedule.total_principal(),
        total_payment: schedule.total_payment(),
        schedule: schedule.rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "rounding": "half to even at every whole-won quantization",
        "grace_period": "interest only; balance unchanged",
        "final_year": "pays the full remaining balance",
    });

    Ok(with_metadata(
        "Grace period + equal-principal amortization",
        &assumptions,
        warnings,
        elapsed,
        plan,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_terms(terms: &LoanTerms) -> AgriLoanResult<()> {
    if terms.principal <= 0 {
        return Err(AgriLoanError::InvalidInput {
            field: "principal".into(),
            reason: "principal must be positive".into(),
        });
    }
    if terms.annual_rate_percent < Decimal::ZERO {
        return Err(AgriLoanError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "rate must be non-negative".into(),
        });
    }
    if terms.total_years == 0 {
        return Err(AgriLoanError::InvalidInput {
            field: "total_years".into(),
            reason: "total term must be positive".into(),
        });
    }
    if terms.grace_years >= terms.total_years {
        return Err(AgriLoanError::InvalidInput {
            field: "grace_years".into(),
            reason: "grace period must be between 0 and total term (exclusive)".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_terms() -> LoanTerms {
        LoanTerms {
            principal: 100_000_000,
            annual_rate_percent: dec!(1.5),
            total_years: 25,
            grace_years: 5,
        }
    }

    #[test]
    fn test_row_zero_is_disbursement_only() {
        let schedule = generate_schedule(&standard_terms()).unwrap();
        assert_eq!(schedule.rows.len(), 26);

        let first = &schedule.rows[0];
        assert_eq!(first.year_index, 0);
        assert_eq!(first.remaining_balance, dec!(100_000_000));
        assert_eq!(first.interest, Decimal::ZERO);
        assert_eq!(first.principal_paid, Decimal::ZERO);
        assert_eq!(first.total_payment, Decimal::ZERO);
    }

    #[test]
    fn test_grace_years_pay_interest_only() {
        let schedule = generate_schedule(&standard_terms()).unwrap();
        for row in &schedule.rows[1..=5] {
            assert_eq!(row.principal_paid, Decimal::ZERO);
            // 100,000,000 * 1.5% = 1,500,000 on the untouched balance
            assert_eq!(row.interest, dec!(1_500_000));
            assert_eq!(row.remaining_balance, dec!(100_000_000));
            assert_eq!(row.total_payment, dec!(1_500_000));
        }
    }

    #[test]
    fn test_first_repayment_year_base_installment() {
        let schedule = generate_schedule(&standard_terms()).unwrap();
        // 100,000,000 over 20 repayment years
        let year6 = &schedule.rows[6];
        assert_eq!(year6.principal_paid, dec!(5_000_000));
        assert_eq!(year6.interest, dec!(1_500_000));
        assert_eq!(year6.total_payment, dec!(6_500_000));
        assert_eq!(year6.remaining_balance, dec!(95_000_000));
    }

    #[test]
    fn test_principal_sums_exactly_and_zeroes_out() {
        let schedule = generate_schedule(&standard_terms()).unwrap();
        assert_eq!(schedule.total_principal(), dec!(100_000_000));
        assert_eq!(
            schedule.rows.last().unwrap().remaining_balance,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_remainder_spread_to_earliest_years() {
        // 100 over 3 years: base 33, remainder 1 goes to year 1
        let terms = LoanTerms {
            principal: 100,
            annual_rate_percent: Decimal::ZERO,
            total_years: 3,
            grace_years: 0,
        };
        let schedule = generate_schedule(&terms).unwrap();
        assert_eq!(schedule.rows[1].principal_paid, dec!(34));
        assert_eq!(schedule.rows[2].principal_paid, dec!(33));
        assert_eq!(schedule.rows[3].principal_paid, dec!(33));
        assert_eq!(schedule.total_principal(), dec!(100));
    }

    #[test]
    fn test_base_installment_rounds_half_to_even() {
        // 25 / 10 = 2.5 rounds down to the even 2
        let (base, remainder) = equal_principal_split(25, 10);
        assert_eq!(base, dec!(2));
        assert_eq!(remainder, dec!(5));

        // 35 / 10 = 3.5 rounds up to the even 4
        let (base, remainder) = equal_principal_split(35, 10);
        assert_eq!(base, dec!(4));
        assert_eq!(remainder, dec!(-5));
    }

    #[test]
    fn test_interest_rounds_half_to_even() {
        // 100 * 2.5% = 2.5 rounds to 2
        let terms = LoanTerms {
            principal: 100,
            annual_rate_percent: dec!(2.5),
            total_years: 2,
            grace_years: 1,
        };
        let schedule = generate_schedule(&terms).unwrap();
        assert_eq!(schedule.rows[1].interest, dec!(2));

        // 100 * 3.5% = 3.5 rounds to 4
        let terms = LoanTerms {
            annual_rate_percent: dec!(3.5),
            ..terms
        };
        let schedule = generate_schedule(&terms).unwrap();
        assert_eq!(schedule.rows[1].interest, dec!(4));
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let terms = standard_terms();
        let first = generate_schedule(&terms).unwrap();
        let second = generate_schedule(&terms).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let terms = LoanTerms {
            principal: 100,
            annual_rate_percent: Decimal::ZERO,
            total_years: 4,
            grace_years: 1,
        };
        let schedule = generate_schedule(&terms).unwrap();
        assert_eq!(schedule.total_interest(), Decimal::ZERO);
        assert_eq!(schedule.rows[1].total_payment, Decimal::ZERO);
        assert_eq!(schedule.total_payment(), dec!(100));
    }

    #[test]
    fn test_single_repayment_year() {
        let terms = LoanTerms {
            principal: 7_000_000,
            annual_rate_percent: dec!(1.5),
            total_years: 1,
            grace_years: 0,
        };
        let schedule = generate_schedule(&terms).unwrap();
        assert_eq!(schedule.rows.len(), 2);
        assert_eq!(schedule.rows[1].principal_paid, dec!(7_000_000));
        assert_eq!(schedule.rows[1].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_nonpositive_principal() {
        let mut terms = standard_terms();
        terms.principal = 0;
        let err = generate_schedule(&terms).unwrap_err();
        match err {
            AgriLoanError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        terms.principal = -5;
        assert!(generate_schedule(&terms).is_err());
    }

    #[test]
    fn test_rejects_negative_rate() {
        let mut terms = standard_terms();
        terms.annual_rate_percent = dec!(-0.1);
        let err = generate_schedule(&terms).unwrap_err();
        match err {
            AgriLoanError::InvalidInput { field, .. } => {
                assert_eq!(field, "annual_rate_percent")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_term() {
        let terms = LoanTerms {
            principal: 100,
            annual_rate_percent: dec!(1.5),
            total_years: 0,
            grace_years: 0,
        };
        let err = generate_schedule(&terms).unwrap_err();
        match err {
            AgriLoanError::InvalidInput { field, .. } => assert_eq!(field, "total_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_grace_not_below_term() {
        let mut terms = LoanTerms {
            principal: 100,
            annual_rate_percent: dec!(1.5),
            total_years: 10,
            grace_years: 10,
        };
        let err = generate_schedule(&terms).unwrap_err();
        match err {
            AgriLoanError::InvalidInput { field, .. } => assert_eq!(field, "grace_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        terms.grace_years = 11;
        assert!(generate_schedule(&terms).is_err());
    }

    #[test]
    fn test_tiny_principal_final_year_absorbs_residual() {
        // 3 won over 5 years: base installment rounds to 1, so the balance
        // dips below zero in year 4 and the final-year sweep settles it.
        // The principal column still sums exactly.
        let terms = LoanTerms {
            principal: 3,
            annual_rate_percent: Decimal::ZERO,
            total_years: 5,
            grace_years: 0,
        };
        let schedule = generate_schedule(&terms).unwrap();
        assert_eq!(schedule.rows[4].remaining_balance, dec!(-1));
        assert_eq!(schedule.rows[5].principal_paid, dec!(-1));
        assert_eq!(
            schedule.rows.last().unwrap().remaining_balance,
            Decimal::ZERO
        );
        assert_eq!(schedule.total_principal(), dec!(3));
    }

    #[test]
    fn test_thousands_view_truncates_toward_zero() {
        let schedule = generate_schedule(&standard_terms()).unwrap();
        let scaled = schedule.in_units_of(1000);
        assert_eq!(scaled.rows[1].interest, dec!(1500));
        assert_eq!(scaled.rows[6].principal_paid, dec!(5000));
        assert_eq!(scaled.rows[0].remaining_balance, dec!(100_000));

        // 1,999 won scales to 1 thousand, not 2
        let row = ScheduleRow {
            year_index: 1,
            remaining_balance: dec!(1999),
            interest: dec!(-1999),
            principal_paid: Decimal::ZERO,
            total_payment: Decimal::ZERO,
        };
        let scaled = row.in_units_of(1000);
        assert_eq!(scaled.remaining_balance, dec!(1));
        // negative values truncate toward zero as well
        assert_eq!(scaled.interest, dec!(-1));
    }

    #[test]
    fn test_totals_are_consistent() {
        let schedule = generate_schedule(&standard_terms()).unwrap();
        assert_eq!(
            schedule.total_payment(),
            schedule.total_interest() + schedule.total_principal()
        );
    }

    #[test]
    fn test_plan_envelope() {
        let output = model_repayment_plan(&standard_terms()).unwrap();
        let plan = &output.result;
        assert_eq!(plan.repayment_years, 20);
        assert_eq!(plan.base_principal_payment, dec!(5_000_000));
        assert_eq!(plan.total_principal, dec!(100_000_000));
        assert_eq!(plan.schedule.len(), 26);
        assert!(!output.methodology.is_empty());
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
        // division is exact here, so no distribution warning
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_remainder_warning_emitted() {
        let terms = LoanTerms {
            principal: 100,
            annual_rate_percent: dec!(1.5),
            total_years: 3,
            grace_years: 0,
        };
        let output = model_repayment_plan(&terms).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("remainder")));
    }
}
