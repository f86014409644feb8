//! Input data structures for a single BNPL pricing evaluation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day-count basis used throughout the engine
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Input validation errors surfaced by the pricing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The four explicit behavior fractions leave no room for on-time payers
    #[error(
        "invalid portfolio mix: early {early} + late {late} + default {default} + fraud {fraud} \
         = {total} exceeds 1.0"
    )]
    InvalidPortfolioMix {
        early: f64,
        late: f64,
        default: f64,
        fraud: f64,
        total: f64,
    },

    /// A loan-terms field violates its documented invariant
    #[error("invalid loan terms: {0}")]
    InvalidLoanTerms(String),

    /// A fraction that must lie in [0, 1] does not
    #[error("{field} must be within [0, 1], got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },
}

/// Commercial terms of a single installment loan
///
/// Immutable per calculation. All percentage fields are decimals
/// (0.03 = 3%), all currency fields share the principal's unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Loan principal, must be > 0
    pub principal: f64,

    /// Nominal annual interest rate (0 = interest-free plan)
    pub annual_rate: f64,

    /// Number of installments, must be >= 1
    pub installments: u32,

    /// Days between installments (14 = biweekly, 30 = monthly)
    pub installment_frequency_days: u32,

    /// Fixed fee charged at origination, as a fraction of principal
    pub fixed_fee_pct: f64,

    /// Merchant commission, as a fraction of principal
    pub merchant_commission_pct: f64,

    /// Days between purchase and merchant payout
    pub settlement_delay_days: u32,

    /// Late fee charged per late installment
    pub late_fee_amount: f64,

    /// Fraction of installments that incur a late fee across the
    /// on-time and default cohorts
    pub late_installment_pct: f64,

    /// Whether the first installment is collected at purchase
    pub first_installment_upfront: bool,

    /// Penalty rate applied to the late cohort's extended balance;
    /// falls back to `annual_rate` when absent
    #[serde(default)]
    pub late_payer_annual_rate: Option<f64>,
}

impl LoanTerms {
    /// Full-term loan duration in days
    pub fn loan_duration_days(&self) -> f64 {
        self.installments as f64 * self.installment_frequency_days as f64
    }

    /// Equal installment amount under straight-line amortization
    pub fn installment_amount(&self) -> f64 {
        self.principal / self.installments as f64
    }

    /// Whether the upfront-collection flag survives normalization.
    /// A one-installment loan has no separate "first" installment, so
    /// the flag is treated as disabled there.
    pub fn upfront_effective(&self) -> bool {
        self.first_installment_upfront && self.installments > 1
    }

    /// Capital actually paid out net of any upfront collection
    pub fn capital_to_deploy(&self) -> f64 {
        if self.upfront_effective() {
            self.principal - self.installment_amount()
        } else {
            self.principal
        }
    }

    /// Rate charged to the late cohort
    pub fn late_payer_rate(&self) -> f64 {
        self.late_payer_annual_rate.unwrap_or(self.annual_rate)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.principal > 0.0) {
            return Err(PricingError::InvalidLoanTerms(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.installments == 0 {
            return Err(PricingError::InvalidLoanTerms(
                "installments must be at least 1".to_string(),
            ));
        }
        if self.installment_frequency_days == 0 {
            return Err(PricingError::InvalidLoanTerms(
                "installment frequency must be at least 1 day".to_string(),
            ));
        }
        if self.annual_rate < 0.0 || !self.annual_rate.is_finite() {
            return Err(PricingError::InvalidLoanTerms(format!(
                "annual rate must be a non-negative number, got {}",
                self.annual_rate
            )));
        }
        if let Some(rate) = self.late_payer_annual_rate {
            if rate < 0.0 || !rate.is_finite() {
                return Err(PricingError::InvalidLoanTerms(format!(
                    "late-payer rate must be a non-negative number, got {rate}"
                )));
            }
        }
        if self.fixed_fee_pct < 0.0 || self.merchant_commission_pct < 0.0 {
            return Err(PricingError::InvalidLoanTerms(
                "fee and commission percentages must be non-negative".to_string(),
            ));
        }
        if self.late_fee_amount < 0.0 {
            return Err(PricingError::InvalidLoanTerms(format!(
                "late fee amount must be non-negative, got {}",
                self.late_fee_amount
            )));
        }
        check_fraction("late_installment_pct", self.late_installment_pct)?;
        Ok(())
    }
}

/// Behavioral composition of the loan portfolio
///
/// The four explicit fractions describe the early, late, default and
/// fraud cohorts; whatever is left is the implicit on-time cohort.
/// Their sum exceeding 1 is a hard input error, never clamped.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RiskAndBehaviorMix {
    /// Fraction of loans repaid before the final installment
    pub early_repayment_rate: f64,

    /// Fraction of loans repaid late on every installment
    pub late_repayment_rate: f64,

    /// Fraction of loans that are fraudulent from inception
    pub fraud_rate: f64,

    /// Fraction of legitimate defaults
    pub default_rate: f64,

    /// Installment index at which early repayers settle. The early
    /// cohort only takes effect when this is strictly below the total
    /// installment count.
    #[serde(default)]
    pub early_settlement_installment: Option<u32>,

    /// Average days late per installment for the late cohort
    #[serde(default)]
    pub avg_days_late_per_installment: f64,
}

/// Slack allowed on the mix-sum check so fractions that add to 1.0 up
/// to floating-point noise are not rejected
const MIX_SUM_TOLERANCE: f64 = 1e-9;

impl RiskAndBehaviorMix {
    /// Sum of the four explicit cohort fractions
    pub fn explicit_total(&self) -> f64 {
        self.early_repayment_rate + self.late_repayment_rate + self.fraud_rate + self.default_rate
    }

    /// Whether any behavioral segmentation is configured at all
    pub fn has_segmentation(&self) -> bool {
        self.explicit_total() > 0.0
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        check_fraction("early_repayment_rate", self.early_repayment_rate)?;
        check_fraction("late_repayment_rate", self.late_repayment_rate)?;
        check_fraction("fraud_rate", self.fraud_rate)?;
        check_fraction("default_rate", self.default_rate)?;
        if self.avg_days_late_per_installment < 0.0
            || !self.avg_days_late_per_installment.is_finite()
        {
            return Err(PricingError::InvalidLoanTerms(format!(
                "avg days late per installment must be non-negative, got {}",
                self.avg_days_late_per_installment
            )));
        }

        let total = self.explicit_total();
        if total > 1.0 + MIX_SUM_TOLERANCE {
            return Err(PricingError::InvalidPortfolioMix {
                early: self.early_repayment_rate,
                late: self.late_repayment_rate,
                default: self.default_rate,
                fraud: self.fraud_rate,
                total,
            });
        }
        Ok(())
    }
}

/// Recovery fractions applied to capital at risk after non-payment
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecoveryModel {
    /// Fraction of capital recovered from legitimate defaults
    pub default_recovery_rate: f64,

    /// Fraction of capital recovered from fraud (typically lower)
    pub fraud_recovery_rate: f64,
}

impl RecoveryModel {
    pub fn validate(&self) -> Result<(), PricingError> {
        check_fraction("default_recovery_rate", self.default_recovery_rate)?;
        check_fraction("fraud_recovery_rate", self.fraud_recovery_rate)?;
        Ok(())
    }
}

/// Cost of capital over each cohort's deployment period
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FundingModel {
    /// Annualized funding cost rate
    pub annual_cost_rate: f64,
}

impl FundingModel {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.annual_cost_rate < 0.0 || !self.annual_cost_rate.is_finite() {
            return Err(PricingError::InvalidLoanTerms(format!(
                "funding cost rate must be non-negative, got {}",
                self.annual_cost_rate
            )));
        }
        Ok(())
    }
}

/// Complete parameter record for one evaluation; the unit of cloning
/// for sensitivity sweeps and of loading for the CSV loan book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInputs {
    pub terms: LoanTerms,
    pub mix: RiskAndBehaviorMix,
    pub recovery: RecoveryModel,
    pub funding: FundingModel,
}

impl PricingInputs {
    pub fn new(
        terms: LoanTerms,
        mix: RiskAndBehaviorMix,
        recovery: RecoveryModel,
        funding: FundingModel,
    ) -> Self {
        Self {
            terms,
            mix,
            recovery,
            funding,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        self.terms.validate()?;
        self.mix.validate()?;
        self.recovery.validate()?;
        self.funding.validate()
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !(0.0..=1.0).contains(&value) || !value.is_finite() {
        return Err(PricingError::RateOutOfRange { field, value });
    }
    Ok(())
}

/// Convert a day count to years on the engine's 365-day basis
pub fn years(days: f64) -> f64 {
    days / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_terms() -> LoanTerms {
        LoanTerms {
            principal: 100.0,
            annual_rate: 0.30,
            installments: 6,
            installment_frequency_days: 14,
            fixed_fee_pct: 0.02,
            merchant_commission_pct: 0.03,
            settlement_delay_days: 1,
            late_fee_amount: 3.0,
            late_installment_pct: 0.20,
            first_installment_upfront: false,
            late_payer_annual_rate: None,
        }
    }

    #[test]
    fn test_loan_duration_and_installment_amount() {
        let terms = test_terms();
        assert_eq!(terms.loan_duration_days(), 84.0);
        assert!((terms.installment_amount() - 100.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_upfront_disabled_for_single_installment() {
        let mut terms = test_terms();
        terms.first_installment_upfront = true;
        terms.installments = 1;
        assert!(!terms.upfront_effective());
        assert_eq!(terms.capital_to_deploy(), terms.principal);

        terms.installments = 6;
        assert!(terms.upfront_effective());
        assert!((terms.capital_to_deploy() - (100.0 - 100.0 / 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_terms_validation() {
        let mut terms = test_terms();
        terms.principal = 0.0;
        assert!(matches!(
            terms.validate(),
            Err(PricingError::InvalidLoanTerms(_))
        ));

        let mut terms = test_terms();
        terms.installment_frequency_days = 0;
        assert!(terms.validate().is_err());

        let mut terms = test_terms();
        terms.late_installment_pct = 1.5;
        assert!(matches!(
            terms.validate(),
            Err(PricingError::RateOutOfRange { .. })
        ));

        assert!(test_terms().validate().is_ok());
    }

    #[test]
    fn test_mix_sum_exceeding_one_is_rejected() {
        let mix = RiskAndBehaviorMix {
            early_repayment_rate: 0.5,
            late_repayment_rate: 0.6,
            ..Default::default()
        };
        match mix.validate() {
            Err(PricingError::InvalidPortfolioMix { total, .. }) => {
                assert!((total - 1.1).abs() < 1e-12);
            }
            other => panic!("expected InvalidPortfolioMix, got {other:?}"),
        }
    }

    #[test]
    fn test_mix_sum_of_exactly_one_is_accepted() {
        let mix = RiskAndBehaviorMix {
            early_repayment_rate: 0.1,
            late_repayment_rate: 0.2,
            fraud_rate: 0.3,
            default_rate: 0.4,
            early_settlement_installment: Some(3),
            avg_days_late_per_installment: 5.0,
        };
        // 0.1 + 0.2 + 0.3 + 0.4 lands one ulp above 1.0; the tolerance
        // must absorb that
        assert!(mix.validate().is_ok());
    }

    #[test]
    fn test_recovery_fraction_bounds() {
        let recovery = RecoveryModel {
            default_recovery_rate: 1.2,
            fraud_recovery_rate: 0.0,
        };
        assert!(matches!(
            recovery.validate(),
            Err(PricingError::RateOutOfRange {
                field: "default_recovery_rate",
                ..
            })
        ));
    }
}
