//! Output record produced by a single yield evaluation

use serde::{Deserialize, Serialize};

/// Yield value reported when the blended capital deployment period is
/// zero or negative, where annualization is undefined. Positive net
/// profit reports `+SENTINEL_YIELD`, otherwise `-SENTINEL_YIELD`. This
/// is a sentinel, not a measurement; callers distinguish it via
/// `is_float_scenario` and magnitude.
pub const SENTINEL_YIELD: f64 = 1000.0;

/// Complete result of one effective-yield evaluation
///
/// Constructed fresh on every call and never mutated afterwards; the
/// caller treats it as a read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldResult {
    // Revenue components (population-weighted)
    /// Interest at the nominal rate over each cohort's standard duration
    pub interest_income: f64,
    /// Late cohort's incremental interest from its extended duration
    pub late_interest_income: f64,
    pub fixed_fee_income: f64,
    pub merchant_commission: f64,
    pub late_fee_income: f64,
    pub total_revenue: f64,

    // Cost components (population-weighted)
    pub default_loss: f64,
    pub fraud_loss: f64,
    /// default_loss + fraud_loss
    pub expected_loss: f64,
    pub funding_cost: f64,

    // Profitability
    pub net_profit: f64,
    /// Net profit as a fraction of principal, before annualizing
    pub profit_margin: f64,
    /// Annualized return on deployed capital; `±SENTINEL_YIELD` when
    /// the blended deployment period is not positive
    pub effective_yield: f64,
    /// Annualized cost to the borrower (interest + fixed fee); a model
    /// approximation, not a regulatory figure
    pub borrower_apr: f64,

    // Timing
    /// Full-term duration: installments x frequency
    pub loan_duration_days: f64,
    /// Population-weighted capital deployment period
    pub capital_deployment_days: f64,
    pub settlement_delay_days: u32,
    /// Yield uplift attributable purely to paying the merchant late
    pub settlement_delay_benefit: f64,
    /// Merchant paid at or after the final scheduled customer payment
    pub is_float_scenario: bool,

    // Loan mechanics
    pub installment_amount: f64,
    /// Principal net of any upfront first installment
    pub capital_to_deploy: f64,
    /// Upfront flag after normalization (disabled on one-installment loans)
    pub first_installment_upfront: bool,

    // Resolved portfolio mix; the five fractions sum to 1
    pub early_pct: f64,
    pub late_pct: f64,
    pub ontime_pct: f64,
    pub default_pct: f64,
    pub fraud_pct: f64,
    /// Echo of the early-settlement index when the early cohort is active
    pub avg_repayment_installment: Option<u32>,
    pub avg_days_late_per_installment: f64,

    // Behavior flags
    pub has_early_repayment: bool,
    pub has_late_repayment: bool,
    pub has_portfolio_segmentation: bool,
}

impl YieldResult {
    /// Whether the effective yield is the division-guard sentinel
    /// rather than a measured value
    pub fn is_sentinel_yield(&self) -> bool {
        self.effective_yield.abs() >= SENTINEL_YIELD
    }

    /// Total interest across base and late increments
    pub fn total_interest_income(&self) -> f64 {
        self.interest_income + self.late_interest_income
    }

    /// Resolved cohort weights in blend order
    /// (early, late, on-time, default, fraud)
    pub fn cohort_weights(&self) -> [f64; 5] {
        [
            self.early_pct,
            self.late_pct,
            self.ontime_pct,
            self.default_pct,
            self.fraud_pct,
        ]
    }
}
