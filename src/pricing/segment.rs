//! Per-cohort economics for the five-way behavioral portfolio blend
//!
//! Each loan belongs to exactly one behavioral cohort. A cohort's
//! economics are computed in isolation from the shared loan terms and
//! the cohort's own duration; the engine blends them by population
//! weight afterwards.

use crate::loan::{years, PricingInputs};
use serde::{Deserialize, Serialize};

/// Behavioral cohort of the portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cohort {
    /// Settles the full balance at an earlier installment
    Early,
    /// Pays every installment, each one late
    Late,
    /// Pays as scheduled
    OnTime,
    /// Legitimate non-payment, partially recoverable
    Default,
    /// Deliberate non-payment from inception
    Fraud,
}

/// Evaluation order for the blend; weights follow the same order
pub const ALL_COHORTS: [Cohort; 5] = [
    Cohort::Early,
    Cohort::Late,
    Cohort::OnTime,
    Cohort::Default,
    Cohort::Fraud,
];

/// Deployment proxy used when the merchant is paid at or after final
/// collection: 25% of loan duration instead of a zero or negative
/// deployment period
pub const FLOAT_DEPLOYMENT_FRACTION: f64 = 0.25;

/// One cohort's isolated economics, before population weighting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentEconomics {
    pub cohort: Cohort,

    /// Days from purchase to this cohort's final payment
    pub duration_days: f64,

    /// Days the lender's capital is actually deployed
    pub deployment_days: f64,

    /// Whether the deployment floor kicked in for this cohort
    pub floated: bool,

    /// Interest earned at the nominal rate over the cohort's standard
    /// duration (full term for everyone except early repayers)
    pub base_interest: f64,

    /// Late cohort only: incremental interest from the extended
    /// duration at the penalty rate
    pub extra_interest: f64,

    pub fixed_fee_income: f64,
    pub merchant_commission: f64,
    pub late_fee_income: f64,

    /// Principal written off net of recovery
    pub loss: f64,

    /// Cost of capital over the deployment period
    pub funding_cost: f64,
}

impl SegmentEconomics {
    pub fn total_revenue(&self) -> f64 {
        self.base_interest
            + self.extra_interest
            + self.fixed_fee_income
            + self.merchant_commission
            + self.late_fee_income
    }
}

/// Shared quantities precomputed once per evaluation
#[derive(Debug, Clone)]
pub struct SegmentContext {
    principal: f64,
    nominal_rate: f64,
    late_payer_rate: f64,
    installments: u32,
    full_term_days: f64,
    settlement_delay_days: f64,
    late_fee_amount: f64,
    late_incidence_pct: f64,
    fixed_fee_income: f64,
    merchant_commission: f64,
    /// Principal net of any upfront first installment
    capital_at_risk: f64,
    funding_rate: f64,
    default_recovery_rate: f64,
    fraud_recovery_rate: f64,
    /// Validated early-settlement index: strictly inside the term
    early_installment: Option<u32>,
    avg_days_late_per_installment: f64,
}

impl SegmentContext {
    /// Precompute shared quantities. Inputs are assumed validated;
    /// degenerate timing configurations are normalized here (upfront
    /// on a one-installment loan, early index outside the term).
    pub fn new(inputs: &PricingInputs) -> Self {
        let terms = &inputs.terms;
        let early_installment = inputs
            .mix
            .early_settlement_installment
            .filter(|&k| k >= 1 && k < terms.installments);

        Self {
            principal: terms.principal,
            nominal_rate: terms.annual_rate,
            late_payer_rate: terms.late_payer_rate(),
            installments: terms.installments,
            full_term_days: terms.loan_duration_days(),
            settlement_delay_days: terms.settlement_delay_days as f64,
            late_fee_amount: terms.late_fee_amount,
            late_incidence_pct: terms.late_installment_pct,
            fixed_fee_income: terms.principal * terms.fixed_fee_pct,
            merchant_commission: terms.principal * terms.merchant_commission_pct,
            capital_at_risk: terms.capital_to_deploy(),
            funding_rate: inputs.funding.annual_cost_rate,
            default_recovery_rate: inputs.recovery.default_recovery_rate,
            fraud_recovery_rate: inputs.recovery.fraud_recovery_rate,
            early_installment,
            avg_days_late_per_installment: inputs.mix.avg_days_late_per_installment,
        }
    }

    /// Whether the early cohort is active (index present and strictly
    /// below the installment count)
    pub fn early_cohort_active(&self) -> bool {
        self.early_installment.is_some()
    }

    pub fn capital_at_risk(&self) -> f64 {
        self.capital_at_risk
    }

    /// Whether the baseline full-term loan is a float scenario
    /// (merchant paid at or after the final customer payment)
    pub fn baseline_float(&self) -> bool {
        self.settlement_delay_days >= self.full_term_days
    }

    /// This cohort's loan duration in days
    pub fn duration_days(&self, cohort: Cohort) -> f64 {
        match cohort {
            // An invalid early index degenerates to on-time behavior
            Cohort::Early => match self.early_installment {
                Some(k) => k as f64 * self.full_term_days / self.installments as f64,
                None => self.full_term_days,
            },
            Cohort::Late => {
                self.full_term_days
                    + self.installments as f64 * self.avg_days_late_per_installment
            }
            Cohort::OnTime | Cohort::Default | Cohort::Fraud => self.full_term_days,
        }
    }

    /// Capital deployment for a given duration, with the float floor
    pub fn deployment_days(&self, duration_days: f64) -> (f64, bool) {
        if self.settlement_delay_days >= duration_days {
            (duration_days * FLOAT_DEPLOYMENT_FRACTION, true)
        } else {
            (duration_days - self.settlement_delay_days, false)
        }
    }

    /// Compute one cohort's economics in isolation
    pub fn economics(&self, cohort: Cohort) -> SegmentEconomics {
        let duration_days = self.duration_days(cohort);
        let (deployment_days, floated) = self.deployment_days(duration_days);

        // Declining-balance approximation: average outstanding balance
        // over the life of the loan is half the principal
        let interest_at = |rate: f64, days: f64| self.principal * rate * years(days) * 0.5;

        let (base_interest, extra_interest) = match cohort {
            Cohort::Early => (interest_at(self.nominal_rate, duration_days), 0.0),
            Cohort::Late => {
                let base = interest_at(self.nominal_rate, self.full_term_days);
                let total = interest_at(self.late_payer_rate, duration_days);
                (base, total - base)
            }
            _ => (interest_at(self.nominal_rate, self.full_term_days), 0.0),
        };

        let late_fee_income = match cohort {
            // Late by construction: every installment incurs the fee
            Cohort::Late => self.installments as f64 * self.late_fee_amount,
            Cohort::OnTime | Cohort::Default => {
                self.installments as f64 * self.late_incidence_pct * self.late_fee_amount
            }
            // Nothing collectible from fraud; early repayers never run late
            Cohort::Early | Cohort::Fraud => 0.0,
        };

        let loss = match cohort {
            Cohort::Default => self.capital_at_risk * (1.0 - self.default_recovery_rate),
            Cohort::Fraud => self.capital_at_risk * (1.0 - self.fraud_recovery_rate),
            _ => 0.0,
        };

        let funding_cost = self.capital_at_risk * self.funding_rate * years(deployment_days);

        SegmentEconomics {
            cohort,
            duration_days,
            deployment_days,
            floated,
            base_interest,
            extra_interest,
            fixed_fee_income: self.fixed_fee_income,
            merchant_commission: self.merchant_commission,
            late_fee_income,
            loss,
            funding_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{
        FundingModel, LoanTerms, PricingInputs, RecoveryModel, RiskAndBehaviorMix,
    };
    use approx::assert_relative_eq;

    fn test_inputs() -> PricingInputs {
        PricingInputs::new(
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
            },
            RiskAndBehaviorMix {
                early_repayment_rate: 0.10,
                late_repayment_rate: 0.20,
                fraud_rate: 0.10,
                default_rate: 0.10,
                early_settlement_installment: Some(3),
                avg_days_late_per_installment: 5.0,
            },
            RecoveryModel {
                default_recovery_rate: 0.30,
                fraud_recovery_rate: 0.05,
            },
            FundingModel {
                annual_cost_rate: 0.08,
            },
        )
    }

    #[test]
    fn test_cohort_durations() {
        let ctx = SegmentContext::new(&test_inputs());
        assert_eq!(ctx.duration_days(Cohort::OnTime), 84.0);
        assert_eq!(ctx.duration_days(Cohort::Default), 84.0);
        assert_eq!(ctx.duration_days(Cohort::Fraud), 84.0);
        // 3 installments at 14 days
        assert_eq!(ctx.duration_days(Cohort::Early), 42.0);
        // 84 + 6 * 5 days of accumulated lateness
        assert_eq!(ctx.duration_days(Cohort::Late), 114.0);
    }

    #[test]
    fn test_early_index_at_term_degenerates_to_full_duration() {
        let mut inputs = test_inputs();
        inputs.mix.early_settlement_installment = Some(6);
        let ctx = SegmentContext::new(&inputs);
        assert!(!ctx.early_cohort_active());
        assert_eq!(ctx.duration_days(Cohort::Early), 84.0);
    }

    #[test]
    fn test_deployment_floor_in_float_scenario() {
        let mut inputs = test_inputs();
        inputs.terms.installments = 2;
        inputs.terms.settlement_delay_days = 30;
        inputs.mix.early_settlement_installment = None;
        let ctx = SegmentContext::new(&inputs);

        // 2 x 14 = 28 days, fully inside the settlement delay
        let (deployment, floated) = ctx.deployment_days(28.0);
        assert!(floated);
        assert_relative_eq!(deployment, 7.0);
        assert!(ctx.baseline_float());
    }

    #[test]
    fn test_normal_deployment_subtracts_settlement_delay() {
        let ctx = SegmentContext::new(&test_inputs());
        let (deployment, floated) = ctx.deployment_days(84.0);
        assert!(!floated);
        assert_relative_eq!(deployment, 83.0);
        assert!(!ctx.baseline_float());
    }

    #[test]
    fn test_late_fee_income_by_cohort() {
        let ctx = SegmentContext::new(&test_inputs());
        assert_eq!(ctx.economics(Cohort::Early).late_fee_income, 0.0);
        assert_eq!(ctx.economics(Cohort::Fraud).late_fee_income, 0.0);
        // Guaranteed on every installment for the late cohort
        assert_relative_eq!(ctx.economics(Cohort::Late).late_fee_income, 18.0);
        // Probabilistic for on-time and default: 6 * 0.20 * 3.0
        assert_relative_eq!(ctx.economics(Cohort::OnTime).late_fee_income, 3.6);
        assert_relative_eq!(ctx.economics(Cohort::Default).late_fee_income, 3.6);
    }

    #[test]
    fn test_loss_only_on_default_and_fraud() {
        let ctx = SegmentContext::new(&test_inputs());
        assert_eq!(ctx.economics(Cohort::Early).loss, 0.0);
        assert_eq!(ctx.economics(Cohort::Late).loss, 0.0);
        assert_eq!(ctx.economics(Cohort::OnTime).loss, 0.0);
        assert_relative_eq!(ctx.economics(Cohort::Default).loss, 70.0);
        assert_relative_eq!(ctx.economics(Cohort::Fraud).loss, 95.0);
    }

    #[test]
    fn test_upfront_collection_shrinks_capital_at_risk() {
        let mut inputs = test_inputs();
        inputs.terms.first_installment_upfront = true;
        let ctx = SegmentContext::new(&inputs);
        let at_risk = 100.0 - 100.0 / 6.0;
        assert_relative_eq!(ctx.capital_at_risk(), at_risk);
        assert_relative_eq!(ctx.economics(Cohort::Fraud).loss, at_risk * 0.95);
        assert_relative_eq!(ctx.economics(Cohort::Default).loss, at_risk * 0.70);
    }

    #[test]
    fn test_late_cohort_interest_decomposition() {
        let ctx = SegmentContext::new(&test_inputs());
        let late = ctx.economics(Cohort::Late);
        let base = 100.0 * 0.30 * (84.0 / 365.0) * 0.5;
        let total = 100.0 * 0.30 * (114.0 / 365.0) * 0.5;
        assert_relative_eq!(late.base_interest, base, max_relative = 1e-12);
        assert_relative_eq!(late.extra_interest, total - base, max_relative = 1e-12);

        // A distinct penalty rate only changes the increment's rate basis
        let mut inputs = test_inputs();
        inputs.terms.late_payer_annual_rate = Some(0.45);
        let ctx = SegmentContext::new(&inputs);
        let late = ctx.economics(Cohort::Late);
        let total_penalty = 100.0 * 0.45 * (114.0 / 365.0) * 0.5;
        assert_relative_eq!(late.base_interest, base, max_relative = 1e-12);
        assert_relative_eq!(
            late.extra_interest,
            total_penalty - base,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_funding_cost_uses_deployment_period() {
        let ctx = SegmentContext::new(&test_inputs());
        let ontime = ctx.economics(Cohort::OnTime);
        assert_relative_eq!(
            ontime.funding_cost,
            100.0 * 0.08 * (83.0 / 365.0),
            max_relative = 1e-12
        );
        // Early repayers return capital sooner, so their funding cost
        // must be strictly lower
        let early = ctx.economics(Cohort::Early);
        assert!(early.funding_cost < ontime.funding_cost);
    }
}
