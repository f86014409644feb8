//! Yield Calculator: blends the five behavioral cohorts into a single
//! aggregate result and derives the scalar effective yield

use super::result::{YieldResult, SENTINEL_YIELD};
use super::segment::{Cohort, SegmentContext, ALL_COHORTS};
use crate::loan::{years, PricingError, PricingInputs};

/// Resolved population weights in blend order
/// (early, late, on-time, default, fraud)
#[derive(Debug, Clone, Copy)]
struct CohortWeights {
    early: f64,
    late: f64,
    ontime: f64,
    default: f64,
    fraud: f64,
}

impl CohortWeights {
    /// Resolve the explicit fractions plus the derived on-time share.
    /// An inactive early cohort (no valid settlement index) folds into
    /// on-time behavior.
    fn resolve(inputs: &PricingInputs, ctx: &SegmentContext) -> Self {
        let mix = &inputs.mix;
        let early = if mix.early_repayment_rate > 0.0 && ctx.early_cohort_active() {
            mix.early_repayment_rate
        } else {
            0.0
        };
        let late = mix.late_repayment_rate;
        let default = mix.default_rate;
        let fraud = mix.fraud_rate;
        let ontime = (1.0 - early - late - default - fraud).max(0.0);

        Self {
            early,
            late,
            ontime,
            default,
            fraud,
        }
    }

    fn get(&self, cohort: Cohort) -> f64 {
        match cohort {
            Cohort::Early => self.early,
            Cohort::Late => self.late,
            Cohort::OnTime => self.ontime,
            Cohort::Default => self.default,
            Cohort::Fraud => self.fraud,
        }
    }
}

/// Evaluate the effective annualized yield for one parameter record.
///
/// Fails fast on an invalid portfolio mix or out-of-range inputs; every
/// other edge configuration produces a complete result with explicit
/// flags (see `YieldResult`).
pub fn evaluate(inputs: &PricingInputs) -> Result<YieldResult, PricingError> {
    inputs.validate()?;

    let terms = &inputs.terms;
    let ctx = SegmentContext::new(inputs);
    let weights = CohortWeights::resolve(inputs, &ctx);

    let mut interest_income = 0.0;
    let mut late_interest_income = 0.0;
    let mut fixed_fee_income = 0.0;
    let mut merchant_commission = 0.0;
    let mut late_fee_income = 0.0;
    let mut default_loss = 0.0;
    let mut fraud_loss = 0.0;
    let mut funding_cost = 0.0;
    let mut capital_deployment_days = 0.0;

    for cohort in ALL_COHORTS {
        let weight = weights.get(cohort);
        if weight == 0.0 {
            continue;
        }
        let seg = ctx.economics(cohort);

        interest_income += weight * seg.base_interest;
        late_interest_income += weight * seg.extra_interest;
        fixed_fee_income += weight * seg.fixed_fee_income;
        merchant_commission += weight * seg.merchant_commission;
        late_fee_income += weight * seg.late_fee_income;
        funding_cost += weight * seg.funding_cost;
        capital_deployment_days += weight * seg.deployment_days;

        match cohort {
            Cohort::Default => default_loss += weight * seg.loss,
            Cohort::Fraud => fraud_loss += weight * seg.loss,
            _ => {}
        }
    }

    let total_revenue = interest_income
        + late_interest_income
        + fixed_fee_income
        + merchant_commission
        + late_fee_income;
    let expected_loss = default_loss + fraud_loss;
    let net_profit = total_revenue - funding_cost - expected_loss;

    let principal = terms.principal;
    let profit_margin = net_profit / principal;

    let deployment_years = years(capital_deployment_days);
    let effective_yield = if deployment_years > 0.0 {
        profit_margin / deployment_years
    } else if net_profit > 0.0 {
        SENTINEL_YIELD
    } else {
        -SENTINEL_YIELD
    };

    let loan_duration_days = terms.loan_duration_days();
    let full_term_years = years(loan_duration_days);

    // Isolate the yield contribution of paying the merchant late: the
    // counterfactual deploys capital for the full loan duration
    let yield_without_delay = profit_margin / full_term_years;
    let settlement_delay_benefit = effective_yield - yield_without_delay;

    // Annualized cost to the on-time borrower: full-term interest plus
    // the fixed fee, spread over the loan duration
    let ontime = ctx.economics(Cohort::OnTime);
    let borrower_apr =
        (ontime.base_interest + ontime.fixed_fee_income) / principal / full_term_years;

    let has_early_repayment = weights.early > 0.0;
    let has_late_repayment = weights.late > 0.0;
    let has_portfolio_segmentation =
        weights.early + weights.late + weights.default + weights.fraud > 0.0;

    Ok(YieldResult {
        interest_income,
        late_interest_income,
        fixed_fee_income,
        merchant_commission,
        late_fee_income,
        total_revenue,
        default_loss,
        fraud_loss,
        expected_loss,
        funding_cost,
        net_profit,
        profit_margin,
        effective_yield,
        borrower_apr,
        loan_duration_days,
        capital_deployment_days,
        settlement_delay_days: terms.settlement_delay_days,
        settlement_delay_benefit,
        is_float_scenario: ctx.baseline_float(),
        installment_amount: terms.installment_amount(),
        capital_to_deploy: terms.capital_to_deploy(),
        first_installment_upfront: terms.upfront_effective(),
        early_pct: weights.early,
        late_pct: weights.late,
        ontime_pct: weights.ontime,
        default_pct: weights.default,
        fraud_pct: weights.fraud,
        avg_repayment_installment: if has_early_repayment {
            inputs.mix.early_settlement_installment
        } else {
            None
        },
        avg_days_late_per_installment: inputs.mix.avg_days_late_per_installment,
        has_early_repayment,
        has_late_repayment,
        has_portfolio_segmentation,
    })
}
