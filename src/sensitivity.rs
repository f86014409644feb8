//! Sensitivity sweeps over single parameters and interest-model
//! comparison
//!
//! Pure re-evaluation utilities: every point is an independent full
//! evaluation of a cloned parameter record. No state, no memoization.

use crate::loan::{PricingError, PricingInputs};
use crate::pricing::{evaluate, solve_required_rate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parameter varied by a sensitivity sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    Principal,
    AnnualRate,
    Installments,
    InstallmentFrequencyDays,
    FixedFeePct,
    MerchantCommissionPct,
    SettlementDelayDays,
    LateFeeAmount,
    LateInstallmentPct,
    EarlyRepaymentRate,
    LateRepaymentRate,
    FraudRate,
    DefaultRate,
    AvgDaysLatePerInstallment,
    DefaultRecoveryRate,
    FraudRecoveryRate,
    FundingCostRate,
}

impl SweepParameter {
    /// Apply one sweep value onto a cloned parameter record. Integer
    /// day/count parameters round to the nearest valid value.
    pub fn apply(self, inputs: &mut PricingInputs, value: f64) {
        match self {
            SweepParameter::Principal => inputs.terms.principal = value,
            SweepParameter::AnnualRate => inputs.terms.annual_rate = value,
            SweepParameter::Installments => {
                inputs.terms.installments = value.round().max(1.0) as u32
            }
            SweepParameter::InstallmentFrequencyDays => {
                inputs.terms.installment_frequency_days = value.round().max(1.0) as u32
            }
            SweepParameter::FixedFeePct => inputs.terms.fixed_fee_pct = value,
            SweepParameter::MerchantCommissionPct => {
                inputs.terms.merchant_commission_pct = value
            }
            SweepParameter::SettlementDelayDays => {
                inputs.terms.settlement_delay_days = value.round().max(0.0) as u32
            }
            SweepParameter::LateFeeAmount => inputs.terms.late_fee_amount = value,
            SweepParameter::LateInstallmentPct => inputs.terms.late_installment_pct = value,
            SweepParameter::EarlyRepaymentRate => inputs.mix.early_repayment_rate = value,
            SweepParameter::LateRepaymentRate => inputs.mix.late_repayment_rate = value,
            SweepParameter::FraudRate => inputs.mix.fraud_rate = value,
            SweepParameter::DefaultRate => inputs.mix.default_rate = value,
            SweepParameter::AvgDaysLatePerInstallment => {
                inputs.mix.avg_days_late_per_installment = value
            }
            SweepParameter::DefaultRecoveryRate => {
                inputs.recovery.default_recovery_rate = value
            }
            SweepParameter::FraudRecoveryRate => inputs.recovery.fraud_recovery_rate = value,
            SweepParameter::FundingCostRate => inputs.funding.annual_cost_rate = value,
        }
    }

    /// Snake-case name used in CSV headers and env configuration
    pub fn name(self) -> &'static str {
        match self {
            SweepParameter::Principal => "principal",
            SweepParameter::AnnualRate => "annual_rate",
            SweepParameter::Installments => "installments",
            SweepParameter::InstallmentFrequencyDays => "installment_frequency_days",
            SweepParameter::FixedFeePct => "fixed_fee_pct",
            SweepParameter::MerchantCommissionPct => "merchant_commission_pct",
            SweepParameter::SettlementDelayDays => "settlement_delay_days",
            SweepParameter::LateFeeAmount => "late_fee_amount",
            SweepParameter::LateInstallmentPct => "late_installment_pct",
            SweepParameter::EarlyRepaymentRate => "early_repayment_rate",
            SweepParameter::LateRepaymentRate => "late_repayment_rate",
            SweepParameter::FraudRate => "fraud_rate",
            SweepParameter::DefaultRate => "default_rate",
            SweepParameter::AvgDaysLatePerInstallment => "avg_days_late_per_installment",
            SweepParameter::DefaultRecoveryRate => "default_recovery_rate",
            SweepParameter::FraudRecoveryRate => "fraud_recovery_rate",
            SweepParameter::FundingCostRate => "funding_cost_rate",
        }
    }

    /// All sweepable parameters, for help texts
    pub const ALL: [SweepParameter; 17] = [
        SweepParameter::Principal,
        SweepParameter::AnnualRate,
        SweepParameter::Installments,
        SweepParameter::InstallmentFrequencyDays,
        SweepParameter::FixedFeePct,
        SweepParameter::MerchantCommissionPct,
        SweepParameter::SettlementDelayDays,
        SweepParameter::LateFeeAmount,
        SweepParameter::LateInstallmentPct,
        SweepParameter::EarlyRepaymentRate,
        SweepParameter::LateRepaymentRate,
        SweepParameter::FraudRate,
        SweepParameter::DefaultRate,
        SweepParameter::AvgDaysLatePerInstallment,
        SweepParameter::DefaultRecoveryRate,
        SweepParameter::FraudRecoveryRate,
        SweepParameter::FundingCostRate,
    ];
}

impl FromStr for SweepParameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SweepParameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown sweep parameter: {s}"))
    }
}

/// Scalar extracted at each sweep point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMetric {
    /// Effective annualized yield at the configured rate
    EffectiveYield,
    /// Nominal rate required to hit the given target yield
    RequiredRate { target_yield: f64 },
}

/// Parallel (input value, metric value) arrays for charting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSeries {
    pub parameter: SweepParameter,
    pub metric: SweepMetric,
    pub values: Vec<f64>,
    pub outputs: Vec<f64>,
}

/// Re-evaluate the model across a range of values for one parameter
pub fn sweep(
    parameter: SweepParameter,
    values: &[f64],
    base: &PricingInputs,
    metric: SweepMetric,
) -> Result<SweepSeries, PricingError> {
    let mut outputs = Vec::with_capacity(values.len());

    for &value in values {
        let mut point = base.clone();
        parameter.apply(&mut point, value);

        let output = match metric {
            SweepMetric::EffectiveYield => evaluate(&point)?.effective_yield,
            SweepMetric::RequiredRate { target_yield } => {
                solve_required_rate(target_yield, &point)?
            }
        };
        outputs.push(output);
    }

    Ok(SweepSeries {
        parameter,
        metric,
        values: values.to_vec(),
        outputs,
    })
}

/// Economics summary of one interest model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEconomics {
    pub annual_rate: f64,
    pub effective_yield: f64,
    pub total_revenue: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
}

/// Side-by-side economics of the configured interest-bearing plan and
/// its fully interest-free counterpart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestModelComparison {
    pub interest_bearing: ModelEconomics,
    pub interest_free: ModelEconomics,
}

/// Evaluate the base inputs as configured and again with all interest
/// (nominal and late-payer penalty) switched off
pub fn compare_interest_models(
    base: &PricingInputs,
) -> Result<InterestModelComparison, PricingError> {
    let bearing = evaluate(base)?;

    let mut free_inputs = base.clone();
    free_inputs.terms.annual_rate = 0.0;
    free_inputs.terms.late_payer_annual_rate = None;
    let free = evaluate(&free_inputs)?;

    let summarize = |rate: f64, result: &crate::pricing::YieldResult| ModelEconomics {
        annual_rate: rate,
        effective_yield: result.effective_yield,
        total_revenue: result.total_revenue,
        net_profit: result.net_profit,
        profit_margin: result.profit_margin,
    };

    Ok(InterestModelComparison {
        interest_bearing: summarize(base.terms.annual_rate, &bearing),
        interest_free: summarize(0.0, &free),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{
        FundingModel, LoanTerms, RecoveryModel, RiskAndBehaviorMix,
    };

    fn base_inputs() -> PricingInputs {
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
                default_rate: 0.05,
                early_settlement_installment: Some(3),
                ..Default::default()
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
    fn test_sweep_produces_parallel_arrays() {
        let values = [0.0, 0.01, 0.02, 0.03, 0.04, 0.05];
        let series = sweep(
            SweepParameter::MerchantCommissionPct,
            &values,
            &base_inputs(),
            SweepMetric::EffectiveYield,
        )
        .unwrap();

        assert_eq!(series.values.len(), series.outputs.len());
        assert_eq!(series.values, values);
        // Commission is pure revenue: yield must rise strictly
        for pair in series.outputs.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_sweep_rounds_integer_parameters() {
        let series = sweep(
            SweepParameter::Installments,
            &[1.0, 2.4, 3.6, 11.9],
            &base_inputs(),
            SweepMetric::EffectiveYield,
        )
        .unwrap();
        assert_eq!(series.outputs.len(), 4);

        // 2.4 rounds down to 2 and 3.6 rounds up to 4: both must match
        // evaluating the rounded count directly
        let mut check = base_inputs();
        check.terms.installments = 2;
        assert_eq!(
            series.outputs[1],
            crate::pricing::evaluate(&check).unwrap().effective_yield
        );
        check.terms.installments = 4;
        assert_eq!(
            series.outputs[2],
            crate::pricing::evaluate(&check).unwrap().effective_yield
        );
    }

    #[test]
    fn test_required_rate_metric_falls_as_commission_rises() {
        let series = sweep(
            SweepParameter::MerchantCommissionPct,
            &[0.0, 0.02, 0.04, 0.06],
            &base_inputs(),
            SweepMetric::RequiredRate { target_yield: 0.60 },
        )
        .unwrap();

        // More commission income means less interest needed
        for pair in series.outputs.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_sweep_surfaces_invalid_points() {
        // Pushing the default rate past the remaining headroom must
        // error, not clamp
        let mut inputs = base_inputs();
        inputs.mix.late_repayment_rate = 0.5;
        let result = sweep(
            SweepParameter::DefaultRate,
            &[0.1, 0.3, 0.6],
            &inputs,
            SweepMetric::EffectiveYield,
        );
        assert!(matches!(
            result,
            Err(PricingError::InvalidPortfolioMix { .. })
        ));
    }

    #[test]
    fn test_parameter_name_round_trip() {
        for parameter in SweepParameter::ALL {
            let parsed: SweepParameter = parameter.name().parse().unwrap();
            assert_eq!(parsed, parameter);
        }
        assert!("not_a_parameter".parse::<SweepParameter>().is_err());
    }

    #[test]
    fn test_interest_model_comparison() {
        let comparison = compare_interest_models(&base_inputs()).unwrap();
        assert_eq!(comparison.interest_bearing.annual_rate, 0.30);
        assert_eq!(comparison.interest_free.annual_rate, 0.0);
        // Interest can only add revenue
        assert!(
            comparison.interest_bearing.effective_yield
                > comparison.interest_free.effective_yield
        );
        assert!(
            comparison.interest_bearing.net_profit > comparison.interest_free.net_profit
        );
    }
}
