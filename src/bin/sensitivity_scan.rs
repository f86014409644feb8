//! Sweep one pricing parameter across a range and report the metric
//! curve
//!
//! Supports JSON output for API integration via --json flag
//! Accepts config via environment variables:
//!   SWEEP_PARAMETER, SWEEP_START, SWEEP_END, SWEEP_STEPS,
//!   SWEEP_METRIC (effective_yield | required_rate), TARGET_YIELD,
//!   PRINCIPAL, ANNUAL_RATE, INSTALLMENTS, FREQUENCY_DAYS,
//!   COMMISSION_PCT, FIXED_FEE_PCT, SETTLEMENT_DELAY_DAYS,
//!   LATE_FEE, LATE_INSTALLMENT_PCT, DEFAULT_RATE, FRAUD_RATE,
//!   EARLY_RATE, EARLY_INSTALLMENT, LATE_RATE, AVG_DAYS_LATE,
//!   DEFAULT_RECOVERY, FRAUD_RECOVERY, FUNDING_COST

use anyhow::{bail, Result};
use bnpl_pricing::sensitivity::{sweep, SweepMetric, SweepParameter};
use bnpl_pricing::{
    FundingModel, LoanTerms, PricingInputs, RecoveryModel, RiskAndBehaviorMix,
};
use serde::Serialize;
use std::env;
use std::str::FromStr;
use std::time::Instant;

#[derive(Serialize)]
struct SweepResponse {
    parameter: &'static str,
    metric: SweepMetric,
    points: Vec<SweepPoint>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct SweepPoint {
    value: f64,
    output: f64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn base_inputs_from_env() -> PricingInputs {
    PricingInputs::new(
        LoanTerms {
            principal: env_or("PRINCIPAL", 100.0),
            annual_rate: env_or("ANNUAL_RATE", 0.30),
            installments: env_or("INSTALLMENTS", 6),
            installment_frequency_days: env_or("FREQUENCY_DAYS", 14),
            fixed_fee_pct: env_or("FIXED_FEE_PCT", 0.02),
            merchant_commission_pct: env_or("COMMISSION_PCT", 0.03),
            settlement_delay_days: env_or("SETTLEMENT_DELAY_DAYS", 1),
            late_fee_amount: env_or("LATE_FEE", 3.0),
            late_installment_pct: env_or("LATE_INSTALLMENT_PCT", 0.20),
            first_installment_upfront: env_or("FIRST_UPFRONT", 0u8) == 1,
            late_payer_annual_rate: env::var("LATE_PAYER_RATE")
                .ok()
                .and_then(|s| s.parse().ok()),
        },
        RiskAndBehaviorMix {
            early_repayment_rate: env_or("EARLY_RATE", 0.0),
            late_repayment_rate: env_or("LATE_RATE", 0.0),
            fraud_rate: env_or("FRAUD_RATE", 0.0),
            default_rate: env_or("DEFAULT_RATE", 0.05),
            early_settlement_installment: env::var("EARLY_INSTALLMENT")
                .ok()
                .and_then(|s| s.parse().ok()),
            avg_days_late_per_installment: env_or("AVG_DAYS_LATE", 0.0),
        },
        RecoveryModel {
            default_recovery_rate: env_or("DEFAULT_RECOVERY", 0.30),
            fraud_recovery_rate: env_or("FRAUD_RECOVERY", 0.05),
        },
        FundingModel {
            annual_cost_rate: env_or("FUNDING_COST", 0.08),
        },
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let parameter: SweepParameter = env::var("SWEEP_PARAMETER")
        .unwrap_or_else(|_| "settlement_delay_days".to_string())
        .parse()
        .map_err(anyhow::Error::msg)?;

    let range_start: f64 = env_or("SWEEP_START", 0.0);
    let range_end: f64 = env_or("SWEEP_END", 30.0);
    let steps: usize = env_or("SWEEP_STEPS", 16);
    if steps < 2 {
        bail!("SWEEP_STEPS must be at least 2");
    }

    let metric = match env::var("SWEEP_METRIC").as_deref() {
        Ok("required_rate") => SweepMetric::RequiredRate {
            target_yield: env_or("TARGET_YIELD", 0.60),
        },
        Ok("effective_yield") | Err(_) => SweepMetric::EffectiveYield,
        Ok(other) => bail!("unknown SWEEP_METRIC: {other}"),
    };

    // Evenly spaced grid including both endpoints
    let step = (range_end - range_start) / (steps - 1) as f64;
    let values: Vec<f64> = (0..steps)
        .map(|i| range_start + step * i as f64)
        .collect();

    let base = base_inputs_from_env();
    let series = sweep(parameter, &values, &base, metric)?;

    if json_output {
        let response = SweepResponse {
            parameter: parameter.name(),
            metric,
            points: series
                .values
                .iter()
                .zip(&series.outputs)
                .map(|(&value, &output)| SweepPoint { value, output })
                .collect(),
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Sensitivity: {} over [{range_start}, {range_end}]", parameter.name());
    match metric {
        SweepMetric::EffectiveYield => println!("Metric: effective yield"),
        SweepMetric::RequiredRate { target_yield } => {
            println!("Metric: required rate for {:.1}% yield", target_yield * 100.0)
        }
    }
    println!("{:>14} {:>14}", "value", "output");
    println!("{}", "-".repeat(30));
    for (value, output) in series.values.iter().zip(&series.outputs) {
        println!("{:>14.4} {:>13.2}%", value, output * 100.0);
    }
    println!("\nCompleted {} evaluations in {:?}", steps, start.elapsed());

    Ok(())
}
