//! BNPL Pricing CLI
//!
//! Evaluates a single loan configuration and prints the full economics
//! breakdown, the required rate for a target yield, the interest-free
//! installment cap, and the collection calendar.

use anyhow::Result;
use bnpl_pricing::pricing::DEFAULT_MAX_INSTALLMENTS;
use bnpl_pricing::sensitivity::compare_interest_models;
use bnpl_pricing::{
    estimate_interest_free_cap, evaluate, schedule::build_schedule, solve_required_rate,
    FundingModel, LoanTerms, PricingInputs, RecoveryModel, RiskAndBehaviorMix,
};
use chrono::{Local, NaiveDate};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bnpl_pricing",
    about = "Effective-yield pricing for BNPL installment loans"
)]
struct Cli {
    /// Loan principal
    #[arg(long, default_value_t = 100.0)]
    principal: f64,

    /// Nominal annual interest rate as a decimal (0 = interest-free)
    #[arg(long, default_value_t = 0.30)]
    annual_rate: f64,

    /// Number of installments
    #[arg(long, default_value_t = 6)]
    installments: u32,

    /// Days between installments (14 = biweekly, 30 = monthly)
    #[arg(long, default_value_t = 14)]
    frequency_days: u32,

    /// Fixed fee as a fraction of principal
    #[arg(long, default_value_t = 0.02)]
    fixed_fee_pct: f64,

    /// Merchant commission as a fraction of principal
    #[arg(long, default_value_t = 0.03)]
    commission_pct: f64,

    /// Days until the merchant is paid
    #[arg(long, default_value_t = 1)]
    settlement_delay_days: u32,

    /// Late fee per late installment
    #[arg(long, default_value_t = 3.0)]
    late_fee: f64,

    /// Fraction of installments incurring a late fee (on-time/default cohorts)
    #[arg(long, default_value_t = 0.20)]
    late_installment_pct: f64,

    /// Collect the first installment at purchase
    #[arg(long)]
    first_upfront: bool,

    /// Penalty rate for late payers (defaults to the nominal rate)
    #[arg(long)]
    late_payer_rate: Option<f64>,

    /// Fraction of loans repaid early
    #[arg(long, default_value_t = 0.0)]
    early_rate: f64,

    /// Installment index at which early repayers settle
    #[arg(long)]
    early_installment: Option<u32>,

    /// Fraction of loans repaid late
    #[arg(long, default_value_t = 0.0)]
    late_rate: f64,

    /// Average days late per installment for late payers
    #[arg(long, default_value_t = 0.0)]
    avg_days_late: f64,

    /// Fraction of fraudulent loans
    #[arg(long, default_value_t = 0.0)]
    fraud_rate: f64,

    /// Fraction of legitimate defaults
    #[arg(long, default_value_t = 0.0)]
    default_rate: f64,

    /// Recovery fraction on defaults
    #[arg(long, default_value_t = 0.30)]
    default_recovery: f64,

    /// Recovery fraction on fraud
    #[arg(long, default_value_t = 0.05)]
    fraud_recovery: f64,

    /// Annualized funding cost rate
    #[arg(long, default_value_t = 0.08)]
    funding_cost: f64,

    /// Target portfolio yield for the solver and the cap estimator
    #[arg(long, default_value_t = 0.60)]
    target_yield: f64,

    /// Loan origination date for the schedule (defaults to today)
    #[arg(long)]
    origination_date: Option<NaiveDate>,

    /// Emit the full result record as JSON instead of the report
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn to_inputs(&self) -> PricingInputs {
        PricingInputs::new(
            LoanTerms {
                principal: self.principal,
                annual_rate: self.annual_rate,
                installments: self.installments,
                installment_frequency_days: self.frequency_days,
                fixed_fee_pct: self.fixed_fee_pct,
                merchant_commission_pct: self.commission_pct,
                settlement_delay_days: self.settlement_delay_days,
                late_fee_amount: self.late_fee,
                late_installment_pct: self.late_installment_pct,
                first_installment_upfront: self.first_upfront,
                late_payer_annual_rate: self.late_payer_rate,
            },
            RiskAndBehaviorMix {
                early_repayment_rate: self.early_rate,
                late_repayment_rate: self.late_rate,
                fraud_rate: self.fraud_rate,
                default_rate: self.default_rate,
                early_settlement_installment: self.early_installment,
                avg_days_late_per_installment: self.avg_days_late,
            },
            RecoveryModel {
                default_recovery_rate: self.default_recovery,
                fraud_recovery_rate: self.fraud_recovery,
            },
            FundingModel {
                annual_cost_rate: self.funding_cost,
            },
        )
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let inputs = cli.to_inputs();

    let result = evaluate(&inputs)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let required_rate = solve_required_rate(cli.target_yield, &inputs)?;
    let cap = estimate_interest_free_cap(cli.target_yield, &inputs, DEFAULT_MAX_INSTALLMENTS)?;
    let comparison = compare_interest_models(&inputs)?;

    println!("BNPL Pricing v0.1.0");
    println!("===================\n");

    println!(
        "Loan: {:.2} over {} x {}-day installments",
        cli.principal, cli.installments, cli.frequency_days
    );
    println!("  Nominal Rate: {:.1}%", cli.annual_rate * 100.0);
    println!("  Settlement Delay: {} days", cli.settlement_delay_days);
    println!(
        "  First Installment Upfront: {}",
        result.first_installment_upfront
    );
    println!();

    println!("Key Metrics:");
    println!(
        "  Effective Yield:  {:>8.2}%",
        result.effective_yield * 100.0
    );
    println!("  Borrower APR:     {:>8.2}%", result.borrower_apr * 100.0);
    println!("  Profit Margin:    {:>8.2}%", result.profit_margin * 100.0);
    println!(
        "  Required Rate for {:.0}% target: {:.2}%",
        cli.target_yield * 100.0,
        required_rate * 100.0
    );
    println!(
        "  Interest-Free Cap at {:.0}% target: {} installments",
        cli.target_yield * 100.0,
        cap
    );
    println!();

    println!("Revenue Breakdown:");
    println!("  Base Interest Income:  {:>10.2}", result.interest_income);
    println!(
        "  Late Interest Income:  {:>10.2}",
        result.late_interest_income
    );
    println!("  Fixed Fee Income:      {:>10.2}", result.fixed_fee_income);
    println!(
        "  Merchant Commission:   {:>10.2}",
        result.merchant_commission
    );
    println!("  Late Fee Income:       {:>10.2}", result.late_fee_income);
    println!("  Total Revenue:         {:>10.2}", result.total_revenue);
    println!();

    println!("Cost & Loss Breakdown:");
    println!("  Default Loss:          {:>10.2}", result.default_loss);
    println!("  Fraud Loss:            {:>10.2}", result.fraud_loss);
    println!("  Funding Cost:          {:>10.2}", result.funding_cost);
    println!("  Net Profit:            {:>10.2}", result.net_profit);
    println!();

    println!("Timing:");
    println!(
        "  Loan Duration:         {:>7.0} days",
        result.loan_duration_days
    );
    println!(
        "  Capital Deployment:    {:>7.1} days",
        result.capital_deployment_days
    );
    println!(
        "  Settlement Benefit:    {:>+7.2}% yield",
        result.settlement_delay_benefit * 100.0
    );
    if result.is_float_scenario {
        println!("  WARNING: float scenario - customers fully repay before the merchant is paid;");
        println!("  the reported yield uses a conservative deployment proxy");
    }
    println!();

    println!(
        "Portfolio Mix: early {:.0}% | late {:.0}% | on-time {:.0}% | default {:.0}% | fraud {:.0}%",
        result.early_pct * 100.0,
        result.late_pct * 100.0,
        result.ontime_pct * 100.0,
        result.default_pct * 100.0,
        result.fraud_pct * 100.0
    );
    println!();

    println!("Interest Model Comparison:");
    println!(
        "  Interest-Bearing ({:.0}%): yield {:.2}%, net profit {:.2}",
        comparison.interest_bearing.annual_rate * 100.0,
        comparison.interest_bearing.effective_yield * 100.0,
        comparison.interest_bearing.net_profit
    );
    println!(
        "  Interest-Free:           yield {:.2}%, net profit {:.2}",
        comparison.interest_free.effective_yield * 100.0,
        comparison.interest_free.net_profit
    );
    println!();

    let origination = cli
        .origination_date
        .unwrap_or_else(|| Local::now().date_naive());
    let schedule = build_schedule(&inputs.terms, origination);
    println!("Collection Calendar (originated {}):", origination);
    println!("  Merchant settled on {}", schedule.settlement_date);
    for row in &schedule.rows {
        println!(
            "  #{:<2} {}  {:>8.2}{}",
            row.number,
            row.due_date,
            row.amount,
            if row.collected_upfront {
                "  (upfront)"
            } else {
                ""
            }
        );
    }

    Ok(())
}
