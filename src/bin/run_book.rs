//! Evaluate an entire loan book from CSV
//!
//! Each row is an independent pricing scenario; evaluations run in
//! parallel and aggregate into a principal-weighted portfolio view.
//! Usage: run_book <book.csv> [--json]

use anyhow::{bail, Context, Result};
use bnpl_pricing::loan::{load_loan_book, BookEntry};
use bnpl_pricing::pricing::evaluate;
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

#[derive(Serialize)]
struct BookResponse {
    entry_count: usize,
    total_loans: f64,
    total_principal: f64,
    /// Principal-weighted average effective yield across the book
    portfolio_yield: f64,
    total_net_profit: f64,
    float_scenario_count: usize,
    entries: Vec<EntrySummary>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct EntrySummary {
    loan_id: u32,
    loans: f64,
    principal: f64,
    effective_yield: f64,
    net_profit: f64,
    expected_loss: f64,
    is_float_scenario: bool,
}

fn summarize(entry: &BookEntry) -> Result<EntrySummary> {
    let result = evaluate(&entry.inputs)
        .with_context(|| format!("evaluating LoanID {}", entry.loan_id))?;
    Ok(EntrySummary {
        loan_id: entry.loan_id,
        loans: entry.loans,
        principal: entry.inputs.terms.principal,
        effective_yield: result.effective_yield,
        net_profit: result.net_profit,
        expected_loss: result.expected_loss,
        is_float_scenario: result.is_float_scenario,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_output = args.iter().any(|arg| arg == "--json");
    let Some(path) = args.iter().skip(1).find(|arg| !arg.starts_with("--")) else {
        bail!("usage: run_book <book.csv> [--json]");
    };

    let start = Instant::now();
    let entries = load_loan_book(path)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("loading loan book {path}"))?;
    log::info!("loaded {} loan-book entries from {path}", entries.len());

    let summaries: Vec<EntrySummary> = entries
        .par_iter()
        .map(summarize)
        .collect::<Result<Vec<_>>>()?;

    // Weight by deployed principal: loans x principal per row
    let total_loans: f64 = summaries.iter().map(|s| s.loans).sum();
    let total_principal: f64 = summaries.iter().map(|s| s.loans * s.principal).sum();
    let portfolio_yield = if total_principal > 0.0 {
        summaries
            .iter()
            .map(|s| s.loans * s.principal * s.effective_yield)
            .sum::<f64>()
            / total_principal
    } else {
        0.0
    };
    let total_net_profit: f64 = summaries.iter().map(|s| s.loans * s.net_profit).sum();
    let float_scenario_count = summaries.iter().filter(|s| s.is_float_scenario).count();

    if json_output {
        let response = BookResponse {
            entry_count: summaries.len(),
            total_loans,
            total_principal,
            portfolio_yield,
            total_net_profit,
            float_scenario_count,
            entries: summaries,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Loan Book: {} entries, {:.0} loans", summaries.len(), total_loans);
    println!(
        "{:>8} {:>10} {:>12} {:>10} {:>12} {:>12} {:>7}",
        "LoanID", "Loans", "Principal", "Yield", "NetProfit", "ExpLoss", "Float"
    );
    println!("{}", "-".repeat(78));
    for s in &summaries {
        println!(
            "{:>8} {:>10.0} {:>12.2} {:>9.2}% {:>12.2} {:>12.2} {:>7}",
            s.loan_id,
            s.loans,
            s.principal,
            s.effective_yield * 100.0,
            s.net_profit,
            s.expected_loss,
            if s.is_float_scenario { "yes" } else { "" }
        );
    }

    println!("\nPortfolio Summary:");
    println!("  Total Principal:     {:.2}", total_principal);
    println!("  Portfolio Yield:     {:.2}%", portfolio_yield * 100.0);
    println!("  Total Net Profit:    {:.2}", total_net_profit);
    if float_scenario_count > 0 {
        println!(
            "  Float Scenarios:     {} entries (yield uses deployment proxy)",
            float_scenario_count
        );
    }
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
