//! BNPL Pricing - Effective-yield engine for installment loans
//!
//! This library provides:
//! - Effective annualized yield under configurable pricing terms and
//!   timing mechanics (settlement delay, upfront first installment)
//! - Five-way behavioral portfolio blending (early / late / on-time /
//!   default / fraud)
//! - Required-rate solving against a target yield
//! - Interest-free installment cap estimation
//! - Single-parameter sensitivity sweeps and loan-book batch evaluation

pub mod loan;
pub mod pricing;
pub mod schedule;
pub mod sensitivity;

// Re-export commonly used types
pub use loan::{
    FundingModel, LoanTerms, PricingError, PricingInputs, RecoveryModel, RiskAndBehaviorMix,
};
pub use pricing::{estimate_interest_free_cap, evaluate, solve_required_rate, YieldResult};
pub use sensitivity::{sweep, SweepMetric, SweepParameter, SweepSeries};
