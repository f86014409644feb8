//! Loan input data model and loan-book loading

mod data;
pub mod loader;

pub use data::{
    years, FundingModel, LoanTerms, PricingError, PricingInputs, RecoveryModel,
    RiskAndBehaviorMix, DAYS_PER_YEAR,
};
pub use loader::{load_loan_book, BookEntry};
