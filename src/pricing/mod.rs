//! Yield calculation engine: segment model, five-way blend, and solvers

mod engine;
mod result;
pub mod segment;
mod solver;

pub use engine::evaluate;
pub use result::{YieldResult, SENTINEL_YIELD};
pub use segment::{Cohort, SegmentContext, SegmentEconomics, FLOAT_DEPLOYMENT_FRACTION};
pub use solver::{
    estimate_interest_free_cap, solve_required_rate, solve_required_rate_with,
    DEFAULT_MAX_INSTALLMENTS, DEFAULT_MAX_ITERATIONS, DEFAULT_YIELD_TOLERANCE, RATE_SEARCH_MAX,
};
