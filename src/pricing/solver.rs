//! Required-rate solver and interest-free installment cap estimator
//!
//! Both reuse the yield calculator as a black-box objective function.

use super::engine::evaluate;
use crate::loan::{PricingError, PricingInputs};

/// Upper bound of the rate search interval (400% annual)
pub const RATE_SEARCH_MAX: f64 = 4.0;

/// Default iteration budget for the bisection search
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default convergence tolerance on the yield difference
pub const DEFAULT_YIELD_TOLERANCE: f64 = 1e-4;

/// Default ceiling for the interest-free cap scan
pub const DEFAULT_MAX_INSTALLMENTS: u32 = 12;

/// Find the nominal annual rate that produces the target effective
/// yield, holding every other parameter fixed.
///
/// Bisection over [0, `RATE_SEARCH_MAX`]. Relies on effective yield
/// being non-decreasing in the nominal rate, which holds because
/// interest income is linear and non-negative in the rate. Convergence
/// never errors: when the iteration budget runs out the final midpoint
/// is returned as the best approximation. Invalid inputs still fail.
pub fn solve_required_rate(
    target_yield: f64,
    inputs: &PricingInputs,
) -> Result<f64, PricingError> {
    solve_required_rate_with(
        target_yield,
        inputs,
        DEFAULT_MAX_ITERATIONS,
        DEFAULT_YIELD_TOLERANCE,
    )
}

/// `solve_required_rate` with an explicit iteration budget and tolerance
pub fn solve_required_rate_with(
    target_yield: f64,
    inputs: &PricingInputs,
    max_iterations: u32,
    tolerance: f64,
) -> Result<f64, PricingError> {
    // Surface input errors before the search starts; the probe rate is
    // irrelevant because the mix and terms checks do not depend on it
    inputs.validate()?;

    let mut low = 0.0_f64;
    let mut high = RATE_SEARCH_MAX;
    let mut mid = (low + high) / 2.0;

    for iteration in 0..max_iterations {
        mid = (low + high) / 2.0;

        let mut candidate = inputs.clone();
        candidate.terms.annual_rate = mid;
        let current_yield = evaluate(&candidate)?.effective_yield;

        if (current_yield - target_yield).abs() < tolerance {
            log::debug!(
                "required-rate search converged after {} iterations: rate {:.6}",
                iteration + 1,
                mid
            );
            return Ok(mid);
        }

        if current_yield < target_yield {
            low = mid;
        } else {
            high = mid;
        }
    }

    // Best-effort approximation after the iteration budget
    log::debug!(
        "required-rate search exhausted {max_iterations} iterations, returning midpoint {mid:.6}"
    );
    Ok(mid)
}

/// Largest installment count of an interest-free plan that still meets
/// the target yield, up to `max_installments`.
///
/// With the rate pinned at zero, yield is non-increasing in the
/// installment count (longer terms deploy capital longer with no extra
/// interest), so a linear scan stops at the first failing count.
/// Returns 0 when even a single installment misses the target;
/// callers must treat 0 distinctly from "1 installment is sufficient".
pub fn estimate_interest_free_cap(
    target_yield: f64,
    inputs: &PricingInputs,
    max_installments: u32,
) -> Result<u32, PricingError> {
    let mut zero_rate = inputs.clone();
    zero_rate.terms.annual_rate = 0.0;
    zero_rate.validate()?;

    for installments in 1..=max_installments {
        let mut candidate = zero_rate.clone();
        candidate.terms.installments = installments;
        let result = evaluate(&candidate)?;

        if result.effective_yield < target_yield {
            return Ok(installments - 1);
        }
    }

    Ok(max_installments)
}
