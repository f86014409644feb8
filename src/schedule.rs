//! Dated installment schedule for a single loan
//!
//! Display-layer projection of the collection calendar; the pricing
//! engine itself works purely in day counts.

use crate::loan::LoanTerms;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One scheduled customer payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRow {
    /// 1-based installment number
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: f64,
    /// Collected at purchase rather than on a later due date
    pub collected_upfront: bool,
}

/// Full collection calendar for one loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub origination_date: NaiveDate,
    /// Date the merchant is paid
    pub settlement_date: NaiveDate,
    pub rows: Vec<InstallmentRow>,
    /// Sum of all scheduled payments (equals the principal)
    pub total_collected: f64,
}

impl PaymentSchedule {
    /// Date of the final scheduled customer payment
    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|row| row.due_date)
    }

    /// Whether every installment is collected before the merchant is
    /// paid (the float scenario on calendar dates)
    pub fn fully_collected_before_settlement(&self) -> bool {
        self.final_due_date()
            .map(|last| last <= self.settlement_date)
            .unwrap_or(false)
    }
}

/// Build the collection calendar for the given terms.
///
/// Without upfront collection, installment k falls k periods after
/// origination. With upfront collection the first installment is due
/// at purchase and the remaining ones shift one period earlier. The
/// upfront flag is normalized the same way the engine normalizes it
/// (disabled on one-installment loans).
pub fn build_schedule(terms: &LoanTerms, origination_date: NaiveDate) -> PaymentSchedule {
    let amount = terms.installment_amount();
    let frequency = Duration::days(terms.installment_frequency_days as i64);
    let upfront = terms.upfront_effective();

    let rows = (1..=terms.installments)
        .map(|number| {
            let periods = if upfront { number - 1 } else { number };
            InstallmentRow {
                number,
                due_date: origination_date + frequency * periods as i32,
                amount,
                collected_upfront: upfront && number == 1,
            }
        })
        .collect::<Vec<_>>();

    PaymentSchedule {
        origination_date,
        settlement_date: origination_date + Duration::days(terms.settlement_delay_days as i64),
        total_collected: amount * terms.installments as f64,
        rows,
    }
}
