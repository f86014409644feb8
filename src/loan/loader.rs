//! Load a loan book (one pricing scenario per row) from CSV

use super::{FundingModel, LoanTerms, PricingInputs, RecoveryModel, RiskAndBehaviorMix};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the loan-book column layout
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "LoanID")]
    loan_id: u32,
    #[serde(rename = "Loans")]
    loans: f64,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "AnnualRate")]
    annual_rate: f64,
    #[serde(rename = "Installments")]
    installments: u32,
    #[serde(rename = "FrequencyDays")]
    frequency_days: u32,
    #[serde(rename = "FixedFeePct")]
    fixed_fee_pct: f64,
    #[serde(rename = "CommissionPct")]
    commission_pct: f64,
    #[serde(rename = "SettlementDelayDays")]
    settlement_delay_days: u32,
    #[serde(rename = "LateFeeAmount")]
    late_fee_amount: f64,
    #[serde(rename = "LateInstallmentPct")]
    late_installment_pct: f64,
    #[serde(rename = "FirstUpfront")]
    first_upfront: String,
    #[serde(rename = "LatePayerRate")]
    late_payer_rate: Option<f64>,
    #[serde(rename = "EarlyRate")]
    early_rate: f64,
    #[serde(rename = "LateRate")]
    late_rate: f64,
    #[serde(rename = "FraudRate")]
    fraud_rate: f64,
    #[serde(rename = "DefaultRate")]
    default_rate: f64,
    #[serde(rename = "EarlySettlementInstallment")]
    early_settlement_installment: Option<u32>,
    #[serde(rename = "AvgDaysLate")]
    avg_days_late: f64,
    #[serde(rename = "DefaultRecovery")]
    default_recovery: f64,
    #[serde(rename = "FraudRecovery")]
    fraud_recovery: f64,
    #[serde(rename = "FundingCostRate")]
    funding_cost_rate: f64,
}

/// One loan-book row: a complete parameter record plus its weight in
/// the book
#[derive(Debug, Clone)]
pub struct BookEntry {
    pub loan_id: u32,
    /// Number of loans this row represents (fractional weights allowed)
    pub loans: f64,
    pub inputs: PricingInputs,
}

impl CsvRow {
    fn to_entry(self) -> Result<BookEntry, Box<dyn Error>> {
        let first_installment_upfront = match self.first_upfront.as_str() {
            "Y" | "y" | "true" | "1" => true,
            "N" | "n" | "false" | "0" => false,
            other => return Err(format!("Unknown FirstUpfront: {}", other).into()),
        };

        if self.loans <= 0.0 {
            return Err(format!("Loans must be positive, got {}", self.loans).into());
        }

        let inputs = PricingInputs::new(
            LoanTerms {
                principal: self.principal,
                annual_rate: self.annual_rate,
                installments: self.installments,
                installment_frequency_days: self.frequency_days,
                fixed_fee_pct: self.fixed_fee_pct,
                merchant_commission_pct: self.commission_pct,
                settlement_delay_days: self.settlement_delay_days,
                late_fee_amount: self.late_fee_amount,
                late_installment_pct: self.late_installment_pct,
                first_installment_upfront,
                late_payer_annual_rate: self.late_payer_rate,
            },
            RiskAndBehaviorMix {
                early_repayment_rate: self.early_rate,
                late_repayment_rate: self.late_rate,
                fraud_rate: self.fraud_rate,
                default_rate: self.default_rate,
                early_settlement_installment: self.early_settlement_installment,
                avg_days_late_per_installment: self.avg_days_late,
            },
            RecoveryModel {
                default_recovery_rate: self.default_recovery,
                fraud_recovery_rate: self.fraud_recovery,
            },
            FundingModel {
                annual_cost_rate: self.funding_cost_rate,
            },
        );

        // Reject malformed rows at load time so the batch run never
        // starts on a partially valid book
        inputs
            .validate()
            .map_err(|e| format!("LoanID {}: {}", self.loan_id, e))?;

        Ok(BookEntry {
            loan_id: self.loan_id,
            loans: self.loans,
            inputs,
        })
    }
}

/// Load all loan-book entries from a CSV file
pub fn load_loan_book<P: AsRef<Path>>(path: P) -> Result<Vec<BookEntry>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut entries = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let entry = row.to_entry()?;
        entries.push(entry);
    }

    log::debug!("loaded {} loan-book entries", entries.len());
    Ok(entries)
}

/// Load loan-book entries from any reader (e.g., string buffer)
pub fn load_loan_book_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<BookEntry>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let entry = row.to_entry()?;
        entries.push(entry);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "LoanID,Loans,Principal,AnnualRate,Installments,FrequencyDays,\
FixedFeePct,CommissionPct,SettlementDelayDays,LateFeeAmount,LateInstallmentPct,FirstUpfront,\
LatePayerRate,EarlyRate,LateRate,FraudRate,DefaultRate,EarlySettlementInstallment,AvgDaysLate,\
DefaultRecovery,FraudRecovery,FundingCostRate";

    #[test]
    fn test_load_well_formed_book() {
        let csv = format!(
            "{HEADER}\n\
             1,1000,100.0,0.30,6,14,0.02,0.03,1,3.0,0.20,N,,0.10,0.20,0.10,0.10,3,5.0,0.30,0.05,0.08\n\
             2,500,250.0,0.0,4,30,0.0,0.05,7,0.0,0.0,Y,,0.0,0.0,0.0,0.02,,0.0,0.20,0.0,0.08\n"
        );
        let entries = load_loan_book_from_reader(csv.as_bytes()).expect("book should parse");
        assert_eq!(entries.len(), 2);

        let e1 = &entries[0];
        assert_eq!(e1.loan_id, 1);
        assert_eq!(e1.loans, 1000.0);
        assert_eq!(e1.inputs.terms.installments, 6);
        assert_eq!(e1.inputs.mix.early_settlement_installment, Some(3));
        assert!(!e1.inputs.terms.first_installment_upfront);

        let e2 = &entries[1];
        assert!(e2.inputs.terms.first_installment_upfront);
        assert_eq!(e2.inputs.terms.annual_rate, 0.0);
        assert_eq!(e2.inputs.mix.early_settlement_installment, None);
    }

    #[test]
    fn test_invalid_mix_row_is_rejected_with_loan_id() {
        let csv = format!(
            "{HEADER}\n\
             7,100,100.0,0.30,6,14,0.02,0.03,1,3.0,0.20,N,,0.50,0.60,0.0,0.0,3,5.0,0.30,0.05,0.08\n"
        );
        let err = load_loan_book_from_reader(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("LoanID 7"), "missing row context: {msg}");
        assert!(msg.contains("invalid portfolio mix"), "wrong error: {msg}");
    }

    #[test]
    fn test_unknown_upfront_marker_is_rejected() {
        let csv = format!(
            "{HEADER}\n\
             3,100,100.0,0.30,6,14,0.02,0.03,1,3.0,0.20,maybe,,0.0,0.0,0.0,0.0,,0.0,0.0,0.0,0.0\n"
        );
        assert!(load_loan_book_from_reader(csv.as_bytes()).is_err());
    }
}
