use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Completed,
}

/// A completed payroll cycle. Append-only history: once persisted a run is
/// never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollRun {
    pub id: String,

    #[schema(example = "June")]
    pub month: String,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = "2026-06-28T10:00:00Z", format = "date-time", value_type = String)]
    pub run_at: DateTime<Utc>,

    #[schema(example = 73000.0)]
    pub total_amount: f64,

    #[schema(example = 10)]
    pub employee_count: u32,

    #[schema(example = "completed")]
    pub status: RunStatus,

    /// The exact WPS/SIF payload handed to the bank.
    pub sif_payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PayslipKind {
    Monthly,
    Leave,
    FinalSettlement,
}

/// Derived pay statement. Earnings/deductions are keyed by fixed category
/// names (`basicSalary`, `allowances`, `standardDeductions`) plus the
/// settlement extras (`leaveEncashment`, `gratuity`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payslip {
    pub kind: PayslipKind,

    #[schema(example = "June 2026")]
    pub period: String,

    pub earnings: BTreeMap<String, f64>,
    pub deductions: BTreeMap<String, f64>,

    /// Human-readable calculation notes, reproduced verbatim for audit.
    pub notes: Vec<String>,
}

impl Payslip {
    pub fn net_pay(&self) -> f64 {
        self.earnings.values().sum::<f64>() - self.deductions.values().sum::<f64>()
    }
}
