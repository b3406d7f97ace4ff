use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: String,

    #[schema(example = "0d9f5d3e-6a3f-4a77-9f2e-0f6a2a9f01aa")]
    pub employee_id: String,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-01-03", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "annual")]
    pub leave_type: LeaveType,

    #[schema(example = "pending")]
    pub status: LeaveStatus,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// One allotted-vs-used counter per leave type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveBalanceEntry {
    #[schema(example = "annual")]
    pub leave_type: LeaveType,

    #[schema(example = 21)]
    pub total_days: i64,

    #[schema(example = 5)]
    pub used_days: i64,
}

impl LeaveBalanceEntry {
    pub fn remaining(&self) -> i64 {
        (self.total_days - self.used_days).max(0)
    }
}

/// One record per employee holding its per-type counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveBalance {
    pub employee_id: String,
    pub entries: Vec<LeaveBalanceEntry>,
}

impl LeaveBalance {
    pub fn entry(&self, leave_type: LeaveType) -> Option<&LeaveBalanceEntry> {
        self.entries.iter().find(|e| e.leave_type == leave_type)
    }

    pub fn entry_mut(&mut self, leave_type: LeaveType) -> Option<&mut LeaveBalanceEntry> {
        self.entries.iter_mut().find(|e| e.leave_type == leave_type)
    }
}
