use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Monthly compensation components. All amounts are non-negative monetary
/// values; rounding happens at presentation time only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Compensation {
    #[schema(example = 6000.0)]
    pub basic_salary: f64,

    #[schema(example = 1500.0)]
    pub allowances: f64,

    #[schema(example = 200.0)]
    pub deductions: f64,
}

impl Compensation {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.basic_salary < 0.0 || self.allowances < 0.0 || self.deductions < 0.0 {
            return Err(AppError::ValidationFailed(
                "Compensation amounts must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn net(&self) -> f64 {
        self.basic_salary + self.allowances - self.deductions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "0d9f5d3e-6a3f-4a77-9f2e-0f6a2a9f01aa",
        "name": "John Doe",
        "email": "john.doe@company.com",
        "qid": "28912345678",
        "iban": "QA58DOHB00001234567890ABCDEFG",
        "compensation": { "basic_salary": 6000.0, "allowances": 1500.0, "deductions": 200.0 },
        "join_date": "2024-01-01",
        "manager_id": null,
        "status": "active",
        "sponsorship": "company",
        "visa_expiry": "2027-01-01"
    })
)]
pub struct Employee {
    pub id: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,

    /// National identity number; duplicated into the SIF detail record as the
    /// employee reference number.
    #[schema(example = "28912345678")]
    pub qid: String,

    #[schema(example = "QA58DOHB00001234567890ABCDEFG")]
    pub iban: String,

    pub compensation: Compensation,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub join_date: NaiveDate,

    /// Back-reference only; not ownership.
    #[schema(nullable = true)]
    pub manager_id: Option<String>,

    #[schema(example = "active")]
    pub status: EmployeeStatus,

    #[schema(example = "company", nullable = true)]
    pub sponsorship: Option<String>,

    #[schema(example = "2027-01-01", value_type = String, format = "date", nullable = true)]
    pub visa_expiry: Option<NaiveDate>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}
