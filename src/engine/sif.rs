//! WPS/SIF encoder. The field order, separators, the `SAL` literal and the
//! duplicated-QID reference are a fixed bank-ingestion contract; every byte
//! matters here.

use crate::error::AppError;
use crate::model::compliance::ComplianceSettings;
use crate::model::employee::Employee;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_number(name: &str) -> Result<u32, AppError> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))
        .map(|i| i as u32 + 1)
        .ok_or_else(|| AppError::ValidationFailed(format!("Unknown month name: {name}")))
}

/// `WPS_{MONTH_UPPER}_{YEAR}.sif`
pub fn filename(month: &str, year: i32) -> String {
    format!("WPS_{}_{}.sif", month.trim().to_uppercase(), year)
}

/// Encode one payroll run: a single header record followed by one detail
/// record per employee, joined with single `\n` (no trailing newline).
pub fn encode(
    settings: &ComplianceSettings,
    employees: &[Employee],
    month: &str,
    year: i32,
    total_amount: f64,
) -> Result<String, AppError> {
    let month_num = month_number(month)?;

    let mut lines = Vec::with_capacity(employees.len() + 1);
    lines.push(format!(
        "{},{:04}{:02},{:.2},{}",
        settings.establishment_id,
        year,
        month_num,
        total_amount,
        employees.len()
    ));

    for employee in employees {
        let comp = &employee.compensation;
        let iban: String = employee.iban.split_whitespace().collect();
        lines.push(format!(
            "{},{},{},{:.2},{:.2},{:.2},{:.2},{},SAL,Salary for {} {}",
            employee.qid,
            iban,
            employee.name,
            comp.basic_salary,
            comp.allowances,
            comp.deductions,
            comp.net(),
            employee.qid,
            month,
            year
        ));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::{Compensation, EmployeeStatus};
    use chrono::NaiveDate;

    fn settings() -> ComplianceSettings {
        ComplianceSettings {
            establishment_id: "EST-10021".to_string(),
            bank_name: "Doha Bank".to_string(),
            payer_iban: "QA58DOHB0000987654321".to_string(),
        }
    }

    fn employee(qid: &str, iban: &str, name: &str, basic: f64, allow: f64, deduct: f64) -> Employee {
        Employee {
            id: qid.to_string(),
            name: name.to_string(),
            email: format!("{qid}@test.example"),
            qid: qid.to_string(),
            iban: iban.to_string(),
            compensation: Compensation {
                basic_salary: basic,
                allowances: allow,
                deductions: deduct,
            },
            join_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            manager_id: None,
            status: EmployeeStatus::Active,
            sponsorship: None,
            visa_expiry: None,
        }
    }

    #[test]
    fn payload_has_header_plus_one_line_per_employee() {
        let employees = vec![
            employee("28900000001", "QA00A", "A One", 6000.0, 1500.0, 200.0),
            employee("28900000002", "QA00B", "B Two", 4000.0, 500.0, 0.0),
            employee("28900000003", "QA00C", "C Three", 3000.0, 0.0, 100.0),
        ];
        let payload = encode(&settings(), &employees, "June", 2024, 14_700.0).unwrap();
        let lines: Vec<&str> = payload.split('\n').collect();
        assert_eq!(lines.len(), employees.len() + 1);
        for detail in &lines[1..] {
            assert_eq!(detail.split(',').count(), 10);
        }
    }

    #[test]
    fn net_salary_field_matches_components() {
        let employees = vec![employee("28900000001", "QA00A", "A One", 6000.0, 1500.0, 200.0)];
        let payload = encode(&settings(), &employees, "June", 2024, 7300.0).unwrap();
        let detail = payload.split('\n').nth(1).unwrap();
        let fields: Vec<&str> = detail.split(',').collect();
        let basic: f64 = fields[3].parse().unwrap();
        let allowances: f64 = fields[4].parse().unwrap();
        let deductions: f64 = fields[5].parse().unwrap();
        let net: f64 = fields[6].parse().unwrap();
        assert_eq!(net, basic + allowances - deductions);
    }

    #[test]
    fn exact_wire_bytes() {
        let employees = vec![employee(
            "28900000001",
            "QA58 DOHB 0000 1234",
            "John Doe",
            6000.0,
            1500.0,
            200.0,
        )];
        let payload = encode(&settings(), &employees, "June", 2024, 7300.0).unwrap();
        assert_eq!(
            payload,
            "EST-10021,202406,7300.00,1\n\
             28900000001,QA58DOHB00001234,John Doe,6000.00,1500.00,200.00,7300.00,28900000001,SAL,Salary for June 2024"
        );
    }

    #[test]
    fn period_is_zero_padded() {
        let payload = encode(&settings(), &[], "march", 2026, 0.0).unwrap();
        assert_eq!(payload, "EST-10021,202603,0.00,0");
    }

    #[test]
    fn unknown_month_fails() {
        assert!(matches!(
            encode(&settings(), &[], "Juneteenth", 2024, 0.0),
            Err(AppError::ValidationFailed(_))
        ));
    }

    #[test]
    fn filename_convention() {
        assert_eq!(filename("June", 2024), "WPS_JUNE_2024.sif");
    }
}
