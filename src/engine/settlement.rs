//! Settlement calculator: pure functions from employee/balance snapshots to
//! payslips. No store access, no side effects. All monetary arithmetic stays
//! at full f64 precision; `round2` is for presentation and wire strings only.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::AppError;
use crate::model::employee::Employee;
use crate::model::leave::{LeaveBalance, LeaveType};
use crate::model::payroll::{Payslip, PayslipKind};

/// Two-decimal display rounding. Presentation time only.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Inclusive calendar-day span: 2024-06-10..2024-06-12 is 3 days. Calendar
/// dates are timezone-free, so no daylight-saving drift.
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> Result<i64, AppError> {
    if end < start {
        return Err(AppError::ValidationFailed(
            "end_date cannot be before start_date".to_string(),
        ));
    }
    Ok((end - start).num_days() + 1)
}

/// Calendar days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> i64 {
    let (year, month) = (date.year(), date.month());
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    (next - first).num_days()
}

pub fn years_of_service(join_date: NaiveDate, last_working_day: NaiveDate) -> f64 {
    (last_working_day - join_date).num_days() as f64 / 365.25
}

/// Statutory end-of-service gratuity: three weeks' wage per year of service,
/// weekly wage as 7x the 30-day daily rate. Under one year pays nothing.
pub fn gratuity(basic_salary: f64, years: f64) -> f64 {
    if years < 1.0 {
        return 0.0;
    }
    (basic_salary / 30.0) * 7.0 * 3.0 * years
}

fn base_maps(employee: &Employee) -> (BTreeMap<String, f64>, BTreeMap<String, f64>) {
    let mut earnings = BTreeMap::new();
    earnings.insert("basicSalary".to_string(), employee.compensation.basic_salary);
    earnings.insert("allowances".to_string(), employee.compensation.allowances);
    let mut deductions = BTreeMap::new();
    deductions.insert(
        "standardDeductions".to_string(),
        employee.compensation.deductions,
    );
    (earnings, deductions)
}

/// Regular monthly payslip, labelled with the current month/year.
pub fn monthly_payslip(employee: &Employee) -> Result<Payslip, AppError> {
    employee.compensation.validate()?;
    let (earnings, deductions) = base_maps(employee);
    Ok(Payslip {
        kind: PayslipKind::Monthly,
        period: Utc::now().format("%B %Y").to_string(),
        earnings,
        deductions,
        notes: vec![],
    })
}

/// Leave payslip. Same composition as the monthly slip (no proration against
/// the leave window), annotated with the leave range.
pub fn leave_payslip(
    employee: &Employee,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Payslip, AppError> {
    employee.compensation.validate()?;
    let days = days_between_inclusive(start, end)?;
    let (earnings, deductions) = base_maps(employee);
    Ok(Payslip {
        kind: PayslipKind::Leave,
        period: start.format("%B %Y").to_string(),
        earnings,
        deductions,
        notes: vec![format!("Leave period: {start} to {end} ({days} day(s))")],
    })
}

/// End-of-service settlement: pro-rated final month, annual-leave encashment
/// and gratuity. The 30-day daily rate is the domain convention for the
/// encashment/gratuity family and is deliberately not `days_in_month`.
pub fn final_settlement(
    employee: &Employee,
    balance: Option<&LeaveBalance>,
    last_working_day: NaiveDate,
) -> Result<Payslip, AppError> {
    employee.compensation.validate()?;
    if last_working_day < employee.join_date {
        return Err(AppError::ValidationFailed(
            "last_working_day cannot be before join_date".to_string(),
        ));
    }

    let dim = days_in_month(last_working_day) as f64;
    let worked_days = last_working_day.day() as f64;

    let comp = &employee.compensation;
    let pro_rata_basic = comp.basic_salary / dim * worked_days;
    let pro_rata_allowances = comp.allowances / dim * worked_days;
    let pro_rata_deductions = comp.deductions / dim * worked_days;

    let unused_leave_days = balance
        .and_then(|b| b.entry(LeaveType::Annual))
        .map(|e| e.remaining())
        .unwrap_or(0);

    let daily_rate = comp.basic_salary / 30.0;
    let leave_encashment = daily_rate * unused_leave_days as f64;

    let years = years_of_service(employee.join_date, last_working_day);
    let gratuity_amount = gratuity(comp.basic_salary, years);

    let mut earnings = BTreeMap::new();
    earnings.insert("basicSalary".to_string(), pro_rata_basic);
    earnings.insert("allowances".to_string(), pro_rata_allowances);
    earnings.insert("leaveEncashment".to_string(), leave_encashment);
    earnings.insert("gratuity".to_string(), gratuity_amount);
    let mut deductions = BTreeMap::new();
    deductions.insert("standardDeductions".to_string(), pro_rata_deductions);

    Ok(Payslip {
        kind: PayslipKind::FinalSettlement,
        period: last_working_day.format("%B %Y").to_string(),
        earnings,
        deductions,
        notes: vec![
            format!(
                "Worked {} of {} days in {}",
                worked_days as i64,
                dim as i64,
                last_working_day.format("%B %Y")
            ),
            format!("Unused annual leave days: {unused_leave_days}"),
            format!("Years of service: {years:.2}"),
        ],
    })
}
