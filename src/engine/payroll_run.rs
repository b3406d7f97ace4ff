//! Payroll run processor. A run moves Pending -> Completed inside one tenant
//! commit; only Completed runs are ever visible, and they are append-only.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::engine::sif;
use crate::error::AppError;
use crate::model::audit::Actor;
use crate::model::employee::Employee;
use crate::model::payroll::{PayrollRun, RunStatus};
use crate::store::Store;

pub fn execute(
    store: &Store,
    tenant_id: &str,
    month: &str,
    year: i32,
    actor: &Actor,
) -> Result<PayrollRun, AppError> {
    let run = store.mutate(tenant_id, |state| {
        let settings = state.compliance.clone().ok_or_else(|| {
            AppError::PreconditionFailed(
                "Compliance settings must be configured before running payroll".to_string(),
            )
        })?;

        let employees: Vec<Employee> = state
            .employees
            .iter()
            .filter(|e| e.is_active())
            .cloned()
            .collect();
        for employee in &employees {
            employee.compensation.validate()?;
        }

        let total_amount: f64 = employees.iter().map(|e| e.compensation.net()).sum();

        let mut run = PayrollRun {
            id: Uuid::new_v4().to_string(),
            month: month.to_string(),
            year,
            run_at: Utc::now(),
            total_amount,
            employee_count: employees.len() as u32,
            status: RunStatus::Pending,
            sif_payload: String::new(),
        };
        run.sif_payload = sif::encode(&settings, &employees, month, year, total_amount)?;
        run.status = RunStatus::Completed;

        state.payroll_runs.push(run.clone());
        state.record_audit(
            actor,
            "payroll.run",
            format!(
                "Payroll run for {} {} covering {} employee(s), total {:.2}",
                month, year, run.employee_count, total_amount
            ),
        );
        Ok(run)
    })?;

    info!(
        tenant_id,
        run_id = %run.id,
        employees = run.employee_count,
        total = run.total_amount,
        "Payroll run completed"
    );
    Ok(run)
}
