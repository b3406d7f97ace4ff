use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::engine::{payroll_run, settlement, sif};
use crate::model::payroll::{Payslip, PayrollRun};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateRun {
    #[schema(example = "June")]
    pub month: String,
    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RunQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct RunListResponse {
    pub data: Vec<PayrollRun>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct LeaveSlipRequest {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct SettlementRequest {
    #[schema(example = "2026-06-15", format = "date", value_type = String)]
    pub last_working_day: NaiveDate,
}

/// Run payroll
///
/// Aggregates active employees, produces the WPS/SIF payload and persists an
/// immutable Completed run. Re-running the same period creates an independent
/// run record.
#[utoipa::path(
    post,
    path = "/api/tenants/{tenant_id}/payroll/runs",
    params(("tenant_id", Path, description = "Tenant ID")),
    request_body = CreateRun,
    responses(
        (status = 201, description = "Run completed", body = PayrollRun),
        (status = 400, description = "Unknown month name"),
        (status = 412, description = "Compliance settings not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn run_payroll(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    payload: web::Json<CreateRun>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let run = payroll_run::execute(
        &store,
        &tenant_id,
        &payload.month,
        payload.year,
        &auth.actor(),
    )?;
    Ok(HttpResponse::Created().json(run))
}

/// List payroll runs
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/payroll/runs",
    params(("tenant_id", Path, description = "Tenant ID"), RunQuery),
    responses(
        (status = 200, description = "Paginated run list", body = RunListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_runs(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    query: web::Query<RunQuery>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let (data, total) = store.read(&tenant_id, |state| {
        // Most recent run first.
        let mut runs = state.payroll_runs.clone();
        runs.reverse();
        let total = runs.len();
        let page_data: Vec<PayrollRun> = runs
            .into_iter()
            .skip((page as usize - 1) * per_page as usize)
            .take(per_page as usize)
            .collect();
        (page_data, total)
    })?;

    Ok(HttpResponse::Ok().json(RunListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Get a payroll run
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/payroll/runs/{run_id}",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("run_id", Path, description = "Payroll run ID")
    ),
    responses(
        (status = 200, description = "Run found", body = PayrollRun),
        (status = 404, description = "Run not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_run(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, run_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let run = store.read(&tenant_id, |s| s.payroll_run(&run_id).cloned())??;
    Ok(HttpResponse::Ok().json(run))
}

/// Download the WPS/SIF file for a run
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/payroll/runs/{run_id}/sif",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("run_id", Path, description = "Payroll run ID")
    ),
    responses(
        (status = 200, description = "SIF payload", body = String, content_type = "text/plain"),
        (status = 404, description = "Run not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn download_sif(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, run_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let run = store.read(&tenant_id, |s| s.payroll_run(&run_id).cloned())??;
    let filename = sif::filename(&run.month, run.year);

    Ok(HttpResponse::Ok()
        .content_type("text/plain")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(run.sif_payload))
}

/// Monthly payslip
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}/payslips/monthly",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Payslip", body = Payslip),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payslip"
)]
pub async fn monthly_payslip(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let employee = store.read(&tenant_id, |s| s.employee(&employee_id).cloned())??;
    let slip = settlement::monthly_payslip(&employee)?;
    Ok(HttpResponse::Ok().json(slip))
}

/// Leave payslip
#[utoipa::path(
    post,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}/payslips/leave",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = LeaveSlipRequest,
    responses(
        (status = 200, description = "Payslip", body = Payslip),
        (status = 400, description = "Bad date range"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payslip"
)]
pub async fn leave_payslip(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
    payload: web::Json<LeaveSlipRequest>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let employee = store.read(&tenant_id, |s| s.employee(&employee_id).cloned())??;
    let slip = settlement::leave_payslip(&employee, payload.start_date, payload.end_date)?;
    Ok(HttpResponse::Ok().json(slip))
}

/// Final settlement payslip
#[utoipa::path(
    post,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}/payslips/final-settlement",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = SettlementRequest,
    responses(
        (status = 200, description = "Payslip", body = Payslip),
        (status = 400, description = "Bad last working day"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payslip"
)]
pub async fn final_settlement(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
    payload: web::Json<SettlementRequest>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let (employee, balance) = store.read(&tenant_id, |s| {
        (
            s.employee(&employee_id).cloned(),
            s.balance_for(&employee_id).ok().cloned(),
        )
    })?;
    let employee = employee?;

    let slip = settlement::final_settlement(&employee, balance.as_ref(), payload.last_working_day)?;
    Ok(HttpResponse::Ok().json(slip))
}
