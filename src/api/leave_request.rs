use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::engine::ledger;
use crate::error::AppError;
use crate::model::leave::{LeaveBalance, LeaveBalanceEntry, LeaveRequest, LeaveStatus, LeaveType};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    pub employee_id: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    pub employee_id: Option<String>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<LeaveStatus>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateBalance {
    pub entries: Vec<LeaveBalanceEntry>,
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/tenants/{tenant_id}/leave",
    params(("tenant_id", Path, description = "Tenant ID")),
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Bad date range"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let request = LeaveRequest {
        id: Uuid::new_v4().to_string(),
        employee_id: payload.employee_id.clone(),
        start_date: payload.start_date,
        end_date: payload.end_date,
        leave_type: payload.leave_type,
        status: LeaveStatus::Pending,
        created_at: Utc::now(),
    };

    let actor = auth.actor();
    let created = store.mutate(&tenant_id, |state| {
        state.employee(&request.employee_id)?;
        state.leave_requests.push(request.clone());
        state.record_audit(
            &actor,
            "leave.request",
            format!(
                "Requested {} leave {} to {} for employee {}",
                request.leave_type, request.start_date, request.end_date, request.employee_id
            ),
        );
        Ok(request.clone())
    })?;

    Ok(HttpResponse::Created().json(created))
}

/* =========================
Approve leave
========================= */
#[utoipa::path(
    put,
    path = "/api/tenants/{tenant_id}/leave/{leave_id}/approve",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("leave_id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed or no matching balance")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, leave_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let approved = ledger::approve(&store, &tenant_id, &leave_id, &auth.actor())?;
    Ok(HttpResponse::Ok().json(approved))
}

/* =========================
Reject leave
========================= */
#[utoipa::path(
    put,
    path = "/api/tenants/{tenant_id}/leave/{leave_id}/reject",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("leave_id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, leave_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let rejected = ledger::reject(&store, &tenant_id, &leave_id, &auth.actor())?;
    Ok(HttpResponse::Ok().json(rejected))
}

/// Get a leave request
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/leave/{leave_id}",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("leave_id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, leave_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let request = store.read(&tenant_id, |s| s.leave_request(&leave_id).cloned())??;
    Ok(HttpResponse::Ok().json(request))
}

/// List leave requests
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/leave",
    params(("tenant_id", Path, description = "Tenant ID"), LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let (data, total) = store.read(&tenant_id, |state| {
        let filtered: Vec<LeaveRequest> = state
            .leave_requests
            .iter()
            .filter(|r| {
                query
                    .employee_id
                    .as_ref()
                    .map_or(true, |id| &r.employee_id == id)
                    && query.status.map_or(true, |s| r.status == s)
            })
            .cloned()
            .collect();
        let total = filtered.len();
        let page_data: Vec<LeaveRequest> = filtered
            .into_iter()
            .skip((page as usize - 1) * per_page as usize)
            .take(per_page as usize)
            .collect();
        (page_data, total)
    })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Get an employee's leave balance
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}/leave-balance",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Balance found", body = LeaveBalance),
        (status = 404, description = "Balance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_balance(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let balance = store.read(&tenant_id, |s| s.balance_for(&employee_id).cloned())??;
    Ok(HttpResponse::Ok().json(balance))
}

/// Edit an employee's leave balance
#[utoipa::path(
    put,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}/leave-balance",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpdateBalance,
    responses(
        (status = 200, description = "Balance updated", body = LeaveBalance),
        (status = 400, description = "Invalid counters"),
        (status = 404, description = "Balance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn update_balance(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateBalance>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let entries = payload.into_inner().entries;
    for entry in &entries {
        if entry.total_days < 0 || entry.used_days < 0 {
            return Err(AppError::ValidationFailed(
                "Leave day counters must be non-negative".to_string(),
            )
            .into());
        }
        if entry.used_days > entry.total_days {
            return Err(AppError::ValidationFailed(
                "used_days cannot exceed total_days".to_string(),
            )
            .into());
        }
    }

    let actor = auth.actor();
    let updated = store.mutate(&tenant_id, |state| {
        let balance = state.balance_for_mut(&employee_id)?;
        balance.entries = entries.clone();
        let updated = balance.clone();
        state.record_audit(
            &actor,
            "leave.balance.update",
            format!("Edited leave balance for employee {employee_id}"),
        );
        Ok(updated)
    })?;

    Ok(HttpResponse::Ok().json(updated))
}
