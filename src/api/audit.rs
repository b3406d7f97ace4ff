use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::audit::AuditLog;
use crate::store::Store;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AuditQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 20)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AuditListResponse {
    pub data: Vec<AuditLog>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: usize,
}

/// List audit trail entries (most recent first)
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/audit",
    params(("tenant_id", Path, description = "Tenant ID"), AuditQuery),
    responses(
        (status = 200, description = "Paginated audit trail", body = AuditListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
pub async fn list_audit(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    query: web::Query<AuditQuery>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let (data, total) = store.read(&tenant_id, |state| {
        let total = state.audit_log.len();
        let page_data: Vec<AuditLog> = state
            .audit_log
            .iter()
            .skip((page as usize - 1) * per_page as usize)
            .take(per_page as usize)
            .cloned()
            .collect();
        (page_data, total)
    })?;

    Ok(HttpResponse::Ok().json(AuditListResponse {
        data,
        page,
        per_page,
        total,
    }))
}
