use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::compliance::ComplianceSettings;
use crate::model::tenant::{SubscriptionTier, Tenant};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateTenant {
    #[schema(example = "acme")]
    pub id: String,
    #[schema(example = "Acme Trading WLL")]
    pub name: String,
    #[schema(example = "free")]
    pub tier: SubscriptionTier,
}

/// Register a tenant
#[utoipa::path(
    post,
    path = "/tenants",
    request_body = CreateTenant,
    responses(
        (status = 201, description = "Tenant created", body = Object, example = json!({
            "message": "Tenant created successfully"
        })),
        (status = 400, description = "Invalid tenant id"),
        (status = 409, description = "Tenant already exists")
    ),
    tag = "Tenant"
)]
pub async fn create_tenant(
    store: web::Data<Store>,
    payload: web::Json<CreateTenant>,
) -> actix_web::Result<impl Responder> {
    let id = payload.id.trim().to_lowercase();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Tenant id must be alphanumeric (dashes allowed)"
        })));
    }

    store.create_tenant(Tenant {
        id: id.clone(),
        name: payload.name.trim().to_string(),
        tier: payload.tier,
        created_at: Utc::now(),
    })?;

    info!(tenant_id = %id, "Tenant registered");
    Ok(HttpResponse::Created().json(json!({
        "message": "Tenant created successfully"
    })))
}

/// List tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    responses(
        (status = 200, description = "All tenants", body = [Tenant])
    ),
    security(("bearer_auth" = [])),
    tag = "Tenant"
)]
pub async fn list_tenants(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(store.list_tenants()))
}

/// Get compliance settings
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/compliance",
    params(("tenant_id", Path, description = "Tenant ID")),
    responses(
        (status = 200, body = ComplianceSettings),
        (status = 404, description = "Not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "Tenant"
)]
pub async fn get_compliance(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let settings = store.read(&tenant_id, |s| s.compliance.clone())?;
    match settings {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Compliance settings not configured"
        }))),
    }
}

/// Configure compliance settings
#[utoipa::path(
    put,
    path = "/api/tenants/{tenant_id}/compliance",
    params(("tenant_id", Path, description = "Tenant ID")),
    request_body = ComplianceSettings,
    responses(
        (status = 200, description = "Settings saved", body = Object, example = json!({
            "message": "Compliance settings saved"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Tenant"
)]
pub async fn put_compliance(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    payload: web::Json<ComplianceSettings>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let settings = payload.into_inner();
    if settings.establishment_id.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "establishment_id must not be empty"
        })));
    }

    let actor = auth.actor();
    store.mutate(&tenant_id, |state| {
        state.compliance = Some(settings.clone());
        state.record_audit(
            &actor,
            "compliance.update",
            format!("Updated compliance settings ({})", settings.establishment_id),
        );
        Ok(())
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Compliance settings saved"
    })))
}
