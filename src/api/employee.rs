use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::employee::{Compensation, Employee, EmployeeStatus};
use crate::model::leave::{LeaveBalance, LeaveBalanceEntry, LeaveType};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@acme.example", format = "email")]
    pub email: String,
    #[schema(example = "28912345678")]
    pub qid: String,
    #[schema(example = "QA58DOHB00001234567890ABCDEFG")]
    pub iban: String,
    pub compensation: Compensation,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub join_date: NaiveDate,
    pub manager_id: Option<String>,
    pub sponsorship: Option<String>,
    #[schema(example = "2027-01-01", format = "date", value_type = String, nullable = true)]
    pub visa_expiry: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub qid: Option<String>,
    pub iban: Option<String>,
    pub compensation: Option<Compensation>,
    pub manager_id: Option<String>,
    pub sponsorship: Option<String>,
    #[schema(example = "2027-01-01", format = "date", value_type = String, nullable = true)]
    pub visa_expiry: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
    #[schema(example = "active")]
    pub status: Option<EmployeeStatus>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: usize,
}

/// Default onboarding entitlements; editable afterwards through the
/// leave-balance endpoint.
fn default_balance(employee_id: String) -> LeaveBalance {
    LeaveBalance {
        employee_id,
        entries: vec![
            LeaveBalanceEntry {
                leave_type: LeaveType::Annual,
                total_days: 21,
                used_days: 0,
            },
            LeaveBalanceEntry {
                leave_type: LeaveType::Sick,
                total_days: 14,
                used_days: 0,
            },
        ],
    }
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/tenants/{tenant_id}/employees",
    params(("tenant_id", Path, description = "Tenant ID")),
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let payload = payload.into_inner();
    payload.compensation.validate()?;

    let employee = Employee {
        id: Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_string(),
        qid: payload.qid.trim().to_string(),
        iban: payload.iban.clone(),
        compensation: payload.compensation,
        join_date: payload.join_date,
        manager_id: payload.manager_id,
        status: EmployeeStatus::Active,
        sponsorship: payload.sponsorship,
        visa_expiry: payload.visa_expiry,
    };

    let actor = auth.actor();
    let created = store.mutate(&tenant_id, |state| {
        if let Some(manager_id) = &employee.manager_id {
            state.employee(manager_id).map_err(|_| {
                AppError::ValidationFailed("manager_id does not reference an employee".to_string())
            })?;
        }
        state.employees.push(employee.clone());
        state.leave_balances.push(default_balance(employee.id.clone()));
        state.record_audit(
            &actor,
            "employee.create",
            format!("Created employee {}", employee.name),
        );
        Ok(employee.clone())
    })?;

    Ok(HttpResponse::Created().json(created))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/employees",
    params(("tenant_id", Path, description = "Tenant ID"), EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let tenant_id = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let status = query.status;

    let (data, total) = store.read(&tenant_id, |state| {
        let filtered: Vec<Employee> = state
            .employees
            .iter()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        let total = filtered.len();
        let page_data: Vec<Employee> = filtered
            .into_iter()
            .skip((page as usize - 1) * per_page as usize)
            .take(per_page as usize)
            .collect();
        (page_data, total)
    })?;

    debug!(tenant_id, page, per_page, total, "Listing employees");

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let employee = store.read(&tenant_id, |s| s.employee(&employee_id).cloned())??;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let payload = payload.into_inner();
    if let Some(comp) = &payload.compensation {
        comp.validate()?;
    }

    let actor = auth.actor();
    let updated = store.mutate(&tenant_id, |state| {
        let employee = state.employee_mut(&employee_id)?;
        if let Some(name) = &payload.name {
            employee.name = name.trim().to_string();
        }
        if let Some(email) = &payload.email {
            employee.email = email.trim().to_string();
        }
        if let Some(qid) = &payload.qid {
            employee.qid = qid.trim().to_string();
        }
        if let Some(iban) = &payload.iban {
            employee.iban = iban.clone();
        }
        if let Some(comp) = &payload.compensation {
            employee.compensation = comp.clone();
        }
        if let Some(manager_id) = &payload.manager_id {
            employee.manager_id = Some(manager_id.clone());
        }
        if let Some(sponsorship) = &payload.sponsorship {
            employee.sponsorship = Some(sponsorship.clone());
        }
        if payload.visa_expiry.is_some() {
            employee.visa_expiry = payload.visa_expiry;
        }
        let updated = employee.clone();
        state.record_audit(
            &actor,
            "employee.update",
            format!("Updated employee {}", updated.name),
        );
        Ok(updated)
    })?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deactivate Employee
///
/// Soft delete: payroll runs and audit entries keep referencing the record,
/// so it is never physically removed.
#[utoipa::path(
    delete,
    path = "/api/tenants/{tenant_id}/employees/{employee_id}",
    params(
        ("tenant_id", Path, description = "Tenant ID"),
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee deactivated", body = Object, example = json!({
            "message": "Employee deactivated"
        })),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee already inactive")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (tenant_id, employee_id) = path.into_inner();
    auth.require_tenant(&tenant_id)?;

    let actor = auth.actor();
    store.mutate(&tenant_id, |state| {
        let employee = state.employee_mut(&employee_id)?;
        if employee.status == EmployeeStatus::Inactive {
            return Err(AppError::InvalidState(
                "Employee already inactive".to_string(),
            ));
        }
        employee.status = EmployeeStatus::Inactive;
        let name = employee.name.clone();
        state.record_audit(
            &actor,
            "employee.deactivate",
            format!("Deactivated employee {name}"),
        );
        Ok(())
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deactivated"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_access_token;
    use crate::auth::otp::OtpService;
    use crate::config::Config;
    use crate::model::user::User;
    use crate::routes;
    use crate::store::test_support::tenant;
    use crate::utils::assistant::Assistant;
    use actix_web::{App, test, web::Data};

    fn test_config() -> Config {
        Config {
            server_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            data_file: "/dev/null".to_string(),
            access_token_ttl: 900,
            otp_ttl_secs: 300,
            flush_interval_ms: 2000,
            rate_auth_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
        }
    }

    fn token_for(tenant_id: &str) -> String {
        let user = User {
            id: "u1".to_string(),
            email: "hr@test.example".to_string(),
            name: "HR Person".to_string(),
        };
        generate_access_token(&user, tenant_id, "test-secret", 900)
    }

    fn create_payload() -> serde_json::Value {
        json!({
            "name": "John Doe",
            "email": "john@test.example",
            "qid": "28912345678",
            "iban": "QA00TESTIBAN",
            "compensation": { "basic_salary": 6000.0, "allowances": 1500.0, "deductions": 200.0 },
            "join_date": "2026-01-01"
        })
    }

    macro_rules! test_app {
        ($store:expr) => {{
            let config = test_config();
            let config_for_routes = config.clone();
            test::init_service(
                App::new()
                    .app_data($store.clone())
                    .app_data(Data::new(OtpService::new(300)))
                    .app_data(Data::new(Assistant::unconfigured()))
                    .app_data(Data::new(config))
                    .configure(move |cfg| routes::configure(cfg, config_for_routes.clone())),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn create_and_list_employee() {
        let store = Data::new(Store::new());
        store.create_tenant(tenant("t1")).unwrap();
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/tenants/t1/employees")
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token_for("t1"))))
            .set_json(create_payload())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let req = test::TestRequest::get()
            .uri("/api/tenants/t1/employees")
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token_for("t1"))))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["name"], "John Doe");
        // Onboarding also provisions the leave balance record.
        assert_eq!(store.read("t1", |s| s.leave_balances.len()).unwrap(), 1);
    }

    #[actix_web::test]
    async fn pagination_survives_extreme_page_numbers() {
        let store = Data::new(Store::new());
        store.create_tenant(tenant("t1")).unwrap();
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/tenants/t1/employees")
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token_for("t1"))))
            .set_json(create_payload())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        // u32::MAX page with per_page=100 must page past the data, not wrap.
        let req = test::TestRequest::get()
            .uri("/api/tenants/t1/employees?page=4294967295&per_page=100")
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token_for("t1"))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn token_for_another_tenant_is_forbidden() {
        let store = Data::new(Store::new());
        store.create_tenant(tenant("t1")).unwrap();
        store.create_tenant(tenant("t2")).unwrap();
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/tenants/t1/employees")
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token_for("t2"))))
            .set_json(create_payload())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        assert_eq!(store.read("t1", |s| s.employees.len()).unwrap(), 0);
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        let store = Data::new(Store::new());
        store.create_tenant(tenant("t1")).unwrap();
        let app = test_app!(store);

        let req = test::TestRequest::get()
            .uri("/api/tenants/t1/employees")
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn negative_compensation_is_a_bad_request() {
        let store = Data::new(Store::new());
        store.create_tenant(tenant("t1")).unwrap();
        let app = test_app!(store);

        let mut payload = create_payload();
        payload["compensation"]["basic_salary"] = json!(-10.0);
        let req = test::TestRequest::post()
            .uri("/api/tenants/t1/employees")
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token_for("t1"))))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
