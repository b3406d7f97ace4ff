use crate::api::assistant::GenerateRequest;
use crate::api::audit::{AuditListResponse, AuditQuery};
use crate::api::employee::{
    CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee,
};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse, UpdateBalance};
use crate::api::payroll::{
    CreateRun, LeaveSlipRequest, RunListResponse, RunQuery, SettlementRequest,
};
use crate::api::tenant::CreateTenant;
use crate::auth::handlers::{RequestCode, VerifyCode};
use crate::model::audit::AuditLog;
use crate::model::compliance::ComplianceSettings;
use crate::model::employee::{Compensation, Employee};
use crate::model::leave::{LeaveBalance, LeaveBalanceEntry, LeaveRequest};
use crate::model::payroll::{Payslip, PayrollRun};
use crate::model::tenant::Tenant;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll & Workforce Compliance API",
        version = "1.0.0",
        description = r#"
## Multi-tenant HR & Payroll Engine

Tenant-partitioned record store with a payroll-run processor, leave-balance
ledger, end-of-service settlement calculator and WPS/SIF compliance file
generation.

### Key Features
- **Employees**: onboarding, updates, soft deactivation
- **Leave**: requests, approval-driven balance ledger
- **Payroll**: immutable runs with bank-submittable SIF payloads
- **Settlement**: monthly / leave / final-settlement payslips with gratuity
- **Audit**: append-only per-tenant trail

### Security
Login is one-time-code based; all tenant-scoped endpoints require a
**JWT Bearer token** bound to that tenant.
"#,
    ),
    paths(
        crate::auth::handlers::request_code,
        crate::auth::handlers::verify_code,

        crate::api::tenant::create_tenant,
        crate::api::tenant::list_tenants,
        crate::api::tenant::get_compliance,
        crate::api::tenant::put_compliance,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::get_balance,
        crate::api::leave_request::update_balance,

        crate::api::payroll::run_payroll,
        crate::api::payroll::list_runs,
        crate::api::payroll::get_run,
        crate::api::payroll::download_sif,
        crate::api::payroll::monthly_payslip,
        crate::api::payroll::leave_payslip,
        crate::api::payroll::final_settlement,

        crate::api::audit::list_audit,
        crate::api::assistant::generate
    ),
    components(
        schemas(
            RequestCode,
            VerifyCode,
            CreateTenant,
            Tenant,
            ComplianceSettings,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Employee,
            Compensation,
            CreateLeave,
            LeaveFilter,
            LeaveListResponse,
            LeaveRequest,
            LeaveBalance,
            LeaveBalanceEntry,
            UpdateBalance,
            CreateRun,
            RunQuery,
            RunListResponse,
            PayrollRun,
            Payslip,
            LeaveSlipRequest,
            SettlementRequest,
            AuditQuery,
            AuditListResponse,
            AuditLog,
            GenerateRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "One-time-code login APIs"),
        (name = "Tenant", description = "Tenant and compliance settings APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Leave", description = "Leave request and balance ledger APIs"),
        (name = "Payroll", description = "Payroll run and SIF APIs"),
        (name = "Payslip", description = "Settlement calculator APIs"),
        (name = "Audit", description = "Audit trail APIs"),
        (name = "Assistant", description = "Generative-text APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
