use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::audit::{Actor, AuditLog};
use crate::model::compliance::ComplianceSettings;
use crate::model::employee::Employee;
use crate::model::leave::{LeaveBalance, LeaveRequest};
use crate::model::payroll::PayrollRun;
use crate::model::tenant::Tenant;
use crate::model::user::User;

pub mod bootstrap;
pub mod persist;

/// All record collections belonging to one tenant. Collections are replaced
/// wholesale under the tenant lock; nothing hands out references into the
/// live state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantState {
    pub tenant: Tenant,
    pub employees: Vec<Employee>,
    pub leave_requests: Vec<LeaveRequest>,
    pub leave_balances: Vec<LeaveBalance>,
    pub payroll_runs: Vec<PayrollRun>,
    pub users: Vec<User>,
    /// Most-recent-first.
    pub audit_log: Vec<AuditLog>,
    pub compliance: Option<ComplianceSettings>,
}

impl TenantState {
    pub fn new(tenant: Tenant) -> Self {
        Self {
            tenant,
            employees: Vec::new(),
            leave_requests: Vec::new(),
            leave_balances: Vec::new(),
            payroll_runs: Vec::new(),
            users: Vec::new(),
            audit_log: Vec::new(),
            compliance: None,
        }
    }

    pub fn employee(&self, id: &str) -> Result<&Employee, AppError> {
        self.employees
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
    }

    pub fn employee_mut(&mut self, id: &str) -> Result<&mut Employee, AppError> {
        self.employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
    }

    pub fn leave_request(&self, id: &str) -> Result<&LeaveRequest, AppError> {
        self.leave_requests
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("Leave request not found".to_string()))
    }

    pub fn balance_for(&self, employee_id: &str) -> Result<&LeaveBalance, AppError> {
        self.leave_balances
            .iter()
            .find(|b| b.employee_id == employee_id)
            .ok_or_else(|| AppError::NotFound("Leave balance not found".to_string()))
    }

    pub fn balance_for_mut(&mut self, employee_id: &str) -> Result<&mut LeaveBalance, AppError> {
        self.leave_balances
            .iter_mut()
            .find(|b| b.employee_id == employee_id)
            .ok_or_else(|| AppError::NotFound("Leave balance not found".to_string()))
    }

    pub fn payroll_run(&self, id: &str) -> Result<&PayrollRun, AppError> {
        self.payroll_runs
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("Payroll run not found".to_string()))
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Prepend one audit entry (most-recent-first read order).
    pub fn record_audit(&mut self, actor: &Actor, action: &str, detail: String) {
        self.audit_log.insert(
            0,
            AuditLog {
                id: Uuid::new_v4().to_string(),
                actor_id: actor.id.clone(),
                actor_name: actor.name.clone(),
                action: action.to_string(),
                detail,
                at: Utc::now(),
            },
        );
    }
}

/// Tenant record store. One mutex per tenant serializes that tenant's
/// mutations; different tenants proceed independently. Constructed once at
/// startup and injected through `web::Data` — no ambient globals.
pub struct Store {
    tenants: RwLock<HashMap<String, Arc<Mutex<TenantState>>>>,
    dirty: AtomicBool,
}

impl Store {
    pub fn new() -> Self {
        Self::from_tenants(HashMap::new())
    }

    pub fn from_tenants(tenants: HashMap<String, TenantState>) -> Self {
        let tenants = tenants
            .into_iter()
            .map(|(id, state)| (id, Arc::new(Mutex::new(state))))
            .collect();
        Self {
            tenants: RwLock::new(tenants),
            dirty: AtomicBool::new(false),
        }
    }

    fn tenant_cell(&self, tenant_id: &str) -> Result<Arc<Mutex<TenantState>>, AppError> {
        self.tenants
            .read()
            .unwrap()
            .get(tenant_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))
    }

    pub fn create_tenant(&self, tenant: Tenant) -> Result<(), AppError> {
        let mut map = self.tenants.write().unwrap();
        if map.contains_key(&tenant.id) {
            return Err(AppError::InvalidState("Tenant already exists".to_string()));
        }
        debug!(tenant_id = %tenant.id, "Creating tenant");
        map.insert(
            tenant.id.clone(),
            Arc::new(Mutex::new(TenantState::new(tenant))),
        );
        drop(map);
        self.mark_dirty();
        Ok(())
    }

    pub fn has_tenant(&self, tenant_id: &str) -> bool {
        self.tenants.read().unwrap().contains_key(tenant_id)
    }

    pub fn list_tenants(&self) -> Vec<Tenant> {
        let map = self.tenants.read().unwrap();
        let mut tenants: Vec<Tenant> = map
            .values()
            .map(|cell| cell.lock().unwrap().tenant.clone())
            .collect();
        tenants.sort_by(|a, b| a.id.cmp(&b.id));
        tenants
    }

    /// Read access. The closure sees the live state under the tenant lock;
    /// anything returned must be owned, which keeps snapshot semantics.
    pub fn read<R>(
        &self,
        tenant_id: &str,
        f: impl FnOnce(&TenantState) -> R,
    ) -> Result<R, AppError> {
        let cell = self.tenant_cell(tenant_id)?;
        let guard = cell.lock().unwrap();
        Ok(f(&guard))
    }

    /// Serialized read-modify-write for one tenant. The closure runs on a
    /// working copy; on `Ok` the copy replaces the tenant state in one step,
    /// on `Err` nothing is published — a failed mutation leaves the store in
    /// its pre-call state.
    pub fn mutate<R>(
        &self,
        tenant_id: &str,
        f: impl FnOnce(&mut TenantState) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let cell = self.tenant_cell(tenant_id)?;
        let mut guard = cell.lock().unwrap();
        let mut working = guard.clone();
        let out = f(&mut working)?;
        *guard = working;
        drop(guard);
        self.mark_dirty();
        Ok(out)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clears and returns the dirty flag; used by the flush task.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Full snapshot of every tenant, for the persistence codec.
    pub fn export(&self) -> HashMap<String, TenantState> {
        let map = self.tenants.read().unwrap();
        map.iter()
            .map(|(id, cell)| (id.clone(), cell.lock().unwrap().clone()))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::employee::{Compensation, EmployeeStatus};
    use crate::model::tenant::SubscriptionTier;
    use chrono::NaiveDate;

    pub fn tenant(id: &str) -> Tenant {
        Tenant {
            id: id.to_string(),
            name: format!("{id} Inc"),
            tier: SubscriptionTier::Free,
            created_at: Utc::now(),
        }
    }

    pub fn actor() -> Actor {
        Actor {
            id: "tester".to_string(),
            name: "Tester".to_string(),
        }
    }

    pub fn employee(id: &str, basic: f64) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Emp {id}"),
            email: format!("{id}@test.example"),
            qid: format!("QID{id}"),
            iban: format!("QA00TEST{id}"),
            compensation: Compensation {
                basic_salary: basic,
                allowances: 0.0,
                deductions: 0.0,
            },
            join_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            manager_id: None,
            status: EmployeeStatus::Active,
            sponsorship: None,
            visa_expiry: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn store_with(ids: &[&str]) -> Store {
        let store = Store::new();
        for id in ids {
            store.create_tenant(tenant(id)).unwrap();
        }
        store
    }

    #[test]
    fn missing_tenant_is_not_found() {
        let store = Store::new();
        let err = store.read("ghost", |_| ()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn duplicate_tenant_is_rejected() {
        let store = store_with(&["a"]);
        assert!(matches!(
            store.create_tenant(tenant("a")),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn mutating_one_tenant_leaves_others_untouched() {
        let store = store_with(&["a", "b"]);
        store
            .mutate("a", |state| {
                state.employees.push(employee("e1", 5000.0));
                state.record_audit(&actor(), "employee.create", "Created e1".to_string());
                Ok(())
            })
            .unwrap();

        let a_count = store.read("a", |s| s.employees.len()).unwrap();
        let b_count = store.read("b", |s| s.employees.len()).unwrap();
        let b_audit = store.read("b", |s| s.audit_log.len()).unwrap();
        assert_eq!(a_count, 1);
        assert_eq!(b_count, 0);
        assert_eq!(b_audit, 0);
    }

    #[test]
    fn failed_mutation_publishes_nothing() {
        let store = store_with(&["a"]);
        let err = store
            .mutate("a", |state| -> Result<(), AppError> {
                state.employees.push(employee("e1", 5000.0));
                state.record_audit(&actor(), "employee.create", "Created e1".to_string());
                Err(AppError::ValidationFailed("boom".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(_)));

        assert_eq!(store.read("a", |s| s.employees.len()).unwrap(), 0);
        assert_eq!(store.read("a", |s| s.audit_log.len()).unwrap(), 0);
    }

    #[test]
    fn reads_return_owned_snapshots() {
        let store = store_with(&["a"]);
        store
            .mutate("a", |state| {
                state.employees.push(employee("e1", 5000.0));
                Ok(())
            })
            .unwrap();

        let mut snapshot = store.read("a", |s| s.employees.clone()).unwrap();
        snapshot[0].name = "mutated locally".to_string();

        let name = store.read("a", |s| s.employees[0].name.clone()).unwrap();
        assert_eq!(name, "Emp e1");
    }

    #[test]
    fn audit_log_reads_most_recent_first() {
        let store = store_with(&["a"]);
        store
            .mutate("a", |state| {
                state.record_audit(&actor(), "first", "first".to_string());
                state.record_audit(&actor(), "second", "second".to_string());
                Ok(())
            })
            .unwrap();

        let actions = store
            .read("a", |s| {
                s.audit_log.iter().map(|e| e.action.clone()).collect::<Vec<_>>()
            })
            .unwrap();
        assert_eq!(actions, vec!["second", "first"]);
    }

    #[test]
    fn mutation_marks_store_dirty() {
        let store = store_with(&["a"]);
        store.take_dirty();
        store
            .mutate("a", |state| {
                state.employees.push(employee("e1", 100.0));
                Ok(())
            })
            .unwrap();
        assert!(store.take_dirty());
        assert!(!store.take_dirty());
    }
}
