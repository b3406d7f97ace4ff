use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use super::Store;
use crate::model::compliance::ComplianceSettings;
use crate::model::employee::{Compensation, Employee, EmployeeStatus};
use crate::model::leave::{LeaveBalance, LeaveBalanceEntry, LeaveType};
use crate::model::tenant::{SubscriptionTier, Tenant};
use crate::model::user::User;

pub const DEMO_TENANT_ID: &str = "demo";

/// Seed the demo tenant on first load. Keyed on the fixed tenant id, so
/// re-running after a restart or on an already-populated store is a no-op.
pub fn seed_demo_tenant(store: &Store) -> bool {
    if store.has_tenant(DEMO_TENANT_ID) {
        return false;
    }

    store
        .create_tenant(Tenant {
            id: DEMO_TENANT_ID.to_string(),
            name: "Demo Company WLL".to_string(),
            tier: SubscriptionTier::Premium,
            created_at: Utc::now(),
        })
        .expect("demo tenant id checked above");

    store
        .mutate(DEMO_TENANT_ID, |state| {
            state.compliance = Some(ComplianceSettings {
                establishment_id: "EST-DEMO-001".to_string(),
                bank_name: "Doha Bank".to_string(),
                payer_iban: "QA58DOHB00000000000000000DEMO".to_string(),
            });

            state.users.push(User {
                id: "demo-admin".to_string(),
                email: "admin@demo.example".to_string(),
                name: "Demo Admin".to_string(),
            });

            for (name, basic, allowances) in [
                ("Aisha Rahman", 9000.0, 2000.0),
                ("Carlos Mendes", 6000.0, 1500.0),
            ] {
                let id = Uuid::new_v4().to_string();
                state.employees.push(Employee {
                    id: id.clone(),
                    name: name.to_string(),
                    email: format!(
                        "{}@demo.example",
                        name.to_lowercase().replace(' ', ".")
                    ),
                    qid: format!("289{:08}", state.employees.len() + 1),
                    iban: format!("QA58DOHB0000123456789000{:04}", state.employees.len() + 1),
                    compensation: Compensation {
                        basic_salary: basic,
                        allowances,
                        deductions: 0.0,
                    },
                    join_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
                    manager_id: None,
                    status: EmployeeStatus::Active,
                    sponsorship: Some("company".to_string()),
                    visa_expiry: None,
                });
                state.leave_balances.push(LeaveBalance {
                    employee_id: id,
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
                });
            }
            Ok(())
        })
        .expect("demo tenant exists");

    info!(tenant_id = DEMO_TENANT_ID, "Seeded demo tenant");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_is_idempotent() {
        let store = Store::new();
        assert!(seed_demo_tenant(&store));
        assert!(!seed_demo_tenant(&store));

        let demo_tenants = store
            .list_tenants()
            .into_iter()
            .filter(|t| t.id == DEMO_TENANT_ID)
            .count();
        assert_eq!(demo_tenants, 1);

        let employees = store.read(DEMO_TENANT_ID, |s| s.employees.len()).unwrap();
        assert_eq!(employees, 2);
    }

    #[test]
    fn seeded_tenant_is_payroll_ready() {
        let store = Store::new();
        seed_demo_tenant(&store);
        let configured = store
            .read(DEMO_TENANT_ID, |s| s.compliance.is_some())
            .unwrap();
        assert!(configured);
    }
}
