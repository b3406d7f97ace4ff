//! Leave balance ledger. Approval mutates the balance and the request status
//! in one tenant commit, so no observer ever sees an approved request with an
//! un-incremented balance.

use crate::engine::settlement::days_between_inclusive;
use crate::error::AppError;
use crate::model::audit::Actor;
use crate::model::leave::{LeaveRequest, LeaveStatus};
use crate::store::Store;

pub fn approve(
    store: &Store,
    tenant_id: &str,
    request_id: &str,
    actor: &Actor,
) -> Result<LeaveRequest, AppError> {
    store.mutate(tenant_id, |state| {
        let request = state.leave_request(request_id)?.clone();
        if request.status != LeaveStatus::Pending {
            return Err(AppError::InvalidState(
                "Leave request already processed".to_string(),
            ));
        }

        let days = days_between_inclusive(request.start_date, request.end_date)?;

        let balance = state.balance_for_mut(&request.employee_id)?;
        let entry = balance.entry_mut(request.leave_type).ok_or_else(|| {
            AppError::InvalidState(format!(
                "No {} leave balance configured for employee",
                request.leave_type
            ))
        })?;
        if days > entry.remaining() {
            return Err(AppError::InvalidState(format!(
                "Insufficient {} leave balance: {} day(s) requested, {} remaining",
                request.leave_type,
                days,
                entry.remaining()
            )));
        }
        entry.used_days += days;

        let stored = state
            .leave_requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .expect("request existed above");
        stored.status = LeaveStatus::Approved;
        let approved = stored.clone();

        state.record_audit(
            actor,
            "leave.approve",
            format!(
                "Approved {} day(s) of {} leave for employee {}",
                days, request.leave_type, request.employee_id
            ),
        );
        Ok(approved)
    })
}

pub fn reject(
    store: &Store,
    tenant_id: &str,
    request_id: &str,
    actor: &Actor,
) -> Result<LeaveRequest, AppError> {
    store.mutate(tenant_id, |state| {
        let status = state.leave_request(request_id)?.status;
        if status != LeaveStatus::Pending {
            return Err(AppError::InvalidState(
                "Leave request already processed".to_string(),
            ));
        }

        let stored = state
            .leave_requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .expect("request existed above");
        stored.status = LeaveStatus::Rejected;
        let rejected = stored.clone();

        state.record_audit(
            actor,
            "leave.reject",
            format!("Rejected leave request for employee {}", rejected.employee_id),
        );
        Ok(rejected)
    })
}
