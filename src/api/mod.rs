pub mod assistant;
pub mod audit;
pub mod employee;
pub mod leave_request;
pub mod payroll;
pub mod tenant;
