pub mod audit;
pub mod compliance;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod tenant;
pub mod user;
