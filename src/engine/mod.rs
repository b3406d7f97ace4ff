pub mod ledger;
pub mod payroll_run;
pub mod settlement;
pub mod sif;
