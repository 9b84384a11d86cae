pub mod attendance;
pub mod department;
pub mod employee;
pub mod inquiry;
pub mod payroll;
pub mod schedule;
pub mod task;
