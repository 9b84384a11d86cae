pub mod attendance;
pub mod department;
pub mod employee;
pub mod inquiry;
pub mod job_title;
pub mod payroll;
pub mod role;
pub mod schedule;
pub mod task;
