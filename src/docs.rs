use crate::api::attendance::{
    CheckInRequest, CheckOutRequest, CreateLog, LogListResponse, LogQuery, LogResponse,
};
use crate::api::department::{AssignDepartment, CreateDepartment};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::inquiry::{DeclineInquiry, InquiryFilter, SubmitInquiry};
use crate::api::payroll::{
    CreatePayroll, HoursSummaryQuery, HoursSummaryResponse, PaginatedPayrollResponse,
    PayrollQuery, UpdatePayroll,
};
use crate::api::schedule::{CreateSchedule, ScheduleQuery, UpdateSchedule};
use crate::api::task::{CreateTask, TaskQuery};
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::job_title::JobTitle;
use crate::model::payroll::Payroll;
use crate::timeclock::AttendanceStatus;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce Management API",
        version = "1.0.0",
        description = r#"
## Workforce Management System

This API powers a workforce-management dashboard covering the day-to-day
HR operations of an organization.

### Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Attendance**
  - Daily check-in/check-out with automatic Present/Late/Absent classification
  - Attendance logs with total / regular / overtime hours recomputed on read
- **Scheduling**
  - Work schedules carrying per-employee shift policies (work days, grace periods, hour caps)
- **Tasks**
  - Assignment and status tracking
- **Inquiries**
  - Submit, approve, and decline employee inquiries
- **Payroll**
  - Payment history and aggregated period hour summaries

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_logs,
        crate::api::attendance::create_log,
        crate::api::attendance::update_log,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::list_job_titles,

        crate::api::department::list_departments,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,
        crate::api::department::assign_department,

        crate::api::schedule::create_schedule,
        crate::api::schedule::list_schedules,
        crate::api::schedule::get_schedule,
        crate::api::schedule::update_schedule,
        crate::api::schedule::delete_schedule,

        crate::api::task::create_task,
        crate::api::task::list_tasks,
        crate::api::task::update_task,
        crate::api::task::delete_task,

        crate::api::inquiry::submit_inquiry,
        crate::api::inquiry::list_inquiries,
        crate::api::inquiry::approve_inquiry,
        crate::api::inquiry::decline_inquiry,

        crate::api::payroll::create_payroll,
        crate::api::payroll::update_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::hours_summary
    ),
    components(
        schemas(
            AttendanceStatus,
            CheckInRequest,
            CheckOutRequest,
            LogQuery,
            LogResponse,
            LogListResponse,
            CreateLog,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Employee,
            JobTitle,
            Department,
            CreateDepartment,
            AssignDepartment,
            CreateSchedule,
            UpdateSchedule,
            ScheduleQuery,
            CreateTask,
            TaskQuery,
            SubmitInquiry,
            DeclineInquiry,
            InquiryFilter,
            CreatePayroll,
            UpdatePayroll,
            Payroll,
            PayrollQuery,
            PaginatedPayrollResponse,
            HoursSummaryQuery,
            HoursSummaryResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance and time-accounting APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "Schedule", description = "Work schedule and shift policy APIs"),
        (name = "Task", description = "Task assignment APIs"),
        (name = "Inquiry", description = "Inquiry approval workflow APIs"),
        (name = "Payroll", description = "Payroll and period hours APIs"),
    )
)]
pub struct ApiDoc;
