use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EM25001",
        "first_name": "Lim",
        "last_name": "Alcovendas",
        "email": "lim.alcovendas@company.com",
        "phone": "+639171234567",
        "department_id": 10,
        "job_title_id": 3,
        "role_id": 3,
        "hire_date": "2025-01-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EM25001")]
    pub employee_code: String,

    #[schema(example = "Lim")]
    pub first_name: String,

    #[schema(example = "Alcovendas")]
    pub last_name: String,

    #[schema(example = "lim.alcovendas@company.com")]
    pub email: String,

    #[schema(example = "+639171234567", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = 10)]
    pub department_id: u64,

    #[schema(example = 3)]
    pub job_title_id: u64,

    /// 1 = admin, 2 = hr, 3 = employee
    #[schema(example = 3)]
    pub role_id: u8,

    #[schema(
        example = "2025-01-01",
        value_type = String,
        format = "date"
    )]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}
