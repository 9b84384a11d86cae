use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Monthly payment-history row. `net_salary` is derived at write time
/// (base + bonus - deductions) and stored for listing.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    #[schema(example = 1)]
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    pub month: NaiveDate,
    pub base_salary: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub net_salary: f64,
}
