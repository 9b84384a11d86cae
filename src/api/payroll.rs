use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::{
    config::Config,
    model::{attendance::AttendanceLog, payroll::Payroll},
    timeclock::{AttendanceStatus, ComputedHours, aggregate, compute_hours},
    utils::policy_cache,
};

#[derive(Deserialize, ToSchema)]
pub struct CreatePayroll {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    pub month: NaiveDate,

    #[schema(example = 50000.0)]
    pub base_salary: f64,

    #[schema(example = 5000.0)]
    pub bonus: f64,

    #[schema(example = 2000.0)]
    pub deductions: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePayroll {
    #[schema(example = 52000.0)]
    pub base_salary: Option<f64>,

    #[schema(example = 6000.0)]
    pub bonus: Option<f64>,

    #[schema(example = 2500.0)]
    pub deductions: Option<f64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<Payroll>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HoursSummaryQuery {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    pub from: NaiveDate,
    #[schema(example = "2025-02-28", value_type = String, format = "date")]
    pub to: NaiveDate,
}

/// Period hour totals for payroll, aggregated before rounding.
#[derive(Serialize, ToSchema)]
pub struct HoursSummaryResponse {
    pub employee_id: u64,
    #[schema(value_type = String, format = "date")]
    pub from: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub to: NaiveDate,
    /// Rows that contributed hours
    pub days_counted: u32,
    /// Rows skipped as not computable (missing clocks or bad data)
    pub days_skipped: u32,
    #[schema(example = 160.3)]
    pub total_hrs: f64,
    #[schema(example = 152.0)]
    pub regular_hrs: f64,
    #[schema(example = 8.3)]
    pub overtime: f64,
}

#[utoipa::path(
    post,
    path = "/api/v1/payroll",
    request_body = CreatePayroll,
    responses(
        (status = 201, description = "Payroll created"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn create_payroll(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePayroll>,
) -> actix_web::Result<impl Responder> {
    let net_salary = payload.base_salary + payload.bonus - payload.deductions;

    sqlx::query(
        r#"
        INSERT INTO payroll
        (employee_id, month, base_salary, bonus, deductions, net_salary)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.month)
    .bind(payload.base_salary)
    .bind(payload.bonus)
    .bind(payload.deductions)
    .bind(net_salary)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to create payroll");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Payroll created successfully"
    })))
}

/// Update Payroll (net salary is re-derived from the merged values)
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", Path, description = "Payroll ID")
    ),
    request_body = UpdatePayroll,
    responses(
        (status = 200, description = "Payroll updated"),
        (status = 404, description = "Payroll not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn update_payroll(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdatePayroll>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let existing = sqlx::query_as::<_, Payroll>(r#"SELECT * FROM payroll WHERE id = ?"#)
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to fetch payroll for update");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(existing) = existing else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Payroll not found"
        })));
    };

    let base_salary = payload.base_salary.unwrap_or(existing.base_salary);
    let bonus = payload.bonus.unwrap_or(existing.bonus);
    let deductions = payload.deductions.unwrap_or(existing.deductions);
    let net_salary = base_salary + bonus - deductions;

    sqlx::query(
        r#"
        UPDATE payroll
        SET base_salary = ?, bonus = ?, deductions = ?, net_salary = ?
        WHERE id = ?
        "#,
    )
    .bind(base_salary)
    .bind(bonus)
    .bind(deductions)
    .bind(net_salary)
    .bind(payroll_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, payroll_id, "Failed to update payroll");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll updated successfully"
    })))
}

/// Get Payroll by ID
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", Path, description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll found"),
        (status = 404, description = "Payroll not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn get_payroll(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let payroll = sqlx::query_as::<_, Payroll>(r#"SELECT * FROM payroll WHERE id = ?"#)
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match payroll {
        Some(row) => Ok(HttpResponse::Ok().json(row)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Payroll not found"
        }))),
    }
}

/// Payroll listing
#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "Paginated payroll list", body = PaginatedPayrollResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let (count_sql, data_sql) = if query.employee_id.is_some() {
        (
            "SELECT COUNT(*) FROM payroll WHERE employee_id = ?",
            "SELECT * FROM payroll WHERE employee_id = ? ORDER BY month DESC LIMIT ? OFFSET ?",
        )
    } else {
        (
            "SELECT COUNT(*) FROM payroll",
            "SELECT * FROM payroll ORDER BY month DESC LIMIT ? OFFSET ?",
        )
    };

    let mut count_q = sqlx::query_scalar::<_, i64>(count_sql);
    let mut data_q = sqlx::query_as::<_, Payroll>(data_sql);
    if let Some(employee_id) = query.employee_id {
        count_q = count_q.bind(employee_id);
        data_q = data_q.bind(employee_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count payrolls");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let payrolls = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch payrolls");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data: payrolls,
        page,
        per_page,
        total,
    }))
}

/// Period hour totals for payroll.
///
/// Feeds every attendance row in the range through the time-accounting
/// module and aggregates the unrounded buckets; rounding happens once on
/// the way out. Rows that cannot be computed are counted as skipped, not
/// as zero-hour work days.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/hours-summary",
    params(HoursSummaryQuery),
    responses(
        (status = 200, description = "Aggregated period hours", body = HoursSummaryResponse),
        (status = 400, description = "Invalid date range"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn hours_summary(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<HoursSummaryQuery>,
) -> actix_web::Result<impl Responder> {
    if query.from > query.to {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "from cannot be after to"
        })));
    }

    let rows = sqlx::query_as::<_, AttendanceLog>(
        r#"
        SELECT id, employee_id, date, clock_in, clock_out, status
        FROM attendance_logs
        WHERE employee_id = ?
        AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(query.employee_id)
    .bind(query.from)
    .bind(query.to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = query.employee_id, "Failed to fetch logs for hours summary");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let policy =
        policy_cache::policy_for(pool.get_ref(), query.employee_id, &config.default_policy).await;

    let mut buckets: Vec<ComputedHours> = Vec::with_capacity(rows.len());
    let mut skipped = 0u32;
    for row in &rows {
        match AttendanceStatus::parse(&row.status)
            .and_then(|status| compute_hours(row.clock_in, row.clock_out, status, &policy))
        {
            Ok(hours) if hours != ComputedHours::zero() => buckets.push(hours),
            Ok(_) => skipped += 1,
            Err(e) => {
                tracing::warn!(error = %e, log_id = row.id, "Skipping uncomputable log in hours summary");
                skipped += 1;
            }
        }
    }

    let days_counted = buckets.len() as u32;
    let totals = aggregate(buckets).rounded();

    Ok(HttpResponse::Ok().json(HoursSummaryResponse {
        employee_id: query.employee_id,
        from: query.from,
        to: query.to,
        days_counted,
        days_skipped: skipped,
        total_hrs: totals.total,
        regular_hrs: totals.regular,
        overtime: totals.overtime,
    }))
}
