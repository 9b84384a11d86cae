use actix_web::{HttpResponse, Responder, error::ErrorBadRequest, web};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    config::Config,
    model::attendance::AttendanceLog,
    timeclock::{
        AttendanceStatus, ComputedHours, classify_attendance, compute_hours, format_clock,
        parse_clock,
    },
    utils::{
        db_utils::{build_update_sql, execute_update},
        policy_cache,
    },
};

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = 1001)]
    pub employee_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = 1001)]
    pub employee_id: u64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LogQuery {
    #[schema(example = 1001)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    /// Filter by work day
    pub date: Option<NaiveDate>,
    #[schema(example = "Late")]
    /// Filter by attendance status
    pub status: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

/// A log row with its hour buckets recomputed on read.
#[derive(Serialize, ToSchema)]
pub struct LogResponse {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "09:15")]
    pub clock_in: String,
    #[schema(example = "18:00")]
    pub clock_out: String,
    #[schema(example = "Late")]
    pub status: String,
    #[schema(example = 8.8)]
    pub total_hrs: f64,
    #[schema(example = 8.0)]
    pub regular_hrs: f64,
    #[schema(example = 0.8)]
    pub overtime: f64,
}

#[derive(Serialize, ToSchema)]
pub struct LogListResponse {
    pub data: Vec<LogResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLog {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    /// "HH:MM", "--" or omitted for no clock-in
    #[schema(example = "09:15")]
    pub clock_in: Option<String>,
    /// "HH:MM", "--" or omitted for no clock-out
    #[schema(example = "18:00")]
    pub clock_out: Option<String>,
    /// Defaults to Present
    #[schema(example = "Late")]
    pub status: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Date(NaiveDate),
    Str(&'a str),
}

fn log_response(row: AttendanceLog, hours: ComputedHours) -> LogResponse {
    let hours = hours.rounded();
    LogResponse {
        id: row.id,
        employee_id: row.employee_id,
        date: row.date,
        clock_in: format_clock(row.clock_in),
        clock_out: format_clock(row.clock_out),
        status: row.status,
        total_hrs: hours.total,
        regular_hrs: hours.regular,
        overtime: hours.overtime,
    }
}

/// Hours for a stored row. A row that cannot be computed (unknown status,
/// inverted clocks from old manual edits) reports zeros with a warning
/// rather than failing the listing.
fn hours_or_zero(row: &AttendanceLog, policy: &crate::timeclock::ShiftPolicy) -> ComputedHours {
    AttendanceStatus::parse(&row.status)
        .and_then(|status| compute_hours(row.clock_in, row.clock_out, status, policy))
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, log_id = row.id, "Hour computation failed, reporting zeros");
            ComputedHours::zero()
        })
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "status": "Present"
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now();
    let today = now.date_naive();
    let clock_in = now.time();

    let policy = policy_cache::policy_for(pool.get_ref(), employee_id, &config.default_policy).await;
    if !policy.is_work_day(today.weekday()) {
        tracing::warn!(employee_id, day = %today.weekday(), "Check-in on a non-work day");
    }
    let status = classify_attendance(Some(clock_in), &policy);

    let result = sqlx::query(
        r#"
        INSERT INTO attendance_logs (employee_id, date, clock_in, status)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(today)
    .bind(clock_in)
    .bind(status.to_string())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Checked in successfully",
            "status": status.to_string()
        }))),

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckOutRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now();

    let result = sqlx::query(
        r#"
        UPDATE attendance_logs
        SET clock_out = ?
        WHERE employee_id = ?
        AND date = ?
        AND clock_out IS NULL
        "#,
    )
    .bind(now.time())
    .bind(employee_id)
    .bind(now.date_naive())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

/// Attendance log listing with recomputed hour buckets
#[utoipa::path(
    get,
    path = "/api/v1/attendance/logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Paginated attendance logs", body = LogListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_logs(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<LogQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }

    if let Some(date) = query.date {
        where_sql.push_str(" AND date = ?");
        args.push(FilterValue::Date(date));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM attendance_logs{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count attendance logs");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, date, clock_in, clock_out, status
        FROM attendance_logs
        {}
        ORDER BY date DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceLog>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance logs");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // Derived values, recompute-on-read
    let mut data = Vec::with_capacity(rows.len());
    for row in rows {
        let policy =
            policy_cache::policy_for(pool.get_ref(), row.employee_id, &config.default_policy).await;
        let hours = hours_or_zero(&row, &policy);
        data.push(log_response(row, hours));
    }

    Ok(HttpResponse::Ok().json(LogListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Manual log entry (admin "Add Logs" form)
#[utoipa::path(
    post,
    path = "/api/v1/attendance/logs",
    request_body = CreateLog,
    responses(
        (status = 200, description = "Log created with computed hours", body = Object, example = json!({
            "message": "Attendance log created",
            "total_hrs": 8.8,
            "regular_hrs": 8.0,
            "overtime": 0.8
        })),
        (status = 400, description = "Invalid clock time or status"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_log(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateLog>,
) -> actix_web::Result<impl Responder> {
    // Normalize all "absent" representations at the boundary.
    let clock_in =
        parse_clock(payload.clock_in.as_deref().unwrap_or("--")).map_err(|e| ErrorBadRequest(e.to_string()))?;
    let clock_out =
        parse_clock(payload.clock_out.as_deref().unwrap_or("--")).map_err(|e| ErrorBadRequest(e.to_string()))?;

    let status = match payload.status.as_deref() {
        Some(raw) => AttendanceStatus::parse(raw).map_err(|e| ErrorBadRequest(e.to_string()))?,
        None => AttendanceStatus::default(),
    };

    let policy =
        policy_cache::policy_for(pool.get_ref(), payload.employee_id, &config.default_policy).await;

    // Reject inverted clocks before anything is stored.
    let hours = compute_hours(clock_in, clock_out, status, &policy)
        .map_err(|e| ErrorBadRequest(e.to_string()))?
        .rounded();

    sqlx::query(
        r#"
        INSERT INTO attendance_logs (employee_id, date, clock_in, clock_out, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.date)
    .bind(clock_in)
    .bind(clock_out)
    .bind(status.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to create attendance log");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance log created",
        "total_hrs": hours.total,
        "regular_hrs": hours.regular,
        "overtime": hours.overtime
    })))
}

/// Partial edit of a log row
#[utoipa::path(
    put,
    path = "/api/v1/attendance/logs/{log_id}",
    params(
        ("log_id", Path, description = "Attendance log ID")
    ),
    responses(
        (status = 200, description = "Log updated successfully"),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Log not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_log(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> actix_web::Result<impl Responder> {
    let log_id = path.into_inner();

    // Status edits must stay within the five known literals.
    if let Some(status) = body.get("status").and_then(|v| v.as_str()) {
        AttendanceStatus::parse(status).map_err(|e| ErrorBadRequest(e.to_string()))?;
    }
    for field in ["clock_in", "clock_out"] {
        if let Some(raw) = body.get(field).and_then(|v| v.as_str()) {
            parse_clock(raw).map_err(|e| ErrorBadRequest(e.to_string()))?;
        }
    }

    let update = build_update_sql("attendance_logs", &body, "id", log_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, log_id, "Failed to update attendance log");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Attendance log not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance log updated"
    })))
}
