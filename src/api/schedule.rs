use actix_web::{HttpResponse, Responder, error::ErrorBadRequest, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::{
    model::schedule::{Schedule, parse_work_days},
    timeclock::{ShiftPolicy, parse_clock},
    utils::policy_cache,
};

#[derive(Deserialize, ToSchema)]
pub struct CreateSchedule {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "Development Team Schedule")]
    pub schedule_name: String,
    #[schema(example = "Full Time")]
    pub schedule_type: String,
    #[schema(example = "Standard working hours for the development team")]
    pub description: Option<String>,
    #[schema(example = "2025-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2025-12-31", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[schema(example = json!(["Mon", "Tue", "Wed", "Thu", "Fri"]))]
    pub work_days: Vec<String>,
    /// 24-hour "HH:MM"
    #[schema(example = "07:30")]
    pub work_start: String,
    /// 24-hour "HH:MM"
    #[schema(example = "16:00")]
    pub work_end: String,
    #[schema(example = 15)]
    pub lateness_grace_min: u32,
    #[schema(example = 30)]
    pub absence_grace_min: u32,
    /// Regular-hours cap for Present/Late days
    #[schema(example = 8.0)]
    pub full_day_cap: Option<f64>,
    /// Regular-hours cap for Half Day days
    #[schema(example = 4.0)]
    pub half_day_cap: Option<f64>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSchedule {
    pub schedule_name: Option<String>,
    pub schedule_type: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    pub work_days: Option<Vec<String>>,
    #[schema(example = "07:30")]
    pub work_start: Option<String>,
    #[schema(example = "16:00")]
    pub work_end: Option<String>,
    pub lateness_grace_min: Option<u32>,
    pub absence_grace_min: Option<u32>,
    pub full_day_cap: Option<f64>,
    pub half_day_cap: Option<f64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ScheduleQuery {
    pub employee_id: Option<u64>,
    /// Search by schedule name
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

fn join_work_days(days: &[String]) -> String {
    days.iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Shift boundaries are required times; the `--` sentinel is not a shift.
fn parse_shift_time(field: &str, raw: &str) -> actix_web::Result<NaiveTime> {
    parse_clock(raw)
        .map_err(|e| ErrorBadRequest(e.to_string()))?
        .ok_or_else(|| ErrorBadRequest(format!("{field} must be a HH:MM time")))
}

/// Create Schedule. Policy columns are validated through [`ShiftPolicy`]
/// before anything is stored, so a contradictory grace configuration is a
/// 400 here and can never reach the attendance path.
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateSchedule,
    responses(
        (status = 200, description = "Schedule created", body = Object, example = json!({
            "message": "Schedule created"
        })),
        (status = 400, description = "Invalid shift policy"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn create_schedule(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSchedule>,
) -> actix_web::Result<impl Responder> {
    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let work_days = join_work_days(&payload.work_days);
    let work_start = parse_shift_time("work_start", &payload.work_start)?;
    let work_end = parse_shift_time("work_end", &payload.work_end)?;
    let full_day_cap = payload.full_day_cap.unwrap_or(8.0);
    let half_day_cap = payload.half_day_cap.unwrap_or(4.0);

    ShiftPolicy::new(
        work_start,
        work_end,
        parse_work_days(&work_days).map_err(|e| ErrorBadRequest(e.to_string()))?,
        payload.lateness_grace_min,
        payload.absence_grace_min,
        full_day_cap,
        half_day_cap,
    )
    .map_err(|e| ErrorBadRequest(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO schedules
        (employee_id, schedule_name, schedule_type, description, start_date, end_date,
         work_days, work_start, work_end, lateness_grace_min, absence_grace_min,
         full_day_cap, half_day_cap)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(&payload.schedule_name)
    .bind(&payload.schedule_type)
    .bind(&payload.description)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&work_days)
    .bind(work_start)
    .bind(work_end)
    .bind(payload.lateness_grace_min)
    .bind(payload.absence_grace_min)
    .bind(full_day_cap)
    .bind(half_day_cap)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to create schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    policy_cache::invalidate(payload.employee_id).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Schedule created"
    })))
}

/// Schedule listing
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Paginated schedule list"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn list_schedules(
    pool: web::Data<MySqlPool>,
    query: web::Query<ScheduleQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }

    let like;
    if let Some(search) = query.search.as_deref() {
        where_sql.push_str(" AND schedule_name LIKE ?");
        like = format!("%{}%", search);
        args.push(FilterValue::Str(&like));
    }

    let count_sql = format!("SELECT COUNT(*) FROM schedules{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count schedules");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT *
        FROM schedules
        {}
        ORDER BY start_date DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Schedule>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let schedules = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch schedules");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "data": schedules,
        "page": page,
        "per_page": per_page,
        "total": total
    })))
}

/// Get Schedule by ID
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule found"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn get_schedule(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let schedule_id = path.into_inner();

    let schedule = sqlx::query_as::<_, Schedule>(r#"SELECT * FROM schedules WHERE id = ?"#)
        .bind(schedule_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, schedule_id, "Failed to fetch schedule");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match schedule {
        Some(row) => Ok(HttpResponse::Ok().json(row)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Schedule not found"
        }))),
    }
}

/// Update Schedule. The merged row must still describe a valid policy;
/// the cache entry for the employee is refreshed on success.
#[utoipa::path(
    put,
    path = "/api/v1/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    request_body = UpdateSchedule,
    responses(
        (status = 200, description = "Schedule updated"),
        (status = 400, description = "Invalid shift policy"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn update_schedule(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateSchedule>,
) -> actix_web::Result<impl Responder> {
    let schedule_id = path.into_inner();

    let existing = sqlx::query_as::<_, Schedule>(r#"SELECT * FROM schedules WHERE id = ?"#)
        .bind(schedule_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, schedule_id, "Failed to fetch schedule for update");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(existing) = existing else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Schedule not found"
        })));
    };

    let payload = payload.into_inner();
    let work_start = match payload.work_start.as_deref() {
        Some(raw) => parse_shift_time("work_start", raw)?,
        None => existing.work_start,
    };
    let work_end = match payload.work_end.as_deref() {
        Some(raw) => parse_shift_time("work_end", raw)?,
        None => existing.work_end,
    };
    let merged = Schedule {
        id: existing.id,
        employee_id: existing.employee_id,
        schedule_name: payload.schedule_name.unwrap_or(existing.schedule_name),
        schedule_type: payload.schedule_type.unwrap_or(existing.schedule_type),
        description: payload.description.or(existing.description),
        start_date: payload.start_date.unwrap_or(existing.start_date),
        end_date: payload.end_date.unwrap_or(existing.end_date),
        work_days: payload
            .work_days
            .map(|d| join_work_days(&d))
            .unwrap_or(existing.work_days),
        work_start,
        work_end,
        lateness_grace_min: payload
            .lateness_grace_min
            .unwrap_or(existing.lateness_grace_min),
        absence_grace_min: payload
            .absence_grace_min
            .unwrap_or(existing.absence_grace_min),
        full_day_cap: payload.full_day_cap.unwrap_or(existing.full_day_cap),
        half_day_cap: payload.half_day_cap.unwrap_or(existing.half_day_cap),
    };

    if merged.start_date > merged.end_date {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    merged
        .shift_policy()
        .map_err(|e| ErrorBadRequest(e.to_string()))?;

    sqlx::query(
        r#"
        UPDATE schedules
        SET schedule_name = ?, schedule_type = ?, description = ?, start_date = ?,
            end_date = ?, work_days = ?, work_start = ?, work_end = ?,
            lateness_grace_min = ?, absence_grace_min = ?, full_day_cap = ?, half_day_cap = ?
        WHERE id = ?
        "#,
    )
    .bind(&merged.schedule_name)
    .bind(&merged.schedule_type)
    .bind(&merged.description)
    .bind(merged.start_date)
    .bind(merged.end_date)
    .bind(&merged.work_days)
    .bind(merged.work_start)
    .bind(merged.work_end)
    .bind(merged.lateness_grace_min)
    .bind(merged.absence_grace_min)
    .bind(merged.full_day_cap)
    .bind(merged.half_day_cap)
    .bind(schedule_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, schedule_id, "Failed to update schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    policy_cache::invalidate(merged.employee_id).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Schedule updated"
    })))
}

/// Delete Schedule
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn delete_schedule(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let schedule_id = path.into_inner();

    let existing = sqlx::query_as::<_, Schedule>(r#"SELECT * FROM schedules WHERE id = ?"#)
        .bind(schedule_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, schedule_id, "Failed to fetch schedule for delete");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(existing) = existing else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Schedule not found"
        })));
    };

    sqlx::query(r#"DELETE FROM schedules WHERE id = ?"#)
        .bind(schedule_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, schedule_id, "Failed to delete schedule");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    policy_cache::invalidate(existing.employee_id).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Schedule deleted"
    })))
}
