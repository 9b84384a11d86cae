use actix_web::{HttpResponse, Responder, error::ErrorBadRequest, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::{
    model::task::{Task, TaskStatus},
    utils::db_utils::{build_update_sql, execute_update},
};

#[derive(Deserialize, ToSchema)]
pub struct CreateTask {
    #[schema(example = "Prepare onboarding docs")]
    pub title: String,
    #[schema(example = "Collect the forms for the February intake")]
    pub description: Option<String>,
    #[schema(example = 1001)]
    pub assigned_to: u64,
    #[schema(example = 1)]
    pub assigned_by: u64,
    #[schema(example = "2025-03-01", value_type = String, format = "date")]
    pub deadline: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TaskQuery {
    #[schema(example = "Pending")]
    /// Filter by task status
    pub status: Option<String>,
    #[schema(example = 1001)]
    /// Filter by assignee
    pub assigned_to: Option<u64>,
    /// Search by title or description
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Create Task (status starts Pending)
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTask,
    responses(
        (status = 200, description = "Task created", body = Object, example = json!({
            "message": "Task created",
            "status": "Pending"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Task"
)]
pub async fn create_task(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTask>,
) -> actix_web::Result<impl Responder> {
    sqlx::query(
        r#"
        INSERT INTO tasks (title, description, assigned_to, assigned_by, deadline, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.assigned_to)
    .bind(payload.assigned_by)
    .bind(payload.deadline)
    .bind(TaskStatus::Pending.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, assigned_to = payload.assigned_to, "Failed to create task");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task created",
        "status": TaskStatus::Pending.to_string()
    })))
}

/// Task listing
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(TaskQuery),
    responses(
        (status = 200, description = "Paginated task list"),
        (status = 400, description = "Unknown status filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Task"
)]
pub async fn list_tasks(
    pool: web::Data<MySqlPool>,
    query: web::Query<TaskQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(status) = query.status.as_deref() {
        TaskStatus::from_str(status)
            .map_err(|_| ErrorBadRequest(format!("unknown task status '{status}'")))?;
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    if let Some(assigned_to) = query.assigned_to {
        where_sql.push_str(" AND assigned_to = ?");
        args.push(FilterValue::U64(assigned_to));
    }

    let like;
    if let Some(search) = query.search.as_deref() {
        where_sql.push_str(" AND (title LIKE ? OR description LIKE ?)");
        like = format!("%{}%", search);
        args.push(FilterValue::Str(&like));
        args.push(FilterValue::Str(&like));
    }

    let count_sql = format!("SELECT COUNT(*) FROM tasks{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count tasks");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, title, description, assigned_to, assigned_by, deadline, status, created_at
        FROM tasks
        {}
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Task>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let tasks = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch tasks");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "data": tasks,
        "page": page,
        "per_page": per_page,
        "total": total
    })))
}

/// Partial task update (status moves, reassignment, edits)
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{task_id}",
    params(
        ("task_id", Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task updated"),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Task"
)]
pub async fn update_task(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();

    if let Some(status) = body.get("status").and_then(|v| v.as_str()) {
        TaskStatus::from_str(status)
            .map_err(|_| ErrorBadRequest(format!("unknown task status '{status}'")))?;
    }

    let update = build_update_sql("tasks", &body, "id", task_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Task not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated"
    })))
}

/// Delete Task
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{task_id}",
    params(
        ("task_id", Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Task"
)]
pub async fn delete_task(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM tasks WHERE id = ?"#)
        .bind(task_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, task_id, "Failed to delete task");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Task not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted"
    })))
}
