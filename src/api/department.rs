use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    model::department::Department,
    utils::db_utils::{build_update_sql, execute_update},
};

#[derive(Deserialize, ToSchema)]
pub struct CreateDepartment {
    #[schema(example = "IT")]
    pub name: String,
    #[schema(example = "Information Technology")]
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignDepartment {
    #[schema(example = 1001)]
    pub employee_id: u64,
}

/// Department listing
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "All departments", body = [Department]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn list_departments(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let departments =
        sqlx::query_as::<_, Department>(r#"SELECT * FROM departments ORDER BY name"#)
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch departments");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    Ok(HttpResponse::Ok().json(departments))
}

/// Create Department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartment,
    responses(
        (status = 200, description = "Department created", body = Object, example = json!({
            "message": "Department created"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn create_department(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateDepartment>,
) -> actix_web::Result<impl Responder> {
    sqlx::query(r#"INSERT INTO departments (name, description) VALUES (?, ?)"#)
        .bind(&payload.name)
        .bind(&payload.description)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, name = %payload.name, "Failed to create department");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department created"
    })))
}

/// Update Department
#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id", Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department updated"),
        (status = 404, description = "Department not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn update_department(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> actix_web::Result<impl Responder> {
    let department_id = path.into_inner();

    let update = build_update_sql("departments", &body, "id", department_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department updated"
    })))
}

/// Delete Department
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id", Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 404, description = "Department not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn delete_department(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let department_id = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM departments WHERE id = ?"#)
        .bind(department_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to delete department");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department deleted"
    })))
}

/// Assign an employee to a department (the dashboard's Assign modal)
#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}/assign",
    params(
        ("department_id", Path, description = "Department ID")
    ),
    request_body = AssignDepartment,
    responses(
        (status = 200, description = "Employee assigned", body = Object, example = json!({
            "message": "Employee assigned to department"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn assign_department(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<AssignDepartment>,
) -> actix_web::Result<impl Responder> {
    let department_id = path.into_inner();

    let result = sqlx::query(r#"UPDATE employees SET department_id = ? WHERE id = ?"#)
        .bind(department_id)
        .bind(payload.employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, department_id, employee_id = payload.employee_id, "Failed to assign department");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee assigned to department"
    })))
}
