use crate::{
    model::{employee::Employee, job_title::JobTitle, role::Role},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EM25001", value_type = String)]
    pub employee_code: String,
    #[schema(example = "Lim", value_type = String)]
    pub first_name: String,
    #[schema(example = "Alcovendas", value_type = String)]
    pub last_name: String,
    #[schema(example = "lim@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "+639171234567")]
    pub phone: Option<String>,
    #[schema(example = 1, value_type = u64)]
    pub department_id: u64,
    #[schema(example = 2, value_type = u64)]
    pub job_title_id: u64,
    /// 1 = admin, 2 = hr, 3 = employee
    #[schema(example = 3)]
    pub role_id: u8,
    #[schema(example = "2025-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department_id: Option<u64>,
    pub job_title_id: Option<u64>,
    pub role_id: Option<u8>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 5)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created successfully", body = Object, example = json!({
            "message": "Employee registered successfully"
        })),
        (status = 400, description = "Unknown role"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> impl Responder {
    let Some(role) = Role::from_id(payload.role_id) else {
        return HttpResponse::BadRequest().json(json!({
            "message": "Unknown role, expected 1 (admin), 2 (hr) or 3 (employee)"
        }));
    };

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (employee_code, first_name, last_name, email, phone, department_id, job_title_id, role_id, hire_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.employee_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.department_id)
    .bind(payload.job_title_id)
    .bind(payload.role_id)
    .bind(payload.hire_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "Employee registered successfully",
            "role": role.as_str()
        })),
        Err(e) => {
            error!(error = %e, "Failed to Create Employee");
            HttpResponse::InternalServerError().json(json!({
                "message":"Something went wrong, Contact with system admin"
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // Helper enum for typed SQLx binding
    #[derive(Debug)]
    enum FilterValue {
        U64(u64),
        U8(u8),
        Str(String),
    }

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(department_id) = query.department_id {
        conditions.push("department_id = ?");
        bindings.push(FilterValue::U64(department_id));
    }

    if let Some(job_title_id) = query.job_title_id {
        conditions.push("job_title_id = ?");
        bindings.push(FilterValue::U64(job_title_id));
    }

    if let Some(role_id) = query.role_id {
        conditions.push("role_id = ?");
        bindings.push(FilterValue::U8(role_id));
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(FilterValue::Str(status.clone()));
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM employees {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::U8(v) => count_query.bind(*v),
            FilterValue::Str(v) => count_query.bind(v.as_str()),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(*v),
            FilterValue::U8(v) => data_query.bind(*v),
            FilterValue::Str(v) => data_query.bind(v.as_str()),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee updated successfully"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    if let Some(role_id) = body.get("role_id").and_then(|v| v.as_u64()) {
        if u8::try_from(role_id).ok().and_then(Role::from_id).is_none() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Unknown role, expected 1 (admin), 2 (hr) or 3 (employee)"
            })));
        }
    }

    let update = build_update_sql("employees", &body, "id", employee_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM employees WHERE id = ?"#)
        .bind(employee_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Employee not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Job title listing (employee form dropdown)
#[utoipa::path(
    get,
    path = "/api/v1/job-titles",
    responses(
        (status = 200, description = "All job titles", body = [JobTitle]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_job_titles(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let titles = sqlx::query_as::<_, JobTitle>(r#"SELECT * FROM job_titles ORDER BY title"#)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch job titles");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(titles))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>(r#"SELECT * FROM employees WHERE id = ?"#)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        }))),
    }
}
