use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::model::inquiry::{Inquiry, InquiryStatus};

#[derive(Deserialize, ToSchema)]
pub struct SubmitInquiry {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "Shift swap request")]
    pub subject: String,
    #[schema(example = "Requesting to swap my Friday shift with Saturday")]
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DeclineInquiry {
    #[schema(example = "Saturday roster is already full")]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct InquiryFilter {
    #[schema(example = 1001)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "Pending")]
    /// Filter by inquiry status
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/* =========================
Submit inquiry
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/inquiries",
    request_body = SubmitInquiry,
    responses(
        (status = 200, description = "Inquiry submitted", body = Object, example = json!({
            "message": "Inquiry submitted",
            "reference": "9f2c1e7a-...",
            "status": "Pending"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Inquiry"
)]
pub async fn submit_inquiry(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitInquiry>,
) -> actix_web::Result<impl Responder> {
    let reference = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO inquiries (reference, employee_id, subject, message, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&reference)
    .bind(payload.employee_id)
    .bind(&payload.subject)
    .bind(&payload.message)
    .bind(InquiryStatus::Pending.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to submit inquiry");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Inquiry submitted",
        "reference": reference,
        "status": InquiryStatus::Pending.to_string()
    })))
}

/* =========================
Approve inquiry (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/inquiries/{inquiry_id}/approve",
    params(
        ("inquiry_id" = u64, Path, description = "ID of the inquiry to approve")
    ),
    responses(
        (status = 200, description = "Inquiry approved", body = Object, example = json!({
            "message": "Inquiry approved"
        })),
        (status = 400, description = "Inquiry not found or already processed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Inquiry"
)]
pub async fn approve_inquiry(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let inquiry_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE inquiries
        SET status = 'Approved'
        WHERE id = ?
        AND status = 'Pending'
        "#,
    )
    .bind(inquiry_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, inquiry_id, "Approve inquiry failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Inquiry not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Inquiry approved"
    })))
}

/* =========================
Decline inquiry (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/inquiries/{inquiry_id}/decline",
    params(
        ("inquiry_id" = u64, Path, description = "ID of the inquiry to decline")
    ),
    request_body = DeclineInquiry,
    responses(
        (status = 200, description = "Inquiry declined", body = Object, example = json!({
            "message": "Inquiry declined"
        })),
        (status = 400, description = "Inquiry not found or already processed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Inquiry"
)]
pub async fn decline_inquiry(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DeclineInquiry>,
) -> actix_web::Result<impl Responder> {
    let inquiry_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE inquiries
        SET status = 'Declined', decline_notes = ?
        WHERE id = ?
        AND status = 'Pending'
        "#,
    )
    .bind(&payload.notes)
    .bind(inquiry_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, inquiry_id, "Decline inquiry failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Inquiry not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Inquiry declined"
    })))
}

/* =========================
Inquiry listing
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/inquiries",
    params(InquiryFilter),
    responses(
        (status = 200, description = "Paginated inquiry list"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Inquiry"
)]
pub async fn list_inquiries(
    pool: web::Data<MySqlPool>,
    query: web::Query<InquiryFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM inquiries{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count inquiries");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, reference, employee_id, subject, message, status, decline_notes, created_at
        FROM inquiries
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Inquiry>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let inquiries = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch inquiries");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "data": inquiries,
        "page": page,
        "per_page": per_page,
        "total": total
    })))
}
