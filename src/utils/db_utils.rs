use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use sqlx::MySqlPool;

use crate::timeclock::hours::CLOCK_SENTINEL;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
///
/// String payload values are sniffed into the narrowest temporal type so a
/// log-row edit can set `clock_in` to "09:15" and have it bind as TIME.
/// The `--` clock sentinel (and the empty string) bind as NULL.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    // Build SET clause
    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    // Convert JSON values -> SqlValue
    for value in obj.values() {
        values.push(convert_json_value(value)?);
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

fn convert_json_value(value: &Value) -> Result<SqlValue, actix_web::Error> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == CLOCK_SENTINEL {
                return Ok(SqlValue::Null);
            }
            if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                Ok(SqlValue::Date(d))
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
                Ok(SqlValue::DateTime(dt))
            } else if let Ok(t) = NaiveTime::parse_from_str(trimmed, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            {
                Ok(SqlValue::Time(t))
            } else {
                Ok(SqlValue::String(s.clone()))
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::I64(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::F64(f))
            } else {
                Err(ErrorBadRequest("Unsupported numeric value"))
            }
        }
        Value::Bool(b) => Ok(SqlValue::Bool(*b)),
        Value::Null => Ok(SqlValue::Null),
        _ => Err(ErrorBadRequest("Unsupported JSON value type")),
    }
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Time(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_set_clause_and_trailing_id_bind() {
        let update =
            build_update_sql("attendance_logs", &json!({"status": "Late"}), "id", 42).unwrap();
        assert_eq!(update.sql, "UPDATE attendance_logs SET status = ? WHERE id = ?");
        assert_eq!(
            update.values,
            vec![SqlValue::String("Late".to_string()), SqlValue::I64(42)]
        );
    }

    #[test]
    fn clock_strings_bind_as_time_and_sentinel_as_null() {
        let update = build_update_sql(
            "attendance_logs",
            &json!({"clock_in": "09:15", "clock_out": "--"}),
            "id",
            1,
        )
        .unwrap();
        assert!(update
            .values
            .contains(&SqlValue::Time(NaiveTime::from_hms_opt(9, 15, 0).unwrap())));
        assert!(update.values.contains(&SqlValue::Null));
    }

    #[test]
    fn date_strings_still_bind_as_dates() {
        let update = build_update_sql("tasks", &json!({"deadline": "2025-03-01"}), "id", 1).unwrap();
        assert!(update
            .values
            .contains(&SqlValue::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(build_update_sql("tasks", &json!({}), "id", 1).is_err());
        assert!(build_update_sql("tasks", &json!([1, 2]), "id", 1).is_err());
    }
}
