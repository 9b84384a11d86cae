use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Department {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}
