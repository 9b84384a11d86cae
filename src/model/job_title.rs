use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct JobTitle {
    pub id: u64,
    #[schema(example = "Software Engineer")]
    pub title: String,
}
