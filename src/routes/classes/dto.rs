use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::class;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassRequest {
    #[schema(example = "Class 10")]
    pub name: Option<String>,
    #[schema(example = "A")]
    pub section: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: Uuid,
    pub name: String,
    pub section: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<class::Model> for ClassResponse {
    fn from(class: class::Model) -> Self {
        Self {
            id: class.class_id,
            name: class.name,
            section: class.section,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}
