use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::subject;
use crate::services::subject_service::DeletedRecords;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubjectRequest {
    #[schema(example = "Mathematics")]
    pub name: Option<String>,
    /// Stored upper-cased.
    #[schema(example = "MATH101")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<subject::Model> for SubjectResponse {
    fn from(subject: subject::Model) -> Self {
        Self {
            id: subject.subject_id,
            name: subject.name,
            code: subject.code,
            created_at: subject.created_at,
            updated_at: subject.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDeletedResponse {
    pub success: bool,
    pub message: String,
    pub deleted_records: DeletedRecords,
}
