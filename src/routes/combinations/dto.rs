use chrono::NaiveDateTime;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::combination;
use crate::errors::AppResult;
use crate::routes::common::{ClassInfo, SubjectInfo, class_infos, subject_infos};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinationRequest {
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCombinationRequest {
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub subject_ids: Vec<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CombinationListQuery {
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinationResponse {
    pub id: Uuid,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub subject_code: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectInfo>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkCombinationData {
    pub created: Vec<CombinationResponse>,
    pub skipped: usize,
    pub total: usize,
}

/// Attaches class and subject summaries to each combination.
pub async fn combination_responses<C: ConnectionTrait>(
    db: &C,
    combinations: Vec<combination::Model>,
) -> AppResult<Vec<CombinationResponse>> {
    let classes = class_infos(db, combinations.iter().map(|c| c.class_id)).await?;
    let subjects = subject_infos(db, combinations.iter().map(|c| c.subject_id)).await?;

    Ok(combinations
        .into_iter()
        .map(|c| CombinationResponse {
            id: c.combination_id,
            class: classes.get(&c.class_id).cloned(),
            subject: subjects.get(&c.subject_id).cloned(),
            class_id: c.class_id,
            subject_id: c.subject_id,
            subject_code: c.subject_code,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        })
        .collect())
}

pub async fn combination_response<C: ConnectionTrait>(
    db: &C,
    combination: combination::Model,
) -> AppResult<CombinationResponse> {
    let mut responses = combination_responses(db, vec![combination]).await?;
    Ok(responses.remove(0))
}
