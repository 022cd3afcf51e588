use chrono::NaiveDateTime;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::student;
use crate::errors::AppResult;
use crate::routes::common::{ClassInfo, class_infos};
use crate::services::student_service::{StudentChanges, StudentInput};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    /// Stored upper-cased.
    #[schema(example = "10A001")]
    pub roll_id: Option<String>,
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub class_id: Option<Uuid>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[schema(example = "2025-2026")]
    pub academic_year: Option<String>,
    /// Only honoured on update.
    pub is_active: Option<bool>,
}

impl From<StudentRequest> for StudentInput {
    fn from(request: StudentRequest) -> Self {
        Self {
            roll_id: request.roll_id,
            name: request.name,
            father_name: request.father_name,
            class_id: request.class_id,
            phone: request.phone,
            address: request.address,
            academic_year: request.academic_year,
        }
    }
}

impl From<StudentRequest> for StudentChanges {
    fn from(request: StudentRequest) -> Self {
        Self {
            roll_id: request.roll_id,
            name: request.name,
            father_name: request.father_name,
            class_id: request.class_id,
            phone: request.phone,
            address: request.address,
            academic_year: request.academic_year,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StudentListQuery {
    pub class_id: Option<String>,
    pub academic_year: Option<String>,
    /// `true` or `false`.
    pub is_active: Option<String>,
    /// Matches name, roll id or father's name.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AcademicYearQuery {
    pub academic_year: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: Uuid,
    pub roll_id: String,
    pub name: String,
    pub father_name: String,
    pub class_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassInfo>,
    pub phone: String,
    pub address: String,
    pub academic_year: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub async fn student_responses<C: ConnectionTrait>(
    db: &C,
    students: Vec<student::Model>,
) -> AppResult<Vec<StudentResponse>> {
    let classes = class_infos(db, students.iter().map(|s| s.class_id)).await?;

    Ok(students
        .into_iter()
        .map(|s| StudentResponse {
            id: s.student_id,
            class: classes.get(&s.class_id).cloned(),
            roll_id: s.roll_id,
            name: s.name,
            father_name: s.father_name,
            class_id: s.class_id,
            phone: s.phone,
            address: s.address,
            academic_year: s.academic_year,
            is_active: s.is_active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        })
        .collect())
}

pub async fn student_response<C: ConnectionTrait>(
    db: &C,
    student: student::Model,
) -> AppResult<StudentResponse> {
    let mut responses = student_responses(db, vec![student]).await?;
    Ok(responses.remove(0))
}
