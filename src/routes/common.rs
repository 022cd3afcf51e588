//! Reference summaries embedded in responses, plus batched lookups to fill them.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{class, student, subject};
use crate::errors::AppResult;
use crate::repositories::{ClassRepository, StudentRepository, SubjectRepository};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassInfo {
    pub id: Uuid,
    pub name: String,
    pub section: String,
}

impl From<&class::Model> for ClassInfo {
    fn from(class: &class::Model) -> Self {
        Self {
            id: class.class_id,
            name: class.name.clone(),
            section: class.section.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectInfo {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

impl From<&subject::Model> for SubjectInfo {
    fn from(subject: &subject::Model) -> Self {
        Self {
            id: subject.subject_id,
            name: subject.name.clone(),
            code: subject.code.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub id: Uuid,
    pub name: String,
    pub roll_id: String,
    pub father_name: String,
}

impl From<&student::Model> for StudentInfo {
    fn from(student: &student::Model) -> Self {
        Self {
            id: student.student_id,
            name: student.name.clone(),
            roll_id: student.roll_id.clone(),
            father_name: student.father_name.clone(),
        }
    }
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub async fn class_infos<C: ConnectionTrait>(
    db: &C,
    ids: impl Iterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, ClassInfo>> {
    let classes = ClassRepository::new(db).find_by_ids(unique(ids)).await?;
    Ok(classes
        .iter()
        .map(|class| (class.class_id, ClassInfo::from(class)))
        .collect())
}

pub async fn subject_infos<C: ConnectionTrait>(
    db: &C,
    ids: impl Iterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, SubjectInfo>> {
    let subjects = SubjectRepository::new(db).find_by_ids(unique(ids)).await?;
    Ok(subjects
        .iter()
        .map(|subject| (subject.subject_id, SubjectInfo::from(subject)))
        .collect())
}

pub async fn student_infos<C: ConnectionTrait>(
    db: &C,
    ids: impl Iterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, StudentInfo>> {
    let students = StudentRepository::new(db).find_by_ids(unique(ids)).await?;
    Ok(students
        .iter()
        .map(|student| (student.student_id, StudentInfo::from(student)))
        .collect())
}

/// Query-string flag parsed the way clients send it: only `"true"` is true.
pub fn flag(value: &Option<String>) -> Option<bool> {
    value.as_deref().map(|v| v.eq_ignore_ascii_case("true"))
}

/// Distinguishes an absent field from an explicit `null`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses an optional id from a query string; blank means absent.
pub fn optional_id(value: &Option<String>, field: &str) -> AppResult<Option<Uuid>> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(raw).map(Some).map_err(|_| {
            crate::errors::AppError::BadRequest(format!("Invalid {field} format"))
        }),
    }
}
