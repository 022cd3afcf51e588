use std::collections::{BTreeMap, HashMap};

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::grading::current_academic_year;
use super::{required, trimmed};
use crate::entities::student;
use crate::errors::{AppError, AppResult};
use crate::repositories::{
    ClassRepository, NewStudent, ResultRepository, StudentFilter, StudentRepository,
    StudentUpdate,
};

const DUPLICATE_ROLL_ID: &str = "Student with this Roll ID already exists";

#[derive(Debug, Default, Clone)]
pub struct StudentInput {
    pub roll_id: Option<String>,
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub class_id: Option<Uuid>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct StudentChanges {
    pub roll_id: Option<String>,
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub class_id: Option<Uuid>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    pub academic_year: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassCount {
    pub class_id: Uuid,
    pub class_name: String,
    pub section: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_students: u64,
    pub active_students: u64,
    pub inactive_students: u64,
    /// Most recent academic year first.
    pub students_by_year: Vec<YearCount>,
    /// Ordered by class name, then section.
    pub students_by_class: Vec<ClassCount>,
}

pub async fn create_student<C: ConnectionTrait>(
    db: &C,
    input: StudentInput,
) -> AppResult<student::Model> {
    let mut errors = Vec::new();
    let roll_id = required(input.roll_id, "Roll ID is required", &mut errors);
    let name = required(input.name, "Student name is required", &mut errors);
    let father_name = required(input.father_name, "Father's name is required", &mut errors);
    if input.class_id.is_none() {
        errors.push("Class ID is required".to_string());
    }
    let phone = required(input.phone, "Phone number is required", &mut errors);
    let address = required(input.address, "Address is required", &mut errors);

    let (Some(roll_id), Some(name), Some(father_name), Some(class_id), Some(phone), Some(address)) =
        (roll_id, name, father_name, input.class_id, phone, address)
    else {
        return Err(AppError::ValidationFailure(errors));
    };
    let roll_id = roll_id.to_uppercase();

    if ClassRepository::new(db).find_by_id(class_id).await?.is_none() {
        return Err(AppError::not_found("Class"));
    }

    let repo = StudentRepository::new(db);
    if repo.find_by_roll_id(&roll_id, None).await?.is_some() {
        return Err(AppError::duplicate(DUPLICATE_ROLL_ID));
    }

    let academic_year = trimmed(input.academic_year).unwrap_or_else(current_academic_year);

    repo.create(NewStudent {
        roll_id,
        name,
        father_name,
        class_id,
        phone,
        address,
        academic_year,
    })
    .await
    .map_err(|err| AppError::from_db(err, DUPLICATE_ROLL_ID))
}

/// Updates a student. A roll id change is copied onto the student's results
/// in the same transaction.
pub async fn update_student(
    db: &DatabaseConnection,
    student_id: Uuid,
    changes: StudentChanges,
) -> AppResult<student::Model> {
    let roll_id = trimmed(changes.roll_id).map(|roll_id| roll_id.to_uppercase());

    let txn = db.begin().await?;
    let repo = StudentRepository::new(&txn);

    let existing = repo
        .find_by_id(student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student"))?;

    if let Some(class_id) = changes.class_id {
        if ClassRepository::new(&txn).find_by_id(class_id).await?.is_none() {
            return Err(AppError::not_found("Class"));
        }
    }

    if let Some(roll_id) = roll_id.as_deref() {
        if repo.find_by_roll_id(roll_id, Some(student_id)).await?.is_some() {
            return Err(AppError::duplicate(
                "Another student with this Roll ID already exists",
            ));
        }
    }

    let previous_roll_id = existing.roll_id.clone();
    let updated = repo
        .update(
            existing,
            StudentUpdate {
                roll_id,
                name: trimmed(changes.name),
                father_name: trimmed(changes.father_name),
                class_id: changes.class_id,
                phone: trimmed(changes.phone),
                address: trimmed(changes.address),
                academic_year: trimmed(changes.academic_year),
                is_active: changes.is_active,
            },
        )
        .await
        .map_err(|err| AppError::from_db(err, DUPLICATE_ROLL_ID))?;

    if updated.roll_id != previous_roll_id {
        let results = ResultRepository::new(&txn)
            .update_roll_id(student_id, &updated.roll_id)
            .await?;
        tracing::info!(
            student_id = %student_id,
            from = %previous_roll_id,
            to = %updated.roll_id,
            results,
            "Student roll id changed"
        );
    }

    txn.commit().await?;
    Ok(updated)
}

pub async fn toggle_student<C: ConnectionTrait>(
    db: &C,
    student_id: Uuid,
) -> AppResult<student::Model> {
    let repo = StudentRepository::new(db);
    let existing = repo
        .find_by_id(student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student"))?;

    let is_active = !existing.is_active;
    let updated = repo
        .update(
            existing,
            StudentUpdate {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await?;
    Ok(updated)
}

pub async fn delete_student<C: ConnectionTrait>(db: &C, student_id: Uuid) -> AppResult<()> {
    let repo = StudentRepository::new(db);
    if repo.find_by_id(student_id).await?.is_none() {
        return Err(AppError::not_found("Student"));
    }
    repo.delete(student_id).await?;
    Ok(())
}

pub async fn student_stats<C: ConnectionTrait>(db: &C) -> AppResult<StudentStats> {
    let repo = StudentRepository::new(db);
    let students = repo.find_all(StudentFilter::default()).await?;

    let total_students = students.len() as u64;
    let active_students = students.iter().filter(|s| s.is_active).count() as u64;

    let mut by_year: BTreeMap<&str, u64> = BTreeMap::new();
    let mut by_class: HashMap<Uuid, u64> = HashMap::new();
    for student in &students {
        *by_year.entry(student.academic_year.as_str()).or_default() += 1;
        *by_class.entry(student.class_id).or_default() += 1;
    }

    let students_by_year = by_year
        .into_iter()
        .rev()
        .map(|(academic_year, count)| YearCount {
            academic_year: academic_year.to_string(),
            count,
        })
        .collect();

    let classes = ClassRepository::new(db)
        .find_by_ids(by_class.keys().copied().collect())
        .await?;
    let mut students_by_class: Vec<ClassCount> = classes
        .into_iter()
        .map(|class| ClassCount {
            count: by_class.get(&class.class_id).copied().unwrap_or_default(),
            class_id: class.class_id,
            class_name: class.name,
            section: class.section,
        })
        .collect();
    students_by_class.sort_by(|a, b| {
        a.class_name
            .cmp(&b.class_name)
            .then_with(|| a.section.cmp(&b.section))
    });

    Ok(StudentStats {
        total_students,
        active_students,
        inactive_students: total_students - active_students,
        students_by_year,
        students_by_class,
    })
}
