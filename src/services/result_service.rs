//! Result entry: referential checks, derivation and persistence.
//!
//! Creation runs its checks in a fixed order so callers can rely on which
//! failure they see first: student, class, subject, combination, class
//! membership, roll id, duplicate slot.

use std::collections::{BTreeMap, HashMap};

use sea_orm::{ConnectionTrait, DbErr, SqlErr};
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

use super::grading::{self, current_academic_year};
use super::validation::{ResultInput, ResultUpdate, non_blank, validate_result_update};
use crate::entities::{
    exam_result,
    sea_orm_active_enums::{ExamType, Grade},
};
use crate::errors::{AppError, AppResult};
use crate::repositories::{
    ClassRepository, CombinationRepository, ExamResultUpdate, NewResult, ResultFilter,
    ResultOrder, ResultRepository, StudentRepository, SubjectRepository,
};

/// Subset of a stored result returned with a duplicate error.
fn existing_payload(result: &exam_result::Model) -> Value {
    json!({
        "id": result.result_id,
        "marks": result.marks,
        "maxMarks": result.max_marks,
        "percentage": result.percentage,
        "grade": result.grade,
        "examType": result.exam_type,
        "academicYear": result.academic_year,
    })
}

fn duplicate_of(message: String, existing: Option<&exam_result::Model>) -> AppError {
    AppError::Duplicate {
        message,
        existing: existing.map(existing_payload),
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Creates one result after every referential check has passed.
pub async fn create_result<C: ConnectionTrait>(
    db: &C,
    input: ResultInput,
) -> AppResult<exam_result::Model> {
    let input = input.into_valid()?;

    let student = StudentRepository::new(db)
        .find_by_id(input.student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student"))?;
    if !student.is_active {
        return Err(AppError::InvalidState("Student is inactive".to_string()));
    }

    if ClassRepository::new(db)
        .find_by_id(input.class_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Class"));
    }

    let subject = SubjectRepository::new(db)
        .find_by_id(input.subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject"))?;

    if CombinationRepository::new(db)
        .find_active(input.class_id, input.subject_id)
        .await?
        .is_none()
    {
        return Err(AppError::InvalidState(
            "Subject is not assigned to this class".to_string(),
        ));
    }

    if student.class_id != input.class_id {
        return Err(AppError::Conflict(
            "Student does not belong to this class".to_string(),
        ));
    }

    if !student.roll_id.eq_ignore_ascii_case(&input.roll_id) {
        return Err(AppError::Conflict(
            "Roll ID does not match the student record".to_string(),
        ));
    }

    let academic_year = input.academic_year.unwrap_or_else(current_academic_year);

    let repo = ResultRepository::new(db);
    let duplicate_message = format!(
        "Result for this student in {} ({}) already exists for academic year {}",
        subject.name, input.exam_type, academic_year
    );
    if let Some(existing) = repo
        .find_duplicate(
            input.student_id,
            input.subject_id,
            input.exam_type,
            &academic_year,
            None,
        )
        .await?
    {
        return Err(duplicate_of(duplicate_message, Some(&existing)));
    }

    let derived = grading::derive(input.marks, input.max_marks);
    let created = repo
        .create(NewResult {
            student_id: input.student_id,
            roll_id: input.roll_id.to_uppercase(),
            class_id: input.class_id,
            subject_id: input.subject_id,
            subject_code: subject.code,
            marks: input.marks,
            max_marks: input.max_marks,
            exam_type: input.exam_type,
            percentage: derived.percentage,
            grade: derived.grade,
            academic_year: academic_year.clone(),
        })
        .await;

    match created {
        Ok(result) => Ok(result),
        Err(err) if is_unique_violation(&err) => {
            let existing = repo
                .find_duplicate(
                    input.student_id,
                    input.subject_id,
                    input.exam_type,
                    &academic_year,
                    None,
                )
                .await?;
            Err(duplicate_of(duplicate_message, existing.as_ref()))
        }
        Err(err) => Err(err.into()),
    }
}

fn identity_changes(update: &ResultUpdate, stored: &exam_result::Model) -> Vec<String> {
    let mut errors = Vec::new();
    let same_id = |value: &Option<String>, stored: Uuid| {
        non_blank(value).is_none_or(|raw| Uuid::parse_str(raw).is_ok_and(|id| id == stored))
    };

    if !same_id(&update.student_id, stored.student_id) {
        errors.push("Student ID cannot be changed".to_string());
    }
    if !same_id(&update.class_id, stored.class_id) {
        errors.push("Class ID cannot be changed".to_string());
    }
    if !same_id(&update.subject_id, stored.subject_id) {
        errors.push("Subject ID cannot be changed".to_string());
    }
    if non_blank(&update.roll_id)
        .is_some_and(|roll_id| !roll_id.eq_ignore_ascii_case(&stored.roll_id))
    {
        errors.push("Roll ID cannot be changed".to_string());
    }
    errors
}

/// Applies a partial update limited to marks, maximum marks, exam type and
/// academic year. Derived fields follow the marks.
pub async fn update_result<C: ConnectionTrait>(
    db: &C,
    result_id: Uuid,
    update: ResultUpdate,
) -> AppResult<exam_result::Model> {
    let repo = ResultRepository::new(db);
    let existing = repo
        .find_by_id(result_id)
        .await?
        .ok_or_else(|| AppError::not_found("Result"))?;

    let mut errors = identity_changes(&update, &existing);
    errors.extend(validate_result_update(
        &update,
        existing.marks,
        existing.max_marks,
    ));
    if !errors.is_empty() {
        return Err(AppError::ValidationFailure(errors));
    }

    let marks = update.marks_value();
    let max_marks = update.max_marks_value();
    let exam_type = update.exam_type_value();
    let academic_year = update.academic_year_value().map(str::to_string);

    let target_exam_type = exam_type.unwrap_or(existing.exam_type);
    let target_year = academic_year
        .clone()
        .unwrap_or_else(|| existing.academic_year.clone());
    let slot_changed =
        target_exam_type != existing.exam_type || target_year != existing.academic_year;
    let duplicate_message = format!(
        "Result for this student ({}) already exists for academic year {}",
        target_exam_type, target_year
    );

    if slot_changed {
        if let Some(other) = repo
            .find_duplicate(
                existing.student_id,
                existing.subject_id,
                target_exam_type,
                &target_year,
                Some(result_id),
            )
            .await?
        {
            return Err(duplicate_of(duplicate_message, Some(&other)));
        }
    }

    let mut changes = ExamResultUpdate {
        marks,
        max_marks,
        exam_type,
        academic_year,
        ..Default::default()
    };
    if marks.is_some() || max_marks.is_some() {
        let derived = grading::derive(
            marks.unwrap_or(existing.marks),
            max_marks.unwrap_or(existing.max_marks),
        );
        changes.percentage = Some(derived.percentage);
        changes.grade = Some(derived.grade);
    }

    let (student_id, subject_id) = (existing.student_id, existing.subject_id);
    match repo.update(existing, changes).await {
        Ok(updated) => Ok(updated),
        Err(err) if is_unique_violation(&err) => {
            let other = repo
                .find_duplicate(
                    student_id,
                    subject_id,
                    target_exam_type,
                    &target_year,
                    Some(result_id),
                )
                .await?;
            Err(duplicate_of(duplicate_message, other.as_ref()))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_result<C: ConnectionTrait>(db: &C, result_id: Uuid) -> AppResult<()> {
    let repo = ResultRepository::new(db);
    if repo.find_by_id(result_id).await?.is_none() {
        return Err(AppError::not_found("Result"));
    }
    repo.delete(result_id).await?;
    Ok(())
}

/// Deletes the listed results and returns how many rows went away.
pub async fn delete_results<C: ConnectionTrait>(db: &C, result_ids: Vec<Uuid>) -> AppResult<u64> {
    if result_ids.is_empty() {
        return Err(AppError::BadRequest(
            "At least one result ID is required".to_string(),
        ));
    }
    let deleted = ResultRepository::new(db).delete_many(result_ids).await?;
    tracing::info!(deleted, "Bulk result deletion");
    Ok(deleted)
}

pub async fn delete_all_results<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    let deleted = ResultRepository::new(db).delete_all().await?;
    tracing::warn!(deleted, "All results deleted");
    Ok(deleted)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemError {
    pub index: usize,
    pub student_id: Option<String>,
    pub subject_id: Option<String>,
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BulkSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct BulkOutcome {
    pub created: Vec<exam_result::Model>,
    pub errors: Vec<BulkItemError>,
    pub summary: BulkSummary,
}

fn missing_bulk_fields(candidate: &ResultInput) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if non_blank(&candidate.student_id).is_none() {
        missing.push("studentId");
    }
    if non_blank(&candidate.subject_id).is_none() {
        missing.push("subjectId");
    }
    if candidate.marks.is_none() {
        missing.push("marks");
    }
    missing
}

/// Creates each candidate independently; failures are reported by index and
/// do not stop the batch.
pub async fn bulk_create_results<C: ConnectionTrait>(
    db: &C,
    candidates: Vec<ResultInput>,
) -> AppResult<BulkOutcome> {
    if candidates.is_empty() {
        return Err(AppError::BadRequest(
            "Results array is required and must not be empty".to_string(),
        ));
    }

    let total = candidates.len();
    let mut created = Vec::new();
    let mut errors = Vec::new();

    for (index, candidate) in candidates.into_iter().enumerate() {
        let student_id = candidate.student_id.clone();
        let subject_id = candidate.subject_id.clone();

        let missing = missing_bulk_fields(&candidate);
        if !missing.is_empty() {
            errors.push(BulkItemError {
                index,
                student_id,
                subject_id,
                error: format!("Missing required fields: {}", missing.join(", ")),
            });
            continue;
        }

        match create_result(db, candidate).await {
            Ok(result) => created.push(result),
            Err(err) => {
                tracing::debug!(index, error = %err.describe(), "Bulk result item rejected");
                errors.push(BulkItemError {
                    index,
                    student_id,
                    subject_id,
                    error: err.describe(),
                });
            }
        }
    }

    let summary = BulkSummary {
        total,
        successful: created.len(),
        failed: errors.len(),
    };
    tracing::info!(
        total = summary.total,
        successful = summary.successful,
        failed = summary.failed,
        "Bulk result creation finished"
    );

    Ok(BulkOutcome {
        created,
        errors,
        summary,
    })
}

#[derive(Debug, Clone)]
pub struct ExamSummary {
    pub exam_type: ExamType,
    pub academic_year: String,
    pub subjects: usize,
    pub total_marks: f64,
    pub total_max_marks: f64,
    pub percentage: f64,
    pub grade: Grade,
    pub results: Vec<exam_result::Model>,
}

#[derive(Debug, Clone)]
pub struct StudentSummary {
    pub student: crate::entities::student::Model,
    pub exams: Vec<ExamSummary>,
    pub total_results: usize,
    pub average_percentage: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Results of one student grouped by (academic year, exam type), with the
/// aggregate percentage and grade of each group.
pub async fn student_summary<C: ConnectionTrait>(
    db: &C,
    student_id: Uuid,
    academic_year: Option<String>,
) -> AppResult<StudentSummary> {
    let student = StudentRepository::new(db)
        .find_by_id(student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student"))?;

    let results = ResultRepository::new(db)
        .find_all(
            ResultFilter {
                student_id: Some(student_id),
                academic_year,
                ..Default::default()
            },
            ResultOrder::Newest,
        )
        .await?;

    let total_results = results.len();
    let average_percentage = if results.is_empty() {
        0.0
    } else {
        round2(results.iter().map(|r| r.percentage).sum::<f64>() / total_results as f64)
    };

    let mut groups: BTreeMap<(String, &'static str), Vec<exam_result::Model>> = BTreeMap::new();
    for result in results {
        groups
            .entry((result.academic_year.clone(), result.exam_type.as_str()))
            .or_default()
            .push(result);
    }

    let exams = groups
        .into_iter()
        .rev()
        .filter_map(|((academic_year, _), results)| {
            let exam_type = results.first()?.exam_type;
            let total_marks: f64 = results.iter().map(|r| r.marks).sum();
            let total_max_marks: f64 = results.iter().map(|r| r.max_marks).sum();
            let derived = grading::derive(total_marks, total_max_marks);
            Some(ExamSummary {
                exam_type,
                academic_year,
                subjects: results.len(),
                total_marks,
                total_max_marks,
                percentage: derived.percentage,
                grade: derived.grade,
                results,
            })
        })
        .collect();

    Ok(StudentSummary {
        student,
        exams,
        total_results,
        average_percentage,
    })
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeCount {
    pub grade: Grade,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverage {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub avg_marks: f64,
    pub avg_percentage: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformer {
    pub student_id: Uuid,
    pub student_name: String,
    pub roll_id: String,
    pub avg_percentage: f64,
    pub total_marks: f64,
    pub total_max_marks: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultStats {
    pub total_results: u64,
    /// Best grade first.
    pub grade_distribution: Vec<GradeCount>,
    /// Ordered by subject name.
    pub avg_by_subject: Vec<SubjectAverage>,
    /// At most ten students, highest average percentage first.
    pub top_performers: Vec<TopPerformer>,
}

pub const TOP_PERFORMER_LIMIT: usize = 10;

pub async fn result_stats<C: ConnectionTrait>(
    db: &C,
    filter: ResultFilter,
) -> AppResult<ResultStats> {
    let results = ResultRepository::new(db)
        .find_all(filter, ResultOrder::Newest)
        .await?;

    let mut grades: BTreeMap<Grade, u64> = BTreeMap::new();
    let mut by_subject: HashMap<Uuid, (f64, f64, u64)> = HashMap::new();
    let mut by_student: HashMap<Uuid, (f64, f64, f64, u64)> = HashMap::new();
    for result in &results {
        *grades.entry(result.grade).or_default() += 1;

        let subject = by_subject.entry(result.subject_id).or_default();
        subject.0 += result.marks;
        subject.1 += result.percentage;
        subject.2 += 1;

        let student = by_student.entry(result.student_id).or_default();
        student.0 += result.percentage;
        student.1 += result.marks;
        student.2 += result.max_marks;
        student.3 += 1;
    }

    let subjects = SubjectRepository::new(db)
        .find_by_ids(by_subject.keys().copied().collect())
        .await?;
    let mut avg_by_subject: Vec<SubjectAverage> = subjects
        .into_iter()
        .filter_map(|subject| {
            let (marks, percentage, count) = by_subject.get(&subject.subject_id)?;
            Some(SubjectAverage {
                subject_id: subject.subject_id,
                subject_name: subject.name,
                avg_marks: round2(marks / *count as f64),
                avg_percentage: round2(percentage / *count as f64),
                count: *count,
            })
        })
        .collect();
    avg_by_subject.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));

    let students = StudentRepository::new(db)
        .find_by_ids(by_student.keys().copied().collect())
        .await?;
    let mut top_performers: Vec<TopPerformer> = students
        .into_iter()
        .filter_map(|student| {
            let (percentage, marks, max_marks, count) = by_student.get(&student.student_id)?;
            Some(TopPerformer {
                student_id: student.student_id,
                student_name: student.name,
                roll_id: student.roll_id,
                avg_percentage: round2(percentage / *count as f64),
                total_marks: *marks,
                total_max_marks: *max_marks,
                count: *count,
            })
        })
        .collect();
    top_performers.sort_by(|a, b| {
        b.avg_percentage
            .total_cmp(&a.avg_percentage)
            .then_with(|| a.roll_id.cmp(&b.roll_id))
    });
    top_performers.truncate(TOP_PERFORMER_LIMIT);

    Ok(ResultStats {
        total_results: results.len() as u64,
        grade_distribution: grades
            .into_iter()
            .map(|(grade, count)| GradeCount { grade, count })
            .collect(),
        avg_by_subject,
        top_performers,
    })
}
