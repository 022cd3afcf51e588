use chrono::NaiveDateTime;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{
    exam_result,
    sea_orm_active_enums::{ExamType, Grade},
};
use crate::errors::{AppError, AppResult};
use crate::repositories::ResultFilter;
use crate::routes::common::{
    ClassInfo, StudentInfo, SubjectInfo, class_infos, optional_id, student_infos, subject_infos,
};
use crate::services::result_service::{BulkItemError, BulkSummary, ExamSummary, StudentSummary};
use crate::services::validation::{ResultInput, VALID_EXAM_TYPES, non_blank};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ResultListQuery {
    pub student_id: Option<String>,
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
    /// Final Term, Mid Term or Monthly Test.
    pub exam_type: Option<String>,
    pub academic_year: Option<String>,
    /// Matches the roll id.
    pub search: Option<String>,
}

impl ResultListQuery {
    pub fn into_filter(self) -> AppResult<ResultFilter> {
        Ok(ResultFilter {
            student_id: optional_id(&self.student_id, "studentId")?,
            class_id: optional_id(&self.class_id, "classId")?,
            subject_id: optional_id(&self.subject_id, "subjectId")?,
            exam_type: exam_type_filter(&self.exam_type)?,
            academic_year: non_blank(&self.academic_year).map(str::to_string),
            search: non_blank(&self.search).map(str::to_string),
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScopedResultQuery {
    pub exam_type: Option<String>,
    pub academic_year: Option<String>,
}

impl ScopedResultQuery {
    pub fn into_filter(self) -> AppResult<ResultFilter> {
        Ok(ResultFilter {
            exam_type: exam_type_filter(&self.exam_type)?,
            academic_year: non_blank(&self.academic_year).map(str::to_string),
            ..Default::default()
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    pub academic_year: Option<String>,
}

fn exam_type_filter(value: &Option<String>) -> AppResult<Option<ExamType>> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => ExamType::parse(raw).map(Some).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Exam type must be one of: {}",
                VALID_EXAM_TYPES.join(", ")
            ))
        }),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkResultRequest {
    #[serde(default)]
    pub results: Vec<ResultInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentInfo>,
    pub roll_id: String,
    pub class_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassInfo>,
    pub subject_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectInfo>,
    pub subject_code: String,
    pub marks: f64,
    pub max_marks: f64,
    pub exam_type: ExamType,
    pub percentage: f64,
    pub grade: Grade,
    pub academic_year: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkResultData {
    pub created: Vec<ResultResponse>,
    pub errors: Vec<BulkItemError>,
    pub summary: BulkSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummaryResponse {
    pub exam_type: ExamType,
    pub academic_year: String,
    pub subjects: usize,
    pub total_marks: f64,
    pub total_max_marks: f64,
    pub percentage: f64,
    pub grade: Grade,
    pub results: Vec<ResultResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummaryResponse {
    pub student: StudentInfo,
    pub class: Option<ClassInfo>,
    pub academic_year: String,
    pub exams: Vec<ExamSummaryResponse>,
    pub total_results: usize,
    pub average_percentage: f64,
}

/// Attaches student, class and subject summaries to each result.
pub async fn result_responses<C: ConnectionTrait>(
    db: &C,
    results: Vec<exam_result::Model>,
) -> AppResult<Vec<ResultResponse>> {
    let students = student_infos(db, results.iter().map(|r| r.student_id)).await?;
    let classes = class_infos(db, results.iter().map(|r| r.class_id)).await?;
    let subjects = subject_infos(db, results.iter().map(|r| r.subject_id)).await?;

    Ok(results
        .into_iter()
        .map(|r| ResultResponse {
            id: r.result_id,
            student: students.get(&r.student_id).cloned(),
            class: classes.get(&r.class_id).cloned(),
            subject: subjects.get(&r.subject_id).cloned(),
            student_id: r.student_id,
            roll_id: r.roll_id,
            class_id: r.class_id,
            subject_id: r.subject_id,
            subject_code: r.subject_code,
            marks: r.marks,
            max_marks: r.max_marks,
            exam_type: r.exam_type,
            percentage: r.percentage,
            grade: r.grade,
            academic_year: r.academic_year,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

pub async fn result_response<C: ConnectionTrait>(
    db: &C,
    result: exam_result::Model,
) -> AppResult<ResultResponse> {
    let mut responses = result_responses(db, vec![result]).await?;
    Ok(responses.remove(0))
}

pub async fn student_summary_response<C: ConnectionTrait>(
    db: &C,
    summary: StudentSummary,
) -> AppResult<StudentSummaryResponse> {
    let class = class_infos(db, std::iter::once(summary.student.class_id))
        .await?
        .remove(&summary.student.class_id);

    let mut exams = Vec::with_capacity(summary.exams.len());
    for exam in summary.exams {
        let ExamSummary {
            exam_type,
            academic_year,
            subjects,
            total_marks,
            total_max_marks,
            percentage,
            grade,
            results,
        } = exam;
        exams.push(ExamSummaryResponse {
            exam_type,
            academic_year,
            subjects,
            total_marks,
            total_max_marks,
            percentage,
            grade,
            results: result_responses(db, results).await?,
        });
    }

    Ok(StudentSummaryResponse {
        student: StudentInfo::from(&summary.student),
        class,
        academic_year: summary.student.academic_year,
        exams,
        total_results: summary.total_results,
        average_percentage: summary.average_percentage,
    })
}
