use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use super::dto::{
    AcademicYearQuery, StudentListQuery, StudentRequest, StudentResponse, student_response,
    student_responses,
};
use crate::errors::{AppError, AppResult};
use crate::extractor::{AppJson, AppPath, AppQuery, AuthClaims};
use crate::repositories::{StudentFilter, StudentRepository};
use crate::routes::common::{flag, optional_id};
use crate::routes::response::{ApiResponse, ErrorResponse, MessageResponse};
use crate::services::student_service::{self, StudentStats};
use crate::services::validation::non_blank;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/students", get(get_all_students).post(create_student))
        .route("/api/students/stats", get(get_student_stats))
        .route("/api/students/class/{class_id}", get(get_students_by_class))
        .route(
            "/api/students/year/{academic_year}",
            get(get_students_by_year),
        )
        .route(
            "/api/students/{student_id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/api/students/{student_id}/toggle", patch(toggle_student))
}

/// List students, newest first
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentListQuery),
    responses(
        (status = 200, description = "Students retrieved", body = ApiResponse<Vec<StudentResponse>>),
        (status = 400, description = "Malformed filter", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn get_all_students(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StudentListQuery>,
) -> AppResult<Json<ApiResponse<Vec<StudentResponse>>>> {
    let filter = StudentFilter {
        class_id: optional_id(&query.class_id, "classId")?,
        academic_year: non_blank(&query.academic_year).map(str::to_string),
        is_active: flag(&query.is_active),
        search: non_blank(&query.search).map(str::to_string),
    };

    let students = StudentRepository::new(&state.db).find_all(filter).await?;
    Ok(Json(ApiResponse::list(
        student_responses(&state.db, students).await?,
    )))
}

/// Head counts by status, academic year and class
#[utoipa::path(
    get,
    path = "/api/students/stats",
    responses(
        (status = 200, description = "Statistics computed", body = ApiResponse<StudentStats>)
    ),
    tag = "Students"
)]
pub async fn get_student_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StudentStats>>> {
    let stats = student_service::student_stats(&state.db).await?;
    Ok(Json(ApiResponse::data(stats)))
}

/// Students of a class ordered by roll id
#[utoipa::path(
    get,
    path = "/api/students/class/{class_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class ID"),
        AcademicYearQuery
    ),
    responses(
        (status = 200, description = "Students retrieved", body = ApiResponse<Vec<StudentResponse>>)
    ),
    tag = "Students"
)]
pub async fn get_students_by_class(
    State(state): State<AppState>,
    AppPath(class_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AcademicYearQuery>,
) -> AppResult<Json<ApiResponse<Vec<StudentResponse>>>> {
    let students = StudentRepository::new(&state.db)
        .find_by_class(
            class_id,
            non_blank(&query.academic_year).map(str::to_string),
        )
        .await?;
    Ok(Json(ApiResponse::list(
        student_responses(&state.db, students).await?,
    )))
}

/// Students enrolled in an academic year
#[utoipa::path(
    get,
    path = "/api/students/year/{academic_year}",
    params(("academic_year" = String, Path, description = "Academic year, e.g. 2025-2026")),
    responses(
        (status = 200, description = "Students retrieved", body = ApiResponse<Vec<StudentResponse>>)
    ),
    tag = "Students"
)]
pub async fn get_students_by_year(
    State(state): State<AppState>,
    AppPath(academic_year): AppPath<String>,
) -> AppResult<Json<ApiResponse<Vec<StudentResponse>>>> {
    let students = StudentRepository::new(&state.db)
        .find_all(StudentFilter {
            academic_year: Some(academic_year),
            ..Default::default()
        })
        .await?;
    Ok(Json(ApiResponse::list(
        student_responses(&state.db, students).await?,
    )))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/api/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student retrieved", body = ApiResponse<StudentResponse>),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    AppPath(student_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<StudentResponse>>> {
    let student = StudentRepository::new(&state.db)
        .find_by_id(student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student"))?;
    Ok(Json(ApiResponse::data(
        student_response(&state.db, student).await?,
    )))
}

/// Register a student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student registered", body = ApiResponse<StudentResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Roll ID already used", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<StudentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<StudentResponse>>)> {
    let student = student_service::create_student(&state.db, payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Student registered successfully",
            student_response(&state.db, student).await?,
        )),
    ))
}

/// Update a student; a new roll id is copied onto the student's results
#[utoipa::path(
    put,
    path = "/api/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = ApiResponse<StudentResponse>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Student or class not found", body = ErrorResponse),
        (status = 409, description = "Roll ID already used", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(student_id): AppPath<Uuid>,
    AppJson(payload): AppJson<StudentRequest>,
) -> AppResult<Json<ApiResponse<StudentResponse>>> {
    let student = student_service::update_student(&state.db, student_id, payload.into()).await?;
    Ok(Json(ApiResponse::with_message(
        "Student updated successfully",
        student_response(&state.db, student).await?,
    )))
}

/// Flip the active flag of a student
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}/toggle",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student toggled", body = ApiResponse<StudentResponse>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn toggle_student(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(student_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<StudentResponse>>> {
    let student = student_service::toggle_student(&state.db, student_id).await?;
    let message = if student.is_active {
        "Student activated successfully"
    } else {
        "Student deactivated successfully"
    };
    Ok(Json(ApiResponse::with_message(
        message,
        student_response(&state.db, student).await?,
    )))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/api/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(student_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    student_service::delete_student(&state.db, student_id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
