use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use uuid::Uuid;

use super::dto::{SubjectDeletedResponse, SubjectRequest, SubjectResponse};
use crate::errors::{AppError, AppResult};
use crate::extractor::{AppJson, AppPath, AuthClaims};
use crate::repositories::SubjectRepository;
use crate::routes::response::{ApiResponse, ErrorResponse};
use crate::services::subject_service;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/subjects", get(get_all_subjects).post(create_subject))
        .route(
            "/api/subjects/{subject_id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
}

/// List all subjects
#[utoipa::path(
    get,
    path = "/api/subjects",
    responses(
        (status = 200, description = "Subjects retrieved", body = ApiResponse<Vec<SubjectResponse>>)
    ),
    tag = "Subjects"
)]
pub async fn get_all_subjects(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<SubjectResponse>>>> {
    let subjects = SubjectRepository::new(&state.db).find_all().await?;
    Ok(Json(ApiResponse::list(
        subjects.into_iter().map(SubjectResponse::from).collect(),
    )))
}

/// Get subject by ID
#[utoipa::path(
    get,
    path = "/api/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject retrieved", body = ApiResponse<SubjectResponse>),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Subjects"
)]
pub async fn get_subject(
    State(state): State<AppState>,
    AppPath(subject_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<SubjectResponse>>> {
    let subject = SubjectRepository::new(&state.db)
        .find_by_id(subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject"))?;
    Ok(Json(ApiResponse::data(subject.into())))
}

/// Create a subject
#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = SubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = ApiResponse<SubjectResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 409, description = "Name or code already used", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<SubjectRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SubjectResponse>>)> {
    let subject = subject_service::create_subject(&state.db, payload.name, payload.code).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Subject created successfully",
            subject.into(),
        )),
    ))
}

/// Update a subject; a new code is copied onto its combinations and results
#[utoipa::path(
    put,
    path = "/api/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = ApiResponse<SubjectResponse>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse),
        (status = 409, description = "Name or code already used", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn update_subject(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(subject_id): AppPath<Uuid>,
    AppJson(payload): AppJson<SubjectRequest>,
) -> AppResult<Json<ApiResponse<SubjectResponse>>> {
    let subject =
        subject_service::update_subject(&state.db, subject_id, payload.name, payload.code)
            .await?;
    Ok(Json(ApiResponse::with_message(
        "Subject updated successfully",
        subject.into(),
    )))
}

/// Delete a subject together with its combinations and results
#[utoipa::path(
    delete,
    path = "/api/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject and dependent records deleted", body = SubjectDeletedResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(subject_id): AppPath<Uuid>,
) -> AppResult<Json<SubjectDeletedResponse>> {
    let deletion = subject_service::delete_subject(&state.db, subject_id).await?;
    Ok(Json(SubjectDeletedResponse {
        success: true,
        message: format!("Subject \"{}\" deleted successfully", deletion.name),
        deleted_records: deletion.deleted,
    }))
}
