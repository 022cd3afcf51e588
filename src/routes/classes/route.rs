use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{ClassRequest, ClassResponse};
use crate::errors::{AppError, AppResult};
use crate::extractor::{AppJson, AppPath, AuthClaims};
use crate::repositories::ClassRepository;
use crate::routes::response::{ApiResponse, ErrorResponse, MessageResponse};
use crate::services::class_service;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/classes", get(get_all_classes).post(create_class))
        .route(
            "/api/classes/{class_id}",
            get(get_class).put(update_class).delete(delete_class),
        )
}

/// List all classes
#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "Classes retrieved", body = ApiResponse<Vec<ClassResponse>>)
    ),
    tag = "Classes"
)]
pub async fn get_all_classes(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ClassResponse>>>> {
    let classes = ClassRepository::new(&state.db).find_all().await?;
    Ok(Json(ApiResponse::list(
        classes.into_iter().map(ClassResponse::from).collect(),
    )))
}

/// Get class by ID
#[utoipa::path(
    get,
    path = "/api/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class retrieved", body = ApiResponse<ClassResponse>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
pub async fn get_class(
    State(state): State<AppState>,
    AppPath(class_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<ClassResponse>>> {
    let class = ClassRepository::new(&state.db)
        .find_by_id(class_id)
        .await?
        .ok_or_else(|| AppError::not_found("Class"))?;
    Ok(Json(ApiResponse::data(class.into())))
}

/// Create a class
#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = ClassRequest,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<ClassResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 409, description = "Class already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<ClassRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ClassResponse>>)> {
    let class = class_service::create_class(&state.db, payload.name, payload.section).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Class created successfully",
            class.into(),
        )),
    ))
}

/// Update a class
#[utoipa::path(
    put,
    path = "/api/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    request_body = ClassRequest,
    responses(
        (status = 200, description = "Class updated", body = ApiResponse<ClassResponse>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Another class has this name and section", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn update_class(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(class_id): AppPath<Uuid>,
    AppJson(payload): AppJson<ClassRequest>,
) -> AppResult<Json<ApiResponse<ClassResponse>>> {
    let class =
        class_service::update_class(&state.db, class_id, payload.name, payload.section).await?;
    Ok(Json(ApiResponse::with_message(
        "Class updated successfully",
        class.into(),
    )))
}

/// Delete a class
#[utoipa::path(
    delete,
    path = "/api/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(class_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    class_service::delete_class(&state.db, class_id).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}
