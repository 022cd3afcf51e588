use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use super::dto::{
    BulkCombinationData, BulkCombinationRequest, CombinationListQuery, CombinationRequest,
    CombinationResponse, combination_response, combination_responses,
};
use crate::errors::{AppError, AppResult};
use crate::extractor::{AppJson, AppPath, AppQuery, AuthClaims};
use crate::repositories::{CombinationFilter, CombinationRepository};
use crate::routes::common::optional_id;
use crate::routes::response::{ApiResponse, ErrorResponse, MessageResponse};
use crate::services::combination_service;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route(
            "/api/combinations",
            get(get_all_combinations).post(create_combination),
        )
        .route("/api/combinations/bulk", post(create_bulk_combinations))
        .route(
            "/api/combinations/class/{class_id}",
            get(get_combinations_by_class),
        )
        .route(
            "/api/combinations/subject/{subject_id}",
            get(get_combinations_by_subject),
        )
        .route(
            "/api/combinations/{combination_id}",
            get(get_combination)
                .put(update_combination)
                .delete(delete_combination),
        )
        .route(
            "/api/combinations/{combination_id}/toggle",
            patch(toggle_combination),
        )
}

/// List combinations, optionally filtered by class or subject
#[utoipa::path(
    get,
    path = "/api/combinations",
    params(CombinationListQuery),
    responses(
        (status = 200, description = "Combinations retrieved", body = ApiResponse<Vec<CombinationResponse>>),
        (status = 400, description = "Malformed filter", body = ErrorResponse)
    ),
    tag = "Combinations"
)]
pub async fn get_all_combinations(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CombinationListQuery>,
) -> AppResult<Json<ApiResponse<Vec<CombinationResponse>>>> {
    let filter = CombinationFilter {
        class_id: optional_id(&query.class_id, "classId")?,
        subject_id: optional_id(&query.subject_id, "subjectId")?,
    };
    list(&state, filter).await
}

/// Combinations of one class
#[utoipa::path(
    get,
    path = "/api/combinations/class/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Combinations retrieved", body = ApiResponse<Vec<CombinationResponse>>)
    ),
    tag = "Combinations"
)]
pub async fn get_combinations_by_class(
    State(state): State<AppState>,
    AppPath(class_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<CombinationResponse>>>> {
    list(
        &state,
        CombinationFilter {
            class_id: Some(class_id),
            subject_id: None,
        },
    )
    .await
}

/// Combinations of one subject
#[utoipa::path(
    get,
    path = "/api/combinations/subject/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Combinations retrieved", body = ApiResponse<Vec<CombinationResponse>>)
    ),
    tag = "Combinations"
)]
pub async fn get_combinations_by_subject(
    State(state): State<AppState>,
    AppPath(subject_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<CombinationResponse>>>> {
    list(
        &state,
        CombinationFilter {
            class_id: None,
            subject_id: Some(subject_id),
        },
    )
    .await
}

async fn list(
    state: &AppState,
    filter: CombinationFilter,
) -> AppResult<Json<ApiResponse<Vec<CombinationResponse>>>> {
    let combinations = CombinationRepository::new(&state.db).find_all(filter).await?;
    let responses = combination_responses(&state.db, combinations).await?;
    Ok(Json(ApiResponse::list(responses)))
}

/// Get combination by ID
#[utoipa::path(
    get,
    path = "/api/combinations/{combination_id}",
    params(("combination_id" = Uuid, Path, description = "Combination ID")),
    responses(
        (status = 200, description = "Combination retrieved", body = ApiResponse<CombinationResponse>),
        (status = 404, description = "Combination not found", body = ErrorResponse)
    ),
    tag = "Combinations"
)]
pub async fn get_combination(
    State(state): State<AppState>,
    AppPath(combination_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<CombinationResponse>>> {
    let combination = CombinationRepository::new(&state.db)
        .find_by_id(combination_id)
        .await?
        .ok_or_else(|| AppError::not_found("Combination"))?;
    Ok(Json(ApiResponse::data(
        combination_response(&state.db, combination).await?,
    )))
}

/// Link a subject to a class
#[utoipa::path(
    post,
    path = "/api/combinations",
    request_body = CombinationRequest,
    responses(
        (status = 201, description = "Combination created", body = ApiResponse<CombinationResponse>),
        (status = 400, description = "Missing class or subject", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Class or subject not found", body = ErrorResponse),
        (status = 409, description = "Combination already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Combinations"
)]
pub async fn create_combination(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<CombinationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CombinationResponse>>)> {
    let (Some(class_id), Some(subject_id)) = (payload.class_id, payload.subject_id) else {
        return Err(AppError::BadRequest(
            "Class ID and Subject ID are required".to_string(),
        ));
    };

    let combination =
        combination_service::create_combination(&state.db, class_id, subject_id, payload.is_active)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Combination created successfully",
            combination_response(&state.db, combination).await?,
        )),
    ))
}

/// Link several subjects to one class, skipping existing links
#[utoipa::path(
    post,
    path = "/api/combinations/bulk",
    request_body = BulkCombinationRequest,
    responses(
        (status = 201, description = "Combinations created", body = ApiResponse<BulkCombinationData>),
        (status = 400, description = "Missing class or subjects", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Class or subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Combinations"
)]
pub async fn create_bulk_combinations(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<BulkCombinationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BulkCombinationData>>)> {
    let outcome = combination_service::create_bulk_combinations(
        &state.db,
        payload.class_id,
        payload.subject_ids,
        payload.is_active,
    )
    .await?;

    let message = format!(
        "{} combination(s) created successfully, {} skipped (already exist)",
        outcome.created.len(),
        outcome.skipped
    );
    let created = combination_responses(&state.db, outcome.created).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            message,
            BulkCombinationData {
                created,
                skipped: outcome.skipped,
                total: outcome.total,
            },
        )),
    ))
}

/// Update a combination
#[utoipa::path(
    put,
    path = "/api/combinations/{combination_id}",
    params(("combination_id" = Uuid, Path, description = "Combination ID")),
    request_body = CombinationRequest,
    responses(
        (status = 200, description = "Combination updated", body = ApiResponse<CombinationResponse>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Combination, class or subject not found", body = ErrorResponse),
        (status = 409, description = "Combination already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Combinations"
)]
pub async fn update_combination(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(combination_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CombinationRequest>,
) -> AppResult<Json<ApiResponse<CombinationResponse>>> {
    let combination = combination_service::update_combination(
        &state.db,
        combination_id,
        payload.class_id,
        payload.subject_id,
        payload.is_active,
    )
    .await?;

    Ok(Json(ApiResponse::with_message(
        "Combination updated successfully",
        combination_response(&state.db, combination).await?,
    )))
}

/// Flip the active flag of a combination
#[utoipa::path(
    patch,
    path = "/api/combinations/{combination_id}/toggle",
    params(("combination_id" = Uuid, Path, description = "Combination ID")),
    responses(
        (status = 200, description = "Combination toggled", body = ApiResponse<CombinationResponse>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Combination not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Combinations"
)]
pub async fn toggle_combination(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(combination_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<CombinationResponse>>> {
    let combination = combination_service::toggle_combination(&state.db, combination_id).await?;
    let message = if combination.is_active {
        "Combination activated successfully"
    } else {
        "Combination deactivated successfully"
    };

    Ok(Json(ApiResponse::with_message(
        message,
        combination_response(&state.db, combination).await?,
    )))
}

/// Delete a combination
#[utoipa::path(
    delete,
    path = "/api/combinations/{combination_id}",
    params(("combination_id" = Uuid, Path, description = "Combination ID")),
    responses(
        (status = 200, description = "Combination deleted", body = MessageResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Combination not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Combinations"
)]
pub async fn delete_combination(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(combination_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    combination_service::delete_combination(&state.db, combination_id).await?;
    Ok(Json(MessageResponse::new("Combination deleted successfully")))
}
