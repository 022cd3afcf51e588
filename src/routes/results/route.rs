use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use super::dto::{
    BulkDeleteRequest, BulkResultData, BulkResultRequest, DeletedCount, ResultListQuery,
    ResultResponse, ScopedResultQuery, StudentSummaryResponse, SummaryQuery, result_response,
    result_responses, student_summary_response,
};
use crate::errors::{AppError, AppResult};
use crate::extractor::{AppJson, AppPath, AppQuery, AuthClaims};
use crate::repositories::{ResultFilter, ResultOrder, ResultRepository};
use crate::routes::response::{ApiResponse, ErrorResponse, MessageResponse};
use crate::services::result_service::{self, ResultStats};
use crate::services::validation::{ResultInput, ResultUpdate, non_blank};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/results", get(get_all_results).post(create_result))
        .route("/api/results/stats", get(get_result_stats))
        .route("/api/results/bulk", post(bulk_create_results))
        .route("/api/results/bulk-delete", post(bulk_delete_results))
        .route("/api/results/all", delete(delete_all_results))
        .route(
            "/api/results/student/{student_id}",
            get(get_results_by_student),
        )
        .route(
            "/api/results/student/{student_id}/summary",
            get(get_student_summary),
        )
        .route("/api/results/class/{class_id}", get(get_results_by_class))
        .route(
            "/api/results/subject/{subject_id}",
            get(get_results_by_subject),
        )
        .route(
            "/api/results/{result_id}",
            get(get_result).put(update_result).delete(delete_result),
        )
}

/// List results, newest first
#[utoipa::path(
    get,
    path = "/api/results",
    params(ResultListQuery),
    responses(
        (status = 200, description = "Results retrieved", body = ApiResponse<Vec<ResultResponse>>),
        (status = 400, description = "Malformed filter", body = ErrorResponse)
    ),
    tag = "Results"
)]
pub async fn get_all_results(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ResultListQuery>,
) -> AppResult<Json<ApiResponse<Vec<ResultResponse>>>> {
    list(&state, query.into_filter()?, ResultOrder::Newest).await
}

/// Grade distribution, subject averages and top performers
#[utoipa::path(
    get,
    path = "/api/results/stats",
    params(ResultListQuery),
    responses(
        (status = 200, description = "Statistics computed", body = ApiResponse<ResultStats>),
        (status = 400, description = "Malformed filter", body = ErrorResponse)
    ),
    tag = "Results"
)]
pub async fn get_result_stats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ResultListQuery>,
) -> AppResult<Json<ApiResponse<ResultStats>>> {
    let stats = result_service::result_stats(&state.db, query.into_filter()?).await?;
    Ok(Json(ApiResponse::data(stats)))
}

/// Results of one student, newest first
#[utoipa::path(
    get,
    path = "/api/results/student/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ScopedResultQuery
    ),
    responses(
        (status = 200, description = "Results retrieved", body = ApiResponse<Vec<ResultResponse>>)
    ),
    tag = "Results"
)]
pub async fn get_results_by_student(
    State(state): State<AppState>,
    AppPath(student_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<ScopedResultQuery>,
) -> AppResult<Json<ApiResponse<Vec<ResultResponse>>>> {
    let filter = ResultFilter {
        student_id: Some(student_id),
        ..query.into_filter()?
    };
    list(&state, filter, ResultOrder::Newest).await
}

/// Per-exam totals, percentage and grade for one student
#[utoipa::path(
    get,
    path = "/api/results/student/{student_id}/summary",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        SummaryQuery
    ),
    responses(
        (status = 200, description = "Summary computed", body = ApiResponse<StudentSummaryResponse>),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Results"
)]
pub async fn get_student_summary(
    State(state): State<AppState>,
    AppPath(student_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<SummaryQuery>,
) -> AppResult<Json<ApiResponse<StudentSummaryResponse>>> {
    let academic_year = non_blank(&query.academic_year).map(str::to_string);
    let summary = result_service::student_summary(&state.db, student_id, academic_year).await?;
    Ok(Json(ApiResponse::data(
        student_summary_response(&state.db, summary).await?,
    )))
}

/// Results of one class ordered by roll id
#[utoipa::path(
    get,
    path = "/api/results/class/{class_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class ID"),
        ScopedResultQuery
    ),
    responses(
        (status = 200, description = "Results retrieved", body = ApiResponse<Vec<ResultResponse>>)
    ),
    tag = "Results"
)]
pub async fn get_results_by_class(
    State(state): State<AppState>,
    AppPath(class_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<ScopedResultQuery>,
) -> AppResult<Json<ApiResponse<Vec<ResultResponse>>>> {
    let filter = ResultFilter {
        class_id: Some(class_id),
        ..query.into_filter()?
    };
    list(&state, filter, ResultOrder::RollId).await
}

/// Results of one subject, highest marks first
#[utoipa::path(
    get,
    path = "/api/results/subject/{subject_id}",
    params(
        ("subject_id" = Uuid, Path, description = "Subject ID"),
        ScopedResultQuery
    ),
    responses(
        (status = 200, description = "Results retrieved", body = ApiResponse<Vec<ResultResponse>>)
    ),
    tag = "Results"
)]
pub async fn get_results_by_subject(
    State(state): State<AppState>,
    AppPath(subject_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<ScopedResultQuery>,
) -> AppResult<Json<ApiResponse<Vec<ResultResponse>>>> {
    let filter = ResultFilter {
        subject_id: Some(subject_id),
        ..query.into_filter()?
    };
    list(&state, filter, ResultOrder::HighestMarks).await
}

async fn list(
    state: &AppState,
    filter: ResultFilter,
    order: ResultOrder,
) -> AppResult<Json<ApiResponse<Vec<ResultResponse>>>> {
    let results = ResultRepository::new(&state.db)
        .find_all(filter, order)
        .await?;
    Ok(Json(ApiResponse::list(
        result_responses(&state.db, results).await?,
    )))
}

/// Get result by ID
#[utoipa::path(
    get,
    path = "/api/results/{result_id}",
    params(("result_id" = Uuid, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result retrieved", body = ApiResponse<ResultResponse>),
        (status = 404, description = "Result not found", body = ErrorResponse)
    ),
    tag = "Results"
)]
pub async fn get_result(
    State(state): State<AppState>,
    AppPath(result_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<ResultResponse>>> {
    let result = ResultRepository::new(&state.db)
        .find_by_id(result_id)
        .await?
        .ok_or_else(|| AppError::not_found("Result"))?;
    Ok(Json(ApiResponse::data(
        result_response(&state.db, result).await?,
    )))
}

/// Record a result; percentage and grade are derived from the marks
#[utoipa::path(
    post,
    path = "/api/results",
    request_body = ResultInput,
    responses(
        (status = 201, description = "Result added", body = ApiResponse<ResultResponse>),
        (status = 400, description = "Validation failed or subject not offered", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Student, class or subject not found", body = ErrorResponse),
        (status = 409, description = "Duplicate result or identity mismatch", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
pub async fn create_result(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<ResultInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ResultResponse>>)> {
    let result = result_service::create_result(&state.db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Result added successfully",
            result_response(&state.db, result).await?,
        )),
    ))
}

/// Record many results; each item succeeds or fails on its own
#[utoipa::path(
    post,
    path = "/api/results/bulk",
    request_body = BulkResultRequest,
    responses(
        (status = 201, description = "Batch processed", body = ApiResponse<BulkResultData>),
        (status = 400, description = "Empty batch", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
pub async fn bulk_create_results(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<BulkResultRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BulkResultData>>)> {
    let outcome = result_service::bulk_create_results(&state.db, payload.results).await?;
    let message = format!(
        "{} result(s) created successfully, {} failed",
        outcome.summary.successful, outcome.summary.failed
    );
    let created = result_responses(&state.db, outcome.created).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            message,
            BulkResultData {
                created,
                errors: outcome.errors,
                summary: outcome.summary,
            },
        )),
    ))
}

/// Update marks, exam type or academic year of a result
#[utoipa::path(
    put,
    path = "/api/results/{result_id}",
    params(("result_id" = Uuid, Path, description = "Result ID")),
    request_body = ResultUpdate,
    responses(
        (status = 200, description = "Result updated", body = ApiResponse<ResultResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse),
        (status = 409, description = "Duplicate result", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
pub async fn update_result(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(result_id): AppPath<Uuid>,
    AppJson(payload): AppJson<ResultUpdate>,
) -> AppResult<Json<ApiResponse<ResultResponse>>> {
    let result = result_service::update_result(&state.db, result_id, payload).await?;
    Ok(Json(ApiResponse::with_message(
        "Result updated successfully",
        result_response(&state.db, result).await?,
    )))
}

/// Delete a result
#[utoipa::path(
    delete,
    path = "/api/results/{result_id}",
    params(("result_id" = Uuid, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result deleted", body = MessageResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
pub async fn delete_result(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(result_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    result_service::delete_result(&state.db, result_id).await?;
    Ok(Json(MessageResponse::new("Result deleted successfully")))
}

/// Delete the results with the given ids
#[utoipa::path(
    post,
    path = "/api/results/bulk-delete",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Results deleted", body = ApiResponse<DeletedCount>),
        (status = 400, description = "No ids given", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
pub async fn bulk_delete_results(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<BulkDeleteRequest>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let deleted_count = result_service::delete_results(&state.db, payload.ids).await?;
    Ok(Json(ApiResponse::with_message(
        format!("{deleted_count} result(s) deleted successfully"),
        DeletedCount { deleted_count },
    )))
}

/// Delete every result
#[utoipa::path(
    delete,
    path = "/api/results/all",
    responses(
        (status = 200, description = "All results deleted", body = ApiResponse<DeletedCount>),
        (status = 401, description = "Not authorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
pub async fn delete_all_results(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let deleted_count = result_service::delete_all_results(&state.db).await?;
    Ok(Json(ApiResponse::with_message(
        format!("All results deleted successfully ({deleted_count} removed)"),
        DeletedCount { deleted_count },
    )))
}
