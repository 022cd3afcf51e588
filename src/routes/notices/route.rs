use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

use super::dto::{
    ActiveNoticeQuery, NoticeListQuery, NoticeListResponse, NoticeRequest, NoticeResponse,
    PriorityNoticeQuery,
};
use crate::errors::{AppError, AppResult};
use crate::extractor::{AppJson, AppPath, AppQuery, AuthClaims};
use crate::repositories::NoticeRepository;
use crate::routes::common::flag;
use crate::routes::response::{ApiResponse, ErrorResponse, MessageResponse};
use crate::services::notice_service::{self, NoticeStats};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/notices", get(get_all_notices).post(create_notice))
        .route("/api/notices/stats", get(get_notice_stats))
        .route("/api/notices/active", get(get_active_notices))
        .route(
            "/api/notices/priority/{priority}",
            get(get_notices_by_priority),
        )
        .route(
            "/api/notices/{notice_id}",
            get(get_notice).put(update_notice).delete(delete_notice),
        )
        .route("/api/notices/{notice_id}/toggle", patch(toggle_notice))
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Paginated notice listing, newest first
#[utoipa::path(
    get,
    path = "/api/notices",
    params(NoticeListQuery),
    responses(
        (status = 200, description = "Notices retrieved", body = NoticeListResponse),
        (status = 400, description = "Unknown priority or audience", body = ErrorResponse)
    ),
    tag = "Notices"
)]
pub async fn get_all_notices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NoticeListQuery>,
) -> AppResult<Json<NoticeListResponse>> {
    let now = now();
    let page = notice_service::list_notices(&state.db, query.into(), now).await?;
    let data = NoticeResponse::all_at(page.notices, now);

    Ok(Json(NoticeListResponse {
        success: true,
        count: data.len(),
        total: page.total,
        page: page.page,
        pages: page.pages,
        data,
    }))
}

/// Notice counts by state, priority and audience
#[utoipa::path(
    get,
    path = "/api/notices/stats",
    responses(
        (status = 200, description = "Statistics computed", body = ApiResponse<NoticeStats>)
    ),
    tag = "Notices"
)]
pub async fn get_notice_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<NoticeStats>>> {
    let stats = notice_service::notice_stats(&state.db, now()).await?;
    Ok(Json(ApiResponse::data(stats)))
}

/// Notices currently on display, most important first
#[utoipa::path(
    get,
    path = "/api/notices/active",
    params(ActiveNoticeQuery),
    responses(
        (status = 200, description = "Notices retrieved", body = ApiResponse<Vec<NoticeResponse>>),
        (status = 400, description = "Unknown priority or audience", body = ErrorResponse)
    ),
    tag = "Notices"
)]
pub async fn get_active_notices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ActiveNoticeQuery>,
) -> AppResult<Json<ApiResponse<Vec<NoticeResponse>>>> {
    let now = now();
    let notices =
        notice_service::active_notices(&state.db, query.target_audience, query.priority, now)
            .await?;
    Ok(Json(ApiResponse::list(NoticeResponse::all_at(notices, now))))
}

/// Notices of one priority, newest first
#[utoipa::path(
    get,
    path = "/api/notices/priority/{priority}",
    params(
        ("priority" = String, Path, description = "low, medium, high or urgent"),
        PriorityNoticeQuery
    ),
    responses(
        (status = 200, description = "Notices retrieved", body = ApiResponse<Vec<NoticeResponse>>),
        (status = 400, description = "Unknown priority or audience", body = ErrorResponse)
    ),
    tag = "Notices"
)]
pub async fn get_notices_by_priority(
    State(state): State<AppState>,
    AppPath(priority): AppPath<String>,
    AppQuery(query): AppQuery<PriorityNoticeQuery>,
) -> AppResult<Json<ApiResponse<Vec<NoticeResponse>>>> {
    let notices = notice_service::notices_by_priority(
        &state.db,
        &priority,
        flag(&query.is_active),
        query.target_audience,
    )
    .await?;
    Ok(Json(ApiResponse::list(NoticeResponse::all_at(
        notices,
        now(),
    ))))
}

/// Get notice by ID
#[utoipa::path(
    get,
    path = "/api/notices/{notice_id}",
    params(("notice_id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice retrieved", body = ApiResponse<NoticeResponse>),
        (status = 404, description = "Notice not found", body = ErrorResponse)
    ),
    tag = "Notices"
)]
pub async fn get_notice(
    State(state): State<AppState>,
    AppPath(notice_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<NoticeResponse>>> {
    let notice = NoticeRepository::new(&state.db)
        .find_by_id(notice_id)
        .await?
        .ok_or_else(|| AppError::not_found("Notice"))?;
    Ok(Json(ApiResponse::data(NoticeResponse::at(notice, now()))))
}

/// Publish a notice
#[utoipa::path(
    post,
    path = "/api/notices",
    request_body = NoticeRequest,
    responses(
        (status = 201, description = "Notice created", body = ApiResponse<NoticeResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notices"
)]
pub async fn create_notice(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppJson(payload): AppJson<NoticeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<NoticeResponse>>)> {
    let now = now();
    let notice = notice_service::create_notice(&state.db, payload.into(), now).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Notice created successfully",
            NoticeResponse::at(notice, now),
        )),
    ))
}

/// Update a notice; a notice whose expiry has passed is deactivated
#[utoipa::path(
    put,
    path = "/api/notices/{notice_id}",
    params(("notice_id" = Uuid, Path, description = "Notice ID")),
    request_body = NoticeRequest,
    responses(
        (status = 200, description = "Notice updated", body = ApiResponse<NoticeResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notices"
)]
pub async fn update_notice(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(notice_id): AppPath<Uuid>,
    AppJson(payload): AppJson<NoticeRequest>,
) -> AppResult<Json<ApiResponse<NoticeResponse>>> {
    let now = now();
    let notice = notice_service::update_notice(&state.db, notice_id, payload.into(), now).await?;
    Ok(Json(ApiResponse::with_message(
        "Notice updated successfully",
        NoticeResponse::at(notice, now),
    )))
}

/// Flip the active flag of a notice
#[utoipa::path(
    patch,
    path = "/api/notices/{notice_id}/toggle",
    params(("notice_id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice toggled", body = ApiResponse<NoticeResponse>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notices"
)]
pub async fn toggle_notice(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(notice_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<NoticeResponse>>> {
    let now = now();
    let notice = notice_service::toggle_notice(&state.db, notice_id, now).await?;
    let message = if notice.is_active {
        "Notice activated successfully"
    } else {
        "Notice deactivated successfully"
    };
    Ok(Json(ApiResponse::with_message(
        message,
        NoticeResponse::at(notice, now),
    )))
}

/// Delete a notice
#[utoipa::path(
    delete,
    path = "/api/notices/{notice_id}",
    params(("notice_id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice deleted", body = MessageResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notices"
)]
pub async fn delete_notice(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    AppPath(notice_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    notice_service::delete_notice(&state.db, notice_id).await?;
    Ok(Json(MessageResponse::new("Notice deleted successfully")))
}
