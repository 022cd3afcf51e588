use axum::{Json, Router, extract::State, routing::post};

use super::dto::{ChangePasswordRequest, LoginData, LoginRequest};
use crate::errors::{AppError, AppResult};
use crate::extractor::{AppJson, AuthClaims};
use crate::routes::response::{ApiResponse, ErrorResponse, MessageResponse};
use crate::services::auth_service;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/change-password", post(change_password))
}

/// Login endpoint - returns a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginData>),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(AppError::BadRequest(
            "Please provide username and password".to_string(),
        ));
    };

    let outcome = auth_service::login(&state.db, &state.jwt, &username, &password).await?;

    Ok(Json(ApiResponse::data(LoginData {
        id: outcome.admin.admin_id,
        username: outcome.admin.username,
        token: outcome.token,
        expires_in: state.jwt.expires_in_seconds(),
    })))
}

/// Change the password of the signed-in administrator
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Missing or too short password", body = ErrorResponse),
        (status = 401, description = "Invalid current password", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let (Some(old_password), Some(new_password)) = (payload.old_password, payload.new_password)
    else {
        return Err(AppError::BadRequest(
            "Please provide old and new password".to_string(),
        ));
    };

    auth_service::change_password(&state.db, claims.sub, &old_password, &new_password).await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
