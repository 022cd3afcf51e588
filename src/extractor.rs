use axum::{
    extract::{
        FromRef, FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::errors::AppError;
use crate::repositories::AdminRepository;
use crate::state::AppState;
use crate::utils::jwt::Claims;

/// Verified claims of the administrator making the request.
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("Not authorized, no token".to_string()))?;

        let state = AppState::from_ref(state);
        let claims = state.jwt.decode_jwt(bearer.token()).map_err(|err| {
            tracing::debug!("Rejected bearer token: {}", err);
            AppError::Unauthorized("Not authorized, token failed".to_string())
        })?;

        if AdminRepository::new(&state.db)
            .find_by_id(claims.sub)
            .await?
            .is_none()
        {
            return Err(AppError::Unauthorized(
                "Not authorized, admin not found".to_string(),
            ));
        }

        Ok(AuthClaims(claims))
    }
}

/// JSON body whose rejections render as the standard error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameters: {}", rejection.body_text());
        AppError::BadRequest("Invalid ID format".to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
