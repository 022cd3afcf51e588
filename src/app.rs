use crate::api_docs::ApiDoc;
use crate::errors::{AppError, set_expose_error_detail};
use crate::middleware::http_logger::http_logger;
use crate::routes;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use http::{HeaderName, HeaderValue, Method, header};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    ServiceBuilderExt,
    cors::{AllowOrigin, Any, CorsLayer},
    propagate_header::PropagateHeaderLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

const CORS_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::AUTHORIZATION,
    header::ACCEPT,
    header::ACCEPT_LANGUAGE,
];

const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
];

/// `*` allows any origin without credentials; otherwise a comma separated
/// allow list with credentials.
fn cors_layer(allowed: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(CORS_METHODS)
        .allow_headers(CORS_HEADERS);

    if allowed.trim() == "*" {
        return base.allow_origin(Any).allow_credentials(false);
    }

    let origins: Vec<HeaderValue> = allowed
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

pub fn create_app(state: AppState) -> Router {
    set_expose_error_detail(!state.settings.is_production());

    let mut router = routes::create_routes().fallback(route_not_found);

    if state.settings.swagger_enabled {
        let swagger_ui =
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());
        router = router.merge(swagger_ui);
    }

    // Axum middleware needs the state; tower layers go through ServiceBuilder.
    let router = router.layer(middleware::from_fn_with_state(state.clone(), http_logger));

    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    let middleware = ServiceBuilder::new()
        .layer(cors_layer(&state.settings.cors_allowed_origins))
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .sensitive_request_headers(sensitive_headers.clone())
        .sensitive_response_headers(sensitive_headers)
        .compression();

    router.layer(middleware).with_state(state)
}
