use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::utils::jwt::JwtManager;

/// HTTP-facing settings resolved from configuration at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_env: String,
    pub swagger_enabled: bool,
    pub cors_allowed_origins: String,
}

impl Settings {
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_env: "local".to_string(),
            swagger_enabled: true,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtManager>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt: JwtManager, settings: Settings) -> Self {
        Self {
            db,
            jwt: Arc::new(jwt),
            settings: Arc::new(settings),
        }
    }
}
