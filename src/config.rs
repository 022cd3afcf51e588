use clap::Parser;
use once_cell::sync::Lazy;

use crate::state::Settings;

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env)]
    pub jwt_secret: String,

    #[clap(long, env, default_value_t = 30)]
    pub jwt_expires_in_days: i64,

    #[clap(long, env, default_value = "admin@gmail.com")]
    pub admin_username: String,

    #[clap(long, env, default_value = "admin123")]
    pub admin_password: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            app_env: self.app_env.clone(),
            swagger_enabled: self.swagger_enabled,
            cors_allowed_origins: self.cors_allowed_origins.clone(),
        }
    }
}
