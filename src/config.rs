use chrono::FixedOffset;
use dotenvy::var;

use crate::auth::SessionConfig;
use crate::mailer::MailConfig;
use crate::services::day_window::parse_tz_offset_from_env;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
    pub mail: MailConfig,
    /// How long after placing an order its user may still cancel it.
    pub cancel_window_secs: i64,
    pub tz: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = var("DATABASE_URL").expect("DATABASE_URL must be set");
        let host = var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        // 10 minutes default
        let cancel_window_secs = var("ORDER_CANCEL_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(10 * 60);
        Self {
            database_url,
            host,
            port,
            session: SessionConfig::from_env(),
            mail: MailConfig::from_env(),
            cancel_window_secs,
            tz: parse_tz_offset_from_env(),
        }
    }
}
