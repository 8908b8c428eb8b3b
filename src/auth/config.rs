use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use dotenvy::var;
use rand::RngCore;

pub const SESSION_COOKIE: &str = "otp-session";

#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_secs: i64,
    pub otp_ttl_secs: i64,
    pub secure_cookie: bool,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let secret = var("SESSION_SECRET").unwrap_or_else(|_| {
            warn!("SESSION_SECRET not set, using a random secret; sessions will not survive a restart");
            let mut raw = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut raw);
            URL_SAFE_NO_PAD.encode(raw)
        });
        // one day
        let ttl_secs = var("SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24 * 60 * 60);
        let otp_ttl_secs = var("OTP_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(5 * 60);
        let secure_cookie = var("SESSION_SECURE_COOKIE")
            .ok()
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);
        Self {
            secret,
            ttl_secs,
            otp_ttl_secs,
            secure_cookie,
        }
    }
}
