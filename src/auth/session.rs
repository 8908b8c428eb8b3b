//! In-process session store behind a signed `otp-session` cookie.
//!
//! Cookie value format: `base64url(id).hex(hmac_sha256(id))`. The session
//! contents never leave the server.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::cookie::{time, Cookie, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::config::{SessionConfig, SESSION_COOKIE};
use crate::auth::Principal;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Malformed session cookie")]
    Malformed,
    #[error("Invalid session signature")]
    BadSignature,
    #[error("Session not found or expired")]
    Unknown,
}

/// An OTP waiting to be verified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingOtp {
    pub code: u32,
    pub email: String,
    pub expires_at: DateTime<Utc>,
    /// Wrong codes submitted so far.
    pub failed_attempts: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionData {
    pub otp: Option<PendingOtp>,
    pub principal: Option<Principal>,
}

struct Entry {
    data: SessionData,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    secret: Arc<String>,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionStore {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            secret: Arc::new(cfg.secret.clone()),
            ttl: Duration::seconds(cfg.ttl_secs),
            secure_cookie: cfg.secure_cookie,
        }
    }

    fn new_session_id() -> String {
        let mut raw = [0u8; 24];
        rand::thread_rng().fill_bytes(&mut raw);
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Returns the live session data for `id`.
    pub async fn get(&self, id: &str) -> Option<SessionData> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        entries
            .get(id)
            .filter(|e| e.expires_at > now)
            .map(|e| e.data.clone())
    }

    /// Stores `data` under `id` when that session is still live, otherwise under a
    /// fresh id. Returns the id the data now lives under and refreshes its expiry.
    pub async fn save(&self, id: Option<&str>, data: SessionData) -> String {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        let live = id.filter(|id| entries.get(*id).is_some_and(|e| e.expires_at > now));
        let id = match live {
            Some(id) => id.to_string(),
            None => {
                let before = entries.len();
                entries.retain(|_, e| e.expires_at > now);
                if entries.len() != before {
                    debug!("session store: purged {} expired session(s)", before - entries.len());
                }
                Self::new_session_id()
            }
        };

        entries.insert(
            id.clone(),
            Entry {
                data,
                expires_at: now + self.ttl,
            },
        );
        id
    }

    /// Moves `data` to a fresh id and drops the session under `old`.
    /// Used whenever the principal changes.
    pub async fn rotate(&self, old: Option<&str>, data: SessionData) -> String {
        if let Some(old) = old {
            self.destroy(old).await;
        }
        self.save(None, data).await
    }

    pub async fn destroy(&self, id: &str) {
        self.entries.write().await.remove(id);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn signature(&self, id: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn sign(&self, id: &str) -> String {
        format!("{}.{}", id, self.signature(id))
    }

    /// Checks the cookie signature and returns the session id it carries.
    pub fn verify(&self, cookie_value: &str) -> Result<String, SessionError> {
        let (id, provided) = cookie_value
            .trim()
            .rsplit_once('.')
            .ok_or(SessionError::Malformed)?;
        if id.is_empty() || provided.is_empty() {
            return Err(SessionError::Malformed);
        }

        let provided = hex::decode(provided).map_err(|_| SessionError::Malformed)?;
        let mut mac =
            HmacSha256::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(id.as_bytes());
        // verify_slice compares in constant time
        mac.verify_slice(&provided)
            .map_err(|_| SessionError::BadSignature)?;

        Ok(id.to_string())
    }

    /// Resolves a raw cookie value to a live session.
    pub async fn resolve(&self, cookie_value: &str) -> Result<(String, SessionData), SessionError> {
        let id = self.verify(cookie_value)?;
        let data = self.get(&id).await.ok_or(SessionError::Unknown)?;
        Ok((id, data))
    }

    pub fn cookie(&self, id: &str) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, self.sign(id))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookie)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .finish()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .finish();
        cookie.make_removal();
        cookie
    }
}
