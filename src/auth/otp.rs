use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

use crate::auth::session::PendingOtp;

/// Wrong codes allowed before the pending OTP is discarded.
pub const MAX_OTP_ATTEMPTS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("OTP session expired")]
    Missing,
    #[error("OTP expired")]
    Expired,
    #[error("Invalid OTP")]
    Mismatch,
}

/// Four digit code, never starting with zero.
pub fn generate_otp() -> u32 {
    rand::thread_rng().gen_range(1000..=9999)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn issue_otp(email: &str, now: DateTime<Utc>, ttl_secs: i64) -> PendingOtp {
    PendingOtp {
        code: generate_otp(),
        email: normalize_email(email),
        expires_at: now + Duration::seconds(ttl_secs),
        failed_attempts: 0,
    }
}

/// Checks a submitted code against the one stored in the session.
/// Expiry is checked before the code itself.
pub fn verify_otp(
    pending: Option<&PendingOtp>,
    email: &str,
    code: u32,
    now: DateTime<Utc>,
) -> Result<(), OtpError> {
    let pending = pending.ok_or(OtpError::Missing)?;
    if now > pending.expires_at {
        return Err(OtpError::Expired);
    }
    if pending.email != normalize_email(email) || pending.code != code {
        return Err(OtpError::Mismatch);
    }
    Ok(())
}

/// What remains of the pending OTP after a rejected verification.
/// Expired codes are dropped; a wrong code burns one attempt.
pub fn after_rejection(pending: Option<PendingOtp>, err: &OtpError) -> Option<PendingOtp> {
    match err {
        OtpError::Mismatch => pending.and_then(|mut p| {
            p.failed_attempts += 1;
            (p.failed_attempts < MAX_OTP_ATTEMPTS).then_some(p)
        }),
        OtpError::Missing | OtpError::Expired => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-12-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn generated_codes_have_four_digits() {
        for _ in 0..500 {
            let code = generate_otp();
            assert!((1000..=9999).contains(&code), "{code}");
        }
    }

    #[test]
    fn accepts_matching_code_within_ttl() {
        let pending = PendingOtp {
            code: 4821,
            email: "a@b.com".to_string(),
            expires_at: now() + Duration::minutes(5),
            failed_attempts: 0,
        };
        assert_eq!(verify_otp(Some(&pending), " A@B.com ", 4821, now()), Ok(()));
        // the expiry instant itself is still valid
        assert_eq!(
            verify_otp(Some(&pending), "a@b.com", 4821, pending.expires_at),
            Ok(())
        );
    }

    #[test]
    fn rejects_missing_expired_and_mismatched() {
        let pending = issue_otp("a@b.com", now(), 300);

        assert_eq!(
            verify_otp(None, "a@b.com", pending.code, now()),
            Err(OtpError::Missing)
        );
        assert_eq!(
            verify_otp(
                Some(&pending),
                "a@b.com",
                pending.code,
                now() + Duration::seconds(301)
            ),
            Err(OtpError::Expired)
        );
        let wrong = if pending.code == 9999 { 1000 } else { pending.code + 1 };
        assert_eq!(
            verify_otp(Some(&pending), "a@b.com", wrong, now()),
            Err(OtpError::Mismatch)
        );
        assert_eq!(
            verify_otp(Some(&pending), "other@b.com", pending.code, now()),
            Err(OtpError::Mismatch)
        );
    }

    #[test]
    fn wrong_codes_use_up_the_pending_otp() {
        let mut pending = Some(issue_otp("a@b.com", now(), 300));
        for attempt in 1..MAX_OTP_ATTEMPTS {
            pending = after_rejection(pending, &OtpError::Mismatch);
            assert_eq!(pending.as_ref().map(|p| p.failed_attempts), Some(attempt));
        }
        assert_eq!(after_rejection(pending, &OtpError::Mismatch), None);
    }

    #[test]
    fn expired_otp_is_dropped_on_rejection() {
        let pending = issue_otp("a@b.com", now(), 300);
        assert_eq!(after_rejection(Some(pending), &OtpError::Expired), None);
    }
}
