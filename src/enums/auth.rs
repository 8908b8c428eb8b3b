use crate::enums::common::response_envelope;
use crate::models::user::User;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct GenerateOtpRequest {
    pub email: Option<String>,
}

/// Signup details travel with the OTP so the account can be created on success.
#[derive(Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    #[schema(value_type = Object)]
    pub otp: Option<serde_json::Value>,
    pub name: Option<String>,
    #[schema(value_type = Object)]
    pub mobile: Option<serde_json::Value>,
    pub password: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

response_envelope!(UserResponse, User);

/// OTPs arrive either as a JSON number or a numeric string.
pub fn otp_from_json(value: Option<&serde_json::Value>) -> Option<u32> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Mobile numbers were historically sent as numbers; keep them as text.
pub fn mobile_from_json(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn otp_accepts_numbers_and_strings() {
        assert_eq!(otp_from_json(Some(&json!(4821))), Some(4821));
        assert_eq!(otp_from_json(Some(&json!(" 4821 "))), Some(4821));
        assert_eq!(otp_from_json(Some(&json!("abc"))), None);
        assert_eq!(otp_from_json(Some(&json!(-1))), None);
        assert_eq!(otp_from_json(None), None);
    }

    #[test]
    fn mobile_is_normalised_to_text() {
        assert_eq!(
            mobile_from_json(Some(&json!(9876543210u64))),
            Some("9876543210".to_string())
        );
        assert_eq!(mobile_from_json(Some(&json!(""))), None);
    }
}
