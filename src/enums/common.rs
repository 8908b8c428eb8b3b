use serde::Serialize;
use utoipa::ToSchema;

/// Declares a `{status, data, error}` response body around a payload type.
macro_rules! response_envelope {
    ($(#[$meta:meta])* $name:ident, $payload:ty) => {
        $(#[$meta])*
        #[derive(serde::Serialize, utoipa::ToSchema)]
        pub struct $name {
            pub status: String,
            pub data: Option<$payload>,
            pub error: Option<String>,
        }

        impl $name {
            pub fn ok(data: $payload) -> Self {
                Self {
                    status: "ok".to_string(),
                    data: Some(data),
                    error: None,
                }
            }

            #[allow(dead_code)]
            pub fn error(message: impl Into<String>) -> Self {
                Self {
                    status: "error".to_string(),
                    data: None,
                    error: Some(message.into()),
                }
            }
        }
    };
}

pub(crate) use response_envelope;

#[derive(Serialize, ToSchema)]
pub struct GeneralResponse {
    pub status: String,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl GeneralResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: None,
            error: Some(message.into()),
        }
    }
}
