use crate::enums::common::response_envelope;
use crate::models::user::{ProviderCard, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNameRequest {
    pub new_name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ContactRequest {
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProvidersResponse {
    pub status: String,
    pub count: usize,
    pub data: Vec<ProviderCard>,
    pub error: Option<String>,
}

response_envelope!(ProfileResponse, User);
response_envelope!(FavoritesResponse, Vec<ProviderCard>);
