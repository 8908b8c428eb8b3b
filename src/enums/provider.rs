use crate::enums::common::response_envelope;
use crate::models::menu::{Menu, MenuWithProvider};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Prices as sent by clients; every tier must be present to publish a menu.
#[derive(Deserialize, Serialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MenuPricesInput {
    pub full: Option<i32>,
    pub half: Option<i32>,
    pub rice_only: Option<i32>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct CreateMenuRequest {
    /// Menu day as `YYYY-MM-DD`.
    pub date: Option<String>,
    pub sabjis: Option<Vec<String>>,
    pub prices: Option<MenuPricesInput>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct UpdateMenuRequest {
    pub sabjis: Option<Vec<String>>,
    pub prices: Option<MenuPricesInput>,
}

#[derive(Deserialize, IntoParams, Debug)]
pub struct MenuListQuery {
    pub provider_id: Option<i32>,
    pub date: Option<String>,
}

#[derive(Deserialize, IntoParams, Debug)]
pub struct ProviderOrdersQuery {
    pub date: Option<String>,
    pub status: Option<String>,
}

response_envelope!(MenuResponse, Menu);

#[derive(Serialize, ToSchema)]
pub struct MenuListResponse {
    pub status: String,
    pub count: usize,
    pub data: Vec<MenuWithProvider>,
    pub error: Option<String>,
}

/// Trims names, drops blanks and repeated entries while keeping the order given.
pub fn normalize_sabjis(raw: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sabjis_trims_and_dedups() {
        let raw = vec![
            " Aloo Gobi ".to_string(),
            "".to_string(),
            "Paneer".to_string(),
            "aloo gobi".to_string(),
        ];
        assert_eq!(normalize_sabjis(raw), vec!["Aloo Gobi", "Paneer"]);
    }
}
