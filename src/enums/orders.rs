use crate::enums::common::response_envelope;
use crate::models::common::OrderStatus;
use crate::models::order::{OrderItem, OrderWithItems};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub meal_type: Option<String>,
    pub sabji: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub menu_id: Option<i32>,
    pub items: Option<Vec<OrderItemRequest>>,
}

#[derive(Deserialize, IntoParams, Debug)]
pub struct SummaryQuery {
    pub date: Option<String>,
}

#[derive(Deserialize, IntoParams, Debug)]
pub struct ProviderSummaryQuery {
    pub provider_id: Option<i32>,
    pub date: Option<String>,
}

/// An order as shown to providers and in summaries, with the ordering user's name.
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub provider_id: i32,
    pub menu_id: i32,
    pub items: Vec<OrderItem>,
    pub grand_total: i32,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSummary {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<i32>,
    pub total_orders: usize,
    pub full_tiffin: i64,
    pub half_tiffin: i64,
    pub rice_only: i64,
    pub total_revenue: i64,
    pub orders: Vec<OrderDetails>,
}

response_envelope!(OrderResponse, OrderWithItems);
response_envelope!(OrderListResponse, Vec<OrderWithItems>);
response_envelope!(OrderDetailsListResponse, Vec<OrderDetails>);
response_envelope!(OrdersSummaryResponse, OrdersSummary);
