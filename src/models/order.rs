use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::common::{MealType, OrderStatus};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, ToSchema)]
#[diesel(table_name = crate::db::schema::orders)]
#[diesel(primary_key(order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i32,
    pub user_id: i32,
    pub provider_id: i32,
    pub menu_id: i32,
    pub grand_total: i32,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::orders)]
pub struct NewOrder {
    pub user_id: i32,
    pub provider_id: i32,
    pub menu_id: i32,
    pub grand_total: i32,
    pub status: OrderStatus,
}

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, ToSchema,
)]
#[diesel(table_name = crate::db::schema::order_items)]
#[diesel(primary_key(order_id, line_no))]
#[diesel(belongs_to(Order, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(skip_serializing)]
    pub order_id: i32,
    #[serde(skip_serializing)]
    pub line_no: i16,
    pub meal_type: MealType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sabji: Option<String>,
    pub quantity: i32,
    pub price_per_unit: i32,
    pub total_price: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub line_no: i16,
    pub meal_type: MealType,
    pub sabji: Option<String>,
    pub quantity: i32,
    pub price_per_unit: i32,
    pub total_price: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
