use crate::enums::orders::{OrderDetails, OrdersSummary};
use crate::models::common::{MealType, OrderStatus};
use chrono::NaiveDate;

/// Folds a day's orders into tiffin counts and revenue.
///
/// Quantities count every order passed in; revenue only counts approved ones.
pub fn summarize_orders(
    date: NaiveDate,
    provider_id: Option<i32>,
    orders: Vec<OrderDetails>,
) -> OrdersSummary {
    let mut full_tiffin = 0i64;
    let mut half_tiffin = 0i64;
    let mut rice_only = 0i64;
    let mut total_revenue = 0i64;

    for order in &orders {
        for item in &order.items {
            let qty = i64::from(item.quantity);
            match item.meal_type {
                MealType::Full => full_tiffin += qty,
                MealType::Half => half_tiffin += qty,
                MealType::RiceOnly => rice_only += qty,
            }
        }
        if order.status == OrderStatus::Approved {
            total_revenue += i64::from(order.grand_total);
        }
    }

    OrdersSummary {
        date,
        provider_id,
        total_orders: orders.len(),
        full_tiffin,
        half_tiffin,
        rice_only,
        total_revenue,
        orders,
    }
}
