mod common;

use chrono::Utc;
use tiffin_xs::db::{AnalyticsOperations, OrderOperations};
use tiffin_xs::enums::orders::OrderItemRequest;
use tiffin_xs::models::common::MealType;
use tiffin_xs::services::lifecycle::OrderAction;

fn item(meal: &str, sabji: Option<&str>, quantity: i64) -> OrderItemRequest {
    OrderItemRequest {
        meal_type: Some(meal.to_string()),
        sabji: sabji.map(str::to_string),
        quantity: Some(quantity),
    }
}

#[actix_rt::test]
async fn records_cover_approved_orders_only() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let order_ops = OrderOperations::new(pool.clone(), 600);
    let analytics_ops = AnalyticsOperations::new(pool);

    let approved = order_ops
        .place_order(
            fixtures.user_id,
            fixtures.menu_id,
            &[item("full", Some("paneer"), 2), item("riceOnly", None, 1)],
        )
        .expect("order");
    order_ops
        .transition(
            fixtures.provider_id,
            approved.order.order_id,
            OrderAction::Approve,
            Utc::now(),
        )
        .expect("approve");

    let rejected = order_ops
        .place_order(fixtures.user_id, fixtures.menu_id, &[item("half", Some("aloo gobi"), 5)])
        .expect("order");
    order_ops
        .transition(
            fixtures.provider_id,
            rejected.order.order_id,
            OrderAction::Reject,
            Utc::now(),
        )
        .expect("reject");

    order_ops
        .place_order(fixtures.user_id, fixtures.menu_id, &[item("half", Some("paneer"), 1)])
        .expect("pending order");

    let revenue = analytics_ops
        .revenue_records(fixtures.provider_id)
        .expect("revenue");
    assert_eq!(revenue.len(), 1);
    assert_eq!(revenue[0].grand_total, 200);

    let mut items = analytics_ops
        .item_records(fixtures.provider_id)
        .expect("items");
    items.sort_by_key(|i| i.quantity);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].meal_type, MealType::RiceOnly);
    assert_eq!(items[1].meal_type, MealType::Full);
    assert_eq!(items[1].sabji.as_deref(), Some("paneer"));

    assert!(analytics_ops
        .revenue_records(fixtures.user_id)
        .expect("no orders as provider")
        .is_empty());
}
