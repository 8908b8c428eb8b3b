mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Utc;
use common::login;
use serde_json::Value;
use tiffin_xs::db::OrderOperations;
use tiffin_xs::enums::orders::OrderItemRequest;
use tiffin_xs::services::lifecycle::OrderAction;

fn seed_approved_order(pool: &tiffin_xs::db::DbPool, user_id: i32, provider_id: i32, menu_id: i32) {
    let order_ops = OrderOperations::new(pool.clone(), 600);
    let placed = order_ops
        .place_order(
            user_id,
            menu_id,
            &[
                OrderItemRequest {
                    meal_type: Some("full".to_string()),
                    sabji: Some("paneer".to_string()),
                    quantity: Some(3),
                },
                OrderItemRequest {
                    meal_type: Some("half".to_string()),
                    sabji: Some("aloo gobi".to_string()),
                    quantity: Some(1),
                },
            ],
        )
        .expect("order");
    order_ops
        .transition(provider_id, placed.order.order_id, OrderAction::Approve, Utc::now())
        .expect("approve");
    // pending orders never count
    order_ops
        .place_order(
            user_id,
            menu_id,
            &[OrderItemRequest {
                meal_type: Some("half".to_string()),
                sabji: Some("aloo gobi".to_string()),
                quantity: Some(9),
            }],
        )
        .expect("pending order");
}

#[actix_rt::test]
async fn reports_cover_approved_orders() {
    let t = common::setup_api_app().await;
    seed_approved_order(
        &t.pool,
        t.fixtures.user_id,
        t.fixtures.provider_id,
        t.fixtures.menu_id,
    );
    let cookie = login(&t.app, &t.fixtures.provider_email).await;

    let req = test::TestRequest::get()
        .uri("/analytic/overall-summary")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["totalRevenue"], 3 * 80 + 60);
    assert_eq!(body["data"]["totalOrders"], 1);

    let req = test::TestRequest::get()
        .uri("/analytic/best-sellers")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["bestTiffin"]["name"], "full");
    assert_eq!(body["data"]["bestSabji"]["name"], "paneer");

    let req = test::TestRequest::get()
        .uri("/analytic/avg-order-value")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["averageOrderValue"], 300.0);

    for path in [
        "/analytic/monthly-revenue",
        "/analytic/growth-rate",
        "/analytic/daily-revenue-trend",
    ] {
        let req = test::TestRequest::get()
            .uri(path)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&t.app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok", "{path}");
    }
}

#[actix_rt::test]
async fn reports_are_for_providers_only() {
    let t = common::setup_api_app().await;

    let req = test::TestRequest::get()
        .uri("/analytic/overall-summary")
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&t.app, &t.fixtures.user_email).await;
    let req = test::TestRequest::get()
        .uri("/analytic/overall-summary")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Only providers can perform this action");
}
