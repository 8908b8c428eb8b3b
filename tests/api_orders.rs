mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::login;
use serde_json::{json, Value};

fn order_body(menu_id: i32) -> Value {
    json!({
        "menuId": menu_id,
        "items": [
            { "mealType": "full", "sabji": "paneer", "quantity": 2 },
            { "mealType": "half", "sabji": "aloo gobi", "quantity": 1 },
            { "mealType": "riceOnly", "quantity": 1 }
        ]
    })
}

#[actix_rt::test]
async fn user_places_and_lists_orders() {
    let t = common::setup_api_app().await;
    let cookie = login(&t.app, &t.fixtures.user_email).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .cookie(cookie.clone())
        .set_json(order_body(t.fixtures.menu_id))
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["grandTotal"], 2 * 80 + 60 + 40);
    assert_eq!(body["data"]["items"].as_array().expect("items").len(), 3);
    assert!(body["data"]["items"][2].get("sabji").is_none());

    let req = test::TestRequest::get()
        .uri("/orders")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().expect("orders").len(), 1);
}

#[actix_rt::test]
async fn place_order_checks_body_role_and_lines() {
    let t = common::setup_api_app().await;
    let user_cookie = login(&t.app, &t.fixtures.user_email).await;
    let provider_cookie = login(&t.app, &t.fixtures.provider_email).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .cookie(user_cookie.clone())
        .set_json(json!({ "menuId": t.fixtures.menu_id, "items": [] }))
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "menuId and items are required");

    let req = test::TestRequest::post()
        .uri("/orders")
        .cookie(provider_cookie)
        .set_json(order_body(t.fixtures.menu_id))
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Only users can place orders");

    let req = test::TestRequest::post()
        .uri("/orders")
        .cookie(user_cookie.clone())
        .set_json(json!({
            "menuId": t.fixtures.menu_id,
            "items": [{ "mealType": "jumbo", "sabji": "paneer", "quantity": 1 }]
        }))
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid meal type");

    let req = test::TestRequest::post()
        .uri("/orders")
        .cookie(user_cookie)
        .set_json(order_body(t.fixtures.menu_id + 100))
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Menu not found");
}

#[actix_rt::test]
async fn lifecycle_over_http() {
    let t = common::setup_api_app().await;
    let user_cookie = login(&t.app, &t.fixtures.user_email).await;
    let provider_cookie = login(&t.app, &t.fixtures.provider_email).await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/orders")
            .cookie(user_cookie.clone())
            .set_json(order_body(t.fixtures.menu_id))
            .to_request();
        let resp = test::call_service(&t.app, req).await;
        let body: Value = test::read_body_json(resp).await;
        ids.push(body["data"]["orderId"].as_i64().expect("order id"));
    }

    let req = test::TestRequest::put()
        .uri(&format!("/orders/{}/approve", ids[0]))
        .cookie(user_cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/orders/{}/approve", ids[0]))
        .cookie(provider_cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "approved");

    let req = test::TestRequest::put()
        .uri(&format!("/orders/{}/cancel", ids[0]))
        .cookie(user_cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/orders/{}/cancel", ids[1]))
        .cookie(user_cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "cancelled");

    let req = test::TestRequest::put()
        .uri(&format!("/orders/{}/reject", ids[1]))
        .cookie(provider_cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{}", ids[1]))
        .cookie(provider_cookie)
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn daily_summaries_count_tiffins() {
    let t = common::setup_api_app().await;
    let user_cookie = login(&t.app, &t.fixtures.user_email).await;
    let provider_cookie = login(&t.app, &t.fixtures.provider_email).await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/orders")
            .cookie(user_cookie.clone())
            .set_json(order_body(t.fixtures.menu_id))
            .to_request();
        let resp = test::call_service(&t.app, req).await;
        let body: Value = test::read_body_json(resp).await;
        ids.push(body["data"]["orderId"].as_i64().expect("order id"));
    }
    let req = test::TestRequest::put()
        .uri(&format!("/orders/{}/approve", ids[0]))
        .cookie(provider_cookie)
        .to_request();
    test::call_service(&t.app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/orders/summary?date={}", t.fixtures.menu_date))
        .cookie(user_cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["totalOrders"], 2);
    assert_eq!(body["data"]["fullTiffin"], 4);
    assert_eq!(body["data"]["halfTiffin"], 2);
    assert_eq!(body["data"]["riceOnly"], 2);

    let req = test::TestRequest::get()
        .uri("/orders/summary/provider")
        .cookie(user_cookie.clone())
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "provider_id is required");

    let req = test::TestRequest::get()
        .uri(&format!(
            "/orders/summary/provider?provider_id={}",
            t.fixtures.provider_id
        ))
        .cookie(user_cookie)
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["totalOrders"], 1);
    assert_eq!(body["data"]["totalRevenue"], 2 * 80 + 60 + 40);

    let req = test::TestRequest::get().uri("/orders/summary").to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn extreme_dates_are_rejected_on_day_queries() {
    let t = common::setup_api_app().await;
    let provider_cookie = login(&t.app, &t.fixtures.provider_email).await;

    let uris = [
        "/orders/summary?date=-262143-01-01".to_string(),
        format!(
            "/orders/summary/provider?provider_id={}&date=-262143-01-01",
            t.fixtures.provider_id
        ),
        "/provider/orders?date=-262143-01-01".to_string(),
        "/orders/summary?date=20250-01-01".to_string(),
    ];
    for uri in uris {
        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(provider_cookie.clone())
            .to_request();
        let resp = test::call_service(&t.app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error", "{uri}");
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|e| e.starts_with("Invalid date")),
            "{uri}: {body}"
        );
    }
}
