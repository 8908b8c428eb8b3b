mod common;

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

#[actix_rt::test]
async fn json_routes_accept_json_variants() {
    let t = common::setup_api_app().await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json; charset=utf-8"))
        .set_payload(format!(
            r#"{{"email":"{}","password":"{}"}}"#,
            t.fixtures.user_email,
            tiffin_xs::test_utils::TEST_PASSWORD
        ))
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn json_routes_reject_missing_or_other_types() {
    let t = common::setup_api_app().await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"email":"a@b.c","password":"x"}"#)
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Content-Type must be application/json");

    let req = test::TestRequest::post()
        .uri("/auth/generate-otp")
        .set_payload(r#"{"email":"a@b.c"}"#)
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
