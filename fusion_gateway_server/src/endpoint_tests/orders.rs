use actix_web::{http::StatusCode, test::TestRequest};
use fusion_payment_engine::db_types::OrderStatusType;
use serde_json::json;

use super::{
    helpers::{configure_gateway, sample_order, send_request, valid_checksum, TEST_API_KEY},
    mocks::{MockPaymentsDb, MockRelay},
};
use crate::auth::API_KEY_HEADER;

fn create_order_body() -> serde_json::Value {
    json!({
        "amount": "100.1",
        "currency_code": "USD",
        "description": "#INV-2024-03-24-44798",
        "customer_name": "Alice",
        "customer_email": "alice@example.com",
        "custom_id": "44798",
        "ipn_url": "https://fusion.test/hook",
        "success_url": "https://fusion.test/success",
        "fail_url": "https://fusion.test/fail"
    })
}

#[actix_web::test]
async fn create_order_returns_id_and_checkout_url() {
    let mut db = MockPaymentsDb::new();
    db.expect_insert_order()
        .withf(|order| order.custom_id == "44798" && order.amount == "100.1".parse().unwrap())
        .returning(|_| Ok(sample_order(OrderStatusType::Pending)));
    let req = TestRequest::post()
        .uri("/?action=create_order")
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .set_json(create_order_body());
    let (status, body) = send_request(req, configure_gateway(db, MockRelay::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Order created successfully!");
    assert_eq!(body["data"]["order_id"], 1);
    let expected_url = format!("https://gateway.test/checkout?order_id=1&checksum={}", valid_checksum());
    assert_eq!(body["data"]["order_url"], expected_url.as_str());
}

#[actix_web::test]
async fn create_order_requires_an_api_key() {
    let req = TestRequest::post().uri("/?action=create_order").set_json(create_order_body());
    let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Api Key token is required in header.");
}

#[actix_web::test]
async fn create_order_rejects_unknown_api_keys() {
    let req = TestRequest::post()
        .uri("/?action=create_order")
        .insert_header((API_KEY_HEADER, "who-dis"))
        .set_json(create_order_body());
    let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized. Invalid or expired token.");
}

#[actix_web::test]
async fn create_order_reports_the_first_missing_field() {
    let mut payload = create_order_body();
    payload.as_object_mut().unwrap().remove("customer_email");
    let req = TestRequest::post()
        .uri("/?action=create_order")
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .set_json(payload);
    let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The field 'customer_email' is required.");
}

#[actix_web::test]
async fn create_order_rejects_an_empty_payload() {
    let req = TestRequest::post().uri("/?action=create_order").insert_header((API_KEY_HEADER, TEST_API_KEY));
    let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Request payload cannot be empty.");
}

#[actix_web::test]
async fn get_order_returns_a_snapshot_without_internal_urls() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(sample_order(OrderStatusType::Paid))));
    let req = TestRequest::get().uri("/?action=get_order&order_id=1").insert_header((API_KEY_HEADER, TEST_API_KEY));
    let (status, body) = send_request(req, configure_gateway(db, MockRelay::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order details fetched successfully!");
    let data = &body["data"];
    assert_eq!(data["order_id"], 1);
    assert_eq!(data["amount"], "100.1");
    assert_eq!(data["status"], "Paid");
    assert_eq!(data["transaction_id"], "TX1");
    assert_eq!(data["order_date"], "2024-03-24 16:24:45");
    assert!(data.get("ipn_url").is_none());
    assert!(data.get("success_url").is_none());
    assert!(data.get("fail_url").is_none());
}

#[actix_web::test]
async fn get_order_requires_a_numeric_id() {
    for uri in ["/?action=get_order", "/?action=get_order&order_id=abc", "/?action=get_order&order_id=0"] {
        let req = TestRequest::get().uri(uri).insert_header((API_KEY_HEADER, TEST_API_KEY));
        let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Valid order_id is required.");
    }
}

#[actix_web::test]
async fn get_order_for_unknown_orders_is_a_404() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/?action=get_order&order_id=9999").insert_header((API_KEY_HEADER, TEST_API_KEY));
    let (status, body) = send_request(req, configure_gateway(db, MockRelay::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Order not found.");
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn unknown_actions_are_a_404() {
    for uri in ["/", "/?action=refund"] {
        let req = TestRequest::post().uri(uri);
        let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Unknown endpoint.");
    }
}
