use actix_web::{http::StatusCode, test::TestRequest};
use fusion_payment_engine::db_types::{OrderId, OrderStatusType};
use serde_json::json;

use super::{
    helpers::{configure_gateway, sample_order, send_request, valid_checksum},
    mocks::{MockPaymentsDb, MockRelay},
};
use crate::integrations::RelayOutcome;

fn ipn_body(payment_status: &str) -> serde_json::Value {
    json!({
        "order_id": 1,
        "payment_status": payment_status,
        "received_amount": "100.1",
        "transaction_id": "TX1"
    })
}

fn ipn_uri(checksum: &str) -> String {
    format!("/?action=ipn&checksum={checksum}")
}

#[actix_web::test]
async fn ipn_requires_a_checksum() {
    let req = TestRequest::post().uri("/?action=ipn").set_json(ipn_body("Paid"));
    let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Checksum is required in the query string");
}

#[actix_web::test]
async fn ipn_for_an_unknown_order_is_a_404() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    let req = TestRequest::post().uri(&ipn_uri("deadbeef")).set_json(ipn_body("Paid"));
    let (status, body) = send_request(req, configure_gateway(db, MockRelay::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found.");
}

#[actix_web::test]
async fn ipn_rejects_an_invalid_checksum() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(sample_order(OrderStatusType::Pending))));
    // No settle expectation: a bad token must never reach the write path.
    let req = TestRequest::post().uri(&ipn_uri("deadbeef")).set_json(ipn_body("Paid"));
    let (status, body) = send_request(req, configure_gateway(db, MockRelay::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid checksum");
}

#[actix_web::test]
async fn a_paid_ipn_settles_the_order_and_relays_to_fusion() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id()
        .times(1)
        .returning(|_| Ok(Some(sample_order(OrderStatusType::Pending))));
    db.expect_settle_order()
        .times(1)
        .withf(|id, update| {
            *id == OrderId(1) && update.status == OrderStatusType::Paid && update.transaction_id == "TX1"
        })
        .returning(|_, _| Ok(Some(sample_order(OrderStatusType::Paid))));
    let mut relay = MockRelay::new();
    relay
        .expect_notify()
        .times(1)
        .withf(|url, id| url == "https://fusion.test/hook" && *id == OrderId(1))
        .returning(|_, _| RelayOutcome { success: true, message: "delivered".to_string() });
    let req = TestRequest::post().uri(&ipn_uri(&valid_checksum())).set_json(ipn_body("Paid"));
    let (status, body) = send_request(req, configure_gateway(db, relay)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Order details updated successfully!");
    assert_eq!(body["data"]["redirect_url"], "https://fusion.test/success");
    assert_eq!(body["data"]["ipn_response"], "delivered");
}

#[actix_web::test]
async fn a_repeated_ipn_for_a_paid_order_is_a_no_op() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id().times(1).returning(|_| Ok(Some(sample_order(OrderStatusType::Paid))));
    // No settle and no relay expectations: the short-circuit must not write or notify again.
    let req = TestRequest::post().uri(&ipn_uri(&valid_checksum())).set_json(ipn_body("Paid"));
    let (status, body) = send_request(req, configure_gateway(db, MockRelay::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Order status already updated to Paid");
    assert_eq!(body["data"]["redirect_url"], "https://fusion.test/success");
    assert!(body["data"].get("ipn_response").is_none());
}

#[actix_web::test]
async fn a_failed_ipn_redirects_to_the_fail_url_without_relaying() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(sample_order(OrderStatusType::Pending))));
    db.expect_settle_order()
        .withf(|_, update| update.status == OrderStatusType::Failed)
        .returning(|_, _| Ok(Some(sample_order(OrderStatusType::Failed))));
    let req = TestRequest::post().uri(&ipn_uri(&valid_checksum())).set_json(ipn_body("Failed"));
    let (status, body) = send_request(req, configure_gateway(db, MockRelay::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order details updated successfully!");
    assert_eq!(body["data"]["redirect_url"], "https://fusion.test/fail");
    assert!(body["data"].get("ipn_response").is_none());
}

#[actix_web::test]
async fn a_relay_failure_does_not_fail_the_ipn() {
    let mut db = MockPaymentsDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(sample_order(OrderStatusType::Pending))));
    db.expect_settle_order().returning(|_, _| Ok(Some(sample_order(OrderStatusType::Paid))));
    let mut relay = MockRelay::new();
    relay.expect_notify().returning(|_, _| RelayOutcome {
        success: false,
        message: "Fusion system returned HTTP 500 Internal Server Error: boom".to_string(),
    });
    let req = TestRequest::post().uri(&ipn_uri(&valid_checksum())).set_json(ipn_body("Paid"));
    let (status, body) = send_request(req, configure_gateway(db, relay)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["redirect_url"], "https://fusion.test/success");
    assert_eq!(body["data"]["ipn_response"], "Fusion system returned HTTP 500 Internal Server Error: boom");
}

#[actix_web::test]
async fn ipn_rejects_unrecognised_payment_statuses() {
    for bad_status in ["Settled", "Pending", ""] {
        let req = TestRequest::post().uri(&ipn_uri(&valid_checksum())).set_json(ipn_body(bad_status));
        let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], format!("Invalid payment status '{bad_status}'."));
    }
}

#[actix_web::test]
async fn ipn_requires_a_valid_order_id() {
    let payload = json!({
        "payment_status": "Paid",
        "received_amount": "100.1",
        "transaction_id": "TX1"
    });
    let req = TestRequest::post().uri(&ipn_uri(&valid_checksum())).set_json(payload);
    let (status, body) = send_request(req, configure_gateway(MockPaymentsDb::new(), MockRelay::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Valid order_id is required.");
}
