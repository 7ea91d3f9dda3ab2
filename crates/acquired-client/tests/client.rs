//! Client behaviour against a mock Acquired API.

use acquired_client::{AcquiredClient, ClientError, ClientOptions, LinkTransaction, PaymentLinkRequest};
use acquired_core::{
    ApiError, CustomerApi, CustomerPayload, ExternalCustomerId, RawAddress, ResponseError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> CustomerPayload {
    let billing = RawAddress {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        email: Some("ada@example.com".into()),
        address_1: Some("1 Main St".into()),
        city: Some("Leeds".into()),
        postcode: Some("LS1 1AA".into()),
        country: Some("GB".into()),
        ..RawAddress::default()
    };
    CustomerPayload::build(&billing, None, true).unwrap()
}

async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"app_id": "app", "app_key": "key"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": "tok-1"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> AcquiredClient {
    AcquiredClient::new(server.uri(), "app", "key")
}

#[tokio::test]
async fn create_customer_returns_id() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"status": "success", "customer_id": "cus-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server).create_customer(&payload()).await.unwrap();
    assert!(created.is_created());
    assert_eq!(created.customer_id().unwrap().as_str(), "cus-1");
}

#[tokio::test]
async fn token_is_reused_between_requests() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/customers/cus-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let id = ExternalCustomerId::new("cus-1").unwrap();
    assert!(client.update_customer(&id, &payload()).await.unwrap().request_is_success());
    assert!(client.update_customer(&id, &payload()).await.unwrap().request_is_success());
}

#[tokio::test]
async fn no_content_update_is_a_success() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/customers/cus-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let id = ExternalCustomerId::new("cus-1").unwrap();
    let updated = client(&server).update_customer(&id, &payload()).await.unwrap();
    assert!(updated.request_is_success());
    assert_eq!(updated.envelope().status_code(), 204);
}

#[tokio::test]
async fn unauthorized_reply_forces_new_login() {
    let server = MockServer::start().await;
    mount_login(&server, 2).await;

    Mock::given(method("PUT"))
        .and(path("/customers/cus-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"status": "error"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let id = ExternalCustomerId::new("cus-1").unwrap();
    assert!(!client.update_customer(&id, &payload()).await.unwrap().request_is_success());
    assert!(!client.update_customer(&id, &payload()).await.unwrap().request_is_success());
}

#[tokio::test]
async fn company_id_header_is_sent() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(header("Company-Id", "co-7"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"status": "success", "customer_id": "cus-2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AcquiredClient::with_options(
        server.uri(),
        "app",
        "key",
        ClientOptions::with_company_id("co-7"),
    );
    assert!(client.create_customer(&payload()).await.unwrap().is_created());
}

#[tokio::test]
async fn rejected_create_is_not_an_error() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "error_type": "validation",
            "title": "Your request parameters did not pass our validation."
        })))
        .mount(&server)
        .await;

    let created = client(&server).create_customer(&payload()).await.unwrap();
    assert!(!created.is_created());
    assert_eq!(created.envelope().status_code(), 400);
}

#[tokio::test]
async fn successful_create_without_id_is_malformed() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    let err = client(&server).create_customer(&payload()).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Malformed(ResponseError::MissingField { field: "customer_id" })
    ));
}

#[tokio::test]
async fn html_error_page_is_malformed() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = CustomerApi::create_customer(&client(&server), &payload())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Malformed(ResponseError::BodyNotObject)));
}

#[tokio::test]
async fn failed_login_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"status": "error"})))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.create_customer(&payload()).await.unwrap_err();
    assert!(matches!(err, ClientError::Authentication { status: 401 }));

    let err = CustomerApi::create_customer(&client, &payload()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn payment_link_returns_link_id() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/payment-links"))
        .and(body_json(json!({
            "transaction": {
                "order_id": "1001",
                "amount": 15.5,
                "currency": "gbp",
                "capture": true
            },
            "customer": {"customer_id": "cus-1"}
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"status": "success", "link_id": "lnk-9"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = PaymentLinkRequest {
        transaction: LinkTransaction {
            order_id: "1001".into(),
            amount: 15.5,
            currency: "gbp".into(),
            capture: true,
        },
        customer: json!({"customer_id": "cus-1"}),
        redirect_url: None,
        webhook_url: None,
        expires_in: None,
    };

    let link = client(&server).create_payment_link(&request).await.unwrap();
    assert_eq!(link.link_id(), "lnk-9");
}

#[tokio::test]
async fn transaction_actions_hit_their_paths() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    for (action, status) in [("reversal", "success"), ("capture", "success"), ("refund", "error")] {
        Mock::given(method("POST"))
            .and(path(format!("/transactions/tx-1/{action}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": status})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&server);
    assert!(client.cancel_transaction("tx-1").await.unwrap().is_cancelled());
    assert!(client.capture_transaction("tx-1", Some(5.0)).await.unwrap().is_captured());
    assert!(!client.refund_transaction("tx-1", None).await.unwrap().is_refunded());
}

#[tokio::test]
async fn unsafe_ids_are_rejected_before_sending() {
    let server = MockServer::start().await;
    mount_login(&server, 0).await;

    let err = client(&server).refund_transaction("../login", None).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidIdentifier(_)));
}
