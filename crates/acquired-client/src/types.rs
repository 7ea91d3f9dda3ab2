//! Request and response bodies that only the transport sees.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub app_id: &'a str,
    pub app_key: &'a str,
}

/// Reply of `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Transaction part of a payment link request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTransaction {
    /// Merchant order reference.
    pub order_id: String,
    /// Amount in major units.
    pub amount: f64,
    /// ISO 4217 currency code, lowercase.
    pub currency: String,
    /// Capture immediately instead of authorising only.
    pub capture: bool,
}

/// Body of `POST /payment-links`.
///
/// `customer` is the fragment a checkout produces: either a reference to a
/// stored customer, an inline customer object, or an empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLinkRequest {
    /// What is being paid for.
    pub transaction: LinkTransaction,
    /// Customer fragment.
    pub customer: Value,
    /// Where the shopper returns after paying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Where the processor posts the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Link lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Body of capture and refund requests. An absent amount means the full
/// transaction amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct AmountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_link_request_skips_empty_options() {
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

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "transaction": {
                    "order_id": "1001",
                    "amount": 15.5,
                    "currency": "gbp",
                    "capture": true
                },
                "customer": {"customer_id": "cus-1"}
            })
        );
    }

    #[test]
    fn full_amount_is_an_empty_object() {
        assert_eq!(
            serde_json::to_value(AmountRequest::default()).unwrap(),
            json!({})
        );
    }
}
