//! Processor API responses.
//!
//! Every reply goes through [`Envelope::validate`] before anything else can
//! look at it. The per-operation types can only be built from a validated
//! envelope, so holding a [`PaymentLinkCreated`] means the link id is there.
//!
//! ```text
//! RawResponse ──► Envelope::validate ──► ApiResponse::parse(kind)
//!                  (body is object,        ├── CustomerCreated   (customer_id when successful)
//!                   success flag)          ├── CustomerUpdated
//!                                          ├── PaymentLinkCreated (link_id always)
//!                                          └── TransactionCancel / Capture / Refund
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ExternalCustomerId;

/// Body member the processor sets to `"error"` on failed requests.
const STATUS_FIELD: &str = "status";

/// A reply as the transport received it, before any validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Decoded JSON body (an empty object when the body was empty).
    pub body: Value,
}

impl RawResponse {
    /// Create a raw response.
    #[must_use]
    pub fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }
}

/// Reasons a reply fails structural validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    /// The body is not a JSON object.
    #[error("response body is not a JSON object")]
    BodyNotObject,

    /// A field required for this kind of reply is missing or empty.
    #[error("{field} not found in response")]
    MissingField {
        /// The missing body member.
        field: &'static str,
    },
}

/// The API operation a reply belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// `POST /customers`.
    CustomerCreate,
    /// `PUT /customers/{id}`.
    CustomerUpdate,
    /// `POST /payment-links`.
    PaymentLink,
    /// `POST /transactions/{id}/reversal`.
    TransactionCancel,
    /// `POST /transactions/{id}/capture`.
    TransactionCapture,
    /// `POST /transactions/{id}/refund`.
    TransactionRefund,
}

impl ResponseKind {
    /// Operation name used in logs and errors.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::CustomerCreate => "create_customer",
            Self::CustomerUpdate => "update_customer",
            Self::PaymentLink => "create_payment_link",
            Self::TransactionCancel => "cancel_transaction",
            Self::TransactionCapture => "capture_transaction",
            Self::TransactionRefund => "refund_transaction",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

/// A reply whose generic shape has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    status_code: u16,
    body: Map<String, Value>,
    is_success: bool,
}

impl Envelope {
    /// Validate a raw reply.
    ///
    /// The request counts as successful when the status code is 2xx and the
    /// body does not report `"status": "error"`.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::BodyNotObject` if the body is not a JSON object.
    pub fn validate(raw: RawResponse) -> Result<Self, ResponseError> {
        let Value::Object(body) = raw.body else {
            return Err(ResponseError::BodyNotObject);
        };

        let reports_error = body.get(STATUS_FIELD).and_then(Value::as_str) == Some("error");
        let is_success = (200..300).contains(&raw.status_code) && !reports_error;

        Ok(Self {
            status_code: raw.status_code,
            body,
            is_success,
        })
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The decoded body.
    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Whether the processor accepted the request.
    #[must_use]
    pub const fn request_is_success(&self) -> bool {
        self.is_success
    }

    /// A body member, if present.
    #[must_use]
    pub fn body_field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// A body member as a non-empty string.
    #[must_use]
    pub fn body_str(&self, name: &str) -> Option<&str> {
        self.body
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Status code and body, for structured logs.
    #[must_use]
    pub fn log_data(&self) -> Value {
        serde_json::json!({
            "status_code": self.status_code,
            "body": self.body,
        })
    }

    fn require_str(&self, field: &'static str) -> Result<&str, ResponseError> {
        self.body_str(field)
            .ok_or(ResponseError::MissingField { field })
    }
}

/// Reply to a customer creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerCreated {
    envelope: Envelope,
    customer_id: Option<ExternalCustomerId>,
}

impl CustomerCreated {
    /// Validate a raw customer creation reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not an object, or if a successful reply
    /// has no `customer_id`.
    pub fn from_raw(raw: RawResponse) -> Result<Self, ResponseError> {
        let envelope = Envelope::validate(raw)?;

        let customer_id = if envelope.request_is_success() {
            let id = envelope.require_str("customer_id")?;
            Some(
                ExternalCustomerId::new(id)
                    .map_err(|_| ResponseError::MissingField { field: "customer_id" })?,
            )
        } else {
            None
        };

        Ok(Self {
            envelope,
            customer_id,
        })
    }

    /// Whether the customer now exists remotely.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        self.customer_id.is_some()
    }

    /// The processor's id for the new customer.
    #[must_use]
    pub const fn customer_id(&self) -> Option<&ExternalCustomerId> {
        self.customer_id.as_ref()
    }

    /// The validated envelope.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// Reply to a customer update.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerUpdated(Envelope);

impl CustomerUpdated {
    /// Validate a raw customer update reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not an object.
    pub fn from_raw(raw: RawResponse) -> Result<Self, ResponseError> {
        Envelope::validate(raw).map(Self)
    }

    /// Whether the update was accepted.
    #[must_use]
    pub const fn request_is_success(&self) -> bool {
        self.0.request_is_success()
    }

    /// The validated envelope.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        &self.0
    }
}

/// Reply to a payment link creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLinkCreated {
    envelope: Envelope,
    link_id: String,
}

impl PaymentLinkCreated {
    /// Validate a raw payment link reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not an object or has no `link_id`.
    pub fn from_raw(raw: RawResponse) -> Result<Self, ResponseError> {
        let envelope = Envelope::validate(raw)?;
        let link_id = envelope.require_str("link_id")?.to_owned();
        Ok(Self { envelope, link_id })
    }

    /// The payment link id, exactly as returned.
    #[must_use]
    pub fn link_id(&self) -> &str {
        &self.link_id
    }

    /// The validated envelope.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// Defines a transaction action reply with a named alias for its outcome.
macro_rules! transaction_action_type {
    ($name:ident, $accessor:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Envelope);

        impl $name {
            /// Validate a raw transaction action reply.
            ///
            /// # Errors
            ///
            /// Returns an error if the body is not an object.
            pub fn from_raw(raw: RawResponse) -> Result<Self, ResponseError> {
                Envelope::validate(raw).map(Self)
            }

            /// Whether the processor performed the action.
            #[must_use]
            pub const fn action_is_successful(&self) -> bool {
                self.0.request_is_success()
            }

            /// Same as [`Self::action_is_successful`].
            #[must_use]
            pub const fn $accessor(&self) -> bool {
                self.action_is_successful()
            }

            /// The validated envelope.
            #[must_use]
            pub const fn envelope(&self) -> &Envelope {
                &self.0
            }
        }
    };
}

transaction_action_type!(TransactionCancel, is_cancelled, "Reply to a transaction cancellation.");
transaction_action_type!(TransactionCapture, is_captured, "Reply to a transaction capture.");
transaction_action_type!(TransactionRefund, is_refunded, "Reply to a transaction refund.");

/// A validated reply of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// See [`CustomerCreated`].
    CustomerCreated(CustomerCreated),
    /// See [`CustomerUpdated`].
    CustomerUpdated(CustomerUpdated),
    /// See [`PaymentLinkCreated`].
    PaymentLink(PaymentLinkCreated),
    /// See [`TransactionCancel`].
    TransactionCancel(TransactionCancel),
    /// See [`TransactionCapture`].
    TransactionCapture(TransactionCapture),
    /// See [`TransactionRefund`].
    TransactionRefund(TransactionRefund),
}

impl ApiResponse {
    /// Validate `raw` as a reply to `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply lacks the structure `kind` requires.
    pub fn parse(kind: ResponseKind, raw: RawResponse) -> Result<Self, ResponseError> {
        Ok(match kind {
            ResponseKind::CustomerCreate => Self::CustomerCreated(CustomerCreated::from_raw(raw)?),
            ResponseKind::CustomerUpdate => Self::CustomerUpdated(CustomerUpdated::from_raw(raw)?),
            ResponseKind::PaymentLink => Self::PaymentLink(PaymentLinkCreated::from_raw(raw)?),
            ResponseKind::TransactionCancel => {
                Self::TransactionCancel(TransactionCancel::from_raw(raw)?)
            }
            ResponseKind::TransactionCapture => {
                Self::TransactionCapture(TransactionCapture::from_raw(raw)?)
            }
            ResponseKind::TransactionRefund => {
                Self::TransactionRefund(TransactionRefund::from_raw(raw)?)
            }
        })
    }

    /// The operation this reply answers.
    #[must_use]
    pub const fn kind(&self) -> ResponseKind {
        match self {
            Self::CustomerCreated(_) => ResponseKind::CustomerCreate,
            Self::CustomerUpdated(_) => ResponseKind::CustomerUpdate,
            Self::PaymentLink(_) => ResponseKind::PaymentLink,
            Self::TransactionCancel(_) => ResponseKind::TransactionCancel,
            Self::TransactionCapture(_) => ResponseKind::TransactionCapture,
            Self::TransactionRefund(_) => ResponseKind::TransactionRefund,
        }
    }

    /// The validated envelope underneath.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        match self {
            Self::CustomerCreated(r) => r.envelope(),
            Self::CustomerUpdated(r) => r.envelope(),
            Self::PaymentLink(r) => r.envelope(),
            Self::TransactionCancel(r) => r.envelope(),
            Self::TransactionCapture(r) => r.envelope(),
            Self::TransactionRefund(r) => r.envelope(),
        }
    }

    /// Whether the processor accepted the request.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.envelope().request_is_success()
    }
}
