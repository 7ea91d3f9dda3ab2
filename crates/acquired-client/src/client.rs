//! Acquired HTTP client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;

use acquired_core::{
    ApiError, CustomerApi, CustomerCreated, CustomerPayload, CustomerUpdated, ExternalCustomerId,
    PaymentLinkCreated, RawResponse, ResponseKind, TransactionCancel,
    TransactionCapture, TransactionRefund,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{AmountRequest, LoginRequest, LoginResponse, PaymentLinkRequest};

/// Tokens are refreshed this long before the processor says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    refresh_at: Instant,
}

/// Acquired API client.
///
/// Logs in on first use and reuses the bearer token until shortly before it
/// expires. Clones share the token.
#[derive(Clone)]
pub struct AcquiredClient {
    client: Client,
    base_url: String,
    app_id: String,
    app_key: String,
    company_id: Option<String>,
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl fmt::Debug for AcquiredClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquiredClient")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("company_id", &self.company_id)
            .finish_non_exhaustive()
    }
}

impl AcquiredClient {
    /// Create a new Acquired client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL (e.g., `"https://test-api.acquired.com/v1"`)
    /// * `app_id` - Application id
    /// * `app_key` - Application key
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        Self::with_options(base_url, app_id, app_key, ClientOptions::default())
    }

    /// Create a new Acquired client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            company_id: options.company_id,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the credentials are missing.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        if !config.is_configured() {
            return Err(ClientError::Configuration(
                "ACQUIRED_APP_ID and ACQUIRED_APP_KEY are required".to_string(),
            ));
        }

        let options = ClientOptions {
            timeout_seconds: config.timeout_seconds,
            company_id: config.company_id.clone(),
        };

        Ok(Self::with_options(
            config.base_url(),
            config.app_id.clone().unwrap_or_default(),
            config.app_key.clone().unwrap_or_default(),
            options,
        ))
    }

    /// Create a customer.
    ///
    /// A well-formed rejection is returned as a reply whose `is_created()` is
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is malformed.
    pub async fn create_customer(
        &self,
        payload: &CustomerPayload,
    ) -> Result<CustomerCreated, ClientError> {
        let raw = self
            .send(ResponseKind::CustomerCreate, Method::POST, "/customers", payload)
            .await?;
        Ok(CustomerCreated::from_raw(raw)?)
    }

    /// Replace the details of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the id cannot be used in a path, the request fails
    /// or the reply is malformed.
    pub async fn update_customer(
        &self,
        customer_id: &ExternalCustomerId,
        payload: &CustomerPayload,
    ) -> Result<CustomerUpdated, ClientError> {
        let path = format!("/customers/{}", path_segment(customer_id.as_str())?);
        let raw = self
            .send(ResponseKind::CustomerUpdate, Method::PUT, &path, payload)
            .await?;
        Ok(CustomerUpdated::from_raw(raw)?)
    }

    /// Create a hosted payment link.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply has no `link_id`.
    pub async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLinkCreated, ClientError> {
        let raw = self
            .send(ResponseKind::PaymentLink, Method::POST, "/payment-links", request)
            .await?;
        Ok(PaymentLinkCreated::from_raw(raw)?)
    }

    /// Cancel (reverse) a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is malformed.
    pub async fn cancel_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionCancel, ClientError> {
        let raw = self
            .transaction_action(
                ResponseKind::TransactionCancel,
                transaction_id,
                "reversal",
                &Value::Object(serde_json::Map::new()),
            )
            .await?;
        Ok(TransactionCancel::from_raw(raw)?)
    }

    /// Capture an authorised transaction. `None` captures the full amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is malformed.
    pub async fn capture_transaction(
        &self,
        transaction_id: &str,
        amount: Option<f64>,
    ) -> Result<TransactionCapture, ClientError> {
        let raw = self
            .transaction_action(
                ResponseKind::TransactionCapture,
                transaction_id,
                "capture",
                &AmountRequest { amount },
            )
            .await?;
        Ok(TransactionCapture::from_raw(raw)?)
    }

    /// Refund a settled transaction. `None` refunds the full amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is malformed.
    pub async fn refund_transaction(
        &self,
        transaction_id: &str,
        amount: Option<f64>,
    ) -> Result<TransactionRefund, ClientError> {
        let raw = self
            .transaction_action(
                ResponseKind::TransactionRefund,
                transaction_id,
                "refund",
                &AmountRequest { amount },
            )
            .await?;
        Ok(TransactionRefund::from_raw(raw)?)
    }

    async fn transaction_action<B: Serialize + Sync>(
        &self,
        kind: ResponseKind,
        transaction_id: &str,
        action: &str,
        body: &B,
    ) -> Result<RawResponse, ClientError> {
        let path = format!("/transactions/{}/{action}", path_segment(transaction_id)?);
        self.send(kind, Method::POST, &path, body).await
    }

    /// Send an authenticated request and capture the reply unvalidated.
    async fn send<B: Serialize + Sync + ?Sized>(
        &self,
        kind: ResponseKind,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<RawResponse, ClientError> {
        let token = self.access_token().await?;
        let url = format!("{}{path}", self.base_url);

        let mut request = self.client.request(method, &url).bearer_auth(&token).json(body);
        if let Some(company_id) = &self.company_id {
            request = request.header("Company-Id", company_id);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // Force a fresh login on the next request.
            self.token.write().await.take();
        }

        let raw = Self::handle_response(response).await?;
        tracing::debug!(
            operation = kind.operation(),
            status_code = raw.status_code,
            "Acquired request completed"
        );
        Ok(raw)
    }

    /// Read the body as JSON. An empty body (`204 No Content`) reads as an
    /// empty object; non-JSON bodies are kept as a string so that envelope
    /// validation rejects them.
    async fn handle_response(response: reqwest::Response) -> Result<RawResponse, ClientError> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(RawResponse::new(status, body))
    }

    /// Return a valid bearer token, logging in when none is cached.
    async fn access_token(&self) -> Result<String, ClientError> {
        if let Some(token) = self.token.read().await.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another task may have logged in while we waited.
        if let Some(token) = guard.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let token = self.login().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    async fn login(&self) -> Result<AccessToken, ClientError> {
        let url = format!("{}/login", self.base_url);
        let request = LoginRequest {
            app_id: &self.app_id,
            app_key: &self.app_key,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Acquired login failed");
            return Err(ClientError::Authentication {
                status: status.as_u16(),
            });
        }

        let login: LoginResponse = response.json().await?;
        let lifetime = Duration::from_secs(login.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);

        tracing::debug!(expires_in = login.expires_in, "Logged in to Acquired");

        Ok(AccessToken {
            value: login.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl CustomerApi for AcquiredClient {
    async fn create_customer(&self, payload: &CustomerPayload) -> Result<CustomerCreated, ApiError> {
        Ok(Self::create_customer(self, payload).await?)
    }

    async fn update_customer(
        &self,
        customer_id: &ExternalCustomerId,
        payload: &CustomerPayload,
    ) -> Result<CustomerUpdated, ApiError> {
        Ok(Self::update_customer(self, customer_id, payload).await?)
    }
}

/// Accept ids that can be placed in a URL path as is.
fn path_segment(id: &str) -> Result<&str, ClientError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && id != "."
        && id != "..";

    if valid {
        Ok(id)
    } else {
        Err(ClientError::InvalidIdentifier(id.to_string()))
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Value of the `Company-Id` header, if any.
    pub company_id: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            company_id: None,
        }
    }
}

impl ClientOptions {
    /// Create options with a company id.
    #[must_use]
    pub fn with_company_id(company_id: impl Into<String>) -> Self {
        Self {
            company_id: Some(company_id.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acquired_core::ResponseError;

    #[test]
    fn client_trims_trailing_slash() {
        let client = AcquiredClient::new("https://test-api.acquired.com/v1/", "app", "key");
        assert_eq!(client.base_url, "https://test-api.acquired.com/v1");
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::with_company_id("co-1");
        let client = AcquiredClient::with_options("http://localhost", "app", "key", options);
        assert_eq!(client.company_id.as_deref(), Some("co-1"));
    }

    #[test]
    fn debug_hides_app_key() {
        let client = AcquiredClient::new("http://localhost", "app", "super-secret");
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[test]
    fn from_config_requires_credentials() {
        let err = AcquiredClient::from_config(&ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));

        let config = ClientConfig {
            app_id: Some("app".into()),
            app_key: Some("key".into()),
            api_url: Some("http://localhost:9000/".into()),
            ..ClientConfig::default()
        };
        let client = AcquiredClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn path_segments() {
        assert_eq!(path_segment("cus_1-a.b").unwrap(), "cus_1-a.b");
        for bad in ["", ".", "..", "a/b", "a b", "a?b", "é"] {
            assert!(path_segment(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn malformed_errors_stay_malformed() {
        let err: ApiError = ClientError::Malformed(ResponseError::BodyNotObject).into();
        assert!(matches!(err, ApiError::Malformed(ResponseError::BodyNotObject)));

        let err: ApiError = ClientError::Authentication { status: 401 }.into();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
