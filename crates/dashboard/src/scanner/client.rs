//! Reqwest implementation of the scanner backend client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use parceldeck_core::{Email, OrderNumber, Snapshot};

use super::{BackendError, NewOrders, OrderSource};

/// Client for the mailbox-scanner HTTP API.
///
/// Cheaply cloneable via `Arc`; one instance is shared across all handlers.
#[derive(Clone)]
pub struct ScannerClient {
    inner: Arc<ScannerClientInner>,
}

struct ScannerClientInner {
    client: reqwest::Client,
    base_url: Url,
}

/// Response of `GET /login`: where to send the user for consent.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthChallenge {
    /// The OAuth authorization URL to redirect the user to.
    pub authorization_url: String,
}

/// Response of `POST /oauth2callback`.
#[derive(Debug, Clone, Deserialize)]
struct AuthCallbackResponse {
    status: String,
    #[serde(default)]
    email: Option<String>,
}

/// Generic status envelope used by mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
struct StatusResponse {
    status: String,
}

impl ScannerClient {
    /// Create a new scanner client for the given backend base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(ScannerClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.inner.base_url.join(path).map_err(|e| {
            BackendError::Rejected(format!("invalid scanner endpoint {path}: {e}"))
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, BackendError> {
        let response = self.inner.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Ask the scanner for the OAuth authorization URL.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn authorization_url(&self) -> Result<AuthChallenge, BackendError> {
        let url = self.endpoint("login")?;
        self.get_json(url).await
    }

    /// Relay the OAuth authorization code to the scanner and get back the
    /// authenticated email.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` if the scanner reports a
    /// non-success status or omits the email.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<String, BackendError> {
        let url = self.endpoint("oauth2callback")?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await?;
        let parsed: AuthCallbackResponse = Self::decode(response).await?;

        if parsed.status != "success" {
            return Err(BackendError::Rejected(format!(
                "oauth exchange failed with status {}",
                parsed.status
            )));
        }
        parsed
            .email
            .ok_or_else(|| BackendError::Rejected("oauth exchange returned no email".to_owned()))
    }

    /// Terminate the scanner-side session.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), BackendError> {
        let url = self.endpoint("logout")?;
        let response = self.inner.client.post(url).send().await?;
        let parsed: StatusResponse = Self::decode(response).await?;
        if parsed.status == "success" {
            Ok(())
        } else {
            Err(BackendError::Rejected(format!(
                "logout failed with status {}",
                parsed.status
            )))
        }
    }

    async fn post_mutation(&self, path: &str, email: Option<&Email>) -> Result<(), BackendError> {
        let mut url = self.endpoint(path)?;
        if let Some(email) = email {
            url.query_pairs_mut().append_pair("email", email.as_str());
        }
        let response = self.inner.client.post(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Status {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl OrderSource for ScannerClient {
    #[instrument(skip(self, email))]
    async fn fetch_all_orders(&self, email: &Email) -> Result<Snapshot, BackendError> {
        let mut url = self.endpoint("get_all_orders")?;
        url.query_pairs_mut().append_pair("email", email.as_str());
        let snapshot: Snapshot = self.get_json(url).await?;
        debug!(orders = snapshot.len(), "fetched full snapshot");
        Ok(snapshot)
    }

    #[instrument(skip(self, email))]
    async fn fetch_new_orders(&self, email: &Email) -> Result<NewOrders, BackendError> {
        let mut url = self.endpoint("fetch_emails")?;
        url.query_pairs_mut().append_pair("email", email.as_str());
        let new_orders: NewOrders = self.get_json(url).await?;
        debug!(
            discovered = new_orders.discovered.len(),
            total = new_orders.all_orders.len(),
            "scanner re-scan finished"
        );
        Ok(new_orders)
    }

    #[instrument(skip(self, email))]
    async fn discard_order(
        &self,
        order_number: &OrderNumber,
        email: &Email,
    ) -> Result<(), BackendError> {
        self.post_mutation(&format!("orders/{order_number}/discard"), Some(email))
            .await
    }

    #[instrument(skip(self))]
    async fn mark_returned(&self, order_number: &OrderNumber) -> Result<(), BackendError> {
        self.post_mutation(&format!("orders/{order_number}/mark-returned"), None)
            .await
    }
}
