//! Client for the order relay.
//!
//! Checkout posts one [`OrderNotification`] per placed order. The relay
//! forwards it to the seller automation.

use std::time::Duration;

use thiserror::Error;
use tracing::instrument;
use url::Url;

use bakehouse_core::OrderNotification;

use crate::config::NotifyConfig;
use crate::services::checkout::OrderNotifier;

/// Errors that can occur when notifying the relay.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay answered with a non-success status.
    #[error("relay returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// HTTP client for the relay endpoint.
#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: Url,
}

impl RelayClient {
    /// Create a relay client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        Self::with_timeout(config.relay_url.clone(), config.timeout)
    }

    /// Create a relay client for `url` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_timeout(url: Url, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// The endpoint notifications are posted to.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// POST the notification as JSON.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Http` on transport failure and
    /// `NotifyError::Status` when the relay answers with a non-2xx status.
    #[instrument(skip(self, notification), fields(product_id = %notification.product_id))]
    pub async fn send(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(notification)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

impl OrderNotifier for RelayClient {
    async fn notify(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        self.send(notification).await
    }
}
