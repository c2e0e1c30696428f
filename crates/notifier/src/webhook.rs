//! Seller-notification webhook client.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use bakehouse_core::SellerOrderNotice;

/// Errors that can occur when calling the webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook returned a non-success status.
    #[error("webhook returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Posts [`SellerOrderNotice`]s to the automation webhook.
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: Url,
}

impl WebhookClient {
    /// Create a webhook client with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// POST the notice as JSON.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Http` on transport failure and
    /// `WebhookError::Api` on a non-2xx answer.
    pub async fn send(&self, notice: &SellerOrderNotice) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(notice)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WebhookError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
