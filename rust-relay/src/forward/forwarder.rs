//! HTTP forwarder for chat webhooks.
//!
//! One POST per accepted ticket. No retry; the client's default timeouts apply.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info};

use super::types::WebhookMessage;
use crate::config::TargetUrls;
use crate::embed::{chunk::truncate_chars, MessageEmbed};
use crate::routes::Target;

/// Longest downstream error body kept for logs.
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("request to {target} webhook failed: {source}")]
    Transport {
        target: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{target} webhook responded with {status}: {body}")]
    Status {
        target: &'static str,
        status: StatusCode,
        body: String,
    },
}

/// Shared HTTP client plus the target → webhook URL map.
#[derive(Clone)]
pub struct Forwarder {
    inner: Arc<ForwarderInner>,
}

struct ForwarderInner {
    client: Client,
    targets: TargetUrls,
}

impl Forwarder {
    /// Create a forwarder with a default HTTP client.
    pub fn new(targets: TargetUrls) -> Self {
        Self::with_client(Client::new(), targets)
    }

    pub fn with_client(client: Client, targets: TargetUrls) -> Self {
        Self {
            inner: Arc::new(ForwarderInner { client, targets }),
        }
    }

    /// Deliver `embed` to the webhook configured for `target`.
    pub async fn forward(&self, target: Target, embed: &MessageEmbed) -> Result<(), ForwardError> {
        let url = self.inner.targets.url_for(target);
        let message = WebhookMessage::from_embed(embed);

        info!(
            webhook = target.as_str(),
            title = %embed.title,
            embed_count = message.embeds.len(),
            field_count = embed.fields.len(),
            "forward_starting"
        );

        let response = self
            .inner
            .client
            .post(url.clone())
            .json(&message)
            .send()
            .await
            .map_err(|source| {
                error!(webhook = target.as_str(), error = %source, "forward_request_failed");
                ForwardError::Transport {
                    target: target.as_str(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate_chars(&body, ERROR_BODY_PREVIEW).to_string();
            error!(
                webhook = target.as_str(),
                status_code = status.as_u16(),
                body = %body,
                "forward_rejected"
            );
            return Err(ForwardError::Status {
                target: target.as_str(),
                status,
                body,
            });
        }

        info!(
            webhook = target.as_str(),
            status_code = status.as_u16(),
            "forward_complete"
        );

        Ok(())
    }
}
