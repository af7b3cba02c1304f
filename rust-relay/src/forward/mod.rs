//! Delivery of embeds to downstream chat webhooks.
//!
//! ```text
//! MessageEmbed → WebhookMessage → POST target webhook URL
//! ```

pub mod forwarder;
pub mod types;

pub use forwarder::{ForwardError, Forwarder};
pub use types::{
    WebhookEmbed, WebhookMessage, MAX_EMBEDS_PER_MESSAGE, MAX_FIELDS_PER_EMBED,
    MAX_MESSAGE_CHARACTERS, TRUNCATED_NOTICE,
};
