//! Ticket relay - signed ticketing webhooks to chat embeds.
//!
//! The ticketing system posts ticket events to one path per route. Each
//! request is verified against `X-Hub-Signature`, rendered as an embed and
//! forwarded to the chat webhook configured for the route.
//!
//! ## Architecture
//!
//! ```text
//! Ticketing system → Web Server → verify → build embed → Forwarder → Chat webhook
//! ```

pub mod config;
pub mod embed;
pub mod forward;
pub mod html;
pub mod routes;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError, TargetUrls};
pub use embed::{build_embed, MessageEmbed, TicketPayload};
pub use forward::{ForwardError, Forwarder};
pub use routes::{find_route, Route, Target, ROUTES};
pub use web::{create_router, AppState, RelayError};
