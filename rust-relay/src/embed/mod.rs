//! Embed construction from ticket payloads.
//!
//! ## Flow
//!
//! ```text
//! TicketPayload + Route → build_embed() → MessageEmbed
//! ```

pub mod builder;
pub mod chunk;
pub mod payload;
pub mod types;

pub use builder::{build_embed, PayloadError, ATTACHMENTS_FIELD, ATTACHMENTS_NOTICE, MESSAGE_FIELD};
pub use chunk::{split_into_chunks, ChunkError, MAX_FIELD_LENGTH};
pub use payload::TicketPayload;
pub use types::{EmbedField, MessageEmbed};
