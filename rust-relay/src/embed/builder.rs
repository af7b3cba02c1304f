//! Route-driven embed builder.
//!
//! Pure: the same payload and route always produce the same embed.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::chunk::{split_into_chunks, truncate_chars, ChunkError, MAX_FIELD_LENGTH};
use super::payload::{render_value, TicketPayload};
use super::types::MessageEmbed;
use crate::html::{html_to_text, looks_like_html};
use crate::routes::{FieldRule, Route};

/// Name shared by every chunk of the article body.
pub const MESSAGE_FIELD: &str = "Message";

/// Field appended when the article carries attachments.
pub const ATTACHMENTS_FIELD: &str = "Attachments";

pub const ATTACHMENTS_NOTICE: &str =
    "This ticket has additional files attached. View them on the ticket page.";

const TICKET_ID_PATH: &[&str] = &["ticket", "id"];
const BODY_PATH: &[&str] = &["article", "body"];
const CONTENT_TYPE_PATH: &[&str] = &["article", "content_type"];
const ATTACHMENTS_PATH: &[&str] = &["article", "attachments"];

/// The payload lacks a value the route cannot render without.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("required field '{0}' is missing")]
    MissingField(String),
}

/// Reasons the article body could not be rendered as chunks.
#[derive(Debug, Error)]
enum BodyError {
    #[error("article body is not text")]
    NotText,

    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// Build the embed for `payload` according to `route`.
///
/// Fails only when the ticket id or a required field is missing; every
/// optional value is omitted when falsy.
pub fn build_embed(
    payload: &TicketPayload,
    route: &Route,
    ticket_base_url: &str,
) -> Result<MessageEmbed, PayloadError> {
    let ticket_id = payload
        .ticket_id()
        .ok_or_else(|| PayloadError::MissingField(TICKET_ID_PATH.join(".")))?;

    let mut embed = MessageEmbed::new(
        format!("{} #{}", route.title, ticket_id),
        format!("{}{}", ticket_base_url, ticket_id),
        route.color,
    );

    for rule in route.fields {
        apply_rule(&mut embed, payload, rule)?;
    }

    if payload.truthy(ATTACHMENTS_PATH).is_some() {
        embed.add_field(ATTACHMENTS_FIELD, ATTACHMENTS_NOTICE);
    }

    append_message(&mut embed, payload);

    info!(
        route = route.id,
        ticket_id = %ticket_id,
        field_count = embed.fields.len(),
        "embed_built"
    );

    Ok(embed)
}

fn apply_rule(
    embed: &mut MessageEmbed,
    payload: &TicketPayload,
    rule: &FieldRule,
) -> Result<(), PayloadError> {
    match rule {
        FieldRule::Required { name, path } => {
            let value = payload
                .text(path)
                .ok_or_else(|| PayloadError::MissingField(path.join(".")))?;
            embed.add_field(*name, truncate_chars(&value, MAX_FIELD_LENGTH));
        }
        FieldRule::Optional { name, path } => {
            if let Some(value) = payload.text(path) {
                embed.add_field(*name, truncate_chars(&value, MAX_FIELD_LENGTH));
            }
        }
        FieldRule::Numbered { name, key, range } => {
            for n in range.clone() {
                let numbered_key = format!("{}{}", key, n);
                if let Some(value) = payload.text(&["ticket", numbered_key.as_str()]) {
                    embed.add_field(
                        format!("{} {}", name, n),
                        truncate_chars(&value, MAX_FIELD_LENGTH),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Append the article body as one `Message` field per chunk.
///
/// Falls back to a single field holding the raw body when it cannot be
/// rendered or split.
fn append_message(embed: &mut MessageEmbed, payload: &TicketPayload) {
    let body = match payload.get(BODY_PATH) {
        Some(body) if !body.is_null() => body,
        _ => {
            debug!("embed_message_body_absent");
            return;
        }
    };

    let chunks = body_text(payload, body)
        .and_then(|text| split_into_chunks(&text, MAX_FIELD_LENGTH).map_err(BodyError::from));

    match chunks {
        Ok(chunks) => {
            for chunk in chunks {
                embed.add_field(MESSAGE_FIELD, chunk);
            }
        }
        Err(e) => {
            warn!(error = %e, "embed_message_body_fallback");
            let raw = render_value(body);
            embed.add_field(MESSAGE_FIELD, truncate_chars(&raw, MAX_FIELD_LENGTH));
        }
    }
}

/// Plain text of the article body, with markup stripped when present.
fn body_text(payload: &TicketPayload, body: &Value) -> Result<String, BodyError> {
    let raw = body.as_str().ok_or(BodyError::NotText)?;

    let declared_html = payload
        .get(CONTENT_TYPE_PATH)
        .and_then(Value::as_str)
        .map(|ct| ct.eq_ignore_ascii_case("text/html"))
        .unwrap_or(false);

    if declared_html || looks_like_html(raw) {
        Ok(html_to_text(raw))
    } else {
        Ok(raw.to_string())
    }
}
