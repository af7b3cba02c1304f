//! Chat webhook wire format.

use serde::Serialize;
use tracing::warn;

use crate::embed::{EmbedField, MessageEmbed, MESSAGE_FIELD};

/// Most fields a chat service renders in one embed.
pub const MAX_FIELDS_PER_EMBED: usize = 25;

/// Most embeds a chat service accepts in one message.
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;

/// Most title, field name and field value characters a chat service accepts
/// in one message, summed over all of its embeds.
pub const MAX_MESSAGE_CHARACTERS: usize = 6000;

/// Value of the field appended when trailing fields had to be dropped.
pub const TRUNCATED_NOTICE: &str = "Message truncated, see the ticket for the full text.";

const CONTINUED_SUFFIX: &str = " (continued)";

/// Body of an execute-webhook request.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    pub embeds: Vec<WebhookEmbed>,
}

/// One embed as sent on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookEmbed {
    pub title: String,
    pub url: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl WebhookEmbed {
    fn character_count(&self) -> usize {
        self.title.chars().count() + self.fields.iter().map(field_characters).sum::<usize>()
    }
}

fn field_characters(field: &EmbedField) -> usize {
    field.name.chars().count() + field.value.chars().count()
}

/// Running totals while fields are packed into a message.
#[derive(Debug, Clone, Copy)]
struct Usage {
    embeds: usize,
    fields_in_last: usize,
    characters: usize,
}

impl Usage {
    /// Totals after appending one field, or `None` when it would break a limit.
    fn with_field(self, field_chars: usize, continued_title_chars: usize) -> Option<Self> {
        let mut next = self;
        if next.fields_in_last == MAX_FIELDS_PER_EMBED {
            if next.embeds == MAX_EMBEDS_PER_MESSAGE {
                return None;
            }
            next.embeds += 1;
            next.fields_in_last = 0;
            next.characters += continued_title_chars;
        }
        next.fields_in_last += 1;
        next.characters += field_chars;

        (next.characters <= MAX_MESSAGE_CHARACTERS).then_some(next)
    }
}

impl WebhookMessage {
    /// Pack an embed's fields, in order, into as many wire embeds as needed.
    ///
    /// Continuation embeds repeat the link and color with a suffixed title.
    /// When the fields exceed the per-message embed or character limits, the
    /// trailing ones are dropped and replaced by a single truncation notice.
    pub fn from_embed(embed: &MessageEmbed) -> Self {
        let continued_title = format!("{}{}", embed.title, CONTINUED_SUFFIX);
        let continued_chars = continued_title.chars().count();
        let notice = EmbedField::new(MESSAGE_FIELD, TRUNCATED_NOTICE);
        let notice_chars = field_characters(&notice);

        let mut usage = Usage {
            embeds: 1,
            fields_in_last: 0,
            characters: embed.title.chars().count(),
        };
        let mut kept = 0;

        for (idx, field) in embed.fields.iter().enumerate() {
            let Some(next) = usage.with_field(field_characters(field), continued_chars) else {
                break;
            };
            // Anything but the final field must leave room for the notice.
            let is_last = idx + 1 == embed.fields.len();
            if !is_last && next.with_field(notice_chars, continued_chars).is_none() {
                break;
            }
            usage = next;
            kept += 1;
        }

        let mut message = Self {
            embeds: vec![WebhookEmbed {
                title: embed.title.clone(),
                url: embed.url.clone(),
                color: embed.color,
                fields: Vec::new(),
            }],
        };
        for field in &embed.fields[..kept] {
            message.push_field(field.clone(), embed, &continued_title);
        }

        if kept < embed.fields.len() {
            let dropped = &embed.fields[kept..];
            warn!(
                title = %embed.title,
                total_fields = embed.fields.len(),
                dropped_fields = dropped.len(),
                dropped_characters = dropped.iter().map(field_characters).sum::<usize>(),
                "webhook_message_truncated"
            );
            if usage.with_field(notice_chars, continued_chars).is_some() {
                message.push_field(notice, embed, &continued_title);
            }
        }

        message
    }

    /// Title, field name and field value characters across every embed.
    pub fn character_count(&self) -> usize {
        self.embeds.iter().map(WebhookEmbed::character_count).sum()
    }

    fn push_field(&mut self, field: EmbedField, source: &MessageEmbed, continued_title: &str) {
        let needs_embed = self
            .embeds
            .last()
            .map_or(true, |e| e.fields.len() == MAX_FIELDS_PER_EMBED);

        if needs_embed {
            self.embeds.push(WebhookEmbed {
                title: continued_title.to_string(),
                url: source.url.clone(),
                color: source.color,
                fields: Vec::new(),
            });
        }

        if let Some(last) = self.embeds.last_mut() {
            last.fields.push(field);
        }
    }
}
