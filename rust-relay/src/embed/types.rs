//! Type definitions for message embeds.

use serde::Serialize;

/// One named value rendered in an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    /// Create a full-width (non-inline) field.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// A chat message card: title, link, color and ordered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEmbed {
    pub title: String,
    pub url: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl MessageEmbed {
    pub fn new(title: String, url: String, color: u32) -> Self {
        Self {
            title,
            url,
            color,
            fields: Vec::new(),
        }
    }

    /// Append a field, preserving insertion order.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(EmbedField::new(name, value));
    }

    /// Values of every field with the given name, in order.
    pub fn values_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
