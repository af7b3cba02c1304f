//! HTML utilities for article bodies.

pub mod text;

pub use text::{html_to_text, looks_like_html};
