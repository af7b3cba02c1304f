//! Untyped ticket payload access.
//!
//! The ticketing system sends a loosely shaped JSON document. Values are read
//! by key path and judged by truthiness: `null`, `false`, `0`, `""`, `[]` and
//! `{}` count as absent.
//!
//! Text inside the document may be damaged (a cut emoji leaves half a UTF-16
//! surrogate pair, a mangled upload leaves invalid UTF-8). Such bodies are
//! repaired with U+FFFD replacement characters rather than rejected.

use std::borrow::Cow;

use serde_json::Value;
use tracing::warn;

/// Parsed inbound ticket webhook body.
#[derive(Debug, Clone)]
pub struct TicketPayload(Value);

impl TicketPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a webhook body, repairing damaged text when strict parsing fails.
    ///
    /// Returns the strict parse error when the repaired body is still not JSON.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let err = match serde_json::from_slice(body) {
            Ok(value) => return Ok(Self(value)),
            Err(e) => e,
        };

        let text = String::from_utf8_lossy(body);
        let repaired = replace_lone_surrogates(&text);
        if matches!((&text, &repaired), (Cow::Borrowed(_), Cow::Borrowed(_))) {
            return Err(err);
        }

        match serde_json::from_str(&repaired) {
            Ok(value) => {
                warn!(error = %err, "ticket_payload_text_repaired");
                Ok(Self(value))
            }
            Err(_) => Err(err),
        }
    }

    /// Value at `path`, if every key along it exists.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |value, key| value.get(key))
    }

    /// Value at `path` when it is truthy.
    pub fn truthy(&self, path: &[&str]) -> Option<&Value> {
        self.get(path).filter(|v| is_truthy(v))
    }

    /// Rendered text at `path` when it is truthy.
    pub fn text(&self, path: &[&str]) -> Option<String> {
        self.truthy(path).map(render_value)
    }

    /// The ticket id as text.
    pub fn ticket_id(&self) -> Option<String> {
        self.text(&["ticket", "id"])
    }
}

/// Truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Replace `\uXXXX` escapes of unpaired UTF-16 surrogates with `\uFFFD`.
///
/// Escaped backslashes are skipped, so `\\ud83d` is left alone.
fn replace_lone_surrogates(text: &str) -> Cow<'_, str> {
    const HIGH: std::ops::Range<u16> = 0xD800..0xDC00;
    const LOW: std::ops::Range<u16> = 0xDC00..0xE000;

    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(unit) = escaped_unit(text, i) else {
            i += 2;
            continue;
        };
        if HIGH.contains(&unit) && escaped_unit(text, i + 6).is_some_and(|u| LOW.contains(&u)) {
            i += 12;
            continue;
        }
        if HIGH.contains(&unit) || LOW.contains(&unit) {
            out.push_str(&text[copied..i]);
            out.push_str("\\uFFFD");
            copied = i + 6;
        }
        i += 6;
    }

    if copied == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

/// Code unit of the `\uXXXX` escape starting at byte `at`.
fn escaped_unit(text: &str, at: usize) -> Option<u16> {
    let digits = text.get(at..at + 6)?.strip_prefix("\\u")?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// Render a JSON value as field text. Strings are used verbatim.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([1])));
        assert!(is_truthy(&json!({"a": 1})));
    }

    #[test]
    fn test_get_nested_path() {
        let payload = TicketPayload::new(json!({
            "ticket": {"customer": {"firstname": "Ann"}}
        }));

        assert_eq!(
            payload.get(&["ticket", "customer", "firstname"]),
            Some(&json!("Ann"))
        );
        assert!(payload.get(&["ticket", "customer", "login"]).is_none());
        assert!(payload.get(&["article", "body"]).is_none());
    }

    #[test]
    fn test_get_through_non_object() {
        let payload = TicketPayload::new(json!({"ticket": "flat"}));
        assert!(payload.get(&["ticket", "id"]).is_none());
    }

    #[test]
    fn test_ticket_id_accepts_numbers() {
        let numeric = TicketPayload::new(json!({"ticket": {"id": 42}}));
        let text = TicketPayload::new(json!({"ticket": {"id": "42"}}));

        assert_eq!(numeric.ticket_id().as_deref(), Some("42"));
        assert_eq!(text.ticket_id().as_deref(), Some("42"));
    }

    #[test]
    fn test_text_skips_falsy() {
        let payload = TicketPayload::new(json!({"ticket": {"a": "", "b": false, "c": "yes"}}));

        assert!(payload.text(&["ticket", "a"]).is_none());
        assert!(payload.text(&["ticket", "b"]).is_none());
        assert_eq!(payload.text(&["ticket", "c"]).as_deref(), Some("yes"));
    }

    #[test]
    fn test_from_slice_rejects_invalid_json() {
        assert!(TicketPayload::from_slice(b"{not json").is_err());
        assert!(TicketPayload::from_slice(br#"{"ticket": {}}"#).is_ok());
        assert!(TicketPayload::from_slice(br#"{"body": "\ud83d""#).is_err());
    }

    #[test]
    fn test_lone_surrogates_replaced() {
        let payload =
            TicketPayload::from_slice(br#"{"body": "broken emoji \ud83d end \ude00"}"#).unwrap();

        assert_eq!(
            payload.text(&["body"]).as_deref(),
            Some("broken emoji \u{FFFD} end \u{FFFD}")
        );
    }

    #[test]
    fn test_surrogate_pairs_kept_when_repairing() {
        let payload =
            TicketPayload::from_slice(br#"{"a": "\ud83d\ude00", "b": "\ud83d", "c": "\\ud83d"}"#)
                .unwrap();

        assert_eq!(payload.text(&["a"]).as_deref(), Some("\u{1F600}"));
        assert_eq!(payload.text(&["b"]).as_deref(), Some("\u{FFFD}"));
        assert_eq!(payload.text(&["c"]).as_deref(), Some("\\ud83d"));
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let payload = TicketPayload::from_slice(b"{\"body\": \"caf\xe9\"}").unwrap();
        assert_eq!(payload.text(&["body"]).as_deref(), Some("caf\u{FFFD}"));
    }

    #[test]
    fn test_replace_lone_surrogates_borrows_clean_text() {
        assert!(matches!(
            replace_lone_surrogates(r#"{"a": "\u00e9 \\ \ud83d\ude00"}"#),
            Cow::Borrowed(_)
        ));
        assert_eq!(replace_lone_surrogates(r"\udc00x"), r"\uFFFDx");
    }
}
