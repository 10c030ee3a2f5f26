use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A persisted row of the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i32,
    pub content: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Body of `POST /api/messages`.
///
/// `content` is kept as raw JSON so presence is judged by truthiness rather
/// than by type.
#[derive(Debug, Default)]
pub struct CreateMessageRequest {
    pub content: Option<Value>,
}

impl CreateMessageRequest {
    /// Build from a parsed body. Anything but a JSON object has no fields.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => Self {
                content: fields.remove("content"),
            },
            _ => Self::default(),
        }
    }

    /// The text to store, or `None` when the field is absent or falsy.
    ///
    /// Falsy values are `null`, `""`, `0` and `false`. Strings pass through
    /// unchanged, other scalars and objects are stored in their JSON text
    /// form, arrays as a PostgreSQL array literal.
    pub fn content(&self) -> Option<String> {
        let value = self.content.as_ref()?;
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            _ => Some(to_text(value)),
        }
    }
}

/// Text form of a JSON value as written to a `TEXT` column.
fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Array(items) => array_literal(items),
        other => other.to_string(),
    }
}

/// Integral floats print without a fraction (`1.0` -> `1`).
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{:.0}", f)
        }
        _ => n.to_string(),
    }
}

/// `["a", null, [1]]` -> `{"a",NULL,{"1"}}`
fn array_literal(items: &[Value]) -> String {
    let elements: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::Null => "NULL".to_string(),
            Value::Array(nested) => array_literal(nested),
            other => {
                let text = to_text(other).replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\"", text)
            }
        })
        .collect();
    format!("{{{}}}", elements.join(","))
}
