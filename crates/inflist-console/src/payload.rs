#![forbid(unsafe_code)]

//! Decoding of list response bodies.
//!
//! List endpoints answer in one of three shapes, and all three decode to a
//! [`ListPage`]:
//!
//! | Body                                   | Items        | Total        |
//! |----------------------------------------|--------------|--------------|
//! | `{"<field>": [...], "total": n}`       | the array    | `Some(n)`    |
//! | `{"<field>": null}` or field missing   | empty        | per `total`  |
//! | `[...]`                                | the array    | `None`       |
//! | `null`                                 | empty        | `None`       |
//!
//! Anything else is a [`FetchError::Decode`].

use inflist_query::FetchError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Items from one response plus the server's total, when it sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

impl<T> ListPage<T> {
    fn empty(total: Option<u64>) -> Self {
        Self {
            items: Vec::new(),
            total,
        }
    }
}

/// Decode a list body whose envelope keeps the items under `field`.
pub fn decode_list<T: DeserializeOwned>(body: &str, field: &str) -> Result<ListPage<T>, FetchError> {
    let value: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    decode_value(value, field)
}

/// [`decode_list`] over an already-parsed body.
pub fn decode_value<T: DeserializeOwned>(value: Value, field: &str) -> Result<ListPage<T>, FetchError> {
    match value {
        Value::Null => Ok(ListPage::empty(None)),
        Value::Array(_) => Ok(ListPage {
            items: items_from(value)?,
            total: None,
        }),
        Value::Object(mut map) => {
            let total = map.get("total").and_then(Value::as_u64);
            match map.remove(field) {
                None | Some(Value::Null) => Ok(ListPage::empty(total)),
                Some(items) => Ok(ListPage {
                    items: items_from(items)?,
                    total,
                }),
            }
        }
        other => Err(FetchError::Decode(format!(
            "expected a list or an object with `{field}`, got {}",
            kind(&other)
        ))),
    }
}

fn items_from<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
