//! Validation of account values read back from storage.
//!
//! Stored values may have been written by an older build or edited by hand,
//! so nothing read from the key-value area is trusted until it passes
//! [`sanitize_account`].

use serde_json::{Number, Value};
use thiserror::Error;

use crate::models::Account;

/// Why a stored candidate was not accepted as an [`Account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("value is not an object")]
    NotAnObject,
    #[error("missing id")]
    MissingId,
    #[error("missing email")]
    MissingEmail,
}

/// Validate a single parsed candidate.
///
/// `id`, `email` and `name` are coerced to strings; `id` and `email` must
/// come out non-empty. `password` survives only if it is already a string and
/// `sessionActive` is read by truthiness.
pub fn sanitize_account(candidate: &Value) -> Result<Account, RejectReason> {
    let Value::Object(fields) = candidate else {
        return Err(RejectReason::NotAnObject);
    };

    let id = coerce_string(fields.get("id"));
    let email = coerce_string(fields.get("email"));
    let name = coerce_string(fields.get("name"));
    if id.is_empty() {
        return Err(RejectReason::MissingId);
    }
    if email.is_empty() {
        return Err(RejectReason::MissingEmail);
    }

    let password = match fields.get("password") {
        Some(Value::String(p)) => Some(p.clone()),
        _ => None,
    };

    Ok(Account {
        id,
        email,
        name,
        password,
        session_active: truthy(fields.get("sessionActive")),
    })
}

/// Validate a stored directory. Anything but an array yields an empty
/// directory; rejected entries are dropped and the rest keep their order.
pub fn sanitize_directory(value: &Value) -> Vec<Account> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match sanitize_account(entry) {
            Ok(account) => Some(account),
            Err(reason) => {
                tracing::warn!(index, %reason, "Dropping invalid directory entry");
                None
            }
        })
        .collect()
}

/// Falsy values (`null`, `false`, `0`, `""`, missing) coerce to the empty
/// string; everything else to its display text.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(value) if truthy(Some(value)) => display_text(value),
        _ => String::new(),
    }
}

/// Arrays join their elements with commas, objects become `[object Object]`.
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Integral floats print without a fractional part.
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        format!("{f}")
    } else {
        n.to_string()
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
