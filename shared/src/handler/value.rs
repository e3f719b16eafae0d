//! Conversions from wire values into the shapes appliers expect.

use crate::{HandlerError, RemoteId, Value};

fn invalid(property: &str, expected: &'static str) -> HandlerError {
    HandlerError::InvalidValue {
        property: property.to_string(),
        expected,
    }
}

pub fn as_bool(property: &str, value: &Value) -> Result<bool, HandlerError> {
    value.as_bool().ok_or_else(|| invalid(property, "a boolean"))
}

pub fn as_i64(property: &str, value: &Value) -> Result<i64, HandlerError> {
    value.as_i64().ok_or_else(|| invalid(property, "an integer"))
}

pub fn as_usize(property: &str, value: &Value) -> Result<usize, HandlerError> {
    value
        .as_u64()
        .and_then(|number| usize::try_from(number).ok())
        .ok_or_else(|| invalid(property, "a non-negative integer"))
}

pub fn as_str<'v>(property: &str, value: &'v Value) -> Result<&'v str, HandlerError> {
    value.as_str().ok_or_else(|| invalid(property, "a string"))
}

pub fn as_string_list(property: &str, value: &Value) -> Result<Vec<String>, HandlerError> {
    let Some(items) = value.as_array() else {
        return Err(invalid(property, "an array of strings"));
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(property, "an array of strings"))
        })
        .collect()
}

pub fn as_id(property: &str, value: &Value) -> Result<RemoteId, HandlerError> {
    as_str(property, value).map(RemoteId::new)
}

/// `null` maps to `None`
pub fn as_optional_id(property: &str, value: &Value) -> Result<Option<RemoteId>, HandlerError> {
    if value.is_null() {
        return Ok(None);
    }
    as_id(property, value).map(Some)
}

pub fn as_id_list(property: &str, value: &Value) -> Result<Vec<RemoteId>, HandlerError> {
    as_string_list(property, value).map(|ids| ids.into_iter().map(RemoteId::from).collect())
}
