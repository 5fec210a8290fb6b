//! Request body fields
//!
//! Routes read a handful of named string fields from the body. Bodies may be
//! URL-encoded forms or JSON objects; JSON scalars are coerced to their string
//! form. Only presence is checked.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;

use super::response::ApiError;

/// String fields of a request body
#[derive(Debug, Default, Clone)]
pub struct RequestFields(HashMap<String, String>);

impl RequestFields {
    /// A field that must be present and non-empty
    pub fn require(&self, name: &'static str) -> Result<&str, ApiError> {
        self.optional(name).ok_or(ApiError::MissingField(name))
    }

    /// A field that may be absent; empty values count as absent
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Parse a body according to its content type
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        if content_type.is_some_and(is_json) {
            Self::parse_json(body)
        } else {
            Self::parse_form(body)
        }
    }

    fn parse_json(body: &[u8]) -> Result<Self, ApiError> {
        let Value::Object(object) =
            serde_json::from_slice::<Value>(body).map_err(|_| ApiError::InvalidBody)?
        else {
            return Err(ApiError::InvalidBody);
        };

        let fields = object
            .into_iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((name, value))
            })
            .collect();
        Ok(Self(fields))
    }

    fn parse_form(body: &[u8]) -> Result<Self, ApiError> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(|_| ApiError::InvalidBody)?;
        Ok(Self(pairs.into_iter().collect()))
    }
}

fn is_json(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

impl<S> FromRequest<S> for RequestFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::InvalidBody)?;
        Self::parse(content_type.as_deref(), &body)
    }
}
