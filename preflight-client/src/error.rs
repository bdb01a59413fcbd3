use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

/// The body of a non-2xx response, parsed as JSON when possible.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ErrorBody {
    pub fn parse(text: String) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// A non-2xx response from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub status_text: String,
    pub body: ErrorBody,

    /// Seconds from a `Retry-After` header, when the server sent one.
    pub retry_after: Option<u64>,
}

impl ApiError {
    /// The human-readable explanation the server gave, if any.
    ///
    /// Understands `{"detail": "..."}`, problem-details objects nested under
    /// `detail`, a top-level `message`, and plain-text bodies.
    pub fn detail(&self) -> Option<String> {
        match &self.body {
            ErrorBody::Json(value) => json_detail(value),
            ErrorBody::Text(text) => Some(text.trim().to_string()),
            ErrorBody::Empty => None,
        }
    }
}

fn json_detail(value: &Value) -> Option<String> {
    match value.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(nested @ Value::Object(_)) => {
            if let Some(detail) = json_detail(nested) {
                return Some(detail);
            }
            if let Some(Value::String(title)) = nested.get("title") {
                return Some(title.clone());
            }
        }
        _ => {}
    }
    match value.get("message") {
        Some(Value::String(message)) => Some(message.clone()),
        _ => None,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API request failed: {} {}",
            self.status.as_u16(),
            self.status_text
        )?;
        if let Some(detail) = self.detail() {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Error type for the forms and runs client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never got a response (connection refused, DNS, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(err) => Some(err.status),
            Self::Transport(err) => err.status(),
            Self::Decode(_) => None,
        }
    }
}
