use std::fmt;

use preflight_form_types::{
    ConversationHistoryResponse, EndCoachingResponse, RunId, SendMessageResponse,
    StartCoachingResponse,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ApiClient, ApiError, ClientError};

/// The three ways a coaching call can fail, each with its own recovery:
/// wait and retry, leave the conversation, or report a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachingErrorKind {
    RateLimit,
    SessionEnded,
    ApiError,
}

impl CoachingErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::SessionEnded => "session_ended",
            Self::ApiError => "api_error",
        }
    }
}

impl fmt::Display for CoachingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for the coaching client.
#[derive(Debug, thiserror::Error)]
pub enum CoachingError {
    /// HTTP 429. `retry_after` is in seconds.
    #[error("{message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// The session is completed or out of rounds.
    #[error("{message}")]
    SessionEnded { message: String },

    /// Any other non-2xx response.
    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        source: ApiError,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CoachingError {
    pub fn kind(&self) -> CoachingErrorKind {
        match self {
            Self::RateLimit { .. } => CoachingErrorKind::RateLimit,
            Self::SessionEnded { .. } => CoachingErrorKind::SessionEnded,
            Self::Api { .. } | Self::Transport(_) | Self::Decode(_) => CoachingErrorKind::ApiError,
        }
    }

    /// Seconds to wait before trying again, for rate limits.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RateLimit { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::SessionEnded { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Decode(_) => None,
        }
    }
}

impl From<ApiError> for CoachingError {
    fn from(err: ApiError) -> Self {
        let detail = err.detail();

        if err.status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = err
                .body
                .as_json()
                .and_then(|body| body.get("retry_after"))
                .and_then(serde_json::Value::as_u64)
                .or(err.retry_after);
            return Self::RateLimit {
                message: detail
                    .unwrap_or_else(|| "Too many requests. Please wait a moment.".to_string()),
                retry_after,
            };
        }

        if err.status == StatusCode::BAD_REQUEST
            && let Some(detail) = &detail
        {
            let lowered = detail.to_lowercase();
            if lowered.contains("completed") || lowered.contains("maximum rounds") {
                return Self::SessionEnded {
                    message: detail.clone(),
                };
            }
        }

        Self::Api {
            status: err.status,
            message: detail.unwrap_or_else(|| err.to_string()),
            source: err,
        }
    }
}

impl From<ClientError> for CoachingError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(err) => err.into(),
            ClientError::Transport(err) => Self::Transport(err),
            ClientError::Decode(err) => Self::Decode(err),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct StartCoachingRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pipeline_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
}

/// Client for the coaching conversation attached to a run.
#[derive(Debug, Clone)]
pub struct CoachingClient {
    api: ApiClient,
}

impl CoachingClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `POST /runs/{run_id}/coach/start`. Uses the default pipeline unless one is named.
    pub async fn start(
        &self,
        run_id: RunId,
        pipeline_name: Option<&str>,
    ) -> Result<StartCoachingResponse, CoachingError> {
        let request = self
            .request(Method::POST, run_id, "start")
            .json(&StartCoachingRequest { pipeline_name });
        let started: StartCoachingResponse = self.call(request).await?;

        tracing::info!(
            %run_id,
            session_id = %started.session.id,
            max_rounds = started.session.max_rounds,
            "coaching session started"
        );
        Ok(started)
    }

    /// `POST /runs/{run_id}/coach/message`.
    pub async fn message(
        &self,
        run_id: RunId,
        message: &str,
    ) -> Result<SendMessageResponse, CoachingError> {
        let request = self
            .request(Method::POST, run_id, "message")
            .json(&SendMessageRequest { message });
        let reply: SendMessageResponse = self.call(request).await?;

        tracing::debug!(
            %run_id,
            round = reply.current_round,
            remaining = reply.remaining_rounds,
            "coach replied"
        );
        Ok(reply)
    }

    /// `GET /runs/{run_id}/coach/history`.
    pub async fn history(&self, run_id: RunId) -> Result<ConversationHistoryResponse, CoachingError> {
        let request = self.request(Method::GET, run_id, "history");
        self.call(request).await
    }

    /// `POST /runs/{run_id}/coach/end`.
    pub async fn end(&self, run_id: RunId) -> Result<EndCoachingResponse, CoachingError> {
        let request = self.request(Method::POST, run_id, "end");
        let ended: EndCoachingResponse = self.call(request).await?;

        tracing::info!(%run_id, status = %ended.status, "coaching session ended");
        Ok(ended)
    }

    fn request(&self, method: Method, run_id: RunId, action: &str) -> RequestBuilder {
        let id = run_id.to_string();
        self.api.request(method, &["runs", &id, "coach", action])
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CoachingError> {
        self.api.send_json(request).await.map_err(|err| {
            let err = CoachingError::from(err);
            tracing::debug!(kind = %err.kind(), "coaching call failed");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorBody;
    use serde_json::json;

    fn api_error(status: StatusCode, body: serde_json::Value) -> ApiError {
        ApiError {
            status,
            status_text: status.canonical_reason().unwrap_or_default().into(),
            body: ErrorBody::Json(body),
            retry_after: None,
        }
    }

    #[test]
    fn rate_limit_prefers_body_retry_after() {
        let mut err = api_error(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"detail": "slow down", "retry_after": 30}),
        );
        err.retry_after = Some(5);

        let err = CoachingError::from(err);
        assert_eq!(err.kind().as_str(), "rate_limit");
        assert_eq!(err.retry_after(), Some(30));
        assert_eq!(err.to_string(), "slow down");
    }

    #[test]
    fn rate_limit_falls_back_to_header() {
        let mut err = api_error(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"detail": "Rate limit exceeded. Try again in 12 seconds."}),
        );
        err.retry_after = Some(12);

        assert_eq!(CoachingError::from(err).retry_after(), Some(12));
    }

    #[test]
    fn session_ended_messages() {
        for detail in [
            "Session completed",
            "Coaching session is completed",
            "Maximum rounds (4) reached",
            "Session already COMPLETED",
        ] {
            let err = CoachingError::from(api_error(StatusCode::BAD_REQUEST, json!({"detail": detail})));
            assert_eq!(err.kind(), CoachingErrorKind::SessionEnded, "{detail}");
        }
    }

    #[test]
    fn everything_else_is_api_error() {
        let bad_request =
            CoachingError::from(api_error(StatusCode::BAD_REQUEST, json!({"detail": "Invalid input"})));
        assert_eq!(bad_request.kind(), CoachingErrorKind::ApiError);

        let conflict = CoachingError::from(api_error(
            StatusCode::CONFLICT,
            json!({"detail": "Coaching session already exists for this run"}),
        ));
        assert_eq!(conflict.kind(), CoachingErrorKind::ApiError);
        assert_eq!(conflict.status(), Some(StatusCode::CONFLICT));

        // only 400s are sniffed for "completed"
        let not_found = CoachingError::from(api_error(
            StatusCode::NOT_FOUND,
            json!({"detail": "Run completed elsewhere"}),
        ));
        assert_eq!(not_found.kind(), CoachingErrorKind::ApiError);
    }
}
