use reqwest::header::RETRY_AFTER;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, ClientConfig, ClientError, CoachingClient, ErrorBody, FormsClient};

/// Shared HTTP plumbing for the forms and coaching clients.
///
/// Cheap to clone; clones share one connection pool. Every call is a single
/// request with no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn forms(&self) -> FormsClient {
        FormsClient::new(self.clone())
    }

    pub fn coaching(&self) -> CoachingClient {
        CoachingClient::new(self.clone())
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.config.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(%method, %url, "sending request");

        let request = self.http.request(method, url);
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and hand back the response, or an `ApiError` for non-2xx.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "received response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await.into())
        }
    }

    /// Send a request and decode a JSON success body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Turn a non-2xx response into an `ApiError`, reading the body best-effort.
async fn api_error(response: Response) -> ApiError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok());
    let text = response.text().await.unwrap_or_default();

    let error = ApiError {
        status,
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body: ErrorBody::parse(text),
        retry_after,
    };
    tracing::warn!(status = status.as_u16(), detail = ?error.detail(), "API request failed");
    error
}
