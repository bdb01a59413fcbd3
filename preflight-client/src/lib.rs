//! # preflight-client
//!
//! Async clients for the preflight API.
//!
//! - `FormsClient` - form definitions, runs and per-page answer saves
//! - `CoachingClient` - the coaching conversation attached to a run, with errors
//!   classified into rate limit, session ended and generic API failure
//!
//! ```rust,ignore
//! use preflight_client::{ApiClient, ClientConfig};
//!
//! let api = ApiClient::new(ClientConfig::from_env()?)?;
//! let form = api.forms().get_form_definition("ai-readiness", None).await?;
//! let run = api.forms().create_run("ai-readiness", None).await?;
//! ```

mod config;
pub use config::{
    API_TIMEOUT_VAR, API_TOKEN_VAR, API_URL_VAR, ClientConfig, ConfigError, DEFAULT_BASE_URL,
};

mod error;
pub use error::{ApiError, ClientError, ErrorBody};

mod api;
pub use api::ApiClient;

mod forms;
pub use forms::FormsClient;

mod coaching;
pub use coaching::{CoachingClient, CoachingError, CoachingErrorKind};

pub use reqwest::StatusCode;
