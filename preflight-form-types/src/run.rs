use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::FieldValue;

/// Server-assigned identifier of a survey run.
///
/// Run ids only ever come from the backend (or from a user quoting one back);
/// the client never mints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for RunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Completed,
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Response of `POST /runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRunResponse {
    pub run_id: RunId,
    pub form_version: String,
    pub started_at: DateTime<Utc>,
}

/// One saved answer as reported by `GET /runs/{run_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSummary {
    pub page_id: String,
    pub field_name: String,
    pub value: FieldValue,
    pub saved_at: DateTime<Utc>,
}

/// Response of `GET /runs/{run_id}`: status plus the flattened answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub status: RunStatus,
    #[serde(default)]
    pub last_page: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<AnswerSummary>,
}

/// Response of `PATCH /runs/{run_id}/answers`. No content is echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaveAnswersResponse {
    pub saved_at: DateTime<Utc>,
}

/// Response of `POST /runs/{run_id}/complete`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompleteRunResponse {
    pub status: RunStatus,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_run_summary() {
        let summary: RunSummary = serde_json::from_value(json!({
            "run_id": "5b0c8f8e-8a53-4d59-9d3c-0a4f3b1a2c11",
            "status": "in_progress",
            "last_page": "p2",
            "started_at": "2026-01-13T10:00:00Z",
            "completed_at": null,
            "answers": [
                {"page_id": "p1", "field_name": "role", "value": "CTO", "saved_at": "2026-01-13T10:05:00.123456+00:00"}
            ]
        }))
        .unwrap();

        assert_eq!(summary.status, RunStatus::InProgress);
        assert_eq!(summary.last_page.as_deref(), Some("p2"));
        assert_eq!(summary.answers[0].value, FieldValue::from("CTO"));
        assert_eq!(
            summary.run_id.to_string(),
            "5b0c8f8e-8a53-4d59-9d3c-0a4f3b1a2c11"
        );
    }

    #[test]
    fn parses_run_id() {
        let id: RunId = " 5b0c8f8e-8a53-4d59-9d3c-0a4f3b1a2c11 ".parse().unwrap();
        assert_eq!(id.to_string(), "5b0c8f8e-8a53-4d59-9d3c-0a4f3b1a2c11");
        assert!("not-a-run".parse::<RunId>().is_err());
    }
}
