use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::RunId;

/// Status of a coaching session held by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    #[serde(other)]
    Other,
}

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// A coaching session bound to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingSession {
    pub id: Uuid,
    pub run_id: RunId,
    pub pipeline_id: Uuid,
    pub status: SessionStatus,
    pub current_round: u32,
    pub max_rounds: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub last_activity_at: DateTime<Utc>,
}

/// One message in a coaching conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachTurn {
    pub id: Uuid,
    pub session_id: Uuid,
    pub turn_number: u32,
    pub role: TurnRole,
    pub content: String,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Response of `POST /runs/{run_id}/coach/start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartCoachingResponse {
    pub session: CoachingSession,
    pub initial_message: CoachTurn,
}

/// Response of `POST /runs/{run_id}/coach/message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub user_turn: CoachTurn,
    pub assistant_turn: CoachTurn,
    pub session_status: SessionStatus,
    pub current_round: u32,
    pub max_rounds: u32,
    pub remaining_rounds: i64,
}

impl SendMessageResponse {
    /// Check if the backend closed the session with this reply.
    pub fn is_final(&self) -> bool {
        self.session_status == SessionStatus::Completed || self.remaining_rounds <= 0
    }
}

/// Response of `GET /runs/{run_id}/coach/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistoryResponse {
    pub session: CoachingSession,
    pub turns: Vec<CoachTurn>,
}

/// Response of `POST /runs/{run_id}/coach/end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndCoachingResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_session_status_is_tolerated() {
        let status: SessionStatus = serde_json::from_value(json!("paused")).unwrap();
        assert_eq!(status, SessionStatus::Other);
    }

    #[test]
    fn final_reply_detection() {
        let turn = json!({
            "id": "0f8e2d6c-4a1b-4e59-9d3c-0a4f3b1a2c11",
            "session_id": "1f8e2d6c-4a1b-4e59-9d3c-0a4f3b1a2c11",
            "turn_number": 2,
            "role": "user",
            "content": "hello",
            "created_at": "2026-01-13T10:00:00Z"
        });
        let response: SendMessageResponse = serde_json::from_value(json!({
            "user_turn": turn,
            "assistant_turn": turn,
            "session_status": "active",
            "current_round": 4,
            "max_rounds": 4,
            "remaining_rounds": 0
        }))
        .unwrap();

        assert!(response.is_final());
        assert_eq!(response.user_turn.role, TurnRole::User);
    }
}
