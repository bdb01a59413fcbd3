//! Core types for preflight forms.
//!
//! This crate provides the foundational types shared by the renderer and the API clients:
//! - `FormDefinition`, `FormPage` and `FormBlock` - The form DSL document
//! - `FieldValue`, `PageAnswers` and `FormAnswers` - Collected answers
//! - `RunSummary`, `AnswerSummary` and friends - Run records as the backend reports them
//! - Coaching session payloads

mod field_value;
pub use field_value::{FieldValue, OptionValue};

mod block;
pub use block::{
    CheckboxBlock, FormBlock, MarkdownBlock, RadioBlock, SelectBlock, TextBlock, TextareaBlock,
};

mod form_definition;
pub use form_definition::{FormDefinition, FormMeta, FormNavigation, FormPage};

mod answers;
pub use answers::{FormAnswers, PageAnswers, PageErrors, answers_to_form_answers};

mod run;
pub use run::{
    AnswerSummary, CompleteRunResponse, CreateRunResponse, RunId, RunStatus, RunSummary,
    SaveAnswersResponse,
};

mod coaching;
pub use coaching::{
    CoachTurn, CoachingSession, ConversationHistoryResponse, EndCoachingResponse,
    SendMessageResponse, SessionStatus, StartCoachingResponse, TurnRole,
};

mod error;
pub use error::FormError;
