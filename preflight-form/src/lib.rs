//! # preflight-form
//!
//! Render declarative multi-page forms and track their answers. Presentation-agnostic.
//!
//! A `FormDefinition` is a JSON document of pages, each an ordered list of typed
//! blocks. This crate turns a page plus its current answers into a list of
//! `Control`s that any frontend can draw, applies user edits back onto the
//! answer map, and drives page navigation with autosave.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use preflight_form::{SurveySession, TestBackend, drive};
//!
//! let mut session = SurveySession::new(definition, run_id)?;
//! drive(
//!     &mut session,
//!     &TestBackend::new().with_text("intro.role", "CTO"),
//!     |save| client_save(save),
//! )?;
//! ```
//!
//! ## Building blocks
//!
//! - `markdown` - The line-oriented formatter used by `markdown` blocks
//! - `BlockRenderer` - One renderer per block kind: `render` to a `Control`, `apply` an `Input`
//! - `PageRenderer` / `PageState` - A whole page and its local answer/error maps
//! - `validate_page` - Required and length checks, run by the caller before leaving a page
//! - `SurveySession` - Current page, collected answers and the autosave transitions
//! - `PageBackend` - Frontends implement this to collect one page at a time

// Re-export all types from preflight-form-types
pub use preflight_form_types::*;

pub mod markdown;

mod control;
pub use control::{Choice, Control, FieldMeta};

mod block;
pub use block::{BlockRenderer, Input};

mod page;
pub use page::{PageRenderer, PageState, PageView};

mod validation;
pub use validation::validate_page;

mod session;
pub use session::{Destination, PendingSave, Step, SurveySession, Transition};

mod backend;
pub use backend::{PageAction, PageBackend, PagePosition, SurveyError, drive};

// Test backend for running forms without user interaction
mod test_backend;
pub use test_backend::{TestBackend, TestBackendError};
