//! # preflight-dialoguer-wizard
//!
//! Dialoguer page backend for preflight forms.
//!
//! Each page is shown as a run of prompts in a classic CLI wizard style: markdown
//! blocks are printed, every field is asked for in order, and the user then picks
//! whether to go on or back. Validation messages from a rejected submit are shown
//! next to the field they belong to.
//!
//! ## Example
//!
//! ```rust,ignore
//! use preflight_dialoguer_wizard::DialoguerBackend;
//! use preflight_form::{SurveySession, drive};
//!
//! let mut session = SurveySession::new(definition, run_id)?;
//! drive(&mut session, &DialoguerBackend::new(), |pending| {
//!     println!("saving {}", pending.page_id);
//!     Ok(())
//! })?;
//! ```

mod backend;
mod text;

pub use backend::{DialoguerBackend, DialoguerError};
pub use text::markdown_to_text;
