//! Test backend for running forms without user interaction.
//!
//! `TestBackend` fills each page from pre-defined inputs, keyed by
//! `"{page_id}.{field_name}"`, and then asks for the next page.
//!
//! # Example
//!
//! ```rust,ignore
//! use preflight_form::{SurveySession, TestBackend, drive};
//!
//! let backend = TestBackend::new()
//!     .with_text("intro.role", "CTO")
//!     .with_choice("intro.size", "50-200")
//!     .with_toggle("tools.used", "git");
//!
//! let mut session = SurveySession::new(definition, run_id)?;
//! drive(&mut session, &backend, |_| Ok(()))?;
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::{Input, PageAction, PageBackend, PagePosition, PageState};

/// A backend that replays scripted inputs.
///
/// Inputs for a page are applied on its first visit only, so going back to a page
/// does not toggle checkboxes twice. A page that comes back with validation errors
/// fails the run instead of looping. An input whose path lacks a page or field
/// part fails the first page visited.
#[derive(Debug, Default)]
pub struct TestBackend {
    inputs: Vec<(String, String, Input)>,
    unaddressed: Vec<String>,
    actions: RefCell<HashMap<String, VecDeque<PageAction>>>,
    visited: RefCell<HashSet<String>>,
}

/// Error type for TestBackend.
#[derive(Debug, thiserror::Error)]
pub enum TestBackendError {
    #[error("Scripted input for unknown field: {0}")]
    UnknownField(String),

    #[error("Validation failed on page '{page}': {messages}")]
    ValidationFailed { page: String, messages: String },
}

impl TestBackend {
    /// Create a new empty test backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input for a field, addressed as `page_id.field_name`.
    ///
    /// Several inputs for the same field are applied in the order they were added.
    pub fn with_input(mut self, path: impl AsRef<str>, input: Input) -> Self {
        let path = path.as_ref();
        match path.split_once('.') {
            Some((page, field)) if !page.is_empty() && !field.is_empty() => {
                self.inputs.push((page.to_string(), field.to_string(), input));
            }
            _ => self.unaddressed.push(path.to_string()),
        }
        self
    }

    /// Type text into a text or textarea field.
    pub fn with_text(self, path: impl AsRef<str>, text: impl Into<String>) -> Self {
        self.with_input(path, Input::Text(text.into()))
    }

    /// Pick an option of a select or radio group by its displayed text.
    pub fn with_choice(self, path: impl AsRef<str>, option: impl ToString) -> Self {
        self.with_input(path, Input::Choose(option.to_string()))
    }

    /// Check one option of a checkbox group.
    pub fn with_toggle(self, path: impl AsRef<str>, option: impl ToString) -> Self {
        self.with_input(
            path,
            Input::Toggle {
                option: option.to_string(),
                checked: true,
            },
        )
    }

    /// Check or uncheck a boolean checkbox.
    pub fn with_check(self, path: impl AsRef<str>, checked: bool) -> Self {
        self.with_input(path, Input::Check(checked))
    }

    /// Leave `page_id` with the given actions on successive visits, then `Next`.
    pub fn with_actions(self, page_id: impl Into<String>, actions: Vec<PageAction>) -> Self {
        self.actions
            .borrow_mut()
            .insert(page_id.into(), actions.into());
        self
    }
}

impl PageBackend for TestBackend {
    type Error = TestBackendError;

    fn collect_page(
        &self,
        state: &mut PageState<'_>,
        _position: PagePosition,
    ) -> Result<PageAction, Self::Error> {
        if let Some(path) = self.unaddressed.first() {
            return Err(TestBackendError::UnknownField(path.clone()));
        }

        let page_id = state.page().id.clone();

        if !state.errors().is_empty() {
            let messages = state
                .errors()
                .iter()
                .map(|(field, message)| format!("{field}: {message}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(TestBackendError::ValidationFailed {
                page: page_id,
                messages,
            });
        }

        if self.visited.borrow_mut().insert(page_id.clone()) {
            for (_, field, input) in self.inputs.iter().filter(|(page, ..)| *page == page_id) {
                if state.page().block(field).is_none() {
                    return Err(TestBackendError::UnknownField(format!("{page_id}.{field}")));
                }
                state.edit(field, input.clone());
            }
        }

        let action = self
            .actions
            .borrow_mut()
            .get_mut(&page_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(PageAction::Next);

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_need_a_page_and_a_field() {
        let backend = TestBackend::new()
            .with_text("intro.role", "CTO")
            .with_text("role", "CTO")
            .with_check("intro.", true)
            .with_check(".agree", true);

        assert_eq!(backend.inputs.len(), 1);
        assert_eq!(backend.unaddressed, ["role", "intro.", ".agree"]);
    }
}
