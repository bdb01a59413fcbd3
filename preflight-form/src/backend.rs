use crate::{FormError, PageState, PendingSave, Step, SurveySession};

/// Where the page being collected sits in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    /// Zero-based page index.
    pub index: usize,
    pub count: usize,
}

impl PagePosition {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }
}

/// What the user asked for after filling in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Next,
    Back,
}

/// Trait for frontends that collect a form one page at a time.
///
/// A backend receives the page's `PageState`, applies the user's edits to it
/// (`PageState::edit`) and reports how the user wants to leave the page. Errors
/// from a previous submit are in `state.errors()` and should be shown.
pub trait PageBackend {
    /// The error type for this backend.
    type Error: Into<anyhow::Error>;

    fn collect_page(
        &self,
        state: &mut PageState<'_>,
        position: PagePosition,
    ) -> Result<PageAction, Self::Error>;
}

/// Error type for driving a session to completion.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error(transparent)]
    Form(#[from] FormError),

    /// Backend-specific failure (I/O, cancelled prompt, missing scripted input)
    #[error("Backend error: {0}")]
    Backend(anyhow::Error),

    /// Persisting a page failed. The session is still on that page.
    #[error("Failed to save page '{page_id}': {source}")]
    Save {
        page_id: String,
        source: anyhow::Error,
    },
}

impl SurveyError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}

/// Collect every page through `backend` until the last page is submitted.
///
/// `save` is called for each pending save, in order, before the session moves on.
/// This is the synchronous loop; callers that save over the network run the same
/// steps with their own async client.
pub fn drive<B, S>(session: &mut SurveySession, backend: &B, mut save: S) -> Result<(), SurveyError>
where
    B: PageBackend,
    S: FnMut(&PendingSave) -> anyhow::Result<()>,
{
    while !session.is_complete() {
        let position = session.position();
        let mut state = session.page_state();
        let action = backend
            .collect_page(&mut state, position)
            .map_err(SurveyError::backend)?;
        let (answers, errors) = state.into_parts();
        session.commit(answers, errors);

        match action {
            PageAction::Back => {
                session.back();
            }
            PageAction::Next => match session.advance() {
                Step::Invalid(errors) => {
                    tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "page rejected");
                }
                Step::Proceed(transition) => {
                    for pending in &transition.saves {
                        save(pending).map_err(|source| SurveyError::Save {
                            page_id: pending.page_id.clone(),
                            source,
                        })?;
                    }
                    session.enter(transition.destination);
                }
            },
        }
    }

    Ok(())
}
