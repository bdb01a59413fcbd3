use crate::{
    FormAnswers, FormDefinition, FormError, FormPage, PageAnswers, PageErrors, PagePosition,
    PageState, RunId, RunSummary, answers_to_form_answers, validate_page,
};

/// One page's answers waiting to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub page_id: String,
    pub answers: PageAnswers,
}

/// Where a session goes once its pending saves went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Show the page at this index.
    Page(usize),

    /// The last page was submitted; the run can be completed.
    Complete,
}

/// A validated move away from the current page.
///
/// Nothing changes in the session until the caller hands the transition back to
/// `SurveySession::enter`, so a failed save leaves the user where they were.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub saves: Vec<PendingSave>,
    pub destination: Destination,
}

/// Outcome of `SurveySession::advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The current page failed validation; the errors are also kept on the session.
    Invalid(PageErrors),

    Proceed(Transition),
}

/// The answer-state machine for one run of a form.
///
/// Owns the definition, the server-assigned run id, the index of the page being
/// shown, the answers collected so far and the current page's errors.
#[derive(Debug, Clone)]
pub struct SurveySession {
    definition: FormDefinition,
    run_id: RunId,
    current: usize,
    answers: FormAnswers,
    errors: PageErrors,
    complete: bool,
}

impl SurveySession {
    /// Start a fresh session on the first page.
    pub fn new(definition: FormDefinition, run_id: RunId) -> Result<Self, FormError> {
        definition.check()?;

        Ok(Self {
            definition,
            run_id,
            current: 0,
            answers: FormAnswers::new(),
            errors: PageErrors::new(),
            complete: false,
        })
    }

    /// Continue a run that was started earlier.
    ///
    /// Saved answers are regrouped per page and the run's `last_page` is opened; an
    /// unknown or missing `last_page` opens the first page.
    pub fn resume(definition: FormDefinition, run: &RunSummary) -> Result<Self, FormError> {
        if run.status.is_completed() {
            return Err(FormError::RunCompleted(run.run_id.to_string()));
        }

        let mut session = Self::new(definition, run.run_id)?;
        session.answers = answers_to_form_answers(&run.answers);
        session.current = run
            .last_page
            .as_deref()
            .and_then(|id| session.definition.page_index(id))
            .unwrap_or(0);

        tracing::info!(
            run_id = %session.run_id,
            page = %session.current_page().id,
            answered_pages = session.answers.len(),
            "resumed run"
        );

        Ok(session)
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn answers(&self) -> &FormAnswers {
        &self.answers
    }

    pub fn errors(&self) -> &PageErrors {
        &self.errors
    }

    /// Check if the last page was submitted.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current_page(&self) -> &FormPage {
        &self.definition.pages[self.current]
    }

    pub fn position(&self) -> PagePosition {
        PagePosition {
            index: self.current,
            count: self.definition.len(),
        }
    }

    /// Hand the current page's answers and errors to a `PageState`.
    pub fn page_state(&self) -> PageState<'_> {
        let page = self.current_page();
        PageState::new(
            page,
            self.answers.page(&page.id).cloned().unwrap_or_default(),
            self.errors.clone(),
        )
    }

    /// Take back what a `PageState` collected for the current page.
    pub fn commit(&mut self, answers: PageAnswers, errors: PageErrors) {
        let page_id = self.current_page().id.clone();
        self.answers.set_page(page_id, answers);
        self.errors = errors;
    }

    /// Validate the current page and work out the move to the next one.
    ///
    /// With autosave on, the current page is saved on every move. With autosave off,
    /// nothing is saved until the last page, where every answered page is flushed in
    /// page order.
    pub fn advance(&mut self) -> Step {
        let page = self.current_page();
        let page_id = page.id.clone();
        let answers = self.answers.page(&page_id).cloned().unwrap_or_default();

        let errors = validate_page(page, &answers);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Step::Invalid(errors);
        }
        self.errors.clear();

        let is_last = self.current + 1 == self.definition.len();
        let autosave = self.definition.navigation.autosave;

        let saves = match (autosave, is_last) {
            (true, _) => vec![PendingSave { page_id, answers }],
            (false, false) => Vec::new(),
            (false, true) => self.all_pages(),
        };
        let destination = if is_last {
            Destination::Complete
        } else {
            Destination::Page(self.current + 1)
        };

        tracing::debug!(
            run_id = %self.run_id,
            page = %self.current_page().id,
            saves = saves.len(),
            ?destination,
            "page submitted"
        );

        Step::Proceed(Transition { saves, destination })
    }

    /// Apply a transition once its saves are done.
    pub fn enter(&mut self, destination: Destination) {
        self.errors.clear();
        match destination {
            Destination::Page(index) if index < self.definition.len() => self.current = index,
            Destination::Page(index) => {
                tracing::warn!(index, "ignoring move past the last page");
            }
            Destination::Complete => self.complete = true,
        }
    }

    /// Go back one page without saving. Returns `false` on the first page.
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.errors.clear();
        true
    }

    fn all_pages(&self) -> Vec<PendingSave> {
        self.definition
            .pages
            .iter()
            .filter_map(|page| {
                self.answers.page(&page.id).map(|answers| PendingSave {
                    page_id: page.id.clone(),
                    answers: answers.clone(),
                })
            })
            .collect()
    }
}
