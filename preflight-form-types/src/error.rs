/// Error type for form definitions and form sessions.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The definition has no pages to show.
    #[error("Form '{0}' has no pages")]
    NoPages(String),

    /// Two pages share an id.
    #[error("Duplicate page id: {0}")]
    DuplicatePage(String),

    /// Two blocks on one page share an answer name.
    #[error("Duplicate field name '{name}' on page '{page}'")]
    DuplicateField { page: String, name: String },

    /// A completed run was offered for resumption.
    #[error("Run {0} is already completed")]
    RunCompleted(String),
}
