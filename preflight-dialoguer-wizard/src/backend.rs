//! Dialoguer backend implementation for the PageBackend trait.

use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Editor, FuzzySelect, Input, MultiSelect, Select};
use preflight_form::{
    Choice, Control, FieldMeta, Input as Edit, PageAction, PageBackend, PagePosition, PageState,
};
use thiserror::Error;

use crate::markdown_to_text;

/// Option lists longer than this get a fuzzy finder instead of a plain list.
const FUZZY_THRESHOLD: usize = 10;

/// Error type for the Dialoguer backend.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the form (e.g., pressed Ctrl+C or Escape).
    #[error("Form cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_error(err: dialoguer::Error) -> DialoguerError {
    if is_cancelled(&err) {
        DialoguerError::Cancelled
    } else {
        DialoguerError::Dialoguer(err)
    }
}

/// Dialoguer backend for interactive CLI prompts.
///
/// Every field on the page is asked for once per visit, pre-filled with its
/// current answer.
#[derive(Debug, Default, Clone)]
pub struct DialoguerBackend {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerBackend {
    /// Create a new Dialoguer backend with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a backend with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    fn ask(&self, control: &Control, state: &mut PageState<'_>) -> Result<(), DialoguerError> {
        let Some(field) = control.field() else {
            match control {
                Control::Markdown(nodes) => print!("{}", markdown_to_text(nodes)),
                Control::Unsupported { kind } => println!("[Unsupported block type: {kind}]"),
                _ => {}
            }
            return Ok(());
        };

        if let Some(error) = &field.error {
            println!("  ! {error}");
        }
        let prompt = prompt_for(field);

        match control {
            Control::TextInput {
                value, placeholder, ..
            } => {
                let theme = self.theme();
                let mut builder = Input::<String>::with_theme(theme.as_ref())
                    .with_prompt(&prompt)
                    .allow_empty(true);
                if !value.is_empty() {
                    builder = builder.with_initial_text(value.clone());
                } else if let Some(placeholder) = placeholder {
                    println!("  ({placeholder})");
                }
                let text = builder.interact_text().map_err(prompt_error)?;
                state.edit(&field.name, Edit::Text(text));
            }

            Control::TextArea { value, .. } => {
                println!("{prompt} (opens your editor)");
                if let Some(text) = Editor::new().edit(value).map_err(prompt_error)? {
                    state.edit(&field.name, Edit::Text(text.trim_end_matches('\n').to_string()));
                }
            }

            Control::Select { choices, .. } | Control::Radio { choices, .. } => {
                if let Some(label) = self.pick_one(&prompt, choices)? {
                    state.edit(&field.name, Edit::Choose(label));
                }
            }

            Control::CheckboxGroup { choices, .. } => {
                let theme = self.theme();
                let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
                let defaults: Vec<bool> = choices.iter().map(|c| c.selected).collect();
                let picked = MultiSelect::with_theme(theme.as_ref())
                    .with_prompt(&prompt)
                    .items(&labels)
                    .defaults(&defaults)
                    .interact()
                    .map_err(prompt_error)?;

                for (index, choice) in choices.iter().enumerate() {
                    let checked = picked.contains(&index);
                    if checked != choice.selected {
                        state.edit(
                            &field.name,
                            Edit::Toggle {
                                option: choice.label.clone(),
                                checked,
                            },
                        );
                    }
                }
            }

            Control::Toggle { checked, .. } => {
                let theme = self.theme();
                let value = Confirm::with_theme(theme.as_ref())
                    .with_prompt(&prompt)
                    .default(*checked)
                    .interact()
                    .map_err(prompt_error)?;
                state.edit(&field.name, Edit::Check(value));
            }

            Control::Markdown(_) | Control::Unsupported { .. } => {}
        }

        Ok(())
    }

    /// Returns the chosen label, or `None` if there is nothing to choose from.
    fn pick_one(&self, prompt: &str, choices: &[Choice]) -> Result<Option<String>, DialoguerError> {
        if choices.is_empty() {
            println!("{prompt}: no options available");
            return Ok(None);
        }

        let theme = self.theme();
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        let current = choices.iter().position(|c| c.selected).unwrap_or(0);

        let index = if choices.len() > FUZZY_THRESHOLD {
            FuzzySelect::with_theme(theme.as_ref())
                .with_prompt(prompt)
                .items(&labels)
                .default(current)
                .interact()
        } else {
            Select::with_theme(theme.as_ref())
                .with_prompt(prompt)
                .items(&labels)
                .default(current)
                .interact()
        }
        .map_err(prompt_error)?;

        Ok(Some(choices[index].label.clone()))
    }

    fn ask_action(&self, position: PagePosition) -> Result<PageAction, DialoguerError> {
        if position.is_first() {
            return Ok(PageAction::Next);
        }

        let theme = self.theme();
        let next = if position.is_last() { "Submit" } else { "Next" };
        let index = Select::with_theme(theme.as_ref())
            .items(&[next, "Back"])
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        Ok(if index == 0 {
            PageAction::Next
        } else {
            PageAction::Back
        })
    }
}

fn prompt_for(field: &FieldMeta) -> String {
    if field.required {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    }
}

impl PageBackend for DialoguerBackend {
    type Error = DialoguerError;

    fn collect_page(
        &self,
        state: &mut PageState<'_>,
        position: PagePosition,
    ) -> Result<PageAction, Self::Error> {
        let view = state.view();

        println!();
        println!("[{}/{}] {}", position.index + 1, position.count, view.title);
        println!();

        for control in &view.controls {
            self.ask(control, state)?;
        }

        self.ask_action(position)
    }
}
