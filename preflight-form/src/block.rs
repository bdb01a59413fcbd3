use crate::markdown;
use crate::{
    CheckboxBlock, Choice, Control, FieldMeta, FieldValue, FormBlock, MarkdownBlock, OptionValue,
    RadioBlock, SelectBlock, TextBlock, TextareaBlock,
};

const DEFAULT_TEXTAREA_ROWS: u32 = 4;

/// A user edit, as reported by a frontend.
///
/// Option-based inputs carry the option as it was displayed (`Choice::label`);
/// the renderer maps it back to the schema's original option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// New content of a text or textarea field.
    Text(String),

    /// An option picked in a select or radio group.
    Choose(String),

    /// One option of a checkbox group was checked or unchecked.
    Toggle { option: String, checked: bool },

    /// A boolean checkbox was checked or unchecked.
    Check(bool),
}

/// Rendering strategy for one kind of block.
pub trait BlockRenderer {
    /// The value shown when the answer map has no entry for this block.
    fn default_value(&self) -> FieldValue {
        FieldValue::Null
    }

    /// Build the control for the current value. Never produces a change.
    fn render(&self, value: &FieldValue, error: Option<&str>) -> Control;

    /// Compute the new value for a user edit.
    ///
    /// Returns `None` when the input does not apply to this block (wrong input kind
    /// or a display-only block); the answer stays unchanged.
    fn apply(&self, current: &FieldValue, input: Input) -> Option<FieldValue>;
}

impl BlockRenderer for MarkdownBlock {
    fn render(&self, _value: &FieldValue, _error: Option<&str>) -> Control {
        Control::Markdown(markdown::format(&self.content))
    }

    fn apply(&self, _current: &FieldValue, _input: Input) -> Option<FieldValue> {
        None
    }
}

impl BlockRenderer for TextBlock {
    fn default_value(&self) -> FieldValue {
        FieldValue::Text(String::new())
    }

    fn render(&self, value: &FieldValue, error: Option<&str>) -> Control {
        Control::TextInput {
            field: FieldMeta::new(&self.name, self.label.as_deref(), self.required, error),
            value: value.display_string(),
            placeholder: self.placeholder.clone(),
            min_length: self.min_length,
            max_length: self.max_length,
        }
    }

    fn apply(&self, _current: &FieldValue, input: Input) -> Option<FieldValue> {
        match input {
            Input::Text(text) => Some(FieldValue::Text(truncate(text, self.max_length))),
            _ => None,
        }
    }
}

impl BlockRenderer for TextareaBlock {
    fn default_value(&self) -> FieldValue {
        FieldValue::Text(String::new())
    }

    fn render(&self, value: &FieldValue, error: Option<&str>) -> Control {
        Control::TextArea {
            field: FieldMeta::new(&self.name, self.label.as_deref(), self.required, error),
            value: value.display_string(),
            placeholder: self.placeholder.clone(),
            min_length: self.min_length,
            max_length: self.max_length,
            rows: self.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS),
        }
    }

    fn apply(&self, _current: &FieldValue, input: Input) -> Option<FieldValue> {
        match input {
            Input::Text(text) => Some(FieldValue::Text(truncate(text, self.max_length))),
            _ => None,
        }
    }
}

impl BlockRenderer for SelectBlock {
    fn default_value(&self) -> FieldValue {
        FieldValue::Text(String::new())
    }

    fn render(&self, value: &FieldValue, error: Option<&str>) -> Control {
        Control::Select {
            field: FieldMeta::new(&self.name, self.label.as_deref(), self.required, error),
            placeholder: self.placeholder.clone(),
            choices: single_choices(&self.options, value),
        }
    }

    fn apply(&self, _current: &FieldValue, input: Input) -> Option<FieldValue> {
        match input {
            Input::Choose(shown) => Some(OptionValue::resolve(&self.options, &shown).into()),
            _ => None,
        }
    }
}

impl BlockRenderer for RadioBlock {
    fn default_value(&self) -> FieldValue {
        FieldValue::Text(String::new())
    }

    fn render(&self, value: &FieldValue, error: Option<&str>) -> Control {
        Control::Radio {
            field: FieldMeta::new(&self.name, self.label.as_deref(), self.required, error),
            choices: single_choices(&self.options, value),
        }
    }

    fn apply(&self, _current: &FieldValue, input: Input) -> Option<FieldValue> {
        match input {
            Input::Choose(shown) => Some(OptionValue::resolve(&self.options, &shown).into()),
            _ => None,
        }
    }
}

impl BlockRenderer for CheckboxBlock {
    fn default_value(&self) -> FieldValue {
        if self.is_multi() {
            FieldValue::List(Vec::new())
        } else {
            FieldValue::Bool(false)
        }
    }

    fn render(&self, value: &FieldValue, error: Option<&str>) -> Control {
        let field = FieldMeta::new(&self.name, self.label.as_deref(), self.required, error);

        let Some(options) = &self.options else {
            return Control::Toggle {
                field,
                checked: value.is_truthy(),
            };
        };

        let selected: Vec<String> = value
            .as_list()
            .unwrap_or_default()
            .iter()
            .map(OptionValue::display_string)
            .collect();

        let choices = options
            .iter()
            .map(|option| {
                let label = option.display_string();
                Choice {
                    selected: selected.contains(&label),
                    label,
                }
            })
            .collect();

        Control::CheckboxGroup { field, choices }
    }

    fn apply(&self, current: &FieldValue, input: Input) -> Option<FieldValue> {
        match (&self.options, input) {
            (None, Input::Check(checked)) => Some(FieldValue::Bool(checked)),
            (Some(options), Input::Toggle { option, checked }) => {
                let current = current.as_list().unwrap_or_default();
                Some(FieldValue::List(toggle(options, current, &option, checked)))
            }
            _ => None,
        }
    }
}

impl BlockRenderer for FormBlock {
    fn default_value(&self) -> FieldValue {
        match self {
            Self::Markdown(b) => b.default_value(),
            Self::Text(b) => b.default_value(),
            Self::Textarea(b) => b.default_value(),
            Self::Select(b) => b.default_value(),
            Self::Radio(b) => b.default_value(),
            Self::Checkbox(b) => b.default_value(),
            Self::Unknown { .. } => FieldValue::Null,
        }
    }

    fn render(&self, value: &FieldValue, error: Option<&str>) -> Control {
        match self {
            Self::Markdown(b) => b.render(value, error),
            Self::Text(b) => b.render(value, error),
            Self::Textarea(b) => b.render(value, error),
            Self::Select(b) => b.render(value, error),
            Self::Radio(b) => b.render(value, error),
            Self::Checkbox(b) => b.render(value, error),
            Self::Unknown { kind, .. } => Control::Unsupported { kind: kind.clone() },
        }
    }

    fn apply(&self, current: &FieldValue, input: Input) -> Option<FieldValue> {
        match self {
            Self::Markdown(b) => b.apply(current, input),
            Self::Text(b) => b.apply(current, input),
            Self::Textarea(b) => b.apply(current, input),
            Self::Select(b) => b.apply(current, input),
            Self::Radio(b) => b.apply(current, input),
            Self::Checkbox(b) => b.apply(current, input),
            Self::Unknown { .. } => None,
        }
    }
}

/// Mirror the native `maxlength` attribute: input beyond the limit is dropped.
fn truncate(text: String, max_length: Option<usize>) -> String {
    match max_length {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text,
    }
}

fn single_choices(options: &[OptionValue], value: &FieldValue) -> Vec<Choice> {
    let current = (!value.is_blank()).then(|| value.display_string());
    options
        .iter()
        .map(|option| {
            let label = option.display_string();
            Choice {
                selected: current.as_deref() == Some(label.as_str()),
                label,
            }
        })
        .collect()
}

fn toggle(
    options: &[OptionValue],
    current: &[OptionValue],
    option: &str,
    checked: bool,
) -> Vec<OptionValue> {
    if checked {
        let mut next = current.to_vec();
        if !next.iter().any(|item| item.display_string() == option) {
            next.push(OptionValue::resolve(options, option));
        }
        return next;
    }

    current
        .iter()
        .filter(|item| item.display_string() != option)
        .map(|item| {
            let shown = item.display_string();
            options
                .iter()
                .find(|candidate| candidate.display_string() == shown)
                .cloned()
                .unwrap_or_else(|| item.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<OptionValue> {
        vec![OptionValue::from(1), OptionValue::from("two"), OptionValue::from(3)]
    }

    #[test]
    fn text_truncates_at_max_length() {
        let block = TextBlock {
            name: "code".into(),
            max_length: Some(3),
            ..Default::default()
        };

        assert_eq!(
            block.apply(&FieldValue::Null, Input::Text("abcdef".into())),
            Some(FieldValue::from("abc"))
        );
        assert_eq!(block.apply(&FieldValue::Null, Input::Check(true)), None);
    }

    #[test]
    fn text_shows_missing_value_as_empty() {
        let block = TextBlock {
            name: "role".into(),
            ..Default::default()
        };

        let Control::TextInput { value, field, .. } =
            block.render(&block.default_value(), Some("This field is required"))
        else {
            panic!("expected a text input");
        };
        assert_eq!(value, "");
        assert_eq!(field.label, "role");
        assert_eq!(field.error.as_deref(), Some("This field is required"));
    }

    #[test]
    fn select_emits_original_option() {
        let block = SelectBlock {
            name: "size".into(),
            options: options(),
            ..Default::default()
        };

        assert_eq!(
            block.apply(&FieldValue::Null, Input::Choose("1".into())),
            Some(FieldValue::from(1))
        );
        assert_eq!(
            block.apply(&FieldValue::Null, Input::Choose("two".into())),
            Some(FieldValue::from("two"))
        );
    }

    #[test]
    fn radio_marks_the_current_option() {
        let block = RadioBlock {
            name: "score".into(),
            options: options(),
            ..Default::default()
        };

        let control = block.render(&FieldValue::from(3), None);
        let selected: Vec<_> = control
            .choices()
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(selected, ["3"]);
    }

    #[test]
    fn checkbox_group_keeps_numbers_numeric() {
        let block = CheckboxBlock {
            name: "picks".into(),
            options: Some(options()),
            ..Default::default()
        };

        let value = block
            .apply(
                &FieldValue::List(Vec::new()),
                Input::Toggle {
                    option: "1".into(),
                    checked: true,
                },
            )
            .unwrap();
        let value = block
            .apply(
                &value,
                Input::Toggle {
                    option: "two".into(),
                    checked: true,
                },
            )
            .unwrap();
        assert_eq!(
            value,
            FieldValue::List(vec![OptionValue::from(1), OptionValue::from("two")])
        );

        let value = block
            .apply(
                &value,
                Input::Toggle {
                    option: "two".into(),
                    checked: false,
                },
            )
            .unwrap();
        assert_eq!(value, FieldValue::List(vec![OptionValue::from(1)]));
    }

    #[test]
    fn uncheck_reresolves_stringified_leftovers() {
        let block = CheckboxBlock {
            name: "picks".into(),
            options: Some(options()),
            ..Default::default()
        };
        let stored = FieldValue::List(vec![OptionValue::from("1"), OptionValue::from("3")]);

        let value = block
            .apply(
                &stored,
                Input::Toggle {
                    option: "3".into(),
                    checked: false,
                },
            )
            .unwrap();
        assert_eq!(value, FieldValue::List(vec![OptionValue::from(1)]));
    }

    #[test]
    fn boolean_checkbox() {
        let block = CheckboxBlock {
            name: "agree".into(),
            ..Default::default()
        };

        assert_eq!(block.default_value(), FieldValue::Bool(false));
        assert!(matches!(
            block.render(&FieldValue::from("yes"), None),
            Control::Toggle { checked: true, .. }
        ));
        assert_eq!(
            block.apply(&FieldValue::Null, Input::Check(true)),
            Some(FieldValue::Bool(true))
        );
    }

    #[test]
    fn unknown_block_renders_marker() {
        let block = FormBlock::Unknown {
            kind: "slider".into(),
            raw: serde_json::json!({"type": "slider"}),
        };

        assert_eq!(
            block.render(&FieldValue::Null, None),
            Control::Unsupported {
                kind: "slider".into()
            }
        );
        assert_eq!(block.apply(&FieldValue::Null, Input::Text("x".into())), None);
    }
}
