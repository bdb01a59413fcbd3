use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A single option offered by a `select`, `radio` or multi-select `checkbox` block.
///
/// Options keep their JSON type: a numeric option is emitted back as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(Number),
    Text(String),
}

impl OptionValue {
    /// The string shown to the user for this option: the text itself, or the number as written.
    pub fn display_string(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Resolve a displayed string back to the first option that renders as it.
    ///
    /// Falls back to the string itself when no option matches.
    pub fn resolve(options: &[OptionValue], shown: &str) -> OptionValue {
        options
            .iter()
            .find(|option| option.display_string() == shown)
            .cloned()
            .unwrap_or_else(|| Self::Text(shown.to_string()))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        Self::Number(Number::from(i))
    }
}

/// A single answer value stored in a `PageAnswers` map.
///
/// No other shapes are valid; anything else in a payload is a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value.
    #[default]
    Null,

    /// A boolean toggle (checkbox without options).
    Bool(bool),

    /// A number (numeric select/radio options).
    Number(Number),

    /// A string (text, textarea, select, radio).
    Text(String),

    /// The selected options of a multi-select checkbox.
    List(Vec<OptionValue>),
}

impl FieldValue {
    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a list of options.
    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render this value the way `String(value)` would for scalar values.
    ///
    /// `null` and lists render as the empty string; text controls never show them.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null | Self::List(_) => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Loose truthiness: null, `false`, `0` and `""` are falsy; every list is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Self::Text(s) => !s.is_empty(),
            Self::List(_) => true,
        }
    }

    /// Check if the value counts as "not answered" for a required field.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Number(_) => false,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::List(_) => "array",
        }
    }
}

impl From<OptionValue> for FieldValue {
    fn from(option: OptionValue) -> Self {
        match option {
            OptionValue::Number(n) => Self::Number(n),
            OptionValue::Text(s) => Self::Text(s),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Number(Number::from(i))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<OptionValue>> for FieldValue {
    fn from(items: Vec<OptionValue>) -> Self {
        Self::List(items)
    }
}
