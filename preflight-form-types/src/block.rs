use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::OptionValue;

/// A single block on a form page.
///
/// Blocks are tagged by their `type` field. Every block except `markdown` carries a
/// `name` that is unique within its page and keys the answer map.
#[derive(Debug, Clone, PartialEq)]
pub enum FormBlock {
    /// Display-only text. Contributes no answer.
    Markdown(MarkdownBlock),

    /// Single-line text input.
    Text(TextBlock),

    /// Multi-line text input.
    Textarea(TextareaBlock),

    /// Drop-down selection of one option.
    Select(SelectBlock),

    /// Radio group selection of one option.
    Radio(RadioBlock),

    /// Multi-select checkbox group (with options) or a single boolean toggle (without).
    Checkbox(CheckboxBlock),

    /// A block type this crate does not know about.
    ///
    /// Kept verbatim so a newer schema still loads; renderers show an inline marker.
    Unknown { kind: String, raw: Value },
}

impl FormBlock {
    /// The `type` discriminant as it appears in the document.
    pub fn kind(&self) -> &str {
        match self {
            Self::Markdown(_) => "markdown",
            Self::Text(_) => "text",
            Self::Textarea(_) => "textarea",
            Self::Select(_) => "select",
            Self::Radio(_) => "radio",
            Self::Checkbox(_) => "checkbox",
            Self::Unknown { kind, .. } => kind,
        }
    }

    /// The answer key of this block, if it collects an answer.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Markdown(_) | Self::Unknown { .. } => None,
            Self::Text(b) => Some(&b.name),
            Self::Textarea(b) => Some(&b.name),
            Self::Select(b) => Some(&b.name),
            Self::Radio(b) => Some(&b.name),
            Self::Checkbox(b) => Some(&b.name),
        }
    }

    /// The label text, if the schema provides one.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Markdown(_) | Self::Unknown { .. } => None,
            Self::Text(b) => b.label.as_deref(),
            Self::Textarea(b) => b.label.as_deref(),
            Self::Select(b) => b.label.as_deref(),
            Self::Radio(b) => b.label.as_deref(),
            Self::Checkbox(b) => b.label.as_deref(),
        }
    }

    /// Check if the block is marked `required`.
    pub fn is_required(&self) -> bool {
        match self {
            Self::Markdown(_) | Self::Unknown { .. } => false,
            Self::Text(b) => b.required,
            Self::Textarea(b) => b.required,
            Self::Select(b) => b.required,
            Self::Radio(b) => b.required,
            Self::Checkbox(b) => b.required,
        }
    }
}

/// Display-only markdown content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownBlock {
    #[serde(default)]
    pub content: String,
}

/// Configuration for a single-line text block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(
        default,
        rename = "minLength",
        alias = "min_length",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_length: Option<usize>,

    #[serde(
        default,
        rename = "maxLength",
        alias = "max_length",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_length: Option<usize>,
}

/// Configuration for a multi-line text block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextareaBlock {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(
        default,
        rename = "minLength",
        alias = "min_length",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_length: Option<usize>,

    #[serde(
        default,
        rename = "maxLength",
        alias = "max_length",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_length: Option<usize>,

    /// Visible row count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

/// Configuration for a drop-down select block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectBlock {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default)]
    pub options: Vec<OptionValue>,
}

/// Configuration for a radio group block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadioBlock {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub options: Vec<OptionValue>,
}

/// Configuration for a checkbox block.
///
/// With `options` this is a multi-select whose value is a list; without it is a
/// single boolean toggle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckboxBlock {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionValue>>,
}

impl CheckboxBlock {
    /// Check if this checkbox is a multi-select.
    pub fn is_multi(&self) -> bool {
        self.options.is_some()
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum KnownBlock {
    Markdown(MarkdownBlock),
    Text(TextBlock),
    Textarea(TextareaBlock),
    Select(SelectBlock),
    Radio(RadioBlock),
    Checkbox(CheckboxBlock),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum KnownBlockRef<'a> {
    Markdown(&'a MarkdownBlock),
    Text(&'a TextBlock),
    Textarea(&'a TextareaBlock),
    Select(&'a SelectBlock),
    Radio(&'a RadioBlock),
    Checkbox(&'a CheckboxBlock),
}

const KNOWN_KINDS: &[&str] = &["markdown", "text", "textarea", "select", "radio", "checkbox"];

impl<'de> Deserialize<'de> for FormBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("type"))?
            .to_string();

        if !KNOWN_KINDS.contains(&kind.as_str()) {
            return Ok(Self::Unknown { kind, raw });
        }

        let block = KnownBlock::deserialize(raw).map_err(de::Error::custom)?;
        Ok(match block {
            KnownBlock::Markdown(b) => Self::Markdown(b),
            KnownBlock::Text(b) => Self::Text(b),
            KnownBlock::Textarea(b) => Self::Textarea(b),
            KnownBlock::Select(b) => Self::Select(b),
            KnownBlock::Radio(b) => Self::Radio(b),
            KnownBlock::Checkbox(b) => Self::Checkbox(b),
        })
    }
}

impl Serialize for FormBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = match self {
            Self::Markdown(b) => KnownBlockRef::Markdown(b),
            Self::Text(b) => KnownBlockRef::Text(b),
            Self::Textarea(b) => KnownBlockRef::Textarea(b),
            Self::Select(b) => KnownBlockRef::Select(b),
            Self::Radio(b) => KnownBlockRef::Radio(b),
            Self::Checkbox(b) => KnownBlockRef::Checkbox(b),
            Self::Unknown { raw, .. } => return raw.serialize(serializer),
        };
        known.serialize(serializer)
    }
}
