use crate::markdown::MarkdownNode;

/// What every answer-collecting control carries besides its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    /// Answer key, the block `name`.
    pub name: String,

    /// Element id, also the target of the label.
    pub id: String,

    /// Label text; falls back to the field name.
    pub label: String,

    pub required: bool,

    /// Validation message handed in by the caller.
    pub error: Option<String>,
}

impl FieldMeta {
    pub fn new(name: &str, label: Option<&str>, required: bool, error: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            id: format!("field-{name}"),
            label: label.unwrap_or(name).to_string(),
            required,
            error: error.map(str::to_string),
        }
    }

    /// Id of the element that shows `error`, for `aria-describedby`.
    pub fn error_id(&self) -> String {
        format!("{}-error", self.id)
    }

    /// Qualify id and name with the page, for documents that hold several pages.
    ///
    /// Field names are only unique within a page.
    pub fn scope_to_page(&mut self, page_id: &str) {
        self.id = format!("field-{page_id}-{}", self.name);
        self.name = format!("{page_id}.{}", self.name);
    }
}

/// One option of a select, radio group or checkbox group as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// The option's display string; also what the frontend sends back in an `Input`.
    pub label: String,
    pub selected: bool,
}

/// A rendered block, ready for a frontend to draw.
///
/// Controls are plain data. Rendering never changes an answer; edits come back
/// through `BlockRenderer::apply` as an `Input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Display-only formatted text.
    Markdown(Vec<MarkdownNode>),

    TextInput {
        field: FieldMeta,
        value: String,
        placeholder: Option<String>,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },

    TextArea {
        field: FieldMeta,
        value: String,
        placeholder: Option<String>,
        min_length: Option<usize>,
        max_length: Option<usize>,
        rows: u32,
    },

    Select {
        field: FieldMeta,
        placeholder: Option<String>,
        choices: Vec<Choice>,
    },

    Radio {
        field: FieldMeta,
        choices: Vec<Choice>,
    },

    CheckboxGroup {
        field: FieldMeta,
        choices: Vec<Choice>,
    },

    /// Single boolean checkbox.
    Toggle { field: FieldMeta, checked: bool },

    /// A block kind this version cannot render. Shown as an inline marker.
    Unsupported { kind: String },
}

impl Control {
    /// Get the field metadata, if this control collects an answer.
    pub fn field(&self) -> Option<&FieldMeta> {
        match self {
            Self::Markdown(_) | Self::Unsupported { .. } => None,
            Self::TextInput { field, .. }
            | Self::TextArea { field, .. }
            | Self::Select { field, .. }
            | Self::Radio { field, .. }
            | Self::CheckboxGroup { field, .. }
            | Self::Toggle { field, .. } => Some(field),
        }
    }

    pub fn field_mut(&mut self) -> Option<&mut FieldMeta> {
        match self {
            Self::Markdown(_) | Self::Unsupported { .. } => None,
            Self::TextInput { field, .. }
            | Self::TextArea { field, .. }
            | Self::Select { field, .. }
            | Self::Radio { field, .. }
            | Self::CheckboxGroup { field, .. }
            | Self::Toggle { field, .. } => Some(field),
        }
    }

    /// Get the choices of a select, radio or checkbox group.
    pub fn choices(&self) -> &[Choice] {
        match self {
            Self::Select { choices, .. }
            | Self::Radio { choices, .. }
            | Self::CheckboxGroup { choices, .. } => choices,
            _ => &[],
        }
    }
}
