//! HTML form generator implementation.

use preflight_form::markdown::{Inline, MarkdownNode};
use preflight_form::{
    Choice, Control, FieldMeta, FormAnswers, FormDefinition, PageAnswers, PageErrors,
    PageRenderer, PageView,
};

/// Options for HTML generation.
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Title for the HTML document. Defaults to the form title in `form_to_html`.
    pub title: Option<String>,
    /// Whether to include default CSS styling.
    pub include_styles: bool,
    /// Whether to generate a complete HTML document (with html/head/body tags).
    pub full_document: bool,
    /// Custom CSS class prefix for all generated elements.
    pub class_prefix: String,
}

impl HtmlOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "preflight".to_string(),
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable default CSS styling.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Generate a complete HTML document or just the form fragment.
    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    /// Set a custom CSS class prefix.
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }
}

/// Render a single page view as an HTML form.
pub fn page_to_html(view: &PageView, options: &HtmlOptions) -> String {
    let prefix = &options.class_prefix;
    let mut body = format!("<form class=\"{prefix}-form\" data-page=\"{}\">\n", escape_html(&view.id));
    body.push_str(&render_page(view, prefix, 1));
    body.push_str(&format!(
        "  <button type=\"submit\" class=\"{prefix}-submit\">Next</button>\n"
    ));
    body.push_str("</form>\n");

    wrap_document(body, options.title.as_deref().unwrap_or(&view.title), options)
}

/// Render every page of a form, pre-filled with `answers`, as one HTML document.
///
/// Field ids and names are qualified with the page id (`field-{page}-{name}`,
/// `{page}.{name}`) since names only have to be unique within a page.
pub fn form_to_html(
    definition: &FormDefinition,
    answers: &FormAnswers,
    options: &HtmlOptions,
) -> String {
    let prefix = &options.class_prefix;
    let title = options.title.as_deref().unwrap_or(&definition.title);
    let empty = PageAnswers::new();

    let mut body = format!(
        "<form class=\"{prefix}-form\" data-form=\"{}\" data-version=\"{}\">\n",
        escape_html(&definition.id),
        escape_html(&definition.meta.version)
    );
    body.push_str(&format!(
        "  <h1 class=\"{prefix}-title\">{}</h1>\n",
        escape_html(title)
    ));

    for page in definition.pages() {
        let page_answers = answers.page(&page.id).unwrap_or(&empty);
        let mut view = PageRenderer::new(page).render(page_answers, &PageErrors::new());
        for control in &mut view.controls {
            if let Some(field) = control.field_mut() {
                field.scope_to_page(&page.id);
            }
        }
        body.push_str(&render_page(&view, prefix, 1));
    }

    body.push_str(&format!(
        "  <button type=\"submit\" class=\"{prefix}-submit\">Submit</button>\n"
    ));
    body.push_str("</form>\n");

    wrap_document(body, title, options)
}

fn wrap_document(body: String, title: &str, options: &HtmlOptions) -> String {
    if !options.full_document {
        return body;
    }

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    if options.include_styles {
        html.push_str(&generate_styles(&options.class_prefix));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(&body);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_page(view: &PageView, prefix: &str, indent: usize) -> String {
    let ind = "  ".repeat(indent);
    let mut html = format!(
        "{ind}<section class=\"{prefix}-page\" id=\"page-{}\">\n",
        escape_html(&view.id)
    );
    html.push_str(&format!(
        "{ind}  <h2 class=\"{prefix}-page-title\">{}</h2>\n",
        escape_html(&view.title)
    ));
    for control in &view.controls {
        html.push_str(&render_control(control, prefix, indent + 1));
    }
    html.push_str(&format!("{ind}</section>\n"));
    html
}

/// Generate HTML for a single control.
fn render_control(control: &Control, prefix: &str, indent: usize) -> String {
    let ind = "  ".repeat(indent);
    let mut html = String::new();

    match control {
        Control::Markdown(nodes) => {
            html.push_str(&format!("{ind}<div class=\"{prefix}-markdown\">\n"));
            html.push_str(&render_markdown(nodes, &format!("{ind}  ")));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Control::TextInput {
            field,
            value,
            placeholder,
            min_length,
            max_length,
        } => {
            let attrs = text_attrs(field, placeholder.as_deref(), *min_length, *max_length);
            html.push_str(&field_open(field, prefix, &ind));
            html.push_str(&label(field, &ind));
            html.push_str(&format!(
                "{ind}  <input type=\"text\" class=\"{prefix}-input\"{attrs} value=\"{}\">\n",
                escape_html(value)
            ));
            html.push_str(&error(field, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Control::TextArea {
            field,
            value,
            placeholder,
            min_length,
            max_length,
            rows,
        } => {
            let attrs = text_attrs(field, placeholder.as_deref(), *min_length, *max_length);
            html.push_str(&field_open(field, prefix, &ind));
            html.push_str(&label(field, &ind));
            html.push_str(&format!(
                "{ind}  <textarea rows=\"{rows}\" class=\"{prefix}-textarea\"{attrs}>{}</textarea>\n",
                escape_html(value)
            ));
            html.push_str(&error(field, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Control::Select {
            field,
            placeholder,
            choices,
        } => {
            let none_selected = choices.iter().all(|c| !c.selected);
            html.push_str(&field_open(field, prefix, &ind));
            html.push_str(&label(field, &ind));
            html.push_str(&format!(
                "{ind}  <select class=\"{prefix}-select\"{}>\n",
                common_attrs(field)
            ));
            html.push_str(&format!(
                "{ind}    <option value=\"\"{}>{}</option>\n",
                if none_selected { " selected" } else { "" },
                escape_html(placeholder.as_deref().unwrap_or("Select an option"))
            ));
            for choice in choices {
                let selected = if choice.selected { " selected" } else { "" };
                let shown = escape_html(&choice.label);
                html.push_str(&format!(
                    "{ind}    <option value=\"{shown}\"{selected}>{shown}</option>\n"
                ));
            }
            html.push_str(&format!("{ind}  </select>\n"));
            html.push_str(&error(field, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Control::Radio { field, choices } => {
            html.push_str(&option_group(field, choices, "radio", prefix, &ind));
        }

        Control::CheckboxGroup { field, choices } => {
            html.push_str(&option_group(field, choices, "checkbox", prefix, &ind));
        }

        Control::Toggle { field, checked } => {
            let checked = if *checked { " checked" } else { "" };
            html.push_str(&format!(
                "{ind}<div class=\"{prefix}-field {prefix}-checkbox\">\n"
            ));
            html.push_str(&format!(
                "{ind}  <input type=\"checkbox\" value=\"true\"{}{checked}>\n",
                common_attrs(field)
            ));
            html.push_str(&label(field, &ind));
            html.push_str(&error(field, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Control::Unsupported { kind } => {
            html.push_str(&format!(
                "{ind}<div class=\"{prefix}-unsupported\" role=\"alert\">Unsupported block type: {}</div>\n",
                escape_html(kind)
            ));
        }
    }

    html
}

fn option_group(
    field: &FieldMeta,
    choices: &[Choice],
    input_type: &str,
    prefix: &str,
    ind: &str,
) -> String {
    let mut html = format!(
        "{ind}<fieldset class=\"{prefix}-fieldset\" id=\"{}\"{}>\n",
        escape_html(&field.id),
        described_by(field)
    );
    html.push_str(&format!(
        "{ind}  <legend>{}{}</legend>\n",
        escape_html(&field.label),
        required_marker(field)
    ));

    for (i, choice) in choices.iter().enumerate() {
        let id = format!("{}-{i}", escape_html(&field.id));
        let shown = escape_html(&choice.label);
        let checked = if choice.selected { " checked" } else { "" };
        // browsers only enforce `required` per radio group, not per checkbox group
        let required = if field.required && input_type == "radio" {
            " required"
        } else {
            ""
        };
        html.push_str(&format!(
            "{ind}  <div class=\"{prefix}-{input_type}-option\">\n"
        ));
        html.push_str(&format!(
            "{ind}    <input type=\"{input_type}\" id=\"{id}\" name=\"{}\" value=\"{shown}\"{required}{checked}>\n",
            escape_html(&field.name)
        ));
        html.push_str(&format!("{ind}    <label for=\"{id}\">{shown}</label>\n"));
        html.push_str(&format!("{ind}  </div>\n"));
    }

    html.push_str(&error(field, prefix, ind));
    html.push_str(&format!("{ind}</fieldset>\n"));
    html
}

fn field_open(field: &FieldMeta, prefix: &str, ind: &str) -> String {
    let invalid = if field.error.is_some() {
        format!(" {prefix}-invalid")
    } else {
        String::new()
    };
    format!("{ind}<div class=\"{prefix}-field{invalid}\">\n")
}

fn label(field: &FieldMeta, ind: &str) -> String {
    format!(
        "{ind}  <label for=\"{}\">{}{}</label>\n",
        escape_html(&field.id),
        escape_html(&field.label),
        required_marker(field)
    )
}

fn required_marker(field: &FieldMeta) -> &'static str {
    if field.required {
        " <span aria-hidden=\"true\">*</span>"
    } else {
        ""
    }
}

fn error(field: &FieldMeta, prefix: &str, ind: &str) -> String {
    match &field.error {
        Some(message) => format!(
            "{ind}  <p id=\"{}\" class=\"{prefix}-error\" role=\"alert\">{}</p>\n",
            escape_html(&field.error_id()),
            escape_html(message)
        ),
        None => String::new(),
    }
}

fn described_by(field: &FieldMeta) -> String {
    if field.error.is_some() {
        format!(
            " aria-invalid=\"true\" aria-describedby=\"{}\"",
            escape_html(&field.error_id())
        )
    } else {
        String::new()
    }
}

/// `id`, `name`, `required` and the error wiring shared by every input element.
fn common_attrs(field: &FieldMeta) -> String {
    let mut attrs = format!(
        " id=\"{}\" name=\"{}\"",
        escape_html(&field.id),
        escape_html(&field.name)
    );
    if field.required {
        attrs.push_str(" required");
    }
    attrs.push_str(&described_by(field));
    attrs
}

fn text_attrs(
    field: &FieldMeta,
    placeholder: Option<&str>,
    min_length: Option<usize>,
    max_length: Option<usize>,
) -> String {
    let mut attrs = common_attrs(field);
    if let Some(placeholder) = placeholder {
        attrs.push_str(&format!(" placeholder=\"{}\"", escape_html(placeholder)));
    }
    if let Some(min) = min_length {
        attrs.push_str(&format!(" minlength=\"{min}\""));
    }
    if let Some(max) = max_length {
        attrs.push_str(&format!(" maxlength=\"{max}\""));
    }
    attrs
}

/// Render formatter output; consecutive list items share one `<ul>`.
fn render_markdown(nodes: &[MarkdownNode], ind: &str) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for node in nodes {
        let is_item = matches!(node, MarkdownNode::ListItem(_));
        if in_list && !is_item {
            html.push_str(&format!("{ind}</ul>\n"));
        }
        if is_item && !in_list {
            html.push_str(&format!("{ind}<ul>\n"));
        }
        in_list = is_item;

        match node {
            MarkdownNode::Heading { level, inlines } => {
                html.push_str(&format!(
                    "{ind}<h{level}>{}</h{level}>\n",
                    render_inlines(inlines)
                ));
            }
            MarkdownNode::ListItem(inlines) => {
                html.push_str(&format!("{ind}  <li>{}</li>\n", render_inlines(inlines)));
            }
            MarkdownNode::LineBreak => html.push_str(&format!("{ind}<br>\n")),
            MarkdownNode::Paragraph(inlines) => {
                html.push_str(&format!("{ind}<p>{}</p>\n", render_inlines(inlines)));
            }
        }
    }
    if in_list {
        html.push_str(&format!("{ind}</ul>\n"));
    }

    html
}

fn render_inlines(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) => escape_html(text),
            Inline::Bold(text) => format!("<strong>{}</strong>", escape_html(text)),
            Inline::Italic(text) => format!("<em>{}</em>", escape_html(text)),
        })
        .collect()
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate default CSS styles.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix}-form {{
      max-width: 640px;
      margin: 2rem auto;
      padding: 1rem;
      font-family: sans-serif;
    }}
    .{prefix}-page {{
      margin: 1.5rem 0;
    }}
    .{prefix}-field {{
      margin: 0.75rem 0;
    }}
    .{prefix}-field label {{
      display: block;
      margin-bottom: 0.25rem;
    }}
    .{prefix}-input, .{prefix}-textarea, .{prefix}-select {{
      width: 100%;
      padding: 0.5rem;
      box-sizing: border-box;
    }}
    .{prefix}-checkbox {{
      display: flex;
      align-items: center;
      gap: 0.5rem;
    }}
    .{prefix}-checkbox label {{
      display: inline;
    }}
    .{prefix}-fieldset {{
      margin: 1rem 0;
      padding: 1rem;
    }}
    .{prefix}-radio-option, .{prefix}-checkbox-option {{
      margin: 0.25rem 0;
    }}
    .{prefix}-invalid input, .{prefix}-invalid textarea, .{prefix}-invalid select {{
      border-color: #c0392b;
    }}
    .{prefix}-error, .{prefix}-unsupported {{
      color: #c0392b;
      margin: 0.25rem 0;
    }}
    .{prefix}-submit {{
      margin-top: 1rem;
      padding: 0.5rem 1rem;
    }}
  </style>
"#
    )
}
