use crate::{FieldValue, FormBlock, FormPage, PageAnswers, PageErrors};

/// Check a page's answers against the constraints declared on its blocks.
///
/// Covers `required` on every answer-collecting block, and `minLength` / `maxLength`
/// on text and textarea blocks. Length checks count characters and are skipped for
/// empty values, so an optional field may be left blank.
pub fn validate_page(page: &FormPage, answers: &PageAnswers) -> PageErrors {
    let mut errors = PageErrors::new();
    let missing = FieldValue::Null;

    for (name, block) in page.fields() {
        let value = answers.get(name).unwrap_or(&missing);

        if let Some(message) = check_block(block, value) {
            errors.insert(name.to_string(), message);
        }
    }

    if !errors.is_empty() {
        tracing::debug!(page = %page.id, count = errors.len(), "page has validation errors");
    }

    errors
}

fn check_block(block: &FormBlock, value: &FieldValue) -> Option<String> {
    if block.is_required() && value.is_blank() {
        return Some("This field is required".to_string());
    }

    let (min_length, max_length) = match block {
        FormBlock::Text(b) => (b.min_length, b.max_length),
        FormBlock::Textarea(b) => (b.min_length, b.max_length),
        _ => return None,
    };

    let text = value.display_string();
    if text.is_empty() {
        return None;
    }

    let length = text.chars().count();
    if let Some(min) = min_length
        && length < min
    {
        return Some(format!("Must be at least {min} characters"));
    }
    if let Some(max) = max_length
        && length > max
    {
        return Some(format!("Must be at most {max} characters"));
    }

    None
}
