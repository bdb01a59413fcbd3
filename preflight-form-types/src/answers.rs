use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerSummary, FieldValue};

/// Validation messages for one page, keyed by field name.
pub type PageErrors = BTreeMap<String, String>;

/// Answers for a single page, keyed by block name.
///
/// This is the unit of autosave: one save call persists exactly one page's map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageAnswers {
    values: BTreeMap<String, FieldValue>,
}

impl PageAnswers {
    /// Create a new empty answer map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Get the value for a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Check if a value exists for a field.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove the value for a field.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Iterate over all name-value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Get the number of answered fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no field has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for PageAnswers {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PageAnswers {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Answers for a whole form, keyed by page id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormAnswers {
    pages: BTreeMap<String, PageAnswers>,
}

impl FormAnswers {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the answers for a page.
    pub fn page(&self, page_id: &str) -> Option<&PageAnswers> {
        self.pages.get(page_id)
    }

    /// Get the answers for a page, creating an empty map if absent.
    pub fn page_mut(&mut self, page_id: &str) -> &mut PageAnswers {
        self.pages.entry(page_id.to_string()).or_default()
    }

    /// Replace the answers of a page.
    pub fn set_page(&mut self, page_id: impl Into<String>, answers: PageAnswers) {
        self.pages.insert(page_id.into(), answers);
    }

    /// Iterate over all pages in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageAnswers)> {
        self.pages.iter().map(|(id, answers)| (id.as_str(), answers))
    }

    /// Get the number of pages with answers.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if there are no answers at all.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Rebuild nested `FormAnswers` from the flat answer list of a run.
///
/// Entries are grouped by `page_id`; for a repeated `(page_id, field_name)` pair the
/// later entry wins, so the result depends on input order.
pub fn answers_to_form_answers(answers: &[AnswerSummary]) -> FormAnswers {
    let mut form_answers = FormAnswers::new();
    for answer in answers {
        form_answers
            .page_mut(&answer.page_id)
            .insert(answer.field_name.clone(), answer.value.clone());
    }
    form_answers
}
