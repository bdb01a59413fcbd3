use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{FormBlock, FormError};

/// The top-level form document: ordered pages of blocks plus navigation and metadata.
///
/// A definition is immutable once fetched. It is presentation-agnostic: the same
/// document can be rendered as an HTML page, a terminal wizard, or a test script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: String,

    pub title: String,

    /// Pages in display order.
    pub pages: Vec<FormPage>,

    #[serde(default)]
    pub navigation: FormNavigation,

    pub meta: FormMeta,
}

impl FormDefinition {
    /// Create a definition with the given pages and default navigation.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
        pages: Vec<FormPage>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            pages,
            navigation: FormNavigation::default(),
            meta: FormMeta {
                version: version.into(),
            },
        }
    }

    /// Get the pages.
    pub fn pages(&self) -> &[FormPage] {
        &self.pages
    }

    /// Find a page by id.
    pub fn page(&self, id: &str) -> Option<&FormPage> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Position of a page by id.
    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }

    /// Get the number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if the form has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check the structural invariants a renderer relies on.
    ///
    /// A form needs at least one page, page ids must be unique, and field names must be
    /// unique within each page.
    pub fn check(&self) -> Result<(), FormError> {
        if self.pages.is_empty() {
            return Err(FormError::NoPages(self.id.clone()));
        }

        let mut page_ids = HashSet::new();
        for page in &self.pages {
            if !page_ids.insert(page.id.as_str()) {
                return Err(FormError::DuplicatePage(page.id.clone()));
            }
            page.check()?;
        }

        Ok(())
    }
}

/// A single page: a title and an ordered sequence of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPage {
    pub id: String,

    pub title: String,

    /// Blocks in render and tab order.
    #[serde(default)]
    pub blocks: Vec<FormBlock>,
}

impl FormPage {
    /// Create a new page.
    pub fn new(id: impl Into<String>, title: impl Into<String>, blocks: Vec<FormBlock>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks,
        }
    }

    /// Find a block by its answer name.
    pub fn block(&self, name: &str) -> Option<&FormBlock> {
        self.blocks.iter().find(|block| block.name() == Some(name))
    }

    /// Iterate over the blocks that collect an answer.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FormBlock)> {
        self.blocks
            .iter()
            .filter_map(|block| block.name().map(|name| (name, block)))
    }

    fn check(&self) -> Result<(), FormError> {
        let mut names = HashSet::new();
        for (name, _) in self.fields() {
            if !names.insert(name) {
                return Err(FormError::DuplicateField {
                    page: self.id.clone(),
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Navigation configuration for a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormNavigation {
    #[serde(default = "default_style")]
    pub style: String,

    /// Save each page's answers when leaving it.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_style() -> String {
    "pager".to_string()
}

fn default_autosave() -> bool {
    true
}

impl Default for FormNavigation {
    fn default() -> Self {
        Self {
            style: default_style(),
            autosave: default_autosave(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMeta {
    pub version: String,
}
