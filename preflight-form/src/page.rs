use crate::{
    BlockRenderer, Control, FieldValue, FormPage, Input, PageAnswers, PageErrors, validate_page,
};

/// A rendered page: the title followed by one control per block, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub id: String,
    pub title: String,
    pub controls: Vec<Control>,
}

/// Renders a page by dispatching each block to its `BlockRenderer`.
#[derive(Debug, Clone, Copy)]
pub struct PageRenderer<'a> {
    page: &'a FormPage,
}

impl<'a> PageRenderer<'a> {
    pub fn new(page: &'a FormPage) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &'a FormPage {
        self.page
    }

    /// Render every block with its answer (or the block's default) and error.
    pub fn render(&self, answers: &PageAnswers, errors: &PageErrors) -> PageView {
        let controls = self
            .page
            .blocks
            .iter()
            .map(|block| match block.name() {
                Some(name) => {
                    let default = block.default_value();
                    let value = answers.get(name).unwrap_or(&default);
                    block.render(value, errors.get(name).map(String::as_str))
                }
                None => block.render(&FieldValue::Null, None),
            })
            .collect();

        PageView {
            id: self.page.id.clone(),
            title: self.page.title.clone(),
            controls,
        }
    }

    /// Route an edit to the block called `name` and report the new value.
    ///
    /// Returns `false` when no block has that name or the block ignores the input.
    pub fn handle(
        &self,
        answers: &PageAnswers,
        name: &str,
        input: Input,
        mut on_change: impl FnMut(&str, FieldValue),
    ) -> bool {
        let Some(block) = self.page.block(name) else {
            tracing::debug!(page = %self.page.id, field = name, "edit for unknown field ignored");
            return false;
        };

        let default = block.default_value();
        let current = answers.get(name).unwrap_or(&default);
        match block.apply(current, input) {
            Some(value) => {
                on_change(name, value);
                true
            }
            None => false,
        }
    }
}

/// The answers and errors of the page being shown, owned for as long as it is shown.
#[derive(Debug, Clone)]
pub struct PageState<'a> {
    renderer: PageRenderer<'a>,
    answers: PageAnswers,
    errors: PageErrors,
}

impl<'a> PageState<'a> {
    pub fn new(page: &'a FormPage, answers: PageAnswers, errors: PageErrors) -> Self {
        Self {
            renderer: PageRenderer::new(page),
            answers,
            errors,
        }
    }

    pub fn page(&self) -> &'a FormPage {
        self.renderer.page()
    }

    pub fn answers(&self) -> &PageAnswers {
        &self.answers
    }

    pub fn errors(&self) -> &PageErrors {
        &self.errors
    }

    /// Render the page in its current state.
    pub fn view(&self) -> PageView {
        self.renderer.render(&self.answers, &self.errors)
    }

    /// Apply a user edit. An accepted edit clears that field's error.
    pub fn edit(&mut self, name: &str, input: Input) -> bool {
        let Self {
            renderer,
            answers,
            errors,
        } = self;

        let mut changed = None;
        renderer.handle(answers, name, input, |name, value| {
            changed = Some((name.to_string(), value));
        });

        match changed {
            Some((name, value)) => {
                errors.remove(&name);
                answers.insert(name, value);
                true
            }
            None => false,
        }
    }

    /// Run page validation and keep the result. Returns `true` if the page is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_page(self.page(), &self.answers);
        self.errors.is_empty()
    }

    pub fn into_parts(self) -> (PageAnswers, PageErrors) {
        (self.answers, self.errors)
    }

    pub fn into_answers(self) -> PageAnswers {
        self.answers
    }
}
