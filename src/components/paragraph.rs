use askama::Template;

use super::options::ParagraphOptions;
use super::dom_id;
use crate::errors::AppError;
use crate::models::template::Component;

#[derive(Template)]
#[template(path = "components/_paragraph.html")]
struct ParagraphFragment<'a> {
    component: &'a Component,
    options: &'a ParagraphOptions,
    dom_id: String,
}

#[derive(Template)]
#[template(path = "components/_paragraph_form_row.html")]
struct ParagraphFormRow<'a> {
    component: &'a Component,
    options: &'a ParagraphOptions,
}

pub struct ParagraphComponent<'a> {
    component: &'a Component,
    options: ParagraphOptions,
}

impl<'a> ParagraphComponent<'a> {
    pub fn new(component: &'a Component, options: ParagraphOptions) -> Self {
        Self { component, options }
    }

    /// Builder canvas fragment.
    pub fn render(&self) -> Result<String, AppError> {
        let html = ParagraphFragment {
            component: self.component,
            options: &self.options,
            dom_id: dom_id(self.component.id),
        }
        .render()?;
        Ok(html)
    }

    /// Text area row for the end-user page form.
    pub fn render_form_row(&self) -> Result<String, AppError> {
        let html = ParagraphFormRow {
            component: self.component,
            options: &self.options,
        }
        .render()?;
        Ok(html)
    }
}
