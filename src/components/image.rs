use askama::Template;

use super::options::ImageOptions;
use super::dom_id;
use crate::errors::AppError;
use crate::models::template::Component;

#[derive(Template)]
#[template(path = "components/_image.html")]
struct ImageFragment<'a> {
    component: &'a Component,
    options: &'a ImageOptions,
    dom_id: String,
}

/// Image variant. Builder canvas only; images take no end-user input.
pub struct ImageComponent<'a> {
    component: &'a Component,
    options: ImageOptions,
}

impl<'a> ImageComponent<'a> {
    pub fn new(component: &'a Component, options: ImageOptions) -> Self {
        Self { component, options }
    }

    pub fn render(&self) -> Result<String, AppError> {
        let html = ImageFragment {
            component: self.component,
            options: &self.options,
            dom_id: dom_id(self.component.id),
        }
        .render()?;
        Ok(html)
    }
}
