use askama::Template;

use super::PageContext;
use crate::audit::AuditEntry;
use crate::models::component_type::ComponentType;
use crate::models::template::{Section, Template as PageTemplate, TemplateListItem};
use crate::routes::BuilderUrls;

#[derive(Template)]
#[template(path = "templates/index.html")]
pub struct TemplateListTemplate {
    pub ctx: PageContext,
    pub templates: Vec<TemplateListItem>,
    pub recent_activity: Vec<AuditEntry>,
    pub create_url: String,
}

#[derive(Template)]
#[template(path = "templates/create.html")]
pub struct TemplateCreateTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub name: String,
    pub description: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "templates/build.html")]
pub struct TemplateBuildTemplate {
    pub ctx: PageContext,
    pub template: PageTemplate,
    pub component_types: Vec<ComponentType>,
    /// Pre-rendered section fragments, in order.
    pub sections: Vec<String>,
    pub urls: BuilderUrls,
}

/// One section on the builder canvas. Also the body of the add-section response.
#[derive(Template)]
#[template(path = "templates/_section.html")]
pub struct SectionFragment<'a> {
    pub section: &'a Section,
    /// Pre-rendered component fragments, in order.
    pub components: Vec<String>,
    pub component_types: &'a [ComponentType],
}

/// Form rows contributed by one section.
pub struct FormSection {
    pub title: String,
    pub rows: Vec<String>,
}

#[derive(Template)]
#[template(path = "templates/form.html")]
pub struct TemplateFormPreviewTemplate {
    pub ctx: PageContext,
    pub template: PageTemplate,
    pub sections: Vec<FormSection>,
    pub build_url: String,
}
