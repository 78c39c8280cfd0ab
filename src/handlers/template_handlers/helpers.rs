use askama::Template;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::validate;
use crate::components::{BuilderComponent, parse_dom_id};
use crate::errors::AppError;
use crate::handlers::helpers::get_list;
use crate::models::component_type::ComponentType;
use crate::models::template::{self, Component, Section, TemplateForm};
use crate::templates_structs::{FormSection, SectionFragment};

pub const NAME_MAX: usize = 255;
pub const DESCRIPTION_MAX: usize = 2000;

/// Inline edit payload (`pk` = row id, `value` = new text).
#[derive(Deserialize)]
pub struct InlineEditForm {
    pub pk: i64,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct IdForm {
    pub id: i64,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct AddComponentForm {
    pub section_id: i64,
    pub component_type_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub csrf_token: String,
}

pub fn validate_template_form(form: &TemplateForm) -> Vec<String> {
    let mut errors = vec![];
    errors.extend(validate::validate_required(&form.name, "Name", NAME_MAX));
    errors.extend(validate::validate_optional(&form.description, "Description", DESCRIPTION_MAX));
    errors
}

/// Section ids from a reorder payload, in submitted order.
pub fn section_ids(params: &[(String, String)]) -> Result<Vec<i64>, AppError> {
    get_list(params, "data")
        .into_iter()
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("Invalid section id '{raw}'")))
        })
        .collect()
}

/// Component ids from a reorder payload. Entries carry the canvas prefix (`cp_12`).
pub fn component_ids(params: &[(String, String)]) -> Result<Vec<i64>, AppError> {
    get_list(params, "data")
        .into_iter()
        .map(|raw| parse_dom_id(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid component id '{raw}'"))))
        .collect()
}

pub fn render_component(component: &Component) -> Result<String, AppError> {
    BuilderComponent::for_record(component)?.render()
}

pub fn render_section(
    section: &Section,
    components: &[Component],
    component_types: &[ComponentType],
) -> Result<String, AppError> {
    let components = components
        .iter()
        .map(render_component)
        .collect::<Result<Vec<_>, _>>()?;
    let html = SectionFragment {
        section,
        components,
        component_types,
    }
    .render()?;
    Ok(html)
}

/// Ordered sections of a template, each with its ordered components.
pub async fn load_canvas(pool: &PgPool, template_id: i64) -> Result<Vec<(Section, Vec<Component>)>, AppError> {
    let sections = template::find_sections_by_order(pool, template_id).await?;
    let components = template::find_components_for_template(pool, template_id).await?;

    let mut canvas = Vec::with_capacity(sections.len());
    for section in sections {
        let own = components
            .iter()
            .filter(|c| c.section_id == section.id)
            .cloned()
            .collect();
        canvas.push((section, own));
    }
    Ok(canvas)
}

/// Form rows for every component whose variant has one, grouped by section.
/// Sections contributing no rows are left out.
pub fn form_sections(canvas: &[(Section, Vec<Component>)]) -> Result<Vec<FormSection>, AppError> {
    let mut out = Vec::new();
    for (section, components) in canvas {
        let mut rows = Vec::new();
        for component in components {
            if let Some(row) = BuilderComponent::for_record(component)?.render_form_row()? {
                rows.push(row);
            }
        }
        if !rows.is_empty() {
            out.push(FormSection {
                title: section.title.clone(),
                rows,
            });
        }
    }
    Ok(out)
}
