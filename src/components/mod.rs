//! Render variants for template components.
//!
//! A component's catalog type name picks its variant through [`REGISTRY`].
//! Every variant renders a builder-canvas fragment; variants that collect
//! end-user input also render a form row.

pub mod image;
pub mod options;
pub mod paragraph;

use crate::errors::AppError;
use crate::models::template::Component;

pub use image::ImageComponent;
pub use options::{ComponentOptions, ImageOptions, OptionsError, ParagraphOptions};
pub use paragraph::ParagraphComponent;

/// Prefix of a component's element id on the builder canvas. The sortable
/// widget submits these ids back on reorder.
pub const DOM_ID_PREFIX: &str = "cp_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Image,
    Paragraph,
}

/// Catalog type name → variant.
pub const REGISTRY: &[(&str, ComponentKind)] = &[
    ("image", ComponentKind::Image),
    ("paragraph", ComponentKind::Paragraph),
];

impl ComponentKind {
    pub fn from_type_name(name: &str) -> Option<Self> {
        let name = name.trim();
        REGISTRY
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, kind)| *kind)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ComponentKind::Image => "image",
            ComponentKind::Paragraph => "paragraph",
        }
    }
}

pub fn dom_id(component_id: i64) -> String {
    format!("{DOM_ID_PREFIX}{component_id}")
}

/// Parse a canvas element id (`cp_12`) back into a component id. A bare
/// number is accepted as well.
pub fn parse_dom_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.strip_prefix(DOM_ID_PREFIX)
        .unwrap_or(raw)
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
}

/// A component record bound to its render variant.
pub enum BuilderComponent<'a> {
    Image(ImageComponent<'a>),
    Paragraph(ParagraphComponent<'a>),
}

impl<'a> BuilderComponent<'a> {
    pub fn for_record(component: &'a Component) -> Result<Self, AppError> {
        let kind = ComponentKind::from_type_name(&component.type_name)
            .ok_or_else(|| AppError::UnknownComponentType(component.type_name.clone()))?;

        // Rows written before options were validated still render, with defaults.
        let options = ComponentOptions::parse(kind, &component.options).unwrap_or_else(|e| {
            log::warn!("Component {}: {e}; rendering with defaults", component.id);
            ComponentOptions::defaults(kind)
        });

        Ok(match options {
            ComponentOptions::Image(opts) => BuilderComponent::Image(ImageComponent::new(component, opts)),
            ComponentOptions::Paragraph(opts) => {
                BuilderComponent::Paragraph(ParagraphComponent::new(component, opts))
            }
        })
    }

    pub fn render(&self) -> Result<String, AppError> {
        match self {
            BuilderComponent::Image(c) => c.render(),
            BuilderComponent::Paragraph(c) => c.render(),
        }
    }

    /// `None` for variants that take no end-user input.
    pub fn render_form_row(&self) -> Result<Option<String>, AppError> {
        match self {
            BuilderComponent::Image(_) => Ok(None),
            BuilderComponent::Paragraph(c) => c.render_form_row().map(Some),
        }
    }
}
