//! Typed per-variant configuration parsed from a component's options blob.
//!
//! The blob is stored verbatim. A value starting with `{` must be a JSON
//! object matching the variant's record; any other non-empty value is
//! shorthand for the variant's primary field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ComponentKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageOptions {
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParagraphOptions {
    pub placeholder: String,
    pub required: bool,
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentOptions {
    Image(ImageOptions),
    Paragraph(ParagraphOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsError {
    pub type_name: &'static str,
    pub reason: String,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} options: {}", self.type_name, self.reason)
    }
}

impl std::error::Error for OptionsError {}

impl ComponentOptions {
    pub fn parse(kind: ComponentKind, raw: &str) -> Result<Self, OptionsError> {
        let wrap = |e: serde_json::Error| OptionsError {
            type_name: kind.type_name(),
            reason: e.to_string(),
        };
        match kind {
            ComponentKind::Image => parse_record(raw, |s| ImageOptions {
                src: s.to_string(),
                ..Default::default()
            })
            .map(ComponentOptions::Image)
            .map_err(wrap),
            ComponentKind::Paragraph => parse_record(raw, |s| ParagraphOptions {
                placeholder: s.to_string(),
                ..Default::default()
            })
            .map(ComponentOptions::Paragraph)
            .map_err(wrap),
        }
    }

    pub fn defaults(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Image => ComponentOptions::Image(ImageOptions::default()),
            ComponentKind::Paragraph => ComponentOptions::Paragraph(ParagraphOptions::default()),
        }
    }
}

fn parse_record<T: DeserializeOwned + Default>(
    raw: &str,
    shorthand: impl FnOnce(&str) -> T,
) -> Result<T, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(T::default())
    } else if trimmed.starts_with('{') {
        serde_json::from_str(trimmed)
    } else {
        Ok(shorthand(trimmed))
    }
}
