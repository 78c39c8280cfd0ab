use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row on the template listing page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateListItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub section_count: i64,
    pub component_count: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Section {
    pub id: i64,
    pub template_id: i64,
    pub title: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// A component joined with its section's template and its catalog type.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Component {
    pub id: i64,
    pub section_id: i64,
    pub template_id: i64,
    pub component_type_id: i64,
    pub type_name: String,
    pub type_label: String,
    pub title: String,
    pub sort_order: i64,
    pub options: String,
    pub created_at: DateTime<Utc>,
}

/// Submitted template creation form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewComponent {
    pub section_id: i64,
    pub component_type_id: i64,
    pub title: String,
    pub options: String,
}
