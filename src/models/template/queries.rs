use sqlx::{PgExecutor, PgPool};

use super::types::*;
use crate::errors::AppError;

const DEFAULT_SECTION_TITLE: &str = "Untitled section";

const SELECT_COMPONENT: &str = "\
    SELECT c.id, c.section_id, s.template_id, c.component_type_id, \
           ct.name AS type_name, ct.label AS type_label, \
           c.title, c.sort_order, c.options, c.created_at \
    FROM components c \
    JOIN sections s ON s.id = c.section_id \
    JOIN component_types ct ON ct.id = c.component_type_id";

/// Bump a template's `updated_at` after any change beneath it.
async fn touch<'e>(executor: impl PgExecutor<'e>, template_id: i64) -> Result<(), AppError> {
    sqlx::query("UPDATE templates SET updated_at = now() WHERE id = $1")
        .bind(template_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Turn a zero-row UPDATE/DELETE into NotFound.
fn require_affected(rows: u64) -> Result<(), AppError> {
    if rows == 0 { Err(AppError::NotFound) } else { Ok(()) }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub async fn find_all(pool: &PgPool) -> Result<Vec<TemplateListItem>, AppError> {
    let items = sqlx::query_as::<_, TemplateListItem>(
        "SELECT t.id, t.name, t.description, \
                (SELECT COUNT(*) FROM sections s WHERE s.template_id = t.id) AS section_count, \
                (SELECT COUNT(*) FROM components c \
                   JOIN sections s ON s.id = c.section_id \
                  WHERE s.template_id = t.id) AS component_count, \
                t.updated_at \
         FROM templates t \
         ORDER BY t.name, t.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find(pool: &PgPool, template_id: i64) -> Result<Template, AppError> {
    sqlx::query_as::<_, Template>(
        "SELECT id, name, description, created_at, updated_at FROM templates WHERE id = $1",
    )
    .bind(template_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn create(pool: &PgPool, new: &NewTemplate) -> Result<Template, AppError> {
    let template = sqlx::query_as::<_, Template>(
        "INSERT INTO templates (name, description) VALUES ($1, $2) \
         RETURNING id, name, description, created_at, updated_at",
    )
    .bind(new.name.trim())
    .bind(new.description.trim())
    .fetch_one(pool)
    .await?;
    Ok(template)
}

/// Delete a template; sections and components go with it (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, template_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM templates WHERE id = $1")
        .bind(template_id)
        .execute(pool)
        .await?;
    require_affected(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Append an empty section after the template's existing sections.
pub async fn add_empty_section(pool: &PgPool, template_id: i64) -> Result<Section, AppError> {
    // Resolve the template first so a bad id is NotFound rather than an FK error.
    find(pool, template_id).await?;

    let section = sqlx::query_as::<_, Section>(
        "INSERT INTO sections (template_id, title, sort_order) \
         VALUES ($1, $2, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM sections WHERE template_id = $1)) \
         RETURNING id, template_id, title, sort_order, created_at",
    )
    .bind(template_id)
    .bind(DEFAULT_SECTION_TITLE)
    .fetch_one(pool)
    .await?;

    touch(pool, template_id).await?;
    Ok(section)
}

pub async fn find_sections_by_order(pool: &PgPool, template_id: i64) -> Result<Vec<Section>, AppError> {
    let sections = sqlx::query_as::<_, Section>(
        "SELECT id, template_id, title, sort_order, created_at \
         FROM sections WHERE template_id = $1 \
         ORDER BY sort_order, id",
    )
    .bind(template_id)
    .fetch_all(pool)
    .await?;
    Ok(sections)
}

pub async fn find_section(pool: &PgPool, section_id: i64) -> Result<Section, AppError> {
    sqlx::query_as::<_, Section>(
        "SELECT id, template_id, title, sort_order, created_at FROM sections WHERE id = $1",
    )
    .bind(section_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn update_section_title(
    pool: &PgPool,
    template_id: i64,
    section_id: i64,
    title: &str,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE sections SET title = $1 WHERE id = $2 AND template_id = $3")
        .bind(title)
        .bind(section_id)
        .bind(template_id)
        .execute(pool)
        .await?;
    require_affected(result.rows_affected())?;
    touch(pool, template_id).await
}

/// Give each listed section the order of its list position.
///
/// The batch runs in one transaction. An id outside the template aborts it
/// and no order value changes. An empty list is a no-op.
pub async fn reorder_sections(pool: &PgPool, template_id: i64, section_ids: &[i64]) -> Result<(), AppError> {
    if section_ids.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (position, section_id) in section_ids.iter().enumerate() {
        let result = sqlx::query(
            "UPDATE sections SET sort_order = $1 WHERE id = $2 AND template_id = $3",
        )
        .bind(position as i64)
        .bind(section_id)
        .bind(template_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            log::warn!("Reorder of template {template_id} rejected: section {section_id} not found");
            return Err(AppError::NotFound);
        }
    }
    touch(&mut *tx, template_id).await?;
    tx.commit().await?;
    Ok(())
}

/// Delete a section and its components.
pub async fn delete_section(pool: &PgPool, template_id: i64, section_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM sections WHERE id = $1 AND template_id = $2")
        .bind(section_id)
        .bind(template_id)
        .execute(pool)
        .await?;
    require_affected(result.rows_affected())?;
    touch(pool, template_id).await
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Insert a component at the end of its section. The section must belong to
/// `template_id`.
pub async fn add_component(pool: &PgPool, template_id: i64, new: &NewComponent) -> Result<Component, AppError> {
    let section = find_section(pool, new.section_id).await?;
    if section.template_id != template_id {
        return Err(AppError::NotFound);
    }

    let component_id: i64 = sqlx::query_scalar(
        "INSERT INTO components (section_id, component_type_id, title, sort_order, options) \
         VALUES ($1, $2, $3, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM components WHERE section_id = $1), $4) \
         RETURNING id",
    )
    .bind(new.section_id)
    .bind(new.component_type_id)
    .bind(&new.title)
    .bind(&new.options)
    .fetch_one(pool)
    .await?;

    touch(pool, template_id).await?;
    find_component(pool, component_id).await
}

pub async fn find_component(pool: &PgPool, component_id: i64) -> Result<Component, AppError> {
    sqlx::query_as::<_, Component>(&format!("{SELECT_COMPONENT} WHERE c.id = $1"))
        .bind(component_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// All components of a template, grouped by section order then component order.
pub async fn find_components_for_template(pool: &PgPool, template_id: i64) -> Result<Vec<Component>, AppError> {
    let components = sqlx::query_as::<_, Component>(&format!(
        "{SELECT_COMPONENT} WHERE s.template_id = $1 \
         ORDER BY s.sort_order, s.id, c.sort_order, c.id"
    ))
    .bind(template_id)
    .fetch_all(pool)
    .await?;
    Ok(components)
}

async fn update_component_field(
    pool: &PgPool,
    template_id: i64,
    component_id: i64,
    column: ComponentColumn,
    value: &str,
) -> Result<(), AppError> {
    let sql = format!(
        "UPDATE components SET {} = $1 \
         WHERE id = $2 AND section_id IN (SELECT id FROM sections WHERE template_id = $3)",
        column.as_str()
    );
    let result = sqlx::query(&sql)
        .bind(value)
        .bind(component_id)
        .bind(template_id)
        .execute(pool)
        .await?;
    require_affected(result.rows_affected())?;
    touch(pool, template_id).await
}

#[derive(Clone, Copy)]
enum ComponentColumn {
    Title,
    Options,
}

impl ComponentColumn {
    fn as_str(self) -> &'static str {
        match self {
            ComponentColumn::Title => "title",
            ComponentColumn::Options => "options",
        }
    }
}

pub async fn update_component_title(
    pool: &PgPool,
    template_id: i64,
    component_id: i64,
    title: &str,
) -> Result<(), AppError> {
    update_component_field(pool, template_id, component_id, ComponentColumn::Title, title).await
}

/// Store the options blob exactly as given.
pub async fn update_component_options(
    pool: &PgPool,
    template_id: i64,
    component_id: i64,
    options: &str,
) -> Result<(), AppError> {
    update_component_field(pool, template_id, component_id, ComponentColumn::Options, options).await
}

/// Give each listed component the order of its list position. Same
/// transaction and scoping rules as [`reorder_sections`].
pub async fn reorder_components(
    pool: &PgPool,
    template_id: i64,
    component_ids: &[i64],
) -> Result<(), AppError> {
    if component_ids.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (position, component_id) in component_ids.iter().enumerate() {
        let result = sqlx::query(
            "UPDATE components SET sort_order = $1 \
             WHERE id = $2 AND section_id IN (SELECT id FROM sections WHERE template_id = $3)",
        )
        .bind(position as i64)
        .bind(component_id)
        .bind(template_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            log::warn!("Reorder of template {template_id} rejected: component {component_id} not found");
            return Err(AppError::NotFound);
        }
    }
    touch(&mut *tx, template_id).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete_component(pool: &PgPool, template_id: i64, component_id: i64) -> Result<(), AppError> {
    let result = sqlx::query(
        "DELETE FROM components \
         WHERE id = $1 AND section_id IN (SELECT id FROM sections WHERE template_id = $2)",
    )
    .bind(component_id)
    .bind(template_id)
    .execute(pool)
    .await?;
    require_affected(result.rows_affected())?;
    touch(pool, template_id).await
}
