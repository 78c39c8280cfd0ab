use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use super::helpers::{IdForm, InlineEditForm, render_section, section_ids};
use crate::audit;
use crate::auth::csrf;
use crate::auth::session::get_admin_id;
use crate::errors::{AppError, fragment};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::helpers::{get_field, parse_form_body};
use crate::models::component_type;
use crate::models::template;

/// POST /admin/pages/templates/{id}/sections: returns the new section's fragment.
pub async fn store(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();

    let section = template::add_empty_section(&pool, template_id).await?;
    let component_types = component_type::find_all(&pool).await?;

    let details = serde_json::json!({
        "template_id": template_id,
        "summary": format!("Added section #{} to template {}", section.id, template_id)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "section.created", "section", section.id, details).await;

    Ok(fragment(render_section(&section, &[], &component_types)?))
}

/// POST /admin/pages/templates/{id}/sections/title
pub async fn update_title(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<InlineEditForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();

    template::update_section_title(&pool, template_id, form.pk, &form.value).await?;

    let details = serde_json::json!({
        "title": form.value,
        "summary": format!("Renamed section #{} to '{}'", form.pk, form.value)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "section.renamed", "section", form.pk, details).await;

    Ok(HttpResponse::Ok().finish())
}

/// POST /admin/pages/templates/{id}/sections/reorder: `data[]` holds section ids in their new order.
pub async fn reorder(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let template_id = path.into_inner();
    let body_str = String::from_utf8_lossy(&body);
    let params = parse_form_body(&body_str);
    csrf::validate_csrf(&session, get_field(&params, "csrf_token"))?;

    let ids = section_ids(&params)?;
    if ids.is_empty() {
        return Ok(HttpResponse::Ok().finish());
    }

    template::reorder_sections(&pool, template_id, &ids).await?;

    let details = serde_json::json!({
        "order": ids,
        "summary": format!("Reordered {} section(s)", ids.len())
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "section.reordered", "template", template_id, details).await;

    Ok(HttpResponse::Ok().finish())
}

/// POST /admin/pages/templates/{id}/sections/delete
pub async fn destroy(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<IdForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();

    template::delete_section(&pool, template_id, form.id).await?;

    let details = serde_json::json!({
        "template_id": template_id,
        "summary": format!("Deleted section #{}", form.id)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "section.deleted", "section", form.id, details).await;

    Ok(HttpResponse::Ok().finish())
}
