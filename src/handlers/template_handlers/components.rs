use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use super::helpers::{AddComponentForm, IdForm, InlineEditForm, component_ids, render_component};
use crate::audit;
use crate::auth::csrf;
use crate::auth::session::get_admin_id;
use crate::components::{ComponentKind, ComponentOptions};
use crate::errors::{AppError, fragment};
use crate::handlers::helpers::{get_field, parse_form_body};
use crate::models::component_type;
use crate::models::template::{self, NewComponent};

fn check_options(kind: ComponentKind, raw: &str) -> Result<(), AppError> {
    ComponentOptions::parse(kind, raw)
        .map(|_| ())
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// POST /admin/pages/templates/{id}/components: returns the new component's fragment.
pub async fn store(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<AddComponentForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();

    let component_type = match component_type::find(&pool, form.component_type_id).await {
        Err(AppError::NotFound) => {
            return Err(AppError::BadRequest(format!(
                "Unknown component type id {}",
                form.component_type_id
            )));
        }
        other => other?,
    };
    let kind = ComponentKind::from_type_name(&component_type.name)
        .ok_or_else(|| AppError::BadRequest(format!("Component type '{}' cannot be rendered", component_type.name)))?;
    check_options(kind, &form.options)?;

    let title = match form.title.trim() {
        "" => component_type.label.clone(),
        t => t.to_string(),
    };

    let component = template::add_component(
        &pool,
        template_id,
        &NewComponent {
            section_id: form.section_id,
            component_type_id: component_type.id,
            title,
            options: form.options.clone(),
        },
    )
    .await?;

    let details = serde_json::json!({
        "section_id": component.section_id,
        "type": component.type_name,
        "summary": format!("Added {} component '{}'", component.type_name, component.title)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "component.created", "component", component.id, details).await;

    Ok(fragment(render_component(&component)?))
}

/// POST /admin/pages/templates/{id}/components/title
pub async fn update_title(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<InlineEditForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();

    template::update_component_title(&pool, template_id, form.pk, &form.value).await?;

    let details = serde_json::json!({
        "title": form.value,
        "summary": format!("Renamed component #{} to '{}'", form.pk, form.value)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "component.renamed", "component", form.pk, details).await;

    Ok(HttpResponse::Ok().finish())
}

/// POST /admin/pages/templates/{id}/components/options: stored verbatim once it
/// parses for the component's variant.
pub async fn update_options(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<InlineEditForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();

    let component = template::find_component(&pool, form.pk).await?;
    if component.template_id != template_id {
        return Err(AppError::NotFound);
    }
    let kind = ComponentKind::from_type_name(&component.type_name)
        .ok_or_else(|| AppError::UnknownComponentType(component.type_name.clone()))?;
    check_options(kind, &form.value)?;

    template::update_component_options(&pool, template_id, component.id, &form.value).await?;

    let details = serde_json::json!({
        "summary": format!("Updated options of component #{}", component.id)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "component.options_updated", "component", component.id, details).await;

    Ok(HttpResponse::Ok().finish())
}

/// POST /admin/pages/templates/{id}/components/reorder: `data[]` holds `cp_<id>` entries.
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

    let ids = component_ids(&params)?;
    if ids.is_empty() {
        return Ok(HttpResponse::Ok().finish());
    }

    template::reorder_components(&pool, template_id, &ids).await?;

    let details = serde_json::json!({
        "order": ids,
        "summary": format!("Reordered {} component(s)", ids.len())
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "component.reordered", "template", template_id, details).await;

    Ok(HttpResponse::Ok().finish())
}

/// POST /admin/pages/templates/{id}/components/delete
pub async fn destroy(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<IdForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();

    template::delete_component(&pool, template_id, form.id).await?;

    let details = serde_json::json!({
        "template_id": template_id,
        "summary": format!("Deleted component #{}", form.id)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "component.deleted", "component", form.id, details).await;

    Ok(HttpResponse::Ok().finish())
}
