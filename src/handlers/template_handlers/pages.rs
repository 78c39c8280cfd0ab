use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use super::helpers::{self, load_canvas, render_section, validate_template_form};
use crate::audit;
use crate::auth::csrf;
use crate::auth::session::{get_admin_id, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::component_type;
use crate::models::template::{self, NewTemplate, TemplateForm};
use crate::routes::{self, BuilderUrls};
use crate::templates_structs::{
    PageContext, TemplateBuildTemplate, TemplateCreateTemplate, TemplateFormPreviewTemplate,
    TemplateListTemplate,
};

const RECENT_ACTIVITY: i64 = 10;

/// GET /admin/pages/templates
pub async fn index(
    pool: web::Data<PgPool>,
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &config.app_name)?;
    let templates = template::find_all(&pool).await?;
    let recent_activity = audit::find_recent(&pool, RECENT_ACTIVITY).await?;
    render(TemplateListTemplate {
        ctx,
        templates,
        recent_activity,
        create_url: routes::template_create(),
    })
}

/// GET /admin/pages/templates/create
pub async fn create(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &config.app_name)?;
    render(TemplateCreateTemplate {
        ctx,
        form_action: routes::templates_index(),
        name: String::new(),
        description: String::new(),
        errors: vec![],
    })
}

/// POST /admin/pages/templates
pub async fn store(
    pool: web::Data<PgPool>,
    session: Session,
    config: web::Data<AppConfig>,
    form: web::Form<TemplateForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = validate_template_form(&form);
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &config.app_name)?;
        return render(TemplateCreateTemplate {
            ctx,
            form_action: routes::templates_index(),
            name: form.name.clone(),
            description: form.description.clone(),
            errors,
        });
    }

    let created = template::create(
        &pool,
        &NewTemplate {
            name: form.name.clone(),
            description: form.description.clone(),
        },
    )
    .await?;

    let details = serde_json::json!({
        "name": created.name,
        "summary": format!("Created template '{}'", created.name)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "template.created", "template", created.id, details).await;

    set_flash(&session, &format!("Template '{}' created", created.name));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", routes::template_build(created.id)))
        .finish())
}

/// GET /admin/pages/templates/{id}/build
pub async fn build(
    pool: web::Data<PgPool>,
    session: Session,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let template_id = path.into_inner();
    let template = template::find(&pool, template_id).await?;
    let component_types = component_type::find_all(&pool).await?;
    let canvas = load_canvas(&pool, template_id).await?;

    let sections = canvas
        .iter()
        .map(|(section, components)| render_section(section, components, &component_types))
        .collect::<Result<Vec<_>, _>>()?;

    let ctx = PageContext::build(&session, &config.app_name)?;
    render(TemplateBuildTemplate {
        ctx,
        template,
        component_types,
        sections,
        urls: BuilderUrls::for_template(template_id),
    })
}

/// GET /admin/pages/templates/{id}/form: the end-user form the template produces.
pub async fn form_preview(
    pool: web::Data<PgPool>,
    session: Session,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let template_id = path.into_inner();
    let template = template::find(&pool, template_id).await?;
    let canvas = load_canvas(&pool, template_id).await?;
    let sections = helpers::form_sections(&canvas)?;

    let ctx = PageContext::build(&session, &config.app_name)?;
    render(TemplateFormPreviewTemplate {
        ctx,
        template,
        sections,
        build_url: routes::template_build(template_id),
    })
}

/// POST /admin/pages/templates/{id}/delete
pub async fn destroy(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let template_id = path.into_inner();
    let existing = template::find(&pool, template_id).await?;

    template::delete(&pool, template_id).await?;

    let details = serde_json::json!({
        "name": existing.name,
        "summary": format!("Deleted template '{}'", existing.name)
    });
    audit::record(&pool, get_admin_id(&session).unwrap_or(0), "template.deleted", "template", template_id, details).await;

    set_flash(&session, &format!("Template '{}' deleted", existing.name));
    Ok(HttpResponse::Ok().finish())
}
