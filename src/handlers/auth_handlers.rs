use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, password, session};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::admin;
use crate::routes;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_form(session: &Session, config: &AppConfig, username: &str, error: Option<&str>) -> Result<HttpResponse, AppError> {
    render(LoginTemplate {
        error: error.map(str::to_string),
        app_name: config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
        username: username.to_string(),
    })
}

/// GET /login
pub async fn login_page(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    if session::is_signed_in(&session) {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", routes::templates_index()))
            .finish());
    }
    login_form(&session, &config, "", None)
}

/// POST /login
pub async fn login_submit(
    pool: web::Data<PgPool>,
    session: Session,
    config: web::Data<AppConfig>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let found = admin::find_by_username(&pool, &form.username).await?;
    let verified = match &found {
        Some(a) => password::verify_password(&form.password, &a.password_hash).map_err(AppError::Hash)?,
        None => false,
    };

    match found {
        Some(a) if verified => {
            session::sign_in(&session, a.id, &a.username)?;
            log::info!("Admin '{}' signed in", a.username);
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", routes::templates_index()))
                .finish())
        }
        _ => {
            log::warn!("Failed sign-in attempt for '{}'", form.username.trim());
            login_form(&session, &config, &form.username, Some("Invalid username or password"))
        }
    }
}

/// POST /logout
pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}
