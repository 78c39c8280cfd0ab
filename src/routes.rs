use actix_web::{HttpResponse, web};

use crate::auth;
use crate::handlers::{auth_handlers, template_handlers};

pub const TEMPLATES_BASE: &str = "/admin/pages/templates";

pub fn templates_index() -> String {
    TEMPLATES_BASE.to_string()
}

pub fn template_create() -> String {
    format!("{TEMPLATES_BASE}/create")
}

pub fn template_build(template_id: i64) -> String {
    format!("{TEMPLATES_BASE}/{template_id}/build")
}

pub fn template_form(template_id: i64) -> String {
    format!("{TEMPLATES_BASE}/{template_id}/form")
}

/// Action URLs embedded in the builder page for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderUrls {
    pub build: String,
    pub form_preview: String,
    pub add_section: String,
    pub update_section_title: String,
    pub reorder_sections: String,
    pub delete_section: String,
    pub add_component: String,
    pub update_component_title: String,
    pub update_component_options: String,
    pub reorder_components: String,
    pub delete_component: String,
    pub delete_template: String,
}

impl BuilderUrls {
    pub fn for_template(template_id: i64) -> Self {
        let base = format!("{TEMPLATES_BASE}/{template_id}");
        Self {
            build: template_build(template_id),
            form_preview: template_form(template_id),
            add_section: format!("{base}/sections"),
            update_section_title: format!("{base}/sections/title"),
            reorder_sections: format!("{base}/sections/reorder"),
            delete_section: format!("{base}/sections/delete"),
            add_component: format!("{base}/components"),
            update_component_title: format!("{base}/components/title"),
            update_component_options: format!("{base}/components/options"),
            reorder_components: format!("{base}/components/reorder"),
            delete_component: format!("{base}/components/delete"),
            delete_template: format!("{base}/delete"),
        }
    }
}

/// Register every route. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/logout", web::post().to(auth_handlers::logout))
        .route(
            "/",
            web::get().to(|| async {
                HttpResponse::SeeOther()
                    .insert_header(("Location", templates_index()))
                    .finish()
            }),
        )
        .service(
            web::scope(TEMPLATES_BASE)
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                // /create BEFORE /{id}/... to keep the literal segment unambiguous
                .route("", web::get().to(template_handlers::pages::index))
                .route("", web::post().to(template_handlers::pages::store))
                .route("/create", web::get().to(template_handlers::pages::create))
                .route("/{id}/build", web::get().to(template_handlers::pages::build))
                .route("/{id}/form", web::get().to(template_handlers::pages::form_preview))
                .route("/{id}/delete", web::post().to(template_handlers::pages::destroy))
                .route("/{id}/sections", web::post().to(template_handlers::sections::store))
                .route("/{id}/sections/title", web::post().to(template_handlers::sections::update_title))
                .route("/{id}/sections/reorder", web::post().to(template_handlers::sections::reorder))
                .route("/{id}/sections/delete", web::post().to(template_handlers::sections::destroy))
                .route("/{id}/components", web::post().to(template_handlers::components::store))
                .route("/{id}/components/title", web::post().to(template_handlers::components::update_title))
                .route("/{id}/components/options", web::post().to(template_handlers::components::update_options))
                .route("/{id}/components/reorder", web::post().to(template_handlers::components::reorder))
                .route("/{id}/components/delete", web::post().to(template_handlers::components::destroy)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_urls_are_scoped_to_template() {
        let urls = BuilderUrls::for_template(42);
        assert_eq!(urls.build, "/admin/pages/templates/42/build");
        assert_eq!(urls.add_section, "/admin/pages/templates/42/sections");
        assert_eq!(urls.reorder_sections, "/admin/pages/templates/42/sections/reorder");
        assert_eq!(urls.add_component, "/admin/pages/templates/42/components");
        assert_eq!(urls.reorder_components, "/admin/pages/templates/42/components/reorder");
        assert_eq!(urls.delete_template, "/admin/pages/templates/42/delete");
    }
}
