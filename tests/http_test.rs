//! End-to-end HTTP tests through the full actix app: auth gate, sign-in,
//! template creation and the builder's AJAX endpoints.

mod common;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use pagebuilder::config::AppConfig;
use pagebuilder::errors::AppError;
use pagebuilder::models::template;
use pagebuilder::{db, routes};
use common::{ADMIN_PASS, ADMIN_USER, add_component, component_type_id, create_template, setup_test_db};

fn test_config() -> web::Data<AppConfig> {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused".to_string()),
        _ => None,
    })
    .expect("config should build from defaults");
    web::Data::new(config)
}

macro_rules! test_app {
    ($pool:expr, $key:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), $key.clone())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($pool.clone()))
                .app_data(test_config())
                .configure(routes::configure),
        )
        .await
    };
}

/// Sign in as the seeded admin. Yields the session cookie and its CSRF token.
macro_rules! sign_in {
    ($app:expr) => {{
        let resp = test::call_service(&$app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&resp).expect("login page should set a session cookie");
        let body = test::read_body(resp).await;
        let csrf = extract_csrf(std::str::from_utf8(&body).unwrap());
        let req = test::TestRequest::post()
            .uri("/login")
            .cookie(cookie)
            .set_form([("username", ADMIN_USER), ("password", ADMIN_PASS), ("csrf_token", csrf.as_str())])
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        (session_cookie(&resp).expect("sign-in should renew the session cookie"), csrf)
    }};
}

/// POST a urlencoded form with the session cookie attached.
macro_rules! post_form {
    ($app:expr, $cookie:expr, $uri:expr, $form:expr) => {
        test::call_service(
            &$app,
            test::TestRequest::post()
                .uri(&$uri)
                .cookie($cookie.clone())
                .set_form($form)
                .to_request(),
        )
        .await
    };
}

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response().cookies().next().map(|c| c.into_owned())
}

fn extract_csrf(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker).expect("page should carry a CSRF token") + marker.len();
    let end = html[start..].find('"').expect("unterminated csrf value");
    html[start..start + end].to_string()
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_admin_scope_requires_sign_in() {
    let db = setup_test_db().await;
    let key = Key::generate();
    let app = test_app!(db.pool(), key);

    for path in ["/admin/pages/templates", "/admin/pages/templates/create", "/admin/pages/templates/1/build"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/login");
    }
}

#[actix_web::test]
async fn test_sign_in_create_and_build() {
    let db = setup_test_db().await;
    db::seed_admin(db.pool(), ADMIN_USER, ADMIN_PASS).await.unwrap();
    let key = Key::generate();
    let app = test_app!(db.pool(), key);

    // Login page hands out a CSRF token bound to the session cookie.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).expect("login page should set a session cookie");
    let body = test::read_body(resp).await;
    let csrf = extract_csrf(std::str::from_utf8(&body).unwrap());

    // Wrong password re-renders the form.
    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie.clone())
        .set_form([("username", ADMIN_USER), ("password", "nope"), ("csrf_token", csrf.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Invalid username or password"));

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie.clone())
        .set_form([("username", ADMIN_USER), ("password", ADMIN_PASS), ("csrf_token", csrf.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/pages/templates");
    let cookie = session_cookie(&resp).expect("sign-in should renew the session cookie");

    // Missing token is rejected before anything is written.
    let req = test::TestRequest::post()
        .uri("/admin/pages/templates")
        .cookie(cookie.clone())
        .set_form([("name", "No token"), ("csrf_token", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Validation failure re-renders the form.
    let req = test::TestRequest::post()
        .uri("/admin/pages/templates")
        .cookie(cookie.clone())
        .set_form([("name", "   "), ("csrf_token", csrf.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/admin/pages/templates")
        .cookie(cookie.clone())
        .set_form([("name", "Landing"), ("description", "Main page"), ("csrf_token", csrf.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let build_url = location(&resp);
    assert!(build_url.ends_with("/build"), "redirects to the builder, got {build_url}");
    let cookie = session_cookie(&resp).unwrap_or(cookie);

    let req = test::TestRequest::get().uri(&build_url).cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Landing"));
    assert!(html.contains("/sections/reorder"));

    // Add a section through the builder endpoint; the response is its fragment.
    let base = build_url.trim_end_matches("/build").to_string();
    let req = test::TestRequest::post()
        .uri(&format!("{base}/sections"))
        .cookie(cookie.clone())
        .set_form([("csrf_token", csrf.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Untitled section"));

    // Garbage reorder ids are a 400, an empty payload is a no-op.
    let req = test::TestRequest::post()
        .uri(&format!("{base}/sections/reorder"))
        .cookie(cookie.clone())
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(format!("data%5B%5D=abc&csrf_token={csrf}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/sections/reorder"))
        .cookie(cookie.clone())
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(format!("csrf_token={csrf}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Unknown template is a 404.
    let req = test::TestRequest::get()
        .uri("/admin/pages/templates/999999/build")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

// ────────────────────────────────────────────────────────────────────
// Component endpoints
// ────────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_component_endpoints() {
    let db = setup_test_db().await;
    let pool = db.pool();
    db::seed_admin(pool, ADMIN_USER, ADMIN_PASS).await.unwrap();
    let key = Key::generate();
    let app = test_app!(pool, key);
    let (cookie, csrf) = sign_in!(app);
    let csrf = csrf.as_str();

    let id = create_template(pool, "Signup").await;
    let section = template::add_empty_section(pool, id).await.unwrap();
    let base = format!("/admin/pages/templates/{id}");
    let section_id = section.id.to_string();
    let image_type = component_type_id(pool, "image").await.to_string();
    let paragraph_type = component_type_id(pool, "paragraph").await.to_string();

    // No title given: the catalog label is used.
    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components"),
        [("section_id", section_id.as_str()), ("component_type_id", image_type.as_str()), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    let components = template::find_components_for_template(pool, id).await.unwrap();
    assert_eq!(components.len(), 1);
    let image = components[0].id;
    assert_eq!(components[0].title, "Image");
    assert!(html.contains(&format!(r#"id="cp_{image}""#)));

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components"),
        [("section_id", section_id.as_str()), ("component_type_id", "999999"), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "unknown component type");

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components"),
        [
            ("section_id", section_id.as_str()),
            ("component_type_id", paragraph_type.as_str()),
            ("options", "{bad json"),
            ("csrf_token", csrf),
        ]
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "malformed options on add");
    assert_eq!(template::find_components_for_template(pool, id).await.unwrap().len(), 1);

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components"),
        [
            ("section_id", section_id.as_str()),
            ("component_type_id", paragraph_type.as_str()),
            ("title", "Bio"),
            ("csrf_token", csrf),
        ]
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let paragraph = template::find_components_for_template(pool, id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.type_name == "paragraph")
        .expect("paragraph should be stored");
    assert_eq!(paragraph.title, "Bio");
    assert_eq!(paragraph.sort_order, 1);
    let paragraph = paragraph.id;

    // Reorder from a raw body with canvas ids.
    let req = test::TestRequest::post()
        .uri(&format!("{base}/components/reorder"))
        .cookie(cookie.clone())
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(format!("data%5B%5D=cp_{paragraph}&data%5B%5D=cp_{image}&csrf_token={csrf}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(template::find_component(pool, paragraph).await.unwrap().sort_order, 0);
    assert_eq!(template::find_component(pool, image).await.unwrap().sort_order, 1);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/components/reorder"))
        .cookie(cookie.clone())
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(format!("data%5B%5D=cp_x&csrf_token={csrf}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    // Options: a broken object is rejected, plain text is kept byte for byte.
    let image_pk = image.to_string();
    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components/options"),
        [("pk", image_pk.as_str()), ("value", "{\"src\": 42"), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components/options"),
        [("pk", image_pk.as_str()), ("value", "hero.jpg  "), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template::find_component(pool, image).await.unwrap().options, "hero.jpg  ");

    // A component of this template addressed through another template.
    let other = create_template(pool, "Other").await;
    let resp = post_form!(
        app,
        cookie,
        format!("/admin/pages/templates/{other}/components/options"),
        [("pk", image_pk.as_str()), ("value", "stolen.jpg"), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(template::find_component(pool, image).await.unwrap().options, "hero.jpg  ");

    let paragraph_pk = paragraph.to_string();
    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components/title"),
        [("pk", paragraph_pk.as_str()), ("value", "Biography"), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template::find_component(pool, paragraph).await.unwrap().title, "Biography");

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components/delete"),
        [("id", image_pk.as_str()), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(matches!(template::find_component(pool, image).await, Err(AppError::NotFound)));

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/components/delete"),
        [("id", image_pk.as_str()), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ────────────────────────────────────────────────────────────────────
// Section, form preview and template delete endpoints
// ────────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_section_preview_and_delete_endpoints() {
    let db = setup_test_db().await;
    let pool = db.pool();
    db::seed_admin(pool, ADMIN_USER, ADMIN_PASS).await.unwrap();
    let key = Key::generate();
    let app = test_app!(pool, key);
    let (cookie, csrf) = sign_in!(app);
    let csrf = csrf.as_str();

    let id = create_template(pool, "Survey").await;
    let section = template::add_empty_section(pool, id).await.unwrap();
    let field = add_component(pool, id, section.id, "paragraph", "Comments").await;
    template::update_component_options(pool, id, field, r#"{"placeholder": "Anything else?", "required": true}"#)
        .await
        .unwrap();
    let base = format!("/admin/pages/templates/{id}");
    let section_pk = section.id.to_string();

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/sections/title"),
        [("pk", section_pk.as_str()), ("value", "Feedback"), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template::find_section(pool, section.id).await.unwrap().title, "Feedback");

    let req = test::TestRequest::get().uri(&format!("{base}/form")).cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Feedback"));
    assert!(html.contains("Comments"));
    assert!(html.contains("Anything else?"));

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/sections/delete"),
        [("id", section_pk.as_str()), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(template::find_sections_by_order(pool, id).await.unwrap().is_empty());
    assert!(matches!(template::find_component(pool, field).await, Err(AppError::NotFound)));

    let resp = post_form!(
        app,
        cookie,
        format!("{base}/sections/delete"),
        [("id", section_pk.as_str()), ("csrf_token", csrf)]
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The builder page offers a delete control wired to the delete URL.
    let req = test::TestRequest::get().uri(&format!("{base}/build")).cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains(r#"id="delete-template""#));
    assert!(html.contains(&format!(r#"data-delete-template-url="{base}/delete""#)));

    let resp = post_form!(app, cookie, format!("{base}/delete"), [("csrf_token", csrf)]);
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(matches!(template::find(pool, id).await, Err(AppError::NotFound)));

    let req = test::TestRequest::get().uri(&format!("{base}/build")).cookie(cookie.clone()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
