use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::domain::auth::Viewer;
use crate::domain::types::{CommentId, PostId};
use crate::pagination::PageRequest;
use crate::services::{ServiceError, ServiceResult};

pub mod auth;
pub mod comments;
pub mod main;
pub mod pages;
pub mod posts;
pub mod profiles;

/// `?page=` query string of listing pages. Kept as text so that malformed
/// values reach the paginator instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    viewer: &Viewer,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &viewer.user());
    context.insert("current_page", current_page);
    context
}

pub fn not_found(tera: &Tera) -> HttpResponse {
    let body = tera
        .render("errors/404.html", &Context::new())
        .unwrap_or_else(|e| {
            log::error!("Failed to render template 'errors/404.html': {e}");
            String::new()
        });
    HttpResponse::NotFound().body(body)
}

/// Response for service failures that have no page-specific handling.
pub fn error_response(err: ServiceError, tera: &Tera) -> HttpResponse {
    match err {
        ServiceError::NotFound => not_found(tera),
        err => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Convert a submitted form into its validated payload.
pub fn parse_form<F, P>(form: F) -> ServiceResult<P>
where
    P: TryFrom<F>,
    ServiceError: From<P::Error>,
{
    P::try_from(form).map_err(ServiceError::from)
}

/// Validate a form body that may have failed to decode. Handlers behind the
/// ownership guard take their body this way so the guard still runs.
pub fn parse_submitted<F, P>(form: Option<web::Form<F>>) -> ServiceResult<P>
where
    P: TryFrom<F>,
    ServiceError: From<P::Error>,
{
    match form {
        Some(web::Form(form)) => parse_form(form),
        None => Err(ServiceError::Form(
            "The submitted form could not be read.".to_string(),
        )),
    }
}

/// Post id from a URL segment; non-positive ids never exist.
pub fn post_id(raw: i32) -> ServiceResult<PostId> {
    PostId::new(raw).map_err(|_| ServiceError::NotFound)
}

pub fn comment_id(raw: i32) -> ServiceResult<CommentId> {
    CommentId::new(raw).map_err(|_| ServiceError::NotFound)
}

pub fn post_detail_url(post_id: PostId) -> String {
    format!("/posts/{post_id}/")
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

/// Register every route. Literal segments are registered before the
/// parameterized paths they would otherwise be captured by.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::index)
        .service(posts::category_posts)
        .service(posts::create_post_form)
        .service(posts::create_post)
        .service(posts::post_detail)
        .service(posts::edit_post_form)
        .service(posts::update_post)
        .service(posts::delete_post_form)
        .service(posts::delete_post)
        .service(comments::add_comment)
        .service(comments::edit_comment_form)
        .service(comments::update_comment)
        .service(comments::delete_comment_form)
        .service(comments::delete_comment)
        .service(profiles::edit_profile_form)
        .service(profiles::update_profile)
        .service(profiles::profile)
        .service(auth::registration_form)
        .service(auth::register)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout)
        .service(pages::about)
        .service(pages::rules);
}
