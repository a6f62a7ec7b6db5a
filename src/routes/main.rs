use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::Viewer;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{PageQuery, base_context, error_response, not_found, render_template};
use crate::services::posts::list_visible_posts;

#[get("/")]
pub async fn index(
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_visible_posts(
        &viewer,
        query.request(),
        &server_config.listing,
        repo.get_ref(),
    ) {
        Ok(page) => {
            let mut context = base_context(&flash_messages, &viewer, "index");
            context.insert("page_obj", &page);
            render_template(&tera, "blog/index.html", &context)
        }
        Err(err) => error_response(err, &tera),
    }
}

/// Fallback for unmatched paths.
pub async fn not_found_page(tera: web::Data<Tera>) -> HttpResponse {
    not_found(&tera)
}
