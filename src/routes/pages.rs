use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::Viewer;
use crate::routes::{base_context, render_template};

#[get("/pages/about/")]
pub async fn about(
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &viewer, "about");
    render_template(&tera, "pages/about.html", &context)
}

#[get("/pages/rules/")]
pub async fn rules(
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &viewer, "rules");
    render_template(&tera, "pages/rules.html", &context)
}
