use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::{AuthenticatedUser, Viewer};
use crate::domain::user::UpdateUser;
use crate::dto::profiles::ProfileDto;
use crate::forms::users::UserForm;
use crate::identity::remember;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    PageQuery, base_context, error_response, parse_form, profile_url, redirect, render_template,
};
use crate::services::ServiceError;
use crate::services::profiles::{
    get_own_profile, list_profile_posts, update_profile as update_profile_service,
};

#[get("/profile/edit/")]
pub async fn edit_profile_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match get_own_profile(&user, repo.get_ref()) {
        Ok(account) => {
            let form = UserForm::from(&account);
            let mut context = base_context(&flash_messages, &Viewer::from(user), "edit_profile");
            context.insert("form", &form);
            context.insert("profile", &ProfileDto::from(account));
            render_template(&tera, "blog/user.html", &context)
        }
        Err(err) => error_response(err, &tera),
    }
}

#[post("/profile/edit/")]
pub async fn update_profile(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<UserForm>,
) -> impl Responder {
    let result = parse_form::<_, UpdateUser>(form)
        .and_then(|payload| update_profile_service(payload, &user, repo.get_ref()));

    match result {
        Ok(identity) => {
            if let Err(e) = remember(&req, &identity) {
                log::error!("Failed to refresh session identity: {e}");
            }
            FlashMessage::success("Profile updated.").send();
            redirect(&profile_url(&identity.username))
        }
        Err(ServiceError::Form(message))
        | Err(ServiceError::TypeConstraint(message))
        | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/profile/edit/")
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/profile/{username}/")]
pub async fn profile(
    username: web::Path<String>,
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_profile_posts(
        &username,
        &viewer,
        query.request(),
        &server_config.listing,
        repo.get_ref(),
    ) {
        Ok((profile, page)) => {
            let mut context = base_context(&flash_messages, &viewer, "profile");
            context.insert("profile", &profile);
            context.insert("page_obj", &page);
            render_template(&tera, "blog/profile.html", &context)
        }
        Err(err) => error_response(err, &tera),
    }
}
