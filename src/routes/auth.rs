use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::Viewer;
use crate::forms::users::{LoginForm, LoginFormPayload, RegistrationForm, RegistrationFormPayload};
use crate::identity::{LOGIN_URL, forget, remember};
use crate::repository::DieselRepository;
use crate::routes::{base_context, error_response, parse_form, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{login as login_service, register as register_service};

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[get("/auth/registration/")]
pub async fn registration_form(
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &viewer, "registration");
    render_template(&tera, "registration/registration_form.html", &context)
}

#[post("/auth/registration/")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegistrationForm>,
) -> impl Responder {
    let result = parse_form::<_, RegistrationFormPayload>(form)
        .and_then(|payload| register_service(payload, repo.get_ref()));

    match result {
        Ok(_) => {
            FlashMessage::success("Account created. You can log in now.").send();
            redirect(LOGIN_URL)
        }
        Err(ServiceError::Form(message))
        | Err(ServiceError::TypeConstraint(message))
        | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/auth/registration/")
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/auth/login/")]
pub async fn login_form(
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    query: web::Query<NextQuery>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, &viewer, "login");
    context.insert("next", &query.next);
    render_template(&tera, "registration/login.html", &context)
}

#[post("/auth/login/")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match parse_form(form) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(LOGIN_URL);
        }
    };

    match login_service(&payload, repo.get_ref()) {
        Ok(user) => {
            if let Err(e) = remember(&req, &user) {
                log::error!("Failed to attach session identity: {e}");
                return error_response(ServiceError::Internal, &tera);
            }
            redirect(payload.next.as_deref().unwrap_or("/"))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Please enter a correct username and password.").send();
            redirect(LOGIN_URL)
        }
        Err(err) => error_response(err, &tera),
    }
}

#[post("/auth/logout/")]
pub async fn logout(req: HttpRequest) -> impl Responder {
    forget(&req);
    redirect("/")
}
