use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::domain::auth::{AuthenticatedUser, Viewer};
use crate::forms::comments::CommentForm;
use crate::forms::posts::{PostForm, PostFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    PageQuery, base_context, error_response, parse_form, parse_submitted, post_detail_url, post_id,
    profile_url, redirect, render_template,
};
use crate::services::ServiceError;
use crate::services::ownership::Ownership;
use crate::services::posts::{
    create_post as create_post_service, delete_post as delete_post_service, get_post_for_edit,
    get_post_or_deny, list_category_posts, post_form_choices,
    update_post as update_post_service,
};

/// Context of the create/edit/delete post page.
fn post_form_context(
    flash_messages: &IncomingFlashMessages,
    viewer: &Viewer,
    form: &PostForm,
    repo: &DieselRepository,
) -> Result<Context, ServiceError> {
    let choices = post_form_choices(repo)?;
    let mut context = base_context(flash_messages, viewer, "create_post");
    context.insert("form", form);
    context.insert("categories", &choices.categories);
    context.insert("locations", &choices.locations);
    Ok(context)
}

#[get("/category/{category_slug}/")]
pub async fn category_posts(
    category_slug: web::Path<String>,
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_category_posts(
        &category_slug,
        &viewer,
        query.request(),
        &server_config.listing,
        repo.get_ref(),
    ) {
        Ok((category, page)) => {
            let mut context = base_context(&flash_messages, &viewer, "category");
            context.insert("category", &category);
            context.insert("page_obj", &page);
            render_template(&tera, "blog/category.html", &context)
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/posts/create/")]
pub async fn create_post_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let viewer = Viewer::from(user);
    match post_form_context(&flash_messages, &viewer, &PostForm::default(), &repo) {
        Ok(context) => render_template(&tera, "blog/create.html", &context),
        Err(err) => error_response(err, &tera),
    }
}

#[post("/posts/create/")]
pub async fn create_post(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<PostForm>,
) -> impl Responder {
    let result = parse_form::<_, PostFormPayload>(form)
        .and_then(|payload| create_post_service(payload, &user, repo.get_ref()));

    match result {
        Ok(_) => {
            FlashMessage::success("Post published.").send();
            redirect(&profile_url(&user.username))
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect("/posts/create/")
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/posts/{post_id}/")]
pub async fn post_detail(
    path: web::Path<i32>,
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let detail = post_id(path.into_inner())
        .and_then(|post_id| get_post_or_deny(post_id, &viewer, repo.get_ref()));

    match detail {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, &viewer, "post_detail");
            context.insert("post", &detail.post);
            context.insert("comments", &detail.comments);
            context.insert("is_author", &detail.is_author);
            if viewer.user().is_some() {
                context.insert("form", &CommentForm::default());
            }
            render_template(&tera, "blog/detail.html", &context)
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/posts/{post_id}/edit/")]
pub async fn edit_post_form(
    path: web::Path<i32>,
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let outcome = post_id(path.into_inner())
        .and_then(|post_id| get_post_for_edit(post_id, &viewer, repo.get_ref()));

    match outcome {
        Ok(Ownership::Authorized(post)) => {
            match post_form_context(&flash_messages, &viewer, &PostForm::from(&post), &repo) {
                Ok(mut context) => {
                    context.insert("post", &post);
                    render_template(&tera, "blog/create.html", &context)
                }
                Err(err) => error_response(err, &tera),
            }
        }
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(err) => error_response(err, &tera),
    }
}

#[post("/posts/{post_id}/edit/")]
pub async fn update_post(
    path: web::Path<i32>,
    viewer: Viewer,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    form: Option<web::Form<PostForm>>,
) -> impl Responder {
    let post_id = match post_id(path.into_inner()) {
        Ok(post_id) => post_id,
        Err(err) => return error_response(err, &tera),
    };

    let payload = parse_submitted::<_, PostFormPayload>(form);

    match update_post_service(post_id, payload, &viewer, repo.get_ref()) {
        Ok(Ownership::Authorized(post_id)) => redirect(&post_detail_url(post_id)),
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/posts/{post_id}/edit/"))
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/posts/{post_id}/delete/")]
pub async fn delete_post_form(
    path: web::Path<i32>,
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let outcome = post_id(path.into_inner())
        .and_then(|post_id| get_post_for_edit(post_id, &viewer, repo.get_ref()));

    match outcome {
        Ok(Ownership::Authorized(post)) => {
            let mut context = base_context(&flash_messages, &viewer, "delete_post");
            context.insert("form", &PostForm::from(&post));
            context.insert("post", &post);
            context.insert("delete", &true);
            render_template(&tera, "blog/create.html", &context)
        }
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(err) => error_response(err, &tera),
    }
}

#[post("/posts/{post_id}/delete/")]
pub async fn delete_post(
    path: web::Path<i32>,
    viewer: Viewer,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let outcome = post_id(path.into_inner())
        .and_then(|post_id| delete_post_service(post_id, &viewer, repo.get_ref()));

    match outcome {
        Ok(Ownership::Authorized(())) => {
            FlashMessage::success("Post deleted.").send();
            redirect("/")
        }
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(err) => error_response(err, &tera),
    }
}

