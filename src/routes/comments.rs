use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::{AuthenticatedUser, Viewer};
use crate::forms::comments::{CommentForm, CommentFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, comment_id, error_response, parse_form, parse_submitted, post_detail_url, post_id,
    redirect, render_template,
};
use crate::services::ServiceError;
use crate::services::comments::{
    create_comment, delete_comment as delete_comment_service, get_comment_for_edit,
    update_comment as update_comment_service,
};
use crate::services::ownership::Ownership;

#[post("/posts/{post_id}/comment/")]
pub async fn add_comment(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CommentForm>,
) -> impl Responder {
    let post_id = match post_id(path.into_inner()) {
        Ok(post_id) => post_id,
        Err(err) => return error_response(err, &tera),
    };

    let result = parse_form::<_, CommentFormPayload>(form)
        .and_then(|payload| create_comment(post_id, &user, payload, repo.get_ref()));

    match result {
        Ok(_) => redirect(&post_detail_url(post_id)),
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect(&post_detail_url(post_id))
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/posts/{post_id}/edit_comment/{comment_id}/")]
pub async fn edit_comment_form(
    path: web::Path<(i32, i32)>,
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let outcome = post_id(raw_post_id).and_then(|post_id| {
        let comment_id = comment_id(raw_comment_id)?;
        get_comment_for_edit(post_id, comment_id, &viewer, repo.get_ref())
    });

    match outcome {
        Ok(Ownership::Authorized(comment)) => {
            let mut context = base_context(&flash_messages, &viewer, "edit_comment");
            context.insert(
                "form",
                &CommentForm {
                    text: comment.text.to_string(),
                },
            );
            context.insert("comment", &comment);
            render_template(&tera, "blog/comment.html", &context)
        }
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(err) => error_response(err, &tera),
    }
}

#[post("/posts/{post_id}/edit_comment/{comment_id}/")]
pub async fn update_comment(
    path: web::Path<(i32, i32)>,
    viewer: Viewer,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    form: Option<web::Form<CommentForm>>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let ids = post_id(raw_post_id).and_then(|post_id| Ok((post_id, comment_id(raw_comment_id)?)));
    let (post_id, comment_id) = match ids {
        Ok(ids) => ids,
        Err(err) => return error_response(err, &tera),
    };

    let payload = parse_submitted::<_, CommentFormPayload>(form);

    match update_comment_service(post_id, comment_id, payload, &viewer, repo.get_ref()) {
        Ok(Ownership::Authorized(_)) => redirect(&post_detail_url(post_id)),
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/posts/{post_id}/edit_comment/{comment_id}/"))
        }
        Err(err) => error_response(err, &tera),
    }
}

#[get("/posts/{post_id}/delete_comment/{comment_id}/")]
pub async fn delete_comment_form(
    path: web::Path<(i32, i32)>,
    viewer: Viewer,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let outcome = post_id(raw_post_id).and_then(|post_id| {
        let comment_id = comment_id(raw_comment_id)?;
        get_comment_for_edit(post_id, comment_id, &viewer, repo.get_ref())
    });

    match outcome {
        Ok(Ownership::Authorized(comment)) => {
            let mut context = base_context(&flash_messages, &viewer, "delete_comment");
            context.insert("comment", &comment);
            render_template(&tera, "blog/comment.html", &context)
        }
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(err) => error_response(err, &tera),
    }
}

#[post("/posts/{post_id}/delete_comment/{comment_id}/")]
pub async fn delete_comment(
    path: web::Path<(i32, i32)>,
    viewer: Viewer,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let ids = post_id(raw_post_id).and_then(|post_id| Ok((post_id, comment_id(raw_comment_id)?)));
    let (post_id, comment_id) = match ids {
        Ok(ids) => ids,
        Err(err) => return error_response(err, &tera),
    };

    match delete_comment_service(post_id, comment_id, &viewer, repo.get_ref()) {
        Ok(Ownership::Authorized(())) => redirect(&post_detail_url(post_id)),
        Ok(Ownership::Unauthorized { redirect_to }) => redirect(&redirect_to.url()),
        Err(err) => error_response(err, &tera),
    }
}
