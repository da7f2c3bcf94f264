use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::forms::posts::PostPayload;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::posts::{
    PostQuery, create_post, delete_post, load_post, load_posts, update_post,
};

fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => {
            HttpResponse::NotFound().json(json!({ "error": "Post not found" }))
        }
        ServiceError::Form(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::Internal(err) => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Internal server error" }))
        }
    }
}

#[get("/posts")]
/// Return every post, or only those matching `?term=` when it is present.
pub async fn list_posts(
    params: web::Query<PostQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_posts(repo.get_ref(), params.into_inner()) {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => error_response(err, "list posts"),
    }
}

#[post("/posts")]
pub async fn add_post(
    repo: web::Data<DieselRepository>,
    payload: web::Json<PostPayload>,
) -> impl Responder {
    match create_post(repo.get_ref(), payload.into_inner()) {
        Ok(post) => HttpResponse::Created().json(post),
        Err(err) => error_response(err, "create post"),
    }
}

#[get("/posts/{post_id}")]
pub async fn show_post(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let post_id = path.into_inner();

    match load_post(repo.get_ref(), post_id) {
        Ok(post) => HttpResponse::Ok().json(post),
        Err(err) => error_response(err, &format!("load post {post_id}")),
    }
}

#[put("/posts/{post_id}")]
/// Replace the post's fields and its whole tag set.
pub async fn edit_post(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    payload: web::Json<PostPayload>,
) -> impl Responder {
    let post_id = path.into_inner();

    match update_post(repo.get_ref(), post_id, payload.into_inner()) {
        Ok(post) => HttpResponse::Ok().json(post),
        Err(err) => error_response(err, &format!("update post {post_id}")),
    }
}

#[delete("/posts/{post_id}")]
pub async fn remove_post(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let post_id = path.into_inner();

    match delete_post(repo.get_ref(), post_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &format!("delete post {post_id}")),
    }
}
