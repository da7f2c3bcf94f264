use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::repository::DieselRepository;
use crate::services::tags::load_tags;

#[get("/tags")]
pub async fn list_tags(repo: web::Data<DieselRepository>) -> impl Responder {
    match load_tags(repo.get_ref()) {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(err) => {
            log::error!("Failed to list tags: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "Internal server error" }))
        }
    }
}
