use actix_web::web;

pub mod posts;
pub mod tags;

/// Register every JSON endpoint on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(posts::list_posts)
        .service(posts::add_post)
        .service(posts::show_post)
        .service(posts::edit_post)
        .service(posts::remove_post)
        .service(tags::list_tags);
}
