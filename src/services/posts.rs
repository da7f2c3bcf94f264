use serde::Deserialize;

use crate::domain::post::Post;
use crate::forms::posts::PostPayload;
use crate::repository::{PostReader, PostWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the posts listing.
#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    /// Optional substring matched against title, content and category.
    pub term: Option<String>,
}

/// Lists posts, narrowing to a search when a non-empty term is supplied.
pub fn load_posts<R>(repo: &R, query: PostQuery) -> ServiceResult<Vec<Post>>
where
    R: PostReader + ?Sized,
{
    match query.term.as_deref() {
        Some(term) if !term.is_empty() => repo.search_posts(term).map_err(ServiceError::from),
        _ => repo.list_posts().map_err(ServiceError::from),
    }
}

/// Fetches a single post with its tags.
pub fn load_post<R>(repo: &R, post_id: i32) -> ServiceResult<Post>
where
    R: PostReader + ?Sized,
{
    repo.get_post_by_id(post_id).map_err(|err| {
        if err.is_not_found() {
            log::debug!("post {post_id} requested but not found");
        }
        ServiceError::from(err)
    })
}

/// Validates the payload and stores a new post.
pub fn create_post<R>(repo: &R, payload: PostPayload) -> ServiceResult<Post>
where
    R: PostWriter + ?Sized,
{
    let new_post = payload
        .into_new_post()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_post(&new_post).map_err(ServiceError::from)
}

/// Validates the payload and replaces the stored post, tags included.
pub fn update_post<R>(repo: &R, post_id: i32, payload: PostPayload) -> ServiceResult<Post>
where
    R: PostWriter + ?Sized,
{
    let update = payload
        .into_update_post()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_post(post_id, &update)
        .map_err(ServiceError::from)
}

/// Deletes a post. Missing posts are not an error.
pub fn delete_post<R>(repo: &R, post_id: i32) -> ServiceResult<()>
where
    R: PostWriter + ?Sized,
{
    repo.delete_post(post_id).map_err(ServiceError::from)
}
