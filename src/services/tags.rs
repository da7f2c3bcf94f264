use crate::domain::tag::Tag;
use crate::repository::TagReader;
use crate::services::{ServiceError, ServiceResult};

/// Lists every known tag ordered by name.
pub fn load_tags<R>(repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader + ?Sized,
{
    repo.list_tags().map_err(ServiceError::from)
}
