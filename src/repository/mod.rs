use crate::db::{DbConnection, DbPool};
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::tag::Tag;

pub mod errors;
pub mod post;
pub mod tag;

#[cfg(test)]
pub mod mock;

pub use errors::{OperationContext, RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self, context: OperationContext) -> RepositoryResult<DbConnection> {
        self.pool
            .get()
            .map_err(|err| RepositoryError::from_pool(context, err))
    }
}

/// Read-only operations over posts. Every returned post has its tags loaded.
pub trait PostReader {
    /// Fetch a single post, failing with [`RepositoryError::NotFound`] when absent.
    fn get_post_by_id(&self, id: i32) -> RepositoryResult<Post>;
    /// List every post ordered by id.
    fn list_posts(&self) -> RepositoryResult<Vec<Post>>;
    /// List posts whose title, content or category contains `term`, ignoring ASCII case.
    fn search_posts(&self, term: &str) -> RepositoryResult<Vec<Post>>;
}

/// Write operations over posts and their tag associations.
pub trait PostWriter {
    fn create_post(&self, new_post: &NewPost) -> RepositoryResult<Post>;
    /// Overwrite the post and replace its tag set. Fails with
    /// [`RepositoryError::NotFound`] when no post has `post_id`.
    fn update_post(&self, post_id: i32, updates: &UpdatePost) -> RepositoryResult<Post>;
    /// Delete the post. Deleting a missing post succeeds.
    fn delete_post(&self, post_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over tag records.
pub trait TagReader {
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
}
