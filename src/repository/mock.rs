use mockall::mock;

use super::{PostReader, PostWriter, TagReader};
use crate::domain::{
    post::{NewPost, Post, UpdatePost},
    tag::Tag,
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub PostReader {}

    impl PostReader for PostReader {
        fn get_post_by_id(&self, id: i32) -> RepositoryResult<Post>;
        fn list_posts(&self) -> RepositoryResult<Vec<Post>>;
        fn search_posts(&self, term: &str) -> RepositoryResult<Vec<Post>>;
    }
}

mock! {
    pub PostWriter {}

    impl PostWriter for PostWriter {
        fn create_post(&self, new_post: &NewPost) -> RepositoryResult<Post>;
        fn update_post(&self, post_id: i32, updates: &UpdatePost) -> RepositoryResult<Post>;
        fn delete_post(&self, post_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }
}
