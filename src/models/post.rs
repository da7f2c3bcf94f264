use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{
    NewPost as DomainNewPost, Post as DomainPost, UpdatePost as DomainUpdatePost,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewPost<'a> {
    /// Build an insertable row whose timestamps both equal `now`.
    pub fn from_domain(value: &'a DomainNewPost, now: NaiveDateTime) -> Self {
        Self {
            title: value.title.as_str(),
            content: value.content.as_str(),
            category: value.category.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
pub struct UpdatePost<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<(Post, Vec<String>)> for DomainPost {
    fn from((post, tags): (Post, Vec<String>)) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            category: post.category,
            tags,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl<'a> UpdatePost<'a> {
    /// Build a changeset that refreshes `updated_at` to `now`.
    pub fn from_domain(value: &'a DomainUpdatePost, now: NaiveDateTime) -> Self {
        Self {
            title: value.title.as_str(),
            content: value.content.as_str(),
            category: value.category.as_str(),
            updated_at: now,
        }
    }
}
