use diesel::prelude::*;

use crate::domain::post_tag::PostTag as DomainPostTag;

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable, Insertable)]
#[diesel(
    table_name = crate::schema::post_tags,
    primary_key(post_id, tag_id),
    belongs_to(super::post::Post, foreign_key = post_id),
    belongs_to(super::tag::Tag, foreign_key = tag_id)
)]
pub struct PostTag {
    pub post_id: i32,
    pub tag_id: i32,
}

impl From<&DomainPostTag> for PostTag {
    fn from(value: &DomainPostTag) -> Self {
        Self {
            post_id: value.post_id,
            tag_id: value.tag_id,
        }
    }
}
