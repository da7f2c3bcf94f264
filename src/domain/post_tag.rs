/// Association linking a post to a tag record.
#[derive(Debug, Clone, Copy)]
pub struct PostTag {
    /// Identifier of the post the tag is attached to.
    pub post_id: i32,
    /// Identifier of the referenced tag record.
    pub tag_id: i32,
}

impl PostTag {
    /// Construct a new association between a post and a tag.
    pub fn new(post_id: i32, tag_id: i32) -> Self {
        Self { post_id, tag_id }
    }
}
