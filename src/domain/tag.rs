use serde::{Deserialize, Serialize};

/// Domain representation of a tag shared by any number of posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Globally unique name of the tag.
    pub name: String,
}
