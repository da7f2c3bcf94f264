use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a blog post together with its tag names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Store-assigned identifier of the post.
    pub id: i32,
    /// Headline shown in listings.
    pub title: String,
    /// Body of the post.
    pub content: String,
    /// Free-form category label.
    pub category: String,
    /// Names of the tags attached to the post, sorted by name.
    pub tags: Vec<String>,
    /// Timestamp for when the post was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the post.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: String,
    /// Normalized, de-duplicated tag names.
    pub tags: Vec<String>,
}

impl NewPost {
    /// Build a new post payload with an empty tag list.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags: Vec::new(),
        }
    }

    /// Attach tag names to the payload.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }
}

/// Full replacement applied when updating an existing post.
///
/// The tag list replaces the stored set entirely; an empty list removes every tag.
/// `updated_at` is stamped by the repository when the update is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePost {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl UpdatePost {
    /// Create a replacement payload with an empty tag list.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags: Vec::new(),
        }
    }

    /// Replace the tag list carried by the payload.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }
}

/// Trim and collapse whitespace in tag names, dropping empty and repeated ones.
///
/// The first occurrence of a name wins, so the relative order of the input is kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();

    for tag in tags {
        let name = tag.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() || normalized.contains(&name) {
            continue;
        }
        normalized.push(name);
    }

    normalized
}
