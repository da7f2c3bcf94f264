use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::post::{NewPost, UpdatePost};

/// Maximum allowed length for a post title.
const TITLE_MAX_LEN: u64 = 255;
/// Maximum allowed length for a category and for each tag name.
const LABEL_MAX_LEN: usize = 100;
const LABEL_MAX_LEN_VALIDATOR: u64 = LABEL_MAX_LEN as u64;

/// Result type returned by the post form helpers.
pub type PostFormResult<T> = Result<T, PostFormError>;

/// Errors that can occur while processing post payloads.
#[derive(Debug, Error)]
pub enum PostFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A required field is empty after sanitization.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// JSON body accepted when creating or replacing a post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostPayload {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(min = 1, max = LABEL_MAX_LEN_VALIDATOR))]
    pub category: String,
    /// Tag names; omitted means no tags.
    #[serde(default)]
    #[validate(custom(function = "validate_tag_names"))]
    pub tags: Vec<String>,
}

impl PostPayload {
    /// Validates and sanitizes the payload into a domain `NewPost`.
    pub fn into_new_post(self) -> PostFormResult<NewPost> {
        let (title, content, category) = self.sanitized_fields()?;
        Ok(NewPost::new(title, content, category).with_tags(&self.tags))
    }

    /// Validates and sanitizes the payload into a domain `UpdatePost`.
    pub fn into_update_post(self) -> PostFormResult<UpdatePost> {
        let (title, content, category) = self.sanitized_fields()?;
        Ok(UpdatePost::new(title, content, category).with_tags(&self.tags))
    }

    fn sanitized_fields(&self) -> PostFormResult<(String, String, String)> {
        self.validate()?;

        let title = sanitize_inline_text(&self.title);
        if title.is_empty() {
            return Err(PostFormError::EmptyField("title"));
        }

        let content = self.content.trim().to_string();
        if content.is_empty() {
            return Err(PostFormError::EmptyField("content"));
        }

        let category = sanitize_inline_text(&self.category);
        if category.is_empty() {
            return Err(PostFormError::EmptyField("category"));
        }

        Ok((title, content, category))
    }
}

fn validate_tag_names(tags: &[String]) -> Result<(), ValidationError> {
    if tags
        .iter()
        .any(|tag| tag.trim().chars().count() > LABEL_MAX_LEN)
    {
        return Err(ValidationError::new("tag_too_long"));
    }
    Ok(())
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}
