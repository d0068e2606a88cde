//! Post and version types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::variables::{
    deserialize_optional_variables, deserialize_variables, double_option,
};
use crate::template::Variables;

/// Publication state of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{}'", other)),
        }
    }
}

/// A blog post at its current version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,

    /// URL path segment under /blog
    pub slug: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// HTML body, rendered through the template pipeline on display
    pub content: String,

    /// Placeholder values for `content`
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,

    pub status: PostStatus,

    /// Current version number, starting at 1
    pub version: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Set on first publish and kept afterwards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Snapshot the content-bearing fields as a history entry
    pub fn snapshot(&self, note: Option<String>) -> PostVersion {
        PostVersion {
            post_id: self.id,
            version: self.version,
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            variables: self.variables.clone(),
            note,
            created_at: self.updated_at,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// An immutable entry in a post's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostVersion {
    pub post_id: Uuid,
    pub version: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a post
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,

    /// Derived from the title when omitted
    pub slug: Option<String>,

    pub excerpt: Option<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,

    /// Recorded on the first version
    pub note: Option<String>,
}

/// Request to update a post; absent fields are left alone
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,

    pub slug: Option<String>,

    /// Use null to clear
    #[serde(default, deserialize_with = "double_option")]
    pub excerpt: Option<Option<String>>,

    pub content: Option<String>,

    /// Replaces the whole variable set when present
    #[serde(default, deserialize_with = "deserialize_optional_variables")]
    pub variables: Option<Variables>,

    /// Recorded on the version this update creates
    pub note: Option<String>,
}

/// Response for listing posts
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub total: usize,
}

/// Response for a post's history
#[derive(Debug, Serialize)]
pub struct PostVersionListResponse {
    pub post_id: Uuid,
    pub versions: Vec<PostVersion>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Published".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert_eq!("draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert!("archived".parse::<PostStatus>().is_err());
        assert_eq!(PostStatus::Published.to_string(), "published");
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_value(PostStatus::Draft).unwrap(), json!("draft"));
    }

    #[test]
    fn test_update_request_distinguishes_null() {
        let req: UpdatePostRequest = serde_json::from_value(json!({"excerpt": null})).unwrap();
        assert_eq!(req.excerpt, Some(None));

        let req: UpdatePostRequest = serde_json::from_value(json!({"title": "New"})).unwrap();
        assert!(req.excerpt.is_none());
        assert!(req.variables.is_none());
    }
}
