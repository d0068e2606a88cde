//! Subscriber types and input normalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted email address.
pub const MAX_EMAIL_LEN: usize = 254;

/// Longest accepted audience tag.
pub const MAX_TAG_LEN: usize = 64;

/// A newsletter subscriber and the audience segments they belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Lower-cased address, the subscriber's identity
    pub email: String,

    /// Audience tags driving `{{#if tag_X}}` blocks
    #[serde(default)]
    pub tags: Vec<String>,

    pub subscribed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to subscribe (public endpoint)
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Result of a subscribe call
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub subscriber: Subscriber,
    /// False when the address was already subscribed
    pub created: bool,
}

/// Request to replace a subscriber's tags
#[derive(Debug, Deserialize)]
pub struct SetTagsRequest {
    pub tags: Vec<String>,
}

/// Response for listing subscribers
#[derive(Debug, Serialize)]
pub struct SubscriberListResponse {
    pub subscribers: Vec<Subscriber>,
    pub total: usize,
}

/// Trim and lower-case an email address, then check its shape.
pub fn normalize_email(email: &str) -> Result<String, String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email must be 1-{} characters", MAX_EMAIL_LEN));
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Email must not contain whitespace".to_string());
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("Email must contain exactly one '@'".to_string());
    };

    if local.is_empty() {
        return Err("Email is missing the part before '@'".to_string());
    }

    if domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(format!("Invalid email domain '{}'", domain));
    }

    Ok(email)
}

/// Trim tags, drop blanks and case-insensitive duplicates.
///
/// The first spelling of a tag wins.
pub fn normalize_tags<I, S>(tags: I) -> Result<Vec<String>, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();

    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(format!("Tag must be at most {} characters", MAX_TAG_LEN));
        }
        let lower = tag.to_lowercase();
        if !normalized.iter().any(|t| t.to_lowercase() == lower) {
            normalized.push(tag.to_string());
        }
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(normalize_email("").is_err());
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("two@@example.com").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ada@localhost").is_err());
        assert!(normalize_email("ada@.com").is_err());
        assert!(normalize_email("a da@example.com").is_err());
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(["VIP", " vip ", "", "beta", "Beta"]).unwrap();
        assert_eq!(tags, vec!["VIP", "beta"]);
    }

    #[test]
    fn test_normalize_tags_rejects_long() {
        assert!(normalize_tags(["x".repeat(65)]).is_err());
    }
}
