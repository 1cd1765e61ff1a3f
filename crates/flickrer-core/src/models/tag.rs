//! Tag data model

use serde::{Deserialize, Serialize};

/// A tag attached to a photo by its author or by other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub author: String,
    pub author_name: String,
    /// Tag as the author typed it
    pub raw: String,
    /// Normalized display text
    pub content: String,
    pub machine_tag: bool,
}

impl Tag {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: id.into(),
            author: String::new(),
            author_name: String::new(),
            raw: content.clone(),
            content,
            machine_tag: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let tag = Tag::new("t1", "sunset");
        assert_eq!(tag.id, "t1");
        assert_eq!(tag.raw, "sunset");
        assert_eq!(tag.content, "sunset");
        assert!(!tag.machine_tag);
    }

    #[test]
    fn test_tag_serializes_camel_case() {
        let json = serde_json::to_value(Tag::new("t1", "sea")).unwrap();
        assert!(json.get("authorName").is_some());
        assert!(json.get("machineTag").is_some());
    }
}
