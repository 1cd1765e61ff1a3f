//! Photo data model

use serde::{Deserialize, Serialize};

use super::Tag;

/// A photo in the feed.
///
/// Photos are never mutated once they are part of a published snapshot.
/// Every change produces a new value with the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub owner: String,
    /// Opaque identifiers used only to build the display URL
    pub secret: String,
    pub server: String,
    pub farm: i32,
    pub title: String,
    pub is_public: i32,
    pub is_friend: i32,
    pub is_family: i32,
    /// `None` until the tag list has been fetched
    pub tags: Option<Vec<Tag>>,
    /// Whether the user expanded this photo to see its details
    pub expanded: bool,
}

impl Photo {
    /// Create a photo with only identity fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: String::new(),
            secret: String::new(),
            server: String::new(),
            farm: 0,
            title: title.into(),
            is_public: 0,
            is_friend: 0,
            is_family: 0,
            tags: None,
            expanded: false,
        }
    }

    /// Copy of this photo carrying the given tags.
    pub fn with_tags(&self, tags: Vec<Tag>) -> Self {
        Self {
            tags: Some(tags),
            ..self.clone()
        }
    }

    /// Copy of this photo with the expanded flag flipped.
    pub fn toggled(&self) -> Self {
        Self {
            expanded: !self.expanded,
            ..self.clone()
        }
    }

    /// Whether the tag list has already been fetched.
    pub fn has_tags(&self) -> bool {
        self.tags.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_new() {
        let photo = Photo::new("42", "Harbour");
        assert_eq!(photo.id, "42");
        assert_eq!(photo.title, "Harbour");
        assert!(photo.tags.is_none());
        assert!(!photo.expanded);
    }

    #[test]
    fn test_with_tags_keeps_identity_and_source() {
        let photo = Photo::new("42", "Harbour").toggled();
        let tagged = photo.with_tags(vec![Tag::new("t1", "sea")]);

        assert_eq!(tagged.id, photo.id);
        assert!(tagged.expanded);
        assert_eq!(tagged.tags.as_ref().map(Vec::len), Some(1));
        assert!(photo.tags.is_none());
    }

    #[test]
    fn test_toggled_twice_is_identity() {
        let photo = Photo::new("1", "a");
        assert_eq!(photo.toggled().toggled(), photo);
    }
}
