//! Tag enrichment
//!
//! Splices a fetched tag list into the photo with a matching id.

use std::sync::Arc;

use crate::models::{Photo, Tag};

/// Return a new sequence where the photo `photo_id` carries `tags`.
///
/// Every other entry is the same `Arc` as in the input. Returns `None`
/// when no photo matches, so the caller can skip publishing.
pub fn apply(photos: &[Arc<Photo>], photo_id: &str, tags: &[Tag]) -> Option<Vec<Arc<Photo>>> {
    let index = photos.iter().position(|photo| photo.id == photo_id)?;

    let mut next = photos.to_vec();
    next[index] = Arc::new(photos[index].with_tags(tags.to_vec()));
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_only_matching_photo() {
        let photos = vec![
            Arc::new(Photo::new("42", "a")),
            Arc::new(Photo::new("7", "b").toggled()),
        ];
        let tags = vec![Tag::new("t1", "sea")];

        let next = apply(&photos, "42", &tags).unwrap();

        assert_eq!(next[0].tags.as_deref(), Some(tags.as_slice()));
        assert_eq!(next[0].id, "42");
        assert!(next[1].tags.is_none());
        assert!(next[1].expanded);
        assert!(Arc::ptr_eq(&next[1], &photos[1]));
        assert!(photos[0].tags.is_none());
    }

    #[test]
    fn test_apply_preserves_expanded_flag_of_target() {
        let photos = vec![Arc::new(Photo::new("42", "a").toggled())];
        let next = apply(&photos, "42", &[]).unwrap();
        assert!(next[0].expanded);
        assert_eq!(next[0].tags, Some(Vec::new()));
    }

    #[test]
    fn test_apply_unknown_photo() {
        let photos = vec![Arc::new(Photo::new("1", "a"))];
        assert!(apply(&photos, "missing", &[Tag::new("t", "x")]).is_none());
    }

    #[test]
    fn test_apply_replaces_existing_tags() {
        let photos = vec![Arc::new(
            Photo::new("1", "a").with_tags(vec![Tag::new("old", "old")]),
        )];
        let next = apply(&photos, "1", &[Tag::new("new", "new")]).unwrap();
        let tags = next[0].tags.as_ref().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id, "new");
    }
}
