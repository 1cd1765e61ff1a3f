//! Wire envelopes returned by the photo service.
//!
//! Both endpoints wrap their payload in `{ "stat": "ok" | "fail", "message"? , ... }`.
//! Decoding is lenient: absent fields fall back to empty values.

use serde::{Deserialize, Deserializer};

use super::{Photo, Tag};

/// Service-level status flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Ok,
    #[default]
    #[serde(other)]
    Fail,
}

/// Common view over both envelope shapes.
pub trait Envelope {
    type Payload;

    fn stat(&self) -> Stat;
    fn message(&self) -> Option<&str>;
    fn into_payload(self) -> Self::Payload;
}

/// Envelope of `recent` and `search` responses
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PhotosEnvelope {
    #[serde(default)]
    pub stat: Stat,
    pub message: Option<String>,
    pub photos: Option<PhotoPage>,
}

/// One page of photos
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PhotoPage {
    /// 1-based page number echoed by the server
    pub page: i64,
    /// Number of pages available, when reported
    pub pages: Option<i64>,
    pub photo: Vec<PhotoRecord>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PhotoRecord {
    pub id: String,
    pub owner: String,
    pub secret: String,
    pub server: String,
    pub farm: i32,
    pub title: String,
    pub ispublic: i32,
    pub isfriend: i32,
    pub isfamily: i32,
}

impl From<PhotoRecord> for Photo {
    fn from(record: PhotoRecord) -> Self {
        Photo {
            id: record.id,
            owner: record.owner,
            secret: record.secret,
            server: record.server,
            farm: record.farm,
            title: record.title,
            is_public: record.ispublic,
            is_friend: record.isfriend,
            is_family: record.isfamily,
            tags: None,
            expanded: false,
        }
    }
}

impl Envelope for PhotosEnvelope {
    type Payload = PhotoPage;

    fn stat(&self) -> Stat {
        self.stat
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn into_payload(self) -> PhotoPage {
        self.photos.unwrap_or_default()
    }
}

/// Envelope of the per-photo tag list response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TagsEnvelope {
    #[serde(default)]
    pub stat: Stat,
    pub message: Option<String>,
    pub photo: Option<TaggedPhoto>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TaggedPhoto {
    pub id: String,
    pub tags: Option<TagList>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TagList {
    pub tag: Vec<TagRecord>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TagRecord {
    pub id: String,
    pub author: String,
    #[serde(rename = "authorname", alias = "authorName")]
    pub author_name: String,
    pub raw: String,
    #[serde(rename = "_content")]
    pub content: String,
    #[serde(deserialize_with = "flag")]
    pub machine_tag: bool,
}

impl From<TagRecord> for Tag {
    fn from(record: TagRecord) -> Self {
        Tag {
            id: record.id,
            author: record.author,
            author_name: record.author_name,
            raw: record.raw,
            content: record.content,
            machine_tag: record.machine_tag,
        }
    }
}

impl Envelope for TagsEnvelope {
    type Payload = Vec<Tag>;

    fn stat(&self) -> Stat {
        self.stat
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn into_payload(self) -> Vec<Tag> {
        self.photo
            .and_then(|photo| photo.tags)
            .map(|list| list.tag.into_iter().map(Tag::from).collect())
            .unwrap_or_default()
    }
}

/// Accepts `true`/`false`, `0`/`1` or their string forms.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
        Flag::Text(value) => value == "1" || value.eq_ignore_ascii_case("true"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_photos_envelope() {
        let body = r#"{
            "photos": {
                "page": 1, "pages": 10, "perpage": 100, "total": 1000,
                "photo": [
                    {"id": "54", "owner": "1@N00", "secret": "abc", "server": "65535",
                     "farm": 66, "title": "Bridge", "ispublic": 1, "isfriend": 0, "isfamily": 0}
                ]
            },
            "stat": "ok"
        }"#;

        let envelope: PhotosEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.stat(), Stat::Ok);

        let page = envelope.into_payload();
        assert_eq!(page.pages, Some(10));
        let photo = Photo::from(page.photo[0].clone());
        assert_eq!(photo.id, "54");
        assert_eq!(photo.server, "65535");
        assert_eq!(photo.is_public, 1);
        assert!(photo.tags.is_none());
    }

    #[test]
    fn test_decode_fail_envelope() {
        let body = r#"{"stat": "fail", "code": 100, "message": "Invalid API Key"}"#;
        let envelope: PhotosEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.stat(), Stat::Fail);
        assert_eq!(envelope.message(), Some("Invalid API Key"));
        assert!(envelope.photos.is_none());
    }

    #[test]
    fn test_unknown_stat_is_fail() {
        let envelope: PhotosEnvelope = serde_json::from_str(r#"{"stat": "weird"}"#).unwrap();
        assert_eq!(envelope.stat(), Stat::Fail);
    }

    #[test]
    fn test_decode_tags_envelope() {
        let body = r#"{
            "photo": {
                "id": "42",
                "tags": {
                    "tag": [
                        {"id": "1-42-sea", "author": "7@N00", "authorname": "ann",
                         "raw": "Sea", "_content": "sea", "machine_tag": 0},
                        {"id": "1-42-geo", "author": "7@N00", "authorName": "ann",
                         "raw": "geo:lat=1", "_content": "geo:lat=1", "machine_tag": true}
                    ]
                }
            },
            "stat": "ok"
        }"#;

        let envelope: TagsEnvelope = serde_json::from_str(body).unwrap();
        let tags = envelope.into_payload();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].content, "sea");
        assert_eq!(tags[0].author_name, "ann");
        assert!(!tags[0].machine_tag);
        assert_eq!(tags[1].author_name, "ann");
        assert!(tags[1].machine_tag);
    }

    #[test]
    fn test_tags_envelope_without_tags() {
        let envelope: TagsEnvelope =
            serde_json::from_str(r#"{"photo": {"id": "42"}, "stat": "ok"}"#).unwrap();
        assert!(envelope.into_payload().is_empty());
    }
}
