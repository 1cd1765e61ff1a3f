//! Application settings model

use serde::{Deserialize, Serialize};

/// Remote service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// REST endpoint every method is called on
    pub endpoint: String,
    pub api_key: String,
    pub recent_method: String,
    pub search_method: String,
    pub tags_method: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://api.flickr.com/services/rest/"),
            api_key: String::new(),
            recent_method: String::from("flickr.photos.getRecent"),
            search_method: String::from("flickr.photos.search"),
            tags_method: String::from("flickr.tags.getListPhoto"),
        }
    }
}

/// Network settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkSettings {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            read_timeout_secs: 15,
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    /// `{server}`, `{id}` and `{secret}` are substituted
    pub url_template: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            url_template: String::from("https://live.staticflickr.com/{server}/{id}_{secret}.jpg"),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedSettings {
    pub api: ApiSettings,
    pub network: NetworkSettings,
    pub display: DisplaySettings,
}
