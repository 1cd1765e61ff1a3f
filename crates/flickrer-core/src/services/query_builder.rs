//! Query builder
//!
//! Maps the current filters and a requested page to a request descriptor.
//! Kind precedence is text > tags > recent; the page parameter is attached
//! independently of the kind.

use std::fmt;

use crate::models::Filters;

/// Endpoint kind a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Most recent public photos, no filter
    Recent,
    /// Text or tag search
    Search,
    /// Tag list of a single photo
    Tags,
}

impl RequestKind {
    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Recent => "recent",
            RequestKind::Search => "search",
            RequestKind::Tags => "tags",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Endpoint kind plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub kind: RequestKind,
    pub params: Vec<(String, String)>,
}

impl RequestDescriptor {
    fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Value of the first parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Unencoded `k=v&k=v` form, for logging.
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Build the photo-list request for the given filters and page.
pub fn build(filters: &Filters, page: u32) -> RequestDescriptor {
    let request = if let Some(text) = filters.active_text() {
        RequestDescriptor::new(RequestKind::Search).with_param("text", text)
    } else if !filters.selected_tags.is_empty() {
        RequestDescriptor::new(RequestKind::Search)
            .with_param("tags", filters.selected_tags.join(","))
    } else {
        RequestDescriptor::new(RequestKind::Recent)
    };

    if page > 1 {
        request.with_param("page", page.to_string())
    } else {
        request
    }
}

/// Build the tag-list request for one photo.
pub fn build_tags(photo_id: &str) -> RequestDescriptor {
    RequestDescriptor::new(RequestKind::Tags).with_param("photo_id", photo_id)
}
