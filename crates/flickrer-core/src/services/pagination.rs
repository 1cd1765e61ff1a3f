//! Pagination controller
//!
//! Decides whether incoming results replace or extend the feed and which
//! page the cursor lands on.

use std::sync::Arc;

use crate::models::Photo;

/// Merge a fetched page into the existing photo sequence.
///
/// Pages `<= 1` replace the sequence, later pages are appended without
/// deduplication. The returned page is clamped to `server_max_page - 1`
/// (the server counts pages from 1, the cursor from 0) and is 0 when the
/// server reports no positive page count.
pub fn merge(
    existing: &[Arc<Photo>],
    incoming: Vec<Arc<Photo>>,
    requested_page: u32,
    server_max_page: Option<i64>,
) -> (Vec<Arc<Photo>>, u32) {
    let photos = if requested_page <= 1 {
        incoming
    } else {
        let mut merged = Vec::with_capacity(existing.len() + incoming.len());
        merged.extend(existing.iter().cloned());
        merged.extend(incoming);
        merged
    };

    (photos, clamp_page(requested_page, server_max_page))
}

/// Clamp a requested page to the last page the server declared.
pub fn clamp_page(requested_page: u32, server_max_page: Option<i64>) -> u32 {
    let last = match server_max_page {
        Some(pages) if pages > 0 => u32::try_from(pages - 1).unwrap_or(u32::MAX),
        _ => 0,
    };
    requested_page.min(last)
}
