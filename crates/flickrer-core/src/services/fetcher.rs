//! Remote fetcher boundary
//!
//! The core never performs I/O itself. It hands a [`RequestDescriptor`] to a
//! [`RemoteFetcher`] and gets back the HTTP status plus the decoded envelope.
//! `Err` is reserved for transport failures; logical failures are decided by
//! [`resolve`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::models::{Envelope, PhotosEnvelope, Stat, TagsEnvelope};
use crate::services::query_builder::RequestDescriptor;
use crate::utils::error::{AppError, AppResult};

/// Boxed, sendable future returned by fetchers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// HTTP status the service answers with on success
pub const HTTP_OK: u16 = 200;

/// Raw outcome of a request that reached the server.
#[derive(Debug, Clone)]
pub struct FetchResponse<E> {
    pub status: u16,
    /// Decoded body; `None` when the status was not OK and the body was skipped
    pub body: Option<E>,
}

impl<E> FetchResponse<E> {
    pub fn ok(body: E) -> Self {
        Self {
            status: HTTP_OK,
            body: Some(body),
        }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Performs network I/O for the feed store.
pub trait RemoteFetcher: Send + Sync {
    /// Execute a `recent` or `search` request.
    fn fetch_photos<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, AppResult<FetchResponse<PhotosEnvelope>>>;

    /// Execute a `tags` request.
    fn fetch_tags<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, AppResult<FetchResponse<TagsEnvelope>>>;
}

/// Shared reference to a RemoteFetcher implementation.
pub type SharedFetcher = Arc<dyn RemoteFetcher>;

/// Apply the success rule: HTTP OK and `stat == "ok"`.
///
/// A non-OK status wins over anything in the body.
pub fn resolve<E: Envelope>(response: FetchResponse<E>) -> AppResult<E::Payload> {
    if response.status != HTTP_OK {
        return Err(AppError::Status(response.status));
    }

    let envelope = response
        .body
        .ok_or_else(|| AppError::Transport("empty response body".to_string()))?;

    match envelope.stat() {
        Stat::Ok => Ok(envelope.into_payload()),
        Stat::Fail => Err(AppError::Service(
            envelope.message().unwrap_or("Unknown error").to_string(),
        )),
    }
}
