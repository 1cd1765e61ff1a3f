//! Flickrer services
//!
//! Query building, pagination, tag enrichment, the reducer, the feed store
//! and the remote fetcher boundary.

pub mod feed_store;
pub mod fetcher;
#[cfg(feature = "http-client")]
pub mod http_fetcher;
pub mod pagination;
pub mod query_builder;
pub mod reducer;
pub mod settings;
pub mod tag_enrichment;

pub use feed_store::{FeedStore, SnapshotHandler, SubscriptionId};
pub use fetcher::{resolve, BoxFuture, FetchResponse, RemoteFetcher, SharedFetcher};
#[cfg(feature = "http-client")]
pub use http_fetcher::HttpFetcher;
pub use query_builder::{RequestDescriptor, RequestKind};
pub use reducer::{reduce, FeedAction};
pub use settings::SettingsManager;
