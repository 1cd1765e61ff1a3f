//! Flickrer data models

pub mod envelope;
pub mod feed;
pub mod photo;
pub mod settings;
pub mod tag;

pub use envelope::{Envelope, PhotoPage, PhotosEnvelope, Stat, TagsEnvelope};
pub use feed::{FeedState, Filters};
pub use photo::Photo;
pub use settings::{ApiSettings, DisplaySettings, FeedSettings, NetworkSettings};
pub use tag::Tag;
