//! Reddit-backed collaborators for the DeltaBot moderator add workflow.
//! This crate provides comment URL parsing, reply marker and flair helpers,
//! and the HTTP client that resolves, awards, replies and notifies.

pub mod comment_locator;
pub mod delta_flair;
pub mod reddit_api_client;
pub mod reddit_listing;
pub mod reddit_transport_helpers;
pub mod reply_detector;
pub mod reply_marker;
pub mod reply_render;

pub use comment_locator::{comment_lock_key, parse_comment_locator, CommentLocator};
pub use reddit_api_client::{RedditApiClient, RedditApiClientConfig};
pub use reply_detector::MarkerReplyDetector;
pub use reply_render::TemplateReplyComposer;
