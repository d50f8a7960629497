//! Network seams: the HTTP backend and the telemetry push feed.
//!
//! Both are traits so services can be exercised against in-memory fakes.

pub mod backend;
pub mod feed;

pub use backend::{Backend, HttpBackend};
pub use feed::{FeedStream, FeedTransport, WsTransport};
