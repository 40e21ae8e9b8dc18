//! HTTP route handlers.

pub mod captions;
pub mod videos;
