//! HTTP client module with status classification.

mod client;
mod status;

pub use client::{HttpClient, Page};
pub use status::{classify_status, classify_transport};
