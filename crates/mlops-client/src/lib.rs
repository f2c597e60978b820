//! # mlops-client - Backend Access
//!
//! HTTP bindings for the code-versioning and kind cluster services, and the
//! log stream transport.
//!
//! Depends on [`mlops_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Service Traits (`backend`)
//! - [`CodeBackend`] - Codes, code versions, parsing results
//! - [`ClusterBackend`] - Clusters, resources, tasks, pod logs
//! - [`Backend`] - Both, as required by the app engine
//! - [`LogStreamRequest`] - Identity of one log connection
//!
//! ### HTTP (`client`, `http`)
//! - [`ApiClient`] - Request client bound to a base URL
//! - [`HttpBackend`] - Trait implementation over two `ApiClient`s
//!
//! ### Streaming (`sse`)
//! - [`EventDecoder`] - Incremental `text/event-stream` / line decoder

pub mod backend;
pub mod client;
pub mod http;
pub mod sse;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use backend::{
    Backend, ClusterBackend, CodeBackend, LocalClusterBackend, LocalCodeBackend, LogStreamRequest,
};
pub use client::{extract_detail, ApiClient};
pub use http::HttpBackend;
pub use sse::{EventDecoder, Framing};
