//! # mlops-core - Core Domain Types
//!
//! Foundation crate for mlops-console. Provides the snapshot types returned by
//! the code-versioning and cluster backends, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Code Versioning (`code`)
//! - [`Code`] - A versioned training script
//! - [`CodeVersion`] - Immutable snapshot of a script's content
//! - [`ParsingResult`], [`ParsingResultVersion`] - Parser output attached to a version
//! - [`ParsedContent`] - Structured extraction (framework, metrics, blocks)
//!
//! ### Clusters (`cluster`)
//! - [`Cluster`], [`ClusterDetails`], [`PodSummary`] - kind cluster snapshots
//! - [`ResourceKind`], [`ResourceList`] - Raw Kubernetes objects proxied by the backend
//! - [`Task`], [`TaskStatus`] - Backend-tracked asynchronous operations
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use mlops_core::prelude::*;
//! ```

pub mod cluster;
pub mod code;
pub mod error;
pub mod logging;
pub mod timestamp;

/// Prelude for common imports used throughout all mlops-console crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use cluster::{
    humanize_key, Cluster, ClusterCreateRequest, ClusterDetails, PodSummary, ResourceKind,
    ResourceList, Task, TaskAccepted, TaskStatus,
};
pub use code::{
    Code, CodeVersion, NewCode, NewCodeVersion, NewParsingResult, NewParsingResultVersion,
    ParsedContent, ParsingResult, ParsingResultVersion, RenameCode,
};
pub use error::{Error, Result, ResultExt};
