//! Resolve, discover, and stage postprocessed climate-model output.
//!
//! A postprocess archive encodes dataset identity in its directory
//! layout:
//!
//! ```text
//! {root}/{collection}/{ts|av}/{frequency}/{chunk}/{collection}.{time}.{suffix}.nc
//! {root}/{collection}/{collection}.static.nc
//! ```
//!
//! This crate maps semantic queries onto that convention: building and
//! expanding paths ([`path`]), discovering the layout pieces a caller
//! does not know ([`archive`]), indexing which variables live where
//! ([`catalog`]), staging tape-resident files back to disk
//! ([`staging`]), and handing resolved files to an external dataset
//! engine ([`loader`]).
//!
//! Everything is synchronous and stateless: each call recomputes its
//! answer from live filesystem state. The only background activity is
//! the staging subsystem's own queue, on the far side of
//! [`staging::Stager`] - dispatch a request, then poll.
//!
//! Set the `PPQ_LOG` environment variable to see diagnostics (empty
//! expansions, ambiguous layouts, skipped listing lines).

/// Path construction and wildcard resolution
pub mod path;

/// Wildcard expansion against the host filesystem
pub mod glob;

/// Archive layout discovery
pub mod archive;

/// Collection-to-variables index
pub mod catalog;

/// Staging dispatch and residency queries
pub mod staging;

/// Dataset-engine seam
pub mod loader;

/// Error types
pub mod error;

// Re-export key types
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use loader::DatasetEngine;
pub use path::{ArchiveQuery, Averaging, Resolved, Suffix};
pub use staging::{DmfTools, QueueStatus, Residency, Stager, StagingSystem};
