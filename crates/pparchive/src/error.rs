use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by archive resolution, introspection, and staging.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required archive level is missing or empty. Raised during
    /// introspection only; a wildcard that matches nothing is an empty
    /// result, not this error.
    #[error("archive level not found or empty: {path}")]
    NotFound { path: PathBuf },

    /// The staging subsystem itself could not be invoked.
    #[error("staging subsystem unavailable: {command}: {source}")]
    StagingUnavailable {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A path component the wildcard machinery cannot represent
    /// (non-UTF-8, `..`, or a platform prefix).
    #[error("invalid path component: {0}")]
    InvalidComponent(String),

    /// An averaging-mode string other than `ts` or `av`.
    #[error("unknown averaging mode: {0} (expected 'ts' or 'av')")]
    UnknownAveraging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the external dataset engine, passed through with its
    /// source intact.
    #[error("dataset engine error: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Error::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn staging_unavailable<S: Into<String>>(command: S, source: std::io::Error) -> Self {
        Error::StagingUnavailable {
            command: command.into(),
            source,
        }
    }

    /// Wrap a dataset-engine error for propagation through this crate.
    pub fn engine<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Engine(Box::new(source))
    }
}
