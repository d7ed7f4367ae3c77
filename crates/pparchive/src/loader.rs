//! Opening resolved paths as datasets.
//!
//! The multi-file dataset machinery itself lives outside this crate.
//! [`DatasetEngine`] is the seam: resolution happens here, reading and
//! merging happen behind the trait, and engine errors come back
//! unchanged inside [`Error::Engine`].

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::{self, ArchiveQuery};

/// An external library able to open NetCDF files as one dataset.
pub trait DatasetEngine {
    /// Whatever the engine produces: a lazy handle, an eager array
    /// bundle. This crate never looks inside.
    type Dataset;

    /// The engine's own error type, propagated unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open an ordered set of files merged into one dataset.
    ///
    /// `use_model_calendar` asks the engine to decode time with the
    /// model's own calendar rather than assuming a standard one.
    /// Engines are expected to reject an empty path set.
    fn open_merged(
        &self,
        paths: &[PathBuf],
        use_model_calendar: bool,
    ) -> std::result::Result<Self::Dataset, Self::Error>;

    /// Open a single file.
    fn open_single(&self, path: &Path) -> std::result::Result<Self::Dataset, Self::Error>;
}

/// Resolve `query` and open everything it matches as one dataset.
///
/// Time is decoded with the model calendar, which is how climate-model
/// output is written. A query that matches nothing is handed to the
/// engine as-is; its "no input files" error propagates unchanged, so
/// callers that want a friendlier message should check
/// [`path::resolve`] themselves first.
pub fn open_query<E: DatasetEngine>(engine: &E, query: &ArchiveQuery) -> Result<E::Dataset> {
    let resolved = path::resolve(query, false)?;
    engine
        .open_merged(&resolved.paths, true)
        .map_err(Error::engine)
}

/// Open a collection's static grid file.
///
/// The path is constructed, not searched for; a missing grid file
/// surfaces as the engine's own open error.
pub fn open_static<E, P>(engine: &E, root: P, collection: &str) -> Result<E::Dataset>
where
    E: DatasetEngine,
    P: AsRef<Path>,
{
    let grid = path::static_path(root, collection);
    engine.open_single(&grid).map_err(Error::engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Averaging, Suffix};

    /// An engine that records what it was asked to open.
    struct PathListEngine;

    #[derive(Debug, thiserror::Error)]
    #[error("no files to open")]
    struct NoInput;

    impl DatasetEngine for PathListEngine {
        type Dataset = Vec<PathBuf>;
        type Error = NoInput;

        fn open_merged(
            &self,
            paths: &[PathBuf],
            _use_model_calendar: bool,
        ) -> std::result::Result<Self::Dataset, Self::Error> {
            if paths.is_empty() {
                return Err(NoInput);
            }
            Ok(paths.to_vec())
        }

        fn open_single(&self, path: &Path) -> std::result::Result<Self::Dataset, Self::Error> {
            Ok(vec![path.to_path_buf()])
        }
    }

    fn write_file(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"netcdf").unwrap();
    }

    #[test]
    fn open_query_resolves_then_delegates() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "ocean_monthly/ts/monthly/5yr/ocean_monthly.185001-185412.tos.nc",
        );
        write_file(
            tmp.path(),
            "ocean_monthly/ts/monthly/5yr/ocean_monthly.185501-185912.tos.nc",
        );
        let query = ArchiveQuery {
            root: tmp.path().to_path_buf(),
            collection: "ocean_monthly".to_string(),
            averaging: Averaging::Timeseries,
            chunking: "monthly/5yr".to_string(),
            time: "*".to_string(),
            suffix: Suffix::from("tos"),
        };
        let dataset = open_query(&PathListEngine, &query).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(
            dataset
                .iter()
                .all(|p| p.extension().is_some_and(|ext| ext == "nc"))
        );
    }

    #[test]
    fn empty_match_propagates_the_engine_error() {
        let tmp = tempfile::tempdir().unwrap();
        let query = ArchiveQuery {
            root: tmp.path().to_path_buf(),
            collection: "ocean_monthly".to_string(),
            averaging: Averaging::Timeseries,
            chunking: "monthly/5yr".to_string(),
            time: "*".to_string(),
            suffix: Suffix::from("tos"),
        };
        let err = open_query(&PathListEngine, &query).unwrap_err();
        match err {
            Error::Engine(source) => {
                assert!(source.downcast_ref::<NoInput>().is_some());
            }
            other => panic!("expected Engine error, got {other:?}"),
        }
    }

    #[test]
    fn open_static_uses_the_constructed_path_unchecked() {
        // No file exists; the fake engine opens it anyway, proving the
        // path goes through without an existence check.
        let dataset = open_static(&PathListEngine, "/archive/pp", "ocean_monthly").unwrap();
        assert_eq!(
            dataset,
            vec![PathBuf::from(
                "/archive/pp/ocean_monthly/ocean_monthly.static.nc"
            )]
        );
    }
}
