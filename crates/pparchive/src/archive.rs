//! Archive layout discovery.
//!
//! A postprocess archive encodes most of what a caller needs to know in
//! directory names, but three things are routinely unknown: which
//! collections exist, which local chunking scheme a collection was
//! written with, and (derived from that) the output frequency. This
//! module answers those questions by listing directories.
//!
//! Listings are sorted before use, so every answer is deterministic no
//! matter what order the filesystem returns entries in.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};
use crate::path::Averaging;

/// Directory entries at one archive level, lexically sorted.
///
/// A level that cannot be listed is `NotFound`; entries with non-UTF-8
/// names are skipped.
fn read_level(path: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return Err(Error::not_found(path));
        }
        Err(err) => return Err(Error::Io(err)),
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// The first lexical entry at one level, warning when the choice was
/// ambiguous. An empty level is `NotFound`.
fn first_entry(dir: &Path) -> Result<String> {
    let names = read_level(dir)?;
    let Some(first) = names.first() else {
        return Err(Error::not_found(dir));
    };
    if names.len() > 1 {
        diagnostics::log_warn!("{count} entries under {dir}, taking {chosen}", count: names.len(), dir: dir.display().to_string(), chosen: first.as_str());
    }
    Ok(first.clone())
}

fn discover_levels(mode_dir: &Path) -> Result<(String, String)> {
    let frequency = first_entry(mode_dir)?;
    let chunk = first_entry(&mode_dir.join(&frequency))?;
    Ok((frequency, chunk))
}

/// Every entry directly under the archive root, lexically sorted.
///
/// Nothing is filtered: stray files and non-data directories at the
/// root come back as candidate collection names too. The archive
/// convention puts nothing else at the root, but nothing enforces
/// that, so callers reading this list should expect the occasional
/// artifact.
pub fn list_collections<P: AsRef<Path>>(root: P) -> Result<Vec<String>> {
    read_level(root.as_ref())
}

/// Discover the local chunking scheme under
/// `{root}/{collection}/{averaging}`.
///
/// The convention nests a frequency directory over a chunk-length
/// directory (`monthly/5yr`). Which pair is present is not derivable
/// from the query, so it is discovered: the first lexical entry at each
/// of the two levels wins. When a level holds several candidates the
/// selection is still first-lexical, with a warning; picking the right
/// one among many is the caller's job, via an explicit
/// [`ArchiveQuery::chunking`](crate::path::ArchiveQuery) value.
///
/// Fails with [`Error::NotFound`] when the averaging-mode directory is
/// missing or either level is empty.
pub fn chunking_scheme<P: AsRef<Path>>(
    root: P,
    collection: &str,
    averaging: Averaging,
) -> Result<String> {
    let mode_dir = root.as_ref().join(collection).join(averaging.as_str());
    let (frequency, chunk) = discover_levels(&mode_dir)?;
    diagnostics::log_debug!("discovered chunking scheme {frequency}/{chunk} for {collection}", frequency: frequency.as_str(), chunk: chunk.as_str(), collection: collection);
    Ok(format!("{frequency}/{chunk}"))
}

/// The output frequency of a collection's timeseries data: the first
/// level of its `ts` chunking scheme.
pub fn time_frequency<P: AsRef<Path>>(root: P, collection: &str) -> Result<String> {
    let mode_dir = root
        .as_ref()
        .join(collection)
        .join(Averaging::Timeseries.as_str());
    let (frequency, _) = discover_levels(&mode_dir)?;
    Ok(frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dirs(root: &Path, relative: &str) {
        std::fs::create_dir_all(root.join(relative)).unwrap();
    }

    #[test]
    fn list_collections_is_sorted_and_unfiltered() {
        let tmp = tempfile::tempdir().unwrap();
        make_dirs(tmp.path(), "ocean_monthly");
        make_dirs(tmp.path(), "atmos_cmip");
        // A stray file at the root is listed like anything else.
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        assert_eq!(
            list_collections(tmp.path()).unwrap(),
            vec!["atmos_cmip", "notes.txt", "ocean_monthly"]
        );
    }

    #[test]
    fn list_collections_missing_root_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("no_such_root");
        assert!(matches!(
            list_collections(&missing),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn list_collections_empty_root_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_collections(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn chunking_scheme_joins_both_levels() {
        let tmp = tempfile::tempdir().unwrap();
        make_dirs(tmp.path(), "ocean_monthly/ts/monthly/5yr");
        assert_eq!(
            chunking_scheme(tmp.path(), "ocean_monthly", Averaging::Timeseries).unwrap(),
            "monthly/5yr"
        );
    }

    #[test]
    fn chunking_scheme_takes_first_lexical_entry_per_level() {
        let tmp = tempfile::tempdir().unwrap();
        make_dirs(tmp.path(), "ocean_monthly/ts/monthly/5yr");
        make_dirs(tmp.path(), "ocean_monthly/ts/monthly/20yr");
        make_dirs(tmp.path(), "ocean_monthly/ts/annual/5yr");
        // "annual" < "monthly", "20yr" < "5yr".
        assert_eq!(
            chunking_scheme(tmp.path(), "ocean_monthly", Averaging::Timeseries).unwrap(),
            "annual/5yr"
        );
    }

    #[test]
    fn chunking_scheme_missing_mode_dir_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        make_dirs(tmp.path(), "ocean_monthly/ts/monthly/5yr");
        let err =
            chunking_scheme(tmp.path(), "ocean_monthly", Averaging::Timeaverage).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn chunking_scheme_empty_levels_are_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        make_dirs(tmp.path(), "ocean_monthly/ts");
        assert!(matches!(
            chunking_scheme(tmp.path(), "ocean_monthly", Averaging::Timeseries),
            Err(Error::NotFound { .. })
        ));

        // First level present, second empty.
        make_dirs(tmp.path(), "ocean_monthly/ts/monthly");
        assert!(matches!(
            chunking_scheme(tmp.path(), "ocean_monthly", Averaging::Timeseries),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn chunking_scheme_on_a_file_collection_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        assert!(matches!(
            chunking_scheme(tmp.path(), "notes.txt", Averaging::Timeseries),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn time_frequency_is_first_ts_level() {
        let tmp = tempfile::tempdir().unwrap();
        make_dirs(tmp.path(), "ocean_monthly/ts/monthly/5yr");
        // The av subtree plays no part in frequency discovery.
        make_dirs(tmp.path(), "ocean_monthly/av/annual_5yr");
        assert_eq!(
            time_frequency(tmp.path(), "ocean_monthly").unwrap(),
            "monthly"
        );
    }
}
