//! Archive path construction and resolution.
//!
//! Postprocessed output encodes dataset identity in its directory
//! layout:
//!
//! ```text
//! {root}/{collection}/{averaging}/{chunking}/{collection}.{time}.{suffix}.nc
//! {root}/{collection}/{collection}.static.nc
//! ```
//!
//! This module is the single place those strings are built. A query is
//! resolved by constructing the literal (possibly wildcarded) path and
//! expanding it against the filesystem; discovery of the pieces a
//! caller does not know lives in [`crate::archive`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::glob;

/// Whether stored output is a raw timeseries or a time-averaged
/// climatology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Averaging {
    /// Raw timeseries output (`ts` subtrees).
    #[serde(rename = "ts")]
    Timeseries,
    /// Time-averaged climatology output (`av` subtrees).
    #[serde(rename = "av")]
    Timeaverage,
}

impl Averaging {
    /// The directory name this mode uses in the archive.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Averaging::Timeseries => "ts",
            Averaging::Timeaverage => "av",
        }
    }
}

impl fmt::Display for Averaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Averaging {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ts" => Ok(Averaging::Timeseries),
            "av" => Ok(Averaging::Timeaverage),
            other => Err(Error::UnknownAveraging(other.to_string())),
        }
    }
}

/// Filename suffix selection: one suffix, or an ordered fan-out over
/// several.
///
/// For timeseries data the suffix is a variable name; for time averages
/// it is the climatology label (`ann`, or `01`..`12` for monthly
/// climatologies). In serialized form a plain string and a list of
/// strings both work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suffix {
    One(String),
    Many(Vec<String>),
}

impl Suffix {
    /// The suffix elements in order. A single suffix is a one-element
    /// fan-out.
    pub fn elements(&self) -> &[String] {
        match self {
            Suffix::One(one) => std::slice::from_ref(one),
            Suffix::Many(many) => many.as_slice(),
        }
    }
}

impl From<&str> for Suffix {
    fn from(suffix: &str) -> Self {
        Suffix::One(suffix.to_string())
    }
}

impl From<String> for Suffix {
    fn from(suffix: String) -> Self {
        Suffix::One(suffix)
    }
}

impl From<Vec<String>> for Suffix {
    fn from(suffixes: Vec<String>) -> Self {
        Suffix::Many(suffixes)
    }
}

/// The semantic coordinates of one postprocessed dataset.
///
/// All fields are caller-supplied strings; nothing is validated against
/// the filesystem until [`resolve`] runs. `chunking` and `time` may
/// contain `*` wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveQuery {
    /// The postprocess directory (archive root).
    pub root: PathBuf,
    /// Collection name, e.g. `ocean_cobalt_omip_tracers_month_z`.
    pub collection: String,
    /// Which averaging subtree to resolve in.
    pub averaging: Averaging,
    /// Local chunking scheme, e.g. `monthly_1yr` or `annual/5yr`.
    /// Discover it with [`crate::archive::chunking_scheme`] when
    /// unknown.
    pub chunking: String,
    /// Time label, e.g. `0851` or `185001-185412`, or a wildcard.
    pub time: String,
    /// Filename suffix: variable name for `ts`, climatology label for
    /// `av`.
    pub suffix: Suffix,
}

/// The literal data path for one suffix element of a query.
///
/// Exactly `{root}/{collection}/{averaging}/{chunking}/{filename}` with
/// `filename = {collection}.{time}.{suffix}.nc`; wildcards in the query
/// pass through untouched.
pub fn data_pattern(query: &ArchiveQuery, suffix: &str) -> String {
    let filename = [query.collection.as_str(), query.time.as_str(), suffix, "nc"].join(".");
    [
        &query.root.display().to_string(),
        query.collection.as_str(),
        query.averaging.as_str(),
        query.chunking.as_str(),
        &filename,
    ]
    .join("/")
}

/// Path to a collection's static grid file:
/// `{root}/{collection}/{collection}.static.nc`.
///
/// Pure construction; the file is not checked to exist.
pub fn static_path<P: AsRef<Path>>(root: P, collection: &str) -> PathBuf {
    root.as_ref()
        .join(collection)
        .join(format!("{collection}.static.nc"))
}

/// A resolved query: what was searched and what it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    /// One literal pattern per suffix element, in element order.
    pub patterns: Vec<String>,
    /// Matching files, concatenated in pattern order without
    /// deduplication. When requested, the static-grid path is appended
    /// last, unexpanded and unchecked.
    pub paths: Vec<PathBuf>,
}

/// Resolve a query against the filesystem.
///
/// Each suffix element expands independently and the results are
/// concatenated in element order. Zero matches is a valid outcome, not
/// an error: downstream dataset engines reject empty input themselves,
/// so callers that require data must check [`Resolved::paths`].
///
/// With `include_static` the static-grid path is appended exactly once,
/// after all data matches, whether or not any data matched.
pub fn resolve(query: &ArchiveQuery, include_static: bool) -> Result<Resolved> {
    let mut patterns = Vec::new();
    let mut paths = Vec::new();
    for suffix in query.suffix.elements() {
        let pattern = data_pattern(query, suffix);
        let mut expanded = glob::expand(&pattern)?;
        diagnostics::log_debug!("pattern {pattern} matched {count} files", pattern: pattern.as_str(), count: expanded.len());
        patterns.push(pattern);
        paths.append(&mut expanded);
    }
    if paths.is_empty() {
        diagnostics::log_warn!("no files match query for {collection}", collection: query.collection.as_str());
    }
    if include_static {
        paths.push(static_path(&query.root, &query.collection));
    }
    Ok(Resolved { patterns, paths })
}
