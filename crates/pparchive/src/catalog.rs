//! Which variables live in which collection.
//!
//! Timeseries filenames carry the variable name:
//! `{collection}.{time}.{variable}.nc`. Listing one timeseries chunk
//! directory is therefore enough to learn every variable a collection
//! provides, without opening a single file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::archive;
use crate::error::Result;
use crate::glob::list_dir_sorted;
use crate::path::Averaging;

/// Trailing name token marking a collection regridded onto the regular
/// 1x1-degree grid.
const REGRID_MARKER: &str = "1x1deg";

/// The variables a collection provides, or `None` when the collection
/// has no timeseries subtree at all.
///
/// The two outcomes are different answers: `None` means the archive
/// holds nothing to index for this collection (an `av`-only collection,
/// or a stray artifact at the root), while `Some` lists what its
/// timeseries files name. Names are deduplicated, first-seen order over
/// the sorted file listing. Files without a trailing `nc` component are
/// skipped.
///
/// The listing happens under the collection's discovered `ts` chunking
/// scheme; a `ts` directory that exists but is structurally empty fails
/// discovery and propagates [`Error::NotFound`](crate::Error::NotFound)
/// rather than pretending to be a collection with zero variables.
pub fn variables_of<P: AsRef<Path>>(root: P, collection: &str) -> Result<Option<Vec<String>>> {
    let root = root.as_ref();
    let ts_dir = root.join(collection).join(Averaging::Timeseries.as_str());
    if !ts_dir.is_dir() {
        diagnostics::log_debug!("no timeseries subtree for {collection}", collection: collection);
        return Ok(None);
    }
    let scheme = archive::chunking_scheme(root, collection, Averaging::Timeseries)?;
    let chunk_dir = ts_dir.join(&scheme);

    let mut names: Vec<String> = Vec::new();
    for file in list_dir_sorted(&chunk_dir) {
        let Some(variable) = variable_component(&file) else {
            continue;
        };
        if !names.iter().any(|known| known == variable) {
            names.push(variable.to_string());
        }
    }
    Ok(Some(names))
}

/// The second-to-last dot component of a timeseries filename, or `None`
/// for names that do not end in `nc`.
fn variable_component(filename: &str) -> Option<&str> {
    let mut parts = filename.split('.').rev();
    match (parts.next(), parts.next()) {
        (Some("nc"), Some(variable)) => Some(variable),
        _ => None,
    }
}

/// Variables per collection, for every collection whose timeseries
/// subtree exists.
///
/// Collections without timeseries data are not in the catalog at all;
/// "nothing known" never masquerades as "known to be empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    collections: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Index every collection under the archive root.
    ///
    /// One [`variables_of`] call per entry of
    /// [`archive::list_collections`]; entries that answer `None` are
    /// omitted.
    pub fn build<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let mut collections = BTreeMap::new();
        for collection in archive::list_collections(root)? {
            if let Some(variables) = variables_of(root, &collection)? {
                collections.insert(collection, variables);
            }
        }
        Ok(Catalog { collections })
    }

    /// The variables of one collection, or `None` when the catalog
    /// holds nothing for it.
    pub fn variables(&self, collection: &str) -> Option<&[String]> {
        self.collections.get(collection).map(Vec::as_slice)
    }

    /// Collection names in catalog order (lexical).
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// `(collection, variables)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.collections
            .iter()
            .map(|(name, variables)| (name.as_str(), variables.as_slice()))
    }

    /// The collections providing `variable`, in catalog order.
    pub fn find_variable(&self, variable: &str) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|(_, variables)| variables.iter().any(|known| known == variable))
            .map(|(collection, _)| collection.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

/// The collections under `root` providing `variable`, in catalog order.
///
/// A variable found nowhere is an empty list plus a warning, not an
/// error: no data is a valid answer.
pub fn find_variable<P: AsRef<Path>>(root: P, variable: &str) -> Result<Vec<String>> {
    let catalog = Catalog::build(root)?;
    let found: Vec<String> = catalog
        .find_variable(variable)
        .into_iter()
        .map(str::to_string)
        .collect();
    if found.is_empty() {
        diagnostics::log_warn!("variable {variable} not found in any collection", variable: variable);
    }
    Ok(found)
}

/// Whether a collection name marks itself as regridded onto the
/// 1x1-degree grid: its last underscore token equals `1x1deg`.
///
/// Purely lexical. The convention lives with the people who configure
/// the postprocessor, not in the archive, so collections named outside
/// it are misclassified.
pub fn is_regridded_1x1(collection: &str) -> bool {
    collection.rsplit('_').next() == Some(REGRID_MARKER)
}
