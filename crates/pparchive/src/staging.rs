//! Staging archived files onto fast disk.
//!
//! Archive files can be tape-resident. The DMF tools move them:
//! `dmget` recalls files to disk (asynchronously; the request outlives
//! the dispatching process), `dmwho` lists whose requests are still
//! queued, and `dmls -l` reports each file's migration state.
//!
//! [`Stager`] only dispatches and inspects. Completion is the caller's
//! loop: dispatch with [`Stager::request`], then poll
//! [`Stager::residency`] until everything needed is on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

/// Migration states meaning the file is usable from disk: `REG` is an
/// unmigrated regular file, `DUL` has a tape copy as well. Everything
/// else (`OFL`, `MIG`, `UNM`, `NMG`, `PAR`) still needs a recall.
const RESIDENT_MARKERS: [&str; 2] = ["REG", "DUL"];

/// The parenthesized state token in a `dmls -l` line, e.g. `(OFL)`.
static STATE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z]+)\)").expect("state marker pattern is valid"));

/// The staging subsystem as the controller sees it.
///
/// One implementation shells out to the DMF tools; tests script their
/// own. Keeping this surface narrow keeps every queue and residency
/// decision in [`Stager`], where it can be exercised without a tape
/// silo.
pub trait StagingSystem {
    /// Dispatch one detached staging request covering `paths`. Returns
    /// once the request is handed off; completion is neither awaited
    /// nor reported.
    fn dispatch(&self, paths: &[PathBuf]) -> Result<()>;

    /// The queue listing filtered to `user`'s outstanding requests, one
    /// request per line. Empty output means a clean queue.
    fn queue_listing(&self, user: &str) -> Result<String>;

    /// File metadata in `dmls -l` form: one line per listable path,
    /// state marker in parentheses, the path itself as the last
    /// whitespace-delimited field.
    fn file_listing(&self, paths: &[PathBuf]) -> Result<String>;
}

/// The real DMF command-line tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmfTools;

impl DmfTools {
    /// An [`Error::StagingUnavailable`] for a command that ran but
    /// produced nothing usable.
    fn command_failed(command: &str, output: &std::process::Output) -> Error {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Error::staging_unavailable(
            command,
            std::io::Error::other(format!("{}: {}", output.status, stderr.trim())),
        )
    }
}

impl StagingSystem for DmfTools {
    fn dispatch(&self, paths: &[PathBuf]) -> Result<()> {
        // dmget blocks until the recall lands, which can take hours.
        // The shell backgrounds it and exits at once, so the recall
        // outlives this process and leaves no child behind to reap.
        let status = Command::new("sh")
            .arg("-c")
            .arg(r#"dmget "$@" &"#)
            .arg("dmget")
            .args(paths)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| Error::staging_unavailable("dmget", err))?;
        if !status.success() {
            return Err(Error::staging_unavailable(
                "dmget",
                std::io::Error::other(format!("dispatch shell exited {status}")),
            ));
        }
        Ok(())
    }

    fn queue_listing(&self, user: &str) -> Result<String> {
        let output = Command::new("dmwho")
            .output()
            .map_err(|err| Error::staging_unavailable("dmwho", err))?;
        if !output.status.success() && output.stdout.is_empty() {
            return Err(Self::command_failed("dmwho", &output));
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text
            .lines()
            .filter(|line| line.split_whitespace().any(|field| field == user))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn file_listing(&self, paths: &[PathBuf]) -> Result<String> {
        let output = Command::new("dmls")
            .arg("-l")
            .args(paths)
            .output()
            .map_err(|err| Error::staging_unavailable("dmls", err))?;
        // dmls keeps listing past per-file errors; only a run that
        // produced nothing at all counts as the subsystem failing.
        if !output.status.success() && output.stdout.is_empty() {
            return Err(Self::command_failed("dmls", &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Outcome of one queue inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    /// At least one of the user's requests is still queued.
    pub pending: bool,
    /// The raw listing, for human eyes; empty when the queue is clean.
    pub raw: String,
}

/// Residency classification for one set of paths, one entry per path.
///
/// A snapshot, not a cache: the tape library keeps working after this
/// is built, so ask again rather than holding on to one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Residency {
    files: BTreeMap<PathBuf, bool>,
}

impl Residency {
    /// Whether `path` was classified resident. Paths that were never
    /// queried answer `false`.
    pub fn is_resident<P: AsRef<Path>>(&self, path: P) -> bool {
        self.files.get(path.as_ref()).copied().unwrap_or(false)
    }

    /// True when every queried file is on disk.
    pub fn all_resident(&self) -> bool {
        self.files.values().all(|resident| *resident)
    }

    /// The files still waiting on tape, in path order.
    pub fn missing(&self) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|(_, resident)| !**resident)
            .map(|(path, _)| path.as_path())
            .collect()
    }

    /// `(path, resident)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, bool)> {
        self.files
            .iter()
            .map(|(path, resident)| (path.as_path(), *resident))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Issues and inspects staging requests through a [`StagingSystem`].
pub struct Stager {
    system: Box<dyn StagingSystem>,
}

impl Stager {
    pub fn new(system: Box<dyn StagingSystem>) -> Self {
        Stager { system }
    }

    /// A controller talking to the real DMF tools.
    pub fn dmf() -> Self {
        Stager::new(Box::new(DmfTools))
    }

    /// Ask the subsystem to stage `paths` to disk.
    ///
    /// Fire and forget: one request covers the whole set and the call
    /// returns as soon as the request is handed off. `Ok` means the
    /// request was dispatched, not that any file is on disk; poll
    /// [`residency`](Stager::residency) to learn when files arrive.
    /// An empty set dispatches nothing.
    pub fn request<I, P>(&self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            diagnostics::log_debug!("staging request with no paths, nothing to dispatch");
            return Ok(());
        }
        diagnostics::log_info!("dispatching staging request for {count} files", count: paths.len());
        self.system.dispatch(&paths)
    }

    /// Whether `user` still has staging requests queued.
    ///
    /// No output from the queue listing means a clean queue; any line
    /// means at least one request is pending.
    pub fn queue_status(&self, user: &str) -> Result<QueueStatus> {
        let raw = self.system.queue_listing(user)?;
        let pending = !raw.trim().is_empty();
        Ok(QueueStatus { pending, raw })
    }

    /// Which of `paths` are on fast disk right now.
    ///
    /// One entry per input path. A path without a parseable metadata
    /// line classifies as not resident; only failure to invoke the
    /// subsystem is an error, so a broken subsystem never reads as
    /// "everything is on tape".
    pub fn residency(&self, paths: &[PathBuf]) -> Result<Residency> {
        let raw = self.system.file_listing(paths)?;
        let markers = parse_listing(&raw);
        let mut files = BTreeMap::new();
        for path in paths {
            let name = path.to_string_lossy();
            let resident = match markers.get(name.as_ref()) {
                Some(marker) => RESIDENT_MARKERS.contains(&marker.as_str()),
                None => {
                    diagnostics::log_debug!("no metadata line for {path}, classifying as not resident", path: name.as_ref());
                    false
                }
            };
            files.insert(path.clone(), resident);
        }
        Ok(Residency { files })
    }
}

/// Map each listed path (the last whitespace field of its line) to its
/// state marker. Lines without a marker are skipped.
fn parse_listing(raw: &str) -> BTreeMap<String, String> {
    let mut markers = BTreeMap::new();
    for line in raw.lines() {
        let Some(captures) = STATE_MARKER.captures(line) else {
            continue;
        };
        let Some(path) = line.split_whitespace().last() else {
            continue;
        };
        markers.insert(path.to_string(), captures[1].to_string());
    }
    markers
}
