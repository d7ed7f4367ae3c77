//! Wildcard expansion against the host filesystem.
//!
//! The archive convention only ever needs single-segment wildcards:
//! `*` inside one path component, possibly several per component, as in
//! `ocean_monthly.*.*.nc`. Directory entries are visited in lexical
//! order, so an expansion is deterministic no matter what order the
//! filesystem hands entries back in. Hidden entries are invisible to
//! wildcards; a component must start with the `.` literally to match
//! one.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// One component of a wildcard pattern.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PatternPart {
    /// A component with no wildcards; must match a name exactly.
    Literal(String),
    /// A component containing `*` wildcards, split on `*` into the
    /// literal segments that must appear in order. `"a*b"` becomes
    /// `["a", "b"]`, `"*.nc"` becomes `["", ".nc"]`.
    Wildcard { segments: Vec<String> },
}

impl PatternPart {
    fn parse(component: &str) -> Self {
        if component.contains('*') {
            PatternPart::Wildcard {
                segments: component.split('*').map(str::to_string).collect(),
            }
        } else {
            PatternPart::Literal(component.to_string())
        }
    }

    /// Whether `name` matches this component. A wildcard never matches
    /// a leading dot, so hidden entries need a component that spells
    /// the dot out.
    pub(crate) fn matches(&self, name: &str) -> bool {
        match self {
            PatternPart::Literal(text) => name == text,
            PatternPart::Wildcard { segments } => {
                if name.starts_with('.') && !segments.first().is_some_and(|s| s.starts_with('.')) {
                    return false;
                }
                match_segments(name, segments)
            }
        }
    }
}

/// Match `name` against the literal segments of a wildcard component:
/// the first segment anchors at the start, the last at the end, and the
/// rest must appear in between, in order, without overlapping.
fn match_segments(name: &str, segments: &[String]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return true;
    };
    let Some((last, middle)) = rest.split_last() else {
        // A single segment means no '*' was present; parse() routes
        // that case to Literal, so only exact equality is left here.
        return name == first;
    };
    if !name.starts_with(first.as_str()) || !name.ends_with(last.as_str()) {
        return false;
    }
    if name.len() < first.len() + last.len() {
        // The anchored prefix and suffix may not overlap.
        return false;
    }
    let mut window = &name[first.len()..name.len() - last.len()];
    for segment in middle {
        if segment.is_empty() {
            // Consecutive wildcards collapse.
            continue;
        }
        match window.find(segment.as_str()) {
            Some(at) => window = &window[at + segment.len()..],
            None => return false,
        }
    }
    true
}

/// A parsed pattern: where the walk starts plus the component sequence.
#[derive(Debug, PartialEq)]
pub(crate) struct GlobPattern {
    /// `/` for absolute patterns, empty for relative ones.
    root: PathBuf,
    parts: Vec<PatternPart>,
}

pub(crate) fn parse_pattern<P: AsRef<Path>>(pattern: P) -> Result<GlobPattern> {
    let path = pattern.as_ref();
    let mut root = PathBuf::new();
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::RootDir => root.push("/"),
            Component::CurDir => {}
            Component::Normal(name) => {
                let text = name
                    .to_str()
                    .ok_or_else(|| Error::InvalidComponent(name.to_string_lossy().into_owned()))?;
                parts.push(PatternPart::parse(text));
            }
            _ => return Err(Error::InvalidComponent(path.display().to_string())),
        }
    }
    Ok(GlobPattern { root, parts })
}

/// Expand a wildcard pattern against the filesystem.
///
/// Matches come back in lexical order. A pattern that matches nothing,
/// including one that points into a directory that does not exist,
/// expands to an empty list rather than an error; callers that need
/// data must check for emptiness themselves.
pub fn expand<P: AsRef<Path>>(pattern: P) -> Result<Vec<PathBuf>> {
    let parsed = parse_pattern(&pattern)?;
    let mut matches = Vec::new();
    visit(&parsed.root, &parsed.parts, &mut matches);
    Ok(matches)
}

fn visit(current: &Path, parts: &[PatternPart], matches: &mut Vec<PathBuf>) {
    let Some((part, rest)) = parts.split_first() else {
        return;
    };
    match part {
        PatternPart::Literal(name) => {
            let child = current.join(name);
            if rest.is_empty() {
                if child.exists() {
                    matches.push(child);
                }
            } else if child.is_dir() {
                visit(&child, rest, matches);
            }
        }
        PatternPart::Wildcard { .. } => {
            for name in list_dir_sorted(current) {
                if !part.matches(&name) {
                    continue;
                }
                let child = current.join(&name);
                if rest.is_empty() {
                    matches.push(child);
                } else if child.is_dir() {
                    visit(&child, rest, matches);
                }
            }
        }
    }
}

/// Directory entries in lexical order. Missing or unreadable
/// directories list as empty; entries whose names are not valid UTF-8
/// are skipped.
pub(crate) fn list_dir_sorted(path: &Path) -> Vec<String> {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let mut names: Vec<String> = match std::fs::read_dir(path) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_exactly() {
        let part = PatternPart::parse("file.nc");
        assert!(matches!(part, PatternPart::Literal(_)));
        assert!(part.matches("file.nc"));
        assert!(!part.matches("other.nc"));
    }

    #[test]
    fn wildcard_prefix_suffix() {
        let part = PatternPart::parse("ocean.*.nc");
        assert!(part.matches("ocean.0851.nc"));
        assert!(part.matches("ocean..nc"));
        assert!(!part.matches("atmos.0851.nc"));
        assert!(!part.matches("ocean.0851.txt"));
    }

    #[test]
    fn multiple_wildcards_in_one_component() {
        let part = PatternPart::parse("ocean_monthly.*.*.nc");
        assert!(part.matches("ocean_monthly.185001-185412.tos.nc"));
        assert!(part.matches("ocean_monthly.0851.01.nc"));
        assert!(!part.matches("ocean_monthly.0851.nc"));
        assert!(!part.matches("ocean_annual.0851.01.nc"));
    }

    #[test]
    fn bare_star_matches_everything() {
        let part = PatternPart::parse("*");
        assert!(part.matches("anything"));
        assert!(part.matches(""));
    }

    #[test]
    fn wildcards_never_match_hidden_names() {
        assert!(!PatternPart::parse("*").matches(".snapshot"));
        assert!(!PatternPart::parse("*.nc").matches(".partial.nc"));
        // Spelling the dot out reaches them.
        assert!(PatternPart::parse(".snap*").matches(".snapshot"));
        assert!(PatternPart::parse(".partial.nc").matches(".partial.nc"));
    }

    #[test]
    fn anchors_may_not_overlap() {
        let part = PatternPart::parse("x*x");
        assert!(part.matches("xx"));
        assert!(part.matches("xyx"));
        assert!(!part.matches("x"));
    }

    #[test]
    fn parse_splits_absolute_patterns() {
        let parsed = parse_pattern("/archive/pp/*.nc").unwrap();
        assert_eq!(parsed.root, PathBuf::from("/"));
        assert_eq!(parsed.parts.len(), 3);
        assert!(matches!(parsed.parts[0], PatternPart::Literal(ref s) if s == "archive"));
        assert!(matches!(parsed.parts[2], PatternPart::Wildcard { .. }));
    }

    #[test]
    fn parse_rejects_parent_components() {
        assert!(matches!(
            parse_pattern("a/../b"),
            Err(Error::InvalidComponent(_))
        ));
    }

    #[test]
    fn expand_sorts_matches() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.nc", "a.nc", "c.nc", "skip.txt"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let found = expand(tmp.path().join("*.nc")).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.nc", "b.nc", "c.nc"]);
    }

    #[test]
    fn expand_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let found = expand(tmp.path().join("no_such_dir/*.nc")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn expand_no_match_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("data.txt"), b"x").unwrap();
        let found = expand(tmp.path().join("*.nc")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn expand_leaves_hidden_entries_to_explicit_patterns() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("data.nc"), b"x").unwrap();
        std::fs::write(tmp.path().join(".partial.nc"), b"x").unwrap();
        let hidden_dir = tmp.path().join(".backup");
        std::fs::create_dir_all(&hidden_dir).unwrap();
        std::fs::write(hidden_dir.join("data.nc"), b"x").unwrap();

        assert_eq!(
            expand(tmp.path().join("*.nc")).unwrap(),
            vec![tmp.path().join("data.nc")]
        );
        assert!(expand(tmp.path().join("*/*.nc")).unwrap().is_empty());
        assert_eq!(
            expand(tmp.path().join(".partial*")).unwrap(),
            vec![tmp.path().join(".partial.nc")]
        );
    }

    #[test]
    fn expand_descends_through_wildcard_directories() {
        let tmp = tempfile::tempdir().unwrap();
        for chunk in ["5yr", "20yr"] {
            let dir = tmp.path().join("monthly").join(chunk);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("ocean.tos.nc"), b"x").unwrap();
        }
        let found = expand(tmp.path().join("*/*/ocean.tos.nc")).unwrap();
        assert_eq!(found.len(), 2);
        // 20yr sorts before 5yr lexically.
        assert!(found[0].to_str().unwrap().contains("20yr"));
        assert!(found[1].to_str().unwrap().contains("5yr"));
    }

    #[test]
    fn expand_literal_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("grid.static.nc");
        std::fs::write(&file, b"x").unwrap();
        assert_eq!(expand(&file).unwrap(), vec![file.clone()]);
        assert!(expand(tmp.path().join("absent.nc")).unwrap().is_empty());
    }
}
