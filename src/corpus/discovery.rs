use super::{has_extension, Case, Fragment};
use crate::error::{DiscoveryError, StructuralError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of walking a corpus root
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Valid cases, in ascending directory-name order
    pub cases: Vec<Case>,
    /// Directories that did not hold exactly two fragments
    pub excluded: Vec<StructuralError>,
    /// Number of immediate subdirectories seen
    pub total_subdirs: usize,
}

impl Discovery {
    pub fn fragment_count(&self) -> usize {
        self.cases.len() * 2
    }

    /// All fragments of all valid cases, first before second, case by case
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.cases.iter().flat_map(|case| case.fragments())
    }
}

/// Fails unless `root` exists and is a directory
pub fn check_root(root: &Path) -> Result<(), DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Groups the immediate subdirectories of `root` into cases.
///
/// Only a missing or unreadable root is an error. Subdirectories that cannot
/// be listed, or that hold a fragment count other than two, are excluded
/// with a warning.
pub fn discover(root: &Path, extension: &str) -> Result<Discovery, DiscoveryError> {
    check_root(root)?;

    let entries = fs::read_dir(root).map_err(|source| DiscoveryError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::Unreadable {
            path: root.to_path_buf(),
            source,
        })?;
        // follows symlinks, so a linked case directory counts
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    let mut discovery = Discovery {
        total_subdirs: subdirs.len(),
        ..Default::default()
    };

    if subdirs.is_empty() {
        warn!(root = %root.display(), "No subdirectories found");
        return Ok(discovery);
    }

    for dir in subdirs {
        let case_id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut files = match fragment_paths(&dir, extension) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to list case directory");
                discovery.excluded.push(StructuralError {
                    case_id,
                    dir,
                    found: 0,
                    extension: extension.to_string(),
                });
                continue;
            }
        };

        if files.len() != 2 {
            let issue = StructuralError {
                case_id,
                dir,
                found: files.len(),
                extension: extension.to_string(),
            };
            warn!("{}", issue);
            discovery.excluded.push(issue);
            continue;
        }

        let second = files.pop().map(|p| Fragment::load(&p));
        let first = files.pop().map(|p| Fragment::load(&p));
        if let (Some(first), Some(second)) = (first, second) {
            debug!(case = %case_id, first = %first.name, second = %second.name, "Discovered case");
            discovery.cases.push(Case {
                id: case_id,
                dir,
                first,
                second,
            });
        }
    }

    info!(
        root = %root.display(),
        subdirs = discovery.total_subdirs,
        cases = discovery.cases.len(),
        excluded = discovery.excluded.len(),
        "Discovery complete"
    );

    Ok(discovery)
}

/// Files (or links to files) in `dir` with the fragment extension, sorted by name
fn fragment_paths(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
