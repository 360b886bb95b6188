//! Skeleton corpus model
//!
//! A corpus root holds one subdirectory per case; each valid case owns
//! exactly two fragment files. The graph is built once by
//! [`discover`] and is read-only for every later stage.

mod combined;
mod discovery;
pub mod normalize;

pub use combined::{write_combined_file, CombinedFile};
pub use discovery::{check_root, discover, Discovery};

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Leading keyword of a fragment's package header
pub const HEADER_KEYWORD: &str = "package";

/// Line comment marker
pub const LINE_COMMENT: &str = "//";

/// Per-file statistics reported alongside analyzer results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentStats {
    pub size: u64,
    pub line_count: usize,
    pub has_package: bool,
    pub has_comments: bool,
}

impl FragmentStats {
    pub fn from_content(size: u64, content: &str) -> Self {
        let header = format!("{} ", HEADER_KEYWORD);
        Self {
            size,
            line_count: content.lines().count(),
            has_package: content.lines().any(|l| l.trim().starts_with(&header)),
            has_comments: content.lines().any(|l| l.contains(LINE_COMMENT)),
        }
    }
}

/// One side of a candidate race
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub path: PathBuf,
    pub name: String,
    pub content: String,
    pub stats: FragmentStats,
}

impl Fragment {
    /// Reads a fragment from disk. An unreadable file yields empty content
    /// and default stats rather than an error.
    pub fn load(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (content, stats) = match fs::read(path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                let stats = FragmentStats::from_content(bytes.len() as u64, &content);
                (content, stats)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read fragment");
                (String::new(), FragmentStats::default())
            }
        };

        Self {
            path: path.to_path_buf(),
            name,
            content,
            stats,
        }
    }
}

/// A named pair of fragments, ordered by file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub dir: PathBuf,
    pub first: Fragment,
    pub second: Fragment,
}

impl Case {
    pub fn fragments(&self) -> [&Fragment; 2] {
        [&self.first, &self.second]
    }
}

/// Returns true when `path` ends in `.{extension}`
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy() == extension)
        .unwrap_or(false)
}
