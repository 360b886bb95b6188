//! Superficial normalization applied to a corpus before discovery
//!
//! File names are canonicalized, a package header is added where missing,
//! line comments are stripped, and each fragment is handed to an external
//! syntax checker. None of this changes what a fragment does.

use super::{has_extension, HEADER_KEYWORD};
use crate::error::ToolInvocationError;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

const DEFAULT_HEADER: &str = "package main\n\n";

/// Per-file limit for the external syntax checker
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Counters accumulated while normalizing a corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub files_renamed: usize,
    pub total_files: usize,
    pub package_updates: usize,
    pub parsed_success: usize,
    pub parse_errors: usize,
    /// Fragment path to the checker's diagnostic text
    pub parse_error_details: BTreeMap<PathBuf, String>,
    /// Whether the external checker was found
    pub checker_available: bool,
}

/// `name` lowercased, without underscores, ending in `.{extension}`
pub fn normalize_filename(name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    let mut name = name.to_string();
    if !name.ends_with(&suffix) {
        name.push_str(&suffix);
    }
    name.to_lowercase().replace('_', "")
}

/// Renames every file under `root` to its normalized name.
///
/// A rename whose target already exists is skipped and logged.
pub fn rename_files(root: &Path, extension: &str) -> usize {
    let mut renamed = 0;

    let files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_file() => Some(e.into_path()),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read directory entry");
                None
            }
        })
        .collect();

    for path in files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let new_name = normalize_filename(&name, extension);
        if new_name == name {
            continue;
        }

        let target = path.with_file_name(&new_name);
        if target.exists() {
            error!(
                from = %path.display(),
                to = %target.display(),
                "Cannot rename, target already exists"
            );
            continue;
        }

        match fs::rename(&path, &target) {
            Ok(()) => {
                info!(from = %path.display(), to = %target.display(), "Renamed");
                renamed += 1;
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Rename failed");
            }
        }
    }

    info!(renamed, "Total files renamed");
    renamed
}

/// Prepends a default package header when the first line lacks one.
/// Returns whether the file was rewritten.
pub fn ensure_package_declaration(path: &Path) -> io::Result<bool> {
    let content = fs::read_to_string(path)?;
    let has_header = content
        .lines()
        .next()
        .map(|line| line.trim().starts_with(HEADER_KEYWORD))
        .unwrap_or(false);
    if has_header {
        return Ok(false);
    }

    fs::write(path, format!("{}{}", DEFAULT_HEADER, content))?;
    debug!(path = %path.display(), "Added package declaration");
    Ok(true)
}

fn line_comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//.*").expect("static regex"))
}

/// Removes `//` comments through end of line
pub fn strip_line_comments(content: &str) -> String {
    line_comment_regex().replace_all(content, "").into_owned()
}

/// Strips line comments from the file in place
pub fn remove_line_comments(path: &Path) -> io::Result<()> {
    let content = fs::read_to_string(path)?;
    let stripped = strip_line_comments(&content);
    if stripped != content {
        fs::write(path, stripped)?;
        debug!(path = %path.display(), "Removed line comments");
    }
    Ok(())
}

/// Verdict of the external syntax checker for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxVerdict {
    Valid,
    Invalid(String),
    /// The checker executable was not found
    Unavailable,
}

/// External syntax checker, invoked as `<program> [args..] -e <path>`
#[derive(Debug, Clone)]
pub struct SyntaxChecker {
    program: PathBuf,
    leading_args: Vec<String>,
    timeout: Duration,
}

impl SyntaxChecker {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn check(&self, path: &Path) -> Result<SyntaxVerdict, ToolInvocationError> {
        let spawned = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("-e")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SyntaxVerdict::Unavailable),
            Err(e) => return Err(self.spawn_error(e)),
        };

        // dropping the wait future on timeout kills the child
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(out)) if out.status.success() => Ok(SyntaxVerdict::Valid),
            Ok(Ok(out)) => Ok(SyntaxVerdict::Invalid(
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            )),
            Ok(Err(e)) => Err(self.spawn_error(e)),
            Err(_) => Err(ToolInvocationError::Timeout(self.timeout)),
        }
    }

    fn spawn_error(&self, e: io::Error) -> ToolInvocationError {
        ToolInvocationError::Spawn {
            program: self.program.display().to_string(),
            message: e.to_string(),
        }
    }
}

/// Runs the full normalization pass over every fragment under `root`
pub async fn normalize_corpus(
    root: &Path,
    extension: &str,
    checker: &SyntaxChecker,
) -> NormalizeStats {
    let mut stats = NormalizeStats {
        files_renamed: rename_files(root, extension),
        checker_available: true,
        ..Default::default()
    };

    let fragments: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), extension))
        .map(|e| e.into_path())
        .collect();

    let mut warned_missing = false;
    for path in fragments {
        stats.total_files += 1;

        match ensure_package_declaration(&path) {
            Ok(true) => stats.package_updates += 1,
            Ok(false) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to update package declaration"),
        }
        if let Err(e) = remove_line_comments(&path) {
            warn!(path = %path.display(), error = %e, "Failed to strip comments");
        }

        let verdict = checker.check(&path).await.unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Syntax check failed to run");
            SyntaxVerdict::Invalid(e.to_string())
        });

        match verdict {
            SyntaxVerdict::Valid => stats.parsed_success += 1,
            SyntaxVerdict::Unavailable => {
                if !warned_missing {
                    warn!(checker = %checker.program.display(), "Syntax checker not found, skipping format checks");
                    warned_missing = true;
                }
                stats.checker_available = false;
                stats.parsed_success += 1;
            }
            SyntaxVerdict::Invalid(message) => {
                error!(path = %path.display(), diagnostics = %message, "Parse error");
                stats.parse_errors += 1;
                stats.parse_error_details.insert(path, message);
            }
        }
    }

    info!(
        total = stats.total_files,
        package_updates = stats.package_updates,
        parse_errors = stats.parse_errors,
        "Normalization complete"
    );

    stats
}
