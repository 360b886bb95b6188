use super::has_extension;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// What went into a combined file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedFile {
    /// Fragments written
    pub fragments: usize,
    /// Fragments that could not be read and were left out
    pub skipped: Vec<PathBuf>,
}

/// Concatenates every fragment under `root` into `output`.
///
/// Each fragment is preceded by a `// <path>` line and followed by a blank
/// line. Directories are walked in sorted order, files within a directory
/// by name, and symlinks are followed. A fragment that cannot be read is
/// logged and skipped; only failures to write `output` are errors.
pub fn write_combined_file(
    root: &Path,
    output: &Path,
    extension: &str,
) -> io::Result<CombinedFile> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(output)?);
    let output_id = fs::canonicalize(output)?;
    let mut combined = CombinedFile::default();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by(|a, b| {
            // files before subdirectories, then by name
            let a_dir = a.file_type().is_dir();
            let b_dir = b.file_type().is_dir();
            a_dir.cmp(&b_dir).then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !has_extension(path, extension) {
            continue;
        }
        if fs::canonicalize(path).map(|p| p == output_id).unwrap_or(false) {
            continue;
        }

        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable fragment");
                combined.skipped.push(path.to_path_buf());
                continue;
            }
        };
        writeln!(writer, "// {}", path.display())?;
        writer.write_all(&content)?;
        writer.write_all(b"\n\n")?;
        combined.fragments += 1;
    }

    writer.flush()?;
    info!(
        output = %output.display(),
        fragments = combined.fragments,
        skipped = combined.skipped.len(),
        "Combined file created"
    );
    Ok(combined)
}
