//! Shared helpers for integration tests: throwaway corpora and a shell
//! stand-in for the analyzer.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Analyzer stand-in. Fails for any path containing `fail`, otherwise
/// reports a write when the fragment assigns to a `racyVarN`.
pub const STUB_ANALYZER: &str = r#"path="$2"
case "$path" in
  *fail*)
    echo "Error analyzing file: $path: expected declaration" >&2
    exit 1
    ;;
esac
line=$(grep -m1 'racyVar[0-9][0-9]* *= ' "$path" | sed 's/^[[:space:]]*//')
if [ -n "$line" ]; then
  printf '{"file":"%s","has_write":true,"line_content":"%s"}\n' "$path" "$line"
else
  printf '{"file":"%s","has_write":false}\n' "$path"
fi
"#;

/// A corpus root plus a separate directory for tools and outputs
pub struct Workspace {
    pub corpus: TempDir,
    pub scratch: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            corpus: TempDir::new().unwrap(),
            scratch: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.corpus.path()
    }

    /// Writes `case/name` under the corpus root
    pub fn fragment(&self, case: &str, name: &str, content: &str) -> PathBuf {
        let dir = self.corpus.path().join(case);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Installs the stub analyzer script and returns its path
    pub fn analyzer_script(&self) -> PathBuf {
        let path = self.scratch.path().join("analyzer.sh");
        fs::write(&path, STUB_ANALYZER).unwrap();
        path
    }

    pub fn combined(&self) -> PathBuf {
        self.scratch.path().join("out/combined.go")
    }

    pub fn csv(&self) -> PathBuf {
        self.scratch.path().join("out/report.csv")
    }

    /// Report rows without the header, split on commas
    pub fn csv_rows(&self) -> Vec<Vec<String>> {
        let text = fs::read_to_string(self.csv()).unwrap();
        text.lines()
            .skip(1)
            .map(|l| l.split(',').map(str::to_string).collect())
            .collect()
    }
}
