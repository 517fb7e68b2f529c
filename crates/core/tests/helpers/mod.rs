//! Test harness for whole-tree generation tests.
//!
//! Copies a fixture tree into `<tempdir>/Source` so the sibling `generated/`
//! output directory also lands inside the temp dir.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct FixtureTree {
    pub source: PathBuf,
    _temp_dir: TempDir,
}

impl FixtureTree {
    /// Create a tree from a named fixture directory under `tests/fixtures`.
    pub fn from_fixture(name: &str) -> Self {
        let fixture_src = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
        assert!(fixture_src.exists(), "Fixture '{name}' not found at {}", fixture_src.display());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("Source");
        copy_dir_recursive(&fixture_src, &source);

        FixtureTree { source, _temp_dir: temp_dir }
    }

    /// The directory the default config writes into.
    pub fn generated(&self) -> PathBuf {
        self.source.canonicalize().expect("Source dir vanished").parent().unwrap().join("generated")
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.source.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).expect("Failed to create dir");
        std::fs::write(path, content).expect("Failed to write file");
    }
}

/// Recursively copy a directory tree. Preserves file contents but not metadata.
pub fn copy_dir_recursive(src: &Path, dst: &Path) {
    if !dst.exists() {
        std::fs::create_dir_all(dst).expect("Failed to create dir");
    }
    for entry in std::fs::read_dir(src).expect("Failed to read dir") {
        let entry = entry.expect("Failed to read entry");
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path);
        } else {
            std::fs::copy(&src_path, &dst_path).expect("Failed to copy file");
        }
    }
}

/// Read every file under `root` into `(relative path, content)` pairs, sorted.
pub fn snapshot(root: &Path) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).expect("Failed to read dir") {
            let path = entry.expect("Failed to read entry").path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.push((rel, std::fs::read_to_string(&path).expect("Failed to read file")));
            }
        }
    }
    out.sort();
    out
}
