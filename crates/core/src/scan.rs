//! Input discovery: walk the root recursively and collect every regular file
//! with an eligible extension. The full list is built and sorted before any
//! file is processed.

use crate::types::GenConfig;
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// An input file discovered under the root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InputFile {
    pub abs_path: PathBuf,
    /// Path relative to the root, `/`-separated.
    pub rel_path: String,
}

/// Does `path` carry one of the configured extensions?
pub fn is_eligible(path: &Path, extensions: &BTreeSet<String>) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| extensions.contains(ext))
}

// ---------------------------------------------------------------------------
// Parallel file walking
// ---------------------------------------------------------------------------

/// Collect eligible files under `root` using a parallel directory walk.
///
/// Hidden files and ignore files are not honoured: every regular file is a
/// candidate, only `skip_dirs` prunes. Symlinked directories are not followed;
/// a symlink that resolves to a regular file is a candidate.
pub fn collect_files(root: &Path, config: &GenConfig) -> Vec<InputFile> {
    let results: Mutex<Vec<InputFile>> = Mutex::new(Vec::new());
    let skip = config.skip_dirs.clone();

    WalkBuilder::new(root)
        .standard_filters(false)
        .threads(rayon::current_num_threads().min(12))
        .filter_entry(move |entry| {
            if entry.depth() > 0 && entry.file_type().is_some_and(|ft| ft.is_dir()) {
                let name = entry.file_name().to_string_lossy();
                return !skip.contains(name.as_ref());
            }
            true
        })
        .build_parallel()
        .run(|| {
            Box::new(|entry| {
                let entry = match entry {
                    Ok(e) => e,
                    Err(err) => {
                        tracing::warn!(error = %err, "Skipping unreadable entry");
                        return ignore::WalkState::Continue;
                    }
                };
                let is_file = entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file() || (ft.is_symlink() && entry.path().is_file()));
                if !is_file {
                    return ignore::WalkState::Continue;
                }

                let abs_path = entry.path().to_path_buf();
                if !is_eligible(&abs_path, &config.extensions) {
                    return ignore::WalkState::Continue;
                }

                let rel_path = abs_path
                    .strip_prefix(root)
                    .unwrap_or(&abs_path)
                    .to_string_lossy()
                    .replace('\\', "/");

                results
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(InputFile { abs_path, rel_path });
                ignore::WalkState::Continue
            })
        });

    let mut files = results.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_is_eligible() {
        let exts = GenConfig::default().extensions;
        assert!(is_eligible(Path::new("a/Actor.h"), &exts));
        assert!(is_eligible(Path::new("Actor.hpp"), &exts));
        assert!(is_eligible(Path::new("Actor.cpp"), &exts));
        assert!(!is_eligible(Path::new("Actor.hxx"), &exts));
        assert!(!is_eligible(Path::new("Makefile"), &exts));
        assert!(!is_eligible(Path::new("Actor.H.txt"), &exts));
    }

    #[test]
    fn test_collect_files_recursive_and_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("b/Zeta.h"));
        touch(&root.join("a/deep/er/Alpha.hpp"));
        touch(&root.join("Main.cpp"));
        touch(&root.join("notes.txt"));
        touch(&root.join(".hidden/Secret.h"));

        let files = collect_files(root, &GenConfig::default());
        let rels: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec![".hidden/Secret.h", "Main.cpp", "a/deep/er/Alpha.hpp", "b/Zeta.h"]);
        assert!(files.iter().all(|f| f.abs_path.is_absolute() || f.abs_path.starts_with(root)));
    }

    #[test]
    fn test_skip_dirs_prune_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("Intermediate/Gen.h"));
        touch(&root.join("Public/Keep.h"));

        let mut config = GenConfig::default();
        config.skip_dirs.insert("Intermediate".to_string());
        let files = collect_files(root, &config);
        let rels: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["Public/Keep.h"]);
    }

    #[test]
    fn test_empty_root() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(collect_files(tmp.path(), &GenConfig::default()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_header_is_collected() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Source");
        let shared = tmp.path().join("shared");
        touch(&shared.join("Shared.h"));
        touch(&shared.join("Nested/Inner.h"));
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(shared.join("Shared.h"), root.join("Linked.h")).unwrap();
        std::os::unix::fs::symlink(shared.join("Nested"), root.join("LinkedDir")).unwrap();
        std::os::unix::fs::symlink(shared.join("Gone.h"), root.join("Dangling.h")).unwrap();

        let files = collect_files(&root, &GenConfig::default());
        let rels: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["Linked.h"]);
    }
}
