//! bodygen — out-of-line stub generator for SDK-style C++ headers.
//!
//! Scans a directory tree of headers and sources, finds class members that are
//! declared but never defined, and writes `<stem>_generated.hpp` companions whose
//! bodies forward every call through a name-based dispatch runtime.
//!
//! # Modules
//!
//! - [`extract`] — Heuristic signature extraction from one class body
//! - [`stubgen`] — Stub body and definition rendering
//! - [`process`] — Per-file include collection, class capture, output writing
//! - [`scan`] — Recursive discovery of eligible input files
//! - [`dispatch`] — Fixed worker pool with exactly-once file distribution
//! - [`types`] — Core types shared across the crate
//! - [`error`] — Error types

pub mod dispatch;
pub mod error;
pub mod extract;
pub mod process;
pub mod scan;
pub mod stubgen;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use error::{GenError, Result};
use types::*;

// ---------------------------------------------------------------------------
// .bodygen.toml config loading
// ---------------------------------------------------------------------------

/// Name of the optional config file looked up in the input root.
pub const CONFIG_FILE: &str = ".bodygen.toml";

/// Known keys in `.bodygen.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &["extensions", "skip_dirs", "output_dir", "threads"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest known key to `key`, if it is within typo distance.
fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_CONFIG_KEYS
        .iter()
        .copied()
        .min_by_key(|k| edit_distance(key, k))
        .filter(|k| edit_distance(key, k) <= 3)
}

fn string_list(value: &toml::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect())
        .unwrap_or_default()
}

/// Apply the keys of a parsed `.bodygen.toml` table on top of `config`.
pub fn apply_config_table(config: &mut GenConfig, table: &toml::Table) {
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        match suggest_key(key) {
            Some(suggestion) => warn!(
                key = key.as_str(),
                suggestion,
                "Unknown key in {CONFIG_FILE}, did you mean '{suggestion}'?"
            ),
            None => warn!(
                key = key.as_str(),
                "Unknown key in {CONFIG_FILE} (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }

    // extensions — replace defaults
    if let Some(exts) = table.get("extensions") {
        let exts: Vec<String> =
            string_list(exts).into_iter().map(|e| e.trim_start_matches('.').to_string()).collect();
        if exts.is_empty() {
            warn!("Ignoring empty 'extensions' in {CONFIG_FILE}");
        } else {
            config.extensions = exts.into_iter().collect();
        }
    }

    // skip_dirs — merge with defaults
    if let Some(dirs) = table.get("skip_dirs") {
        config.skip_dirs.extend(string_list(dirs));
    }

    if let Some(dir) = table.get("output_dir").and_then(|v| v.as_str()) {
        if dir.trim().is_empty() {
            warn!("Ignoring empty 'output_dir' in {CONFIG_FILE}");
        } else {
            config.output_dir = dir.to_string();
        }
    }

    if let Some(threads) = table.get("threads").and_then(|v| v.as_integer()) {
        if threads > 0 {
            config.threads = Some(threads as usize);
        } else {
            warn!(threads, "Ignoring non-positive 'threads' in {CONFIG_FILE}");
        }
    }
}

/// Load generation settings from `.bodygen.toml` in the given input root.
///
/// Returns defaults merged with any overrides. A missing file is normal; an
/// unreadable or unparsable one is warned about and ignored.
pub fn load_bodygen_config(root: &Path) -> GenConfig {
    let mut config = GenConfig::default();
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return config;
    }

    debug!(path = %config_path.display(), "Loading {CONFIG_FILE}");
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to read {CONFIG_FILE}");
            return config;
        }
    };
    match content.parse::<toml::Table>() {
        Ok(table) => apply_config_table(&mut config, &table),
        Err(e) => warn!(error = %e, "Failed to parse {CONFIG_FILE}"),
    }
    config
}

// ---------------------------------------------------------------------------
// Run entry point
// ---------------------------------------------------------------------------

/// Check that `path` names an existing directory and return its canonical form.
pub fn validate_root(path: &Path) -> Result<PathBuf> {
    match path.canonicalize() {
        Ok(root) if root.is_dir() => Ok(root),
        _ => Err(GenError::InvalidRoot { path: path.to_path_buf() }),
    }
}

/// The output tree lives next to the input root: `<parent>/<output_dir>`.
/// A root without a parent hosts the output tree itself.
pub fn output_root_for(root: &Path, output_dir: &str) -> PathBuf {
    root.parent().unwrap_or(root).join(output_dir)
}

/// Validate `path`, create the output root once, then generate stubs for the
/// whole tree.
pub fn run(path: &Path, config: &GenConfig) -> Result<RunReport> {
    let root = validate_root(path)?;
    let output_root = output_root_for(&root, &config.output_dir);
    std::fs::create_dir_all(&output_root)
        .map_err(|source| GenError::CreateOutputDir { path: output_root.clone(), source })?;
    dispatch::generate_tree(&root, &output_root, config)
}
