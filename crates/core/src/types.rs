//! Core types shared across bodygen: generation config, captured class blocks,
//! extracted signatures, generated units, and the per-run report.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Generation configuration — replaces hardcoded constants
// ---------------------------------------------------------------------------

/// Name of the sibling directory that receives generated files.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Worker count used when hardware parallelism cannot be determined.
pub const FALLBACK_WORKERS: usize = 4;

/// Runtime configuration for a generation run. Loaded from `.bodygen.toml` or defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GenConfig {
    /// File extensions (without the dot) eligible for processing.
    pub extensions: BTreeSet<String>,
    /// Directory names to skip during the walk. Empty by default.
    pub skip_dirs: BTreeSet<String>,
    /// Name of the output directory created next to the input root.
    pub output_dir: String,
    /// Fixed worker count. `None` = available hardware parallelism.
    pub threads: Option<usize>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            extensions: ["h", "hpp", "cpp"].iter().map(|s| s.to_string()).collect(),
            skip_dirs: BTreeSet::new(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            threads: None,
        }
    }
}

impl GenConfig {
    /// Resolve the worker pool size: explicit setting, hardware parallelism, then fallback.
    pub fn worker_count(&self) -> usize {
        match self.threads {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(FALLBACK_WORKERS),
        }
    }
}

// ---------------------------------------------------------------------------
// Scan products
// ---------------------------------------------------------------------------

/// Raw text of one `class ... };` span, including the trigger line.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBlock {
    pub name: String,
    pub raw_text: String,
}

/// A declared-but-undefined member function found inside a [`ClassBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub return_type: String,
    pub function_name: String,
    pub parameter_list: String,
}

/// Everything that goes into one `<stem>_generated.hpp` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedUnit {
    /// `#include` lines exactly as they appear in the source, in file order.
    pub includes: Vec<String>,
    /// Rendered function definitions, in discovery order.
    pub definitions: Vec<String>,
}

impl GeneratedUnit {
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Run reporting
// ---------------------------------------------------------------------------

/// What happened to a single input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Generated { output: PathBuf, functions: usize },
    NoMatches,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path relative to the input root, `/`-separated.
    pub path: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Summary of a whole-tree run, one entry per eligible input file in walk order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub output_root: PathBuf,
    pub workers: usize,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn generated_count(&self) -> usize {
        self.files.iter().filter(|f| matches!(f.outcome, FileOutcome::Generated { .. })).count()
    }

    pub fn no_match_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome == FileOutcome::NoMatches).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| matches!(f.outcome, FileOutcome::Failed { .. })).count()
    }

    /// Total number of stub definitions written across all files.
    pub fn function_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Generated { functions, .. } => functions,
                _ => 0,
            })
            .sum()
    }
}
