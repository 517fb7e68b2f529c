//! Per-file processing: collect `#include` lines, capture class blocks with a
//! line-level state machine, run the extractor over each block, and write one
//! `<stem>_generated.hpp` next to its mirror location in the output tree.

use crate::error::{GenError, Result};
use crate::extract::extract_signatures;
use crate::stubgen::generate_definition;
use crate::types::{ClassBlock, FileOutcome, GeneratedUnit};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to the input stem to name its generated file.
pub const OUTPUT_SUFFIX: &str = "_generated.hpp";

// ---------------------------------------------------------------------------
// Include collection
// ---------------------------------------------------------------------------

/// Every line whose trimmed form starts with `#include`, verbatim, in file order.
/// Only the `\n` terminator is removed; a CRLF file keeps its `\r`.
pub fn collect_includes(content: &str) -> Vec<String> {
    content
        .split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
        .filter(|line| line.trim().starts_with("#include"))
        .map(|line| line.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Class capture state machine
// ---------------------------------------------------------------------------

/// Class name on a trimmed `class ` line: everything up to the first space, `{`,
/// `:` or tab. `class Foo;` yields `Foo;`.
pub fn class_name(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix("class ")?;
    let end = rest.find([' ', '{', ':', '\t']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// A line containing `};` anywhere ends the current capture.
fn closes_class(trimmed: &str) -> bool {
    trimmed.contains("};")
}

#[derive(Debug, Default)]
enum CaptureState {
    #[default]
    ScanningForClass,
    InClass { name: String, buffer: String },
}

/// Line-fed scanner that splits a file into [`ClassBlock`]s.
///
/// A `class` line seen while already capturing is just more text, so a nested
/// class's `};` closes the outer capture early. A capture still open at end of
/// input is dropped.
#[derive(Debug, Default)]
pub struct ClassScanner {
    state: CaptureState,
    blocks: Vec<ClassBlock>,
}

impl ClassScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) {
        let trimmed = line.trim();
        let (name, mut buffer) = match std::mem::take(&mut self.state) {
            CaptureState::InClass { name, buffer } => (name, buffer),
            CaptureState::ScanningForClass => match class_name(trimmed) {
                Some(name) => (name.to_string(), String::new()),
                None => return,
            },
        };

        buffer.push_str(line);
        buffer.push('\n');

        if closes_class(trimmed) {
            self.blocks.push(ClassBlock { name, raw_text: buffer });
        } else {
            self.state = CaptureState::InClass { name, buffer };
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, CaptureState::InClass { .. })
    }

    pub fn finish(self) -> Vec<ClassBlock> {
        self.blocks
    }
}

/// Split file content into closed class blocks, in file order.
pub fn scan_class_blocks(content: &str) -> Vec<ClassBlock> {
    let mut scanner = ClassScanner::new();
    for line in content.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

// ---------------------------------------------------------------------------
// Unit assembly and rendering
// ---------------------------------------------------------------------------

/// Build the generated unit for one file's content. Empty when no class in the
/// file declares a stub-able member function.
pub fn build_unit(content: &str) -> GeneratedUnit {
    let mut unit = GeneratedUnit { includes: collect_includes(content), definitions: Vec::new() };

    for block in scan_class_blocks(content) {
        for sig in extract_signatures(&block) {
            debug!(class = block.name.as_str(), function = sig.function_name.as_str(), "Generated function");
            unit.definitions.push(generate_definition(&block.name, &sig));
        }
    }

    unit
}

/// Render a unit as file text: includes, a blank line if there were any, then
/// the definitions back to back.
pub fn render_unit(unit: &GeneratedUnit) -> String {
    let mut out = String::new();
    for include in &unit.includes {
        out.push_str(include);
        out.push('\n');
    }
    if !unit.includes.is_empty() {
        out.push('\n');
    }
    for def in &unit.definitions {
        out.push_str(def);
    }
    out
}

/// Mirror `input`'s location under `root` into `output_root`, renaming the file
/// to `<stem>_generated.hpp`.
pub fn output_path_for(input: &Path, root: &Path, output_root: &Path) -> PathBuf {
    let rel_dir = input
        .strip_prefix(root)
        .ok()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    output_root.join(rel_dir).join(format!("{stem}{OUTPUT_SUFFIX}"))
}

// ---------------------------------------------------------------------------
// File processing
// ---------------------------------------------------------------------------

/// Process one input file end to end.
///
/// Nothing is written when the file yields no definitions. Output directories are
/// created on demand. Input bytes that aren't valid UTF-8 are decoded lossily.
pub fn process_file(input: &Path, root: &Path, output_root: &Path) -> Result<FileOutcome> {
    let bytes = fs::read(input)
        .map_err(|source| GenError::ReadInput { path: input.to_path_buf(), source })?;
    let content = String::from_utf8_lossy(&bytes);

    let unit = build_unit(&content);
    if unit.is_empty() {
        let name = input.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        info!(file = %name, "No matching functions");
        return Ok(FileOutcome::NoMatches);
    }

    let output = output_path_for(input, root, output_root);
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)
            .map_err(|source| GenError::CreateOutputDir { path: dir.to_path_buf(), source })?;
    }
    fs::write(&output, render_unit(&unit))
        .map_err(|source| GenError::WriteOutput { path: output.clone(), source })?;

    info!(output = %output.display(), functions = unit.definitions.len(), "Generated");
    Ok(FileOutcome::Generated { output, functions: unit.definitions.len() })
}
