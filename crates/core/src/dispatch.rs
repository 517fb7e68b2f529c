//! Work distribution over a fixed worker pool.
//!
//! Workers pull file indices from one shared atomic counter. The counter's
//! `fetch_add` is the only arbiter of who processes what, so every index in
//! `0..count` is handled by exactly one worker exactly once.

use crate::error::Result;
use crate::process::{output_path_for, process_file};
use crate::scan::{collect_files, InputFile};
use crate::types::{FileOutcome, FileReport, GenConfig, RunReport};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{error, info, warn};

/// Run `job` once for every index in `0..count` on a pool of `workers` threads
/// and return the results ordered by index.
///
/// The pool is built once, every worker is started even when there is no work,
/// and all of them have finished when this returns.
pub fn for_each_index<T, F>(count: usize, workers: usize, job: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let workers = workers.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("bodygen-worker-{i}"))
        .build()?;

    let next = AtomicUsize::new(0);
    let results: Mutex<Vec<(usize, T)>> = Mutex::new(Vec::with_capacity(count));

    pool.scope(|s| {
        for _ in 0..workers {
            s.spawn(|_| {
                let mut local = Vec::new();
                loop {
                    let i = next.fetch_add(1, Ordering::Relaxed);
                    if i >= count {
                        break;
                    }
                    local.push((i, job(i)));
                }
                results.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).extend(local);
            });
        }
    });

    let mut results = results.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    results.sort_by_key(|(i, _)| *i);
    Ok(results.into_iter().map(|(_, r)| r).collect())
}

/// Process one input and turn any error into a logged `Failed` outcome.
fn process_one(file: &InputFile, root: &Path, output_root: &Path) -> FileOutcome {
    match process_file(&file.abs_path, root, output_root) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(file = %file.abs_path.display(), "{e}");
            FileOutcome::Failed { error: e.to_string() }
        }
    }
}

/// Group file indices by the output file they would write, keeping walk order
/// inside each group and ordering groups by their first member.
pub fn group_by_output(files: &[InputFile], root: &Path, output_root: &Path) -> Vec<Vec<usize>> {
    let mut groups: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
    for (i, file) in files.iter().enumerate() {
        groups.entry(output_path_for(&file.abs_path, root, output_root)).or_default().push(i);
    }
    let mut groups: Vec<Vec<usize>> = groups.into_values().collect();
    groups.sort_by_key(|g| g[0]);
    groups
}

/// Process every file on the pool. A failing file is logged and reported; it
/// never stops the others.
///
/// Inputs sharing an output path (`Foo.h` and `Foo.cpp`) run in one job, in walk
/// order. The last one that generates keeps the file; earlier ones are reported
/// as failed collisions.
pub fn process_all(
    files: &[InputFile],
    root: &Path,
    output_root: &Path,
    workers: usize,
) -> Result<Vec<FileReport>> {
    let groups = group_by_output(files, root, output_root);

    let per_group = for_each_index(groups.len(), workers, |g| {
        let members = &groups[g];
        let mut outcomes: Vec<(usize, FileOutcome)> =
            members.iter().map(|&i| (i, process_one(&files[i], root, output_root))).collect();

        let winner = outcomes
            .iter()
            .rposition(|(_, o)| matches!(o, FileOutcome::Generated { .. }))
            .map(|pos| outcomes[pos].0);
        if let Some(winner) = winner {
            for (i, outcome) in outcomes.iter_mut() {
                if *i != winner && matches!(outcome, FileOutcome::Generated { .. }) {
                    let other = &files[winner].rel_path;
                    warn!(file = files[*i].rel_path.as_str(), kept = other.as_str(), "Output collides");
                    *outcome = FileOutcome::Failed { error: format!("output collides with {other}") };
                }
            }
        }
        outcomes
    })?;

    let mut reports: Vec<(usize, FileReport)> = per_group
        .into_iter()
        .flatten()
        .map(|(i, outcome)| (i, FileReport { path: files[i].rel_path.clone(), outcome }))
        .collect();
    reports.sort_by_key(|(i, _)| *i);
    Ok(reports.into_iter().map(|(_, r)| r).collect())
}

/// Generate stubs for a whole tree: walk `root`, fan out over the pool, and
/// collect a report. `output_root` must already exist.
pub fn generate_tree(root: &Path, output_root: &Path, config: &GenConfig) -> Result<RunReport> {
    let start = Instant::now();
    let files = collect_files(root, config);
    let workers = config.worker_count();

    info!(
        root = %root.display(),
        output = %output_root.display(),
        files = files.len(),
        workers,
        "Scanning headers"
    );

    let reports = process_all(&files, root, output_root, workers)?;

    let report = RunReport {
        root: root.to_path_buf(),
        output_root: output_root.to_path_buf(),
        workers,
        files: reports,
    };

    info!(
        generated = report.generated_count(),
        functions = report.function_count(),
        failed = report.failed_count(),
        time_ms = start.elapsed().as_millis() as u64,
        "Processing complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_counts(count: usize, workers: usize) -> Vec<usize> {
        let hits: Vec<AtomicUsize> = (0..count).map(|_| AtomicUsize::new(0)).collect();
        let echoed = for_each_index(count, workers, |i| {
            hits[i].fetch_add(1, Ordering::SeqCst);
            i
        })
        .unwrap();
        assert_eq!(echoed, (0..count).collect::<Vec<_>>(), "results must come back in index order");
        hits.into_iter().map(AtomicUsize::into_inner).collect()
    }

    #[test]
    fn test_every_index_exactly_once_many_files() {
        let hits = hit_counts(1000, 4);
        assert!(hits.iter().all(|h| *h == 1), "some index ran 0 or 2+ times");
    }

    #[test]
    fn test_fewer_files_than_workers() {
        let hits = hit_counts(3, 16);
        assert_eq!(hits, vec![1, 1, 1]);
    }

    #[test]
    fn test_zero_files_starts_and_joins() {
        let started = AtomicUsize::new(0);
        let out: Vec<()> = for_each_index(0, 8, |_| {
            started.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_workers_clamped_to_one() {
        let hits = hit_counts(5, 0);
        assert_eq!(hits, vec![1; 5]);
    }

    #[test]
    fn test_single_failure_does_not_stop_others() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Source");
        let out = tmp.path().join("generated");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(root.join("Good.h"), "class UGood {\n\tvoid Run();\n};\n").unwrap();

        let files = vec![
            InputFile { abs_path: root.join("Missing.h"), rel_path: "Missing.h".into() },
            InputFile { abs_path: root.join("Good.h"), rel_path: "Good.h".into() },
        ];
        let reports = process_all(&files, &root, &out, 2).unwrap();
        assert!(matches!(reports[0].outcome, FileOutcome::Failed { .. }), "got: {:?}", reports[0]);
        assert!(matches!(reports[1].outcome, FileOutcome::Generated { functions: 1, .. }));
        assert!(out.join("Good_generated.hpp").exists());
    }

    #[test]
    fn test_unwritable_output_fails_only_that_file() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Source");
        let out = tmp.path().join("generated");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(out.join("A_generated.hpp")).unwrap();
        std::fs::write(root.join("A.h"), "class UA {\n\tvoid Run();\n};\n").unwrap();
        std::fs::write(root.join("B.h"), "class UB {\n\tvoid Run();\n};\n").unwrap();

        let files = vec![
            InputFile { abs_path: root.join("A.h"), rel_path: "A.h".into() },
            InputFile { abs_path: root.join("B.h"), rel_path: "B.h".into() },
        ];
        let reports = process_all(&files, &root, &out, 2).unwrap();
        match &reports[0].outcome {
            FileOutcome::Failed { error } => {
                assert!(error.starts_with("failed to write file"), "got: {error}")
            }
            other => panic!("A.h should fail, got: {other:?}"),
        }
        assert!(matches!(reports[1].outcome, FileOutcome::Generated { functions: 1, .. }));
        assert!(out.join("A_generated.hpp").is_dir());
        assert!(out.join("B_generated.hpp").is_file());
    }

    #[test]
    fn test_group_by_output_joins_same_stem() {
        let root = Path::new("/src");
        let out = Path::new("/generated");
        let files = vec![
            InputFile { abs_path: root.join("A.h"), rel_path: "A.h".into() },
            InputFile { abs_path: root.join("Foo.cpp"), rel_path: "Foo.cpp".into() },
            InputFile { abs_path: root.join("Foo.h"), rel_path: "Foo.h".into() },
            InputFile { abs_path: root.join("sub/Foo.h"), rel_path: "sub/Foo.h".into() },
        ];
        assert_eq!(group_by_output(&files, root, out), vec![vec![0], vec![1, 2], vec![3]]);
    }
}
