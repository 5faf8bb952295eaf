//! Category aggregation: fold every log file under a category root into
//! per-circuit ratios and a category average.

use crate::config::CategoryConfig;
use crate::discover;
use crate::metrics::{self, ExtractError};
use crate::ratio::{self, CircuitRatio};
use serde::Serialize;
use std::path::Path;

/// Running collection of circuit ratios for one category.
///
/// Passed into and returned from [`scan_directory`] so several roots can be
/// folded into one category without shared state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RatioAccumulator {
    rows: Vec<CircuitRatio>,
}

impl RatioAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: CircuitRatio) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[CircuitRatio] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean ratios over everything accumulated; `(0, 0)` when empty.
    pub fn summarize(&self, category_name: &str) -> CategorySummary {
        CategorySummary {
            category_name: category_name.to_string(),
            avg_df_ratio: ratio::mean(self.rows.iter().map(|r| r.df_ratio)),
            avg_time_ratio: ratio::mean(self.rows.iter().map(|r| r.time_ratio)),
            circuits: self.rows.len(),
        }
    }

    pub fn into_rows(self) -> Vec<CircuitRatio> {
        self.rows
    }
}

/// Average ratios of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category_name: String,
    pub avg_df_ratio: f64,
    pub avg_time_ratio: f64,
    /// Circuits that contributed to the averages.
    pub circuits: usize,
}

/// Result of processing one configured category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub summary: CategorySummary,
    /// Per-circuit rows, present only for itemized categories.
    pub rows: Vec<CircuitRatio>,
}

/// Walk `root` for `*.{log_extension}` files and fold their ratios into `acc`.
///
/// Files that cannot be read, or that contain neither P/D/F counts nor
/// timings, are skipped. A missing root logs a warning and returns `acc`
/// unchanged.
pub fn scan_directory(
    root: &Path,
    log_extension: &str,
    mut acc: RatioAccumulator,
) -> RatioAccumulator {
    if !root.is_dir() {
        tracing::warn!(dir = %root.display(), "category directory does not exist");
        return acc;
    }

    let pattern = format!("*.{}", glob::Pattern::escape(log_extension));
    let mut skipped = 0usize;
    for path in discover::find_files(root, &pattern) {
        let Some(case_name) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| discover::base_name(n, log_extension))
        else {
            continue;
        };

        let extracted = match metrics::extract_from_file(&path) {
            Ok(m) => m,
            Err(ExtractError::NotFound(p)) => {
                tracing::warn!(file = %p.display(), "log file vanished during scan");
                skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, file = %path.display(), "failed to read log file");
                skipped += 1;
                continue;
            }
        };
        if extracted.is_empty() {
            tracing::debug!(file = %path.display(), "no metrics in log, skipped");
            skipped += 1;
            continue;
        }

        let row = CircuitRatio::from_metrics(case_name, &extracted);
        tracing::debug!(
            case = %row.case_name,
            df_ratio = row.df_ratio,
            time_ratio = row.time_ratio,
            "circuit ratios"
        );
        acc.push(row);
    }

    tracing::info!(
        dir = %root.display(),
        circuits = acc.len(),
        skipped,
        "scanned category directory"
    );
    acc
}

/// Process one configured category into its report.
pub fn run_category(category: &CategoryConfig, log_extension: &str) -> CategoryReport {
    let acc = scan_directory(&category.dir, log_extension, RatioAccumulator::new());
    let summary = acc.summarize(&category.name);
    let rows = if category.itemize {
        acc.into_rows()
    } else {
        Vec::new()
    };
    CategoryReport { summary, rows }
}

/// Process every category, in configuration order.
pub fn run_all(categories: &[CategoryConfig], log_extension: &str) -> Vec<CategoryReport> {
    categories
        .iter()
        .map(|c| run_category(c, log_extension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn category(name: &str, dir: PathBuf, itemize: bool) -> CategoryConfig {
        CategoryConfig {
            name: name.to_string(),
            dir,
            itemize,
        }
    }

    #[test]
    fn empty_directory_yields_zero_summary() {
        let tmp = TempDir::new().unwrap();
        let acc = scan_directory(tmp.path(), "out", RatioAccumulator::new());
        assert!(acc.is_empty());
        let s = acc.summarize("EMPTY");
        assert_eq!(s.avg_df_ratio, 0.0);
        assert_eq!(s.avg_time_ratio, 0.0);
        assert_eq!(s.circuits, 0);
    }

    #[test]
    fn missing_directory_yields_zero_summary() {
        let tmp = TempDir::new().unwrap();
        let report = run_category(&category("GONE", tmp.path().join("gone"), true), "out");
        assert_eq!(report.summary.avg_df_ratio, 0.0);
        assert_eq!(report.summary.avg_time_ratio, 0.0);
        assert!(report.rows.is_empty());
    }

    #[test]
    fn all_files_without_metrics_yield_zero_summary() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.out", "nothing here");
        write(tmp.path(), "b/c.out", "");
        let acc = scan_directory(tmp.path(), "out", RatioAccumulator::new());
        assert!(acc.is_empty());
    }

    #[test]
    fn averages_over_surviving_files() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "adder.out",
            "P = 10 D = 3 F = 2\nSim = 1.0 sec\nSat = 3.0 sec\n",
        );
        // pdf only: time ratio counts as 0
        write(tmp.path(), "sub/mult.out", "P = 1 D = 1 F = 0\n");
        // no metrics: skipped entirely
        write(tmp.path(), "sub/noise.out", "synthesis finished\n");
        // wrong extension: ignored
        write(tmp.path(), "sub/other.log", "P = 0 D = 5 F = 5\n");

        let acc = scan_directory(tmp.path(), "out", RatioAccumulator::new());
        assert_eq!(acc.len(), 2);
        let names: Vec<_> = acc.rows().iter().map(|r| r.case_name.as_str()).collect();
        assert_eq!(names, vec!["adder", "mult"]);

        let s = acc.summarize("EPFL");
        assert!((s.avg_df_ratio - (1.0 / 3.0 + 0.5) / 2.0).abs() < 1e-12);
        assert!((s.avg_time_ratio - 0.125).abs() < 1e-12);
        assert_eq!(s.circuits, 2);
    }

    #[test]
    fn degenerate_files_still_count() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "zero.out", "P = 0 D = 0 F = 0\n");
        write(tmp.path(), "full.out", "P = 0 D = 1 F = 1\n");
        let s = scan_directory(tmp.path(), "out", RatioAccumulator::new()).summarize("X");
        assert_eq!(s.circuits, 2);
        assert!((s.avg_df_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn accumulator_threads_through_multiple_roots() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write(a.path(), "x.out", "P = 0 D = 1 F = 0\n");
        write(b.path(), "y.out", "P = 1 D = 0 F = 0\n");

        let acc = scan_directory(a.path(), "out", RatioAccumulator::new());
        let acc = scan_directory(b.path(), "out", acc);
        let acc = scan_directory(&b.path().join("missing"), "out", acc);
        assert_eq!(acc.len(), 2);
        assert!((acc.summarize("AB").avg_df_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn itemization_is_per_category() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "epfl/adder.out", "P = 2 D = 1 F = 1\n");
        write(tmp.path(), "beem/at.1.out", "Sim = 1 sec Sat = 1 sec\n");

        let reports = run_all(
            &[
                category("EPFL", tmp.path().join("epfl"), true),
                category("BEEM", tmp.path().join("beem"), false),
            ],
            "out",
        );
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].rows.len(), 1);
        assert_eq!(reports[0].rows[0].case_name, "adder");
        assert!(reports[1].rows.is_empty());
        assert_eq!(reports[1].summary.circuits, 1);
        assert!((reports[1].summary.avg_time_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn case_name_keeps_inner_dots() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "at.1.out", "P = 1 D = 1 F = 1\n");
        let acc = scan_directory(tmp.path(), "out", RatioAccumulator::new());
        assert_eq!(acc.rows()[0].case_name, "at.1");
    }
}
