//! Artifact correlation: join `.time`, `.and` and `.lev` files that describe
//! the same benchmark case.
//!
//! A case is identified by file naming alone. A timing file `foo.time` pairs
//! with every sibling `foo*.and` in the same directory (so `foo.and`,
//! `foo_dc2.and` and `foo_10x.and` are three separate cases sharing one
//! timing), and each of those pairs with `<and base>.lev`. The index is built
//! from a single directory walk; records are only emitted for fully present,
//! fully numeric triples.

use crate::config::ArtifactConfig;
use crate::discover;
use crate::scalar::read_scalar;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Naming-tag filter applied to the `.and` base name of each candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CaseFilter {
    #[default]
    All,
    /// Base name ends with `_dc2`.
    Dc2,
    #[value(name = "non-dc2")]
    NonDc2,
    /// Base name contains `_10x`.
    #[value(name = "10x")]
    TenX,
    #[value(name = "non-10x")]
    NonTenX,
}

impl CaseFilter {
    pub fn accepts(self, base_name: &str) -> bool {
        match self {
            CaseFilter::All => true,
            CaseFilter::Dc2 => base_name.ends_with("_dc2"),
            CaseFilter::NonDc2 => !base_name.ends_with("_dc2"),
            CaseFilter::TenX => base_name.contains("_10x"),
            CaseFilter::NonTenX => !base_name.contains("_10x"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CaseFilter::All => "all",
            CaseFilter::Dc2 => "dc2",
            CaseFilter::NonDc2 => "non-dc2",
            CaseFilter::TenX => "10x",
            CaseFilter::NonTenX => "non-10x",
        }
    }
}

impl std::fmt::Display for CaseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully joined benchmark case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub time: f64,
    pub and_gates: f64,
    pub levels: f64,
    pub case_id: String,
}

/// Base names of the artifacts found in one directory, per artifact kind.
#[derive(Debug, Default)]
struct DirArtifacts {
    timing: BTreeSet<String>,
    gates: BTreeSet<String>,
    levels: BTreeSet<String>,
}

/// Directory → artifacts index built from one walk of the root.
#[derive(Debug, Default)]
pub struct ArtifactIndex {
    dirs: BTreeMap<PathBuf, DirArtifacts>,
}

/// A timing/gate pairing that passed the filter, before any value is read.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub case_id: String,
    pub time_path: PathBuf,
    pub and_path: PathBuf,
    /// `None` when no level file exists for this case.
    pub level_path: Option<PathBuf>,
}

impl ArtifactIndex {
    pub fn build(root: &Path, exts: &ArtifactConfig) -> Self {
        let mut index = ArtifactIndex::default();
        for path in discover::find_files(root, "*") {
            let (Some(dir), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
            else {
                continue;
            };
            let slot = if let Some(base) = discover::base_name(name, &exts.time_extension) {
                Some((base, Kind::Timing))
            } else if let Some(base) = discover::base_name(name, &exts.and_extension) {
                Some((base, Kind::Gates))
            } else {
                discover::base_name(name, &exts.level_extension).map(|base| (base, Kind::Levels))
            };
            if let Some((base, kind)) = slot {
                let entry = index.dirs.entry(dir.to_path_buf()).or_default();
                let set = match kind {
                    Kind::Timing => &mut entry.timing,
                    Kind::Gates => &mut entry.gates,
                    Kind::Levels => &mut entry.levels,
                };
                set.insert(base.to_string());
            }
        }
        index
    }

    /// Number of timing files indexed.
    pub fn timing_count(&self) -> usize {
        self.dirs.values().map(|d| d.timing.len()).sum()
    }

    /// Expand every timing file into its filtered gate-file candidates.
    pub fn candidates(&self, filter: CaseFilter, exts: &ArtifactConfig) -> Vec<Candidate> {
        let mut out = Vec::new();
        for (dir, artifacts) in &self.dirs {
            for time_base in &artifacts.timing {
                let time_path = dir.join(format!("{time_base}.{}", exts.time_extension));
                for and_base in artifacts
                    .gates
                    .iter()
                    .filter(|b| b.starts_with(time_base.as_str()))
                {
                    if !filter.accepts(and_base) {
                        continue;
                    }
                    let level_path = artifacts
                        .levels
                        .contains(and_base)
                        .then(|| dir.join(format!("{and_base}.{}", exts.level_extension)));
                    out.push(Candidate {
                        case_id: and_base.clone(),
                        time_path: time_path.clone(),
                        and_path: dir.join(format!("{and_base}.{}", exts.and_extension)),
                        level_path,
                    });
                }
            }
        }
        out
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Timing,
    Gates,
    Levels,
}

/// Outcome of a correlation run.
#[derive(Debug, Default)]
pub struct Correlation {
    pub records: Vec<CaseRecord>,
    /// Candidates dropped because one of their three values was unavailable.
    pub dropped: usize,
}

/// Read the three values of a candidate; `None` if any one is unavailable.
pub fn resolve(candidate: &Candidate) -> Option<CaseRecord> {
    let level_path = candidate.level_path.as_ref()?;
    let time = read_scalar(&candidate.time_path)?;
    let and_gates = read_scalar(&candidate.and_path)?;
    let levels = read_scalar(level_path)?;
    Some(CaseRecord {
        time,
        and_gates,
        levels,
        case_id: candidate.case_id.clone(),
    })
}

/// Walk `root` and collect every complete case accepted by `filter`.
pub fn collect_records(root: &Path, filter: CaseFilter, exts: &ArtifactConfig) -> Correlation {
    let index = ArtifactIndex::build(root, exts);
    let candidates = index.candidates(filter, exts);
    tracing::debug!(
        timing_files = index.timing_count(),
        candidates = candidates.len(),
        filter = %filter,
        "artifact index built"
    );

    let mut result = Correlation::default();
    for candidate in &candidates {
        match resolve(candidate) {
            Some(record) => result.records.push(record),
            None => {
                tracing::debug!(case = %candidate.case_id, "incomplete case dropped");
                result.dropped += 1;
            }
        }
    }

    if result.dropped > 0 {
        tracing::info!(
            dropped = result.dropped,
            kept = result.records.len(),
            "skipped cases with missing or unparseable artifacts"
        );
    }
    result
}

/// Value ranges over a set of records, as printed after plotting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordStats {
    pub count: usize,
    pub and_gates: (f64, f64),
    pub levels: (f64, f64),
    pub time: (f64, f64),
}

impl RecordStats {
    pub fn from_records(records: &[CaseRecord]) -> Option<Self> {
        let first = records.first()?;
        let mut stats = RecordStats {
            count: records.len(),
            and_gates: (first.and_gates, first.and_gates),
            levels: (first.levels, first.levels),
            time: (first.time, first.time),
        };
        for r in &records[1..] {
            widen(&mut stats.and_gates, r.and_gates);
            widen(&mut stats.levels, r.levels);
            widen(&mut stats.time, r.time);
        }
        Some(stats)
    }
}

fn widen(range: &mut (f64, f64), v: f64) {
    range.0 = range.0.min(v);
    range.1 = range.1.max(v);
}
