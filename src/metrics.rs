/// Log metric extraction: scan solver output for P/D/F counts and Sim/Sat timings.
///
/// The logs have no grammar beyond `label = value` fragments scattered through
/// the text, so extraction is a pair of regex scans:
/// - `P = <n> D = <n> F = <n>`: every occurrence is kept, in order of appearance
/// - `Sim = <x> sec` / `Sat = <x> sec`: the last occurrence of each label wins
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PDF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"P\s*=\s*([0-9]+)\s*D\s*=\s*([0-9]+)\s*F\s*=\s*([0-9]+)").unwrap()
});

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Sim|Sat)\s*=\s*([0-9]+\.?[0-9]*|\.[0-9]+)\s*sec").unwrap()
});

/// One `P = .. D = .. F = ..` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PdfStat {
    pub p: u64,
    pub d: u64,
    pub f: u64,
}

impl PdfStat {
    pub fn total(&self) -> u64 {
        self.p.saturating_add(self.d).saturating_add(self.f)
    }
}

/// Labels recognised by the timing pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TimeLabel {
    Sim,
    Sat,
}

impl TimeLabel {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "Sim" => Some(TimeLabel::Sim),
            "Sat" => Some(TimeLabel::Sat),
            _ => None,
        }
    }
}

/// Everything extracted from one log file.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RawLogMetrics {
    pub pdf_stats: Vec<PdfStat>,
    pub times: BTreeMap<TimeLabel, f64>,
}

impl RawLogMetrics {
    /// True when neither pattern matched anywhere in the text.
    pub fn is_empty(&self) -> bool {
        self.pdf_stats.is_empty() && self.times.is_empty()
    }

    pub fn time(&self, label: TimeLabel) -> Option<f64> {
        self.times.get(&label).copied()
    }
}

/// Extract metrics from a log file on disk.
///
/// A missing file is reported as [`ExtractError::NotFound`] so callers can tell
/// it apart from a file that was read but contained nothing of interest.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn extract_from_file(path: &Path) -> Result<RawLogMetrics, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExtractError::NotFound(path.to_path_buf()),
        _ => ExtractError::Io(e),
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(extract_from_text(&text))
}

/// Extract metrics from log text. Never fails; unmatched text yields nothing.
pub fn extract_from_text(text: &str) -> RawLogMetrics {
    let mut metrics = RawLogMetrics::default();

    for caps in PDF_PATTERN.captures_iter(text) {
        let parsed = (
            caps[1].parse::<u64>(),
            caps[2].parse::<u64>(),
            caps[3].parse::<u64>(),
        );
        match parsed {
            (Ok(p), Ok(d), Ok(f)) => metrics.pdf_stats.push(PdfStat { p, d, f }),
            _ => tracing::debug!(matched = &caps[0], "P/D/F value out of range, skipped"),
        }
    }

    for caps in TIME_PATTERN.captures_iter(text) {
        let Some(label) = TimeLabel::parse(&caps[1]) else {
            continue;
        };
        match caps[2].parse::<f64>() {
            Ok(secs) => {
                metrics.times.insert(label, secs);
            }
            Err(_) => tracing::debug!(matched = &caps[0], "unparseable timing value, skipped"),
        }
    }

    metrics
}

/// Errors at the extractor boundary.
#[derive(Debug)]
pub enum ExtractError {
    NotFound(PathBuf),
    Io(std::io::Error),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::NotFound(path) => write!(f, "file not found: {}", path.display()),
            ExtractError::Io(e) => write!(f, "I/O error reading log: {e}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::NotFound(_) => None,
            ExtractError::Io(e) => Some(e),
        }
    }
}
