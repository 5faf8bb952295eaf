/// Single-value artifact files (`.time`, `.and`, `.lev`).
use std::path::Path;

/// Read a file holding one real number, surrounded by optional whitespace.
///
/// Returns `None` when the file is missing, unreadable, or its trimmed
/// content is not a finite number.
pub fn read_scalar(path: &Path) -> Option<f64> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "scalar file unavailable");
            return None;
        }
    };
    parse_scalar(&contents)
}

fn parse_scalar(contents: &str) -> Option<f64> {
    contents
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
