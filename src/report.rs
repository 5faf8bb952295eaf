//! Output sinks for category reports: the summary CSV and a JSON dump.
//!
//! CSV layout: itemized circuit rows for every itemized category (in
//! category order), then one `average <CATEGORY>` row per category. Ratios
//! are rounded to two decimals here and nowhere else.

use crate::aggregate::CategoryReport;
use crate::ratio::format_ratio;
use std::path::Path;

const HEADER: [&str; 3] = ["case_name", "df_ratio", "time_ratio"];

/// Render the summary CSV into memory.
pub fn render_csv(reports: &[CategoryReport], header: bool) -> Result<Vec<u8>, ReportError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    if header {
        w.write_record(HEADER)?;
    }

    for report in reports {
        for row in &report.rows {
            let df = format_ratio(row.df_ratio);
            let time = format_ratio(row.time_ratio);
            w.write_record([row.case_name.as_str(), df.as_str(), time.as_str()])?;
        }
    }

    for report in reports {
        let label = format!("average {}", report.summary.category_name);
        let df = format_ratio(report.summary.avg_df_ratio);
        let time = format_ratio(report.summary.avg_time_ratio);
        w.write_record([label.as_str(), df.as_str(), time.as_str()])?;
    }

    w.flush()?;
    w.into_inner()
        .map_err(|e| ReportError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

/// Write the summary CSV to `path`. Nothing is written if rendering fails.
pub fn write_csv(path: &Path, reports: &[CategoryReport], header: bool) -> Result<(), ReportError> {
    let bytes = render_csv(reports, header)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Full-precision JSON view of the reports.
pub fn render_json(reports: &[CategoryReport]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(reports)?)
}

#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "I/O error writing report: {e}"),
            ReportError::Csv(e) => write!(f, "CSV error: {e}"),
            ReportError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(e) => Some(e),
            ReportError::Csv(e) => Some(e),
            ReportError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError::Io(e)
    }
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        ReportError::Csv(e)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{self, CategorySummary};
    use crate::config::CategoryConfig;
    use crate::ratio::CircuitRatio;
    use tempfile::TempDir;

    fn summary(name: &str, df: f64, time: f64, circuits: usize) -> CategorySummary {
        CategorySummary {
            category_name: name.to_string(),
            avg_df_ratio: df,
            avg_time_ratio: time,
            circuits,
        }
    }

    fn row(name: &str, df: f64, time: f64) -> CircuitRatio {
        CircuitRatio {
            case_name: name.to_string(),
            df_ratio: df,
            time_ratio: time,
        }
    }

    fn sample_reports() -> Vec<CategoryReport> {
        vec![
            CategoryReport {
                summary: summary("EPFL", 0.4166, 0.126, 2),
                rows: vec![row("adder", 1.0 / 3.0, 0.25), row("mult", 0.5, 0.0)],
            },
            CategoryReport {
                summary: summary("BEEM", 0.0, 0.0, 0),
                rows: Vec::new(),
            },
        ]
    }

    #[test]
    fn csv_rows_then_averages() {
        let bytes = render_csv(&sample_reports(), false).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "adder,0.33,0.25\n\
             mult,0.50,0.00\n\
             average EPFL,0.42,0.13\n\
             average BEEM,0.00,0.00\n"
        );
    }

    #[test]
    fn csv_optional_header() {
        let text = String::from_utf8(render_csv(&sample_reports(), true).unwrap()).unwrap();
        assert!(text.starts_with("case_name,df_ratio,time_ratio\nadder,"));
    }

    #[test]
    fn csv_averages_follow_all_itemized_rows() {
        let reports = vec![
            CategoryReport {
                summary: summary("A", 0.0, 0.0, 1),
                rows: vec![row("a1", 0.0, 0.0)],
            },
            CategoryReport {
                summary: summary("B", 1.0, 1.0, 1),
                rows: vec![row("b1", 1.0, 1.0)],
            },
        ];
        let text = String::from_utf8(render_csv(&reports, false).unwrap()).unwrap();
        let labels: Vec<_> = text
            .lines()
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(labels, vec!["a1", "b1", "average A", "average B"]);
    }

    #[test]
    fn csv_quotes_awkward_names() {
        let reports = vec![CategoryReport {
            summary: summary("X", 0.0, 0.0, 1),
            rows: vec![row("odd,name", 0.0, 0.0)],
        }];
        let text = String::from_utf8(render_csv(&reports, false).unwrap()).unwrap();
        assert!(text.starts_with("\"odd,name\",0.00,0.00\n"));
    }

    #[test]
    fn write_csv_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/nested/results.csv");
        write_csv(&path, &sample_reports(), false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn rerun_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let bench = tmp.path().join("bench");
        std::fs::create_dir_all(bench.join("sub")).unwrap();
        std::fs::write(
            bench.join("adder.out"),
            "P = 10 D = 3 F = 2 Sim = 1.0 sec Sat = 3.0 sec",
        )
        .unwrap();
        std::fs::write(bench.join("sub/mult.out"), "P = 1 D = 2 F = 3").unwrap();
        let categories = vec![CategoryConfig {
            name: "BENCH".to_string(),
            dir: bench,
            itemize: true,
        }];

        let first = tmp.path().join("first.csv");
        let second = tmp.path().join("second.csv");
        write_csv(&first, &aggregate::run_all(&categories, "out"), false).unwrap();
        write_csv(&second, &aggregate::run_all(&categories, "out"), false).unwrap();
        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn json_keeps_full_precision() {
        let json = render_json(&sample_reports()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v[0]["summary"]["category_name"], "EPFL");
        assert_eq!(v[0]["rows"][0]["case_name"], "adder");
        let df = v[0]["rows"][0]["df_ratio"].as_f64().unwrap();
        assert!((df - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(v[1]["rows"].as_array().unwrap().len(), 0);
    }
}
