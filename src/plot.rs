//! SVG scatter plots of correlated cases.
//!
//! The 3-D view puts AND gates on x, levels on y and execution time on z,
//! coloured by time. The projection sheet holds time vs AND gates, time vs
//! levels, and AND gates vs levels (coloured by time). Rendering needs the
//! `plots` feature; range and colour helpers are always available.

use crate::correlate::CaseRecord;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Viridis anchor colours, from low to high.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// File written for the projection sheet, e.g. `circuits_2d_projections.svg`.
pub fn projections_path(prefix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}_2d_projections.svg"))
}

/// Axis range covering `values` with 5% padding; never empty.
pub fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        min.abs().max(1.0) * 0.5
    };
    (min - pad)..(max + pad)
}

/// Viridis colour for `value` scaled into `[min, max]`.
pub fn viridis(value: f64, min: f64, max: f64) -> (u8, u8, u8) {
    let t = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - idx as f64;
    let (a, b) = (VIRIDIS[idx], VIRIDIS[idx + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

#[derive(Debug)]
pub enum PlotError {
    NoData,
    Render(String),
    #[cfg_attr(feature = "plots", allow(dead_code))]
    Disabled,
}

impl std::fmt::Display for PlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotError::NoData => write!(f, "no data found to plot"),
            PlotError::Render(msg) => write!(f, "failed to render plot: {msg}"),
            PlotError::Disabled => write!(f, "plots feature is not enabled"),
        }
    }
}

impl std::error::Error for PlotError {}

#[cfg(feature = "plots")]
pub fn plot_3d_scatter(
    records: &[CaseRecord],
    path: &Path,
    size: (u32, u32),
) -> Result<(), PlotError> {
    if records.is_empty() {
        return Err(PlotError::NoData);
    }
    draw_3d(records, path, size).map_err(|e| PlotError::Render(e.to_string()))
}

#[cfg(feature = "plots")]
pub fn plot_2d_projections(
    records: &[CaseRecord],
    path: &Path,
    size: (u32, u32),
) -> Result<(), PlotError> {
    if records.is_empty() {
        return Err(PlotError::NoData);
    }
    draw_projections(records, path, size).map_err(|e| PlotError::Render(e.to_string()))
}

#[cfg(feature = "plots")]
fn draw_3d(
    records: &[CaseRecord],
    path: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    use plotters::prelude::*;

    let (t_min, t_max) = time_bounds(records);
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            "Execution Time (z) vs AND Gates (x) vs Levels (y)",
            ("sans-serif", 24),
        )
        .build_cartesian_3d(
            axis_range(records.iter().map(|r| r.and_gates)),
            axis_range(records.iter().map(|r| r.levels)),
            axis_range(records.iter().map(|r| r.time)),
        )?;
    chart.with_projection(|mut pb| {
        pb.pitch = 0.35;
        pb.yaw = 0.785;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()?;

    chart.draw_series(records.iter().map(|r| {
        let (red, green, blue) = viridis(r.time, t_min, t_max);
        Circle::new(
            (r.and_gates, r.levels, r.time),
            5,
            RGBColor(red, green, blue).mix(0.7).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(feature = "plots")]
fn draw_projections(
    records: &[CaseRecord],
    path: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    use plotters::prelude::*;

    let (t_min, t_max) = time_bounds(records);
    let gates = || records.iter().map(|r| r.and_gates);
    let levels = || records.iter().map(|r| r.levels);
    let times = || records.iter().map(|r| r.time);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));

    let mut chart = ChartBuilder::on(&panels[0])
        .margin(15)
        .caption("Time vs AND Gates", ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(axis_range(gates()), axis_range(times()))?;
    chart
        .configure_mesh()
        .x_desc("Number of AND Gates")
        .y_desc("Execution Time (sec)")
        .draw()?;
    chart.draw_series(
        records
            .iter()
            .map(|r| Circle::new((r.and_gates, r.time), 3, BLUE.mix(0.7).filled())),
    )?;

    let mut chart = ChartBuilder::on(&panels[1])
        .margin(15)
        .caption("Time vs Levels", ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(axis_range(levels()), axis_range(times()))?;
    chart
        .configure_mesh()
        .x_desc("Number of Levels")
        .y_desc("Execution Time (sec)")
        .draw()?;
    chart.draw_series(
        records
            .iter()
            .map(|r| Circle::new((r.levels, r.time), 3, BLUE.mix(0.7).filled())),
    )?;

    let mut chart = ChartBuilder::on(&panels[2])
        .margin(15)
        .caption("AND Gates vs Levels (colored by time)", ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(axis_range(gates()), axis_range(levels()))?;
    chart
        .configure_mesh()
        .x_desc("Number of AND Gates")
        .y_desc("Number of Levels")
        .draw()?;
    chart.draw_series(records.iter().map(|r| {
        let (red, green, blue) = viridis(r.time, t_min, t_max);
        Circle::new(
            (r.and_gates, r.levels),
            3,
            RGBColor(red, green, blue).mix(0.8).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(feature = "plots")]
fn time_bounds(records: &[CaseRecord]) -> (f64, f64) {
    records
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.time), hi.max(r.time))
        })
}

#[cfg(not(feature = "plots"))]
pub fn plot_3d_scatter(
    _records: &[CaseRecord],
    _path: &Path,
    _size: (u32, u32),
) -> Result<(), PlotError> {
    Err(PlotError::Disabled)
}

#[cfg(not(feature = "plots"))]
pub fn plot_2d_projections(
    _records: &[CaseRecord],
    _path: &Path,
    _size: (u32, u32),
) -> Result<(), PlotError> {
    Err(PlotError::Disabled)
}
