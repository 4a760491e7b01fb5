//! SVG rendering of chart data with `plotters`.
//!
//! Draws every visible dataset of a [`ChartData`] inside a viewport window, with optional
//! grid, markers and legend, and a cross at each intersection.
//!
//! Text is emitted as SVG `<text>` elements, so no font files are needed.
//!
//! ```rust
//! use plotfit::{
//!     chart::{ChartData, ChartDataset, DatasetStyle},
//!     render::{render_svg, RenderOptions},
//! };
//!
//! let chart = ChartData::new(
//!     vec![0.0, 1.0, 2.0],
//!     vec![ChartDataset::new("f(x) = x", vec![Some(0.0), Some(1.0), Some(2.0)], DatasetStyle::default())],
//! );
//!
//! let svg = render_svg(&chart, &[], None, &RenderOptions::default()).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```
use std::path::Path;

use plotters::{coord::Shift, prelude::*};

use crate::{
    chart::{ChartData, ChartDataset},
    config::ChartDisplayOptions,
    intersection::IntersectionPoint,
    palette::{parse_hex, PALETTE},
    viewport::Bounds,
};

const MAX_LBL_WIDTH: usize = 80;

/// Options for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Caption above the chart
    pub title: String,

    /// Size of the image in pixels
    pub size: (u32, u32),

    /// Draw grid lines
    pub show_grid: bool,

    /// Draw the legend
    pub show_legend: bool,

    /// Draw point markers where a dataset asks for them
    pub show_points: bool,
}
impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: (800, 480),
            show_grid: true,
            show_legend: true,
            show_points: true,
        }
    }
}
impl From<&ChartDisplayOptions> for RenderOptions {
    fn from(options: &ChartDisplayOptions) -> Self {
        Self {
            title: options.chart_title.clone(),
            show_grid: options.show_grid,
            show_legend: options.show_legend,
            show_points: options.show_points,
            ..Self::default()
        }
    }
}

/// Error occurring during rendering
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error drawing the chart
    #[error("Error drawing chart: {0}")]
    Draw(#[from] DrawingAreaErrorKind<std::io::Error>),

    /// Error writing the image
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Nothing finite to draw
    #[error("Chart has no finite data to draw.")]
    Empty,
}

/// Renders `chart` to an SVG string.
///
/// `view` selects the visible window; `None` shows the chart's full bounds.
///
/// # Errors
/// [`Error::Empty`] when there is no window to draw, or [`Error::Draw`] if plotting fails.
pub fn render_svg(
    chart: &ChartData,
    intersections: &[IntersectionPoint],
    view: Option<Bounds>,
    options: &RenderOptions,
) -> Result<String, Error> {
    let view = view.or_else(|| chart.bounds()).ok_or(Error::Empty)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, options.size).into_drawing_area();
        draw(&root, chart, intersections, view, options)?;
    }
    Ok(svg)
}

/// Renders `chart` to an SVG file. See [`render_svg`].
///
/// # Errors
/// As [`render_svg`], plus [`Error::Io`] if the file cannot be written.
pub fn render_svg_file(
    path: impl AsRef<Path>,
    chart: &ChartData,
    intersections: &[IntersectionPoint],
    view: Option<Bounds>,
    options: &RenderOptions,
) -> Result<(), Error> {
    let svg = render_svg(chart, intersections, view, options)?;
    std::fs::write(path.as_ref(), svg)?;
    tracing::debug!(path = %path.as_ref().display(), "chart rendered");
    Ok(())
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartData,
    intersections: &[IntersectionPoint],
    view: Bounds,
    options: &RenderOptions,
) -> Result<(), Error>
where
    DB: DrawingBackend<ErrorType = std::io::Error>,
{
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(root);
    builder.margin(10).x_label_area_size(30).y_label_area_size(60);
    if !options.title.is_empty() {
        builder.caption(&options.title, (FontFamily::SansSerif, 16).into_font());
    }
    let mut context = builder.build_cartesian_2d(view.x_min..view.x_max, view.y_min..view.y_max)?;

    {
        let mut mesh = context.configure_mesh();
        mesh.label_style((FontFamily::SansSerif, 12))
            .x_label_formatter(&axis_label)
            .y_label_formatter(&axis_label);
        if !options.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;
    }

    for (index, dataset) in chart.visible() {
        let color = dataset_color(dataset, index);
        let style = ShapeStyle::from(color).stroke_width(stroke_width(dataset));
        let label = shorten(&dataset.label);

        let mut legend_added = false;
        for segment in segments(chart, dataset, view) {
            let annotation = match dataset.style.border_dash.as_slice() {
                [dash, gap, ..] => context.draw_series(DashedLineSeries::new(
                    segment.clone(),
                    dash_size(*dash),
                    dash_size(*gap),
                    style,
                ))?,
                _ => context.draw_series(LineSeries::new(segment.clone(), style))?,
            };

            if !legend_added {
                annotation
                    .label(label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                legend_added = true;
            }

            if options.show_points && dataset.style.point_radius > 0.0 {
                let radius = dash_size(dataset.style.point_radius);
                context.draw_series(
                    segment
                        .iter()
                        .map(|&point| Circle::new(point, radius, color.filled())),
                )?;
            }
        }
    }

    let view_contains = |x: f64, y: f64| view.x_range().contains(&x) && view.y_range().contains(&y);
    context.draw_series(
        intersections
            .iter()
            .filter(|p| view_contains(p.x, p.y))
            .map(|p| Cross::new((p.x, p.y), 5, ShapeStyle::from(&BLACK).stroke_width(2))),
    )?;

    if options.show_legend {
        context
            .configure_series_labels()
            .label_font((FontFamily::SansSerif, 10))
            .background_style(WHITE.mix(0.5))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Splits a dataset into drawable runs inside the view.
///
/// Points with an `x` outside the view end a run, as do gaps unless the dataset spans them.
/// `y` is clamped to the view.
fn segments(chart: &ChartData, dataset: &ChartDataset, view: Bounds) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (x, value) in chart.labels.iter().zip(&dataset.data) {
        let point = value
            .filter(|y| y.is_finite() && x.is_finite())
            .filter(|_| view.x_range().contains(x))
            .map(|y| (*x, y.clamp(view.y_min, view.y_max)));

        match point {
            Some(point) => current.push(point),
            None if value.is_none() && dataset.style.span_gaps => {}
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }

    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn dataset_color(dataset: &ChartDataset, index: usize) -> RGBColor {
    let (r, g, b) = parse_hex(&dataset.style.border_color)
        .or_else(|| parse_hex(PALETTE[index % PALETTE.len()]))
        .unwrap_or_default();
    RGBColor(r, g, b)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stroke_width(dataset: &ChartDataset) -> u32 {
    dataset.style.border_width.round().clamp(1.0, 16.0) as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn dash_size(value: f64) -> u32 {
    value.round().clamp(1.0, 64.0) as u32
}

fn axis_label(v: &f64) -> String {
    if *v == 0.0 || (1e-3..1e4).contains(&v.abs()) {
        format!("{v:.2}")
    } else {
        format!("{v:.2e}")
    }
}

/// Shortens a label and adds `...` if too long
fn shorten(label: &str) -> String {
    if label.chars().count() > MAX_LBL_WIDTH {
        let mut s: String = label.chars().take(MAX_LBL_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::DatasetStyle;

    fn line(label: &str, data: Vec<Option<f64>>, span_gaps: bool) -> ChartDataset {
        let style = DatasetStyle {
            border_color: "#2563eb".to_string(),
            border_width: 2.0,
            span_gaps,
            ..DatasetStyle::default()
        };
        ChartDataset::new(label, data, style)
    }

    #[test]
    fn test_segments_follow_gaps() {
        let chart = ChartData::new(vec![0.0, 1.0, 2.0, 3.0], Vec::new());
        let view = Bounds::new(0.0..=3.0, -1.0..=1.0);

        let data = vec![Some(0.0), None, Some(5.0), Some(0.5)];
        let broken = segments(&chart, &line("a", data.clone(), false), view);
        assert_eq!(broken, vec![vec![(0.0, 0.0)], vec![(2.0, 1.0), (3.0, 0.5)]]);

        let spanned = segments(&chart, &line("a", data, true), view);
        assert_eq!(spanned, vec![vec![(0.0, 0.0), (2.0, 1.0), (3.0, 0.5)]]);
    }

    #[test]
    fn test_segments_outside_view() {
        let chart = ChartData::new(vec![0.0, 1.0, 2.0], Vec::new());
        let view = Bounds::new(0.5..=2.0, 0.0..=10.0);

        let runs = segments(&chart, &line("a", vec![Some(1.0), Some(2.0), Some(3.0)], true), view);
        assert_eq!(runs, vec![vec![(1.0, 2.0), (2.0, 3.0)]]);
    }

    #[test]
    fn test_render_svg() {
        let mut hidden = line("hidden series", vec![Some(1.0), Some(1.0)], true);
        hidden.style.hidden = true;
        let chart = ChartData::new(
            vec![0.0, 1.0],
            vec![line("visible series", vec![Some(0.0), Some(1.0)], true), hidden],
        );

        let options = RenderOptions {
            title: "Test chart".to_string(),
            ..RenderOptions::default()
        };
        let svg = render_svg(&chart, &[], None, &options).unwrap();
        assert!(svg.contains("Test chart"));
        assert!(svg.contains("visible series"));
        assert!(!svg.contains("hidden series"));
    }

    #[test]
    fn test_render_empty() {
        let result = render_svg(&ChartData::default(), &[], None, &RenderOptions::default());
        assert!(matches!(result, Err(Error::Empty)));
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("f(x) = x"), "f(x) = x");
        let long = "x".repeat(100);
        assert_eq!(shorten(&long).chars().count(), MAX_LBL_WIDTH);
    }
}
