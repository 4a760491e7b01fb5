//! The plotting pipelines: function series, data series, and their composition.
//!
//! Each pipeline is a pure function of its inputs and is rerun whole whenever an input
//! changes. Problems with individual series become warning strings; one bad series never
//! stops the others from being plotted.
//!
//! ```rust
//! use plotfit::{
//!     config::{ChartDisplayOptions, DomainSettings},
//!     expression::Evaluator,
//!     plot::{compose, plot_datasets, plot_functions},
//!     series::{DataSeries, FunctionSeries},
//! };
//!
//! let evaluator = Evaluator::new();
//! let options = ChartDisplayOptions::default();
//!
//! let functions = [FunctionSeries::new("f", "f", "x^2", "#2563eb")];
//! let function_plot = plot_functions(&functions, &DomainSettings::new(-1.0, 1.0, 0.5), &options, &evaluator);
//! assert_eq!(function_plot.chart.labels, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
//! assert_eq!(function_plot.chart.datasets[0].label, "f(x) = x^2");
//!
//! let datasets = [DataSeries::new("d", "Samples", "#22c55e", [(0.25, 1.0), (0.75, 2.0)])];
//! let dataset_plot = plot_datasets(&datasets, &options);
//!
//! let composed = compose(&function_plot, &dataset_plot, None);
//! assert_eq!(composed.chart.labels.len(), 7);
//! assert_eq!(composed.chart.datasets.len(), 2);
//! ```
use serde::Serialize;

use crate::{
    chart::{ChartData, ChartDataset, DatasetStyle},
    config::{ChartDisplayOptions, DomainSettings, PlotRequest},
    expression::Evaluator,
    fit::fit_series,
    integrate::area_under_curve,
    merge::merge,
    palette::hex_to_rgba,
    sampler::sample,
    series::{DataSeries, FunctionSeries},
    statistics::SeriesStats,
    value::round_label,
};

/// Which pipeline produced a [`PlotStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Sampled function series
    Function,

    /// Measured data series
    Dataset,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotStats {
    /// Producing pipeline
    pub mode: PlotMode,

    /// Domain covered, with the step actually used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainSettings>,

    /// Number of labels on the axis (base labels, for datasets)
    pub sample_count: usize,

    /// One entry per input series
    pub series: Vec<SeriesStats>,
}

/// Output of one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotResult {
    /// Chart data for the rendering sink
    pub chart: ChartData,

    /// Human-readable problems, in the order they were found
    pub warnings: Vec<String>,

    /// Per-series statistics
    pub stats: PlotStats,
}

/// Both pipelines combined onto one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Merged chart: function datasets first, then data series
    pub chart: ChartData,

    /// Warnings of both pipelines without repeats, then the import error if any
    pub warnings: Vec<String>,

    /// Stats of the function pipeline
    pub function_stats: PlotStats,

    /// Stats of the dataset pipeline
    pub dataset_stats: PlotStats,
}

/// Samples every function series over `domain`.
///
/// Values are evaluated at the rounded label and rounded to 6 decimals. Blank or
/// invalid expressions, and non-finite results, become gaps.
///
/// An invalid domain produces an empty chart, the sampler's warning, and zeroed stats.
#[must_use]
pub fn plot_functions(
    functions: &[FunctionSeries],
    domain: &DomainSettings,
    options: &ChartDisplayOptions,
    evaluator: &Evaluator,
) -> PlotResult {
    let sampling = sample(domain.min_x, domain.max_x, domain.step);
    let mut warnings = sampling.warnings;
    let mut stats: Vec<SeriesStats> = functions
        .iter()
        .map(|f| SeriesStats::new(&f.id, &f.label, f.visible))
        .collect();

    if sampling.labels.is_empty() {
        return PlotResult {
            chart: ChartData::default(),
            warnings,
            stats: PlotStats {
                mode: PlotMode::Function,
                domain: Some(*domain),
                sample_count: 0,
                series: stats,
            },
        };
    }

    let labels = sampling.labels;
    let mut datasets = Vec::with_capacity(functions.len());

    for (function, stats) in functions.iter().zip(&mut stats) {
        let blank = function.expression.trim().is_empty();
        let compiled = evaluator.compile(&function.expression);

        let data: Vec<Option<f64>> = labels
            .iter()
            .map(|&x| {
                if blank {
                    return None;
                }

                let y = round_label(compiled.evaluate(x)?);
                stats.record(x, y);
                Some(y)
            })
            .collect();

        if stats.valid_points == 0 && stats.visible {
            warnings.push(format!(
                "Function \"{}\" did not produce valid values in the selected domain.",
                function.label
            ));
        }

        let style = DatasetStyle {
            border_color: function.color.clone(),
            background_color: hex_to_rgba(&function.color, 0.16),
            point_radius: if options.show_points { 3.0 } else { 0.0 },
            point_hover_radius: if options.show_points { 5.0 } else { 0.0 },
            border_width: 2.0,
            tension: if options.smooth_curve { 0.3 } else { 0.0 },
            fill: options.fill_area,
            hidden: !function.visible,
            span_gaps: true,
            border_dash: Vec::new(),
        };

        datasets.push(ChartDataset::new(
            format!("{}(x) = {}", function.label, function.expression),
            data,
            style,
        ));
    }

    tracing::debug!(
        series = functions.len(),
        samples = labels.len(),
        step = sampling.effective_step,
        "functions sampled"
    );

    let sample_count = labels.len();
    PlotResult {
        chart: ChartData::new(labels, datasets),
        warnings,
        stats: PlotStats {
            mode: PlotMode::Function,
            domain: Some(DomainSettings {
                step: sampling.effective_step,
                ..*domain
            }),
            sample_count,
            series: stats,
        },
    }
}

/// Plots every data series, with its fitted curve when one is requested.
///
/// The label axis is the sorted union of every series' unique `x` values and every fit's
/// sample positions. Series are projected onto it with exact hits and interpolation
/// between their own points; fits only inside their domain.
#[must_use]
pub fn plot_datasets(datasets: &[DataSeries], options: &ChartDisplayOptions) -> PlotResult {
    if datasets.is_empty() {
        return PlotResult {
            chart: ChartData::default(),
            warnings: Vec::new(),
            stats: PlotStats {
                mode: PlotMode::Dataset,
                domain: None,
                sample_count: 0,
                series: Vec::new(),
            },
        };
    }

    let mut warnings = Vec::new();
    let mut labels = Vec::new();
    let mut base_labels = Vec::new();
    let mut entries = Vec::with_capacity(datasets.len());

    for series in datasets {
        let normalized = series.normalized();
        let xs = normalized.points().iter().map(|(x, _)| *x);
        labels.extend(xs.clone());
        base_labels.extend(xs);

        let mut stats = SeriesStats::new(&series.id, &series.label, series.visible);
        stats.valid_points = normalized.valid_count();
        if let (Some(x), Some(y)) = (normalized.x_range(), normalized.y_range()) {
            stats.min_x = Some(*x.start());
            stats.max_x = Some(*x.end());
            stats.min_y = Some(*y.start());
            stats.max_y = Some(*y.end());
        }

        if normalized.valid_count() < 2 && series.visible {
            warnings.push(format!(
                "Series \"{}\" requires at least two valid points to render a curve.",
                series.label
            ));
        }

        let fit = match &series.fit {
            None => None,
            Some(_) if normalized.is_empty() => {
                warnings.push(format!(
                    "At least two numeric data points are required to compute a fit for \"{}\".",
                    series.label
                ));
                None
            }
            Some(config) => match fit_series(&series.label, normalized.points(), config) {
                Ok(fit) => {
                    labels.extend_from_slice(fit.curve().sample_xs());
                    Some(fit)
                }
                Err(e) => {
                    warnings.push(e.to_string());
                    None
                }
            },
        };

        entries.push((series, normalized, stats, fit));
    }

    sort_unique(&mut labels);
    sort_unique(&mut base_labels);

    let mut chart_datasets = Vec::with_capacity(entries.len() * 2);
    let mut series_stats = Vec::with_capacity(entries.len());

    for (series, normalized, mut stats, fit) in entries {
        let data = normalized.project(&labels);

        stats.area_under_curve = if options.fill_area && series.visible {
            area_under_curve(&labels, &data)
        } else {
            None
        };

        chart_datasets.push(ChartDataset::new(
            series.label.clone(),
            data,
            DatasetStyle {
                border_color: series.color.clone(),
                background_color: hex_to_rgba(&series.color, 0.18),
                point_radius: if options.show_points { 4.0 } else { 0.0 },
                point_hover_radius: if options.show_points { 6.0 } else { 0.0 },
                border_width: 2.0,
                tension: if options.smooth_curve { 0.3 } else { 0.0 },
                fill: options.fill_area,
                hidden: !series.visible,
                span_gaps: true,
                border_dash: Vec::new(),
            },
        ));

        if let Some(fit) = fit {
            chart_datasets.push(ChartDataset::new(
                format!("{} ({})", series.label, fit.legend()),
                fit.curve().project(&labels),
                DatasetStyle {
                    border_color: series.color.clone(),
                    background_color: hex_to_rgba(&series.color, 0.1),
                    point_radius: 0.0,
                    point_hover_radius: 0.0,
                    border_width: 2.0,
                    tension: 0.2,
                    fill: false,
                    hidden: !series.visible,
                    span_gaps: true,
                    border_dash: vec![6.0, 4.0],
                },
            ));
            stats.fit = Some(fit.summary());
        }

        series_stats.push(stats);
    }

    let min_x = series_stats.iter().filter_map(|s| s.min_x).reduce(f64::min);
    let max_x = series_stats.iter().filter_map(|s| s.max_x).reduce(f64::max);
    let domain = min_x.zip(max_x).map(|(min_x, max_x)| DomainSettings {
        min_x,
        max_x,
        step: match base_labels.as_slice() {
            [first, second, ..] => (second - first).abs(),
            _ => 0.0,
        },
    });

    tracing::debug!(
        series = datasets.len(),
        labels = labels.len(),
        warnings = warnings.len(),
        "datasets plotted"
    );

    PlotResult {
        chart: ChartData::new(labels, chart_datasets),
        warnings,
        stats: PlotStats {
            mode: PlotMode::Dataset,
            domain,
            sample_count: base_labels.len(),
            series: series_stats,
        },
    }
}

/// Combines the two pipelines onto one chart.
///
/// Charts are merged with [`merge`], function datasets first. Warnings keep their first
/// occurrence and order; `import_error` is appended last unless already present.
#[must_use]
pub fn compose(functions: &PlotResult, datasets: &PlotResult, import_error: Option<&str>) -> Composition {
    let mut warnings: Vec<String> = Vec::new();
    for warning in functions
        .warnings
        .iter()
        .chain(&datasets.warnings)
        .map(String::as_str)
        .chain(import_error)
    {
        if !warnings.iter().any(|w| w == warning) {
            warnings.push(warning.to_string());
        }
    }

    Composition {
        chart: merge(&functions.chart, &datasets.chart),
        warnings,
        function_stats: functions.stats.clone(),
        dataset_stats: datasets.stats.clone(),
    }
}

/// Runs both pipelines for a request and composes the results.
#[must_use]
pub fn plot(request: &PlotRequest, evaluator: &Evaluator) -> Composition {
    let functions = plot_functions(&request.functions, &request.domain, &request.options, evaluator);
    let datasets = plot_datasets(&request.datasets, &request.options);
    compose(&functions, &datasets, None)
}

fn sort_unique(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_all_close, assert_close,
        fit::{FitConfig, FitType, PolynomialKind},
        sampler::{EMPTY_RANGE_WARNING, INVALID_BOUNDS_WARNING},
    };

    fn options() -> ChartDisplayOptions {
        ChartDisplayOptions::default()
    }

    #[test]
    fn test_function_values_and_stats() {
        let evaluator = Evaluator::new();
        let functions = [
            FunctionSeries::new("a", "f1", "x^2", "#2563eb"),
            FunctionSeries::new("b", "f2", "sqrt(x)", "#a855f7"),
        ];

        let result = plot_functions(&functions, &DomainSettings::new(-2.0, 2.0, 1.0), &options(), &evaluator);
        assert!(result.warnings.is_empty());
        assert_eq!(result.chart.labels, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);

        let squares = &result.chart.datasets[0];
        assert_eq!(squares.label, "f1(x) = x^2");
        assert_eq!(squares.data, vec![Some(4.0), Some(1.0), Some(0.0), Some(1.0), Some(4.0)]);
        assert_eq!(squares.style.background_color, "rgba(37, 99, 235, 0.16)");
        assert_eq!(squares.style.point_radius, 3.0);
        assert!(squares.style.span_gaps);

        let roots = &result.chart.datasets[1];
        assert_eq!(roots.data[..2].to_vec(), vec![None, None]);
        assert_eq!(roots.data[4], Some(1.414214));

        let stats = &result.stats;
        assert_eq!(stats.mode, PlotMode::Function);
        assert_eq!(stats.sample_count, 5);
        assert_eq!(stats.domain, Some(DomainSettings::new(-2.0, 2.0, 1.0)));
        assert_eq!(stats.series[0].valid_points, 5);
        assert_eq!((stats.series[0].min_y, stats.series[0].max_y), (Some(0.0), Some(4.0)));
        assert_eq!(stats.series[1].valid_points, 3);
        assert_eq!(stats.series[1].min_x, Some(0.0));
    }

    #[test]
    fn test_function_warnings() {
        let evaluator = Evaluator::new();
        let mut hidden = FunctionSeries::new("c", "f3", "bogus(x)", "#f97316");
        hidden.visible = false;
        let functions = [
            FunctionSeries::new("a", "f1", "bogus(x)", "#2563eb"),
            FunctionSeries::new("b", "f2", "   ", "#a855f7"),
            hidden,
        ];

        let result = plot_functions(&functions, &DomainSettings::new(0.0, 1.0, 0.5), &options(), &evaluator);
        assert_eq!(
            result.warnings,
            vec![
                "Function \"f1\" did not produce valid values in the selected domain.",
                "Function \"f2\" did not produce valid values in the selected domain.",
            ]
        );
        assert!(result.chart.datasets[2].is_hidden());
        assert!(result.chart.datasets.iter().all(|d| d.data.iter().all(Option::is_none)));
        assert_eq!(result.stats.series[0].min_x, None);
    }

    #[test]
    fn test_function_invalid_domain() {
        let evaluator = Evaluator::new();
        let functions = [FunctionSeries::new("a", "f1", "x", "#2563eb")];

        let domain = DomainSettings::new(5.0, 1.0, 0.1);
        let result = plot_functions(&functions, &domain, &options(), &evaluator);
        assert!(result.chart.is_empty());
        assert_eq!(result.warnings, vec![EMPTY_RANGE_WARNING]);
        assert_eq!(result.stats.sample_count, 0);
        assert_eq!(result.stats.domain, Some(domain));
        assert_eq!(result.stats.series[0].valid_points, 0);

        let domain = DomainSettings::new(f64::NAN, 1.0, 0.1);
        let result = plot_functions(&functions, &domain, &options(), &evaluator);
        assert_eq!(result.warnings, vec![INVALID_BOUNDS_WARNING]);
    }

    #[test]
    fn test_dataset_projection() {
        let datasets = [
            DataSeries::new("a", "A", "#2563eb", [(0.0, 0.0), (2.0, 2.0), (2.0, 4.0)]),
            DataSeries::new("b", "B", "#22c55e", [(1.0, 5.0), (3.0, 7.0)]),
        ];

        let result = plot_datasets(&datasets, &options());
        assert!(result.warnings.is_empty());
        assert_eq!(result.chart.labels, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(result.chart.datasets[0].data, vec![Some(0.0), Some(2.0), Some(4.0), None]);
        assert_eq!(result.chart.datasets[1].data, vec![None, Some(5.0), Some(6.0), Some(7.0)]);
        assert_eq!(result.chart.datasets[0].style.background_color, "rgba(37, 99, 235, 0.18)");

        let stats = &result.stats;
        assert_eq!(stats.mode, PlotMode::Dataset);
        assert_eq!(stats.sample_count, 4);
        assert_eq!(stats.domain, Some(DomainSettings::new(0.0, 3.0, 1.0)));
        assert_eq!(stats.series[0].valid_points, 3);
        assert_eq!((stats.series[0].min_y, stats.series[0].max_y), (Some(0.0), Some(4.0)));
        assert_eq!(stats.series[0].area_under_curve, None);
    }

    #[test]
    fn test_dataset_area_when_filled() {
        let datasets = [DataSeries::new("a", "A", "#2563eb", [(0.0, 0.0), (1.0, 2.0), (2.0, 0.0)])];
        let options = ChartDisplayOptions {
            fill_area: true,
            ..ChartDisplayOptions::default()
        };

        let result = plot_datasets(&datasets, &options);
        assert_eq!(result.stats.series[0].area_under_curve, Some(2.0));
        assert!(result.chart.datasets[0].style.fill);
    }

    #[test]
    fn test_dataset_fit() {
        let points: Vec<_> = (0..6).map(|i| (f64::from(i), 2.0 * f64::from(i) + 1.0)).collect();
        let datasets = [DataSeries::new("a", "Line", "#ef4444", points).with_fit(FitConfig::new(FitType::Auto))];

        let result = plot_datasets(&datasets, &options());
        assert!(result.warnings.is_empty());
        assert_eq!(result.chart.datasets.len(), 2);
        assert_eq!(result.stats.sample_count, 6);

        let curve = &result.chart.datasets[1];
        assert_eq!(curve.label, "Line (Auto (best polynomial): Linear fit)");
        assert_eq!(curve.style.border_dash, vec![6.0, 4.0]);
        assert_eq!(curve.style.point_radius, 0.0);
        assert!(curve.data.iter().all(Option::is_some));

        let summary = result.stats.series[0].fit.as_ref().unwrap();
        assert_eq!(summary.resolved_type, PolynomialKind::Linear);
        assert_all_close!(summary.coefficients, [1.0, 2.0], tolerance = 1e-6);
        assert_close!(summary.r_squared.unwrap(), 1.0, tolerance = 1e-9);
    }

    #[test]
    fn test_dataset_warnings() {
        let mut hidden = DataSeries::new("c", "Hidden", "#000000", [(1.0, 1.0)]);
        hidden.visible = false;
        let datasets = [
            DataSeries::new("a", "Empty", "#2563eb", []).with_fit(FitConfig::new(FitType::Linear)),
            DataSeries::new("b", "Pair", "#22c55e", [(0.0, 1.0), (1.0, 2.0)])
                .with_fit(FitConfig::new(FitType::Cubic)),
            hidden,
        ];

        let result = plot_datasets(&datasets, &options());
        assert_eq!(
            result.warnings,
            vec![
                "Series \"Empty\" requires at least two valid points to render a curve.".to_string(),
                "At least two numeric data points are required to compute a fit for \"Empty\"."
                    .to_string(),
                crate::Error::InsufficientPoints {
                    series: "Pair".to_string(),
                    required: 4,
                    fit: "cubic fit".to_string(),
                }
                .to_string(),
            ]
        );
        assert_eq!(result.chart.datasets.len(), 3);
        assert_eq!(result.stats.domain, Some(DomainSettings::new(0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_dataset_empty() {
        let result = plot_datasets(&[], &options());
        assert!(result.chart.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.domain, None);
        assert!(result.stats.series.is_empty());
    }

    #[test]
    fn test_compose_dedupes_warnings() {
        let evaluator = Evaluator::new();
        let functions = [
            FunctionSeries::new("a", "f", "bogus(x)", "#2563eb"),
            FunctionSeries::new("b", "f", "bogus(x)", "#2563eb"),
        ];
        let function_plot = plot_functions(&functions, &DomainSettings::default(), &options(), &evaluator);
        let dataset_plot = plot_datasets(&[DataSeries::new("d", "D", "#000000", [(0.05, 1.0)])], &options());

        let import_error = "Unsupported file type. Please upload CSV or Excel files.";
        let composed = compose(&function_plot, &dataset_plot, Some(import_error));
        assert_eq!(composed.warnings.len(), 3);
        assert_eq!(composed.warnings[2], import_error);
        assert_eq!(composed.chart.labels.len(), 202);
        assert_eq!(composed.function_stats.mode, PlotMode::Function);
        assert_eq!(composed.dataset_stats.mode, PlotMode::Dataset);
    }

    #[test]
    fn test_plot_request() {
        let request = PlotRequest::from_json(
            r##"{
                "domain": {"minX": 0, "maxX": 1, "step": 0.5},
                "functions": [{"id": "f", "label": "f", "expression": "2*x", "color": "#2563eb"}]
            }"##,
        )
        .unwrap();

        let composed = plot(&request, &Evaluator::new());
        assert_eq!(composed.chart.labels, vec![0.0, 0.5, 1.0]);
        assert_eq!(composed.chart.datasets[0].data, vec![Some(0.0), Some(1.0), Some(2.0)]);
        assert!(composed.warnings.is_empty());
    }
}
