use std::{
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use plotfit::{
    config::{default_function, DomainSettings, PlotRequest, PRESETS},
    display::format_expression,
    export::write_csv,
    expression::Evaluator,
    fit::{FitConfig, FitType},
    import::import_path,
    intersection::detect_intersections,
    palette::ColorCycle,
    plot::{compose, plot_datasets, plot_functions, Composition},
    series::{DataSeries, FunctionSeries},
    value::format_number,
};
use tracing_subscriber::EnvFilter;

/// Plot functions and datasets, fit curves, and export the result.
#[derive(Parser)]
#[command(name = "plotfit", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample functions and datasets onto one chart, and print it as CSV
    Plot(PlotArgs),

    /// List the ready-made functions
    Presets,
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Function of x to plot, e.g. `sin(x)/x`. Repeatable
    #[arg(short = 'f', long = "function", value_name = "EXPR")]
    functions: Vec<String>,

    /// Data file (csv, tsv, txt, xlsx or xls) to plot as a series. Repeatable
    #[arg(short, long = "data", value_name = "FILE")]
    data: Vec<PathBuf>,

    /// Fit each data file: linear, quadratic, cubic, quartic, quintic or auto
    #[arg(long)]
    fit: Option<FitType>,

    /// Number of points drawn along each fitted curve
    #[arg(long, default_value_t = 120.0)]
    samples: f64,

    /// Left edge of the function domain
    #[arg(long, allow_hyphen_values = true)]
    min: Option<f64>,

    /// Right edge of the function domain
    #[arg(long, allow_hyphen_values = true)]
    max: Option<f64>,

    /// Sampling step of the function domain
    #[arg(long)]
    step: Option<f64>,

    /// JSON plot request to start from; other options are added to it
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Report the area under each visible dataset
    #[arg(long)]
    fill: bool,

    /// Write the CSV here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Print the whole result as JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Also render the chart to an SVG file
    #[cfg(feature = "plotting")]
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Plot(args) => plot(&args),
        Command::Presets => {
            presets();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn presets() {
    for preset in PRESETS {
        println!("{:<28} {}", preset.label, format_expression(preset.expression));
    }
}

fn plot(args: &PlotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = match &args.request {
        Some(path) => PlotRequest::from_path(path)?,
        None => PlotRequest::default(),
    };

    request.domain = DomainSettings {
        min_x: args.min.unwrap_or(request.domain.min_x),
        max_x: args.max.unwrap_or(request.domain.max_x),
        step: args.step.unwrap_or(request.domain.step),
    };
    request.options.fill_area |= args.fill;

    let mut colors = ColorCycle::default();
    for _ in 0..request.functions.len() + request.datasets.len() {
        colors.next_color();
    }

    for expression in &args.functions {
        let n = request.functions.len() + 1;
        request.functions.push(FunctionSeries::new(
            format!("func-{n}"),
            format!("f{n}"),
            expression.as_str(),
            colors.next_color(),
        ));
    }

    let mut import_errors = Vec::new();
    for path in &args.data {
        match import_path(path) {
            Ok(points) => {
                let n = request.datasets.len() + 1;
                request.datasets.push(DataSeries {
                    id: format!("data-{n}"),
                    label: series_label(path, n),
                    color: colors.next_color().to_string(),
                    visible: true,
                    points,
                    fit: args.fit.map(|fit_type| FitConfig {
                        fit_type,
                        sample_count: args.samples,
                    }),
                });
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "import failed");
                import_errors.push(format!("{}: {e}", path.display()));
            }
        }
    }

    if request.functions.is_empty() && request.datasets.is_empty() {
        request.functions.push(default_function());
    }

    let evaluator = Evaluator::new();
    let functions = plot_functions(&request.functions, &request.domain, &request.options, &evaluator);
    let datasets = plot_datasets(&request.datasets, &request.options);
    let mut composition = compose(&functions, &datasets, import_errors.first().map(String::as_str));
    for error in import_errors.into_iter().skip(1) {
        if !composition.warnings.contains(&error) {
            composition.warnings.push(error);
        }
    }

    report(&composition);

    #[cfg(feature = "plotting")]
    if let Some(path) = &args.svg {
        let intersections = detect_intersections(&composition.chart);
        let options = plotfit::render::RenderOptions::from(&request.options);
        plotfit::render::render_svg_file(path, &composition.chart, &intersections, None, &options)?;
    }

    let mut out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut out, &composition)?;
        writeln!(out)?;
    } else {
        write_csv(&composition.chart, &mut out)?;
    }
    out.flush()?;

    Ok(())
}

fn series_label(path: &Path, n: usize) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map_or_else(|| format!("Series {n}"), str::to_string)
}

/// Human-readable summary on stderr.
fn report(composition: &Composition) {
    for warning in &composition.warnings {
        eprintln!("warning: {warning}");
    }

    for stats in &composition.dataset_stats.series {
        if let Some(fit) = &stats.fit {
            let r_squared = fit.r_squared.map_or_else(|| "n/a".to_string(), format_number);
            eprintln!("fit: {}: {} (R² = {r_squared})", stats.label, fit.equation);
        }
        if let Some(area) = stats.area_under_curve {
            eprintln!("area: {}: {}", stats.label, format_number(area));
        }
    }

    for point in detect_intersections(&composition.chart) {
        eprintln!(
            "intersection: ({}, {}) between {} and {}",
            format_number(point.x),
            format_number(point.y),
            point.series_names[0],
            point.series_names[1],
        );
    }
}
