use criterion::{criterion_group, criterion_main, Criterion};
use plotfit::{
    chart::ChartData,
    config::{ChartDisplayOptions, DomainSettings},
    expression::Evaluator,
    fit::{fit_series, polynomial_regression, FitConfig, FitType},
    intersection::detect_intersections,
    merge::merge,
    plot::{plot_datasets, plot_functions},
    sampler::sample,
    series::{DataSeries, FunctionSeries},
};
use std::hint::black_box;

fn gen_sample_data(n: usize) -> Vec<(f64, f64)> {
    plotfit::function!(f(x) = 1.0 + 3.0 x + 5.3 x^2);
    (0..n)
        .map(|i| {
            let x = i as f64 / n as f64 * 10.0;
            (x, f.y(x))
        })
        .collect()
}

fn function_chart(evaluator: &Evaluator, expressions: &[&str]) -> ChartData {
    let functions: Vec<_> = expressions
        .iter()
        .enumerate()
        .map(|(i, e)| FunctionSeries::new(format!("f{i}"), format!("f{i}"), *e, "#2563eb"))
        .collect();

    plot_functions(
        &functions,
        &DomainSettings::default(),
        &ChartDisplayOptions::default(),
        evaluator,
    )
    .chart
}

fn criterion_benchmark(c: &mut Criterion) {
    //
    // How the solver scales with data size
    println!("Benchmarking fit vs n (Degree=3)...");
    let mut group = c.benchmark_group("fit_vs_n");
    for n in [100, 1_000, 10_000] {
        let data = gen_sample_data(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| polynomial_regression(black_box(&data), 3))
        });
    }
    group.finish();

    //
    // Each fit type on the same data, auto included
    println!("Benchmarking fit vs type (n=1000)...");
    let samples = gen_sample_data(1_000);
    let mut group = c.benchmark_group("fit_vs_type");
    for fit_type in FitType::ALL {
        let config = FitConfig::new(fit_type);
        group.bench_function(fit_type.name(), |b| {
            b.iter(|| fit_series("bench", black_box(&samples), &config))
        });
    }
    group.finish();

    //
    // Expression evaluation, with and without the compile cache
    println!("Benchmarking expressions...");
    let mut group = c.benchmark_group("expression");
    let evaluator = Evaluator::new();
    group.bench_function("cached", |b| {
        b.iter(|| evaluator.evaluate(black_box("e^(-x^2) * sin(3*x)"), black_box(0.5)))
    });
    group.bench_function("uncached", |b| {
        b.iter(|| {
            let evaluator = Evaluator::new();
            evaluator.evaluate(black_box("e^(-x^2) * sin(3*x)"), black_box(0.5))
        })
    });
    group.finish();

    //
    // Whole pipelines at the sampler cap
    println!("Benchmarking pipelines...");
    let mut group = c.benchmark_group("pipeline");
    group.bench_function("sample_5000", |b| {
        b.iter(|| sample(black_box(-1e6), black_box(1e6), black_box(1e-3)))
    });

    let evaluator = Evaluator::new();
    group.bench_function("plot_functions", |b| {
        b.iter(|| function_chart(&evaluator, black_box(&["x^2", "sin(x)/x", "sqrt(abs(x))"])))
    });

    let datasets = [DataSeries::new("d", "Samples", "#22c55e", gen_sample_data(500))
        .with_fit(FitConfig::new(FitType::Auto))];
    let options = ChartDisplayOptions::default();
    group.bench_function("plot_datasets", |b| {
        b.iter(|| plot_datasets(black_box(&datasets), &options))
    });

    let functions = function_chart(&evaluator, &["x", "-x", "sin(x)", "cos(x)"]);
    let data = plot_datasets(&datasets, &options).chart;
    group.bench_function("merge", |b| b.iter(|| merge(black_box(&functions), black_box(&data))));
    group.bench_function("intersections", |b| {
        b.iter(|| detect_intersections(black_box(&functions)))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
