//! Benchmarks for write propagation and cached reads.

use bench::{INPUT, chain_graph, chain_tail, fan_graph};
use cellflow::Runtime;
use cellflow_notebook::smoothing::rolling_mean;
use cellflow_notebook::{Notebook, NotebookConfig};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// One write re-running a chain of n cells
fn bench_chain_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_write");

    for n in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut runtime = Runtime::new(chain_graph(n));
            runtime.evaluate_all();
            let mut value = 1;
            b.iter(|| {
                value = value % 1000 + 1;
                runtime.write(INPUT, value).unwrap();
            });
        });
    }

    group.finish();
}

/// One write where half of the graph does not depend on the control
fn bench_fan_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_write");

    for n in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut runtime = Runtime::new(fan_graph(n));
            runtime.evaluate_all();
            let mut value = 1;
            b.iter(|| {
                value = value % 1000 + 1;
                runtime.write(INPUT, value).unwrap();
            });
        });
    }

    group.finish();
}

/// Steady state: reads of an up-to-date output
fn bench_cached_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_read");

    for n in [10, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut runtime = Runtime::new(chain_graph(n));
            let tail = chain_tail(n);
            runtime.read(&tail).unwrap();
            b.iter(|| black_box(runtime.read(&tail).unwrap()));
        });
    }

    group.finish();
}

fn bench_notebook_slider(c: &mut Criterion) {
    c.bench_function("notebook_slider", |b| {
        let mut notebook = Notebook::new(&NotebookConfig::default()).unwrap();
        notebook.run_all();
        let mut window = 1;
        b.iter(|| {
            window = window % 20 + 1;
            notebook.set_window(window).unwrap();
        });
    });
}

fn bench_rolling_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_mean");
    let series: Vec<f64> = (0..10_000).map(|i| (i as f64).sin()).collect();

    for window in [1, 5, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &window| {
            b.iter(|| rolling_mean(black_box(&series), window).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_chain_write,
    bench_fan_write,
    bench_cached_read,
    bench_notebook_slider,
    bench_rolling_mean,
);
criterion_main!(benches);
