//! Criterion benchmarks for rust_console_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_console_logger::prelude::*;
use rust_console_logger::utils::{colorize, strip_ansi, visible_width, Palette};
use std::io;

fn sink_logger(builder: LoggerBuilder) -> Logger {
    let sink = OutputStream::from_writer("sink", io::sink(), Some(120));
    builder
        .stdout(sink.clone())
        .stderr(sink)
        .pause_coordinator(PauseCoordinator::new())
        .build()
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("builder", |b| {
        b.iter(|| black_box(sink_logger(Logger::builder().renderer(BasicRenderer::new()))));
    });

    let parent = sink_logger(Logger::builder().renderer(BasicRenderer::new()));
    group.bench_function("with_tag", |b| {
        b.iter(|| black_box(parent.with_tag(black_box("child"))));
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let basic = sink_logger(Logger::builder().renderer(BasicRenderer::new()));
    let mut counter = 0u64;
    group.bench_function("basic_distinct", |b| {
        b.iter(|| {
            counter += 1;
            basic.info([LogValue::from("request"), LogValue::from(counter)]).unwrap();
        });
    });

    let fancy = sink_logger(
        Logger::builder()
            .renderer(FancyRenderer::new().with_unicode(true))
            .colors(true),
    );
    let mut counter = 0u64;
    group.bench_function("fancy_distinct", |b| {
        b.iter(|| {
            counter += 1;
            fancy.info([LogValue::from("request"), LogValue::from(counter)]).unwrap();
        });
    });

    let throttled = sink_logger(Logger::builder().renderer(BasicRenderer::new()));
    group.bench_function("throttled_duplicate", |b| {
        b.iter(|| throttled.info([black_box("same message")]).unwrap());
    });

    let filtered = sink_logger(Logger::builder().renderer(BasicRenderer::new()));
    group.bench_function("filtered", |b| {
        b.iter(|| filtered.debug([black_box("below threshold")]).unwrap());
    });

    group.finish();
}

// ============================================================================
// Text Utility Benchmarks
// ============================================================================

fn bench_text_utils(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_utils");

    let colored = colorize("bold", &format!("{} and {}", colorize("red", "error"), colorize("cyan", "info")));
    group.bench_function("strip_ansi", |b| {
        b.iter(|| black_box(strip_ansi(black_box(&colored))));
    });
    group.bench_function("visible_width", |b| {
        b.iter(|| black_box(visible_width(black_box(&colored))));
    });

    for lines in [1usize, 10, 50] {
        let text = (0..lines)
            .map(|i| format!("line {} of the boxed message", i))
            .collect::<Vec<_>>()
            .join("\n");
        group.bench_with_input(BenchmarkId::new("render_box", lines), &text, |b, text| {
            b.iter(|| black_box(render_box(text, &BoxOptions::default(), &Palette::new(true))));
        });
    }

    let tree: Vec<TreeItem> = (0..20)
        .map(|i| {
            TreeItem::node(
                format!("dir{}", i),
                (0..5).map(|j| TreeItem::from(format!("file{}.rs", j))).collect(),
            )
        })
        .collect();
    group.bench_function("format_tree", |b| {
        b.iter(|| black_box(format_tree(black_box(&tree), &TreeOptions::default())));
    });

    group.finish();
}

criterion_group!(benches, bench_logger_creation, bench_dispatch, bench_text_utils);
criterion_main!(benches);
