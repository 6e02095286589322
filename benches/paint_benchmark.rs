//! Paint benchmark: Measure full redraw and line diff cost.
//!
//! Target: < 100µs for a 200×50 viewport

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use topless::frame::paint::{paint_diff, paint_full, DiffStyle};
use topless::frame::Frame;
use topless::terminal::OutputBuffer;

/// Build command-like output with `rows` lines of `width` characters.
fn create_output(rows: usize, width: usize, seed: usize) -> String {
    (0..rows)
        .map(|y| {
            (0..width)
                .map(|x| char::from(b'A' + u8::try_from((x + y + seed) % 26).unwrap_or(0)))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint_full_redraw(c: &mut Criterion) {
    let frame = Frame::from_output(&create_output(50, 200, 0), 50);

    c.bench_function("paint_full_200x50", |b| {
        b.iter(|| {
            let mut output = OutputBuffer::with_capacity(16384);
            paint_full(&mut output, black_box(&frame), 0, 200)
        })
    });
}

fn diff_identical_frames(c: &mut Criterion) {
    let previous = Frame::from_output(&create_output(50, 200, 0), 50);
    let output = create_output(50, 200, 0);

    c.bench_function("diff_200x50_identical", |b| {
        b.iter(|| {
            let mut next = Frame::from_output(black_box(&output), 50);
            let mut buffer = OutputBuffer::with_capacity(4096);
            paint_diff(&mut buffer, &previous, &mut next, 0, 200, DiffStyle::default())
        })
    });
}

fn diff_changed_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_changed_rows");
    let previous = Frame::from_output(&create_output(50, 200, 0), 50);
    let base: Vec<String> = create_output(50, 200, 0).split('\n').map(str::to_owned).collect();

    for changed in [1usize, 10, 50] {
        let mut lines = base.clone();
        for line in lines.iter_mut().take(changed) {
            line.replace_range(0..1, "#");
        }
        let output = lines.join("\n");

        group.bench_with_input(BenchmarkId::from_parameter(changed), &output, |b, output| {
            b.iter(|| {
                let mut next = Frame::from_output(black_box(output), 50);
                let mut buffer = OutputBuffer::with_capacity(16384);
                paint_diff(&mut buffer, &previous, &mut next, 0, 200, DiffStyle::default())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, paint_full_redraw, diff_identical_frames, diff_changed_rows);
criterion_main!(benches);
