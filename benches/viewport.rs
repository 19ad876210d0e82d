// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use flowstudio::canvas::{edge_curve, hit_test, CanvasMetrics, Hit, Viewport};
use flowstudio::model::Point;

mod fixtures;
mod profiler;

fn probe_points(count: usize) -> Vec<Point> {
    (0..count)
        .map(|idx| {
            let spread = idx.wrapping_mul(7919);
            Point::new((spread % 3000) as f64, ((spread / 3000) % 1200) as f64)
        })
        .collect()
}

fn benches_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport.hit_test");
    let metrics = CanvasMetrics::default();
    let viewport = Viewport::new(Point::new(40.0, -20.0), 0.75);
    let probes = probe_points(256);

    for case in fixtures::Case::ALL {
        let doc = fixtures::fixture(case);
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(case.id(), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for probe in &probes {
                    if !matches!(hit_test(&doc, &viewport, *probe, &metrics), Hit::Empty) {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }
    group.finish();
}

fn benches_edge_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport.edges");
    let metrics = CanvasMetrics::default();
    let viewport = Viewport::new(Point::new(12.0, 8.0), 1.5);
    let doc = fixtures::fixture(fixtures::Case::Large);

    group.throughput(Throughput::Elements(doc.edge_count() as u64));
    group.bench_function("sample_large", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for edge in doc.edges() {
                let Some(curve) = edge_curve(&doc, edge, &metrics) else {
                    continue;
                };
                for point in curve.sample(24) {
                    acc += viewport.to_client(point).x;
                }
            }
            black_box(acc)
        })
    });

    group.bench_function("to_document_roundtrip", |b| {
        let probes = probe_points(1024);
        b.iter(|| {
            let mut acc = 0.0;
            for probe in &probes {
                let doc_point = viewport.to_document(*probe);
                acc += viewport.to_client(doc_point).y;
            }
            black_box(acc)
        })
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_hit_test, benches_edge_sampling
}
criterion_main!(benches);
