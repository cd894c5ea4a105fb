use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use claim_timeline::application::memo::ClusterMemo;
use claim_timeline::domain::timeline::{
    AxisDomain, Category, DataPoint, LinearScale, PixelRange, Projection, ValueScale,
    ValueScaleKind, Viewport, cluster,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const DAY_MS: f64 = 86_400_000.0;
const WIDTH: f64 = 1200.0;

/// Claims spread over ten years with bursts around a few dates.
fn generate_points(count: usize) -> Vec<DataPoint> {
    let categories = [Category::Reasoning, Category::Coding, Category::Math, Category::Vision];
    (0..count)
        .map(|i| {
            let burst = (i % 7) as f64 * 500.0 * DAY_MS;
            let jitter = ((i as f64 * 0.37).sin() * 40.0).round() * DAY_MS;
            DataPoint {
                id: format!("claim-{i}"),
                timestamp: burst + jitter + (i as f64 * 0.5) * DAY_MS,
                value: ((i as f64 * 0.13).cos() + 1.0) / 2.0,
                category: categories[i % categories.len()].clone(),
                source_label: "Bench".to_string(),
                claim: "Generated claim".to_string(),
            }
        })
        .collect()
}

fn projection(points: &[DataPoint]) -> Projection {
    let time = AxisDomain::from_values(points.iter().map(|p| p.timestamp), 0.0)
        .unwrap_or(AxisDomain::new(0.0, 1.0));
    Projection {
        time: LinearScale::new(time, PixelRange::new(0.0, WIDTH)),
        value: ValueScale::new(
            ValueScaleKind::Linear,
            AxisDomain::new(0.0, 1.0),
            PixelRange::new(400.0, 0.0),
        ),
    }
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");
    group.measurement_time(Duration::from_secs(5));

    for count in [100, 1_000, 5_000] {
        let points = generate_points(count);
        let projection = projection(&points);
        for scale in [0.5, 0.65] {
            let viewport = Viewport { scale, ..Viewport::default() };
            group.bench_with_input(
                BenchmarkId::new(format!("cluster@{scale}"), count),
                &count,
                |b, _| b.iter(|| cluster(black_box(&points), &viewport, &projection, 24.0)),
            );
        }
    }
    group.finish();
}

fn bench_memo_hit(c: &mut Criterion) {
    let points: Rc<[DataPoint]> = generate_points(5_000).into();
    let projection = projection(&points);
    let viewport = Viewport { scale: 0.5, ..Viewport::default() };
    let filters = BTreeSet::new();
    let mut memo = ClusterMemo::new();
    memo.get(&points, viewport, projection, &filters, 24.0);

    c.bench_function("cluster_memo_hit_5000", |b| {
        b.iter(|| memo.get(black_box(&points), viewport, projection, &filters, 24.0))
    });
}

criterion_group!(clustering_benches, bench_cluster, bench_memo_hit);
criterion_main!(clustering_benches);
