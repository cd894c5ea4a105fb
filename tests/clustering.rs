use std::collections::HashSet;

use claim_timeline::domain::timeline::{
    AxisDomain, Category, DataPoint, LinearScale, PixelRange, Projection, ValueScale,
    ValueScaleKind, Viewport, cluster, count_label,
};
use quickcheck_macros::quickcheck;

const THRESHOLD: f64 = 24.0;

/// One millisecond per pixel; value 0..1 spans 100px.
fn projection() -> Projection {
    Projection {
        time: LinearScale::new(AxisDomain::new(0.0, 1000.0), PixelRange::new(0.0, 1000.0)),
        value: ValueScale::new(
            ValueScaleKind::Linear,
            AxisDomain::new(0.0, 1.0),
            PixelRange::new(100.0, 0.0),
        ),
    }
}

fn point(id: &str, x: f64, category: Category) -> DataPoint {
    DataPoint {
        id: id.to_string(),
        timestamp: x,
        value: 0.5,
        category,
        source_label: "Test".to_string(),
        claim: "Claim".to_string(),
    }
}

fn sample() -> Vec<DataPoint> {
    vec![
        point("a", 0.0, Category::Coding),
        point("b", 10.0, Category::Coding),
        point("c", 30.0, Category::Math),
        point("d", 100.0, Category::Math),
        point("e", 110.0, Category::Math),
        point("f", 500.0, Category::Vision),
    ]
}

fn summary(points: &[DataPoint], viewport: &Viewport) -> String {
    cluster(points, viewport, &projection(), THRESHOLD)
        .iter()
        .map(|c| {
            format!(
                "{} -> {} ({})",
                c.member_ids.join(","),
                c.primary_category.color_key(),
                count_label(c.size())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn groups_transitively_within_threshold() {
    insta::assert_snapshot!(summary(&sample(), &Viewport::default()), @r###"
    a,b,c -> coding (3)
    d,e -> math (2)
    f -> vision (1)
    "###);
}

#[test]
fn zooming_in_splits_groups() {
    let zoomed = Viewport { scale: 2.0, ..Viewport::default() };
    insta::assert_snapshot!(summary(&sample(), &zoomed), @r###"
    a,b -> coding (2)
    c -> math (1)
    d,e -> math (2)
    f -> vision (1)
    "###);
}

#[test]
fn singletons_are_not_badges() {
    let clusters = cluster(&sample(), &Viewport::default(), &projection(), THRESHOLD);
    let badges: Vec<_> = clusters.iter().filter(|c| c.is_badge()).collect();
    assert_eq!(badges.len(), 2);
    assert!((badges[0].centroid_x - 40.0 / 3.0).abs() < 1e-9);
    assert!((badges[0].centroid_y - 50.0).abs() < 1e-9);
}

#[test]
fn identical_input_gives_identical_output() {
    let points = sample();
    let first = cluster(&points, &Viewport::default(), &projection(), THRESHOLD);
    let second = cluster(&points, &Viewport::default(), &projection(), THRESHOLD);
    assert_eq!(first, second);
}

#[test]
fn large_groups_saturate_label() {
    let points: Vec<DataPoint> =
        (0..150).map(|i| point(&format!("p{i}"), 200.0, Category::Compute)).collect();
    let clusters = cluster(&points, &Viewport::default(), &projection(), THRESHOLD);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].size(), 150);
    assert_eq!(count_label(clusters[0].size()), "99+");
}

#[test]
fn empty_input_has_no_clusters() {
    assert!(cluster(&[], &Viewport::default(), &projection(), THRESHOLD).is_empty());
}

fn random_points(raw: &[(u16, u8)]) -> Vec<DataPoint> {
    raw.iter()
        .enumerate()
        .map(|(i, &(x, v))| DataPoint {
            value: v as f64 / 255.0,
            ..point(&format!("p{i}"), (x % 1000) as f64, Category::Reasoning)
        })
        .collect()
}

#[quickcheck]
fn every_point_lands_in_exactly_one_cluster(raw: Vec<(u16, u8)>) -> bool {
    let points = random_points(&raw);
    let clusters = cluster(&points, &Viewport::default(), &projection(), THRESHOLD);
    let mut seen = HashSet::new();
    let all_unique = clusters.iter().flat_map(|c| c.member_ids.iter()).all(|id| seen.insert(id.clone()));
    all_unique && seen.len() == points.len()
}

#[quickcheck]
fn larger_threshold_never_adds_clusters(raw: Vec<(u16, u8)>, small: u8, extra: u8) -> bool {
    let points = random_points(&raw);
    let small = small as f64;
    let large = small + extra as f64;
    let fine = cluster(&points, &Viewport::default(), &projection(), small);
    let coarse = cluster(&points, &Viewport::default(), &projection(), large);
    coarse.len() <= fine.len()
}
