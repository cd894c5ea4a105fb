//! Proximity clustering in screen space.
//!
//! Points closer than a pixel threshold are grouped transitively
//! (connected components). Output is deterministic for identical input.

use std::collections::HashMap;

use super::entities::{Category, Cluster, DataPoint};
use super::transform::Projection;
use super::value_objects::Viewport;

/// Clusters are hidden at or above this scale.
pub const CLUSTER_ZOOM_CUTOFF: f64 = 0.7;
pub const DEFAULT_CLUSTER_THRESHOLD_PX: f64 = 24.0;
pub const MAX_EXACT_COUNT: usize = 99;

pub fn should_show_clusters(scale: f64) -> bool {
    scale < CLUSTER_ZOOM_CUTOFF
}

/// Badge text: exact up to 99, then `99+`.
pub fn count_label(count: usize) -> String {
    if count > MAX_EXACT_COUNT {
        format!("{}+", MAX_EXACT_COUNT)
    } else {
        count.to_string()
    }
}

/// Disjoint-set forest with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self { parent: (0..len).collect(), size: vec![1; len] }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut root_a, mut root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return;
        }
        if self.size[root_a] < self.size[root_b] {
            std::mem::swap(&mut root_a, &mut root_b);
        }
        self.parent[root_b] = root_a;
        self.size[root_a] += self.size[root_b];
    }
}

/// Group `points` by screen proximity under `viewport`.
///
/// Every point lands in exactly one cluster; singletons are included and
/// report `is_badge() == false`. Clusters are ordered by their first member's
/// position in `points`, and members keep input order.
pub fn cluster(
    points: &[DataPoint],
    viewport: &Viewport,
    projection: &Projection,
    pixel_threshold: f64,
) -> Vec<Cluster> {
    let projected: Vec<(f64, f64)> =
        points.iter().map(|p| projection.project(p, viewport)).collect();
    let threshold = pixel_threshold.max(0.0);
    let threshold_sq = threshold * threshold;

    // Sweep over x-sorted indices; only pairs within `threshold` on x can link.
    let mut order: Vec<usize> = (0..projected.len()).collect();
    order.sort_by(|&a, &b| projected[a].0.total_cmp(&projected[b].0).then(a.cmp(&b)));

    let mut sets = DisjointSet::new(projected.len());
    for (pos, &i) in order.iter().enumerate() {
        let (xi, yi) = projected[i];
        for &j in &order[pos + 1..] {
            let (xj, yj) = projected[j];
            if xj - xi > threshold {
                break;
            }
            let (dx, dy) = (xj - xi, yj - yi);
            if dx * dx + dy * dy <= threshold_sq {
                sets.union(i, j);
            }
        }
    }

    let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for index in 0..projected.len() {
        let root = sets.find(index);
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(index);
    }

    groups
        .into_iter()
        .map(|members| {
            let count = members.len() as f64;
            let (sum_x, sum_y) = members
                .iter()
                .fold((0.0, 0.0), |(sx, sy), &m| (sx + projected[m].0, sy + projected[m].1));
            Cluster {
                centroid_x: sum_x / count,
                centroid_y: sum_y / count,
                primary_category: primary_category(members.iter().map(|&m| &points[m].category)),
                member_ids: members.iter().map(|&m| points[m].id.clone()).collect(),
            }
        })
        .collect()
}

/// Most frequent category; ties go to the one encountered first.
fn primary_category<'a>(categories: impl Iterator<Item = &'a Category>) -> Category {
    let mut tally: Vec<(&Category, usize)> = Vec::new();
    for category in categories {
        match tally.iter_mut().find(|(seen, _)| *seen == category) {
            Some((_, count)) => *count += 1,
            None => tally.push((category, 1)),
        }
    }
    let mut best: Option<(&Category, usize)> = None;
    for (category, count) in tally {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category.clone()).unwrap_or(Category::Other(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_label_saturates() {
        assert_eq!(count_label(2), "2");
        assert_eq!(count_label(99), "99");
        assert_eq!(count_label(100), "99+");
    }

    #[test]
    fn clusters_only_below_cutoff() {
        assert!(should_show_clusters(0.5));
        assert!(!should_show_clusters(0.7));
        assert!(!should_show_clusters(2.0));
    }

    #[test]
    fn primary_category_prefers_first_on_tie() {
        let cats = [Category::Coding, Category::Math, Category::Math, Category::Coding];
        assert_eq!(primary_category(cats.iter()), Category::Coding);
        let cats = [Category::Coding, Category::Math, Category::Math];
        assert_eq!(primary_category(cats.iter()), Category::Math);
    }

    #[test]
    fn disjoint_set_links_transitively() {
        let mut sets = DisjointSet::new(4);
        sets.union(0, 1);
        sets.union(2, 3);
        sets.union(1, 3);
        assert_eq!(sets.find(0), sets.find(2));
    }
}
