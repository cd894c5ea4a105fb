use std::collections::BTreeSet;
use std::rc::Rc;

use crate::domain::timeline::{Category, Cluster, DataPoint, Projection, Viewport, cluster};

/// Everything the clustering result depends on.
#[derive(Debug, Clone, PartialEq)]
struct ClusterKey {
    points: Rc<[DataPoint]>,
    viewport: Viewport,
    projection: Projection,
    filters: BTreeSet<Category>,
    threshold: f64,
}

/// Recomputes clusters only when the inputs change structurally.
#[derive(Debug, Default)]
pub struct ClusterMemo {
    key: Option<ClusterKey>,
    value: Rc<Vec<Cluster>>,
    computations: usize,
}

impl ClusterMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `points` must already be filtered by `filters`; the filter set is part
    /// of the key so a filter change always invalidates.
    pub fn get(
        &mut self,
        points: &Rc<[DataPoint]>,
        viewport: Viewport,
        projection: Projection,
        filters: &BTreeSet<Category>,
        threshold: f64,
    ) -> Rc<Vec<Cluster>> {
        let hit = self.key.as_ref().is_some_and(|key| {
            (Rc::ptr_eq(&key.points, points) || key.points == *points)
                && key.viewport == viewport
                && key.projection == projection
                && key.filters == *filters
                && key.threshold == threshold
        });
        if !hit {
            self.value = Rc::new(cluster(points, &viewport, &projection, threshold));
            self.key = Some(ClusterKey {
                points: Rc::clone(points),
                viewport,
                projection,
                filters: filters.clone(),
                threshold,
            });
            self.computations += 1;
        }
        Rc::clone(&self.value)
    }

    /// How many times clustering actually ran.
    pub fn computations(&self) -> usize {
        self.computations
    }
}
