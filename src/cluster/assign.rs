//! Nearest-centroid partitioning.

use super::util::squared_euclidean;
use crate::error::{Error, Result};

/// One group of a partition: its centroid and the points assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Representative vector the members were assigned against.
    pub centroid: Vec<f32>,
    /// Copies of the member vectors, in input order.
    pub members: Vec<Vec<f32>>,
    /// Position of each member in the input slice (parallel to `members`).
    pub indices: Vec<usize>,
}

impl Cluster {
    /// An empty cluster around `centroid`.
    pub fn new(centroid: Vec<f32>) -> Self {
        Self {
            centroid,
            members: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no point was assigned here.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn push(&mut self, index: usize, point: &[f32]) {
        self.indices.push(index);
        self.members.push(point.to_vec());
    }
}

/// Index of the closest centroid and the squared distance to it.
///
/// Ties go to the lowest index, so repeated calls with the same inputs agree.
#[inline]
pub(crate) fn nearest_centroid<C: AsRef<[f32]>>(point: &[f32], centroids: &[C]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_euclidean(point, c.as_ref());
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    (best, best_dist)
}

/// Assign every point to its nearest centroid.
///
/// Always returns exactly `centroids.len()` clusters (some may be empty), each
/// holding a copy of its centroid. Cost is `O(n·k·d)`.
pub fn assign(points: &[Vec<f32>], centroids: &[Vec<f32>]) -> Result<Vec<Cluster>> {
    let d = centroids.first().ok_or(Error::EmptyInput)?.len();
    for v in centroids.iter().chain(points) {
        if v.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: v.len(),
            });
        }
    }
    Ok(assign_subset(points, 0..points.len(), centroids))
}

/// Assign only `points[i]` for each `i` in `subset`. Dimensions are not checked.
pub(crate) fn assign_subset(
    points: &[Vec<f32>],
    subset: impl IntoIterator<Item = usize>,
    centroids: &[Vec<f32>],
) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = centroids.iter().cloned().map(Cluster::new).collect();
    for i in subset {
        let point = &points[i];
        let (best, _) = nearest_centroid(point, centroids);
        clusters[best].push(i, point);
    }
    clusters
}
