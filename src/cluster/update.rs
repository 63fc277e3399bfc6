//! Centroid recomputation.
//!
//! Full-batch (Lloyd) updates replace each centroid with the mean of its
//! members. Mini-batch updates blend the batch mean into the running centroid:
//!
//! ```text
//! c' = (n·c + m·μ_batch) / (n + m)
//! ```
//!
//! where `n` is the number of points the cluster has absorbed in earlier
//! batches and `m` the number in this one. Equivalently, the per-cluster
//! learning rate is `m / (n + m)` and decays as the cluster accumulates points
//! (Sculley, 2010).

use super::assign::Cluster;
use super::util::mean;
use crate::error::Result;

/// New centroids as the mean of each cluster's members.
///
/// A cluster with no members keeps its previous centroid.
pub fn update_centroids(clusters: &[Cluster]) -> Result<Vec<Vec<f32>>> {
    clusters
        .iter()
        .map(|c| {
            if c.is_empty() {
                Ok(c.centroid.clone())
            } else {
                mean(&c.members)
            }
        })
        .collect()
}

/// Per-cluster running counts for one mini-batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniBatchState {
    counts: Vec<usize>,
}

impl MiniBatchState {
    /// Zeroed counts for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self { counts: vec![0; k] }
    }

    /// How many points each cluster has absorbed so far.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Blend each batch cluster's mean into its centroid and advance the counts.
    ///
    /// `batch` must be the partition of this iteration's batch against the
    /// current centroids (so `batch[j].centroid` is centroid `j`). Clusters
    /// that received no batch points keep both their centroid and their count.
    pub fn update(&mut self, batch: &[Cluster]) -> Result<Vec<Vec<f32>>> {
        debug_assert_eq!(batch.len(), self.counts.len());

        let mut next = Vec::with_capacity(batch.len());
        for (cluster, count) in batch.iter().zip(self.counts.iter_mut()) {
            let m = cluster.len();
            if m == 0 {
                next.push(cluster.centroid.clone());
                continue;
            }

            let batch_mean = mean(&cluster.members)?;
            let n = *count as f64;
            let m_f = m as f64;
            let blended = cluster
                .centroid
                .iter()
                .zip(&batch_mean)
                .map(|(&old, &mu)| ((n * f64::from(old) + m_f * f64::from(mu)) / (n + m_f)) as f32)
                .collect();

            next.push(blended);
            *count += m;
        }
        Ok(next)
    }
}
