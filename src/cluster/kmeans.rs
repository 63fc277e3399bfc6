//! K-means clustering: Lloyd iterations and the mini-batch variant.
//!
//! # Lloyd's Algorithm
//!
//! 1. Seed k centroids ([`Init::Uniform`] or [`Init::KmeansPlusPlus`])
//! 2. **Assign**: each point → nearest centroid
//! 3. **Update**: each centroid → mean of its members
//! 4. Stop once no centroid moves more than `threshold`, or after `max_iter`
//!
//! Each pass costs `O(n·k·d)`, dominated by the assignment step.
//!
//! # Mini-batch
//!
//! When a batch size `0 < b < n` is configured, each iteration samples `b`
//! distinct points, assigns only those, and blends their per-cluster means into
//! the centroids with a learning rate that decays with the cluster's history
//! (see [`MiniBatchState`]). Iterations are cheaper (`O(b·k·d)`) but more are
//! needed. A final full assignment pass builds the returned partition.
//!
//! # Termination
//!
//! Running out of iterations is not an error. [`Kmeans::fit`] reports which of
//! the two terminal states was reached through [`KmeansFit::outcome`]; the
//! plain [`cluster`] function returns only the partition.

use rand::prelude::*;
use rand::seq::index;

use super::assign::{assign_subset, Cluster};
use super::init::Init;
use super::traits::Clustering;
use super::update::{update_centroids, MiniBatchState};
use super::util::{check_dimensions, squared_euclidean};
use crate::error::{Error, Result};

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum assign/update passes.
    max_iter: usize,
    /// Largest centroid movement still considered "unchanged".
    threshold: f64,
    /// Seeding strategy.
    init: Init,
    /// Points sampled per iteration; 0 selects full-batch updates.
    batch_size: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// How a k-means run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No centroid moved more than the threshold.
    Converged,
    /// `max_iter` passes ran without converging.
    Exhausted,
}

/// Result of [`Kmeans::fit`].
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Exactly `k` clusters whose members partition the input.
    pub clusters: Vec<Cluster>,
    /// Number of assign/update passes performed.
    pub iterations: usize,
    /// Terminal state of the run.
    pub outcome: Outcome,
}

impl KmeansFit {
    /// Whether the run stopped because centroids settled.
    pub fn converged(&self) -> bool {
        self.outcome == Outcome::Converged
    }

    /// Centroid of each cluster, in cluster order.
    pub fn centroids(&self) -> Vec<&[f32]> {
        self.clusters.iter().map(|c| c.centroid.as_slice()).collect()
    }

    /// Cluster index of every input point, in input order.
    pub fn labels(&self) -> Vec<usize> {
        let n = self.clusters.iter().map(Cluster::len).sum();
        let mut labels = vec![0usize; n];
        for (j, cluster) in self.clusters.iter().enumerate() {
            for &i in &cluster.indices {
                labels[i] = j;
            }
        }
        labels
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    ///
    /// Defaults: `max_iter = 100`, `threshold = 1e-4`, uniform seeding,
    /// full-batch updates, fresh random seed per fit.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            threshold: 1e-4,
            init: Init::Uniform,
            batch_size: 0,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence threshold (maximum centroid movement, in input units).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the seeding strategy.
    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    /// Use k-means++ seeding when `enabled`, uniform seeding otherwise.
    pub fn with_kmeans_plus_plus(mut self, enabled: bool) -> Self {
        self.init = Init::from_weighted(enabled);
        self
    }

    /// Set the mini-batch size. `0`, or any size not below the point count,
    /// selects full-batch updates.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cluster `data`, drawing randomness from the configured seed (or a fresh
    /// generator when none is set).
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, &mut rng)
    }

    /// Cluster `data` using the caller's random generator. The configured seed
    /// is ignored.
    pub fn fit_with_rng<R: Rng + ?Sized>(&self, data: &[Vec<f32>], rng: &mut R) -> Result<KmeansFit> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::InvalidParameter {
                name: "threshold",
                message: "must be finite and non-negative",
            });
        }

        let n = data.len();
        if self.k == 0 || self.k >= n {
            return Err(Error::InvalidK {
                k: self.k,
                n_items: n,
            });
        }
        let dim = check_dimensions(data)?;

        let mini_batch = self.batch_size > 0 && self.batch_size < n;
        tracing::debug!(
            k = self.k,
            n,
            dim,
            init = ?self.init,
            mini_batch,
            "starting k-means"
        );

        let centroids = self.init.centroids(data, self.k, rng)?;
        let fit = if mini_batch {
            self.run_mini_batch(data, centroids, rng)?
        } else {
            self.run_full_batch(data, centroids)?
        };

        tracing::debug!(
            iterations = fit.iterations,
            outcome = ?fit.outcome,
            "k-means finished"
        );
        Ok(fit)
    }

    fn run_full_batch(&self, data: &[Vec<f32>], mut centroids: Vec<Vec<f32>>) -> Result<KmeansFit> {
        let n = data.len();
        // Membership is rebuilt from scratch after every centroid change.
        let mut clusters = assign_subset(data, 0..n, &centroids);
        let mut iterations = 0;
        let mut outcome = Outcome::Exhausted;

        for iter in 0..self.max_iter {
            let next = update_centroids(&clusters)?;
            iterations = iter + 1;

            tracing::trace!(iter, shift = max_shift(&centroids, &next), "lloyd pass");

            if !centroids_changed(&centroids, &next, self.threshold) {
                outcome = Outcome::Converged;
                break;
            }
            centroids = next;
            clusters = assign_subset(data, 0..n, &centroids);
        }

        Ok(KmeansFit {
            clusters,
            iterations,
            outcome,
        })
    }

    fn run_mini_batch<R: Rng + ?Sized>(
        &self,
        data: &[Vec<f32>],
        mut centroids: Vec<Vec<f32>>,
        rng: &mut R,
    ) -> Result<KmeansFit> {
        let n = data.len();
        let mut state = MiniBatchState::new(self.k);
        let mut iterations = 0;
        let mut outcome = Outcome::Exhausted;

        for iter in 0..self.max_iter {
            let batch = index::sample(rng, n, self.batch_size);
            let batch_clusters = assign_subset(data, batch.into_iter(), &centroids);
            let next = state.update(&batch_clusters)?;
            iterations = iter + 1;

            tracing::trace!(iter, shift = max_shift(&centroids, &next), "mini-batch pass");

            let changed = centroids_changed(&centroids, &next, self.threshold);
            centroids = next;
            if !changed {
                outcome = Outcome::Converged;
                break;
            }
        }

        Ok(KmeansFit {
            clusters: assign_subset(data, 0..n, &centroids),
            iterations,
            outcome,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Whether any centroid moved by more than `threshold`.
///
/// Sets of different size, or centroids of different dimension, always count
/// as changed.
pub fn centroids_changed(old: &[Vec<f32>], new: &[Vec<f32>], threshold: f64) -> bool {
    if old.len() != new.len() {
        return true;
    }
    old.iter().zip(new).any(|(a, b)| {
        a.len() != b.len() || squared_euclidean(a, b).sqrt() > threshold
    })
}

/// Largest single-centroid movement between two same-shaped centroid sets.
fn max_shift(old: &[Vec<f32>], new: &[Vec<f32>]) -> f64 {
    old.iter()
        .zip(new)
        .map(|(a, b)| squared_euclidean(a, b).sqrt())
        .fold(0.0, f64::max)
}

/// Partition `points` into `k` clusters.
///
/// Uses k-means++ seeding when `weighted_init` is set and mini-batch updates
/// when `0 < batch_size < points.len()`. Fails with [`Error::InvalidK`] unless
/// `0 < k < points.len()`. Whether the run converged or exhausted `max_iter` is
/// not reported; use [`Kmeans::fit_with_rng`] for that.
pub fn cluster<R: Rng + ?Sized>(
    points: &[Vec<f32>],
    k: usize,
    max_iter: usize,
    threshold: f64,
    weighted_init: bool,
    batch_size: usize,
    rng: &mut R,
) -> Result<Vec<Cluster>> {
    let fit = Kmeans::new(k)
        .with_max_iter(max_iter)
        .with_threshold(threshold)
        .with_kmeans_plus_plus(weighted_init)
        .with_batch_size(batch_size)
        .fit_with_rng(points, rng)?;
    Ok(fit.clusters)
}
