//! Centroid seeding.
//!
//! Two strategies are available:
//!
//! - [`Init::Uniform`]: `k` distinct points drawn uniformly without replacement.
//! - [`Init::KmeansPlusPlus`]: the first centroid uniformly, each further one with
//!   probability proportional to `D(x)²`, the squared distance from `x` to the
//!   nearest centroid chosen so far (Arthur & Vassilvitskii, 2007). This spreads
//!   seeds out and gives an expected `O(log k)` approximation of the optimal
//!   within-cluster sum of squares.
//!
//! Both strategies copy input rows; the caller's data is never aliased.

use rand::seq::index;
use rand::Rng;

use super::util::squared_euclidean;
use crate::error::{Error, Result};

/// Strategy for choosing the starting centroids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Init {
    /// Sample `k` distinct points uniformly at random.
    #[default]
    Uniform,
    /// k-means++ weighted sampling.
    KmeansPlusPlus,
}

impl Init {
    /// Pick the uniform or the weighted strategy from a flag.
    pub fn from_weighted(weighted: bool) -> Self {
        if weighted {
            Init::KmeansPlusPlus
        } else {
            Init::Uniform
        }
    }

    /// Produce `k` starting centroids from `data`.
    ///
    /// Requires `0 < k < data.len()`; otherwise returns [`Error::InvalidK`].
    /// Rows are assumed to share one dimension (see [`crate::cluster::distance`]).
    pub fn centroids<R: Rng + ?Sized>(
        self,
        data: &[Vec<f32>],
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<f32>>> {
        let n = data.len();
        if k == 0 || k >= n {
            return Err(Error::InvalidK { k, n_items: n });
        }

        Ok(match self {
            Init::Uniform => uniform(data, k, rng),
            Init::KmeansPlusPlus => kmeans_plus_plus(data, k, rng),
        })
    }
}

fn uniform<R: Rng + ?Sized>(data: &[Vec<f32>], k: usize, rng: &mut R) -> Vec<Vec<f32>> {
    index::sample(rng, data.len(), k)
        .into_iter()
        .map(|i| data[i].clone())
        .collect()
}

fn kmeans_plus_plus<R: Rng + ?Sized>(data: &[Vec<f32>], k: usize, rng: &mut R) -> Vec<Vec<f32>> {
    let n = data.len();
    let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);
    let mut chosen = vec![false; n];

    let first = rng.random_range(0..n);
    chosen[first] = true;
    centroids.push(data[first].clone());

    // Squared distance from each point to its nearest chosen centroid. Only the
    // newest centroid can lower it, so each round is a single O(n·d) pass.
    let mut weights = vec![f64::INFINITY; n];

    for _ in 1..k {
        let newest = &centroids[centroids.len() - 1];
        for (w, point) in weights.iter_mut().zip(data) {
            let d2 = squared_euclidean(point, newest);
            if d2 < *w {
                *w = d2;
            }
        }

        let total: f64 = weights.iter().sum();
        let selected = if total > 0.0 {
            sample_weighted(&weights, total, rng)
        } else {
            // Every point coincides with a chosen centroid.
            let remaining: Vec<usize> = (0..n).filter(|&i| !chosen[i]).collect();
            tracing::debug!(
                remaining = remaining.len(),
                "k-means++ weights are all zero; falling back to uniform choice"
            );
            remaining[rng.random_range(0..remaining.len())]
        };

        chosen[selected] = true;
        centroids.push(data[selected].clone());
    }

    centroids
}

/// Draw an index with probability `weights[i] / total`.
///
/// Walks the cumulative sum until it exceeds `r ∈ [0, total)`. Zero-weight
/// entries are never returned.
fn sample_weighted<R: Rng + ?Sized>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let r = rng.random::<f64>() * total;
    let mut cumsum = 0.0;
    let mut last_positive = 0;

    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        last_positive = i;
        cumsum += w;
        if cumsum > r {
            return i;
        }
    }

    // Rounding can leave the final cumsum a hair below r.
    last_positive
}
