//! Centroid-based clustering of dense vectors.
//!
//! The engine is split the way a k-means run flows:
//!
//! ```text
//! points ─▶ Init ─▶ ┌─ assign (nearest centroid) ─┐ ─▶ clusters
//!                   └─ update (mean / mini-batch) ─┘
//!                        ▲ repeat until centroids_changed is false
//! ```
//!
//! **Objective**: minimize the within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Both the assignment and the mean update can only lower `J`, so Lloyd
//! iterations reach a fixed point; which one depends on the seeding.
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance (compare runs with [`crate::metrics`] to pick it)
//!
//! Only Euclidean distance is supported.
//!
//! ## Usage
//!
//! ```rust
//! use lloyd::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! // Mini-batch updates with k-means++ seeding.
//! let fit = Kmeans::new(2)
//!     .with_kmeans_plus_plus(true)
//!     .with_batch_size(2)
//!     .with_seed(7)
//!     .fit(&data)
//!     .unwrap();
//! assert_eq!(fit.clusters.len(), 2);
//! ```

mod assign;
mod init;
mod kmeans;
mod traits;
mod update;
mod util;

pub use assign::{assign, Cluster};
pub use init::Init;
pub use kmeans::{centroids_changed, cluster, Kmeans, KmeansFit, Outcome};
pub use traits::Clustering;
pub use update::{update_centroids, MiniBatchState};
pub use util::{distance, mean};

pub(crate) use assign::nearest_centroid;
pub(crate) use util::squared_euclidean;
