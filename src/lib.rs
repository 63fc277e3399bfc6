//! k-means clustering and cluster-validity metrics.
//!
//! `lloyd` partitions dense vectors into `k` groups and scores the result.
//!
//! - [`cluster`](mod@cluster): uniform or k-means++ seeding, Lloyd iterations or mini-batch
//!   updates, with an injectable random generator for reproducible runs.
//! - [`metrics`]: Davies–Bouldin index, silhouette score, adjusted Rand index.
//!
//! Loading points and labels from files is left to the caller; parse failures
//! convert into [`Error::Parse`] so they can be propagated with `?`.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod metrics;

pub use cluster::{cluster, Cluster, Clustering, Init, Kmeans, KmeansFit, Outcome};
pub use error::{Error, Result};
