//! Cluster-validity metrics.
//!
//! Internal metrics score a partition on its own geometry:
//!
//! - [`davies_bouldin`]: average worst-case ratio of within-cluster scatter to
//!   between-centroid separation. Lower is better; `0` is ideal.
//! - [`silhouette`]: per-point contrast between cohesion (`a`, mean distance to
//!   its own cluster) and separation (`b`, mean distance to the nearest other
//!   cluster), averaged. Ranges over `[-1, 1]`; higher is better.
//!
//! The external metric [`adjusted_rand_index`] compares a predicted labeling to
//! ground truth, corrected for chance: `1` for identical partitions (up to
//! relabeling), around `0` for independent ones. Use [`predicted_labels`] to
//! turn clusters into a label per input point.
//!
//! All distances are Euclidean and accumulated in `f64`.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cluster::{nearest_centroid, squared_euclidean, Cluster};
use crate::error::{Error, Result};

fn check_len(expected: usize, v: &[f32]) -> Result<()> {
    if v.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            found: v.len(),
        });
    }
    Ok(())
}

/// Common dimension of every centroid and member, or an error.
fn check_clusters(clusters: &[Cluster]) -> Result<usize> {
    let d = clusters.first().ok_or(Error::EmptyInput)?.centroid.len();
    for c in clusters {
        check_len(d, &c.centroid)?;
        for m in &c.members {
            check_len(d, m)?;
        }
    }
    Ok(d)
}

#[inline]
fn dist(a: &[f32], b: &[f32]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Davies–Bouldin index of a partition.
///
/// For each cluster `i`, scatter `s_i` is the mean member-to-centroid distance
/// (0 when empty), and
///
/// ```text
/// DB = (1/k) Σ_i max_{j≠i} (s_i + s_j) / d(c_i, c_j)
/// ```
///
/// Returns `0.0` when there are fewer than two clusters. Two coinciding
/// centroids make the ratio undefined and are reported as
/// [`Error::InvalidParameter`].
pub fn davies_bouldin(clusters: &[Cluster]) -> Result<f64> {
    let k = clusters.len();
    if k <= 1 {
        return Ok(0.0);
    }
    check_clusters(clusters)?;

    let scatter: Vec<f64> = clusters
        .iter()
        .map(|c| {
            if c.is_empty() {
                return 0.0;
            }
            let total: f64 = c.members.iter().map(|m| dist(m, &c.centroid)).sum();
            total / c.len() as f64
        })
        .collect();

    let mut sum = 0.0;
    for i in 0..k {
        let mut worst = f64::NEG_INFINITY;
        for j in 0..k {
            if i == j {
                continue;
            }
            let separation = dist(&clusters[i].centroid, &clusters[j].centroid);
            if separation == 0.0 {
                return Err(Error::InvalidParameter {
                    name: "clusters",
                    message: "two centroids coincide",
                });
            }
            worst = worst.max((scatter[i] + scatter[j]) / separation);
        }
        sum += worst;
    }

    Ok(sum / k as f64)
}

/// Mean silhouette coefficient over every member of every cluster.
///
/// For a point `x` in cluster `C`: `a` is its mean distance to the other
/// members of `C` (0 if it is alone), `b` the smallest mean distance to the
/// members of any other non-empty cluster (0 if there is none), and
/// `s(x) = (b - a) / max(a, b)`, taken as 0 when both are 0.
///
/// Returns `0.0` when the clusters hold at most one point in total.
/// Cost is `O(n²·d)`.
pub fn silhouette(clusters: &[Cluster]) -> Result<f64> {
    let n: usize = clusters.iter().map(Cluster::len).sum();
    if n <= 1 {
        return Ok(0.0);
    }
    check_clusters(clusters)?;

    let k = clusters.len();
    let points: Vec<(usize, &[f32])> = clusters
        .iter()
        .enumerate()
        .flat_map(|(label, c)| c.members.iter().map(move |m| (label, m.as_slice())))
        .collect();
    let sizes: Vec<usize> = clusters.iter().map(Cluster::len).collect();

    // sums[i * k + c] = total distance from point i to the members of cluster c.
    let mut sums = vec![0.0f64; n * k];
    for i in 0..n {
        let (li, pi) = points[i];
        for j in (i + 1)..n {
            let (lj, pj) = points[j];
            let d = dist(pi, pj);
            sums[i * k + lj] += d;
            sums[j * k + li] += d;
        }
    }

    let mut total = 0.0;
    for (i, &(own, _)) in points.iter().enumerate() {
        let row = &sums[i * k..(i + 1) * k];

        let a = if sizes[own] > 1 {
            row[own] / (sizes[own] - 1) as f64
        } else {
            0.0
        };

        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| row[c] / sizes[c] as f64)
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.min(v))))
            .unwrap_or(0.0);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    Ok(total / n as f64)
}

#[inline]
fn pairs(x: u64) -> f64 {
    (x * x.saturating_sub(1) / 2) as f64
}

/// Adjusted Rand index between two labelings of the same points.
///
/// Builds the contingency table of `(truth, predicted)` co-occurrences and
/// compares pair counts against their expectation under random labeling:
///
/// ```text
/// ARI = (Σ C(n_ij,2) − E) / (½(Σ C(a_i,2) + Σ C(b_j,2)) − E)
/// E   = Σ C(a_i,2) · Σ C(b_j,2) / C(n,2)
/// ```
///
/// Label values only matter for equality, so the two sides may use different
/// label types. When the denominator vanishes (fewer than two points, or both
/// labelings all-singletons or all-one-group) the partitions are identical
/// and the result is `1.0`.
pub fn adjusted_rand_index<A, B>(truth: &[A], predicted: &[B]) -> Result<f64>
where
    A: Eq + Hash,
    B: Eq + Hash,
{
    if truth.len() != predicted.len() {
        return Err(Error::LengthMismatch {
            expected: truth.len(),
            found: predicted.len(),
        });
    }
    let n = truth.len() as u64;
    if n < 2 {
        return Ok(1.0);
    }

    let mut table: HashMap<(&A, &B), u64> = HashMap::new();
    let mut rows: HashMap<&A, u64> = HashMap::new();
    let mut cols: HashMap<&B, u64> = HashMap::new();
    for (t, p) in truth.iter().zip(predicted) {
        *table.entry((t, p)).or_insert(0) += 1;
        *rows.entry(t).or_insert(0) += 1;
        *cols.entry(p).or_insert(0) += 1;
    }

    let index: f64 = table.values().map(|&c| pairs(c)).sum();
    let sum_a: f64 = rows.values().map(|&c| pairs(c)).sum();
    let sum_b: f64 = cols.values().map(|&c| pairs(c)).sum();

    let expected = sum_a * sum_b / pairs(n);
    let max_index = 0.5 * (sum_a + sum_b);
    let denom = max_index - expected;

    if denom.abs() <= f64::EPSILON * max_index.max(1.0) {
        return Ok(1.0);
    }
    Ok((index - expected) / denom)
}

/// Index of the nearest cluster centroid for every point.
///
/// Ties go to the lowest cluster index.
pub fn predicted_labels(clusters: &[Cluster], points: &[Vec<f32>]) -> Result<Vec<usize>> {
    let d = clusters.first().ok_or(Error::EmptyInput)?.centroid.len();
    let centroids: Vec<&[f32]> = clusters.iter().map(|c| c.centroid.as_slice()).collect();
    for c in &centroids {
        check_len(d, c)?;
    }

    points
        .iter()
        .map(|p| {
            check_len(d, p)?;
            Ok(nearest_centroid(p, &centroids).0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::assign;
    use rand::prelude::*;

    fn triples() -> Vec<Cluster> {
        let points = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
            vec![11.0, 10.0],
        ];
        let c = 1.0 / 3.0;
        assign(&points, &[vec![c, c], vec![10.0 + c, 10.0 + c]]).unwrap()
    }

    #[test]
    fn davies_bouldin_single_cluster_is_zero() {
        let clusters = assign(&[vec![0.0], vec![5.0]], &[vec![1.0]]).unwrap();
        assert_eq!(davies_bouldin(&clusters).unwrap(), 0.0);
        assert_eq!(davies_bouldin(&[]).unwrap(), 0.0);
    }

    #[test]
    fn davies_bouldin_by_hand() {
        // Scatter 1 around 0, scatter 2 around 10: (1 + 2) / 10 for both clusters.
        let clusters = assign(
            &[vec![-1.0], vec![1.0], vec![8.0], vec![12.0]],
            &[vec![0.0], vec![10.0]],
        )
        .unwrap();
        let db = davies_bouldin(&clusters).unwrap();
        assert!((db - 0.3).abs() < 1e-9, "got {}", db);
    }

    #[test]
    fn davies_bouldin_small_for_separated_clusters() {
        let db = davies_bouldin(&triples()).unwrap();
        assert!(db < 0.1, "got {}", db);
    }

    #[test]
    fn davies_bouldin_rejects_coinciding_centroids() {
        let clusters = vec![Cluster::new(vec![1.0, 1.0]), Cluster::new(vec![1.0, 1.0])];
        assert!(matches!(
            davies_bouldin(&clusters),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn silhouette_single_point_is_zero() {
        let clusters = assign(&[vec![3.0, 3.0]], &[vec![0.0, 0.0], vec![5.0, 5.0]]).unwrap();
        assert_eq!(silhouette(&clusters).unwrap(), 0.0);
        assert_eq!(silhouette(&[]).unwrap(), 0.0);
    }

    #[test]
    fn silhouette_near_one_for_separated_clusters() {
        let s = silhouette(&triples()).unwrap();
        assert!(s > 0.9, "got {}", s);
        assert!(s <= 1.0);
    }

    #[test]
    fn silhouette_finite_for_large_coordinates() {
        let clusters = assign(
            &[vec![0.0], vec![1.0], vec![1e20], vec![1.0001e20]],
            &[vec![0.5], vec![1e20]],
        )
        .unwrap();
        let s = silhouette(&clusters).unwrap();
        assert!(s.is_finite());
        assert!(s > 0.9 && s <= 1.0, "got {}", s);

        let db = davies_bouldin(&clusters).unwrap();
        assert!(db.is_finite() && db < 0.1, "got {}", db);
    }

    #[test]
    fn silhouette_by_hand() {
        // Points 0, 1 | 4. For 0: a = 1, b = 4 → 0.75. For 1: a = 1, b = 3 → 2/3.
        // For 4 (alone): a = 0, b = 3.5 → 1.
        let clusters = assign(&[vec![0.0], vec![1.0], vec![4.0]], &[vec![0.5], vec![4.0]]).unwrap();
        let s = silhouette(&clusters).unwrap();
        let expected = (0.75 + 2.0 / 3.0 + 1.0) / 3.0;
        assert!((s - expected).abs() < 1e-9, "got {}", s);
    }

    #[test]
    fn silhouette_ignores_empty_clusters() {
        let with_empty =
            assign(&[vec![0.0], vec![1.0], vec![4.0]], &[vec![0.5], vec![4.0], vec![100.0]])
                .unwrap();
        assert!(with_empty[2].is_empty());
        let without: Vec<Cluster> = with_empty[..2].to_vec();
        assert_eq!(silhouette(&with_empty).unwrap(), silhouette(&without).unwrap());
    }

    #[test]
    fn ari_identical_labelings() {
        let labels = [0, 0, 1, 1, 2, 2, 2];
        assert!((adjusted_rand_index(&labels, &labels).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ari_is_relabel_invariant() {
        let truth: [i64; 6] = [1, 1, 1, 7, 7, 7];
        let pred: [usize; 6] = [4, 4, 4, 0, 0, 0];
        assert!((adjusted_rand_index(&truth, &pred).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ari_known_value() {
        // sklearn: adjusted_rand_score([0, 0, 1, 1], [0, 0, 1, 2]) == 0.5714285714285715
        let ari = adjusted_rand_index(&[0, 0, 1, 1], &[0, 0, 1, 2]).unwrap();
        assert!((ari - 4.0 / 7.0).abs() < 1e-12, "got {}", ari);
    }

    #[test]
    fn ari_degenerate_partitions() {
        // All singletons on both sides.
        assert_eq!(adjusted_rand_index(&[0, 1, 2, 3], &[3, 2, 1, 0]).unwrap(), 1.0);
        // One group on both sides.
        assert_eq!(adjusted_rand_index(&[5, 5, 5], &[0, 0, 0]).unwrap(), 1.0);
        // Too few points to form a pair.
        assert_eq!(adjusted_rand_index(&[1], &[2]).unwrap(), 1.0);
        let empty: [i64; 0] = [];
        assert_eq!(adjusted_rand_index(&empty, &empty).unwrap(), 1.0);
    }

    #[test]
    fn ari_length_mismatch() {
        assert!(matches!(
            adjusted_rand_index(&[0, 1, 1], &[0, 1]),
            Err(Error::LengthMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn ari_random_labelings_average_near_zero() {
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 300;
        let mut sum = 0.0;
        for _ in 0..trials {
            let a: Vec<u8> = (0..200).map(|_| rng.random_range(0..4)).collect();
            let b: Vec<u8> = (0..200).map(|_| rng.random_range(0..4)).collect();
            sum += adjusted_rand_index(&a, &b).unwrap();
        }
        let mean = sum / trials as f64;
        assert!(mean.abs() < 0.01, "mean ARI {}", mean);
    }

    #[test]
    fn predicted_labels_use_nearest_centroid() {
        let clusters = triples();
        let points = vec![vec![0.5, 0.5], vec![9.0, 9.0], vec![-3.0, 0.0]];
        assert_eq!(predicted_labels(&clusters, &points).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn predicted_labels_check_shapes() {
        assert!(matches!(
            predicted_labels(&[], &[vec![0.0]]),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            predicted_labels(&triples(), &[vec![0.0]]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
