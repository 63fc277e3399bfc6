//! Distance and aggregation primitives over dense vectors.

use crate::error::{Error, Result};

/// Euclidean distance between two vectors of equal length.
///
/// Returns [`Error::DimensionMismatch`] when the lengths differ.
pub fn distance(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(squared_euclidean(a, b).sqrt())
}

/// Element-wise arithmetic mean of a non-empty set of vectors.
///
/// Accumulates in `f64` so long runs of small coordinates do not lose precision.
pub fn mean<V: AsRef<[f32]>>(vectors: &[V]) -> Result<Vec<f32>> {
    let first = vectors.first().ok_or(Error::EmptyInput)?.as_ref();
    let d = first.len();

    let mut acc = vec![0.0f64; d];
    for v in vectors {
        let v = v.as_ref();
        if v.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: v.len(),
            });
        }
        for (s, &x) in acc.iter_mut().zip(v) {
            *s += f64::from(x);
        }
    }

    let count = vectors.len() as f64;
    Ok(acc.into_iter().map(|s| (s / count) as f32).collect())
}

/// Unchecked squared Euclidean distance; callers validate dimensions up front.
///
/// Accumulated in `f64`: squaring an `f32` difference overflows past ~1.8e19.
#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}

/// Validate that `data` is non-empty and every row shares the first row's dimension.
///
/// Returns that dimension.
pub(crate) fn check_dimensions(data: &[Vec<f32>]) -> Result<usize> {
    let d = data.first().ok_or(Error::EmptyInput)?.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for point in data {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = [1.5, -2.0, 7.25];
        assert_eq!(distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn distance_stays_finite_for_large_coordinates() {
        let d = distance(&[0.0], &[1e20]).unwrap();
        assert!(d.is_finite());
        assert!((d - 1e20).abs() / 1e20 < 1e-6, "got {}", d);

        let d = distance(&[-3e38, 3e38], &[3e38, -3e38]).unwrap();
        assert!(d.is_finite());
    }

    #[test]
    fn distance_rejects_mismatched_lengths() {
        let err = distance(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn mean_is_elementwise() {
        let vs = vec![vec![0.0, 2.0], vec![2.0, 4.0], vec![4.0, 0.0]];
        assert_eq!(mean(&vs).unwrap(), vec![2.0, 2.0]);
    }

    #[test]
    fn mean_of_nothing_is_an_error() {
        let vs: Vec<Vec<f32>> = vec![];
        assert!(matches!(mean(&vs), Err(Error::EmptyInput)));
    }

    #[test]
    fn mean_accepts_borrowed_rows() {
        let a = [1.0f32, 1.0];
        let b = [3.0f32, 5.0];
        let rows: Vec<&[f32]> = vec![&a, &b];
        assert_eq!(mean(&rows).unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn check_dimensions_catches_ragged_rows() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(
            check_dimensions(&data),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(check_dimensions(&[vec![1.0, 2.0, 3.0]]).unwrap(), 3);
    }
}
