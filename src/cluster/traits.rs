use crate::error::Result;

/// Hard clustering: one label per input point.
pub trait Clustering {
    /// Fit on `data` and return the cluster index of every point, in input order.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// The number of clusters a fit produces.
    fn n_clusters(&self) -> usize;
}
