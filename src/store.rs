use ndarray::{ArrayBase, Data, Ix2};
use num_traits::Float;

use crate::distance::squared_euclidean;
use crate::optics::undefined_reachability;

/// Owns the mutable per-point state of one ordering run.
///
/// Points are addressed by their row index in the borrowed input; that index
/// is the stable handle every other component works with. Construction
/// resets every point to an undefined reachability and an unprocessed flag.
pub(crate) struct PointStore<'a, A, S>
where
    S: Data<Elem = A>,
{
    points: &'a ArrayBase<S, Ix2>,
    reachability: Vec<A>,
    processed: Vec<bool>,
}

impl<'a, A, S> PointStore<'a, A, S>
where
    A: Float,
    S: Data<Elem = A>,
{
    pub(crate) fn new(points: &'a ArrayBase<S, Ix2>) -> Self {
        let n = points.nrows();
        Self {
            points,
            reachability: vec![undefined_reachability(); n],
            processed: vec![false; n],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.points.nrows()
    }

    pub(crate) fn squared_distance(&self, a: usize, b: usize) -> A {
        squared_euclidean(self.points.row(a), self.points.row(b))
    }

    /// All points within `eps` of `p`, including `p` itself, in storage
    /// order. A linear scan; the traversal calls it at most once per point.
    pub(crate) fn neighbors(&self, p: usize, eps: A) -> Vec<usize> {
        let eps_sq = eps * eps;
        (0..self.len())
            .filter(|&q| self.squared_distance(p, q) <= eps_sq)
            .collect()
    }

    /// Squared core distance of `p`: the squared distance to its `min_pts`-th
    /// closest neighbor (0-indexed from `p` itself), or the undefined
    /// sentinel when the neighborhood holds no more than `min_pts` points.
    pub(crate) fn core_distance(&self, p: usize, min_pts: usize, neighbors: &[usize]) -> A {
        if neighbors.len() <= min_pts {
            return undefined_reachability();
        }
        let mut dists: Vec<A> = neighbors.iter().map(|&q| self.squared_distance(p, q)).collect();
        let (_, nth, _) = dists.select_nth_unstable_by(min_pts, |a, b| {
            a.partial_cmp(b).expect("squared distances are never NaN")
        });
        *nth
    }

    pub(crate) fn reachability(&self, i: usize) -> A {
        self.reachability[i]
    }

    pub(crate) fn set_reachability(&mut self, i: usize, value: A) {
        assert!(
            value >= A::zero(),
            "reachability must not be negative"
        );
        self.reachability[i] = value;
    }

    pub(crate) fn is_processed(&self, i: usize) -> bool {
        self.processed[i]
    }

    pub(crate) fn mark_processed(&mut self, i: usize) {
        self.processed[i] = true;
    }
}
