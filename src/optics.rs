use ndarray::{ArrayBase, Data, Ix2};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::seed_queue::SeedQueue;
use crate::store::PointStore;

use super::Fit;

/// Reachability value meaning "never reached from any core object".
///
/// The largest finite value of `A`, so that ordinary numeric comparison
/// ranks it above every real distance. The engine never does arithmetic on
/// it.
#[must_use]
pub fn undefined_reachability<A: Float>() -> A {
    A::max_value()
}

/// OPTICS (ordering points to identify the clustering structure) cluster
/// ordering.
///
/// Produces a linear ordering of the input points in which density-connected
/// points end up adjacent, annotated with the squared reachability distance
/// each point held when it was emitted. Flat clusters come out of the
/// ordering afterwards via [`find_k_peaks`](crate::find_k_peaks) or
/// [`find_persistent_peaks`](crate::find_persistent_peaks) and
/// [`extract_clusters`](crate::extract_clusters).
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use optics_clustering::{extract_clusters, find_k_peaks, Fit, Optics};
///
/// let points = array![[1.0, 2.0], [2.0, 5.0], [3.0, 6.0], [8.0, 7.0], [8.0, 8.0], [7.0, 3.0]];
/// let ordering = Optics::new(4.5, 2).fit(&points).unwrap();
/// assert_eq!(ordering.len(), 6);
///
/// let mut borders = find_k_peaks(ordering.reachabilities(), 2).unwrap();
/// borders.sort_unstable();
/// let clusters = extract_clusters(&ordering, &borders, 0.0).unwrap();
/// assert_eq!(clusters.len(), 3);             // outlier bucket + two clusters
/// assert_eq!(clusters[1], [0, 1, 2]);        // the first three points in Cluster 1
/// assert_eq!(clusters[2], [3, 4, 5]);        // the rest in Cluster 2
/// ```
#[derive(Debug, Deserialize, Serialize)]
pub struct Optics<A> {
    /// The radius of a neighborhood.
    pub eps: A,

    /// The number of further points, beyond the point itself, required
    /// within `eps` of a core object.
    pub min_pts: usize,
}

impl<A: Float> Default for Optics<A> {
    #[must_use]
    fn default() -> Self {
        Self {
            eps: A::from(0.5_f32).expect("valid float"),
            min_pts: 5,
        }
    }
}

impl<A: Float> Optics<A> {
    #[must_use]
    pub fn new(eps: A, min_pts: usize) -> Self {
        Self { eps, min_pts }
    }

    /// Computes the cluster ordering, invoking `on_processed` synchronously
    /// with the id of each point as it is emitted.
    ///
    /// The callback sees every point exactly once, in emission order. A
    /// caller wanting cancellation can panic out of it; the partially built
    /// ordering is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeEps`] or [`Error::InvalidMinPts`] before any
    /// work is done. A caller wanting an unlimited radius passes
    /// `A::max_value()` as `eps`.
    pub fn fit_with_progress<S, F>(
        &self,
        input: &ArrayBase<S, Ix2>,
        mut on_processed: F,
    ) -> Result<ClusterOrdering<A>>
    where
        S: Data<Elem = A>,
        F: FnMut(usize),
    {
        if self.eps < A::zero() {
            return Err(Error::NegativeEps);
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidMinPts);
        }
        if input.is_empty() {
            return Ok(ClusterOrdering::with_capacity(0));
        }

        debug!(
            rows = input.nrows(),
            min_pts = self.min_pts,
            "computing cluster ordering"
        );
        let mut store = PointStore::new(input);
        let mut ordering = ClusterOrdering::with_capacity(input.nrows());
        for p in 0..store.len() {
            if store.is_processed(p) {
                continue;
            }
            expand_cluster_order(
                &mut store,
                p,
                self.eps,
                self.min_pts,
                &mut ordering,
                &mut on_processed,
            );
        }
        debug!(emitted = ordering.len(), "cluster ordering complete");
        Ok(ordering)
    }
}

impl<S, A> Fit<ArrayBase<S, Ix2>, Result<ClusterOrdering<A>>> for Optics<A>
where
    A: Float,
    S: Data<Elem = A>,
{
    fn fit(&mut self, input: &ArrayBase<S, Ix2>) -> Result<ClusterOrdering<A>> {
        self.fit_with_progress(input, |_| {})
    }
}

/// The linear emission sequence produced by one ordering run, together with
/// the squared reachability each point held at the moment it was emitted.
///
/// The first point of every expansion carries [`undefined_reachability`]; so
/// does every point that no core object ever reached. The reachability
/// sequence, read left to right, is the signal the peak finders operate on.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ClusterOrdering<A> {
    ordered: Vec<usize>,
    reachability: Vec<A>,
}

impl<A: Float> ClusterOrdering<A> {
    fn with_capacity(n: usize) -> Self {
        Self {
            ordered: Vec::with_capacity(n),
            reachability: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, point: usize, reachability: A) {
        self.ordered.push(point);
        self.reachability.push(reachability);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Point ids in emission order.
    #[must_use]
    pub fn points(&self) -> &[usize] {
        &self.ordered
    }

    /// Emission-time reachabilities, parallel to [`points`](Self::points).
    #[must_use]
    pub fn reachabilities(&self) -> &[A] {
        &self.reachability
    }

    /// Pairs of `(point id, emission-time reachability)` in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, A)> + '_ {
        self.ordered
            .iter()
            .copied()
            .zip(self.reachability.iter().copied())
    }

    /// How many points were never reached from a core object.
    #[must_use]
    pub fn unreachable_count(&self) -> usize {
        let undefined = undefined_reachability();
        self.reachability.iter().filter(|&&r| r == undefined).count()
    }

    /// The largest reachability below the undefined sentinel, if any.
    #[must_use]
    pub fn max_finite_reachability(&self) -> Option<A> {
        let undefined = undefined_reachability();
        self.reachability
            .iter()
            .copied()
            .filter(|&r| r < undefined)
            .reduce(A::max)
    }
}

/// Emits `p`, then walks the seed queue outward from it, emitting the
/// reachability-closest candidate first and feeding each new core object's
/// neighborhood back into the queue.
fn expand_cluster_order<A, S, F>(
    store: &mut PointStore<A, S>,
    p: usize,
    eps: A,
    min_pts: usize,
    ordering: &mut ClusterOrdering<A>,
    on_processed: &mut F,
) where
    A: Float,
    S: Data<Elem = A>,
    F: FnMut(usize),
{
    let neighbors = store.neighbors(p, eps);
    store.set_reachability(p, undefined_reachability());
    let core_dist = store.core_distance(p, min_pts, &neighbors);
    store.mark_processed(p);
    ordering.push(p, store.reachability(p));
    on_processed(p);

    if core_dist == undefined_reachability() {
        return;
    }

    let mut seeds = SeedQueue::new();
    update_seeds(store, &neighbors, p, core_dist, &mut seeds);

    while let Some(q) = seeds.pop_min() {
        let neighbors_q = store.neighbors(q, eps);
        let core_dist_q = store.core_distance(q, min_pts, &neighbors_q);
        store.mark_processed(q);
        ordering.push(q, store.reachability(q));
        on_processed(q);
        if core_dist_q != undefined_reachability() {
            // q is a core object
            update_seeds(store, &neighbors_q, q, core_dist_q, &mut seeds);
        }
    }
}

/// Offers every unprocessed neighbor of `center` a new reachability of
/// `max(core_dist, d²)`. Unreached points enter the queue; queued points
/// improve via a decrease-key. A queued reachability only ever shrinks.
fn update_seeds<A, S>(
    store: &mut PointStore<A, S>,
    neighbors: &[usize],
    center: usize,
    core_dist: A,
    seeds: &mut SeedQueue<A>,
) where
    A: Float,
    S: Data<Elem = A>,
{
    for &o in neighbors {
        if store.is_processed(o) {
            continue;
        }
        let new_reachability = core_dist.max(store.squared_distance(center, o));
        let current = store.reachability(o);
        if current == undefined_reachability() {
            store.set_reachability(o, new_reachability);
            seeds.insert(o, new_reachability);
        } else if new_reachability < current {
            store.set_reachability(o, new_reachability);
            seeds.decrease(o, current, new_reachability);
        }
    }
}
