use itertools::Itertools;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A local minimum paired with the local maximum at which its sub-level-set
/// component merges into an older one.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct PairedExtrema<A> {
    pub min_index: usize,
    pub max_index: usize,
    pub persistence: A,
}

/// All paired extrema of a 1-D signal, sorted by ascending persistence.
///
/// Positions are taken in ascending `(value, index)` order; each visited
/// position either starts a component, joins the component of a visited
/// neighbor, or bridges two components and becomes the paired maximum of the
/// younger one's minimum. The global minimum never pairs. Plateaus resolve
/// towards the lower index, so the result is deterministic.
#[must_use]
pub fn paired_extrema<A: Float>(signal: &[A]) -> Vec<PairedExtrema<A>> {
    let n = signal.len();
    let order = (0..n).sorted_by(|&a, &b| {
        signal[a]
            .partial_cmp(&signal[b])
            .expect("signal values are never NaN")
            .then_with(|| a.cmp(&b))
    });

    let mut components = SubLevelSets::new(n);
    let mut visited = vec![false; n];
    let mut pairs = Vec::new();
    for idx in order {
        let left = idx.checked_sub(1).filter(|&l| visited[l]);
        let right = Some(idx + 1).filter(|&r| r < n && visited[r]);
        match (left, right) {
            (None, None) => {}
            (Some(neighbor), None) | (None, Some(neighbor)) => components.join(idx, neighbor),
            (Some(l), Some(r)) => {
                let dying_min = components.merge(l, r, signal);
                pairs.push(PairedExtrema {
                    min_index: dying_min,
                    max_index: idx,
                    persistence: signal[idx] - signal[dying_min],
                });
                components.join(idx, l);
            }
        }
        visited[idx] = true;
    }

    pairs.sort_by(|a, b| {
        a.persistence
            .partial_cmp(&b.persistence)
            .expect("persistences are never NaN")
            .then_with(|| a.min_index.cmp(&b.min_index))
    });
    pairs
}

/// The maxima of the `k - 1` most persistent extrema pairs, most persistent
/// first. Fewer pairs than that returns them all.
///
/// Fed a reachability sequence, these are the borders splitting the ordering
/// into `k` clusters. Sort them ascending before handing them to
/// [`extract_clusters`](crate::extract_clusters).
///
/// # Errors
///
/// Returns [`Error::InvalidClusterCount`] when `k` is zero.
pub fn find_k_peaks<A: Float>(signal: &[A], k: usize) -> Result<Vec<usize>> {
    if k == 0 {
        return Err(Error::InvalidClusterCount);
    }
    let pairs = paired_extrema(signal);
    Ok(pairs.iter().rev().take(k - 1).map(|p| p.max_index).collect())
}

/// The maxima of every extrema pair at least `threshold` persistent, in
/// ascending order of persistence.
///
/// Sort the result ascending before handing it to
/// [`extract_clusters`](crate::extract_clusters).
///
/// # Errors
///
/// Returns [`Error::NegativePersistence`] when `threshold` is negative.
pub fn find_persistent_peaks<A: Float>(signal: &[A], threshold: A) -> Result<Vec<usize>> {
    if threshold < A::zero() {
        return Err(Error::NegativePersistence);
    }
    Ok(paired_extrema(signal)
        .into_iter()
        .filter(|p| p.persistence >= threshold)
        .map(|p| p.max_index)
        .collect())
}

/// Union-find over the visited positions of the signal. Each component
/// remembers the index of its minimum; merging keeps the older minimum and
/// reports the younger one as dead.
struct SubLevelSets {
    parent: Vec<usize>,
    lowest: Vec<usize>,
}

impl SubLevelSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            lowest: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if x != self.parent[x] {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Attaches the fresh position `x` to the component of `neighbor`,
    /// keeping that component's minimum.
    fn join(&mut self, x: usize, neighbor: usize) {
        let root = self.find(x);
        let into = self.find(neighbor);
        self.parent[root] = into;
    }

    /// Merges the two distinct components around a bridging maximum and
    /// returns the min-index of the one that dies: the component whose
    /// minimum is greater, ties resolving to the later index.
    fn merge<A: Float>(&mut self, l: usize, r: usize, signal: &[A]) -> usize {
        let a = self.find(l);
        let b = self.find(r);
        let ord = signal[self.lowest[a]]
            .partial_cmp(&signal[self.lowest[b]])
            .expect("signal values are never NaN")
            .then_with(|| self.lowest[a].cmp(&self.lowest[b]));
        let (survivor, dying) = if ord.is_lt() { (a, b) } else { (b, a) };
        let dying_min = self.lowest[dying];
        self.parent[dying] = survivor;
        dying_min
    }
}
