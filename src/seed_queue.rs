use std::cmp::Ordering;
use std::collections::BTreeSet;

use num_traits::Float;

/// Expansion candidates ordered by `(reachability, point id)`.
///
/// The id tie-break keeps a run deterministic when several seeds share a
/// reachability. Keys are squared distances or the undefined sentinel, never
/// NaN, so the comparator can demand a total order.
pub(crate) struct SeedQueue<A> {
    seeds: BTreeSet<Seed<A>>,
}

#[derive(Clone, Copy, Debug)]
struct Seed<A> {
    reachability: A,
    point: usize,
}

impl<A: Float> Ord for Seed<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reachability
            .partial_cmp(&other.reachability)
            .expect("seed keys are never NaN")
            .then_with(|| self.point.cmp(&other.point))
    }
}

impl<A: Float> PartialOrd for Seed<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Float> PartialEq for Seed<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A: Float> Eq for Seed<A> {}

impl<A: Float> SeedQueue<A> {
    pub(crate) fn new() -> Self {
        Self {
            seeds: BTreeSet::new(),
        }
    }

    /// Inserts a point that is not currently queued.
    pub(crate) fn insert(&mut self, point: usize, reachability: A) {
        let inserted = self.seeds.insert(Seed {
            reachability,
            point,
        });
        debug_assert!(inserted, "point {point} is already queued");
    }

    /// Moves a queued point to a smaller key. The queue is ordered by the
    /// key, so every reachability improvement of a queued point must go
    /// through here: remove under the old key, re-insert under the new one.
    pub(crate) fn decrease(&mut self, point: usize, from: A, to: A) {
        let removed = self.seeds.remove(&Seed {
            reachability: from,
            point,
        });
        debug_assert!(removed, "point {point} is not queued under its old key");
        self.seeds.insert(Seed {
            reachability: to,
            point,
        });
    }

    /// Removes and returns the point with the smallest `(reachability, id)`.
    pub(crate) fn pop_min(&mut self) -> Option<usize> {
        self.seeds.pop_first().map(|seed| seed.point)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pops_by_reachability() {
        let mut queue = SeedQueue::new();
        queue.insert(0, 3.0_f64);
        queue.insert(1, 1.0);
        queue.insert(2, 2.0);
        assert_eq!(queue.pop_min(), Some(1));
        assert_eq!(queue.pop_min(), Some(2));
        assert_eq!(queue.pop_min(), Some(0));
        assert_eq!(queue.pop_min(), None);
    }

    #[test]
    fn ties_break_on_point_id() {
        let mut queue = SeedQueue::new();
        queue.insert(7, 1.5_f64);
        queue.insert(3, 1.5);
        queue.insert(5, 1.5);
        assert_eq!(queue.pop_min(), Some(3));
        assert_eq!(queue.pop_min(), Some(5));
        assert_eq!(queue.pop_min(), Some(7));
    }

    #[test]
    fn decrease_reorders() {
        let mut queue = SeedQueue::new();
        queue.insert(0, 2.0_f64);
        queue.insert(1, 4.0);
        queue.decrease(1, 4.0, 1.0);
        assert_eq!(queue.pop_min(), Some(1));
        assert_eq!(queue.pop_min(), Some(0));
    }
}
