use num_traits::Float;

use crate::error::{Error, Result};
use crate::optics::ClusterOrdering;

/// Partitions an ordering along the given cluster borders.
///
/// `borders` must be strictly ascending positions into the ordering; each
/// border belongs to the segment on its right. The result holds
/// `borders.len() + 2` buckets of point ids: bucket 0 collects every point
/// whose emission reachability exceeds `outlier_threshold`, buckets `1..`
/// are the contiguous segments in order. Empty buckets stay in place, so the
/// bucket count is a function of the border count alone.
///
/// An `outlier_threshold` of zero or below disables outlier separation.
///
/// # Errors
///
/// Returns [`Error::UnsortedBorders`] or [`Error::BorderOutOfBounds`] when
/// the border list is not strictly ascending or points past the end of the
/// ordering.
pub fn extract_clusters<A: Float>(
    ordering: &ClusterOrdering<A>,
    borders: &[usize],
    outlier_threshold: A,
) -> Result<Vec<Vec<usize>>> {
    let n = ordering.len();
    if borders.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(Error::UnsortedBorders);
    }
    if let Some(&last) = borders.last() {
        if last > n {
            return Err(Error::BorderOutOfBounds {
                border: last,
                len: n,
            });
        }
    }

    let outlier_threshold = if outlier_threshold <= A::zero() {
        A::max_value()
    } else {
        outlier_threshold
    };

    let mut buckets = vec![Vec::new(); borders.len() + 2];
    let mut passed = 0;
    for (pos, (point, reachability)) in ordering.iter().enumerate() {
        while passed < borders.len() && borders[passed] <= pos {
            passed += 1;
        }
        if reachability > outlier_threshold {
            buckets[0].push(point);
        } else {
            buckets[passed + 1].push(point);
        }
    }
    Ok(buckets)
}
