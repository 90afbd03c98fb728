use ndarray::ArrayView1;
use num_traits::Float;

/// Squared Euclidean distance between two points of the same dimensionality.
///
/// The whole engine works on squared distances, with `eps` squared once per
/// neighborhood scan; every comparison is preserved and the hot path never
/// takes a square root.
///
/// # Panics
///
/// Panics if the dimensionalities differ.
#[must_use]
pub fn squared_euclidean<A: Float>(a: ArrayView1<A>, b: ArrayView1<A>) -> A {
    assert_eq!(a.len(), b.len(), "points must have the same dimensionality");
    a.iter().zip(b.iter()).fold(A::zero(), |sum, (&x, &y)| {
        let d = x - y;
        sum + d * d
    })
}
