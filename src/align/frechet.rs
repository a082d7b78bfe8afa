//! Discrete Fréchet Distance
//!
//! Worst-case shape-similarity metric, complementary to DTW's
//! average-case behavior: DTW can under-penalize a short but large local
//! excursion, while Fréchet reports the maximum pointwise mismatch under
//! the best monotonic correspondence.

use crate::model::stroke::Point;

/// Discrete Fréchet distance between two point sequences.
///
/// Iterative dynamic-programming formulation; Euclidean units. Returns
/// exactly 0 for identical sequences.
pub fn frechet_distance(a: &[Point], b: &[Point]) -> crate::Result<f64> {
    if a.is_empty() || b.is_empty() {
        return Err(crate::Error::Validation(
            "cannot compute Fréchet distance of an empty point sequence".to_string(),
        ));
    }

    let n = a.len();
    let m = b.len();
    let mut ca = vec![0.0f64; n * m];

    for i in 0..n {
        for j in 0..m {
            let d = a[i].distance_to(&b[j]);
            ca[i * m + j] = match (i, j) {
                (0, 0) => d,
                (_, 0) => ca[(i - 1) * m].max(d),
                (0, _) => ca[j - 1].max(d),
                _ => {
                    let reach = ca[(i - 1) * m + j]
                        .min(ca[(i - 1) * m + j - 1])
                        .min(ca[i * m + j - 1]);
                    reach.max(d)
                }
            };
        }
    }

    Ok(ca[n * m - 1])
}
