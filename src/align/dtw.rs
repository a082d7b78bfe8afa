//! Dynamic Time Warping
//!
//! Classic O(n·m) dynamic-programming alignment between two point
//! sequences of possibly different lengths, using squared Euclidean
//! local cost. Produces the optimal monotonic warping path, a
//! length-normalized distance, and the per-step cost profile used
//! downstream to localize where a stroke diverges from its reference.

use crate::model::stroke::Point;

/// Options for the DTW local cost
#[derive(Debug, Clone, Copy, Default)]
pub struct DtwOptions {
    /// Scale the local cost by (1 + |Δpressure|) so pressure mismatch
    /// amplifies spatial divergence. Off by default.
    pub pressure_weighted: bool,
}

/// Third of the warping path, used to phrase shape feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRegion {
    Start,
    Middle,
    End,
}

impl PathRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathRegion::Start => "start",
            PathRegion::Middle => "middle",
            PathRegion::End => "end",
        }
    }
}

/// Result of aligning two point sequences
#[derive(Debug, Clone)]
pub struct DtwAlignment {
    /// Optimal warping path as (user index, reference index) pairs,
    /// from (0, 0) to (n-1, m-1). Every step is one of (i+1, j),
    /// (i, j+1), (i+1, j+1).
    pub path: Vec<(usize, usize)>,
    /// Total accumulated cost along the optimal path
    pub total_cost: f64,
    /// Total cost divided by path length, comparable across strokes of
    /// different sampled lengths. Squared-distance units.
    pub distance: f64,
    /// Local cost at each path step, in path order
    pub profile: Vec<f64>,
}

impl DtwAlignment {
    /// The path third with the highest mean local cost.
    ///
    /// This is the reduction of the deviation profile used for feedback
    /// phrasing: the earliest third wins ties, so output stays
    /// deterministic.
    pub fn worst_region(&self) -> PathRegion {
        let len = self.profile.len();
        if len < 3 {
            return PathRegion::Middle;
        }
        let third = len / 3;
        let regions = [
            (PathRegion::Start, &self.profile[..third]),
            (PathRegion::Middle, &self.profile[third..len - third]),
            (PathRegion::End, &self.profile[len - third..]),
        ];

        let mut worst = PathRegion::Middle;
        let mut worst_mean = f64::NEG_INFINITY;
        for (region, slice) in regions {
            let mean = slice.iter().sum::<f64>() / slice.len() as f64;
            if mean > worst_mean {
                worst_mean = mean;
                worst = region;
            }
        }
        worst
    }
}

/// Align two sequences with default options
pub fn dtw(a: &[Point], b: &[Point]) -> crate::Result<DtwAlignment> {
    dtw_with_options(a, b, DtwOptions::default())
}

/// Align two sequences.
///
/// Backtracking prefers the diagonal predecessor on cost ties, then the
/// user-side step, so the optimal path is unique and deterministic.
pub fn dtw_with_options(
    a: &[Point],
    b: &[Point],
    options: DtwOptions,
) -> crate::Result<DtwAlignment> {
    if a.is_empty() || b.is_empty() {
        return Err(crate::Error::Validation(
            "cannot align an empty point sequence".to_string(),
        ));
    }

    let n = a.len();
    let m = b.len();
    let local = |i: usize, j: usize| -> f64 {
        let dx = a[i].x - b[j].x;
        let dy = a[i].y - b[j].y;
        let mut cost = dx * dx + dy * dy;
        if options.pressure_weighted {
            cost *= 1.0 + (a[i].pressure - b[j].pressure).abs();
        }
        cost
    };

    // (n+1) x (m+1) accumulated-cost matrix, row-major
    let width = m + 1;
    let mut cost = vec![f64::INFINITY; (n + 1) * width];
    cost[0] = 0.0;

    for i in 1..=n {
        for j in 1..=m {
            let d = local(i - 1, j - 1);
            let best = cost[(i - 1) * width + j - 1]
                .min(cost[(i - 1) * width + j])
                .min(cost[i * width + j - 1]);
            cost[i * width + j] = d + best;
        }
    }

    // Backtrack from (n, m) to (1, 1)
    let mut i = n;
    let mut j = m;
    let mut path = vec![(i - 1, j - 1)];
    while i > 1 || j > 1 {
        if i == 1 {
            j -= 1;
        } else if j == 1 {
            i -= 1;
        } else {
            let diag = cost[(i - 1) * width + j - 1];
            let up = cost[(i - 1) * width + j];
            let left = cost[i * width + j - 1];
            if diag <= up && diag <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        path.push((i - 1, j - 1));
    }
    path.reverse();

    let profile: Vec<f64> = path.iter().map(|&(pi, pj)| local(pi, pj)).collect();
    let total_cost = cost[n * width + m];
    let distance = total_cost / path.len() as f64;

    Ok(DtwAlignment {
        path,
        total_cost,
        distance,
        profile,
    })
}
