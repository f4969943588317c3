use nalgebra::DMatrix;

/// Optimal assignment of rows to columns together with the dual-reduced costs.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// `row_to_col[i]` is the column assigned to row `i`.
    pub row_to_col: Vec<usize>,
    /// `cost[i][j] - u[i] - v[j]` for optimal potentials `u`, `v`. Non-negative,
    /// and zero on every edge of every minimum-cost assignment.
    pub reduced: DMatrix<f64>,
    pub total: f64,
}

/// Minimum-cost assignment by the Kuhn-Munkres algorithm with potentials.
///
/// Rows must not outnumber columns. Returns `None` for a matrix that violates
/// this or holds non-finite costs.
pub fn linear_sum_assignment(cost: &DMatrix<f64>) -> Option<Assignment> {
    let (n, m) = cost.shape();
    if n > m || cost.iter().any(|c| !c.is_finite()) {
        return None;
    }

    // 1-based: row/column 0 is the virtual start.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = cost[(i0 - 1, j - 1)] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut row_to_col = vec![0usize; n];
    for j in 1..=m {
        if p[j] != 0 {
            row_to_col[p[j] - 1] = j - 1;
        }
    }
    let reduced = DMatrix::from_fn(n, m, |i, j| {
        (cost[(i, j)] - u[i + 1] - v[j + 1]).max(0.0)
    });
    let total = row_to_col
        .iter()
        .enumerate()
        .map(|(i, &j)| cost[(i, j)])
        .sum();

    Some(Assignment {
        row_to_col,
        reduced,
        total,
    })
}
