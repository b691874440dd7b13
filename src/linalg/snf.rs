/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

use rsp2_array_types::{V3, M33};

/// Smith Normal Form of a tall integer matrix with three columns.
///
/// `u * a * v == d`, where `u` is `m x m` unimodular, `v` is `3 x 3`
/// unimodular, and `d` is diagonal with nonnegative entries in which each
/// nonzero entry divides the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snf {
    pub u: Vec<Vec<i64>>,
    pub v: M33<i64>,
    /// The leading diagonal of `d`.  All other entries of `d` are zero.
    pub diag: V3<i64>,
}

impl Snf {
    pub fn new(rows: &[V3<i64>]) -> Snf {
        let m = rows.len();
        let mut a: Vec<[i64; 3]> = rows.iter().map(|r| r.0).collect();
        let mut u: Vec<Vec<i64>> = (0..m).map(|r| (0..m).map(|c| (r == c) as i64).collect()).collect();
        let mut v = M33::<i64>::eye();

        // row ops are mirrored onto `u`, column ops onto `v`
        let add_row = |a: &mut Vec<[i64; 3]>, u: &mut Vec<Vec<i64>>, dest: usize, src: usize, k: i64| {
            for c in 0..3 { a[dest][c] += k * a[src][c]; }
            for c in 0..m { u[dest][c] += k * u[src][c]; }
        };
        let add_col = |a: &mut Vec<[i64; 3]>, v: &mut M33<i64>, dest: usize, src: usize, k: i64| {
            for row in a.iter_mut() { row[dest] += k * row[src]; }
            for r in 0..3 { v[r][dest] += k * v[r][src]; }
        };

        for t in 0..m.min(3) {
            loop {
                let pivot = {
                    (t..m).flat_map(|r| (t..3).map(move |c| (r, c)))
                        .filter(|&(r, c)| a[r][c] != 0)
                        .min_by_key(|&(r, c)| a[r][c].abs())
                };
                let (pr, pc) = match pivot {
                    Some(p) => p,
                    None => break,
                };
                a.swap(t, pr);
                u.swap(t, pr);
                for row in a.iter_mut() { row.swap(t, pc); }
                for r in 0..3 { v[r].swap(t, pc); }

                let p = a[t][t];
                let mut clean = true;
                for r in t + 1..m {
                    let q = a[r][t] / p;
                    add_row(&mut a, &mut u, r, t, -q);
                    clean &= a[r][t] == 0;
                }
                for c in t + 1..3 {
                    let q = a[t][c] / p;
                    add_col(&mut a, &mut v, c, t, -q);
                    clean &= a[t][c] == 0;
                }
                if !clean {
                    continue;
                }

                // enforce divisibility by dragging an offending row into row t
                let offending = (t + 1..m).find(|&r| (t + 1..3).any(|c| a[r][c] % p != 0));
                match offending {
                    Some(r) => add_row(&mut a, &mut u, t, r, 1),
                    None => break,
                }
            }

            if a[t][t] < 0 {
                add_row(&mut a, &mut u, t, t, -2);
            }
        }

        let diag = V3::from_fn(|i| if i < m { a[i][i] } else { 0 });
        Snf { u, v, diag }
    }
}

/// Find some `s` satisfying `rows * s == b (mod 1)` within `tol`.
///
/// Each row of `rows` contributes one congruence.  Solutions are only
/// determined modulo the kernel and the torsion of `rows`; this returns one
/// of them, so callers that need more than the congruences should verify.
pub fn solve_congruences(rows: &[V3<i64>], b: &[f64], tol: f64) -> Option<V3<f64>> {
    assert_eq!(rows.len(), b.len());
    let Snf { u, v, diag } = Snf::new(rows);

    let ub: Vec<f64> = {
        u.iter()
            .map(|u_row| u_row.iter().zip(b).map(|(&k, &x)| k as f64 * x).sum())
            .collect()
    };

    let mut y = V3::zero();
    for (i, &val) in ub.iter().enumerate() {
        if i < 3 && diag[i] != 0 {
            y[i] = val / diag[i] as f64;
        } else if (val - val.round()).abs() > tol {
            return None;
        }
    }

    let v = v.map(|x| x as f64);
    Some(&v * y)
}
