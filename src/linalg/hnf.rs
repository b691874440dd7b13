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

use num_integer::Integer;
use rsp2_array_types::{V3, M33, M3};

use crate::gcd::extended_gcd;

/// Hermite Normal Form of the lattice spanned by a set of integer row vectors.
///
/// The output is upper triangular with positive pivots and with every entry
/// above a pivot reduced into `[0, pivot)`, so that two generating sets of
/// the same lattice produce identical output.
///
/// Returns `None` if the vectors do not span a full-rank lattice.
pub fn row_lattice_basis(generators: &[V3<i64>]) -> Option<M33<i64>> {
    let mut rows: Vec<V3<i64>> = generators.iter().cloned().filter(|v| v != &V3::zero()).collect();
    let mut basis = Vec::with_capacity(3);

    for col in 0..3 {
        // simulate euclid's algorithm across all remaining rows
        let pivot_row = loop {
            let pivot = {
                rows.iter().enumerate()
                    .filter(|(_, r)| r[col] != 0)
                    .min_by_key(|(_, r)| r[col].abs())
                    .map(|(i, _)| i)
            };
            let pivot = pivot?;

            let p = rows[pivot];
            let mut finished = true;
            for (i, row) in rows.iter_mut().enumerate() {
                if i != pivot && row[col] != 0 {
                    let mult = Integer::div_floor(&row[col], &p[col]);
                    *row -= p * mult;
                    finished &= row[col] == 0;
                }
            }
            if finished {
                let mut p = rows.remove(pivot);
                if p[col] < 0 {
                    p = -p;
                }
                break p;
            }
        };
        basis.push(pivot_row);
        rows.retain(|v| v != &V3::zero());
    }

    // canonicalize the entries above each pivot
    for col in 1..3 {
        for above in 0..col {
            let mult = Integer::div_floor(&basis[above][col], &basis[col][col]);
            let pivot = basis[col];
            basis[above] -= pivot * mult;
        }
    }

    debug_assert!(rows.iter().all(|r| r == &V3::zero()));
    Some(M3([basis[0], basis[1], basis[2]]))
}

/// A basis for the integer vectors orthogonal to a nonzero integer row.
///
/// Works by column operations that bring `row` to the form `(g, 0, 0)`;
/// the second and third columns of the accumulated unimodular matrix then
/// span the kernel.
pub fn nullspace_of_row(row: V3<i64>) -> Option<[V3<i64>; 2]> {
    if row == V3::zero() {
        return None;
    }

    // columns of the unimodular transform
    let mut cols = [V3([1, 0, 0]), V3([0, 1, 0]), V3([0, 0, 1])];
    let mut reduced = row;
    for j in 1..3 {
        let (a, b) = (reduced[0], reduced[j]);
        if b == 0 {
            continue;
        }
        let data = extended_gcd(a, b);
        let (x, y) = data.coeffs;
        let g = data.gcd;

        let (c0, cj) = (cols[0], cols[j]);
        cols[0] = c0 * x + cj * y;
        cols[j] = c0 * (-b / g) + cj * (a / g);
        reduced[0] = g;
        reduced[j] = 0;
    }

    debug_assert_eq!(V3::dot(&row, &cols[1]), 0);
    debug_assert_eq!(V3::dot(&row, &cols[2]), 0);
    Some([cols[1], cols[2]])
}

/// Provides access to the canonical basis of a square matrix's row lattice.
pub trait Hnf: Sized {
    /// Convert self into Hermite Normal Form. (row-based, upper triangular)
    ///
    /// Returns `None` for singular matrices.
    fn hnf(&self) -> Option<Self>;
}

impl Hnf for M33<i64> {
    fn hnf(&self) -> Option<Self>
    { row_lattice_basis(&self.0) }
}
