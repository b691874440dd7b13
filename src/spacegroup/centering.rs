use std::fmt;

use rsp2_array_types::{V3, M33};

/// The lattice centering of a conventional cell.
///
/// `R` always means the obverse setting on hexagonal axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Centering { P, A, B, C, I, F, R }

impl Centering {
    pub const ALL: [Centering; 7] = [
        Centering::P, Centering::A, Centering::B, Centering::C,
        Centering::I, Centering::F, Centering::R,
    ];

    pub fn from_letter(c: char) -> Option<Centering> {
        Centering::ALL.iter().cloned().find(|x| x.letter() == c)
    }

    pub fn letter(self) -> char {
        match self {
            Centering::P => 'P',
            Centering::A => 'A',
            Centering::B => 'B',
            Centering::C => 'C',
            Centering::I => 'I',
            Centering::F => 'F',
            Centering::R => 'R',
        }
    }

    /// Lattice points of the conventional cell, in twelfths, beginning with zero.
    pub fn translations(self) -> Vec<V3<i32>> {
        let mut out = vec![V3([0, 0, 0])];
        match self {
            Centering::P => {},
            Centering::A => out.push(V3([0, 6, 6])),
            Centering::B => out.push(V3([6, 0, 6])),
            Centering::C => out.push(V3([6, 6, 0])),
            Centering::I => out.push(V3([6, 6, 6])),
            Centering::F => out.extend(vec![V3([0, 6, 6]), V3([6, 0, 6]), V3([6, 6, 0])]),
            Centering::R => out.extend(vec![V3([8, 4, 4]), V3([4, 8, 8])]),
        }
        out
    }

    /// Number of lattice points per conventional cell.
    pub fn num_points(self) -> usize
    { self.translations().len() }
}

impl fmt::Display for Centering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { write!(f, "{}", self.letter()) }
}

/// Identify the centering of a cell whose basis vectors are the columns of `axes`,
/// written in the coordinates of some primitive cell.
///
/// Returns `None` if the primitive lattice points inside the cell are not one
/// of the standard centerings (including the reverse rhombohedral setting).
pub(crate) fn centering_of(axes: &M33<i64>) -> Option<Centering> {
    let det = axes.det();
    if det <= 0 || det > 4 {
        return None;
    }
    // the primitive basis vectors, in units of 1/det of the new cell
    let adj = axes.adjugate();
    let gens: Vec<V3<i64>> = (0..3).map(|k| adj.col(k)).collect();

    let mut points = vec![V3([0i64, 0, 0])];
    let mut i = 0;
    while i < points.len() {
        for g in &gens {
            let p = (points[i] + g).map(|x| x.rem_euclid(det));
            if !points.contains(&p) {
                points.push(p);
            }
        }
        i += 1;
    }
    if points.len() as i64 != det {
        return None;
    }

    let mut points: Vec<V3<i32>> = points.iter().map(|p| p.map(|x| (x * 12 / det) as i32)).collect();
    points.sort();
    Centering::ALL.iter().cloned().find(|c| {
        let mut expected = c.translations();
        expected.sort();
        expected == points
    })
}
