#![allow(dead_code)]

use rsp2_symmetry::{Cell, Lattice};
use rsp2_symmetry::array_types::{V3, M33};

fn cell(lattice: Lattice, sites: &[([f64; 3], i32)]) -> Cell {
    let fracs = sites.iter().map(|&(f, _)| V3(f)).collect();
    let types = sites.iter().map(|&(_, t)| t).collect();
    Cell::new(lattice, fracs, types).unwrap()
}

/// Conventional cell of diamond silicon.
pub fn silicon() -> Cell {
    cell(Lattice::cubic(4.0), &[
        ([0.00, 0.00, 0.00], 14),
        ([0.00, 0.50, 0.50], 14),
        ([0.50, 0.00, 0.50], 14),
        ([0.50, 0.50, 0.00], 14),
        ([0.25, 0.25, 0.25], 14),
        ([0.25, 0.75, 0.75], 14),
        ([0.75, 0.25, 0.75], 14),
        ([0.75, 0.75, 0.25], 14),
    ])
}

pub const RUTILE_X: f64 = 0.3;

/// A rutile-like cell (two metal sites, four ligands).
pub fn rutile() -> Cell {
    let x = RUTILE_X;
    cell(Lattice::orthorhombic(4.0, 4.0, 3.0), &[
        ([0.0, 0.0, 0.0], 22),
        ([0.5, 0.5, 0.5], 22),
        ([x, x, 0.0], 8),
        ([1.0 - x, 1.0 - x, 0.0], 8),
        ([0.5 + x, 0.5 - x, 0.5], 8),
        ([0.5 - x, 0.5 + x, 0.5], 8),
    ])
}

/// Hexagonal close packing.
pub fn hcp() -> Cell {
    let (a, c) = (3.2, 5.2);
    let lattice = Lattice::from(&[
        [a, 0.0, 0.0],
        [-a / 2.0, a * 3f64.sqrt() / 2.0, 0.0],
        [0.0, 0.0, c],
    ]);
    cell(lattice, &[
        ([1.0 / 3.0, 2.0 / 3.0, 0.25], 12),
        ([2.0 / 3.0, 1.0 / 3.0, 0.75], 12),
    ])
}

fn triclinic_lattice() -> Lattice {
    Lattice::from(&[
        [3.0, 0.1, 0.2],
        [0.3, 4.0, 0.4],
        [0.5, 0.6, 5.0],
    ])
}

/// A triclinic cell with no symmetry besides the identity.
pub fn triclinic() -> Cell {
    cell(triclinic_lattice(), &[
        ([0.1, 0.2, 0.3], 1),
        ([0.4, 0.7, 0.9], 2),
    ])
}

/// A single atom in a triclinic lattice.  The lattice itself is
/// centrosymmetric, so this has an inversion center.
pub fn lone_atom() -> Cell {
    cell(triclinic_lattice(), &[([0.1, 0.2, 0.3], 1)])
}

/// Rotate the cartesian frame of a cell, reorder its atoms, and shift its origin.
pub fn disguised(cell: &Cell, angles: [f64; 3], order: &[usize], shift: V3) -> Cell {
    let [a, b, c] = angles;
    let rz = |t: f64| M33::from_array([
        [t.cos(), -t.sin(), 0.0],
        [t.sin(), t.cos(), 0.0],
        [0.0, 0.0, 1.0],
    ]);
    let rx = |t: f64| M33::from_array([
        [1.0, 0.0, 0.0],
        [0.0, t.cos(), -t.sin()],
        [0.0, t.sin(), t.cos()],
    ]);
    let rot = &(&rz(a) * &rx(b)) * &rz(c);
    let lattice = Lattice::new(&(cell.lattice().matrix() * &rot));

    let fracs = order.iter().map(|&i| cell.fracs()[i] + shift).collect();
    let types = order.iter().map(|&i| cell.types()[i]).collect();
    Cell::new(lattice, fracs, types).unwrap()
}
