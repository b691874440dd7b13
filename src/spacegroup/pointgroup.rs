use std::fmt;

use rsp2_array_types::M33;
use rsp2_structure::Holohedry;

/// The 32 crystallographic point groups (crystal classes).
///
/// Variants are named by their Schoenflies symbols, and are declared in the
/// order of the space group numbers that belong to them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointGroup {
    C1, Ci,
    C2, Cs, C2h,
    D2, C2v, D2h,
    C4, S4, C4h, D4, C4v, D2d, D4h,
    C3, C3i, D3, C3v, D3d,
    C6, C3h, C6h, D6, C6v, D3h, D6h,
    T, Th, O, Td, Oh,
}

use self::PointGroup::*;

// (class, international symbol, first space group number, rotation kind counts)
//
// Rotation kinds are counted in the order  -6 -4 -3 m -1 1 2 3 4 6.
// No two classes share the same counts.
const TABLE: [(PointGroup, &str, u16, [u8; 10]); 32] = [
    (C1,  "1",     1,   [0, 0, 0, 0, 0, 1, 0, 0, 0, 0]),
    (Ci,  "-1",    2,   [0, 0, 0, 0, 1, 1, 0, 0, 0, 0]),
    (C2,  "2",     3,   [0, 0, 0, 0, 0, 1, 1, 0, 0, 0]),
    (Cs,  "m",     6,   [0, 0, 0, 1, 0, 1, 0, 0, 0, 0]),
    (C2h, "2/m",   10,  [0, 0, 0, 1, 1, 1, 1, 0, 0, 0]),
    (D2,  "222",   16,  [0, 0, 0, 0, 0, 1, 3, 0, 0, 0]),
    (C2v, "mm2",   25,  [0, 0, 0, 2, 0, 1, 1, 0, 0, 0]),
    (D2h, "mmm",   47,  [0, 0, 0, 3, 1, 1, 3, 0, 0, 0]),
    (C4,  "4",     75,  [0, 0, 0, 0, 0, 1, 1, 0, 2, 0]),
    (S4,  "-4",    81,  [0, 2, 0, 0, 0, 1, 1, 0, 0, 0]),
    (C4h, "4/m",   83,  [0, 2, 0, 1, 1, 1, 1, 0, 2, 0]),
    (D4,  "422",   89,  [0, 0, 0, 0, 0, 1, 5, 0, 2, 0]),
    (C4v, "4mm",   99,  [0, 0, 0, 4, 0, 1, 1, 0, 2, 0]),
    (D2d, "-42m",  111, [0, 2, 0, 2, 0, 1, 3, 0, 0, 0]),
    (D4h, "4/mmm", 123, [0, 2, 0, 5, 1, 1, 5, 0, 2, 0]),
    (C3,  "3",     143, [0, 0, 0, 0, 0, 1, 0, 2, 0, 0]),
    (C3i, "-3",    147, [0, 0, 2, 0, 1, 1, 0, 2, 0, 0]),
    (D3,  "32",    149, [0, 0, 0, 0, 0, 1, 3, 2, 0, 0]),
    (C3v, "3m",    156, [0, 0, 0, 3, 0, 1, 0, 2, 0, 0]),
    (D3d, "-3m",   162, [0, 0, 2, 3, 1, 1, 3, 2, 0, 0]),
    (C6,  "6",     168, [0, 0, 0, 0, 0, 1, 1, 2, 0, 2]),
    (C3h, "-6",    174, [2, 0, 0, 1, 0, 1, 0, 2, 0, 0]),
    (C6h, "6/m",   175, [2, 0, 2, 1, 1, 1, 1, 2, 0, 2]),
    (D6,  "622",   177, [0, 0, 0, 0, 0, 1, 7, 2, 0, 2]),
    (C6v, "6mm",   183, [0, 0, 0, 6, 0, 1, 1, 2, 0, 2]),
    (D3h, "-6m2",  187, [2, 0, 0, 4, 0, 1, 3, 2, 0, 0]),
    (D6h, "6/mmm", 191, [2, 0, 2, 7, 1, 1, 7, 2, 0, 2]),
    (T,   "23",    195, [0, 0, 0, 0, 0, 1, 3, 8, 0, 0]),
    (Th,  "m-3",   200, [0, 0, 8, 3, 1, 1, 3, 8, 0, 0]),
    (O,   "432",   207, [0, 0, 0, 0, 0, 1, 9, 8, 6, 0]),
    (Td,  "-43m",  215, [0, 6, 0, 6, 0, 1, 3, 8, 0, 0]),
    (Oh,  "m-3m",  221, [0, 6, 8, 9, 1, 1, 9, 8, 6, 0]),
];

/// Index into the rotation kind counts of `TABLE`.
fn rotation_kind(rot: &M33<i32>) -> Option<usize> {
    Some(match (rot.det(), rot.trace()) {
        (-1, -2) => 0, // -6
        (-1, -1) => 1, // -4
        (-1, 0) => 2,  // -3
        (-1, 1) => 3,  // m
        (-1, -3) => 4, // -1
        (1, 3) => 5,   // 1
        (1, -1) => 6,  // 2
        (1, 0) => 7,   // 3
        (1, 1) => 8,   // 4
        (1, 2) => 9,   // 6
        _ => return None,
    })
}

impl PointGroup {
    fn index(self) -> usize
    { TABLE.iter().position(|row| row.0 == self).expect("every class is in the table") }

    /// All 32 classes, in order.
    pub fn all() -> impl Iterator<Item=PointGroup>
    { TABLE.iter().map(|row| row.0) }

    /// Identify the class of a set of distinct rotations.
    ///
    /// Returns `None` if the rotations are not a crystallographic point group.
    pub fn from_rotations(rots: &[M33<i32>]) -> Option<PointGroup> {
        let mut counts = [0u8; 10];
        for rot in rots {
            let count = &mut counts[rotation_kind(rot)?];
            *count = count.checked_add(1)?;
        }
        TABLE.iter().find(|row| row.3 == counts).map(|row| row.0)
    }

    /// The class that space group `number` belongs to.
    pub fn from_number(number: u16) -> Option<PointGroup> {
        if !(1..=230).contains(&number) {
            return None;
        }
        TABLE.iter().rev().find(|row| row.2 <= number).map(|row| row.0)
    }

    /// Space group numbers belonging to this class.
    pub fn numbers(self) -> std::ops::RangeInclusive<u16> {
        let i = self.index();
        let first = TABLE[i].2;
        let last = TABLE.get(i + 1).map_or(230, |row| row.2 - 1);
        first..=last
    }

    pub fn order(self) -> usize
    { TABLE[self.index()].3.iter().map(|&x| x as usize).sum() }

    /// Hermann-Mauguin symbol.
    pub fn international(self) -> &'static str
    { TABLE[self.index()].1 }

    pub fn schoenflies(self) -> &'static str {
        match self {
            C1 => "C1", Ci => "Ci", C2 => "C2", Cs => "Cs", C2h => "C2h",
            D2 => "D2", C2v => "C2v", D2h => "D2h",
            C4 => "C4", S4 => "S4", C4h => "C4h", D4 => "D4", C4v => "C4v", D2d => "D2d", D4h => "D4h",
            C3 => "C3", C3i => "C3i", D3 => "D3", C3v => "C3v", D3d => "D3d",
            C6 => "C6", C3h => "C3h", C6h => "C6h", D6 => "D6", C6v => "C6v", D3h => "D3h", D6h => "D6h",
            T => "T", Th => "Th", O => "O", Td => "Td", Oh => "Oh",
        }
    }

    pub fn is_centrosymmetric(self) -> bool
    { TABLE[self.index()].3[4] == 1 }

    /// The lattice system of the crystal system this class belongs to.
    pub fn holohedry(self) -> Holohedry {
        match self {
            C1 | Ci => Holohedry::Triclinic,
            C2 | Cs | C2h => Holohedry::Monoclinic,
            D2 | C2v | D2h => Holohedry::Orthorhombic,
            C4 | S4 | C4h | D4 | C4v | D2d | D4h => Holohedry::Tetragonal,
            C3 | C3i | D3 | C3v | D3d => Holohedry::Trigonal,
            C6 | C3h | C6h | D6 | C6v | D3h | D6h => Holohedry::Hexagonal,
            T | Th | O | Td | Oh => Holohedry::Cubic,
        }
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { write!(f, "{} ({})", self.international(), self.schoenflies()) }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn table_is_consistent() {
        let mut next = 1;
        for pg in PointGroup::all() {
            assert_eq!(*pg.numbers().start(), next);
            next = pg.numbers().end() + 1;
            assert_eq!(PointGroup::from_number(*pg.numbers().start()), Some(pg));
            assert_eq!(PointGroup::from_number(*pg.numbers().end()), Some(pg));
            assert!([1, 2, 3, 4, 6, 8, 12, 16, 24, 48].contains(&pg.order()), "{:?}", pg);
        }
        assert_eq!(next, 231);
        assert_eq!(PointGroup::from_number(0), None);
        assert_eq!(PointGroup::from_number(231), None);
        assert_eq!(PointGroup::Oh.order(), 48);
        assert_eq!(PointGroup::D3h.order(), 12);
        assert_eq!(PointGroup::from_number(136), Some(PointGroup::D4h));
    }

    #[test]
    fn identify_from_rotations() {
        let eye = M33::eye();
        let inv = M33::eye() * -1;
        let two_z = M33::from_array([[-1, 0, 0], [0, -1, 0], [0, 0, 1]]);
        let m_z = two_z * -1;

        assert_eq!(PointGroup::from_rotations(&[eye]), Some(C1));
        assert_eq!(PointGroup::from_rotations(&[eye, inv]), Some(Ci));
        assert_eq!(PointGroup::from_rotations(&[eye, two_z]), Some(C2));
        assert_eq!(PointGroup::from_rotations(&[eye, m_z]), Some(Cs));
        assert_eq!(PointGroup::from_rotations(&[eye, two_z, inv, m_z]), Some(C2h));
        // not a group
        assert_eq!(PointGroup::from_rotations(&[eye, inv, two_z]), None);
    }
}
