//! Parsing of Hall symbols.
//!
//! Only the subset of the notation needed for the standard settings is
//! supported: a lattice symbol with optional inversion, up to four matrix
//! symbols with axis and translation symbols, and a trailing origin shift
//! written in twelfths, e.g. `P 31 2c (0 0 1)`.

use rsp2_array_types::{V3, M33};
use rsp2_structure::{FracOp, FracTrans, generate_finite_group};

use crate::{Centering, Error};

/// A parsed Hall symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HallSymbol {
    symbol: String,
    centering: Centering,
    generators: Vec<FracOp>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Axis { X, Y, Z, Diagonal, Prime, DoublePrime }

impl HallSymbol {
    pub fn parse(symbol: &str) -> Result<HallSymbol, Error> {
        let bad = |msg: &str| Error::BadHallSymbol(format!("{}: {:?}", msg, symbol));

        let (body, shift) = match symbol.find('(') {
            None => (symbol, V3([0, 0, 0])),
            Some(i) => (&symbol[..i], parse_shift(&symbol[i..]).ok_or_else(|| bad("bad origin shift"))?),
        };

        let mut tokens = body.split_whitespace();
        let lattice = tokens.next().ok_or_else(|| bad("empty"))?;
        let (centrosymmetric, letter) = match lattice.chars().collect::<Vec<_>>()[..] {
            ['-', c] => (true, c),
            [c] => (false, c),
            _ => return Err(bad("bad lattice symbol")),
        };
        let centering = Centering::from_letter(letter).ok_or_else(|| bad("bad lattice symbol"))?;

        let mut generators = vec![];
        if centrosymmetric {
            generators.push(FracOp::new(&(M33::eye() * -1), &FracTrans::eye()));
        }

        let mut previous: Option<(u32, Axis)> = None;
        for (index, token) in tokens.enumerate() {
            let matrix = parse_matrix(token).ok_or_else(|| bad("bad matrix symbol"))?;
            let axis = match matrix.axis {
                Some(axis) => axis,
                None => default_axis(index, matrix.order, previous).ok_or_else(|| bad("ambiguous axis"))?,
            };
            let prev_axis = previous.map_or(Axis::Z, |(_, axis)| axis);
            let op = matrix.to_op(axis, prev_axis).ok_or_else(|| bad("unsupported axis"))?;
            generators.push(op);
            previous = Some((matrix.order, axis));
        }
        if previous.is_none() {
            return Err(bad("no matrix symbols"));
        }

        // move the origin:  w' = w + (I - W) v
        let generators = generators.into_iter().map(|op| {
            let rot = *op.rot();
            let correction = &(M33::eye() - rot) * &shift;
            FracOp::new(&rot, &FracTrans::from_twelfths(op.trans().twelfths() + correction))
        }).collect();

        Ok(HallSymbol { symbol: symbol.to_string(), centering, generators })
    }

    pub fn symbol(&self) -> &str { &self.symbol }
    pub fn centering(&self) -> Centering { self.centering }

    /// Generators, not including centering translations.
    pub fn generators(&self) -> &[FracOp] { &self.generators }

    /// Every operation of the group in the conventional cell, including centering translations.
    pub fn group(&self) -> Vec<FracOp> {
        let mut generators = vec![FracOp::eye()];
        generators.extend(self.generators.iter().cloned());
        generators.extend(self.centering.translations().into_iter().map(|t| {
            FracOp::new(&M33::eye(), &FracTrans::from_twelfths(t))
        }));
        let mut group = generate_finite_group(&generators, |a, b| a.of(b));
        group.sort();
        group
    }
}

struct MatrixSymbol {
    improper: bool,
    order: u32,
    screw: u32,
    axis: Option<Axis>,
    trans: V3<i32>,
}

fn parse_matrix(token: &str) -> Option<MatrixSymbol> {
    let mut chars = token.chars().peekable();
    let improper = chars.peek() == Some(&'-');
    if improper {
        chars.next();
    }
    let order = chars.next()?.to_digit(10)?;
    if ![1, 2, 3, 4, 6].contains(&order) {
        return None;
    }

    let mut symbol = MatrixSymbol { improper, order, screw: 0, axis: None, trans: V3([0, 0, 0]) };
    for c in chars {
        match c {
            '1'..='5' => symbol.screw = c.to_digit(10)?,
            'x' => symbol.axis = Some(Axis::X),
            'y' => symbol.axis = Some(Axis::Y),
            'z' => symbol.axis = Some(Axis::Z),
            '*' => symbol.axis = Some(Axis::Diagonal),
            '\'' => symbol.axis = Some(Axis::Prime),
            '"' => symbol.axis = Some(Axis::DoublePrime),
            'a' => symbol.trans += V3([6, 0, 0]),
            'b' => symbol.trans += V3([0, 6, 0]),
            'c' => symbol.trans += V3([0, 0, 6]),
            'n' => symbol.trans += V3([6, 6, 6]),
            'u' => symbol.trans += V3([3, 0, 0]),
            'v' => symbol.trans += V3([0, 3, 0]),
            'w' => symbol.trans += V3([0, 0, 3]),
            'd' => symbol.trans += V3([3, 3, 3]),
            _ => return None,
        }
    }
    if symbol.screw >= symbol.order && symbol.screw != 0 {
        return None;
    }
    Some(symbol)
}

fn default_axis(index: usize, order: u32, previous: Option<(u32, Axis)>) -> Option<Axis> {
    match (index, order, previous) {
        (_, 1, _) => Some(Axis::Z), // irrelevant
        (0, _, _) => Some(Axis::Z),
        (1, 2, Some((2, _))) | (1, 2, Some((4, _))) => Some(Axis::X),
        (1, 2, Some((3, _))) | (1, 2, Some((6, _))) => Some(Axis::Prime),
        (2, 3, _) => Some(Axis::Diagonal),
        _ => None,
    }
}

impl MatrixSymbol {
    fn to_op(&self, axis: Axis, prev_axis: Axis) -> Option<FracOp> {
        let rot = rotation(self.order, axis, prev_axis)?;
        let rot = if self.improper { rot * -1 } else { rot };

        let mut trans = self.trans;
        if self.screw != 0 {
            let direction = match axis {
                Axis::X => V3([1, 0, 0]),
                Axis::Y => V3([0, 1, 0]),
                Axis::Z => V3([0, 0, 1]),
                _ => return None,
            };
            trans += direction * (12 * self.screw / self.order) as i32;
        }
        Some(FracOp::new(&rot, &FracTrans::from_twelfths(trans)))
    }
}

// Proper rotations acting on fractional column vectors.
fn rotation(order: u32, axis: Axis, prev_axis: Axis) -> Option<M33<i32>> {
    let m = M33::from_array;
    Some(match (order, axis, prev_axis) {
        (1, _, _) => M33::eye(),

        (2, Axis::X, _) => m([[1, 0, 0], [0, -1, 0], [0, 0, -1]]),
        (3, Axis::X, _) => m([[1, 0, 0], [0, 0, -1], [0, 1, -1]]),
        (4, Axis::X, _) => m([[1, 0, 0], [0, 0, -1], [0, 1, 0]]),
        (6, Axis::X, _) => m([[1, 0, 0], [0, 1, -1], [0, 1, 0]]),

        (2, Axis::Y, _) => m([[-1, 0, 0], [0, 1, 0], [0, 0, -1]]),
        (3, Axis::Y, _) => m([[-1, 0, 1], [0, 1, 0], [-1, 0, 0]]),
        (4, Axis::Y, _) => m([[0, 0, 1], [0, 1, 0], [-1, 0, 0]]),
        (6, Axis::Y, _) => m([[0, 0, 1], [0, 1, 0], [-1, 0, 1]]),

        (2, Axis::Z, _) => m([[-1, 0, 0], [0, -1, 0], [0, 0, 1]]),
        (3, Axis::Z, _) => m([[0, -1, 0], [1, -1, 0], [0, 0, 1]]),
        (4, Axis::Z, _) => m([[0, -1, 0], [1, 0, 0], [0, 0, 1]]),
        (6, Axis::Z, _) => m([[1, -1, 0], [1, 0, 0], [0, 0, 1]]),

        (3, Axis::Diagonal, _) => m([[0, 0, 1], [1, 0, 0], [0, 1, 0]]),

        // twofold axes perpendicular to the previous axis
        (2, Axis::Prime, Axis::Z) => m([[0, -1, 0], [-1, 0, 0], [0, 0, -1]]),
        (2, Axis::DoublePrime, Axis::Z) => m([[0, 1, 0], [1, 0, 0], [0, 0, -1]]),
        (2, Axis::Prime, Axis::X) => m([[-1, 0, 0], [0, 0, -1], [0, -1, 0]]),
        (2, Axis::DoublePrime, Axis::X) => m([[-1, 0, 0], [0, 0, 1], [0, 1, 0]]),
        (2, Axis::Prime, Axis::Y) => m([[0, 0, -1], [0, -1, 0], [-1, 0, 0]]),
        (2, Axis::DoublePrime, Axis::Y) => m([[0, 0, 1], [0, -1, 0], [1, 0, 0]]),
        _ => return None,
    })
}

// "(x y z)" in twelfths
fn parse_shift(s: &str) -> Option<V3<i32>> {
    let inner = s.trim().strip_prefix('(')?.strip_suffix(')')?;
    let parts = inner.split_whitespace().map(|x| x.parse().ok()).collect::<Option<Vec<i32>>>()?;
    match parts[..] {
        [x, y, z] => Some(V3([x, y, z])),
        _ => None,
    }
}
