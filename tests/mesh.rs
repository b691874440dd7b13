use pretty_assertions::assert_eq;

use rsp2_symmetry::{Settings, Threading, IrMesh, symmetry_operations};
use rsp2_symmetry::{reduce_mesh, reduce_stabilized_mesh, reduce_triplets, reduce_kpoints};
use rsp2_symmetry::array_types::{V3, M33};
use rsp2_symmetry::kpoints::Grid;

mod shared;

// Index of the image of a grid point under a reciprocal-space rotation,
// computed independently of the integer arithmetic used by the reducer.
fn image_index(grid: &Grid, rot: &M33<i32>, g: V3<i32>) -> usize {
    let k = grid.frac(g);
    let image = &rot.map(f64::from) * k;
    let dims = grid.dims();
    let shift = grid.shift();
    let address = V3::from_fn(|i| {
        (image[i] * f64::from(dims[i]) - 0.5 * f64::from(shift[i])).round() as i32
    });
    grid.index(address)
}

fn check_mesh(ir: &IrMesh, rotations: &[M33<i32>], time_reversal: bool) {
    let map = ir.map();
    let grid = ir.grid();
    assert_eq!(map.len(), grid.len());
    for i in 0..map.len() {
        assert_eq!(map[map[i]], map[i]);
    }

    let mut group: Vec<M33<i32>> = rotations.iter().map(|r| r.t()).collect();
    if time_reversal {
        group.extend(rotations.iter().map(|r| -r.t()));
    }
    for rot in &group {
        for (i, &g) in ir.grid_points().iter().enumerate() {
            assert_eq!(map[image_index(grid, rot, g)], map[i]);
        }
    }
}

#[test]
fn mesh_properties() {
    for cell in vec![shared::silicon(), shared::rutile(), shared::hcp(), shared::triclinic()] {
        let rotations = symmetry_operations(&cell, &Settings::default()).unwrap().rotations();
        for &time_reversal in &[true, false] {
            let settings = Settings { time_reversal, ..Settings::default() };
            let ir = reduce_mesh([6, 6, 6], [0, 0, 0], &cell, &settings).unwrap();
            check_mesh(&ir, &rotations, time_reversal);
        }
    }
}

#[test]
fn shifted_mesh_properties() {
    let cell = shared::rutile();
    let rotations = symmetry_operations(&cell, &Settings::default()).unwrap().rotations();
    let ir = reduce_mesh([4, 4, 6], [1, 1, 0], &cell, &Settings::default()).unwrap();
    check_mesh(&ir, &rotations, true);
    let ir = reduce_mesh([4, 4, 6], [0, 0, 1], &cell, &Settings::default()).unwrap();
    check_mesh(&ir, &rotations, true);
}

#[test]
fn gamma_only() {
    for cell in vec![shared::silicon(), shared::rutile(), shared::hcp(), shared::triclinic()] {
        let ir = reduce_mesh([1, 1, 1], [0, 0, 0], &cell, &Settings::default()).unwrap();
        assert_eq!(ir.map(), &[0][..]);
        assert_eq!(ir.grid_points(), &[V3([0, 0, 0])][..]);
        assert_eq!(ir.kpoints(), vec![V3([0.0, 0.0, 0.0])]);
    }
}

#[test]
fn hexagonal_mesh_must_match() {
    let cell = shared::hcp();
    assert!(reduce_mesh([6, 6, 4], [0, 0, 0], &cell, &Settings::default()).is_ok());
    match reduce_mesh([6, 3, 4], [0, 0, 0], &cell, &Settings::default()) {
        Err(rsp2_symmetry::Error::Kpoints(rsp2_symmetry::kpoints::Error::MeshIncompatible(_))) => {},
        r => panic!("{:?}", r),
    }
    match reduce_mesh([6, 6, 0], [0, 0, 0], &cell, &Settings::default()) {
        Err(rsp2_symmetry::Error::Kpoints(rsp2_symmetry::kpoints::Error::InvalidMesh(_))) => {},
        r => panic!("{:?}", r),
    }
}

#[test]
fn stabilized_at_zone_boundary() {
    let cell = shared::rutile();
    let settings = Settings::default();
    let rotations = symmetry_operations(&cell, &settings).unwrap().rotations();

    let full = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], cell.lattice(), &rotations, &[], &settings).unwrap();
    let ir = reduce_mesh([4, 4, 4], [0, 0, 0], &cell, &settings).unwrap();
    assert_eq!(full, ir);

    // Z = (0, 0, 1/2) has the full point group; X = (1/2, 0, 0) only mmm
    let z = V3([0.0, 0.0, 0.5]);
    let x = V3([0.5, 0.0, 0.0]);
    let at_z = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], cell.lattice(), &rotations, &[z], &settings).unwrap();
    let at_x = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], cell.lattice(), &rotations, &[x], &settings).unwrap();
    assert_eq!(at_z, full);
    assert_eq!(at_x.num_irreducible(), 27);

    let both = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], cell.lattice(), &rotations, &[z, x], &settings).unwrap();
    assert_eq!(both, at_x);
}

/// Sum of the weights of each `p1`, in order of first appearance.
fn weights_per_first_point(triplets: &[[usize; 3]], weights: &[usize]) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = vec![];
    for (t, &w) in triplets.iter().zip(weights) {
        match out.last_mut() {
            Some((p1, total)) if *p1 == t[0] => *total += w,
            _ => out.push((t[0], w)),
        }
    }
    out
}

#[test]
fn triplets() {
    let cell = shared::rutile();
    let mesh = [4, 4, 2];
    let n = 32;

    let serial = Settings { threading: Threading::Serial, ..Settings::default() };
    let out = reduce_triplets(mesh, &cell, &serial).unwrap();
    for &[i, j, k] in &out.triplets {
        let sum = out.grid_points[i] + out.grid_points[j] + out.grid_points[k];
        for axis in 0..3 {
            assert_eq!(sum[axis].rem_euclid(mesh[axis]), 0);
        }
    }

    let ir = reduce_mesh(mesh, [0, 0, 0], &cell, &serial).unwrap();
    let per_first = weights_per_first_point(&out.triplets, &out.weights);
    let firsts: Vec<usize> = per_first.iter().map(|&(p1, _)| p1).collect();
    assert_eq!(firsts, ir.irreducible());
    assert!(per_first.iter().all(|&(_, total)| total == n));

    for (t, &star) in out.triplets.iter().zip(&out.star_sizes) {
        let k = ir.irreducible().iter().position(|&p| p == t[0]).unwrap();
        assert_eq!(star, ir.weights()[k]);
    }
    let everything: usize = out.weights.iter().zip(&out.star_sizes).map(|(w, s)| w * s).sum();
    assert_eq!(everything, n * n);

    let rayon = Settings { threading: Threading::Rayon, ..Settings::default() };
    assert_eq!(reduce_triplets(mesh, &cell, &rayon).unwrap(), out);
}

#[test]
fn hexagonal_triplet_weights() {
    let cell = shared::hcp();
    let n = 6 * 6 * 4;
    let out = reduce_triplets([6, 6, 4], &cell, &Settings::default()).unwrap();

    let per_first = weights_per_first_point(&out.triplets, &out.weights);
    assert!(per_first.iter().all(|&(_, total)| total == n));
    assert_eq!(out.weights.iter().sum::<usize>(), per_first.len() * n);

    let everything: usize = out.weights.iter().zip(&out.star_sizes).map(|(w, s)| w * s).sum();
    assert_eq!(everything, n * n);
}

#[test]
fn kpoint_lists() {
    let cell = shared::rutile();
    let kpoints = vec![
        V3([0.1, 0.2, 0.3]),
        V3([0.2, 0.1, 0.3]),
        V3([-0.2, 0.1, -0.3]),
        V3([0.1, 0.2, 0.25]),
        V3([0.9, 0.8, 0.7]),
    ];
    let map = reduce_kpoints(&kpoints, &cell, &Settings::default()).unwrap();
    assert_eq!(map, vec![0, 0, 0, 3, 0]);

    let settings = Settings { time_reversal: false, ..Settings::default() };
    let map = reduce_kpoints(&kpoints, &shared::triclinic(), &settings).unwrap();
    assert_eq!(map, vec![0, 1, 2, 3, 4]);
}
