//! End-to-end scenarios: L1 reference level, then surface radii.

use roche_core::{BinaryParameters, ConvergenceConfig};
use roche_solver::{
    BatchRadiusSolver, Direction, Execution, RadiusResult, RocheField, SaddlePointSolver, radii,
    radius, saddle,
};

#[test]
fn filled_lobe_surface_stays_inside_l1() {
    let params = BinaryParameters::synchronous(56.0).unwrap();
    let field = RocheField::from(params);
    let cfg = ConvergenceConfig::default();

    let l1 = SaddlePointSolver::new(field, cfg).unwrap().solve(0.5).unwrap();
    assert!(l1.x > 0.0 && l1.x < 0.5);

    // Slightly deeper than L1: a detached star whose surface never reaches L1
    let psi0 = 1.05 * l1.psi;
    let dirs: Vec<Direction> = (0..=36)
        .map(|i| {
            let t = (i as f64 * 5.0).to_radians();
            Direction::new(t.cos(), t.sin(), 0.0).unwrap()
        })
        .collect();
    let results = BatchRadiusSolver::new(field, cfg)
        .unwrap()
        .solve(&dirs, psi0, 0.05)
        .unwrap();

    for r in &results {
        let r = r.radius().expect("every lane converges below the L1 level");
        assert!(r > 0.0 && r < l1.x);
    }
    // Tidal distortion: the point facing the companion is the farthest
    let toward = results[0].radius().unwrap();
    assert!(results.iter().all(|r| r.radius().unwrap() <= toward));
}

#[test]
fn free_functions_agree_with_solver_types() {
    let cfg = ConvergenceConfig::default();
    let x = saddle(0.5, 56.0, 28.5, &cfg).unwrap();
    assert!((x - 0.169_430_451_144_580_97).abs() < 1e-12);

    let d = Direction::new(0.0, 0.6, 0.8).unwrap();
    let one = radius(&d, 100.0, 0.14, 56.0, 1.0, &cfg).unwrap();
    let many = radii(&[d, d], 100.0, 0.14, 56.0, 1.0, &cfg).unwrap();
    assert_eq!(many, vec![one, one]);
    assert!((one - 0.022_722_545_439_111_813).abs() < 1e-12);
}

#[test]
fn tight_budget_fails_every_lane_without_aborting() {
    let cfg = ConvergenceConfig::default().with_max_iterations(1);
    let dirs = [
        Direction::new(1.0, 0.0, 0.0).unwrap(),
        Direction::new(0.0, 1.0, 0.0).unwrap(),
    ];
    let out = BatchRadiusSolver::new(RocheField::new(56.0, 28.5).unwrap(), cfg)
        .unwrap()
        .with_execution(Execution::ParallelWith(2))
        .solve(&dirs, 5454.0, 0.14)
        .unwrap();
    assert_eq!(out, vec![RadiusResult::NotConverged; 2]);
}
