use allocspec_config::SolverLimits;

use super::propagate::{ceil_div, floor_div, normalize, propagate, Domain, Row, Wipeout};
use super::search::branch;
use super::BoundedSolver;
use crate::backend::{
    BackendOutcome, Comparison, IntVar, LinearSum, Predicate, SolverBackend, TrackingLiteral,
};

fn term(var: IntVar) -> LinearSum {
    LinearSum {
        terms: vec![(var, 1)],
        constant: 0,
    }
}

fn assert_pred(solver: &mut BoundedSolver, id: &str, lhs: LinearSum, cmp: Comparison, rhs: LinearSum) {
    solver.assert_tracked(Predicate::new(lhs, cmp, rhs), TrackingLiteral::new(id));
}

fn small_domain() -> SolverLimits {
    SolverLimits {
        domain_min: 0,
        domain_max: 20,
        ..SolverLimits::default()
    }
}

fn core_names(outcome: BackendOutcome) -> Vec<String> {
    match outcome {
        BackendOutcome::Unsat(core) => core.iter().map(|l| l.name().to_string()).collect(),
        other => panic!("expected unsat, got {other:?}"),
    }
}

fn unknown_reason(outcome: BackendOutcome) -> String {
    match outcome {
        BackendOutcome::Unknown(reason) => reason,
        other => panic!("expected unknown, got {other:?}"),
    }
}

fn bounds(domains: &[Domain]) -> Vec<(i128, i128)> {
    domains.iter().map(|d| (d.lo, d.hi)).collect()
}

#[test]
fn test_division_rounding() {
    assert_eq!(floor_div(7, 2), 3);
    assert_eq!(floor_div(-7, 2), -4);
    assert_eq!(floor_div(7, -2), -4);
    assert_eq!(floor_div(-6, 3), -2);
    assert_eq!(ceil_div(7, 2), 4);
    assert_eq!(ceil_div(-7, 2), -3);
    assert_eq!(ceil_div(5, -2), -2);
}

#[test]
fn test_normalize_strict_and_equality() {
    let x = IntVar::new(0);
    let gt = Predicate::new(term(x), Comparison::Gt, LinearSum::constant(4));
    // x > 4  ->  -x + 5 <= 0
    assert_eq!(
        normalize(&gt),
        vec![Row {
            terms: vec![(0, -1)],
            constant: 5
        }]
    );

    let eq = Predicate::new(term(x), Comparison::Eq, LinearSum::constant(3));
    assert_eq!(normalize(&eq).len(), 2);
}

#[test]
fn test_normalize_cancels_shared_variables() {
    let x = IntVar::new(0);
    let pred = Predicate::new(
        LinearSum {
            terms: vec![(x, 2)],
            constant: 1,
        },
        Comparison::Le,
        LinearSum {
            terms: vec![(x, 2)],
            constant: 0,
        },
    );
    let rows = normalize(&pred);
    assert!(rows[0].terms.is_empty());
    assert_eq!(rows[0].constant, 1);
}

#[test]
fn test_propagate_tightens_bounds() {
    // x + y <= 5, x >= 3
    let rows = vec![
        Row {
            terms: vec![(0, 1), (1, 1)],
            constant: -5,
        },
        Row {
            terms: vec![(0, -1)],
            constant: 3,
        },
    ];
    let mut domains = vec![Domain::boxed(0, 10); 2];
    propagate(&rows, &mut domains, 16).unwrap();
    assert_eq!(bounds(&domains), vec![(3, 5), (0, 2)]);
    // x >= 3 comes from its own row; y <= 2 from x's derived lower bound.
    assert!(!domains[0].lo_boxed);
    assert!(!domains[1].hi_boxed);
    // x <= 5 leans on y >= 0 from the box.
    assert!(domains[0].hi_boxed);
}

#[test]
fn test_propagate_detects_wipeout() {
    let rows = vec![
        Row {
            terms: vec![(0, -1)],
            constant: 10,
        },
        Row {
            terms: vec![(0, 1)],
            constant: -2,
        },
    ];
    let mut domains = vec![Domain::boxed(0, 100)];
    assert_eq!(
        propagate(&rows, &mut domains, 16),
        Err(Wipeout { boxed: false })
    );
}

#[test]
fn test_propagate_marks_wipeout_against_the_box() {
    // x >= 150 with x in [0, 100]
    let rows = vec![Row {
        terms: vec![(0, -1)],
        constant: 150,
    }];
    let mut domains = vec![Domain::boxed(0, 100)];
    assert_eq!(
        propagate(&rows, &mut domains, 16),
        Err(Wipeout { boxed: true })
    );
}

#[test]
fn test_branch_prefers_values_near_zero() {
    assert_eq!(
        bounds(&branch(Domain::decided(-4, 6))),
        vec![(0, 0), (1, 3), (4, 6), (-2, -1), (-4, -3)]
    );
    assert_eq!(bounds(&branch(Domain::decided(3, 4))), vec![(3, 3), (4, 4)]);
    assert_eq!(
        bounds(&branch(Domain::decided(-5, -2))),
        vec![(-2, -2), (-3, -3), (-5, -4)]
    );
}

#[test]
fn test_branch_keeps_box_ends_on_outer_pieces() {
    let ends = |children: Vec<Domain>| -> Vec<(bool, bool)> {
        children.iter().map(|d| (d.lo_boxed, d.hi_boxed)).collect()
    };
    assert_eq!(
        ends(branch(Domain::boxed(-4, 6))),
        vec![(false, false), (false, false), (false, true), (false, false), (true, false)]
    );
    // The point child sits on the lower end and keeps its provenance.
    assert_eq!(
        ends(branch(Domain::boxed(0, 5))),
        vec![(true, false), (false, false), (false, true)]
    );
    assert_eq!(
        ends(branch(Domain::boxed(3, 4))),
        vec![(true, false), (false, true)]
    );
}

#[test]
fn test_empty_model_is_sat() {
    let mut solver = BoundedSolver::default();
    assert_eq!(solver.check(), BackendOutcome::Sat(Default::default()));
}

#[test]
fn test_allocation_scenario_solution() {
    let mut solver = BoundedSolver::default();
    let food_a = solver.declare_int_var("food[A]");
    let food_b = solver.declare_int_var("food[B]");
    let food_c = solver.declare_int_var("food[C]");
    let water_a = solver.declare_int_var("water[A]");
    let water_b = solver.declare_int_var("water[B]");
    let water_c = solver.declare_int_var("water[C]");

    assert_pred(&mut solver, "C0001", term(food_a), Comparison::Eq, LinearSum::constant(3));
    assert_pred(&mut solver, "C0002", term(water_a), Comparison::Ge, LinearSum::constant(4));
    assert_pred(&mut solver, "C0003", term(food_b), Comparison::Gt, term(food_a));
    assert_pred(&mut solver, "C0004", term(water_b), Comparison::Eq, LinearSum::constant(5));
    assert_pred(&mut solver, "C0005", term(food_c), Comparison::Gt, term(food_a));
    assert_pred(
        &mut solver,
        "C0006",
        term(water_c),
        Comparison::Gt,
        LinearSum {
            terms: vec![(water_a, 1), (water_b, 1)],
            constant: 0,
        },
    );

    let model = match solver.check() {
        BackendOutcome::Sat(model) => model,
        other => panic!("expected sat, got {other:?}"),
    };
    assert_eq!(model.value(food_a), Some(3));
    assert_eq!(model.value(water_a), Some(4));
    assert_eq!(model.value(food_b), Some(4));
    assert_eq!(model.value(water_b), Some(5));
    assert_eq!(model.value(food_c), Some(4));
    assert_eq!(model.value(water_c), Some(10));
}

#[test]
fn test_weighted_equality_solution_satisfies_predicate() {
    let mut solver = BoundedSolver::new(small_domain());
    let x = solver.declare_int_var("x");
    let y = solver.declare_int_var("y");
    let pred = Predicate::new(
        LinearSum {
            terms: vec![(x, 2), (y, 3)],
            constant: 0,
        },
        Comparison::Eq,
        LinearSum::constant(12),
    );
    solver.assert_tracked(pred.clone(), TrackingLiteral::new("C0001"));

    match solver.check() {
        BackendOutcome::Sat(model) => assert_eq!(pred.evaluate(model.values()), Some(true)),
        other => panic!("expected sat, got {other:?}"),
    }
}

#[test]
fn test_conflicting_bounds_give_minimal_core() {
    let mut solver = BoundedSolver::default();
    let food = solver.declare_int_var("food[A]");
    let water = solver.declare_int_var("water[A]");
    assert_pred(&mut solver, "C0001", term(food), Comparison::Eq, LinearSum::constant(3));
    assert_pred(&mut solver, "C0002", term(water), Comparison::Ge, LinearSum::constant(4));
    assert_pred(&mut solver, "C0007", term(water), Comparison::Ge, LinearSum::constant(10));
    assert_pred(&mut solver, "C0008", term(water), Comparison::Le, LinearSum::constant(2));

    assert_eq!(core_names(solver.check()), vec!["C0007", "C0008"]);
}

#[test]
fn test_unminimized_core_lists_every_assertion() {
    let limits = SolverLimits {
        minimize_core: false,
        ..SolverLimits::default()
    };
    let mut solver = BoundedSolver::new(limits);
    let food = solver.declare_int_var("food[A]");
    let water = solver.declare_int_var("water[A]");
    assert_pred(&mut solver, "C0001", term(food), Comparison::Eq, LinearSum::constant(3));
    assert_pred(&mut solver, "C0007", term(water), Comparison::Ge, LinearSum::constant(10));
    assert_pred(&mut solver, "C0008", term(water), Comparison::Le, LinearSum::constant(2));

    assert_eq!(core_names(solver.check()), vec!["C0001", "C0007", "C0008"]);
}

#[test]
fn test_cyclic_strict_order_is_undecided() {
    let mut solver = BoundedSolver::new(small_domain());
    let x = solver.declare_int_var("x");
    let y = solver.declare_int_var("y");
    let z = solver.declare_int_var("z");
    assert_pred(&mut solver, "C0001", term(x), Comparison::Gt, term(y));
    assert_pred(&mut solver, "C0002", term(z), Comparison::Ge, LinearSum::constant(0));
    assert_pred(&mut solver, "C0003", term(y), Comparison::Gt, term(x));

    // Interval reasoning only refutes the cycle by walking into the box.
    assert!(unknown_reason(solver.check()).contains("domain bound reached"));
}

#[test]
fn test_false_constant_predicate_is_unsat() {
    let mut solver = BoundedSolver::default();
    assert_pred(
        &mut solver,
        "C0001",
        LinearSum::constant(0),
        Comparison::Ge,
        LinearSum::constant(1),
    );
    assert_eq!(core_names(solver.check()), vec!["C0001"]);
}

#[test]
fn test_node_limit_yields_unknown() {
    let limits = SolverLimits {
        node_limit: 1,
        ..SolverLimits::default()
    };
    let mut solver = BoundedSolver::new(limits);
    let x = solver.declare_int_var("x");
    let y = solver.declare_int_var("y");
    assert_pred(
        &mut solver,
        "C0001",
        LinearSum {
            terms: vec![(x, 1), (y, 1)],
            constant: 0,
        },
        Comparison::Eq,
        LinearSum::constant(7),
    );

    assert!(unknown_reason(solver.check()).contains("node limit"));
}

#[test]
fn test_outside_domain_is_undecided() {
    let mut solver = BoundedSolver::new(small_domain());
    let x = solver.declare_int_var("x");
    assert_pred(&mut solver, "C0001", term(x), Comparison::Gt, LinearSum::constant(20));
    assert!(unknown_reason(solver.check()).contains("domain bound reached"));
}

#[test]
fn test_lower_bound_past_default_domain_is_undecided() {
    let mut solver = BoundedSolver::default();
    let food = solver.declare_int_var("food[A]");
    assert_pred(
        &mut solver,
        "C0001",
        term(food),
        Comparison::Ge,
        LinearSum::constant(2_000_000),
    );
    assert!(unknown_reason(solver.check()).contains("domain bound reached"));
}

#[test]
fn test_exact_conflict_is_unsat_beside_box_violation() {
    // C0001 only leaves the box; C0002 and C0003 conflict outright.
    let mut solver = BoundedSolver::new(small_domain());
    let x = solver.declare_int_var("x");
    let y = solver.declare_int_var("y");
    assert_pred(&mut solver, "C0001", term(x), Comparison::Ge, LinearSum::constant(50));
    assert_pred(&mut solver, "C0002", term(y), Comparison::Ge, LinearSum::constant(5));
    assert_pred(&mut solver, "C0003", term(y), Comparison::Le, LinearSum::constant(3));

    assert_eq!(core_names(solver.check()), vec!["C0002", "C0003"]);
}

#[test]
fn test_huge_time_limit_does_not_overflow_deadline() {
    let limits = SolverLimits {
        seconds_spent_limit: Some(u64::MAX),
        ..small_domain()
    };
    let mut solver = BoundedSolver::new(limits);
    let x = solver.declare_int_var("x");
    assert_pred(&mut solver, "C0001", term(x), Comparison::Eq, LinearSum::constant(7));
    assert!(matches!(solver.check(), BackendOutcome::Sat(_)));
}
