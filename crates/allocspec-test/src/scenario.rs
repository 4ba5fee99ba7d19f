//! The food/water allocation scenario over locations A, B and C.
//!
//! - food at A is exactly 3, water at A is at least 4
//! - B and C each get more food than A
//! - water at B is exactly 5
//! - water at C exceeds the water at A and B combined

use allocspec_core::{Constraint, Edge, Operator, Specification};

use crate::builders::{cmp, cmp_expr, grid_spec};

/// The six scenario constraints, ids `C0001`..`C0006`.
pub fn scenario_a_constraints() -> Vec<Constraint> {
    vec![
        cmp("C0001", "food[A]", Operator::Eq, 3),
        cmp("C0002", "water[A]", Operator::Ge, 4),
        cmp_expr("C0003", "food[B]", Operator::Gt, &["food[A]"]),
        cmp("C0004", "water[B]", Operator::Eq, 5),
        cmp_expr("C0005", "food[C]", Operator::Gt, &["food[A]"]),
        cmp_expr("C0006", "water[C]", Operator::Gt, &["water[A]", "water[B]"]),
    ]
}

/// Two constraints that cannot hold together: `water[A] >= 10` and
/// `water[A] <= 2`, ids `C0007` and `C0008`.
pub fn conflicting_water_constraints() -> Vec<Constraint> {
    vec![
        cmp("C0007", "water[A]", Operator::Ge, 10),
        cmp("C0008", "water[A]", Operator::Le, 2),
    ]
}

/// Fully connected A/B/C graph with food and water and the six scenario
/// constraints.
pub fn scenario_a_spec() -> Specification {
    let mut spec = grid_spec(&["food", "water"], &["A", "B", "C"]);
    for (src, dst) in [("A", "B"), ("A", "C"), ("B", "C")] {
        spec.locations.edges.push(Edge::new(src, dst));
        spec.locations.edges.push(Edge::new(dst, src));
    }
    spec.constraints = scenario_a_constraints();
    spec
}
