//! Property tests: invariants hold along arbitrary change sequences.

use allocspec_core::{var_id, Constraint, Edge, LinearExpr, Operator, Resource, Specification};
use proptest::prelude::*;

use super::apply;
use crate::change::{Change, LocationChange, UpdateConstraint};
use crate::ids::AUTO_ID;

const RESOURCES: &[&str] = &["food", "water", "fuel"];
const NODES: &[&str] = &["A", "B", "C", "D"];

fn resource() -> impl Strategy<Value = String> {
    prop::sample::select(RESOURCES).prop_map(str::to_string)
}

fn node() -> impl Strategy<Value = String> {
    prop::sample::select(NODES).prop_map(str::to_string)
}

fn var() -> impl Strategy<Value = String> {
    (resource(), node()).prop_map(|(r, n)| var_id(&r, &n))
}

fn op() -> impl Strategy<Value = Operator> {
    prop::sample::select(vec![
        Operator::Ge,
        Operator::Gt,
        Operator::Eq,
        Operator::Le,
        Operator::Lt,
    ])
}

fn constraint_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(AUTO_ID.to_string()),
        (1u64..8).prop_map(|n| format!("C{n:04}")),
    ]
}

fn constraint() -> impl Strategy<Value = Constraint> {
    (constraint_id(), var(), op(), prop::option::of(var()), -5i64..5).prop_map(
        |(id, lhs, op, rhs_var, k)| match rhs_var {
            Some(rhs) => Constraint::new(id, LinearExpr::var(lhs), op, LinearExpr::var(rhs).offset(k)),
            None => Constraint::new(id, LinearExpr::var(lhs), op, k),
        },
    )
}

fn change() -> impl Strategy<Value = Change> {
    prop_oneof![
        constraint().prop_map(Change::add_constraint),
        constraint_id().prop_map(Change::remove_constraint),
        (constraint_id(), op()).prop_map(|(id, op)| UpdateConstraint::new(id).op(op).into()),
        resource().prop_map(|r| Change::add_resource(Resource::named(r))),
        resource().prop_map(Change::remove_resource),
        node().prop_map(Change::add_node),
        node().prop_map(Change::remove_node),
        (node(), node()).prop_map(|(a, b)| Change::add_edge(a, b)),
        (node(), node()).prop_map(|(a, b)| Change::remove_edge(a, b)),
        (node(), node(), node()).prop_map(|(n, a, b)| Change::AddLocation(LocationChange {
            node: Some(n),
            edge: Some(Edge::new(a, b)),
        })),
        Just(Change::Unrecognized),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_after_every_change(changes in prop::collection::vec(change(), 0..60)) {
        let mut spec = Specification::new();
        for change in &changes {
            let next = apply(&spec, change);
            prop_assert_eq!(next.check_invariants(), Ok(()));
            if next.same_structure(&spec) {
                prop_assert_eq!(next.version, spec.version);
            } else {
                prop_assert_eq!(next.version, spec.version + 1);
            }
            spec = next;
        }
    }

    #[test]
    fn removing_resource_leaves_no_references(
        changes in prop::collection::vec(change(), 0..40),
        doomed in resource(),
    ) {
        let spec = changes.iter().fold(Specification::new(), |s, c| apply(&s, c));
        let next = apply(&spec, &Change::remove_resource(doomed.clone()));
        let prefix = format!("{doomed}[");
        prop_assert!(next.vars.iter().all(|v| !v.id.starts_with(&prefix)));
        prop_assert!(next.constraints.iter().all(|c| c.variables().all(|v| !v.starts_with(&prefix))));
    }

    #[test]
    fn removing_node_leaves_no_references(
        changes in prop::collection::vec(change(), 0..40),
        doomed in node(),
    ) {
        let spec = changes.iter().fold(Specification::new(), |s, c| apply(&s, c));
        let next = apply(&spec, &Change::remove_node(doomed.clone()));
        let suffix = format!("[{doomed}]");
        prop_assert!(next.vars.iter().all(|v| !v.id.ends_with(&suffix)));
        prop_assert!(next.constraints.iter().all(|c| c.variables().all(|v| !v.ends_with(&suffix))));
        prop_assert!(next.locations.edges.iter().all(|e| !e.touches(&doomed)));
    }

    #[test]
    fn adding_twice_equals_adding_once(
        changes in prop::collection::vec(change(), 0..30),
        r in resource(),
        n in node(),
    ) {
        let spec = changes.iter().fold(Specification::new(), |s, c| apply(&s, c));

        let once = apply(&spec, &Change::add_resource(Resource::named(r.clone())));
        let twice = apply(&once, &Change::add_resource(Resource::named(r)));
        prop_assert_eq!(&twice, &once);

        let once = apply(&spec, &Change::add_node(n.clone()));
        let twice = apply(&once, &Change::add_node(n));
        prop_assert_eq!(&twice, &once);
    }
}
