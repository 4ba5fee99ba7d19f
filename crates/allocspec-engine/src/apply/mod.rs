//! The change-application function.
//!
//! [`apply`] clones the input snapshot, mutates the clone according to the
//! change, and bumps `version` only if the result differs from the input.
//! Every handler treats a missing target as a no-op.

#[cfg(test)]
mod proptests;

use std::collections::HashSet;

use allocspec_core::{var_id, Constraint, ReferenceIndex, Specification, Variable};
use tracing::{debug, warn};

use crate::change::{
    AddConstraint, AddResource, Change, LocationChange, RemoveConstraint, RemoveResource,
    UpdateConstraint,
};
use crate::ids::{next_constraint_id, AUTO_ID};

/// Applies `change` to `spec`, returning the next snapshot.
///
/// Never fails. The input is left untouched; the result's version is
/// `spec.version + 1` if anything changed and `spec.version` otherwise.
///
/// # Example
///
/// ```
/// use allocspec_core::{Resource, Specification};
/// use allocspec_engine::{apply, Change};
///
/// let spec = Specification::new();
/// let spec = apply(&spec, &Change::add_node("A"));
/// let spec = apply(&spec, &Change::add_resource(Resource::named("food")));
///
/// assert_eq!(spec.version, 3);
/// assert!(spec.has_variable("food[A]"));
///
/// // Removing something that is not there changes nothing.
/// let same = apply(&spec, &Change::remove_node("Z"));
/// assert_eq!(same, spec);
/// ```
pub fn apply(spec: &Specification, change: &Change) -> Specification {
    let mut next = spec.clone();
    match change {
        Change::AddConstraint(payload) => add_constraint(&mut next, payload),
        Change::RemoveConstraint(payload) => remove_constraint(&mut next, payload),
        Change::UpdateConstraint(payload) => update_constraint(&mut next, payload),
        Change::AddResource(payload) => add_resource(&mut next, payload),
        Change::RemoveResource(payload) => remove_resource(&mut next, payload),
        Change::AddLocation(payload) => add_location(&mut next, payload),
        Change::RemoveLocation(payload) => remove_location(&mut next, payload),
        Change::Unrecognized => {}
    }

    if next.same_structure(spec) {
        debug!(
            event = "change_noop",
            kind = change.kind().as_str(),
            version = spec.version,
        );
        return next;
    }
    next.version = spec.version + 1;
    debug!(
        event = "change_applied",
        kind = change.kind().as_str(),
        version = next.version,
        vars = next.vars.len(),
        constraints = next.constraints.len(),
    );
    next
}

fn add_constraint(spec: &mut Specification, payload: &AddConstraint) {
    let mut constraint = payload.constraint.clone();
    if let Some(var) = first_undeclared(spec, &constraint) {
        warn!(
            event = "constraint_rejected",
            constraint = %constraint.id,
            var = %var,
            "constraint references an undeclared variable"
        );
        return;
    }
    if constraint.id == AUTO_ID || spec.constraint(&constraint.id).is_some() {
        constraint.id = next_constraint_id(&spec.constraints);
    }
    spec.constraints.push(constraint);
}

fn remove_constraint(spec: &mut Specification, payload: &RemoveConstraint) {
    spec.constraints.retain(|c| c.id != payload.constraint_id);
}

fn update_constraint(spec: &mut Specification, payload: &UpdateConstraint) {
    let Some(pos) = spec.constraint_position(&payload.constraint_id) else {
        return;
    };
    let updated = payload.patch(&spec.constraints[pos]);
    if let Some(var) = first_undeclared(spec, &updated) {
        warn!(
            event = "constraint_rejected",
            constraint = %updated.id,
            var = %var,
            "patched constraint references an undeclared variable"
        );
        return;
    }
    spec.constraints[pos] = updated;
}

fn add_resource(spec: &mut Specification, payload: &AddResource) {
    let resource = &payload.resource;
    if !spec.has_resource(&resource.name) {
        spec.resources.push(resource.clone());
    }
    // Runs even for a known resource; every id already exists then.
    let ids: Vec<String> = spec
        .locations
        .nodes
        .iter()
        .map(|node| var_id(&resource.name, node))
        .collect();
    declare_missing(spec, ids);
}

fn remove_resource(spec: &mut Specification, payload: &RemoveResource) {
    let before = spec.resources.len();
    spec.resources.retain(|r| r.name != payload.name);
    if spec.resources.len() == before {
        return;
    }
    let doomed: HashSet<String> = spec
        .locations
        .nodes
        .iter()
        .map(|node| var_id(&payload.name, node))
        .collect();
    remove_variables(spec, &doomed);
}

fn add_location(spec: &mut Specification, payload: &LocationChange) {
    if let Some(node) = &payload.node {
        if !spec.has_node(node) {
            spec.locations.nodes.push(node.clone());
            let ids: Vec<String> = spec
                .resources
                .iter()
                .map(|r| var_id(&r.name, node))
                .collect();
            declare_missing(spec, ids);
        }
    }
    if let Some(edge) = &payload.edge {
        let graph = &mut spec.locations;
        if graph.has_node(&edge.src)
            && graph.has_node(&edge.dst)
            && !graph.has_edge(&edge.src, &edge.dst)
        {
            graph.edges.push(edge.clone());
        }
    }
}

fn remove_location(spec: &mut Specification, payload: &LocationChange) {
    if let Some(node) = &payload.node {
        if spec.has_node(node) {
            spec.locations.nodes.retain(|n| n != node);
            spec.locations.edges.retain(|e| !e.touches(node));
            let doomed: HashSet<String> =
                spec.resources.iter().map(|r| var_id(&r.name, node)).collect();
            remove_variables(spec, &doomed);
        }
    }
    if let Some(edge) = &payload.edge {
        spec.locations
            .edges
            .retain(|e| !e.connects(&edge.src, &edge.dst));
    }
}

/// Appends an integer variable for each id not yet declared.
fn declare_missing(spec: &mut Specification, ids: Vec<String>) {
    let mut existing: HashSet<String> = spec.vars.iter().map(|v| v.id.clone()).collect();
    for id in ids {
        if existing.insert(id.clone()) {
            spec.vars.push(Variable {
                id,
                sort: Default::default(),
            });
        }
    }
}

/// Drops the `doomed` variables and every constraint that references one.
fn remove_variables(spec: &mut Specification, doomed: &HashSet<String>) {
    spec.vars.retain(|v| !doomed.contains(&v.id));

    let referencing =
        ReferenceIndex::build(&spec.constraints).referencing(doomed.iter().map(String::as_str));
    if referencing.is_empty() {
        return;
    }
    debug!(
        event = "constraint_cascade",
        removed = referencing.len(),
        vars = doomed.len(),
    );
    let mut pos = 0;
    spec.constraints.retain(|_| {
        let keep = !referencing.contains(&pos);
        pos += 1;
        keep
    });
}

fn first_undeclared<'c>(spec: &Specification, constraint: &'c Constraint) -> Option<&'c str> {
    let declared = spec.variable_ids();
    constraint.variables().find(|v| !declared.contains(v))
}
