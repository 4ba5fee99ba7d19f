//! Depth-first branching over bounded integer domains.

use std::time::Instant;

use tracing::trace;

use super::propagate::{propagate, Domain, Row};

/// Result of exploring one assertion subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Search {
    Found(Vec<i128>),
    /// Every branch was refuted. `boxed` is set when some refutation used a
    /// bound of the configured box, so solutions outside it are not ruled out.
    Exhausted { boxed: bool },
    Aborted(String),
}

pub(crate) struct SearchLimits {
    pub node_limit: u64,
    pub round_limit: u32,
    pub deadline: Option<Instant>,
}

/// Explores the box `initial` for a point satisfying every row.
pub(crate) fn search(rows: &[Row], initial: Vec<Domain>, limits: &SearchLimits) -> Search {
    let mut stack = vec![initial];
    let mut nodes: u64 = 0;
    let mut boxed = false;

    while let Some(mut domains) = stack.pop() {
        nodes += 1;
        if nodes > limits.node_limit {
            return Search::Aborted(format!(
                "node limit of {} exhausted",
                limits.node_limit
            ));
        }
        if let Some(deadline) = limits.deadline {
            if Instant::now() >= deadline {
                return Search::Aborted("time limit reached".to_string());
            }
        }

        if let Err(wipeout) = propagate(rows, &mut domains, limits.round_limit) {
            boxed |= wipeout.boxed;
            continue;
        }

        match select_open(&domains) {
            None => {
                let values: Vec<i128> = domains.iter().map(|d| d.lo).collect();
                if rows.iter().all(|row| row.holds(&values)) {
                    trace!(event = "search_leaf", nodes);
                    return Search::Found(values);
                }
                boxed |= domains.iter().any(|d| d.lo_boxed || d.hi_boxed);
            }
            Some(var) => {
                let children = branch(domains[var]);
                trace!(event = "search_branch", var, children = children.len(), depth = stack.len());
                for child in children.into_iter().rev() {
                    let mut next = domains.clone();
                    next[var] = child;
                    stack.push(next);
                }
            }
        }
    }

    Search::Exhausted { boxed }
}

/// Index of the narrowest domain that is not yet a single value.
fn select_open(domains: &[Domain]) -> Option<usize> {
    domains
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.is_fixed())
        .min_by_key(|(i, d)| (d.width(), *i))
        .map(|(i, _)| i)
}

/// Splits a domain in preference order: the value nearest zero, then the
/// part above it, then the part below it, each halved with the half nearer
/// zero first.
///
/// Split points are decisions; the outermost pieces keep the provenance of
/// the parent's ends, so the children cover exactly what the parent did.
pub(crate) fn branch(parent: Domain) -> Vec<Domain> {
    let (lo, hi) = (parent.lo, parent.hi);
    let point = 0i128.clamp(lo, hi);
    let mut children = vec![Domain {
        lo_boxed: point == lo && parent.lo_boxed,
        hi_boxed: point == hi && parent.hi_boxed,
        ..Domain::decided(point, point)
    }];

    if point < hi {
        let (a, b) = (point + 1, hi);
        let upper = |lo: i128| Domain {
            hi_boxed: parent.hi_boxed,
            ..Domain::decided(lo, b)
        };
        if a == b {
            children.push(upper(a));
        } else {
            let mid = a + (b - a) / 2;
            children.push(Domain::decided(a, mid));
            children.push(upper(mid + 1));
        }
    }
    if lo < point {
        let (a, b) = (lo, point - 1);
        let lower = |hi: i128| Domain {
            lo_boxed: parent.lo_boxed,
            ..Domain::decided(a, hi)
        };
        if a == b {
            children.push(lower(b));
        } else {
            let mid = a + (b - a) / 2;
            children.push(Domain::decided(mid + 1, b));
            children.push(lower(mid));
        }
    }
    children
}
