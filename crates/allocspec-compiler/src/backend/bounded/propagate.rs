//! Linear rows and interval bound propagation.
//!
//! Every bound remembers whether it rests on the configured domain box.
//! Bounds derived from rows and branching decisions alone are exact; a
//! wipeout that used a boxed bound only shows there is no solution inside
//! the box.

use std::collections::BTreeMap;

use super::super::{Comparison, LinearSum, Predicate};

/// Closed integer interval `[lo, hi]` with the provenance of each end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Domain {
    pub lo: i128,
    pub hi: i128,
    pub lo_boxed: bool,
    pub hi_boxed: bool,
}

impl Domain {
    /// The configured box: both ends boxed.
    pub fn boxed(lo: i128, hi: i128) -> Self {
        Self {
            lo,
            hi,
            lo_boxed: true,
            hi_boxed: true,
        }
    }

    /// Both ends set by a branching decision.
    pub fn decided(lo: i128, hi: i128) -> Self {
        Self {
            lo,
            hi,
            lo_boxed: false,
            hi_boxed: false,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.lo == self.hi
    }

    pub fn width(&self) -> i128 {
        self.hi - self.lo
    }

    /// Smallest value of `coef * x` and whether it rests on a boxed bound.
    fn term_min(&self, coef: i128) -> (i128, bool) {
        if coef >= 0 {
            (coef * self.lo, coef != 0 && self.lo_boxed)
        } else {
            (coef * self.hi, self.hi_boxed)
        }
    }
}

/// `Σ(coef × var) + constant <= 0`, coefficients merged and non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    pub terms: Vec<(usize, i128)>,
    pub constant: i128,
}

impl Row {
    fn negated(&self) -> Row {
        Row {
            terms: self.terms.iter().map(|(v, a)| (*v, -a)).collect(),
            constant: -self.constant,
        }
    }

    fn shifted(mut self, by: i128) -> Row {
        self.constant += by;
        self
    }

    pub fn holds(&self, values: &[i128]) -> bool {
        let total = self
            .terms
            .iter()
            .fold(self.constant, |acc, (v, a)| acc + a * values[*v]);
        total <= 0
    }
}

/// Rewrites a predicate as rows over `lhs - rhs`.
///
/// Strict comparisons tighten by one, equality yields two rows.
pub(crate) fn normalize(predicate: &Predicate) -> Vec<Row> {
    let diff = difference(&predicate.lhs, &predicate.rhs);
    match predicate.cmp {
        Comparison::Le => vec![diff],
        Comparison::Lt => vec![diff.shifted(1)],
        Comparison::Ge => vec![diff.negated()],
        Comparison::Gt => vec![diff.negated().shifted(1)],
        Comparison::Eq => {
            let neg = diff.negated();
            vec![diff, neg]
        }
    }
}

fn difference(lhs: &LinearSum, rhs: &LinearSum) -> Row {
    let mut coefs: BTreeMap<usize, i128> = BTreeMap::new();
    for (var, coef) in &lhs.terms {
        *coefs.entry(var.index()).or_insert(0) += *coef as i128;
    }
    for (var, coef) in &rhs.terms {
        *coefs.entry(var.index()).or_insert(0) -= *coef as i128;
    }
    Row {
        terms: coefs.into_iter().filter(|(_, a)| *a != 0).collect(),
        constant: lhs.constant as i128 - rhs.constant as i128,
    }
}

pub(crate) fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

pub(crate) fn ceil_div(a: i128, b: i128) -> i128 {
    -floor_div(-a, b)
}

/// Domains became empty; the current box holds no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Wipeout {
    /// The refutation used a bound taken from the configured box.
    pub boxed: bool,
}

/// Tightens `domains` against every row until a fixpoint or `round_limit`
/// sweeps, whichever comes first.
///
/// A row violated only through boxed bounds does not stop the sweep, so an
/// exact refutation later in the same sweep is still reported as one.
pub(crate) fn propagate(
    rows: &[Row],
    domains: &mut [Domain],
    round_limit: u32,
) -> Result<(), Wipeout> {
    for _ in 0..round_limit.max(1) {
        let mut changed = false;
        let mut boxed_violation = false;
        for row in rows {
            let mins: Vec<(i128, bool)> = row
                .terms
                .iter()
                .map(|(var, coef)| domains[*var].term_min(*coef))
                .collect();
            let min_total = mins.iter().fold(row.constant, |acc, (m, _)| acc + m);
            let boxed_count = mins.iter().filter(|(_, boxed)| *boxed).count();
            if min_total > 0 {
                if boxed_count == 0 {
                    return Err(Wipeout { boxed: false });
                }
                boxed_violation = true;
                continue;
            }
            for ((var, coef), (own_min, own_boxed)) in row.terms.iter().zip(&mins) {
                // coef * x <= -(min of everything else)
                let slack = own_min - min_total;
                let derived_boxed = boxed_count > usize::from(*own_boxed);
                let domain = &mut domains[*var];
                if *coef > 0 {
                    let new_hi = floor_div(slack, *coef);
                    if new_hi < domain.hi {
                        domain.hi = new_hi;
                        domain.hi_boxed = derived_boxed;
                        changed = true;
                    }
                } else {
                    let new_lo = ceil_div(slack, *coef);
                    if new_lo > domain.lo {
                        domain.lo = new_lo;
                        domain.lo_boxed = derived_boxed;
                        changed = true;
                    }
                }
                if domain.lo > domain.hi {
                    return Err(Wipeout {
                        boxed: domain.lo_boxed || domain.hi_boxed,
                    });
                }
            }
        }
        if boxed_violation {
            return Err(Wipeout { boxed: true });
        }
        if !changed {
            break;
        }
    }
    Ok(())
}
