//! Hull-based minimal characteristics.
//!
//! From the four record chains the feasible slope range of a separating line
//! is an open interval (alpha-, alpha+): a line of slope alpha containing the
//! segment's digitization exists iff for every hull vertex T on or below the
//! line and every vertex L of the far chain, alpha stays below the slope
//! T -> L+(0,1) when T is left of L, and above the reverse slope otherwise.
//! The minimal denominator fraction of the interval is found by Stern-Brocot
//! descent, and the intercept falls out of the upper chain.

use num_rational::Ratio;

use crate::num::DslInteger;
use crate::Vec2;

use super::walk::{record_set, y_of};

/// Minimal characteristics of the anchored subsegment: `0 <= a < b`,
/// `0 <= r < b`, columns `[0, n]` with `n >= 1`. Returns the canonical
/// `(a', b', mu')` with A-as-origin anchoring.
pub(crate) fn minimal_characteristics<I: DslInteger>(a: &I, b: &I, r: &I, n: &I) -> (I, I, I) {
    let zero = I::zero();
    let one = I::one();
    if a.is_zero() {
        return (zero, one, I::zero());
    }
    let recs = record_set(a, b, r, n);
    // Chain vertices as points; the min-record lists trace the chain on the
    // lower side of the line, the max-record lists the one on the upper side.
    let chain = |lists: [&Vec<(I, I)>; 2]| -> Vec<Vec2<I>> {
        let mut xs: Vec<I> = lists
            .into_iter()
            .flatten()
            .map(|(x, _)| x.clone())
            .collect();
        xs.sort();
        xs.dedup();
        xs.into_iter()
            .map(|x| {
                let y = y_of(a, b, r, &x);
                Vec2::<I>::new(x, y)
            })
            .collect()
    };
    let top = chain([&recs.fwd_min, &recs.rev_min]);
    let bot = chain([&recs.fwd_max, &recs.rev_max]);

    // Exact cross-pair calipers for the open feasible interval.
    let mut alpha_minus: Option<Ratio<I>> = None;
    let mut alpha_plus: Option<Ratio<I>> = None;
    for t in &top {
        for lb in &bot {
            if t.x < lb.x {
                let s = Ratio::new(
                    lb.y.clone() + one.clone() - t.y.clone(),
                    lb.x.clone() - t.x.clone(),
                );
                if alpha_plus.as_ref().map_or(true, |cur| s < *cur) {
                    alpha_plus = Some(s);
                }
            } else if lb.x < t.x {
                let s = Ratio::new(
                    t.y.clone() - lb.y.clone() - one.clone(),
                    t.x.clone() - lb.x.clone(),
                );
                if alpha_minus.as_ref().map_or(true, |cur| s > *cur) {
                    alpha_minus = Some(s);
                }
            }
        }
    }
    // Both chains span column 0 and column n, so both bounds exist for n >= 1.
    let lo = alpha_minus.unwrap_or_else(|| Ratio::from_integer(-one.clone()));
    let hi = alpha_plus.unwrap_or_else(|| Ratio::from_integer(one.clone() + one.clone()));
    debug_assert!(lo < hi);

    let (p, q) = sb_first_in_open(&lo, &hi);
    let mu = top
        .iter()
        .map(|t| q.clone() * t.y.clone() - p.clone() * t.x.clone())
        .max()
        .unwrap_or(zero);
    (p, q, mu)
}

/// Minimal-denominator fraction in the open interval `(lo, hi)`.
pub(crate) fn sb_first_in_open<I: DslInteger>(lo: &Ratio<I>, hi: &Ratio<I>) -> (I, I) {
    let one = I::one();
    let k = lo.floor().to_integer() + one.clone();
    if Ratio::from_integer(k.clone()) < *hi {
        return (k, one);
    }
    let fl = lo.floor().to_integer();
    let lo2 = lo.clone() - Ratio::from_integer(fl.clone());
    let hi2 = hi.clone() - Ratio::from_integer(fl.clone());
    if lo2.numer().is_zero() {
        // (0, hi2): the answer is 1/q for the smallest q with 1/q < hi2
        let q = hi2.denom().div_floor(hi2.numer()) + one.clone();
        return (fl * q.clone() + one, q);
    }
    let (p, q) = sb_first_in_open(&hi2.recip(), &lo2.recip());
    (fl * p.clone() + q, p)
}
