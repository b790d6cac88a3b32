//! Residue record walk and hull primitives.
//!
//! Everything here works on the anchored problem: a line of direction
//! `l = (b, a)` and intercept `r`, i.e. the real line `a*x - b*y + r = 0`,
//! with `0 <= a < b`, `0 <= r < b`, restricted to columns `[0, n]`. The DSL
//! point of column `x` is `(x, y(x))` with `y(x) = floor((a*x + r)/b)`, and
//! its residue `rho(x) = (a*x + r) mod b` measures how far below the real
//! line it sits (in units of `1/b`).
//!
//! The walk maintains a Stern-Brocot pair of direction vectors `u`, `v` with
//! `delta(u) > 0 > delta(v)` for `delta(w) = a*w.x - b*w.y`, slides along `v`
//! in accelerated runs (counts supplied by the `intersection` primitives),
//! and reduces the pair by Euclid steps when `v` overshoots. Each appended
//! record is a vertex of the hull chain facing the line; the whole list is
//! O(log b) long.

use nalgebra::Vector2;

use crate::num::{as_f64, ceil_div, from_f64_trunc, DslInteger};
use crate::Vec2;

/// DSL ordinate `floor((a*x + r)/b)`.
#[inline]
pub(crate) fn y_of<I: DslInteger>(a: &I, b: &I, r: &I, x: &I) -> I {
    (a.clone() * x.clone() + r.clone()).div_floor(b)
}

/// Signed residue change effected by a step along `w`, for direction `l = (b, a)`.
#[inline]
fn delta<I: DslInteger>(l: &Vec2<I>, w: &Vec2<I>) -> I {
    l.y.clone() * w.x.clone() - l.x.clone() * w.y.clone()
}

/// Floor of the parameter `alpha` at which `P + alpha*v` crosses the vertical
/// line `x = n`.
#[inline]
pub fn intersection_vertical<I: DslInteger>(p: &Vec2<I>, v: &Vec2<I>, n: &I) -> I {
    (n.clone() - p.x.clone()).div_floor(&v.x)
}

/// Floor of the parameter `alpha` at which `P + alpha*v` crosses the line of
/// direction `l = (l.x, l.y)` and intercept `r` (the line `l.y*x - l.x*y + r = 0`).
///
/// `v` must not be parallel to `l`.
pub fn intersection<I: DslInteger>(p: &Vec2<I>, v: &Vec2<I>, l: &Vec2<I>, r: &I) -> I {
    let num = l.y.clone() * p.x.clone() - l.x.clone() * p.y.clone() + r.clone();
    let den = l.x.clone() * v.y.clone() - l.y.clone() * v.x.clone();
    num.div_floor(&den)
}

/// Floor of the parameter `alpha` at which `P + alpha*v` crosses the real
/// line `y = s*x`. Real-slope counterpart of [`intersection`].
pub fn intersection_real<I: DslInteger>(p: &Vec2<I>, v: &Vec2<I>, s: f64) -> I {
    let num = s * as_f64(&p.x) - as_f64(&p.y);
    let den = as_f64(&v.y) - s * as_f64(&v.x);
    from_f64_trunc((num / den).floor())
}

/// One continued-fraction step: advance the Bezout vector `v` to the mediant
/// `v + i*u`, with the smallest `i >= 1` such that a step of the new vector
/// from `a_pt` does not cross the line (direction `l`, intercept `r`).
///
/// Precondition: a single step of `v` from `a_pt` crosses the line (that is
/// what makes the refinement necessary) and `delta(u) > 0 > delta(v)`.
pub fn update<I: DslInteger>(u: &Vec2<I>, a_pt: &Vec2<I>, l: &Vec2<I>, r: &I, v: &mut Vec2<I>) {
    let rho = l.y.clone() * a_pt.x.clone() - l.x.clone() * a_pt.y.clone() + r.clone();
    let du = delta(l, u);
    let dv = delta(l, v);
    debug_assert!(du > I::zero() && dv < I::zero() && rho < -dv.clone());
    let i = ceil_div(&(-dv - rho), &du);
    v.x += i.clone() * u.x.clone();
    v.y += i * u.y.clone();
}

/// Strict record minima of `rho(x) = (a*x + r) mod b` over columns `[0, n]`,
/// as `(x, rho)` pairs with strictly decreasing `rho`, runs collapsed.
///
/// These are the vertices of the hull chain on the lower side of the line,
/// scanned left to right; the three sibling chains are obtained by the
/// mirror (`x -> n - x`) and complement (`rho -> b - 1 - rho`) transforms.
pub(crate) fn residue_records<I: DslInteger>(a: &I, b: &I, r: &I, n: &I) -> Vec<(I, I)> {
    let zero = I::zero();
    let one = I::one();
    debug_assert!(a >= &zero && a < b && r >= &zero && r < b && n >= &zero);
    let mut recs = vec![(zero.clone(), r.clone())];
    if a.is_zero() {
        return recs; // constant residue, single record
    }
    let l = Vector2::new(b.clone(), a.clone());
    let mut p = Vector2::new(zero.clone(), zero.clone());
    let mut rho = r.clone();
    let mut u = Vector2::new(one.clone(), zero.clone());
    let mut du = a.clone();
    let mut v = Vector2::new(one.clone(), one.clone());
    let mut dv = a.clone() - b.clone();
    while rho > zero {
        let neg_dv = -dv.clone();
        if neg_dv <= rho {
            // Slide: a run of v steps, stopped by the line or the column bound.
            let k_line = intersection(&p, &v, &l, r);
            let k_col = intersection_vertical(&p, &v, n);
            let k = k_line.min(k_col.clone());
            if k.is_zero() {
                break; // column budget blocks the cheapest descent
            }
            p = Vector2::new(
                p.x.clone() + k.clone() * v.x.clone(),
                p.y.clone() + k.clone() * v.y.clone(),
            );
            rho = rho + k * dv.clone();
            recs.push((p.x.clone(), rho.clone()));
            continue;
        }
        // v overshoots; reduce the pair by one Euclid step.
        let i_min = ceil_div(&(neg_dv.clone() - rho.clone()), &du);
        let c = (neg_dv.clone() - one.clone()).div_floor(&du);
        if i_min <= c {
            update(&u, &p, &l, r, &mut v);
            dv = dv + i_min * du.clone();
        } else if du > neg_dv {
            // keep delta(u) positive while shrinking it
            let t = (du.clone() - one.clone()).div_floor(&neg_dv);
            u = Vector2::new(
                u.x.clone() + t.clone() * v.x.clone(),
                u.y.clone() + t.clone() * v.y.clone(),
            );
            du = du + t * dv.clone();
        } else if c >= one {
            v = Vector2::new(
                v.x.clone() + c.clone() * u.x.clone(),
                v.y.clone() + c.clone() * u.y.clone(),
            );
            dv = dv + c * du.clone();
        } else {
            break; // pair fully reduced, no further descent exists
        }
    }
    recs
}

/// The four record lists of one anchored line, in original coordinates.
///
/// `fwd`/`rev` is the scan direction, `min`/`max` the residue extremum the
/// list records. Both engines evaluate support functions over these lists.
pub(crate) struct RecordSet<I> {
    pub fwd_min: Vec<(I, I)>,
    pub rev_min: Vec<(I, I)>,
    pub fwd_max: Vec<(I, I)>,
    pub rev_max: Vec<(I, I)>,
}

pub(crate) fn record_set<I: DslInteger>(a: &I, b: &I, r: &I, n: &I) -> RecordSet<I> {
    let one = I::one();
    let am = (-a.clone()).mod_floor(b);
    let rm = (a.clone() * n.clone() + r.clone()).mod_floor(b);
    let compl = |x: &I| (b.clone() - one.clone() - x.clone()).mod_floor(b);
    let mirror = |recs: Vec<(I, I)>| -> Vec<(I, I)> {
        recs.into_iter()
            .map(|(x, rho)| (n.clone() - x, rho))
            .collect()
    };
    let fwd_min = residue_records(a, b, r, n);
    let rev_min = mirror(residue_records(&am, b, &rm, n));
    let fwd_max: Vec<(I, I)> = residue_records(&am, b, &compl(r), n)
        .into_iter()
        .map(|(x, rho)| (x, compl(&rho)))
        .collect();
    let rev_max: Vec<(I, I)> = mirror(residue_records(a, b, &compl(&rm), n))
        .into_iter()
        .map(|(x, rho)| (x, compl(&rho)))
        .collect();
    RecordSet {
        fwd_min,
        rev_min,
        fwd_max,
        rev_max,
    }
}

fn point_at<I: DslInteger>(a: &I, b: &I, r: &I, x: &I) -> Vec2<I> {
    Vector2::new(x.clone(), y_of(a, b, r, x))
}

/// Nearest lattice points on either side of the line within columns `[0, n]`:
/// `inf` on or below the line, `sup` strictly above (Charrier-Buzer).
///
/// `l = (b, a)` is the direction vector, `r` the intercept.
pub fn convex_hull_approx<I: DslInteger>(l: &Vec2<I>, r: &I, n: &I) -> (Vec2<I>, Vec2<I>) {
    let (b, a) = (&l.x, &l.y);
    let one = I::one();
    let am = (-a.clone()).mod_floor(b);
    let compl_r = (b.clone() - one.clone() - r.clone()).mod_floor(b);
    let recs_inf = residue_records(a, b, r, n);
    let recs_sup = residue_records(&am, b, &compl_r, n);
    let inf_x = recs_inf[recs_inf.len() - 1].0.clone();
    let sup_x = recs_sup[recs_sup.len() - 1].0.clone();
    let inf = point_at(a, b, r, &inf_x);
    let sup_base = point_at(a, b, r, &sup_x);
    let sup = Vector2::new(sup_base.x.clone(), sup_base.y.clone() + I::one());
    (inf, sup)
}

/// Like [`convex_hull_approx`], but returns the two most recent vertices of
/// each chain so a partial scan can be resumed; `inv` scans right-to-left
/// (columns `[0, n]` mirrored, results mapped back).
#[allow(clippy::type_complexity)]
pub fn convex_hull_approx_two_points<I: DslInteger>(
    l: &Vec2<I>,
    r: &I,
    n: &I,
    inv: bool,
) -> ((Vec2<I>, Vec2<I>), (Vec2<I>, Vec2<I>)) {
    let (b, a) = (&l.x, &l.y);
    let one = I::one();
    let (aa, rr) = if inv {
        (
            (-a.clone()).mod_floor(b),
            (a.clone() * n.clone() + r.clone()).mod_floor(b),
        )
    } else {
        (a.clone(), r.clone())
    };
    let am = (-aa.clone()).mod_floor(b);
    let compl_r = (b.clone() - one.clone() - rr.clone()).mod_floor(b);
    let back = |x: &I| -> I {
        if inv {
            n.clone() - x.clone()
        } else {
            x.clone()
        }
    };
    let last_two = |recs: Vec<(I, I)>| -> (I, I) {
        let k = recs.len();
        let last = recs[k - 1].0.clone();
        let prev = recs[k.saturating_sub(2)].0.clone();
        (prev, last)
    };
    let (inf_prev_x, inf_x) = last_two(residue_records(&aa, b, &rr, n));
    let (sup_prev_x, sup_x) = last_two(residue_records(&am, b, &compl_r, n));
    let lift = |x: &I| point_at(a, b, r, &back(x));
    let lift_up = |x: &I| {
        let p = lift(x);
        Vector2::new(p.x.clone(), p.y.clone() + I::one())
    };
    (
        (lift(&inf_prev_x), lift(&inf_x)),
        (lift_up(&sup_prev_x), lift_up(&sup_x)),
    )
}

/// Hull computation for a line through the origin (Har-Peled): the
/// no-intercept case of [`convex_hull_approx`].
pub fn convex_hull_har_peled<I: DslInteger>(l: &Vec2<I>, n: &I) -> (Vec2<I>, Vec2<I>) {
    convex_hull_approx(l, &I::zero(), n)
}

/// Lower integer convex hull of the line of direction `l = (b, a)` and
/// intercept `mu` between the columns of `a_pt` and `b_pt`: a rightward pass
/// from `a_pt` and a leftward pass from `b_pt`, returning the four bracketing
/// vertices `[prev_inf_l, inf_l, inf_r, prev_inf_r]` in original coordinates.
pub fn lower_convex_hull<I: DslInteger>(
    l: &Vec2<I>,
    mu: &I,
    a_pt: &Vec2<I>,
    b_pt: &Vec2<I>,
) -> [Vec2<I>; 4] {
    let (b, a) = (&l.x, &l.y);
    debug_assert!(a_pt.x <= b_pt.x);
    let n = b_pt.x.clone() - a_pt.x.clone();
    let r = a.clone() * a_pt.x.clone() - b.clone() * a_pt.y.clone() + mu.clone();
    let ((prev_l, last_l), _) = convex_hull_approx_two_points(l, &r, &n, false);
    let ((prev_r, last_r), _) = convex_hull_approx_two_points(l, &r, &n, true);
    let shift = |p: Vec2<I>| Vector2::new(p.x.clone() + a_pt.x.clone(), p.y.clone() + a_pt.y.clone());
    [shift(prev_l), shift(last_l), shift(last_r), shift(prev_r)]
}
