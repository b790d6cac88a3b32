//! Farey-fan navigation for a real line `y = alpha*x + beta`.
//!
//! Same pipeline as the exact navigation, with every geometric comparison
//! taken against the caller's `precision`: the fraction bracket, the pencil
//! ladder, the residue record walks, and the feasibility test all run on
//! `f64`. A query within `precision` of a ray is treated as Onto; too tight
//! a precision can therefore misclassify a grazing configuration, which is
//! the documented accuracy trade-off of this path. The final feasibility
//! comparisons are still robust: the tested quantity is integer-valued, so
//! they compare against half-unit thresholds.
//!
//! Coordinate spans are assumed to stay within the exactly-representable
//! f64 range.

use crate::num::{as_f64, from_f64_trunc, DslInteger};

use super::navigate::{
    next_term_in_farey_series_euclid, ray_of_highest_slope, smart_ray_of_smallest_slope,
    FareyBracket,
};
use super::ray::Ray;

/// Bracket a real slope between consecutive Farey fractions of order n.
pub(crate) fn farey_bracket_real<I: DslInteger>(alpha: f64, n: &I, prec: f64) -> FareyBracket<I> {
    let zero = I::zero();
    let one = I::one();
    let (mut p1, mut q1, mut p2, mut q2) = (zero.clone(), one.clone(), one.clone(), one.clone());
    loop {
        let num_lo = alpha * as_f64(&q1) - as_f64(&p1);
        let num_hi = as_f64(&p2) - alpha * as_f64(&q2);
        if num_lo <= prec {
            let k = (n.clone() - q2.clone()).div_floor(&q1);
            if k > zero {
                p2 = p2 + k.clone() * p1.clone();
                q2 = q2 + k * q1.clone();
            }
            return FareyBracket {
                fp: p1,
                fq: q1,
                gp: p2,
                gq: q2,
                exact: true,
            };
        }
        if num_hi <= prec {
            let (gp, gq) = next_term_in_farey_series_euclid(&p2, &q2, n);
            return FareyBracket {
                fp: p2,
                fq: q2,
                gp,
                gq,
                exact: true,
            };
        }
        let k_lo: I = from_f64_trunc(num_lo / num_hi);
        let k_cap = (n.clone() - q1.clone()).div_floor(&q2);
        if k_cap <= k_lo {
            if k_cap > zero {
                p1 = p1 + k_cap.clone() * p2.clone();
                q1 = q1 + k_cap * q2.clone();
            }
            let exact = alpha * as_f64(&q1) - as_f64(&p1) <= prec;
            return FareyBracket {
                fp: p1,
                fq: q1,
                gp: p2,
                gq: q2,
                exact,
            };
        }
        if k_lo > zero {
            p1 = p1 + k_lo.clone() * p2.clone();
            q1 = q1 + k_lo * q2.clone();
            continue;
        }
        let k_hi: I = from_f64_trunc(num_hi / num_lo);
        let k_cap = (n.clone() - q2.clone()).div_floor(&q1);
        if k_cap <= k_hi {
            if k_cap > zero {
                p2 = p2 + k_cap.clone() * p1.clone();
                q2 = q2 + k_cap * q1.clone();
            }
            // the capped run may land the high seat on alpha
            if as_f64(&p2) - alpha * as_f64(&q2) <= prec {
                let (gp, gq) = next_term_in_farey_series_euclid(&p2, &q2, n);
                return FareyBracket {
                    fp: p2,
                    fq: q2,
                    gp,
                    gq,
                    exact: true,
                };
            }
            return FareyBracket {
                fp: p1,
                fq: q1,
                gp: p2,
                gq: q2,
                exact: false,
            };
        }
        p2 = p2 + k_hi.clone() * p1.clone();
        q2 = q2 + k_hi * q1.clone();
    }
}

/// Strict record minima of `frac(alpha*x + beta)` over `[0, n]`, as
/// `(column, residue)` pairs. Float twin of the exact record walk.
pub(crate) fn residue_records_real<I: DslInteger>(
    alpha: f64,
    beta: f64,
    n: &I,
    prec: f64,
) -> Vec<(I, f64)> {
    let zero = I::zero();
    let one = I::one();
    let a = alpha.rem_euclid(1.0);
    let mut rho = beta.rem_euclid(1.0);
    let mut recs = vec![(zero.clone(), rho)];
    if a <= prec {
        return recs;
    }
    let mut x = zero.clone();
    let (mut ux, mut du) = (one.clone(), a);
    let (mut vx, mut dv) = (one.clone(), a - 1.0);
    while rho > prec {
        if -dv <= rho + prec {
            let k_res: I = from_f64_trunc((rho + prec) / -dv);
            let k_col = (n.clone() - x.clone()).div_floor(&vx);
            let k = k_res.min(k_col);
            if k.is_zero() {
                break;
            }
            x = x + k.clone() * vx.clone();
            rho = (rho + as_f64(&k) * dv).max(0.0);
            recs.push((x.clone(), rho));
            continue;
        }
        let i_min = ((-(dv + rho)) / du - prec).ceil().max(0.0);
        let mut c = (-dv / du + prec).floor();
        if -dv - c * du <= prec * du {
            c -= 1.0; // keep the refined delta strictly negative
        }
        let c = c.max(0.0);
        if i_min <= c && i_min >= 1.0 {
            let i: I = from_f64_trunc(i_min);
            vx = vx + i * ux.clone();
            dv += i_min * du;
            continue;
        }
        if du > -dv {
            let t = ((du - prec) / -dv).floor();
            if t >= 1.0 {
                let ti: I = from_f64_trunc(t);
                ux = ux + ti * vx.clone();
                du += t * dv;
                continue;
            }
        }
        if c >= 1.0 {
            let ci: I = from_f64_trunc(c);
            vx = vx + ci * ux.clone();
            dv += c * du;
            continue;
        }
        break;
    }
    recs
}

/// Strict record maxima of `frac(alpha*x + beta)` over `[0, n]`.
///
/// Mirror of [`residue_records_real`] with the vector roles swapped; tracks
/// the gap to the ceiling instead of the residue itself, because residues
/// may never reach 1 (an exact ceiling hit wraps to zero).
pub(crate) fn ascend_records_real<I: DslInteger>(
    alpha: f64,
    beta: f64,
    n: &I,
    prec: f64,
) -> Vec<(I, f64)> {
    let zero = I::zero();
    let one = I::one();
    let a = alpha.rem_euclid(1.0);
    let rho0 = beta.rem_euclid(1.0);
    let mut recs = vec![(zero.clone(), rho0)];
    if a <= prec {
        return recs;
    }
    let mut x = zero.clone();
    let mut gap = 1.0 - rho0;
    let (mut ux, mut du) = (one.clone(), a);
    let (mut vx, mut dv) = (one.clone(), a - 1.0);
    while gap > prec {
        if du <= gap - prec {
            let k_res: I = from_f64_trunc((gap - prec) / du);
            let k_col = (n.clone() - x.clone()).div_floor(&ux);
            let k = k_res.min(k_col);
            if k.is_zero() {
                break;
            }
            x = x + k.clone() * ux.clone();
            gap -= as_f64(&k) * du;
            recs.push((x.clone(), 1.0 - gap));
            continue;
        }
        let i_min = ((du - gap) / -dv - prec).ceil().max(1.0);
        let c = (du / -dv - prec).ceil() - 1.0;
        if i_min <= c {
            let i: I = from_f64_trunc(i_min);
            ux = ux + i * vx.clone();
            du += i_min * dv;
            continue;
        }
        if -dv > du {
            let t = ((-dv - prec) / du).floor();
            if t >= 1.0 {
                let ti: I = from_f64_trunc(t);
                vx = vx + ti * ux.clone();
                dv += t * du;
                continue;
            }
        }
        if c >= 1.0 {
            let ci: I = from_f64_trunc(c);
            ux = ux + ci * vx.clone();
            du += c * dv;
            continue;
        }
        break;
    }
    recs
}

/// The four float record lists of one anchored real line, original frame.
pub(crate) struct RealRecordSet<I> {
    pub fwd_min: Vec<(I, f64)>,
    pub rev_min: Vec<(I, f64)>,
    pub fwd_max: Vec<(I, f64)>,
    pub rev_max: Vec<(I, f64)>,
}

pub(crate) fn record_set_real<I: DslInteger>(
    alpha: f64,
    beta: f64,
    n: &I,
    prec: f64,
) -> RealRecordSet<I> {
    let am = (1.0 - alpha).rem_euclid(1.0);
    let rm = (alpha * as_f64(n) + beta).rem_euclid(1.0);
    let mirror = |recs: Vec<(I, f64)>| -> Vec<(I, f64)> {
        recs.into_iter()
            .map(|(x, rho)| (n.clone() - x, rho))
            .collect()
    };
    RealRecordSet {
        fwd_min: residue_records_real(alpha, beta, n, prec),
        rev_min: mirror(residue_records_real(am, rm, n, prec)),
        fwd_max: ascend_records_real(alpha, beta, n, prec),
        rev_max: mirror(ascend_records_real(am, rm, n, prec)),
    }
}

/// Float twin of the pencil query: smallest admissible ray of level `k`
/// weakly below `(alpha, beta)`, or None.
pub(crate) fn pencil_ray_real<I: DslInteger>(
    alpha: f64,
    beta: f64,
    n: &I,
    bracket: &FareyBracket<I>,
    k: &I,
    prec: f64,
) -> Option<Ray<I>> {
    let (fp, fq, gq) = (&bracket.fp, &bracket.fq, &bracket.gq);
    let smallest = smart_ray_of_smallest_slope(fp, fq, gq, k);
    let delta = alpha - as_f64(fp) / as_f64(fq);
    if delta <= prec {
        return None;
    }
    let need = as_f64(k) / as_f64(fq) - beta - as_f64(&smallest.x) * delta;
    let j: I = if need <= 0.0 {
        I::zero()
    } else {
        from_f64_trunc((need / (as_f64(fq) * delta) - prec).ceil())
    };
    let x0 = smallest.x.clone() + j * fq.clone();
    let highest = ray_of_highest_slope(fp, fq, k, &smallest, n);
    if x0 > highest.x {
        return None;
    }
    Some(Ray::through_vertex(fp, fq, k, &x0))
}

/// Feasibility of `(p, q, m)` against the digitization of the real line.
///
/// The tested value `p*x - q*floor(alpha*x + beta) + m` is an integer, so
/// half-unit thresholds absorb the float noise of the record evaluation.
fn feasible_real<I: DslInteger>(
    alpha: f64,
    beta: f64,
    p: &I,
    q: &I,
    m: &I,
    recs: &RealRecordSet<I>,
) -> bool {
    let (pf, qf, mf) = (as_f64(p), as_f64(q), as_f64(m));
    let e = pf - qf * alpha;
    let c = mf - qf * beta;
    let (mins, maxs) = if e >= 0.0 {
        (&recs.fwd_min, &recs.rev_max)
    } else {
        (&recs.rev_min, &recs.fwd_max)
    };
    let eval = |(x, rho): &(I, f64)| e * as_f64(x) + qf * rho;
    let mn = mins.iter().map(&eval).fold(f64::INFINITY, f64::min);
    let mx = maxs.iter().map(&eval).fold(f64::NEG_INFINITY, f64::max);
    mn + c > -0.5 && mx + c < qf - 0.5
}

/// Minimal characteristics of `y(x) = floor(alpha*x + beta)` over `[0, n]`,
/// anchored (`beta` in `[0, 1)`, `alpha` in `[0, 1)`).
pub(crate) fn minimal_characteristics_real<I: DslInteger>(
    alpha: f64,
    beta: f64,
    n: &I,
    prec: f64,
) -> (I, I, I) {
    let zero = I::zero();
    let one = I::one();
    if n.is_zero() || alpha < prec {
        return (zero, one, I::zero());
    }
    let bracket = farey_bracket_real(alpha, n, prec);
    let fwd = residue_records_real(alpha, beta, n, prec);
    let (xmin, rhomin) = fwd[fwd.len() - 1].clone();
    let delta = alpha - as_f64(&bracket.fp) / as_f64(&bracket.fq);
    let ray = if rhomin <= prec {
        // Onto: the query sits on the ray of its nearest column
        let y0: I = from_f64_trunc((alpha * as_f64(&xmin) + beta + prec).floor());
        Ray::new(xmin, y0)
    } else if bracket.exact || delta <= prec {
        let y0: I = from_f64_trunc((alpha * as_f64(&xmin) + beta).floor());
        Ray::new(xmin, y0)
    } else {
        // pencil-existence ladder, as in the exact navigation
        let exists = |k: &I| pencil_ray_real(alpha, beta, n, &bracket, k, prec).is_some();
        let mut lo = zero.clone();
        let mut hi = one.clone();
        while exists(&hi) {
            lo = hi.clone();
            hi = hi.clone() + hi;
        }
        let two = one.clone() + one.clone();
        while hi.clone() - lo.clone() > one {
            let mid = (lo.clone() + hi.clone()).div_floor(&two);
            if exists(&mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        match pencil_ray_real(alpha, beta, n, &bracket, &lo, prec) {
            Some(ray) => ray,
            None => Ray::new(zero.clone(), zero.clone()),
        }
    };
    let recs = record_set_real(alpha, beta, n, prec);
    find_solution_real(alpha, beta, n, &ray, &recs, prec)
}

/// Accelerated Stern-Brocot descent toward `alpha`, candidates anchored at
/// the boundary ray; float twin of the exact extraction.
fn find_solution_real<I: DslInteger>(
    alpha: f64,
    beta: f64,
    n: &I,
    ray: &Ray<I>,
    recs: &RealRecordSet<I>,
    prec: f64,
) -> (I, I, I) {
    let zero = I::zero();
    let one = I::one();
    let cand = |p: &I, q: &I| -> Option<(I, I, I)> {
        let m = q.clone() * ray.y.clone() - p.clone() * ray.x.clone();
        if m < zero || m >= *q {
            return None;
        }
        feasible_real(alpha, beta, p, q, &m, recs).then(|| (p.clone(), q.clone(), m))
    };
    for (p, q) in [(zero.clone(), one.clone()), (one.clone(), one.clone())] {
        if let Some(t) = cand(&p, &q) {
            return t;
        }
    }
    let (mut p1, mut q1, mut p2, mut q2) = (zero.clone(), one.clone(), one.clone(), one.clone());
    let search_run = |bp: &I, bq: &I, sp: &I, sq: &I, k_run: &I| -> Option<(I, I, I)> {
        let at = |k: &I| {
            (
                bp.clone() + k.clone() * sp.clone(),
                bq.clone() + k.clone() * sq.clone(),
            )
        };
        let (pk, qk) = at(k_run);
        cand(&pk, &qk)?;
        let (mut lo_k, mut hi_k) = (one.clone(), k_run.clone());
        let two = one.clone() + one.clone();
        while lo_k < hi_k {
            let mid = (lo_k.clone() + hi_k.clone()).div_floor(&two);
            let (pm, qm) = at(&mid);
            if cand(&pm, &qm).is_some() {
                hi_k = mid;
            } else {
                lo_k = mid + one.clone();
            }
        }
        let (pf, qf) = at(&lo_k);
        cand(&pf, &qf)
    };
    loop {
        let num_lo = alpha * as_f64(&q1) - as_f64(&p1);
        let num_hi = as_f64(&p2) - alpha * as_f64(&q2);
        if num_lo <= prec {
            if let Some(t) = cand(&p1, &q1) {
                return t;
            }
            break;
        }
        if num_hi <= prec {
            if let Some(t) = cand(&p2, &q2) {
                return t;
            }
            break;
        }
        let mut progressed = false;
        let k_alpha: I = from_f64_trunc(num_lo / num_hi);
        let k_cap = (n.clone() - q1.clone()).div_floor(&q2);
        let lo_capped = k_cap <= k_alpha;
        let k_run = k_alpha.min(k_cap);
        if k_run >= one {
            if let Some(t) = search_run(&p1, &q1, &p2, &q2, &k_run) {
                return t;
            }
            p1 = p1 + k_run.clone() * p2.clone();
            q1 = q1 + k_run * q2.clone();
            progressed = true;
        }
        let num_lo = alpha * as_f64(&q1) - as_f64(&p1);
        let num_hi = as_f64(&p2) - alpha * as_f64(&q2);
        if num_lo <= prec {
            if let Some(t) = cand(&p1, &q1) {
                return t;
            }
            break;
        }
        let k_alpha: I = from_f64_trunc(num_hi / num_lo);
        let k_cap = (n.clone() - q2.clone()).div_floor(&q1);
        let hi_capped = k_cap <= k_alpha;
        let k_run = k_alpha.min(k_cap);
        if k_run >= one {
            if let Some(t) = search_run(&p2, &q2, &p1, &q1, &k_run) {
                return t;
            }
            p2 = p2 + k_run.clone() * p1.clone();
            q2 = q2 + k_run * q1.clone();
            progressed = true;
        }
        if lo_capped && hi_capped && !progressed {
            break;
        }
    }
    // Last resort under degraded precision: the flat interpretation.
    (zero, one.clone(), I::zero())
}
