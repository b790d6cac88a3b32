//! Entry point: minimal characteristics of a DSL subsegment.
//!
//! `DslSubsegment` normalizes the input (endpoint order, anchoring,
//! negative and steep slopes), dispatches to one of the two engines, and
//! stores the resulting triple.
//!
//! Anchoring convention
//! - The result is expressed in the frame whose origin is the left endpoint
//!   of [A, B]. In that frame the triple is canonical (`gcd(a, b) = 1`,
//!   `0 <= mu < b`) and every point `(x, y)` of the subsegment satisfies
//!   `0 <= a*(x - xl) - b*(y - yl) + mu < b` for the left endpoint
//!   `(xl, yl)`. Callers that want absolute-frame characteristics shift the
//!   intercept by `mu - a*xl + b*yl`.
//!
//! The two endpoints may be given in either order. A = B yields the trivial
//! triple `(0, 1, 0)`.

use core::fmt;

use crate::num::{as_f64, from_f64_trunc, DslInteger};
use crate::{fan, hull, Vec2};

/// Minimal characteristics of the subsegment [A, B] of a digital straight
/// line, computed in O(log max(|dx|, |dy|)).
#[derive(Clone, Debug)]
pub struct DslSubsegment<I> {
    a: I,
    b: I,
    mu: I,
}

impl<I: DslInteger> DslSubsegment<I> {
    /// Exact mode. The DSL is `0 <= a*x - b*y + mu < b` with `b > 0` and
    /// `0 <= mu < b`; `a_pt` and `b_pt` must lie on it (caller-checked, not
    /// validated on the hot path). `farey` selects the Farey-fan engine,
    /// otherwise the local-convex-hull engine runs.
    pub fn new_exact(a: I, b: I, mu: I, a_pt: Vec2<I>, b_pt: Vec2<I>, farey: bool) -> Self {
        let zero = I::zero();
        let one = I::one();
        debug_assert!(b > zero);
        let (left, right) = if a_pt.x <= b_pt.x {
            (a_pt, b_pt)
        } else {
            (b_pt, a_pt)
        };
        let n = right.x.clone() - left.x.clone();
        if n.is_zero() {
            return Self {
                a: zero,
                b: one,
                mu: I::zero(),
            };
        }
        // anchor at the left endpoint
        let mut r = a.clone() * left.x.clone() - b.clone() * left.y.clone() + mu.clone();
        debug_assert!(r >= zero && r < b, "left endpoint not on the DSL");
        debug_assert!({
            let rr = a.clone() * right.x.clone() - b.clone() * right.y.clone() + mu.clone();
            rr >= zero && rr < b
        });
        // negative slopes via the reflection y -> -y
        let neg = a < zero;
        let mut a = if neg {
            r = b.clone() - one.clone() - r;
            -a
        } else {
            a
        };
        // steep slopes via the integer part
        let q0 = a.div_floor(&b);
        a = a.mod_floor(&b);
        let (mut p, q, mut m) = if farey {
            fan::minimal_characteristics(&a, &b, &r, &n)
        } else {
            hull::minimal_characteristics(&a, &b, &r, &n)
        };
        p = p + q0 * q.clone();
        if neg {
            p = -p;
            m = q.clone() - one - m;
        }
        Self { a: p, b: q, mu: m }
    }

    /// Real mode: the line `y = alpha*x + beta`, the endpoints lying on its
    /// digitization `y(x) = floor(alpha*x + beta)`. Always navigates the
    /// Farey fan (the hull walk is not robust under floating predicates).
    /// Result accuracy is bounded by `precision`; queries within
    /// `precision` of a ray are classified Onto.
    pub fn new_real(alpha: f64, beta: f64, a_pt: Vec2<I>, b_pt: Vec2<I>, precision: f64) -> Self {
        let zero = I::zero();
        let one = I::one();
        let (left, right) = if a_pt.x <= b_pt.x {
            (a_pt, b_pt)
        } else {
            (b_pt, a_pt)
        };
        let n = right.x.clone() - left.x.clone();
        if n.is_zero() {
            return Self {
                a: zero,
                b: one,
                mu: I::zero(),
            };
        }
        let beta_anchor = alpha * as_f64(&left.x) + beta - as_f64(&left.y);
        let neg = alpha < 0.0;
        let (alpha, beta_anchor) = if neg {
            (-alpha, 1.0 - beta_anchor)
        } else {
            (alpha, beta_anchor)
        };
        let q0: I = from_f64_trunc(alpha.floor());
        let alpha0 = alpha - alpha.floor();
        let beta0 = beta_anchor.rem_euclid(1.0);
        let (mut p, q, mut m) = fan::minimal_characteristics_real(alpha0, beta0, &n, precision);
        p = p + q0 * q.clone();
        if neg {
            p = -p;
            m = q.clone() - one - m;
        }
        Self { a: p, b: q, mu: m }
    }

    /// First component of the result triple.
    pub fn a(&self) -> &I {
        &self.a
    }

    /// Second component of the result triple (always positive).
    pub fn b(&self) -> &I {
        &self.b
    }

    /// Intercept of the result triple, anchored at the left endpoint.
    pub fn mu(&self) -> &I {
        &self.mu
    }

    /// Structural validity of the stored triple: `b != 0` and
    /// `0 <= mu < b`. Does not re-verify the triple against [A, B].
    pub fn is_valid(&self) -> bool {
        !self.b.is_zero() && self.mu >= I::zero() && self.mu < self.b
    }
}

impl<I: DslInteger> fmt::Display for DslSubsegment<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.a, self.b, self.mu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::{draw_dsl, DslCfg, ReplayToken};
    use num_bigint::BigInt;
    use proptest::prelude::*;

    fn y_at(a: i64, b: i64, mu: i64, x: i64) -> i64 {
        num_integer::Integer::div_floor(&(a * x + mu), &b)
    }

    /// Reference search over all slopes with |p| <= q: smallest q first.
    fn brute(ys: &[i64]) -> (i64, i64, i64) {
        let n = ys.len() as i64 - 1;
        for q in 1..=(n + 1) {
            for p in -q..=q {
                if num_integer::gcd(p, q) != 1 {
                    continue;
                }
                let g: Vec<i64> = (0..=n).map(|x| q * ys[x as usize] - p * x).collect();
                let (mn, mx) = (*g.iter().min().unwrap(), *g.iter().max().unwrap());
                if mx - mn <= q - 1 {
                    return (p, q, mx);
                }
            }
        }
        unreachable!("every segment has minimal characteristics");
    }

    fn solve(a: i64, b: i64, mu: i64, pa: (i64, i64), pb: (i64, i64), farey: bool) -> DslSubsegment<i64> {
        DslSubsegment::new_exact(a, b, mu, Vec2::new(pa.0, pa.1), Vec2::new(pb.0, pb.1), farey)
    }

    fn check_instance(a: i64, b: i64, mu: i64, xa: i64, n: i64) {
        let ya = y_at(a, b, mu, xa);
        let xb = xa + n;
        let yb = y_at(a, b, mu, xb);
        let hull = solve(a, b, mu, (xa, ya), (xb, yb), false);
        let fan = solve(a, b, mu, (xa, ya), (xb, yb), true);
        assert_eq!(
            (hull.a, hull.b, hull.mu),
            (*fan.a(), *fan.b(), *fan.mu()),
            "engines disagree on ({a},{b},{mu}) x in [{xa},{xb}]"
        );
        let ys: Vec<i64> = (0..=n).map(|t| y_at(a, b, mu, xa + t) - ya).collect();
        let want = brute(&ys);
        assert_eq!((*fan.a(), *fan.b(), *fan.mu()), want);
        assert!(fan.is_valid());
        assert_eq!(num_integer::gcd(*fan.a(), *fan.b()), 1);
    }

    #[test]
    fn full_period_between_leaning_points_returns_input() {
        // a whole period aligned at upper leaning points pins the slope
        for farey in [false, true] {
            let s = solve(5, 8, 0, (0, 0), (8, 5), farey);
            assert_eq!((*s.a(), *s.b(), *s.mu()), (5, 8, 0));
            assert!(s.is_valid());
            // same pattern shifted to start at the leaning point (1,1)
            let t = solve(5, 8, 3, (1, 1), (9, 6), farey);
            assert_eq!((*t.a(), *t.b(), *t.mu()), (5, 8, 0));
        }
    }

    #[test]
    fn unaligned_full_period_still_tightens() {
        // [0,8] of (5,8,3) is not leaning-aligned; floor((3x+2)/5) digitizes
        // to the same nine points, so the minimal denominator drops to 5.
        for farey in [false, true] {
            let s = solve(5, 8, 3, (0, 0), (8, 5), farey);
            assert_eq!((*s.a(), *s.b(), *s.mu()), (3, 5, 2));
        }
    }

    #[test]
    fn short_subsegment_tightens() {
        // the head of the same line is a flatter segment with smaller b
        for farey in [false, true] {
            let s = solve(5, 8, 3, (0, 0), (3, 2), farey);
            assert_eq!((*s.a(), *s.b(), *s.mu()), (1, 2, 1));
            assert!(*s.b() < 8);
        }
    }

    #[test]
    fn golden_ratio_digitization() {
        let s = DslSubsegment::<i64>::new_real(
            0.618_033_988_75,
            0.0,
            Vec2::new(0, 0),
            Vec2::new(13, 8),
            1e-10,
        );
        assert_eq!((*s.a(), *s.b()), (8, 13));
        assert!(s.is_valid());
    }

    #[test]
    fn degenerate_single_point() {
        for farey in [false, true] {
            let s = solve(5, 8, 3, (4, 2), (4, 2), farey);
            assert_eq!((*s.a(), *s.b(), *s.mu()), (0, 1, 0));
            assert!(s.is_valid());
        }
    }

    #[test]
    fn endpoint_order_is_irrelevant() {
        let fwd = solve(3, 7, 2, (-2, -1), (9, 4), true);
        let rev = solve(3, 7, 2, (9, 4), (-2, -1), true);
        assert_eq!((*fwd.a(), *fwd.b(), *fwd.mu()), (*rev.a(), *rev.b(), *rev.mu()));
    }

    #[test]
    fn exhaustive_small_grid() {
        for b in 1i64..=8 {
            for a in -(b - 1)..b {
                for mu in 0..b {
                    for xa in [-3i64, 0, 2] {
                        for n in 1..=6 {
                            check_instance(a, b, mu, xa, n);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn steep_slopes_reduce_by_integer_part() {
        // slope 13/5 = 2 + 3/5; the fractional part tightens to 1/2 on this
        // short span and the integer part rides back in: 1 + 2*2 = 5 halves
        let s = solve(13, 5, 2, (0, 0), (5, 13), true);
        let h = solve(13, 5, 2, (0, 0), (5, 13), false);
        assert_eq!((*s.a(), *s.b(), *s.mu()), (*h.a(), *h.b(), *h.mu()));
        assert_eq!((*s.a(), *s.b(), *s.mu()), (5, 2, 1));
        // containment over the whole span
        for x in 0..=5 {
            let y = y_at(13, 5, 2, x);
            let v = s.a() * x - s.b() * y + s.mu();
            assert!(v >= 0 && v < *s.b());
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let s1 = solve(131, 320, 183, (0, 0), (34, 14), true);
        let s2 = solve(131, 320, 183, (0, 0), (34, 14), true);
        assert_eq!((*s1.a(), *s1.b(), *s1.mu()), (*s2.a(), *s2.b(), *s2.mu()));
    }

    #[test]
    fn display_matches_triple() {
        let s = solve(5, 8, 0, (0, 0), (8, 5), true);
        assert_eq!(s.to_string(), "(5,8,0)");
    }

    #[test]
    fn bigint_instantiation_agrees_with_i64() {
        let cases = [
            (5i64, 8i64, 3i64, (0i64, 0i64), (8i64, 5i64)),
            (131, 320, 183, (0, 0), (34, 14)),
            (-7, 12, 5, (-4, 2), (11, -6)),
        ];
        for (a, b, mu, pa, pb) in cases {
            let ya = y_at(a, b, mu, pa.0);
            let yb = y_at(a, b, mu, pb.0);
            let small = solve(a, b, mu, (pa.0, ya), (pb.0, yb), true);
            let big = DslSubsegment::<BigInt>::new_exact(
                BigInt::from(a),
                BigInt::from(b),
                BigInt::from(mu),
                Vec2::new(BigInt::from(pa.0), BigInt::from(ya)),
                Vec2::new(BigInt::from(pb.0), BigInt::from(yb)),
                true,
            );
            assert_eq!(big.a(), &BigInt::from(*small.a()));
            assert_eq!(big.b(), &BigInt::from(*small.b()));
            assert_eq!(big.mu(), &BigInt::from(*small.mu()));
        }
    }

    #[test]
    fn sampled_instances_cross_check() {
        let cfg = DslCfg::default();
        for index in 0..200 {
            let inst = draw_dsl(&cfg, ReplayToken { seed: 42, index });
            let hull = DslSubsegment::new_exact(inst.a, inst.b, inst.mu, inst.a_pt, inst.b_pt, false);
            let fan = DslSubsegment::new_exact(inst.a, inst.b, inst.mu, inst.a_pt, inst.b_pt, true);
            assert_eq!((*hull.a(), *hull.b(), *hull.mu()), (*fan.a(), *fan.b(), *fan.mu()));
            assert!(fan.is_valid());
        }
    }

    #[test]
    fn real_mode_agrees_with_exact_on_rational_slopes() {
        for (a, b, mu, n) in [(2i64, 5, 4, 2), (89, 95, 25, 25), (121, 192, 63, 25)] {
            let yb = y_at(a, b, mu, n);
            let exact = solve(a, b, mu, (0, 0), (n, yb), true);
            let real = DslSubsegment::<i64>::new_real(
                a as f64 / b as f64 + 1e-13,
                mu as f64 / b as f64,
                Vec2::new(0, 0),
                Vec2::new(n, yb),
                1e-10,
            );
            assert_eq!((*real.a(), *real.b(), *real.mu()), (*exact.a(), *exact.b(), *exact.mu()));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn engines_agree_and_contain(
            b in 2i64..2000,
            a_raw in 0i64..4_000_000,
            mu_raw in 0i64..4_000_000,
            xa in -500i64..500,
            n in 1i64..300,
        ) {
            let a = a_raw % b;
            let mu = mu_raw % b;
            let ya = y_at(a, b, mu, xa);
            let yb = y_at(a, b, mu, xa + n);
            let hull = solve(a, b, mu, (xa, ya), (xa + n, yb), false);
            let fan = solve(a, b, mu, (xa, ya), (xa + n, yb), true);
            prop_assert_eq!((*hull.a(), *hull.b(), *hull.mu()), (*fan.a(), *fan.b(), *fan.mu()));
            prop_assert!(fan.is_valid());
            prop_assert!(*fan.b() <= n + 1);
            prop_assert_eq!(num_integer::gcd(fan.a().abs(), *fan.b()), 1);
            // containment at every column
            for t in 0..=n {
                let y = y_at(a, b, mu, xa + t) - ya;
                let v = fan.a() * t - fan.b() * y + fan.mu();
                prop_assert!(v >= 0 && v < *fan.b());
            }
        }
    }
}
