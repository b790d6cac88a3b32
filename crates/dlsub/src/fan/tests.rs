use num_integer::Integer;

use super::real::record_set_real;
use super::*;
use crate::hull::record_set;

/// All reduced fractions p/q with q <= n in [0, 1], ascending.
fn farey_series(n: i64) -> Vec<(i64, i64)> {
    let mut fr: Vec<(i64, i64)> = Vec::new();
    for q in 1..=n {
        for p in 0..=q {
            if num_integer::gcd(p, q) == 1 {
                fr.push((p, q));
            }
        }
    }
    fr.sort_by(|x, y| (x.0 * y.1).cmp(&(y.0 * x.1)));
    fr
}

#[test]
fn farey_successor_matches_enumeration() {
    for n in 1i64..=9 {
        let series = farey_series(n);
        for w in series.windows(2) {
            let (fp, fq) = w[0];
            assert_eq!(
                next_term_in_farey_series_euclid(&fp, &fq, &n),
                w[1],
                "after {fp}/{fq} in F_{n}"
            );
        }
        // past the right end the series continues with (n+1)/n
        assert_eq!(next_term_in_farey_series_euclid(&1, &1, &n), (n + 1, n));
    }
}

#[test]
fn dichotomy_brackets_with_consecutive_fractions() {
    for b in 1i64..=12 {
        for a in 0..=b {
            for n in 1..=9 {
                let br = smart_first_dichotomy(&a, &b, &n);
                assert!(br.fq >= 1 && br.fq <= n, "a={a} b={b} n={n}");
                assert!(br.gq >= 1 && br.gq <= n);
                // consecutive: the Bezout identity of neighbours
                assert_eq!(br.fq * br.gp - br.fp * br.gq, 1, "a={a} b={b} n={n}");
                // f <= a/b < g
                assert!(br.fp * b <= a * br.fq);
                assert!(a * br.gq < br.gp * b);
                assert_eq!(br.exact, br.fp * b == a * br.fq);
                // consecutive in F_n: no mediant fits between
                assert!(br.fq + br.gq > n);
            }
        }
    }
}

#[test]
fn pencil_rays_from_bezout_data() {
    // 2/5 and 3/7 are consecutive in F_7
    let (fp, fq, gp, gq) = (2i64, 5, 3, 7);
    assert_eq!(fq * gp - fp * gq, 1);
    let n = 23i64;
    for h in 0..5 {
        let s = smart_ray_of_smallest_slope(&fp, &fq, &gq, &h);
        // through the vertex (2/5, h/5), smallest slope of the residue class
        assert_eq!(fq * s.y, h + fp * s.x);
        assert!(s.x >= 0 && s.x < fq);
        assert_eq!(s.x.mod_floor(&fq), (h * gq).mod_floor(&fq));
        let hi = ray_of_highest_slope(&fp, &fq, &h, &s, &n);
        assert_eq!(fq * hi.y, h + fp * hi.x);
        assert!(hi.x <= n && hi.x > n - fq);
        assert_eq!((hi.x - s.x).mod_floor(&fq), 0);
        assert_eq!(hi.level(&fp, &fq), h);
        // ray_sup steps to the next smaller slope of the same pencil
        let sup = ray_sup(&fp, &fq, &hi);
        assert_eq!(sup.x, hi.x - fq);
        assert_eq!(sup.level(&fp, &fq), h);
    }
}

#[test]
fn position_predicate_exact_and_real() {
    let ray = Ray::new(2i64, 1); // beta = -2*alpha + 1
    assert_eq!(position_wrt_ray(&ray, &1i64, &2, &0), Position::Onto);
    assert_eq!(position_wrt_ray(&ray, &2i64, &4, &1), Position::Above);
    assert_eq!(position_wrt_ray(&ray, &1i64, &4, &1), Position::Below);
    assert_eq!(position_wrt_ray_real(&ray, 0.5, 0.0, 1e-9), Position::Onto);
    assert_eq!(position_wrt_ray_real(&ray, 0.5, 0.1, 1e-9), Position::Above);
    assert_eq!(position_wrt_ray_real(&ray, 0.4, 0.0, 1e-9), Position::Below);
    // a graze inside the tolerance reads Onto, outside it does not
    assert_eq!(position_wrt_ray_real(&ray, 0.5, 1e-12, 1e-9), Position::Onto);
    assert_eq!(position_wrt_ray_real(&ray, 0.5, 1e-6, 1e-9), Position::Above);
}

#[test]
fn localize_onto_short_circuits_to_the_zero_residue() {
    // (5,8,3) has residue zero at x = 1
    let n = 8i64;
    let bracket = smart_first_dichotomy(&5i64, &8, &n);
    let (ray, pos) = localize_ray(&5i64, &8, &3, &n, &bracket);
    assert_eq!(pos, Position::Onto);
    assert_eq!((ray.x, ray.y), (1, 1));
}

#[test]
fn localize_ladder_supports_the_cell_from_below() {
    // (5,8,2): the zero residue sits at x = 6, outside [0, 5]
    let n = 5i64;
    let bracket = smart_first_dichotomy(&5i64, &8, &n);
    assert_eq!(
        (bracket.fp, bracket.fq, bracket.gp, bracket.gq),
        (3, 5, 2, 3)
    );
    assert!(!bracket.exact);
    let (ray, pos) = localize_ray(&5i64, &8, &2, &n, &bracket);
    assert_eq!(pos, Position::Above);
    assert_eq!((ray.x, ray.y), (3, 2));
    assert_eq!(position_wrt_ray(&ray, &5, &8, &2), Position::Above);
}

#[test]
fn extraction_variants_agree() {
    for b in 2i64..=10 {
        for a in 1..b {
            if num_integer::gcd(a, b) != 1 {
                continue;
            }
            for r in 0..b {
                for n in 1..=8 {
                    let bracket = smart_first_dichotomy(&a, &b, &n);
                    let (ray, _) = localize_ray(&a, &b, &r, &n, &bracket);
                    let recs = record_set(&a, &b, &r, &n);
                    assert_eq!(
                        find_solution_without_fractions(&a, &b, &r, &n, &ray, &recs),
                        short_find_solution(&a, &b, &r, &n, &ray, &recs),
                        "a={a} b={b} r={r} n={n}"
                    );
                }
            }
        }
    }
}

#[test]
fn fan_engine_scenarios() {
    // leaning-aligned full period: nothing to tighten
    assert_eq!(minimal_characteristics(&5i64, &8, &0, &8), (5, 8, 0));
    // the unaligned window [0,8] of (5,8,3) admits denominator 5
    assert_eq!(minimal_characteristics(&5i64, &8, &3, &8), (3, 5, 2));
    // short subsegment tightens to denominator 3
    assert_eq!(minimal_characteristics(&5i64, &8, &2, &5), (2, 3, 0));
    // horizontal input short-circuits
    assert_eq!(minimal_characteristics(&0i64, &7, &4, &9), (0, 1, 0));
}

#[test]
fn real_record_walks_find_the_extrema() {
    for (a, b, r, n) in [(5i64, 8, 3, 12), (3, 7, 2, 9), (2, 9, 5, 9)] {
        let rho = |x: i64| (a * x + r).mod_floor(&b) as f64 / b as f64;
        let (mut first_min, mut last_min, mut first_max, mut last_max) = (0i64, 0, 0, 0);
        for x in 0..=n {
            if rho(x) < rho(first_min) {
                first_min = x;
            }
            if rho(x) <= rho(last_min) {
                last_min = x;
            }
            if rho(x) > rho(first_max) {
                first_max = x;
            }
            if rho(x) >= rho(last_max) {
                last_max = x;
            }
        }
        let fl = record_set_real(a as f64 / b as f64, r as f64 / b as f64, &n, 1e-9);
        let last = |recs: &[(i64, f64)]| recs[recs.len() - 1];
        let close = |u: f64, v: f64| (u - v).abs() < 1e-6;
        let (x, v) = last(&fl.fwd_min);
        assert_eq!(x, first_min, "fwd_min a={a} b={b} r={r} n={n}");
        assert!(close(v, rho(first_min)));
        let (x, v) = last(&fl.rev_min);
        assert_eq!(x, last_min, "rev_min a={a} b={b} r={r} n={n}");
        assert!(close(v, rho(last_min)));
        let (x, v) = last(&fl.fwd_max);
        assert_eq!(x, first_max, "fwd_max a={a} b={b} r={r} n={n}");
        assert!(close(v, rho(first_max)));
        let (x, v) = last(&fl.rev_max);
        assert_eq!(x, last_max, "rev_max a={a} b={b} r={r} n={n}");
        assert!(close(v, rho(last_max)));
    }
}
