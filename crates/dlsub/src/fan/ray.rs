//! Rays of the Farey fan and the position predicate.
//!
//! In the dual plane (alpha, beta), every lattice point `(x0, y0)` of the
//! primal plane becomes the line `beta = -x0*alpha + y0`, called a ray. The
//! Farey fan of order n is the arrangement of the rays with `0 <= x0 <= n`
//! over the strip `0 <= beta < 1`; its cells are the digitization classes of
//! length-(n+1) segments. Classifying a dual query point against a ray is
//! the one geometric predicate the whole navigation runs on.

use crate::num::DslInteger;

/// A ray: the dual line `beta = -x*alpha + y` of the lattice point `(x, y)`.
///
/// Small immutable value, owned by the fan navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ray<I> {
    pub x: I,
    pub y: I,
}

impl<I: DslInteger> Ray<I> {
    /// Ray through the lattice point `(x0, y0)`.
    #[inline]
    pub fn new(x0: I, y0: I) -> Self {
        Self { x: x0, y: y0 }
    }

    /// Ray of slope `-slope` through the fan vertex `(p/q, r/q)`.
    ///
    /// Requires `q | r + p*slope`, which holds exactly for the slopes of the
    /// pencil of rays through that vertex.
    pub fn through_vertex(p: &I, q: &I, r: &I, slope: &I) -> Self {
        let num = r.clone() + p.clone() * slope.clone();
        debug_assert!(num.mod_floor(q).is_zero());
        Self {
            x: slope.clone(),
            y: num.div_floor(q),
        }
    }

    /// The pencil level of this ray at abscissa `p/q`: the integer `h` with
    /// the ray passing through `(p/q, h/q)`.
    #[inline]
    pub fn level(&self, p: &I, q: &I) -> I {
        self.y.clone() * q.clone() - self.x.clone() * p.clone()
    }
}

/// Position of a dual query point relative to a ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Above,
    Below,
    Onto,
}

/// Classify the exact rational query `(a/b, mu/b)` against `ray`.
///
/// Integer cross-product sign; no rounding.
pub fn position_wrt_ray<I: DslInteger>(ray: &Ray<I>, a: &I, b: &I, mu: &I) -> Position {
    let s = mu.clone() + a.clone() * ray.x.clone() - b.clone() * ray.y.clone();
    if s.is_zero() {
        Position::Onto
    } else if s.is_positive() {
        Position::Above
    } else {
        Position::Below
    }
}

/// Classify the real query `(alpha, beta)` against `ray`, with tolerance.
///
/// A query within `precision` of the ray is Onto; this is the one place the
/// navigation trades exactness for speed, and too tight a precision may
/// misclassify a grazing query as Above or Below.
pub fn position_wrt_ray_real<I: DslInteger>(
    ray: &Ray<I>,
    alpha: f64,
    beta: f64,
    precision: f64,
) -> Position {
    let s = beta + alpha * crate::num::as_f64(&ray.x) - crate::num::as_f64(&ray.y);
    if s.abs() <= precision {
        Position::Onto
    } else if s > 0.0 {
        Position::Above
    } else {
        Position::Below
    }
}
