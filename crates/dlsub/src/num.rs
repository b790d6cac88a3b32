//! Integer abstraction and small arithmetic helpers.
//!
//! The subsegment algorithms only need ring arithmetic, floor division,
//! gcd, and conversions to/from `f64` for the real-slope variant. Bundling
//! those bounds into one trait keeps every signature readable and makes the
//! crate independent of the concrete integer: `i32`/`i64`/`i128` work out of
//! the box, and so does `num_bigint::BigInt` when coordinates outgrow
//! machine words.
//!
//! Overflow note: intermediate products are bounded by `b * n * n` for a DSL
//! denominator `b` and a column span `n`. Pick an integer type with headroom
//! for that product (`i64` is fine up to `b ~ 1e9`, `n ~ 1e4`).

use core::fmt;

use num_integer::Integer;
use num_traits::{FromPrimitive, NumAssign, Signed, ToPrimitive};

/// Everything the subsegment algorithms require of an integer type.
pub trait DslInteger:
    Integer
    + Signed
    + NumAssign
    + FromPrimitive
    + ToPrimitive
    + Clone
    + fmt::Debug
    + fmt::Display
    + 'static
{
}

impl<T> DslInteger for T where
    T: Integer
        + Signed
        + NumAssign
        + FromPrimitive
        + ToPrimitive
        + Clone
        + fmt::Debug
        + fmt::Display
        + 'static
{
}

/// Ceiling division `n / d` for a strictly positive divisor.
#[inline]
pub(crate) fn ceil_div<I: DslInteger>(n: &I, d: &I) -> I {
    debug_assert!(*d > I::zero());
    -((-n.clone()).div_floor(d))
}

/// Modular inverse of `a` modulo `m`, for coprime `a`, `m` with `m > 0`.
///
/// Extended Euclid; the result is reduced into `[0, m)`.
pub(crate) fn mod_inverse<I: DslInteger>(a: &I, m: &I) -> I {
    debug_assert!(a.gcd(m).is_one());
    let (mut old_r, mut r) = (a.clone(), m.clone());
    let (mut old_s, mut s) = (I::one(), I::zero());
    while !r.is_zero() {
        let q = old_r.div_floor(&r);
        let next_r = old_r - q.clone() * r.clone();
        old_r = r;
        r = next_r;
        let next_s = old_s - q * s.clone();
        old_s = s;
        s = next_s;
    }
    old_s.mod_floor(m)
}

/// Lossy view of an integer as `f64` (used only by the real-slope path).
#[inline]
pub(crate) fn as_f64<I: DslInteger>(v: &I) -> f64 {
    v.to_f64().unwrap_or(f64::INFINITY)
}

/// Truncate a finite float back into `I`.
#[inline]
pub(crate) fn from_f64_trunc<I: DslInteger>(v: f64) -> I {
    debug_assert!(v.is_finite());
    I::from_f64(v.trunc()).unwrap_or_else(I::zero)
}
