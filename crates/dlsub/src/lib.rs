//! Minimal characteristics of digital straight line subsegments.
//!
//! A DSL (digital straight line) with characteristics `(a, b, mu)` and `b > 0`
//! is the set of integer points `{(x, y) : 0 <= a*x - b*y + mu < b}`. Given
//! two points A, B of a DSL, the subsegment [A, B] is itself a digital
//! straight segment, and it admits a unique primitive triple `(a', b', mu')`
//! with minimal `b'` describing exactly the same points. This crate computes
//! that triple in time logarithmic in the coordinate span, via two
//! independent engines:
//!
//! - [`hull`]: local convex hulls along the line, driven by a
//!   continued-fraction walk (Charrier–Buzer 2009, Har-Peled 1998);
//! - [`fan`]: dichotomic navigation of the dual Farey fan
//!   (Sivignon, DGCI 2013).
//!
//! [`subsegment::DslSubsegment`] is the entry point; it also accepts a real
//! line `y = alpha*x + beta` with a precision tolerance, in which case the
//! fan navigation runs on floating-point predicates.
//!
//! Integer arithmetic is abstracted behind [`num::DslInteger`], so the same
//! code runs on `i64`, `i128`, or an arbitrary-precision integer.

pub mod fan;
pub mod hull;
pub mod num;
pub mod rand;
pub mod subsegment;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Convenience re-exports; `Vec2` doubles as the lattice point type.
pub use nalgebra::Vector2 as Vec2;
pub use num::DslInteger;
pub use subsegment::DslSubsegment;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::fan::{Position, Ray};
    pub use crate::num::DslInteger;
    pub use crate::subsegment::DslSubsegment;
    pub use nalgebra::Vector2 as Vec2;
}
