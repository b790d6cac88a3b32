//! Local convex hulls along a digital line (continued-fraction walk).
//!
//! Purpose
//! - Provide the hull-based engine for minimal characteristics: the convex
//!   hull vertices adjacent to a digital line of slope `a/b` are exactly the
//!   convergents of the continued fraction of `a/b`, so walking them costs
//!   O(log min(a, b)) steps instead of a linear scan.
//!
//! Layout
//! - `walk`: the residue record walk and its arithmetic primitives
//!   (`intersection`, `intersection_vertical`, `update`), plus the hull
//!   surface (`convex_hull_approx`, `lower_convex_hull`, ...).
//! - `engine`: turns the walked chains into the minimal triple via exact
//!   slope calipers and a Stern-Brocot search.
//!
//! References
//! - Charrier, Buzer: Discrete Applied Mathematics, 2009.
//! - Har-Peled: Computational Geometry: Theory and Applications, 1998.

mod engine;
mod walk;

pub use walk::{
    convex_hull_approx, convex_hull_approx_two_points, convex_hull_har_peled, intersection,
    intersection_real, intersection_vertical, lower_convex_hull, update,
};

pub(crate) use engine::minimal_characteristics;
pub(crate) use walk::{record_set, y_of, RecordSet};
