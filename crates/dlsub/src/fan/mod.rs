//! The Farey fan: dual representation of digitization classes.
//!
//! Purpose
//! - Provide the duality-based engine for minimal characteristics. In the
//!   dual (slope, intercept) plane, lattice points become rays and the
//!   digitization classes of length-(n+1) segments are the cells of the
//!   arrangement of rays indexed by the Farey series of order n. Locating
//!   the query's cell costs O(log n) position predicates.
//!
//! Layout
//! - `ray`: the `Ray` value type and the Above/Below/Onto predicate.
//! - `navigate`: Farey successor, Bezout-derived pencil rays, the
//!   dichotomy, ray localization, and solution extraction (exact queries).
//! - `real`: the same navigation over `f64` for real-slope queries, every
//!   comparison taken against the caller's precision.

mod navigate;
mod ray;
mod real;

pub use navigate::{
    next_term_in_farey_series_euclid, ray_of_highest_slope, ray_sup, smart_first_dichotomy,
    smart_ray_of_smallest_slope, FareyBracket,
};
pub use ray::{position_wrt_ray, position_wrt_ray_real, Position, Ray};

pub(crate) use navigate::{
    find_solution_without_fractions, localize_ray, minimal_characteristics, short_find_solution,
};
pub(crate) use real::minimal_characteristics_real;

#[cfg(test)]
mod tests;
