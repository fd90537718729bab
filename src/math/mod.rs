//! Mathematical utilities

pub mod index_box;

pub use index_box::IndexBox;

use crate::core::types::DVec3;

/// Round each component to the nearest integer, ties toward +infinity.
///
/// This is `floor(x + 0.5)`, so `-2.5` rounds to `-2` while `f64::round`
/// would give `-3`. World-space paint points go through this.
pub fn round_half_up(v: DVec3) -> DVec3 {
    (v + DVec3::splat(0.5)).floor()
}
