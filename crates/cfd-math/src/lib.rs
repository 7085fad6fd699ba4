//! Special functions backing the closed-form distributions.

pub mod math;

pub use math::beta::*;
pub use math::gamma::*;
pub use math::stable::*;
