pub mod drawable2d;
pub mod transform;

pub use drawable2d::*;
pub use transform::*;
