pub mod placement;
pub mod vec;

pub use placement::*;
pub use vec::*;
