pub mod aside;
pub mod camera;
pub mod components;
pub mod entity;
pub mod links;
pub mod overlay;
pub mod region;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod stage;

pub use camera::Camera2D;
pub use region::{Extent, WorldRegion};
pub use registry::WorldRegistry;
pub use session::Session;
pub use stage::Stage;
