//! Recursive world fragment loading.
//!
//! A fragment is fetched through a [`FragmentSource`], parsed, and its
//! elements handed to a [`SceneHost`] which owns the session registries and
//! the live nodes.

pub mod error;
pub mod extension;
pub mod host;
pub mod loader;
pub mod source;

pub use error::{FetchError, LoadError};
pub use extension::{Extension, ExtensionContext, ExtensionRegistry};
pub use host::SceneHost;
pub use loader::{LoadReport, Loader, internal_links};
pub use source::FragmentSource;
