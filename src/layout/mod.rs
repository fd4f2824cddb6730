//! Layout generation: the two fixed positions of every item
//!
//! Runs once when a scene is built. Each item gets a scattered "chaos"
//! position and a "target" position on the tree silhouette, a necklace
//! strand, or the interior; nothing here is touched again per frame.

pub mod generator;
pub mod profile;
pub mod sampling;
pub mod star;

pub use generator::{ItemKind, LayoutGenerator, LayoutItem, NecklaceStrand, SceneLayout};
pub use profile::TreeProfile;
pub use star::star_outline;
