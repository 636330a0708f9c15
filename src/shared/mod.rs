//! Geteilte, layer-neutrale Bausteine.
//!
//! Enthält die Kurven-Geometrie (von `core` und `app` genutzt) und die
//! Laufzeit-Optionen.

pub mod curve_geometry;
pub mod options;

pub use options::EditorOptions;
pub use options::{HANDLE_SIZE_WORLD, HITBOX_SCALE_PERCENT};
