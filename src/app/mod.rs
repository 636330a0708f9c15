//! Application-Layer: Anpassungs-Cache, Handles, Edit-Session und Frame-Glue.

pub mod handles;
pub mod session;
pub mod store;
pub mod topology;

pub use handles::{ControlPointHandle, CurveEditHandles};
pub use session::{EditMode, LaneEditSession};
pub use store::{CustomizationRegistry, LaneCustomizationStore};
pub use topology::{process_topology_updates, TopologyUpdateStats};
