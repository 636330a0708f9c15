//! Lane Path Editor Library.
//! Lane-Kurven aus prozeduraler Basis plus persistentem Benutzer-Delta,
//! als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;
pub mod xml;

pub use app::{
    process_topology_updates, ControlPointHandle, CurveEditHandles, CustomizationRegistry,
    EditMode, LaneCustomizationStore, LaneEditSession, TopologyUpdateStats,
};
pub use core::{
    Curve, LaneCustomization, LaneDefaults, LaneError, LaneGeometrySource, LaneNetwork,
    LaneRecord, LaneRef, RecomputeMode, SegmentGeometry, SegmentId,
};
pub use shared::EditorOptions;
pub use xml::{parse_lane_customizations, write_lane_customizations};
