//! Core-Domänentypen: Kurve, Lane-Referenz, Topologie-Schnittstelle, Lane-Anpassung.

pub mod curve;
pub mod customization;
pub mod error;
pub mod lane;
/// In-Memory-Referenz-Topologie (Nodes, Segmente, Lanes)
pub mod network;
pub mod record;
pub mod source;

pub use curve::{Curve, CONTROL_POINT_COUNT};
pub use customization::{LaneCustomization, RecomputeMode};
pub use error::LaneError;
pub use lane::{LaneId, LaneRef, SegmentId};
pub use network::{LaneNetwork, NetLane, NetNode, NetSegment, NodeId};
pub use record::LaneRecord;
pub use source::{
    average_lane_length, refresh_average_length, LaneDefaults, LaneGeometrySource,
    SegmentCorner, SegmentGeometry,
};
