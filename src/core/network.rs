//! In-Memory-Straßennetz als Referenz-Implementierung von `LaneGeometrySource`.
//!
//! Segmente verbinden zwei Nodes, die Kanten laufen
//! parallel zur (optional vorgegebenen) Tangente an jedem Ende, das
//! "Middle"-Flag eines Nodes dient gleichzeitig als Glättungs-Flag der Ecke.
//! Topologie-Änderungen reihen das Segment in die Update-Queue ein; die
//! Host-Pipeline (`update_segment`) berechnet daraus die Standard-Lane-Kurven.

use super::curve::Curve;
use super::error::LaneError;
use super::lane::{LaneRef, SegmentId};
use super::source::{
    average_lane_length, LaneDefaults, LaneGeometrySource, SegmentCorner, SegmentGeometry,
};
use crate::shared::curve_geometry::{left_normal_xz, normalize_xz, right_normal_xz};
use glam::Vec3;
use indexmap::IndexSet;
use std::collections::HashMap;

/// ID eines Nodes im Straßennetz.
pub type NodeId = u32;

/// Knotenpunkt des Netzes.
#[derive(Debug, Clone, PartialEq)]
pub struct NetNode {
    pub id: NodeId,
    pub position: Vec3,
    /// Node setzt nur eine Straße fort (keine Kreuzung) → Kurven werden geglättet
    pub middle: bool,
}

/// Lebende Lane-Daten im Netz.
#[derive(Debug, Clone, PartialEq)]
pub struct NetLane {
    /// Standard-Offsets aus dem Lane-Katalog
    pub defaults: LaneDefaults,
    /// Aktuelle Kurve
    pub curve: Curve,
    /// Bogenlänge der aktuellen Kurve
    pub length: f32,
}

impl NetLane {
    fn new(defaults: LaneDefaults) -> Self {
        Self {
            defaults,
            curve: Curve::ZERO,
            length: 0.0,
        }
    }
}

/// Kante zwischen zwei Nodes mit eigenem Lane-Array.
#[derive(Debug, Clone, PartialEq)]
pub struct NetSegment {
    pub id: SegmentId,
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub half_width: f32,
    pub inverted: bool,
    /// Tangente am Start (in das Segment hinein); `None` = Sehnenrichtung
    pub start_direction: Option<Vec3>,
    /// Tangente am Ende (in das Segment hinein); `None` = Sehnenrichtung
    pub end_direction: Option<Vec3>,
    pub lanes: Vec<NetLane>,
    pub average_length: f32,
}

/// In-Memory-Straßennetz.
#[derive(Debug, Clone, Default)]
pub struct LaneNetwork {
    nodes: HashMap<NodeId, NetNode>,
    segments: HashMap<SegmentId, NetSegment>,
    /// Angeforderte Segment-Updates in Anforderungs-Reihenfolge
    update_queue: IndexSet<SegmentId>,
    next_segment_id: SegmentId,
}

impl LaneNetwork {
    /// Erstellt ein leeres Netz.
    pub fn new() -> Self {
        Self {
            next_segment_id: 1,
            ..Self::default()
        }
    }

    /// Fügt einen Node hinzu (ersetzt einen bestehenden mit gleicher ID).
    pub fn add_node(&mut self, id: NodeId, position: Vec3, middle: bool) {
        self.nodes.insert(
            id,
            NetNode {
                id,
                position,
                middle,
            },
        );
        self.queue_segments_of_node(id);
    }

    /// Entfernt einen Node. Angrenzende Segmente bleiben bis zum Aufräumen
    /// inkonsistent (`LaneError::MissingNode`).
    pub fn remove_node(&mut self, id: NodeId) -> Option<NetNode> {
        let removed = self.nodes.remove(&id);
        if removed.is_some() {
            self.queue_segments_of_node(id);
        }
        removed
    }

    /// Verschiebt einen Node und reiht alle angrenzenden Segmente ein.
    pub fn move_node(&mut self, id: NodeId, position: Vec3) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if node.position == position {
            return true;
        }
        node.position = position;
        self.queue_segments_of_node(id);
        true
    }

    /// Setzt das Middle-Flag eines Nodes.
    pub fn set_node_middle(&mut self, id: NodeId, middle: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.middle = middle;
        self.queue_segments_of_node(id);
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&NetNode> {
        self.nodes.get(&id)
    }

    /// Fügt ein Segment mit den gegebenen Lanes hinzu und berechnet deren Kurven.
    pub fn add_segment(
        &mut self,
        start_node: NodeId,
        end_node: NodeId,
        half_width: f32,
        lanes: Vec<LaneDefaults>,
    ) -> Result<SegmentId, LaneError> {
        let id = self.next_segment_id;
        self.next_segment_id += 1;
        self.segments.insert(
            id,
            NetSegment {
                id,
                start_node,
                end_node,
                half_width,
                inverted: false,
                start_direction: None,
                end_direction: None,
                lanes: lanes.into_iter().map(NetLane::new).collect(),
                average_length: 0.0,
            },
        );
        self.update_segment(id)?;
        Ok(id)
    }

    /// Entfernt ein Segment samt Lanes.
    pub fn remove_segment(&mut self, id: SegmentId) -> Option<NetSegment> {
        self.update_queue.shift_remove(&id);
        self.segments.remove(&id)
    }

    /// Setzt das Invert-Flag eines Segments.
    pub fn set_inverted(&mut self, id: SegmentId, inverted: bool) -> Result<(), LaneError> {
        self.segment_mut(id)?.inverted = inverted;
        self.update_queue.insert(id);
        Ok(())
    }

    /// Setzt die End-Tangenten eines Segments (jeweils in das Segment hinein).
    pub fn set_segment_directions(
        &mut self,
        id: SegmentId,
        start_direction: Option<Vec3>,
        end_direction: Option<Vec3>,
    ) -> Result<(), LaneError> {
        let segment = self.segment_mut(id)?;
        segment.start_direction = start_direction.map(|d| normalize_xz(d).0);
        segment.end_direction = end_direction.map(|d| normalize_xz(d).0);
        self.update_queue.insert(id);
        Ok(())
    }

    pub fn segment(&self, id: SegmentId) -> Option<&NetSegment> {
        self.segments.get(&id)
    }

    /// Alle Segment-IDs, aufsteigend sortiert.
    pub fn segment_ids(&self) -> Vec<SegmentId> {
        let mut ids: Vec<SegmentId> = self.segments.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Durchschnittliche Lane-Länge eines Segments.
    pub fn average_length(&self, id: SegmentId) -> Option<f32> {
        self.segments.get(&id).map(|s| s.average_length)
    }

    /// True wenn für das Segment ein Update angefordert ist.
    pub fn has_queued_update(&self, id: SegmentId) -> bool {
        self.update_queue.contains(&id)
    }

    /// Entnimmt alle angeforderten Segment-Updates.
    pub fn take_queued_updates(&mut self) -> Vec<SegmentId> {
        self.update_queue.drain(..).collect()
    }

    /// Host-Pipeline: berechnet die Standard-Kurven aller Lanes eines Segments.
    ///
    /// Überschreibt die lebenden Kurven ohne Rücksicht auf Anpassungen; diese
    /// werden danach über `recompute_base`/`apply_shift` wieder aufgelegt.
    pub fn update_segment(&mut self, id: SegmentId) -> Result<(), LaneError> {
        let geometry = self.segment_geometry(id)?;
        let segment = self.segment_mut(id)?;
        for lane in &mut segment.lanes {
            lane.curve = geometry.lane_curve(lane.defaults.lateral, lane.defaults.vertical);
            lane.length = lane.curve.length();
        }
        let lengths: Vec<f32> = segment.lanes.iter().map(|l| l.length).collect();
        segment.average_length = average_lane_length(&lengths);
        Ok(())
    }

    fn queue_segments_of_node(&mut self, node_id: NodeId) {
        let mut touched: Vec<SegmentId> = self
            .segments
            .values()
            .filter(|s| s.start_node == node_id || s.end_node == node_id)
            .map(|s| s.id)
            .collect();
        touched.sort_unstable();
        self.update_queue.extend(touched);
    }

    fn segment_ref(&self, id: SegmentId) -> Result<&NetSegment, LaneError> {
        self.segments.get(&id).ok_or(LaneError::UnknownSegment(id))
    }

    fn segment_mut(&mut self, id: SegmentId) -> Result<&mut NetSegment, LaneError> {
        self.segments.get_mut(&id).ok_or(LaneError::UnknownSegment(id))
    }

    fn end_nodes(&self, segment: &NetSegment) -> Result<(&NetNode, &NetNode), LaneError> {
        let lookup = |node_id: NodeId| {
            self.nodes.get(&node_id).ok_or(LaneError::MissingNode {
                segment_id: segment.id,
                node_id,
            })
        };
        Ok((lookup(segment.start_node)?, lookup(segment.end_node)?))
    }

    fn lane_ref(&self, lane: &LaneRef) -> Result<&NetLane, LaneError> {
        self.check_lane(lane)?;
        Ok(&self.segment_ref(lane.segment_id())?.lanes[lane.lane_index()])
    }
}

impl LaneGeometrySource for LaneNetwork {
    fn segment_geometry(&self, segment_id: SegmentId) -> Result<SegmentGeometry, LaneError> {
        let segment = self.segment_ref(segment_id)?;
        let (start, end) = self.end_nodes(segment)?;

        let (chord, _) = normalize_xz(end.position - start.position);
        let start_dir = segment.start_direction.unwrap_or(chord);
        let end_dir = segment.end_direction.unwrap_or(-chord);
        let half_width = segment.half_width;

        let corner = |origin: Vec3, direction: Vec3, offset: Vec3| SegmentCorner {
            position: origin + offset * half_width,
            direction,
        };

        Ok(SegmentGeometry {
            start_left: corner(start.position, start_dir, left_normal_xz(start_dir)),
            start_right: corner(start.position, start_dir, right_normal_xz(start_dir)),
            end_left: corner(end.position, end_dir, left_normal_xz(end_dir)),
            end_right: corner(end.position, end_dir, right_normal_xz(end_dir)),
            half_width,
            inverted: segment.inverted,
            smooth_start: start.middle,
            smooth_end: end.middle,
        })
    }

    fn lane_count(&self, segment_id: SegmentId) -> Result<usize, LaneError> {
        Ok(self.segment_ref(segment_id)?.lanes.len())
    }

    fn lane_defaults(&self, lane: &LaneRef) -> Result<LaneDefaults, LaneError> {
        Ok(self.lane_ref(lane)?.defaults)
    }

    fn end_node_middle_flags(&self, segment_id: SegmentId) -> Result<(bool, bool), LaneError> {
        let segment = self.segment_ref(segment_id)?;
        let (start, end) = self.end_nodes(segment)?;
        Ok((start.middle, end.middle))
    }

    fn lane_curve(&self, lane: &LaneRef) -> Result<Curve, LaneError> {
        Ok(self.lane_ref(lane)?.curve)
    }

    fn lane_length(&self, lane: &LaneRef) -> Result<f32, LaneError> {
        Ok(self.lane_ref(lane)?.length)
    }

    fn set_lane_curve(&mut self, lane: &LaneRef, curve: Curve, length: f32) -> Result<(), LaneError> {
        self.check_lane(lane)?;
        let net_lane = &mut self.segment_mut(lane.segment_id())?.lanes[lane.lane_index()];
        net_lane.curve = curve;
        net_lane.length = length;
        Ok(())
    }

    fn set_average_length(&mut self, segment_id: SegmentId, length: f32) -> Result<(), LaneError> {
        self.segment_mut(segment_id)?.average_length = length;
        Ok(())
    }

    fn queue_segment_update(&mut self, segment_id: SegmentId) {
        self.update_queue.insert(segment_id);
    }
}
