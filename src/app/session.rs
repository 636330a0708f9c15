//! Edit-Session: Segment-/Lane-Auswahl und Weiterleitung der Pointer-Events.
//!
//! Es ist immer höchstens eine Lane aktiv. Beim Abwählen eines Segments
//! werden dessen Default-Anpassungen verworfen (`trim`), beim Wechsel der
//! aktiven Lane wird der Handle-Satz neu aufgebaut. Verschwindet die aktive
//! Lane, wird ihr Handle-Satz abgebaut.

use super::handles::CurveEditHandles;
use super::store::LaneCustomizationStore;
use crate::core::{LaneError, LaneGeometrySource, LaneRef, SegmentId};
use crate::shared::EditorOptions;
use glam::Vec3;
use indexmap::IndexSet;

/// Bearbeitungs-Modus, abgeleitet aus der aktuellen Auswahl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Kein Segment ausgewählt
    SelectSegment,
    /// Segment aktiv, noch keine Lane
    SelectLane,
    /// Lane aktiv, Kontrollpunkte ziehbar
    ModifyLane,
}

/// Auswahl-Zustand des Lane-Editors.
#[derive(Debug, Clone)]
pub struct LaneEditSession {
    selected_segments: IndexSet<SegmentId>,
    active_segment: Option<SegmentId>,
    active_lane: Option<LaneRef>,
    handles: Option<CurveEditHandles>,
    drag_radius: f32,
    hover_radius: f32,
}

impl LaneEditSession {
    /// Erstellt eine leere Session mit den Handle-Radien aus den Optionen.
    pub fn new(options: &EditorOptions) -> Self {
        Self {
            selected_segments: IndexSet::new(),
            active_segment: None,
            active_lane: None,
            handles: None,
            drag_radius: options.drag_radius(),
            hover_radius: options.hover_radius(),
        }
    }

    pub fn mode(&self) -> EditMode {
        if self.active_lane.is_some() {
            EditMode::ModifyLane
        } else if self.active_segment.is_some() {
            EditMode::SelectLane
        } else {
            EditMode::SelectSegment
        }
    }

    /// Ausgewählte Segmente in Auswahl-Reihenfolge.
    pub fn selected_segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.selected_segments.iter().copied()
    }

    pub fn is_selected(&self, segment_id: SegmentId) -> bool {
        self.selected_segments.contains(&segment_id)
    }

    pub fn active_segment(&self) -> Option<SegmentId> {
        self.active_segment
    }

    pub fn active_lane(&self) -> Option<&LaneRef> {
        self.active_lane.as_ref()
    }

    /// Handle-Satz der aktiven Lane.
    pub fn handles(&self) -> Option<&CurveEditHandles> {
        self.handles.as_ref()
    }

    /// Wählt ein Segment aus und legt Anpassungen für alle seine Lanes an.
    ///
    /// Neu angelegte Anpassungen laufen einmal über den vollen Pfad. Ist noch
    /// kein Segment aktiv, wird das neue Segment aktiv.
    pub fn select_segment<St, S>(
        &mut self,
        segment_id: SegmentId,
        store: &mut St,
        source: &mut S,
    ) -> Result<(), LaneError>
    where
        St: LaneCustomizationStore,
        S: LaneGeometrySource + ?Sized,
    {
        let lanes = source.segment_lanes(segment_id)?;
        for lane in &lanes {
            let fresh = !store.contains(lane);
            let customization = store.get_or_create(lane, &*source)?;
            if fresh {
                customization.recompute_base(source)?;
            }
        }

        if self.selected_segments.insert(segment_id) {
            log::debug!("Segment {} ausgewählt ({} Lanes)", segment_id, lanes.len());
        }
        if self.active_segment.is_none() {
            self.active_segment = Some(segment_id);
        }
        Ok(())
    }

    /// Wählt ein Segment ab und verwirft dessen Default-Anpassungen.
    pub fn deselect_segment<St>(&mut self, segment_id: SegmentId, store: &mut St) -> bool
    where
        St: LaneCustomizationStore,
    {
        if !self.selected_segments.shift_remove(&segment_id) {
            return false;
        }
        if self.active_segment == Some(segment_id) {
            self.drop_active_lane();
            self.active_segment = self.selected_segments.first().copied();
        }
        store.trim(segment_id);
        log::debug!("Segment {} abgewählt", segment_id);
        true
    }

    /// Schaltet die Auswahl eines Segments um. Gibt den neuen Zustand zurück.
    pub fn toggle_segment<St, S>(
        &mut self,
        segment_id: SegmentId,
        store: &mut St,
        source: &mut S,
    ) -> Result<bool, LaneError>
    where
        St: LaneCustomizationStore,
        S: LaneGeometrySource + ?Sized,
    {
        if self.is_selected(segment_id) {
            self.deselect_segment(segment_id, store);
            Ok(false)
        } else {
            self.select_segment(segment_id, store, source)?;
            Ok(true)
        }
    }

    /// Macht ein Segment zum einzigen aktiven Segment.
    ///
    /// Alle anderen ausgewählten Segmente werden abgewählt und getrimmt.
    /// Der Index der aktiven Lane bleibt erhalten, sofern das neue Segment
    /// diese Lane hat.
    pub fn set_active_segment<St, S>(
        &mut self,
        segment_id: SegmentId,
        store: &mut St,
        source: &mut S,
    ) -> Result<(), LaneError>
    where
        St: LaneCustomizationStore,
        S: LaneGeometrySource + ?Sized,
    {
        let carried_lane = self
            .active_lane
            .filter(|lane| lane.segment_id() != segment_id)
            .map(|lane| lane.lane_index());

        self.select_segment(segment_id, store, source)?;

        let others: Vec<SegmentId> = self
            .selected_segments
            .iter()
            .copied()
            .filter(|&id| id != segment_id)
            .collect();
        for other in others {
            self.deselect_segment(other, store);
        }

        if self.active_segment != Some(segment_id) {
            self.drop_active_lane();
            self.active_segment = Some(segment_id);
        }

        if let Some(index) = carried_lane {
            if index < source.lane_count(segment_id)? {
                self.set_lane(Some(index), store, &*source)?;
            } else {
                log::debug!("Segment {} hat keine Lane {}", segment_id, index);
            }
        }
        Ok(())
    }

    /// Setzt die aktive Lane des aktiven Segments (`None` = keine Lane).
    ///
    /// Baut den Handle-Satz neu auf bzw. entfernt ihn. Gibt `false` zurück,
    /// wenn kein Segment aktiv ist.
    pub fn set_lane<St, S>(
        &mut self,
        lane_index: Option<usize>,
        store: &mut St,
        source: &S,
    ) -> Result<bool, LaneError>
    where
        St: LaneCustomizationStore,
        S: LaneGeometrySource + ?Sized,
    {
        let Some(index) = lane_index else {
            self.drop_active_lane();
            return Ok(true);
        };
        let Some(segment_id) = self.active_segment else {
            log::warn!("Lane {} gewählt, aber kein Segment aktiv", index);
            return Ok(false);
        };

        let lane = LaneRef::new(segment_id, index);
        let customization = store.get_or_create(&lane, source)?;
        self.handles = Some(CurveEditHandles::new(
            customization,
            self.drag_radius,
            self.hover_radius,
        ));
        self.active_lane = Some(lane);
        log::debug!("{} aktiv", lane);
        Ok(true)
    }

    /// Hebt die komplette Auswahl auf.
    pub fn clear<St>(&mut self, store: &mut St)
    where
        St: LaneCustomizationStore,
    {
        self.drop_active_lane();
        self.active_segment = None;
        for segment_id in std::mem::take(&mut self.selected_segments) {
            store.trim(segment_id);
        }
    }

    /// Pointer bewegt (ohne gedrückte Taste): Hover-Feedback.
    ///
    /// Die Handles werden vorher auf die aktuelle Komposition gesetzt.
    pub fn on_pointer_moved<St>(&mut self, hit: Vec3, store: &St)
    where
        St: LaneCustomizationStore,
    {
        let (Some(lane), Some(handles)) = (self.active_lane, self.handles.as_mut()) else {
            return;
        };
        if let Some(customization) = store.get(&lane) {
            handles.refresh(customization);
        }
        handles.update_hover(hit);
    }

    /// Pointer gezogen: leitet an die Handles der aktiven Lane weiter.
    pub fn on_pointer_drag<St, S>(
        &mut self,
        hit: Vec3,
        store: &mut St,
        source: &mut S,
    ) -> Result<bool, LaneError>
    where
        St: LaneCustomizationStore,
        S: LaneGeometrySource + ?Sized,
    {
        let (Some(lane), Some(handles)) = (self.active_lane, self.handles.as_mut()) else {
            return Ok(false);
        };
        let customization = store.get_or_create(&lane, &*source)?;
        handles.try_drag(hit, customization, source)
    }

    /// Pointer losgelassen: Drag endet.
    pub fn on_pointer_released(&mut self) {
        if let Some(handles) = &mut self.handles {
            handles.release();
        }
    }

    /// Entfernt gelöschte Segmente aus der Auswahl.
    ///
    /// War das aktive Segment betroffen, wird der Handle-Satz abgebaut und
    /// das erste verbleibende Segment aktiv. Gibt zurück, ob sich die
    /// Auswahl geändert hat.
    pub fn on_segments_removed(&mut self, removed: &[SegmentId]) -> bool {
        let mut changed = false;
        for segment_id in removed {
            changed |= self.selected_segments.shift_remove(segment_id);
            if self.active_segment == Some(*segment_id) {
                self.drop_active_lane();
                self.active_segment = None;
                changed = true;
            }
        }
        if self.active_segment.is_none() {
            self.active_segment = self.selected_segments.first().copied();
        }
        if changed {
            log::debug!("{} gelöschte Segmente aus der Auswahl entfernt", removed.len());
        }
        changed
    }

    fn drop_active_lane(&mut self) {
        self.active_lane = None;
        self.handles = None;
    }
}
