//! Ziehbare Kontrollpunkt-Handles der aktiven Lane.
//!
//! Die Handles halten keinen eigenen persistenten Zustand. Ihre Position wird
//! vor jedem Hit-Test aus der zusammengesetzten Kurve gelesen, ein Drag wird
//! sofort als Delta in die `LaneCustomization` zurückgeschrieben.

use crate::core::{LaneCustomization, LaneError, LaneGeometrySource, LaneRef, CONTROL_POINT_COUNT};
use crate::shared::curve_geometry::xz;
use crate::shared::EditorOptions;
use glam::Vec3;

/// Ein einzelner ziehbarer Punkt in Weltkoordinaten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPointHandle {
    pub position: Vec3,
    /// Pointer liegt über dem Handle (nur Darstellung)
    pub hovered: bool,
    /// Handle wird gerade gezogen (nur Darstellung)
    pub selected: bool,
    /// Greif-Radius in der Bodenebene
    pub drag_radius: f32,
    /// Hover-Radius in der Bodenebene
    pub hover_radius: f32,
}

impl ControlPointHandle {
    pub fn new(position: Vec3, drag_radius: f32, hover_radius: f32) -> Self {
        Self {
            position,
            hovered: false,
            selected: false,
            drag_radius,
            hover_radius,
        }
    }

    /// Boden-Distanz zwischen Handle und Pointer.
    pub fn ground_distance(&self, hit: Vec3) -> f32 {
        xz(self.position).distance(xz(hit))
    }

    /// True wenn `hit` innerhalb des Greif-Radius liegt.
    pub fn is_hit(&self, hit: Vec3) -> bool {
        self.ground_distance(hit) <= self.drag_radius
    }

    pub fn is_hovered_by(&self, hit: Vec3) -> bool {
        self.ground_distance(hit) <= self.hover_radius
    }

    /// Render-Farbe laut Optionen (gezogen vor Hover vor Normal).
    pub fn color(&self, options: &EditorOptions) -> [f32; 4] {
        options.handle_color(self.hovered, self.selected)
    }
}

/// Die vier Handles (Start, CP1, CP2, Ende) der aktiven Lane.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveEditHandles {
    lane: LaneRef,
    handles: [ControlPointHandle; CONTROL_POINT_COUNT],
    /// Index des aktuell gezogenen Handles
    active: Option<usize>,
}

impl CurveEditHandles {
    /// Baut die Handles für eine Lane auf.
    pub fn new(customization: &LaneCustomization, drag_radius: f32, hover_radius: f32) -> Self {
        let composed = customization.composed_curve();
        Self {
            lane: *customization.lane(),
            handles: composed
                .points()
                .map(|p| ControlPointHandle::new(p, drag_radius, hover_radius)),
            active: None,
        }
    }

    /// Lane, zu der die Handles gehören.
    pub fn lane(&self) -> &LaneRef {
        &self.lane
    }

    pub fn handles(&self) -> &[ControlPointHandle; CONTROL_POINT_COUNT] {
        &self.handles
    }

    pub fn handle(&self, index: usize) -> Option<&ControlPointHandle> {
        self.handles.get(index)
    }

    /// Index des gezogenen Handles.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Setzt jede Handle-Position auf den zusammengesetzten Kontrollpunkt.
    pub fn refresh(&mut self, customization: &LaneCustomization) {
        let composed = customization.composed_curve();
        for (handle, point) in self.handles.iter_mut().zip(composed.points()) {
            handle.position = point;
        }
    }

    /// Markiert das Handle unter dem Pointer (niedrigster Index gewinnt).
    pub fn update_hover(&mut self, hit: Vec3) {
        let hovered = self.handles.iter().position(|h| h.is_hovered_by(hit));
        for (index, handle) in self.handles.iter_mut().enumerate() {
            handle.hovered = hovered == Some(index);
        }
    }

    /// Versucht, einen Kontrollpunkt an die Pointer-Position `hit` zu ziehen.
    ///
    /// Das bereits gezogene Handle behält den Drag. Sonst werden die Handles
    /// in Index-Reihenfolge gegen ihren Greif-Radius getestet. Bei Treffer
    /// wird das Delta gesetzt, die lebende Kurve aktualisiert und ein
    /// Neu-Rendern des Segments angefordert.
    pub fn try_drag<S>(
        &mut self,
        hit: Vec3,
        customization: &mut LaneCustomization,
        source: &mut S,
    ) -> Result<bool, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        if *customization.lane() != self.lane {
            log::warn!(
                "Drag auf {} verworfen: Handles gehören zu {}",
                customization.lane(),
                self.lane
            );
            return Ok(false);
        }

        self.refresh(customization);

        let index = match self
            .active
            .or_else(|| self.handles.iter().position(|h| h.is_hit(hit)))
        {
            Some(index) => index,
            None => return Ok(false),
        };

        customization.update_control_point(index, hit, source)?;

        self.active = Some(index);
        for (i, handle) in self.handles.iter_mut().enumerate() {
            handle.selected = i == index;
        }
        self.handles[index].position = hit;
        Ok(true)
    }

    /// Pointer losgelassen: Drag endet, nichts wird zurückgerollt.
    pub fn release(&mut self) {
        self.active = None;
        for handle in &mut self.handles {
            handle.selected = false;
        }
    }

    /// True wenn ein Handle gezogen wird oder unter dem Pointer liegt.
    pub fn is_focused(&self) -> bool {
        self.active.is_some() || self.handles.iter().any(|h| h.hovered || h.selected)
    }
}
