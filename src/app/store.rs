//! Cache der Lane-Anpassungen (erzeugen bei Bedarf, verwerfen wenn Default).
//!
//! Der Editor-Kern legt keine Lebensdauer-Politik fest. Er verlässt sich nur
//! darauf, dass eine `LaneCustomization` für die Dauer einer Selektion dieselbe
//! Instanz bleibt. `CustomizationRegistry` ist die In-Memory-Implementierung.

use crate::core::{
    refresh_average_length, LaneCustomization, LaneError, LaneGeometrySource, LaneRecord,
    LaneRef, RecomputeMode, SegmentId,
};
use indexmap::IndexMap;

/// Vertrag des Anpassungs-Caches.
pub trait LaneCustomizationStore {
    /// Liefert die Anpassung der Lane; legt sie beim ersten Zugriff an.
    ///
    /// Neue Einträge übernehmen die aktuelle Host-Kurve als Basis.
    fn get_or_create<S>(
        &mut self,
        lane: &LaneRef,
        source: &S,
    ) -> Result<&mut LaneCustomization, LaneError>
    where
        S: LaneGeometrySource + ?Sized;

    /// Liefert die Anpassungen aller Lanes eines Segments in Index-Reihenfolge.
    fn get_or_create_all<S>(
        &mut self,
        segment_id: SegmentId,
        source: &S,
    ) -> Result<Vec<&mut LaneCustomization>, LaneError>
    where
        S: LaneGeometrySource + ?Sized;

    /// Verwirft alle Default-Einträge des Segments.
    fn trim(&mut self, segment_id: SegmentId);

    fn get(&self, lane: &LaneRef) -> Option<&LaneCustomization>;

    fn get_mut(&mut self, lane: &LaneRef) -> Option<&mut LaneCustomization>;

    fn contains(&self, lane: &LaneRef) -> bool {
        self.get(lane).is_some()
    }
}

/// In-Memory-Registry aller Lane-Anpassungen.
///
/// Iteriert in Einfüge-Reihenfolge, damit Export und Recompute
/// deterministisch bleiben.
#[derive(Debug, Clone, Default)]
pub struct CustomizationRegistry {
    entries: IndexMap<LaneRef, LaneCustomization>,
}

impl CustomizationRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Alle Einträge in Einfüge-Reihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &LaneCustomization> {
        self.entries.values()
    }

    /// Lanes des Segments, die einen Eintrag haben (aufsteigend nach Index).
    pub fn segment_lanes(&self, segment_id: SegmentId) -> Vec<LaneRef> {
        let mut lanes: Vec<LaneRef> = self
            .entries
            .keys()
            .filter(|lane| lane.segment_id() == segment_id)
            .copied()
            .collect();
        lanes.sort_by_key(|lane| lane.lane_index());
        lanes
    }

    /// Entfernt alle Einträge eines Segments (z.B. wenn das Segment gelöscht wurde).
    pub fn remove_segment(&mut self, segment_id: SegmentId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|lane, _| lane.segment_id() != segment_id);
        before - self.entries.len()
    }

    /// Entfernt alle Einträge.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Berechnet alle angepassten Lanes eines Segments neu.
    ///
    /// Pro Lane läuft genau ein Pfad (`RecomputeMode::for_customization`);
    /// danach wird die durchschnittliche Lane-Länge des Segments aktualisiert.
    ///
    /// Ein Fehler bricht die übrigen Lanes nicht ab, der erste wird am Ende
    /// zurückgegeben.
    pub fn recompute_segment<S>(
        &mut self,
        segment_id: SegmentId,
        source: &mut S,
    ) -> Result<usize, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        let mut count = 0;
        let mut first_error = None;
        for customization in self
            .entries
            .values_mut()
            .filter(|c| c.lane().segment_id() == segment_id)
        {
            let mode = RecomputeMode::for_customization(customization);
            match customization.recompute(mode, source) {
                Ok(()) => count += 1,
                Err(err) => {
                    log::warn!("{}: Neuberechnung fehlgeschlagen: {}", customization.lane(), err);
                    first_error.get_or_insert(err);
                }
            }
        }
        refresh_average_length(source, segment_id)?;
        match first_error {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }

    /// Exportiert alle Nicht-Default-Einträge als Datensätze.
    pub fn to_records(&self) -> Vec<LaneRecord> {
        self.entries
            .values()
            .filter(|c| !c.is_default())
            .map(LaneRecord::from_customization)
            .collect()
    }

    /// Stellt Anpassungen aus Datensätzen wieder her.
    ///
    /// Die Basis wird über den vollen Pfad aus der Topologie neu aufgebaut.
    /// Datensätze für nicht (mehr) existierende Lanes werden übersprungen.
    /// Gibt die Anzahl der wiederhergestellten Lanes zurück.
    pub fn restore_records<S>(&mut self, records: &[LaneRecord], source: &mut S) -> usize
    where
        S: LaneGeometrySource + ?Sized,
    {
        let mut restored = 0;
        for record in records {
            let lane = record.lane();
            let result = self.get_or_create(&lane, &*source).and_then(|customization| {
                record.apply_to(customization);
                customization.recompute_base(source).map(|_| ())
            });
            match result {
                Ok(()) => restored += 1,
                Err(err) => {
                    log::warn!("{}: Datensatz übersprungen: {}", lane, err);
                    self.entries.shift_remove(&lane);
                }
            }
        }
        log::info!("{} von {} Lane-Anpassungen wiederhergestellt", restored, records.len());
        restored
    }
}

impl LaneCustomizationStore for CustomizationRegistry {
    fn get_or_create<S>(
        &mut self,
        lane: &LaneRef,
        source: &S,
    ) -> Result<&mut LaneCustomization, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        if !self.entries.contains_key(lane) {
            let customization = LaneCustomization::from_source(*lane, source)?;
            log::debug!("{}: Anpassung angelegt", lane);
            self.entries.insert(*lane, customization);
        }
        self.entries
            .get_mut(lane)
            .ok_or(LaneError::UnknownSegment(lane.segment_id()))
    }

    fn get_or_create_all<S>(
        &mut self,
        segment_id: SegmentId,
        source: &S,
    ) -> Result<Vec<&mut LaneCustomization>, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        for lane in source.segment_lanes(segment_id)? {
            self.get_or_create(&lane, source)?;
        }

        let mut customizations: Vec<&mut LaneCustomization> = self
            .entries
            .values_mut()
            .filter(|c| c.lane().segment_id() == segment_id)
            .collect();
        customizations.sort_by_key(|c| c.lane().lane_index());
        Ok(customizations)
    }

    fn trim(&mut self, segment_id: SegmentId) {
        let before = self.entries.len();
        self.entries
            .retain(|lane, c| lane.segment_id() != segment_id || !c.is_default());
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Segment {}: {} Default-Anpassungen verworfen", segment_id, removed);
        }
    }

    fn get(&self, lane: &LaneRef) -> Option<&LaneCustomization> {
        self.entries.get(lane)
    }

    fn get_mut(&mut self, lane: &LaneRef) -> Option<&mut LaneCustomization> {
        self.entries.get_mut(lane)
    }
}
