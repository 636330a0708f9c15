//! Frame-Glue: verarbeitet angeforderte Segment-Updates.
//!
//! Pro Frame: Host baut die Standard-Kurven der betroffenen Segmente neu
//! auf, danach werden die Anpassungen aller Lanes dieser Segmente aufgelegt.

use super::store::CustomizationRegistry;
use crate::core::{LaneError, LaneNetwork, SegmentId};

/// Ergebnis eines Update-Durchlaufs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyUpdateStats {
    /// Verarbeitete Segmente
    pub segments: usize,
    /// Neu berechnete angepasste Lanes
    pub lanes: usize,
    /// Übersprungene Segmente (Topologie inkonsistent oder Fehler)
    pub skipped: usize,
    /// Segmente, die nicht mehr existieren (Anpassungen verworfen).
    /// Wird an `LaneEditSession::on_segments_removed` weitergereicht.
    pub removed_segments: Vec<SegmentId>,
}

/// Arbeitet die Update-Queue des Netzes ab.
///
/// Fehler einzelner Segmente brechen den Durchlauf nicht ab: transiente
/// Inkonsistenzen werden übersprungen, gelöschte Segmente verlieren ihre
/// Anpassungen.
pub fn process_topology_updates(
    network: &mut LaneNetwork,
    store: &mut CustomizationRegistry,
) -> TopologyUpdateStats {
    let mut stats = TopologyUpdateStats::default();

    for segment_id in network.take_queued_updates() {
        match network.update_segment(segment_id) {
            Ok(()) => {}
            Err(LaneError::UnknownSegment(_)) => {
                let removed = store.remove_segment(segment_id);
                log::debug!(
                    "Segment {} existiert nicht mehr, {} Anpassungen entfernt",
                    segment_id,
                    removed
                );
                stats.skipped += 1;
                stats.removed_segments.push(segment_id);
                continue;
            }
            Err(err) => {
                log::warn!("Segment {}: Host-Update übersprungen: {}", segment_id, err);
                stats.skipped += 1;
                continue;
            }
        }

        match store.recompute_segment(segment_id, network) {
            Ok(count) => {
                stats.segments += 1;
                stats.lanes += count;
            }
            Err(err) => {
                log::error!("Segment {}: Recompute fehlgeschlagen: {}", segment_id, err);
                stats.skipped += 1;
            }
        }
    }

    if stats.segments > 0 || stats.skipped > 0 {
        log::debug!(
            "Topologie-Update: {} Segmente, {} Lanes, {} übersprungen",
            stats.segments,
            stats.lanes,
            stats.skipped
        );
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::LaneCustomizationStore;
    use crate::core::{Curve, LaneDefaults, LaneGeometrySource, LaneRef};
    use glam::Vec3;

    fn network() -> (LaneNetwork, u32) {
        let mut network = LaneNetwork::new();
        network.add_node(1, Vec3::ZERO, false);
        network.add_node(2, Vec3::new(20.0, 0.0, 0.0), false);
        let segment_id = network
            .add_segment(
                1,
                2,
                4.0,
                vec![LaneDefaults {
                    lateral: 0.0,
                    vertical: 0.0,
                }],
            )
            .unwrap();
        network.take_queued_updates();
        (network, segment_id)
    }

    #[test]
    fn test_node_move_reapplies_customization() {
        let (mut network, segment_id) = network();
        let mut store = CustomizationRegistry::new();
        let lane = LaneRef::new(segment_id, 0);
        let delta = Curve::ZERO.with_control_point(1, Vec3::new(0.0, 3.0, 0.0));
        store
            .get_or_create(&lane, &network)
            .unwrap()
            .set_delta_points(delta);

        network.move_node(2, Vec3::new(30.0, 0.0, 0.0));
        let stats = process_topology_updates(&mut network, &mut store);

        assert_eq!(
            stats,
            TopologyUpdateStats {
                segments: 1,
                lanes: 1,
                skipped: 0,
                removed_segments: Vec::new(),
            }
        );
        let customization = store.get(&lane).unwrap();
        assert!(customization.cached_base().d.abs_diff_eq(Vec3::new(30.0, 0.0, 0.0), 1e-5));
        assert_eq!(network.lane_curve(&lane).unwrap(), customization.composed_curve());
        assert!(!network.has_queued_update(segment_id));
    }

    #[test]
    fn test_missing_node_is_skipped() {
        let (mut network, segment_id) = network();
        let mut store = CustomizationRegistry::new();
        let lane = LaneRef::new(segment_id, 0);
        store.get_or_create(&lane, &network).unwrap().lateral_shift = 1.0;
        let before = network.lane_curve(&lane).unwrap();

        network.remove_node(2);
        let stats = process_topology_updates(&mut network, &mut store);

        assert_eq!(stats.skipped, 1);
        assert_eq!(network.lane_curve(&lane).unwrap(), before);
        assert!(store.contains(&lane));
    }

    #[test]
    fn test_removed_segment_drops_customizations() {
        let (mut network, segment_id) = network();
        let mut store = CustomizationRegistry::new();
        store
            .get_or_create(&LaneRef::new(segment_id, 0), &network)
            .unwrap()
            .lateral_shift = 1.0;

        network.remove_segment(segment_id);
        network.queue_segment_update(segment_id);
        let stats = process_topology_updates(&mut network, &mut store);

        assert!(store.is_empty());
        assert_eq!(stats.removed_segments, vec![segment_id]);
    }

    #[test]
    fn test_empty_queue_does_nothing() {
        let (mut network, _) = network();
        let mut store = CustomizationRegistry::new();
        assert_eq!(
            process_topology_updates(&mut network, &mut store),
            TopologyUpdateStats::default()
        );
    }
}
