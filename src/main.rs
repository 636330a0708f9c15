//! Lane Path Editor Demo.
//!
//! Baut ein kleines Straßennetz auf, zieht einen Kontrollpunkt der aktiven
//! Lane, verschiebt einen Node und gibt die gespeicherten Anpassungen als
//! JSON aus. Optional: `lane-path-demo <lanes.xml>` lädt vorher gespeicherte
//! Anpassungen, `--save <lanes.xml>` schreibt sie am Ende zurück.

use anyhow::{Context, Result};
use glam::Vec3;
use lane_path_editor::core::NodeId;
use lane_path_editor::xml::{load_customizations, save_customizations};
use lane_path_editor::{
    process_topology_updates, CustomizationRegistry, EditorOptions, LaneDefaults,
    LaneEditSession, LaneGeometrySource, LaneNetwork, LaneRef, SegmentId,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Lane Path Editor Demo v{} startet...", env!("CARGO_PKG_VERSION"));

    let args = DemoArgs::parse(std::env::args().skip(1))?;
    let options = EditorOptions::load_from_file(&EditorOptions::config_path());

    let (mut network, segments) = build_demo_network()?;
    let mut store = CustomizationRegistry::new();

    if let Some(path) = &args.input {
        let restored = load_customizations(&mut store, path, &mut network)?;
        log::info!("{} Anpassungen aus {} geladen", restored, path.display());
    }

    let mut session = LaneEditSession::new(&options);
    let edited_segment = segments[1];
    session.set_active_segment(edited_segment, &mut store, &mut network)?;
    session.set_lane(Some(0), &mut store, &network)?;

    // Start-Punkt der Lane um 1 m anheben und leicht zur Seite ziehen
    let lane = LaneRef::new(edited_segment, 0);
    let start = network.lane_curve(&lane)?.a;
    let hit = start + Vec3::new(0.0, 1.0, 0.5);
    if session.on_pointer_drag(hit, &mut store, &mut network)? {
        log::info!("{}: Start-Punkt nach {:?} gezogen", lane, hit);
    }
    if let Some(handles) = session.handles() {
        for (index, handle) in handles.handles().iter().enumerate() {
            log::debug!("Handle {}: Farbe {:?}", index, handle.color(&options));
        }
    }
    session.on_pointer_released();

    // Topologie ändert sich: mittlerer Node wandert, die Anpassung bleibt erhalten
    network.move_node(MIDDLE_NODE, Vec3::new(42.0, 0.0, 6.0));
    let stats = process_topology_updates(&mut network, &mut store);
    session.on_segments_removed(&stats.removed_segments);
    log::info!(
        "Topologie-Update: {} Segmente, {} Lanes, {} übersprungen",
        stats.segments,
        stats.lanes,
        stats.skipped
    );

    for segment_id in &segments {
        log_segment(&network, *segment_id)?;
    }

    if let Some(path) = &args.save {
        save_customizations(&store, path)?;
    }

    let json = serde_json::to_string_pretty(&store.to_records())
        .context("Datensätze konnten nicht serialisiert werden")?;
    println!("{}", json);
    Ok(())
}

const MIDDLE_NODE: NodeId = 2;

/// Kommandozeile: `[input.xml] [--save output.xml]`
#[derive(Debug, Default)]
struct DemoArgs {
    input: Option<PathBuf>,
    save: Option<PathBuf>,
}

impl DemoArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            if arg == "--save" {
                let path = args.next().context("--save erwartet einen Dateipfad")?;
                parsed.save = Some(PathBuf::from(path));
            } else {
                parsed.input = Some(PathBuf::from(arg));
            }
        }
        Ok(parsed)
    }
}

/// Zwei Segmente mit je zwei Lanes (eine pro Richtung), verbunden über einen Middle-Node.
fn build_demo_network() -> Result<(LaneNetwork, Vec<SegmentId>)> {
    let lanes = || {
        vec![
            LaneDefaults {
                lateral: -2.0,
                vertical: 0.0,
            },
            LaneDefaults {
                lateral: 2.0,
                vertical: 0.0,
            },
        ]
    };

    let mut network = LaneNetwork::new();
    network.add_node(1, Vec3::ZERO, false);
    network.add_node(MIDDLE_NODE, Vec3::new(40.0, 0.0, 0.0), true);
    network.add_node(3, Vec3::new(70.0, 0.0, 30.0), false);

    let first = network.add_segment(1, MIDDLE_NODE, 4.0, lanes())?;
    let second = network.add_segment(MIDDLE_NODE, 3, 4.0, lanes())?;
    network.set_segment_directions(second, Some(Vec3::X), Some(-Vec3::Z))?;
    network.take_queued_updates();
    network.update_segment(second)?;

    Ok((network, vec![first, second]))
}

fn log_segment(network: &LaneNetwork, segment_id: SegmentId) -> Result<()> {
    for lane in network.segment_lanes(segment_id)? {
        log::info!("{}: Länge {:.3} m", lane, network.lane_length(&lane)?);
    }
    if let Some(average) = network.average_length(segment_id) {
        log::info!("Segment {}: Durchschnitt {:.3} m", segment_id, average);
    }
    Ok(())
}
