//! Writer für gespeicherte Lane-Anpassungen.

use crate::core::LaneRecord;
use glam::Vec3;

/// Aktuelle Format-Version des `<PathController>`-Elements.
pub const FORMAT_VERSION: u32 = 1;

/// Schreibt Lane-Datensätze als XML.
///
/// Zahlen werden in kürzester verlustfreier Darstellung geschrieben, damit
/// ein erneutes Einlesen exakt dieselben Werte liefert.
pub fn write_lane_customizations(records: &[LaneRecord]) -> String {
    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    output.push_str(&format!(
        "<PathController version=\"{}\">\n",
        FORMAT_VERSION
    ));

    for record in records {
        output.push_str(&format!(
            "    <lane segment=\"{}\" index=\"{}\" shift=\"{}\" vshift=\"{}\">\n",
            record.segment_id, record.lane_index, record.lateral_shift, record.vertical_shift
        ));
        let delta = &record.delta_points;
        output.push_str(&format!(
            "        <displacement a=\"{}\" b=\"{}\" c=\"{}\" d=\"{}\"/>\n",
            format_vec3(delta.a),
            format_vec3(delta.b),
            format_vec3(delta.c),
            format_vec3(delta.d)
        ));
        output.push_str("    </lane>\n");
    }

    output.push_str("</PathController>\n");
    output
}

fn format_vec3(v: Vec3) -> String {
    format!("{},{},{}", v.x, v.y, v.z)
}
