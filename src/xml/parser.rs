//! Parser für gespeicherte Lane-Anpassungen.

use super::writer::FORMAT_VERSION;
use crate::core::{Curve, LaneRecord};
use anyhow::{bail, Context, Result};
use glam::Vec3;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parsed Lane-Datensätze aus einem XML-String.
///
/// Unbekannte Elemente werden ignoriert. Fehlende Pflicht-Attribute und
/// ungültige Zahlen sind Fehler.
pub fn parse_lane_customizations(xml_content: &str) -> Result<Vec<LaneRecord>> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);

    let mut buffer = Vec::new();
    let mut records = Vec::new();
    let mut found_root = false;
    let mut in_root = false;
    let mut current: Option<LaneRecord> = None;

    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?;
                match &*tag {
                    "PathController" => {
                        check_version(&reader, e)?;
                        found_root = true;
                        in_root = true;
                    }
                    "lane" if in_root => {
                        current = Some(parse_lane(&reader, e)?);
                    }
                    "displacement" => {
                        apply_displacement(&reader, e, current.as_mut())?;
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?;
                match &*tag {
                    "PathController" => {
                        check_version(&reader, e)?;
                        found_root = true;
                    }
                    // Lane ohne Kontrollpunkt-Deltas
                    "lane" if in_root => records.push(parse_lane(&reader, e)?),
                    "displacement" => {
                        apply_displacement(&reader, e, current.as_mut())?;
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?;
                match &*tag {
                    "lane" => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    "PathController" => in_root = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err).context("Fehler beim Parsen des XML"),
            _ => {}
        }

        buffer.clear();
    }

    if !found_root {
        bail!("Kein <PathController>-Element gefunden");
    }

    Ok(records)
}

fn check_version(reader: &Reader<&[u8]>, element: &BytesStart) -> Result<()> {
    let Some(value) = attribute(reader, element, "version")? else {
        log::warn!("<PathController> ohne Version, nehme {} an", FORMAT_VERSION);
        return Ok(());
    };
    let version = value
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Ungueltige Version: '{}'", value))?;
    if version != FORMAT_VERSION {
        bail!("Nicht unterstuetzte Version {} (erwartet {})", version, FORMAT_VERSION);
    }
    Ok(())
}

fn parse_lane(reader: &Reader<&[u8]>, element: &BytesStart) -> Result<LaneRecord> {
    let segment = required_attribute(reader, element, "segment")?;
    let index = required_attribute(reader, element, "index")?;

    let segment_id = segment
        .trim()
        .parse()
        .with_context(|| format!("Ungueltige Segment-ID: '{}'", segment))?;
    let lane_index = index
        .trim()
        .parse()
        .with_context(|| format!("Ungueltiger Lane-Index: '{}'", index))?;
    let lateral_shift = optional_f32(reader, element, "shift")?;
    let vertical_shift = optional_f32(reader, element, "vshift")?;

    Ok(LaneRecord {
        segment_id,
        lane_index,
        lateral_shift,
        vertical_shift,
        delta_points: Curve::ZERO,
    })
}

fn apply_displacement(
    reader: &Reader<&[u8]>,
    element: &BytesStart,
    record: Option<&mut LaneRecord>,
) -> Result<()> {
    let Some(record) = record else {
        log::warn!("<displacement> ausserhalb von <lane> ignoriert");
        return Ok(());
    };

    let mut points = [Vec3::ZERO; 4];
    for (point, key) in points.iter_mut().zip(["a", "b", "c", "d"]) {
        if let Some(value) = attribute(reader, element, key)? {
            *point = parse_vec3(&value).with_context(|| {
                format!(
                    "Ungueltiger Punkt '{}' in Lane {} (Segment {})",
                    key, record.lane_index, record.segment_id
                )
            })?;
        }
    }
    record.delta_points = Curve::from_points(points);
    Ok(())
}

fn attribute(reader: &Reader<&[u8]>, element: &BytesStart, key: &str) -> Result<Option<String>> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr?;
        let name = reader.decoder().decode(attr.key.as_ref())?;
        if name == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(reader: &Reader<&[u8]>, element: &BytesStart, key: &str) -> Result<String> {
    attribute(reader, element, key)?
        .with_context(|| format!("Pflicht-Attribut '{}' fehlt", key))
}

fn optional_f32(reader: &Reader<&[u8]>, element: &BytesStart, key: &str) -> Result<f32> {
    match attribute(reader, element, key)? {
        Some(value) => parse_finite(&value)
            .with_context(|| format!("Ungueltiger Wert fuer '{}': '{}'", key, value)),
        None => Ok(0.0),
    }
}

fn parse_finite(text: &str) -> Result<f32> {
    let value = text.trim().parse::<f32>()?;
    if !value.is_finite() {
        bail!("Wert muss endlich sein");
    }
    Ok(value)
}

/// Parsed "x,y,z".
fn parse_vec3(text: &str) -> Result<Vec3> {
    let parts = text
        .split(',')
        .map(parse_finite)
        .collect::<Result<Vec<f32>>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => bail!("Erwartet drei Komponenten, gefunden {}", parts.len()),
    }
}
