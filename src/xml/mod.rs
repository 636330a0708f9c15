//! XML Import/Export für Lane-Anpassungen.
//!
//! Pro angepasster Lane ein `<lane>`-Element mit Verschiebungen als Attribute
//! und einem `<displacement>`-Kind mit den vier Kontrollpunkt-Offsets.

pub mod parser;
pub mod writer;

pub use parser::parse_lane_customizations;
pub use writer::write_lane_customizations;

use crate::app::CustomizationRegistry;
use crate::core::LaneGeometrySource;
use anyhow::{Context, Result};
use std::path::Path;

/// Schreibt alle Nicht-Default-Anpassungen in eine Datei.
pub fn save_customizations(registry: &CustomizationRegistry, path: &Path) -> Result<usize> {
    let records = registry.to_records();
    let content = write_lane_customizations(&records);
    std::fs::write(path, content)
        .with_context(|| format!("Datei konnte nicht geschrieben werden: {}", path.display()))?;
    log::info!("{} Lane-Anpassungen gespeichert nach: {}", records.len(), path.display());
    Ok(records.len())
}

/// Lädt Anpassungen aus einer Datei und berechnet sie gegen die Topologie neu.
pub fn load_customizations<S>(
    registry: &mut CustomizationRegistry,
    path: &Path,
    source: &mut S,
) -> Result<usize>
where
    S: LaneGeometrySource + ?Sized,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Datei konnte nicht gelesen werden: {}", path.display()))?;
    let records = parse_lane_customizations(&content)
        .with_context(|| format!("Ungueltige Lane-Datei: {}", path.display()))?;
    Ok(registry.restore_records(&records, source))
}
