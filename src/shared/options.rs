//! Zentrale Konfiguration für den Lane-Path-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Handles ─────────────────────────────────────────────────────────

/// Darstellungsgröße eines Kontrollpunkt-Handles in Welteinheiten.
pub const HANDLE_SIZE_WORLD: f32 = 1.0;
/// Standard-Hitbox-Skalierung in Prozent der Handle-Größe.
pub const HITBOX_SCALE_PERCENT: f32 = 100.0;
/// Hover-Radius relativ zum Greif-Radius.
pub const HOVER_RADIUS_FACTOR: f32 = 1.5;

// ── Handle-Darstellung ─────────────────────────────────────────────

/// Farbe normaler Handles (RGBA: Weiß).
pub const HANDLE_COLOR_DEFAULT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Farbe für Handles unter dem Pointer (RGBA: Gelb).
pub const HANDLE_COLOR_HOVERED: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
/// Farbe für gezogene Handles (RGBA: Magenta).
pub const HANDLE_COLOR_SELECTED: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `lane_path_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorOptions {
    /// Handle-Größe in Welteinheiten
    pub handle_size_world: f32,
    /// Hitbox-Skalierung in Prozent der Handle-Größe (100 = exakte Größe)
    #[serde(default = "default_hitbox_scale_percent")]
    pub hitbox_scale_percent: f32,
    /// Hover-Radius als Vielfaches des Greif-Radius
    #[serde(default = "default_hover_radius_factor")]
    pub hover_radius_factor: f32,

    /// Farbe normaler Handles
    pub handle_color_default: [f32; 4],
    /// Farbe für Handles unter dem Pointer
    pub handle_color_hovered: [f32; 4],
    /// Farbe für gezogene Handles
    pub handle_color_selected: [f32; 4],
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            handle_size_world: HANDLE_SIZE_WORLD,
            hitbox_scale_percent: HITBOX_SCALE_PERCENT,
            hover_radius_factor: HOVER_RADIUS_FACTOR,
            handle_color_default: HANDLE_COLOR_DEFAULT,
            handle_color_hovered: HANDLE_COLOR_HOVERED,
            handle_color_selected: HANDLE_COLOR_SELECTED,
        }
    }
}

/// Serde-Default für `hitbox_scale_percent` (ältere TOML-Dateien).
fn default_hitbox_scale_percent() -> f32 {
    HITBOX_SCALE_PERCENT
}

fn default_hover_radius_factor() -> f32 {
    HOVER_RADIUS_FACTOR
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("lane-path-demo"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("lane_path_editor.toml")
    }

    /// Greif-Radius der Handles in Welteinheiten.
    ///
    /// `handle_size_world * hitbox_scale_percent / 100`
    pub fn drag_radius(&self) -> f32 {
        self.handle_size_world * self.hitbox_scale_percent / 100.0
    }

    /// Hover-Radius der Handles in Welteinheiten.
    pub fn hover_radius(&self) -> f32 {
        self.drag_radius() * self.hover_radius_factor
    }

    /// Render-Farbe eines Handles je nach Zustand.
    pub fn handle_color(&self, hovered: bool, selected: bool) -> [f32; 4] {
        if selected {
            self.handle_color_selected
        } else if hovered {
            self.handle_color_hovered
        } else {
            self.handle_color_default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_radii() {
        let options = EditorOptions::default();
        assert_relative_eq!(options.drag_radius(), 1.0);
        assert_relative_eq!(options.hover_radius(), 1.5);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("lane_path_editor_does_not_exist.toml");
        assert_eq!(EditorOptions::load_from_file(&path), EditorOptions::default());
    }

    #[test]
    fn test_old_file_without_optional_fields() {
        let content = r#"
handle_size_world = 2.0
handle_color_default = [1.0, 1.0, 1.0, 1.0]
handle_color_hovered = [1.0, 1.0, 0.0, 1.0]
handle_color_selected = [1.0, 0.0, 1.0, 1.0]
"#;
        let options: EditorOptions = toml::from_str(content).unwrap();
        assert_relative_eq!(options.hitbox_scale_percent, HITBOX_SCALE_PERCENT);
        assert_relative_eq!(options.drag_radius(), 2.0);
        assert_relative_eq!(options.hover_radius(), 3.0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "lane_path_editor_options_{}.toml",
            std::process::id()
        ));
        let options = EditorOptions {
            hitbox_scale_percent: 150.0,
            ..EditorOptions::default()
        };

        options.save_to_file(&path).unwrap();
        let loaded = EditorOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, options);
    }

    #[test]
    fn test_handle_color_priority() {
        let options = EditorOptions::default();
        assert_eq!(options.handle_color(true, true), HANDLE_COLOR_SELECTED);
        assert_eq!(options.handle_color(true, false), HANDLE_COLOR_HOVERED);
        assert_eq!(options.handle_color(false, false), HANDLE_COLOR_DEFAULT);
    }
}
