use std::{fs, path::Path};

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{antenna::Antenna, error::PatternResult};

// Horizontal space kept free around the panes.
const WINDOW_MARGIN: u32 = 40;

/// How intensities are turned into radii.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// dB relative to the peak, clamped to [-30, 0].
    Gain,
    /// Intensity relative to the peak, linear.
    Power,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Gain
    }
}

impl ViewMode {
    pub fn from_name(name: &str) -> Option<ViewMode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gain" | "db" => Some(ViewMode::Gain),
            "power" | "linear" => Some(ViewMode::Power),
            _ => None,
        }
    }
}

/// Everything one recomputation depends on. Built once per pass and never mutated.
///
/// Deserializing goes through [`PatternConfig::new`], so loaded parameters are clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PatternFields")]
pub struct PatternConfig {
    pub antenna: Antenna,
    pub mode: ViewMode,
}

#[derive(Deserialize)]
struct PatternFields {
    #[serde(default)]
    antenna: Antenna,
    #[serde(default)]
    mode: ViewMode,
}

impl From<PatternFields> for PatternConfig {
    fn from(fields: PatternFields) -> Self {
        PatternConfig::new(fields.antenna, fields.mode)
    }
}

impl PatternConfig {
    pub fn new(antenna: Antenna, mode: ViewMode) -> PatternConfig {
        PatternConfig {
            antenna: antenna.sanitized(),
            mode,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneSize {
    pub width: u32,
    pub height: u32,
}

/// Presentation settings for the viewer and the exporter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub azimuth: PaneSize,
    pub elevation: PaneSize,
    pub surface: PaneSize,
    /// Concentric rings drawn on the polar panes.
    pub grid_levels: u32,
    pub background: [u8; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            azimuth: PaneSize {
                width: 500,
                height: 500,
            },
            elevation: PaneSize {
                width: 500,
                height: 500,
            },
            surface: PaneSize {
                width: 1000,
                height: 500,
            },
            grid_levels: 6,
            background: [0x0a, 0x0e, 0x1a],
        }
    }
}

impl RenderSettings {
    pub fn background_color(&self) -> RGBColor {
        let [r, g, b] = self.background;
        RGBColor(r, g, b)
    }

    /// Resizes the panes for a window `width` pixels wide: each polar pane takes half of
    /// the usable width up to 500, and the surface pane the whole of it up to 1000.
    pub fn fit_width(&mut self, width: u32) {
        let usable = width.saturating_sub(WINDOW_MARGIN).min(1000).max(2);
        let polar = (usable / 2).min(500);
        let square = PaneSize {
            width: polar,
            height: polar,
        };
        self.azimuth = square;
        self.elevation = square;
        self.surface = PaneSize {
            width: usable,
            height: polar,
        };
    }

    /// Size of the composite export: the two polar panes side by side over the surface pane.
    pub fn composite_size(&self) -> (u32, u32) {
        let top_width = self.azimuth.width + self.elevation.width;
        let top_height = self.azimuth.height.max(self.elevation.height);
        (
            top_width.max(self.surface.width),
            top_height + self.surface.height,
        )
    }
}

/// Settings file contents. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub pattern: PatternConfig,
    pub render: RenderSettings,
}

impl SettingsFile {
    pub fn from_json(text: &str) -> PatternResult<SettingsFile> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> PatternResult<SettingsFile> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        info!(path = %path.display(), antenna = settings.pattern.antenna.name(), "loaded settings");
        Ok(settings)
    }
}
