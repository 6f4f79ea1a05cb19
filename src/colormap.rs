use plotters::style::RGBColor;

use crate::{
    config::ViewMode,
    helper::{normalize_decibels, DB_MAX, DB_MIN},
};

/// Maps a dB value onto blue → cyan → green → yellow → red across [-30, 0] dB.
/// Values outside the range, including -inf, take the end colors.
pub fn color_for_decibels(db: f32) -> RGBColor {
    let t = normalize_decibels(db);
    // floor(255 · f) for f in [0, 1]
    let ramp = |f: f32| (255. * f).floor() as u8;

    if t < 0.25 {
        RGBColor(0, ramp(t / 0.25), 255)
    } else if t < 0.5 {
        RGBColor(0, 255, ramp(1. - (t - 0.25) / 0.25))
    } else if t < 0.75 {
        RGBColor(ramp((t - 0.5) / 0.25), 255, 0)
    } else {
        RGBColor(255, ramp(1. - (t - 0.75) / 0.25), 0)
    }
}

/// What the color legend shows for the active mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    pub mode: ViewMode,
    /// Numeric range covered by the color bar, in the units of `labels`.
    pub range: (f32, f32),
    pub labels: Vec<String>,
    pub caption: &'static str,
}

impl Legend {
    pub fn for_mode(mode: ViewMode) -> Legend {
        match mode {
            ViewMode::Gain => Legend {
                mode,
                range: (DB_MIN, DB_MAX),
                labels: ["-30 dB", "-20 dB", "-10 dB", "0 dB"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                caption: "Gain (dB) - Logarithmic Scale",
            },
            ViewMode::Power => Legend {
                mode,
                range: (0., 100.),
                labels: ["0%", "33%", "67%", "100%"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                caption: "Normalized Power - Linear Scale",
            },
        }
    }

    /// Color stops for drawing the bar, from the low end to the high end.
    pub fn gradient(&self, steps: usize) -> Vec<RGBColor> {
        let steps = steps.max(2);
        (0..steps)
            .map(|i| {
                let t = i as f32 / (steps - 1) as f32;
                color_for_decibels(DB_MIN + t * (DB_MAX - DB_MIN))
            })
            .collect()
    }
}
