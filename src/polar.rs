use std::f32::consts::PI;

use nalgebra::Point2;
use plotters::style::RGBColor;

use crate::{
    colormap::color_for_decibels,
    config::ViewMode,
    helper::{decibels_relative, DB_MAX, DB_MIN},
    projector::display_scale,
    sampler::Sweep,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarPoint {
    /// Unit-disc position; 0° points up and angles grow clockwise.
    pub position: Point2<f32>,
    pub scale: f32,
    /// dB relative to the cut's peak, used for coloring.
    pub decibels: f32,
}

/// A 2D cut ready to draw: a closed outline plus per-segment colors.
#[derive(Debug)]
pub struct PolarTrace {
    pub points: Vec<PolarPoint>,
    /// Color of the translucent fill, from the mean displayed dB of the outline.
    pub fill: RGBColor,
}

// plotters 0.3.0's RGBColor is neither Clone nor PartialEq, so these match the derives by hand.
impl Clone for PolarTrace {
    fn clone(&self) -> Self {
        PolarTrace { points: self.points.clone(), fill: RGBColor(self.fill.0, self.fill.1, self.fill.2) }
    }
}

impl PartialEq for PolarTrace {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && (self.fill.0, self.fill.1, self.fill.2) == (other.fill.0, other.fill.1, other.fill.2)
    }
}

impl PolarTrace {
    /// Segment `i` joins point `i` to point `i + 1`, wrapping, and takes point `i`'s color.
    pub fn segments(&self) -> impl Iterator<Item = (Point2<f32>, Point2<f32>, RGBColor)> + '_ {
        let n = self.points.len();
        self.points.iter().enumerate().map(move |(i, p)| {
            let next = &self.points[(i + 1) % n];
            (p.position, next.position, color_for_decibels(p.decibels))
        })
    }
}

pub fn polar_trace(sweep: &Sweep, mode: ViewMode) -> PolarTrace {
    let max = sweep.max();
    let points: Vec<PolarPoint> = sweep
        .intensities()
        .iter()
        .enumerate()
        .map(|(i, &intensity)| {
            let angle = sweep.angle(i) - PI / 2.;
            let scale = display_scale(intensity, max, mode);
            let decibels = match mode {
                ViewMode::Gain => decibels_relative(intensity, max).max(DB_MIN).min(DB_MAX),
                ViewMode::Power => decibels_relative(intensity, max),
            };
            PolarPoint {
                // Flip y so 0° is up.
                position: Point2::new(scale * angle.cos(), -scale * angle.sin()),
                scale,
                decibels,
            }
        })
        .collect();

    let mean = points.iter().map(|p| p.decibels).sum::<f32>() / points.len().max(1) as f32;
    PolarTrace {
        points,
        fill: color_for_decibels(mean),
    }
}
