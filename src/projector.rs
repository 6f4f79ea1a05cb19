use std::f32::consts::PI;

use nalgebra::{Matrix2x3, Point2, Vector3};
use plotters::style::RGBColor;
use tracing::{debug, instrument};

use crate::{
    colormap::color_for_decibels,
    config::ViewMode,
    helper::{decibels_relative, normalize_decibels, spherical_to_cartesian},
    sampler::PatternGrid,
};

/// Tilt of the isometric view.
pub const ISO_ANGLE: f32 = PI / 6.;
/// Length of the drawn reference axes, in units of the peak radius.
pub const AXIS_LENGTH: f32 = 1.2;

/// One grid cell after projection. Corners run (θi, φj), (θi, φj+1), (θi+1, φj+1), (θi+1, φj).
#[derive(Debug)]
pub struct ProjectedQuad {
    pub corners: [Point2<f32>; 4],
    /// Mean z of the corners before projection. Larger is nearer the viewer.
    pub depth: f32,
    /// Mean of the corners' dB relative to the grid peak. May be -inf.
    pub decibels: f32,
    pub color: RGBColor,
    /// Row-major cell index, used to order quads of equal depth.
    pub cell: usize,
}

// plotters 0.3.0's RGBColor is neither Clone nor PartialEq, so these match the derives by hand.
impl Clone for ProjectedQuad {
    fn clone(&self) -> Self {
        ProjectedQuad {
            corners: self.corners,
            depth: self.depth,
            decibels: self.decibels,
            color: RGBColor(self.color.0, self.color.1, self.color.2),
            cell: self.cell,
        }
    }
}

impl PartialEq for ProjectedQuad {
    fn eq(&self, other: &Self) -> bool {
        self.corners == other.corners
            && self.depth == other.depth
            && self.decibels == other.decibels
            && (self.color.0, self.color.1, self.color.2) == (other.color.0, other.color.1, other.color.2)
            && self.cell == other.cell
    }
}

/// Radius a sample is drawn at, in [0, 1].
pub fn display_scale(intensity: f32, max: f32, mode: ViewMode) -> f32 {
    match mode {
        ViewMode::Gain => normalize_decibels(decibels_relative(intensity, max)),
        ViewMode::Power => (intensity / max).max(0.),
    }
}

/// Fixed isometric projection onto the screen plane, with v pointing up.
pub fn isometric() -> Matrix2x3<f32> {
    let (s, c) = ISO_ANGLE.sin_cos();
    Matrix2x3::new(c, -c, 0., -s, -s, 1.)
}

pub fn project(point: &Vector3<f32>) -> Point2<f32> {
    Point2::from(isometric() * point)
}

/// Endpoints of the x, y and z reference axes, in that order.
pub fn axes() -> [(Point2<f32>, Point2<f32>); 3] {
    let origin = project(&Vector3::zeros());
    [
        (origin, project(&(Vector3::x() * AXIS_LENGTH))),
        (origin, project(&(Vector3::y() * AXIS_LENGTH))),
        (origin, project(&(Vector3::z() * AXIS_LENGTH))),
    ]
}

/// Builds the surface quads of `grid` and sorts them far to near for painting.
#[instrument(skip(grid))]
pub fn project_surface(grid: &PatternGrid, mode: ViewMode) -> Vec<ProjectedQuad> {
    let intensities = grid.intensities();
    let (rows, columns) = intensities.dim();
    let max = grid.max();
    let mut quads = Vec::with_capacity(rows.saturating_sub(1) * columns.saturating_sub(1));

    for ti in 0..rows.saturating_sub(1) {
        for pj in 0..columns.saturating_sub(1) {
            let cells = [(ti, pj), (ti, pj + 1), (ti + 1, pj + 1), (ti + 1, pj)];

            let mut corners = [Point2::origin(); 4];
            let mut depth = 0.;
            let mut decibels = 0.;
            for (corner, &(row, column)) in corners.iter_mut().zip(cells.iter()) {
                let intensity = intensities[[row, column]];
                let scale = display_scale(intensity, max, mode);
                let position = spherical_to_cartesian(scale, grid.theta(row), grid.phi(column));
                *corner = project(&position);
                depth += position.z / 4.;
                decibels += decibels_relative(intensity, max) / 4.;
            }

            quads.push(ProjectedQuad {
                corners,
                depth,
                decibels,
                color: color_for_decibels(decibels),
                cell: ti * (columns - 1) + pj,
            });
        }
    }

    quads.sort_by(|a, b| a.depth.total_cmp(&b.depth).then(a.cell.cmp(&b.cell)));
    debug!(quads = quads.len(), "projected surface");
    quads
}
