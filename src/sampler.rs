use std::f32::consts::PI;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::helper_traits::{SphericalFunction, SphericalFunctionHelper};

/// Samples per 2D cut, uniformly spaced over a full turn.
pub const SWEEP_SAMPLES: usize = 360;
/// Polar intervals of the 3D grid; the grid holds one more row than this.
pub const THETA_STEPS: usize = 24;
/// Azimuth intervals of the 3D grid; the grid holds one more column than this.
pub const PHI_STEPS: usize = 48;

/// Which angle a 2D cut sweeps. The other one is held fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPlane {
    /// θ = π/2, φ swept.
    Azimuth,
    /// φ = 0, θ swept.
    Elevation,
}

impl SweepPlane {
    pub fn angles_at(&self, sweep_angle: f32) -> (f32, f32) {
        match self {
            SweepPlane::Azimuth => (PI / 2., sweep_angle),
            SweepPlane::Elevation => (sweep_angle, 0.),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SweepPlane::Azimuth => "Azimuth (θ = 90°)",
            SweepPlane::Elevation => "Elevation (φ = 0°)",
        }
    }
}

/// One evaluated direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensitySample {
    pub index: usize,
    pub theta: f32,
    pub phi: f32,
    pub intensity: f32,
}

/// A full turn of samples in one plane.
#[derive(Clone, Debug)]
pub struct Sweep {
    plane: SweepPlane,
    intensities: Array1<f32>,
    max: f32,
}

impl Sweep {
    pub fn plane(&self) -> SweepPlane {
        self.plane
    }

    pub fn intensities(&self) -> &Array1<f32> {
        &self.intensities
    }

    /// Peak intensity, or 1 if every sample is zero.
    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    /// Swept angle of sample `index`, in radians.
    pub fn angle(&self, index: usize) -> f32 {
        sweep_angle(index, self.len())
    }

    pub fn samples(&self) -> impl Iterator<Item = IntensitySample> + '_ {
        let n = self.len();
        let plane = self.plane;
        self.intensities
            .iter()
            .enumerate()
            .map(move |(index, &intensity)| {
                let (theta, phi) = plane.angles_at(sweep_angle(index, n));
                IntensitySample {
                    index,
                    theta,
                    phi,
                    intensity,
                }
            })
    }
}

/// The (θ, φ) grid behind the 3D view. Row `i` is θ = iπ/24, column `j` is φ = 2jπ/48.
#[derive(Clone, Debug)]
pub struct PatternGrid {
    intensities: Array2<f32>,
    max: f32,
}

impl PatternGrid {
    pub fn intensities(&self) -> &Array2<f32> {
        &self.intensities
    }

    /// Peak intensity, or 1 if every sample is zero.
    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn theta(&self, row: usize) -> f32 {
        grid_theta(row)
    }

    pub fn phi(&self, column: usize) -> f32 {
        grid_phi(column)
    }

    pub fn samples(&self) -> impl Iterator<Item = IntensitySample> + '_ {
        let columns = self.intensities.ncols();
        self.intensities
            .indexed_iter()
            .map(move |((row, column), &intensity)| IntensitySample {
                index: row * columns + column,
                theta: grid_theta(row),
                phi: grid_phi(column),
                intensity,
            })
    }
}

// (i / n) · span, so quarter and half turns land exactly on π/2 and π.
fn sweep_angle(index: usize, count: usize) -> f32 {
    (index as f32 / count as f32) * 2. * PI
}

fn grid_theta(row: usize) -> f32 {
    (row as f32 / THETA_STEPS as f32) * PI
}

fn grid_phi(column: usize) -> f32 {
    (column as f32 / PHI_STEPS as f32) * 2. * PI
}

fn peak_or_unit<'a>(values: impl Iterator<Item = &'a f32>) -> f32 {
    let max = values.copied().fold(0f32, f32::max);
    if max == 0. {
        1.
    } else {
        max
    }
}

#[instrument(skip(pattern))]
pub fn sample_sweep(pattern: &impl SphericalFunction, plane: SweepPlane) -> Sweep {
    let intensities: Array1<f32> = pattern
        .lookup_many((0..SWEEP_SAMPLES).map(|i| plane.angles_at(sweep_angle(i, SWEEP_SAMPLES))))
        .into();
    let max = peak_or_unit(intensities.iter());
    debug!(max, "sampled sweep");
    Sweep {
        plane,
        intensities,
        max,
    }
}

#[instrument(skip(pattern))]
pub fn sample_grid(pattern: &impl SphericalFunction) -> PatternGrid {
    let intensities = Array2::from_shape_fn((THETA_STEPS + 1, PHI_STEPS + 1), |(row, column)| {
        pattern.lookup(grid_theta(row), grid_phi(column))
    });
    let max = peak_or_unit(intensities.iter());
    debug!(max, "sampled grid");
    PatternGrid { intensities, max }
}
