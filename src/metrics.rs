//! Engineering figures of merit derived from the azimuth cut.
//!
//! Every figure is first measured from the samples and then blended with a closed-form
//! estimate for the antenna type, because a single 360-sample cut cannot see the full
//! sphere.

use std::f32::consts::PI;
use std::fmt;

use ndarray::Array1;
use tracing::{debug, instrument};

use crate::{antenna::Antenna, helper::decibels, sampler::Sweep};

// Half power, i.e. the -3 dB point.
const HALF_POWER: f32 = 0.5;
const SECTOR_HALF_WIDTH_DEGREES: usize = 30;
const EMPTY_SECTOR: f32 = 1e-10;
// A dipole cut stronger than this front-to-back is treated as having no rear at all.
const OMNI_FRONT_TO_BACK_DB: f32 = 30.;

pub const MIN_GAIN_DBI: f32 = -10.;
pub const MAX_GAIN_DBI: f32 = 25.;
pub const MIN_BEAMWIDTH: f32 = 1.;
pub const MAX_BEAMWIDTH: f32 = 360.;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub gain_dbi: f32,
    pub beamwidth_degrees: f32,
    /// Finite dB value, or `f32::INFINITY` when the pattern has no measurable rear lobe.
    pub front_to_back_db: f32,
}

impl Metrics {
    pub fn gain_text(&self) -> String {
        fixed(self.gain_dbi, 2)
    }

    pub fn beamwidth_text(&self) -> String {
        format!("{}°", fixed(self.beamwidth_degrees, 0))
    }

    pub fn front_to_back_text(&self) -> String {
        if self.front_to_back_db.is_finite() {
            format!("{} dB", fixed(self.front_to_back_db, 1))
        } else {
            "∞".to_owned()
        }
    }
}

// Fixed-point text with ties rounded away from zero; `format!` alone rounds them to even.
fn fixed(value: f32, digits: i32) -> String {
    let scale = 10f64.powi(digits);
    let rounded = (f64::from(value) * scale).round() / scale;
    format!("{:.*}", digits as usize, rounded)
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gain {} dBi, beamwidth {}, front-to-back {}",
            self.gain_text(),
            self.beamwidth_text(),
            self.front_to_back_text()
        )
    }
}

/// Half-power beamwidth in degrees.
///
/// Threshold crossings are collected in scan order around the circle and only the first
/// two are used. Patterns whose side lobes also reach half power can therefore report the
/// width of a side lobe, or the gap between lobes, instead of the main beam.
///
/// Returns 360 when fewer than two crossings exist and the first sample is above the
/// threshold, and 0 when it is below. The 0 is only clamped later, by [`blend`].
pub fn half_power_beamwidth(intensities: &Array1<f32>, max: f32) -> f32 {
    let n = intensities.len();
    if n == 0 {
        return 0.;
    }
    let threshold = max * HALF_POWER;
    let crossings: Vec<usize> = (0..n)
        .filter(|&i| {
            let current = intensities[i];
            let next = intensities[(i + 1) % n];
            (current >= threshold && next < threshold) || (current < threshold && next >= threshold)
        })
        .take(2)
        .collect();

    if crossings.len() < 2 {
        return if intensities[0] >= threshold {
            MAX_BEAMWIDTH
        } else {
            0.
        };
    }

    let angle = |index: usize| index as f32 / n as f32 * 360.;
    let mut width = (angle(crossings[1]) - angle(crossings[0])).abs();
    if width > 180. {
        width = 360. - width;
    }
    width.max(MIN_BEAMWIDTH).min(MAX_BEAMWIDTH)
}

/// Ratio of the strongest sample within ±30° of 0° to the strongest within ±30° of 180°.
///
/// Sector sizes come from integer division of the sample count, so a cut whose length is
/// not a multiple of 12 gets slightly narrower sectors.
pub fn front_to_back_ratio(intensities: &Array1<f32>) -> f32 {
    let n = intensities.len();
    if n == 0 {
        return f32::INFINITY;
    }
    let span = n * SECTOR_HALF_WIDTH_DEGREES / 360;

    let mut front_max = 0f32;
    for i in 0..=span {
        front_max = front_max
            .max(intensities[i % n])
            .max(intensities[(n - i % n) % n]);
    }

    let back_center = n / 2;
    let mut back_max = 0f32;
    for offset in 0..=2 * span {
        let index = (back_center + n + offset - span) % n;
        back_max = back_max.max(intensities[index]);
    }

    if back_max < EMPTY_SECTOR {
        f32::INFINITY
    } else {
        decibels(front_max / back_max)
    }
}

/// Peak over mean, in dBi. A silent cut has zero directivity, i.e. -inf dBi.
pub fn measured_directivity(intensities: &Array1<f32>, max: f32) -> f32 {
    let mean = intensities.mean().unwrap_or(0.);
    let directivity = if mean == 0. { 0. } else { max / mean };
    decibels(directivity)
}

/// Textbook dipole gain in dBi for a wire `length` wavelengths long.
pub fn dipole_gain(length: f32) -> f32 {
    if length < 0.1 {
        // Hertzian dipole
        decibels(1.5)
    } else if (0.45..=0.55).contains(&length) {
        2.15
    } else if (0.95..=1.05).contains(&length) {
        3.82
    } else if (1.45..=1.55).contains(&length) {
        3.5
    } else {
        (1.64 + 0.5 * (PI * length).sin().powi(2)).max(0.).min(4.)
    }
}

/// A monopole over ground behaves like a dipole twice its length radiating into half space.
pub fn monopole_gain(length: f32) -> f32 {
    dipole_gain(2. * length) + 3.
}

pub fn array_spacing_factor(separation: f32) -> f32 {
    if separation > 0.3 && separation < 0.7 {
        1.
    } else if (0.7..1.).contains(&separation) {
        0.5 + (separation - 0.7) * 0.5
    } else {
        (1. - (separation - 0.5).abs() * 0.5).max(0.)
    }
}

/// Gain of two half-wave elements before blending with the measured directivity.
pub fn two_element_array_gain(separation: f32, phase_offset_degrees: f32) -> f32 {
    const ELEMENT_GAIN: f32 = 2.15;
    let array_gain = decibels(2f32);
    let phase_factor = phase_offset_degrees.to_radians().cos();
    ELEMENT_GAIN + array_gain + array_spacing_factor(separation) + 0.5 * phase_factor
}

pub fn yagi_gain(directors: u32) -> f32 {
    7. + 1.2 * directors as f32
}

pub fn yagi_front_to_back(directors: u32) -> f32 {
    12. + 2.5 * directors as f32
}

/// Raw measurements from one cut, before any per-antenna correction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub beamwidth_degrees: f32,
    pub front_to_back_db: f32,
    pub directivity_dbi: f32,
    /// True when every sample of the cut is identical.
    pub flat: bool,
}

pub fn measure(sweep: &Sweep) -> Measurement {
    let intensities = sweep.intensities();
    let first = intensities.iter().next().copied().unwrap_or(0.);
    Measurement {
        beamwidth_degrees: half_power_beamwidth(intensities, sweep.max()),
        front_to_back_db: front_to_back_ratio(intensities),
        directivity_dbi: measured_directivity(intensities, sweep.max()),
        flat: intensities.iter().all(|&x| x == first),
    }
}

/// Combines a measurement with the closed-form estimates for `antenna` and applies the
/// final range clamps.
pub fn blend(antenna: &Antenna, measured: Measurement) -> Metrics {
    let mut front_to_back = measured.front_to_back_db;
    let gain = match *antenna {
        Antenna::Dipole { length } => {
            front_to_back = omnidirectional_front_to_back(measured);
            measured.directivity_dbi.max(dipole_gain(length))
        }
        Antenna::Monopole { length } => {
            front_to_back = omnidirectional_front_to_back(measured);
            measured.directivity_dbi.max(monopole_gain(length))
        }
        Antenna::TwoElementArray {
            separation,
            phase_offset,
        } => {
            if !front_to_back.is_finite() {
                front_to_back = 0.;
            }
            two_element_array_gain(separation, phase_offset).max(measured.directivity_dbi)
        }
        Antenna::Yagi { directors } => {
            front_to_back = front_to_back.max(yagi_front_to_back(directors));
            yagi_gain(directors).max(measured.directivity_dbi)
        }
        Antenna::Generic => {
            if !front_to_back.is_finite() {
                front_to_back = 0.;
            }
            measured.directivity_dbi
        }
    };

    Metrics {
        gain_dbi: gain.max(MIN_GAIN_DBI).min(MAX_GAIN_DBI),
        beamwidth_degrees: measured
            .beamwidth_degrees
            .max(MIN_BEAMWIDTH)
            .min(MAX_BEAMWIDTH),
        front_to_back_db: front_to_back,
    }
}

// Wire antennas radiate the same way in every azimuth, so any front/back comparison of
// their azimuth cut is either noise or meaningless.
fn omnidirectional_front_to_back(measured: Measurement) -> f32 {
    let ratio = measured.front_to_back_db;
    if !ratio.is_finite() || ratio > OMNI_FRONT_TO_BACK_DB || measured.flat {
        f32::INFINITY
    } else {
        ratio
    }
}

/// Measures the azimuth cut of `antenna` and reports blended metrics.
#[instrument(skip(sweep), fields(antenna = antenna.name()))]
pub fn compute_metrics(antenna: &Antenna, sweep: &Sweep) -> Metrics {
    let measured = measure(sweep);
    debug!(?measured, "measured azimuth cut");
    blend(antenna, measured)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::Array1;

    use super::*;
    use crate::sampler::{sample_sweep, SweepPlane};

    fn metrics_for(antenna: Antenna) -> Metrics {
        let sweep = sample_sweep(&antenna, SweepPlane::Azimuth);
        compute_metrics(&antenna, &sweep)
    }

    #[test]
    fn flat_cuts_fall_back_to_full_or_zero_width() {
        let above = Array1::from_elem(360, 1f32);
        assert_eq!(half_power_beamwidth(&above, 1.), 360.);
        let below = Array1::from_elem(360, 0.2f32);
        assert_eq!(half_power_beamwidth(&below, 1.), 0.);
    }

    #[test]
    fn zero_width_is_clamped_by_blend() {
        let measured = Measurement {
            beamwidth_degrees: 0.,
            front_to_back_db: 3.,
            directivity_dbi: 1.,
            flat: false,
        };
        assert_eq!(blend(&Antenna::Generic, measured).beamwidth_degrees, 1.);
    }

    #[test]
    fn single_lobe_width_uses_first_two_crossings() {
        // 40 samples above half power, starting at index 10.
        let cut = Array1::from_shape_fn(360, |i| if (10..50).contains(&i) { 1f32 } else { 0.1 });
        // Crossings at 9 (rising) and 49 (falling).
        assert_relative_eq!(half_power_beamwidth(&cut, 1.), 40., epsilon = 1e-3);
    }

    #[test]
    fn wide_separation_takes_the_minor_arc() {
        let cut = Array1::from_shape_fn(360, |i| if (20..320).contains(&i) { 0.1f32 } else { 1. });
        // Falling at 19, rising at 319: 300° apart, reported as 60°.
        assert_relative_eq!(half_power_beamwidth(&cut, 1.), 60., epsilon = 1e-3);
    }

    #[test]
    fn side_lobes_can_shadow_the_main_beam() {
        let cut = Array1::from_shape_fn(360, |i| match i {
            100..=104 => 0.6f32,
            170..=190 => 1.,
            _ => 0.,
        });
        // The narrow side lobe is found first.
        assert_relative_eq!(half_power_beamwidth(&cut, 1.), 5., epsilon = 1e-3);
    }

    #[test]
    fn empty_rear_sector_is_infinite() {
        let cut = Array1::from_shape_fn(360, |i| if i < 90 || i > 270 { 2f32 } else { 0. });
        assert_eq!(front_to_back_ratio(&cut), f32::INFINITY);
        let tiny = Array1::from_shape_fn(360, |i| if (150..=210).contains(&i) { 1e-11f32 } else { 7. });
        assert_eq!(front_to_back_ratio(&tiny), f32::INFINITY);
    }

    #[test]
    fn sectors_wrap_around_zero() {
        // Only the sample just below 360° lights up the front.
        let cut = Array1::from_shape_fn(360, |i| match i {
            359 => 100f32,
            180 => 1.,
            _ => 0.,
        });
        assert_relative_eq!(front_to_back_ratio(&cut), 20., epsilon = 1e-5);
        // Index 31 is outside the ±30 sample window.
        let outside = Array1::from_shape_fn(360, |i| match i {
            31 => 100f32,
            180 => 1.,
            _ => 0.,
        });
        assert_eq!(front_to_back_ratio(&outside), f32::NEG_INFINITY);
    }

    #[test]
    fn silent_cut_has_no_directivity() {
        let silent = Array1::from_elem(360, 0f32);
        assert_eq!(measured_directivity(&silent, 1.), f32::NEG_INFINITY);
        let flat = Array1::from_elem(360, 3f32);
        assert_abs_diff_eq!(measured_directivity(&flat, 3.), 0., epsilon = 1e-5);
    }

    #[test]
    fn dipole_gain_landmarks() {
        assert_eq!(dipole_gain(0.5), 2.15);
        assert_eq!(dipole_gain(1.0), 3.82);
        assert_eq!(dipole_gain(1.5), 3.5);
        assert_relative_eq!(dipole_gain(0.05), 1.7609, epsilon = 1e-4);
        assert_relative_eq!(dipole_gain(0.25), 1.64 + 0.25, epsilon = 1e-5);
        assert_relative_eq!(monopole_gain(0.25), 5.15, epsilon = 1e-5);
    }

    #[test]
    fn spacing_factor_regions() {
        assert_eq!(array_spacing_factor(0.5), 1.);
        assert_relative_eq!(array_spacing_factor(0.8), 0.55, epsilon = 1e-6);
        assert_relative_eq!(array_spacing_factor(1.5), 0.5, epsilon = 1e-6);
        assert_relative_eq!(array_spacing_factor(0.2), 0.85, epsilon = 1e-6);
        assert_eq!(array_spacing_factor(4.), 0.);
    }

    #[test]
    fn half_wave_dipole_metrics() {
        let metrics = metrics_for(Antenna::Dipole { length: 0.5 });
        assert_relative_eq!(metrics.gain_dbi, 2.15);
        assert_eq!(metrics.front_to_back_db, f32::INFINITY);
        assert_eq!(metrics.front_to_back_text(), "∞");
        // The horizontal cut of a vertical dipole is a circle.
        assert_eq!(metrics.beamwidth_degrees, 360.);
    }

    #[test]
    fn half_wave_dipole_elevation_beamwidth_is_classic() {
        let antenna = Antenna::Dipole { length: 0.5 };
        let sweep = sample_sweep(&antenna, SweepPlane::Elevation);
        let width = half_power_beamwidth(sweep.intensities(), sweep.max());
        assert!((width - 78.).abs() <= 2., "got {}", width);
    }

    #[test]
    fn yagi_with_three_directors() {
        let metrics = metrics_for(Antenna::Yagi { directors: 3 });
        assert_relative_eq!(metrics.gain_dbi, 10.6, epsilon = 1e-5);
        assert!(metrics.front_to_back_db >= 19.5);
    }

    #[test]
    fn broadside_pair_gain() {
        assert_relative_eq!(two_element_array_gain(0.5, 0.), 6.6603, epsilon = 1e-3);
        let metrics = metrics_for(Antenna::TwoElementArray {
            separation: 0.5,
            phase_offset: 0.,
        });
        assert_relative_eq!(metrics.gain_dbi, 6.6603, epsilon = 1e-3);
        assert!(metrics.front_to_back_db.is_finite());
    }

    #[test]
    fn endfire_pair_has_finite_front_to_back() {
        let metrics = metrics_for(Antenna::TwoElementArray {
            separation: 0.25,
            phase_offset: 270.,
        });
        assert!(metrics.front_to_back_db.is_finite());
    }

    #[test]
    fn gain_is_clamped() {
        let measured = Measurement {
            beamwidth_degrees: 400.,
            front_to_back_db: f32::INFINITY,
            directivity_dbi: f32::NEG_INFINITY,
            flat: false,
        };
        let metrics = blend(&Antenna::Generic, measured);
        assert_eq!(metrics.gain_dbi, MIN_GAIN_DBI);
        assert_eq!(metrics.beamwidth_degrees, 360.);
        assert_eq!(metrics.front_to_back_db, 0.);

        let metrics = blend(&Antenna::Yagi { directors: 40 }, measured);
        assert_eq!(metrics.gain_dbi, MAX_GAIN_DBI);
    }

    #[test]
    fn display_formatting() {
        let metrics = Metrics {
            gain_dbi: 6.6603,
            beamwidth_degrees: 78.4,
            front_to_back_db: 12.345,
        };
        assert_eq!(metrics.gain_text(), "6.66");
        assert_eq!(metrics.beamwidth_text(), "78°");
        assert_eq!(metrics.front_to_back_text(), "12.3 dB");
    }

    #[test]
    fn exact_ties_round_up() {
        let metrics = Metrics {
            gain_dbi: 2.125,
            beamwidth_degrees: 78.5,
            front_to_back_db: 0.25,
        };
        assert_eq!(metrics.gain_text(), "2.13");
        assert_eq!(metrics.beamwidth_text(), "79°");
        assert_eq!(metrics.front_to_back_text(), "0.3 dB");
        let negative = Metrics {
            gain_dbi: -2.125,
            ..metrics
        };
        assert_eq!(negative.gain_text(), "-2.13");
    }

    #[test]
    fn quarter_wave_monopole() {
        let metrics = metrics_for(Antenna::Monopole { length: 0.25 });
        assert_relative_eq!(metrics.gain_dbi, 5.15, epsilon = 1e-4);
        assert_eq!(metrics.front_to_back_db, f32::INFINITY);
        assert_eq!(metrics.beamwidth_degrees, 360.);
        assert_eq!(metrics.front_to_back_text(), "∞");
    }

    #[test]
    fn monopole_blend_keeps_the_larger_gain() {
        let measured = Measurement {
            beamwidth_degrees: 90.,
            front_to_back_db: 12.,
            directivity_dbi: 7.,
            flat: false,
        };
        let metrics = blend(&Antenna::Monopole { length: 0.25 }, measured);
        assert_relative_eq!(metrics.gain_dbi, 7.);
        assert_eq!(metrics.front_to_back_db, 12.);

        let weak = Measurement {
            directivity_dbi: 1.,
            front_to_back_db: f32::NAN,
            ..measured
        };
        let metrics = blend(&Antenna::Monopole { length: 0.25 }, weak);
        assert_relative_eq!(metrics.gain_dbi, monopole_gain(0.25));
        assert_eq!(metrics.front_to_back_db, f32::INFINITY);
    }
}
