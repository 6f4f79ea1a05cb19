//! Property-based checks of the pattern, metrics and projection invariants.

use std::{cmp::Ordering, f32::consts::PI};

use ndarray::Array1;
use proptest::prelude::*;

use radiation_lib::{
    antenna::Antenna,
    config::ViewMode,
    metrics::{compute_metrics, front_to_back_ratio, MAX_BEAMWIDTH, MAX_GAIN_DBI, MIN_BEAMWIDTH, MIN_GAIN_DBI},
    projector::project_surface,
    sampler::{sample_grid, sample_sweep, SweepPlane, SWEEP_SAMPLES},
};

fn arb_antenna() -> impl Strategy<Value = Antenna> {
    prop_oneof![
        (0.01f32..3.0).prop_map(|length| Antenna::Dipole { length }),
        (0.01f32..3.0).prop_map(|length| Antenna::Monopole { length }),
        (0.01f32..3.0, 0f32..360.).prop_map(|(separation, phase_offset)| {
            Antenna::TwoElementArray {
                separation,
                phase_offset,
            }
        }),
        (0u32..12).prop_map(|directors| Antenna::Yagi { directors }),
        Just(Antenna::Generic),
    ]
}

fn arb_theta() -> impl Strategy<Value = f32> {
    0f32..=PI
}

fn arb_phi() -> impl Strategy<Value = f32> {
    0f32..(2. * PI)
}

fn arb_mode() -> impl Strategy<Value = ViewMode> {
    prop_oneof![Just(ViewMode::Gain), Just(ViewMode::Power)]
}

proptest! {
    #[test]
    fn intensity_is_finite_and_non_negative(
        antenna in arb_antenna(),
        theta in arb_theta(),
        phi in arb_phi(),
    ) {
        let value = antenna.intensity(theta, phi);
        prop_assert!(value.is_finite(), "{} at ({}, {}) gave {}", antenna, theta, phi, value);
        prop_assert!(value >= 0., "{} at ({}, {}) gave {}", antenna, theta, phi, value);
    }
}

proptest! {
    #[test]
    fn wire_antennas_ignore_azimuth(
        length in 0.01f32..3.0,
        theta in arb_theta(),
        phi_a in arb_phi(),
        phi_b in arb_phi(),
    ) {
        for antenna in [Antenna::Dipole { length }, Antenna::Monopole { length }].iter() {
            prop_assert_eq!(antenna.intensity(theta, phi_a), antenna.intensity(theta, phi_b));
        }
    }
}

proptest! {
    #[test]
    fn monopole_is_silent_below_ground(
        length in 0.01f32..3.0,
        theta in (PI / 2. + 1e-3)..=PI,
        phi in arb_phi(),
    ) {
        prop_assert_eq!(Antenna::Monopole { length }.intensity(theta, phi), 0.);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn reported_metrics_stay_in_range(antenna in arb_antenna()) {
        let sweep = sample_sweep(&antenna, SweepPlane::Azimuth);
        let metrics = compute_metrics(&antenna, &sweep);
        prop_assert!(metrics.beamwidth_degrees >= MIN_BEAMWIDTH);
        prop_assert!(metrics.beamwidth_degrees <= MAX_BEAMWIDTH);
        prop_assert!(metrics.gain_dbi >= MIN_GAIN_DBI);
        prop_assert!(metrics.gain_dbi <= MAX_GAIN_DBI);
        prop_assert!(!metrics.front_to_back_db.is_nan());
    }
}

proptest! {
    #[test]
    fn silent_rear_sector_is_infinite_front_to_back(
        samples in proptest::collection::vec(0f32..10., SWEEP_SAMPLES),
    ) {
        let mut samples = Array1::from(samples);
        // ±30° around 180° for a 360-sample cut.
        for i in 150..=210 {
            samples[i] = 0.;
        }
        prop_assert_eq!(front_to_back_ratio(&samples), f32::INFINITY);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn surface_projection_is_deterministic_and_ordered(
        antenna in arb_antenna(),
        mode in arb_mode(),
    ) {
        let grid = sample_grid(&antenna);
        let first = project_surface(&grid, mode);
        let second = project_surface(&grid, mode);
        prop_assert_eq!(&first, &second);
        for pair in first.windows(2) {
            let order = pair[0]
                .depth
                .total_cmp(&pair[1].depth)
                .then(pair[0].cell.cmp(&pair[1].cell));
            prop_assert_eq!(order, Ordering::Less);
        }
    }
}
