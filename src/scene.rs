use nalgebra::Point2;
use tracing::{info_span, trace};

use crate::{
    colormap::Legend,
    config::PatternConfig,
    metrics::{compute_metrics, Metrics},
    polar::{polar_trace, PolarTrace},
    projector::{axes, project_surface, ProjectedQuad},
    sampler::{sample_grid, sample_sweep, SweepPlane},
};

/// Everything the views need for one configuration. Rebuilt from scratch on every change.
#[derive(Clone, Debug)]
pub struct PatternScene {
    pub config: PatternConfig,
    pub azimuth: PolarTrace,
    pub elevation: PolarTrace,
    pub surface: Vec<ProjectedQuad>,
    pub axes: [(Point2<f32>, Point2<f32>); 3],
    pub legend: Legend,
    pub metrics: Metrics,
}

impl PatternScene {
    /// Runs the whole pipeline. Parameters are clamped first, whatever built `config`.
    pub fn compute(config: &PatternConfig) -> PatternScene {
        let config = PatternConfig::new(config.antenna, config.mode);
        let span = info_span!("pattern_scene", antenna = config.antenna.name(), mode = ?config.mode);
        let _enter = span.enter();

        let antenna = &config.antenna;
        let azimuth = sample_sweep(antenna, SweepPlane::Azimuth);
        let elevation = sample_sweep(antenna, SweepPlane::Elevation);
        let grid = sample_grid(antenna);

        let metrics = compute_metrics(antenna, &azimuth);
        trace!(%metrics, "scene metrics");

        PatternScene {
            config,
            azimuth: polar_trace(&azimuth, config.mode),
            elevation: polar_trace(&elevation, config.mode),
            surface: project_surface(&grid, config.mode),
            axes: axes(),
            legend: Legend::for_mode(config.mode),
            metrics,
        }
    }

    /// Caption used on exported images.
    pub fn title(&self) -> String {
        format!(
            "Radiation Pattern - {}",
            self.config.antenna.name().to_ascii_uppercase()
        )
    }
}
