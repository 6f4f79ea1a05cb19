use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use plotters::{
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tracing::{error, info, instrument};

use crate::{
    config::RenderSettings,
    error::{render_error, PatternError, PatternResult},
    pattern_chart::{build_polar_chart, build_surface_chart},
    sampler::SweepPlane,
    scene::PatternScene,
};

const TITLE_COLOR: RGBColor = RGBColor(0, 212, 255);

/// `radiation-pattern-<variant>-<unix seconds>.png`
pub fn default_file_name(scene: &PatternScene) -> PathBuf {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!(
        "radiation-pattern-{}-{}.png",
        scene.config.antenna.name(),
        seconds
    ))
}

/// Writes the two cuts side by side above the 3D view, with the variant as a title.
#[instrument(skip(scene, settings), fields(antenna = scene.config.antenna.name()))]
pub fn export_png(scene: &PatternScene, settings: &RenderSettings, path: &Path) -> PatternResult<()> {
    draw_composite(scene, settings, path).map_err(|err| {
        error!(%err, path = %path.display(), "export failed");
        PatternError::Export {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    })?;
    info!(path = %path.display(), "exported pattern image");
    Ok(())
}

fn draw_composite(scene: &PatternScene, settings: &RenderSettings, path: &Path) -> PatternResult<()> {
    let (width, height) = settings.composite_size();
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&settings.background_color()).map_err(render_error)?;

    let top_height = settings.azimuth.height.max(settings.elevation.height);
    let (top, bottom) = root.split_vertically(top_height as i32);
    let (azimuth, elevation) = top.split_horizontally(settings.azimuth.width as i32);

    build_polar_chart(
        ChartBuilder::on(&azimuth),
        &scene.azimuth,
        SweepPlane::Azimuth,
        scene.config.mode,
        settings.grid_levels,
    )?;
    build_polar_chart(
        ChartBuilder::on(&elevation),
        &scene.elevation,
        SweepPlane::Elevation,
        scene.config.mode,
        settings.grid_levels,
    )?;

    let aspect = settings.surface.width as f32 / settings.surface.height.max(1) as f32;
    build_surface_chart(
        ChartBuilder::on(&bottom),
        &scene.surface,
        &scene.axes,
        &scene.legend,
        aspect,
    )?;

    let title_style = ("sans-serif", 24)
        .into_font()
        .color(&TITLE_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    root.draw(&Text::new(
        scene.title(),
        ((width / 2) as i32, height as i32 - 20),
        title_style,
    ))
    .map_err(render_error)?;

    root.present().map_err(render_error)
}
