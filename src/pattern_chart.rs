use plotters::prelude::*;
use plotters_iced::Chart;
use tracing::warn;

use crate::{
    colormap::Legend,
    config::ViewMode,
    error::{render_error, PatternResult},
    helper::{DB_MAX, DB_MIN},
    polar::PolarTrace,
    projector::ProjectedQuad,
    scene::PatternScene,
    sampler::SweepPlane,
};

const GRID: RGBColor = RGBColor(0, 212, 255);
const ACCENT: RGBColor = RGBColor(0, 212, 255);
const AXIS_COLORS: [RGBColor; 3] = [
    RGBColor(255, 100, 100),
    RGBColor(100, 255, 100),
    RGBColor(100, 100, 255),
];
// Polar panes leave room outside the unit circle for the angle labels.
const POLAR_EXTENT: f32 = 1.25;
const SURFACE_HALF_HEIGHT: f32 = 1.3;

fn circle(radius: f32) -> Vec<(f32, f32)> {
    (0..=72)
        .map(|i| {
            let a = (i as f32 * 5.).to_radians();
            (radius * a.cos(), radius * a.sin())
        })
        .collect()
}

/// Draws one 2D cut: dB rings, 30° spokes, the filled outline and its colored edge.
pub fn build_polar_chart<DB: DrawingBackend>(
    mut builder: ChartBuilder<DB>,
    trace: &PolarTrace,
    plane: SweepPlane,
    mode: ViewMode,
    grid_levels: u32,
) -> PatternResult<()> {
    let mut chart = builder
        .caption(plane.title(), ("sans-serif", 18).into_font().color(&ACCENT))
        .margin(10)
        .build_cartesian_2d(-POLAR_EXTENT..POLAR_EXTENT, -POLAR_EXTENT..POLAR_EXTENT)
        .map_err(render_error)?;

    let grid_style = GRID.mix(0.15).stroke_width(1);
    let label_font = ("sans-serif", 11).into_font().color(&GRID.mix(0.6));

    let levels = grid_levels.max(1);
    chart
        .draw_series((1..=levels).map(|i| PathElement::new(circle(i as f32 / levels as f32), grid_style.clone())))
        .map_err(render_error)?;
    chart
        .draw_series((1..levels).map(|i| {
            let fraction = i as f32 / levels as f32;
            let label = match mode {
                ViewMode::Gain => format!("{:.0}dB", DB_MIN + (DB_MAX - DB_MIN) * fraction),
                ViewMode::Power => format!("{:.0}%", 100. * fraction),
            };
            Text::new(label, (0.02, fraction), label_font.clone())
        }))
        .map_err(render_error)?;

    chart
        .draw_series((0..12).map(|i| {
            let a = (i as f32 * 30.).to_radians();
            PathElement::new(vec![(0., 0.), (a.sin(), a.cos())], grid_style.clone())
        }))
        .map_err(render_error)?;
    chart
        .draw_series((0..12).map(|i| {
            let degrees = i * 30;
            let a = (degrees as f32).to_radians();
            Text::new(
                format!("{}°", degrees),
                (1.1 * a.sin() - 0.05, 1.1 * a.cos() + 0.03),
                label_font.clone(),
            )
        }))
        .map_err(render_error)?;

    if !trace.points.is_empty() {
        let outline: Vec<(f32, f32)> = trace
            .points
            .iter()
            .map(|p| (p.position.x, p.position.y))
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(outline, trace.fill.mix(0.2).filled())))
            .map_err(render_error)?;
        chart
            .draw_series(trace.segments().map(|(from, to, color)| {
                PathElement::new(vec![(from.x, from.y), (to.x, to.y)], color.stroke_width(2))
            }))
            .map_err(render_error)?;
    }
    Ok(())
}

/// Draws the painter-sorted surface, the reference axes and the color legend.
pub fn build_surface_chart<DB: DrawingBackend>(
    mut builder: ChartBuilder<DB>,
    quads: &[ProjectedQuad],
    axes: &[(nalgebra::Point2<f32>, nalgebra::Point2<f32>); 3],
    legend: &Legend,
    aspect: f32,
) -> PatternResult<()> {
    let half_width = SURFACE_HALF_HEIGHT * aspect.max(0.5);
    let mut chart = builder
        .caption("3D Pattern", ("sans-serif", 18).into_font().color(&ACCENT))
        .margin(10)
        .build_cartesian_2d(-half_width..half_width, -SURFACE_HALF_HEIGHT..SURFACE_HALF_HEIGHT)
        .map_err(render_error)?;

    // Quads arrive far to near; drawing in order lets nearer ones cover farther ones.
    for quad in quads {
        let corners: Vec<(f32, f32)> = quad.corners.iter().map(|p| (p.x, p.y)).collect();
        let mut edge = corners.clone();
        edge.push(corners[0]);
        chart
            .draw_series(std::iter::once(Polygon::new(corners, quad.color.mix(0.8).filled())))
            .map_err(render_error)?;
        chart
            .draw_series(std::iter::once(PathElement::new(edge, quad.color.stroke_width(1))))
            .map_err(render_error)?;
    }

    chart
        .draw_series(axes.iter().zip(AXIS_COLORS.iter()).map(|((from, to), color)| {
            PathElement::new(
                vec![(from.x, from.y), (to.x, to.y)],
                color.mix(0.6).stroke_width(2),
            )
        }))
        .map_err(render_error)?;

    draw_legend(&mut chart, legend, -half_width + 0.1, -SURFACE_HALF_HEIGHT + 0.1)
}

fn draw_legend<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<plotters::coord::types::RangedCoordf32, plotters::coord::types::RangedCoordf32>>,
    legend: &Legend,
    left: f32,
    bottom: f32,
) -> PatternResult<()> {
    const BAR_WIDTH: f32 = 1.2;
    const BAR_HEIGHT: f32 = 0.08;
    let stops = legend.gradient(24);
    let step = BAR_WIDTH / stops.len() as f32;
    let label_font = ("sans-serif", 11).into_font().color(&ACCENT);

    chart
        .draw_series(stops.iter().enumerate().map(|(i, color)| {
            let x0 = left + i as f32 * step;
            Rectangle::new(
                [(x0, bottom + 0.12), (x0 + step, bottom + 0.12 + BAR_HEIGHT)],
                color.filled(),
            )
        }))
        .map_err(render_error)?;

    let label_step = BAR_WIDTH / (legend.labels.len().max(2) - 1) as f32;
    chart
        .draw_series(legend.labels.iter().enumerate().map(|(i, label)| {
            Text::new(
                label.clone(),
                (left + i as f32 * label_step - 0.05, bottom + 0.08),
                label_font.clone(),
            )
        }))
        .map_err(render_error)?;
    chart
        .draw_series(std::iter::once(Text::new(
            legend.caption.to_owned(),
            (left, bottom + 0.3),
            label_font.clone(),
        )))
        .map_err(render_error)?;
    Ok(())
}

/// A polar pane for the interactive viewer.
pub struct PolarView {
    pub plane: SweepPlane,
    pub trace: PolarTrace,
    pub mode: ViewMode,
    pub grid_levels: u32,
}

impl PolarView {
    pub fn new(plane: SweepPlane, scene: &PatternScene, grid_levels: u32) -> PolarView {
        let trace = match plane {
            SweepPlane::Azimuth => scene.azimuth.clone(),
            SweepPlane::Elevation => scene.elevation.clone(),
        };
        PolarView {
            plane,
            trace,
            mode: scene.config.mode,
            grid_levels,
        }
    }
}

impl<Message> Chart<Message> for PolarView {
    fn build_chart<DB: DrawingBackend>(&self, builder: ChartBuilder<DB>) {
        if let Err(err) =
            build_polar_chart(builder, &self.trace, self.plane, self.mode, self.grid_levels)
        {
            warn!(%err, plane = ?self.plane, "polar pane not drawn");
        }
    }
}

/// The 3D pane for the interactive viewer.
pub struct SurfaceView {
    pub quads: Vec<ProjectedQuad>,
    pub axes: [(nalgebra::Point2<f32>, nalgebra::Point2<f32>); 3],
    pub legend: Legend,
}

impl SurfaceView {
    pub fn new(scene: &PatternScene) -> SurfaceView {
        SurfaceView {
            quads: scene.surface.clone(),
            axes: scene.axes,
            legend: scene.legend.clone(),
        }
    }
}

impl<Message> Chart<Message> for SurfaceView {
    fn build_chart<DB: DrawingBackend>(&self, builder: ChartBuilder<DB>) {
        if let Err(err) = build_surface_chart(builder, &self.quads, &self.axes, &self.legend, 2.) {
            warn!(%err, "surface pane not drawn");
        }
    }
}
