use std::time::{Duration, Instant};

use iced::{
    button, executor, slider, text_input, time, Align, Application, Button, Clipboard, Column,
    Command, Container, Element, Length, Radio, Row, Settings, Slider, Subscription, Text,
    TextInput,
};
use iced_native::{subscription, window, Event};
use plotters_iced::ChartWidget;
use radiation_lib::{
    antenna::{parse_director_count, Antenna, DEFAULT_DIRECTORS},
    config::{PatternConfig, RenderSettings, SettingsFile, ViewMode},
    export::{default_file_name, export_png},
    pattern_chart::{PolarView, SurfaceView},
    sampler::SweepPlane,
    scene::PatternScene,
    schedule::{Debouncer, RedrawScheduler},
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

// Roughly one display refresh.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Dipole,
    Monopole,
    Array,
    Yagi,
}

impl Kind {
    const ALL: [Kind; 4] = [Kind::Dipole, Kind::Monopole, Kind::Array, Kind::Yagi];

    fn label(&self) -> &'static str {
        match self {
            Kind::Dipole => "Dipole",
            Kind::Monopole => "Monopole",
            Kind::Array => "Two-element array",
            Kind::Yagi => "Yagi-Uda",
        }
    }
}

#[derive(Debug, Clone)]
enum Message {
    AntennaSelected(Kind),
    ModeSelected(ViewMode),
    DipoleLength(f32),
    MonopoleLength(f32),
    Separation(f32),
    Phase(f32),
    Directors(String),
    Export,
    Resized(u32),
    Tick(Instant),
}

/// Values behind the antenna controls. Each variant keeps its own parameters while
/// another one is selected.
#[derive(Clone, Debug, PartialEq)]
struct Controls {
    kind: Kind,
    dipole_length: f32,
    monopole_length: f32,
    separation: f32,
    phase: f32,
    directors: String,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            kind: Kind::Dipole,
            dipole_length: 0.5,
            monopole_length: 0.25,
            separation: 0.5,
            phase: 0.,
            directors: DEFAULT_DIRECTORS.to_string(),
        }
    }
}

impl Controls {
    /// Controls showing `antenna`. The generic pattern has no controls and shows as the
    /// default dipole.
    fn showing(antenna: Antenna) -> Controls {
        let mut controls = Controls::default();
        match antenna {
            Antenna::Dipole { length } => controls.dipole_length = length,
            Antenna::Monopole { length } => {
                controls.kind = Kind::Monopole;
                controls.monopole_length = length;
            }
            Antenna::TwoElementArray {
                separation,
                phase_offset,
            } => {
                controls.kind = Kind::Array;
                controls.separation = separation;
                controls.phase = phase_offset;
            }
            Antenna::Yagi { directors } => {
                controls.kind = Kind::Yagi;
                controls.directors = directors.to_string();
            }
            Antenna::Generic => warn!("generic pattern has no controls, showing a dipole"),
        }
        controls
    }

    fn antenna(&self) -> Antenna {
        match self.kind {
            Kind::Dipole => Antenna::Dipole {
                length: self.dipole_length,
            },
            Kind::Monopole => Antenna::Monopole {
                length: self.monopole_length,
            },
            Kind::Array => Antenna::TwoElementArray {
                separation: self.separation,
                phase_offset: self.phase,
            },
            Kind::Yagi => Antenna::Yagi {
                directors: parse_director_count(&self.directors),
            },
        }
    }
}

struct PatternViewer {
    controls: Controls,
    mode: ViewMode,
    render: RenderSettings,
    window_width: Option<u32>,

    scheduler: RedrawScheduler,
    resize: Debouncer,
    scene: PatternScene,
    status: String,

    azimuth: PolarView,
    elevation: PolarView,
    surface: SurfaceView,

    dipole_slider: slider::State,
    monopole_slider: slider::State,
    separation_slider: slider::State,
    phase_slider: slider::State,
    directors_input: text_input::State,
    export_button: button::State,
}

impl PatternViewer {
    /// Snapshot of the current selection, read once at the start of a pass.
    fn config(&self) -> PatternConfig {
        PatternConfig::new(self.controls.antenna(), self.mode)
    }

    fn show(&mut self, scene: PatternScene) {
        let levels = self.render.grid_levels;
        self.azimuth = PolarView::new(SweepPlane::Azimuth, &scene, levels);
        self.elevation = PolarView::new(SweepPlane::Elevation, &scene, levels);
        self.surface = SurfaceView::new(&scene);
        self.scene = scene;
    }
}

impl Application for PatternViewer {
    type Executor = executor::Default;
    type Message = Message;
    type Flags = SettingsFile;

    fn new(settings: SettingsFile) -> (Self, Command<Message>) {
        let controls = Controls::showing(settings.pattern.antenna);
        // Built from the controls so the first frame matches what they show.
        let config = PatternConfig::new(controls.antenna(), settings.pattern.mode);
        let scene = PatternScene::compute(&config);
        let levels = settings.render.grid_levels;
        let viewer = PatternViewer {
            controls,
            mode: config.mode,
            render: settings.render,
            window_width: None,
            scheduler: RedrawScheduler::new(),
            resize: Debouncer::default(),
            azimuth: PolarView::new(SweepPlane::Azimuth, &scene, levels),
            elevation: PolarView::new(SweepPlane::Elevation, &scene, levels),
            surface: SurfaceView::new(&scene),
            scene,
            status: String::new(),
            dipole_slider: slider::State::new(),
            monopole_slider: slider::State::new(),
            separation_slider: slider::State::new(),
            phase_slider: slider::State::new(),
            directors_input: text_input::State::new(),
            export_button: button::State::new(),
        };
        (viewer, Command::none())
    }

    fn title(&self) -> String {
        String::from("Radiation Pattern Viewer")
    }

    fn update(&mut self, message: Message, _clipboard: &mut Clipboard) -> Command<Message> {
        match message {
            Message::AntennaSelected(kind) => self.controls.kind = kind,
            Message::ModeSelected(mode) => self.mode = mode,
            Message::DipoleLength(value) => self.controls.dipole_length = value,
            Message::MonopoleLength(value) => self.controls.monopole_length = value,
            Message::Separation(value) => self.controls.separation = value,
            Message::Phase(value) => self.controls.phase = value,
            Message::Directors(text) => self.controls.directors = text,
            Message::Resized(width) => {
                self.window_width = Some(width);
                self.resize.trigger(Instant::now());
                return Command::none();
            }
            Message::Export => {
                let path = default_file_name(&self.scene);
                self.status = match export_png(&self.scene, &self.render, &path) {
                    Ok(()) => format!("Saved {}", path.display()),
                    Err(err) => err.user_notice().to_owned(),
                };
                return Command::none();
            }
            Message::Tick(now) => {
                if self.resize.poll(now) {
                    if let Some(width) = self.window_width.take() {
                        self.render.fit_width(width);
                        debug!(width, "panes resized");
                    }
                    self.scheduler.request();
                }
                let config = self.config();
                if let Some(scene) = self.scheduler.run_pending(|| PatternScene::compute(&config)) {
                    debug!(pass = self.scheduler.passes(), "redrawn");
                    self.show(scene);
                }
                return Command::none();
            }
        }
        self.scheduler.request();
        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch(vec![
            time::every(FRAME).map(Message::Tick),
            subscription::events_with(|event, _status| match event {
                Event::Window(window::Event::Resized { width, .. }) => Some(Message::Resized(width)),
                _ => None,
            }),
        ])
    }

    fn view(&mut self) -> Element<Message> {
        let kind = self.controls.kind;
        let antenna_choice = Kind::ALL.iter().fold(
            Column::new().spacing(6).push(Text::new("Antenna").size(20)),
            |column, &option| {
                column.push(Radio::new(option, option.label(), Some(kind), Message::AntennaSelected))
            },
        );

        let mode_choice = Column::new()
            .spacing(6)
            .push(Text::new("View").size(20))
            .push(Radio::new(
                ViewMode::Gain,
                "Gain (dB)",
                Some(self.mode),
                Message::ModeSelected,
            ))
            .push(Radio::new(
                ViewMode::Power,
                "Normalized power",
                Some(self.mode),
                Message::ModeSelected,
            ));

        let parameters = match kind {
            Kind::Dipole => Column::new()
                .push(Text::new(format!("Length: {:.2} λ", self.controls.dipole_length)))
                .push(
                    Slider::new(
                        &mut self.dipole_slider,
                        0.1..=2.0,
                        self.controls.dipole_length,
                        Message::DipoleLength,
                    )
                    .step(0.01),
                ),
            Kind::Monopole => Column::new()
                .push(Text::new(format!("Length: {:.2} λ", self.controls.monopole_length)))
                .push(
                    Slider::new(
                        &mut self.monopole_slider,
                        0.05..=1.0,
                        self.controls.monopole_length,
                        Message::MonopoleLength,
                    )
                    .step(0.01),
                ),
            Kind::Array => Column::new()
                .push(Text::new(format!("Separation: {:.2} λ", self.controls.separation)))
                .push(
                    Slider::new(
                        &mut self.separation_slider,
                        0.1..=2.0,
                        self.controls.separation,
                        Message::Separation,
                    )
                    .step(0.01),
                )
                .push(Text::new(format!("Phase: {:.0}°", self.controls.phase)))
                .push(
                    Slider::new(&mut self.phase_slider, 0.0..=360.0, self.controls.phase, Message::Phase)
                        .step(1.0),
                ),
            Kind::Yagi => Column::new().push(Text::new("Directors")).push(
                TextInput::new(
                    &mut self.directors_input,
                    "3",
                    &self.controls.directors,
                    Message::Directors,
                )
                .padding(5)
                .width(Length::Units(80)),
            ),
        }
        .spacing(6);

        let metrics = &self.scene.metrics;
        let results = Column::new()
            .spacing(4)
            .push(Text::new("Results").size(20))
            .push(Text::new(format!("Gain: {} dBi", metrics.gain_text())))
            .push(Text::new(format!("Beamwidth: {}", metrics.beamwidth_text())))
            .push(Text::new(format!("F/B ratio: {}", metrics.front_to_back_text())))
            .push(Text::new(self.scene.legend.caption).size(14));

        let controls = Column::new()
            .spacing(20)
            .width(Length::Units(260))
            .push(antenna_choice)
            .push(mode_choice)
            .push(parameters)
            .push(results)
            .push(
                Button::new(&mut self.export_button, Text::new("Export PNG"))
                    .on_press(Message::Export),
            )
            .push(Text::new(self.status.clone()).size(14));

        let cuts = Row::new()
            .spacing(10)
            .push(
                ChartWidget::new(&mut self.azimuth)
                    .width(Length::Units(self.render.azimuth.width as u16))
                    .height(Length::Units(self.render.azimuth.height as u16)),
            )
            .push(
                ChartWidget::new(&mut self.elevation)
                    .width(Length::Units(self.render.elevation.width as u16))
                    .height(Length::Units(self.render.elevation.height as u16)),
            );
        let charts = Column::new().spacing(10).push(cuts).push(
            ChartWidget::new(&mut self.surface)
                .width(Length::Units(self.render.surface.width as u16))
                .height(Length::Units(self.render.surface.height as u16)),
        );

        Container::new(
            Row::new()
                .spacing(20)
                .align_items(Align::Start)
                .push(controls)
                .push(charts),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
        .into()
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // An optional settings file may be passed as the only argument.
    let settings = match std::env::args().nth(1) {
        Some(path) => SettingsFile::load(&path).unwrap_or_else(|err| {
            warn!(%err, path = %path, "{}, using defaults", err.user_notice());
            SettingsFile::default()
        }),
        None => SettingsFile::default(),
    };
    info!(antenna = settings.pattern.antenna.name(), "starting viewer");

    PatternViewer::run(Settings {
        antialiasing: true,
        ..Settings::with_flags(settings)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_settings_show_and_compute_a_dipole() {
        let controls = Controls::showing(Antenna::Generic);
        assert_eq!(controls.kind, Kind::Dipole);
        assert_eq!(controls.antenna(), Antenna::default());
    }

    #[test]
    fn loaded_antenna_round_trips_through_the_controls() {
        for antenna in [
            Antenna::Monopole { length: 0.3 },
            Antenna::TwoElementArray {
                separation: 0.75,
                phase_offset: 90.,
            },
            Antenna::Yagi { directors: 5 },
        ]
        .iter()
        {
            assert_eq!(Controls::showing(*antenna).antenna(), *antenna);
        }
    }

    #[test]
    fn unparsable_director_text_uses_the_default() {
        let controls = Controls {
            kind: Kind::Yagi,
            directors: "several".to_owned(),
            ..Controls::default()
        };
        assert_eq!(
            controls.antenna(),
            Antenna::Yagi {
                directors: DEFAULT_DIRECTORS
            }
        );
    }
}
