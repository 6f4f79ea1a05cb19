use std::f32::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::helper::wrap_degrees;
use crate::helper_traits::SphericalFunction;

// Below this |sin θ| the pattern is evaluated at a pole and reported as zero.
const POLE_EPSILON: f32 = 1e-6;
// Smallest physical length (in wavelengths) accepted for wire lengths and spacings.
pub const MIN_WAVELENGTHS: f32 = 0.01;
pub const DEFAULT_DIRECTORS: u32 = 3;

/// Closed-form far-field models. Lengths and spacings are in wavelengths, phase in degrees.
///
/// These are textbook approximations, not field solutions. The Yagi model in particular is
/// an empirical shape that gets narrower and cleaner towards the rear as directors are added.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Antenna {
    Dipole {
        length: f32,
    },
    Monopole {
        length: f32,
    },
    TwoElementArray {
        separation: f32,
        phase_offset: f32,
    },
    Yagi {
        directors: u32,
    },
    /// Fallback for variants we do not model: an elementary sin²θ doublet.
    #[serde(other)]
    Generic,
}

impl Default for Antenna {
    fn default() -> Self {
        Antenna::Dipole { length: 0.5 }
    }
}

impl Antenna {
    /// Builds the variant named `name` with its default parameters. Unknown names
    /// fall back to [`Antenna::Generic`].
    pub fn from_name(name: &str) -> Antenna {
        match name.trim().to_ascii_lowercase().as_str() {
            "dipole" => Antenna::Dipole { length: 0.5 },
            "monopole" => Antenna::Monopole { length: 0.25 },
            "array" | "two_element_array" => Antenna::TwoElementArray {
                separation: 0.5,
                phase_offset: 0.,
            },
            "yagi" => Antenna::Yagi {
                directors: DEFAULT_DIRECTORS,
            },
            _ => Antenna::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Antenna::Dipole { .. } => "dipole",
            Antenna::Monopole { .. } => "monopole",
            Antenna::TwoElementArray { .. } => "array",
            Antenna::Yagi { .. } => "yagi",
            Antenna::Generic => "generic",
        }
    }

    /// Clamps parameters into the domain the models are defined on.
    ///
    /// Non-finite lengths revert to the variant default, non-positive ones are raised to
    /// [`MIN_WAVELENGTHS`], and phase is wrapped into [0, 360).
    pub fn sanitized(self) -> Antenna {
        let defaults = Antenna::from_name(self.name());
        match (self, defaults) {
            (Antenna::Dipole { length }, Antenna::Dipole { length: fallback }) => {
                Antenna::Dipole {
                    length: positive_or(length, fallback),
                }
            }
            (Antenna::Monopole { length }, Antenna::Monopole { length: fallback }) => {
                Antenna::Monopole {
                    length: positive_or(length, fallback),
                }
            }
            (
                Antenna::TwoElementArray {
                    separation,
                    phase_offset,
                },
                Antenna::TwoElementArray {
                    separation: fallback,
                    ..
                },
            ) => Antenna::TwoElementArray {
                separation: positive_or(separation, fallback),
                phase_offset: if phase_offset.is_finite() {
                    wrap_degrees(phase_offset)
                } else {
                    0.
                },
            },
            (other, _) => other,
        }
    }

    pub fn intensity(&self, theta: f32, phi: f32) -> f32 {
        match *self {
            Antenna::Dipole { length } => dipole(length, theta),
            Antenna::Monopole { length } => {
                if theta > PI / 2. {
                    0.
                } else {
                    2. * dipole(length, theta)
                }
            }
            Antenna::TwoElementArray {
                separation,
                phase_offset,
            } => two_element_array(separation, phase_offset.to_radians(), theta, phi),
            Antenna::Yagi { directors } => yagi(directors, theta, phi),
            Antenna::Generic => theta.sin().powi(2),
        }
    }
}

impl SphericalFunction for Antenna {
    fn lookup(&self, theta: f32, phi: f32) -> f32 {
        self.intensity(theta, phi)
    }
}

impl fmt::Display for Antenna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antenna::Dipole { length } => write!(f, "Dipole (L = {:.2} λ)", length),
            Antenna::Monopole { length } => write!(f, "Monopole (L = {:.2} λ)", length),
            Antenna::TwoElementArray {
                separation,
                phase_offset,
            } => write!(
                f,
                "Two-element array (d = {:.2} λ, β = {:.0}°)",
                separation, phase_offset
            ),
            Antenna::Yagi { directors } => write!(f, "Yagi ({} directors)", directors),
            Antenna::Generic => write!(f, "Generic doublet"),
        }
    }
}

/// Parses a director count typed by the user. Anything that is not a non-negative integer
/// yields [`DEFAULT_DIRECTORS`].
pub fn parse_director_count(text: &str) -> u32 {
    text.trim().parse().unwrap_or(DEFAULT_DIRECTORS)
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        fallback
    } else {
        value.max(MIN_WAVELENGTHS)
    }
}

// Center-fed thin wire of length L with sinusoidal current distribution.
fn dipole(length: f32, theta: f32) -> f32 {
    let sin_theta = theta.sin();
    if sin_theta.abs() < POLE_EPSILON {
        return 0.;
    }
    let kl = PI * length;
    (f32::cos(kl * theta.cos()) - kl.cos()).powi(2) / sin_theta.powi(2)
}

// Two half-wave elements along x, fed with a progressive phase.
fn two_element_array(separation: f32, phase: f32, theta: f32, phi: f32) -> f32 {
    let sin_theta = theta.sin();
    if sin_theta.abs() < POLE_EPSILON {
        return 0.;
    }
    let element = (f32::cos(PI / 2. * theta.cos()) / sin_theta).powi(2);
    let psi = 2. * PI * separation * sin_theta * phi.cos() + phase;
    let array_factor = (psi / 2.).cos().powi(2);
    element * array_factor * 4.
}

fn yagi(directors: u32, theta: f32, phi: f32) -> f32 {
    let sin_theta = theta.sin();
    if sin_theta.abs() < POLE_EPSILON {
        return 0.;
    }
    let n = directors as f32;
    let base = sin_theta.powi(2);
    let directivity = phi.cos().max(0.).powf(n * 0.8);
    let suppression = if phi > PI / 2. && phi < 3. * PI / 2. {
        10f32.powf(-0.3 * n)
    } else {
        1.
    };
    base * directivity * suppression * (2. + n)
}
