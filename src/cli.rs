use std::path::PathBuf;

use crate::{
    antenna::{parse_director_count, Antenna},
    config::{PatternConfig, ViewMode},
    error::{PatternError, PatternResult},
};

pub const USAGE: &str = "\
usage: pattern_export [--config FILE] [--antenna dipole|monopole|array|yagi]
                      [--length L] [--separation D] [--phase DEG] [--directors N]
                      [--mode gain|power] [--output FILE.png]";

/// Command-line overrides. Anything left unset keeps the value from the settings file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportArgs {
    pub config: Option<PathBuf>,
    pub antenna: Option<String>,
    pub length: Option<f32>,
    pub separation: Option<f32>,
    pub phase: Option<f32>,
    pub directors: Option<u32>,
    pub mode: Option<ViewMode>,
    pub output: Option<PathBuf>,
    pub help: bool,
}

fn number(flag: &str, value: &str) -> PatternResult<f32> {
    value
        .trim()
        .parse()
        .map_err(|_| PatternError::invalid_argument(flag, format!("'{}' is not a number", value)))
}

impl ExportArgs {
    /// Parses arguments, not including the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> PatternResult<ExportArgs> {
        let mut parsed = ExportArgs::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            if flag == "--help" || flag == "-h" {
                parsed.help = true;
                continue;
            }
            let value = args
                .next()
                .ok_or_else(|| PatternError::invalid_argument(&flag, "missing value"))?;
            match flag.as_str() {
                "--config" | "-c" => parsed.config = Some(PathBuf::from(value)),
                "--antenna" | "-a" => parsed.antenna = Some(value),
                "--length" => parsed.length = Some(number(&flag, &value)?),
                "--separation" => parsed.separation = Some(number(&flag, &value)?),
                "--phase" => parsed.phase = Some(number(&flag, &value)?),
                // Malformed counts fall back to the default instead of failing.
                "--directors" => parsed.directors = Some(parse_director_count(&value)),
                "--mode" | "-m" => {
                    parsed.mode = Some(ViewMode::from_name(&value).ok_or_else(|| {
                        PatternError::invalid_argument(&flag, "expected 'gain' or 'power'")
                    })?)
                }
                "--output" | "-o" => parsed.output = Some(PathBuf::from(value)),
                _ => return Err(PatternError::invalid_argument(&flag, "unknown flag")),
            }
        }
        Ok(parsed)
    }

    /// Applies the overrides on top of `base`.
    pub fn apply(&self, base: PatternConfig) -> PatternConfig {
        let mut antenna = match &self.antenna {
            Some(name) => Antenna::from_name(name),
            None => base.antenna,
        };
        match &mut antenna {
            Antenna::Dipole { length } | Antenna::Monopole { length } => {
                if let Some(value) = self.length {
                    *length = value;
                }
            }
            Antenna::TwoElementArray {
                separation,
                phase_offset,
            } => {
                if let Some(value) = self.separation {
                    *separation = value;
                }
                if let Some(value) = self.phase {
                    *phase_offset = value;
                }
            }
            Antenna::Yagi { directors } => {
                if let Some(value) = self.directors {
                    *directors = value;
                }
            }
            Antenna::Generic => {}
        }
        PatternConfig::new(antenna, self.mode.unwrap_or(base.mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn overrides_replace_the_variant_and_its_parameters() {
        let parsed = ExportArgs::parse(args("--antenna array --separation 0.7 --phase -90 --mode power"))
            .expect("valid arguments");
        let config = parsed.apply(PatternConfig::default());
        assert_eq!(config.mode, ViewMode::Power);
        assert_eq!(
            config.antenna,
            Antenna::TwoElementArray {
                separation: 0.7,
                phase_offset: 270.
            }
        );
    }

    #[test]
    fn parameters_apply_to_the_base_variant() {
        let parsed = ExportArgs::parse(args("--length 1.25")).expect("valid arguments");
        let config = parsed.apply(PatternConfig::new(Antenna::Monopole { length: 0.25 }, ViewMode::Gain));
        assert_eq!(config.antenna, Antenna::Monopole { length: 1.25 });
    }

    #[test]
    fn bad_director_count_defaults() {
        let parsed = ExportArgs::parse(args("--antenna yagi --directors lots")).expect("valid arguments");
        assert_eq!(
            parsed.apply(PatternConfig::default()).antenna,
            Antenna::Yagi { directors: 3 }
        );
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(matches!(
            ExportArgs::parse(args("--length half")),
            Err(PatternError::InvalidArgument { .. })
        ));
        assert!(ExportArgs::parse(args("--mode log")).is_err());
        assert!(ExportArgs::parse(args("--output")).is_err());
        assert!(ExportArgs::parse(args("--frequency 5")).is_err());
        assert!(ExportArgs::parse(args("-h")).expect("help").help);
    }
}
