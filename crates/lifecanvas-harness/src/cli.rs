#![forbid(unsafe_code)]

//! Command-line parsing for the headless runner.
//!
//! Flags accept both `--name value` and `--name=value`.

use std::time::Duration;

use lifecanvas_core::RenderStrategy;

pub const HELP_TEXT: &str = "\
lifecanvas-harness: run the Game of Life control layer headless

USAGE:
    lifecanvas-harness [OPTIONS]

OPTIONS:
    --frames N          Frames to run (default: 60)
    --width N           Grid width in cells (default: 64)
    --height N          Grid height in cells (default: 32)
    --strategy NAME     direct | delegated | blit (default: direct)
    --seed N            Seed for the initial random grid
    --interval-ms N     Simulated time between frames (default: 16)
    --json-logs         Emit log lines as JSON
    --help, -h          Show this help message
    --version, -V       Show version

ENVIRONMENT VARIABLES:
    RUST_LOG            Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub strategy: RenderStrategy,
    pub seed: Option<u64>,
    pub interval: Duration,
    pub json_logs: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            frames: 60,
            width: 64,
            height: 32,
            strategy: RenderStrategy::DirectDraw,
            seed: None,
            interval: Duration::from_millis(16),
            json_logs: false,
        }
    }
}

/// What the process should do after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_owned(), Some(value.to_owned()))
                }
                _ => (arg, None),
            };
            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| format!("{flag} needs a value"))
            };

            match flag.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--json-logs" => opts.json_logs = true,
                "--frames" => opts.frames = number(&flag, &value()?)?,
                "--width" => opts.width = number(&flag, &value()?)?,
                "--height" => opts.height = number(&flag, &value()?)?,
                "--seed" => opts.seed = Some(number(&flag, &value()?)?),
                "--interval-ms" => {
                    opts.interval = Duration::from_millis(number(&flag, &value()?)?);
                }
                "--strategy" => {
                    opts.strategy = value()?.parse().map_err(|err| format!("{err}"))?;
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        Ok(Command::Run(opts))
    }
}

fn number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("{flag} expects a non-negative integer, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Command, String> {
        Opts::parse(args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn no_args_is_defaults() {
        assert_eq!(parse(&[]), Ok(Command::Run(Opts::default())));
    }

    #[test]
    fn separate_and_inline_values() {
        let Ok(Command::Run(opts)) = parse(&[
            "--frames",
            "10",
            "--width=20",
            "--height",
            "8",
            "--strategy=blit",
            "--seed",
            "42",
            "--interval-ms=33",
            "--json-logs",
        ]) else {
            panic!("expected run");
        };
        assert_eq!(
            opts,
            Opts {
                frames: 10,
                width: 20,
                height: 8,
                strategy: RenderStrategy::DelegatedPixelBlit,
                seed: Some(42),
                interval: Duration::from_millis(33),
                json_logs: true,
            }
        );
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--frames", "3", "-h"]), Ok(Command::Help));
        assert_eq!(parse(&["--version"]), Ok(Command::Version));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse(&["--frames"]).unwrap_err().contains("needs a value"));
        assert!(parse(&["--width", "-3"]).is_err());
        assert!(parse(&["--strategy", "sideways"]).is_err());
        assert!(parse(&["--fast"]).unwrap_err().contains("unknown argument"));
    }
}
