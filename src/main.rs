//! Entry point for the **bezier-ease** sampling tool.
//!
//! Prints the output progress of an easing curve for a set of inputs:
//!
//! ```text
//! bezier-ease [--config <path>] [--steps <n>] <curve> [x ...]
//! ```
//!
//! `<curve>` is a preset name, `cubic-bezier(x1, y1, x2, y2)`, or a curve
//! named in the config file.  Without explicit `x` values, `n + 1` evenly
//! spaced samples are printed (default `n = 10`).

use bezier_ease::bezier::CurveError;
use bezier_ease::config::{Config, ConfigError};
use log::{debug, error, info};
use std::path::PathBuf;

const DEFAULT_STEPS: usize = 10;

/// Resolve the config directory (`$XDG_CONFIG_HOME/bezier-ease`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("bezier-ease")
}

/// Load the config named on the command line, or try the default location
/// and fall back to compiled-in defaults.
fn load_config(explicit: Option<&PathBuf>) -> Result<Config, CliError> {
    if let Some(path) = explicit {
        return Ok(Config::load(path)?);
    }
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            Ok(cfg)
        }
        Err(e) => {
            debug!("no config file ({}), using defaults", e);
            Ok(Config::default())
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("usage: bezier-ease [--config <path>] [--steps <n>] <curve> [x ...] ({0})")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Curve(#[from] CurveError),
}

#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    steps: usize,
    curve: String,
    inputs: Vec<f64>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, CliError> {
    let mut config = None;
    let mut steps = DEFAULT_STEPS;
    let mut curve = None;
    let mut inputs = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--config needs a path".into()))?;
                config = Some(PathBuf::from(path));
            }
            "--steps" => {
                steps = args
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| CliError::Usage("--steps needs a positive integer".into()))?;
            }
            _ if curve.is_none() => curve = Some(arg),
            _ => {
                let x = arg
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(format!("not a number: {:?}", arg)))?;
                inputs.push(x);
            }
        }
    }

    Ok(Args {
        config,
        steps,
        curve: curve.ok_or_else(|| CliError::Usage("missing curve".into()))?,
        inputs,
    })
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_ref())?;
    let curve = config.curve(&args.curve)?;
    info!("sampling {}", curve);

    let inputs = if args.inputs.is_empty() {
        (0..=args.steps)
            .map(|i| i as f64 / args.steps as f64)
            .collect()
    } else {
        args.inputs
    };

    for x in inputs {
        let solution = curve.solve_with(x, &config.solver);
        debug!(
            "x={} t={} via {:?} in {} step(s)",
            x, solution.t, solution.method, solution.iterations
        );
        println!("{:.6}\t{:.6}", x, solution.value);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, CliError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn curve_only() {
        let a = args(&["ease-in"]).unwrap();
        assert_eq!(a.curve, "ease-in");
        assert_eq!(a.steps, DEFAULT_STEPS);
        assert!(a.inputs.is_empty());
        assert!(a.config.is_none());
    }

    #[test]
    fn flags_and_inputs() {
        let a = args(&[
            "--steps",
            "4",
            "--config",
            "/tmp/c.json",
            "cubic-bezier(0.1, 0.2, 0.3, 0.4)",
            "0.25",
            "0.5",
        ])
        .unwrap();
        assert_eq!(a.steps, 4);
        assert_eq!(a.config, Some(PathBuf::from("/tmp/c.json")));
        assert_eq!(a.curve, "cubic-bezier(0.1, 0.2, 0.3, 0.4)");
        assert_eq!(a.inputs, vec![0.25, 0.5]);
    }

    #[test]
    fn missing_curve_is_usage_error() {
        assert!(matches!(args(&[]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["--steps", "3"]), Err(CliError::Usage(_))));
    }

    #[test]
    fn bad_flag_values_rejected() {
        assert!(matches!(args(&["ease", "--steps", "0"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["ease", "--steps"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["ease", "--config"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["ease", "half"]), Err(CliError::Usage(_))));
    }
}
