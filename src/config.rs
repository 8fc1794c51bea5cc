//! Command-line configuration for the terminal runner.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::core::{LevelSet, SessionConfig};

pub const USAGE: &str = "\
usage: hexloop [options]

options:
  --seed <u32>       tile generator seed (default 1)
  --level <index>    level to start on, 0-based (default 0)
  --levels <dir>     load every *.txt level in <dir> instead of the built-in set
  --log <file>       write tracing output to <file> (filter: HEXLOOP_LOG)
  -h, --help         show this help
";

/// Runner settings parsed from argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub seed: u32,
    pub start_level: usize,
    pub levels_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            seed: session.seed,
            start_level: session.start_level,
            levels_dir: None,
            log_file: None,
        }
    }
}

impl RunConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            seed: self.seed,
            start_level: self.start_level,
        }
    }

    /// The built-in levels, or those in `--levels`.
    pub fn level_set(&self) -> Result<LevelSet> {
        match &self.levels_dir {
            Some(dir) => Ok(LevelSet::load_dir(dir)?),
            None => Ok(LevelSet::builtin()),
        }
    }
}

/// Parse runner arguments (without the program name).
///
/// Returns `Ok(None)` when help was requested.
pub fn parse_run_args(args: &[String]) -> Result<Option<RunConfig>> {
    let mut config = RunConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                config.seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--level" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --level"))?;
                config.start_level = v
                    .parse::<usize>()
                    .map_err(|_| anyhow!("invalid --level value: {}", v))?;
            }
            "--levels" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --levels"))?;
                config.levels_dir = Some(PathBuf::from(v));
            }
            "--log" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --log"))?;
                config.log_file = Some(PathBuf::from(v));
            }
            "-h" | "--help" => return Ok(None),
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(Some(config))
}
