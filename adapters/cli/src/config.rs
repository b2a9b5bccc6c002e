use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Tie-break strategy names accepted on the command line and in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TieBreakName {
    /// Uniform random choice.
    Uniform,
    /// Closest prospective defensiveness to a target.
    Balanced,
}

/// Dispersion class names accepted on the command line and in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum DispersionName {
    /// No preference.
    Any,
    /// Single-component tiles.
    PureEven,
    /// Two-component tiles.
    HalfEven,
    /// Corner-piece tiles.
    CornerPiece,
}

/// Defaults loaded from a `--config` file. Command-line flags override them.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    version: u32,
    #[serde(default)]
    pub(crate) level: LevelSection,
    #[serde(default)]
    pub(crate) selector: SelectorSection,
}

/// Play-area description.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelSection {
    pub(crate) width: Option<f32>,
    pub(crate) height: Option<f32>,
    pub(crate) cell_size: Option<f32>,
    pub(crate) start_x: Option<f32>,
    pub(crate) start_y: Option<f32>,
    pub(crate) seed: Option<u64>,
}

/// Tile selection rules.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SelectorSection {
    pub(crate) tie_break: Option<TieBreakName>,
    pub(crate) target_defensiveness: Option<f32>,
    pub(crate) dispersion: Option<DispersionName>,
    pub(crate) partial_match_threshold: Option<usize>,
    pub(crate) drift: Option<bool>,
    pub(crate) drift_weights: Option<DriftWeights>,
}

/// Relative colour weights for drift preferences.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DriftWeights {
    pub(crate) grey: u32,
    pub(crate) red: u32,
    pub(crate) green: u32,
    pub(crate) blue: u32,
}

/// Reads and validates a config file.
pub(crate) fn load(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(contents: &str) -> Result<FileConfig> {
    let config: FileConfig =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    if config.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported config version {}; expected {}",
            config.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    Ok(config)
}
