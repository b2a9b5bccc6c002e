#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a Balanced Zones level and prints it.

mod config;
mod render;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use balanced_zones_catalog::ZoneCatalog;
use balanced_zones_core::{GridPosition, Size2D};
use balanced_zones_system_analytics::BalanceReport;
use balanced_zones_system_generation::LevelGenerator;
use balanced_zones_system_selector::{
    ColourDrift, DispersionPreference, SelectorConfig, TieBreak,
};
use clap::{Parser, ValueEnum};

use config::{DispersionName, FileConfig, TieBreakName};

const DEFAULT_LEVEL_EXTENT: f32 = 1000.0;
const DEFAULT_CELL_SIZE: f32 = 100.0;
const DEFAULT_TARGET_DEFENSIVENESS: f32 = 2.5;

#[derive(Parser, Debug)]
#[command(name = "balanced-zones")]
#[command(about = "Fill a rectangular play area with colour-matched Wang-tile zones")]
struct Args {
    /// Width of the play area in world units (default: 1000)
    #[arg(long)]
    width: Option<f32>,

    /// Height of the play area in world units (default: 1000)
    #[arg(long)]
    height: Option<f32>,

    /// Side length of a zone cell in world units (default: 100)
    #[arg(long)]
    cell_size: Option<f32>,

    /// Horizontal coordinate of the north-west corner
    #[arg(long, allow_hyphen_values = true)]
    start_x: Option<f32>,

    /// Vertical coordinate of the north-west corner
    #[arg(long, allow_hyphen_values = true)]
    start_y: Option<f32>,

    /// Random seed (drawn at random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Zone catalog TOML resource (default: built-in standard catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Config TOML file supplying defaults for the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Final pick among equally valid tiles
    #[arg(long, value_enum)]
    tie_break: Option<TieBreakName>,

    /// Defensiveness targeted by the balanced tie-break (default: 2.5)
    #[arg(long)]
    target_defensiveness: Option<f32>,

    /// Dispersion class favoured by the balanced tie-break (default: any)
    #[arg(long, value_enum)]
    dispersion: Option<DispersionName>,

    /// Draw weighted colour preferences for unconstrained sides
    #[arg(long)]
    drift: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log every committed zone
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Grid of asset names followed by a balance summary.
    Text,
    /// Placements and summary as JSON.
    Json,
}

/// Flags merged with config-file defaults.
#[derive(Debug)]
struct Settings {
    extents: Size2D,
    start: GridPosition,
    cell_size: f32,
    seed: u64,
    selector: SelectorConfig,
}

impl Settings {
    fn resolve(args: &Args, file: &FileConfig) -> Result<Self> {
        let level = &file.level;
        let rules = &file.selector;

        let tie_break = match args
            .tie_break
            .or(rules.tie_break)
            .unwrap_or(TieBreakName::Uniform)
        {
            TieBreakName::Uniform => TieBreak::Uniform,
            TieBreakName::Balanced => {
                let target_defensiveness = args
                    .target_defensiveness
                    .or(rules.target_defensiveness)
                    .unwrap_or(DEFAULT_TARGET_DEFENSIVENESS);
                if !target_defensiveness.is_finite() {
                    bail!("target defensiveness must be finite, got {target_defensiveness}");
                }
                let dispersion = match args
                    .dispersion
                    .or(rules.dispersion)
                    .unwrap_or(DispersionName::Any)
                {
                    DispersionName::Any => DispersionPreference::Any,
                    DispersionName::PureEven => DispersionPreference::PureEven,
                    DispersionName::HalfEven => DispersionPreference::HalfEven,
                    DispersionName::CornerPiece => DispersionPreference::CornerPiece,
                };
                TieBreak::Balanced {
                    target_defensiveness,
                    dispersion,
                }
            }
        };

        let mut drift = ColourDrift {
            enabled: args.drift || rules.drift.unwrap_or(false),
            ..ColourDrift::default()
        };
        if let Some(weights) = rules.drift_weights {
            drift.grey = weights.grey;
            drift.red = weights.red;
            drift.green = weights.green;
            drift.blue = weights.blue;
        }

        let defaults = SelectorConfig::default();
        let selector = SelectorConfig {
            partial_match_threshold: rules
                .partial_match_threshold
                .unwrap_or(defaults.partial_match_threshold),
            tie_break,
            drift,
            ..defaults
        };

        Ok(Self {
            extents: Size2D::new(
                args.width.or(level.width).unwrap_or(DEFAULT_LEVEL_EXTENT),
                args.height.or(level.height).unwrap_or(DEFAULT_LEVEL_EXTENT),
            ),
            start: GridPosition::new(
                args.start_x.or(level.start_x).unwrap_or(0.0),
                args.start_y.or(level.start_y).unwrap_or(0.0),
            ),
            cell_size: args.cell_size.or(level.cell_size).unwrap_or(DEFAULT_CELL_SIZE),
            seed: args.seed.or(level.seed).unwrap_or_else(rand::random),
            selector,
        })
    }
}

fn load_catalog(path: Option<&Path>) -> Result<ZoneCatalog> {
    let Some(path) = path else {
        return Ok(ZoneCatalog::standard());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read zone catalog at {}", path.display()))?;
    let catalog = ZoneCatalog::from_toml_str(&contents)
        .with_context(|| format!("invalid zone catalog {}", path.display()))?;

    for (west, south) in catalog.interior_gaps() {
        log::warn!("catalog has no tile with {west:?} west and {south:?} south edges");
    }
    Ok(catalog)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Entry point for the Balanced Zones command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let file = match &args.config {
        Some(path) => config::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(&args, &file)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    log::info!("generating level with seed {}", settings.seed);

    let mut generator = LevelGenerator::new(catalog.clone(), settings.selector, settings.seed);
    let mut spawned = 0_usize;
    let level = generator
        .generate(
            settings.extents,
            settings.start,
            settings.cell_size,
            |tile, position| {
                spawned += 1;
                log::trace!("spawn {tile} at ({}, {})", position.x(), position.y());
            },
        )
        .context("level generation failed")?;
    log::info!("spawned {spawned} zones");

    let report = BalanceReport::compute(level.zones(), &catalog)
        .context("failed to compute balance report")?;

    match args.format {
        OutputFormat::Text => print!("{}", render::text(&level, &report, settings.seed)),
        OutputFormat::Json => println!("{}", render::json(&level, &report, settings.seed)?),
    }
    Ok(())
}
