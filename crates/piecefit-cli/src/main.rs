//! piecefit CLI — command-line interface for the sliding-piece puzzle solver.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use piecefit::{
    binarize, draw_solution, find_regions, precondition, ImageSource, MatchStrategy,
    OverlayStyle, PreconditionParams, RegionParams, SolveConfig, SolveResult, Solver, SortMode,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "piecefit")]
#[command(
    about = "Match rotated sprite pieces to the dark holes they fill in a background image"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a background/sprite image pair.
    Solve(CliSolveArgs),

    /// List the dark regions found in a single image.
    Regions(CliRegionsArgs),

    /// Print the default solver configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliSolveArgs {
    /// Path to the background image (the one with the holes).
    #[arg(long)]
    background: PathBuf,

    /// Path to the sprite sheet with the pieces.
    #[arg(long)]
    sprite: PathBuf,

    /// Path to write the result (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Solver configuration file (JSON); flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Similarity strategy.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Allow at most one piece per background hole.
    #[arg(long)]
    exclusive_backgrounds: bool,

    /// Upscale factor applied to the sprite sheet before matching.
    #[arg(long)]
    sprite_prescale: Option<f64>,

    /// Skip the dilate/downsample mask cleanup.
    #[arg(long)]
    no_precondition: bool,

    /// Score candidates on a single thread.
    #[arg(long)]
    serial: bool,

    /// Write the background with matches drawn on it (PNG).
    #[arg(long)]
    annotate: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliRegionsArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Pixels with every channel below this are foreground.
    #[arg(long, default_value_t = 25)]
    threshold: u8,

    /// Discard regions whose bounding box is smaller than this (px²).
    #[arg(long, default_value_t = 50)]
    min_area: u64,

    /// Merge regions whose edges are at most this far apart (px); 0 disables.
    #[arg(long, default_value_t = 5.0)]
    merge_distance: f64,

    /// Mask cleanup downsample factor; 1 means dilation only.
    #[arg(long, default_value_t = 4)]
    precondition_factor: u32,

    /// Region ordering.
    #[arg(long, value_enum, default_value_t = SortArg::AreaDesc)]
    sort: SortArg,

    /// Keep at most this many regions.
    #[arg(long)]
    max_regions: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    BruteForce,
    Correlation,
}

impl StrategyArg {
    fn to_core(self) -> MatchStrategy {
        match self {
            Self::BruteForce => MatchStrategy::BruteForce,
            Self::Correlation => MatchStrategy::Correlation,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    AreaDesc,
    AreaAsc,
    PositionTopLeft,
    PositionLeft,
}

impl SortArg {
    fn to_core(self) -> SortMode {
        match self {
            Self::AreaDesc => SortMode::AreaDesc,
            Self::AreaAsc => SortMode::AreaAsc,
            Self::PositionTopLeft => SortMode::PositionTopLeft,
            Self::PositionLeft => SortMode::PositionLeft,
        }
    }
}

impl CliSolveArgs {
    fn build_config(&self) -> CliResult<SolveConfig> {
        let mut config = match &self.config {
            Some(path) => SolveConfig::from_json_file(path)?,
            None => SolveConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.matching.strategy = strategy.to_core();
        }
        if self.exclusive_backgrounds {
            config.matching.exclusive_backgrounds = true;
        }
        if let Some(scale) = self.sprite_prescale {
            config.sprite_prescale = scale;
        }
        if self.no_precondition {
            config.precondition.enable = false;
        }
        if self.serial {
            config.matching.parallel = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// JSON document written by `solve`.
#[derive(serde::Serialize)]
struct SolveReport<'a> {
    #[serde(flatten)]
    result: &'a SolveResult,
    drop_points: Vec<[f64; 2]>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => run_solve(&args),
        Commands::Regions(args) => run_regions(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&SolveConfig::default())?);
    Ok(())
}

// ── regions ────────────────────────────────────────────────────────────

fn run_regions(args: &CliRegionsArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let img = ImageSource::Path(args.image.clone()).load()?;
    tracing::info!("Image size: {}x{}", img.width(), img.height());

    let mut mask = binarize(&img, args.threshold);
    mask = precondition(
        &mask,
        &PreconditionParams {
            factor: args.precondition_factor,
            ..PreconditionParams::default()
        },
    );

    let params = RegionParams {
        min_area: args.min_area,
        overlap_threshold: Some(0.0),
        merge_distance: (args.merge_distance > 0.0).then_some(args.merge_distance),
        sort: args.sort.to_core(),
        max_regions: args.max_regions,
    };
    let regions = find_regions(&mask, &params);
    tracing::info!("{} regions found", regions.len());

    println!("{}", serde_json::to_string_pretty(&regions)?);
    Ok(())
}

// ── solve ──────────────────────────────────────────────────────────────

fn run_solve(args: &CliSolveArgs) -> CliResult<()> {
    let config = args.build_config()?;
    tracing::info!(
        "Strategy: {}, sprite prescale: {}",
        config.matching.strategy,
        config.sprite_prescale
    );

    let background = ImageSource::Path(args.background.clone());
    let sprite = ImageSource::Path(args.sprite.clone());
    let solver = Solver::with_config(config);
    let result = solver.solve_sources(&background, &sprite)?;

    tracing::info!(
        "Matched {} of {} pieces ({} background regions)",
        result.matches.len(),
        result.sprite_regions.len(),
        result.background_regions.len()
    );
    for (m, [x, y]) in result.matches.iter().zip(result.drop_points()) {
        tracing::info!(
            "piece {} -> region {} at ({:.1}, {:.1}), angle {}, similarity {:.1}",
            m.sprite_index,
            m.background_index,
            x,
            y,
            m.angle,
            m.similarity
        );
    }

    let report = SolveReport {
        result: &result,
        drop_points: result.drop_points(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }

    if let Some(path) = &args.annotate {
        let bg = background.load()?;
        draw_solution(&bg, &result, &OverlayStyle::default())
            .save(path)
            .map_err(|e| -> CliError {
                format!("Failed to write overlay {}: {}", path.display(), e).into()
            })?;
        tracing::info!("Overlay written to {}", path.display());
    }

    Ok(())
}
