//! `repertoire` - build an opening repertoire and print it as PGN
//!
//! ```text
//! repertoire build licw --max-ply 10 --output white.pgn
//! repertoire analyse rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1
//! ```
//!
//! `analyse` lists the three best moves of one position as winningest,
//! dont-lose and allow-one.
//!
//! Settings come from `--config` or the user's `settings.json`, then the
//! command line overrides them. `LICHESS_TOKEN` (environment or `.env`) is
//! sent to the explorer when present.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use opening_explorer::{CachedExplorer, ExplorerSource, LichessExplorer};
use repertoire::analysis;
use repertoire::core::{load_config, save_config, RepertoireConfig};
use repertoire::{rules, HeuristicKind, RepertoireBuilder, Strategy};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uci_analysis::UciEngine;

#[derive(Parser, Debug)]
#[command(name = "repertoire", version, about = "Build opening repertoires from explorer statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// UCI engine binary
    #[arg(long, global = true)]
    engine: Option<PathBuf>,

    /// Save the effective settings to this file and continue
    #[arg(long, global = true)]
    write_config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grow a repertoire and print it as PGN
    Build {
        /// Strategy preset: licw, licb, masw, masb, easyw, easyb
        strategy: String,

        /// Stop expanding lines at this ply
        #[arg(long)]
        max_ply: Option<u32>,

        /// Frontier width per ply after pruning
        #[arg(long)]
        prune_factor: Option<usize>,

        /// Score shortlisted moves with this heuristic
        #[arg(long)]
        heuristic: Option<HeuristicKind>,

        /// Write PGN here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the top moves of one position under each measure
    Analyse {
        /// Position to analyse; the FEN fields may be passed unquoted
        #[arg(required = true, num_args = 1..)]
        fen: Vec<String>,

        /// Read reply frequencies from the masters database
        #[arg(long)]
        masters: bool,
    },
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut config = load_config(cli.config.as_deref());
    if let Some(engine) = &cli.engine {
        config.engine.path = engine.clone();
    }

    match cli.command {
        Commands::Build {
            strategy,
            max_ply,
            prune_factor,
            heuristic,
            output,
        } => {
            if let Some(max_ply) = max_ply {
                config.build.max_ply = max_ply;
            }
            if let Some(prune_factor) = prune_factor {
                config.build.prune_factor = prune_factor;
            }
            write_settings(&config, cli.write_config.as_deref())?;

            let mut strategy = Strategy::preset(&strategy, &config.build)?;
            if let Some(heuristic) = heuristic {
                strategy.heuristic = heuristic;
            }
            build(&config, &strategy, output.as_deref())
        }
        Commands::Analyse { fen, masters } => {
            write_settings(&config, cli.write_config.as_deref())?;
            let source = if masters {
                ExplorerSource::Masters
            } else {
                ExplorerSource::lichess_club()
            };
            analyse(&config, &fen.join(" "), source)
        }
    }
}

fn write_settings(config: &RepertoireConfig, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        save_config(config, path)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
    }
    Ok(())
}

fn open_explorer(config: &RepertoireConfig) -> Result<CachedExplorer> {
    let token = std::env::var("LICHESS_TOKEN").ok().filter(|t| !t.is_empty());
    Ok(CachedExplorer::new(
        LichessExplorer::new(config.explorer.clone(), token)
            .context("Failed to create explorer client")?,
    ))
}

fn start_engine(config: &RepertoireConfig) -> Result<UciEngine> {
    let engine = UciEngine::spawn(&config.engine.path, &config.engine.options).with_context(
        || format!("Failed to start engine {}", config.engine.path.display()),
    )?;
    info!("[UCI] Using {}", engine.name());
    Ok(engine)
}

fn build(config: &RepertoireConfig, strategy: &Strategy, output: Option<&Path>) -> Result<()> {
    let explorer = open_explorer(config)?;
    let engine = start_engine(config)?;

    // Close the engine before surfacing build errors
    let repertoire = RepertoireBuilder::new(&explorer, &engine, config).build(strategy);
    engine.close();
    let repertoire = repertoire?;

    let pgn = repertoire.to_pgn();
    match output {
        Some(path) => {
            fs::write(path, &pgn)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("[BUILD] Wrote {} lines to {}", repertoire.lines.len(), path.display());
        }
        None => print!("{}", pgn),
    }

    Ok(())
}

fn analyse(config: &RepertoireConfig, fen: &str, source: ExplorerSource) -> Result<()> {
    let position = rules::from_fen(fen)?;
    let explorer = open_explorer(config)?;
    let engine = start_engine(config)?;

    let rankings = analysis::analyse(&position, &explorer, source, &engine, config);
    engine.close();

    println!("{}", fen);
    for ranking in rankings? {
        println!("{}", ranking.render(&position));
    }
    Ok(())
}
