//! Point d'entrée CLI pour mapsketch

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use mapsketch_cli::cli::{self, Commands};
use mapsketch_cli::Config;

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Dessiner des formes sur une carte sans chevauchement
#[derive(Parser)]
#[command(name = "mapsketch")]
#[command(author, version)]
#[command(about = "Dessiner des polygones, rectangles, cercles et lignes sans chevauchement")]
#[command(long_about = "Les surfaces qui chevauchent une forme existante sont découpées automatiquement.\n\nLes formes sont conservées dans un fichier GeoJSON (--store ou MAPSKETCH_STORE), les quotas dans un fichier JSON (--limits ou MAPSKETCH_LIMITS).")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Fichier GeoJSON des formes (défaut : env MAPSKETCH_STORE / shapes.geojson)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Fichier JSON des quotas (défaut : env MAPSKETCH_LIMITS / shape_limits.json)
    #[arg(long, global = true)]
    limits: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let config = Config::from_env().with_overrides(cli.store, cli.limits);
    debug!(
        store = %config.store_path.display(),
        limits = %config.limits_path.display(),
        "Configuration"
    );

    cli::run(cli.command, &config)
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
