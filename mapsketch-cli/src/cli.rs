//! Définition et implémentation des commandes CLI
//!
//! - `polygon`, `rectangle`, `circle`, `line` : dessin d'une forme
//! - `remove`, `clear` : suppression
//! - `list`, `counts`, `limits` : consultation
//! - `export` : FeatureCollection GeoJSON

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Subcommand;
use geo::{ChamberlainDuquetteArea, Coord, Haversine, Length};
use geozero::ToWkt;
use mapsketch::export::export_to_path;
use mapsketch::{kernel, shapes, Candidate, Feature, FeatureStore, FeatureType, Shape};
use tracing::info;

use crate::config::Config;
use crate::session::Session;

/// Coordonnée saisie sous la forme `lon,lat`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordArg(pub Coord<f64>);

impl FromStr for CoordArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| format!("Invalid coordinate: '{}'. Expected LON,LAT", s))?;
        let x: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude: '{}'", lon))?;
        let y: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude: '{}'", lat))?;

        if !(-180.0..=180.0).contains(&x) {
            return Err(format!("Longitude out of range: {}", x));
        }
        if !(-90.0..=90.0).contains(&y) {
            return Err(format!("Latitude out of range: {}", y));
        }
        Ok(Self(Coord { x, y }))
    }
}

fn coords(points: &[CoordArg]) -> Vec<Coord<f64>> {
    points.iter().map(|p| p.0).collect()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw a free polygon (at least 3 points)
    Polygon {
        /// Vertex as LON,LAT (repeat for each vertex)
        #[arg(short, long = "point", value_name = "LON,LAT", required = true, allow_hyphen_values = true)]
        points: Vec<CoordArg>,
    },

    /// Draw an axis-aligned rectangle from two opposite corners
    Rectangle {
        /// First corner as LON,LAT
        #[arg(long, value_name = "LON,LAT", allow_hyphen_values = true)]
        from: CoordArg,

        /// Opposite corner as LON,LAT
        #[arg(long, value_name = "LON,LAT", allow_hyphen_values = true)]
        to: CoordArg,
    },

    /// Draw a circle (64-vertex polygon)
    Circle {
        /// Center as LON,LAT
        #[arg(long, value_name = "LON,LAT", allow_hyphen_values = true)]
        center: CoordArg,

        /// Radius in kilometers
        #[arg(long)]
        radius_km: f64,
    },

    /// Draw an open line (at least 2 points)
    Line {
        /// Point as LON,LAT (repeat for each point)
        #[arg(short, long = "point", value_name = "LON,LAT", required = true, allow_hyphen_values = true)]
        points: Vec<CoordArg>,
    },

    /// Remove a shape by id
    Remove {
        /// Shape id
        #[arg(long)]
        id: String,
    },

    /// Remove all shapes
    Clear,

    /// List stored shapes
    List {
        /// Print geometries as WKT
        #[arg(long)]
        wkt: bool,
    },

    /// Show shape counts and limits per type
    Counts,

    /// Show or change per-type limits
    Limits {
        #[command(subcommand)]
        action: Option<LimitsAction>,
    },

    /// Export shapes to a GeoJSON FeatureCollection
    Export {
        /// Output file
        #[arg(short, long)]
        output: std::path::PathBuf,
    },
}

#[derive(Subcommand)]
pub enum LimitsAction {
    /// Print the current limits
    Show,

    /// Set the limit of one shape type
    Set {
        /// Shape type: polygon, rectangle, circle, lineString
        kind: FeatureType,

        /// Maximum number of shapes of this type
        limit: usize,
    },

    /// Restore default limits
    Reset,
}

/// Exécute une commande
pub fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Polygon { points } => cmd_draw(config, shapes::polygon(&coords(&points))?),
        Commands::Rectangle { from, to } => cmd_draw(config, shapes::rectangle(from.0, to.0)?),
        Commands::Circle { center, radius_km } => {
            cmd_draw(config, shapes::circle(center.0, radius_km)?)
        }
        Commands::Line { points } => cmd_draw(config, shapes::line_string(&coords(&points))?),
        Commands::Remove { id } => cmd_remove(config, &id),
        Commands::Clear => cmd_clear(config),
        Commands::List { wkt } => cmd_list(config, wkt),
        Commands::Counts => cmd_counts(config),
        Commands::Limits { action } => cmd_limits(config, action.unwrap_or(LimitsAction::Show)),
        Commands::Export { output } => cmd_export(config, &output),
    }
}

fn open_session(config: &Config) -> Result<Session> {
    let limits = config.load_limits()?;
    Session::open(&config.store_path, limits)
}

/// Soumet une forme terminée au store
pub fn cmd_draw(config: &Config, candidate: Candidate) -> Result<()> {
    let mut session = open_session(config)?;
    let kind = candidate.kind();
    let drawn_area = candidate.shape().as_area().map(kernel::area);

    let feature = session
        .store_mut()
        .add(candidate)
        .context(format!("Failed to add {}", kind))?;
    session.save()?;

    println!("Added {} {}", feature.kind(), feature.id());
    if let (Some(drawn), Some(kept)) = (drawn_area, feature.shape().as_area().map(kernel::area)) {
        if drawn > 0.0 && (drawn - kept) / drawn > 1e-9 {
            println!(
                "Trimmed to avoid overlap: {:.1}% of the drawn area kept",
                kept / drawn * 100.0
            );
        }
    }
    Ok(())
}

pub fn cmd_remove(config: &Config, id: &str) -> Result<()> {
    let mut session = open_session(config)?;
    match session.store_mut().remove(id) {
        Some(removed) => {
            session.save()?;
            println!("Removed {} {}", removed.kind(), removed.id());
        }
        None => println!("No shape with id {}", id),
    }
    Ok(())
}

pub fn cmd_clear(config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    let count = session.store().len();
    session.store_mut().clear();
    session.save()?;
    println!("Removed {} shapes", count);
    Ok(())
}

pub fn cmd_list(config: &Config, wkt: bool) -> Result<()> {
    let session = open_session(config)?;
    let store = session.store();

    if store.is_empty() {
        println!("No shapes in {}", session.path().display());
        return Ok(());
    }

    for feature in store {
        println!("{}", describe(feature));
        if wkt {
            let geometry = feature.shape().to_geometry();
            println!("  {}", geometry.to_wkt().context("Failed to write WKT")?);
        }
    }

    if let Some(bounds) = store.bounds() {
        println!(
            "Extent: [{:.6}, {:.6}] - [{:.6}, {:.6}]",
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y
        );
    }
    Ok(())
}

/// Ligne de résumé d'une feature : id, type, taille géodésique
fn describe(feature: &Feature) -> String {
    let size = match feature.shape() {
        Shape::Area(_) => {
            let m2 = feature
                .shape()
                .to_geometry()
                .chamberlain_duquette_unsigned_area();
            format!("{:.3} km²", m2 / 1_000_000.0)
        }
        Shape::Path(line) => format!("{:.3} km", line.length::<Haversine>() / 1000.0),
    };
    format!(
        "{}  {:<10}  {}  created_at={}",
        feature.id(),
        feature.kind(),
        size,
        feature.created_at()
    )
}

pub fn cmd_counts(config: &Config) -> Result<()> {
    let session = open_session(config)?;
    print_counts(session.store());
    Ok(())
}

fn print_counts(store: &FeatureStore) {
    for kind in FeatureType::ALL {
        let count = store.count_by_type(kind);
        let limit = store.limits().limit(kind);
        let status = if store.remaining(kind) == 0 { " (full)" } else { "" };
        println!(
            "{:<10} {}/{}{}  {}",
            kind,
            count,
            limit,
            status,
            kind.style().color
        );
    }
    println!("Total: {}", store.len());
}

pub fn cmd_limits(config: &Config, action: LimitsAction) -> Result<()> {
    let mut limits = config.load_limits()?;

    match action {
        LimitsAction::Show => {}
        LimitsAction::Set { kind, limit } => {
            limits.set(kind, limit);
            config.save_limits(&limits)?;
            info!(kind = %kind, limit, "Limit updated");
        }
        LimitsAction::Reset => {
            limits = mapsketch::ShapeLimits::default();
            config.save_limits(&limits)?;
            info!("Limits reset to defaults");
        }
    }

    for kind in FeatureType::ALL {
        println!("{:<10} {}", kind, limits.limit(kind));
    }
    Ok(())
}

pub fn cmd_export(config: &Config, output: &Path) -> Result<()> {
    let session = open_session(config)?;
    let store = session.store();

    if store.is_empty() {
        anyhow::bail!("No features to export");
    }

    export_to_path(store.features(), output)
        .context(format!("Failed to export to {}", output.display()))?;
    println!("Exported {} shapes to {}", store.len(), output.display());
    Ok(())
}
