//! Configuration : emplacements des fichiers et quotas par type de forme

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mapsketch::ShapeLimits;
use tracing::{debug, warn};

/// Fichier GeoJSON des formes acceptées (défaut)
pub const DEFAULT_STORE_PATH: &str = "shapes.geojson";

/// Fichier JSON des quotas (défaut)
pub const DEFAULT_LIMITS_PATH: &str = "shape_limits.json";

/// Emplacements utilisés par la CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fichier GeoJSON où sont conservées les formes entre deux appels
    pub store_path: PathBuf,

    /// Fichier JSON des quotas
    pub limits_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            limits_path: PathBuf::from(DEFAULT_LIMITS_PATH),
        }
    }
}

impl Config {
    /// Charge la configuration depuis les variables d'environnement
    /// (`MAPSKETCH_STORE`, `MAPSKETCH_LIMITS`)
    pub fn from_env() -> Self {
        Self {
            store_path: std::env::var_os("MAPSKETCH_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            limits_path: std::env::var_os("MAPSKETCH_LIMITS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LIMITS_PATH)),
        }
    }

    /// Applique les options de ligne de commande
    pub fn with_overrides(mut self, store: Option<PathBuf>, limits: Option<PathBuf>) -> Self {
        if let Some(store) = store {
            self.store_path = store;
        }
        if let Some(limits) = limits {
            self.limits_path = limits;
        }
        self
    }

    pub fn load_limits(&self) -> Result<ShapeLimits> {
        load_limits(&self.limits_path)
    }

    pub fn save_limits(&self, limits: &ShapeLimits) -> Result<()> {
        save_limits(&self.limits_path, limits)
    }
}

/// Charge les quotas depuis un fichier JSON.
///
/// Fichier absent : quotas par défaut. Fichier illisible comme JSON : quotas
/// par défaut, avec un warning.
pub fn load_limits(path: &Path) -> Result<ShapeLimits> {
    if !path.exists() {
        debug!(path = %path.display(), "No limits file, using defaults");
        return Ok(ShapeLimits::default());
    }

    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read limits file: {}", path.display()))?;

    match serde_json::from_str(&content) {
        Ok(limits) => Ok(limits),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid limits file, using defaults");
            Ok(ShapeLimits::default())
        }
    }
}

/// Enregistre les quotas dans un fichier JSON
pub fn save_limits(path: &Path, limits: &ShapeLimits) -> Result<()> {
    let json = serde_json::to_string_pretty(limits).context("Failed to serialize limits")?;
    std::fs::write(path, json)
        .context(format!("Failed to write limits file: {}", path.display()))
}
