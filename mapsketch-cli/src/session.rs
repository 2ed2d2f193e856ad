//! Persistance du store entre deux invocations de la CLI
//!
//! Les formes acceptées sont conservées dans un fichier GeoJSON, au même
//! format que l'export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mapsketch::export::{export_to_path, import_from_path};
use mapsketch::{FeatureStore, ShapeLimits};
use tracing::{debug, info};

/// Store chargé depuis (et enregistré vers) un fichier GeoJSON
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    store: FeatureStore,
}

impl Session {
    /// Ouvre le fichier du store. Un fichier absent donne un store vide.
    ///
    /// Les quotas sont appliqués après rechargement : un store en surnombre
    /// (quotas abaissés depuis) reste lisible.
    pub fn open(path: &Path, limits: ShapeLimits) -> Result<Self> {
        let mut store = FeatureStore::new(ShapeLimits::unbounded());

        if path.exists() {
            let features = import_from_path(path)
                .context(format!("Failed to read store: {}", path.display()))?;
            for feature in features {
                let id = feature.id().to_string();
                store
                    .restore(feature)
                    .context(format!("Invalid feature {} in {}", id, path.display()))?;
            }
            debug!(path = %path.display(), count = store.len(), "Store loaded");
        }

        store.set_limits(limits);
        Ok(Self {
            path: path.to_path_buf(),
            store,
        })
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FeatureStore {
        &mut self.store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enregistre le store dans son fichier
    pub fn save(&self) -> Result<()> {
        export_to_path(self.store.features(), &self.path)
            .context(format!("Failed to write store: {}", self.path.display()))?;
        info!(path = %self.path.display(), count = self.store.len(), "Store saved");
        Ok(())
    }
}
