//! # mapsketch-cli
//!
//! Dessin de formes en ligne de commande, sans chevauchement entre surfaces.
//!
//! ## Features
//!
//! - Polygones, rectangles, cercles et lignes saisis en `lon,lat`
//! - Découpage automatique des surfaces qui chevauchent une forme existante
//! - Quotas par type, modifiables et enregistrés en JSON
//! - Formes conservées dans un fichier GeoJSON entre deux appels
//! - Export GeoJSON
//!
//! ## Usage CLI
//!
//! ```bash
//! mapsketch rectangle --from 2.30,48.80 --to 2.35,48.85
//! mapsketch circle --center 2.34,48.84 --radius-km 1.5
//! mapsketch line -p 2.30,48.80 -p 2.40,48.90
//! mapsketch counts
//! mapsketch limits set circle 3
//! mapsketch export --output ./shapes-export.geojson
//! ```

pub mod cli;
pub mod config;
pub mod session;

pub use config::Config;
pub use session::Session;
