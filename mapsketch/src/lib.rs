//! # mapsketch
//!
//! Admission des formes dessinées sur une carte (polygones, rectangles, cercles,
//! lignes) avec quotas par type et découpage automatique des chevauchements.
//!
//! ## Features
//!
//! - Quotas configurables par type de forme
//! - Deux surfaces acceptées ne se chevauchent jamais : une nouvelle surface
//!   qui chevauche partiellement des formes existantes est découpée,
//!   un englobement complet est refusé
//! - Lignes exemptées de la règle de non-chevauchement
//! - Export / rechargement GeoJSON
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geo::Coord;
//! use mapsketch::{shapes, FeatureStore, ShapeLimits};
//!
//! let mut store = FeatureStore::new(ShapeLimits::default());
//! let candidate = shapes::rectangle(Coord { x: 2.30, y: 48.80 }, Coord { x: 2.35, y: 48.85 })?;
//!
//! match store.add(candidate) {
//!     Ok(feature) => println!("Ajouté: {}", feature.id()),
//!     Err(e) => eprintln!("Refusé: {}", e),
//! }
//! ```

pub mod error;
pub mod export;
pub mod kernel;
pub mod resolver;
pub mod shapes;
pub mod store;
pub mod style;
pub mod types;

pub use error::{AdmissionError, SketchError};
pub use resolver::{Conflict, Resolution};
pub use store::FeatureStore;
pub use style::{Fill, Style};
pub use types::{Candidate, Feature, FeatureType, Shape, ShapeLimits};
