//! Types d'erreurs pour le crate mapsketch

use thiserror::Error;

use crate::types::FeatureType;

/// Refus d'admission d'une forme candidate.
///
/// Toutes ces erreurs sont récupérables : le store reste inchangé et
/// l'utilisateur peut redessiner ou supprimer une forme existante.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Quota atteint pour ce type de forme
    #[error("Maximum number of {kind} shapes reached ({limit})")]
    CapacityExceeded { kind: FeatureType, limit: usize },

    /// La candidate englobe entièrement une forme existante
    #[error("Cannot add shape: it fully encloses existing shape {existing_id}")]
    FullyEncloses { existing_id: String },

    /// La candidate est entièrement incluse dans une forme existante
    #[error("Cannot add shape: it is fully enclosed by existing shape {existing_id}")]
    FullyEnclosedBy { existing_id: String },

    /// Le découpage n'a laissé aucune surface exploitable
    #[error("Unable to trim overlapping shape against {existing_id}")]
    UnableToTrim { existing_id: String },
}

impl AdmissionError {
    /// Identifiant de la forme existante en conflit, si l'erreur est géométrique
    pub fn conflicting_id(&self) -> Option<&str> {
        match self {
            Self::CapacityExceeded { .. } => None,
            Self::FullyEncloses { existing_id }
            | Self::FullyEnclosedBy { existing_id }
            | Self::UnableToTrim { existing_id } => Some(existing_id),
        }
    }
}

/// Erreurs générales du crate (construction, import/export)
#[derive(Debug, Error)]
pub enum SketchError {
    /// Refus d'admission
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// Erreur d'I/O lors de l'import ou de l'export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document GeoJSON illisible
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Feature mal formée (géométrie ou propriétés)
    #[error("Invalid feature: {reason}")]
    InvalidFeature { reason: String },

    /// Identifiant déjà présent dans le store
    #[error("Duplicate feature id: {0}")]
    DuplicateId(String),

    /// Tag de type inconnu
    #[error("Unknown feature type: {0}")]
    UnknownFeatureType(String),
}

impl SketchError {
    /// Crée une erreur de feature invalide
    pub fn invalid_feature(reason: impl Into<String>) -> Self {
        Self::InvalidFeature {
            reason: reason.into(),
        }
    }
}
