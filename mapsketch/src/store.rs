//! Collection ordonnée des formes acceptées
//!
//! Toute insertion passe par le contrôle des quotas puis, pour les surfaces,
//! par le résolveur de chevauchements. Un ajout refusé laisse le store intact.

use geo::Rect;
use tracing::{debug, info, warn};

use crate::error::{AdmissionError, SketchError};
use crate::resolver;
use crate::types::{Candidate, Feature, FeatureType, Shape, ShapeLimits};

/// Store des features acceptées, dans l'ordre d'insertion
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<Feature>,
    limits: ShapeLimits,
}

impl FeatureStore {
    pub fn new(limits: ShapeLimits) -> Self {
        Self {
            features: Vec::new(),
            limits,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ShapeLimits::default())
    }

    /// Admet une candidate et retourne la feature stockée.
    ///
    /// La géométrie stockée peut différer de celle de la candidate si elle a
    /// été découpée contre des formes existantes.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` si le quota du type est atteint, ou l'erreur du
    /// résolveur pour une surface non admissible.
    pub fn add(&mut self, candidate: Candidate) -> Result<Feature, AdmissionError> {
        let (kind, shape) = candidate.into_parts();
        self.check_capacity(kind)?;

        let shape = match shape {
            Shape::Area(geometry) => {
                let resolution = resolver::resolve(&geometry, &self.features).map_err(|e| {
                    warn!(kind = %kind, error = %e, "Shape rejected");
                    e
                })?;
                if resolution.was_trimmed() {
                    info!(
                        kind = %kind,
                        trimmed_against = ?resolution.trimmed_against,
                        parts = resolution.geometry.0.len(),
                        "Shape trimmed to avoid overlap"
                    );
                }
                Shape::Area(resolution.geometry)
            }
            Shape::Path(line) => Shape::Path(line),
        };

        let feature = Feature::create(kind, shape);
        info!(id = %feature.id(), kind = %kind, "Shape added");
        self.features.push(feature.clone());
        Ok(feature)
    }

    /// Réinsère une feature déjà admise (rechargement d'un export).
    ///
    /// L'identifiant et l'horodatage sont conservés. Aucune découpe n'est
    /// faite : une surface qui chevauche une forme du store est refusée. Les
    /// résidus d'arrondi laissés entre deux voisins découpés sont tolérés.
    pub fn restore(&mut self, feature: Feature) -> Result<(), SketchError> {
        if self.get(feature.id()).is_some() {
            return Err(SketchError::DuplicateId(feature.id().to_string()));
        }
        self.check_capacity(feature.kind())?;

        if let Some(area) = feature.shape().as_area() {
            let overlapping = self
                .area_features()
                .find(|(_, existing)| !resolver::overlap_is_negligible(area, existing));
            if let Some((existing_id, _)) = overlapping {
                return Err(SketchError::invalid_feature(format!(
                    "{} overlaps existing shape {}",
                    feature.id(),
                    existing_id
                )));
            }
        }

        debug!(id = %feature.id(), kind = %feature.kind(), "Shape restored");
        self.features.push(feature);
        Ok(())
    }

    /// Supprime la feature d'identifiant `id`. Sans effet si elle est absente.
    pub fn remove(&mut self, id: &str) -> Option<Feature> {
        let pos = self.features.iter().position(|f| f.id() == id)?;
        let removed = self.features.remove(pos);
        info!(id = %id, kind = %removed.kind(), "Shape removed");
        Some(removed)
    }

    pub fn clear(&mut self) {
        info!(count = self.features.len(), "All shapes cleared");
        self.features.clear();
    }

    pub fn count_by_type(&self, kind: FeatureType) -> usize {
        self.features.iter().filter(|f| f.kind() == kind).count()
    }

    /// Nombre de formes encore autorisées pour ce type
    pub fn remaining(&self, kind: FeatureType) -> usize {
        self.limits.limit(kind).saturating_sub(self.count_by_type(kind))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id() == id)
    }

    /// Features dans l'ordre d'insertion
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn limits(&self) -> &ShapeLimits {
        &self.limits
    }

    /// Remplace les quotas. Les formes en surnombre ne sont pas supprimées,
    /// seuls les ajouts suivants sont bloqués.
    pub fn set_limits(&mut self, limits: ShapeLimits) {
        debug!(?limits, "Shape limits updated");
        self.limits = limits;
    }

    /// Emprise de toutes les features
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|f| f.shape().bounding_rect())
            .reduce(|acc, rect| {
                Rect::new(
                    geo::Coord {
                        x: acc.min().x.min(rect.min().x),
                        y: acc.min().y.min(rect.min().y),
                    },
                    geo::Coord {
                        x: acc.max().x.max(rect.max().x),
                        y: acc.max().y.max(rect.max().y),
                    },
                )
            })
    }

    fn check_capacity(&self, kind: FeatureType) -> Result<(), AdmissionError> {
        let limit = self.limits.limit(kind);
        if self.count_by_type(kind) >= limit {
            warn!(kind = %kind, limit, "Shape limit reached");
            return Err(AdmissionError::CapacityExceeded { kind, limit });
        }
        Ok(())
    }

    fn area_features(&self) -> impl Iterator<Item = (&str, &geo::MultiPolygon<f64>)> {
        self.features
            .iter()
            .filter_map(|f| f.shape().as_area().map(|area| (f.id(), area)))
    }
}

impl<'a> IntoIterator for &'a FeatureStore {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
