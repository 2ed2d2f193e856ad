//! Résolution des chevauchements entre une forme candidate et les formes acceptées
//!
//! Une candidate surfacique qui chevauche partiellement des formes existantes
//! est découpée jusqu'à ne plus en recouvrir aucune. Un englobement complet
//! (dans un sens ou dans l'autre) est refusé.

use geo::{Area, MultiPolygon, Polygon};
use tracing::debug;

use crate::error::AdmissionError;
use crate::kernel;
use crate::types::Feature;

/// Aire minimale d'une partie conservée après découpage (degrés carrés, ~1 cm²)
pub const MIN_PART_AREA: f64 = 1e-14;

/// Part de la plus petite surface en dessous de laquelle un recouvrement est
/// un simple résidu d'arrondi entre voisins découpés
pub const OVERLAP_TOLERANCE: f64 = 1e-6;

/// Vrai si `a` et `b` ne partagent qu'un bord ou un résidu d'arrondi
pub fn overlap_is_negligible(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    let threshold = (OVERLAP_TOLERANCE * kernel::area(a).min(kernel::area(b))).max(MIN_PART_AREA);
    kernel::overlap_area(a, b) <= threshold
}

/// Nature d'un conflit entre la candidate et une forme existante
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// La candidate englobe la forme existante
    Encloses,
    /// La candidate est incluse dans la forme existante
    EnclosedBy,
    /// Chevauchement partiel, ou simple contact de bord
    Partial,
}

/// Classe le conflit entre deux surfaces qui s'intersectent
pub fn classify(candidate: &MultiPolygon<f64>, existing: &MultiPolygon<f64>) -> Conflict {
    if kernel::contains(candidate, existing) {
        Conflict::Encloses
    } else if kernel::contains(existing, candidate) {
        Conflict::EnclosedBy
    } else {
        Conflict::Partial
    }
}

/// Résultat d'une admission géométrique réussie
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Géométrie finale à stocker
    pub geometry: MultiPolygon<f64>,
    /// Formes existantes contre lesquelles la candidate a été découpée, dans l'ordre
    pub trimmed_against: Vec<String>,
}

impl Resolution {
    pub fn was_trimmed(&self) -> bool {
        !self.trimmed_against.is_empty()
    }
}

/// Calcule la géométrie admissible d'une candidate face aux features acceptées.
///
/// Les features non surfaciques sont ignorées. À chaque tour, la première
/// feature (dans l'ordre du store) qui touche la candidate est traitée puis
/// retirée des features à vérifier : la boucle fait au plus N tours.
///
/// # Errors
///
/// - `FullyEncloses` / `FullyEnclosedBy` en cas d'englobement
/// - `UnableToTrim` si le découpage ne laisse aucune surface utilisable
pub fn resolve(
    candidate: &MultiPolygon<f64>,
    accepted: &[Feature],
) -> Result<Resolution, AdmissionError> {
    let mut current = candidate.clone();
    let mut remaining: Vec<(&str, &MultiPolygon<f64>)> = accepted
        .iter()
        .filter_map(|f| f.shape().as_area().map(|area| (f.id(), area)))
        .collect();
    let mut trimmed_against = Vec::new();

    while let Some(pos) = remaining
        .iter()
        .position(|(_, existing)| kernel::intersects(&current, existing))
    {
        let (existing_id, existing) = remaining.remove(pos);
        let conflict = classify(&current, existing);
        debug!(existing_id, ?conflict, remaining = remaining.len(), "Overlap detected");

        match conflict {
            Conflict::Encloses => {
                return Err(AdmissionError::FullyEncloses {
                    existing_id: existing_id.to_string(),
                })
            }
            Conflict::EnclosedBy => {
                return Err(AdmissionError::FullyEnclosedBy {
                    existing_id: existing_id.to_string(),
                })
            }
            Conflict::Partial if overlap_is_negligible(&current, existing) => {
                debug!(existing_id, "Boundary contact only, nothing to trim");
            }
            Conflict::Partial => {
                let remainder = kernel::difference(&current, existing);
                current = usable_remainder(remainder).ok_or_else(|| {
                    AdmissionError::UnableToTrim {
                        existing_id: existing_id.to_string(),
                    }
                })?;
                debug!(existing_id, area = kernel::area(&current), "Candidate trimmed");
                trimmed_against.push(existing_id.to_string());
            }
        }
    }

    Ok(Resolution {
        geometry: current,
        trimmed_against,
    })
}

/// Filtre les résidus dégénérés d'un découpage.
///
/// Retourne `None` si rien ne subsiste ou si une partie est trouée : une
/// forme stockée n'a jamais de trou.
fn usable_remainder(remainder: MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    let parts: Vec<Polygon<f64>> = remainder
        .into_iter()
        .filter(|part| part.unsigned_area() > MIN_PART_AREA)
        .collect();

    if parts.is_empty() || parts.iter().any(|part| !part.interiors().is_empty()) {
        return None;
    }
    Some(MultiPolygon::new(parts))
}
