//! Construction des candidates à partir des points saisis sur la carte
//!
//! Chaque fonction correspond à un outil de dessin et produit une forme
//! terminée, prête à être soumise au store.

use geo::{Coord, Destination, Haversine, LineString, MultiPolygon, Point, Polygon};

use crate::types::{Candidate, FeatureType, Shape};
use crate::SketchError;

/// Nombre de segments utilisés pour approcher un cercle
pub const CIRCLE_STEPS: usize = 64;

/// Polygone libre (clic par clic). L'anneau est fermé si nécessaire.
pub fn polygon(points: &[Coord<f64>]) -> Result<Candidate, SketchError> {
    check_finite(points)?;

    let mut ring: Vec<Coord<f64>> = points.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring.dedup();
    if ring.len() < 3 {
        return Err(SketchError::invalid_feature(
            "a polygon needs at least 3 distinct vertices",
        ));
    }

    area_candidate(FeatureType::Polygon, ring)
}

/// Rectangle aligné sur les axes, défini par deux coins opposés.
///
/// Les coins sont normalisés : l'anneau part toujours du coin sud-ouest et
/// tourne dans le sens anti-horaire, quel que soit le sens du tracé.
pub fn rectangle(start: Coord<f64>, end: Coord<f64>) -> Result<Candidate, SketchError> {
    check_finite(&[start, end])?;
    if start.x == end.x || start.y == end.y {
        return Err(SketchError::invalid_feature("rectangle has zero area"));
    }

    let (min_x, max_x) = (start.x.min(end.x), start.x.max(end.x));
    let (min_y, max_y) = (start.y.min(end.y), start.y.max(end.y));
    let ring = vec![
        Coord { x: min_x, y: min_y },
        Coord { x: max_x, y: min_y },
        Coord { x: max_x, y: max_y },
        Coord { x: min_x, y: max_y },
    ];
    area_candidate(FeatureType::Rectangle, ring)
}

/// Cercle approché par un anneau de [`CIRCLE_STEPS`] sommets.
///
/// Les sommets sont placés à `radius_km` du centre sur la sphère (haversine),
/// en tournant dans le sens anti-horaire depuis le nord.
pub fn circle(center: Coord<f64>, radius_km: f64) -> Result<Candidate, SketchError> {
    check_finite(&[center])?;
    if !(radius_km.is_finite() && radius_km > 0.0) {
        return Err(SketchError::invalid_feature(format!(
            "circle radius must be positive, got {}",
            radius_km
        )));
    }

    let center = Point::from(center);
    let radius_m = radius_km * 1000.0;
    let ring: Vec<Coord<f64>> = (0..CIRCLE_STEPS)
        .map(|i| {
            let bearing = -360.0 * i as f64 / CIRCLE_STEPS as f64;
            Haversine::destination(center, bearing, radius_m).0
        })
        .collect();

    area_candidate(FeatureType::Circle, ring)
}

/// Ligne brisée ouverte
pub fn line_string(points: &[Coord<f64>]) -> Result<Candidate, SketchError> {
    check_finite(points)?;
    if points.len() < 2 {
        return Err(SketchError::invalid_feature(
            "a line needs at least 2 points",
        ));
    }

    Candidate::new(
        FeatureType::LineString,
        Shape::Path(LineString::new(points.to_vec())),
    )
}

fn area_candidate(kind: FeatureType, ring: Vec<Coord<f64>>) -> Result<Candidate, SketchError> {
    // Polygon::new ferme l'anneau
    let polygon = Polygon::new(LineString::new(ring), vec![]);
    Candidate::new(kind, Shape::Area(MultiPolygon::new(vec![polygon])))
}

fn check_finite(points: &[Coord<f64>]) -> Result<(), SketchError> {
    match points.iter().find(|c| !(c.x.is_finite() && c.y.is_finite())) {
        Some(c) => Err(SketchError::invalid_feature(format!(
            "non-finite coordinate ({}, {})",
            c.x, c.y
        ))),
        None => Ok(()),
    }
}
