//! Types de données pour le crate mapsketch

use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, Geometry, LineString, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

use crate::SketchError;

/// Type de forme dessinable
///
/// Les variantes sérialisées gardent l'orthographe des tags GeoJSON
/// (`polygon`, `rectangle`, `circle`, `lineString`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureType {
    Polygon,
    Rectangle,
    Circle,
    LineString,
}

impl FeatureType {
    /// Tous les types, dans l'ordre d'affichage de la barre d'outils
    pub const ALL: [FeatureType; 4] = [
        FeatureType::Polygon,
        FeatureType::Rectangle,
        FeatureType::Circle,
        FeatureType::LineString,
    ];

    /// Tag tel qu'il apparaît dans les propriétés GeoJSON
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Polygon => "polygon",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::LineString => "lineString",
        }
    }

    /// Vrai pour les types surfaciques, soumis à la règle de non-chevauchement
    pub fn is_area(self) -> bool {
        match self {
            Self::Polygon | Self::Rectangle | Self::Circle => true,
            Self::LineString => false,
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SketchError::UnknownFeatureType(s.to_string()))
    }
}

/// Géométrie stockée d'une feature
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Surface (un seul polygone en général, plusieurs après un découpage)
    Area(MultiPolygon<f64>),
    /// Tracé ouvert
    Path(LineString<f64>),
}

impl Shape {
    pub fn as_area(&self) -> Option<&MultiPolygon<f64>> {
        match self {
            Self::Area(area) => Some(area),
            Self::Path(_) => None,
        }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, Self::Area(_))
    }

    /// Géométrie `geo` équivalente : un `Polygon` simple est restitué tel quel
    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Self::Area(area) if area.0.len() == 1 => Geometry::Polygon(area.0[0].clone()),
            Self::Area(area) => Geometry::MultiPolygon(area.clone()),
            Self::Path(line) => Geometry::LineString(line.clone()),
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Self::Area(area) => area.bounding_rect(),
            Self::Path(line) => line.bounding_rect(),
        }
    }
}

/// Forme terminée, pas encore admise dans le store
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    kind: FeatureType,
    shape: Shape,
}

impl Candidate {
    /// Associe un type et une géométrie, en vérifiant qu'ils sont compatibles
    pub fn new(kind: FeatureType, shape: Shape) -> Result<Self, SketchError> {
        check_kind_matches(kind, &shape)?;
        Ok(Self { kind, shape })
    }

    pub fn kind(&self) -> FeatureType {
        self.kind
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn into_parts(self) -> (FeatureType, Shape) {
        (self.kind, self.shape)
    }
}

/// Forme acceptée par le store. Immuable après création.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: String,
    kind: FeatureType,
    created_at: i64,
    shape: Shape,
}

impl Feature {
    /// Crée une feature neuve : identifiant UUID v4 et horodatage courant (ms)
    pub(crate) fn create(kind: FeatureType, shape: Shape) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            created_at: chrono::Utc::now().timestamp_millis(),
            shape,
        }
    }

    /// Reconstruit une feature existante (import GeoJSON)
    pub fn from_parts(
        id: impl Into<String>,
        kind: FeatureType,
        created_at: i64,
        shape: Shape,
    ) -> Result<Self, SketchError> {
        let id = id.into();
        if id.is_empty() {
            return Err(SketchError::invalid_feature("empty id"));
        }
        check_kind_matches(kind, &shape)?;
        Ok(Self {
            id,
            kind,
            created_at,
            shape,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> FeatureType {
        self.kind
    }

    /// Horodatage de création, en millisecondes depuis l'epoch Unix
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

fn check_kind_matches(kind: FeatureType, shape: &Shape) -> Result<(), SketchError> {
    if kind.is_area() != shape.is_area() {
        return Err(SketchError::invalid_feature(format!(
            "{} feature cannot carry a {} geometry",
            kind,
            if shape.is_area() { "polygonal" } else { "linear" }
        )));
    }
    Ok(())
}

/// Nombre maximal de formes par type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeLimits {
    pub polygon: usize,
    pub rectangle: usize,
    pub circle: usize,
    pub line_string: usize,
}

impl Default for ShapeLimits {
    fn default() -> Self {
        Self {
            polygon: 10,
            rectangle: 5,
            circle: 5,
            line_string: 20,
        }
    }
}

impl ShapeLimits {
    /// Aucun quota (rechargement d'un store existant avant application des quotas)
    pub fn unbounded() -> Self {
        Self {
            polygon: usize::MAX,
            rectangle: usize::MAX,
            circle: usize::MAX,
            line_string: usize::MAX,
        }
    }

    pub fn limit(&self, kind: FeatureType) -> usize {
        match kind {
            FeatureType::Polygon => self.polygon,
            FeatureType::Rectangle => self.rectangle,
            FeatureType::Circle => self.circle,
            FeatureType::LineString => self.line_string,
        }
    }

    pub fn set(&mut self, kind: FeatureType, limit: usize) {
        match kind {
            FeatureType::Polygon => self.polygon = limit,
            FeatureType::Rectangle => self.rectangle = limit,
            FeatureType::Circle => self.circle = limit,
            FeatureType::LineString => self.line_string = limit,
        }
    }

    /// Variante builder de [`ShapeLimits::set`]
    pub fn with(mut self, kind: FeatureType, limit: usize) -> Self {
        self.set(kind, limit);
        self
    }
}
