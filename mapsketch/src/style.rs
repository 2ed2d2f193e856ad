//! Styles de rendu par type de forme

use crate::types::FeatureType;

/// Remplissage d'une surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: &'static str,
    pub opacity: f32,
}

/// Style de tracé transmis au moteur de rendu
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: &'static str,
    pub weight: u8,
    pub fill: Option<Fill>,
    /// Motif de pointillés (aperçu pendant le dessin)
    pub dash_array: Option<&'static str>,
}

impl Style {
    const fn area(color: &'static str) -> Self {
        Self {
            color,
            weight: 2,
            fill: Some(Fill {
                color,
                opacity: 0.3,
            }),
            dash_array: None,
        }
    }

    /// Variante pointillée et plus transparente, pour la forme en cours de dessin
    pub fn preview(self) -> Self {
        Self {
            fill: self.fill.map(|fill| Fill {
                opacity: 0.2,
                ..fill
            }),
            dash_array: Some("5, 5"),
            ..self
        }
    }
}

impl FeatureType {
    pub fn style(self) -> Style {
        match self {
            Self::Polygon => Style::area("#3388ff"),
            Self::Rectangle => Style::area("#ff7800"),
            Self::Circle => Style::area("#28a745"),
            Self::LineString => Style {
                color: "#dc3545",
                weight: 3,
                fill: None,
                dash_array: None,
            },
        }
    }
}
