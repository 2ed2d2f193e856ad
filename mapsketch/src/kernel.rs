//! Prédicats et opérations booléennes sur les surfaces
//!
//! Les coordonnées (longitude, latitude) sont traitées comme planaires :
//! aucune correction géodésique. L'approximation reste acceptable pour des
//! formes de faible emprise, ce qui est le cas des dessins sur carte.
//!
//! Aucune validation des entrées : les anneaux doivent être fermés et simples.

use geo::{Area, BooleanOps, Intersects, MultiPolygon, Relate};

/// Vrai si les deux surfaces partagent au moins un point (contact de bord inclus)
pub fn intersects(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    a.intersects(b)
}

/// Vrai si chaque point de `b` est dans `a` ou sur son bord
pub fn contains(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    a.relate(b).is_covers()
}

/// Surface de `a` privée de `b`
///
/// Peut être vide, contenir plusieurs polygones disjoints, ou un polygone
/// troué si `b` est strictement intérieur à `a`.
pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.difference(b)
}

/// Aire de l'intersection de deux surfaces
pub fn overlap_area(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> f64 {
    if !a.intersects(b) {
        return 0.0;
    }
    a.intersection(b).unsigned_area()
}

/// Aire planaire (en degrés carrés)
pub fn area(a: &MultiPolygon<f64>) -> f64 {
    a.unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]])
    }

    #[test]
    fn test_intersects() {
        let a = square(0.0, 0.0, 1.0);
        assert!(intersects(&a, &square(0.5, 0.5, 1.0)));
        assert!(!intersects(&a, &square(2.0, 2.0, 1.0)));
    }

    #[test]
    fn test_touching_edges_intersect() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        assert!(intersects(&a, &b));
        assert!(overlap_area(&a, &b).abs() < 1e-12);
    }

    #[test]
    fn test_contains() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(2.0, 2.0, 2.0);
        assert!(contains(&outer, &inner));
        assert!(!contains(&inner, &outer));
        assert!(!contains(&outer, &square(9.0, 9.0, 2.0)));
    }

    #[test]
    fn test_contains_identical_and_boundary() {
        let a = square(0.0, 0.0, 1.0);
        assert!(contains(&a, &a.clone()));
        // Touche le bord intérieur : toujours contenu
        assert!(contains(&a, &square(0.0, 0.0, 0.5)));
    }

    #[test]
    fn test_difference_quadrant() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);
        let remainder = difference(&b, &a);
        assert_eq!(remainder.0.len(), 1);
        assert!((area(&remainder) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_difference_splits() {
        // Bande verticale qui coupe un rectangle horizontal en deux
        let wide = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 3.0, y: 0.0),
            (x: 3.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]]);
        let band = MultiPolygon::new(vec![polygon![
            (x: 1.0, y: -1.0),
            (x: 2.0, y: -1.0),
            (x: 2.0, y: 2.0),
            (x: 1.0, y: 2.0),
        ]]);
        let remainder = difference(&wide, &band);
        assert_eq!(remainder.0.len(), 2);
        assert!((area(&remainder) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_difference_hole() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(2.0, 2.0, 2.0);
        let remainder = difference(&outer, &inner);
        assert_eq!(remainder.0.len(), 1);
        assert_eq!(remainder.0[0].interiors().len(), 1);
    }

    #[test]
    fn test_difference_empty() {
        let a = square(0.0, 0.0, 1.0);
        let remainder = difference(&a, &square(-1.0, -1.0, 3.0));
        assert!(area(&remainder) < 1e-12);
    }
}
