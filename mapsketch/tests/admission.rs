//! Tests d'intégration : admission de formes dans le store

use geo::{Area, BooleanOps, Coord, MultiPolygon};
use mapsketch::export::{parse_feature_collection, to_feature_collection};
use mapsketch::{
    kernel, resolver, shapes, AdmissionError, Candidate, FeatureStore, FeatureType, Shape,
    ShapeLimits,
};

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Candidate {
    shapes::polygon(&[
        Coord { x: x0, y: y0 },
        Coord { x: x1, y: y0 },
        Coord { x: x1, y: y1 },
        Coord { x: x0, y: y1 },
    ])
    .unwrap()
}

/// Suite pseudo-aléatoire reproductible (xorshift64), valeurs dans [0, 1)
struct Scatter(u64);

impl Scatter {
    fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Store rempli de cercles qui se chevauchent autour de (2.05, 48.05)
fn scattered_circles(seed: u64, count: usize) -> FeatureStore {
    let mut scatter = Scatter(seed);
    let mut store = FeatureStore::new(ShapeLimits::unbounded());
    for _ in 0..count {
        let center = Coord {
            x: 2.0 + 0.1 * scatter.next(),
            y: 48.0 + 0.1 * scatter.next(),
        };
        let radius_km = 0.5 + 3.0 * scatter.next();
        let _ = store.add(shapes::circle(center, radius_km).unwrap());
    }
    store
}

fn area_of(candidate: &Candidate) -> MultiPolygon<f64> {
    candidate.shape().as_area().unwrap().clone()
}

/// Aucune paire de surfaces stockées ne se chevauche, au résidu d'arrondi près
fn assert_no_overlap(store: &FeatureStore) {
    let areas: Vec<(&str, &MultiPolygon<f64>)> = store
        .iter()
        .filter_map(|f| f.shape().as_area().map(|a| (f.id(), a)))
        .collect();
    for (i, (id_a, a)) in areas.iter().enumerate() {
        for (id_b, b) in &areas[i + 1..] {
            assert!(
                resolver::overlap_is_negligible(a, b),
                "{} and {} overlap ({})",
                id_a,
                id_b,
                kernel::overlap_area(a, b)
            );
        }
    }
}

#[test]
fn test_quadrant_overlap_is_trimmed() {
    let mut store = FeatureStore::with_defaults();
    let a = store.add(square(0.0, 0.0, 1.0, 1.0)).unwrap();

    let candidate = square(0.5, 0.5, 1.5, 1.5);
    let expected = area_of(&candidate).difference(a.shape().as_area().unwrap());
    let b = store.add(candidate).unwrap();

    let stored = b.shape().as_area().unwrap();
    assert!((stored.unsigned_area() - 0.75).abs() < 1e-9);
    assert!((stored.unsigned_area() - expected.unsigned_area()).abs() < 1e-12);

    // La forme existante n'est pas modifiée
    assert_eq!(store.get(a.id()), Some(&a));
    assert_no_overlap(&store);
}

#[test]
fn test_fully_inside_is_rejected() {
    let mut store = FeatureStore::with_defaults();
    let a = store.add(square(0.0, 0.0, 10.0, 10.0)).unwrap();

    let err = store.add(square(2.0, 2.0, 4.0, 4.0)).unwrap_err();
    assert_eq!(
        err,
        AdmissionError::FullyEnclosedBy {
            existing_id: a.id().to_string()
        }
    );
    assert_eq!(store.len(), 1);
}

#[test]
fn test_enclosing_is_rejected() {
    let mut store = FeatureStore::with_defaults();
    let a = store.add(square(2.0, 2.0, 4.0, 4.0)).unwrap();

    let err = store.add(square(0.0, 0.0, 10.0, 10.0)).unwrap_err();
    assert_eq!(
        err,
        AdmissionError::FullyEncloses {
            existing_id: a.id().to_string()
        }
    );
}

#[test]
fn test_duplicate_geometry_is_rejected() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(0.0, 0.0, 1.0, 1.0)).unwrap();

    let err = store.add(square(0.0, 0.0, 1.0, 1.0)).unwrap_err();
    assert!(matches!(
        err,
        AdmissionError::FullyEncloses { .. } | AdmissionError::FullyEnclosedBy { .. }
    ));
}

#[test]
fn test_disjoint_geometry_unchanged() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(0.0, 0.0, 1.0, 1.0)).unwrap();

    let candidate = square(3.0, 3.0, 4.0, 4.0);
    let expected = candidate.shape().clone();
    let feature = store.add(candidate).unwrap();
    assert_eq!(feature.shape(), &expected);
}

#[test]
fn test_capacity_one_polygon() {
    let limits = ShapeLimits::default().with(FeatureType::Polygon, 1);
    let mut store = FeatureStore::new(limits);
    store.add(square(0.0, 0.0, 1.0, 1.0)).unwrap();

    let err = store.add(square(5.0, 5.0, 6.0, 6.0)).unwrap_err();
    assert_eq!(
        err,
        AdmissionError::CapacityExceeded {
            kind: FeatureType::Polygon,
            limit: 1
        }
    );

    // Les autres types ne sont pas concernés
    let rect = shapes::rectangle(Coord { x: 5.0, y: 5.0 }, Coord { x: 6.0, y: 6.0 }).unwrap();
    assert!(store.add(rect).is_ok());
}

#[test]
fn test_line_ignores_areas() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(0.0, 0.0, 10.0, 10.0)).unwrap();

    // Entièrement à l'intérieur du carré
    let inside = shapes::line_string(&[Coord { x: 1.0, y: 1.0 }, Coord { x: 2.0, y: 2.0 }]).unwrap();
    let line = store.add(inside).unwrap();
    assert!(matches!(line.shape(), Shape::Path(_)));

    // Une surface qui croise une ligne reste intacte
    let crossing =
        shapes::line_string(&[Coord { x: 15.0, y: 20.5 }, Coord { x: 25.0, y: 20.5 }]).unwrap();
    store.add(crossing).unwrap();
    let candidate = square(20.0, 20.0, 21.0, 21.0);
    let expected = candidate.shape().clone();
    assert_eq!(store.add(candidate).unwrap().shape(), &expected);
}

#[test]
fn test_split_candidate_is_multipolygon() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(1.0, -1.0, 2.0, 2.0)).unwrap();

    let feature = store.add(square(0.0, 0.0, 3.0, 1.0)).unwrap();
    let stored = feature.shape().as_area().unwrap();
    assert_eq!(stored.0.len(), 2);
    assert!((stored.unsigned_area() - 2.0).abs() < 1e-9);
    assert_no_overlap(&store);
}

#[test]
fn test_mixed_types_never_overlap() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(0.0, 0.0, 2.0, 2.0)).unwrap();
    store
        .add(shapes::rectangle(Coord { x: 1.0, y: 1.0 }, Coord { x: 3.0, y: 3.0 }).unwrap())
        .unwrap();
    // Cercle centré sur un bord du carré
    let circle = store
        .add(shapes::circle(Coord { x: 2.0, y: 0.0 }, 50.0).unwrap())
        .unwrap();

    assert_eq!(store.count_by_type(FeatureType::Circle), 1);
    assert_eq!(circle.kind(), FeatureType::Circle);
    assert_no_overlap(&store);
}

#[test]
fn test_store_order_tie_break() {
    let mut store = FeatureStore::with_defaults();
    let left = store.add(square(0.0, 0.0, 1.0, 1.0)).unwrap();
    let right = store.add(square(2.0, 0.0, 3.0, 1.0)).unwrap();

    let bridge = store.add(square(0.5, 0.25, 2.5, 0.75)).unwrap();
    let stored = bridge.shape().as_area().unwrap();
    assert!((stored.unsigned_area() - 0.5).abs() < 1e-9);
    assert_eq!(store.get(left.id()), Some(&left));
    assert_eq!(store.get(right.id()), Some(&right));
    assert_no_overlap(&store);
}

#[test]
fn test_trimmed_to_nothing_is_enclosure() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(0.0, 0.0, 1.0, 2.0)).unwrap();
    store.add(square(1.0, 0.0, 2.0, 2.0)).unwrap();

    // Couvert par l'union des deux formes mais par aucune prise seule
    let err = store.add(square(0.5, 0.5, 1.5, 1.5)).unwrap_err();
    assert!(matches!(
        err,
        AdmissionError::UnableToTrim { .. } | AdmissionError::FullyEnclosedBy { .. }
    ));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_export_reimport_round_trip() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(0.0, 0.0, 1.0, 1.0)).unwrap();
    store.add(square(0.5, 0.5, 1.5, 1.5)).unwrap();
    store
        .add(shapes::circle(Coord { x: 5.0, y: 5.0 }, 10.0).unwrap())
        .unwrap();

    let json = to_feature_collection(store.features()).to_string();
    let features = parse_feature_collection(&json).unwrap();
    assert_eq!(features.len(), store.len());

    let mut reloaded = FeatureStore::with_defaults();
    for (original, parsed) in store.iter().zip(features) {
        assert_eq!(original.id(), parsed.id());
        assert_eq!(original.kind(), parsed.kind());
        assert_eq!(original.created_at(), parsed.created_at());

        let a = original.shape().as_area().unwrap();
        let b = parsed.shape().as_area().unwrap();
        for (pa, pb) in a.iter().zip(b.iter()) {
            for (ca, cb) in pa.exterior().coords().zip(pb.exterior().coords()) {
                assert!((ca.x - cb.x).abs() < 1e-12 && (ca.y - cb.y).abs() < 1e-12);
            }
        }
        reloaded.restore(parsed).unwrap();
    }
    assert_eq!(reloaded.len(), store.len());
}

#[test]
fn test_clip_against_clipped_shape() {
    let mut store = FeatureStore::with_defaults();
    store.add(square(0.0, 0.0, 2.0, 2.0)).unwrap();
    store.add(square(1.0, 1.0, 3.0, 3.0)).unwrap();
    store.add(square(1.5, -1.0, 4.0, 1.5)).unwrap();

    assert_eq!(store.len(), 3);
    assert_no_overlap(&store);

    let err = store.add(square(-1.0, -1.0, 5.0, 5.0)).unwrap_err();
    assert!(matches!(err, AdmissionError::FullyEncloses { .. }));
}

#[test]
fn test_overlapping_circles_are_admitted_without_overlap() {
    let store = scattered_circles(0x5eed, 60);

    assert!(store.len() > 10, "only {} circles admitted", store.len());
    assert_eq!(store.count_by_type(FeatureType::Circle), store.len());
    assert_no_overlap(&store);
}

#[test]
fn test_clipped_circles_reload() {
    for seed in 1..=5u64 {
        let store = scattered_circles(seed * 7919, 25);

        let json = to_feature_collection(store.features()).to_string();
        let features = parse_feature_collection(&json).unwrap();

        let mut reloaded = FeatureStore::new(ShapeLimits::unbounded());
        for feature in features {
            let id = feature.id().to_string();
            reloaded
                .restore(feature)
                .unwrap_or_else(|e| panic!("seed {}: {} not restored: {}", seed, id, e));
        }
        assert_eq!(reloaded.len(), store.len());
    }
}
