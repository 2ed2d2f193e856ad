//! Export et rechargement des features au format GeoJSON
//!
//! Chaque feature exportée porte exactement trois propriétés :
//! `type`, `id` et `createdAt` (millisecondes Unix).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use geo::{LineString, MultiPolygon, Polygon};
use geojson::{FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::types::{Feature, FeatureType, Shape};
use crate::SketchError;

/// Convertit une feature en feature GeoJSON
pub fn to_geojson_feature(feature: &Feature) -> geojson::Feature {
    let value = match feature.shape() {
        Shape::Area(area) if area.0.len() == 1 => Value::from(&area.0[0]),
        Shape::Area(area) => Value::from(area),
        Shape::Path(line) => Value::from(line),
    };

    let mut properties = JsonObject::new();
    properties.insert("type".to_string(), JsonValue::from(feature.kind().as_str()));
    properties.insert("id".to_string(), JsonValue::from(feature.id()));
    properties.insert("createdAt".to_string(), JsonValue::from(feature.created_at()));

    geojson::Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Construit la FeatureCollection de toutes les features, dans l'ordre
pub fn to_feature_collection<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.into_iter().map(to_geojson_feature).collect(),
        foreign_members: None,
    }
}

/// Écrit la FeatureCollection sur un flux
pub fn write_feature_collection<'a, W: Write>(
    writer: &mut W,
    features: impl IntoIterator<Item = &'a Feature>,
) -> Result<(), SketchError> {
    let collection = to_feature_collection(features);
    writer.write_all(collection.to_string().as_bytes())?;
    Ok(())
}

/// Exporte les features dans un fichier `.geojson`
pub fn export_to_path<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    output_path: &Path,
) -> Result<(), SketchError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_feature_collection(&mut writer, features)?;
    writer.flush()?;
    Ok(())
}

/// Relit une FeatureCollection produite par l'export.
///
/// # Errors
///
/// `GeoJson` si le document est illisible, `InvalidFeature` si une feature
/// n'a pas les propriétés attendues ou une géométrie incompatible avec son type.
pub fn parse_feature_collection(input: &str) -> Result<Vec<Feature>, SketchError> {
    let collection = FeatureCollection::from_str(input)?;
    collection.features.iter().map(from_geojson_feature).collect()
}

/// Charge un fichier `.geojson` exporté
pub fn import_from_path(path: &Path) -> Result<Vec<Feature>, SketchError> {
    let content = std::fs::read_to_string(path)?;
    parse_feature_collection(&content)
}

/// Convertit une feature GeoJSON en feature
pub fn from_geojson_feature(feature: &geojson::Feature) -> Result<Feature, SketchError> {
    let kind: FeatureType = string_property(feature, "type")?.parse()?;
    let id = string_property(feature, "id")?;
    let created_at = feature
        .property("createdAt")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|ms| ms as i64)))
        .ok_or_else(|| SketchError::invalid_feature(format!("{}: missing createdAt", id)))?;

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| SketchError::invalid_feature(format!("{}: missing geometry", id)))?;

    let shape = match &geometry.value {
        Value::Polygon(_) => {
            let polygon = Polygon::<f64>::try_from(&geometry.value)?;
            Shape::Area(MultiPolygon::new(vec![polygon]))
        }
        Value::MultiPolygon(_) => Shape::Area(MultiPolygon::<f64>::try_from(&geometry.value)?),
        Value::LineString(_) => Shape::Path(LineString::<f64>::try_from(&geometry.value)?),
        other => {
            return Err(SketchError::invalid_feature(format!(
                "{}: unsupported geometry type {}",
                id,
                other.type_name()
            )))
        }
    };

    Feature::from_parts(id, kind, created_at, shape)
}

fn string_property<'a>(feature: &'a geojson::Feature, key: &str) -> Result<&'a str, SketchError> {
    feature
        .property(key)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| SketchError::invalid_feature(format!("missing string property '{}'", key)))
}
