use crate::config::InputConfig;
use crate::error::ConfigError;
use crate::types::RawRegion;
use anyhow::{anyhow, Context, Result};
use geo::MultiPolygon;
use geojson::GeoJson;
use shapefile::dbase::FieldValue;
use shapefile::Reader;
use std::fs::File;
use std::io::BufReader;
use tracing::{debug, info};

pub fn load_regions(input: &InputConfig) -> Result<Vec<RawRegion>> {
    let extension = input.geometry.extension()
        .and_then(|e| e.to_str())
        .map(|s: &str| s.to_lowercase())
        .ok_or_else(|| anyhow!("Input geometry file has no extension"))?;

    let regions = match extension.as_str() {
        "shp" => load_shapefile(input)?,
        "json" | "geojson" => load_geojson(input)?,
        _ => return Err(anyhow!("Unsupported geometry format: {}", extension)),
    };

    info!(regions = regions.len(), path = ?input.geometry, "loaded region geometry");
    Ok(regions)
}

fn load_shapefile(input: &InputConfig) -> Result<Vec<RawRegion>> {
    let mut reader = Reader::from_path(&input.geometry)
        .with_context(|| format!("Failed to open Shapefile: {:?}", input.geometry))?;

    let mut regions = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let id_value = record.get(&input.id_column).ok_or_else(|| ConfigError::MissingColumn {
            column: input.id_column.clone(),
            region: format!("#{}", regions.len()),
        })?;
        let id = match text_field(id_value) {
            Some(id) => id,
            None => {
                debug!("skipping shapefile record without an id");
                continue;
            }
        };

        let geometry = match shape {
            shapefile::Shape::Polygon(polygon) => {
                let geo_polygon: MultiPolygon<f64> = polygon.try_into()
                    .map_err(|e| anyhow!("Failed to convert polygon: {:?}", e))?;
                geo_polygon
            }
            shapefile::Shape::PolygonM(polygon) => {
                let geo_polygon: MultiPolygon<f64> = polygon.try_into()
                    .map_err(|e| anyhow!("Failed to convert polygonM: {:?}", e))?;
                geo_polygon
            }
            shapefile::Shape::PolygonZ(polygon) => {
                let geo_polygon: MultiPolygon<f64> = polygon.try_into()
                    .map_err(|e| anyhow!("Failed to convert polygonZ: {:?}", e))?;
                geo_polygon
            }
            _ => continue, // Skip non-polygon shapes
        };

        // Null names read as empty; a missing column is a config mistake
        let geography = record.get(&input.geography_column)
            .map(|value| text_field(value).unwrap_or_default())
            .ok_or_else(|| ConfigError::MissingColumn {
                column: input.geography_column.clone(),
                region: id.clone(),
            })?;

        let mut counts = Vec::with_capacity(input.categories.len());
        for column in &input.categories {
            let value = record.get(column).ok_or_else(|| ConfigError::MissingColumn {
                column: column.clone(),
                region: id.clone(),
            })?;
            let count = numeric_field(value).ok_or_else(|| ConfigError::NonNumericColumn {
                column: column.clone(),
                region: id.clone(),
            })?;
            counts.push(count);
        }

        regions.push(RawRegion { id, geography, geometry, counts });
    }

    Ok(regions)
}

fn load_geojson(input: &InputConfig) -> Result<Vec<RawRegion>> {
    let file = File::open(&input.geometry)
        .with_context(|| format!("Failed to open GeoJSON file: {:?}", input.geometry))?;
    let reader = BufReader::new(file);

    let geojson = GeoJson::from_reader(reader).context("Failed to parse GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut regions = Vec::new();

    for feature in collection.features {
        let props = feature.properties.unwrap_or_default();

        let id = match props.get(&input.id_column) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                debug!("skipping feature without an id");
                continue;
            }
        };

        let geometry = match feature.geometry {
            Some(geom) => {
                let valid_geo: geo::Geometry<f64> = geom.value.try_into()
                    .map_err(|e| anyhow!("Failed to convert geojson geometry: {:?}", e))?;

                match valid_geo {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => continue, // Skip points/lines
                }
            }
            None => continue,
        };

        let geography = match props.get(&input.geography_column) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) => String::new(),
            Some(other) => other.to_string(),
            None => {
                return Err(ConfigError::MissingColumn {
                    column: input.geography_column.clone(),
                    region: id,
                }
                .into())
            }
        };

        let mut counts = Vec::with_capacity(input.categories.len());
        for column in &input.categories {
            let count = match props.get(column) {
                Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(serde_json::Value::Null) => 0.0,
                Some(_) => {
                    return Err(ConfigError::NonNumericColumn {
                        column: column.clone(),
                        region: id,
                    }
                    .into())
                }
                None => {
                    return Err(ConfigError::MissingColumn {
                        column: column.clone(),
                        region: id,
                    }
                    .into())
                }
            };
            counts.push(count);
        }

        regions.push(RawRegion { id, geography, geometry, counts });
    }

    Ok(regions)
}

/// Null numerics count as zero; `None` means the field is not numeric at all.
fn numeric_field(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(v) => Some(v.unwrap_or(0.0)),
        FieldValue::Float(v) => Some(v.map(f64::from).unwrap_or(0.0)),
        FieldValue::Integer(v) => Some(f64::from(*v)),
        FieldValue::Double(v) | FieldValue::Currency(v) => Some(*v),
        _ => None,
    }
}

fn text_field(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Memo(s) => Some(s.clone()),
        FieldValue::Integer(v) => Some(v.to_string()),
        FieldValue::Numeric(Some(v)) | FieldValue::Double(v) => Some(v.to_string()),
        _ => None,
    }
}
