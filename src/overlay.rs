use crate::error::SelectionError;
use crate::palette::ColorGenerator;
use crate::types::RegionRecord;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const ALL: &str = "all";
pub const ALL_OPACITY: f64 = 0.3;
pub const SELECTED_OPACITY: f64 = 1.0;

/// A selectable language with its color and the regions where it is spoken.
#[derive(Debug, Clone)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub color: String,
    pub payload: Arc<FeatureCollection>,
}

/// One fill layer in the map's `mapbox.layers` list.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayLayer {
    pub name: String,
    pub source: Arc<FeatureCollection>,
    pub sourcetype: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub opacity: f64,
    pub color: String,
}

/// Per-category payloads and colors, built once and only read afterwards.
#[derive(Debug, Clone)]
pub struct OverlayIndex {
    categories: Vec<Category>,
}

impl OverlayIndex {
    pub fn build(columns: &[String], records: &[RegionRecord], seed: u64) -> Self {
        let features: Vec<Feature> = records.iter()
            .map(|record| region_feature(record, columns))
            .collect();

        let colors = ColorGenerator::new(seed).generate(columns.len());

        let categories: Vec<Category> = columns.iter()
            .zip(colors)
            .enumerate()
            .map(|(idx, (column, color))| {
                let subset: Vec<Feature> = records.iter()
                    .zip(&features)
                    .filter(|(record, _)| record.counts[idx] > 0.0)
                    .map(|(_, feature)| feature.clone())
                    .collect();

                info!(category = %column, features = subset.len(), %color, "built overlay");

                Category {
                    key: column.to_lowercase(),
                    label: title_case(column),
                    color,
                    payload: Arc::new(FeatureCollection {
                        bbox: None,
                        features: subset,
                        foreign_members: None,
                    }),
                }
            })
            .collect();

        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Resolves a dropdown value to (category position, opacity) pairs.
    fn resolve(&self, choice: &str) -> Result<Vec<(usize, f64)>, SelectionError> {
        if choice == ALL {
            return Ok((0..self.categories.len()).map(|idx| (idx, ALL_OPACITY)).collect());
        }

        self.categories.iter()
            .position(|c| c.key == choice)
            .map(|idx| vec![(idx, SELECTED_OPACITY)])
            .ok_or_else(|| SelectionError::Invalid(choice.to_string()))
    }

    /// Fresh layer list for a dropdown value. Never touches the index.
    pub fn layers_for(&self, choice: &str) -> Result<Vec<OverlayLayer>, SelectionError> {
        let layers = self.resolve(choice)?
            .into_iter()
            .map(|(idx, opacity)| {
                let category = &self.categories[idx];
                OverlayLayer {
                    name: category.key.clone(),
                    source: Arc::clone(&category.payload),
                    sourcetype: "geojson",
                    kind: "fill",
                    opacity,
                    color: category.color.clone(),
                }
            })
            .collect();
        Ok(layers)
    }
}

fn region_feature(record: &RegionRecord, columns: &[String]) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), JsonValue::from(record.id.clone()));
    properties.insert("geography".to_string(), JsonValue::from(record.geography.clone()));
    for (column, count) in columns.iter().zip(&record.counts) {
        properties.insert(column.clone(), JsonValue::from(*count));
    }
    properties.insert("total".to_string(), JsonValue::from(record.total));
    properties.insert("lon".to_string(), JsonValue::from(record.lon));
    properties.insert("lat".to_string(), JsonValue::from(record.lat));
    properties.insert("hover".to_string(), JsonValue::from(record.hover.clone()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&record.geometry))),
        id: Some(Id::String(record.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Capitalizes the first letter of every alphabetic run, lowercasing the rest.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
