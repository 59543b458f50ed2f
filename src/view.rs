use crate::config::MapConfig;
use crate::overlay::{OverlayIndex, OverlayLayer, ALL};
use crate::types::RegionRecord;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

/// One entry per category in order, then "All".
pub fn dropdown_options(index: &OverlayIndex) -> Vec<DropdownOption> {
    let mut options: Vec<DropdownOption> = index.categories().iter()
        .map(|c| DropdownOption {
            label: c.label.clone(),
            value: c.key.clone(),
        })
        .collect();
    options.push(DropdownOption {
        label: "All".to_string(),
        value: ALL.to_string(),
    });
    options
}

/// The invisible marker trace that carries per-region hover text.
#[derive(Debug, Serialize)]
pub struct MarkerTrace {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub mode: &'static str,
    pub marker: Marker,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub text: Vec<String>,
    pub hoverinfo: &'static str,
    pub showlegend: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
    pub autosize: bool,
    pub hovermode: &'static str,
    pub margin: Margin,
    pub mapbox: Mapbox,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mapbox {
    pub accesstoken: String,
    pub center: Center,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
    pub layers: Vec<OverlayLayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// A complete plotly figure for one selection.
#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Arc<MarkerTrace>>,
    pub layout: Layout,
}

/// The static part of the map. `figure` copies the layout for every call so
/// the base is never written after construction.
#[derive(Debug)]
pub struct MapView {
    trace: Arc<MarkerTrace>,
    layout: Layout,
}

impl MapView {
    /// `records` must be non-empty; the first record's centroid is the map center.
    pub fn new(map: &MapConfig, access_token: String, records: &[RegionRecord]) -> Self {
        let center = records.first()
            .map(|r| Center { lat: r.lat, lon: r.lon })
            .unwrap_or(Center { lat: 0.0, lon: 0.0 });

        let trace = MarkerTrace {
            lon: records.iter().map(|r| r.lon).collect(),
            lat: records.iter().map(|r| r.lat).collect(),
            mode: "markers",
            marker: Marker { opacity: 0.0 },
            kind: "scattermapbox",
            name: map.title.clone(),
            text: records.iter().map(|r| r.hover.clone()).collect(),
            hoverinfo: "text",
            showlegend: true,
        };

        let layout = Layout {
            title: map.title.clone(),
            autosize: true,
            hovermode: "closest",
            margin: Margin { l: 0, r: 0, b: 0, t: 0 },
            mapbox: Mapbox {
                accesstoken: access_token,
                center,
                zoom: map.zoom,
                bearing: map.bearing,
                pitch: map.pitch,
                layers: Vec::new(),
            },
        };

        Self {
            trace: Arc::new(trace),
            layout,
        }
    }

    pub fn figure(&self, layers: Vec<OverlayLayer>) -> Figure {
        let mut layout = self.layout.clone();
        layout.mapbox.layers = layers;
        Figure {
            data: vec![Arc::clone(&self.trace)],
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index_for, records_with_counts};

    #[test]
    fn test_options_list_categories_then_all() {
        let records = records_with_counts(&[vec![1.0, 0.0, 0.0]]);
        let index = index_for(&["English", "SPANISH", "Tagalog"], &records);

        let options = dropdown_options(&index);
        let pairs: Vec<(&str, &str)> = options.iter()
            .map(|o| (o.label.as_str(), o.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("English", "english"),
                ("Spanish", "spanish"),
                ("Tagalog", "tagalog"),
                ("All", "all"),
            ]
        );
    }

    #[test]
    fn test_base_figure_shape() {
        let records = records_with_counts(&[vec![1.0], vec![2.0]]);
        let view = MapView::new(&MapConfig::default(), "pk.test".into(), &records);

        let figure = view.figure(Vec::new());
        assert_eq!(
            figure.layout.mapbox.center,
            Center { lat: records[0].lat, lon: records[0].lon }
        );

        let json = serde_json::to_value(figure).unwrap();
        let trace = &json["data"][0];
        assert_eq!(trace["type"], "scattermapbox");
        assert_eq!(trace["marker"]["opacity"], 0.0);
        assert_eq!(trace["hoverinfo"], "text");
        assert_eq!(trace["text"].as_array().unwrap().len(), 2);

        let layout = &json["layout"];
        assert_eq!(layout["margin"], serde_json::json!({"l": 0, "r": 0, "b": 0, "t": 0}));
        assert_eq!(layout["hovermode"], "closest");
        assert_eq!(layout["mapbox"]["accesstoken"], "pk.test");
        assert_eq!(layout["mapbox"]["zoom"], 8.0);
        assert_eq!(layout["mapbox"]["bearing"], 0.0);
        assert_eq!(layout["mapbox"]["pitch"], 0.0);
    }

    #[test]
    fn test_figures_do_not_share_layers() {
        let records = records_with_counts(&[vec![1.0, 1.0]]);
        let index = index_for(&["English", "Spanish"], &records);
        let view = MapView::new(&MapConfig::default(), "pk.test".into(), &records);

        let all = view.figure(index.layers_for("all").unwrap());
        let one = view.figure(index.layers_for("spanish").unwrap());
        let again = view.figure(index.layers_for("all").unwrap());

        assert_eq!(all.layout.mapbox.layers.len(), 2);
        assert_eq!(one.layout.mapbox.layers.len(), 1);
        assert_eq!(again.layout.mapbox.layers.len(), 2);
        assert!(Arc::ptr_eq(&all.data[0], &one.data[0]));
    }
}
