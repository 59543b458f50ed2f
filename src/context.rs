use crate::config::AppConfig;
use crate::data;
use crate::error::{ConfigError, SelectionError};
use crate::overlay::OverlayIndex;
use crate::processing;
use crate::types::RegionRecord;
use crate::view::{dropdown_options, DropdownOption, Figure, MapView};
use anyhow::Result;
use tracing::{debug, info};

/// Prepared regions and the overlays derived from them.
pub struct Dataset {
    pub records: Vec<RegionRecord>,
    pub overlays: OverlayIndex,
}

impl Dataset {
    pub fn load(config: &AppConfig) -> Result<Self> {
        let raw = data::load_regions(&config.input)?;
        let records = processing::prepare_regions(raw);
        if records.is_empty() {
            return Err(ConfigError::EmptyDataset(config.input.geometry.clone()).into());
        }
        Ok(Self::from_records(&config.input.categories, records, config.colors.seed))
    }

    pub fn from_records(columns: &[String], records: Vec<RegionRecord>, seed: u64) -> Self {
        let overlays = OverlayIndex::build(columns, &records, seed);
        info!(
            regions = records.len(),
            categories = columns.len(),
            "dataset ready"
        );
        Self { records, overlays }
    }
}

/// Everything the selection handler reads. Built once before serving.
pub struct ChoroplethContext {
    pub heading: String,
    pub dataset: Dataset,
    pub options: Vec<DropdownOption>,
    pub view: MapView,
}

impl ChoroplethContext {
    pub fn new(config: &AppConfig, dataset: Dataset, access_token: String) -> Result<Self, ConfigError> {
        if access_token.trim().is_empty() {
            return Err(ConfigError::MissingAccessToken);
        }
        if dataset.records.is_empty() {
            return Err(ConfigError::EmptyDataset(config.input.geometry.clone()));
        }

        let options = dropdown_options(&dataset.overlays);
        let view = MapView::new(&config.map, access_token, &dataset.records);

        Ok(Self {
            heading: config.map.heading.clone(),
            dataset,
            options,
            view,
        })
    }

    pub fn figure_for(&self, overlay_choice: &str) -> Result<Figure, SelectionError> {
        let layers = self.dataset.overlays.layers_for(overlay_choice)?;
        debug!(overlay_choice, layers = layers.len(), "built figure");
        Ok(self.view.figure(layers))
    }
}
