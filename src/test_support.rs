//! Fixtures shared by the unit tests.

use crate::config::AppConfig;
use crate::context::{ChoroplethContext, Dataset};
use crate::overlay::OverlayIndex;
use crate::processing::prepare_regions;
use crate::types::{RawRegion, RegionRecord};
use geo::{polygon, MultiPolygon};

/// One unit square per row, laid out left to right at x = 0, 2, 4, ...
/// Ids are `r0`, `r1`, ...
pub fn records_with_counts(rows: &[Vec<f64>]) -> Vec<RegionRecord> {
    let raw = rows.iter().enumerate().map(|(i, counts)| {
        let x = 2.0 * i as f64;
        RawRegion {
            id: format!("r{}", i),
            geography: format!("Tract {}", i),
            geometry: MultiPolygon::new(vec![polygon![
                (x: x, y: 0.0),
                (x: x + 1.0, y: 0.0),
                (x: x + 1.0, y: 1.0),
                (x: x, y: 1.0),
                (x: x, y: 0.0),
            ]]),
            counts: counts.clone(),
        }
    }).collect();
    prepare_regions(raw)
}

pub fn index_for(columns: &[&str], records: &[RegionRecord]) -> OverlayIndex {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    OverlayIndex::build(&columns, records, 10)
}

pub fn test_config(columns: &[&str]) -> AppConfig {
    let quoted: Vec<String> = columns.iter().map(|c| format!("{:?}", c)).collect();
    let toml = format!(
        "[input]\ngeometry = \"regions.geojson\"\ncategories = [{}]\n",
        quoted.join(", ")
    );
    AppConfig::from_toml(&toml).expect("test config parses")
}

pub fn context_for(columns: &[&str], records: Vec<RegionRecord>) -> ChoroplethContext {
    let config = test_config(columns);
    let dataset = Dataset::from_records(&config.input.categories, records, config.colors.seed);
    ChoroplethContext::new(&config, dataset, "pk.test".into()).expect("test context builds")
}
