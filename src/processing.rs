use crate::types::{RawRegion, RegionRecord};
use geo::Centroid;
use rayon::prelude::*;
use tracing::{info, warn};

/// Derives centroid, total and hover label for every region, keeping input
/// order. Regions with empty geometry have no centroid and are dropped.
pub fn prepare_regions(raw: Vec<RawRegion>) -> Vec<RegionRecord> {
    info!("Preparing {} regions...", raw.len());

    let records: Vec<RegionRecord> = raw
        .into_par_iter()
        .filter_map(|region| {
            let centroid = match region.geometry.centroid() {
                Some(point) => point,
                None => {
                    warn!(id = %region.id, "region has empty geometry, skipping");
                    return None;
                }
            };

            let total: f64 = region.counts.iter().sum();
            let hover = hover_label(&region.geography, total);

            Some(RegionRecord {
                id: region.id,
                geography: region.geography,
                geometry: region.geometry,
                counts: region.counts,
                total,
                lon: centroid.x(),
                lat: centroid.y(),
                hover,
            })
        })
        .collect();

    info!("Prepared {} regions.", records.len());
    records
}

pub fn hover_label(geography: &str, total: f64) -> String {
    format!("Geography: {}<br /> Num. LEP:{}", geography, format_count(total))
}

/// Whole counts print without a fractional part.
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
