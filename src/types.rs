use geo::MultiPolygon;

/// A polygon row as read from the input dataset.
#[derive(Debug, Clone)]
pub struct RawRegion {
    pub id: String,
    pub geography: String,
    pub geometry: MultiPolygon<f64>,
    // One value per configured category column, in config order
    pub counts: Vec<f64>,
}

/// A region with its derived centroid, total and hover label.
#[derive(Debug, Clone)]
pub struct RegionRecord {
    pub id: String,
    pub geography: String,
    pub geometry: MultiPolygon<f64>,
    pub counts: Vec<f64>,
    pub total: f64,
    pub lon: f64,
    pub lat: f64,
    pub hover: String,
}
