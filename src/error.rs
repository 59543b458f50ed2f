use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::path::PathBuf;
use thiserror::Error;

/// Problems that stop the process before it starts serving.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no map access token: set map.access_token or MAPBOX_ACCESS_TOKEN")]
    MissingAccessToken,
    #[error("no category columns configured")]
    NoCategories,
    #[error("category {0:?} is configured more than once")]
    DuplicateCategory(String),
    #[error("category {0:?} collides with the \"all\" selection")]
    ReservedCategory(String),
    #[error("column {column:?} not found for region {region:?}")]
    MissingColumn { column: String, region: String },
    #[error("column {column:?} for region {region:?} is not numeric")]
    NonNumericColumn { column: String, region: String },
    #[error("input dataset {0:?} contains no usable regions")]
    EmptyDataset(PathBuf),
    #[error("invalid map setting: {0}")]
    InvalidMap(String),
}

/// A dropdown value that is neither "all" nor a known category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("invalid overlay option {0:?}")]
    Invalid(String),
}

impl IntoResponse for SelectionError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
