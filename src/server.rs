use crate::context::ChoroplethContext;
use crate::error::SelectionError;
use crate::overlay::ALL;
use crate::view::{DropdownOption, Figure};
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

pub struct AppState {
    pub context: ChoroplethContext,
}

#[derive(Deserialize)]
pub struct FigureParams {
    overlay_choice: Option<String>,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    heading: String,
    default: &'static str,
    options: Vec<DropdownOption>,
}

pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/options", get(options_handler))
        .route("/api/figure", get(figure_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(context: ChoroplethContext, port: u16, static_dir: &Path) -> Result<()> {
    let state = Arc::new(AppState { context });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting server on http://{}", addr);

    let app = router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn options_handler(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        heading: state.context.heading.clone(),
        default: ALL,
        options: state.context.options.clone(),
    })
}

async fn figure_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FigureParams>,
) -> Result<Json<Figure>, SelectionError> {
    let choice = params.overlay_choice.as_deref().unwrap_or(ALL);
    match state.context.figure_for(choice) {
        Ok(figure) => Ok(Json(figure)),
        Err(err) => {
            warn!("{}", err);
            Err(err)
        }
    }
}
