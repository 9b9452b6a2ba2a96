use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use choropleth_shared::svg::render_svg;
use choropleth_shared::{OutlineState, PaletteKind, RenderState};
use serde::Deserialize;

use crate::state::AppState;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (counties, classified) = state.map.as_ref().map_or((0, 0), |map| {
        (map.scene().counties.len(), map.classified_count())
    });
    Json(serde_json::json!({
        "status": "ok",
        "map_loaded": state.map.is_some(),
        "counties": counties,
        "classified": classified,
        "error": state.load_error.as_deref(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    palette: Option<String>,
    outlines: Option<String>,
}

impl SnapshotQuery {
    fn render_state(&self) -> Result<RenderState, String> {
        let defaults = RenderState::default();
        Ok(RenderState {
            palette: match &self.palette {
                Some(raw) => raw.parse::<PaletteKind>()?,
                None => defaults.palette,
            },
            outlines: match &self.outlines {
                Some(raw) => raw.parse::<OutlineState>()?,
                None => defaults.outlines,
            },
        })
    }
}

/// Server-rendered SVG of the map in the requested palette/outline state.
pub async fn snapshot_svg(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Response {
    let target = match query.render_state() {
        Ok(target) => target,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };
    let Some(map) = state.map.as_ref() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "map data not loaded").into_response();
    };

    let svg = if map.render_state() == target {
        render_svg(map.scene())
    } else {
        let styled = map.as_ref().clone().with_state(target);
        render_svg(styled.scene())
    };
    (
        [
            (header::CONTENT_TYPE, SVG_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        svg,
    )
        .into_response()
}
