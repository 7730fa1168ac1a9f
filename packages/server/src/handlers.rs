//! HTTP handler functions for the solar map API.

use actix_web::{HttpResponse, web};
use solar_map_heatmap::boundary::{feature_key, shape_name};
use solar_map_heatmap::choropleth::choropleth_collection;
use solar_map_heatmap::normalize::normalize_name;
use solar_map_heatmap_models::LightsMode;
use solar_map_server_models::{
    ApiError, ApiHealth, ApiHeatmap, ApiMapStatus, HeatmapQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/heatmap`
///
/// Returns heat points, glow markers, summary, and bounds.
pub async fn heatmap(
    state: web::Data<AppState>,
    params: web::Query<HeatmapQueryParams>,
) -> HttpResponse {
    let lights = match parse_lights(&params) {
        Ok(lights) => lights,
        Err(resp) => return resp,
    };

    match state.layers().await {
        Ok((map, layers)) => HttpResponse::Ok().json(ApiHeatmap {
            lights,
            points: layers.points().to_vec(),
            markers: layers.markers(lights),
            summary: layers.summary(),
            bounds: map.geometry.bounds().map(|b| b.corners()),
            stats_error: map.stats_error,
        }),
        Err(message) => unavailable(message),
    }
}

/// `GET /api/heatmap/choropleth`
///
/// Returns the boundary layer as `GeoJSON` with style and tooltip
/// properties.
pub async fn choropleth(
    state: web::Data<AppState>,
    params: web::Query<HeatmapQueryParams>,
) -> HttpResponse {
    let lights = match parse_lights(&params) {
        Ok(lights) => lights,
        Err(resp) => return resp,
    };

    match state.layers().await {
        Ok((map, layers)) => {
            HttpResponse::Ok().json(choropleth_collection(&map.geometry, &layers, lights))
        }
        Err(message) => unavailable(message),
    }
}

/// `GET /api/heatmap/tooltip/{name}`
///
/// Looks up the boundary feature whose normalized name matches `name`.
pub async fn tooltip(state: web::Data<AppState>, name: web::Path<String>) -> HttpResponse {
    let key = normalize_name(&name);
    if key.is_empty() {
        return HttpResponse::NotFound().json(ApiError {
            error: format!("No municipality named {name:?}"),
        });
    }

    match state.layers().await {
        Ok((map, layers)) => match map.geometry.find_by_key(&key) {
            Some(feature) => {
                log::debug!(
                    "Tooltip for {:?} (key {:?})",
                    shape_name(feature),
                    feature_key(feature)
                );
                HttpResponse::Ok().json(layers.tooltip_for_feature(feature))
            }
            None => HttpResponse::NotFound().json(ApiError {
                error: format!("No municipality named {name:?}"),
            }),
        },
        Err(message) => unavailable(message),
    }
}

/// `GET /api/heatmap/status`
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(map_status(&state).await)
}

/// `POST /api/heatmap/reload`
///
/// Loads both inputs again and returns the resulting status.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    log::info!("Reloading map inputs on request");
    state.reload().await;
    HttpResponse::Ok().json(map_status(&state).await)
}

async fn map_status(state: &AppState) -> ApiMapStatus {
    match state.layers().await {
        Ok((map, layers)) => ApiMapStatus {
            ready: true,
            boundary_features: map.geometry.len(),
            stats_records: map.stats_records().map_or(0, |r| r.len()),
            municipalities_with_data: layers.municipalities_with_data(),
            error: map.stats_error,
        },
        Err(message) => ApiMapStatus {
            ready: false,
            boundary_features: 0,
            stats_records: 0,
            municipalities_with_data: 0,
            error: Some(message),
        },
    }
}

/// Parses the `lights` query parameter, defaulting to on.
fn parse_lights(params: &HeatmapQueryParams) -> Result<LightsMode, HttpResponse> {
    params.lights.as_deref().map_or(Ok(LightsMode::On), |value| {
        value.parse().map_err(|_| {
            HttpResponse::BadRequest().json(ApiError {
                error: format!("Invalid lights value {value:?}, expected \"on\" or \"off\""),
            })
        })
    })
}

fn unavailable(message: String) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiError { error: message })
}
