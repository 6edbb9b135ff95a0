use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{PickupPoint, Product, Region, RegionCode};
use crate::error::{AppError, AppResult};
use crate::utils::geo::{sort_by_distance, Coordinate};
use crate::AppState;

/// List all regions with their centroids
pub async fn list_regions() -> Json<Vec<Region>> {
    Json(crate::catalog::region::all_regions())
}

#[derive(Debug, Deserialize)]
pub struct PickupPointQuery {
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PickupPointResponse {
    #[serde(flatten)]
    pub point: PickupPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// List pickup points, optionally filtered by region and sorted nearest-first
pub async fn list_pickup_points(
    State(state): State<AppState>,
    Query(query): Query<PickupPointQuery>,
) -> AppResult<Json<Vec<PickupPointResponse>>> {
    let region = query
        .region
        .as_deref()
        .map(str::parse::<RegionCode>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let points: Vec<PickupPoint> = state
        .catalog()
        .pickup_points
        .iter()
        .filter(|p| region.is_none_or(|r| p.region == r))
        .cloned()
        .collect();

    let responses = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => sort_by_distance(points, Coordinate::new(lat, lng), |p| p.location)
            .into_iter()
            .map(|(point, distance)| PickupPointResponse {
                point,
                distance_km: Some(distance),
            })
            .collect(),
        (None, None) => points
            .into_iter()
            .map(|point| PickupPointResponse {
                point,
                distance_km: None,
            })
            .collect(),
        _ => {
            return Err(AppError::BadRequest(
                "lat and lng must be given together".to_string(),
            ));
        }
    };

    Ok(Json(responses))
}

/// List the product catalog
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().products.clone())
}
