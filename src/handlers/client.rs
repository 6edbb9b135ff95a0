use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::pwa::{affordances, Affordances, ClientCapabilities};
use crate::settings::{Preferences, PreferencesUpdate};
use crate::AppState;

const MAX_CLIENT_ID_LEN: usize = 64;

fn check_client_id(client_id: &str) -> AppResult<()> {
    let valid = !client_id.is_empty()
        && client_id.len() <= MAX_CLIENT_ID_LEN
        && client_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(AppError::BadRequest("Invalid client id".to_string()));
    }
    Ok(())
}

pub async fn get_settings(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> AppResult<Json<Preferences>> {
    check_client_id(&client_id)?;
    Ok(Json(state.settings.get(&client_id).await))
}

/// Update some preferences and persist them
pub async fn update_settings(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(payload): Json<PreferencesUpdate>,
) -> AppResult<Json<Preferences>> {
    check_client_id(&client_id)?;
    Ok(Json(state.settings.update(&client_id, payload).await?))
}

#[derive(Debug, Deserialize)]
pub struct AffordancesRequest {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub capabilities: ClientCapabilities,
}

/// Which PWA affordances the client should show
pub async fn pwa_affordances(
    State(state): State<AppState>,
    Json(payload): Json<AffordancesRequest>,
) -> AppResult<Json<Affordances>> {
    let prefs = match payload.client_id.as_deref() {
        Some(id) => {
            check_client_id(id)?;
            state.settings.get(id).await
        }
        None => Preferences::default(),
    };
    Ok(Json(affordances(&payload.capabilities, &prefs)))
}
