// src/handlers/preferencias.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::preferencias::{PreferenceKey, Preferencia, PreferenciaPayload},
};

// GET /api/preferencias
#[utoipa::path(
    get,
    path = "/api/preferencias",
    tag = "Preferências",
    responses((status = 200, description = "Preferências do usuário", body = Vec<Preferencia>)),
    security(("api_jwt" = []))
)]
pub async fn list_preferencias(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let preferencias = app_state.preferencias_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(preferencias))
}

// GET /api/preferencias/{key}
#[utoipa::path(
    get,
    path = "/api/preferencias/{key}",
    tag = "Preferências",
    params(("key" = PreferenceKey, Path, description = "Chave da preferência")),
    responses(
        (status = 200, description = "Preferência", body = Preferencia),
        (status = 404, description = "Não definida")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_preferencia(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(key): Path<PreferenceKey>,
) -> Result<impl IntoResponse, ApiError> {
    let preferencia = app_state.preferencias_service
        .get(user.id, key)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(preferencia))
}

// PUT /api/preferencias/{key}
#[utoipa::path(
    put,
    path = "/api/preferencias/{key}",
    tag = "Preferências",
    params(("key" = PreferenceKey, Path, description = "Chave da preferência")),
    request_body = PreferenciaPayload,
    responses(
        (status = 200, description = "Preferência gravada", body = Preferencia),
        (status = 400, description = "Chave reservada")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_preferencia(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(key): Path<PreferenceKey>,
    Json(payload): Json<PreferenciaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let preferencia = app_state.preferencias_service
        .set(user.id, key, payload.value)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(preferencia))
}

// DELETE /api/preferencias/{key}
#[utoipa::path(
    delete,
    path = "/api/preferencias/{key}",
    tag = "Preferências",
    params(("key" = PreferenceKey, Path, description = "Chave da preferência")),
    responses((status = 204, description = "Preferência removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_preferencia(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(key): Path<PreferenceKey>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.preferencias_service
        .remove(user.id, key)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
