// src/handlers/selecao.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::empresa::{SelecaoView, SelecionarEmpresaPayload},
};

// GET /api/selecao
#[utoipa::path(
    get,
    path = "/api/selecao",
    tag = "Seleção",
    responses((status = 200, description = "Empresa selecionada", body = SelecaoView)),
    security(("api_jwt" = []))
)]
pub async fn get_selecao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let selecao = app_state.selection_hub
        .get(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(SelecaoView { empresa: selecao.current() }))
}

// PUT /api/selecao
#[utoipa::path(
    put,
    path = "/api/selecao",
    tag = "Seleção",
    request_body = SelecionarEmpresaPayload,
    responses(
        (status = 200, description = "Empresa selecionada", body = SelecaoView),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn selecionar_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SelecionarEmpresaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let empresa = app_state.empresa_service
        .get(&app_state.db_pool, user.id, payload.empresa_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let selecao = app_state.selection_hub
        .get(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    selecao.select(empresa.clone())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(SelecaoView { empresa: Some(empresa) }))
}

// DELETE /api/selecao
#[utoipa::path(
    delete,
    path = "/api/selecao",
    tag = "Seleção",
    responses((status = 204, description = "Seleção limpa")),
    security(("api_jwt" = []))
)]
pub async fn limpar_selecao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let selecao = app_state.selection_hub
        .get(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    selecao.clear()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/selecao/aguardar
// Long-poll: responde quando a seleção muda ou 204 quando o tempo acaba.
#[utoipa::path(
    get,
    path = "/api/selecao/aguardar",
    tag = "Seleção",
    responses(
        (status = 200, description = "Nova seleção", body = SelecaoView),
        (status = 204, description = "Nenhuma mudança no período")
    ),
    security(("api_jwt" = []))
)]
pub async fn aguardar_selecao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let mudanca = app_state.selection_hub
        .aguardar_mudanca(user.id, app_state.settings.selecao_timeout)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(match mudanca {
        Some(empresa) => Json(SelecaoView { empresa }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
