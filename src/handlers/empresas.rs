// src/handlers/empresas.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::empresa::{BuscaQuery, Empresa, EmpresaPayload},
};

// GET /api/empresas?q=
#[utoipa::path(
    get,
    path = "/api/empresas",
    tag = "Empresas",
    params(BuscaQuery),
    responses(
        (status = 200, description = "Empresas do usuário (filtradas por razão social ou CNPJ)", body = Vec<Empresa>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_empresas(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(busca): Query<BuscaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let empresas = app_state.empresa_service
        .search(user.id, &busca.q)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(empresas))
}

// POST /api/empresas
#[utoipa::path(
    post,
    path = "/api/empresas",
    tag = "Empresas",
    request_body = EmpresaPayload,
    responses(
        (status = 201, description = "Empresa cadastrada", body = Empresa),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<EmpresaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let empresa = app_state.empresa_service
        .create(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(empresa)))
}

// GET /api/empresas/{id}
#[utoipa::path(
    get,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa", body = Empresa),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let empresa = app_state.empresa_service
        .get(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(empresa))
}

// PUT /api/empresas/{id}
#[utoipa::path(
    put,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = EmpresaPayload,
    responses(
        (status = 200, description = "Empresa atualizada", body = Empresa),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmpresaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let empresa = app_state.empresa_service
        .update(user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Mantém o cache da seleção em dia quando a empresa editada é a selecionada
    let selecao = app_state.selection_hub
        .get(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    if selecao.current().is_some_and(|atual| atual.id == empresa.id) {
        selecao.select(empresa.clone())
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    }

    Ok(Json(empresa))
}

// DELETE /api/empresas/{id}
#[utoipa::path(
    delete,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 204, description = "Empresa removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.empresa_service
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let selecao = app_state.selection_hub
        .get(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    if selecao.current().is_some_and(|atual| atual.id == id) {
        selecao.clear()
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    }

    Ok(StatusCode::NO_CONTENT)
}
