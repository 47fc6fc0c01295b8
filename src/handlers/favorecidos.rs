// src/handlers/favorecidos.rs

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
    models::{
        empresa::BuscaQuery,
        favorecido::{Favorecido, FavorecidoPayload},
    },
};

// GET /api/favorecidos?q=
#[utoipa::path(
    get,
    path = "/api/favorecidos",
    tag = "Favorecidos",
    params(BuscaQuery),
    responses(
        (status = 200, description = "Favorecidos (busca por nome, CPF/CNPJ ou chave PIX)", body = Vec<Favorecido>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_favorecidos(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(busca): Query<BuscaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let favorecidos = app_state.favorecido_service
        .search(user.id, &busca.q)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(favorecidos))
}

// POST /api/favorecidos
#[utoipa::path(
    post,
    path = "/api/favorecidos",
    tag = "Favorecidos",
    request_body = FavorecidoPayload,
    responses(
        (status = 201, description = "Favorecido cadastrado", body = Favorecido),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_favorecido(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<FavorecidoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let favorecido = app_state.favorecido_service
        .create(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(favorecido)))
}

// GET /api/favorecidos/{id}
#[utoipa::path(
    get,
    path = "/api/favorecidos/{id}",
    tag = "Favorecidos",
    params(("id" = Uuid, Path, description = "ID do favorecido")),
    responses(
        (status = 200, description = "Favorecido", body = Favorecido),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_favorecido(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let favorecido = app_state.favorecido_service
        .get(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(favorecido))
}

// PUT /api/favorecidos/{id}
#[utoipa::path(
    put,
    path = "/api/favorecidos/{id}",
    tag = "Favorecidos",
    params(("id" = Uuid, Path, description = "ID do favorecido")),
    request_body = FavorecidoPayload,
    responses(
        (status = 200, description = "Favorecido atualizado", body = Favorecido),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_favorecido(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FavorecidoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let favorecido = app_state.favorecido_service
        .update(user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(favorecido))
}

// DELETE /api/favorecidos/{id}
#[utoipa::path(
    delete,
    path = "/api/favorecidos/{id}",
    tag = "Favorecidos",
    params(("id" = Uuid, Path, description = "ID do favorecido")),
    responses(
        (status = 204, description = "Favorecido removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_favorecido(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.favorecido_service
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
