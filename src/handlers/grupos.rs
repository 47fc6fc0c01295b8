// src/handlers/grupos.rs

use axum::{
    extract::{Path, State},
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
    models::grupo::{Grupo, GrupoMembro, GrupoPayload, MembroDetalhe, MembroPayload, ValorMembroPayload},
};

// GET /api/grupos
#[utoipa::path(
    get,
    path = "/api/grupos",
    tag = "Grupos",
    responses((status = 200, description = "Grupos de pagamento", body = Vec<Grupo>)),
    security(("api_jwt" = []))
)]
pub async fn list_grupos(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let grupos = app_state.grupo_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(grupos))
}

// POST /api/grupos
#[utoipa::path(
    post,
    path = "/api/grupos",
    tag = "Grupos",
    request_body = GrupoPayload,
    responses(
        (status = 201, description = "Grupo criado", body = Grupo),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_grupo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<GrupoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let grupo = app_state.grupo_service
        .create(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(grupo)))
}

// GET /api/grupos/{id}
#[utoipa::path(
    get,
    path = "/api/grupos/{id}",
    tag = "Grupos",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 200, description = "Grupo", body = Grupo),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_grupo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let grupo = app_state.grupo_service
        .get(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(grupo))
}

// PUT /api/grupos/{id}
#[utoipa::path(
    put,
    path = "/api/grupos/{id}",
    tag = "Grupos",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    request_body = GrupoPayload,
    responses(
        (status = 200, description = "Grupo atualizado", body = Grupo),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_grupo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<GrupoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let grupo = app_state.grupo_service
        .update(user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(grupo))
}

// DELETE /api/grupos/{id}
#[utoipa::path(
    delete,
    path = "/api/grupos/{id}",
    tag = "Grupos",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 204, description = "Grupo removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_grupo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.grupo_service
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/grupos/{id}/membros
#[utoipa::path(
    get,
    path = "/api/grupos/{id}/membros",
    tag = "Grupos",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 200, description = "Favorecidos do grupo com o valor de cada um", body = Vec<MembroDetalhe>),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_membros(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let membros = app_state.grupo_service
        .list_members(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(membros))
}

// POST /api/grupos/{id}/membros
#[utoipa::path(
    post,
    path = "/api/grupos/{id}/membros",
    tag = "Grupos",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    request_body = MembroPayload,
    responses(
        (status = 201, description = "Favorecido incluído no grupo", body = GrupoMembro),
        (status = 404, description = "Grupo ou favorecido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_membro(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MembroPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let membro = app_state.grupo_service
        .add_member(user.id, id, payload.favorecido_id, payload.valor)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(membro)))
}

// PUT /api/grupos/{id}/membros/{favorecido_id}
#[utoipa::path(
    put,
    path = "/api/grupos/{id}/membros/{favorecido_id}",
    tag = "Grupos",
    params(
        ("id" = Uuid, Path, description = "ID do grupo"),
        ("favorecido_id" = Uuid, Path, description = "ID do favorecido")
    ),
    request_body = ValorMembroPayload,
    responses(
        (status = 200, description = "Valor do membro atualizado", body = GrupoMembro),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_membro(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, favorecido_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ValorMembroPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let membro = app_state.grupo_service
        .set_member_value(user.id, id, favorecido_id, payload.valor)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(membro))
}

// DELETE /api/grupos/{id}/membros/{favorecido_id}
#[utoipa::path(
    delete,
    path = "/api/grupos/{id}/membros/{favorecido_id}",
    tag = "Grupos",
    params(
        ("id" = Uuid, Path, description = "ID do grupo"),
        ("favorecido_id" = Uuid, Path, description = "ID do favorecido")
    ),
    responses(
        (status = 204, description = "Favorecido retirado do grupo"),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_membro(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, favorecido_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.grupo_service
        .remove_member(user.id, id, favorecido_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
