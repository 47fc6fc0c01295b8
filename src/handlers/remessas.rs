// src/handlers/remessas.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::importacoes::anexo,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{envio::Envio, importacao::GerarGrupoPayload},
    services::cnab::ArquivoLido,
};

// POST /api/remessas/grupo
#[utoipa::path(
    post,
    path = "/api/remessas/grupo",
    tag = "Remessas",
    request_body = GerarGrupoPayload,
    responses(
        (status = 200, description = "Arquivo CNAB240 com os membros do grupo", content_type = "text/plain"),
        (status = 400, description = "Grupo sem membros ou sem data de pagamento"),
        (status = 404, description = "Grupo ou empresa não encontrado"),
        (status = 422, description = "Dados inválidos para o layout CNAB")
    ),
    security(("api_jwt" = []))
)]
pub async fn gerar_de_grupo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<GerarGrupoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let arquivo = app_state.remessa_service
        .gerar_de_grupo(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(anexo("text/plain; charset=us-ascii", &arquivo.nome, arquivo.conteudo.into_bytes()))
}

// POST /api/remessas/ler
#[utoipa::path(
    post,
    path = "/api/remessas/ler",
    tag = "Remessas",
    request_body(content = String, content_type = "text/plain", description = "Conteúdo do arquivo CNAB240"),
    responses(
        (status = 200, description = "Arquivo interpretado e conferido", body = ArquivoLido),
        (status = 422, description = "Arquivo fora do layout")
    ),
    security(("api_jwt" = []))
)]
pub async fn ler_remessa(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(_user): AuthenticatedUser,
    conteudo: String,
) -> Result<impl IntoResponse, ApiError> {
    let lido = app_state.remessa_service
        .ler(&conteudo)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(lido))
}

// GET /api/envios
#[utoipa::path(
    get,
    path = "/api/envios",
    tag = "Remessas",
    responses((status = 200, description = "Arquivos enviados por e-mail", body = Vec<Envio>)),
    security(("api_jwt" = []))
)]
pub async fn list_envios(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let envios = app_state.envio_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(envios))
}
