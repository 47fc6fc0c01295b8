// src/handlers/importacoes.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
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
        envio::Envio,
        importacao::{
            ConfiguracaoRemessa, CriarImportacaoPayload, EmailPayload, EventoPayload, ImportacaoView,
            SelecaoPayload,
        },
    },
};

// POST /api/importacoes
#[utoipa::path(
    post,
    path = "/api/importacoes",
    tag = "Importações",
    request_body = CriarImportacaoPayload,
    responses(
        (status = 201, description = "Assistente aberto com as linhas da planilha", body = ImportacaoView),
        (status = 409, description = "Planilha sem linhas")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_importacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CriarImportacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .criar(user.id, &payload.linhas)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(view)))
}

// GET /api/importacoes/{id}
#[utoipa::path(
    get,
    path = "/api/importacoes/{id}",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    responses(
        (status = 200, description = "Estado do assistente", body = ImportacaoView),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_importacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .get(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// PUT /api/importacoes/{id}/linhas
#[utoipa::path(
    put,
    path = "/api/importacoes/{id}/linhas",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    request_body = CriarImportacaoPayload,
    responses(
        (status = 200, description = "Linhas substituídas", body = ImportacaoView),
        (status = 409, description = "Fora da etapa de upload")
    ),
    security(("api_jwt" = []))
)]
pub async fn recarregar_linhas(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CriarImportacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .recarregar(user.id, id, &payload.linhas)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// POST /api/importacoes/{id}/evento
#[utoipa::path(
    post,
    path = "/api/importacoes/{id}/evento",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    request_body = EventoPayload,
    responses(
        (status = 200, description = "Etapa após o evento", body = ImportacaoView),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn disparar_evento(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .evento(user.id, id, payload.evento)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// PUT /api/importacoes/{id}/selecao
#[utoipa::path(
    put,
    path = "/api/importacoes/{id}/selecao",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    request_body = SelecaoPayload,
    responses((status = 200, description = "Seleção de linhas atualizada", body = ImportacaoView)),
    security(("api_jwt" = []))
)]
pub async fn selecionar_linhas(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelecaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .selecionar(user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// POST /api/importacoes/{id}/validar
#[utoipa::path(
    post,
    path = "/api/importacoes/{id}/validar",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    responses(
        (status = 200, description = "Linhas validadas (erros listados por linha)", body = ImportacaoView),
        (status = 409, description = "Nenhuma linha selecionada")
    ),
    security(("api_jwt" = []))
)]
pub async fn validar_linhas(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .validar(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// PUT /api/importacoes/{id}/configuracao
#[utoipa::path(
    put,
    path = "/api/importacoes/{id}/configuracao",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    request_body = ConfiguracaoRemessa,
    responses(
        (status = 200, description = "Empresa, data e ordenação definidas", body = ImportacaoView),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn configurar_remessa(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfiguracaoRemessa>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .configurar(user.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// POST /api/importacoes/{id}/gerar
#[utoipa::path(
    post,
    path = "/api/importacoes/{id}/gerar",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    responses(
        (status = 200, description = "Arquivo CNAB240 gerado", body = ImportacaoView),
        (status = 409, description = "Assistente fora da etapa de geração ou configuração incompleta"),
        (status = 422, description = "Dados inválidos para o layout CNAB")
    ),
    security(("api_jwt" = []))
)]
pub async fn gerar_arquivo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.importacao_service
        .gerar(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// GET /api/importacoes/{id}/arquivo
#[utoipa::path(
    get,
    path = "/api/importacoes/{id}/arquivo",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    responses(
        (status = 200, description = "Arquivo de remessa", content_type = "text/plain"),
        (status = 409, description = "Arquivo ainda não gerado")
    ),
    security(("api_jwt" = []))
)]
pub async fn baixar_arquivo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (nome, conteudo) = app_state.importacao_service
        .arquivo(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(anexo("text/plain; charset=us-ascii", &nome, conteudo.into_bytes()))
}

// GET /api/importacoes/{id}/relatorio
#[utoipa::path(
    get,
    path = "/api/importacoes/{id}/relatorio",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    responses(
        (status = 200, description = "Relatório PDF das linhas selecionadas", content_type = "application/pdf"),
        (status = 409, description = "Nenhuma linha selecionada")
    ),
    security(("api_jwt" = []))
)]
pub async fn baixar_relatorio(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let pdf_bytes = app_state.importacao_service
        .relatorio(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(anexo("application/pdf", &format!("relatorio_{}.pdf", id), pdf_bytes))
}

// POST /api/importacoes/{id}/email
#[utoipa::path(
    post,
    path = "/api/importacoes/{id}/email",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    request_body = EmailPayload,
    responses(
        (status = 201, description = "Arquivo enviado por e-mail", body = Envio),
        (status = 409, description = "Assistente fora da etapa de envio")
    ),
    security(("api_jwt" = []))
)]
pub async fn enviar_email(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmailPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let envio = app_state.importacao_service
        .enviar_email(user.id, id, &payload.destinatario)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(envio)))
}

// DELETE /api/importacoes/{id}
#[utoipa::path(
    delete,
    path = "/api/importacoes/{id}",
    tag = "Importações",
    params(("id" = Uuid, Path, description = "ID da importação")),
    responses(
        (status = 204, description = "Assistente encerrado"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn fechar_importacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.importacao_service
        .fechar(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// Resposta de download com nome de arquivo
pub(crate) fn anexo(content_type: &str, nome: &str, bytes: Vec<u8>) -> axum::response::Response {
    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", nome)),
    ];
    (headers, bytes).into_response()
}
