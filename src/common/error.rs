// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    services::{cnab::CnabError, importacao::wizard::WizardError},
};

// Erros de domínio. Os handlers convertem para `ApiError` com a mensagem traduzida.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras de negócio que não cabem no `validator` (campo -> código do erro)
    #[error("Campos inválidos: {0:?}")]
    CamposInvalidos(HashMap<String, String>),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Cnab(#[from] CnabError),

    #[error("Falha ao gerar relatório: {0}")]
    RelatorioError(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Resposta de erro enviada ao cliente
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl AppError {
    /// Converte o erro de domínio na resposta HTTP, no idioma da requisição.
    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or(e.code.as_ref());
                            i18n.translate(lang, &format!("field.{}", code))
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: i18n.translate(lang, "error.validation"),
                    details: Some(json!(details)),
                }
            }
            AppError::CamposInvalidos(fields) => {
                let details: HashMap<String, String> = fields
                    .into_iter()
                    .map(|(field, code)| (field, i18n.translate(lang, &format!("field.{}", code))))
                    .collect();
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: i18n.translate(lang, "error.validation"),
                    details: Some(json!(details)),
                }
            }
            AppError::EmailAlreadyExists => {
                ApiError::new(StatusCode::CONFLICT, i18n.translate(lang, "error.email_exists"))
            }
            AppError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, i18n.translate(lang, "error.invalid_credentials"))
            }
            AppError::InvalidToken => {
                ApiError::new(StatusCode::UNAUTHORIZED, i18n.translate(lang, "error.invalid_token"))
            }
            AppError::UserNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, i18n.translate(lang, "error.user_not_found"))
            }
            AppError::NotFound(resource) => {
                let name = i18n.translate(lang, &format!("resource.{}", resource));
                ApiError::new(
                    StatusCode::NOT_FOUND,
                    i18n.translate_with(lang, "error.not_found", &[name.as_str()]),
                )
            }
            AppError::UniqueConstraintViolation(detail) => ApiError {
                status: StatusCode::CONFLICT,
                error: i18n.translate(lang, "error.conflict"),
                details: Some(json!(detail)),
            },
            AppError::Wizard(err) => ApiError {
                status: StatusCode::CONFLICT,
                error: i18n.translate(lang, "error.wizard"),
                details: Some(json!(err.to_string())),
            },
            AppError::Cnab(err) => ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: i18n.translate(lang, "error.cnab"),
                details: Some(json!(err.to_string())),
            },

            // Os demais viram 500. A mensagem detalhada fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, i18n.translate(lang, "error.internal"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn not_found_is_translated_with_resource_name() {
        let store = I18nStore::new();
        let api = AppError::NotFound("empresa").to_api_error(&pt(), &store);
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Empresa não encontrado(a).");
    }

    #[test]
    fn internal_errors_hide_details() {
        let store = I18nStore::new();
        let api = AppError::RelatorioError("fonte ausente".into()).to_api_error(&pt(), &store);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.details.is_none());
        assert!(!api.error.contains("fonte"));
    }

    #[test]
    fn business_field_errors_keep_field_names() {
        let store = I18nStore::new();
        let mut fields = HashMap::new();
        fields.insert("conta".to_string(), "required".to_string());
        let api = AppError::CamposInvalidos(fields).to_api_error(&pt(), &store);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["conta"], "Campo obrigatório.");
    }
}
