// src/models/empresa.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::schema::Entity,
    models::validators::{validate_banco, validate_cnpj, validate_digits, validate_uf},
};

// Convenente: a empresa pagadora que emite as remessas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "11222333000181")]
    pub cnpj: String,
    #[schema(example = "Minha Empresa Ltda")]
    pub razao_social: String,

    // Endereço
    #[schema(example = "Av. Paulista")]
    pub logradouro: Option<String>,
    #[schema(example = "1000")]
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    #[schema(example = "São Paulo")]
    pub cidade: Option<String>,
    #[schema(example = "01310100")]
    pub cep: Option<String>,
    #[schema(example = "SP")]
    pub uf: Option<String>,

    // Contato
    pub email: Option<String>,
    pub telefone: Option<String>,

    // Conta de débito
    #[schema(example = "001")]
    pub banco: String,
    #[schema(example = "1234")]
    pub agencia: String,
    pub agencia_dv: Option<String>,
    #[schema(example = "56789")]
    pub conta: String,
    pub conta_dv: Option<String>,
    #[schema(example = "000123456")]
    pub convenio: Option<String>,

    pub chave_pix: Option<String>,
    #[schema(example = "CNPJ")]
    pub tipo_chave_pix: Option<String>,

    // Número sequencial do último arquivo gerado
    #[schema(example = 12)]
    pub nsa: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Empresa {
    const TABLE: &'static str = "empresas";
    const COLUMNS: &'static [&'static str] = &[
        "id", "user_id", "cnpj", "razao_social",
        "logradouro", "numero", "complemento", "bairro", "cidade", "cep", "uf",
        "email", "telefone",
        "banco", "agencia", "agencia_dv", "conta", "conta_dv", "convenio",
        "chave_pix", "tipo_chave_pix", "nsa", "created_at", "updated_at",
    ];
}

// Formulário de criação/edição (a edição substitui todos os campos)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmpresaPayload {
    #[validate(custom(function = "validate_cnpj"))]
    #[schema(example = "11.222.333/0001-81")]
    pub cnpj: String,

    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Minha Empresa Ltda")]
    pub razao_social: String,

    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub cep: Option<String>,
    #[validate(custom(function = "validate_uf"))]
    pub uf: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub telefone: Option<String>,

    #[validate(custom(function = "validate_banco"))]
    #[schema(example = "001")]
    pub banco: String,
    #[validate(custom(function = "validate_digits"))]
    #[schema(example = "1234")]
    pub agencia: String,
    pub agencia_dv: Option<String>,
    #[validate(custom(function = "validate_digits"))]
    #[schema(example = "56789")]
    pub conta: String,
    pub conta_dv: Option<String>,
    pub convenio: Option<String>,

    pub chave_pix: Option<String>,
    #[schema(example = "CNPJ")]
    pub tipo_chave_pix: Option<String>,
}

// ?q= das buscas por texto
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BuscaQuery {
    #[serde(default)]
    #[param(example = "empresa")]
    pub q: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelecionarEmpresaPayload {
    pub empresa_id: Uuid,
}

// Empresa selecionada no momento (None = nenhuma)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SelecaoView {
    pub empresa: Option<Empresa>,
}
