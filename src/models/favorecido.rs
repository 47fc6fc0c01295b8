// src/models/favorecido.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::schema::Entity,
    models::validators::{
        validate_banco, validate_documento, validate_tipo_conta, validate_valor_positivo,
    },
};

// Beneficiário dos pagamentos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorecido {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub nome: String,
    #[schema(example = "52998224725")]
    pub inscricao: String,

    #[schema(example = "237")]
    pub banco: String,
    #[schema(example = "1234")]
    pub agencia: Option<String>,
    pub agencia_dv: Option<String>,
    #[schema(example = "98765")]
    pub conta: Option<String>,
    #[schema(example = "4")]
    pub conta_dv: Option<String>,
    // "CC" (corrente) ou "PP" (poupança)
    #[schema(example = "CC")]
    pub tipo_conta: String,

    pub chave_pix: Option<String>,
    #[schema(example = "CPF")]
    pub tipo_chave_pix: Option<String>,

    #[schema(example = "1500.00")]
    pub valor_padrao: Option<Decimal>,
    pub email: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Favorecido {
    const TABLE: &'static str = "favorecidos";
    const COLUMNS: &'static [&'static str] = &[
        "id", "user_id", "nome", "inscricao",
        "banco", "agencia", "agencia_dv", "conta", "conta_dv", "tipo_conta",
        "chave_pix", "tipo_chave_pix", "valor_padrao", "email",
        "created_at", "updated_at",
    ];
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavorecidoPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub nome: String,

    #[validate(custom(function = "validate_documento"))]
    #[schema(example = "529.982.247-25")]
    pub inscricao: String,

    #[validate(custom(function = "validate_banco"))]
    #[schema(example = "237")]
    pub banco: String,
    pub agencia: Option<String>,
    pub agencia_dv: Option<String>,
    pub conta: Option<String>,
    pub conta_dv: Option<String>,

    #[serde(default = "default_tipo_conta")]
    #[validate(custom(function = "validate_tipo_conta"))]
    #[schema(example = "CC")]
    pub tipo_conta: String,

    pub chave_pix: Option<String>,
    pub tipo_chave_pix: Option<String>,

    #[validate(custom(function = "validate_valor_positivo"))]
    #[schema(example = "1500.00")]
    pub valor_padrao: Option<Decimal>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
}

fn default_tipo_conta() -> String {
    "CC".to_string()
}
