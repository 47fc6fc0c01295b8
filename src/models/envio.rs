// src/models/envio.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::schema::Entity;

// Registro de um arquivo enviado por e-mail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envio {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    pub empresa_id: Option<Uuid>,
    #[schema(example = "banco@empresa.com.br")]
    pub destinatario: String,
    #[schema(example = "REM000013.txt")]
    pub nome_arquivo: String,
    pub quantidade: i32,
    pub valor_total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Entity for Envio {
    const TABLE: &'static str = "envios";
    const COLUMNS: &'static [&'static str] = &[
        "id", "user_id", "empresa_id", "destinatario", "nome_arquivo", "quantidade", "valor_total", "created_at",
    ];
}
