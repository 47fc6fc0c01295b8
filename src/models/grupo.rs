// src/models/grupo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::schema::Entity,
    models::{favorecido::Favorecido, validators::validate_valor_positivo},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Grupo {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "Folha de pagamento")]
    pub nome: String,
    pub descricao: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-05")]
    pub data_pagamento_padrao: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Grupo {
    const TABLE: &'static str = "grupos";
    const COLUMNS: &'static [&'static str] = &[
        "id", "user_id", "nome", "descricao", "data_pagamento_padrao", "created_at", "updated_at",
    ];
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrupoPayload {
    #[validate(length(min = 1, max = 80, message = "required"))]
    #[schema(example = "Folha de pagamento")]
    pub nome: String,
    pub descricao: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-05")]
    pub data_pagamento_padrao: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrupoMembro {
    pub grupo_id: Uuid,
    pub favorecido_id: Uuid,
    // Valor específico deste favorecido no grupo (sobrepõe o valor padrão)
    #[schema(example = "250.00")]
    pub valor: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Entity for GrupoMembro {
    const TABLE: &'static str = "grupo_membros";
    const COLUMNS: &'static [&'static str] = &["grupo_id", "favorecido_id", "valor", "created_at"];
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembroPayload {
    pub favorecido_id: Uuid,
    #[validate(custom(function = "validate_valor_positivo"))]
    #[schema(example = "250.00")]
    pub valor: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValorMembroPayload {
    #[validate(custom(function = "validate_valor_positivo"))]
    pub valor: Option<Decimal>,
}

// Favorecido do grupo, com o valor que será pago
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembroDetalhe {
    #[sqlx(flatten)]
    pub favorecido: Favorecido,
    pub valor: Option<Decimal>,
}

impl MembroDetalhe {
    /// Valor do membro, senão o valor padrão do favorecido, senão zero.
    pub fn valor_efetivo(&self) -> Decimal {
        self.valor
            .or(self.favorecido.valor_padrao)
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::favorecido;

    #[test]
    fn effective_amount_prefers_override_then_default() {
        let mut fav = favorecido("Ana", "001", "CC", Some(Decimal::new(10000, 2)));
        let membro = MembroDetalhe { favorecido: fav.clone(), valor: Some(Decimal::new(5000, 2)) };
        assert_eq!(membro.valor_efetivo(), Decimal::new(5000, 2));

        let membro = MembroDetalhe { favorecido: fav.clone(), valor: None };
        assert_eq!(membro.valor_efetivo(), Decimal::new(10000, 2));

        fav.valor_padrao = None;
        let membro = MembroDetalhe { favorecido: fav, valor: None };
        assert_eq!(membro.valor_efetivo(), Decimal::ZERO);
    }
}
