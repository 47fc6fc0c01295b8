// src/db/favorecido_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::only_digits, schema::Entity},
    models::favorecido::{Favorecido, FavorecidoPayload},
};

#[derive(Clone)]
pub struct FavorecidoRepository {
    pool: PgPool,
}

impl FavorecidoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Favorecido>, AppError> {
        let sql = format!("{} WHERE user_id = $1 ORDER BY nome ASC", Favorecido::select_sql());
        let favorecidos = sqlx::query_as::<_, Favorecido>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(favorecidos)
    }

    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Favorecido>, AppError> {
        let sql = format!("{} WHERE user_id = $1 AND id = $2", Favorecido::select_sql());
        let favorecido = sqlx::query_as::<_, Favorecido>(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(favorecido)
    }

    /// Chama a função `buscar_favorecidos` (nome, inscrição ou chave PIX).
    pub async fn search(&self, user_id: Uuid, termo: &str) -> Result<Vec<Favorecido>, AppError> {
        let sql = format!(
            "SELECT {} FROM buscar_favorecidos($1, $2)",
            Favorecido::column_list()
        );
        let favorecidos = sqlx::query_as::<_, Favorecido>(&sql)
            .bind(user_id)
            .bind(termo.trim())
            .fetch_all(&self.pool)
            .await?;
        Ok(favorecidos)
    }

    pub async fn create(&self, user_id: Uuid, p: &FavorecidoPayload) -> Result<Favorecido, AppError> {
        let sql = format!(
            r#"INSERT INTO favorecidos (
                   user_id, nome, inscricao, banco, agencia, agencia_dv, conta, conta_dv, tipo_conta,
                   chave_pix, tipo_chave_pix, valor_padrao, email
               )
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               {}"#,
            Favorecido::returning_sql()
        );
        let favorecido = sqlx::query_as::<_, Favorecido>(&sql)
            .bind(user_id)
            .bind(p.nome.trim())
            .bind(only_digits(&p.inscricao))
            .bind(p.banco.trim())
            .bind(p.agencia.as_deref().map(only_digits))
            .bind(&p.agencia_dv)
            .bind(p.conta.as_deref().map(only_digits))
            .bind(&p.conta_dv)
            .bind(p.tipo_conta.trim().to_uppercase())
            .bind(&p.chave_pix)
            .bind(&p.tipo_chave_pix)
            .bind(p.valor_padrao)
            .bind(&p.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(favorecido)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, p: &FavorecidoPayload) -> Result<Option<Favorecido>, AppError> {
        let sql = format!(
            r#"UPDATE favorecidos SET
                   nome = $3, inscricao = $4, banco = $5, agencia = $6, agencia_dv = $7, conta = $8, conta_dv = $9,
                   tipo_conta = $10, chave_pix = $11, tipo_chave_pix = $12, valor_padrao = $13, email = $14,
                   updated_at = NOW()
               WHERE user_id = $1 AND id = $2
               {}"#,
            Favorecido::returning_sql()
        );
        let favorecido = sqlx::query_as::<_, Favorecido>(&sql)
            .bind(user_id)
            .bind(id)
            .bind(p.nome.trim())
            .bind(only_digits(&p.inscricao))
            .bind(p.banco.trim())
            .bind(p.agencia.as_deref().map(only_digits))
            .bind(&p.agencia_dv)
            .bind(p.conta.as_deref().map(only_digits))
            .bind(&p.conta_dv)
            .bind(p.tipo_conta.trim().to_uppercase())
            .bind(&p.chave_pix)
            .bind(&p.tipo_chave_pix)
            .bind(p.valor_padrao)
            .bind(&p.email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(favorecido)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM favorecidos WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
