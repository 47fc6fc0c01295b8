// src/db/envio_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, schema::Entity},
    models::envio::Envio,
};

#[derive(Clone)]
pub struct EnvioRepository {
    pool: PgPool,
}

impl EnvioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        empresa_id: Option<Uuid>,
        destinatario: &str,
        nome_arquivo: &str,
        quantidade: i32,
        valor_total: Decimal,
    ) -> Result<Envio, AppError> {
        let sql = format!(
            r#"INSERT INTO envios (user_id, empresa_id, destinatario, nome_arquivo, quantidade, valor_total)
               VALUES ($1, $2, $3, $4, $5, $6)
               {}"#,
            Envio::returning_sql()
        );
        let envio = sqlx::query_as::<_, Envio>(&sql)
            .bind(user_id)
            .bind(empresa_id)
            .bind(destinatario)
            .bind(nome_arquivo)
            .bind(quantidade)
            .bind(valor_total)
            .fetch_one(&self.pool)
            .await?;
        Ok(envio)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Envio>, AppError> {
        let sql = format!("{} WHERE user_id = $1 ORDER BY created_at DESC LIMIT 100", Envio::select_sql());
        let envios = sqlx::query_as::<_, Envio>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(envios)
    }
}
