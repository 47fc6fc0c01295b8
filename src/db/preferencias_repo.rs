// src/db/preferencias_repo.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::preferencias::{PreferenceKey, Preferencia},
};

// Preferências por usuário: uma linha por chave, a última escrita vence
#[derive(Clone)]
pub struct PreferenciasRepository {
    pool: PgPool,
}

impl PreferenciasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid, key: PreferenceKey) -> Result<Option<Value>, AppError> {
        let value = sqlx::query_scalar::<_, Value>(
            "SELECT value FROM user_preferences WHERE user_id = $1 AND key = $2",
        )
        .bind(user_id)
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    /// Chaves desconhecidas no banco (de versões antigas) são ignoradas.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Preferencia>, AppError> {
        let rows = sqlx::query_as::<_, (String, Value)>(
            "SELECT key, value FROM user_preferences WHERE user_id = $1 ORDER BY key ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(key, value)| key.parse().ok().map(|key| Preferencia { key, value }))
            .collect())
    }

    pub async fn set(&self, user_id: Uuid, key: PreferenceKey, value: &Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove(&self, user_id: Uuid, key: PreferenceKey) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM user_preferences WHERE user_id = $1 AND key = $2")
            .bind(user_id)
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
