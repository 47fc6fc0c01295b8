// src/db/grupo_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, schema::Entity},
    models::{
        favorecido::Favorecido,
        grupo::{Grupo, GrupoMembro, GrupoPayload, MembroDetalhe},
    },
};

#[derive(Clone)]
pub struct GrupoRepository {
    pool: PgPool,
}

impl GrupoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  GRUPOS
    // =========================================================================

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Grupo>, AppError> {
        let sql = format!("{} WHERE user_id = $1 ORDER BY nome ASC", Grupo::select_sql());
        let grupos = sqlx::query_as::<_, Grupo>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(grupos)
    }

    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Grupo>, AppError> {
        let sql = format!("{} WHERE user_id = $1 AND id = $2", Grupo::select_sql());
        let grupo = sqlx::query_as::<_, Grupo>(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(grupo)
    }

    pub async fn create(&self, user_id: Uuid, p: &GrupoPayload) -> Result<Grupo, AppError> {
        let sql = format!(
            "INSERT INTO grupos (user_id, nome, descricao, data_pagamento_padrao) VALUES ($1, $2, $3, $4) {}",
            Grupo::returning_sql()
        );
        let grupo = sqlx::query_as::<_, Grupo>(&sql)
            .bind(user_id)
            .bind(p.nome.trim())
            .bind(&p.descricao)
            .bind(p.data_pagamento_padrao)
            .fetch_one(&self.pool)
            .await?;
        Ok(grupo)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, p: &GrupoPayload) -> Result<Option<Grupo>, AppError> {
        let sql = format!(
            r#"UPDATE grupos SET nome = $3, descricao = $4, data_pagamento_padrao = $5, updated_at = NOW()
               WHERE user_id = $1 AND id = $2
               {}"#,
            Grupo::returning_sql()
        );
        let grupo = sqlx::query_as::<_, Grupo>(&sql)
            .bind(user_id)
            .bind(id)
            .bind(p.nome.trim())
            .bind(&p.descricao)
            .bind(p.data_pagamento_padrao)
            .fetch_optional(&self.pool)
            .await?;
        Ok(grupo)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM grupos WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  MEMBROS
    // =========================================================================

    /// Membros com os dados do favorecido. O grupo já deve ter sido conferido.
    pub async fn list_members(&self, grupo_id: Uuid) -> Result<Vec<MembroDetalhe>, AppError> {
        let sql = format!(
            r#"SELECT {}, m.valor
               FROM grupo_membros m
               JOIN favorecidos f ON f.id = m.favorecido_id
               WHERE m.grupo_id = $1
               ORDER BY f.nome ASC"#,
            Favorecido::qualified_columns("f")
        );
        let membros = sqlx::query_as::<_, MembroDetalhe>(&sql)
            .bind(grupo_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(membros)
    }

    /// Inclui o favorecido (do mesmo usuário) ou atualiza o valor se já for membro.
    pub async fn upsert_member(
        &self,
        user_id: Uuid,
        grupo_id: Uuid,
        favorecido_id: Uuid,
        valor: Option<Decimal>,
    ) -> Result<Option<GrupoMembro>, AppError> {
        let sql = format!(
            r#"INSERT INTO grupo_membros (grupo_id, favorecido_id, valor)
               SELECT $2, f.id, $4
               FROM favorecidos f
               WHERE f.id = $3 AND f.user_id = $1
               ON CONFLICT (grupo_id, favorecido_id) DO UPDATE SET valor = EXCLUDED.valor
               {}"#,
            GrupoMembro::returning_sql()
        );
        let membro = sqlx::query_as::<_, GrupoMembro>(&sql)
            .bind(user_id)
            .bind(grupo_id)
            .bind(favorecido_id)
            .bind(valor)
            .fetch_optional(&self.pool)
            .await?;
        Ok(membro)
    }

    pub async fn update_member_value(
        &self,
        grupo_id: Uuid,
        favorecido_id: Uuid,
        valor: Option<Decimal>,
    ) -> Result<Option<GrupoMembro>, AppError> {
        let sql = format!(
            "UPDATE grupo_membros SET valor = $3 WHERE grupo_id = $1 AND favorecido_id = $2 {}",
            GrupoMembro::returning_sql()
        );
        let membro = sqlx::query_as::<_, GrupoMembro>(&sql)
            .bind(grupo_id)
            .bind(favorecido_id)
            .bind(valor)
            .fetch_optional(&self.pool)
            .await?;
        Ok(membro)
    }

    pub async fn remove_member(&self, grupo_id: Uuid, favorecido_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM grupo_membros WHERE grupo_id = $1 AND favorecido_id = $2")
            .bind(grupo_id)
            .bind(favorecido_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
