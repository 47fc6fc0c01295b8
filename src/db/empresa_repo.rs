// src/db/empresa_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::only_digits, schema::Entity},
    models::empresa::{Empresa, EmpresaPayload},
};

#[derive(Clone)]
pub struct EmpresaRepository {
    pool: PgPool,
}

fn map_unique(e: sqlx::Error, cnpj: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(format!("CNPJ '{}' já cadastrado.", cnpj));
        }
    }
    e.into()
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Empresa>, AppError> {
        let sql = format!("{} WHERE user_id = $1 ORDER BY razao_social ASC", Empresa::select_sql());
        let empresas = sqlx::query_as::<_, Empresa>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(empresas)
    }

    pub async fn find<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<Option<Empresa>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE user_id = $1 AND id = $2", Empresa::select_sql());
        let empresa = sqlx::query_as::<_, Empresa>(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(empresa)
    }

    /// Busca por razão social ou pelos dígitos do CNPJ.
    pub async fn search(&self, user_id: Uuid, termo: &str) -> Result<Vec<Empresa>, AppError> {
        let sql = format!(
            r#"{} WHERE user_id = $1
               AND (razao_social ILIKE '%' || $2 || '%' OR ($3 <> '' AND cnpj LIKE '%' || $3 || '%'))
               ORDER BY razao_social ASC
               LIMIT 50"#,
            Empresa::select_sql()
        );
        let empresas = sqlx::query_as::<_, Empresa>(&sql)
            .bind(user_id)
            .bind(termo.trim())
            .bind(only_digits(termo))
            .fetch_all(&self.pool)
            .await?;
        Ok(empresas)
    }

    pub async fn create(&self, user_id: Uuid, p: &EmpresaPayload) -> Result<Empresa, AppError> {
        let cnpj = only_digits(&p.cnpj);
        let sql = format!(
            r#"INSERT INTO empresas (
                   user_id, cnpj, razao_social,
                   logradouro, numero, complemento, bairro, cidade, cep, uf,
                   email, telefone,
                   banco, agencia, agencia_dv, conta, conta_dv, convenio,
                   chave_pix, tipo_chave_pix
               )
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
               {}"#,
            Empresa::returning_sql()
        );
        let empresa = sqlx::query_as::<_, Empresa>(&sql)
            .bind(user_id)
            .bind(&cnpj)
            .bind(p.razao_social.trim())
            .bind(&p.logradouro)
            .bind(&p.numero)
            .bind(&p.complemento)
            .bind(&p.bairro)
            .bind(&p.cidade)
            .bind(p.cep.as_deref().map(only_digits))
            .bind(p.uf.as_deref().map(|uf| uf.trim().to_uppercase()))
            .bind(&p.email)
            .bind(&p.telefone)
            .bind(p.banco.trim())
            .bind(only_digits(&p.agencia))
            .bind(&p.agencia_dv)
            .bind(only_digits(&p.conta))
            .bind(&p.conta_dv)
            .bind(&p.convenio)
            .bind(&p.chave_pix)
            .bind(&p.tipo_chave_pix)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique(e, &cnpj))?;
        Ok(empresa)
    }

    /// Substitui os dados cadastrais. O NSA não é alterado por aqui.
    pub async fn update(&self, user_id: Uuid, id: Uuid, p: &EmpresaPayload) -> Result<Option<Empresa>, AppError> {
        let cnpj = only_digits(&p.cnpj);
        let sql = format!(
            r#"UPDATE empresas SET
                   cnpj = $3, razao_social = $4,
                   logradouro = $5, numero = $6, complemento = $7, bairro = $8, cidade = $9, cep = $10, uf = $11,
                   email = $12, telefone = $13,
                   banco = $14, agencia = $15, agencia_dv = $16, conta = $17, conta_dv = $18, convenio = $19,
                   chave_pix = $20, tipo_chave_pix = $21,
                   updated_at = NOW()
               WHERE user_id = $1 AND id = $2
               {}"#,
            Empresa::returning_sql()
        );
        let empresa = sqlx::query_as::<_, Empresa>(&sql)
            .bind(user_id)
            .bind(id)
            .bind(&cnpj)
            .bind(p.razao_social.trim())
            .bind(&p.logradouro)
            .bind(&p.numero)
            .bind(&p.complemento)
            .bind(&p.bairro)
            .bind(&p.cidade)
            .bind(p.cep.as_deref().map(only_digits))
            .bind(p.uf.as_deref().map(|uf| uf.trim().to_uppercase()))
            .bind(&p.email)
            .bind(&p.telefone)
            .bind(p.banco.trim())
            .bind(only_digits(&p.agencia))
            .bind(&p.agencia_dv)
            .bind(only_digits(&p.conta))
            .bind(&p.conta_dv)
            .bind(&p.convenio)
            .bind(&p.chave_pix)
            .bind(&p.tipo_chave_pix)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique(e, &cnpj))?;
        Ok(empresa)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM empresas WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Incrementa o NSA e devolve a empresa já com o novo número.
    pub async fn increment_nsa<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<Option<Empresa>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE empresas SET nsa = nsa + 1, updated_at = NOW() WHERE user_id = $1 AND id = $2 {}",
            Empresa::returning_sql()
        );
        let empresa = sqlx::query_as::<_, Empresa>(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(empresa)
    }
}
