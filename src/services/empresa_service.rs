// src/services/empresa_service.rs

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EmpresaRepository,
    models::empresa::{Empresa, EmpresaPayload},
};

#[derive(Clone)]
pub struct EmpresaService {
    repo: EmpresaRepository,
}

impl EmpresaService {
    pub fn new(repo: EmpresaRepository) -> Self {
        Self { repo }
    }

    /// Termo vazio lista todos.
    pub async fn search(&self, user_id: Uuid, termo: &str) -> Result<Vec<Empresa>, AppError> {
        if termo.trim().is_empty() {
            return self.repo.list(user_id).await;
        }
        self.repo.search(user_id, termo).await
    }

    pub async fn get<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<Empresa, AppError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        self.repo
            .find(executor, user_id, id)
            .await?
            .ok_or(AppError::NotFound("empresa"))
    }

    pub async fn create(&self, user_id: Uuid, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        let empresa = self.repo.create(user_id, payload).await?;
        tracing::info!("Empresa {} cadastrada", empresa.id);
        Ok(empresa)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        self.repo
            .update(user_id, id, payload)
            .await?
            .ok_or(AppError::NotFound("empresa"))
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.repo.delete(user_id, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("empresa"))
        }
    }

    /// Reserva o próximo NSA dentro da transação do chamador.
    pub async fn reservar_nsa(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Empresa, AppError> {
        self.repo
            .increment_nsa(&mut **tx, user_id, id)
            .await?
            .ok_or(AppError::NotFound("empresa"))
    }
}
