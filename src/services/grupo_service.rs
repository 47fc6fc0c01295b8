// src/services/grupo_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::GrupoRepository,
    models::grupo::{Grupo, GrupoMembro, GrupoPayload, MembroDetalhe},
};

#[derive(Clone)]
pub struct GrupoService {
    repo: GrupoRepository,
}

impl GrupoService {
    pub fn new(repo: GrupoRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Grupo>, AppError> {
        self.repo.list(user_id).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Grupo, AppError> {
        self.repo
            .find(user_id, id)
            .await?
            .ok_or(AppError::NotFound("grupo"))
    }

    pub async fn create(&self, user_id: Uuid, payload: &GrupoPayload) -> Result<Grupo, AppError> {
        self.repo.create(user_id, payload).await
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, payload: &GrupoPayload) -> Result<Grupo, AppError> {
        self.repo
            .update(user_id, id, payload)
            .await?
            .ok_or(AppError::NotFound("grupo"))
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.repo.delete(user_id, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("grupo"))
        }
    }

    // =========================================================================
    //  MEMBROS
    // =========================================================================

    pub async fn list_members(&self, user_id: Uuid, grupo_id: Uuid) -> Result<Vec<MembroDetalhe>, AppError> {
        self.get(user_id, grupo_id).await?;
        self.repo.list_members(grupo_id).await
    }

    pub async fn add_member(
        &self,
        user_id: Uuid,
        grupo_id: Uuid,
        favorecido_id: Uuid,
        valor: Option<Decimal>,
    ) -> Result<GrupoMembro, AppError> {
        self.get(user_id, grupo_id).await?;
        self.repo
            .upsert_member(user_id, grupo_id, favorecido_id, valor)
            .await?
            .ok_or(AppError::NotFound("favorecido"))
    }

    pub async fn set_member_value(
        &self,
        user_id: Uuid,
        grupo_id: Uuid,
        favorecido_id: Uuid,
        valor: Option<Decimal>,
    ) -> Result<GrupoMembro, AppError> {
        self.get(user_id, grupo_id).await?;
        self.repo
            .update_member_value(grupo_id, favorecido_id, valor)
            .await?
            .ok_or(AppError::NotFound("membro"))
    }

    pub async fn remove_member(&self, user_id: Uuid, grupo_id: Uuid, favorecido_id: Uuid) -> Result<(), AppError> {
        self.get(user_id, grupo_id).await?;
        if self.repo.remove_member(grupo_id, favorecido_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("membro"))
        }
    }
}
