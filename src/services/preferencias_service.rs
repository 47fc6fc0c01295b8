// src/services/preferencias_service.rs

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PreferenciasRepository,
    models::preferencias::{PreferenceKey, Preferencia},
};

#[derive(Clone)]
pub struct PreferenciasService {
    repo: PreferenciasRepository,
}

/// A empresa selecionada tem rota e ciclo de vida próprios (`SelectionHub`).
fn chave_editavel(key: PreferenceKey) -> Result<PreferenceKey, AppError> {
    if key == PreferenceKey::EmpresaSelecionada {
        let mut erros = HashMap::new();
        erros.insert("key".to_string(), "invalid_key".to_string());
        return Err(AppError::CamposInvalidos(erros));
    }
    Ok(key)
}

impl PreferenciasService {
    pub fn new(repo: PreferenciasRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Preferencia>, AppError> {
        self.repo.list(user_id).await
    }

    pub async fn get(&self, user_id: Uuid, key: PreferenceKey) -> Result<Preferencia, AppError> {
        let value = self
            .repo
            .get(user_id, key)
            .await?
            .ok_or(AppError::NotFound("preferencia"))?;
        Ok(Preferencia { key, value })
    }

    pub async fn set(&self, user_id: Uuid, key: PreferenceKey, value: Value) -> Result<Preferencia, AppError> {
        let key = chave_editavel(key)?;
        self.repo.set(user_id, key, &value).await?;
        Ok(Preferencia { key, value })
    }

    pub async fn remove(&self, user_id: Uuid, key: PreferenceKey) -> Result<(), AppError> {
        let key = chave_editavel(key)?;
        self.repo.remove(user_id, key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_company_is_not_a_plain_preference() {
        assert!(chave_editavel(PreferenceKey::UltimoModal).is_ok());
        assert!(matches!(
            chave_editavel(PreferenceKey::EmpresaSelecionada),
            Err(AppError::CamposInvalidos(_))
        ));
    }
}
