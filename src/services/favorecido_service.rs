// src/services/favorecido_service.rs

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FavorecidoRepository,
    models::favorecido::{Favorecido, FavorecidoPayload},
};

#[derive(Clone)]
pub struct FavorecidoService {
    repo: FavorecidoRepository,
}

fn preenchido(campo: &Option<String>) -> bool {
    campo.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Agência e conta andam juntas: sem as duas o favorecido não entra em arquivo.
fn conferir_dados_bancarios(payload: &FavorecidoPayload) -> Result<(), AppError> {
    let mut erros = HashMap::new();
    match (preenchido(&payload.agencia), preenchido(&payload.conta)) {
        (true, false) => {
            erros.insert("conta".to_string(), "account_required".to_string());
        }
        (false, true) => {
            erros.insert("agencia".to_string(), "agency_required".to_string());
        }
        _ => {}
    }
    if preenchido(&payload.chave_pix) && !preenchido(&payload.tipo_chave_pix) {
        erros.insert("tipoChavePix".to_string(), "pix_type_required".to_string());
    }

    if erros.is_empty() { Ok(()) } else { Err(AppError::CamposInvalidos(erros)) }
}

impl FavorecidoService {
    pub fn new(repo: FavorecidoRepository) -> Self {
        Self { repo }
    }

    /// Termo vazio lista todos.
    pub async fn search(&self, user_id: Uuid, termo: &str) -> Result<Vec<Favorecido>, AppError> {
        if termo.trim().is_empty() {
            return self.repo.list(user_id).await;
        }
        self.repo.search(user_id, termo).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Favorecido, AppError> {
        self.repo
            .find(user_id, id)
            .await?
            .ok_or(AppError::NotFound("favorecido"))
    }

    pub async fn create(&self, user_id: Uuid, payload: &FavorecidoPayload) -> Result<Favorecido, AppError> {
        conferir_dados_bancarios(payload)?;
        self.repo.create(user_id, payload).await
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, payload: &FavorecidoPayload) -> Result<Favorecido, AppError> {
        conferir_dados_bancarios(payload)?;
        self.repo
            .update(user_id, id, payload)
            .await?
            .ok_or(AppError::NotFound("favorecido"))
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.repo.delete(user_id, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("favorecido"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> FavorecidoPayload {
        FavorecidoPayload {
            nome: "Ana".into(),
            inscricao: "52998224725".into(),
            banco: "001".into(),
            agencia: Some("1234".into()),
            agencia_dv: None,
            conta: Some("5678".into()),
            conta_dv: None,
            tipo_conta: "CC".into(),
            chave_pix: None,
            tipo_chave_pix: None,
            valor_padrao: None,
            email: None,
        }
    }

    #[test]
    fn agency_and_account_go_together() {
        assert!(conferir_dados_bancarios(&payload()).is_ok());

        let mut p = payload();
        p.conta = Some("  ".into());
        match conferir_dados_bancarios(&p) {
            Err(AppError::CamposInvalidos(erros)) => {
                assert_eq!(erros.get("conta").map(String::as_str), Some("account_required"))
            }
            outro => panic!("esperava CamposInvalidos, veio {:?}", outro),
        }

        p.agencia = None;
        p.conta = None;
        assert!(conferir_dados_bancarios(&p).is_ok());
    }

    #[test]
    fn pix_key_needs_its_type() {
        let mut p = payload();
        p.chave_pix = Some("ana@exemplo.com".into());
        assert!(matches!(conferir_dados_bancarios(&p), Err(AppError::CamposInvalidos(_))));
        p.tipo_chave_pix = Some("EMAIL".into());
        assert!(conferir_dados_bancarios(&p).is_ok());
    }
}
