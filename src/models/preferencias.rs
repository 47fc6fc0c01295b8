// src/models/preferencias.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// Chaves das preferências guardadas por usuário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    // Cópia da empresa selecionada (cache; a fonte da verdade é a tabela empresas)
    EmpresaSelecionada,
    // Configurações de exibição da empresa (colunas visíveis, formato de valores...)
    ExibicaoEmpresa,
    // Último modal aberto na interface
    UltimoModal,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::EmpresaSelecionada => "empresa_selecionada",
            PreferenceKey::ExibicaoEmpresa => "exibicao_empresa",
            PreferenceKey::UltimoModal => "ultimo_modal",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empresa_selecionada" => Ok(PreferenceKey::EmpresaSelecionada),
            "exibicao_empresa" => Ok(PreferenceKey::ExibicaoEmpresa),
            "ultimo_modal" => Ok(PreferenceKey::UltimoModal),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Preferencia {
    pub key: PreferenceKey,
    #[schema(value_type = Object, example = json!({"mostrarSaldo": true}))]
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PreferenciaPayload {
    #[schema(value_type = Object, example = json!({"modal": "novo-favorecido"}))]
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_their_names() {
        for key in [
            PreferenceKey::EmpresaSelecionada,
            PreferenceKey::ExibicaoEmpresa,
            PreferenceKey::UltimoModal,
        ] {
            assert_eq!(key.as_str().parse::<PreferenceKey>(), Ok(key));
        }
        assert!("outra".parse::<PreferenceKey>().is_err());
    }
}
