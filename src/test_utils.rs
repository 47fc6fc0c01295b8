//! Fixtures compartilhadas pelos testes.
//!
//! Todos os documentos são válidos (CPF 529.982.247-25, CNPJ 11.222.333/0001-81)
//! para que cada teste altere só o campo que quer exercitar.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    models::{empresa::Empresa, favorecido::Favorecido, importacao::RowData},
    services::cnab::{Convenente, Pagamento, Remessa},
};

pub const CPF: &str = "52998224725";
pub const CNPJ: &str = "11222333000181";

/// Favorecido com conta preenchida em agência 1234 / conta 5678.
pub fn favorecido(nome: &str, banco: &str, tipo_conta: &str, valor_padrao: Option<Decimal>) -> Favorecido {
    let agora = Utc::now();
    Favorecido {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        nome: nome.to_string(),
        inscricao: CPF.to_string(),
        banco: banco.to_string(),
        agencia: Some("1234".to_string()),
        agencia_dv: None,
        conta: Some("5678".to_string()),
        conta_dv: Some("9".to_string()),
        tipo_conta: tipo_conta.to_string(),
        chave_pix: None,
        tipo_chave_pix: None,
        valor_padrao,
        email: None,
        created_at: agora,
        updated_at: agora,
    }
}

/// Empresa do Banco do Brasil com NSA zerado.
pub fn empresa(razao_social: &str) -> Empresa {
    let agora = Utc::now();
    Empresa {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        cnpj: CNPJ.to_string(),
        razao_social: razao_social.to_string(),
        logradouro: Some("Av. Paulista".to_string()),
        numero: Some("1000".to_string()),
        complemento: None,
        bairro: Some("Bela Vista".to_string()),
        cidade: Some("São Paulo".to_string()),
        cep: Some("01310100".to_string()),
        uf: Some("SP".to_string()),
        email: None,
        telefone: None,
        banco: "001".to_string(),
        agencia: "1234".to_string(),
        agencia_dv: Some("5".to_string()),
        conta: "56789".to_string(),
        conta_dv: Some("0".to_string()),
        convenio: Some("000123456".to_string()),
        chave_pix: None,
        tipo_chave_pix: None,
        nsa: 0,
        created_at: agora,
        updated_at: agora,
    }
}

/// Linha de planilha selecionada, conta corrente.
pub fn row(id: u32, nome: &str, banco: &str, valor: &str) -> RowData {
    RowData {
        id,
        nome: nome.to_string(),
        inscricao: CPF.to_string(),
        banco: banco.to_string(),
        agencia: "1234".to_string(),
        conta: "5678-9".to_string(),
        tipo: "CC".to_string(),
        valor: valor.to_string(),
        selecionado: true,
    }
}

/// Pagamento pronto para o CNAB; `valor` no formato "1234.56".
pub fn pagamento(nome: &str, banco: &str, tipo: &str, valor: &str) -> Pagamento {
    Pagamento {
        nome: nome.to_string(),
        inscricao: CPF.to_string(),
        banco: banco.to_string(),
        agencia: "1234".to_string(),
        agencia_dv: "5".to_string(),
        conta: "5678".to_string(),
        conta_dv: "9".to_string(),
        tipo: tipo.to_string(),
        valor: Decimal::from_str(valor).unwrap(),
    }
}

/// Remessa de NSA 7 gerada em 01/03/2024 09:30 para pagamento em 05/03/2024.
pub fn remessa(pagamentos: Vec<Pagamento>) -> Remessa {
    let convenente = Convenente::from(&empresa("Minha Empresa Ltda"));
    Remessa {
        convenente,
        nsa: 7,
        data_pagamento: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        gerado_em: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 30, 0).unwrap(),
        pagamentos,
    }
}
