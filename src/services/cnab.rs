// src/services/cnab.rs
//
// Montagem e leitura de arquivos de remessa CNAB240 (FEBRABAN), pagamento a fornecedores.

pub mod escrita;
pub mod leitura;
pub mod registro;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    common::format::{only_digits, split_dv},
    models::{empresa::Empresa, grupo::MembroDetalhe, importacao::RowData},
    services::importacao::ordenacao::Pagavel,
};

pub use escrita::{gerar_arquivo, ArquivoCnab};
pub use leitura::{ler_arquivo, ArquivoLido};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CnabError {
    #[error("campo '{campo}' com {tamanho} posições não comporta o valor '{valor}'")]
    CampoExcedido {
        campo: &'static str,
        tamanho: usize,
        valor: String,
    },

    #[error("{registro} com {tamanho} posições (esperado 240)")]
    TamanhoRegistro { registro: String, tamanho: usize },

    #[error("linha {linha}: {motivo}")]
    Leitura { linha: usize, motivo: String },

    #[error("a remessa não possui pagamentos")]
    SemPagamentos,

    #[error("pagamento de '{nome}' sem {campo}")]
    DadoAusente { nome: String, campo: &'static str },

    #[error("valor do pagamento de '{nome}' deve ser maior que zero")]
    ValorInvalido { nome: String },
}

// Dados da empresa pagadora usados nos headers
#[derive(Debug, Clone, PartialEq)]
pub struct Convenente {
    pub banco: String,
    pub cnpj: String,
    pub nome: String,
    pub convenio: String,
    pub agencia: String,
    pub agencia_dv: String,
    pub conta: String,
    pub conta_dv: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: String,
    pub cidade: String,
    pub cep: String,
    pub uf: String,
}

impl From<&Empresa> for Convenente {
    fn from(empresa: &Empresa) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            banco: empresa.banco.clone(),
            cnpj: only_digits(&empresa.cnpj),
            nome: empresa.razao_social.clone(),
            convenio: text(&empresa.convenio),
            agencia: empresa.agencia.clone(),
            agencia_dv: text(&empresa.agencia_dv),
            conta: empresa.conta.clone(),
            conta_dv: text(&empresa.conta_dv),
            logradouro: text(&empresa.logradouro),
            numero: text(&empresa.numero),
            complemento: text(&empresa.complemento),
            cidade: text(&empresa.cidade),
            cep: text(&empresa.cep),
            uf: text(&empresa.uf),
        }
    }
}

// Um crédito para um favorecido
#[derive(Debug, Clone, PartialEq)]
pub struct Pagamento {
    pub nome: String,
    pub inscricao: String,
    pub banco: String,
    pub agencia: String,
    pub agencia_dv: String,
    pub conta: String,
    pub conta_dv: String,
    // "CC", "PP" ou o que veio da planilha
    pub tipo: String,
    pub valor: Decimal,
}

impl Pagavel for Pagamento {
    fn nome(&self) -> &str {
        &self.nome
    }
    fn banco(&self) -> &str {
        &self.banco
    }
    fn tipo(&self) -> &str {
        &self.tipo
    }
    fn valor(&self) -> Decimal {
        self.valor
    }
}

impl Pagamento {
    /// Converte a linha importada. Agência e conta podem vir com o dígito ("1234-5").
    pub fn from_row(row: &RowData) -> Self {
        let (agencia, agencia_dv) = split_dv(&row.agencia);
        let (conta, conta_dv) = split_dv(&row.conta);
        Self {
            nome: row.nome.trim().to_string(),
            inscricao: only_digits(&row.inscricao),
            banco: row.banco.trim().to_string(),
            agencia,
            agencia_dv: agencia_dv.unwrap_or_default(),
            conta,
            conta_dv: conta_dv.unwrap_or_default(),
            tipo: row.tipo.trim().to_uppercase(),
            valor: row.valor(),
        }
    }

    pub fn from_membro(membro: &MembroDetalhe) -> Self {
        let f = &membro.favorecido;
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
        Self {
            nome: f.nome.trim().to_string(),
            inscricao: only_digits(&f.inscricao),
            banco: f.banco.trim().to_string(),
            agencia: only_digits(&text(&f.agencia)),
            agencia_dv: text(&f.agencia_dv).to_uppercase(),
            conta: only_digits(&text(&f.conta)),
            conta_dv: text(&f.conta_dv).to_uppercase(),
            tipo: f.tipo_conta.trim().to_uppercase(),
            valor: membro.valor_efetivo(),
        }
    }
}

// Tudo o que é preciso para montar um arquivo
#[derive(Debug, Clone)]
pub struct Remessa {
    // Favorecidos do mesmo banco do convenente recebem crédito em conta, os demais TED
    pub convenente: Convenente,
    pub nsa: u32,
    pub data_pagamento: NaiveDate,
    pub gerado_em: NaiveDateTime,
    // Já na ordem desejada dentro de cada lote
    pub pagamentos: Vec<Pagamento>,
}

/// Nome do banco no header de arquivo.
pub fn nome_banco(codigo: &str) -> &'static str {
    match only_digits(codigo).trim_start_matches('0') {
        "1" => "BANCO DO BRASIL S.A.",
        "33" => "BANCO SANTANDER",
        "104" => "CAIXA ECONOMICA FEDERAL",
        "237" => "BANCO BRADESCO S.A.",
        "341" => "BANCO ITAU S.A.",
        "748" => "BANCO SICREDI",
        "756" => "BANCOOB",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_conversion_splits_check_digits() {
        let row = RowData {
            id: 1,
            nome: " Maria ".into(),
            inscricao: "529.982.247-25".into(),
            banco: "1".into(),
            agencia: "1234-5".into(),
            conta: "98765-x".into(),
            tipo: "pp".into(),
            valor: "1.234,56".into(),
            selecionado: true,
        };
        let p = Pagamento::from_row(&row);
        assert_eq!(p.nome, "Maria");
        assert_eq!(p.inscricao, "52998224725");
        assert_eq!((p.agencia.as_str(), p.agencia_dv.as_str()), ("1234", "5"));
        assert_eq!((p.conta.as_str(), p.conta_dv.as_str()), ("98765", "X"));
        assert_eq!(p.tipo, "PP");
        assert_eq!(p.valor, Decimal::new(123456, 2));
    }

    #[test]
    fn member_conversion_uses_effective_amount() {
        let mut fav = crate::test_utils::favorecido("Ana", "237", "pp", Some(Decimal::new(1000, 2)));
        fav.conta_dv = Some("x".into());
        let p = Pagamento::from_membro(&MembroDetalhe { favorecido: fav, valor: None });
        assert_eq!(p.valor, Decimal::new(1000, 2));
        assert_eq!(p.tipo, "PP");
        assert_eq!(p.conta_dv, "X");
    }

    #[test]
    fn bank_names_ignore_leading_zeros() {
        assert_eq!(nome_banco("001"), "BANCO DO BRASIL S.A.");
        assert_eq!(nome_banco("1"), "BANCO DO BRASIL S.A.");
        assert_eq!(nome_banco("999"), "");
    }
}
