// src/models/importacao.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::services::importacao::wizard::{WizardEvent, WizardStep};

// Linha da planilha, já com os cabeçalhos normalizados
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RowData {
    // Posição da linha na planilha (1 = primeira linha de dados)
    #[schema(example = 1)]
    pub id: u32,
    #[serde(rename = "NOME")]
    #[schema(example = "Maria da Silva")]
    pub nome: String,
    #[serde(rename = "INSCRICAO")]
    #[schema(example = "529.982.247-25")]
    pub inscricao: String,
    #[serde(rename = "BANCO")]
    #[schema(example = "001")]
    pub banco: String,
    #[serde(rename = "AGENCIA")]
    #[schema(example = "1234-5")]
    pub agencia: String,
    #[serde(rename = "CONTA")]
    #[schema(example = "98765-4")]
    pub conta: String,
    #[serde(rename = "TIPO")]
    #[schema(example = "CC")]
    pub tipo: String,
    #[serde(rename = "VALOR")]
    #[schema(example = "1.234,56")]
    pub valor: String,
    #[schema(example = true)]
    pub selecionado: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CampoErro {
    #[schema(example = "VALOR")]
    pub campo: String,
    #[schema(example = "VALOR inválido")]
    pub mensagem: String,
}

// Linha reprovada na validação, com uma mensagem por campo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRecord {
    pub linha: RowData,
    pub erros: Vec<CampoErro>,
}

// Critério de ordenação dos favorecidos no arquivo e no relatório
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ordenacao {
    #[default]
    Nome,
    BancoNome,
    BancoValor,
    Valor,
}

// Trilho de pagamento, que define o lote do arquivo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trilho {
    // Crédito em conta corrente no mesmo banco
    ContaCorrente,
    // Crédito em poupança no mesmo banco
    Poupanca,
    // TED para outros bancos
    Ted,
}

// --- Payloads do assistente de importação ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CriarImportacaoPayload {
    // Linhas como vieram da planilha (cabeçalho -> célula)
    #[schema(value_type = Vec<Object>, example = json!([{"Nome": "Maria", "CPF": "52998224725", "Banco": "1", "Agência": "1234", "Conta": "98765-4", "Tipo": "CC", "Valor": "1.234,56"}]))]
    pub linhas: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EventoPayload {
    pub evento: WizardEvent,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelecaoPayload {
    // Ids das linhas a marcar/desmarcar
    pub ids: Vec<u32>,
    pub selecionado: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguracaoRemessa {
    pub empresa_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-05")]
    pub data_pagamento: Option<NaiveDate>,
    #[serde(default)]
    pub ordenacao: Ordenacao,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmailPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "banco@empresa.com.br")]
    pub destinatario: String,
}

// Resumo do arquivo gerado (o conteúdo é baixado à parte)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArquivoResumo {
    #[schema(example = "REM000013.txt")]
    pub nome: String,
    pub nsa: u32,
    pub quantidade: usize,
    #[schema(example = "2469.12")]
    pub valor_total: Decimal,
    pub lotes: usize,
}

// Estado do assistente devolvido ao cliente
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportacaoView {
    pub id: Uuid,
    pub etapa: WizardStep,
    pub linhas: Vec<RowData>,
    pub erros: Vec<ErrorRecord>,
    pub validada: bool,
    pub configuracao: ConfiguracaoRemessa,
    pub arquivo: Option<ArquivoResumo>,
    pub pode_avancar: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GerarGrupoPayload {
    pub grupo_id: Uuid,
    pub empresa_id: Uuid,
    // Quando ausente, usa a data padrão do grupo
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-05")]
    pub data_pagamento: Option<NaiveDate>,
    #[serde(default)]
    pub ordenacao: Ordenacao,
}
