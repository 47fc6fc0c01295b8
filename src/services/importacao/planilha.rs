// src/services/importacao/planilha.rs
//
// Normalização das linhas enviadas pelo cliente (objeto cabeçalho -> célula) para RowData.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::{common::format::strip_accents, models::importacao::RowData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coluna {
    Nome,
    Inscricao,
    Banco,
    Agencia,
    Conta,
    Tipo,
    Valor,
}

fn normalizar_cabecalho(cabecalho: &str) -> String {
    strip_accents(cabecalho.trim()).to_uppercase()
}

fn coluna(cabecalho: &str) -> Option<Coluna> {
    match normalizar_cabecalho(cabecalho).as_str() {
        "NOME" | "FAVORECIDO" => Some(Coluna::Nome),
        "INSCRICAO" | "CPF" | "CNPJ" | "CPF/CNPJ" | "DOCUMENTO" => Some(Coluna::Inscricao),
        "BANCO" => Some(Coluna::Banco),
        "AGENCIA" | "AG" => Some(Coluna::Agencia),
        "CONTA" | "CC" | "CONTA CORRENTE" => Some(Coluna::Conta),
        "TIPO" | "TIPO CONTA" => Some(Coluna::Tipo),
        "VALOR" | "VALOR (R$)" => Some(Coluna::Valor),
        _ => None,
    }
}

fn celula(valor: &Value) -> String {
    match valor {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        outro => outro.to_string(),
    }
}

// Número da planilha já é decimal: sai com vírgula para não ser lido como milhar
fn celula_valor(valor: &Value) -> String {
    match valor {
        Value::Number(n) => decimal(n)
            .map(|d| d.normalize().to_string().replace('.', ","))
            .unwrap_or_else(|| n.to_string()),
        outro => celula(outro),
    }
}

fn decimal(n: &Number) -> Option<Decimal> {
    let texto = n.to_string();
    Decimal::from_str(&texto)
        .or_else(|_| Decimal::from_scientific(&texto))
        .ok()
}

/// Cabeçalhos desconhecidos são ignorados; linhas totalmente vazias são descartadas.
pub fn normalizar_linhas(linhas: &[Map<String, Value>]) -> Vec<RowData> {
    let mut rows = Vec::with_capacity(linhas.len());

    for linha in linhas {
        let mut row = RowData { selecionado: true, ..RowData::default() };
        for (cabecalho, valor) in linha {
            let Some(coluna) = coluna(cabecalho) else {
                continue;
            };
            let destino = match coluna {
                Coluna::Nome => &mut row.nome,
                Coluna::Inscricao => &mut row.inscricao,
                Coluna::Banco => &mut row.banco,
                Coluna::Agencia => &mut row.agencia,
                Coluna::Conta => &mut row.conta,
                Coluna::Tipo => &mut row.tipo,
                Coluna::Valor => {
                    row.valor = celula_valor(valor);
                    continue;
                }
            };
            *destino = celula(valor);
        }

        let vazia = [&row.nome, &row.inscricao, &row.banco, &row.agencia, &row.conta, &row.tipo, &row.valor]
            .iter()
            .all(|c| c.is_empty());
        if vazia {
            continue;
        }

        row.id = rows.len() as u32 + 1;
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::importacao::ordenacao::Pagavel;
    use serde_json::json;

    fn linha(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn maps_aliases_and_accented_headers() {
        let rows = normalizar_linhas(&[linha(json!({
            " Favorecido ": "Maria",
            "CPF/CNPJ": "52998224725",
            "Banco": 1,
            "Agência": "1234-5",
            "Conta Corrente": "98765-4",
            "tipo conta": "pp",
            "Valor (R$)": 1234.5,
            "Observação": "ignorada"
        }))]);

        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.id, 1);
        assert_eq!(r.nome, "Maria");
        assert_eq!(r.inscricao, "52998224725");
        assert_eq!(r.banco, "1");
        assert_eq!(r.agencia, "1234-5");
        assert_eq!(r.conta, "98765-4");
        assert_eq!(r.tipo, "pp");
        assert_eq!(r.valor, "1234,5");
        assert_eq!(r.valor(), Decimal::new(12345, 1));
        assert!(r.selecionado);
    }

    #[test]
    fn skips_blank_rows_and_numbers_ids_sequentially() {
        let rows = normalizar_linhas(&[
            linha(json!({"NOME": "Ana"})),
            linha(json!({"NOME": "", "VALOR": null})),
            linha(json!({"NOME": "Bia"})),
        ]);
        let ids: Vec<(u32, &str)> = rows.iter().map(|r| (r.id, r.nome.as_str())).collect();
        assert_eq!(ids, vec![(1, "Ana"), (2, "Bia")]);
    }

    #[test]
    fn numeric_amount_cells_keep_their_decimal_value() {
        let rows = normalizar_linhas(&[
            linha(json!({"NOME": "Ana", "VALOR": 1.234})),
            linha(json!({"NOME": "Bia", "VALOR": 1500})),
            linha(json!({"NOME": "Caio", "VALOR": "1.234"})),
        ]);

        assert_eq!(rows[0].valor, "1,234");
        assert_eq!(rows[0].valor(), Decimal::new(1234, 3));
        assert_eq!(rows[1].valor(), Decimal::new(1500, 0));
        // texto continua com a leitura brasileira: ponto de milhar
        assert_eq!(rows[2].valor(), Decimal::new(1234, 0));
    }
}
