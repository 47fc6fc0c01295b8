// src/services/importacao/validacao.rs

use rust_decimal::Decimal;

use crate::{
    common::format::parse_valor,
    models::{
        importacao::{CampoErro, ErrorRecord, RowData},
        validators::is_bank_code,
    },
};

fn erro(campo: &str, mensagem: &str) -> CampoErro {
    CampoErro { campo: campo.to_string(), mensagem: mensagem.to_string() }
}

/// Erros de uma linha, um por campo. TIPO não é conferido.
pub fn validar_linha(row: &RowData) -> Vec<CampoErro> {
    let mut erros = Vec::new();

    if row.nome.trim().is_empty() {
        erros.push(erro("NOME", "NOME é obrigatório"));
    }
    if row.inscricao.trim().is_empty() {
        erros.push(erro("INSCRICAO", "INSCRICAO é obrigatória"));
    }
    if !is_bank_code(&row.banco) {
        erros.push(erro("BANCO", "BANCO inválido"));
    }
    match parse_valor(&row.valor) {
        None => erros.push(erro("VALOR", "VALOR inválido")),
        Some(v) if v <= Decimal::ZERO => erros.push(erro("VALOR", "VALOR deve ser maior que zero")),
        Some(_) => {}
    }

    erros
}

/// Linhas reprovadas, na ordem de entrada.
pub fn validate_rows(rows: &[RowData]) -> Vec<ErrorRecord> {
    rows.iter()
        .filter_map(|row| {
            let erros = validar_linha(row);
            (!erros.is_empty()).then(|| ErrorRecord { linha: row.clone(), erros })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::row;

    #[test]
    fn empty_name_is_reported() {
        let erros = validate_rows(&[row(1, "   ", "001", "10,00")]);
        assert_eq!(erros.len(), 1);
        assert_eq!(erros[0].linha.id, 1);
        assert_eq!(erros[0].erros, vec![erro("NOME", "NOME é obrigatório")]);
    }

    #[test]
    fn non_numeric_and_non_positive_values() {
        let rows = vec![
            row(1, "Ana", "001", "abc"),
            row(2, "Bia", "001", "0,00"),
            row(3, "Caio", "001", "-5"),
            row(4, "Davi", "001", "R$ 1.234,56"),
        ];
        let erros = validate_rows(&rows);
        let resumo: Vec<(u32, &str)> = erros
            .iter()
            .map(|e| (e.linha.id, e.erros[0].mensagem.as_str()))
            .collect();
        assert_eq!(
            resumo,
            vec![
                (1, "VALOR inválido"),
                (2, "VALOR deve ser maior que zero"),
                (3, "VALOR deve ser maior que zero"),
            ]
        );
    }

    #[test]
    fn reports_every_failed_field_and_ignores_tipo() {
        let mut r = row(7, "", "12A4", "");
        r.inscricao = String::new();
        r.tipo = "QUALQUER".into();
        let erros = validar_linha(&r);
        let campos: Vec<&str> = erros.iter().map(|e| e.campo.as_str()).collect();
        assert_eq!(campos, vec!["NOME", "INSCRICAO", "BANCO", "VALOR"]);
    }

    #[test]
    fn accepts_currency_formats() {
        for valor in ["R$ 1.234,56", "1234,56", "1.234", "1234.56"] {
            assert!(validar_linha(&row(1, "Ana", "1", valor)).is_empty(), "{valor}");
        }
    }
}
