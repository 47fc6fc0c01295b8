// src/services/cnab/registro.rs

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::common::format::{format_data_cnab, only_digits, strip_accents};

use super::CnabError;

pub const TAMANHO_REGISTRO: usize = 240;

/// Monta um registro de largura fixa, campo a campo, da esquerda para a direita.
#[derive(Debug)]
pub struct Registro {
    nome: &'static str,
    buf: String,
}

impl Registro {
    pub fn new(nome: &'static str) -> Self {
        Self { nome, buf: String::with_capacity(TAMANHO_REGISTRO) }
    }

    /// Texto literal, já no tamanho certo ("0000", "BRL"...).
    pub fn fixo(&mut self, valor: &str) -> &mut Self {
        self.buf.push_str(valor);
        self
    }

    /// Campo numérico: só os dígitos, zeros à esquerda. Não trunca.
    pub fn num(&mut self, campo: &'static str, valor: &str, tamanho: usize) -> Result<&mut Self, CnabError> {
        let digits = only_digits(valor);
        if digits.len() > tamanho {
            return Err(CnabError::CampoExcedido { campo, tamanho, valor: valor.to_string() });
        }
        self.buf.push_str(&format!("{:0>width$}", digits, width = tamanho));
        Ok(self)
    }

    pub fn num_u64(&mut self, campo: &'static str, valor: u64, tamanho: usize) -> Result<&mut Self, CnabError> {
        self.num(campo, &valor.to_string(), tamanho)
    }

    /// Valor monetário com 2 casas implícitas (R$ 12,34 -> "...1234").
    pub fn valor(&mut self, campo: &'static str, valor: Decimal, tamanho: usize) -> Result<&mut Self, CnabError> {
        let cents = (valor.round_dp(2) * Decimal::ONE_HUNDRED)
            .to_u64()
            .ok_or_else(|| CnabError::CampoExcedido { campo, tamanho, valor: valor.to_string() })?;
        self.num_u64(campo, cents, tamanho)
    }

    /// Campo alfanumérico: maiúsculo, sem acentos, espaços à direita, truncado.
    pub fn alfa(&mut self, valor: &str, tamanho: usize) -> &mut Self {
        let normalized: String = strip_accents(valor.trim())
            .to_uppercase()
            .chars()
            .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { ' ' })
            .take(tamanho)
            .collect();
        self.buf.push_str(&format!("{:<width$}", normalized, width = tamanho));
        self
    }

    pub fn brancos(&mut self, tamanho: usize) -> &mut Self {
        self.buf.push_str(&" ".repeat(tamanho));
        self
    }

    pub fn zeros(&mut self, tamanho: usize) -> &mut Self {
        self.buf.push_str(&"0".repeat(tamanho));
        self
    }

    pub fn data(&mut self, data: NaiveDate) -> &mut Self {
        self.buf.push_str(&format_data_cnab(data));
        self
    }

    pub fn hora(&mut self, momento: NaiveDateTime) -> &mut Self {
        self.buf.push_str(&momento.format("%H%M%S").to_string());
        self
    }

    pub fn finish(self) -> Result<String, CnabError> {
        if self.buf.len() != TAMANHO_REGISTRO {
            return Err(CnabError::TamanhoRegistro {
                registro: self.nome.to_string(),
                tamanho: self.buf.len(),
            });
        }
        Ok(self.buf)
    }
}

/// Trecho de uma linha pelas posições da documentação (1-based, inclusivas).
pub fn campo(linha: &str, inicio: usize, fim: usize) -> &str {
    &linha[inicio - 1..fim]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_numeric_and_alpha_fields() {
        let mut r = Registro::new("teste");
        r.num("banco", "1", 3).unwrap();
        r.alfa("São João", 10);
        r.valor("valor", Decimal::new(123456, 2), 15).unwrap();
        r.brancos(TAMANHO_REGISTRO - 28);
        let linha = r.finish().unwrap();
        assert_eq!(campo(&linha, 1, 3), "001");
        assert_eq!(campo(&linha, 4, 13), "SAO JOAO  ");
        assert_eq!(campo(&linha, 14, 28), "000000000123456");
    }

    #[test]
    fn truncates_text_but_rejects_numeric_overflow() {
        let mut r = Registro::new("teste");
        r.alfa("ABCDEFGHIJ", 4);
        assert_eq!(r.buf, "ABCD");
        let err = r.num("agencia", "123456", 5).unwrap_err();
        assert!(matches!(err, CnabError::CampoExcedido { campo: "agencia", tamanho: 5, .. }));
    }

    #[test]
    fn rejects_records_with_wrong_width() {
        let mut r = Registro::new("header de arquivo");
        r.brancos(239);
        let err = r.finish().unwrap_err();
        assert_eq!(
            err,
            CnabError::TamanhoRegistro { registro: "header de arquivo".into(), tamanho: 239 }
        );
    }
}
