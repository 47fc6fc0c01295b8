// src/services/importacao/ordenacao.rs

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::{
    common::format::{pad_banco, parse_valor, strip_accents},
    models::{
        favorecido::Favorecido,
        grupo::MembroDetalhe,
        importacao::{Ordenacao, RowData},
    },
};

/// O que a ordenação e a separação por trilho precisam saber de um pagamento.
pub trait Pagavel {
    fn nome(&self) -> &str;
    fn banco(&self) -> &str;
    fn tipo(&self) -> &str;
    fn valor(&self) -> Decimal;
}

impl Pagavel for RowData {
    fn nome(&self) -> &str {
        &self.nome
    }
    fn banco(&self) -> &str {
        &self.banco
    }
    fn tipo(&self) -> &str {
        &self.tipo
    }
    // Linhas não validadas podem ter valor ilegível
    fn valor(&self) -> Decimal {
        parse_valor(&self.valor).unwrap_or(Decimal::ZERO)
    }
}

impl Pagavel for Favorecido {
    fn nome(&self) -> &str {
        &self.nome
    }
    fn banco(&self) -> &str {
        &self.banco
    }
    fn tipo(&self) -> &str {
        &self.tipo_conta
    }
    fn valor(&self) -> Decimal {
        self.valor_padrao.unwrap_or(Decimal::ZERO)
    }
}

impl Pagavel for MembroDetalhe {
    fn nome(&self) -> &str {
        &self.favorecido.nome
    }
    fn banco(&self) -> &str {
        &self.favorecido.banco
    }
    fn tipo(&self) -> &str {
        &self.favorecido.tipo_conta
    }
    fn valor(&self) -> Decimal {
        self.valor_efetivo()
    }
}

fn chave_nome(nome: &str) -> String {
    strip_accents(nome.trim()).to_lowercase()
}

fn por_nome<T: Pagavel>(a: &T, b: &T) -> Ordering {
    chave_nome(a.nome()).cmp(&chave_nome(b.nome()))
}

fn por_banco<T: Pagavel>(a: &T, b: &T) -> Ordering {
    pad_banco(a.banco()).cmp(&pad_banco(b.banco()))
}

fn por_valor_desc<T: Pagavel>(a: &T, b: &T) -> Ordering {
    b.valor().cmp(&a.valor())
}

/// Ordena no lugar. `sort_by` é estável: empates mantêm a ordem de entrada.
pub fn ordenar<T: Pagavel>(itens: &mut [T], criterio: Ordenacao) {
    match criterio {
        Ordenacao::Nome => itens.sort_by(por_nome),
        Ordenacao::BancoNome => itens.sort_by(|a, b| por_banco(a, b).then_with(|| por_nome(a, b))),
        Ordenacao::BancoValor => itens.sort_by(|a, b| {
            por_banco(a, b)
                .then_with(|| por_valor_desc(a, b))
                .then_with(|| por_nome(a, b))
        }),
        Ordenacao::Valor => itens.sort_by(|a, b| por_valor_desc(a, b).then_with(|| por_nome(a, b))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::row;

    fn nomes(rows: &[RowData]) -> Vec<&str> {
        rows.iter().map(|r| r.nome.as_str()).collect()
    }

    #[test]
    fn bank_then_value_descending() {
        let mut rows = vec![
            row(1, "Caio", "237", "100,00"),
            row(2, "Ana", "1", "50,00"),
            row(3, "Bia", "001", "R$ 1.500,00"),
            row(4, "Davi", "33", "10"),
        ];
        ordenar(&mut rows, Ordenacao::BancoValor);
        assert_eq!(nomes(&rows), vec!["Bia", "Ana", "Davi", "Caio"]);
    }

    #[test]
    fn ties_keep_input_order_before_name() {
        // mesmo banco, mesmo valor, mesmo nome: a ordem de entrada é preservada
        let mut rows = vec![
            row(1, "Ana", "001", "10,00"),
            row(2, "ana", "1", "10.00"),
            row(3, "Ána", "001", "10"),
        ];
        ordenar(&mut rows, Ordenacao::BancoValor);
        let ids: Vec<u32> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn name_ordering_ignores_case_and_accents() {
        let mut rows = vec![
            row(1, "élida", "001", "1"),
            row(2, "Bruno", "001", "1"),
            row(3, "Eduardo", "001", "1"),
        ];
        ordenar(&mut rows, Ordenacao::Nome);
        assert_eq!(nomes(&rows), vec!["Bruno", "Eduardo", "élida"]);
    }

    #[test]
    fn value_descending_with_name_tiebreak() {
        let mut rows = vec![
            row(1, "Zeca", "001", "20"),
            row(2, "Ana", "237", "20"),
            row(3, "Bia", "001", "99"),
        ];
        ordenar(&mut rows, Ordenacao::Valor);
        assert_eq!(nomes(&rows), vec!["Bia", "Ana", "Zeca"]);

        ordenar(&mut rows, Ordenacao::BancoNome);
        assert_eq!(nomes(&rows), vec!["Bia", "Zeca", "Ana"]);
    }
}
