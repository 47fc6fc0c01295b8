// src/services/importacao/trilhos.rs

use crate::{common::format::pad_banco, models::importacao::Trilho};

use super::ordenacao::Pagavel;

/// Mesmo banco do convenente: crédito em conta (PP = poupança, qualquer outro tipo = corrente).
/// Banco diferente: TED.
pub fn trilho_de(banco: &str, tipo: &str, banco_casa: &str) -> Trilho {
    if pad_banco(banco) != pad_banco(banco_casa) {
        return Trilho::Ted;
    }
    if tipo.trim().eq_ignore_ascii_case("PP") {
        Trilho::Poupanca
    } else {
        Trilho::ContaCorrente
    }
}

// Pagamentos separados por trilho, cada um na ordem de entrada
#[derive(Debug)]
pub struct Particao<'a, T> {
    pub conta_corrente: Vec<&'a T>,
    pub poupanca: Vec<&'a T>,
    pub ted: Vec<&'a T>,
}

impl<'a, T> Particao<'a, T> {
    /// Lotes não vazios, na ordem em que entram no arquivo.
    pub fn lotes(&self) -> impl Iterator<Item = (Trilho, &[&'a T])> {
        [
            (Trilho::ContaCorrente, self.conta_corrente.as_slice()),
            (Trilho::Poupanca, self.poupanca.as_slice()),
            (Trilho::Ted, self.ted.as_slice()),
        ]
        .into_iter()
        .filter(|(_, itens)| !itens.is_empty())
    }
}

pub fn particionar<'a, T: Pagavel>(itens: &'a [T], banco_casa: &str) -> Particao<'a, T> {
    let mut particao = Particao { conta_corrente: Vec::new(), poupanca: Vec::new(), ted: Vec::new() };
    for item in itens {
        match trilho_de(item.banco(), item.tipo(), banco_casa) {
            Trilho::ContaCorrente => particao.conta_corrente.push(item),
            Trilho::Poupanca => particao.poupanca.push(item),
            Trilho::Ted => particao.ted.push(item),
        }
    }
    particao
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::row;

    #[test]
    fn classifies_by_bank_and_account_type() {
        assert_eq!(trilho_de("1", "CC", "001"), Trilho::ContaCorrente);
        assert_eq!(trilho_de("001", "pp", "001"), Trilho::Poupanca);
        assert_eq!(trilho_de("001", "", "001"), Trilho::ContaCorrente);
        assert_eq!(trilho_de("237", "PP", "001"), Trilho::Ted);
        assert_eq!(trilho_de("237", "CC", "237"), Trilho::ContaCorrente);
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let mut rows = Vec::new();
        let mut id = 0;
        for banco in ["001", "1", "237", "341"] {
            for tipo in ["CC", "PP", "XX", ""] {
                id += 1;
                let mut r = row(id, "Fulano", banco, "10");
                r.tipo = tipo.to_string();
                rows.push(r);
            }
        }

        let particao = particionar(&rows, "001");
        let mut vistos: Vec<u32> = particao
            .lotes()
            .flat_map(|(_, itens)| itens.iter().map(|r| r.id))
            .collect();
        vistos.sort_unstable();
        assert_eq!(vistos, (1..=16).collect::<Vec<u32>>());

        assert_eq!(particao.poupanca.len(), 2);
        assert_eq!(particao.conta_corrente.len(), 6);
        assert_eq!(particao.ted.len(), 8);
    }

    #[test]
    fn empty_rails_produce_no_batch() {
        let rows = vec![row(1, "Ana", "237", "10")];
        let particao = particionar(&rows, "001");
        let lotes: Vec<Trilho> = particao.lotes().map(|(t, _)| t).collect();
        assert_eq!(lotes, vec![Trilho::Ted]);
    }
}
