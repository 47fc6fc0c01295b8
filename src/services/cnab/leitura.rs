// src/services/cnab/leitura.rs
//
// Leitura de um arquivo de remessa já gerado, para conferência antes do envio ao banco.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::importacao::Trilho;

use super::{registro::campo, registro::TAMANHO_REGISTRO, CnabError};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagamentoLido {
    pub nome: String,
    pub inscricao: String,
    pub banco: String,
    pub agencia: String,
    pub conta: String,
    #[schema(value_type = String, format = Date)]
    pub data_pagamento: NaiveDate,
    pub valor: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoteLido {
    pub numero: u32,
    pub trilho: Trilho,
    pub pagamentos: Vec<PagamentoLido>,
    pub soma: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArquivoLido {
    pub banco: String,
    pub cnpj: String,
    pub empresa: String,
    pub nsa: u32,
    pub lotes: Vec<LoteLido>,
    pub quantidade_registros: usize,
}

fn erro(linha: usize, motivo: impl Into<String>) -> CnabError {
    CnabError::Leitura { linha, motivo: motivo.into() }
}

fn numero(linha: usize, texto: &str) -> Result<u64, CnabError> {
    texto
        .parse::<u64>()
        .map_err(|_| erro(linha, format!("campo numérico inválido: '{}'", texto)))
}

fn valor(linha: usize, texto: &str) -> Result<Decimal, CnabError> {
    let cents = numero(linha, texto)?;
    Ok(Decimal::from(cents) / Decimal::ONE_HUNDRED)
}

fn data(linha: usize, texto: &str) -> Result<NaiveDate, CnabError> {
    NaiveDate::parse_from_str(texto, "%d%m%Y").map_err(|_| erro(linha, format!("data inválida: '{}'", texto)))
}

/// Confere a estrutura (header, lotes, trailers) e devolve os pagamentos lidos.
pub fn ler_arquivo(conteudo: &str) -> Result<ArquivoLido, CnabError> {
    let linhas: Vec<&str> = conteudo.lines().filter(|l| !l.is_empty()).collect();

    for (i, linha) in linhas.iter().enumerate() {
        if !linha.is_ascii() {
            return Err(erro(i + 1, "caracteres fora do padrão ASCII"));
        }
        if linha.len() != TAMANHO_REGISTRO {
            return Err(erro(i + 1, format!("registro com {} posições (esperado 240)", linha.len())));
        }
    }

    let (header, resto) = linhas.split_first().ok_or_else(|| erro(1, "arquivo vazio"))?;
    if campo(header, 8, 8) != "0" {
        return Err(erro(1, "o arquivo deve começar pelo header de arquivo"));
    }

    let mut arquivo = ArquivoLido {
        banco: campo(header, 1, 3).to_string(),
        cnpj: campo(header, 19, 32).to_string(),
        empresa: campo(header, 73, 102).trim_end().to_string(),
        nsa: numero(1, campo(header, 158, 163))? as u32,
        lotes: Vec::new(),
        quantidade_registros: linhas.len(),
    };

    let mut lote_aberto: Option<(LoteLido, u64)> = None;
    let mut trailer_visto = false;

    for (i, linha) in resto.iter().enumerate() {
        let n = i + 2;
        if trailer_visto {
            return Err(erro(n, "registro após o trailer de arquivo"));
        }
        match campo(linha, 8, 8) {
            "1" => {
                if lote_aberto.is_some() {
                    return Err(erro(n, "header de lote antes do trailer do lote anterior"));
                }
                let forma = campo(linha, 12, 13);
                let trilho = Trilho::from_forma_lancamento(forma)
                    .ok_or_else(|| erro(n, format!("forma de lançamento desconhecida: '{}'", forma)))?;
                let lote = LoteLido {
                    numero: numero(n, campo(linha, 4, 7))? as u32,
                    trilho,
                    pagamentos: Vec::new(),
                    soma: Decimal::ZERO,
                };
                lote_aberto = Some((lote, 1));
            }
            "3" => {
                let (lote, registros) = lote_aberto
                    .as_mut()
                    .ok_or_else(|| erro(n, "detalhe fora de lote"))?;
                *registros += 1;
                match campo(linha, 14, 14) {
                    "A" => {
                        let pagamento = PagamentoLido {
                            nome: campo(linha, 44, 73).trim_end().to_string(),
                            inscricao: String::new(),
                            banco: campo(linha, 21, 23).to_string(),
                            agencia: campo(linha, 24, 29).trim_end().to_string(),
                            conta: campo(linha, 30, 42).trim_end().to_string(),
                            data_pagamento: data(n, campo(linha, 94, 101))?,
                            valor: valor(n, campo(linha, 120, 134))?,
                        };
                        lote.soma += pagamento.valor;
                        lote.pagamentos.push(pagamento);
                    }
                    "B" => {
                        let pagamento = lote
                            .pagamentos
                            .last_mut()
                            .ok_or_else(|| erro(n, "segmento B sem segmento A"))?;
                        pagamento.inscricao = campo(linha, 19, 32).to_string();
                    }
                    outro => return Err(erro(n, format!("segmento desconhecido: '{}'", outro))),
                }
            }
            "5" => {
                let (lote, registros) = lote_aberto
                    .take()
                    .ok_or_else(|| erro(n, "trailer de lote sem header de lote"))?;
                let declarados = numero(n, campo(linha, 18, 23))?;
                if declarados != registros + 1 {
                    return Err(erro(
                        n,
                        format!("lote {} declara {} registros, encontrados {}", lote.numero, declarados, registros + 1),
                    ));
                }
                let soma = valor(n, campo(linha, 24, 41))?;
                if soma != lote.soma {
                    return Err(erro(n, format!("lote {} declara soma {}, calculada {}", lote.numero, soma, lote.soma)));
                }
                arquivo.lotes.push(lote);
            }
            "9" => {
                if lote_aberto.is_some() {
                    return Err(erro(n, "trailer de arquivo com lote aberto"));
                }
                let lotes = numero(n, campo(linha, 18, 23))?;
                let registros = numero(n, campo(linha, 24, 29))?;
                if lotes as usize != arquivo.lotes.len() || registros as usize != linhas.len() {
                    return Err(erro(n, "totais do trailer de arquivo não conferem"));
                }
                trailer_visto = true;
            }
            outro => return Err(erro(n, format!("tipo de registro desconhecido: '{}'", outro))),
        }
    }

    if !trailer_visto {
        return Err(erro(linhas.len(), "arquivo sem trailer"));
    }

    Ok(arquivo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cnab::gerar_arquivo;
    use crate::test_utils::{pagamento, remessa};

    #[test]
    fn reads_back_a_generated_file() {
        let gerado = gerar_arquivo(&remessa(vec![
            pagamento("Ana", "001", "CC", "100.00"),
            pagamento("Bia", "237", "CC", "50.50"),
            pagamento("Caio", "001", "PP", "10.00"),
        ]))
        .unwrap();

        let lido = ler_arquivo(&gerado.conteudo).unwrap();
        assert_eq!(lido.nsa, 7);
        assert_eq!(lido.quantidade_registros, 14);
        let trilhos: Vec<Trilho> = lido.lotes.iter().map(|l| l.trilho).collect();
        assert_eq!(trilhos, vec![Trilho::ContaCorrente, Trilho::Poupanca, Trilho::Ted]);
        assert_eq!(lido.lotes[2].pagamentos[0].nome, "BIA");
        assert_eq!(lido.lotes[2].soma, Decimal::new(5050, 2));
        assert_eq!(lido.lotes[0].pagamentos[0].inscricao, "00052998224725");
    }

    #[test]
    fn rejects_wrong_width_and_missing_trailer() {
        let err = ler_arquivo("0001").unwrap_err();
        assert!(matches!(err, CnabError::Leitura { linha: 1, .. }));

        let gerado = gerar_arquivo(&remessa(vec![pagamento("Ana", "001", "CC", "1.00")])).unwrap();
        let sem_trailer: Vec<&str> = gerado.conteudo.lines().collect();
        let truncado = sem_trailer[..sem_trailer.len() - 1].join("\r\n");
        assert!(matches!(ler_arquivo(&truncado), Err(CnabError::Leitura { .. })));
    }

    #[test]
    fn detects_tampered_batch_sum() {
        let gerado = gerar_arquivo(&remessa(vec![pagamento("Ana", "001", "CC", "1.00")])).unwrap();
        let mut linhas: Vec<String> = gerado.conteudo.lines().map(str::to_string).collect();
        // trailer de lote: soma nas posições 24-41
        let trailer = &mut linhas[4];
        trailer.replace_range(23..41, "000000000000000999");
        let err = ler_arquivo(&linhas.join("\r\n")).unwrap_err();
        assert!(matches!(err, CnabError::Leitura { linha: 5, .. }));
    }
}
