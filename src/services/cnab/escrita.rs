// src/services/cnab/escrita.rs

use rust_decimal::Decimal;

use crate::{
    common::format::{only_digits, pad_banco},
    models::importacao::Trilho,
    services::importacao::trilhos::particionar,
};

use super::{nome_banco, registro::Registro, CnabError, Pagamento, Remessa};

const LAYOUT_ARQUIVO: &str = "089";
const LAYOUT_LOTE: &str = "045";
// Pagamento a fornecedores
const TIPO_SERVICO: &str = "20";
const FINALIDADE_TED: &str = "00005";

// Arquivo pronto para download
#[derive(Debug, Clone, PartialEq)]
pub struct ArquivoCnab {
    pub nome: String,
    pub conteudo: String,
    pub quantidade: usize,
    pub valor_total: Decimal,
    pub lotes: usize,
}

impl Trilho {
    /// Forma de lançamento do header de lote.
    pub fn forma_lancamento(&self) -> &'static str {
        match self {
            Trilho::ContaCorrente => "01",
            Trilho::Poupanca => "05",
            Trilho::Ted => "41",
        }
    }

    pub fn from_forma_lancamento(forma: &str) -> Option<Self> {
        match forma {
            "01" => Some(Trilho::ContaCorrente),
            "05" => Some(Trilho::Poupanca),
            "41" => Some(Trilho::Ted),
            _ => None,
        }
    }

    fn camara(&self) -> &'static str {
        match self {
            Trilho::Ted => "018",
            _ => "000",
        }
    }
}

/// Monta o arquivo completo: header, um lote por trilho com pagamentos, trailer.
pub fn gerar_arquivo(remessa: &Remessa) -> Result<ArquivoCnab, CnabError> {
    if remessa.pagamentos.is_empty() {
        return Err(CnabError::SemPagamentos);
    }
    for p in &remessa.pagamentos {
        conferir_pagamento(p)?;
    }

    let particao = particionar(&remessa.pagamentos, &remessa.convenente.banco);

    let mut linhas = vec![header_arquivo(remessa)?];
    let mut numero_lote: u64 = 0;
    let mut seu_numero: u64 = 0;
    let mut valor_total = Decimal::ZERO;

    for (trilho, pagamentos) in particao.lotes() {
        numero_lote += 1;
        linhas.push(header_lote(remessa, numero_lote, trilho)?);

        let mut sequencial: u64 = 0;
        let mut soma = Decimal::ZERO;
        for pagamento in pagamentos {
            seu_numero += 1;
            sequencial += 1;
            linhas.push(segmento_a(remessa, numero_lote, sequencial, seu_numero, trilho, pagamento)?);
            sequencial += 1;
            linhas.push(segmento_b(remessa, numero_lote, sequencial, pagamento)?);
            soma += pagamento.valor;
        }

        // header + detalhes + trailer
        linhas.push(trailer_lote(remessa, numero_lote, sequencial + 2, soma)?);
        valor_total += soma;
    }

    let total_registros = linhas.len() as u64 + 1;
    linhas.push(trailer_arquivo(remessa, numero_lote, total_registros)?);

    let mut conteudo = linhas.join("\r\n");
    conteudo.push_str("\r\n");

    tracing::debug!(
        "Arquivo CNAB240 montado: NSA {}, {} lote(s), {} pagamento(s)",
        remessa.nsa,
        numero_lote,
        remessa.pagamentos.len()
    );

    Ok(ArquivoCnab {
        nome: format!("REM{:06}.txt", remessa.nsa),
        conteudo,
        quantidade: remessa.pagamentos.len(),
        valor_total,
        lotes: numero_lote as usize,
    })
}

fn conferir_pagamento(p: &Pagamento) -> Result<(), CnabError> {
    if p.agencia.is_empty() {
        return Err(CnabError::DadoAusente { nome: p.nome.clone(), campo: "agência" });
    }
    if p.conta.is_empty() {
        return Err(CnabError::DadoAusente { nome: p.nome.clone(), campo: "conta" });
    }
    if p.valor <= Decimal::ZERO {
        return Err(CnabError::ValorInvalido { nome: p.nome.clone() });
    }
    Ok(())
}

fn tipo_inscricao(documento: &str) -> &'static str {
    if only_digits(documento).len() == 11 { "1" } else { "2" }
}

fn header_arquivo(remessa: &Remessa) -> Result<String, CnabError> {
    let c = &remessa.convenente;
    let mut r = Registro::new("header de arquivo");
    r.num("banco", &c.banco, 3)?;
    r.fixo("0000").fixo("0").brancos(9);
    r.fixo("2");
    r.num("cnpj", &c.cnpj, 14)?;
    r.alfa(&c.convenio, 20);
    r.num("agência", &c.agencia, 5)?;
    r.alfa(&c.agencia_dv, 1);
    r.num("conta", &c.conta, 12)?;
    r.alfa(&c.conta_dv, 1);
    r.brancos(1);
    r.alfa(&c.nome, 30);
    r.alfa(nome_banco(&c.banco), 30);
    r.brancos(10);
    r.fixo("1");
    r.data(remessa.gerado_em.date()).hora(remessa.gerado_em);
    r.num_u64("nsa", remessa.nsa as u64, 6)?;
    r.fixo(LAYOUT_ARQUIVO);
    r.zeros(5);
    r.brancos(20).brancos(20).brancos(29);
    r.finish()
}

fn header_lote(remessa: &Remessa, lote: u64, trilho: Trilho) -> Result<String, CnabError> {
    let c = &remessa.convenente;
    let cep = only_digits(&c.cep);
    let (cep, cep_complemento) = if cep.len() == 8 { cep.split_at(5) } else { ("", "") };

    let mut r = Registro::new("header de lote");
    r.num("banco", &c.banco, 3)?;
    r.num_u64("lote", lote, 4)?;
    r.fixo("1").fixo("C").fixo(TIPO_SERVICO).fixo(trilho.forma_lancamento()).fixo(LAYOUT_LOTE);
    r.brancos(1);
    r.fixo("2");
    r.num("cnpj", &c.cnpj, 14)?;
    r.alfa(&c.convenio, 20);
    r.num("agência", &c.agencia, 5)?;
    r.alfa(&c.agencia_dv, 1);
    r.num("conta", &c.conta, 12)?;
    r.alfa(&c.conta_dv, 1);
    r.brancos(1);
    r.alfa(&c.nome, 30);
    r.brancos(40);
    r.alfa(&c.logradouro, 30);
    r.num("número", &c.numero, 5)?;
    r.alfa(&c.complemento, 15);
    r.alfa(&c.cidade, 20);
    r.num("cep", cep, 5)?;
    r.num("complemento do cep", cep_complemento, 3)?;
    r.alfa(&c.uf, 2);
    r.brancos(8);
    r.brancos(10);
    r.finish()
}

fn segmento_a(
    remessa: &Remessa,
    lote: u64,
    sequencial: u64,
    seu_numero: u64,
    trilho: Trilho,
    p: &Pagamento,
) -> Result<String, CnabError> {
    let mut r = Registro::new("segmento A");
    r.num("banco", &remessa.convenente.banco, 3)?;
    r.num_u64("lote", lote, 4)?;
    r.fixo("3");
    r.num_u64("sequencial", sequencial, 5)?;
    r.fixo("A").fixo("0").fixo("00");
    r.fixo(trilho.camara());
    r.num("banco do favorecido", &pad_banco(&p.banco), 3)?;
    r.num("agência do favorecido", &p.agencia, 5)?;
    r.alfa(&p.agencia_dv, 1);
    r.num("conta do favorecido", &p.conta, 12)?;
    r.alfa(&p.conta_dv, 1);
    r.brancos(1);
    r.alfa(&p.nome, 30);
    r.alfa(&format!("{:06}{:06}", remessa.nsa, seu_numero), 20);
    r.data(remessa.data_pagamento);
    r.fixo("BRL");
    r.zeros(15);
    r.valor("valor do pagamento", p.valor, 15)?;
    r.brancos(20);
    r.zeros(8).zeros(15);
    r.brancos(40);
    r.brancos(2);
    match trilho {
        Trilho::Ted => r.fixo(FINALIDADE_TED),
        _ => r.brancos(5),
    };
    r.brancos(2).brancos(3);
    r.fixo("0");
    r.brancos(10);
    r.finish()
}

fn segmento_b(remessa: &Remessa, lote: u64, sequencial: u64, p: &Pagamento) -> Result<String, CnabError> {
    let mut r = Registro::new("segmento B");
    r.num("banco", &remessa.convenente.banco, 3)?;
    r.num_u64("lote", lote, 4)?;
    r.fixo("3");
    r.num_u64("sequencial", sequencial, 5)?;
    r.fixo("B").brancos(3);
    r.fixo(tipo_inscricao(&p.inscricao));
    r.num("inscrição do favorecido", &p.inscricao, 14)?;
    // Endereço do favorecido não é informado
    r.brancos(30).zeros(5).brancos(15).brancos(15).brancos(20).zeros(5).zeros(3).brancos(2);
    r.data(remessa.data_pagamento);
    r.valor("valor do documento", p.valor, 15)?;
    r.zeros(15).zeros(15).zeros(15).zeros(15);
    r.brancos(15);
    r.fixo("0");
    r.zeros(6);
    r.brancos(8);
    r.finish()
}

fn trailer_lote(remessa: &Remessa, lote: u64, registros: u64, soma: Decimal) -> Result<String, CnabError> {
    let mut r = Registro::new("trailer de lote");
    r.num("banco", &remessa.convenente.banco, 3)?;
    r.num_u64("lote", lote, 4)?;
    r.fixo("5").brancos(9);
    r.num_u64("quantidade de registros do lote", registros, 6)?;
    r.valor("somatória dos valores", soma, 18)?;
    r.zeros(18).zeros(6);
    r.brancos(165);
    r.brancos(10);
    r.finish()
}

fn trailer_arquivo(remessa: &Remessa, lotes: u64, registros: u64) -> Result<String, CnabError> {
    let mut r = Registro::new("trailer de arquivo");
    r.num("banco", &remessa.convenente.banco, 3)?;
    r.fixo("9999").fixo("9").brancos(9);
    r.num_u64("quantidade de lotes", lotes, 6)?;
    r.num_u64("quantidade de registros", registros, 6)?;
    r.zeros(6);
    r.brancos(205);
    r.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cnab::registro::{campo, TAMANHO_REGISTRO};
    use crate::test_utils::{pagamento, remessa};

    #[test]
    fn every_line_has_240_columns_and_crlf() {
        let arquivo = gerar_arquivo(&remessa(vec![
            pagamento("Ana", "001", "CC", "100.00"),
            pagamento("Bia", "237", "CC", "50.50"),
        ]))
        .unwrap();

        assert!(arquivo.conteudo.ends_with("\r\n"));
        let linhas: Vec<&str> = arquivo.conteudo.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert!(linhas.iter().all(|l| l.len() == TAMANHO_REGISTRO));
        // header, 2 lotes x (header + A + B + trailer), trailer
        assert_eq!(linhas.len(), 10);
        assert_eq!(arquivo.lotes, 2);
        assert_eq!(arquivo.valor_total, Decimal::new(15050, 2));
        assert_eq!(arquivo.nome, "REM000007.txt");
    }

    #[test]
    fn writes_header_and_detail_fields_at_their_positions() {
        let arquivo = gerar_arquivo(&remessa(vec![pagamento("José Araújo", "1", "PP", "1234.56")])).unwrap();
        let linhas: Vec<&str> = arquivo.conteudo.lines().collect();

        let header = linhas[0];
        assert_eq!(campo(header, 1, 3), "001");
        assert_eq!(campo(header, 8, 8), "0");
        assert_eq!(campo(header, 19, 32), "11222333000181");
        assert_eq!(campo(header, 144, 151), "01032024");
        assert_eq!(campo(header, 152, 157), "093000");
        assert_eq!(campo(header, 158, 163), "000007");

        let lote = linhas[1];
        assert_eq!(campo(lote, 8, 8), "1");
        assert_eq!(campo(lote, 12, 13), "05");

        let seg_a = linhas[2];
        assert_eq!(campo(seg_a, 14, 14), "A");
        assert_eq!(campo(seg_a, 18, 20), "000");
        assert_eq!(campo(seg_a, 21, 23), "001");
        assert_eq!(campo(seg_a, 44, 73).trim_end(), "JOSE ARAUJO");
        assert_eq!(campo(seg_a, 94, 101), "05032024");
        assert_eq!(campo(seg_a, 120, 134), "000000000123456");

        let seg_b = linhas[3];
        assert_eq!(campo(seg_b, 14, 14), "B");
        assert_eq!(campo(seg_b, 18, 18), "1");
        assert_eq!(campo(seg_b, 19, 32), "00052998224725");
    }

    #[test]
    fn trailers_count_records_and_sum_amounts() {
        let arquivo = gerar_arquivo(&remessa(vec![
            pagamento("Ana", "341", "CC", "10.00"),
            pagamento("Bia", "237", "PP", "20.00"),
        ]))
        .unwrap();
        let linhas: Vec<&str> = arquivo.conteudo.lines().collect();

        // Ambos vão para o lote de TED
        let trailer_lote = linhas[6];
        assert_eq!(campo(trailer_lote, 8, 8), "5");
        assert_eq!(campo(trailer_lote, 18, 23), "000006");
        assert_eq!(campo(trailer_lote, 24, 41), "000000000000003000");

        let seg_a = linhas[2];
        assert_eq!(campo(seg_a, 18, 20), "018");
        assert_eq!(campo(seg_a, 220, 224), FINALIDADE_TED);

        let trailer = linhas[7];
        assert_eq!(campo(trailer, 18, 23), "000001");
        assert_eq!(campo(trailer, 24, 29), "000008");
    }

    #[test]
    fn rejects_payments_without_account_or_amount() {
        let mut sem_conta = pagamento("Ana", "001", "CC", "10.00");
        sem_conta.conta.clear();
        assert_eq!(
            gerar_arquivo(&remessa(vec![sem_conta])).unwrap_err(),
            CnabError::DadoAusente { nome: "Ana".into(), campo: "conta" }
        );

        let zerado = pagamento("Bia", "001", "CC", "0");
        assert_eq!(
            gerar_arquivo(&remessa(vec![zerado])).unwrap_err(),
            CnabError::ValorInvalido { nome: "Bia".into() }
        );

        assert_eq!(gerar_arquivo(&remessa(vec![])).unwrap_err(), CnabError::SemPagamentos);
    }

    #[test]
    fn same_bank_credit_follows_the_payer_bank() {
        let mut remessa = remessa(vec![
            pagamento("Ana", "237", "CC", "10.00"),
            pagamento("Bia", "001", "CC", "20.00"),
        ]);
        remessa.convenente.banco = "237".into();
        let arquivo = gerar_arquivo(&remessa).unwrap();
        let linhas: Vec<&str> = arquivo.conteudo.lines().collect();

        assert_eq!(campo(linhas[0], 1, 3), "237");

        // Bradesco -> Bradesco: crédito em conta
        assert_eq!(campo(linhas[1], 12, 13), "01");
        assert_eq!(campo(linhas[2], 18, 20), "000");
        assert_eq!(campo(linhas[2], 21, 23), "237");

        // Bradesco -> Banco do Brasil: TED
        assert_eq!(campo(linhas[5], 12, 13), "41");
        assert_eq!(campo(linhas[6], 18, 20), "018");
        assert_eq!(campo(linhas[6], 21, 23), "001");
    }
}
