// src/services/importacao/wizard.rs
//
// Assistente de importação: UPLOAD -> REVISAO -> (VALIDACAO) -> GERACAO -> (ENVIO).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    models::importacao::{ArquivoResumo, ConfiguracaoRemessa, ErrorRecord, RowData},
    services::cnab::ArquivoCnab,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    #[default]
    Upload,
    Revisao,
    Validacao,
    Geracao,
    Envio,
}

impl WizardStep {
    fn anterior(self) -> Option<WizardStep> {
        match self {
            WizardStep::Upload => None,
            WizardStep::Revisao => Some(WizardStep::Upload),
            WizardStep::Validacao => Some(WizardStep::Revisao),
            WizardStep::Geracao => Some(WizardStep::Validacao),
            WizardStep::Envio => Some(WizardStep::Geracao),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nome = match self {
            WizardStep::Upload => "UPLOAD",
            WizardStep::Revisao => "REVISAO",
            WizardStep::Validacao => "VALIDACAO",
            WizardStep::Geracao => "GERACAO",
            WizardStep::Envio => "ENVIO",
        };
        f.write_str(nome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardEvent {
    Avancar,
    Voltar,
    PularValidacao,
}

impl fmt::Display for WizardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nome = match self {
            WizardEvent::Avancar => "AVANCAR",
            WizardEvent::Voltar => "VOLTAR",
            WizardEvent::PularValidacao => "PULAR_VALIDACAO",
        };
        f.write_str(nome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("evento {evento} não é permitido na etapa {etapa}")]
    TransicaoInvalida { etapa: WizardStep, evento: WizardEvent },

    #[error("'{operacao}' só é permitido na etapa {esperada} (etapa atual: {atual})")]
    EtapaIncorreta {
        operacao: &'static str,
        esperada: WizardStep,
        atual: WizardStep,
    },

    #[error("nenhuma linha carregada")]
    SemLinhas,

    #[error("nenhuma linha selecionada")]
    NadaSelecionado,

    #[error("a validação ainda não foi executada")]
    ValidacaoPendente,

    #[error("{0} linha(s) com erro de validação")]
    ValidacaoComErros(usize),

    #[error("selecione a empresa e a data de pagamento")]
    ConfiguracaoIncompleta,

    #[error("nenhum arquivo foi gerado")]
    ArquivoNaoGerado,

    #[error("a seleção ou a configuração mudou durante a geração; gere o arquivo novamente")]
    ArquivoDesatualizado,
}

/// Destino de um evento pela tabela de transições, sem olhar as guardas.
pub fn transicao(etapa: WizardStep, evento: WizardEvent) -> Option<WizardStep> {
    use WizardEvent::*;
    use WizardStep::*;

    match (etapa, evento) {
        (Upload, Avancar) => Some(Revisao),
        (Revisao, Avancar) => Some(Validacao),
        (Revisao, PularValidacao) => Some(Geracao),
        (Validacao, Avancar) => Some(Geracao),
        (Geracao, Avancar) => Some(Envio),
        (atual, Voltar) => atual.anterior(),
        _ => None,
    }
}

// Arquivo gerado na etapa GERACAO
#[derive(Debug, Clone)]
pub struct ArquivoGerado {
    pub resumo: ArquivoResumo,
    pub conteudo: String,
}

/// Configuração e linhas a partir das quais um arquivo foi montado.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseGeracao {
    pub configuracao: ConfiguracaoRemessa,
    pub linhas: Vec<RowData>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportWizard {
    etapa: WizardStep,
    linhas: Vec<RowData>,
    erros: Vec<ErrorRecord>,
    validada: bool,
    configuracao: ConfiguracaoRemessa,
    arquivo: Option<ArquivoGerado>,
}

impl ImportWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn etapa(&self) -> WizardStep {
        self.etapa
    }

    pub fn linhas(&self) -> &[RowData] {
        &self.linhas
    }

    pub fn erros(&self) -> &[ErrorRecord] {
        &self.erros
    }

    pub fn validada(&self) -> bool {
        self.validada
    }

    pub fn configuracao(&self) -> &ConfiguracaoRemessa {
        &self.configuracao
    }

    pub fn arquivo(&self) -> Option<&ArquivoGerado> {
        self.arquivo.as_ref()
    }

    pub fn selecionadas(&self) -> Vec<RowData> {
        self.linhas.iter().filter(|r| r.selecionado).cloned().collect()
    }

    fn exigir(&self, operacao: &'static str, esperada: WizardStep) -> Result<(), WizardError> {
        if self.etapa == esperada {
            Ok(())
        } else {
            Err(WizardError::EtapaIncorreta { operacao, esperada, atual: self.etapa })
        }
    }

    fn guarda(&self, evento: WizardEvent) -> Result<(), WizardError> {
        match (self.etapa, evento) {
            (_, WizardEvent::Voltar) => Ok(()),
            (WizardStep::Upload, _) if self.linhas.is_empty() => Err(WizardError::SemLinhas),
            (WizardStep::Revisao, _) if !self.linhas.iter().any(|r| r.selecionado) => {
                Err(WizardError::NadaSelecionado)
            }
            (WizardStep::Validacao, _) if !self.validada => Err(WizardError::ValidacaoPendente),
            (WizardStep::Validacao, _) if !self.erros.is_empty() => {
                Err(WizardError::ValidacaoComErros(self.erros.len()))
            }
            (WizardStep::Geracao, _) if self.arquivo.is_none() => Err(WizardError::ArquivoNaoGerado),
            _ => Ok(()),
        }
    }

    /// Aplica o evento. Em caso de erro o estado não muda.
    pub fn disparar(&mut self, evento: WizardEvent) -> Result<WizardStep, WizardError> {
        let destino = transicao(self.etapa, evento)
            .ok_or(WizardError::TransicaoInvalida { etapa: self.etapa, evento })?;
        self.guarda(evento)?;

        if destino == WizardStep::Revisao {
            self.limpar_validacao();
            self.arquivo = None;
        }
        tracing::debug!("Assistente: {} --{}--> {}", self.etapa, evento, destino);
        self.etapa = destino;
        Ok(destino)
    }

    pub fn pode_avancar(&self) -> bool {
        transicao(self.etapa, WizardEvent::Avancar).is_some() && self.guarda(WizardEvent::Avancar).is_ok()
    }

    /// Substitui as linhas carregadas.
    pub fn carregar(&mut self, linhas: Vec<RowData>) -> Result<(), WizardError> {
        self.exigir("carregar planilha", WizardStep::Upload)?;
        self.linhas = linhas;
        self.limpar_validacao();
        self.arquivo = None;
        Ok(())
    }

    /// Marca/desmarca linhas. Ids desconhecidos são ignorados; devolve quantas mudaram.
    pub fn selecionar(&mut self, ids: &[u32], selecionado: bool) -> Result<usize, WizardError> {
        self.exigir("alterar seleção", WizardStep::Revisao)?;
        let mut alteradas = 0;
        for linha in self.linhas.iter_mut().filter(|l| ids.contains(&l.id)) {
            if linha.selecionado != selecionado {
                linha.selecionado = selecionado;
                alteradas += 1;
            }
        }
        if alteradas > 0 {
            self.arquivo = None;
        }
        Ok(alteradas)
    }

    pub fn registrar_validacao(&mut self, erros: Vec<ErrorRecord>) -> Result<(), WizardError> {
        self.exigir("validar", WizardStep::Validacao)?;
        self.erros = erros;
        self.validada = true;
        Ok(())
    }

    /// Alterar a configuração descarta o arquivo gerado.
    pub fn configurar(&mut self, configuracao: ConfiguracaoRemessa) -> Result<(), WizardError> {
        self.exigir("configurar remessa", WizardStep::Geracao)?;
        self.configuracao = configuracao;
        self.arquivo = None;
        Ok(())
    }

    /// Confere se a geração pode ser feita agora (etapa, seleção e configuração).
    pub fn pronto_para_gerar(&self) -> Result<(), WizardError> {
        self.exigir("gerar arquivo", WizardStep::Geracao)?;
        if !self.linhas.iter().any(|r| r.selecionado) {
            return Err(WizardError::NadaSelecionado);
        }
        if self.configuracao.empresa_id.is_none() || self.configuracao.data_pagamento.is_none() {
            return Err(WizardError::ConfiguracaoIncompleta);
        }
        Ok(())
    }

    /// Configuração e linhas selecionadas que a geração deve usar.
    pub fn base_geracao(&self) -> Result<BaseGeracao, WizardError> {
        self.pronto_para_gerar()?;
        Ok(BaseGeracao {
            configuracao: self.configuracao.clone(),
            linhas: self.selecionadas(),
        })
    }

    /// Guarda o arquivo montado a partir de `base`, recusando-o se o estado mudou desde então.
    pub fn registrar_arquivo(&mut self, base: &BaseGeracao, arquivo: &ArquivoCnab, nsa: u32) -> Result<(), WizardError> {
        if self.base_geracao()? != *base {
            return Err(WizardError::ArquivoDesatualizado);
        }
        self.arquivo = Some(ArquivoGerado {
            resumo: ArquivoResumo {
                nome: arquivo.nome.clone(),
                nsa,
                quantidade: arquivo.quantidade,
                valor_total: arquivo.valor_total,
                lotes: arquivo.lotes,
            },
            conteudo: arquivo.conteudo.clone(),
        });
        Ok(())
    }

    pub fn exigir_envio(&self) -> Result<&ArquivoGerado, WizardError> {
        self.exigir("enviar por e-mail", WizardStep::Envio)?;
        self.arquivo.as_ref().ok_or(WizardError::ArquivoNaoGerado)
    }

    fn limpar_validacao(&mut self) {
        self.erros.clear();
        self.validada = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::importacao::{CampoErro, ConfiguracaoRemessa},
        test_utils::row,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn arquivo() -> ArquivoCnab {
        ArquivoCnab {
            nome: "REM000001.txt".into(),
            conteudo: "...".into(),
            quantidade: 1,
            valor_total: Decimal::ONE,
            lotes: 1,
        }
    }

    fn configurado() -> ConfiguracaoRemessa {
        ConfiguracaoRemessa {
            empresa_id: Some(Uuid::new_v4()),
            data_pagamento: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Default::default()
        }
    }

    fn na_revisao() -> ImportWizard {
        let mut w = ImportWizard::new();
        w.carregar(vec![row(1, "Ana", "001", "10"), row(2, "Bia", "237", "20")]).unwrap();
        w.disparar(WizardEvent::Avancar).unwrap();
        w
    }

    #[test]
    fn table_only_allows_listed_transitions() {
        use WizardEvent::*;
        use WizardStep::*;
        let etapas = [Upload, Revisao, Validacao, Geracao, Envio];
        let eventos = [Avancar, Voltar, PularValidacao];
        let mut permitidas = Vec::new();
        for etapa in etapas {
            for evento in eventos {
                if let Some(destino) = transicao(etapa, evento) {
                    permitidas.push((etapa, evento, destino));
                }
            }
        }
        assert_eq!(
            permitidas,
            vec![
                (Upload, Avancar, Revisao),
                (Revisao, Avancar, Validacao),
                (Revisao, Voltar, Upload),
                (Revisao, PularValidacao, Geracao),
                (Validacao, Avancar, Geracao),
                (Validacao, Voltar, Revisao),
                (Geracao, Avancar, Envio),
                (Geracao, Voltar, Validacao),
                (Envio, Voltar, Geracao),
            ]
        );
    }

    #[test]
    fn cannot_leave_upload_without_rows() {
        let mut w = ImportWizard::new();
        assert_eq!(w.disparar(WizardEvent::Avancar), Err(WizardError::SemLinhas));
        assert_eq!(
            w.disparar(WizardEvent::Voltar),
            Err(WizardError::TransicaoInvalida { etapa: WizardStep::Upload, evento: WizardEvent::Voltar })
        );
        assert_eq!(w.etapa(), WizardStep::Upload);
    }

    #[test]
    fn review_requires_a_selected_row() {
        let mut w = na_revisao();
        w.selecionar(&[1, 2, 99], false).unwrap();
        assert_eq!(w.disparar(WizardEvent::PularValidacao), Err(WizardError::NadaSelecionado));
        assert_eq!(w.etapa(), WizardStep::Revisao);

        w.selecionar(&[2], true).unwrap();
        assert_eq!(w.disparar(WizardEvent::PularValidacao), Ok(WizardStep::Geracao));
        assert_eq!(w.selecionadas().len(), 1);
    }

    #[test]
    fn validation_must_pass_and_is_cleared_on_going_back() {
        let mut w = na_revisao();
        w.disparar(WizardEvent::Avancar).unwrap();
        assert_eq!(w.disparar(WizardEvent::Avancar), Err(WizardError::ValidacaoPendente));

        let erro = ErrorRecord {
            linha: row(1, "", "001", "10"),
            erros: vec![CampoErro { campo: "NOME".into(), mensagem: "NOME é obrigatório".into() }],
        };
        w.registrar_validacao(vec![erro]).unwrap();
        assert_eq!(w.disparar(WizardEvent::Avancar), Err(WizardError::ValidacaoComErros(1)));

        w.disparar(WizardEvent::Voltar).unwrap();
        assert_eq!(w.etapa(), WizardStep::Revisao);
        assert!(!w.validada());
        assert!(w.erros().is_empty());
    }

    #[test]
    fn operations_are_gated_by_step() {
        let mut w = na_revisao();
        assert!(matches!(
            w.carregar(vec![]),
            Err(WizardError::EtapaIncorreta { esperada: WizardStep::Upload, atual: WizardStep::Revisao, .. })
        ));
        assert!(w.registrar_validacao(vec![]).is_err());
        assert!(w.configurar(configurado()).is_err());
        assert!(w.exigir_envio().is_err());
    }

    #[test]
    fn generation_needs_config_and_config_change_discards_file() {
        let mut w = na_revisao();
        w.disparar(WizardEvent::PularValidacao).unwrap();
        assert_eq!(w.pronto_para_gerar(), Err(WizardError::ConfiguracaoIncompleta));
        assert_eq!(w.disparar(WizardEvent::Avancar), Err(WizardError::ArquivoNaoGerado));

        w.configurar(configurado()).unwrap();
        let base = w.base_geracao().unwrap();
        w.registrar_arquivo(&base, &arquivo(), 1).unwrap();
        assert!(w.pode_avancar());

        w.configurar(configurado()).unwrap();
        assert!(w.arquivo().is_none());
        assert!(!w.pode_avancar());

        let base = w.base_geracao().unwrap();
        w.registrar_arquivo(&base, &arquivo(), 2).unwrap();
        assert_eq!(w.disparar(WizardEvent::Avancar), Ok(WizardStep::Envio));
        assert_eq!(w.exigir_envio().unwrap().resumo.nsa, 2);
    }

    #[test]
    fn going_back_to_review_discards_the_file() {
        let mut w = na_revisao();
        w.disparar(WizardEvent::PularValidacao).unwrap();
        w.configurar(configurado()).unwrap();
        let base = w.base_geracao().unwrap();
        w.registrar_arquivo(&base, &arquivo(), 1).unwrap();

        w.disparar(WizardEvent::Voltar).unwrap();
        assert!(w.arquivo().is_some());
        w.disparar(WizardEvent::Voltar).unwrap();
        assert_eq!(w.etapa(), WizardStep::Revisao);
        assert!(w.arquivo().is_none());

        w.selecionar(&[2], false).unwrap();
        w.disparar(WizardEvent::PularValidacao).unwrap();
        assert_eq!(w.disparar(WizardEvent::Avancar), Err(WizardError::ArquivoNaoGerado));
        assert!(w.exigir_envio().is_err());
    }

    #[test]
    fn file_built_from_an_older_state_is_rejected() {
        let mut w = na_revisao();
        w.disparar(WizardEvent::PularValidacao).unwrap();
        w.configurar(configurado()).unwrap();
        let base = w.base_geracao().unwrap();
        assert_eq!(base.linhas.len(), 2);

        // outra requisição troca a configuração enquanto o arquivo é montado
        w.configurar(configurado()).unwrap();
        assert_eq!(w.registrar_arquivo(&base, &arquivo(), 1), Err(WizardError::ArquivoDesatualizado));
        assert!(w.arquivo().is_none());

        let atual = w.base_geracao().unwrap();
        assert_eq!(w.registrar_arquivo(&atual, &arquivo(), 1), Ok(()));
    }
}
