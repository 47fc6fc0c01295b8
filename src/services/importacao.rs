// src/services/importacao.rs
//
// Assistente de importação de planilhas: sessões em memória, validação,
// geração do arquivo, relatório e envio por e-mail.

pub mod ordenacao;
pub mod planilha;
pub mod sessoes;
pub mod trilhos;
pub mod validacao;
pub mod wizard;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        envio::Envio,
        importacao::{ConfiguracaoRemessa, ImportacaoView, SelecaoPayload},
    },
    services::{
        cnab::Pagamento,
        empresa_service::EmpresaService,
        envio_service::EnvioService,
        relatorio_service::RelatorioService,
        remessa_service::RemessaService,
    },
};

use self::{
    ordenacao::ordenar,
    planilha::normalizar_linhas,
    sessoes::SessionStore,
    validacao::validate_rows,
    wizard::{ImportWizard, WizardError, WizardEvent},
};

fn view(id: Uuid, w: &ImportWizard) -> ImportacaoView {
    ImportacaoView {
        id,
        etapa: w.etapa(),
        linhas: w.linhas().to_vec(),
        erros: w.erros().to_vec(),
        validada: w.validada(),
        configuracao: w.configuracao().clone(),
        arquivo: w.arquivo().map(|a| a.resumo.clone()),
        pode_avancar: w.pode_avancar(),
    }
}

#[derive(Clone)]
pub struct ImportacaoService {
    sessoes: SessionStore,
    empresa_service: EmpresaService,
    remessa_service: RemessaService,
    relatorio_service: RelatorioService,
    envio_service: EnvioService,
    pool: sqlx::PgPool,
}

impl ImportacaoService {
    pub fn new(
        sessoes: SessionStore,
        empresa_service: EmpresaService,
        remessa_service: RemessaService,
        relatorio_service: RelatorioService,
        envio_service: EnvioService,
        pool: sqlx::PgPool,
    ) -> Self {
        Self { sessoes, empresa_service, remessa_service, relatorio_service, envio_service, pool }
    }

    async fn ler<R>(&self, user_id: Uuid, id: Uuid, f: impl FnOnce(&ImportWizard) -> R) -> Result<R, AppError> {
        self.sessoes
            .ler(id, user_id, f)
            .await
            .ok_or(AppError::NotFound("importacao"))
    }

    async fn alterar<R>(
        &self,
        user_id: Uuid,
        id: Uuid,
        f: impl FnOnce(&mut ImportWizard) -> Result<R, WizardError>,
    ) -> Result<R, AppError> {
        let resultado = self
            .sessoes
            .alterar(id, user_id, f)
            .await
            .ok_or(AppError::NotFound("importacao"))?;
        Ok(resultado?)
    }

    async fn ver(&self, user_id: Uuid, id: Uuid) -> Result<ImportacaoView, AppError> {
        self.ler(user_id, id, |w| view(id, w)).await
    }

    /// Abre uma sessão com as linhas da planilha já normalizadas (etapa UPLOAD).
    pub async fn criar(&self, user_id: Uuid, linhas: &[Map<String, Value>]) -> Result<ImportacaoView, AppError> {
        let mut wizard = ImportWizard::new();
        wizard.carregar(normalizar_linhas(linhas))?;
        let id = self.sessoes.criar(user_id, wizard).await;
        self.ver(user_id, id).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<ImportacaoView, AppError> {
        self.ver(user_id, id).await
    }

    /// Recarrega as linhas (só na etapa UPLOAD).
    pub async fn recarregar(&self, user_id: Uuid, id: Uuid, linhas: &[Map<String, Value>]) -> Result<ImportacaoView, AppError> {
        let rows = normalizar_linhas(linhas);
        self.alterar(user_id, id, |w| w.carregar(rows)).await?;
        self.ver(user_id, id).await
    }

    pub async fn evento(&self, user_id: Uuid, id: Uuid, evento: WizardEvent) -> Result<ImportacaoView, AppError> {
        self.alterar(user_id, id, |w| w.disparar(evento)).await?;
        self.ver(user_id, id).await
    }

    pub async fn selecionar(&self, user_id: Uuid, id: Uuid, payload: &SelecaoPayload) -> Result<ImportacaoView, AppError> {
        self.alterar(user_id, id, |w| w.selecionar(&payload.ids, payload.selecionado)).await?;
        self.ver(user_id, id).await
    }

    /// Valida as linhas selecionadas e guarda os erros na sessão.
    pub async fn validar(&self, user_id: Uuid, id: Uuid) -> Result<ImportacaoView, AppError> {
        self.alterar(user_id, id, |w| {
            let erros = validate_rows(&w.selecionadas());
            w.registrar_validacao(erros)
        })
        .await?;
        self.ver(user_id, id).await
    }

    pub async fn configurar(
        &self,
        user_id: Uuid,
        id: Uuid,
        configuracao: ConfiguracaoRemessa,
    ) -> Result<ImportacaoView, AppError> {
        if let Some(empresa_id) = configuracao.empresa_id {
            self.empresa_service.get(&self.pool, user_id, empresa_id).await?;
        }
        self.alterar(user_id, id, |w| w.configurar(configuracao)).await?;
        self.ver(user_id, id).await
    }

    /// Gera o arquivo das linhas selecionadas. O NSA só é consumido se a sessão aceitar o arquivo,
    /// o que exige seleção e configuração iguais às lidas no início da geração.
    pub async fn gerar(&self, user_id: Uuid, id: Uuid) -> Result<ImportacaoView, AppError> {
        let base = self.ler(user_id, id, |w| w.base_geracao()).await??;

        let configuracao = &base.configuracao;
        let (Some(empresa_id), Some(data_pagamento)) = (configuracao.empresa_id, configuracao.data_pagamento) else {
            return Err(WizardError::ConfiguracaoIncompleta.into());
        };
        let pagamentos: Vec<Pagamento> = base.linhas.iter().map(Pagamento::from_row).collect();

        let mut tx = self.remessa_service.begin().await?;
        let (arquivo, nsa) = self
            .remessa_service
            .gerar(&mut tx, user_id, empresa_id, data_pagamento, pagamentos, configuracao.ordenacao)
            .await?;
        // Se a sessão recusar, a transação cai e o NSA volta
        self.alterar(user_id, id, |w| w.registrar_arquivo(&base, &arquivo, nsa)).await?;
        tx.commit().await?;

        self.ver(user_id, id).await
    }

    /// Nome e conteúdo do arquivo gerado.
    pub async fn arquivo(&self, user_id: Uuid, id: Uuid) -> Result<(String, String), AppError> {
        self.ler(user_id, id, |w| {
            w.arquivo()
                .map(|a| (a.resumo.nome.clone(), a.conteudo.clone()))
                .ok_or(WizardError::ArquivoNaoGerado)
        })
        .await?
        .map_err(AppError::from)
    }

    /// PDF das linhas selecionadas na ordenação configurada.
    pub async fn relatorio(&self, user_id: Uuid, id: Uuid) -> Result<Vec<u8>, AppError> {
        let (configuracao, mut rows) = self
            .ler(user_id, id, |w| (w.configuracao().clone(), w.selecionadas()))
            .await?;
        if rows.is_empty() {
            return Err(WizardError::NadaSelecionado.into());
        }
        ordenar(&mut rows, configuracao.ordenacao);

        let empresa = match configuracao.empresa_id {
            Some(empresa_id) => Some(self.empresa_service.get(&self.pool, user_id, empresa_id).await?),
            None => None,
        };

        self.relatorio_service
            .gerar_pdf(empresa.as_ref(), configuracao.data_pagamento, &rows)
    }

    /// Envia o arquivo gerado por e-mail (etapa ENVIO).
    pub async fn enviar_email(&self, user_id: Uuid, id: Uuid, destinatario: &str) -> Result<Envio, AppError> {
        let (empresa_id, resumo, conteudo) = self
            .ler(user_id, id, |w| {
                w.exigir_envio()
                    .map(|a| (w.configuracao().empresa_id, a.resumo.clone(), a.conteudo.clone()))
            })
            .await??;

        self.envio_service
            .enviar_arquivo(user_id, empresa_id, destinatario, &resumo, &conteudo)
            .await
    }

    pub async fn fechar(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.sessoes.fechar(id, user_id).await {
            Ok(())
        } else {
            Err(AppError::NotFound("importacao"))
        }
    }
}
