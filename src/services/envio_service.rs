// src/services/envio_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::format_valor_br},
    db::EnvioRepository,
    models::{envio::Envio, importacao::ArquivoResumo},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Mensagem {
    pub destinatario: String,
    pub assunto: String,
    pub corpo: String,
    pub anexo_nome: String,
    pub anexo: Vec<u8>,
}

/// Entrega de e-mails. O padrão só registra no log.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn enviar(&self, mensagem: &Mensagem) -> Result<(), AppError>;
}

pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn enviar(&self, mensagem: &Mensagem) -> Result<(), AppError> {
        tracing::info!(
            "📧 E-mail para {}: '{}' com anexo {} ({} bytes)",
            mensagem.destinatario,
            mensagem.assunto,
            mensagem.anexo_nome,
            mensagem.anexo.len()
        );
        Ok(())
    }
}

pub fn montar_mensagem(destinatario: &str, resumo: &ArquivoResumo, conteudo: &str) -> Mensagem {
    Mensagem {
        destinatario: destinatario.trim().to_string(),
        assunto: format!("Remessa de pagamentos {}", resumo.nome),
        corpo: format!(
            "Segue em anexo o arquivo {} (NSA {}) com {} pagamento(s) em {} lote(s), total de {}.",
            resumo.nome,
            resumo.nsa,
            resumo.quantidade,
            resumo.lotes,
            format_valor_br(resumo.valor_total)
        ),
        anexo_nome: resumo.nome.clone(),
        anexo: conteudo.as_bytes().to_vec(),
    }
}

#[derive(Clone)]
pub struct EnvioService {
    repo: EnvioRepository,
    sender: Arc<dyn EmailSender>,
}

impl EnvioService {
    pub fn new(repo: EnvioRepository, sender: Arc<dyn EmailSender>) -> Self {
        Self { repo, sender }
    }

    /// Entrega o arquivo e registra o envio.
    pub async fn enviar_arquivo(
        &self,
        user_id: Uuid,
        empresa_id: Option<Uuid>,
        destinatario: &str,
        resumo: &ArquivoResumo,
        conteudo: &str,
    ) -> Result<Envio, AppError> {
        let mensagem = montar_mensagem(destinatario, resumo, conteudo);
        self.sender.enviar(&mensagem).await?;

        let quantidade = i32::try_from(resumo.quantidade)
            .map_err(|_| anyhow::anyhow!("Quantidade de pagamentos fora do limite: {}", resumo.quantidade))?;
        self.repo
            .create(user_id, empresa_id, &mensagem.destinatario, &resumo.nome, quantidade, resumo.valor_total)
            .await
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Envio>, AppError> {
        self.repo.list(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn message_carries_file_and_summary() {
        let resumo = ArquivoResumo {
            nome: "REM000013.txt".into(),
            nsa: 13,
            quantidade: 2,
            valor_total: Decimal::new(246912, 2),
            lotes: 1,
        };
        let m = montar_mensagem(" banco@empresa.com.br ", &resumo, "linha\r\n");
        assert_eq!(m.destinatario, "banco@empresa.com.br");
        assert_eq!(m.anexo_nome, "REM000013.txt");
        assert_eq!(m.anexo, b"linha\r\n".to_vec());
        assert!(m.corpo.contains("R$ 2.469,12"));
    }
}
