// src/services/remessa_service.rs
//
// Geração de arquivos de remessa: reserva o NSA da empresa e monta o CNAB240.

use chrono::{Local, NaiveDate};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::importacao::{GerarGrupoPayload, Ordenacao},
    services::{
        cnab::{gerar_arquivo, ler_arquivo, ArquivoCnab, ArquivoLido, Convenente, Pagamento, Remessa},
        empresa_service::EmpresaService,
        grupo_service::GrupoService,
        importacao::ordenacao::ordenar,
    },
};

#[derive(Clone)]
pub struct RemessaService {
    pool: PgPool,
    empresa_service: EmpresaService,
    grupo_service: GrupoService,
}

impl RemessaService {
    pub fn new(pool: PgPool, empresa_service: EmpresaService, grupo_service: GrupoService) -> Self {
        Self { pool, empresa_service, grupo_service }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        Ok(self.pool.begin().await?)
    }

    /// Ordena, reserva o NSA e monta o arquivo dentro da transação recebida.
    /// Se a montagem falhar, o chamador descarta a transação e o NSA volta ao valor anterior.
    pub async fn gerar(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        empresa_id: Uuid,
        data_pagamento: NaiveDate,
        mut pagamentos: Vec<Pagamento>,
        ordenacao: Ordenacao,
    ) -> Result<(ArquivoCnab, u32), AppError> {
        ordenar(&mut pagamentos, ordenacao);

        let empresa = self.empresa_service.reservar_nsa(tx, user_id, empresa_id).await?;
        let nsa = u32::try_from(empresa.nsa)
            .map_err(|_| anyhow::anyhow!("NSA inválido para a empresa {}: {}", empresa.id, empresa.nsa))?;

        let remessa = Remessa {
            convenente: Convenente::from(&empresa),
            nsa,
            data_pagamento,
            gerado_em: Local::now().naive_local(),
            pagamentos,
        };
        let arquivo = gerar_arquivo(&remessa)?;

        tracing::info!(
            "Remessa {} gerada para a empresa {}: {} pagamento(s), {} lote(s)",
            arquivo.nome,
            empresa.id,
            arquivo.quantidade,
            arquivo.lotes
        );
        Ok((arquivo, nsa))
    }

    /// Arquivo direto dos membros de um grupo, com o valor efetivo de cada um.
    pub async fn gerar_de_grupo(&self, user_id: Uuid, payload: &GerarGrupoPayload) -> Result<ArquivoCnab, AppError> {
        let grupo = self.grupo_service.get(user_id, payload.grupo_id).await?;
        let membros = self.grupo_service.list_members(user_id, grupo.id).await?;

        let data_pagamento = payload
            .data_pagamento
            .or(grupo.data_pagamento_padrao)
            .ok_or_else(|| {
                let mut erros = std::collections::HashMap::new();
                erros.insert("dataPagamento".to_string(), "payment_date_required".to_string());
                AppError::CamposInvalidos(erros)
            })?;
        if membros.is_empty() {
            let mut erros = std::collections::HashMap::new();
            erros.insert("grupoId".to_string(), "no_members".to_string());
            return Err(AppError::CamposInvalidos(erros));
        }

        let pagamentos = membros.iter().map(Pagamento::from_membro).collect();

        let mut tx = self.begin().await?;
        let (arquivo, _) = self
            .gerar(&mut tx, user_id, payload.empresa_id, data_pagamento, pagamentos, payload.ordenacao)
            .await?;
        tx.commit().await?;
        Ok(arquivo)
    }

    pub fn ler(&self, conteudo: &str) -> Result<ArquivoLido, AppError> {
        Ok(ler_arquivo(conteudo)?)
    }
}
