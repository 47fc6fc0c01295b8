// src/config.rs

pub mod settings;

use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::{
    common::i18n::I18nStore,
    db::{
        EmpresaRepository, EnvioRepository, FavorecidoRepository, GrupoRepository, PreferenciasRepository,
        UserRepository,
    },
    services::{
        auth::AuthService,
        empresa_service::EmpresaService,
        envio_service::{EnvioService, LogEmailSender},
        favorecido_service::FavorecidoService,
        grupo_service::GrupoService,
        importacao::{sessoes::SessionStore, ImportacaoService},
        preferencias_service::PreferenciasService,
        relatorio_service::RelatorioService,
        remessa_service::RemessaService,
        selecao::SelectionHub,
    },
};

pub use settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub empresa_service: EmpresaService,
    pub favorecido_service: FavorecidoService,
    pub grupo_service: GrupoService,
    pub preferencias_service: PreferenciasService,
    pub remessa_service: RemessaService,
    pub importacao_service: ImportacaoService,
    pub envio_service: EnvioService,
    pub selection_hub: Arc<SelectionHub>,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let empresa_repo = EmpresaRepository::new(db_pool.clone());
        let favorecido_repo = FavorecidoRepository::new(db_pool.clone());
        let grupo_repo = GrupoRepository::new(db_pool.clone());
        let preferencias_repo = PreferenciasRepository::new(db_pool.clone());
        let envio_repo = EnvioRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, settings.jwt_secret.clone(), db_pool.clone());
        let empresa_service = EmpresaService::new(empresa_repo);
        let favorecido_service = FavorecidoService::new(favorecido_repo);
        let grupo_service = GrupoService::new(grupo_repo);
        let preferencias_service = PreferenciasService::new(preferencias_repo.clone());
        let envio_service = EnvioService::new(envio_repo, Arc::new(LogEmailSender));
        let relatorio_service = RelatorioService::new(settings.fonts_dir.clone());
        let remessa_service = RemessaService::new(db_pool.clone(), empresa_service.clone(), grupo_service.clone());
        let sessoes = SessionStore::new(settings.importacao_ttl);
        sessoes.agendar_limpeza();
        let importacao_service = ImportacaoService::new(
            sessoes,
            empresa_service.clone(),
            remessa_service.clone(),
            relatorio_service,
            envio_service.clone(),
            db_pool.clone(),
        );
        let selection_hub = Arc::new(SelectionHub::new(Arc::new(preferencias_repo)));

        Ok(Self {
            db_pool,
            settings: Arc::new(settings),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            empresa_service,
            favorecido_service,
            grupo_service,
            preferencias_service,
            remessa_service,
            importacao_service,
            envio_service,
            selection_hub,
        })
    }
}
