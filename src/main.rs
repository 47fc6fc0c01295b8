//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
#[cfg(test)]
mod test_utils;

use crate::config::{settings::log_filter, AppState, Settings};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter()))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr.clone();
    let app_state = AppState::new(settings).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Tudo abaixo exige token
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me));

    let empresa_routes = Router::new()
        .route("/",
               get(handlers::empresas::list_empresas)
               .post(handlers::empresas::create_empresa)
        )
        .route("/{id}",
               get(handlers::empresas::get_empresa)
               .put(handlers::empresas::update_empresa)
               .delete(handlers::empresas::delete_empresa)
        );

    let favorecido_routes = Router::new()
        .route("/",
               get(handlers::favorecidos::list_favorecidos)
               .post(handlers::favorecidos::create_favorecido)
        )
        .route("/{id}",
               get(handlers::favorecidos::get_favorecido)
               .put(handlers::favorecidos::update_favorecido)
               .delete(handlers::favorecidos::delete_favorecido)
        );

    let grupo_routes = Router::new()
        .route("/",
               get(handlers::grupos::list_grupos)
               .post(handlers::grupos::create_grupo)
        )
        .route("/{id}",
               get(handlers::grupos::get_grupo)
               .put(handlers::grupos::update_grupo)
               .delete(handlers::grupos::delete_grupo)
        )
        .route("/{id}/membros",
               get(handlers::grupos::list_membros)
               .post(handlers::grupos::add_membro)
        )
        .route("/{id}/membros/{favorecido_id}",
               put(handlers::grupos::update_membro)
               .delete(handlers::grupos::remove_membro)
        );

    let selecao_routes = Router::new()
        .route("/",
               get(handlers::selecao::get_selecao)
               .put(handlers::selecao::selecionar_empresa)
               .delete(handlers::selecao::limpar_selecao)
        )
        .route("/aguardar", get(handlers::selecao::aguardar_selecao));

    let preferencia_routes = Router::new()
        .route("/", get(handlers::preferencias::list_preferencias))
        .route("/{key}",
               get(handlers::preferencias::get_preferencia)
               .put(handlers::preferencias::set_preferencia)
               .delete(handlers::preferencias::delete_preferencia)
        );

    let importacao_routes = Router::new()
        .route("/", post(handlers::importacoes::create_importacao))
        .route("/{id}",
               get(handlers::importacoes::get_importacao)
               .delete(handlers::importacoes::fechar_importacao)
        )
        .route("/{id}/linhas", put(handlers::importacoes::recarregar_linhas))
        .route("/{id}/evento", post(handlers::importacoes::disparar_evento))
        .route("/{id}/selecao", put(handlers::importacoes::selecionar_linhas))
        .route("/{id}/validar", post(handlers::importacoes::validar_linhas))
        .route("/{id}/configuracao", put(handlers::importacoes::configurar_remessa))
        .route("/{id}/gerar", post(handlers::importacoes::gerar_arquivo))
        .route("/{id}/arquivo", get(handlers::importacoes::baixar_arquivo))
        .route("/{id}/relatorio", get(handlers::importacoes::baixar_relatorio))
        .route("/{id}/email", post(handlers::importacoes::enviar_email));

    let remessa_routes = Router::new()
        .route("/grupo", post(handlers::remessas::gerar_de_grupo))
        .route("/ler", post(handlers::remessas::ler_remessa));

    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .nest("/users", user_routes)
        .nest("/empresas", empresa_routes)
        .nest("/favorecidos", favorecido_routes)
        .nest("/grupos", grupo_routes)
        .nest("/selecao", selecao_routes)
        .nest("/preferencias", preferencia_routes)
        .nest("/importacoes", importacao_routes)
        .nest("/remessas", remessa_routes)
        .route("/envios", get(handlers::remessas::list_envios))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", Router::new().nest("/auth", auth_routes).merge(protected))
        .with_state(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
