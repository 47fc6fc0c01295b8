// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_me,

        // --- Empresas ---
        handlers::empresas::list_empresas,
        handlers::empresas::create_empresa,
        handlers::empresas::get_empresa,
        handlers::empresas::update_empresa,
        handlers::empresas::delete_empresa,

        // --- Favorecidos ---
        handlers::favorecidos::list_favorecidos,
        handlers::favorecidos::create_favorecido,
        handlers::favorecidos::get_favorecido,
        handlers::favorecidos::update_favorecido,
        handlers::favorecidos::delete_favorecido,

        // --- Grupos ---
        handlers::grupos::list_grupos,
        handlers::grupos::create_grupo,
        handlers::grupos::get_grupo,
        handlers::grupos::update_grupo,
        handlers::grupos::delete_grupo,
        handlers::grupos::list_membros,
        handlers::grupos::add_membro,
        handlers::grupos::update_membro,
        handlers::grupos::remove_membro,

        // --- Seleção ---
        handlers::selecao::get_selecao,
        handlers::selecao::selecionar_empresa,
        handlers::selecao::limpar_selecao,
        handlers::selecao::aguardar_selecao,

        // --- Preferências ---
        handlers::preferencias::list_preferencias,
        handlers::preferencias::get_preferencia,
        handlers::preferencias::set_preferencia,
        handlers::preferencias::delete_preferencia,

        // --- Importações ---
        handlers::importacoes::create_importacao,
        handlers::importacoes::get_importacao,
        handlers::importacoes::recarregar_linhas,
        handlers::importacoes::disparar_evento,
        handlers::importacoes::selecionar_linhas,
        handlers::importacoes::validar_linhas,
        handlers::importacoes::configurar_remessa,
        handlers::importacoes::gerar_arquivo,
        handlers::importacoes::baixar_arquivo,
        handlers::importacoes::baixar_relatorio,
        handlers::importacoes::enviar_email,
        handlers::importacoes::fechar_importacao,

        // --- Remessas ---
        handlers::remessas::gerar_de_grupo,
        handlers::remessas::ler_remessa,
        handlers::remessas::list_envios,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Cadastros ---
            models::empresa::Empresa,
            models::empresa::EmpresaPayload,
            models::empresa::SelecionarEmpresaPayload,
            models::empresa::SelecaoView,
            models::favorecido::Favorecido,
            models::favorecido::FavorecidoPayload,
            models::grupo::Grupo,
            models::grupo::GrupoPayload,
            models::grupo::GrupoMembro,
            models::grupo::MembroPayload,
            models::grupo::ValorMembroPayload,
            models::grupo::MembroDetalhe,

            // --- Preferências ---
            models::preferencias::PreferenceKey,
            models::preferencias::Preferencia,
            models::preferencias::PreferenciaPayload,

            // --- Importação ---
            models::importacao::RowData,
            models::importacao::CampoErro,
            models::importacao::ErrorRecord,
            models::importacao::Ordenacao,
            models::importacao::Trilho,
            models::importacao::CriarImportacaoPayload,
            models::importacao::EventoPayload,
            models::importacao::SelecaoPayload,
            models::importacao::ConfiguracaoRemessa,
            models::importacao::EmailPayload,
            models::importacao::ArquivoResumo,
            models::importacao::ImportacaoView,
            models::importacao::GerarGrupoPayload,
            services::importacao::wizard::WizardStep,
            services::importacao::wizard::WizardEvent,

            // --- Remessas ---
            models::envio::Envio,
            services::cnab::leitura::PagamentoLido,
            services::cnab::leitura::LoteLido,
            services::cnab::leitura::ArquivoLido,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Empresas", description = "Empresas pagadoras (convenentes)"),
        (name = "Favorecidos", description = "Beneficiários dos pagamentos"),
        (name = "Grupos", description = "Grupos de favorecidos com valores próprios"),
        (name = "Seleção", description = "Empresa selecionada pelo usuário"),
        (name = "Preferências", description = "Preferências de interface por usuário"),
        (name = "Importações", description = "Assistente de importação de planilhas"),
        (name = "Remessas", description = "Arquivos CNAB240 gerados, lidos e enviados")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_group_with_jwt() {
        let doc = ApiDoc::openapi();
        for path in ["/api/auth/logout", "/api/empresas/{id}", "/api/importacoes/{id}/gerar", "/api/selecao/aguardar", "/api/remessas/ler"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
