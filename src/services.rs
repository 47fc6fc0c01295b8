pub mod auth;
pub mod cnab;
pub mod empresa_service;
pub mod envio_service;
pub mod favorecido_service;
pub mod grupo_service;
pub mod importacao;
pub mod preferencias_service;
pub mod relatorio_service;
pub mod remessa_service;
pub mod selecao;
