pub mod auth;
pub mod empresas;
pub mod favorecidos;
pub mod grupos;
pub mod importacoes;
pub mod preferencias;
pub mod remessas;
pub mod selecao;
