pub mod auth;
pub mod empresa;
pub mod envio;
pub mod favorecido;
pub mod grupo;
pub mod importacao;
pub mod preferencias;
pub mod validators;
