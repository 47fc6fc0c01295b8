pub mod user_repo;
pub use user_repo::UserRepository;
pub mod empresa_repo;
pub use empresa_repo::EmpresaRepository;
pub mod favorecido_repo;
pub use favorecido_repo::FavorecidoRepository;
pub mod grupo_repo;
pub use grupo_repo::GrupoRepository;
pub mod preferencias_repo;
pub use preferencias_repo::PreferenciasRepository;
pub mod envio_repo;
pub use envio_repo::EnvioRepository;
