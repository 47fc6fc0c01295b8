// src/config/settings.rs

use std::{env, time::Duration};

use anyhow::Context;

// Configuração lida do ambiente (e do .env, se existir)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub fonts_dir: String,
    pub selecao_timeout: Duration,
    // Sessões do assistente sem uso por mais que isso são descartadas
    pub importacao_ttl: Duration,
}

fn opcional(nome: &str, padrao: &str) -> String {
    env::var(nome).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| padrao.to_string())
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|nome| env::var(nome).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |nome: &str, padrao: &str| {
            lookup(nome).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| padrao.to_string())
        };

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let db_max_connections = get("DB_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS deve ser um número")?;
        let selecao_timeout = get("SELECAO_TIMEOUT_SECS", "25")
            .parse::<u64>()
            .context("SELECAO_TIMEOUT_SECS deve ser um número")?;
        let importacao_ttl = get("IMPORTACAO_TTL_SECS", "3600")
            .parse::<u64>()
            .context("IMPORTACAO_TTL_SECS deve ser um número")?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: get("BIND_ADDR", "0.0.0.0:3000"),
            db_max_connections,
            fonts_dir: get("FONTS_DIR", "./fonts"),
            selecao_timeout: Duration::from_secs(selecao_timeout),
            importacao_ttl: Duration::from_secs(importacao_ttl),
        })
    }
}

/// Filtro de log padrão quando RUST_LOG não está definido.
pub fn log_filter() -> String {
    opcional("RUST_LOG", "info")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|nome| vars.get(nome).cloned())
    }

    #[test]
    fn applies_defaults() {
        let s = settings(&[("DATABASE_URL", "postgres://localhost/remessa"), ("JWT_SECRET", "x")]).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:3000");
        assert_eq!(s.db_max_connections, 5);
        assert_eq!(s.fonts_dir, "./fonts");
        assert_eq!(s.selecao_timeout, Duration::from_secs(25));
        assert_eq!(s.importacao_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn reads_session_ttl() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "x"),
            ("IMPORTACAO_TTL_SECS", "600"),
        ])
        .unwrap();
        assert_eq!(s.importacao_ttl, Duration::from_secs(600));
        assert!(settings(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "x"),
            ("IMPORTACAO_TTL_SECS", "uma hora"),
        ])
        .is_err());
    }

    #[test]
    fn requires_database_and_secret() {
        let err = settings(&[("JWT_SECRET", "x")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
        assert!(settings(&[("DATABASE_URL", "postgres://x")]).is_err());
        assert!(settings(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "x"),
            ("DB_MAX_CONNECTIONS", "muitas"),
        ])
        .is_err());
    }
}
