// src/services/importacao/sessoes.rs
//
// Sessões do assistente ficam só em memória; fechar a sessão descarta tudo.
// Sessões abandonadas expiram depois de `ttl` sem acesso.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{debug, info};
use uuid::Uuid;

use super::wizard::ImportWizard;

#[derive(Debug)]
struct ImportSession {
    owner: Uuid,
    wizard: ImportWizard,
    criada_em: DateTime<Utc>,
    ultimo_acesso: Instant,
}

impl ImportSession {
    fn expirada(&self, agora: Instant, ttl: Duration) -> bool {
        agora.duration_since(self.ultimo_acesso) > ttl
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    sessoes: Arc<RwLock<HashMap<Uuid, ImportSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { sessoes: Arc::default(), ttl }
    }

    pub async fn criar(&self, owner: Uuid, wizard: ImportWizard) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessoes = self.sessoes.write().await;
        Self::remover_expiradas(&mut sessoes, self.ttl);
        sessoes.insert(
            id,
            ImportSession { owner, wizard, criada_em: Utc::now(), ultimo_acesso: Instant::now() },
        );
        info!("Sessão de importação {} aberta ({} ativa(s))", id, sessoes.len());
        id
    }

    /// `None` quando a sessão não existe, expirou ou pertence a outro usuário.
    pub async fn ler<R>(&self, id: Uuid, owner: Uuid, f: impl FnOnce(&ImportWizard) -> R) -> Option<R> {
        self.alterar(id, owner, |w| f(w)).await
    }

    pub async fn alterar<R>(
        &self,
        id: Uuid,
        owner: Uuid,
        f: impl FnOnce(&mut ImportWizard) -> R,
    ) -> Option<R> {
        let mut sessoes = self.sessoes.write().await;
        let agora = Instant::now();
        if sessoes.get(&id).is_some_and(|s| s.expirada(agora, self.ttl)) {
            sessoes.remove(&id);
            debug!("Sessão {} expirada", id);
            return None;
        }
        sessoes.get_mut(&id).filter(|s| s.owner == owner).map(|s| {
            s.ultimo_acesso = agora;
            f(&mut s.wizard)
        })
    }

    pub async fn fechar(&self, id: Uuid, owner: Uuid) -> bool {
        let mut sessoes = self.sessoes.write().await;
        match sessoes.get(&id) {
            Some(s) if s.owner == owner => {
                let aberta_ha = Utc::now() - s.criada_em;
                sessoes.remove(&id);
                debug!("Sessão {} fechada após {}s", id, aberta_ha.num_seconds());
                true
            }
            _ => false,
        }
    }

    /// Descarta as sessões sem acesso há mais de `ttl`; devolve quantas saíram.
    pub async fn expurgar(&self) -> usize {
        let mut sessoes = self.sessoes.write().await;
        Self::remover_expiradas(&mut sessoes, self.ttl)
    }

    /// Limpeza periódica em segundo plano, uma passada a cada `ttl`.
    pub fn agendar_limpeza(&self) -> JoinHandle<()> {
        let store = self.clone();
        let periodo = self.ttl.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut intervalo = tokio::time::interval(periodo);
            loop {
                intervalo.tick().await;
                store.expurgar().await;
            }
        })
    }

    fn remover_expiradas(sessoes: &mut HashMap<Uuid, ImportSession>, ttl: Duration) -> usize {
        let agora = Instant::now();
        let antes = sessoes.len();
        sessoes.retain(|_, s| !s.expirada(agora, ttl));
        let removidas = antes - sessoes.len();
        if removidas > 0 {
            info!("{} sessão(ões) de importação expirada(s) descartada(s)", removidas);
        }
        removidas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::importacao::wizard::WizardStep;
    use crate::test_utils::row;

    #[tokio::test]
    async fn sessions_are_only_visible_to_their_owner() {
        let store = SessionStore::new(Duration::from_secs(60));
        let dono = Uuid::new_v4();
        let outro = Uuid::new_v4();
        let id = store.criar(dono, ImportWizard::new()).await;

        assert_eq!(store.ler(id, dono, |w| w.etapa()).await, Some(WizardStep::Upload));
        assert_eq!(store.ler(id, outro, |w| w.etapa()).await, None);
        assert!(store.alterar(id, outro, |w| w.carregar(vec![])).await.is_none());
        assert!(!store.fechar(id, outro).await);

        let carregado = store
            .alterar(id, dono, |w| w.carregar(vec![row(1, "Ana", "001", "1")]))
            .await;
        assert_eq!(carregado, Some(Ok(())));

        assert!(store.fechar(id, dono).await);
        assert_eq!(store.ler(id, dono, |w| w.linhas().len()).await, None);
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::new(Duration::from_millis(20));
        let dono = Uuid::new_v4();
        let antiga = store.criar(dono, ImportWizard::new()).await;
        let abandonada = store.criar(dono, ImportWizard::new()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.ler(antiga, dono, |w| w.etapa()).await, None);

        let nova = store.criar(dono, ImportWizard::new()).await;
        assert_eq!(store.sessoes.read().await.len(), 1);
        assert!(!store.sessoes.read().await.contains_key(&abandonada));
        assert!(store.ler(nova, dono, |w| w.etapa()).await.is_some());
    }

    #[tokio::test]
    async fn access_keeps_a_session_alive_and_sweep_removes_the_rest() {
        let store = SessionStore::new(Duration::from_millis(200));
        let dono = Uuid::new_v4();
        let usada = store.criar(dono, ImportWizard::new()).await;
        let parada = store.criar(dono, ImportWizard::new()).await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.ler(usada, dono, |w| w.etapa()).await.is_some());
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(store.expurgar().await, 1);
        assert!(store.ler(usada, dono, |w| w.etapa()).await.is_some());
        assert_eq!(store.ler(parada, dono, |w| w.etapa()).await, None);
    }
}
