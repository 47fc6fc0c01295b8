// src/services/selecao.rs
//
// Empresa selecionada por usuário. A seleção fica em cache nas preferências e é
// distribuída para os interessados por um canal `watch`.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PreferenciasRepository,
    models::{empresa::Empresa, preferencias::PreferenceKey},
};

/// Onde as preferências ficam guardadas.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self, user_id: Uuid, key: PreferenceKey) -> Result<Option<Value>, AppError>;
    async fn save(&self, user_id: Uuid, key: PreferenceKey, value: &Value) -> Result<(), AppError>;
    async fn remove(&self, user_id: Uuid, key: PreferenceKey) -> Result<(), AppError>;
}

#[async_trait]
impl PreferenceStore for PreferenciasRepository {
    async fn load(&self, user_id: Uuid, key: PreferenceKey) -> Result<Option<Value>, AppError> {
        self.get(user_id, key).await
    }

    async fn save(&self, user_id: Uuid, key: PreferenceKey, value: &Value) -> Result<(), AppError> {
        self.set(user_id, key, value).await
    }

    async fn remove(&self, user_id: Uuid, key: PreferenceKey) -> Result<(), AppError> {
        PreferenciasRepository::remove(self, user_id, key).await.map(|_| ())
    }
}

pub struct CompanySelection {
    user_id: Uuid,
    store: Arc<dyn PreferenceStore>,
    tx: watch::Sender<Option<Empresa>>,
}

impl CompanySelection {
    pub fn new(user_id: Uuid, store: Arc<dyn PreferenceStore>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { user_id, store, tx }
    }

    /// Carrega a seleção guardada. Um valor ilegível é descartado.
    pub async fn init(&self) -> Result<Option<Empresa>, AppError> {
        let cached = self
            .store
            .load(self.user_id, PreferenceKey::EmpresaSelecionada)
            .await?;

        let empresa = match cached {
            Some(value) => match serde_json::from_value::<Empresa>(value) {
                Ok(empresa) => Some(empresa),
                Err(e) => {
                    warn!("Seleção de empresa ilegível para o usuário {}: {}", self.user_id, e);
                    None
                }
            },
            None => None,
        };

        self.tx.send_replace(empresa.clone());
        Ok(empresa)
    }

    pub fn current(&self) -> Option<Empresa> {
        self.tx.borrow().clone()
    }

    pub async fn select(&self, empresa: Empresa) -> Result<(), AppError> {
        let value = serde_json::to_value(&empresa)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar a empresa selecionada: {}", e))?;
        self.store
            .save(self.user_id, PreferenceKey::EmpresaSelecionada, &value)
            .await?;
        debug!("Usuário {} selecionou a empresa {}", self.user_id, empresa.id);
        self.tx.send_replace(Some(empresa));
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        self.store
            .remove(self.user_id, PreferenceKey::EmpresaSelecionada)
            .await?;
        self.tx.send_replace(None);
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Empresa>> {
        self.tx.subscribe()
    }

    /// Encerra o canal: quem estiver esperando recebe o fechamento.
    pub fn dispose(self) {
        debug!("Seleção do usuário {} encerrada", self.user_id);
    }
}

// Uma seleção por usuário, criada na primeira consulta
pub struct SelectionHub {
    store: Arc<dyn PreferenceStore>,
    selecoes: RwLock<HashMap<Uuid, Arc<CompanySelection>>>,
}

impl SelectionHub {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store, selecoes: RwLock::new(HashMap::new()) }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Arc<CompanySelection>, AppError> {
        if let Some(selecao) = self.selecoes.read().await.get(&user_id) {
            return Ok(selecao.clone());
        }

        let mut selecoes = self.selecoes.write().await;
        if let Some(selecao) = selecoes.get(&user_id) {
            return Ok(selecao.clone());
        }
        let selecao = Arc::new(CompanySelection::new(user_id, self.store.clone()));
        selecao.init().await?;
        selecoes.insert(user_id, selecao.clone());
        info!("Seleção de empresa carregada para o usuário {}", user_id);
        Ok(selecao)
    }

    /// Espera a próxima mudança. `None` quando o tempo acaba ou o canal é fechado.
    pub async fn aguardar_mudanca(
        &self,
        user_id: Uuid,
        timeout: Duration,
    ) -> Result<Option<Option<Empresa>>, AppError> {
        let mut rx = self.get(user_id).await?.subscribe();
        match tokio::time::timeout(timeout, rx.changed()).await {
            Ok(Ok(())) => Ok(Some(rx.borrow_and_update().clone())),
            _ => Ok(None),
        }
    }

    /// Descarta a seleção do usuário (logout). A próxima consulta recarrega do armazenamento.
    pub async fn dispose(&self, user_id: Uuid) {
        let removida = self.selecoes.write().await.remove(&user_id);
        if let Some(selecao) = removida {
            info!("Seleção de empresa descartada para o usuário {}", user_id);
            // Handles ainda em uso fecham o canal quando forem soltos
            if let Ok(selecao) = Arc::try_unwrap(selecao) {
                selecao.dispose();
            }
        }
    }
}

#[cfg(test)]
pub mod memoria {
    use super::*;

    // Armazenamento em memória para os testes
    #[derive(Default)]
    pub struct MemoryPreferenceStore {
        valores: RwLock<HashMap<(Uuid, PreferenceKey), Value>>,
    }

    #[async_trait]
    impl PreferenceStore for MemoryPreferenceStore {
        async fn load(&self, user_id: Uuid, key: PreferenceKey) -> Result<Option<Value>, AppError> {
            Ok(self.valores.read().await.get(&(user_id, key)).cloned())
        }

        async fn save(&self, user_id: Uuid, key: PreferenceKey, value: &Value) -> Result<(), AppError> {
            self.valores.write().await.insert((user_id, key), value.clone());
            Ok(())
        }

        async fn remove(&self, user_id: Uuid, key: PreferenceKey) -> Result<(), AppError> {
            self.valores.write().await.remove(&(user_id, key));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memoria::MemoryPreferenceStore;
    use super::*;
    use crate::test_utils::empresa;

    #[tokio::test]
    async fn selection_survives_a_reload() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferenceStore::default());
        let user = Uuid::new_v4();

        let selecao = CompanySelection::new(user, store.clone());
        assert_eq!(selecao.init().await.unwrap(), None);
        let escolhida = empresa("Acme Ltda");
        selecao.select(escolhida.clone()).await.unwrap();
        selecao.dispose();

        // "recarregar a página": nova instância sobre o mesmo armazenamento
        let recarregada = CompanySelection::new(user, store.clone());
        assert_eq!(recarregada.init().await.unwrap(), Some(escolhida.clone()));
        assert_eq!(recarregada.current(), Some(escolhida));

        // outro usuário não enxerga a seleção
        let outro = CompanySelection::new(Uuid::new_v4(), store);
        assert_eq!(outro.init().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_and_notifies_none() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferenceStore::default());
        let user = Uuid::new_v4();
        let selecao = CompanySelection::new(user, store.clone());
        selecao.init().await.unwrap();
        selecao.select(empresa("Acme Ltda")).await.unwrap();

        let mut rx = selecao.subscribe();
        selecao.clear().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);

        assert_eq!(store.load(user, PreferenceKey::EmpresaSelecionada).await.unwrap(), None);
    }

    #[tokio::test]
    async fn subscribers_see_closed_channel_after_dispose() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferenceStore::default());
        let selecao = CompanySelection::new(Uuid::new_v4(), store);
        let mut rx = selecao.subscribe();
        selecao.dispose();
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test]
    async fn hub_long_poll_returns_next_change_or_times_out() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferenceStore::default());
        let hub = Arc::new(SelectionHub::new(store));
        let user = Uuid::new_v4();

        let espera = hub.aguardar_mudanca(user, Duration::from_millis(20)).await.unwrap();
        assert_eq!(espera, None);

        let hub2 = hub.clone();
        let aguardando = tokio::spawn(async move {
            hub2.aguardar_mudanca(user, Duration::from_secs(5)).await.unwrap()
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let escolhida = empresa("Beta SA");
        hub.get(user).await.unwrap().select(escolhida.clone()).await.unwrap();

        assert_eq!(aguardando.await.unwrap(), Some(Some(escolhida)));
    }

    #[tokio::test]
    async fn hub_dispose_releases_waiters_and_reloads_later() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferenceStore::default());
        let hub = Arc::new(SelectionHub::new(store));
        let user = Uuid::new_v4();
        let escolhida = empresa("Gama ME");
        hub.get(user).await.unwrap().select(escolhida.clone()).await.unwrap();

        let hub2 = hub.clone();
        let aguardando = tokio::spawn(async move {
            hub2.aguardar_mudanca(user, Duration::from_secs(5)).await.unwrap()
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        hub.dispose(user).await;

        let inicio = std::time::Instant::now();
        assert_eq!(aguardando.await.unwrap(), None);
        assert!(inicio.elapsed() < Duration::from_secs(1));
        assert!(!hub.selecoes.read().await.contains_key(&user));

        assert_eq!(hub.get(user).await.unwrap().current(), Some(escolhida));
    }
}
