use crate::actions::bootstrap::BootstrapGate;
use crate::config::AppConfig;
use crate::effects::{
    Connectivity, CredentialStore, HttpGateway, Keybindings, Notifier, Realtime, Transport,
    UserApi, WorkspaceApi,
};
use crate::error::EffectError;
use crate::modal::AppModals;
use crate::state::Store;
use std::sync::Arc;

/// Bundle of side-effect implementations injected into actions.
#[derive(Clone)]
pub struct Effects {
    pub auth: Arc<dyn CredentialStore>,
    pub api: Arc<dyn UserApi>,
    pub connectivity: Arc<dyn Connectivity>,
    pub realtime: Arc<dyn Realtime>,
    pub transport: Arc<dyn Transport>,
    pub keybindings: Arc<dyn Keybindings>,
    pub notifier: Arc<dyn Notifier>,
    pub http: Arc<dyn HttpGateway>,
    pub workspace: Arc<dyn WorkspaceApi>,
}

#[async_trait::async_trait]
pub trait EffectsFactory: Send + Sync {
    async fn build_effects(&self, cfg: &AppConfig) -> Result<Effects, EffectError>;
}

/// Everything an action needs: configuration, the store, the modal registry
/// and the effect seams. Cheap to clone; all handles are shared.
#[derive(Clone)]
pub struct Context {
    cfg: Arc<AppConfig>,
    store: Store,
    modals: Arc<AppModals>,
    effects: Effects,
    gate: Arc<BootstrapGate>,
}

impl Context {
    pub fn new(cfg: AppConfig, effects: Effects) -> Self {
        let store = Store::new();
        let modals = Arc::new(AppModals::new(store.clone()));
        Self {
            cfg: Arc::new(cfg),
            store,
            modals,
            effects,
            gate: Arc::new(BootstrapGate::new()),
        }
    }

    pub async fn from_factory(
        cfg: AppConfig,
        factory: &dyn EffectsFactory,
    ) -> Result<Self, EffectError> {
        let effects = factory.build_effects(&cfg).await?;
        Ok(Self::new(cfg, effects))
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn modals(&self) -> &AppModals {
        &self.modals
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub(crate) fn gate(&self) -> &BootstrapGate {
        &self.gate
    }
}
