//! Builds and bundles the production effects from configuration, for the CLI
//! (and any other embedder) to reuse.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use atelier_core::api::{
    get_credential_file_path, ApiConfig, AppConfig, EffectError, Effects, EffectsFactory,
};

use crate::api::HttpApi;
use crate::auth::FileCredentialStore;
use crate::connectivity::ManualConnectivity;
use crate::http::JsonHttpGateway;
use crate::keybindings::KeybindingEngine;
use crate::notifier::ChannelNotifier;
use crate::realtime::LocalRealtime;
use crate::transport::LocalTransport;

pub fn build_credential_store(cfg: &AppConfig) -> Result<FileCredentialStore, EffectError> {
    let path = match &cfg.auth.credential_path {
        Some(path) => PathBuf::from(path),
        None => get_credential_file_path()?,
    };
    Ok(FileCredentialStore::new(path))
}

pub fn build_api(cfg: &ApiConfig) -> Result<HttpApi, EffectError> {
    HttpApi::new(cfg)
}

pub fn build_http_gateway(cfg: &ApiConfig) -> Result<JsonHttpGateway, EffectError> {
    JsonHttpGateway::new(cfg.timeout_ms)
}

/// Production factory.
///
/// The connectivity reporter, the transport bus and the notification channel
/// are built up front so the embedder keeps handles to drive and observe
/// them; `build_effects` assembles the rest from configuration.
pub struct DefaultEffectsFactory {
    connectivity: Arc<ManualConnectivity>,
    transport: Arc<LocalTransport>,
    notifier: Arc<ChannelNotifier>,
}

impl DefaultEffectsFactory {
    /// Returns the factory and the stream of user-facing error messages.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (notifier, notifications) = ChannelNotifier::new();
        (
            Self {
                connectivity: Arc::new(ManualConnectivity::new()),
                transport: Arc::new(LocalTransport::new()),
                notifier: Arc::new(notifier),
            },
            notifications,
        )
    }

    pub fn connectivity(&self) -> Arc<ManualConnectivity> {
        self.connectivity.clone()
    }

    pub fn transport(&self) -> Arc<LocalTransport> {
        self.transport.clone()
    }
}

#[async_trait]
impl EffectsFactory for DefaultEffectsFactory {
    async fn build_effects(&self, cfg: &AppConfig) -> Result<Effects, EffectError> {
        let api = Arc::new(build_api(&cfg.api)?);
        Ok(Effects {
            auth: Arc::new(build_credential_store(cfg)?),
            api: api.clone(),
            connectivity: self.connectivity.clone(),
            realtime: Arc::new(LocalRealtime::new()),
            transport: self.transport.clone(),
            keybindings: Arc::new(KeybindingEngine::new()),
            notifier: self.notifier.clone(),
            http: Arc::new(build_http_gateway(&cfg.api)?),
            workspace: api,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::api::{AuthConfig, Transport};

    #[tokio::test]
    async fn test_factory_assembles_a_full_effect_set() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig {
            auth: AuthConfig {
                credential_path: Some(
                    dir.path().join("credential").to_string_lossy().into_owned(),
                ),
            },
            ..AppConfig::default()
        };

        let (factory, _notifications) = DefaultEffectsFactory::new();
        let effects = factory.build_effects(&cfg).await.unwrap();

        // The factory hands out the same bus it wired into the effect set.
        factory.transport().listen(Box::new(|_| {}));
        assert_eq!(factory.transport().listener_count(), 1);
        assert!(effects.auth.get().await.unwrap().is_none());
    }
}
