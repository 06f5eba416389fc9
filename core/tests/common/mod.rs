#![allow(dead_code)]

//! Shared stub effects for integration tests.
//!
//! Every stub records its invocations so tests can assert on call counts and
//! ordering without real IO.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use atelier_core::api::{
    AppConfig, AppState, AuthToken, BootstrapConfig, Connectivity, ConnectivityListener, Context,
    CredentialStore, EffectError, Effects, HttpGateway, Keybinding, Keybindings, Notifier,
    Privacy, Realtime, Store, Subscription, Transport, TransportListener, TransportMessage, User,
    UserApi, Workspace, WorkspaceApi, WorkspaceId,
};

/// Ordered record of effect invocations, for sequencing assertions.
#[derive(Clone, Default)]
pub struct Trace {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Trace {
    pub fn push(&self, label: &str) {
        self.entries.lock().unwrap().push(label.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == label)
    }
}

pub struct StubAuth {
    trace: Trace,
    pub token: Mutex<Option<AuthToken>>,
    pub resets: AtomicUsize,
    pub fail_get: AtomicBool,
}

impl StubAuth {
    fn new(trace: Trace) -> Self {
        Self {
            trace,
            token: Mutex::new(None),
            resets: AtomicUsize::new(0),
            fail_get: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for StubAuth {
    async fn get(&self) -> Result<Option<AuthToken>, EffectError> {
        self.trace.push("auth.get");
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(EffectError::Other(anyhow::anyhow!(
                "credential store offline"
            )));
        }
        Ok(self.token.lock().unwrap().clone())
    }

    async fn reset(&self) -> Result<(), EffectError> {
        self.trace.push("auth.reset");
        self.resets.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

pub struct StubUserApi {
    trace: Trace,
    store: Mutex<Option<Store>>,
    pub user: Mutex<Option<User>>,
    pub delay: Mutex<Option<Duration>>,
    pub user_fetches: AtomicUsize,
    pub template_preloads: AtomicUsize,
    /// `shell.is_authenticating` as seen at fetch time.
    pub observed_authenticating: Mutex<Option<bool>>,
}

impl StubUserApi {
    fn new(trace: Trace) -> Self {
        Self {
            trace,
            store: Mutex::new(None),
            user: Mutex::new(None),
            delay: Mutex::new(None),
            user_fetches: AtomicUsize::new(0),
            template_preloads: AtomicUsize::new(0),
            observed_authenticating: Mutex::new(None),
        }
    }

    fn attach_store(&self, store: Store) {
        *self.store.lock().unwrap() = Some(store);
    }
}

#[async_trait::async_trait]
impl UserApi for StubUserApi {
    async fn get_current_user(&self, _token: &AuthToken) -> Result<User, EffectError> {
        self.trace.push("api.me");
        self.user_fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let store = self.store.lock().unwrap().clone();
        if let Some(store) = store {
            let snapshot = store.snapshot().await;
            *self.observed_authenticating.lock().unwrap() = Some(snapshot.shell.is_authenticating);
        }

        let user = self.user.lock().unwrap().clone();
        match user {
            Some(user) => Ok(user),
            None => Err(EffectError::Unauthorized),
        }
    }

    async fn preload_templates(&self) {
        self.trace.push("api.preload_templates");
        self.template_preloads.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct StubConnectivity {
    listeners: Mutex<Vec<Arc<ConnectivityListener>>>,
}

impl StubConnectivity {
    /// Deliver a connectivity flip to every registered listener.
    pub fn fire(&self, connected: bool) {
        let listeners: Vec<_> = self.listeners.lock().unwrap().iter().cloned().collect();
        for listener in listeners {
            listener(connected);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl Connectivity for StubConnectivity {
    fn add_listener(&self, listener: ConnectivityListener) {
        self.listeners.lock().unwrap().push(Arc::new(listener));
    }
}

pub struct StubRealtime {
    trace: Trace,
    pub connects: AtomicUsize,
}

impl StubRealtime {
    fn new(trace: Trace) -> Self {
        Self {
            trace,
            connects: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Realtime for StubRealtime {
    async fn connect(&self) -> Result<(), EffectError> {
        self.trace.push("realtime.connect");
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct StubTransport {
    listeners: Mutex<Vec<Arc<TransportListener>>>,
}

impl StubTransport {
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl Transport for StubTransport {
    fn listen(&self, listener: TransportListener) {
        self.listeners.lock().unwrap().push(Arc::new(listener));
    }

    fn publish(&self, message: TransportMessage) {
        let listeners: Vec<_> = self.listeners.lock().unwrap().iter().cloned().collect();
        for listener in listeners {
            listener(message.clone());
        }
    }
}

pub struct StubKeybindings {
    trace: Trace,
    pub set_calls: AtomicUsize,
    pub started: AtomicBool,
    pub last: Mutex<Vec<Keybinding>>,
}

impl StubKeybindings {
    fn new(trace: Trace) -> Self {
        Self {
            trace,
            set_calls: AtomicUsize::new(0),
            started: AtomicBool::new(false),
            last: Mutex::new(Vec::new()),
        }
    }
}

impl Keybindings for StubKeybindings {
    fn set(&self, bindings: Vec<Keybinding>) {
        self.trace.push("keybindings.set");
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = bindings;
    }

    fn start(&self) {
        self.trace.push("keybindings.start");
        self.started.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct StubNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl Notifier for StubNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub struct StubHttp {
    trace: Trace,
    store: Mutex<Option<Store>>,
    pub response: Mutex<Option<serde_json::Value>>,
    pub requests: AtomicUsize,
    /// `shell.has_loaded_app` as seen at fetch time.
    pub observed_loaded: Mutex<Option<bool>>,
}

impl StubHttp {
    fn new(trace: Trace) -> Self {
        Self {
            trace,
            store: Mutex::new(None),
            response: Mutex::new(Some(serde_json::json!({
                "contributors": [
                    { "login": "ada" },
                    { "login": "grace" },
                ]
            }))),
            requests: AtomicUsize::new(0),
            observed_loaded: Mutex::new(None),
        }
    }

    fn attach_store(&self, store: Store) {
        *self.store.lock().unwrap() = Some(store);
    }
}

#[async_trait::async_trait]
impl HttpGateway for StubHttp {
    async fn get_json(&self, _url: &str) -> Result<serde_json::Value, EffectError> {
        self.trace.push("http.get_json");
        self.requests.fetch_add(1, Ordering::SeqCst);

        let store = self.store.lock().unwrap().clone();
        if let Some(store) = store {
            let snapshot = store.snapshot().await;
            *self.observed_loaded.lock().unwrap() = Some(snapshot.shell.has_loaded_app);
        }

        let response = self.response.lock().unwrap().clone();
        match response {
            Some(doc) => Ok(doc),
            None => Err(EffectError::Http(404)),
        }
    }
}

pub struct StubWorkspaceApi {
    trace: Trace,
    pub forks: AtomicUsize,
    pub fail: AtomicBool,
    pub delay: Mutex<Option<Duration>>,
}

impl StubWorkspaceApi {
    fn new(trace: Trace) -> Self {
        Self {
            trace,
            forks: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            delay: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl WorkspaceApi for StubWorkspaceApi {
    async fn fork(&self, id: &WorkspaceId) -> Result<Workspace, EffectError> {
        self.trace.push("workspace.fork");
        self.forks.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(EffectError::Http(500));
        }
        Ok(Workspace {
            id: WorkspaceId(format!("fork-of-{id}")),
            name: "forked".to_string(),
            privacy: Privacy::Public,
            owned: true,
            frozen: false,
        })
    }
}

/// The full stub suite plus the shared invocation trace.
pub struct StubSet {
    pub trace: Trace,
    pub auth: Arc<StubAuth>,
    pub api: Arc<StubUserApi>,
    pub connectivity: Arc<StubConnectivity>,
    pub realtime: Arc<StubRealtime>,
    pub transport: Arc<StubTransport>,
    pub keybindings: Arc<StubKeybindings>,
    pub notifier: Arc<StubNotifier>,
    pub http: Arc<StubHttp>,
    pub workspace: Arc<StubWorkspaceApi>,
}

impl StubSet {
    pub fn new() -> Self {
        let trace = Trace::default();
        Self {
            auth: Arc::new(StubAuth::new(trace.clone())),
            api: Arc::new(StubUserApi::new(trace.clone())),
            connectivity: Arc::new(StubConnectivity::default()),
            realtime: Arc::new(StubRealtime::new(trace.clone())),
            transport: Arc::new(StubTransport::default()),
            keybindings: Arc::new(StubKeybindings::new(trace.clone())),
            notifier: Arc::new(StubNotifier::default()),
            http: Arc::new(StubHttp::new(trace.clone())),
            workspace: Arc::new(StubWorkspaceApi::new(trace.clone())),
            trace,
        }
    }

    /// Store a credential so startup takes the authenticated path.
    pub fn with_token(self, token: &str) -> Self {
        *self.auth.token.lock().unwrap() = Some(AuthToken::new(token));
        self
    }

    /// Answer identity lookups with `user` instead of rejecting them.
    pub fn with_user(self, user: User) -> Self {
        *self.api.user.lock().unwrap() = Some(user);
        self
    }

    pub fn effects(&self) -> Effects {
        Effects {
            auth: self.auth.clone(),
            api: self.api.clone(),
            connectivity: self.connectivity.clone(),
            realtime: self.realtime.clone(),
            transport: self.transport.clone(),
            keybindings: self.keybindings.clone(),
            notifier: self.notifier.clone(),
            http: self.http.clone(),
            workspace: self.workspace.clone(),
        }
    }

    /// Build a context over the stubs and wire the state-observing stubs to
    /// its store.
    pub fn context(&self) -> Context {
        let ctx = Context::new(test_config(), self.effects());
        self.api.attach_store(ctx.store().clone());
        self.http.attach_store(ctx.store().clone());
        ctx
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        bootstrap: BootstrapConfig {
            contributors_url: "stub://contributors".to_string(),
        },
        ..AppConfig::default()
    }
}

pub fn sample_user(subscribed: bool) -> User {
    User {
        id: "u-1".to_string(),
        username: "ada".to_string(),
        subscription: subscribed.then_some(Subscription { amount_cents: 900 }),
    }
}

pub fn sample_workspace(owned: bool, frozen: bool) -> Workspace {
    Workspace {
        id: WorkspaceId("ws-1".to_string()),
        name: "sketchbook".to_string(),
        privacy: Privacy::Public,
        owned,
        frozen,
    }
}

/// Poll `condition` until it holds or a second has passed.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 1s");
}

/// Poll the store until `predicate` holds for a snapshot.
pub async fn wait_for_state<F>(ctx: &Context, predicate: F)
where
    F: Fn(&AppState) -> bool,
{
    for _ in 0..200 {
        if predicate(&ctx.store().snapshot().await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("state condition not met within 1s");
}
