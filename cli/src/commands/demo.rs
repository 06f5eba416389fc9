//! `demo` command: narrated walkthrough of startup gating, ownership guards
//! and dialog round-trips, driven against scripted in-process effects.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use atelier_core::api::{
    bootstrap, with_bootstrap_gate, with_ownership_guard, workspace, ActionError, AppConfig,
    AuthToken, CliError, Context, CredentialStore, EffectError, Effects, FrozenChoice,
    HttpGateway, Privacy, RenameOutcome, StateEvent, Store, Subscription, Transport,
    TransportMessage, User, UserApi, Workspace, WorkspaceApi, WorkspaceId,
};
use atelier_effects::connectivity::ManualConnectivity;
use atelier_effects::keybindings::KeybindingEngine;
use atelier_effects::notifier::ChannelNotifier;
use atelier_effects::realtime::LocalRealtime;
use atelier_effects::transport::LocalTransport;

use super::cli::DemoArgs;

/// The only credential the scripted API recognises; anything else is treated
/// as expired.
const DEMO_TOKEN: &str = "demo-token";

pub async fn run(args: DemoArgs, cfg: AppConfig) -> Result<i32, CliError> {
    let auth = Arc::new(ScriptedCredentials::new(if args.anonymous {
        None
    } else {
        Some(args.token.as_deref().unwrap_or(DEMO_TOKEN))
    }));
    let api = Arc::new(ScriptedApi::default());
    let connectivity = Arc::new(ManualConnectivity::new());
    let transport = Arc::new(LocalTransport::new());
    let (notifier, notifications) = ChannelNotifier::new();

    let effects = Effects {
        auth: auth.clone(),
        api: api.clone(),
        connectivity: connectivity.clone(),
        realtime: Arc::new(LocalRealtime::new()),
        transport: transport.clone(),
        keybindings: Arc::new(KeybindingEngine::new()),
        notifier: Arc::new(notifier),
        http: Arc::new(ScriptedRoster),
        workspace: api.clone(),
    };
    let ctx = Context::new(cfg, effects);

    println!("atelier demo · scripted effects, real orchestration");
    print_events(ctx.store());
    print_notifications(notifications);

    println!("\n[1] Startup, triggered from three entrypoints at once");
    let mut entrypoints = Vec::new();
    for label in ["editor", "dashboard", "deep-link"] {
        let ctx = ctx.clone();
        entrypoints.push(tokio::spawn(async move {
            with_bootstrap_gate(&ctx, label, |_, label| async move {
                println!("    ✓ continuation for the {label} entrypoint ran");
                Ok::<(), ActionError>(())
            })
            .await
        }));
    }
    for task in entrypoints {
        join(task.await)??;
    }
    println!(
        "    credential loaded {} time(s), identity fetched {} time(s)",
        auth.loads.load(Ordering::SeqCst),
        api.me_calls.load(Ordering::SeqCst),
    );

    println!("\n[2] A later startup call goes straight to its continuation");
    bootstrap::bootstrap(&ctx).await?;
    println!(
        "    credential still loaded {} time(s)",
        auth.loads.load(Ordering::SeqCst)
    );

    println!("\n[3] Guarded edit of a workspace somebody else owns");
    workspace::open(&ctx, community_workspace()).await?;
    with_ownership_guard(&ctx, Privacy::Unlisted, |ctx, privacy| async move {
        workspace::set_privacy(&ctx, privacy).await?;
        Ok(())
    })
    .await?;
    let ws = current_workspace(&ctx).await?;
    println!(
        "    ✓ the guard forked first: now editing {} (owned: {}, privacy: {:?})",
        ws.id, ws.owned, ws.privacy
    );

    println!("\n[4] Frozen workspace: the dialog decides");
    workspace::open(&ctx, frozen_workspace()).await?;

    let dismiss = answer_frozen_dialog(&ctx, None);
    let edited = with_ownership_guard(&ctx, (), |ctx, ()| async move {
        workspace::set_privacy(&ctx, Privacy::Private).await?;
        Ok(Some(()))
    })
    .await?;
    join(dismiss.await)?;
    println!(
        "    dismissing the dialog cancels the edit (edit ran: {})",
        edited.is_some()
    );

    let unfreeze = answer_frozen_dialog(&ctx, Some(FrozenChoice::Unfreeze));
    let edited = with_ownership_guard(&ctx, (), |ctx, ()| async move {
        workspace::set_privacy(&ctx, Privacy::Private).await?;
        Ok(Some(()))
    })
    .await?;
    join(unfreeze.await)?;
    let ws = current_workspace(&ctx).await?;
    println!(
        "    ✓ unfreezing lifted the restriction for this session (edit ran: {}, privacy: {:?})",
        edited.is_some(),
        ws.privacy
    );

    println!("\n[5] Rename dialog round-trip");
    let submit = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            wait_for(|| ctx.modals().rename_workspace.is_current()).await;
            let prefill = ctx.modals().rename_workspace.state().name;
            println!("    dialog opened pre-filled with '{prefill}'");
            ctx.modals().rename_workspace.close_with(RenameOutcome {
                name: Some(format!("{prefill} (spring cleanup)")),
            });
        })
    };
    workspace::rename(&ctx).await?;
    join(submit.await)?;
    let ws = current_workspace(&ctx).await?;
    println!("    ✓ workspace is now named '{}'", ws.name);

    println!("\n[6] Listeners installed at startup keep working");
    connectivity.set_online(false);
    connectivity.set_online(true);
    transport.publish(TransportMessage::new(
        "notification",
        serde_json::json!({ "title": "Welcome back" }),
    ));
    // Listener dispatches hop through spawned tasks; let them settle.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = ctx.store().snapshot().await;
    println!(
        "    connected: {}, unread notifications: {}{}",
        state.shell.connected,
        state.session.unread_notifications,
        if state.session.signed_in {
            ""
        } else {
            " (anonymous sessions receive none)"
        }
    );

    println!(
        "\nFinal state: loaded={} signed_in={} plan={:?} contributors={:?}",
        state.shell.has_loaded_app,
        state.session.signed_in,
        state.session.plan,
        state.shell.contributors,
    );
    Ok(0)
}

/// Print store events as they happen, interleaved with the walkthrough.
fn print_events(store: &Store) {
    let mut events = store.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StateEvent::BootstrapStarted { .. } => println!("    · startup began"),
                StateEvent::BootstrapFinished { .. } => println!("    · startup finished"),
                StateEvent::SessionExpired { .. } => println!("    · stored session expired"),
                StateEvent::ConnectionChanged { connected, .. } => {
                    println!("    · connectivity → {}", if connected { "online" } else { "offline" });
                }
                StateEvent::WorkspaceForked { workspace_id, .. } => {
                    println!("    · workspace forked → {workspace_id}");
                }
                StateEvent::ModalOpened { name, .. } => println!("    · dialog opened: {name}"),
                StateEvent::ModalClosed { name, .. } => println!("    · dialog closed: {name}"),
            }
        }
    });
}

fn print_notifications(mut notifications: mpsc::UnboundedReceiver<String>) {
    tokio::spawn(async move {
        while let Some(message) = notifications.recv().await {
            println!("    ! {message}");
        }
    });
}

/// Play the user: wait for the frozen dialog, then answer it. `None` dismisses
/// the dialog, which resolves to the Cancel default.
fn answer_frozen_dialog(ctx: &Context, choice: Option<FrozenChoice>) -> JoinHandle<()> {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        wait_for(|| ctx.modals().fork_frozen.is_current()).await;
        match choice {
            Some(choice) => ctx.modals().fork_frozen.close_with(choice),
            None => ctx.modals().fork_frozen.close(),
        }
    })
}

async fn wait_for<F: FnMut() -> bool>(mut condition: F) {
    while !condition() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn join<T>(result: Result<T, tokio::task::JoinError>) -> Result<T, CliError> {
    result.map_err(|e| CliError::Anyhow(e.into()))
}

async fn current_workspace(ctx: &Context) -> Result<Workspace, CliError> {
    ctx.store()
        .snapshot()
        .await
        .workspace
        .current
        .ok_or(CliError::Action(ActionError::NoWorkspace))
}

fn community_workspace() -> Workspace {
    Workspace {
        id: WorkspaceId("ws-community".to_string()),
        name: "community-sketch".to_string(),
        privacy: Privacy::Public,
        owned: false,
        frozen: false,
    }
}

fn frozen_workspace() -> Workspace {
    Workspace {
        id: WorkspaceId("ws-glacier".to_string()),
        name: "glacier-study".to_string(),
        privacy: Privacy::Public,
        owned: true,
        frozen: true,
    }
}

/// In-memory credential store. The read is slowed down so the three
/// entrypoints of act 1 really overlap inside one startup window.
struct ScriptedCredentials {
    token: Mutex<Option<AuthToken>>,
    loads: AtomicUsize,
}

impl ScriptedCredentials {
    fn new(token: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(AuthToken::new)),
            loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CredentialStore for ScriptedCredentials {
    async fn get(&self) -> Result<Option<AuthToken>, EffectError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        Ok(self
            .token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    async fn reset(&self) -> Result<(), EffectError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Scripted user and workspace endpoints.
#[derive(Default)]
struct ScriptedApi {
    me_calls: AtomicUsize,
}

#[async_trait]
impl UserApi for ScriptedApi {
    async fn get_current_user(&self, token: &AuthToken) -> Result<User, EffectError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        if token.as_str() != DEMO_TOKEN {
            return Err(EffectError::Unauthorized);
        }
        Ok(User {
            id: "u-demo".to_string(),
            username: "ada".to_string(),
            subscription: Some(Subscription { amount_cents: 900 }),
        })
    }

    async fn preload_templates(&self) {}
}

#[async_trait]
impl WorkspaceApi for ScriptedApi {
    async fn fork(&self, _id: &WorkspaceId) -> Result<Workspace, EffectError> {
        tokio::time::sleep(Duration::from_millis(25)).await;
        Ok(Workspace {
            id: WorkspaceId::generate(),
            name: "community-sketch (fork)".to_string(),
            privacy: Privacy::Public,
            owned: true,
            frozen: false,
        })
    }
}

/// Contributor roster without the network.
struct ScriptedRoster;

#[async_trait]
impl HttpGateway for ScriptedRoster {
    async fn get_json(&self, _url: &str) -> Result<serde_json::Value, EffectError> {
        Ok(serde_json::json!({
            "contributors": [
                { "login": "ada" },
                { "login": "grace" },
                { "login": "edsger" },
            ]
        }))
    }
}
