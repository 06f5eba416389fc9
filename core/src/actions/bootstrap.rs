//! One-shot startup sequence behind a concurrent-safe gate.

use std::future::Future;
use std::sync::Mutex;

use tokio::sync::watch;

use crate::context::Context;
use crate::error::ActionError;
use crate::state::AuthToken;
use crate::util::lock;

use super::{session, ActionResult};

/// Notification shown when a stored credential no longer resolves to a user.
const SESSION_EXPIRED_MESSAGE: &str =
    "Your session seems to have expired, please sign in again";

/// Latch making the startup sequence run at most once per context.
pub struct BootstrapGate {
    phase: Mutex<GatePhase>,
}

enum GatePhase {
    /// No run has started.
    Idle,
    /// A run is in flight; the receiver resolves when it finishes.
    Running(watch::Receiver<bool>),
    /// The sequence has completed.
    Done,
}

enum Claim {
    AlreadyLoaded,
    Follow(watch::Receiver<bool>),
    Lead(watch::Sender<bool>),
}

impl BootstrapGate {
    pub(crate) fn new() -> Self {
        Self {
            phase: Mutex::new(GatePhase::Idle),
        }
    }

    fn claim(&self) -> Claim {
        let mut phase = lock(&self.phase);
        match &*phase {
            GatePhase::Done => Claim::AlreadyLoaded,
            GatePhase::Running(rx) => Claim::Follow(rx.clone()),
            GatePhase::Idle => {
                let (tx, rx) = watch::channel(false);
                *phase = GatePhase::Running(rx);
                Claim::Lead(tx)
            }
        }
    }

    fn mark_done(&self) {
        *lock(&self.phase) = GatePhase::Done;
    }
}

/// Run the startup sequence once, then `continuation`.
///
/// The first caller drives the sequence and runs its continuation as soon as
/// identity is settled. Concurrent callers suspend until the whole sequence
/// (including the deferred contributor fetch) finishes, then run their own
/// continuations. Once startup has completed, callers go straight to their
/// continuation.
///
/// A continuation failure is returned to its own caller only; the loaded
/// flags are set regardless, so startup never reruns.
pub async fn with_bootstrap_gate<T, C, Fut>(
    ctx: &Context,
    input: T,
    continuation: C,
) -> ActionResult<()>
where
    C: FnOnce(Context, T) -> Fut,
    Fut: Future<Output = ActionResult<()>>,
{
    match ctx.gate().claim() {
        Claim::AlreadyLoaded => continuation(ctx.clone(), input).await,
        Claim::Follow(mut finished) => {
            // Resolves on notification, or early if the leading task is
            // dropped mid-run; either way the sequence is no longer in
            // flight.
            while !*finished.borrow() {
                if finished.changed().await.is_err() {
                    break;
                }
            }
            continuation(ctx.clone(), input).await
        }
        Claim::Lead(finished_tx) => {
            load_app(ctx).await;
            let result = continuation(ctx.clone(), input).await;
            finish_load(ctx).await;
            fetch_contributors(ctx).await;
            let _ = finished_tx.send(true);
            result
        }
    }
}

/// Startup without a follow-up action.
pub async fn bootstrap(ctx: &Context) -> ActionResult<()> {
    with_bootstrap_gate(ctx, (), |_, ()| async { Ok::<(), ActionError>(()) }).await
}

/// Steps up to and including identity resolution.
async fn load_app(ctx: &Context) {
    let store = ctx.store();

    store.update(|s| s.shell.is_authenticating = true).await;
    store.emit_bootstrap_started();

    let token = match ctx.effects().auth.get().await {
        Ok(token) => token,
        Err(e) => {
            // A broken credential store degrades to the anonymous path.
            tracing::warn!("credential load failed: {e}");
            None
        }
    };
    store.update(|s| s.session.token = token.clone()).await;

    register_listeners(ctx);

    let bindings = store.snapshot().await.preferences.keybindings;
    ctx.effects().keybindings.set(bindings);
    ctx.effects().keybindings.start();

    match token {
        Some(token) => authenticate(ctx, &token).await,
        None => {
            if let Err(e) = ctx.effects().auth.reset().await {
                tracing::debug!("credential reset failed: {e}");
            }
        }
    }
}

async fn authenticate(ctx: &Context, token: &AuthToken) {
    match ctx.effects().api.get_current_user(token).await {
        Ok(user) => {
            ctx.store()
                .update(|s| s.session.user = Some(user.clone()))
                .await;
            session::apply_plan(ctx, &user).await;
            session::mark_signed_in(ctx).await;

            if let Err(e) = ctx.effects().realtime.connect().await {
                tracing::warn!("realtime connect failed: {e}");
            }
            session::init_notification_delivery(ctx);
            ctx.effects().api.preload_templates().await;
        }
        Err(e) => {
            tracing::warn!("stored credential rejected: {e}");
            ctx.effects().notifier.error(SESSION_EXPIRED_MESSAGE);
            if let Err(e) = ctx.effects().auth.reset().await {
                tracing::debug!("credential reset failed: {e}");
            }
            ctx.store().update(|s| s.session.token = None).await;
            ctx.store().emit_session_expired();
        }
    }
}

/// Hook connectivity and transport callbacks into domain actions. Callbacks
/// fire from effect internals; each dispatch hops back onto the runtime with
/// a fresh context clone.
fn register_listeners(ctx: &Context) {
    let handle = tokio::runtime::Handle::current();

    let conn_ctx = ctx.clone();
    let conn_handle = handle.clone();
    ctx.effects()
        .connectivity
        .add_listener(Box::new(move |connected| {
            let ctx = conn_ctx.clone();
            conn_handle.spawn(async move {
                session::connection_changed(&ctx, connected).await;
            });
        }));

    let msg_ctx = ctx.clone();
    ctx.effects().transport.listen(Box::new(move |message| {
        let ctx = msg_ctx.clone();
        handle.spawn(async move {
            session::on_transport_message(&ctx, message).await;
        });
    }));
}

async fn finish_load(ctx: &Context) {
    ctx.store()
        .update(|s| {
            s.shell.has_loaded_app = true;
            s.shell.is_authenticating = false;
        })
        .await;
    ctx.store().emit_bootstrap_finished();
    ctx.gate().mark_done();
}

/// Contributor roster fetch. Strictly after the loaded flags flip; failures
/// never surface.
async fn fetch_contributors(ctx: &Context) {
    let url = ctx.cfg().bootstrap.contributors_url.clone();
    if url.is_empty() {
        return;
    }
    match ctx.effects().http.get_json(&url).await {
        Ok(doc) => match parse_contributors(&doc) {
            Some(logins) => {
                ctx.store().update(|s| s.shell.contributors = logins).await;
            }
            None => tracing::debug!("contributor document had an unexpected shape"),
        },
        Err(e) => tracing::debug!("contributor fetch skipped: {e}"),
    }
}

fn parse_contributors(doc: &serde_json::Value) -> Option<Vec<String>> {
    let entries = doc.get("contributors")?.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(|entry| entry.get("login"))
            .filter_map(|login| login.as_str())
            .map(str::to_owned)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contributors() {
        let doc = serde_json::json!({
            "contributors": [
                { "login": "ada", "contributions": ["code"] },
                { "login": "grace" },
                { "name": "no-login" },
            ]
        });
        assert_eq!(
            parse_contributors(&doc),
            Some(vec!["ada".to_string(), "grace".to_string()])
        );
        assert_eq!(parse_contributors(&serde_json::json!({})), None);
    }

    #[test]
    fn test_gate_claims() {
        let gate = BootstrapGate::new();
        assert!(matches!(gate.claim(), Claim::Lead(_)));
        assert!(matches!(gate.claim(), Claim::Follow(_)));
        gate.mark_done();
        assert!(matches!(gate.claim(), Claim::AlreadyLoaded));
    }
}
