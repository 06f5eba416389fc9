//! `state` command: run startup against the configured API and print the
//! resulting snapshot.

use atelier_core::api::{bootstrap, AppConfig, CliError, Context, StateEvent, Store};
use atelier_effects::factory::DefaultEffectsFactory;

use super::cli::StateArgs;

pub async fn run(args: StateArgs, cfg: AppConfig) -> Result<i32, CliError> {
    let (factory, _notifications) = DefaultEffectsFactory::new();
    let ctx = Context::from_factory(cfg, &factory).await?;

    spawn_event_logger(ctx.store());

    bootstrap::bootstrap(&ctx).await?;

    let mut snapshot = ctx.store().snapshot().await;
    // The credential itself stays inside the process.
    snapshot.session.token = None;

    let rendered = if args.compact {
        serde_json::to_string(&snapshot)
    } else {
        serde_json::to_string_pretty(&snapshot)
    }
    .map_err(|e| CliError::Anyhow(e.into()))?;
    println!("{rendered}");
    Ok(0)
}

/// Mirror store events into the log while the command runs.
fn spawn_event_logger(store: &Store) {
    let mut events = store.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StateEvent::BootstrapStarted { .. } => tracing::debug!("startup began"),
                StateEvent::BootstrapFinished { .. } => tracing::info!("startup finished"),
                StateEvent::SessionExpired { .. } => tracing::warn!("stored session expired"),
                StateEvent::ConnectionChanged { connected, .. } => {
                    tracing::info!(connected, "connectivity changed");
                }
                StateEvent::WorkspaceForked { workspace_id, .. } => {
                    tracing::info!(%workspace_id, "workspace forked");
                }
                StateEvent::ModalOpened { name, .. } => tracing::debug!(name, "modal opened"),
                StateEvent::ModalClosed { name, .. } => tracing::debug!(name, "modal closed"),
            }
        }
    });
}
