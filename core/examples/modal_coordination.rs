//! Modal coordination walkthrough.
//!
//! Shows the request/response shape of the dialog layer: an action opens a
//! dialog and suspends; UI-side code closes it later and the action resumes
//! with the typed result.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use atelier_core::api::{AppModals, FrozenChoice, RenameOutcome, StateEvent, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // 1. One store, one dialog registry.
    let store = Store::new();
    let modals = Arc::new(AppModals::new(store.clone()));

    // 2. Event listener (background task).
    let mut events = store.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StateEvent::ModalOpened { name, .. } => println!("  · dialog opened: {name}"),
                StateEvent::ModalClosed { name, .. } => println!("  · dialog closed: {name}"),
                _ => {}
            }
        }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // 3. A rename round-trip. The spawned task plays the UI: it waits for the
    //    dialog to show, reads the pre-filled state, and submits a new name.
    println!("[1] Open the rename dialog and wait for the user");
    let ui = {
        let modals = modals.clone();
        tokio::spawn(async move {
            while !modals.rename_workspace.is_current() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            let prefill = modals.rename_workspace.state().name;
            println!("  ui sees the dialog pre-filled with '{prefill}'");
            modals.rename_workspace.close_with(RenameOutcome {
                name: Some(format!("{prefill}-v2")),
            });
        })
    };

    let outcome = modals
        .rename_workspace
        .open_with(|state| state.name = "glacier-study".to_string())
        .await?;
    ui.await?;
    println!("  resumed with {:?}", outcome.name);

    // 4. Dismissal resolves with the dialog's declared default.
    println!("[2] Dismissal resolves the default result");
    let ui = {
        let modals = modals.clone();
        tokio::spawn(async move {
            while !modals.fork_frozen.is_current() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            modals.fork_frozen.close();
        })
    };
    let choice = modals.fork_frozen.open().await?;
    ui.await?;
    println!("  resumed with {choice:?} (default)");
    assert_eq!(choice, FrozenChoice::Cancel);

    // 5. Opening a second dialog supersedes the first opener.
    println!("[3] A second dialog supersedes the first");
    let stale = {
        let modals = modals.clone();
        tokio::spawn(async move { modals.rename_workspace.open().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let ui = {
        let modals = modals.clone();
        tokio::spawn(async move {
            while !modals.fork_frozen.is_current() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            modals.fork_frozen.close_with(FrozenChoice::Unfreeze);
        })
    };
    let choice = modals.fork_frozen.open().await?;
    ui.await?;
    println!("  the frozen dialog resolved with {choice:?}");
    println!("  the stale rename resolved with {:?}", stale.await?);

    println!("done · current dialog: {:?}", modals.current());
    Ok(())
}
