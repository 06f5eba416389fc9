//! Workspace lifecycle actions.

use crate::context::Context;
use crate::error::ActionError;
use crate::modal::ModalError;
use crate::state::{Privacy, Workspace, WorkspaceId};

use super::ActionResult;

/// Load `workspace` as the current workspace. Re-arms the session freeze
/// restriction and clears any stale transfer flag.
pub async fn open(ctx: &Context, workspace: Workspace) -> ActionResult<()> {
    ctx.store()
        .update(|s| {
            s.workspace.current = Some(workspace);
            s.workspace.forking = false;
            s.workspace.session_frozen = true;
        })
        .await;
    Ok(())
}

/// Transfer the current workspace to a copy owned by the signed-in user.
///
/// `workspace.forking` is set for the duration of the transfer; a second call
/// while one is in flight is a no-op.
pub async fn fork_current(ctx: &Context) -> ActionResult<()> {
    let mut claimed: Option<WorkspaceId> = None;
    ctx.store()
        .update(|s| {
            if !s.workspace.forking {
                if let Some(current) = &s.workspace.current {
                    s.workspace.forking = true;
                    claimed = Some(current.id.clone());
                }
            }
        })
        .await;

    let Some(id) = claimed else {
        // Either no workspace is loaded or a transfer is already running.
        if ctx.store().snapshot().await.workspace.current.is_some() {
            tracing::debug!("fork skipped: transfer already in flight");
            return Ok(());
        }
        return Err(ActionError::NoWorkspace);
    };

    match ctx.effects().workspace.fork(&id).await {
        Ok(forked) => {
            let forked_id = forked.id.clone();
            ctx.store()
                .update(|s| {
                    s.workspace.current = Some(forked);
                    s.workspace.forking = false;
                })
                .await;
            ctx.store().emit_workspace_forked(forked_id);
            Ok(())
        }
        Err(e) => {
            ctx.store().update(|s| s.workspace.forking = false).await;
            Err(e.into())
        }
    }
}

/// Ask the user for a new workspace name and apply it.
///
/// The dialog opens pre-filled with the current name; dismissal (or a blank
/// submission) leaves the name unchanged.
pub async fn rename(ctx: &Context) -> ActionResult<()> {
    let snapshot = ctx.store().snapshot().await;
    let Some(current) = snapshot.workspace.current else {
        return Err(ActionError::NoWorkspace);
    };

    let outcome = ctx
        .modals()
        .rename_workspace
        .open_with(|state| state.name = current.name.clone())
        .await;

    let submitted = match outcome {
        Ok(outcome) => outcome.name,
        // A superseding modal dismisses the rename.
        Err(ModalError::Superseded(_)) => None,
    };

    if let Some(name) = submitted {
        let trimmed = name.trim();
        if !trimmed.is_empty() && trimmed != current.name {
            let trimmed = trimmed.to_string();
            ctx.store()
                .update(|s| {
                    if let Some(ws) = s.workspace.current.as_mut() {
                        ws.name = trimmed;
                    }
                })
                .await;
        }
    }
    Ok(())
}

/// Change the visibility of the current workspace.
pub async fn set_privacy(ctx: &Context, privacy: Privacy) -> ActionResult<()> {
    update_current(ctx, |ws| ws.privacy = privacy).await
}

/// Freeze or unfreeze the current workspace. Freezing re-arms the
/// session-level restriction so the next edit asks again.
pub async fn set_frozen(ctx: &Context, frozen: bool) -> ActionResult<()> {
    let mut found = false;
    ctx.store()
        .update(|s| {
            if let Some(ws) = s.workspace.current.as_mut() {
                ws.frozen = frozen;
                if frozen {
                    s.workspace.session_frozen = true;
                }
                found = true;
            }
        })
        .await;
    if found {
        Ok(())
    } else {
        Err(ActionError::NoWorkspace)
    }
}

async fn update_current<F>(ctx: &Context, f: F) -> ActionResult<()>
where
    F: FnOnce(&mut Workspace),
{
    let mut found = false;
    ctx.store()
        .update(|s| {
            if let Some(ws) = s.workspace.current.as_mut() {
                f(ws);
                found = true;
            }
        })
        .await;
    if found {
        Ok(())
    } else {
        Err(ActionError::NoWorkspace)
    }
}
