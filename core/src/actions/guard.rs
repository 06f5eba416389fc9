//! Ownership guard for edit actions.

use std::future::Future;

use crate::context::Context;
use crate::error::ActionError;
use crate::modal::{FrozenChoice, ModalError};

use super::workspace;

/// Settle workspace ownership, then run `continuation`; run `cancellation`
/// when the edit must not proceed.
///
/// Decision order:
/// 1. Workspace not owned and a transfer already in flight: cancel.
/// 2. Workspace not owned: transfer ownership, then continue.
/// 3. Workspace owned but frozen (and the session honours the freeze): ask
///    via the fork-frozen modal. `Fork` transfers to a fresh copy,
///    `Unfreeze` lifts the restriction for this session, anything else
///    cancels.
/// 4. Workspace owned and editable: straight to the continuation.
///
/// A failed ownership transfer is not handled here; it propagates to the
/// caller.
pub async fn with_ownership_guard_or_else<T, R, C, Fc, X, Fx>(
    ctx: &Context,
    input: T,
    continuation: C,
    cancellation: X,
) -> Result<R, ActionError>
where
    C: FnOnce(Context, T) -> Fc,
    Fc: Future<Output = Result<R, ActionError>>,
    X: FnOnce(Context, T) -> Fx,
    Fx: Future<Output = Result<R, ActionError>>,
{
    let workspace_state = ctx.store().snapshot().await.workspace;
    let Some(current) = workspace_state.current else {
        return Err(ActionError::NoWorkspace);
    };

    if !current.owned {
        if workspace_state.forking {
            return cancellation(ctx.clone(), input).await;
        }
        workspace::fork_current(ctx).await?;
    } else if current.frozen && workspace_state.session_frozen {
        match ctx.modals().fork_frozen.open().await {
            Ok(FrozenChoice::Fork) => workspace::fork_current(ctx).await?,
            Ok(FrozenChoice::Unfreeze) => {
                ctx.store()
                    .update(|s| s.workspace.session_frozen = false)
                    .await;
            }
            // Dismissal and supersession both count as a refusal to edit.
            Ok(FrozenChoice::Cancel) | Err(ModalError::Superseded(_)) => {
                return cancellation(ctx.clone(), input).await;
            }
        }
    }

    continuation(ctx.clone(), input).await
}

/// [`with_ownership_guard_or_else`] with the default cancellation: resolve
/// immediately with `R::default()`.
pub async fn with_ownership_guard<T, R, C, Fc>(
    ctx: &Context,
    input: T,
    continuation: C,
) -> Result<R, ActionError>
where
    R: Default,
    C: FnOnce(Context, T) -> Fc,
    Fc: Future<Output = Result<R, ActionError>>,
{
    with_ownership_guard_or_else(ctx, input, continuation, |_, _| async {
        Ok::<R, ActionError>(R::default())
    })
    .await
}
