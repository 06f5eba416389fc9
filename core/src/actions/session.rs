//! Session and connectivity actions.

use crate::context::Context;
use crate::effects::TransportMessage;
use crate::state::{PlanTier, User};

use super::ActionResult;

/// Record a connectivity flip reported by the connection effect.
pub async fn connection_changed(ctx: &Context, connected: bool) {
    ctx.store().update(|s| s.shell.connected = connected).await;
    ctx.store().emit_connection_changed(connected);
    tracing::info!(connected, "connectivity changed");
}

/// Handle a message on the client transport. Notification delivery has its
/// own listener installed at sign-in; everything else routes here.
pub async fn on_transport_message(ctx: &Context, message: TransportMessage) {
    match message.kind.as_str() {
        // Counted by the delivery listener installed at sign-in.
        "notification" => {}
        // Server-driven freeze toggles for the open workspace.
        "workspace.frozen" => {
            let Some(frozen) = message.payload.get("frozen").and_then(|v| v.as_bool()) else {
                tracing::debug!("workspace.frozen message without a boolean payload");
                return;
            };
            ctx.store()
                .update(|s| {
                    if let Some(ws) = s.workspace.current.as_mut() {
                        ws.frozen = frozen;
                    }
                })
                .await;
        }
        other => tracing::debug!(kind = other, "unhandled transport message"),
    }
}

/// Derive plan tier and price from the user record.
pub(crate) async fn apply_plan(ctx: &Context, user: &User) {
    let (plan, price) = match &user.subscription {
        Some(sub) => (PlanTier::Pro, sub.amount_cents),
        None => (PlanTier::Free, 0),
    };
    ctx.store()
        .update(|s| {
            s.session.plan = plan;
            s.session.plan_price = price;
        })
        .await;
}

pub(crate) async fn mark_signed_in(ctx: &Context) {
    ctx.store().update(|s| s.session.signed_in = true).await;
}

/// Install the listener that counts unread notifications. Only runs once a
/// user is signed in.
pub(crate) fn init_notification_delivery(ctx: &Context) {
    let handle = tokio::runtime::Handle::current();
    let notif_ctx = ctx.clone();
    ctx.effects().transport.listen(Box::new(move |message| {
        if message.kind != "notification" {
            return;
        }
        let ctx = notif_ctx.clone();
        handle.spawn(async move {
            ctx.store()
                .update(|s| s.session.unread_notifications += 1)
                .await;
        });
    }));
}

/// Drop the stored credential and the signed-in session state.
pub async fn sign_out(ctx: &Context) -> ActionResult<()> {
    ctx.effects().auth.reset().await?;
    ctx.store()
        .update(|s| {
            s.session.token = None;
            s.session.user = None;
            s.session.signed_in = false;
            s.session.plan = PlanTier::Free;
            s.session.plan_price = 0;
            s.session.unread_notifications = 0;
        })
        .await;
    Ok(())
}
