//! Capability-checked gate entry shared by both front ends

use crate::gate::{GuildContext, GuildGate};
use cascade_core::{CallerIdentity, CascadeError, GuildId, Permission, Result};
use std::future::Future;
use tracing::warn;

/// Check `permission` against the identity the invocation arrived with, then
/// run `work` through the gate.
///
/// A caller denied up front never reaches the gate. Inside the gate the
/// permission is checked again against the freshly resolved identity, so a
/// role revoked in between is honoured.
pub async fn run_guarded<T, F, Fut>(
    gate: &GuildGate,
    guild_id: GuildId,
    caller: &CallerIdentity,
    permission: Permission,
    work: F,
) -> Result<T>
where
    F: FnOnce(GuildContext) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if !gate.permissions().resolve(guild_id, caller, permission.key) {
        warn!(
            guild_id = %guild_id,
            member_id = %caller.member_id,
            permission = %permission,
            "permission denied before gate"
        );
        return Err(CascadeError::permission_denied(permission.key));
    }

    gate.run_if_authenticated_guild(guild_id, caller.member_id, move |ctx| async move {
        ctx.require(&permission)?;
        work(ctx).await
    })
    .await
}
