//! Ownership gate for member-owned resources
//!
//! Runs inside a unit of work, after any capability check. A caller without
//! the required access gets `OwnershipDenied` naming the owner, unless the
//! owner no longer has standing in the guild: then the resource is orphaned,
//! deleted and stored immediately, and the caller gets
//! `OwnerGoneResourceDeleted`.

use crate::gate::{GuildContext, GuildTransaction};
use cascade_core::{CascadeError, Result};
use cascade_settings::{Access, GuildData, OwnedResource, ResourceCollection};
use tracing::warn;

/// Require `access` to the resource `name` in the collection chosen by `select`.
///
/// A resource hidden from the caller is reported as absent while its owner is
/// still a member. Once the owner is gone it is self-healed like any other.
///
/// # Errors
/// - `NotFound` if the resource does not exist, or is hidden from the caller
///   and its owner is still a member
/// - `OwnershipDenied` if the owner is still a member
/// - `OwnerGoneResourceDeleted` after deleting an orphaned resource
pub async fn guard_owned<C, S>(
    ctx: &GuildContext,
    tx: &mut GuildTransaction,
    select: S,
    name: &str,
    access: Access,
) -> Result<()>
where
    C: ResourceCollection,
    S: Fn(&mut GuildData) -> &mut C,
{
    let member = ctx.caller().member_id;
    let (owner, visible) = {
        let collection = select(tx.data_mut());
        match collection.resource(name, member) {
            Some(resource) if access.permits(resource, member) => return Ok(()),
            Some(resource) => (resource.owner_id(), true),
            None => {
                let hidden = collection
                    .stored(name)
                    .ok_or_else(|| CascadeError::not_found(C::KIND, name))?;
                (hidden.owner_id(), false)
            }
        }
    };

    if ctx.is_member(owner).await? {
        return Err(if visible {
            CascadeError::ownership_denied(name, owner)
        } else {
            CascadeError::not_found(C::KIND, name)
        });
    }

    select(tx.data_mut()).remove(name);
    tx.save().await?;
    warn!(
        guild_id = %ctx.guild_id(),
        owner = %owner,
        resource = name,
        kind = C::KIND,
        "deleted resource whose owner left the guild"
    );
    Err(CascadeError::owner_gone(name, owner))
}
