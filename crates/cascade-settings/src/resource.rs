//! Owned resources
//!
//! Resources such as todo lists and playlists belong to one guild and one
//! member. Editing them is gated by ownership, an axis independent of the
//! permission model; front ends combine the two as each command requires.

use cascade_core::MemberId;

/// A guild-scoped resource with a recorded owner.
pub trait OwnedResource {
    /// Member that created the resource.
    fn owner_id(&self) -> MemberId;

    /// Whether `member` may change the resource's contents. Owner only unless
    /// the resource delegates.
    fn can_edit(&self, member: MemberId) -> bool {
        member == self.owner_id()
    }
}

/// Level of access an operation needs on an owned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Change contents; delegated editors qualify
    Edit,
    /// Delete or re-delegate; only the owner qualifies
    Owner,
}

impl Access {
    /// Check if `member` has this access to `resource`.
    pub fn permits<R: OwnedResource + ?Sized>(self, resource: &R, member: MemberId) -> bool {
        match self {
            Access::Edit => resource.can_edit(member),
            Access::Owner => resource.owner_id() == member,
        }
    }
}

/// A named set of owned resources inside a guild's data.
pub trait ResourceCollection {
    /// Resource type held.
    type Resource: OwnedResource;

    /// Kind name used in errors, e.g. `"todo list"`.
    const KIND: &'static str;

    /// Look up a resource as seen by `viewer`. Resources the viewer may not
    /// see are reported as absent.
    fn resource(&self, name: &str, viewer: MemberId) -> Option<&Self::Resource>;

    /// Mutable lookup, same visibility rule as [`ResourceCollection::resource`].
    fn resource_mut(&mut self, name: &str, viewer: MemberId) -> Option<&mut Self::Resource>;

    /// Look up a resource regardless of visibility.
    fn stored(&self, name: &str) -> Option<&Self::Resource>;

    /// Remove a resource regardless of visibility.
    fn remove(&mut self, name: &str) -> Option<Self::Resource>;
}
