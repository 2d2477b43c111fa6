//! Playlist commands

use super::{arg, position, rest, CommandReply, GuildCommand};
use crate::gate::{GuildContext, GuildTransaction};
use crate::ownership::guard_owned;
use async_trait::async_trait;
use cascade_core::{permissions, CascadeError, Permission, Result};
use cascade_settings::{
    Access, GuildData, Module, MusicSettings, Playlist, PlaylistScope, ResourceCollection,
};

fn music(data: &mut GuildData) -> &mut MusicSettings {
    &mut data.music
}

async fn open_playlist<'a>(
    ctx: &GuildContext,
    tx: &'a mut GuildTransaction,
    name: &str,
    access: Access,
) -> Result<&'a mut Playlist> {
    guard_owned(ctx, tx, music, name, access).await?;
    let viewer = ctx.caller().member_id;
    tx.data_mut()
        .music
        .resource_mut(name, viewer)
        .ok_or_else(|| CascadeError::not_found(MusicSettings::KIND, name))
}

/// `playlist create <name> [guild|user]`
pub struct PlaylistCreateCommand;

#[async_trait]
impl GuildCommand for PlaylistCreateCommand {
    fn name(&self) -> &'static str {
        "playlist create"
    }

    fn usage(&self) -> &'static str {
        "playlist create <name> [guild|user]"
    }

    fn module(&self) -> Module {
        Module::Music
    }

    fn permission(&self) -> Permission {
        permissions::PLAYLIST_CREATE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "playlist name")?;
        let scope = match args.get(1) {
            Some(raw) => raw.parse()?,
            None => PlaylistScope::default(),
        };

        let mut tx = ctx.begin().await?;
        let id = tx
            .data_mut()
            .music
            .create(name, ctx.caller().member_id, scope)?
            .id;
        tx.commit().await?;
        Ok(CommandReply::text(format!("Created playlist `{name}` ({id})")))
    }
}

/// `playlist add <name> <track…>`
pub struct PlaylistAddCommand;

#[async_trait]
impl GuildCommand for PlaylistAddCommand {
    fn name(&self) -> &'static str {
        "playlist add"
    }

    fn usage(&self) -> &'static str {
        "playlist add <name> <track>"
    }

    fn module(&self) -> Module {
        Module::Music
    }

    fn permission(&self) -> Permission {
        permissions::PLAYLIST_EDIT
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "playlist name")?;
        let track = rest(args, 1, "track")?;

        let mut tx = ctx.begin().await?;
        let number = open_playlist(ctx, &mut tx, name, Access::Edit)
            .await?
            .add_track(track)?;
        tx.commit().await?;
        Ok(CommandReply::text(format!("Added track {number} to `{name}`")))
    }
}

/// `playlist remove <name> <number>`
pub struct PlaylistRemoveCommand;

#[async_trait]
impl GuildCommand for PlaylistRemoveCommand {
    fn name(&self) -> &'static str {
        "playlist remove"
    }

    fn usage(&self) -> &'static str {
        "playlist remove <name> <track number>"
    }

    fn module(&self) -> Module {
        Module::Music
    }

    fn permission(&self) -> Permission {
        permissions::PLAYLIST_EDIT
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "playlist name")?;
        let number = position(args, 1)?;

        let mut tx = ctx.begin().await?;
        let removed = open_playlist(ctx, &mut tx, name, Access::Edit)
            .await?
            .remove_track(number)?;
        tx.commit().await?;
        Ok(CommandReply::text(format!("Removed `{removed}` from `{name}`")))
    }
}

/// `playlist view <name>`
pub struct PlaylistViewCommand;

#[async_trait]
impl GuildCommand for PlaylistViewCommand {
    fn name(&self) -> &'static str {
        "playlist view"
    }

    fn usage(&self) -> &'static str {
        "playlist view <name>"
    }

    fn module(&self) -> Module {
        Module::Music
    }

    fn permission(&self) -> Permission {
        permissions::PLAYLIST_VIEW
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "playlist name")?;
        let viewer = ctx.caller().member_id;
        let mut tx = ctx.begin().await?;
        // hidden or orphaned: only the ownership gate can answer
        if tx.data().music.resource(name, viewer).is_none() {
            guard_owned(ctx, &mut tx, music, name, Access::Owner).await?;
        }
        let playlist = tx
            .data()
            .music
            .resource(name, viewer)
            .ok_or_else(|| CascadeError::not_found(MusicSettings::KIND, name))?;

        let lines = playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(index, track)| format!("{}. {track}", index + 1))
            .collect();
        Ok(CommandReply::paged(
            format!("Playlist `{name}`"),
            lines,
            ctx.page_size(),
            format!("`{name}` has no tracks"),
        ))
    }
}

/// `playlist delete <name>`
pub struct PlaylistDeleteCommand;

#[async_trait]
impl GuildCommand for PlaylistDeleteCommand {
    fn name(&self) -> &'static str {
        "playlist delete"
    }

    fn usage(&self) -> &'static str {
        "playlist delete <name>"
    }

    fn module(&self) -> Module {
        Module::Music
    }

    fn permission(&self) -> Permission {
        permissions::PLAYLIST_DELETE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "playlist name")?;
        let mut tx = ctx.begin().await?;
        guard_owned(ctx, &mut tx, music, name, Access::Owner).await?;
        tx.data_mut().music.remove(name);
        tx.commit().await?;
        Ok(CommandReply::text(format!("Deleted playlist `{name}`")))
    }
}
