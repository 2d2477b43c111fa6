//! Tag commands

use super::{arg, rest, CommandReply, GuildCommand};
use crate::gate::GuildContext;
use async_trait::async_trait;
use cascade_core::{permissions, CascadeError, Permission, Result};
use cascade_settings::{Module, Tag};

/// Subcommand words `tag <name>` can never reach.
const SHADOWED_NAMES: [&str; 3] = ["create", "delete", "list"];

/// `tag <name>`
pub struct TagViewCommand;

#[async_trait]
impl GuildCommand for TagViewCommand {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn usage(&self) -> &'static str {
        "tag <name>"
    }

    fn module(&self) -> Module {
        Module::Management
    }

    fn permission(&self) -> Permission {
        permissions::TAG_VIEW
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "tag name")?;
        let settings = ctx.snapshot().await?.settings;
        let tag = settings
            .tag(name)
            .ok_or_else(|| CascadeError::not_found("tag", name))?;
        Ok(CommandReply::text(tag.content.clone()))
    }
}

/// `tag create <name> <content…>`
pub struct TagCreateCommand;

#[async_trait]
impl GuildCommand for TagCreateCommand {
    fn name(&self) -> &'static str {
        "tag create"
    }

    fn usage(&self) -> &'static str {
        "tag create <name> <content>"
    }

    fn module(&self) -> Module {
        Module::Management
    }

    fn permission(&self) -> Permission {
        permissions::TAG_CREATE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "tag name")?;
        let content = rest(args, 1, "tag content")?;
        if SHADOWED_NAMES.iter().any(|word| name.eq_ignore_ascii_case(word)) {
            return Err(CascadeError::invalid_argument(format!(
                "tag name `{name}` is reserved for a tag subcommand"
            )));
        }

        let mut tx = ctx.begin().await?;
        let previous = tx.data_mut().settings.add_tag(name, Tag::new(content))?;
        tx.commit().await?;

        Ok(CommandReply::text(match previous {
            Some(_) => format!("Tag `{name}` updated"),
            None => format!("Tag `{name}` created"),
        }))
    }
}

/// `tag delete <name>`
pub struct TagDeleteCommand;

#[async_trait]
impl GuildCommand for TagDeleteCommand {
    fn name(&self) -> &'static str {
        "tag delete"
    }

    fn usage(&self) -> &'static str {
        "tag delete <name>"
    }

    fn module(&self) -> Module {
        Module::Management
    }

    fn permission(&self) -> Permission {
        permissions::TAG_DELETE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "tag name")?;
        let mut tx = ctx.begin().await?;
        tx.data_mut()
            .settings
            .remove_tag(name)
            .ok_or_else(|| CascadeError::not_found("tag", name))?;
        tx.commit().await?;
        Ok(CommandReply::text(format!("Tag `{name}` deleted")))
    }
}

/// `tag list`
pub struct TagListCommand;

#[async_trait]
impl GuildCommand for TagListCommand {
    fn name(&self) -> &'static str {
        "tag list"
    }

    fn usage(&self) -> &'static str {
        "tag list"
    }

    fn module(&self) -> Module {
        Module::Management
    }

    fn permission(&self) -> Permission {
        permissions::TAG_VIEW
    }

    async fn execute(&self, ctx: &GuildContext, _args: &[String]) -> Result<CommandReply> {
        let settings = ctx.snapshot().await?.settings;
        let lines = settings
            .tags()
            .iter()
            .map(|(name, tag)| format!("{name} ({})", tag.category))
            .collect();
        Ok(CommandReply::paged(
            "Tags",
            lines,
            ctx.page_size(),
            "This guild has no tags",
        ))
    }
}
