//! Todo list commands
//!
//! Every command needs its `todo.*` permission. Viewing or changing a list
//! additionally needs edit access to it, deleting it or changing its editors
//! needs ownership.

use super::{arg, member, position, rest, CommandReply, GuildCommand};
use crate::gate::{GuildContext, GuildTransaction};
use crate::ownership::guard_owned;
use async_trait::async_trait;
use cascade_core::{permissions, CascadeError, Permission, Result};
use cascade_settings::{Access, GuildData, Module, TodoList, UsefulSettings};

fn useful(data: &mut GuildData) -> &mut UsefulSettings {
    &mut data.useful
}

async fn open_list<'a>(
    ctx: &GuildContext,
    tx: &'a mut GuildTransaction,
    name: &str,
    access: Access,
) -> Result<&'a mut TodoList> {
    guard_owned(ctx, tx, useful, name, access).await?;
    tx.data_mut()
        .useful
        .get_mut(name)
        .ok_or_else(|| CascadeError::not_found("todo list", name))
}

/// `todo create <name>`
pub struct TodoCreateCommand;

#[async_trait]
impl GuildCommand for TodoCreateCommand {
    fn name(&self) -> &'static str {
        "todo create"
    }

    fn usage(&self) -> &'static str {
        "todo create <name>"
    }

    fn module(&self) -> Module {
        Module::Useful
    }

    fn permission(&self) -> Permission {
        permissions::TODO_CREATE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "list name")?;
        let mut tx = ctx.begin().await?;
        tx.data_mut().useful.create(name, ctx.caller().member_id)?;
        tx.commit().await?;
        Ok(CommandReply::text(format!("Created todo list `{name}`")))
    }
}

/// `todo add <name> <text…>`
pub struct TodoAddCommand;

#[async_trait]
impl GuildCommand for TodoAddCommand {
    fn name(&self) -> &'static str {
        "todo add"
    }

    fn usage(&self) -> &'static str {
        "todo add <name> <item>"
    }

    fn module(&self) -> Module {
        Module::Useful
    }

    fn permission(&self) -> Permission {
        permissions::TODO_ADD
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "list name")?;
        let text = rest(args, 1, "item text")?;

        let mut tx = ctx.begin().await?;
        let number = open_list(ctx, &mut tx, name, Access::Edit)
            .await?
            .add_item(text)?;
        tx.commit().await?;
        Ok(CommandReply::text(format!("Added item {number} to `{name}`")))
    }
}

/// `todo remove <name> <number>`
pub struct TodoRemoveCommand;

#[async_trait]
impl GuildCommand for TodoRemoveCommand {
    fn name(&self) -> &'static str {
        "todo remove"
    }

    fn usage(&self) -> &'static str {
        "todo remove <name> <item number>"
    }

    fn module(&self) -> Module {
        Module::Useful
    }

    fn permission(&self) -> Permission {
        permissions::TODO_REMOVE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "list name")?;
        let number = position(args, 1)?;

        let mut tx = ctx.begin().await?;
        let removed = open_list(ctx, &mut tx, name, Access::Edit)
            .await?
            .remove_item(number)?;
        tx.commit().await?;
        Ok(CommandReply::text(format!(
            "Removed `{}` from `{name}`",
            removed.text
        )))
    }
}

/// `todo check <name> <number>`: toggle an item's done flag.
pub struct TodoCheckCommand;

#[async_trait]
impl GuildCommand for TodoCheckCommand {
    fn name(&self) -> &'static str {
        "todo check"
    }

    fn usage(&self) -> &'static str {
        "todo check <name> <item number>"
    }

    fn module(&self) -> Module {
        Module::Useful
    }

    fn permission(&self) -> Permission {
        permissions::TODO_REMOVE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "list name")?;
        let number = position(args, 1)?;

        let mut tx = ctx.begin().await?;
        let done = open_list(ctx, &mut tx, name, Access::Edit)
            .await?
            .toggle_item(number)?;
        tx.commit().await?;

        let state = if done { "done" } else { "not done" };
        Ok(CommandReply::text(format!(
            "Item {number} on `{name}` marked {state}"
        )))
    }
}

/// `todo view <name>`
pub struct TodoViewCommand;

#[async_trait]
impl GuildCommand for TodoViewCommand {
    fn name(&self) -> &'static str {
        "todo view"
    }

    fn usage(&self) -> &'static str {
        "todo view <name>"
    }

    fn module(&self) -> Module {
        Module::Useful
    }

    fn permission(&self) -> Permission {
        permissions::TODO_VIEW
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "list name")?;
        let mut tx = ctx.begin().await?;
        let list = open_list(ctx, &mut tx, name, Access::Edit).await?;

        let lines = list
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mark = if item.done { "x" } else { " " };
                format!("{}. [{mark}] {}", index + 1, item.text)
            })
            .collect();
        Ok(CommandReply::paged(
            format!("Todo list `{name}`"),
            lines,
            ctx.page_size(),
            format!("`{name}` has no items"),
        ))
    }
}

/// `todo delete <name>`
pub struct TodoDeleteCommand;

#[async_trait]
impl GuildCommand for TodoDeleteCommand {
    fn name(&self) -> &'static str {
        "todo delete"
    }

    fn usage(&self) -> &'static str {
        "todo delete <name>"
    }

    fn module(&self) -> Module {
        Module::Useful
    }

    fn permission(&self) -> Permission {
        permissions::TODO_DELETE
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "list name")?;
        let mut tx = ctx.begin().await?;
        guard_owned(ctx, &mut tx, useful, name, Access::Owner).await?;
        tx.data_mut().useful.delete(name);
        tx.commit().await?;
        Ok(CommandReply::text(format!("Deleted todo list `{name}`")))
    }
}

/// `todo adduser <name> <member>` / `todo removeuser <name> <member>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoEditorCommand {
    /// Delegate editing
    Add,
    /// Revoke a delegate
    Remove,
}

#[async_trait]
impl GuildCommand for TodoEditorCommand {
    fn name(&self) -> &'static str {
        match self {
            TodoEditorCommand::Add => "todo adduser",
            TodoEditorCommand::Remove => "todo removeuser",
        }
    }

    fn usage(&self) -> &'static str {
        match self {
            TodoEditorCommand::Add => "todo adduser <name> <member>",
            TodoEditorCommand::Remove => "todo removeuser <name> <member>",
        }
    }

    fn module(&self) -> Module {
        Module::Useful
    }

    fn permission(&self) -> Permission {
        permissions::TODO_EDITORS
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let name = arg(args, 0, "list name")?;
        let target = member(args, 1)?;
        if *self == TodoEditorCommand::Add && !ctx.is_member(target).await? {
            return Err(CascadeError::not_found("member", target.to_string()));
        }

        let mut tx = ctx.begin().await?;
        let list = open_list(ctx, &mut tx, name, Access::Owner).await?;
        let changed = match self {
            TodoEditorCommand::Add => list.add_editor(target),
            TodoEditorCommand::Remove => list.remove_editor(target),
        };
        tx.commit().await?;

        Ok(CommandReply::text(match (self, changed) {
            (TodoEditorCommand::Add, true) => format!("{target} can now edit `{name}`"),
            (TodoEditorCommand::Add, false) => format!("{target} could already edit `{name}`"),
            (TodoEditorCommand::Remove, true) => format!("{target} can no longer edit `{name}`"),
            (TodoEditorCommand::Remove, false) => format!("{target} was not an editor of `{name}`"),
        }))
    }
}
