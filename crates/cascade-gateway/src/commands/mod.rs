//! Chat command front end
//!
//! A chat invocation arrives already resolved to a command name and argument
//! words. The dispatcher looks the command up, pre-checks its permission and
//! runs it through the gate. Commands own their argument parsing and any
//! ownership checks; they never render, they return a [`CommandReply`].

mod playlist;
mod settings;
mod tags;
mod todo;

use crate::gate::{GuildContext, GuildGate};
use crate::guarded::run_guarded;
use crate::pager::{paginate, Page};
use async_trait::async_trait;
use cascade_core::{CallerIdentity, CascadeError, GuildId, MemberId, Permission, Result};
use cascade_settings::Module;
use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub use self::playlist::{
    PlaylistAddCommand, PlaylistCreateCommand, PlaylistDeleteCommand, PlaylistRemoveCommand,
    PlaylistViewCommand,
};
pub use self::settings::{ModuleCommand, ModuleListCommand, PrefixCommand, SettingsSetCommand};
pub use self::tags::{TagCreateCommand, TagDeleteCommand, TagListCommand, TagViewCommand};
pub use self::todo::{
    TodoAddCommand, TodoCheckCommand, TodoCreateCommand, TodoDeleteCommand, TodoEditorCommand,
    TodoRemoveCommand, TodoViewCommand,
};

/// A resolved chat invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Guild the message was sent in
    pub guild_id: GuildId,
    /// Caller as known when the message arrived
    pub caller: CallerIdentity,
    /// Registered command name, e.g. `"todo add"`
    pub name: String,
    /// Remaining words
    pub args: Vec<String>,
}

/// What a command hands back for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandReply {
    /// A single message
    Text {
        /// Message body
        text: String,
    },
    /// A listing split into pages
    Paged {
        /// Heading shown on every page
        title: String,
        /// Pages, never empty
        pages: Vec<Page<String>>,
    },
}

impl CommandReply {
    /// Single message reply.
    pub fn text(text: impl Into<String>) -> Self {
        CommandReply::Text { text: text.into() }
    }

    /// Paged listing, or `empty` as a message when there is nothing to list.
    pub fn paged(
        title: impl Into<String>,
        lines: Vec<String>,
        page_size: NonZeroUsize,
        empty: impl Into<String>,
    ) -> Self {
        if lines.is_empty() {
            return CommandReply::text(empty);
        }
        CommandReply::Paged {
            title: title.into(),
            pages: paginate(lines, page_size),
        }
    }
}

/// A chat command.
#[async_trait]
pub trait GuildCommand: Send + Sync {
    /// Space-separated name path, lowercase.
    fn name(&self) -> &'static str;

    /// Argument synopsis.
    fn usage(&self) -> &'static str;

    /// Module the command belongs to.
    fn module(&self) -> Module;

    /// Capability checked before and inside the gate.
    fn permission(&self) -> Permission;

    /// Run inside the gate.
    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply>;
}

/// Renders and delivers replies. Presentation lives entirely behind this.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Deliver a successful reply.
    async fn reply(&self, reply: CommandReply) -> Result<()>;

    /// Deliver a failure.
    async fn error(&self, error: &CascadeError) -> Result<()>;
}

/// Commands by name.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Arc<dyn GuildCommand>>,
}

/// Deepest name path any command uses.
const MAX_NAME_WORDS: usize = 2;

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command.
    pub fn with_builtin() -> Result<Self> {
        let mut registry = Self::new();
        let commands: Vec<Arc<dyn GuildCommand>> = vec![
            Arc::new(PrefixCommand),
            Arc::new(ModuleCommand::Enable),
            Arc::new(ModuleCommand::Disable),
            Arc::new(ModuleListCommand),
            Arc::new(SettingsSetCommand),
            Arc::new(TagViewCommand),
            Arc::new(TagCreateCommand),
            Arc::new(TagDeleteCommand),
            Arc::new(TagListCommand),
            Arc::new(TodoCreateCommand),
            Arc::new(TodoAddCommand),
            Arc::new(TodoRemoveCommand),
            Arc::new(TodoCheckCommand),
            Arc::new(TodoViewCommand),
            Arc::new(TodoDeleteCommand),
            Arc::new(TodoEditorCommand::Add),
            Arc::new(TodoEditorCommand::Remove),
            Arc::new(PlaylistCreateCommand),
            Arc::new(PlaylistAddCommand),
            Arc::new(PlaylistRemoveCommand),
            Arc::new(PlaylistViewCommand),
            Arc::new(PlaylistDeleteCommand),
        ];
        for command in commands {
            registry.register(command)?;
        }
        Ok(registry)
    }

    /// Add a command.
    ///
    /// # Errors
    /// `InvalidArgument` if the name is taken.
    pub fn register(&mut self, command: Arc<dyn GuildCommand>) -> Result<()> {
        let name = command.name();
        if self.commands.contains_key(name) {
            return Err(CascadeError::invalid_argument(format!(
                "command `{name}` registered twice"
            )));
        }
        self.commands.insert(name, command);
        Ok(())
    }

    /// Look up a command by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn GuildCommand>> {
        self.commands.get(name).cloned()
    }

    /// Resolve words to the command with the longest matching name, returning
    /// the words left over as arguments.
    pub fn resolve<S: AsRef<str>>(
        &self,
        words: &[S],
    ) -> Option<(Arc<dyn GuildCommand>, Vec<String>)> {
        let lowered: Vec<String> = words
            .iter()
            .take(MAX_NAME_WORDS)
            .map(|w| w.as_ref().to_lowercase())
            .collect();

        (1..=lowered.len()).rev().find_map(|depth| {
            let command = self.get(&lowered[..depth].join(" "))?;
            let args = words[depth..].iter().map(|w| w.as_ref().to_string()).collect();
            Some((command, args))
        })
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }
}

/// Runs chat invocations through the gate.
#[derive(Clone)]
pub struct CommandDispatcher {
    gate: GuildGate,
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    /// Dispatcher over a gate and a registry.
    pub fn new(gate: GuildGate, registry: Arc<CommandRegistry>) -> Self {
        Self { gate, registry }
    }

    /// The registered commands.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run an invocation and return its reply.
    pub async fn dispatch(&self, invocation: CommandInvocation) -> Result<CommandReply> {
        let command = self
            .registry
            .get(&invocation.name)
            .ok_or_else(|| CascadeError::unknown_command(invocation.name.as_str()))?;
        let args = invocation.args;

        run_guarded(
            &self.gate,
            invocation.guild_id,
            &invocation.caller,
            command.permission(),
            move |ctx| async move {
                let settings = ctx.snapshot().await?.settings;
                let module = command.module();
                if !settings.is_module_enabled(module) {
                    return Err(CascadeError::invalid_argument(format!(
                        "the {module} module is disabled in this guild"
                    )));
                }
                if settings.disabled_commands().contains(command.name()) {
                    return Err(CascadeError::invalid_argument(format!(
                        "`{}` is disabled in this guild",
                        command.name()
                    )));
                }
                command.execute(&ctx, &args).await
            },
        )
        .await
    }

    /// Run an invocation and deliver the outcome through `responder`.
    ///
    /// Only a failing responder makes this return an error.
    pub async fn handle(
        &self,
        invocation: CommandInvocation,
        responder: &dyn Responder,
    ) -> Result<()> {
        let name = invocation.name.clone();
        match self.dispatch(invocation).await {
            Ok(reply) => responder.reply(reply).await,
            Err(err) => {
                if !err.is_user_error() {
                    tracing::warn!(command = %name, error = %err, "command failed");
                }
                responder.error(&err).await
            }
        }
    }
}

// Argument helpers shared by the command modules.

pub(crate) fn arg<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CascadeError::invalid_argument(format!("missing {what}")))
}

pub(crate) fn rest(args: &[String], from: usize, what: &str) -> Result<String> {
    let joined = args.get(from..).unwrap_or_default().join(" ");
    if joined.trim().is_empty() {
        return Err(CascadeError::invalid_argument(format!("missing {what}")));
    }
    Ok(joined)
}

pub(crate) fn position(args: &[String], index: usize) -> Result<usize> {
    let raw = arg(args, index, "item number")?;
    raw.parse()
        .map_err(|_| CascadeError::invalid_argument(format!("`{raw}` is not an item number")))
}

/// Accepts a raw id or a `<@id>` / `<@!id>` mention.
pub(crate) fn member(args: &[String], index: usize) -> Result<MemberId> {
    let raw = arg(args, index, "member")?;
    let id = raw
        .trim_start_matches("<@")
        .trim_start_matches('!')
        .trim_end_matches('>');
    id.parse()
        .map_err(|_| CascadeError::invalid_argument(format!("`{raw}` is not a member")))
}
