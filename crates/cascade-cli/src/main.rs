//! Cascade operator CLI
//!
//! Runs chat commands against in-memory backends, either one command given on
//! the command line or one command per line read from stdin.

use anyhow::{Context, Result};
use cascade_core::{
    CallerIdentity, CascadeConfig, GuildDirectory, GuildId, MemberId, MemoryDirectory,
    PermissionModel,
};
use cascade_gateway::{CommandDispatcher, CommandInvocation, CommandRegistry, GuildGate, Responder};
use cascade_settings::MemoryStore;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;

mod console;
mod fixture;

use console::ConsoleResponder;
use fixture::Fixture;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Cascade - guild settings and command gateway", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TOML fixture describing guilds, members and permission overrides
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Guild the commands run in
    #[arg(short, long, default_value = "1")]
    guild: u64,

    /// Member issuing the commands
    #[arg(short, long, default_value = "1")]
    member: u64,

    /// List the available commands and exit
    #[arg(long)]
    list: bool,

    /// Command line to run; reads stdin when empty
    words: Vec<String>,
}

struct Session {
    guild_id: GuildId,
    member_id: MemberId,
    directory: Arc<MemoryDirectory>,
    dispatcher: CommandDispatcher,
}

impl Session {
    async fn run_line(&self, line: &str, responder: &dyn Responder) -> Result<()> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(());
        }

        let Some((command, args)) = self.dispatcher.registry().resolve(&words) else {
            let unknown = cascade_core::CascadeError::unknown_command(words[0]);
            responder.error(&unknown).await?;
            return Ok(());
        };

        // request-time identity, re-resolved by the gate
        let caller = self
            .directory
            .member(self.guild_id, self.member_id)
            .await?
            .unwrap_or_else(|| CallerIdentity::new(self.guild_id, self.member_id));

        let invocation = CommandInvocation {
            guild_id: self.guild_id,
            caller,
            name: command.name().to_string(),
            args,
        };
        self.dispatcher.handle(invocation, responder).await?;
        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<CascadeConfig> {
    match path {
        Some(path) => CascadeConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => {
            let mut config = CascadeConfig::default();
            config.merge_with_env()?;
            config.validate()?;
            Ok(config)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let registry = Arc::new(CommandRegistry::with_builtin()?);
    if cli.list {
        for name in registry.names() {
            if let Some(command) = registry.get(name) {
                println!("{name} {}", command.usage());
            }
        }
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;
    let guild_id = GuildId::new(cli.guild);
    let member_id = MemberId::new(cli.member);

    let directory = Arc::new(MemoryDirectory::new());
    let permissions = Arc::new(PermissionModel::builtin()?);
    let fixture = match &cli.fixture {
        Some(path) => Fixture::load(path).context("loading fixture")?,
        None => Fixture::single(guild_id, member_id),
    };
    fixture.apply(&directory, &permissions)?;

    let gate = GuildGate::new(
        directory.clone(),
        Arc::new(MemoryStore::new()),
        permissions,
        &config,
    )?;
    tracing::debug!(guild_id = %guild_id, member_id = %member_id, "gateway ready");

    let session = Session {
        guild_id,
        member_id,
        directory,
        dispatcher: CommandDispatcher::new(gate, registry),
    };
    let responder = ConsoleResponder::stdio();

    if !cli.words.is_empty() {
        return session.run_line(&cli.words.join(" "), &responder).await;
    }

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        session.run_line(&line, &responder).await?;
    }
    Ok(())
}
