//! Shared harness for gateway integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use cascade_core::{
    CallerIdentity, CascadeConfig, Guild, GuildDirectory, GuildId, MemberId, MemoryDirectory,
    PermissionModel, Result, RoleId,
};
use cascade_gateway::{
    ApiDispatcher, CommandDispatcher, CommandInvocation, CommandRegistry, CommandReply, GuildGate,
    SettingsApi,
};
use cascade_settings::{GuildData, MemoryStore, SettingsStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const GUILD: GuildId = GuildId::new(1000);
pub const OWNER: MemberId = MemberId::new(1);
pub const ALICE: MemberId = MemberId::new(2);
pub const BOB: MemberId = MemberId::new(3);
pub const ADMIN_ROLE: RoleId = RoleId::new(50);

/// Directory wrapper that counts lookups and can be slowed down.
#[derive(Default)]
pub struct CountingDirectory {
    pub inner: MemoryDirectory,
    pub calls: AtomicUsize,
    pub delay: Option<Duration>,
}

impl CountingDirectory {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl GuildDirectory for CountingDirectory {
    async fn guild(&self, guild_id: GuildId) -> Result<Option<Guild>> {
        self.pause().await;
        self.inner.guild(guild_id).await
    }

    async fn member(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
    ) -> Result<Option<CallerIdentity>> {
        self.pause().await;
        self.inner.member(guild_id, member_id).await
    }
}

/// Store wrapper that yields between load and store, widening race windows.
#[derive(Default)]
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

#[async_trait]
impl SettingsStore for SlowStore {
    async fn load(&self, guild_id: GuildId) -> Result<Option<GuildData>> {
        let data = self.inner.load(guild_id).await?;
        tokio::time::sleep(self.delay).await;
        Ok(data)
    }

    async fn store(&self, guild_id: GuildId, data: GuildData) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.store(guild_id, data).await
    }
}

pub struct Harness {
    pub directory: Arc<CountingDirectory>,
    pub store: Arc<SlowStore>,
    pub permissions: Arc<PermissionModel>,
    pub gate: GuildGate,
    pub commands: CommandDispatcher,
    pub api: ApiDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(None, Duration::ZERO, CascadeConfig::default())
    }

    pub fn build(
        directory_delay: Option<Duration>,
        store_delay: Duration,
        config: CascadeConfig,
    ) -> Self {
        let directory = Arc::new(CountingDirectory {
            delay: directory_delay,
            ..CountingDirectory::default()
        });
        directory.inner.insert_guild(Guild {
            id: GUILD,
            name: "cascade".into(),
            owner_id: OWNER,
        });
        directory.inner.add_member(GUILD, ALICE, Vec::<RoleId>::new()).unwrap();
        directory.inner.add_member(GUILD, BOB, Vec::<RoleId>::new()).unwrap();

        let store = Arc::new(SlowStore {
            delay: store_delay,
            ..SlowStore::default()
        });
        let permissions = Arc::new(PermissionModel::builtin().unwrap());
        let gate = GuildGate::new(
            directory.clone(),
            store.clone(),
            permissions.clone(),
            &config,
        )
        .unwrap();
        let registry = Arc::new(CommandRegistry::with_builtin().unwrap());

        Self {
            commands: CommandDispatcher::new(gate.clone(), registry),
            api: ApiDispatcher::new(SettingsApi::new(gate.clone())),
            directory,
            store,
            permissions,
            gate,
        }
    }

    pub fn caller(&self, member: MemberId) -> CallerIdentity {
        CallerIdentity::new(GUILD, member)
    }

    pub fn invocation(&self, member: MemberId, line: &str) -> CommandInvocation {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (command, args) = self
            .commands
            .registry()
            .resolve(&words)
            .unwrap_or_else(|| panic!("no command for `{line}`"));
        CommandInvocation {
            guild_id: GUILD,
            caller: self.caller(member),
            name: command.name().to_string(),
            args,
        }
    }

    pub async fn run(&self, member: MemberId, line: &str) -> Result<CommandReply> {
        self.commands.dispatch(self.invocation(member, line)).await
    }

    pub fn grant(&self, member: MemberId, key: &str) {
        self.permissions
            .set_member_override(GUILD, member, key, true)
            .unwrap();
    }

    pub fn writes(&self) -> u64 {
        self.store.inner.writes()
    }

    pub fn data(&self) -> Option<GuildData> {
        self.store.inner.snapshot(GUILD)
    }
}

pub fn text(reply: CommandReply) -> String {
    match reply {
        CommandReply::Text { text } => text,
        other => panic!("expected text reply, got {other:?}"),
    }
}
