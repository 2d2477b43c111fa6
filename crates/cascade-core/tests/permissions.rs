//! Permission resolution against directory-resolved identities

use cascade_core::{
    permissions, CallerIdentity, Guild, GuildDirectory, GuildId, MemberId, MemoryDirectory,
    PermissionModel, RoleId,
};

fn directory() -> MemoryDirectory {
    let directory = MemoryDirectory::new();
    directory.insert_guild(Guild {
        id: GuildId::new(1),
        name: "one".to_string(),
        owner_id: MemberId::new(1),
    });
    directory.insert_guild(Guild {
        id: GuildId::new(2),
        name: "two".to_string(),
        owner_id: MemberId::new(2),
    });
    directory
        .add_member(GuildId::new(1), MemberId::new(10), [RoleId::new(100)])
        .unwrap();
    directory
}

async fn resolve(directory: &MemoryDirectory, guild: u64, member: u64) -> CallerIdentity {
    directory
        .member(GuildId::new(guild), MemberId::new(member))
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_role_grant_follows_role_changes() {
    let directory = directory();
    let model = PermissionModel::builtin().unwrap();
    model
        .set_role_override(GuildId::new(1), RoleId::new(100), "tag.create", true)
        .unwrap();

    let caller = resolve(&directory, 1, 10).await;
    assert!(model.check(&caller, &permissions::TAG_CREATE).is_ok());

    directory
        .set_roles(GuildId::new(1), MemberId::new(10), Vec::<RoleId>::new())
        .unwrap();
    let caller = resolve(&directory, 1, 10).await;
    assert!(model.check(&caller, &permissions::TAG_CREATE).is_err());
}

#[tokio::test]
async fn test_identity_from_one_guild_has_no_standing_in_another() {
    let directory = directory();
    let model = PermissionModel::builtin().unwrap();
    model
        .set_member_override(GuildId::new(1), MemberId::new(10), "prefix.set", true)
        .unwrap();

    let caller = resolve(&directory, 1, 10).await;
    assert!(model.resolve(GuildId::new(1), &caller, "prefix.set"));
    assert!(!model.resolve(GuildId::new(2), &caller, "prefix.set"));
    assert!(!model.resolve(GuildId::new(2), &caller, "todo.view"));
}
