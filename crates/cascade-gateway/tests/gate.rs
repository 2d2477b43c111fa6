//! Gate behaviour: resolution failures, timeouts, serialization, cancellation.

mod common;

use assert_matches::assert_matches;
use cascade_core::{CascadeConfig, CascadeError, GuildId, MemberId};
use cascade_gateway::{ApiInvocation, ApiRequest, ApiResponse};
use common::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_missing_guild_never_calls_work() {
    let harness = Harness::new();
    let calls = AtomicUsize::new(0);

    for guild in [GuildId::new(1), GuildId::new(2), GuildId::new(u64::MAX)] {
        let result = harness
            .gate
            .run_if_authenticated_guild(guild, OWNER, |_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert_matches!(result, Err(CascadeError::TenantNotFound { guild_id }) if guild_id == guild);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_member_never_calls_work() {
    let harness = Harness::new();
    let calls = AtomicUsize::new(0);

    let result = harness
        .gate
        .run_if_authenticated_guild(GUILD, MemberId::new(404), |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

    assert_matches!(result, Err(CascadeError::CallerNotAuthenticated { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_member_who_left_is_rejected() {
    let harness = Harness::new();
    harness
        .gate
        .run_if_authenticated_guild(GUILD, ALICE, |_| async { Ok(()) })
        .await
        .unwrap();

    harness.directory.inner.remove_member(GUILD, ALICE);
    let result = harness
        .gate
        .run_if_authenticated_guild(GUILD, ALICE, |_| async { Ok(()) })
        .await;
    assert_matches!(result, Err(CascadeError::CallerNotAuthenticated { member_id, .. }) if member_id == ALICE);
}

#[tokio::test]
async fn test_identity_is_re_resolved() {
    let harness = Harness::new();
    harness
        .directory
        .inner
        .set_roles(GUILD, ALICE, [ADMIN_ROLE])
        .unwrap();

    let roles = harness
        .gate
        .run_if_authenticated_guild(GUILD, ALICE, |ctx| async move {
            Ok(ctx.caller().roles.clone())
        })
        .await
        .unwrap();
    assert!(roles.contains(&ADMIN_ROLE));
}

#[tokio::test]
async fn test_slow_directory_times_out() {
    let mut config = CascadeConfig::default();
    config.gate.resolve_timeout_ms = 20;
    let harness = Harness::build(Some(Duration::from_millis(500)), Duration::ZERO, config);
    let calls = AtomicUsize::new(0);

    let result = harness
        .gate
        .run_if_authenticated_guild(GUILD, OWNER, |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

    assert_matches!(result, Err(CascadeError::Timeout { elapsed_ms: 20, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_disjoint_updates_both_land() {
    let harness = Harness::build(None, Duration::from_millis(10), CascadeConfig::default());
    harness.grant(ALICE, "settings.edit");
    harness.grant(BOB, "settings.edit");

    let update = |member: MemberId, updates: serde_json::Value| ApiInvocation {
        guild_id: GUILD,
        caller: harness.caller(member),
        request: ApiRequest::UpdateCoreSettings {
            updates: match updates {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            },
        },
    };

    let (first, second) = futures::join!(
        harness
            .api
            .dispatch(update(ALICE, json!({"delete_command": true}))),
        harness
            .api
            .dispatch(update(BOB, json!({"locale": "de_DE", "mention_prefix": true}))),
    );
    assert_matches!(first, Ok(ApiResponse::CoreSettings(_)));
    assert_matches!(second, Ok(ApiResponse::CoreSettings(_)));

    let settings = harness.data().unwrap().settings;
    assert!(settings.delete_command());
    assert!(settings.mention_prefix());
    assert_eq!(settings.locale().code(), "de_DE");
    assert_eq!(harness.gate.locked_guilds(), 0);
}

#[tokio::test]
async fn test_many_concurrent_tag_writes_serialize() {
    let harness = Harness::build(None, Duration::from_millis(2), CascadeConfig::default());
    harness.grant(ALICE, "tag.create");

    let writes = (0..8).map(|i| {
        let invocation = harness.invocation(ALICE, &format!("tag create t{i} content {i}"));
        harness.commands.dispatch(invocation)
    });
    let results = futures::future::join_all(writes).await;
    assert!(results.iter().all(Result::is_ok));

    assert_eq!(harness.data().unwrap().settings.tags().len(), 8);
}

#[tokio::test]
async fn test_cancelled_work_leaves_no_trace() {
    let harness = Harness::build(None, Duration::from_millis(200), CascadeConfig::default());
    harness.grant(ALICE, "tag.create");

    // snapshot load takes 200ms, so 300ms cancels inside the transaction
    let cancelled = tokio::time::timeout(
        Duration::from_millis(300),
        harness.run(ALICE, "tag create rules be nice"),
    )
    .await;
    assert!(cancelled.is_err());

    assert_eq!(harness.writes(), 0);
    assert!(harness.data().is_none());
    assert_eq!(harness.gate.locked_guilds(), 0);
}
