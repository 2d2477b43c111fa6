//! Typed API adapter.

mod common;

use assert_matches::assert_matches;
use cascade_core::{CascadeError, GuildId};
use cascade_gateway::{ApiInvocation, ApiRequest, ApiResponse};
use cascade_settings::{Module, Tag};
use common::*;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

fn invoke(member: cascade_core::MemberId, request: ApiRequest) -> ApiInvocation {
    ApiInvocation {
        guild_id: GUILD,
        caller: cascade_core::CallerIdentity::new(GUILD, member),
        request,
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[tokio::test]
async fn test_settings_information_needs_no_guild() {
    let harness = Harness::new();
    let mut invocation = invoke(ALICE, ApiRequest::SettingsInformation);
    invocation.guild_id = GuildId::new(1);

    let response = harness.api.dispatch(invocation).await.unwrap();
    let ApiResponse::SettingsInformation(info) = response else {
        panic!("unexpected response");
    };
    let prefix = info.iter().find(|i| i.name == "prefix").unwrap();
    assert!(!prefix.editable);
    assert_eq!(harness.directory.calls(), 0);
}

#[tokio::test]
async fn test_update_core_settings_is_atomic() {
    let harness = Harness::new();
    harness.grant(OWNER, "settings.edit");

    let result = harness
        .api
        .dispatch(invoke(
            OWNER,
            ApiRequest::UpdateCoreSettings {
                updates: object(json!({"mention_prefix": true, "prefix": "!"})),
            },
        ))
        .await;

    assert_matches!(result, Err(CascadeError::FieldNotEditable { field }) if field == "prefix");
    assert_eq!(harness.writes(), 0);
}

#[tokio::test]
async fn test_update_core_settings_reports_fields() {
    let harness = Harness::new();
    harness.grant(OWNER, "settings.edit");

    let response = harness
        .api
        .dispatch(invoke(
            OWNER,
            ApiRequest::UpdateCoreSettings {
                updates: object(json!({"show_module_errors": true, "fromTheFuture": 1})),
            },
        ))
        .await
        .unwrap();

    let ApiResponse::CoreSettings(report) = response else {
        panic!("unexpected response");
    };
    assert_eq!(report.applied, vec!["show_module_errors".to_string()]);
    assert_eq!(report.ignored, vec!["fromTheFuture".to_string()]);
    assert!(harness.data().unwrap().settings.show_module_errors());
}

#[tokio::test]
async fn test_type_mismatch_leaves_settings() {
    let harness = Harness::new();
    harness.grant(OWNER, "settings.edit");

    let result = harness
        .api
        .dispatch(invoke(
            OWNER,
            ApiRequest::UpdateCoreSettings {
                updates: object(json!({"command_aliases": ["not", "a", "map"]})),
            },
        ))
        .await;
    assert_matches!(result, Err(CascadeError::TypeMismatch { field, .. }) if field == "command_aliases");
    assert!(harness.data().is_none());
}

#[tokio::test]
async fn test_modules_via_api() {
    let harness = Harness::new();
    harness.grant(OWNER, "module.disable");
    harness.grant(OWNER, "module.enable");

    let response = harness
        .api
        .dispatch(invoke(OWNER, ApiRequest::DisableModule { module: Module::Music }))
        .await
        .unwrap();
    assert_matches!(response, ApiResponse::Modules(modules) if !modules.contains(&Module::Music));

    assert_matches!(
        harness
            .api
            .dispatch(invoke(OWNER, ApiRequest::DisableModule { module: Module::Core }))
            .await,
        Err(CascadeError::InvalidArgument { .. })
    );

    let response = harness
        .api
        .dispatch(invoke(OWNER, ApiRequest::EnableModule { module: Module::Music }))
        .await
        .unwrap();
    assert_matches!(response, ApiResponse::Modules(modules) if modules.len() == Module::ALL.len());
}

#[tokio::test]
async fn test_tags_via_api() {
    let harness = Harness::new();
    harness.grant(OWNER, "tag.create");
    harness.grant(OWNER, "tag.delete");

    let mut tags = BTreeMap::new();
    tags.insert("rules".to_string(), Tag::new("be nice"));
    tags.insert("faq".to_string(), Tag::with_category("read it", "help"));
    harness
        .api
        .dispatch(invoke(OWNER, ApiRequest::UpdateTags { tags }))
        .await
        .unwrap();

    let names: BTreeSet<String> = ["rules".to_string(), "absent".to_string()].into();
    let response = harness
        .api
        .dispatch(invoke(OWNER, ApiRequest::RemoveTags { names }))
        .await
        .unwrap();
    let ApiResponse::Tags(left) = response else {
        panic!("unexpected response");
    };
    assert_eq!(left.len(), 1);
    assert_eq!(left["faq"].category, "help");
}

#[tokio::test]
async fn test_invalid_tag_batch_applies_nothing() {
    let harness = Harness::new();
    harness.grant(OWNER, "tag.create");

    let mut tags = BTreeMap::new();
    tags.insert("good".to_string(), Tag::new("fine"));
    tags.insert("bad name".to_string(), Tag::new("rejected"));
    let result = harness
        .api
        .dispatch(invoke(OWNER, ApiRequest::UpdateTags { tags }))
        .await;

    assert_matches!(result, Err(CascadeError::InvalidArgument { .. }));
    assert!(harness.data().is_none());
}

#[tokio::test]
async fn test_set_prefix_via_api() {
    let harness = Harness::new();

    assert_matches!(
        harness
            .api
            .dispatch(invoke(ALICE, ApiRequest::SetPrefix { prefix: "!".into() }))
            .await,
        Err(CascadeError::PermissionDenied { .. })
    );

    harness.grant(ALICE, "prefix.set");
    assert_matches!(
        harness
            .api
            .dispatch(invoke(ALICE, ApiRequest::SetPrefix { prefix: " !".into() }))
            .await,
        Err(CascadeError::InvalidPrefix { .. })
    );
    let response = harness
        .api
        .dispatch(invoke(ALICE, ApiRequest::SetPrefix { prefix: "!c".into() }))
        .await
        .unwrap();
    assert_eq!(response, ApiResponse::Prefix("!c".into()));
}

#[tokio::test]
async fn test_caller_from_other_guild_is_denied() {
    let harness = Harness::new();
    harness.grant(OWNER, "prefix.set");

    let mut invocation = invoke(OWNER, ApiRequest::SetPrefix { prefix: "!".into() });
    invocation.caller.guild_id = GuildId::new(77);

    assert_matches!(
        harness.api.dispatch(invocation).await,
        Err(CascadeError::PermissionDenied { .. })
    );
}
