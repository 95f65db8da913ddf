//! Integration tests for directory and job models
//!
//! Decodes payloads shaped like real service responses and checks the
//! helpers built on top of them.

use serde_json::json;
use wecom_domain::{
    CallbackEvent, ChangeType, EventKind, ExportResult, ExportStatus, Gender, ImportResult,
    ImportStatus, PartyAction, TagMembers, User, UserStatus, WecomConfig, WecomError,
};

// ============================================================================
// Directory models
// ============================================================================

/// A full `user/get` payload keeps the fields the client models and drops
/// the rest.
#[test]
fn test_detailed_user_payload() {
    let user: User = serde_json::from_value(json!({
        "userid": "zhangsan",
        "name": "Zhang San",
        "department": [1, 2],
        "order": [10, 40],
        "position": "engineer",
        "mobile": "13800000000",
        "gender": "1",
        "email": "zhangsan@example.com",
        "is_leader_in_dept": [1, 0],
        "direct_leader": ["lisi"],
        "status": 1,
        "main_department": 1,
        "extattr": {"attrs": []},
        "external_profile": {
            "external_corp_name": "Example Corp",
            "external_attr": [
                {"type": 0, "name": "note", "text": {"value": "hello"}},
                {"type": 1, "name": "site", "web": {"url": "https://example.com", "title": "home"}}
            ]
        }
    }))
    .unwrap();

    assert_eq!(user.status(), Some(UserStatus::Active));
    assert_eq!(user.gender(), Some(Gender::Male));
    assert_eq!(user.is_leader_in_dept, vec![1, 0]);
    let profile = user.external_profile.unwrap();
    assert_eq!(profile.external_attr.len(), 2);
    assert_eq!(profile.external_attr[1].web.as_ref().unwrap().title, "home");
}

#[test]
fn test_tag_members_default_to_empty() {
    let members: TagMembers = serde_json::from_value(json!({"tagname": "ops"})).unwrap();
    assert!(members.userlist.is_empty());
    assert!(members.partylist.is_empty());
}

// ============================================================================
// Job results
// ============================================================================

#[test]
fn test_party_import_result_records() {
    let result: ImportResult = serde_json::from_value(json!({
        "status": 3,
        "type": "replace_party",
        "total": 2,
        "percentage": 100,
        "result": [
            {"action": 1, "partyid": 2, "errcode": 0, "errmsg": "ok"},
            {"action": 2, "partyid": 3, "errcode": 60008, "errmsg": "department existed"}
        ]
    }))
    .unwrap();

    assert_eq!(result.state(), Some(ImportStatus::Completed));
    let parties = result.party_results().unwrap();
    assert!(parties[0].has_action(PartyAction::Created));
    assert_eq!(
        parties[1].status.check().unwrap_err(),
        WecomError::service(60008, "department existed")
    );
}

#[test]
fn test_import_result_rejects_foreign_records() {
    let result: ImportResult =
        serde_json::from_value(json!({"status": 3, "result": [{"partyid": 2}]})).unwrap();
    assert!(matches!(result.user_results(), Err(WecomError::Serialization(_))));
}

#[test]
fn test_export_result_states() {
    let pending: ExportResult = serde_json::from_value(json!({"status": 1})).unwrap();
    assert_eq!(pending.state(), Some(ExportStatus::Processing));
    assert!(!pending.is_done());
    assert!(pending.data_list.is_empty());

    let done: ExportResult = serde_json::from_value(json!({
        "status": 2,
        "data_list": [{"url": "https://example.com/a", "size": 64, "md5": "abc"}]
    }))
    .unwrap();
    assert!(done.is_done());
    assert_eq!(done.data_list[0].size, 64);
}

// ============================================================================
// Events, errors and configuration
// ============================================================================

#[test]
fn test_unknown_change_type_is_preserved() {
    let event = CallbackEvent {
        event: "change_contact".into(),
        change_type: Some("update_external".into()),
        ..CallbackEvent::default()
    };
    assert_eq!(
        event.kind(),
        EventKind::ChangeContact(ChangeType::Unknown("update_external".into()))
    );
}

#[test]
fn test_error_serialization_is_tagged() {
    let value = serde_json::to_value(WecomError::Network("timeout".into())).unwrap();
    assert_eq!(value, json!({"type": "Network", "message": "timeout"}));

    let service = WecomError::service(-1, "");
    assert_eq!(service.to_string(), "Service error -1: request error with code -1");
}

#[test]
fn test_config_builder_chain() {
    let config = WecomConfig::new("ww1", "s")
        .with_base_urls("http://localhost:1/cgi-bin", "http://localhost:1")
        .with_debug(true);
    assert!(config.debug);
    assert!(config.validate().is_ok());
}
