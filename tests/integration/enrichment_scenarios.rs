//! End-to-end behaviour of the single-group and per-user hooks.

use crate::common::{
    GatewayCall, RecordingGateway, TENANT, attributes, legacy_directory, recording_engine,
    seeded_store,
};
use scim_group_compat::storage::InMemoryLegacyGroupStore;
use scim_group_compat::{
    CompatError, GatewayError, GroupEnrichmentEngine, GroupRecord, LegacyAttributeSet,
    LegacyGroupGateway,
};

#[test]
fn test_resolve_primary_group_by_qualified_name() {
    let store = InMemoryLegacyGroupStore::new();
    store
        .put_attributes(TENANT, "alice", attributes("g1", "2021-01-01", "2021-06-01"))
        .unwrap();
    let engine = GroupEnrichmentEngine::new(store);

    let group = engine
        .resolve_group_by_name(
            &legacy_directory(),
            "PRIMARY/alice",
            &["displayName".to_string()],
            None,
        )
        .unwrap()
        .unwrap();

    assert_eq!(group.id(), Some("g1"));
    assert_eq!(group.name, "alice");
    assert_eq!(group.display_name(), Some("alice"));
    assert_eq!(group.user_store_domain(), Some("PRIMARY"));
    assert_eq!(group.created_at.as_deref(), Some("2021-01-01"));
    assert_eq!(group.last_modified_at.as_deref(), Some("2021-06-01"));
    assert_eq!(
        group.location.as_deref(),
        Some("https://localhost:9443/scim2/Groups/g1")
    );
}

#[test]
fn test_unknown_group_id_is_not_an_error() {
    let engine = recording_engine();
    let input = Some(GroupRecord::named("bob"));

    let result = engine
        .resolve_group_id(&legacy_directory(), "bob", input.clone())
        .unwrap();

    assert_eq!(result, input);
    assert_eq!(engine.gateway().call_count(), 1);
}

#[test]
fn test_unknown_name_and_attributes_are_not_errors() {
    let engine = recording_engine();
    let directory = legacy_directory();

    assert_eq!(engine.resolve_group_name(&directory, "g-missing", None).unwrap(), None);
    assert_eq!(engine.resolve_group_by_id(&directory, "g-missing", &[], None).unwrap(), None);
    assert_eq!(engine.resolve_group_by_name(&directory, "LDAP/nobody", &[], None).unwrap(), None);

    // by-id stops after the name lookup
    let kinds: Vec<GatewayCall> = engine
        .gateway()
        .calls()
        .into_iter()
        .map(|(kind, _)| kind)
        .collect();
    assert_eq!(
        kinds,
        vec![GatewayCall::NameById, GatewayCall::NameById, GatewayCall::Attributes]
    );
}

/// Legacy rows whose name column is blank.
struct BlankNameGateway;

impl LegacyGroupGateway for BlankNameGateway {
    fn lookup_id_by_name(&self, _: &str, _: &str) -> Result<Option<String>, GatewayError> {
        Ok(Some("   ".to_string()))
    }

    fn lookup_name_by_id(&self, _: &str, _: &str) -> Result<Option<String>, GatewayError> {
        Ok(Some(" ".to_string()))
    }

    fn lookup_attributes(&self, _: &str, _: &str) -> Result<LegacyAttributeSet, GatewayError> {
        panic!("attributes must not be fetched for a blank name");
    }

    fn search_names(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: Option<&str>,
    ) -> Result<Vec<String>, GatewayError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_blank_lookup_results_count_as_missing() {
    let engine = GroupEnrichmentEngine::new(BlankNameGateway);
    let directory = legacy_directory();
    let input = Some(GroupRecord::with_id("g1"));

    assert_eq!(engine.resolve_group_name(&directory, "g1", input.clone()).unwrap(), input);
    assert_eq!(engine.resolve_group_by_id(&directory, "g1", &[], input.clone()).unwrap(), input);
    assert_eq!(engine.resolve_group_id(&directory, "alice", None).unwrap(), None);

    let mut groups = vec![GroupRecord::named("alice")];
    engine.enrich_groups_for_user(&directory, "u1", &mut groups).unwrap();
    assert_eq!(groups[0].id(), None);
}

#[test]
fn test_resolve_group_by_id_for_secondary_domain() {
    let engine = recording_engine();
    let existing = GroupRecord {
        id: Some("stale".to_string()),
        name: "stale".to_string(),
        created_at: Some("1999-01-01".to_string()),
        ..Default::default()
    };

    let group = engine
        .resolve_group_by_id(&legacy_directory(), "g3", &[], Some(existing))
        .unwrap()
        .unwrap();

    assert_eq!(group.id(), Some("g3"));
    assert_eq!(group.name, "LDAP/engineering");
    assert_eq!(group.display_name(), Some("engineering"));
    assert_eq!(group.user_store_domain(), Some("LDAP"));
    assert_eq!(group.created_at.as_deref(), Some("2021-03-01"));
    assert_eq!(
        group.location.as_deref(),
        Some("https://localhost:9443/scim2/Groups/g3")
    );
    assert_eq!(
        engine.gateway().calls(),
        vec![
            (GatewayCall::NameById, "g3".to_string()),
            (GatewayCall::Attributes, "LDAP/engineering".to_string()),
        ]
    );
}

#[test]
fn test_resolve_group_name_derives_names() {
    let engine = recording_engine();

    let group = engine
        .resolve_group_name(&legacy_directory(), "g1", Some(GroupRecord::named("old")))
        .unwrap()
        .unwrap();

    assert_eq!(group.id(), Some("g1"));
    assert_eq!(group.name, "alice");
    assert_eq!(group.display_name(), Some("alice"));
    assert_eq!(group.user_store_domain(), Some("PRIMARY"));
    assert!(group.created_at.is_none());
}

#[test]
fn test_enrich_groups_for_user() {
    let engine = recording_engine();
    let mut groups = vec![
        GroupRecord::named("alice"),
        GroupRecord::named("LDAP/sales"),
        GroupRecord::named("AD/unknown"),
    ];

    engine
        .enrich_groups_for_user(&legacy_directory(), "u1", &mut groups)
        .unwrap();

    let ids: Vec<Option<&str>> = groups.iter().map(GroupRecord::id).collect();
    assert_eq!(ids, vec![Some("g1"), Some("g4"), None]);
    assert!(groups.iter().all(|g| g.display_name.is_none()));
    assert_eq!(engine.gateway().call_count(), 3);
}

#[test]
fn test_enrich_groups_aborts_whole_batch() {
    let gateway = RecordingGateway::new(seeded_store()).failing_on(GatewayCall::IdByName, 1);
    let engine = GroupEnrichmentEngine::new(gateway);
    let mut groups = vec![
        GroupRecord::named("alice"),
        GroupRecord::named("LDAP/sales"),
        GroupRecord::named("engineering"),
    ];
    let before = groups.clone();

    let err = engine
        .enrich_groups_for_user(&legacy_directory(), "u1", &mut groups)
        .unwrap_err();

    match err {
        CompatError::LookupFailed {
            tenant_id,
            subject,
            operation,
            ..
        } => {
            assert_eq!(tenant_id, TENANT);
            assert_eq!(subject, "LDAP/sales");
            assert_eq!(operation, "group id");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(groups, before);
    // No further lookups after the failure
    assert_eq!(engine.gateway().call_count(), 2);
}

#[test]
fn test_attribute_failure_is_propagated() {
    let gateway = RecordingGateway::new(seeded_store()).failing_on(GatewayCall::Attributes, 0);
    let engine = GroupEnrichmentEngine::new(gateway);

    let err = engine
        .resolve_group_by_id(&legacy_directory(), "g2", &[], None)
        .unwrap_err();
    assert!(matches!(
        err,
        CompatError::LookupFailed {
            ref subject,
            operation: "group attributes",
            ..
        } if subject == "g2"
    ));

    let err = engine
        .resolve_group_by_name(&legacy_directory(), "engineering", &[], None)
        .unwrap_err();
    assert!(err.to_string().contains("engineering"));
}
