//! Filtered group listing against the legacy store.

use crate::common::{
    GatewayCall, RecordingGateway, legacy_directory, recording_engine, seeded_store,
};
use scim_group_compat::{
    CompatError, FilterCondition, FilterOperation, GroupEnrichmentEngine, GroupRecord,
    ListGroupsRequest,
};

fn names(results: &[GroupRecord]) -> Vec<&str> {
    results.iter().map(|group| group.name.as_str()).collect()
}

#[test]
fn test_display_name_starts_with_across_domains() {
    let engine = recording_engine();
    let request = ListGroupsRequest::new(FilterCondition::expression(
        "displayName",
        FilterOperation::Sw,
        "eng",
    ));
    let mut results = Vec::new();

    engine.list_groups(&legacy_directory(), &request, &mut results).unwrap();

    assert_eq!(
        names(&results),
        vec!["AD/engineering-leads", "LDAP/engineering", "engineering"]
    );
    let primary = &results[2];
    assert_eq!(primary.id(), Some("g2"));
    assert_eq!(primary.display_name(), Some("engineering"));
    assert_eq!(primary.user_store_domain(), Some("PRIMARY"));
    assert_eq!(primary.created_at.as_deref(), Some("2021-02-01"));
    assert_eq!(primary.last_modified_at.as_deref(), Some("2021-06-01"));
    assert_eq!(
        primary.location.as_deref(),
        Some("https://localhost:9443/scim2/Groups/g2")
    );

    let calls = engine.gateway().calls();
    assert_eq!(calls[0], (GatewayCall::Search, "eng%".to_string()));
    assert_eq!(calls.len(), 4);
}

#[test]
fn test_domain_restricts_results() {
    let engine = recording_engine();
    let request = ListGroupsRequest::new(FilterCondition::expression(
        "displayName",
        FilterOperation::Co,
        "gineer",
    ))
    .with_domain("LDAP");
    let mut results = Vec::new();

    engine.list_groups(&legacy_directory(), &request, &mut results).unwrap();

    assert_eq!(names(&results), vec!["LDAP/engineering"]);
    assert_eq!(results[0].user_store_domain(), Some("LDAP"));
}

#[test]
fn test_domain_qualified_value_keeps_domain_out_of_wildcard() {
    let engine = recording_engine();
    let request = ListGroupsRequest::new(FilterCondition::expression(
        "displayName",
        FilterOperation::Ew,
        "AD/leads",
    ));
    let mut results = Vec::new();

    engine.list_groups(&legacy_directory(), &request, &mut results).unwrap();

    assert_eq!(names(&results), vec!["AD/engineering-leads"]);
    assert_eq!(
        engine.gateway().calls()[0],
        (GatewayCall::Search, "AD/%leads".to_string())
    );
}

#[test]
fn test_filter_on_metadata_attribute() {
    let engine = recording_engine();
    let request = ListGroupsRequest::new(FilterCondition::expression(
        "META.CREATED",
        FilterOperation::Sw,
        "2022",
    ));
    let mut results = Vec::new();

    engine.list_groups(&legacy_directory(), &request, &mut results).unwrap();

    assert_eq!(names(&results), vec!["AD/engineering-leads", "LDAP/sales"]);
}

#[test]
fn test_paging_and_sorting_are_not_applied() {
    let engine = recording_engine();
    let request = ListGroupsRequest::new(FilterCondition::expression(
        "displayName",
        FilterOperation::Sw,
        "eng",
    ))
    .with_paging(1, 2)
    .with_sorting("displayName", "descending");
    let mut results = Vec::new();

    engine.list_groups(&legacy_directory(), &request, &mut results).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].name, "AD/engineering-leads");
}

#[test]
fn test_no_match_leaves_results_unchanged() {
    let engine = recording_engine();
    let request = ListGroupsRequest::new(FilterCondition::expression(
        "id",
        FilterOperation::Eq,
        "does-not-exist",
    ));
    let mut results = vec![GroupRecord::named("from-directory")];

    engine.list_groups(&legacy_directory(), &request, &mut results).unwrap();

    assert_eq!(results, vec![GroupRecord::named("from-directory")]);
    assert_eq!(engine.gateway().call_count(), 1);
}

#[test]
fn test_compound_filter_rejected_before_any_lookup() {
    let engine = recording_engine();
    let request = ListGroupsRequest::new(FilterCondition::and(
        FilterCondition::expression("displayName", FilterOperation::Sw, "eng"),
        FilterCondition::expression("meta.created", FilterOperation::Sw, "2021"),
    ));
    let mut results = Vec::new();

    let err = engine
        .list_groups(&legacy_directory(), &request, &mut results)
        .unwrap_err();

    assert!(matches!(
        err,
        CompatError::UnsupportedFilter { ref user_store } if user_store == "PRIMARY"
    ));
    assert_eq!(engine.gateway().call_count(), 0);
}

#[test]
fn test_attribute_resolution_errors_make_no_lookups() {
    let engine = recording_engine();
    let mut results = Vec::new();

    for (attribute, operation) in [
        ("", FilterOperation::Eq),
        ("members", FilterOperation::Eq),
        ("meta.lastModified", FilterOperation::Le),
    ] {
        let request =
            ListGroupsRequest::new(FilterCondition::expression(attribute, operation, "x"));
        assert!(engine.list_groups(&legacy_directory(), &request, &mut results).is_err());
    }

    assert_eq!(engine.gateway().call_count(), 0);
}

#[test]
fn test_failed_attribute_lookup_appends_nothing() {
    let gateway = RecordingGateway::new(seeded_store()).failing_on(GatewayCall::Attributes, 1);
    let engine = GroupEnrichmentEngine::new(gateway);
    let request = ListGroupsRequest::new(FilterCondition::expression(
        "displayName",
        FilterOperation::Sw,
        "eng",
    ));
    let mut results = vec![GroupRecord::named("from-directory")];

    let err = engine
        .list_groups(&legacy_directory(), &request, &mut results)
        .unwrap_err();

    assert!(matches!(
        err,
        CompatError::LookupFailed { ref subject, operation: "group attributes", .. }
            if subject == "LDAP/engineering"
    ));
    assert_eq!(results, vec![GroupRecord::named("from-directory")]);
}
