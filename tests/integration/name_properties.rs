//! Property tests for group name normalization.

use proptest::prelude::*;
use scim_group_compat::NameNormalizer;

/// Group names without the domain separator.
fn plain_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_. -]{1,24}"
}

/// Display names that may themselves contain the separator, never leading.
fn nested_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_. -]{1,12}(/[A-Za-z0-9_. -]{0,12}){0,2}"
}

/// Secondary domain names, never the primary one.
fn secondary_domain() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9-]{0,11}"
        .prop_filter("primary domain", |d| !d.eq_ignore_ascii_case("PRIMARY"))
}

/// Either `name` or `DOMAIN/name`.
fn group_name() -> impl Strategy<Value = String> {
    (proptest::option::of(secondary_domain()), nested_name()).prop_map(|(domain, name)| {
        match domain {
            Some(domain) => format!("{domain}/{name}"),
            None => name,
        }
    })
}

/// Names whose own domain is the primary one: bare, or behind a primary qualifier.
fn primary_group_name() -> impl Strategy<Value = String> {
    prop_oneof![
        plain_name(),
        (prop::sample::select(vec!["PRIMARY", "primary"]), nested_name())
            .prop_map(|(primary, name)| format!("{primary}/{name}")),
    ]
}

proptest! {
    #[test]
    fn secondary_domain_names_are_qualified(name in group_name(), domain in secondary_domain()) {
        let normalizer = NameNormalizer::default();
        let canonical = normalizer.resolve_canonical_name(&name, &domain);

        prop_assert!(normalizer.is_qualified(&canonical));
        prop_assert_eq!(normalizer.strip_domain(&canonical), normalizer.strip_domain(&name));
    }

    #[test]
    fn primary_domain_names_are_stripped(
        name in primary_group_name(),
        primary in prop::sample::select(vec!["PRIMARY", "primary", "Primary"]),
    ) {
        let normalizer = NameNormalizer::default();
        prop_assert_eq!(
            normalizer.resolve_canonical_name(&name, primary),
            normalizer.strip_domain(&name).to_string()
        );
    }

    #[test]
    fn canonical_name_is_idempotent(
        name in group_name(),
        domain in prop_oneof![Just("PRIMARY".to_string()), secondary_domain()],
    ) {
        let normalizer = NameNormalizer::default();
        let once = normalizer.resolve_canonical_name(&name, &domain);
        let twice = normalizer.resolve_canonical_name(&once, &domain);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn extracted_domain_and_display_name_rebuild_the_name(
        domain in secondary_domain(),
        name in plain_name(),
    ) {
        let normalizer = NameNormalizer::default();
        let qualified = format!("{domain}/{name}");

        let extracted = normalizer.extract_domain(&qualified);
        let display = normalizer.strip_domain(&qualified);

        prop_assert_eq!(display, name.as_str());
        prop_assert!(extracted.eq_ignore_ascii_case(&domain));
        let rebuilt = normalizer.add_domain(display, &extracted);
        prop_assert!(rebuilt.eq_ignore_ascii_case(&qualified));
    }
}
