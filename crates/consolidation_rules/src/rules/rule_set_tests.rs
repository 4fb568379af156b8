//! Tests for consolidation rule sets.

use super::*;

fn rule_set_with(ids_and_regions: &[(&str, &str)]) -> ConsolidationRuleSet {
    let mut set = ConsolidationRuleSet::new("adv-1");
    set.rules = ids_and_regions
        .iter()
        .map(|(id, region)| ConsolidationRule::for_region(*id, *region))
        .collect();
    set
}

#[test]
fn test_new_rule_set_defaults() {
    let set = ConsolidationRuleSet::new("adv-1");

    assert_eq!(set.advertiser_ref, "adv-1");
    assert!(set.active);
    assert!(!set.enrichment_enabled);
    assert!(set.enrichment_dataset_refs.is_empty());
    assert!(set.rules.is_empty());
    assert_eq!(set.version, 0);
}

#[test]
fn test_add_rule_inserts_at_head() {
    let mut set = rule_set_with(&[("r1", "US")]);

    set.add_rule(ConsolidationRule::for_region("r2", "EMEA"));

    let ids: Vec<&str> = set.rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r1"]);
}

#[test]
fn test_remove_rule_is_idempotent() {
    let mut set = rule_set_with(&[("r1", "US"), ("r2", "EMEA")]);

    assert!(set.remove_rule("r1").is_some());
    assert!(set.remove_rule("r1").is_none());
    assert_eq!(set.rules.len(), 1);
}

#[test]
fn test_update_rule_replaces_in_place() {
    let mut set = rule_set_with(&[("r1", "US"), ("r2", "EMEA")]);
    let mut edited = ConsolidationRule::for_region("r1", "APAC");
    edited.cross_platform_enabled = true;

    set.update_rule(edited).expect("rule exists");

    assert_eq!(set.rules[0].region, "APAC");
    assert!(set.rules[0].cross_platform_enabled);
    assert_eq!(set.rules[1].id, "r2");
}

#[test]
fn test_update_unknown_rule_fails() {
    let mut set = rule_set_with(&[]);

    assert_eq!(
        set.update_rule(ConsolidationRule::new("nope")),
        Err(ConsolidationError::ConsolidationRuleNotFound {
            id: "nope".to_string()
        })
    );
}

#[test]
fn test_rule_for_region() {
    let set = rule_set_with(&[("r1", "US"), ("r2", "EMEA")]);

    assert_eq!(set.rule_for_region("EMEA").map(|r| r.id.as_str()), Some("r2"));
    assert!(set.rule_for_region("APAC").is_none());
}

#[test]
fn test_toggle_enrichment_dataset() {
    let mut set = ConsolidationRuleSet::new("adv-1");

    assert!(set.toggle_enrichment_dataset("s3_data_import"));
    assert!(set.enrichment_dataset_refs.contains("s3_data_import"));
    assert!(!set.toggle_enrichment_dataset("s3_data_import"));
    assert!(set.enrichment_dataset_refs.is_empty());
}

#[test]
fn test_normalize_applies_to_every_rule() {
    let mut set = rule_set_with(&[("r1", "US"), ("r2", "EMEA")]);
    for rule in &mut set.rules {
        rule.exclusion_filters
            .excluded_network_ids
            .insert(" 42 ".to_string());
    }

    set.normalize();

    for rule in &set.rules {
        assert!(rule.exclusion_filters.excluded_network_ids.contains("42"));
        assert!(!rule.exclusion_filters.needs_normalization());
    }
}

#[test]
fn test_bump_version() {
    let mut set = ConsolidationRuleSet::new("adv-1");

    assert_eq!(set.bump_version(), 1);
    assert_eq!(set.bump_version(), 2);
}

#[test]
fn test_bump_version_saturates_at_max() {
    let mut set = ConsolidationRuleSet::new("adv-1");
    set.version = u64::MAX;

    assert_eq!(set.bump_version(), u64::MAX);
}

#[test]
fn test_from_json_defaults_active_to_true() {
    let set = ConsolidationRuleSet::from_json(r#"{"advertiserRef":"adv-1"}"#)
        .expect("Failed to parse");

    assert!(set.active);
    assert_eq!(set.version, 0);
}

#[test]
fn test_from_json_rejects_malformed_document() {
    let result = ConsolidationRuleSet::from_json(r#"{"rules": 5}"#);

    assert!(matches!(
        result,
        Err(ConsolidationError::Serialization { .. })
    ));
}

#[test]
fn test_json_roundtrip_preserves_order() {
    let mut set = rule_set_with(&[("r1", "US"), ("r2", "EMEA")]);
    set.enrichment_enabled = true;
    set.toggle_enrichment_dataset("gcs_data_import");

    let json = set.to_json_pretty().expect("Failed to serialize");
    let parsed = ConsolidationRuleSet::from_json(&json).expect("Failed to parse");

    assert_eq!(parsed, set);
}

#[test]
fn test_json_schema_describes_document() {
    let schema = ConsolidationRuleSet::json_schema().expect("Failed to build schema");

    let properties = &schema["properties"];
    assert!(properties.get("advertiserRef").is_some());
    assert!(properties.get("enrichmentDatasetRefs").is_some());
    assert!(properties.get("rules").is_some());
}
