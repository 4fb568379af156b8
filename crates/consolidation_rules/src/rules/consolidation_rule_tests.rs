//! Tests for consolidation rules.

use super::*;

#[test]
fn test_new_rule_defaults() {
    let rule = ConsolidationRule::new("rule_1");

    assert_eq!(rule.region, DEFAULT_REGION);
    assert!(!rule.cross_platform_enabled);
    assert!(!rule.web_to_cross_platform_enabled);
    assert!(rule.exclusion_filters.is_empty());
    assert!(rule.supplier_chain.is_empty());
}

#[test]
fn test_has_region_rejects_whitespace() {
    let mut rule = ConsolidationRule::for_region("rule_1", "  ");
    assert!(!rule.has_region());

    rule.region = "EMEA".to_string();
    assert!(rule.has_region());
}

#[test]
fn test_generated_ids_are_prefixed() {
    let id = ConsolidationRule::generate_id();

    assert!(id.starts_with("rule_"));
    assert_ne!(id, ConsolidationRule::generate_id());
}

#[test]
fn test_deserialize_minimal_rule() {
    let rule: ConsolidationRule =
        serde_json::from_str(r#"{"id":"r1"}"#).expect("Failed to parse");

    assert_eq!(rule.id, "r1");
    assert!(rule.region.is_empty());
    assert!(rule.supplier_chain.is_empty());
}

#[test]
fn test_deserialize_full_rule() {
    let json = r#"{
        "id": "r1",
        "region": "EMEA",
        "crossPlatformEnabled": true,
        "webToCrossPlatformEnabled": false,
        "exclusionFilters": {
            "excludedNetworkIds": ["123"],
            "excludedCampaignRegexes": ["^test"]
        },
        "supplierChain": [
            {"id": "s1", "supplierConfigRef": "appsflyer-1", "fusionType": "None"},
            {"id": "s2", "supplierConfigRef": "s3-import", "fusionType": "Union"}
        ]
    }"#;

    let rule: ConsolidationRule = serde_json::from_str(json).expect("Failed to parse");

    assert!(rule.cross_platform_enabled);
    assert_eq!(rule.supplier_chain.len(), 2);
    assert_eq!(rule.supplier_chain.priority_of("s2"), Some(2));
    assert!(rule.exclusion_filters.excluded_network_ids.contains("123"));
}
