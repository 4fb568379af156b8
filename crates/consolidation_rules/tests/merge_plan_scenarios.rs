//! End-to-end scenarios: document in, validated and compiled plans out.

use consolidation_rules::{
    CandidateRow, ConsolidationError, ConsolidationRuleSet, FusionType, MergePlanCompiler,
    ReferenceCatalog, RuleSetValidator, StepAction, SupplierRule, ValidationErrorType,
};

const CATALOG: &str = r#"
[[advertisers]]
id = "planet_art_demo"

[[advertisers.regions]]
id = "US"
countries = ["us"]

[[advertisers.regions]]
id = "EMEA"
countries = ["de", "fr", "gb"]

[[supplier_configs]]
id = "appsflyer-1"
connector_type = "appsflyer"

[[supplier_configs]]
id = "s3-import"
connector_type = "s3"
advertiser = "planet_art_demo"

[[supplier_configs]]
id = "supermetrics-1"
connector_type = "supermetrics"

[[enrichment_datasets]]
id = "s3_data_import"
name = "Cost And Attribution"
"#;

const DOCUMENT: &str = r#"{
  "advertiserRef": "planet_art_demo",
  "active": true,
  "enrichmentEnabled": true,
  "enrichmentDatasetRefs": ["s3_data_import"],
  "version": 4,
  "rules": [
    {
      "id": "rule_us",
      "region": "US",
      "crossPlatformEnabled": true,
      "webToCrossPlatformEnabled": false,
      "exclusionFilters": {
        "excludedNetworkIds": ["123"],
        "excludedCampaignRegexes": ["^test_"]
      },
      "supplierChain": [
        { "id": "s1", "supplierConfigRef": "appsflyer-1", "fusionType": "None", "events": "installs" },
        { "id": "s2", "supplierConfigRef": "s3-import", "fusionType": "Union" },
        { "id": "s3", "supplierConfigRef": "supermetrics-1", "fusionType": "None" }
      ]
    },
    {
      "id": "rule_emea",
      "region": "EMEA",
      "supplierChain": [
        { "id": "s1", "supplierConfigRef": "supermetrics-1", "fusionType": "None" },
        { "id": "s2", "supplierConfigRef": "appsflyer-1", "fusionType": "FullOuterJoin" }
      ]
    }
  ]
}"#;

fn catalog() -> ReferenceCatalog {
    ReferenceCatalog::from_toml_str(CATALOG).expect("catalog parses")
}

#[test]
fn document_validates_and_compiles_every_region() {
    let catalog = catalog();
    let rule_set = ConsolidationRuleSet::from_json(DOCUMENT).expect("document parses");

    let validated = RuleSetValidator::new(&catalog)
        .validate_for_compile(&rule_set)
        .expect("document is valid");
    let plans = MergePlanCompiler::new().compile_all(&validated);

    assert_eq!(plans.len(), 2);

    let us = &plans[0];
    assert_eq!(us.version, 4);
    assert_eq!(us.enrichment_dataset_refs, vec!["s3_data_import".to_string()]);
    let us_actions: Vec<StepAction> = us.steps.iter().map(|s| s.action).collect();
    assert_eq!(
        us_actions,
        vec![StepAction::Seed, StepAction::Union, StepAction::Inactive]
    );
    assert_eq!(us.steps[0].events.as_deref(), Some("installs"));

    let emea = &plans[1];
    assert_eq!(emea.base().map(|s| s.supplier_config_ref.as_str()), Some("supermetrics-1"));
    assert_eq!(emea.steps[1].action, StepAction::FullOuterJoin);

    // The trailing None supplier is the only warning.
    assert_eq!(validated.warnings().len(), 1);
}

#[test]
fn plan_filters_drive_row_exclusion() {
    let catalog = catalog();
    let rule_set = ConsolidationRuleSet::from_json(DOCUMENT).expect("document parses");
    let validated = RuleSetValidator::new(&catalog)
        .validate_for_compile(&rule_set)
        .expect("document is valid");

    let plan = MergePlanCompiler::new()
        .compile(&validated, "US")
        .expect("US plan");
    let matcher = plan.exclusion_filters.compile().expect("patterns compile");

    assert!(matcher.matches(&CandidateRow::new("123", "anything")));
    assert!(matcher.matches(&CandidateRow::new("999", "test_campaign")));
    assert!(!matcher.matches(&CandidateRow::new("999", "summer_sale")));
}

#[test]
fn editing_then_recompiling_changes_fingerprint() {
    let catalog = catalog();
    let mut rule_set = ConsolidationRuleSet::from_json(DOCUMENT).expect("document parses");
    let compiler = MergePlanCompiler::new();
    let validator = RuleSetValidator::new(&catalog);

    let before = compiler
        .compile(&validator.validate_for_compile(&rule_set).expect("valid"), "US")
        .expect("US plan")
        .fingerprint()
        .expect("fingerprint");

    let us_rule = rule_set.rules[0].id.clone();
    let rule = rule_set.rule_mut(&us_rule).expect("rule exists");
    rule.supplier_chain.move_entry(2, 0).expect("in range");
    rule_set.bump_version();

    let after_plan = compiler
        .compile(&validator.validate_for_compile(&rule_set).expect("valid"), "US")
        .expect("US plan");

    assert_eq!(after_plan.version, 5);
    assert_eq!(
        after_plan.base().map(|s| s.supplier_config_ref.as_str()),
        Some("supermetrics-1")
    );
    assert_ne!(before, after_plan.fingerprint().expect("fingerprint"));
}

#[test]
fn catalog_rejects_foreign_and_unknown_references() {
    let catalog = catalog();
    let mut rule_set = ConsolidationRuleSet::from_json(DOCUMENT).expect("document parses");
    rule_set.advertiser_ref = "other_advertiser".to_string();
    rule_set.rules[1]
        .supplier_chain
        .add(SupplierRule::with_id("s0", "appsflyer-1", FusionType::None));

    let result = RuleSetValidator::new(&catalog).validate(&rule_set);

    // Regions belong to planet_art_demo, s3-import is owned by it too.
    let not_found = result
        .errors
        .iter()
        .filter(|e| e.error_type == ValidationErrorType::ReferenceNotFound)
        .count();
    assert_eq!(not_found, 3);
    assert!(result.has_error_type(ValidationErrorType::DuplicateSupplierInChain));

    let compiled = RuleSetValidator::new(&catalog).validate_for_compile(&rule_set);
    assert!(matches!(
        compiled,
        Err(ConsolidationError::ValidationFailed { error_count: 4, .. })
    ));
}
