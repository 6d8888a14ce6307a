use crate::api::MockRulesApi;
use crate::config::UiConfig;
use crate::eligibility::manager::failure_message;
use crate::eligibility::{EligibilityAction, EligibilityManager};
use crate::http_client::HttpApiError;
use crate::models::{Eligibility, Rule, RuleDraft};

fn rule(id: &str, name: &str, expression: &str) -> Rule {
    Rule {
        id: id.to_string(),
        name: name.to_string(),
        expression: expression.to_string(),
    }
}

fn server_error(status: u16, message: Option<&str>) -> HttpApiError {
    HttpApiError::ServerError {
        status,
        message: message.map(str::to_string),
    }
}

/// Manager whose rule list was loaded with `rules`.
async fn loaded_manager(mut api: MockRulesApi, rules: Vec<Rule>) -> EligibilityManager<MockRulesApi> {
    api.expect_list_rules()
        .times(1)
        .returning(move || Ok(rules.clone()));

    let mut manager = EligibilityManager::new(api);
    manager.dispatch(EligibilityAction::FetchRules);
    manager.run_pending().await;
    manager
}

fn rule_ids(manager: &EligibilityManager<MockRulesApi>) -> Vec<&str> {
    manager.state().rules.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_manager_initialization() {
    let manager = EligibilityManager::new(MockRulesApi::new());
    let state = manager.state();

    assert!(state.rules.is_empty());
    assert!(!state.rules_loaded);
    assert!(state.selected_rule_ids.is_empty());
    assert!(state.eligibility.is_none());
    assert!(state.toasts.is_empty());
    assert!(!manager.has_pending_actions());
}

#[tokio::test]
async fn test_fetch_rules_replaces_list() {
    let manager = loaded_manager(
        MockRulesApi::new(),
        vec![rule("a", "Adults", "age >= 18"), rule("b", "Rich", "salary > 100000")],
    )
    .await;

    let state = manager.state();
    assert!(state.rules_loaded);
    assert_eq!(rule_ids(&manager), vec!["a", "b"]);
    assert!(state.toasts.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_keeps_list_and_notifies() {
    let mut api = MockRulesApi::new();
    let mut calls = 0;
    api.expect_list_rules().times(2).returning(move || {
        calls += 1;
        if calls == 1 {
            Ok(vec![rule("a", "Adults", "age >= 18")])
        } else {
            Err(server_error(500, Some("boom")))
        }
    });

    let mut manager = EligibilityManager::new(api);
    manager.dispatch(EligibilityAction::FetchRules);
    manager.dispatch(EligibilityAction::FetchRules);
    manager.run_pending().await;

    let state = manager.state();
    assert_eq!(rule_ids(&manager), vec!["a"]);
    let toast = state.toasts.latest().unwrap();
    assert!(toast.is_destructive());
    assert_eq!(toast.description, "Failed to fetch rules.");
}

#[tokio::test]
async fn test_add_rule_with_empty_name_issues_no_request() {
    let mut api = MockRulesApi::new();
    api.expect_create_rule().never();

    let mut manager = EligibilityManager::new(api);
    manager.dispatch(EligibilityAction::AddRule {
        draft: RuleDraft::new("   ", "age > 18"),
    });
    manager.dispatch(EligibilityAction::AddRule {
        draft: RuleDraft::new("Adults", ""),
    });
    manager.run_pending().await;

    let state = manager.state();
    assert!(state.rules.is_empty());
    assert_eq!(state.draft_generation, 0);
    assert_eq!(state.toasts.len(), 2);
    assert!(state
        .toasts
        .iter()
        .all(|t| t.description == "Both name and expression are required."));
}

#[tokio::test]
async fn test_add_rule_appends_exactly_one() {
    let mut api = MockRulesApi::new();
    api.expect_create_rule()
        .withf(|request| request.name == "Seniors" && request.expression == "age > 65")
        .times(1)
        .returning(|request| Ok(rule("c", &request.name, &request.expression)));

    let mut manager = loaded_manager(api, vec![rule("a", "Adults", "age >= 18")]).await;
    manager.dispatch(EligibilityAction::AddRule {
        draft: RuleDraft::new(" Seniors ", " age > 65 "),
    });
    manager.run_pending().await;

    let state = manager.state();
    assert_eq!(rule_ids(&manager), vec!["a", "c"]);
    assert_eq!(state.rule("c").unwrap().display_line(), "Seniors: age > 65");
    assert_eq!(state.draft_generation, 1);
    let toast = state.toasts.latest().unwrap();
    assert_eq!(toast.title, "Success");
    assert_eq!(toast.description, "Rule added successfully.");
}

#[tokio::test]
async fn test_add_rule_failure_surfaces_server_message() {
    let mut api = MockRulesApi::new();
    api.expect_create_rule()
        .times(1)
        .returning(|_| Err(server_error(400, Some("Invalid expression"))));

    let mut manager = loaded_manager(api, vec![rule("a", "Adults", "age >= 18")]).await;
    manager.dispatch(EligibilityAction::AddRule {
        draft: RuleDraft::new("Broken", "age >>> 1"),
    });
    manager.run_pending().await;

    let state = manager.state();
    assert_eq!(rule_ids(&manager), vec!["a"]);
    assert_eq!(state.draft_generation, 0);
    assert_eq!(state.toasts.latest().unwrap().description, "Invalid expression");
}

#[tokio::test]
async fn test_delete_removes_only_matching_rule() {
    let mut api = MockRulesApi::new();
    api.expect_delete_rule()
        .withf(|id| id == "b")
        .times(1)
        .returning(|_| Ok(()));

    let mut manager = loaded_manager(
        api,
        vec![
            rule("a", "Adults", "age >= 18"),
            rule("b", "Rich", "salary > 100000"),
            rule("c", "Sales", "department == 'sales'"),
        ],
    )
    .await;

    manager.dispatch(EligibilityAction::ToggleRule { id: "b".to_string() });
    manager.dispatch(EligibilityAction::ToggleRule { id: "c".to_string() });
    manager.dispatch(EligibilityAction::DeleteRule { id: "b".to_string() });
    manager.run_pending().await;

    let state = manager.state();
    assert_eq!(rule_ids(&manager), vec!["a", "c"]);
    assert_eq!(state.selected_rule_ids, vec!["c".to_string()]);
    assert_eq!(
        state.toasts.latest().unwrap().description,
        "Rule deleted successfully."
    );
}

#[tokio::test]
async fn test_delete_failure_keeps_list() {
    let mut api = MockRulesApi::new();
    api.expect_delete_rule()
        .times(1)
        .returning(|_| Err(server_error(404, None)));

    let mut manager = loaded_manager(api, vec![rule("a", "Adults", "age >= 18")]).await;
    manager.dispatch(EligibilityAction::DeleteRule { id: "a".to_string() });
    manager.run_pending().await;

    assert_eq!(rule_ids(&manager), vec!["a"]);
    assert_eq!(
        manager.state().toasts.latest().unwrap().description,
        "Failed to delete rule."
    );
}

#[tokio::test]
async fn test_toggle_rule_is_independent() {
    let mut manager = loaded_manager(
        MockRulesApi::new(),
        vec![rule("a", "A", "x"), rule("b", "B", "y")],
    )
    .await;

    manager.dispatch(EligibilityAction::ToggleRule { id: "a".to_string() });
    manager.dispatch(EligibilityAction::ToggleRule { id: "b".to_string() });
    manager.run_pending().await;
    assert_eq!(manager.state().selected_rule_ids, vec!["a", "b"]);

    manager.dispatch(EligibilityAction::ToggleRule { id: "a".to_string() });
    manager.run_pending().await;
    assert!(!manager.state().is_selected("a"));
    assert!(manager.state().is_selected("b"));
}

#[tokio::test]
async fn test_check_eligibility_sends_data_and_selection() {
    let mut api = MockRulesApi::new();
    api.expect_evaluate()
        .withf(|request| {
            request.rule_ids == vec!["b".to_string(), "a".to_string()]
                && request.data.get("age").map(String::as_str) == Some("42")
                && request.data.get("department").map(String::as_str) == Some("sales")
                && !request.data.contains_key("salary")
        })
        .times(1)
        .returning(|_| Ok(true));

    let mut manager = loaded_manager(api, vec![rule("a", "A", "x"), rule("b", "B", "y")]).await;
    manager.dispatch(EligibilityAction::SetField {
        key: "age".to_string(),
        value: "41".to_string(),
    });
    manager.dispatch(EligibilityAction::SetField {
        key: "age".to_string(),
        value: "42".to_string(),
    });
    manager.dispatch(EligibilityAction::SetField {
        key: "department".to_string(),
        value: "sales".to_string(),
    });
    manager.dispatch(EligibilityAction::ToggleRule { id: "b".to_string() });
    manager.dispatch(EligibilityAction::ToggleRule { id: "a".to_string() });
    manager.dispatch(EligibilityAction::CheckEligibility);
    manager.run_pending().await;

    let state = manager.state();
    assert_eq!(state.eligibility, Some(Eligibility::Eligible));
    assert_eq!(state.field("age"), "42");
    assert_eq!(state.field("salary"), "");
}

#[tokio::test]
async fn test_check_eligibility_failure_keeps_previous_verdict() {
    let mut api = MockRulesApi::new();
    let mut calls = 0;
    api.expect_evaluate().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Ok(false)
        } else {
            Err(server_error(500, Some("ignored for evaluate")))
        }
    });

    let mut manager = EligibilityManager::new(api);
    manager.dispatch(EligibilityAction::CheckEligibility);
    manager.dispatch(EligibilityAction::CheckEligibility);
    manager.run_pending().await;

    let state = manager.state();
    assert_eq!(state.eligibility, Some(Eligibility::NotEligible));
    assert_eq!(
        state.toasts.latest().unwrap().description,
        "Failed to check eligibility."
    );
}

#[tokio::test]
async fn test_fetch_prunes_selection_of_vanished_rules() {
    let mut api = MockRulesApi::new();
    let mut calls = 0;
    api.expect_list_rules().times(2).returning(move || {
        calls += 1;
        if calls == 1 {
            Ok(vec![rule("a", "A", "x"), rule("b", "B", "y")])
        } else {
            Ok(vec![rule("b", "B", "y")])
        }
    });

    let mut manager = EligibilityManager::new(api);
    manager.dispatch(EligibilityAction::FetchRules);
    manager.dispatch(EligibilityAction::ToggleRule { id: "a".to_string() });
    manager.dispatch(EligibilityAction::ToggleRule { id: "b".to_string() });
    manager.dispatch(EligibilityAction::FetchRules);
    manager.run_pending().await;

    assert_eq!(manager.state().selected_rule_ids, vec!["b".to_string()]);
}

#[tokio::test]
async fn test_dismiss_toast() {
    let mut api = MockRulesApi::new();
    api.expect_create_rule().never();

    let config = UiConfig {
        toast_ttl_secs: 60,
        toast_limit: 1,
    };
    let mut manager = EligibilityManager::with_config(api, &config);
    manager.dispatch(EligibilityAction::AddRule {
        draft: RuleDraft::default(),
    });
    manager.dispatch(EligibilityAction::AddRule {
        draft: RuleDraft::default(),
    });
    manager.run_pending().await;
    assert_eq!(manager.state().toasts.len(), 1);

    let id = manager.state().toasts.latest().unwrap().id;
    manager.dispatch(EligibilityAction::DismissToast { id });
    manager.dispatch(EligibilityAction::ExpireToasts);
    manager.run_pending().await;
    assert!(manager.state().toasts.is_empty());
}

#[tokio::test]
async fn test_zero_ttl_toast_survives_immediate_expiry() {
    let mut api = MockRulesApi::new();
    api.expect_create_rule().never();

    let config = UiConfig {
        toast_ttl_secs: 0,
        toast_limit: 3,
    };
    let mut manager = EligibilityManager::with_config(api, &config);
    manager.dispatch(EligibilityAction::AddRule {
        draft: RuleDraft::default(),
    });
    manager.dispatch(EligibilityAction::ExpireToasts);
    manager.run_pending().await;

    assert_eq!(manager.state().toasts.len(), 1);
}

#[test]
fn test_failure_message_mapping() {
    let with_message = server_error(422, Some("Name taken"));
    assert_eq!(failure_message(&with_message, "fallback", true), "Name taken");
    assert_eq!(failure_message(&with_message, "fallback", false), "fallback");
    assert_eq!(
        failure_message(&server_error(500, None), "fallback", true),
        "fallback"
    );

    let decode = serde_json::from_str::<Rule>("not json").unwrap_err();
    let message = failure_message(&HttpApiError::Serialization(decode), "fallback", true);
    assert!(message.starts_with("Serialization error"));
}
