//! HTTP integration tests for the roster engine.
//!
//! This test suite drives the router end to end:
//! - Scheduling with each strategy
//! - Side-by-side strategy comparison
//! - Validating and scoring rosters produced by the engine
//! - Inline unit configuration
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use roster_engine::api::{AppState, create_router};
use roster_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/general_ward").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(router, uri, body.to_string()).await
}

async fn post_raw(router: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn ward_staff() -> Value {
    json!([
        { "id": "n_001", "name": "Kim", "rank": "charge" },
        { "id": "n_002", "name": "Lee" },
        { "id": "n_003", "name": "Park", "constraints": { "protected": true } },
        { "id": "n_004", "name": "Choi", "constraints": { "fixed_night": true } },
        { "id": "n_005", "name": "Jung", "constraints": { "fixed_evening": true } },
        { "id": "n_006", "name": "Kang", "constraints": { "day_evening_rotation": true } },
        { "id": "n_007", "name": "Yoon", "constraints": { "max_consecutive_work_days": 4 } },
        { "id": "n_008", "name": "Jang" }
    ])
}

fn ward_submissions() -> Value {
    json!({
        "n_001": { "wishes": { "1": "OFF", "2": "OFF", "14": "MOFF" }, "priorities": ["D"] },
        "n_002": { "wishes": { "5": "!N", "6": "E" }, "priorities": ["N", "E"] },
        "n_008": { "previous_tail": ["D", "N", "N"] }
    })
}

fn schedule_request(strategy: &str) -> Value {
    json!({
        "period": { "year": 2026, "month": 3 },
        "staff": ward_staff(),
        "submissions": ward_submissions(),
        "strategy": strategy,
        "seed": 2026
    })
}

// =============================================================================
// SECTION 1: Scheduling
// =============================================================================

#[tokio::test]
async fn test_schedule_each_strategy() {
    for strategy in ["balance", "wish_priority", "regularity"] {
        let (status, result) =
            post(create_router_for_test(), "/schedule", schedule_request(strategy)).await;

        assert_eq!(status, StatusCode::OK, "{strategy}: {result}");
        assert_eq!(result["strategy"], strategy);
        assert_eq!(result["outcome"]["status"], "completed");

        let roster = result["roster"].as_object().unwrap();
        assert_eq!(roster.len(), 8);
        for (staff_id, row) in roster {
            assert_eq!(row.as_object().unwrap().len(), 31, "{strategy}: {staff_id}");
        }

        assert_eq!(result["roster"]["n_001"]["1"], "OFF");
        assert_eq!(result["roster"]["n_001"]["14"], "OFF");
        assert_eq!(result["roster"]["n_002"]["6"], "E");
        assert_eq!(result["roster"]["n_004"]["10"], "N");
        assert_eq!(result["roster"]["n_005"]["10"], "E");
        assert!(!result["logs"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_schedule_defaults_to_balance() {
    let mut request = schedule_request("balance");
    request.as_object_mut().unwrap().remove("strategy");

    let (status, result) = post(create_router_for_test(), "/schedule", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["strategy"], "balance");
}

#[tokio::test]
async fn test_protected_staff_only_work_days() {
    let (_, result) = post(
        create_router_for_test(),
        "/schedule",
        schedule_request("wish_priority"),
    )
    .await;

    for code in result["roster"]["n_003"].as_object().unwrap().values() {
        assert!(code == "D" || code == "OFF", "protected staff got {code}");
    }
}

#[tokio::test]
async fn test_same_seed_gives_same_roster() {
    let (_, first) = post(create_router_for_test(), "/schedule", schedule_request("balance")).await;
    let (_, second) =
        post(create_router_for_test(), "/schedule", schedule_request("balance")).await;

    assert_eq!(first["roster"], second["roster"]);
    assert_ne!(first["run_id"], second["run_id"]);
}

// =============================================================================
// SECTION 2: Comparison
// =============================================================================

#[tokio::test]
async fn test_compare_runs_all_strategies() {
    let request = json!({
        "period": { "year": 2026, "month": 3 },
        "staff": ward_staff(),
        "submissions": ward_submissions(),
        "seed": 7
    });

    let (status, result) = post(create_router_for_test(), "/schedule/compare", request).await;
    assert_eq!(status, StatusCode::OK);

    let results = result["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    let strategies: Vec<&str> = results
        .iter()
        .map(|r| r["output"]["strategy"].as_str().unwrap())
        .collect();
    assert_eq!(strategies, vec!["balance", "wish_priority", "regularity"]);

    for entry in results {
        assert_eq!(entry["score"]["total_max"], "100");
        assert!(entry["score"]["categories"]["coverage"].is_object());
        assert!(entry["score"]["pass"].is_boolean());
    }
}

// =============================================================================
// SECTION 3: Validation and scoring
// =============================================================================

#[tokio::test]
async fn test_validate_roster_produced_by_schedule() {
    let (_, scheduled) = post(
        create_router_for_test(),
        "/schedule",
        schedule_request("regularity"),
    )
    .await;

    let request = json!({
        "period": { "year": 2026, "month": 3 },
        "staff": ward_staff(),
        "roster": scheduled["roster"],
        "submissions": ward_submissions()
    });
    let (status, report) = post(create_router_for_test(), "/validate", request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(report["staff_errors"].is_object());
    assert!(report["coverage_issues"].is_object());
    // protected staff only ever get day work
    assert!(report["staff_errors"]["n_003"].is_null());
}

#[tokio::test]
async fn test_validate_flags_hand_built_violations() {
    let request = json!({
        "period": { "year": 2026, "month": 3 },
        "staff": [
            { "id": "a", "name": "A" },
            { "id": "p", "name": "P", "constraints": { "protected": true } }
        ],
        "roster": {
            "a": { "1": "E", "2": "D", "3": "D", "4": "D", "5": "D", "6": "D", "7": "D", "8": "D" },
            "p": { "1": "N" }
        }
    });

    let (status, report) = post(create_router_for_test(), "/validate", request).await;
    assert_eq!(status, StatusCode::OK);

    let a_day2 = report["staff_errors"]["a"]["2"].as_array().unwrap();
    assert!(a_day2.iter().any(|v| v["rule"] == "insufficient_rest"));
    assert!(a_day2.iter().any(|v| v["rule"] == "short_run"));
    let a_day7 = report["staff_errors"]["a"]["7"].as_array().unwrap();
    assert!(a_day7.iter().any(|v| v["rule"] == "consecutive_work_days"));
    assert_eq!(report["staff_errors"]["p"]["1"][0]["rule"], "protected_staff");

    let shortfall = &report["coverage_issues"]["1"][0];
    assert_eq!(shortfall["code"], "D");
}

#[tokio::test]
async fn test_score_roster_produced_by_schedule() {
    let (_, scheduled) = post(
        create_router_for_test(),
        "/schedule",
        schedule_request("wish_priority"),
    )
    .await;

    let request = json!({
        "period": { "year": 2026, "month": 3 },
        "roster": scheduled["roster"],
        "submissions": ward_submissions()
    });
    let (status, score) = post(create_router_for_test(), "/score", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(score["total_max"], "100");
    for category in ["coverage", "satisfaction", "fairness", "health"] {
        assert!(score["categories"][category]["score"].is_string(), "{category}");
    }
}

// =============================================================================
// SECTION 4: Inline unit configuration
// =============================================================================

#[tokio::test]
async fn test_inline_unit_overrides_loaded_unit() {
    let unit = json!({
        "metadata": { "name": "Two Shift Unit", "description": "" },
        "shifts": [
            { "code": "A", "label": "Early", "kind": "day" },
            { "code": "P", "label": "Late", "kind": "evening" }
        ],
        "requirements": { "requirements": { "A": [1, 1, 1, 1, 1, 1, 1] } }
    });
    let request = json!({
        "period": { "year": 2026, "month": 2 },
        "staff": [{ "id": "x", "name": "X" }, { "id": "y", "name": "Y" }],
        "strategy": "regularity",
        "seed": 1,
        "unit": unit
    });

    let (status, result) = post(create_router_for_test(), "/schedule", request).await;
    assert_eq!(status, StatusCode::OK);
    for row in result["roster"].as_object().unwrap().values() {
        for code in row.as_object().unwrap().values() {
            assert!(code == "A" || code == "P" || code == "OFF", "unexpected {code}");
        }
    }
}

// =============================================================================
// SECTION 5: Error cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let (status, error) = post_raw(
        create_router_for_test(),
        "/schedule",
        "{invalid json".to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_invalid_wish_returns_400() {
    let request = json!({
        "period": { "year": 2026, "month": 3 },
        "staff": [{ "id": "a", "name": "A" }],
        "submissions": { "a": { "wishes": { "3": "!" } } }
    });
    let (status, error) = post(create_router_for_test(), "/schedule", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_invalid_period_returns_400() {
    let request = json!({
        "period": { "year": 2026, "month": 13 },
        "roster": {}
    });
    let (status, error) = post(create_router_for_test(), "/score", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_duplicate_staff_is_a_failed_run() {
    let request = json!({
        "period": { "year": 2026, "month": 3 },
        "staff": [{ "id": "a", "name": "A" }, { "id": "a", "name": "B" }]
    });
    let (status, result) = post(create_router_for_test(), "/schedule", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["outcome"]["status"], "failed");
    assert_eq!(result["roster"], json!({}));
    assert!(
        result["logs"][0]
            .as_str()
            .unwrap()
            .contains("duplicate identifier")
    );
}
