use std::{sync::Arc, time::Duration};

use jiff::civil::date;
use tempfile::TempDir;

use super::*;
use crate::{
    config::EngineConfig,
    driver::ScriptedDriver,
    models::ExecutionStatus,
};

async fn create_test_plan(driver: ScriptedDriver, config: EngineConfig) -> (TempDir, ExecutionPlan) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let plan = ExecutionPlanBuilder::new()
        .with_database_path(Some(&db_path))
        .with_driver(Arc::new(driver))
        .with_config(config)
        .build()
        .await
        .expect("Failed to create plan");
    (temp_dir, plan)
}

fn request(location: &str) -> SearchRequest {
    SearchRequest {
        query: format!("somewhere nice in {location}"),
        location: location.to_string(),
        start_date: date(2025, 8, 1),
        end_date: date(2025, 8, 3),
        adult_count: 1,
        child_count: 0,
        activity_type: Default::default(),
    }
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let (_dir, plan) = create_test_plan(ScriptedDriver::new(), EngineConfig::default()).await;

    let err = plan.get_execution_status(404).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Execution with ID 404 not found");

    let err = plan.get_activity_results(404).await.unwrap_err();
    assert!(err.is_not_found());

    assert!(plan.cancel_execution(404).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_invalid_request_creates_nothing() {
    let (_dir, plan) = create_test_plan(ScriptedDriver::new(), EngineConfig::default()).await;

    let mut bad = request("Oslo");
    bad.end_date = bad.start_date;
    let err = plan.create_and_execute_search(bad).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }));
    assert!(plan.get_execution_status(1).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_shutdown_fails_queued_runs() {
    // One slot, slow driver: the second run stays queued behind the first
    let config = EngineConfig::default()
        .with_settle_delay(Duration::ZERO)
        .with_max_concurrent_runs(Some(1));
    let driver = ScriptedDriver::new().with_action_delay(Duration::from_millis(50));
    let (_dir, plan) = create_test_plan(driver, config).await;

    let first = plan.create_and_execute_search(request("Rome")).await.unwrap();
    let second = plan.create_and_execute_search(request("Milan")).await.unwrap();
    assert_eq!(
        plan.get_execution_status(second).await.unwrap().status,
        ExecutionStatus::Pending
    );

    plan.shutdown().await.unwrap();

    for id in [first, second] {
        let report = plan.get_execution_status(id).await.unwrap();
        assert_eq!(report.status, ExecutionStatus::Failed);
        assert_eq!(report.error_message.as_deref(), Some("Execution cancelled"));
        assert!(report.completed_at.is_some());
    }
    assert_eq!(plan.active_runs().await, 0);

    let err = plan
        .create_and_execute_search(request("Turin"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Configuration { .. }));
}

#[tokio::test]
async fn test_cancel_finished_run_returns_false() {
    let config = EngineConfig::default().with_settle_delay(Duration::ZERO);
    let (_dir, plan) = create_test_plan(ScriptedDriver::new(), config).await;

    let id = plan.create_and_execute_search(request("Bern")).await.unwrap();
    let report = plan
        .wait_for_execution(id, Duration::from_millis(10))
        .await
        .unwrap();
    assert_eq!(report.status, ExecutionStatus::Completed);

    // The dispatcher forgets the run shortly after it finishes
    for _ in 0..50 {
        if plan.active_runs().await == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!plan.cancel_execution(id).await.unwrap());
    assert_eq!(
        plan.get_execution_status(id).await.unwrap().status,
        ExecutionStatus::Completed
    );
}

#[tokio::test]
async fn test_cancel_ignores_finished_run_still_tracked() {
    let (_dir, plan) = create_test_plan(ScriptedDriver::new(), EngineConfig::default()).await;

    // Failed already, but the dispatcher has not forgotten its token yet
    let (_, execution) = plan.store.create_search(request("Basel")).await.unwrap();
    assert!(
        plan.store
            .fail_execution(execution.id, "Element not found: #ss".to_string())
            .await
            .unwrap()
    );
    let token = CancellationToken::new();
    plan.active.lock().await.insert(execution.id, token.clone());

    assert!(!plan.cancel_execution(execution.id).await.unwrap());
    assert!(!token.is_cancelled());
    let report = plan.get_execution_status(execution.id).await.unwrap();
    assert_eq!(report.error_message.as_deref(), Some("Element not found: #ss"));

    plan.active.lock().await.remove(&execution.id);
    plan.shutdown().await.unwrap();
}
