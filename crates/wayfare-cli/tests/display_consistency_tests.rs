//! The CLI prints exactly the markdown the core Display impls produce, which
//! is also what the MCP tools return.

use std::{process::Command, sync::Arc, time::Duration};

use jiff::civil::date;
use tempfile::TempDir;
use wayfare_core::{
    EngineConfig, ExecutionPlan, ExecutionPlanBuilder, RunFilter, ScriptedDriver, SearchRequest,
    driver::RawListing,
};

async fn create_test_plan(temp_dir: &TempDir) -> ExecutionPlan {
    let listing = RawListing {
        name: "Pensao Flor".to_string(),
        price: "€ 412".to_string(),
        rating: "9.1".to_string(),
        url: "https://www.booking.com/hotel/pt/flor".to_string(),
    };
    ExecutionPlanBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_driver(Arc::new(ScriptedDriver::new().with_listings(vec![listing])))
        .with_config(EngineConfig::default().with_settle_delay(Duration::ZERO))
        .build()
        .await
        .expect("Failed to create plan")
}

/// Run a CLI command and capture its output
fn run_cli_command(temp_dir: &TempDir, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_wayfare"))
        .arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.path().join("test.db"))
        .args(args)
        .output()
        .expect("Failed to run CLI command");
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

#[tokio::test]
async fn test_status_results_and_runs_match_display() {
    let temp_dir = TempDir::new().unwrap();
    let plan = create_test_plan(&temp_dir).await;

    let id = plan
        .create_and_execute_search(SearchRequest {
            query: "old town guesthouse".to_string(),
            location: "Coimbra".to_string(),
            start_date: date(2025, 4, 10),
            end_date: date(2025, 4, 12),
            adult_count: 1,
            child_count: 0,
            activity_type: Default::default(),
        })
        .await
        .unwrap();
    let report = plan
        .wait_for_execution(id, Duration::from_millis(5))
        .await
        .unwrap();
    // Let the dispatcher finish its bookkeeping before reading the activity
    plan.shutdown().await.unwrap();
    let results = plan.get_activity_results(report.activity_id).await.unwrap();

    let status_output = run_cli_command(&temp_dir, &["status", &id.to_string()]);
    assert_eq!(status_output, report.to_string());

    let results_output =
        run_cli_command(&temp_dir, &["results", &report.activity_id.to_string()]);
    assert_eq!(results_output, results.to_string());
    assert!(results_output.contains("### Pensao Flor"));
    assert!(results_output.contains("- Price: 412"));

    let runs = plan.list_executions(RunFilter::All).await.unwrap();
    let runs_output = run_cli_command(&temp_dir, &["runs"]);
    assert_eq!(runs_output, runs.to_string());
    assert!(runs_output.contains("## Execution 1: Coimbra"));
    assert!(runs_output.contains("- Results: 1"));
}
