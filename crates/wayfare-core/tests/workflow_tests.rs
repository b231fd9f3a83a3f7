mod common;

use std::time::Duration;

use common::{POLL, create_test_plan, listings, search_request, test_config};
use wayfare_core::{ExecutionStatus, ScriptedDriver, SiteProfile};

#[tokio::test]
async fn test_successful_search_stores_results() {
    let driver = ScriptedDriver::new().with_listings(listings(2));
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Lisbon"))
        .await
        .unwrap();
    let report = plan.wait_for_execution(id, POLL).await.unwrap();

    assert_eq!(report.status, ExecutionStatus::Completed);
    assert_eq!(report.steps_completed, 9);
    assert_eq!(report.total_steps, 9);
    assert!((report.progress - 1.0).abs() < f64::EPSILON);
    assert!(report.started_at.is_some());
    assert!(report.completed_at.is_some());
    assert!(report.error_message.is_none());

    let results = plan.get_activity_results(report.activity_id).await.unwrap();
    assert_eq!(results.activity.location, "Lisbon");
    assert_eq!(results.total_results, 2);
    // Newest first
    assert_eq!(results.results[0].property_name, "Hotel 2");
    assert_eq!(results.results[0].price, Some(1002));
    assert_eq!(results.results[1].property_name, "Hotel 1");
    assert_eq!(results.results[1].website_name, "Booking.com");
    assert!(results.results[1].source_url.ends_with("/searchresults"));

    assert_eq!(driver.launched(), 1);
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn test_missing_location_input_fails_run() {
    let site = SiteProfile::booking_com();
    let driver = ScriptedDriver::new()
        .with_listings(listings(3))
        .with_missing_selector(site.location_input.clone());
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Porto"))
        .await
        .unwrap();
    let report = plan.wait_for_execution(id, POLL).await.unwrap();

    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.steps_completed, 2);
    assert_eq!(report.current_step.as_deref(), Some("Fill Location"));
    assert_eq!(
        report.error_message.as_deref(),
        Some(format!("Element not found: {}", site.location_input).as_str())
    );
    assert!(report.completed_at.is_some());

    let results = plan.get_activity_results(report.activity_id).await.unwrap();
    assert_eq!(results.total_results, 0);
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn test_results_are_capped_per_run() {
    let driver = ScriptedDriver::new().with_listings(listings(12));
    let (_dir, plan, _driver) = create_test_plan(driver, test_config()).await;

    let first = plan
        .create_and_execute_search(search_request("Madrid"))
        .await
        .unwrap();
    let second = plan
        .create_and_execute_search(search_request("Seville"))
        .await
        .unwrap();
    let first = plan.wait_for_execution(first, POLL).await.unwrap();
    let second = plan.wait_for_execution(second, POLL).await.unwrap();

    assert_ne!(first.activity_id, second.activity_id);
    for report in [first, second] {
        assert_eq!(report.status, ExecutionStatus::Completed);
        let results = plan.get_activity_results(report.activity_id).await.unwrap();
        assert_eq!(results.total_results, 10);
        assert!(
            results
                .results
                .iter()
                .all(|r| r.activity_id == report.activity_id)
        );
        // The first ten listings on the page are kept
        assert!(results.results.iter().all(|r| r.property_name != "Hotel 11"));
    }
}

#[tokio::test]
async fn test_failed_runs_release_every_session() {
    let site = SiteProfile::booking_com();
    let driver = ScriptedDriver::new().with_missing_selector(site.search_button.clone());
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let mut ids = Vec::new();
    for city in ["Bari", "Lecce", "Matera", "Ostuni", "Taranto"] {
        ids.push(plan.create_and_execute_search(search_request(city)).await.unwrap());
    }
    for id in ids {
        let report = plan.wait_for_execution(id, POLL).await.unwrap();
        assert_eq!(report.status, ExecutionStatus::Failed);
        assert_eq!(report.current_step.as_deref(), Some("Click Search"));
    }

    assert_eq!(driver.launched(), 5);
    assert_eq!(driver.closed(), 5);
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn test_launch_failure_never_opens_a_session() {
    let driver = ScriptedDriver::new().with_launch_failure("net::ERR_NAME_NOT_RESOLVED");
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Nice"))
        .await
        .unwrap();
    let report = plan.wait_for_execution(id, POLL).await.unwrap();

    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.steps_completed, 1);
    assert!(
        report
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("net::ERR_NAME_NOT_RESOLVED"))
    );
    assert_eq!(driver.launched(), 0);
    assert_eq!(driver.closed(), 0);
}

#[tokio::test]
async fn test_search_navigation_timeout_fails_run() {
    let driver = ScriptedDriver::new().with_navigation_timeout();
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Lyon"))
        .await
        .unwrap();
    let report = plan.wait_for_execution(id, POLL).await.unwrap();

    assert_eq!(report.status, ExecutionStatus::Failed);
    assert!(
        report
            .error_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Navigation timed out"))
    );
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn test_missing_result_cards_fail_extraction() {
    let site = SiteProfile::booking_com();
    let driver = ScriptedDriver::new().with_missing_selector(site.result_card.clone());
    let (_dir, plan, _driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Ghent"))
        .await
        .unwrap();
    let report = plan.wait_for_execution(id, POLL).await.unwrap();

    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.steps_completed, 9);
    assert!(
        report
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains(&site.result_card))
    );
}

#[tokio::test]
async fn test_progress_never_moves_backwards() {
    let driver = ScriptedDriver::new().with_action_delay(Duration::from_millis(3));
    let (_dir, plan, _driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Bruges"))
        .await
        .unwrap();

    let mut seen = Vec::new();
    loop {
        let report = plan.get_execution_status(id).await.unwrap();
        assert!((0.0..=1.0).contains(&report.progress));
        assert!(report.steps_completed <= report.total_steps || report.total_steps == 0);
        seen.push(report.steps_completed);
        if report.status.is_terminal() {
            assert_eq!(report.status, ExecutionStatus::Completed);
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&9));
}

#[tokio::test]
async fn test_cancel_running_execution() {
    let driver = ScriptedDriver::new().with_action_delay(Duration::from_millis(20));
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Antwerp"))
        .await
        .unwrap();
    while plan.get_execution_status(id).await.unwrap().steps_completed < 2 {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    assert!(plan.cancel_execution(id).await.unwrap());
    let report = plan.wait_for_execution(id, POLL).await.unwrap();
    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.error_message.as_deref(), Some("Execution cancelled"));
    assert!(report.steps_completed < 9);
    assert_eq!(driver.open_sessions(), 0);

    let results = plan.get_activity_results(report.activity_id).await.unwrap();
    assert_eq!(results.total_results, 0);
}

#[tokio::test]
async fn test_cancel_during_launch_closes_the_new_session() {
    // The session exists while its first page is still loading
    let driver = ScriptedDriver::new()
        .with_listings(listings(2))
        .with_page_load_delay(Duration::from_millis(300));
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Ghent"))
        .await
        .unwrap();
    while driver.launched() == 0 {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert_eq!(driver.open_sessions(), 1);

    assert!(plan.cancel_execution(id).await.unwrap());
    let report = plan.wait_for_execution(id, POLL).await.unwrap();
    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.error_message.as_deref(), Some("Execution cancelled"));
    assert_eq!(report.steps_completed, 1);
    assert_eq!(driver.open_sessions(), 0);
    assert_eq!(driver.closed(), 1);

    let results = plan.get_activity_results(report.activity_id).await.unwrap();
    assert_eq!(results.total_results, 0);
}

#[tokio::test]
async fn test_shutdown_during_launch_closes_the_new_session() {
    let driver = ScriptedDriver::new().with_page_load_delay(Duration::from_millis(200));
    let (_dir, plan, driver) = create_test_plan(driver, test_config()).await;

    let id = plan
        .create_and_execute_search(search_request("Bruges"))
        .await
        .unwrap();
    while driver.launched() == 0 {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    plan.shutdown().await.unwrap();
    let report = plan.get_execution_status(id).await.unwrap();
    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(driver.open_sessions(), 0);
    assert_eq!(driver.closed(), 1);
}
